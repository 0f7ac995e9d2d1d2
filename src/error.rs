// Error taxonomy for chart synthesis
use thiserror::Error;

/// Configuration errors raised by the synthesis pipeline and the chart lifecycle.
///
/// Data errors (no-data sentinels, unparseable values) never surface here; they
/// are recovered where they are read and rendered as gaps.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum ChartError {
    #[error("value map is missing for multistate asset {point_id}")]
    MissingValueMap { point_id: String },

    #[error("value map key {key:?} of asset {point_id} is not an integer state code")]
    InvalidValueMapKey { point_id: String, key: String },

    #[error("state code {code} of asset {point_id} is not present in its value map")]
    UnknownStateCode { point_id: String, code: f64 },

    #[error("coordinate system is missing from the render item parameters")]
    MissingCoordinateSystem,

    #[error("render api is missing the {0} accessor")]
    MissingRenderApi(&'static str),

    #[error("zoom window was read outside an active dashboard scope")]
    ZoomScopeInactive,

    #[error("invalid zoom window start={start} end={end}")]
    InvalidZoomWindow { start: f64, end: f64 },

    #[error("invalid asset {point_id}: {reason}")]
    InvalidAsset { point_id: String, reason: String },

    #[error("unknown dashboard {0}")]
    UnknownDashboard(String),

    #[error("unknown chart {chart} on dashboard {dashboard}")]
    UnknownChart { dashboard: String, chart: String },
}

pub type Result<T> = std::result::Result<T, ChartError>;
