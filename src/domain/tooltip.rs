// Cross-track tooltip data model
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use super::asset::{parse_time_millis, GraphType, ValueMap};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SeriesType {
    Custom,
    Line,
    #[serde(other)]
    Other,
}

/// One entry of the engine's axis-hover callback.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AxisHoverEvent {
    pub series_id: String,
    pub series_type: SeriesType,
    #[serde(default)]
    pub axis_value: Option<Value>,
    #[serde(default)]
    pub value: Vec<Value>,
}

impl AxisHoverEvent {
    /// Hovered time as epoch milliseconds.
    pub fn time_millis(&self) -> Option<i64> {
        match self.axis_value.as_ref()? {
            Value::Number(n) => n.as_i64().or_else(|| n.as_f64().map(|f| f as i64)),
            Value::String(s) => parse_time_millis(s),
            _ => None,
        }
    }
}

/// Hovered value of one point.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TooltipValue {
    pub time: i64,
    pub has_no_data: bool,
    pub data: Map<String, Value>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TooltipEntry {
    pub name: String,
    pub asset_name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub unit: Option<String>,
    pub point_id: String,
    pub item: Map<String, Value>,
    pub color: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub has_no_data: Option<bool>,
    pub graph_type: GraphType,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub value_map: Option<ValueMap>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub time: Option<i64>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TooltipGroup {
    pub asset_id: String,
    pub entries: Vec<TooltipEntry>,
}

/// Cross-track payload rendered outside the chart surface.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TooltipPayload {
    pub region_id: String,
    pub groups: Vec<TooltipGroup>,
}
