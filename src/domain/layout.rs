// Vertical track layout
use serde::{Deserialize, Serialize};

use super::asset::GraphType;
use super::grouping::{GroupingMode, Grouping};

/// Fixed pixel metrics of the track layout.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LayoutMetrics {
    pub top_margin: f64,
    pub track_gap: f64,
    pub bottom_margin: f64,
    pub row_height: f64,
    pub analog_height_stacked: f64,
    pub analog_height_shared: f64,
    pub analog_height_default: f64,
    pub legend_gap: f64,
}

impl Default for LayoutMetrics {
    fn default() -> Self {
        Self {
            top_margin: 48.0,
            track_gap: 32.0,
            bottom_margin: 24.0,
            row_height: 64.0,
            analog_height_stacked: 200.0,
            analog_height_shared: 400.0,
            analog_height_default: 300.0,
            legend_gap: 24.0,
        }
    }
}

impl LayoutMetrics {
    pub fn analog_height(&self, mode: GroupingMode) -> f64 {
        match mode {
            GroupingMode::Stacked => self.analog_height_stacked,
            GroupingMode::Shared => self.analog_height_shared,
            GroupingMode::Default => self.analog_height_default,
        }
    }
}

/// Legend request for one layout pass. `height` is the measured legend height.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct LegendSpace {
    pub shown: bool,
    pub height: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct TrackGeometry {
    pub start: f64,
    pub height: f64,
}

impl TrackGeometry {
    pub fn end(&self) -> f64 {
        self.start + self.height
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Layout {
    pub tracks: Vec<TrackGeometry>,
    pub total_height: f64,
}

/// Stack the grouped tracks top to bottom and size the canvas.
pub fn compute_layout(
    grouping: &Grouping<'_>,
    mode: GroupingMode,
    legend: LegendSpace,
    metrics: &LayoutMetrics,
) -> Layout {
    let mut tracks: Vec<TrackGeometry> = Vec::with_capacity(grouping.len());

    for (key, members) in grouping.groups() {
        let height = match key.graph_type() {
            GraphType::Binary | GraphType::Multistate => metrics.row_height * members.len() as f64,
            GraphType::Analog => metrics.analog_height(mode),
        };
        let start = match tracks.last() {
            Some(previous) => previous.end() + metrics.track_gap,
            None => metrics.top_margin,
        };
        tracks.push(TrackGeometry { start, height });
    }

    let content_bottom = tracks
        .last()
        .map(TrackGeometry::end)
        .unwrap_or(metrics.top_margin);
    let legend_extra = if legend.shown {
        metrics.legend_gap + legend.height
    } else {
        0.0
    };

    Layout {
        tracks,
        total_height: content_bottom + metrics.bottom_margin + legend_extra,
    }
}
