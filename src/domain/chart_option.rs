// Declarative chart option handed to the rendering engine
use serde::Serialize;
use std::collections::BTreeMap;

use super::asset::{IntervalRow, LinePoint, TimeValue};

/// Option document plus the height the host container must be sized to.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ChartConfig {
    pub option: ChartOption,
    pub height: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ChartOption {
    pub title: Title,
    pub background_color: String,
    pub grid: Vec<Grid>,
    pub x_axis: Vec<XAxis>,
    pub y_axis: Vec<YAxis>,
    pub dataset: Vec<Dataset>,
    pub series: Vec<Series>,
    pub data_zoom: Vec<DataZoom>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub legend: Option<Legend>,
    pub tooltip: Tooltip,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Title {
    pub text: String,
    pub text_style: TextStyle,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TextStyle {
    pub color: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Grid {
    pub top: f64,
    pub left: f64,
    pub right: f64,
    pub height: f64,
    pub show: bool,
    pub border_width: f64,
    pub border_color: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum AxisType {
    Category,
    Value,
    Time,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct XAxis {
    pub grid_index: usize,
    #[serde(rename = "type")]
    pub kind: AxisType,
    pub min: &'static str,
    pub max: &'static str,
    pub boundary_gap: bool,
}

impl XAxis {
    pub fn time(grid_index: usize) -> Self {
        Self {
            grid_index,
            kind: AxisType::Time,
            min: "dataMin",
            max: "dataMax",
            boundary_gap: false,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct YAxis {
    #[serde(rename = "type")]
    pub kind: AxisType,
    pub grid_index: usize,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name_gap: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name_location: Option<&'static str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name_text_style: Option<TextStyle>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub min: Option<&'static str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max: Option<&'static str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub split_number: Option<u32>,
    pub axis_pointer: AxisPointer,
    pub split_line: SplitLine,
    pub axis_label: AxisLabel,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub axis_line: Option<AxisLine>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AxisPointer {
    pub show: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub snap: Option<bool>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SplitLine {
    pub line_style: LineStyle,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AxisLabel {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub formatter: Option<&'static str>,
    pub color: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AxisLine {
    pub on_zero: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum DatasetSource {
    Intervals(Vec<IntervalRow>),
    Points(Vec<LinePoint>),
}

/// One dataset partition a series reads from.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Dataset {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    pub dimensions: &'static [&'static str],
    pub source: DatasetSource,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum Series {
    Custom(CustomSeries),
    Line(LineSeries),
}

impl Series {
    pub fn id(&self) -> &str {
        match self {
            Series::Custom(series) => &series.id,
            Series::Line(series) => &series.id,
        }
    }

    pub fn name(&self) -> &str {
        match self {
            Series::Custom(series) => &series.name,
            Series::Line(series) => &series.name,
        }
    }

    pub fn mark_area(&self) -> Option<&MarkArea> {
        match self {
            Series::Custom(series) => series.mark_area.as_ref(),
            Series::Line(series) => series.mark_area.as_ref(),
        }
    }

    pub fn axis_index(&self) -> usize {
        match self {
            Series::Custom(series) => series.y_axis_index,
            Series::Line(series) => series.y_axis_index,
        }
    }

    pub fn dataset_index(&self) -> usize {
        match self {
            Series::Custom(series) => series.dataset_index,
            Series::Line(series) => series.dataset_index,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Encode {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub x: Option<Vec<&'static str>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub y: Option<&'static str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub value: Option<&'static str>,
}

/// Per state code opacity used by the interval rectangle renderer.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct OpacityStop {
    pub value: f64,
    pub opacity: f64,
}

/// Renderer contract of a rectangle-from-interval series.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RectRenderer {
    #[serde(rename = "type")]
    pub kind: &'static str,
    pub opacity: Vec<OpacityStop>,
    pub default_opacity: f64,
    pub no_data: &'static str,
}

impl RectRenderer {
    pub fn opacity_for(&self, value: f64) -> f64 {
        self.opacity
            .iter()
            .find(|stop| stop.value == value)
            .map(|stop| stop.opacity)
            .unwrap_or(self.default_opacity)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CustomSeries {
    pub id: String,
    pub name: String,
    pub clip: bool,
    pub encode: Encode,
    pub render_item: RectRenderer,
    pub x_axis_index: usize,
    pub y_axis_index: usize,
    pub dataset_index: usize,
    pub label: Label,
    pub item_style: ItemStyle,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub zlevel: Option<i32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub mark_area: Option<MarkArea>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LineSeries {
    pub id: String,
    pub name: String,
    pub x_axis_index: usize,
    pub y_axis_index: usize,
    pub dataset_index: usize,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub encode: Option<Encode>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub line_style: Option<LineStyle>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub area_style: Option<AreaStyle>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub item_style: Option<ItemStyle>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub label: Option<Label>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub stack: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub symbol: Option<&'static str>,
    pub show_symbol: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub mark_area: Option<MarkArea>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Label {
    pub show: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ItemStyle {
    pub color: String,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize)]
pub struct LineStyle {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub color: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub opacity: Option<f64>,
    #[serde(rename = "type", skip_serializing_if = "Option::is_none")]
    pub kind: Option<&'static str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub width: Option<f64>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AreaStyle {
    pub color: String,
    pub opacity: f64,
}

/// Shaded time bands drawn across a track.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MarkArea {
    pub data: Vec<[MarkAreaEdge; 2]>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MarkAreaEdge {
    pub x_axis: TimeValue,
    pub item_style: MarkAreaStyle,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MarkAreaStyle {
    pub color: String,
    pub opacity: f64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub border_type: Option<&'static str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub border_width: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub border_color: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum FilterMode {
    None,
    WeakFilter,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum DataZoomKind {
    Inside,
    Slider,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DataZoom {
    #[serde(rename = "type")]
    pub kind: DataZoomKind,
    pub start: f64,
    pub end: f64,
    pub x_axis_index: Vec<usize>,
    pub filter_mode: FilterMode,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub zoom_on_mouse_wheel: Option<&'static str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub show: Option<bool>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Legend {
    pub text_style: TextStyle,
    pub bottom: f64,
    pub left: f64,
    pub data: Vec<LegendItem>,
    pub selected: BTreeMap<String, bool>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LegendItem {
    pub name: String,
    pub icon: &'static str,
    pub text_style: TextStyle,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Tooltip {
    pub trigger: &'static str,
    pub background_color: &'static str,
    pub border_color: &'static str,
    pub padding: f64,
    pub confine: bool,
    /// Selector of the out-of-band region the tooltip payload is rendered into.
    pub append_to: String,
    pub axis_pointer: TooltipAxisPointer,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TooltipAxisPointer {
    pub axis: &'static str,
    pub snap: bool,
    pub show: bool,
    #[serde(rename = "type")]
    pub kind: &'static str,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_series_serializes_with_type_tag() {
        let series = Series::Line(LineSeries {
            id: "primary_p1".to_string(),
            name: "Temp".to_string(),
            x_axis_index: 1,
            y_axis_index: 1,
            dataset_index: 3,
            encode: None,
            line_style: Some(LineStyle {
                color: Some("grey".to_string()),
                kind: Some("dashed"),
                ..LineStyle::default()
            }),
            area_style: None,
            item_style: None,
            label: None,
            stack: None,
            symbol: Some("none"),
            show_symbol: false,
            mark_area: None,
        });

        assert_eq!(
            serde_json::to_value(&series).unwrap(),
            json!({
                "type": "line",
                "id": "primary_p1",
                "name": "Temp",
                "xAxisIndex": 1,
                "yAxisIndex": 1,
                "datasetIndex": 3,
                "lineStyle": { "color": "grey", "type": "dashed" },
                "symbol": "none",
                "showSymbol": false,
            })
        );
    }

    #[test]
    fn test_rect_renderer_falls_back_to_default_opacity() {
        let renderer = RectRenderer {
            kind: "interval-rect",
            opacity: vec![OpacityStop {
                value: 0.0,
                opacity: 0.5,
            }],
            default_opacity: 1.0,
            no_data: "-",
        };

        assert_eq!(renderer.opacity_for(0.0), 0.5);
        assert_eq!(renderer.opacity_for(7.0), 1.0);
    }
}
