// Rectangle renderer - Interval rows drawn as clipped bands on their track
use serde::Serialize;

use crate::application::series_synthesizer::is_drawn;
use crate::domain::asset::IntervalRow;
use crate::domain::chart_option::RectRenderer;
use crate::error::{ChartError, Result};

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Rect {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
}

/// Intersection of two rectangles, `None` when they do not overlap.
pub fn clip_rect_by_rect(rect: Rect, bounds: Rect) -> Option<Rect> {
    let x = rect.x.max(bounds.x);
    let y = rect.y.max(bounds.y);
    let right = (rect.x + rect.width).min(bounds.x + bounds.width);
    let bottom = (rect.y + rect.height).min(bounds.y + bounds.height);

    if right <= x || bottom <= y {
        return None;
    }
    Some(Rect {
        x,
        y,
        width: right - x,
        height: bottom - y,
    })
}

/// Pixel conversions the engine offers a custom series while rendering.
pub trait RenderApi {
    /// Data point `[time, row]` to pixels; `None` when the accessor is unavailable.
    fn coord(&self, point: [f64; 2]) -> Option<[f64; 2]>;

    /// Pixel size of a data extent; `None` when the accessor is unavailable.
    fn size(&self, extent: [f64; 2]) -> Option<[f64; 2]>;
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RenderParams {
    pub coord_sys: Option<Rect>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RectStyle {
    pub opacity: f64,
    pub line_width: f64,
}

/// Graphic element returned for one interval row.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RenderedRect {
    #[serde(rename = "type")]
    pub kind: &'static str,
    pub transition: &'static str,
    pub shape: Option<Rect>,
    pub style: RectStyle,
    pub ignore: bool,
    pub emphasis_disabled: bool,
}

/// Draw one interval row as a rectangle spanning its start and end on its category band.
pub fn render_interval_rect(
    params: &RenderParams,
    api: &dyn RenderApi,
    row: &IntervalRow,
    renderer: &RectRenderer,
) -> Result<RenderedRect> {
    let bounds = params.coord_sys.ok_or(ChartError::MissingCoordinateSystem)?;

    let start_ms = row.start.to_millis().unwrap_or_default() as f64;
    let end_ms = row.end.to_millis().unwrap_or_default() as f64;
    let band = f64::from(row.row);

    let start = api
        .coord([start_ms, band])
        .ok_or(ChartError::MissingRenderApi("coord"))?;
    let end = api
        .coord([end_ms, band])
        .ok_or(ChartError::MissingRenderApi("coord"))?;
    let height = api
        .size([0.0, 1.0])
        .ok_or(ChartError::MissingRenderApi("size"))?[1];

    let width = end[0] - start[0];
    let rect = Rect {
        x: start[0] - width / 2.0,
        y: start[1] - height / 2.0,
        width,
        height,
    };

    let opacity = row
        .value
        .as_number()
        .map(|value| renderer.opacity_for(value))
        .unwrap_or(renderer.default_opacity);

    Ok(RenderedRect {
        kind: "rect",
        transition: "shape",
        shape: clip_rect_by_rect(rect, bounds),
        style: RectStyle {
            opacity,
            line_width: 0.0,
        },
        ignore: !is_drawn(&row.value),
        emphasis_disabled: true,
    })
}
