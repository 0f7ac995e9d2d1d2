// Zoom slider - Header strip driving the shared zoom window
use serde::Serialize;

use crate::application::zoom_coordinator::ZoomHandle;
use crate::domain::chart_option::{AxisType, DataZoomKind};
use crate::domain::zoom::{DataZoomEvent, ZoomWindow};
use crate::error::Result;

const SLIDER_FILL: &str = "#5945d733";
const SLIDER_ACCENT: &str = "#5945d7";
const SLIDER_HANDLE_BORDER: &str = "#7d62df";
const TRANSPARENT: &str = "#ffffff00";

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SliderConfig {
    pub option: SliderOption,
    pub width: f64,
    pub height: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SliderOption {
    pub x_axis: HiddenAxis,
    pub y_axis: HiddenAxis,
    pub grid: SliderGrid,
    pub data_zoom: Vec<SliderZoom>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct HiddenAxis {
    #[serde(rename = "type", skip_serializing_if = "Option::is_none")]
    pub kind: Option<AxisType>,
    pub show: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SliderGrid {
    pub left: f64,
    pub right: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SliderZoom {
    pub id: &'static str,
    #[serde(rename = "type")]
    pub kind: DataZoomKind,
    pub start: f64,
    pub end: f64,
    pub show_detail: bool,
    pub move_handle_size: f64,
    pub top: f64,
    pub bottom: f64,
    pub right: f64,
    pub height: f64,
    pub filler_color: &'static str,
    pub border_color: &'static str,
    pub border_radius: f64,
    pub handle_color: &'static str,
    pub move_handle_color: &'static str,
    pub move_handle_border_color: &'static str,
    pub selected_color: &'static str,
}

/// Slider widget whose geometry waits for the host to measure its container.
#[derive(Debug, Clone)]
pub struct ZoomSlider {
    handle: ZoomHandle,
    header_height: f64,
    container_width: Option<f64>,
}

impl ZoomSlider {
    pub fn new(handle: ZoomHandle, header_height: f64) -> Self {
        Self {
            handle,
            header_height,
            container_width: None,
        }
    }

    /// Record the measured container width; zero or negative widths keep the slider pending.
    pub fn container_measured(&mut self, width: f64) {
        self.container_width = (width > 0.0).then_some(width);
    }

    /// Slider option bound to the current window, `None` until the container is measured.
    pub fn config(&self) -> Result<Option<SliderConfig>> {
        let zoom = self.handle.zoom()?;
        let Some(width) = self.container_width else {
            tracing::debug!("Zoom slider pending container measurement");
            return Ok(None);
        };

        Ok(Some(SliderConfig {
            option: slider_option(zoom),
            width,
            height: self.header_height,
        }))
    }

    /// Drag of the slider handles, written to the shared window.
    pub fn on_zoom(&self, event: &DataZoomEvent) -> Result<ZoomWindow> {
        self.handle.apply_event(event)
    }
}

fn slider_option(zoom: ZoomWindow) -> SliderOption {
    SliderOption {
        x_axis: HiddenAxis {
            kind: Some(AxisType::Time),
            show: false,
        },
        y_axis: HiddenAxis {
            kind: None,
            show: false,
        },
        grid: SliderGrid {
            left: 2.0,
            right: 2.0,
        },
        data_zoom: vec![SliderZoom {
            id: "data-zoom",
            kind: DataZoomKind::Slider,
            start: zoom.start,
            end: zoom.end,
            show_detail: false,
            move_handle_size: 4.0,
            top: 0.0,
            bottom: 4.0,
            right: 4.0,
            height: 20.0,
            filler_color: SLIDER_FILL,
            border_color: TRANSPARENT,
            border_radius: 0.0,
            handle_color: SLIDER_FILL,
            move_handle_color: SLIDER_FILL,
            move_handle_border_color: SLIDER_HANDLE_BORDER,
            selected_color: SLIDER_ACCENT,
        }],
    }
}
