// Chart service - Use case turning a chart request into a complete option document
use serde::Deserialize;

use crate::application::series_synthesizer::{synthesize, Shading};
use crate::application::tooltip_aggregator::tooltip_region_id;
use crate::domain::asset::{Asset, GraphType, ShadedRegion};
use crate::domain::chart_option::{
    ChartConfig, ChartOption, DataZoom, DataZoomKind, FilterMode, Grid, Legend, LegendItem, TextStyle, Title,
    Tooltip, TooltipAxisPointer,
};
use crate::domain::grouping::{group, GroupingMode};
use crate::domain::layout::{compute_layout, Layout, LegendSpace};
use crate::domain::legend::LegendSelection;
use crate::domain::zoom::ZoomWindow;
use crate::error::Result;
use crate::infrastructure::config::ChartSettings;

/// Everything the host supplies to draw one chart.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChartSpec {
    pub id: String,
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub dataset: Vec<Asset>,
    #[serde(default)]
    pub show_legend: bool,
    /// Measured legend height; the configured default is used until the host reports one.
    #[serde(default)]
    pub legend_height: Option<f64>,
    #[serde(default)]
    pub shaded_regions: Vec<ShadedRegion>,
    #[serde(default)]
    pub boundary_gap: bool,
    #[serde(default)]
    pub grouping_mode: GroupingMode,
}

#[derive(Debug, Clone)]
pub struct ChartService {
    settings: ChartSettings,
}

impl ChartService {
    pub fn new(settings: ChartSettings) -> Self {
        Self { settings }
    }

    pub fn settings(&self) -> &ChartSettings {
        &self.settings
    }

    /// Run the whole pipeline: validate, group, lay out, synthesize, assemble.
    pub fn build(&self, spec: &ChartSpec, zoom: ZoomWindow, legend: &LegendSelection) -> Result<ChartConfig> {
        let mode = spec.grouping_mode;
        let grouping = group(&spec.dataset, mode);
        let layout = compute_layout(
            &grouping,
            mode,
            LegendSpace {
                shown: spec.show_legend,
                height: spec.legend_height.unwrap_or(self.settings.legend_height),
            },
            &self.settings.layout,
        );
        let synthesis = synthesize(
            &spec.dataset,
            &grouping,
            mode,
            Shading {
                regions: &spec.shaded_regions,
                boundary_gap: spec.boundary_gap,
            },
            legend,
            &self.settings,
        )?;

        let analog_axes: Vec<usize> = grouping
            .keys()
            .enumerate()
            .filter(|(_, key)| key.graph_type() == GraphType::Analog)
            .map(|(index, _)| index)
            .collect();
        let all_axes: Vec<usize> = (0..grouping.len()).collect();

        tracing::debug!(
            "Chart {}: {} assets on {} tracks, height {}",
            spec.id,
            spec.dataset.len(),
            grouping.len(),
            layout.total_height
        );

        let option = ChartOption {
            title: Title {
                text: spec.title.clone(),
                text_style: self.foreground(),
            },
            background_color: self.settings.theme.background.clone(),
            grid: self.grids(&layout),
            x_axis: synthesis.x_axis,
            y_axis: synthesis.y_axis,
            dataset: synthesis.dataset,
            series: synthesis.series,
            data_zoom: data_zoom(zoom, analog_axes, all_axes),
            legend: spec.show_legend.then(|| self.legend(&spec.dataset, legend)),
            tooltip: tooltip(&spec.id),
        };

        Ok(ChartConfig {
            option,
            height: layout.total_height,
        })
    }

    fn foreground(&self) -> TextStyle {
        TextStyle {
            color: self.settings.theme.foreground.clone(),
        }
    }

    fn grids(&self, layout: &Layout) -> Vec<Grid> {
        let grid = &self.settings.grid;
        layout
            .tracks
            .iter()
            .map(|track| Grid {
                top: track.start,
                left: grid.left,
                right: grid.right,
                height: track.height,
                show: true,
                border_width: grid.border_width,
                border_color: grid.border_color.clone(),
            })
            .collect()
    }

    fn legend(&self, assets: &[Asset], selection: &LegendSelection) -> Legend {
        Legend {
            text_style: self.foreground(),
            bottom: 0.0,
            left: 0.0,
            data: assets
                .iter()
                .map(|asset| LegendItem {
                    name: asset.name.clone(),
                    icon: "roundRect",
                    text_style: self.foreground(),
                })
                .collect(),
            selected: selection.fan_out(),
        }
    }
}

/// Four zoom components over one window: analog axes unfiltered, all axes weakly filtered.
fn data_zoom(zoom: ZoomWindow, analog_axes: Vec<usize>, all_axes: Vec<usize>) -> Vec<DataZoom> {
    let component = |kind: DataZoomKind, axes: &[usize], filter_mode: FilterMode| DataZoom {
        kind,
        start: zoom.start,
        end: zoom.end,
        x_axis_index: axes.to_vec(),
        filter_mode,
        zoom_on_mouse_wheel: (kind == DataZoomKind::Inside).then_some("shift"),
        show: (kind == DataZoomKind::Slider).then_some(false),
    };

    vec![
        component(DataZoomKind::Inside, &analog_axes, FilterMode::None),
        component(DataZoomKind::Slider, &analog_axes, FilterMode::None),
        component(DataZoomKind::Inside, &all_axes, FilterMode::WeakFilter),
        component(DataZoomKind::Slider, &all_axes, FilterMode::WeakFilter),
    ]
}

fn tooltip(chart_id: &str) -> Tooltip {
    Tooltip {
        trigger: "axis",
        background_color: "#ffffff00",
        border_color: "#ffffff00",
        padding: 0.0,
        confine: true,
        append_to: format!("#{}", tooltip_region_id(chart_id)),
        axis_pointer: TooltipAxisPointer {
            axis: "x",
            snap: true,
            show: false,
            kind: "cross",
        },
    }
}
