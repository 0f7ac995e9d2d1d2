// Chart instance - Lifecycle of one mounted chart and its engine events
use std::sync::Arc;

use crate::application::chart_service::{ChartService, ChartSpec};
use crate::application::render_surface::{RenderHost, RenderSurface};
use crate::application::tooltip_aggregator::{tooltip_region_id, TooltipAggregator};
use crate::application::zoom_coordinator::ZoomHandle;
use crate::domain::chart_option::ChartConfig;
use crate::domain::legend::{LegendSelectChanged, LegendSelection};
use crate::domain::tooltip::{AxisHoverEvent, TooltipPayload};
use crate::error::Result;

/// A chart bound to a surface, a tooltip region and its dashboard's zoom window.
///
/// Zoom changes are written to the dashboard scope, which redraws every chart
/// it holds. Dropping the instance disposes the surface and removes the tooltip region.
pub struct ChartInstance {
    spec: ChartSpec,
    service: ChartService,
    zoom: ZoomHandle,
    host: Arc<dyn RenderHost>,
    surface: Option<Box<dyn RenderSurface>>,
    legend: LegendSelection,
    tooltip: TooltipAggregator,
    config: Option<ChartConfig>,
}

impl ChartInstance {
    /// Create the tooltip region and surface, then render once.
    ///
    /// The pipeline runs before anything is created, so a chart that fails
    /// validation leaves no surface or region behind.
    pub fn mount(
        spec: ChartSpec,
        service: ChartService,
        zoom: ZoomHandle,
        host: Arc<dyn RenderHost>,
    ) -> Result<Self> {
        let legend = LegendSelection::default();
        let config = service.build(&spec, zoom.zoom()?, &legend)?;

        host.create_tooltip_region(&tooltip_region_id(&spec.id));
        let mut surface = host.create_surface(&spec.id);
        surface.set_option(&config);

        tracing::info!("Mounted chart {} ({} assets)", spec.id, spec.dataset.len());

        Ok(Self {
            spec,
            service,
            zoom,
            host,
            surface: Some(surface),
            legend,
            tooltip: TooltipAggregator::new(),
            config: Some(config),
        })
    }

    pub fn legend(&self) -> &LegendSelection {
        &self.legend
    }

    /// Last configuration handed to the surface.
    pub fn config(&self) -> Option<&ChartConfig> {
        self.config.as_ref()
    }

    /// Rebuild against the current zoom window and push it to the surface.
    pub fn render(&mut self) -> Result<ChartConfig> {
        let config = self.service.build(&self.spec, self.zoom.zoom()?, &self.legend)?;

        let surface = match self.surface.take() {
            Some(surface) if !surface.is_disposed() => surface,
            _ => {
                tracing::debug!("Recreating disposed surface for chart {}", self.spec.id);
                self.host.create_surface(&self.spec.id)
            }
        };
        let surface = self.surface.insert(surface);
        surface.set_option(&config);

        self.config = Some(config.clone());
        Ok(config)
    }

    pub fn on_legend_select_changed(&mut self, event: LegendSelectChanged) -> Result<ChartConfig> {
        self.legend.apply(event);
        self.render()
    }

    pub fn on_axis_hover(&mut self, events: &[AxisHoverEvent]) -> Option<TooltipPayload> {
        self.tooltip.on_hover(events);
        self.tooltip_payload()
    }

    pub fn tooltip_payload(&self) -> Option<TooltipPayload> {
        self.tooltip.payload(&self.spec.id, &self.spec.dataset)
    }

    /// Resize the surface to the chart's height; a disposed surface is left alone.
    pub fn resize(&mut self, width: f64) {
        let height = self.config.as_ref().map(|c| c.height).unwrap_or_default();
        match self.surface.as_mut() {
            Some(surface) if !surface.is_disposed() => surface.resize(width, height),
            _ => tracing::debug!("Skipping resize of disposed chart {}", self.spec.id),
        }
    }

    pub fn unmount(self) {
        drop(self);
    }
}

impl Drop for ChartInstance {
    fn drop(&mut self) {
        if let Some(mut surface) = self.surface.take() {
            if !surface.is_disposed() {
                surface.dispose();
            }
        }
        self.host.remove_tooltip_region(&tooltip_region_id(&self.spec.id));
        tracing::info!("Unmounted chart {}", self.spec.id);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::chart_service::fixtures;
    use crate::application::zoom_coordinator::ZoomCoordinator;
    use crate::domain::asset::{fixtures as asset_fixtures, AssetSeries};
    use crate::error::ChartError;
    use crate::infrastructure::config::ChartSettings;
    use crate::infrastructure::retained_surface::RetainedHost;
    use serde_json::json;

    fn mount(id: &str, coordinator: &ZoomCoordinator, host: &RetainedHost) -> ChartInstance {
        ChartInstance::mount(
            fixtures::spec(id),
            ChartService::new(ChartSettings::default()),
            coordinator.handle(),
            Arc::new(host.clone()),
        )
        .unwrap()
    }

    #[test]
    fn test_mount_creates_region_and_unmount_removes_it() {
        let coordinator = ZoomCoordinator::new();
        let host = RetainedHost::new();
        let chart = mount("c1", &coordinator, &host);

        assert!(host.has_tooltip_region("graph-tooltip-c1"));
        assert_eq!(chart.config().map(|c| c.height), Some(532.0));

        chart.unmount();
        assert!(!host.has_tooltip_region("graph-tooltip-c1"));
    }

    #[test]
    fn test_failed_mount_leaves_nothing_behind() {
        let coordinator = ZoomCoordinator::new();
        let host = RetainedHost::new();
        let mut spec = fixtures::spec("c1");
        let mut broken = asset_fixtures::multistate("m1");
        if let AssetSeries::Multistate { value_map, .. } = &mut broken.series {
            value_map.take();
        }
        spec.dataset.push(broken);

        let result = ChartInstance::mount(
            spec,
            ChartService::new(ChartSettings::default()),
            coordinator.handle(),
            Arc::new(host.clone()),
        );
        assert!(matches!(result, Err(ChartError::MissingValueMap { .. })));
        assert!(!host.has_tooltip_region("graph-tooltip-c1"));
        assert_eq!(host.surfaces_created(), 0);
    }

    #[test]
    fn test_render_reads_the_shared_window() {
        let coordinator = ZoomCoordinator::new();
        let host = RetainedHost::new();
        let mut first = mount("c1", &coordinator, &host);
        let mut second = mount("c2", &coordinator, &host);

        coordinator.set_zoom(20.0, 40.0).unwrap();

        for chart in [&mut first, &mut second] {
            let config = chart.render().unwrap();
            assert!(config.option.data_zoom.iter().all(|dz| dz.start == 20.0 && dz.end == 40.0));
        }
    }

    #[test]
    fn test_disposed_surface_is_recreated_on_render() {
        let coordinator = ZoomCoordinator::new();
        let host = RetainedHost::new();
        let mut chart = mount("c1", &coordinator, &host);

        host.dispose_surface("c1");
        chart.resize(1024.0);
        assert_eq!(host.surfaces_created(), 1);

        chart.render().unwrap();
        assert_eq!(host.surfaces_created(), 2);
    }

    #[test]
    fn test_render_after_scope_discarded_fails() {
        let coordinator = ZoomCoordinator::new();
        let host = RetainedHost::new();
        let mut chart = mount("c1", &coordinator, &host);
        drop(coordinator);

        assert_eq!(chart.render(), Err(ChartError::ZoomScopeInactive));
    }

    #[test]
    fn test_legend_event_moves_shaded_region() {
        let coordinator = ZoomCoordinator::new();
        let host = RetainedHost::new();
        let mut spec = fixtures::spec("c1");
        spec.shaded_regions = serde_json::from_value(json!([
            { "start": "2020-01-01", "end": "2020-01-02", "color": "red" }
        ]))
        .unwrap();
        let mut chart = ChartInstance::mount(
            spec,
            ChartService::new(ChartSettings::default()),
            coordinator.handle(),
            Arc::new(host.clone()),
        )
        .unwrap();

        let config = chart
            .on_legend_select_changed(LegendSelectChanged {
                selected: [("b1 status".to_string(), false)].into_iter().collect(),
            })
            .unwrap();

        let carrier = config
            .option
            .series
            .iter()
            .find(|s| s.id().starts_with("primary-binary") && s.mark_area().is_some())
            .map(|s| s.id().to_string());
        assert_eq!(carrier.as_deref(), Some("primary-binary_b2"));
        assert!(!chart.legend().is_visible("b1 status"));
    }

    #[test]
    fn test_hover_builds_payload_for_region() {
        let coordinator = ZoomCoordinator::new();
        let host = RetainedHost::new();
        let mut chart = mount("c1", &coordinator, &host);
        assert!(chart.tooltip_payload().is_none());

        let events: Vec<AxisHoverEvent> = serde_json::from_value(json!([
            { "seriesId": "primary_t1", "seriesType": "line", "axisValue": "2020-01-02", "value": ["2020-01-02", 0] }
        ]))
        .unwrap();
        let payload = chart.on_axis_hover(&events).unwrap();

        assert_eq!(payload.region_id, "graph-tooltip-c1");
        assert_eq!(payload.groups.len(), 2);
    }
}
