// Dashboard service - Registry of dashboard scopes and the charts mounted in them
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::{watch, RwLock};

use crate::application::chart_instance::ChartInstance;
use crate::application::chart_service::{ChartService, ChartSpec};
use crate::application::render_surface::RenderHost;
use crate::application::zoom_coordinator::ZoomCoordinator;
use crate::application::zoom_slider::{SliderConfig, ZoomSlider};
use crate::domain::chart_option::ChartConfig;
use crate::domain::legend::LegendSelectChanged;
use crate::domain::tooltip::{AxisHoverEvent, TooltipPayload};
use crate::domain::zoom::{DataZoomEvent, ZoomWindow};
use crate::error::{ChartError, Result};

/// One dashboard: a zoom window and the charts sharing it.
#[derive(Default)]
struct DashboardScope {
    zoom: ZoomCoordinator,
    charts: HashMap<String, ChartInstance>,
}

impl DashboardScope {
    /// Redraw every chart against the current window.
    ///
    /// A chart that fails to render is logged and skipped; the others still redraw.
    fn redraw(&mut self, dashboard: &str) {
        let window = self.zoom.zoom();
        for (chart, instance) in self.charts.iter_mut() {
            if let Err(e) = instance.render() {
                tracing::warn!("Failed to redraw chart {} on dashboard {}: {}", chart, dashboard, e);
            }
        }
        tracing::debug!(
            "Redrew {} charts on dashboard {} at {}..{}",
            self.charts.len(),
            dashboard,
            window.start,
            window.end
        );
    }
}

#[derive(Clone)]
pub struct DashboardService {
    chart_service: ChartService,
    host: Arc<dyn RenderHost>,
    dashboards: Arc<RwLock<HashMap<String, DashboardScope>>>,
}

impl DashboardService {
    pub fn new(chart_service: ChartService, host: Arc<dyn RenderHost>) -> Self {
        Self {
            chart_service,
            host,
            dashboards: Arc::new(RwLock::new(HashMap::new())),
        }
    }

    /// Mount a chart, replacing whatever was mounted in the same slot.
    pub async fn mount_chart(&self, dashboard: &str, chart: &str, mut spec: ChartSpec) -> Result<ChartConfig> {
        spec.id = chart.to_string();
        let mut dashboards = self.dashboards.write().await;
        let scope = dashboards.entry(dashboard.to_string()).or_default();

        if let Some(previous) = scope.charts.remove(chart) {
            tracing::debug!("Remounting chart {} on dashboard {}", chart, dashboard);
            previous.unmount();
        }

        let instance = ChartInstance::mount(
            spec,
            self.chart_service.clone(),
            scope.zoom.handle(),
            self.host.clone(),
        )?;
        let config = instance
            .config()
            .cloned()
            .ok_or_else(|| unknown_chart(dashboard, chart))?;
        scope.charts.insert(chart.to_string(), instance);

        Ok(config)
    }

    pub async fn render_chart(&self, dashboard: &str, chart: &str) -> Result<ChartConfig> {
        let mut dashboards = self.dashboards.write().await;
        chart_mut(&mut dashboards, dashboard, chart)?.render()
    }

    pub async fn unmount_chart(&self, dashboard: &str, chart: &str) -> Result<()> {
        let mut dashboards = self.dashboards.write().await;
        let scope = scope_mut(&mut dashboards, dashboard)?;
        let instance = scope
            .charts
            .remove(chart)
            .ok_or_else(|| unknown_chart(dashboard, chart))?;
        instance.unmount();
        Ok(())
    }

    pub async fn legend_select_changed(
        &self,
        dashboard: &str,
        chart: &str,
        event: LegendSelectChanged,
    ) -> Result<ChartConfig> {
        let mut dashboards = self.dashboards.write().await;
        chart_mut(&mut dashboards, dashboard, chart)?.on_legend_select_changed(event)
    }

    pub async fn axis_hover(
        &self,
        dashboard: &str,
        chart: &str,
        events: &[AxisHoverEvent],
    ) -> Result<Option<TooltipPayload>> {
        let mut dashboards = self.dashboards.write().await;
        Ok(chart_mut(&mut dashboards, dashboard, chart)?.on_axis_hover(events))
    }

    /// Apply a chart's data zoom event to the shared window and redraw every chart.
    pub async fn data_zoom(&self, dashboard: &str, event: &DataZoomEvent) -> Result<ZoomWindow> {
        let mut dashboards = self.dashboards.write().await;
        let scope = scope_mut(&mut dashboards, dashboard)?;
        let window = scope.zoom.handle().apply_event(event)?;
        scope.redraw(dashboard);
        Ok(window)
    }

    /// Same as [`Self::data_zoom`], for a drag of the header slider.
    pub async fn slider_zoom(&self, dashboard: &str, event: &DataZoomEvent) -> Result<ZoomWindow> {
        let mut dashboards = self.dashboards.write().await;
        let scope = scope_mut(&mut dashboards, dashboard)?;
        let slider = ZoomSlider::new(
            scope.zoom.handle(),
            self.chart_service.settings().slider_header_height,
        );
        let window = slider.on_zoom(event)?;
        scope.redraw(dashboard);
        Ok(window)
    }

    pub async fn reset_zoom(&self, dashboard: &str) -> Result<ZoomWindow> {
        let mut dashboards = self.dashboards.write().await;
        let scope = scope_mut(&mut dashboards, dashboard)?;
        let window = scope.zoom.reset();
        scope.redraw(dashboard);
        Ok(window)
    }

    pub async fn subscribe_zoom(&self, dashboard: &str) -> Result<watch::Receiver<ZoomWindow>> {
        let dashboards = self.dashboards.read().await;
        Ok(scope_ref(&dashboards, dashboard)?.zoom.subscribe())
    }

    /// Zoom slider for a dashboard whose header container measured `width` pixels.
    pub async fn zoom_slider(&self, dashboard: &str, width: f64) -> Result<Option<SliderConfig>> {
        let dashboards = self.dashboards.read().await;
        let scope = scope_ref(&dashboards, dashboard)?;
        let mut slider = ZoomSlider::new(
            scope.zoom.handle(),
            self.chart_service.settings().slider_header_height,
        );
        slider.container_measured(width);
        slider.config()
    }

    /// Discard a dashboard scope, unmounting its charts.
    pub async fn discard(&self, dashboard: &str) -> Result<()> {
        let scope = self
            .dashboards
            .write()
            .await
            .remove(dashboard)
            .ok_or_else(|| ChartError::UnknownDashboard(dashboard.to_string()))?;
        tracing::info!("Discarding dashboard {} with {} charts", dashboard, scope.charts.len());
        Ok(())
    }
}

fn unknown_chart(dashboard: &str, chart: &str) -> ChartError {
    ChartError::UnknownChart {
        dashboard: dashboard.to_string(),
        chart: chart.to_string(),
    }
}

fn scope_ref<'a>(dashboards: &'a HashMap<String, DashboardScope>, dashboard: &str) -> Result<&'a DashboardScope> {
    dashboards
        .get(dashboard)
        .ok_or_else(|| ChartError::UnknownDashboard(dashboard.to_string()))
}

fn scope_mut<'a>(
    dashboards: &'a mut HashMap<String, DashboardScope>,
    dashboard: &str,
) -> Result<&'a mut DashboardScope> {
    dashboards
        .get_mut(dashboard)
        .ok_or_else(|| ChartError::UnknownDashboard(dashboard.to_string()))
}

fn chart_mut<'a>(
    dashboards: &'a mut HashMap<String, DashboardScope>,
    dashboard: &str,
    chart: &str,
) -> Result<&'a mut ChartInstance> {
    scope_mut(dashboards, dashboard)?
        .charts
        .get_mut(chart)
        .ok_or_else(|| unknown_chart(dashboard, chart))
}
