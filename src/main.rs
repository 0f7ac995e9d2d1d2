// Main entry point - Dependency injection and server setup
use std::{net::SocketAddr, sync::Arc};

use axum::{
    routing::{delete, get, post, put},
    Router,
};
use tower_http::trace::TraceLayer;
use tracing_subscriber::EnvFilter;

use sensor_timeline::application::chart_service::ChartService;
use sensor_timeline::application::dashboard_service::DashboardService;
use sensor_timeline::infrastructure::config::load_service_config;
use sensor_timeline::infrastructure::retained_surface::RetainedHost;
use sensor_timeline::presentation::app_state::AppState;
use sensor_timeline::presentation::handlers::{
    axis_hover, data_zoom, discard_dashboard, get_chart, health_check, legend_select_changed, mount_chart,
    reset_zoom, slider_zoom, stream_zoom, unmount_chart, zoom_slider,
};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    // Load configuration
    let config = load_service_config()?;

    // Create render host (infrastructure layer)
    let host = Arc::new(RetainedHost::new());

    // Create services (application layer)
    let chart_service = ChartService::new(config.chart.clone());
    let dashboard_service = DashboardService::new(chart_service, host);

    // Create application state
    let state = Arc::new(AppState { dashboard_service });

    // Build router (presentation layer)
    // Note: JSON responses are compressed by our own response builders and the zoom
    // stream compresses per frame, so no CompressionLayer is added here
    let router = Router::new()
        .route("/healthz", get(health_check))
        .route(
            "/dashboards/:dashboard/charts/:chart",
            put(mount_chart).get(get_chart).delete(unmount_chart),
        )
        .route("/dashboards/:dashboard/charts/:chart/legend", post(legend_select_changed))
        .route("/dashboards/:dashboard/charts/:chart/hover", post(axis_hover))
        .route("/dashboards/:dashboard/zoom", post(data_zoom).delete(reset_zoom))
        .route("/dashboards/:dashboard/zoom/stream", get(stream_zoom))
        .route("/dashboards/:dashboard/slider", get(zoom_slider).post(slider_zoom))
        .route("/dashboards/:dashboard", delete(discard_dashboard))
        .layer(TraceLayer::new_for_http())
        .with_state(state);

    // Start server
    let addr: SocketAddr = config.server.bind_address.parse()?;
    tracing::info!("Starting sensor-timeline service on {}", addr);

    axum::serve(tokio::net::TcpListener::bind(addr).await?, router).await?;

    Ok(())
}
