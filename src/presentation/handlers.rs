// HTTP request handlers
use crate::application::chart_service::ChartSpec;
use crate::domain::legend::LegendSelectChanged;
use crate::domain::tooltip::AxisHoverEvent;
use crate::domain::zoom::DataZoomEvent;
use crate::error::ChartError;
use crate::infrastructure::chunked_json::stream_from_watch;
use crate::infrastructure::http_response::{accepts_brotli, json_response};
use crate::presentation::app_state::AppState;
use axum::{
    extract::{Path, Query, State},
    http::{HeaderMap, StatusCode},
    response::{IntoResponse, Response},
    Json,
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;

#[derive(Deserialize)]
pub struct SliderQuery {
    pub width: Option<f64>,
}

#[derive(Serialize)]
struct ErrorBody {
    error: String,
}

fn error_status(error: &ChartError) -> StatusCode {
    match error {
        ChartError::UnknownDashboard(_) | ChartError::UnknownChart { .. } => StatusCode::NOT_FOUND,
        ChartError::ZoomScopeInactive => StatusCode::CONFLICT,
        _ => StatusCode::UNPROCESSABLE_ENTITY,
    }
}

/// Encode a service result: the value on success, `{error}` with a matching status otherwise
async fn respond<T: Serialize>(result: Result<T, ChartError>, compress: bool) -> Response {
    let response = match result {
        Ok(value) => json_response(StatusCode::OK, &value, compress).await,
        Err(e) => {
            tracing::warn!("Request failed: {}", e);
            json_response(error_status(&e), &ErrorBody { error: e.to_string() }, compress).await
        }
    };
    match response {
        Ok(response) => response,
        Err(status) => status.into_response(),
    }
}

/// Like [`respond`], with `204 No Content` when there is nothing to send yet
async fn respond_optional<T: Serialize>(result: Result<Option<T>, ChartError>, compress: bool) -> Response {
    match result {
        Ok(None) => StatusCode::NO_CONTENT.into_response(),
        Ok(Some(value)) => respond(Ok(value), compress).await,
        Err(e) => respond::<T>(Err(e), compress).await,
    }
}

async fn respond_empty(result: Result<(), ChartError>, compress: bool) -> Response {
    match result {
        Ok(()) => StatusCode::NO_CONTENT.into_response(),
        Err(e) => respond::<()>(Err(e), compress).await,
    }
}

/// Health check endpoint
pub async fn health_check() -> &'static str {
    "ok"
}

/// Mount (or re-mount) a chart and return its configuration
pub async fn mount_chart(
    Path((dashboard, chart)): Path<(String, String)>,
    headers: HeaderMap,
    State(state): State<Arc<AppState>>,
    Json(spec): Json<ChartSpec>,
) -> Response {
    let result = state.dashboard_service.mount_chart(&dashboard, &chart, spec).await;
    respond(result, accepts_brotli(&headers)).await
}

/// Re-render a chart against the current zoom window
pub async fn get_chart(
    Path((dashboard, chart)): Path<(String, String)>,
    headers: HeaderMap,
    State(state): State<Arc<AppState>>,
) -> Response {
    let result = state.dashboard_service.render_chart(&dashboard, &chart).await;
    respond(result, accepts_brotli(&headers)).await
}

pub async fn unmount_chart(
    Path((dashboard, chart)): Path<(String, String)>,
    headers: HeaderMap,
    State(state): State<Arc<AppState>>,
) -> Response {
    let result = state.dashboard_service.unmount_chart(&dashboard, &chart).await;
    respond_empty(result, accepts_brotli(&headers)).await
}

pub async fn legend_select_changed(
    Path((dashboard, chart)): Path<(String, String)>,
    headers: HeaderMap,
    State(state): State<Arc<AppState>>,
    Json(event): Json<LegendSelectChanged>,
) -> Response {
    let result = state
        .dashboard_service
        .legend_select_changed(&dashboard, &chart, event)
        .await;
    respond(result, accepts_brotli(&headers)).await
}

/// Fold axis-hover events into the chart's tooltip payload
pub async fn axis_hover(
    Path((dashboard, chart)): Path<(String, String)>,
    headers: HeaderMap,
    State(state): State<Arc<AppState>>,
    Json(events): Json<Vec<AxisHoverEvent>>,
) -> Response {
    let result = state.dashboard_service.axis_hover(&dashboard, &chart, &events).await;
    respond_optional(result, accepts_brotli(&headers)).await
}

pub async fn data_zoom(
    Path(dashboard): Path<String>,
    headers: HeaderMap,
    State(state): State<Arc<AppState>>,
    Json(event): Json<DataZoomEvent>,
) -> Response {
    let result = state.dashboard_service.data_zoom(&dashboard, &event).await;
    respond(result, accepts_brotli(&headers)).await
}

pub async fn reset_zoom(
    Path(dashboard): Path<String>,
    headers: HeaderMap,
    State(state): State<Arc<AppState>>,
) -> Response {
    let result = state.dashboard_service.reset_zoom(&dashboard).await;
    respond(result, accepts_brotli(&headers)).await
}

/// Stream the dashboard's zoom window as it changes (progressive updates)
pub async fn stream_zoom(
    Path(dashboard): Path<String>,
    headers: HeaderMap,
    State(state): State<Arc<AppState>>,
) -> Response {
    let compress = accepts_brotli(&headers);
    match state.dashboard_service.subscribe_zoom(&dashboard).await {
        Ok(rx) => stream_from_watch(rx, compress).into_response(),
        Err(e) => respond::<()>(Err(e), compress).await,
    }
}

/// Zoom slider option once the client reports its container width
pub async fn zoom_slider(
    Path(dashboard): Path<String>,
    Query(query): Query<SliderQuery>,
    headers: HeaderMap,
    State(state): State<Arc<AppState>>,
) -> Response {
    let width = query.width.unwrap_or_default();
    let result = state.dashboard_service.zoom_slider(&dashboard, width).await;
    respond_optional(result, accepts_brotli(&headers)).await
}

/// Drag of the header slider; every chart on the dashboard redraws
pub async fn slider_zoom(
    Path(dashboard): Path<String>,
    headers: HeaderMap,
    State(state): State<Arc<AppState>>,
    Json(event): Json<DataZoomEvent>,
) -> Response {
    let result = state.dashboard_service.slider_zoom(&dashboard, &event).await;
    respond(result, accepts_brotli(&headers)).await
}

pub async fn discard_dashboard(
    Path(dashboard): Path<String>,
    headers: HeaderMap,
    State(state): State<Arc<AppState>>,
) -> Response {
    let result = state.dashboard_service.discard(&dashboard).await;
    respond_empty(result, accepts_brotli(&headers)).await
}
