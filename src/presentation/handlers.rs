// HTTP request handlers
use crate::application::series_fetcher::FetchOutcome;
use crate::domain::catalog::ItemCatalog;
use crate::domain::chart::ChartView;
use crate::domain::notification::Notification;
use crate::domain::query::{ConfigUpdate, KNOWN_METRICS, QueryConfig};
use crate::presentation::app_state::AppState;
use axum::{
    Json,
    extract::{State, rejection::JsonRejection},
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::Serialize;
use serde_json::json;
use std::sync::Arc;

#[derive(Debug, Serialize)]
pub struct RefreshResponse {
    pub status: &'static str,
    pub generation: Option<u64>,
    pub failed: Vec<String>,
}

impl From<FetchOutcome> for RefreshResponse {
    fn from(outcome: FetchOutcome) -> Self {
        match outcome {
            FetchOutcome::Idle => Self {
                status: "idle",
                generation: None,
                failed: Vec::new(),
            },
            FetchOutcome::Committed {
                generation, failed, ..
            } => Self {
                status: "committed",
                generation: Some(generation),
                failed: failed.into_iter().map(|k| k.to_string()).collect(),
            },
        }
    }
}

/// Same `{"error": ...}` shape the tracker itself uses
fn error_response(status: StatusCode, message: String) -> Response {
    (status, Json(json!({ "error": message }))).into_response()
}

/// Health check endpoint
pub async fn health_check() -> &'static str {
    "ok"
}

pub async fn get_chart(State(state): State<Arc<AppState>>) -> Json<ChartView> {
    Json(state.dashboard_service.chart())
}

pub async fn get_config(State(state): State<Arc<AppState>>) -> Json<QueryConfig> {
    Json(state.dashboard_service.config())
}

/// Malformed bodies (unknown unit, negative amount) are configuration errors too
pub async fn update_config(
    State(state): State<Arc<AppState>>,
    payload: Result<Json<ConfigUpdate>, JsonRejection>,
) -> Response {
    let Json(update) = match payload {
        Ok(update) => update,
        Err(rejection) => {
            tracing::debug!("Rejected configuration body: {}", rejection.body_text());
            return error_response(StatusCode::BAD_REQUEST, rejection.body_text());
        }
    };

    match state.dashboard_service.update_config(update) {
        Ok(config) => Json(config).into_response(),
        Err(e) => error_response(StatusCode::BAD_REQUEST, e.to_string()),
    }
}

pub async fn list_torrents(State(state): State<Arc<AppState>>) -> Json<ItemCatalog> {
    Json(state.dashboard_service.catalog().as_ref().clone())
}

pub async fn list_metrics() -> Json<Vec<&'static str>> {
    Json(KNOWN_METRICS.to_vec())
}

pub async fn list_notifications(State(state): State<Arc<AppState>>) -> Json<Vec<Notification>> {
    Json(state.dashboard_service.notifications())
}

/// Manual reload, the same cycle the scheduler runs
pub async fn refresh(State(state): State<Arc<AppState>>) -> Response {
    match state.dashboard_service.refresh().await {
        Ok(outcome) => Json(RefreshResponse::from(outcome)).into_response(),
        Err(e) => {
            tracing::warn!("Manual refresh failed: {}", e);
            error_response(StatusCode::BAD_GATEWAY, e.to_string())
        }
    }
}
