// Main entry point - Dependency injection, polling and server setup
mod application;
mod domain;
mod infrastructure;
mod presentation;

use std::{net::SocketAddr, sync::Arc};
use axum::{
    Router,
    routing::{get, post},
};
use tower_http::trace::TraceLayer;
use tracing_subscriber::EnvFilter;

use crate::application::dashboard_service::DashboardService;
use crate::infrastructure::api_repository::ApiRepository;
use crate::infrastructure::config::load_app_config;
use crate::infrastructure::http_transport::HttpTransport;
use crate::presentation::app_state::AppState;
use crate::presentation::handlers::{
    get_chart, get_config, health_check, list_metrics, list_notifications, list_torrents, refresh,
    update_config,
};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    // Load configuration
    let app_config = load_app_config()?;
    let initial_query = app_config.query.clone().normalized()?;
    let poll_interval = app_config.polling.interval()?;

    // Create repository (infrastructure layer)
    let transport = HttpTransport::new(&app_config.api.base_url, app_config.api.timeout())?;
    let repository = Arc::new(ApiRepository::new(transport));

    // Create services (application layer)
    let dashboard_service = DashboardService::new(
        repository,
        initial_query,
        app_config.polling.batch_policy,
    );
    let mut scheduler = dashboard_service.scheduler(poll_interval);

    let state = Arc::new(AppState { dashboard_service });

    // Build router (presentation layer)
    let router = Router::new()
        .route("/healthz", get(health_check))
        .route("/chart", get(get_chart))
        .route("/config", get(get_config).patch(update_config))
        .route("/torrents", get(list_torrents))
        .route("/metrics", get(list_metrics))
        .route("/notifications", get(list_notifications))
        .route("/refresh", post(refresh))
        .layer(TraceLayer::new_for_http())
        .with_state(state);

    scheduler.start();

    let addr: SocketAddr = app_config.server.bind.parse()?;
    tracing::info!(
        "Starting torrent-metrics-dashboard on {}, polling {}",
        addr,
        app_config.api.base_url
    );

    axum::serve(tokio::net::TcpListener::bind(addr).await?, router)
        .with_graceful_shutdown(async {
            let _ = tokio::signal::ctrl_c().await;
        })
        .await?;

    scheduler.stop().await;
    tracing::info!("Shutdown complete, scheduler {:?}", scheduler.state());
    Ok(())
}
