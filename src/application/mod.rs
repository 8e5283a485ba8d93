// Application layer - Polling controller use cases
pub mod catalog_poller;
pub mod config_store;
pub mod dashboard_service;
pub mod metrics_repository;
pub mod notifier;
pub mod poll_scheduler;
pub mod series_fetcher;
pub mod snapshot_cell;

#[cfg(test)]
pub mod fake_repository;
