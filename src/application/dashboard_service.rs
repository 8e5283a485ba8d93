// Dashboard service - Owns the controller state and exposes it to callers
use crate::application::catalog_poller::CatalogPoller;
use crate::application::config_store::ConfigStore;
use crate::application::metrics_repository::MetricsRepository;
use crate::application::notifier::Notifier;
use crate::application::poll_scheduler::PollScheduler;
use crate::application::series_fetcher::{BatchPolicy, FetchOutcome, SeriesFetcher};
use crate::domain::catalog::ItemCatalog;
use crate::domain::chart::ChartView;
use crate::domain::errors::{ConfigurationError, FetchError};
use crate::domain::notification::Notification;
use crate::domain::query::{ConfigUpdate, QueryConfig};
use std::sync::Arc;
use std::time::Duration;

#[derive(Clone)]
pub struct DashboardService {
    config_store: ConfigStore,
    catalog_poller: CatalogPoller,
    series_fetcher: SeriesFetcher,
    notifier: Notifier,
}

impl DashboardService {
    pub fn new(
        repository: Arc<dyn MetricsRepository>,
        initial: QueryConfig,
        policy: BatchPolicy,
    ) -> Self {
        let notifier = Notifier::new();
        Self {
            config_store: ConfigStore::new(initial),
            catalog_poller: CatalogPoller::new(repository.clone(), notifier.clone()),
            series_fetcher: SeriesFetcher::new(repository, notifier.clone(), policy),
            notifier,
        }
    }

    /// Scheduler wired to this service's state; starts Idle
    pub fn scheduler(&self, period: Duration) -> PollScheduler {
        PollScheduler::new(
            self.catalog_poller.clone(),
            self.series_fetcher.clone(),
            self.config_store.subscribe(),
            period,
        )
    }

    pub fn config(&self) -> QueryConfig {
        self.config_store.current()
    }

    pub fn update_config(&self, update: ConfigUpdate) -> Result<QueryConfig, ConfigurationError> {
        self.config_store.update(update)
    }

    pub fn catalog(&self) -> Arc<ItemCatalog> {
        self.catalog_poller.catalog()
    }

    pub fn chart(&self) -> ChartView {
        ChartView::from(self.series_fetcher.dataset().as_ref())
    }

    pub fn notifications(&self) -> Vec<Notification> {
        self.notifier.visible()
    }

    /// Manual reload with the current configuration, outside the timer
    pub async fn refresh(&self) -> Result<FetchOutcome, FetchError> {
        let config = self.config_store.current();
        self.series_fetcher.fetch(&config).await
    }
}
