// Poll scheduler - Drives catalog and series polling on a fixed cadence
use crate::application::catalog_poller::CatalogPoller;
use crate::application::series_fetcher::SeriesFetcher;
use crate::domain::query::QueryConfig;
use std::time::Duration;
use tokio::sync::{oneshot, watch};
use tokio::task::JoinHandle;
use tokio::time::MissedTickBehavior;

pub const DEFAULT_POLL_INTERVAL: Duration = Duration::from_secs(5);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SchedulerState {
    Idle,
    Running,
    Stopped,
}

pub struct PollScheduler {
    catalog_poller: CatalogPoller,
    series_fetcher: SeriesFetcher,
    config_rx: watch::Receiver<QueryConfig>,
    period: Duration,
    state: SchedulerState,
    shutdown: Option<oneshot::Sender<()>>,
    handle: Option<JoinHandle<()>>,
}

impl PollScheduler {
    pub fn new(
        catalog_poller: CatalogPoller,
        series_fetcher: SeriesFetcher,
        config_rx: watch::Receiver<QueryConfig>,
        period: Duration,
    ) -> Self {
        Self {
            catalog_poller,
            series_fetcher,
            config_rx,
            period,
            state: SchedulerState::Idle,
            shutdown: None,
            handle: None,
        }
    }

    pub fn state(&self) -> SchedulerState {
        self.state
    }

    /// Arm the timer. The first poll fires immediately. Only valid from Idle
    /// with a non-zero period.
    pub fn start(&mut self) -> bool {
        if self.state != SchedulerState::Idle {
            tracing::debug!("Ignoring start, scheduler is {:?}", self.state);
            return false;
        }
        if self.period.is_zero() {
            tracing::error!("Refusing to start poll scheduler with a zero interval");
            return false;
        }

        let (shutdown_tx, shutdown_rx) = oneshot::channel();
        let handle = tokio::spawn(run_loop(
            self.catalog_poller.clone(),
            self.series_fetcher.clone(),
            self.config_rx.clone(),
            shutdown_rx,
            self.period,
        ));

        self.shutdown = Some(shutdown_tx);
        self.handle = Some(handle);
        self.state = SchedulerState::Running;
        tracing::info!("Poll scheduler started, interval {:?}", self.period);
        true
    }

    /// Disarm the timer and wait for the loop to exit. Once this returns no
    /// further cycle will be started; cycles already in flight may still commit.
    pub async fn stop(&mut self) {
        if let Some(shutdown) = self.shutdown.take() {
            let _ = shutdown.send(());
        }
        if let Some(handle) = self.handle.take() {
            if let Err(e) = handle.await {
                tracing::error!("Poll loop terminated abnormally: {}", e);
            }
        }
        if self.state != SchedulerState::Stopped {
            tracing::info!("Poll scheduler stopped");
        }
        self.state = SchedulerState::Stopped;
    }
}

async fn run_loop(
    catalog_poller: CatalogPoller,
    series_fetcher: SeriesFetcher,
    mut config_rx: watch::Receiver<QueryConfig>,
    mut shutdown_rx: oneshot::Receiver<()>,
    period: Duration,
) {
    let mut ticker = tokio::time::interval(period);
    ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
    let mut config_open = true;

    loop {
        tokio::select! {
            biased;

            // A dropped sender counts as a stop request too
            _ = &mut shutdown_rx => break,

            _ = ticker.tick() => {
                let config = config_rx.borrow_and_update().clone();
                spawn_catalog_refresh(&catalog_poller);
                spawn_series_fetch(&series_fetcher, config);
            }

            changed = config_rx.changed(), if config_open => {
                if changed.is_err() {
                    tracing::warn!("Configuration store closed, polling on timer only");
                    config_open = false;
                    continue;
                }
                // Edits made while a fetch was being spawned coalesce into one
                let config = config_rx.borrow_and_update().clone();
                tracing::debug!("Configuration changed, fetching immediately");
                spawn_series_fetch(&series_fetcher, config);
            }
        }
    }
}

fn spawn_catalog_refresh(catalog_poller: &CatalogPoller) {
    let poller = catalog_poller.clone();
    tokio::spawn(async move {
        // Failures are logged and surfaced by the poller itself
        let _ = poller.refresh_catalog().await;
    });
}

fn spawn_series_fetch(series_fetcher: &SeriesFetcher, config: QueryConfig) {
    let fetcher = series_fetcher.clone();
    tokio::spawn(async move {
        // Failures are logged and surfaced by the fetcher itself
        let _ = fetcher.fetch(&config).await;
    });
}
