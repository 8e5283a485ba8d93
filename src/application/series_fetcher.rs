// Series fetcher - Fans out one query per series key and commits the merge
use crate::application::metrics_repository::MetricsRepository;
use crate::application::notifier::Notifier;
use crate::application::snapshot_cell::SnapshotCell;
use crate::domain::chart::{ChartDataset, SeriesData};
use crate::domain::errors::{FetchError, TransportError};
use crate::domain::query::{QueryConfig, SeriesKey};
use futures::future::join_all;
use serde::Deserialize;
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};

pub const FETCH_FAILED_MESSAGE: &str =
    "There was an error getting data from the server. Make sure you input valid parameters";

/// What to do with a batch in which some queries failed
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BatchPolicy {
    /// Any failure discards the whole batch and keeps the previous dataset
    #[default]
    FailFast,
    /// Commit the series that succeeded and report the ones that did not
    BestEffort,
}

#[derive(Debug, Clone, PartialEq)]
pub enum FetchOutcome {
    /// Nothing selected, no queries issued
    Idle,
    Committed {
        generation: u64,
        series: usize,
        points: usize,
        failed: Vec<SeriesKey>,
    },
}

#[derive(Clone)]
pub struct SeriesFetcher {
    repository: Arc<dyn MetricsRepository>,
    dataset: SnapshotCell<ChartDataset>,
    notifier: Notifier,
    policy: BatchPolicy,
    cycles: Arc<AtomicU64>,
}

impl SeriesFetcher {
    pub fn new(
        repository: Arc<dyn MetricsRepository>,
        notifier: Notifier,
        policy: BatchPolicy,
    ) -> Self {
        Self {
            repository,
            dataset: SnapshotCell::default(),
            notifier,
            policy,
            cycles: Arc::new(AtomicU64::new(0)),
        }
    }

    pub fn dataset(&self) -> Arc<ChartDataset> {
        self.dataset.snapshot()
    }

    /// Run one fetch cycle for `config`.
    ///
    /// All queries are issued concurrently and the merge only runs once every
    /// one of them has settled. The commit replaces the dataset in one step, so
    /// overlapping cycles resolve to whichever settles last.
    pub async fn fetch(&self, config: &QueryConfig) -> Result<FetchOutcome, FetchError> {
        let queries = config.series_queries();
        if queries.is_empty() {
            tracing::debug!("No series selected, skipping fetch");
            return Ok(FetchOutcome::Idle);
        }

        let cycle = self.cycles.fetch_add(1, Ordering::Relaxed) + 1;
        tracing::debug!(cycle, queries = queries.len(), "Starting fetch cycle");

        let settled = join_all(queries.iter().map(|query| async move {
            let result = self.repository.fetch_series(query).await;
            (query.key.clone(), result)
        }))
        .await;

        let total = settled.len();
        let mut series: Vec<SeriesData> = Vec::with_capacity(total);
        let mut failures: Vec<(SeriesKey, TransportError)> = Vec::new();
        for (key, result) in settled {
            match result {
                Ok(points) => series.push(SeriesData::new(key, points)),
                Err(e) => {
                    tracing::debug!(cycle, "Query for {} failed: {}", key, e);
                    failures.push((key, e));
                }
            }
        }

        let discard = match self.policy {
            BatchPolicy::FailFast => !failures.is_empty(),
            BatchPolicy::BestEffort => series.is_empty(),
        };
        if discard && !failures.is_empty() {
            let failed = failures.len();
            let (key, source) = failures.remove(0);
            let error = FetchError::PartialBatchFailure {
                key,
                failed,
                total,
                source,
            };
            tracing::warn!(cycle, "Fetch cycle discarded: {}", error);
            self.notifier.error(FETCH_FAILED_MESSAGE);
            return Err(error);
        }

        let failed: Vec<SeriesKey> = failures.into_iter().map(|(key, _)| key).collect();
        if !failed.is_empty() {
            tracing::warn!(cycle, "Committing partial batch, {} series failed", failed.len());
            self.notifier.warning(format!(
                "Some series could not be loaded: {}",
                failed
                    .iter()
                    .map(|k| k.as_str())
                    .collect::<Vec<_>>()
                    .join(", ")
            ));
        }

        let series_count = series.len();
        let committed = self
            .dataset
            .replace_with(|previous| ChartDataset::next(previous, series));

        tracing::info!(
            cycle,
            generation = committed.generation,
            series = series_count,
            points = committed.points.len(),
            "Chart dataset committed"
        );

        Ok(FetchOutcome::Committed {
            generation: committed.generation,
            series: series_count,
            points: committed.points.len(),
            failed,
        })
    }
}
