// In-memory repository used by the controller tests
use crate::application::metrics_repository::MetricsRepository;
use crate::domain::chart::TimePoint;
use crate::domain::errors::TransportError;
use crate::domain::query::SeriesQuery;
use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::Mutex;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

#[derive(Default)]
pub struct FakeRepository {
    series: Mutex<HashMap<String, Result<Vec<TimePoint>, TransportError>>>,
    delays: Mutex<HashMap<String, Duration>>,
    items: Mutex<Option<Result<Vec<String>, TransportError>>>,
    queries: Mutex<Vec<SeriesQuery>>,
    catalog_calls: AtomicUsize,
}

impl FakeRepository {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_series(self, key: &str, points: Vec<TimePoint>) -> Self {
        self.set_series(key, Ok(points));
        self
    }

    pub fn with_failure(self, key: &str, message: &str) -> Self {
        self.set_series(
            key,
            Err(TransportError::Status {
                status: 500,
                message: message.to_string(),
            }),
        );
        self
    }

    pub fn with_delay(self, key: &str, delay: Duration) -> Self {
        self.delays.lock().unwrap().insert(key.to_string(), delay);
        self
    }

    pub fn with_items(self, items: &[&str]) -> Self {
        self.set_items(Ok(items.iter().map(|i| i.to_string()).collect()));
        self
    }

    pub fn set_series(&self, key: &str, response: Result<Vec<TimePoint>, TransportError>) {
        self.series.lock().unwrap().insert(key.to_string(), response);
    }

    pub fn set_items(&self, response: Result<Vec<String>, TransportError>) {
        *self.items.lock().unwrap() = Some(response);
    }

    pub fn queries(&self) -> Vec<SeriesQuery> {
        self.queries.lock().unwrap().clone()
    }

    pub fn query_count(&self) -> usize {
        self.queries.lock().unwrap().len()
    }

    pub fn catalog_calls(&self) -> usize {
        self.catalog_calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl MetricsRepository for FakeRepository {
    async fn fetch_series(&self, query: &SeriesQuery) -> Result<Vec<TimePoint>, TransportError> {
        self.queries.lock().unwrap().push(query.clone());

        let delay = self.delays.lock().unwrap().get(query.key.as_str()).copied();
        if let Some(delay) = delay {
            tokio::time::sleep(delay).await;
        }

        self.series
            .lock()
            .unwrap()
            .get(query.key.as_str())
            .cloned()
            .unwrap_or_else(|| Ok(Vec::new()))
    }

    async fn list_items(&self) -> Result<Vec<String>, TransportError> {
        self.catalog_calls.fetch_add(1, Ordering::SeqCst);
        self.items
            .lock()
            .unwrap()
            .clone()
            .unwrap_or_else(|| Ok(Vec::new()))
    }
}
