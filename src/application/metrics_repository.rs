// Repository trait for tracker metrics access
use crate::domain::chart::TimePoint;
use crate::domain::errors::TransportError;
use crate::domain::query::SeriesQuery;
use async_trait::async_trait;

#[async_trait]
pub trait MetricsRepository: Send + Sync {
    /// Bucketed time series for a single series key
    async fn fetch_series(&self, query: &SeriesQuery) -> Result<Vec<TimePoint>, TransportError>;

    /// Keys of every torrent the tracker knows about
    async fn list_items(&self) -> Result<Vec<String>, TransportError>;
}
