// Error taxonomy shared by the polling controller
use crate::domain::query::SeriesKey;
use thiserror::Error;

/// Failure talking to the tracker API. Always recoverable.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum TransportError {
    #[error("Network error: {0}")]
    Network(String),

    #[error("Request failed with status {status}: {message}")]
    Status { status: u16, message: String },

    #[error("Failed to decode response: {0}")]
    Decode(String),
}

/// Rejected operator input. Never reaches the series fetcher.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ConfigurationError {
    #[error("{field} must be a positive integer")]
    NonPositive { field: &'static str },
}

#[derive(Error, Debug, Clone, PartialEq)]
pub enum FetchError {
    /// At least one query of a fan-out failed; the whole batch is discarded.
    #[error("{failed} of {total} series queries failed, first failure on {key}: {source}")]
    PartialBatchFailure {
        key: SeriesKey,
        failed: usize,
        total: usize,
        #[source]
        source: TransportError,
    },
}
