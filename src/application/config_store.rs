// Config store - Holds the operator's query configuration
use crate::domain::errors::ConfigurationError;
use crate::domain::query::{ConfigUpdate, QueryConfig};
use std::sync::Arc;
use tokio::sync::watch;

#[derive(Clone)]
pub struct ConfigStore {
    sender: Arc<watch::Sender<QueryConfig>>,
}

impl ConfigStore {
    pub fn new(initial: QueryConfig) -> Self {
        let (sender, _) = watch::channel(initial);
        Self {
            sender: Arc::new(sender),
        }
    }

    pub fn current(&self) -> QueryConfig {
        self.sender.borrow().clone()
    }

    /// Receiver that wakes on every effective configuration change
    pub fn subscribe(&self) -> watch::Receiver<QueryConfig> {
        self.sender.subscribe()
    }

    /// Apply a partial edit. Subscribers are only notified when the resulting
    /// configuration differs from the current one.
    pub fn update(&self, update: ConfigUpdate) -> Result<QueryConfig, ConfigurationError> {
        let mut outcome = None;
        self.sender.send_if_modified(|config| match config.apply(update) {
            Ok(next) if next != *config => {
                tracing::info!(
                    metric = ?next.selected_metric,
                    items = next.selected_item_keys.len(),
                    "Query configuration changed"
                );
                *config = next.clone();
                outcome = Some(Ok(next));
                true
            }
            Ok(next) => {
                outcome = Some(Ok(next));
                false
            }
            Err(e) => {
                tracing::debug!("Rejected configuration update: {}", e);
                outcome = Some(Err(e));
                false
            }
        });

        outcome.unwrap_or_else(|| Ok(self.current()))
    }
}
