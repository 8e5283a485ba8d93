// Catalog poller - Keeps the list of tracked torrents fresh
use crate::application::metrics_repository::MetricsRepository;
use crate::application::notifier::Notifier;
use crate::application::snapshot_cell::SnapshotCell;
use crate::domain::catalog::ItemCatalog;
use crate::domain::errors::TransportError;
use std::sync::Arc;

#[derive(Clone)]
pub struct CatalogPoller {
    repository: Arc<dyn MetricsRepository>,
    catalog: SnapshotCell<ItemCatalog>,
    notifier: Notifier,
}

impl CatalogPoller {
    pub fn new(repository: Arc<dyn MetricsRepository>, notifier: Notifier) -> Self {
        Self {
            repository,
            catalog: SnapshotCell::default(),
            notifier,
        }
    }

    pub fn catalog(&self) -> Arc<ItemCatalog> {
        self.catalog.snapshot()
    }

    /// Replace the catalog wholesale. A failed poll keeps the previous list.
    pub async fn refresh_catalog(&self) -> Result<ItemCatalog, TransportError> {
        match self.repository.list_items().await {
            Ok(items) => {
                let catalog = ItemCatalog::new(items);
                if catalog.is_empty() {
                    tracing::debug!("Tracker reports no torrents");
                } else {
                    tracing::debug!("Torrent catalog refreshed: {} items", catalog.len());
                }
                self.catalog.replace(catalog.clone());
                Ok(catalog)
            }
            Err(e) => {
                tracing::warn!("Failed to refresh torrent catalog: {}", e);
                self.notifier
                    .warning(format!("Could not refresh the torrent list: {}", e));
                Err(e)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::fake_repository::FakeRepository;

    #[tokio::test]
    async fn test_refresh_replaces_catalog() {
        let repository = Arc::new(FakeRepository::new().with_items(&["abc", "def"]));
        let poller = CatalogPoller::new(repository.clone(), Notifier::new());

        let catalog = poller.refresh_catalog().await.unwrap();

        assert_eq!(catalog.items, vec!["abc", "def"]);
        assert_eq!(poller.catalog().items, vec!["abc", "def"]);

        repository.set_items(Ok(vec!["xyz".to_string()]));
        poller.refresh_catalog().await.unwrap();
        assert_eq!(poller.catalog().items, vec!["xyz"]);
    }

    #[tokio::test]
    async fn test_failed_refresh_keeps_previous_catalog() {
        let repository = Arc::new(FakeRepository::new().with_items(&["abc"]));
        let notifier = Notifier::new();
        let poller = CatalogPoller::new(repository.clone(), notifier.clone());
        poller.refresh_catalog().await.unwrap();
        let before = poller.catalog();

        repository.set_items(Err(TransportError::Network("connection refused".to_string())));
        let result = poller.refresh_catalog().await;

        assert!(result.is_err());
        assert_eq!(poller.catalog(), before);
        assert_eq!(notifier.visible().len(), 1);
    }

    #[tokio::test]
    async fn test_empty_tracker_gives_empty_catalog() {
        let poller = CatalogPoller::new(Arc::new(FakeRepository::new()), Notifier::new());

        let catalog = poller.refresh_catalog().await.unwrap();

        assert!(catalog.is_empty());
        assert!(poller.catalog().refreshed_at.is_some());
    }
}
