// Tracked torrent catalog domain model
use chrono::{DateTime, Utc};
use serde::Serialize;

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize)]
pub struct ItemCatalog {
    pub items: Vec<String>,
    pub refreshed_at: Option<DateTime<Utc>>,
}

impl ItemCatalog {
    pub fn new(items: Vec<String>) -> Self {
        let mut unique: Vec<String> = Vec::with_capacity(items.len());
        for item in items {
            if !unique.contains(&item) {
                unique.push(item);
            }
        }

        Self {
            items: unique,
            refreshed_at: Some(Utc::now()),
        }
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_keeps_first_occurrence_order() {
        let catalog = ItemCatalog::new(vec![
            "def".to_string(),
            "abc".to_string(),
            "def".to_string(),
        ]);

        assert_eq!(catalog.items, vec!["def", "abc"]);
        assert_eq!(catalog.len(), 2);
        assert!(catalog.refreshed_at.is_some());
    }

    #[test]
    fn test_default_is_empty_and_never_refreshed() {
        let catalog = ItemCatalog::default();
        assert!(catalog.is_empty());
        assert!(catalog.refreshed_at.is_none());
    }
}
