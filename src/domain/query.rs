// Query configuration domain model
use crate::domain::errors::ConfigurationError;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Pseudo-metric whose series is the tracked torrent count itself
pub const CATALOG_METRIC: &str = "torrents";
pub const ACTIVE_PEERS_METRIC: &str = "active_peers";
pub const COMPLETED_DOWNLOADS_METRIC: &str = "complete_download_peers";

pub const KNOWN_METRICS: [&str; 3] = [
    CATALOG_METRIC,
    ACTIVE_PEERS_METRIC,
    COMPLETED_DOWNLOADS_METRIC,
];

const KEY_DELIMITER: char = '.';

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LookbackUnit {
    Hours,
    Days,
}

impl LookbackUnit {
    pub fn as_str(&self) -> &'static str {
        match self {
            LookbackUnit::Hours => "hours",
            LookbackUnit::Days => "days",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BucketUnit {
    Hours,
    Minutes,
}

impl BucketUnit {
    pub fn as_str(&self) -> &'static str {
        match self {
            BucketUnit::Hours => "hours",
            BucketUnit::Minutes => "minutes",
        }
    }
}

/// Identifies one outbound query and labels the chart series it produces.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SeriesKey(String);

impl SeriesKey {
    pub fn catalog() -> Self {
        Self(CATALOG_METRIC.to_string())
    }

    pub fn for_item(item_key: &str, metric: &str) -> Self {
        Self(format!("{}{}{}", item_key, KEY_DELIMITER, metric))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for SeriesKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// One request against the metrics endpoint
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SeriesQuery {
    pub key: SeriesKey,
    pub lookback_amount: u32,
    pub lookback_unit: LookbackUnit,
    pub bucket_amount: u32,
    pub bucket_unit: BucketUnit,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct QueryConfig {
    pub lookback_amount: u32,
    pub lookback_unit: LookbackUnit,
    pub bucket_amount: u32,
    pub bucket_unit: BucketUnit,
    pub selected_metric: Option<String>,
    pub selected_item_keys: Vec<String>,
}

impl Default for QueryConfig {
    fn default() -> Self {
        Self {
            lookback_amount: 1,
            lookback_unit: LookbackUnit::Hours,
            bucket_amount: 1,
            bucket_unit: BucketUnit::Minutes,
            selected_metric: None,
            selected_item_keys: Vec::new(),
        }
    }
}

/// Partial edit of a [`QueryConfig`]. Absent fields keep their value; a blank
/// metric clears the selection.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct ConfigUpdate {
    pub lookback_amount: Option<u32>,
    pub lookback_unit: Option<LookbackUnit>,
    pub bucket_amount: Option<u32>,
    pub bucket_unit: Option<BucketUnit>,
    pub selected_metric: Option<String>,
    pub selected_item_keys: Option<Vec<String>>,
}

impl QueryConfig {
    pub fn is_catalog(&self) -> bool {
        self.selected_metric.as_deref() == Some(CATALOG_METRIC)
    }

    /// Item keys only mean something for a real, per-torrent metric
    fn accepts_item_selection(&self) -> bool {
        self.selected_metric.is_some() && !self.is_catalog()
    }

    /// Produce the edited configuration without touching `self`
    pub fn apply(&self, update: ConfigUpdate) -> Result<Self, ConfigurationError> {
        let mut next = self.clone();

        if let Some(amount) = update.lookback_amount {
            next.lookback_amount = amount;
        }
        if let Some(unit) = update.lookback_unit {
            next.lookback_unit = unit;
        }
        if let Some(amount) = update.bucket_amount {
            next.bucket_amount = amount;
        }
        if let Some(unit) = update.bucket_unit {
            next.bucket_unit = unit;
        }
        if let Some(metric) = update.selected_metric {
            let metric = metric.trim();
            next.selected_metric = (!metric.is_empty()).then(|| metric.to_string());
        }
        if let Some(items) = update.selected_item_keys {
            next.selected_item_keys = items;
        }

        next.normalized()
    }

    /// Check amounts and restore the item selection invariant
    pub fn normalized(mut self) -> Result<Self, ConfigurationError> {
        if self.lookback_amount == 0 {
            return Err(ConfigurationError::NonPositive {
                field: "lookback_amount",
            });
        }
        if self.bucket_amount == 0 {
            return Err(ConfigurationError::NonPositive {
                field: "bucket_amount",
            });
        }

        if self.accepts_item_selection() {
            let mut unique: Vec<String> = Vec::with_capacity(self.selected_item_keys.len());
            for item in self.selected_item_keys.drain(..) {
                let item = item.trim().to_string();
                if !item.is_empty() && !unique.contains(&item) {
                    unique.push(item);
                }
            }
            self.selected_item_keys = unique;
        } else {
            self.selected_item_keys.clear();
        }

        Ok(self)
    }

    /// Derived key set, in selection order with duplicates collapsed
    pub fn series_keys(&self) -> Vec<SeriesKey> {
        let Some(metric) = self.selected_metric.as_deref() else {
            return Vec::new();
        };

        if metric == CATALOG_METRIC {
            return vec![SeriesKey::catalog()];
        }

        let mut keys: Vec<SeriesKey> = Vec::with_capacity(self.selected_item_keys.len());
        for item in &self.selected_item_keys {
            let key = SeriesKey::for_item(item, metric);
            if !keys.contains(&key) {
                keys.push(key);
            }
        }
        keys
    }

    pub fn series_queries(&self) -> Vec<SeriesQuery> {
        self.series_keys()
            .into_iter()
            .map(|key| SeriesQuery {
                key,
                lookback_amount: self.lookback_amount,
                lookback_unit: self.lookback_unit,
                bucket_amount: self.bucket_amount,
                bucket_unit: self.bucket_unit,
            })
            .collect()
    }
}
