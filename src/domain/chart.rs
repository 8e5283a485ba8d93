// Chart data domain models
use crate::domain::query::SeriesKey;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A bucketed sample as returned by the metrics endpoint
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TimePoint {
    pub moment: String,
    pub value: f64,
}

impl TimePoint {
    #[cfg(test)]
    pub fn new(moment: impl Into<String>, value: f64) -> Self {
        Self {
            moment: moment.into(),
            value,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ChartPoint {
    pub moment: String,
    pub value: f64,
    pub series: String,
}

/// All points returned for one series key
#[derive(Debug, Clone, PartialEq)]
pub struct SeriesData {
    pub key: SeriesKey,
    pub points: Vec<TimePoint>,
}

impl SeriesData {
    pub fn new(key: SeriesKey, points: Vec<TimePoint>) -> Self {
        Self { key, points }
    }
}

/// The committed, render-ready dataset. Replaced whole on every commit.
#[derive(Debug, Clone, PartialEq, Default, Serialize)]
pub struct ChartDataset {
    pub generation: u64,
    pub committed_at: Option<DateTime<Utc>>,
    pub points: Vec<ChartPoint>,
}

impl ChartDataset {
    /// Build the dataset that supersedes `previous` from a settled batch
    pub fn next(previous: &ChartDataset, series: Vec<SeriesData>) -> Self {
        Self {
            generation: previous.generation + 1,
            committed_at: Some(Utc::now()),
            points: stamp(series),
        }
    }

    /// Distinct series labels in order of first appearance
    pub fn series_labels(&self) -> Vec<String> {
        let mut labels: Vec<String> = Vec::new();
        for point in &self.points {
            if !labels.iter().any(|l| l == &point.series) {
                labels.push(point.series.clone());
            }
        }
        labels
    }
}

/// Label every point with its series key and flatten, keeping key order
fn stamp(series: Vec<SeriesData>) -> Vec<ChartPoint> {
    let total = series.iter().map(|s| s.points.len()).sum();
    let mut points = Vec::with_capacity(total);
    for data in series {
        let label = data.key.to_string();
        points.extend(data.points.into_iter().map(|p| ChartPoint {
            moment: p.moment,
            value: p.value,
            series: label.clone(),
        }));
    }
    points
}

/// Read-only view handed to the renderer
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ChartView {
    pub generation: u64,
    pub committed_at: Option<DateTime<Utc>>,
    pub series: Vec<String>,
    pub points: Vec<ChartPoint>,
}

impl From<&ChartDataset> for ChartView {
    fn from(dataset: &ChartDataset) -> Self {
        Self {
            generation: dataset.generation,
            committed_at: dataset.committed_at,
            series: dataset.series_labels(),
            points: dataset.points.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn chart_point(moment: &str, value: f64, series: &str) -> ChartPoint {
        ChartPoint {
            moment: moment.to_string(),
            value,
            series: series.to_string(),
        }
    }

    #[test]
    fn test_next_stamps_and_concatenates_in_key_order() {
        let series = vec![
            SeriesData::new(
                SeriesKey::for_item("abc", "active_peers"),
                vec![TimePoint::new("t1", 3.0), TimePoint::new("t2", 4.0)],
            ),
            SeriesData::new(
                SeriesKey::for_item("def", "active_peers"),
                vec![TimePoint::new("t1", 5.0)],
            ),
        ];

        let dataset = ChartDataset::next(&ChartDataset::default(), series);

        assert_eq!(dataset.generation, 1);
        assert!(dataset.committed_at.is_some());
        assert_eq!(
            dataset.points,
            vec![
                chart_point("t1", 3.0, "abc.active_peers"),
                chart_point("t2", 4.0, "abc.active_peers"),
                chart_point("t1", 5.0, "def.active_peers"),
            ]
        );
    }

    #[test]
    fn test_series_labels_are_distinct() {
        let dataset = ChartDataset {
            points: vec![
                chart_point("t1", 1.0, "b"),
                chart_point("t1", 2.0, "a"),
                chart_point("t2", 3.0, "b"),
            ],
            ..ChartDataset::default()
        };

        assert_eq!(dataset.series_labels(), vec!["b", "a"]);
    }

    #[test]
    fn test_view_mirrors_dataset() {
        let dataset = ChartDataset {
            generation: 7,
            committed_at: None,
            points: vec![chart_point("t1", 1.0, "torrents")],
        };

        let view = ChartView::from(&dataset);
        assert_eq!(view.generation, 7);
        assert_eq!(view.series, vec!["torrents"]);
        assert_eq!(view.points, dataset.points);
    }

    #[test]
    fn test_empty_series_still_commit() {
        let previous = ChartDataset {
            generation: 2,
            committed_at: None,
            points: vec![chart_point("t1", 1.0, "torrents")],
        };
        let dataset = ChartDataset::next(&previous, vec![SeriesData::new(SeriesKey::catalog(), vec![])]);
        assert_eq!(dataset.generation, 3);
        assert!(dataset.points.is_empty());
    }
}
