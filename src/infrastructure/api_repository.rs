// Tracker API repository implementation
use crate::application::metrics_repository::MetricsRepository;
use crate::domain::chart::TimePoint;
use crate::domain::errors::TransportError;
use crate::domain::query::SeriesQuery;
use crate::infrastructure::http_transport::HttpTransport;
use async_trait::async_trait;
use serde::Deserialize;

const METRICS_PATH: &str = "metrics";
const TORRENTS_PATH: &str = "torrents";

/// Every tracker payload is wrapped as `{"data": ...}`
#[derive(Debug, Deserialize)]
struct DataEnvelope<T> {
    data: T,
}

#[derive(Debug, Clone)]
pub struct ApiRepository {
    transport: HttpTransport,
}

impl ApiRepository {
    pub fn new(transport: HttpTransport) -> Self {
        Self { transport }
    }

    fn metrics_params(query: &SeriesQuery) -> Vec<(&'static str, String)> {
        vec![
            ("timeFrameInterval", query.lookback_unit.as_str().to_string()),
            ("timeFrameCount", query.lookback_amount.to_string()),
            ("groupBy", query.bucket_unit.as_str().to_string()),
            ("groupByCount", query.bucket_amount.to_string()),
            ("key", query.key.to_string()),
        ]
    }
}

#[async_trait]
impl MetricsRepository for ApiRepository {
    async fn fetch_series(&self, query: &SeriesQuery) -> Result<Vec<TimePoint>, TransportError> {
        let params = Self::metrics_params(query);
        let envelope: DataEnvelope<Vec<TimePoint>> =
            self.transport.get(METRICS_PATH, Some(params.as_slice())).await?;

        tracing::debug!("Series {} returned {} points", query.key, envelope.data.len());
        Ok(envelope.data)
    }

    async fn list_items(&self) -> Result<Vec<String>, TransportError> {
        let envelope: DataEnvelope<Vec<String>> = self.transport.get(TORRENTS_PATH, None).await?;
        Ok(envelope.data)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::query::{BucketUnit, LookbackUnit, SeriesKey};
    use axum::extract::Query;
    use axum::http::StatusCode;
    use axum::routing::get;
    use axum::{Json, Router};
    use serde_json::{Value, json};
    use std::collections::HashMap;
    use std::time::Duration;

    fn query(key: SeriesKey) -> SeriesQuery {
        SeriesQuery {
            key,
            lookback_amount: 1,
            lookback_unit: LookbackUnit::Hours,
            bucket_amount: 1,
            bucket_unit: BucketUnit::Minutes,
        }
    }

    async fn metrics(Query(params): Query<HashMap<String, String>>) -> (StatusCode, Json<Value>) {
        let window_ok = params.get("timeFrameInterval").map(String::as_str) == Some("hours")
            && params.get("timeFrameCount").map(String::as_str) == Some("1")
            && params.get("groupBy").map(String::as_str) == Some("minutes")
            && params.get("groupByCount").map(String::as_str) == Some("1");
        if !window_ok {
            return (StatusCode::BAD_REQUEST, Json(json!({"error": "bad window"})));
        }

        match params.get("key").map(String::as_str) {
            Some("abc.active_peers") => (
                StatusCode::OK,
                Json(json!({"data": [{"moment": "2024-01-01 10:00:00", "value": 3}]})),
            ),
            _ => (StatusCode::NOT_FOUND, Json(json!({"error": "unknown key"}))),
        }
    }

    async fn repository() -> ApiRepository {
        let router = Router::new()
            .route("/metrics", get(metrics))
            .route("/torrents", get(|| async { Json(json!({"data": ["abc", "def"]})) }));
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, router).await.unwrap();
        });

        let transport =
            HttpTransport::new(&format!("http://{}", addr), Duration::from_secs(2)).unwrap();
        ApiRepository::new(transport)
    }

    #[test]
    fn test_metrics_params() {
        let params = ApiRepository::metrics_params(&query(SeriesKey::for_item("abc", "active_peers")));
        assert_eq!(
            params,
            vec![
                ("timeFrameInterval", "hours".to_string()),
                ("timeFrameCount", "1".to_string()),
                ("groupBy", "minutes".to_string()),
                ("groupByCount", "1".to_string()),
                ("key", "abc.active_peers".to_string()),
            ]
        );
    }

    #[tokio::test]
    async fn test_fetch_series_unwraps_data() {
        let repository = repository().await;

        let points = repository
            .fetch_series(&query(SeriesKey::for_item("abc", "active_peers")))
            .await
            .unwrap();

        assert_eq!(points, vec![TimePoint::new("2024-01-01 10:00:00", 3.0)]);
    }

    #[tokio::test]
    async fn test_fetch_series_rejects_with_server_error() {
        let repository = repository().await;

        let err = repository
            .fetch_series(&query(SeriesKey::for_item("zzz", "active_peers")))
            .await
            .unwrap_err();

        assert_eq!(
            err,
            TransportError::Status {
                status: 404,
                message: "unknown key".to_string(),
            }
        );
    }

    #[tokio::test]
    async fn test_list_items() {
        let repository = repository().await;
        assert_eq!(repository.list_items().await.unwrap(), vec!["abc", "def"]);
    }
}
