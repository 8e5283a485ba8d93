// HTTP transport for the tracker API
use crate::domain::errors::TransportError;
use anyhow::Context;
use serde::Serialize;
use serde::de::DeserializeOwned;
use std::time::Duration;

pub type QueryParams = [(&'static str, String)];

#[derive(Debug, Clone)]
pub struct HttpTransport {
    client: reqwest::Client,
    base_url: String,
}

impl HttpTransport {
    pub fn new(base_url: &str, timeout: Duration) -> anyhow::Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .context("Failed to build HTTP client")?;

        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
        })
    }

    fn build_url(&self, path: &str, params: Option<&QueryParams>) -> String {
        let path = path.trim_start_matches('/');
        match params {
            Some(params) if !params.is_empty() => {
                format!("{}/{}?{}", self.base_url, path, query_string(params))
            }
            _ => format!("{}/{}", self.base_url, path),
        }
    }

    pub async fn get<T: DeserializeOwned>(
        &self,
        path: &str,
        params: Option<&QueryParams>,
    ) -> Result<T, TransportError> {
        let url = self.build_url(path, params);
        tracing::debug!("GET {}", url);

        let response = self
            .client
            .get(&url)
            .header("Accept", "application/json")
            .send()
            .await
            .map_err(network_error)?;

        Self::parse_response(response).await
    }

    #[allow(dead_code)]
    pub async fn post<B, T>(&self, path: &str, body: &B) -> Result<T, TransportError>
    where
        B: Serialize + ?Sized,
        T: DeserializeOwned,
    {
        let url = self.build_url(path, None);
        tracing::debug!("POST {}", url);

        let response = self
            .client
            .post(&url)
            .header("Accept", "application/json")
            .json(body)
            .send()
            .await
            .map_err(network_error)?;

        Self::parse_response(response).await
    }

    async fn parse_response<T: DeserializeOwned>(
        response: reqwest::Response,
    ) -> Result<T, TransportError> {
        let status = response.status();
        let body = response.bytes().await.map_err(network_error)?;

        if !status.is_success() {
            let message = error_message(&body)
                .unwrap_or_else(|| format!("request failed with status {}", status));
            return Err(TransportError::Status {
                status: status.as_u16(),
                message,
            });
        }

        serde_json::from_slice(&body).map_err(|e| TransportError::Decode(e.to_string()))
    }
}

/// `key=value` pairs joined by `&`, values percent-encoded
pub fn query_string(params: &QueryParams) -> String {
    params
        .iter()
        .map(|(key, value)| format!("{}={}", key, urlencoding::encode(value)))
        .collect::<Vec<_>>()
        .join("&")
}

/// The tracker reports failures as `{"error": ...}`
fn error_message(body: &[u8]) -> Option<String> {
    let json: serde_json::Value = serde_json::from_slice(body).ok()?;
    match json.get("error")? {
        serde_json::Value::String(message) => Some(message.clone()),
        serde_json::Value::Null => None,
        other => Some(other.to_string()),
    }
}

fn network_error(error: reqwest::Error) -> TransportError {
    TransportError::Network(error.to_string())
}
