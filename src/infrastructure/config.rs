use crate::application::poll_scheduler::DEFAULT_POLL_INTERVAL;
use crate::application::series_fetcher::BatchPolicy;
use crate::domain::errors::ConfigurationError;
use crate::domain::query::QueryConfig;
use config::builder::DefaultState;
use config::{ConfigBuilder, ConfigError};
use serde::Deserialize;
use std::time::Duration;

pub const DEFAULT_BASE_URL: &str = "http://localhost:7878";
const DEFAULT_TIMEOUT_MS: i64 = 5000;
const DEFAULT_BIND: &str = "127.0.0.1:8090";

#[derive(Debug, Deserialize, Clone)]
pub struct AppConfig {
    pub api: ApiSettings,
    pub polling: PollingSettings,
    pub server: ServerSettings,
    #[serde(default)]
    pub query: QueryConfig,
}

#[derive(Debug, Deserialize, Clone)]
pub struct ApiSettings {
    pub base_url: String,
    pub timeout_ms: u64,
}

impl ApiSettings {
    pub fn timeout(&self) -> Duration {
        Duration::from_millis(self.timeout_ms)
    }
}

#[derive(Debug, Deserialize, Clone)]
pub struct PollingSettings {
    pub interval_secs: u64,
    #[serde(default)]
    pub batch_policy: BatchPolicy,
}

impl PollingSettings {
    /// Polling period; zero is rejected
    pub fn interval(&self) -> Result<Duration, ConfigurationError> {
        if self.interval_secs == 0 {
            return Err(ConfigurationError::NonPositive {
                field: "polling.interval_secs",
            });
        }
        Ok(Duration::from_secs(self.interval_secs))
    }
}

#[derive(Debug, Deserialize, Clone)]
pub struct ServerSettings {
    pub bind: String,
}

/// Defaults, then `config/dashboard.*` if present, then `DASHBOARD_*` env vars
/// (e.g. `DASHBOARD_API__BASE_URL`).
pub fn load_app_config() -> anyhow::Result<AppConfig> {
    let settings = with_defaults(config::Config::builder())?
        .add_source(config::File::with_name("config/dashboard").required(false))
        .add_source(
            config::Environment::with_prefix("DASHBOARD")
                .prefix_separator("_")
                .separator("__")
                .try_parsing(true),
        )
        .build()?;

    let app_config: AppConfig = settings.try_deserialize()?;
    app_config.polling.interval()?;
    Ok(app_config)
}

fn with_defaults(
    builder: ConfigBuilder<DefaultState>,
) -> Result<ConfigBuilder<DefaultState>, ConfigError> {
    builder
        .set_default("api.base_url", DEFAULT_BASE_URL)?
        .set_default("api.timeout_ms", DEFAULT_TIMEOUT_MS)?
        .set_default("polling.interval_secs", DEFAULT_POLL_INTERVAL.as_secs() as i64)?
        .set_default("polling.batch_policy", "fail_fast")?
        .set_default("server.bind", DEFAULT_BIND)
}
