use serde::Deserialize;
use service_core::config as core_config;
use service_core::error::AppError;
use std::env;
use std::str::FromStr;
use std::time::Duration;

#[derive(Debug, Clone, Deserialize)]
pub struct DataConfig {
    #[serde(flatten)]
    pub common: core_config::Config,
    pub service_name: String,
    pub log_level: String,
    pub otlp_endpoint: Option<String>,
    pub mongodb: MongoConfig,
    /// Drop the database and seed one random record before serving.
    pub reset_on_startup: bool,
}

/// Connection settings for the record store.
#[derive(Debug, Clone, Deserialize)]
pub struct MongoConfig {
    /// Bare host used by the fallback dial.
    pub host: String,
    /// Seed list for the primary dial, `host:port[,host:port...]`.
    pub addrs: String,
    pub database: String,
    pub collection: String,
    pub dial_timeout: Duration,
    // Carried for parity with deployed configuration; nothing expires records.
    pub event_ttl_after_end: Duration,
    pub std_event_ttl: Duration,
}

impl Default for MongoConfig {
    fn default() -> Self {
        Self {
            host: "localhost".to_string(),
            addrs: "localhost:27017".to_string(),
            database: "context".to_string(),
            collection: "Data".to_string(),
            dial_timeout: Duration::from_secs(60),
            event_ttl_after_end: Duration::from_secs(1),
            std_event_ttl: Duration::from_secs(20 * 60),
        }
    }
}

impl MongoConfig {
    pub fn addr_list(&self) -> Vec<String> {
        self.addrs
            .split(',')
            .map(str::trim)
            .filter(|addr| !addr.is_empty())
            .map(str::to_string)
            .collect()
    }
}

impl DataConfig {
    pub fn load() -> Result<Self, AppError> {
        // Load common config (handles .env and APP__ prefix)
        let common_config = core_config::Config::load()?;
        let defaults = MongoConfig::default();

        Ok(DataConfig {
            common: common_config,
            service_name: get_env("SERVICE_NAME", "data-service"),
            log_level: get_env("LOG_LEVEL", "info"),
            otlp_endpoint: env::var("OTLP_ENDPOINT").ok().filter(|v| !v.is_empty()),
            mongodb: MongoConfig {
                host: get_env("MONGODB_HOST", &defaults.host),
                addrs: get_env("MONGODB_ADDRS", &defaults.addrs),
                database: get_env("MONGODB_DATABASE", &defaults.database),
                collection: get_env("MONGODB_COLLECTION", &defaults.collection),
                dial_timeout: Duration::from_secs(parse_env(
                    "MONGODB_DIAL_TIMEOUT_SECS",
                    defaults.dial_timeout.as_secs(),
                )?),
                event_ttl_after_end: defaults.event_ttl_after_end,
                std_event_ttl: defaults.std_event_ttl,
            },
            reset_on_startup: parse_env("RESET_ON_STARTUP", false)?,
        })
    }
}

fn get_env(key: &str, default: &str) -> String {
    env::var(key).unwrap_or_else(|_| default.to_string())
}

fn parse_env<T>(key: &str, default: T) -> Result<T, AppError>
where
    T: FromStr,
    T::Err: std::fmt::Display,
{
    match env::var(key) {
        Ok(raw) => parse_value(key, &raw),
        Err(_) => Ok(default),
    }
}

fn parse_value<T>(key: &str, raw: &str) -> Result<T, AppError>
where
    T: FromStr,
    T::Err: std::fmt::Display,
{
    raw.trim().parse().map_err(|e: T::Err| {
        AppError::ConfigError(anyhow::anyhow!("{} has invalid value '{}': {}", key, raw, e))
    })
}
