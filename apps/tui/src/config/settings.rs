use super::palette::{ChartPalette, DEFAULT_PALETTE};
use dotenv::dotenv;
use std::env;
use std::path::PathBuf;
use std::time::Duration;
use thiserror::Error;
use url::Url;

pub const DEFAULT_ENDPOINT: &str = "http://localhost:5000/predict";
pub const DEFAULT_TIMEOUT_SECS: u64 = 120;
pub const DEFAULT_LOG_DIR: &str = "./logs";

const ENDPOINT_VAR: &str = "PREDICT_ENDPOINT";
const TIMEOUT_VAR: &str = "PREDICT_TIMEOUT_SECS";
const LOG_DIR_VAR: &str = "GENRE_LOG_DIR";
const DEBUG_VAR: &str = "DEBUG";

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Invalid prediction endpoint {value:?}: {source}")]
    InvalidEndpoint {
        value: String,
        source: url::ParseError,
    },

    #[error("Prediction endpoint must use http or https, got {scheme:?}")]
    UnsupportedScheme { scheme: String },

    #[error("Invalid request timeout {value:?}: expected a positive number of seconds")]
    InvalidTimeout { value: String },
}

/// Settings resolved once at startup and shared read-only afterwards.
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub endpoint: Url,
    pub request_timeout: Duration,
    pub log_dir: PathBuf,
    pub debug: bool,
    pub palette: ChartPalette,
}

impl AppConfig {
    /// Build the config from any key lookup; `init_app_config` uses the process environment.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let endpoint_value = lookup(ENDPOINT_VAR)
            .filter(|value| !value.trim().is_empty())
            .unwrap_or_else(|| DEFAULT_ENDPOINT.to_string());
        let endpoint = parse_endpoint(endpoint_value.trim())?;

        let request_timeout = match lookup(TIMEOUT_VAR) {
            Some(value) => parse_timeout(&value)?,
            None => Duration::from_secs(DEFAULT_TIMEOUT_SECS),
        };

        let log_dir = lookup(LOG_DIR_VAR)
            .filter(|value| !value.trim().is_empty())
            .map_or_else(|| PathBuf::from(DEFAULT_LOG_DIR), PathBuf::from);

        let debug = lookup(DEBUG_VAR).is_some_and(|value| is_truthy(&value));

        Ok(Self {
            endpoint,
            request_timeout,
            log_dir,
            debug,
            palette: DEFAULT_PALETTE,
        })
    }
}

/// Loads `.env` (if present) and resolves the application configuration.
pub fn init_app_config() -> Result<AppConfig, ConfigError> {
    dotenv().ok();
    AppConfig::from_lookup(|key| env::var(key).ok())
}

fn parse_endpoint(value: &str) -> Result<Url, ConfigError> {
    let url = Url::parse(value).map_err(|source| ConfigError::InvalidEndpoint {
        value: value.to_string(),
        source,
    })?;

    match url.scheme() {
        "http" | "https" => Ok(url),
        other => Err(ConfigError::UnsupportedScheme {
            scheme: other.to_string(),
        }),
    }
}

fn parse_timeout(value: &str) -> Result<Duration, ConfigError> {
    match value.trim().parse::<u64>() {
        Ok(secs) if secs > 0 => Ok(Duration::from_secs(secs)),
        _ => Err(ConfigError::InvalidTimeout {
            value: value.to_string(),
        }),
    }
}

fn is_truthy(value: &str) -> bool {
    !matches!(
        value.trim().to_lowercase().as_str(),
        "" | "0" | "false" | "no" | "off"
    )
}
