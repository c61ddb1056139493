use std::collections::HashMap;
use std::env;
use std::time::Duration;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Missing required environment variable: {0}")]
    MissingVar(&'static str),
    #[error("Invalid configuration: {0}")]
    Invalid(String),
}

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub bind_addr: String,
    /// Single origin allowed to call the API with credentials
    pub frontend_url: String,
    pub database_path: String,
    /// Artificial latency before answering `/api/extra-info`
    pub extra_info_delay: Duration,
}

impl AppConfig {
    pub fn from_env() -> Result<Self, ConfigError> {
        let values: HashMap<String, String> = env::vars().collect();
        Self::from_lookup(|name| values.get(name).cloned())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let port = value_or_default(&lookup, "PORT", "1338")
            .parse::<u16>()
            .map_err(|_| ConfigError::Invalid("PORT must be an integer in [1, 65535]".to_string()))?;
        if port == 0 {
            return Err(ConfigError::Invalid(
                "PORT must be in [1, 65535]".to_string(),
            ));
        }
        let bind_host = value_or_default(&lookup, "BIND_HOST", "0.0.0.0");
        let bind_addr = format!("{bind_host}:{port}");

        let frontend_url = required_trimmed(&lookup, "FRONTEND_URL")?;
        if !is_http_url(&frontend_url) {
            return Err(ConfigError::Invalid(
                "FRONTEND_URL must start with http:// or https://".to_string(),
            ));
        }
        let frontend_url = trim_trailing(&frontend_url).to_string();

        let database_path = value_or_default(&lookup, "DATABASE", "shiftboard.db");

        let extra_info_delay_ms = value_or_default(&lookup, "EXTRA_INFO_DELAY_MS", "2000")
            .parse::<u64>()
            .map_err(|_| {
                ConfigError::Invalid(
                    "EXTRA_INFO_DELAY_MS must be an integer in [0, 60000]".to_string(),
                )
            })?;
        if extra_info_delay_ms > 60_000 {
            return Err(ConfigError::Invalid(
                "EXTRA_INFO_DELAY_MS must be in [0, 60000]".to_string(),
            ));
        }

        Ok(Self {
            bind_addr,
            frontend_url,
            database_path,
            extra_info_delay: Duration::from_millis(extra_info_delay_ms),
        })
    }
}

fn value_or_default(lookup: impl Fn(&str) -> Option<String>, name: &str, default: &str) -> String {
    optional_trimmed(lookup, name).unwrap_or_else(|| default.to_string())
}

fn required_trimmed(
    lookup: impl Fn(&str) -> Option<String>,
    name: &'static str,
) -> Result<String, ConfigError> {
    optional_trimmed(lookup, name).ok_or(ConfigError::MissingVar(name))
}

fn optional_trimmed(lookup: impl Fn(&str) -> Option<String>, name: &str) -> Option<String> {
    lookup(name).and_then(|value| {
        let trimmed = value.trim();
        if trimmed.is_empty() {
            None
        } else {
            Some(trimmed.to_string())
        }
    })
}

fn is_http_url(value: &str) -> bool {
    value.starts_with("http://") || value.starts_with("https://")
}

fn trim_trailing(value: &str) -> &str {
    value.trim_end_matches('/')
}
