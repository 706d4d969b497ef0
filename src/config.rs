//! Service Configuration
//!
//! Settings are read from environment variables (a `.env` file is honoured by the
//! binary). Every option has a default matching the public Superstore snapshot.

use crate::error::{Result, SalesError};
use std::str::FromStr;
use std::time::Duration;

pub const DEFAULT_DATA_SOURCE_URL: &str =
    "https://raw.githubusercontent.com/texodus/superstore-arrow/master/superstore.arrow";

#[derive(Debug, Clone, PartialEq)]
pub struct Settings {
    pub api_title: String,
    pub api_version: String,
    pub data_source_url: String,
    pub request_timeout: Duration,
    /// Total fetch attempts, including the first one
    pub retry_attempts: usize,
    pub retry_base_delay: Duration,
    pub retry_max_delay: Duration,
    pub bind_addr: String,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            api_title: "Superstore Insights API".to_string(),
            api_version: env!("CARGO_PKG_VERSION").to_string(),
            data_source_url: DEFAULT_DATA_SOURCE_URL.to_string(),
            request_timeout: Duration::from_secs(30),
            retry_attempts: 3,
            retry_base_delay: Duration::from_millis(500),
            retry_max_delay: Duration::from_millis(8000),
            bind_addr: "127.0.0.1:8000".to_string(),
        }
    }
}

impl Settings {
    /// Load settings from the process environment
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Load settings through an arbitrary key lookup
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = Settings::default();

        let data_source_url = lookup("SUPERSTORE_DATA_URL")
            .filter(|v| !v.trim().is_empty())
            .unwrap_or(defaults.data_source_url);

        let timeout_secs: u64 = parse_var(&lookup, "SUPERSTORE_REQUEST_TIMEOUT_SECS")?
            .unwrap_or(defaults.request_timeout.as_secs());
        let retry_attempts: usize = parse_var(&lookup, "SUPERSTORE_RETRY_ATTEMPTS")?
            .unwrap_or(defaults.retry_attempts);
        let base_ms: u64 = parse_var(&lookup, "SUPERSTORE_RETRY_BASE_DELAY_MS")?
            .unwrap_or(defaults.retry_base_delay.as_millis() as u64);
        let max_ms: u64 = parse_var(&lookup, "SUPERSTORE_RETRY_MAX_DELAY_MS")?
            .unwrap_or(defaults.retry_max_delay.as_millis() as u64);

        if timeout_secs == 0 {
            return Err(SalesError::Internal(
                "SUPERSTORE_REQUEST_TIMEOUT_SECS must be greater than zero".to_string(),
            ));
        }

        Ok(Self {
            api_title: defaults.api_title,
            api_version: defaults.api_version,
            data_source_url,
            request_timeout: Duration::from_secs(timeout_secs),
            retry_attempts: retry_attempts.max(1),
            retry_base_delay: Duration::from_millis(base_ms),
            retry_max_delay: Duration::from_millis(max_ms.max(base_ms)),
            bind_addr: lookup("SUPERSTORE_BIND_ADDR").unwrap_or(defaults.bind_addr),
        })
    }
}

fn parse_var<F, T>(lookup: &F, key: &str) -> Result<Option<T>>
where
    F: Fn(&str) -> Option<String>,
    T: FromStr,
{
    match lookup(key) {
        None => Ok(None),
        Some(raw) => raw.trim().parse::<T>().map(Some).map_err(|_| {
            SalesError::Internal(format!("Invalid value for {}: {:?}", key, raw))
        }),
    }
}
