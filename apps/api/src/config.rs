use std::str::FromStr;
use std::time::Duration;

use anyhow::{Context, Result};

use crate::opportunities::query::DEFAULT_MAX_LIMIT;

/// Application configuration loaded from environment variables.
/// Every value has a default; malformed values fail startup.
#[derive(Debug, Clone)]
pub struct Config {
    pub port: u16,
    pub rust_log: String,
    /// Default bound on a single source fetch, for sources that don't set their own.
    pub source_timeout: Duration,
    /// Age after which a read triggers a fresh aggregation. Zero disables caching.
    pub snapshot_ttl: Duration,
    /// Background refresh period. Zero disables the refresh task.
    pub refresh_interval: Duration,
    pub max_search_limit: usize,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            port: 8080,
            rust_log: "info".to_string(),
            source_timeout: Duration::from_millis(5000),
            snapshot_ttl: Duration::from_secs(300),
            refresh_interval: Duration::from_secs(300),
            max_search_limit: DEFAULT_MAX_LIMIT,
        }
    }
}

impl Config {
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok(); // load .env if present; ignore if missing
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let defaults = Config::default();

        Ok(Config {
            port: parse_or(&lookup, "PORT", defaults.port)?,
            rust_log: lookup("RUST_LOG").unwrap_or(defaults.rust_log),
            source_timeout: Duration::from_millis(parse_or(
                &lookup,
                "SOURCE_TIMEOUT_MS",
                defaults.source_timeout.as_millis() as u64,
            )?),
            snapshot_ttl: Duration::from_secs(parse_or(
                &lookup,
                "SNAPSHOT_TTL_SECS",
                defaults.snapshot_ttl.as_secs(),
            )?),
            refresh_interval: Duration::from_secs(parse_or(
                &lookup,
                "REFRESH_INTERVAL_SECS",
                defaults.refresh_interval.as_secs(),
            )?),
            max_search_limit: parse_or(&lookup, "MAX_SEARCH_LIMIT", defaults.max_search_limit)?,
        })
    }
}

fn parse_or<T>(lookup: &impl Fn(&str) -> Option<String>, key: &str, default: T) -> Result<T>
where
    T: FromStr,
    T::Err: std::error::Error + Send + Sync + 'static,
{
    match lookup(key) {
        Some(raw) => raw
            .trim()
            .parse::<T>()
            .with_context(|| format!("Environment variable '{key}' has invalid value '{raw}'")),
        None => Ok(default),
    }
}
