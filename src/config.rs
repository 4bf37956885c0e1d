//! Pipeline configuration, read from the environment at startup.

use std::env;
use std::fmt::Display;
use std::str::FromStr;
use std::time::Duration;

use thiserror::Error;
use tracing::info;

use crate::paginate::DEFAULT_PAGE_SIZE;

pub const ENV_PAGE_SIZE: &str = "ORDERVIEW_PAGE_SIZE";
pub const ENV_API_BASE_URL: &str = "ORDERVIEW_API_BASE_URL";
pub const ENV_PATH_TEMPLATE: &str = "ORDERVIEW_PATH_TEMPLATE";
pub const ENV_TIMEOUT_SECS: &str = "ORDERVIEW_TIMEOUT_SECS";
pub const ENV_EXPORT_FILENAME: &str = "ORDERVIEW_EXPORT_FILENAME";

/// Default request path: `{collection}` and `{scope}` are substituted.
pub const DEFAULT_PATH_TEMPLATE: &str = "{collection}?scope={scope}";

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConfigError {
    #[error("invalid value for {key}: {reason}")]
    Invalid { key: String, reason: String },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PipelineConfig {
    /// Rows per page. Fixed for the lifetime of a dashboard.
    pub page_size: usize,
    pub api_base_url: String,
    pub path_template: String,
    pub request_timeout: Duration,
    pub export_filename: String,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            page_size: DEFAULT_PAGE_SIZE,
            api_base_url: "http://localhost:8080/api".to_string(),
            path_template: DEFAULT_PATH_TEMPLATE.to_string(),
            request_timeout: Duration::from_secs(30),
            export_filename: "orders.csv".to_string(),
        }
    }
}

impl PipelineConfig {
    /// Load from the process environment, falling back to defaults.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Load from an arbitrary key lookup (the environment in production,
    /// a map in tests).
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = Self::default();

        let page_size: usize = try_load(&lookup, ENV_PAGE_SIZE, defaults.page_size)?;
        if page_size == 0 {
            return Err(ConfigError::Invalid {
                key: ENV_PAGE_SIZE.to_string(),
                reason: "page size must be at least 1".to_string(),
            });
        }

        let timeout_secs: u64 =
            try_load(&lookup, ENV_TIMEOUT_SECS, defaults.request_timeout.as_secs())?;

        let api_base_url = load_text(&lookup, ENV_API_BASE_URL, defaults.api_base_url);
        let path_template = load_text(&lookup, ENV_PATH_TEMPLATE, defaults.path_template);
        let export_filename = load_text(&lookup, ENV_EXPORT_FILENAME, defaults.export_filename);

        Ok(Self {
            page_size,
            api_base_url: api_base_url.trim_end_matches('/').to_string(),
            path_template,
            request_timeout: Duration::from_secs(timeout_secs),
            export_filename,
        })
    }
}

/// Parse a numeric setting. Surrounding whitespace is ignored.
fn try_load<F, T>(lookup: &F, key: &str, default: T) -> Result<T, ConfigError>
where
    F: Fn(&str) -> Option<String>,
    T: FromStr + Display,
    T::Err: Display,
{
    match lookup(key) {
        Some(raw) => raw.trim().parse().map_err(|e: T::Err| ConfigError::Invalid {
            key: key.to_string(),
            reason: e.to_string(),
        }),
        None => {
            info!("{key} not set, using default: {default}");
            Ok(default)
        }
    }
}

/// Read a text setting verbatim; whitespace may be part of the value.
fn load_text<F>(lookup: &F, key: &str, default: String) -> String
where
    F: Fn(&str) -> Option<String>,
{
    lookup(key).unwrap_or_else(|| {
        info!("{key} not set, using default: {default}");
        default
    })
}
