//! Environment configuration

use crate::output::{OutputFormat, Separator};
use crate::query::Strategy;
use std::time::Duration;
use thiserror::Error;

pub const ENV_FORMAT: &str = "FRONTMOST_FORMAT";
pub const ENV_SEPARATOR: &str = "FRONTMOST_SEPARATOR";
pub const ENV_PLACEHOLDER: &str = "FRONTMOST_PLACEHOLDER";
pub const ENV_STRATEGY: &str = "FRONTMOST_STRATEGY";
pub const ENV_TIMEOUT_MS: &str = "FRONTMOST_TIMEOUT_MS";

pub const DEFAULT_TIMEOUT: Duration = Duration::from_millis(2000);

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Invalid value for {key}: {message}")]
    Invalid { key: &'static str, message: String },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    pub format: OutputFormat,
    pub separator: Separator,
    /// Printed in place of an attribute the platform did not report
    pub placeholder: String,
    pub strategy: Strategy,
    /// `None` runs the query inline without a deadline
    pub timeout: Option<Duration>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            format: OutputFormat::default(),
            separator: Separator::default(),
            placeholder: String::new(),
            strategy: Strategy::default(),
            timeout: Some(DEFAULT_TIMEOUT),
        }
    }
}

impl Config {
    /// Load from the process environment
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Load using `lookup` to resolve variable names
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = Self::default();

        if let Some(value) = lookup(ENV_FORMAT) {
            config.format = value.trim().parse().map_err(|message| ConfigError::Invalid {
                key: ENV_FORMAT,
                message,
            })?;
        }

        if let Some(value) = lookup(ENV_SEPARATOR) {
            config.separator = Separator::parse(&value);
        }

        if let Some(value) = lookup(ENV_PLACEHOLDER) {
            config.placeholder = value;
        }

        if let Some(value) = lookup(ENV_STRATEGY) {
            config.strategy = value.trim().parse().map_err(|message| ConfigError::Invalid {
                key: ENV_STRATEGY,
                message,
            })?;
        }

        if let Some(value) = lookup(ENV_TIMEOUT_MS) {
            let millis: u64 = value.trim().parse().map_err(|e| ConfigError::Invalid {
                key: ENV_TIMEOUT_MS,
                message: format!("{}", e),
            })?;
            config.timeout = (millis > 0).then(|| Duration::from_millis(millis));
        }

        Ok(config)
    }
}
