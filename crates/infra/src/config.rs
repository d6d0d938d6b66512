//! Configuration loading and representation.
//!
//! Everything comes from environment variables with defaults suitable for
//! local development:
//!
//! | variable | default | meaning |
//! |---|---|---|
//! | `QNA_LOG_FILTER` | `info` | tracing filter directive (`RUST_LOG` overrides) |
//! | `QNA_LOG_JSON` | `true` | JSON log lines instead of human-readable output |

use thiserror::Error;

use qna_observability::TracingSettings;

pub const LOG_FILTER_VAR: &str = "QNA_LOG_FILTER";
pub const LOG_JSON_VAR: &str = "QNA_LOG_JSON";

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ConfigError {
    #[error("{var} must be a boolean, got '{value}'")]
    InvalidBool { var: &'static str, value: String },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QnaConfig {
    pub log_filter: String,
    pub log_json: bool,
}

impl Default for QnaConfig {
    fn default() -> Self {
        Self {
            log_filter: "info".to_string(),
            log_json: true,
        }
    }
}

impl QnaConfig {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|var| std::env::var(var).ok())
    }

    /// Build from an arbitrary variable source (tests, embedding).
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = Self::default();

        let log_filter = lookup(LOG_FILTER_VAR)
            .filter(|v| !v.trim().is_empty())
            .unwrap_or(defaults.log_filter);

        let log_json = match lookup(LOG_JSON_VAR) {
            Some(raw) => parse_bool(LOG_JSON_VAR, &raw)?,
            None => defaults.log_json,
        };

        Ok(Self {
            log_filter,
            log_json,
        })
    }

    pub fn tracing_settings(&self) -> TracingSettings {
        TracingSettings {
            filter: self.log_filter.clone(),
            json: self.log_json,
        }
    }
}

fn parse_bool(var: &'static str, raw: &str) -> Result<bool, ConfigError> {
    match raw.trim().to_ascii_lowercase().as_str() {
        "true" | "1" | "yes" | "on" => Ok(true),
        "false" | "0" | "no" | "off" => Ok(false),
        _ => Err(ConfigError::InvalidBool {
            var,
            value: raw.to_string(),
        }),
    }
}
