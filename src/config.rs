//! Service configuration from environment variables
//!
//! - `NORNS_CONTEXT_BIND` (default `0.0.0.0`)
//! - `NORNS_CONTEXT_PORT` (default 8081)
//! - `NORNS_CONTEXT_CORPUS_DIR`: directory holding `manifest.json`
//! - `NORNS_CONTEXT_CORPUS_URL`: URL of a manifest with inline content
//! - `NORNS_CONTEXT_DEFAULT_BUDGET` (default 24000), used when a request omits one
//!
//! Without a corpus dir or URL the built-in corpus is served.

use std::path::PathBuf;
use thiserror::Error;

pub const DEFAULT_PORT: u16 = 8081;
pub const DEFAULT_BUDGET: usize = 24_000;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("{var} has invalid value '{value}': {reason}")]
    Invalid {
        var: &'static str,
        value: String,
        reason: String,
    },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServiceConfig {
    pub bind: String,
    pub port: u16,
    pub corpus_dir: Option<PathBuf>,
    pub corpus_url: Option<String>,
    pub default_budget: usize,
}

impl Default for ServiceConfig {
    fn default() -> Self {
        Self {
            bind: "0.0.0.0".to_string(),
            port: DEFAULT_PORT,
            corpus_dir: None,
            corpus_url: None,
            default_budget: DEFAULT_BUDGET,
        }
    }
}

impl ServiceConfig {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build from any key lookup; `from_env` passes the process environment
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let mut config = Self::default();

        if let Some(bind) = lookup("NORNS_CONTEXT_BIND").filter(|v| !v.trim().is_empty()) {
            config.bind = bind;
        }
        if let Some(raw) = lookup("NORNS_CONTEXT_PORT") {
            config.port = raw.trim().parse().map_err(|e: std::num::ParseIntError| ConfigError::Invalid {
                var: "NORNS_CONTEXT_PORT",
                value: raw.clone(),
                reason: e.to_string(),
            })?;
        }
        config.corpus_dir = lookup("NORNS_CONTEXT_CORPUS_DIR")
            .filter(|v| !v.trim().is_empty())
            .map(PathBuf::from);
        config.corpus_url = lookup("NORNS_CONTEXT_CORPUS_URL").filter(|v| !v.trim().is_empty());
        if let Some(raw) = lookup("NORNS_CONTEXT_DEFAULT_BUDGET") {
            config.default_budget = raw.trim().parse().map_err(|e: std::num::ParseIntError| ConfigError::Invalid {
                var: "NORNS_CONTEXT_DEFAULT_BUDGET",
                value: raw.clone(),
                reason: e.to_string(),
            })?;
        }

        config.validate()?;
        Ok(config)
    }

    fn validate(&self) -> Result<(), ConfigError> {
        if self.default_budget == 0 {
            return Err(ConfigError::Invalid {
                var: "NORNS_CONTEXT_DEFAULT_BUDGET",
                value: "0".to_string(),
                reason: "budget must be greater than zero".to_string(),
            });
        }
        Ok(())
    }

    pub fn addr(&self) -> String {
        format!("{}:{}", self.bind, self.port)
    }
}
