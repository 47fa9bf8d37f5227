//! Configuration management for ngramq.
//!
//! Configuration is loaded from `~/.config/ngramq/config.toml`. Every field is
//! optional; missing values fall back to the defaults of the reference
//! n-gram service.

use crate::protocol::QueryRequest;
use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::time::Duration;

/// Main configuration structure.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Config {
    /// Where the service lives.
    #[serde(default)]
    pub service: ServiceConfig,
    /// Default query parameters.
    #[serde(default)]
    pub query: QueryDefaults,
}

/// Connection settings for the n-gram service.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ServiceConfig {
    /// Full URL of the grams endpoint.
    #[serde(default = "default_endpoint")]
    pub endpoint: String,
    /// Whole-request timeout in seconds.
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

impl Default for ServiceConfig {
    fn default() -> Self {
        Self {
            endpoint: default_endpoint(),
            timeout_secs: default_timeout_secs(),
        }
    }
}

fn default_endpoint() -> String {
    "http://localhost:3500/api/v1/grams".to_string()
}

fn default_timeout_secs() -> u64 {
    30
}

/// Query parameters used when the command line does not override them.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QueryDefaults {
    #[serde(default = "default_corpus")]
    pub corpus: String,
    #[serde(default = "default_ngram")]
    pub ngram: u32,
    #[serde(default = "default_count")]
    pub count: u64,
    #[serde(default)]
    pub noshift: bool,
    #[serde(default = "default_true")]
    pub nospace: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub regex: Option<String>,
}

impl Default for QueryDefaults {
    fn default() -> Self {
        Self {
            corpus: default_corpus(),
            ngram: default_ngram(),
            count: default_count(),
            noshift: false,
            nospace: true,
            regex: None,
        }
    }
}

fn default_corpus() -> String {
    "monkeyracer".to_string()
}

fn default_ngram() -> u32 {
    1
}

fn default_count() -> u64 {
    1_000_000
}

fn default_true() -> bool {
    true
}

/// Command-line values that take precedence over the config file.
#[derive(Debug, Clone, Default)]
pub struct QueryOverrides {
    pub corpus: Option<String>,
    pub ngram: Option<u32>,
    pub count: Option<u64>,
    pub noshift: bool,
    pub keep_space: bool,
    pub regex: Option<String>,
}

impl Config {
    /// Get the config directory path.
    pub fn config_dir() -> Result<PathBuf> {
        dirs::config_dir()
            .map(|p| p.join("ngramq"))
            .context("Could not determine config directory")
    }

    /// Get the config file path.
    pub fn config_path() -> Result<PathBuf> {
        Ok(Self::config_dir()?.join("config.toml"))
    }

    /// Load configuration from file, using defaults if not found.
    pub fn load() -> Result<Self> {
        let path = Self::config_path()?;
        if path.exists() {
            let contents = std::fs::read_to_string(&path)
                .with_context(|| format!("Failed to read config file: {}", path.display()))?;
            toml::from_str(&contents)
                .with_context(|| format!("Failed to parse config file: {}", path.display()))
        } else {
            Ok(Self::default())
        }
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.service.timeout_secs)
    }

    /// Build the request to send, layering CLI overrides on the configured defaults.
    ///
    /// Boolean flags can only switch a default on (`--noshift`) or off
    /// (`--keep-space`); they never undo a config file setting in the other direction.
    pub fn build_request(&self, overrides: QueryOverrides) -> QueryRequest {
        let defaults = &self.query;
        QueryRequest {
            corpus: overrides.corpus.unwrap_or_else(|| defaults.corpus.clone()),
            ngram: overrides.ngram.unwrap_or(defaults.ngram),
            count: overrides.count.unwrap_or(defaults.count),
            noshift: defaults.noshift || overrides.noshift,
            nospace: defaults.nospace && !overrides.keep_space,
            regex: overrides.regex.or_else(|| defaults.regex.clone()),
        }
    }
}
