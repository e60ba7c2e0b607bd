//! Configuration System
//!
//! Hierarchical configuration loading from:
//! - groundplan.toml (base configuration)
//! - groundplan.local.toml (git-ignored local overrides)
//! - Environment variables (GROUNDPLAN_* prefix)
//!
//! CLI flags override whatever the files and environment provide.
//!
//! ## Example
//!
//! ```toml
//! # groundplan.toml
//! [search]
//! max_arity = 2
//! grounded = true
//! max_num_states = 1000000
//!
//! [logging]
//! level = "info"
//! ```
//!
//! Environment variable overrides:
//! ```bash
//! GROUNDPLAN_SEARCH__MAX_ARITY=3
//! GROUNDPLAN_LOGGING__LEVEL=debug
//! ```

use figment::{
    providers::{Env, Format, Toml},
    Figment,
};
use serde::{Deserialize, Serialize};

/// Main configuration struct
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct Config {
    #[serde(default)]
    pub search: SearchConfig,
    #[serde(default)]
    pub logging: LoggingConfig,
}

/// Search configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SearchConfig {
    /// Maximum IW arity for SIW subproblems
    #[serde(default = "default_max_arity")]
    pub max_arity: usize,

    /// Use the grounded (match-tree) generators instead of the lifted ones
    #[serde(default)]
    pub grounded: bool,

    /// Stop after this many interned states (0 = unbounded)
    #[serde(default)]
    pub max_num_states: usize,

    /// Search timeout in seconds (0 = unbounded)
    #[serde(default)]
    pub timeout_seconds: u64,
}

/// Logging configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Log level (trace, debug, info, warn, error)
    #[serde(default = "default_log_level")]
    pub level: String,
}

fn default_max_arity() -> usize {
    1
}
fn default_log_level() -> String {
    "warn".to_string()
}

impl Default for SearchConfig {
    fn default() -> Self {
        SearchConfig {
            max_arity: default_max_arity(),
            grounded: false,
            max_num_states: 0,
            timeout_seconds: 0,
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        LoggingConfig {
            level: default_log_level(),
        }
    }
}

impl Config {
    /// Load configuration from default locations
    ///
    /// Merges in order:
    /// 1. groundplan.toml (base configuration)
    /// 2. groundplan.local.toml (local overrides, git-ignored)
    /// 3. Environment variables (GROUNDPLAN_* prefix)
    pub fn load() -> Result<Self, figment::Error> {
        Figment::new()
            .merge(Toml::file("groundplan.toml"))
            .merge(Toml::file("groundplan.local.toml"))
            .merge(Env::prefixed("GROUNDPLAN_").split("__"))
            .extract()
    }

    /// Load configuration from a specific file path
    pub fn from_file(path: &str) -> Result<Self, figment::Error> {
        Figment::new()
            .merge(Toml::file(path))
            .merge(Env::prefixed("GROUNDPLAN_").split("__"))
            .extract()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = Config::default();
        assert_eq!(config.search.max_arity, 1);
        assert!(!config.search.grounded);
        assert_eq!(config.search.max_num_states, 0);
        assert_eq!(config.logging.level, "warn");
    }

    #[test]
    fn test_config_serialization() {
        let config = Config::default();
        let toml_str = toml::to_string(&config).unwrap();
        assert!(toml_str.contains("[search]"));
        assert!(toml_str.contains("[logging]"));

        let parsed: Config = toml::from_str(&toml_str).unwrap();
        assert_eq!(parsed.search.max_arity, config.search.max_arity);
    }
}
