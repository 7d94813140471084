//! Configuration types for schema-warden
//!
//! This module defines the configuration structure that can be loaded from
//! TOML files and/or environment variables.

use serde::Deserialize;
use serde_json::{Map, Value};

/// Root configuration structure
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    /// Logging configuration
    pub logging: LoggingConfig,

    /// Rules in declaration order
    pub rules: Vec<RuleConfig>,
}

/// One rule as written in the configuration file
///
/// ```toml
/// [[rules]]
/// pattern = "alexa*"
/// action = "intercept"
/// set_args = { name = "John" }
/// ```
#[derive(Debug, Clone, Deserialize)]
pub struct RuleConfig {
    /// Operation name or glob
    pub pattern: String,

    /// What to do with matching operations
    pub action: RuleAction,

    /// Name of a registered interceptor (intercept only)
    #[serde(default)]
    pub interceptor: Option<String>,

    /// Fixed argument values merged over the caller's (intercept only)
    #[serde(default)]
    pub set_args: Map<String, Value>,
}

impl RuleConfig {
    pub fn new(pattern: impl Into<String>, action: RuleAction) -> Self {
        Self {
            pattern: pattern.into(),
            action,
            interceptor: None,
            set_args: Map::new(),
        }
    }
}

/// Rule action
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RuleAction {
    /// Keep matching operations
    Allow,
    /// Remove matching operations
    Deny,
    /// Wrap matching operations with an interceptor
    Intercept,
}

/// Logging configuration
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// Log level (trace, debug, info, warn, error)
    pub level: String,

    /// Output format (pretty, json)
    pub format: LogFormat,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            format: LogFormat::Pretty,
        }
    }
}

/// Log output format
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    /// Human-readable output
    #[default]
    Pretty,
    /// JSON structured output
    Json,
}
