//! Configuration loader with layered sources
//!
//! Loads configuration from multiple sources with the following precedence
//! (highest to lowest):
//! 1. Environment variables (SCHEMA_WARDEN_*)
//! 2. Configuration file (TOML)
//! 3. Default values

use crate::config::types::{AppConfig, RuleAction};
use crate::error::ConfigError;
use config::{Config, Environment, File, FileFormat};
use std::collections::HashSet;
use std::path::Path;

/// Default configuration file paths to check (in order)
const DEFAULT_CONFIG_PATHS: &[&str] = &[
    "schema-warden.toml",
    ".schema-warden.toml",
    "~/.config/schema-warden/config.toml",
];

const LOG_LEVELS: &[&str] = &["trace", "debug", "info", "warn", "error"];

/// Load configuration from a TOML string (useful for testing)
pub fn load_config_from_str(toml_str: &str) -> Result<AppConfig, ConfigError> {
    let config = Config::builder()
        .add_source(File::from_str(toml_str, FileFormat::Toml))
        .build()
        .map_err(|e| ConfigError::Load(e.to_string()))?;

    let app_config: AppConfig = config
        .try_deserialize()
        .map_err(|e| ConfigError::Load(e.to_string()))?;

    validate_config(&app_config)?;

    Ok(app_config)
}

/// Load configuration from files and environment
pub fn load_config(config_path: Option<&str>) -> Result<AppConfig, ConfigError> {
    let mut builder = Config::builder();

    if let Some(path) = config_path {
        // Explicit path provided - must exist
        if !Path::new(path).exists() {
            return Err(ConfigError::Load(format!(
                "Configuration file not found: {}",
                path
            )));
        }
        builder = builder.add_source(File::new(path, FileFormat::Toml));
    } else {
        // Try default paths (first existing one wins)
        for path in DEFAULT_CONFIG_PATHS {
            let expanded = shellexpand::tilde(path);
            if Path::new(expanded.as_ref()).exists() {
                builder = builder.add_source(File::new(&expanded, FileFormat::Toml));
                break;
            }
        }
    }

    // e.g. SCHEMA_WARDEN_LOGGING__LEVEL=debug
    builder = builder.add_source(
        Environment::with_prefix("SCHEMA_WARDEN")
            .prefix_separator("_")
            .separator("__")
            .try_parsing(true),
    );

    let config = builder
        .build()
        .map_err(|e| ConfigError::Load(e.to_string()))?;

    let app_config: AppConfig = config
        .try_deserialize()
        .map_err(|e| ConfigError::Load(e.to_string()))?;

    validate_config(&app_config)?;

    Ok(app_config)
}

/// Validate configuration values
fn validate_config(config: &AppConfig) -> Result<(), ConfigError> {
    let level = config.logging.level.to_ascii_lowercase();
    if !LOG_LEVELS.contains(&level.as_str()) {
        return Err(ConfigError::Invalid {
            message: format!(
                "logging.level must be one of {}, got: {}",
                LOG_LEVELS.join(", "),
                config.logging.level
            ),
        });
    }

    let mut seen = HashSet::new();
    for (index, rule) in config.rules.iter().enumerate() {
        if rule.pattern.is_empty() {
            return Err(ConfigError::Missing {
                field: format!("rules[{}].pattern", index),
            });
        }

        if !seen.insert(rule.pattern.as_str()) {
            return Err(ConfigError::Invalid {
                message: format!("pattern '{}' is declared more than once", rule.pattern),
            });
        }

        let has_transform = rule.interceptor.is_some() || !rule.set_args.is_empty();
        match rule.action {
            RuleAction::Intercept if !has_transform => {
                return Err(ConfigError::Missing {
                    field: format!("rules[{}].interceptor or rules[{}].set_args", index, index),
                });
            }
            RuleAction::Intercept if rule.interceptor.is_some() && !rule.set_args.is_empty() => {
                return Err(ConfigError::Invalid {
                    message: format!(
                        "rules[{}] sets both interceptor and set_args for '{}'",
                        index, rule.pattern
                    ),
                });
            }
            RuleAction::Allow | RuleAction::Deny if has_transform => {
                return Err(ConfigError::Invalid {
                    message: format!(
                        "rules[{}] for '{}' only takes interceptor/set_args with action = \"intercept\"",
                        index, rule.pattern
                    ),
                });
            }
            _ => {}
        }
    }

    Ok(())
}
