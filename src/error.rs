//! Error types for schema-warden
//!
//! This module defines the error hierarchy used throughout the crate.
//! We use `thiserror` for library-style errors that are part of the API.
//! Failures raised by resolvers and interceptors while an operation runs are
//! plain `anyhow::Error` values and never pass through these types.

use thiserror::Error;

/// Top-level application error
#[derive(Error, Debug)]
pub enum AppError {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("Schema error: {0}")]
    Schema(#[from] SchemaError),

    #[error("Invalid rule set: {0}")]
    Rules(#[from] InvalidRuleSetError),
}

/// The rule set leaves no operation in the schema
///
/// This is the only fatal outcome of rule resolution. It is a configuration
/// mistake, so callers should surface it rather than retry.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("rules deny every operation in the schema ({operations} checked)")]
pub struct InvalidRuleSetError {
    /// Number of operations that were resolved before the check failed
    pub operations: usize,
}

impl InvalidRuleSetError {
    pub fn all_denied(operations: usize) -> Self {
        Self { operations }
    }
}

/// Configuration-related errors
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Failed to load configuration: {0}")]
    Load(String),

    #[error("Invalid configuration: {message}")]
    Invalid { message: String },

    #[error("Missing required configuration: {field}")]
    Missing { field: String },

    #[error("Unknown interceptor '{name}'")]
    UnknownInterceptor { name: String },

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Errors while building a schema from a document or invoking into it
#[derive(Error, Debug)]
pub enum SchemaError {
    #[error("Invalid schema document: {0}")]
    InvalidJson(#[from] serde_json::Error),

    #[error("Invalid type reference '{ty}'")]
    InvalidType { ty: String },

    #[error("Duplicate operation '{name}' in {category}")]
    DuplicateOperation { category: String, name: String },

    #[error("No operation '{name}' in {category}")]
    UnknownOperation { category: String, name: String },

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result type alias for the application
pub type Result<T> = std::result::Result<T, AppError>;
