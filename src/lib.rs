//! Schema Warden
//!
//! Filters and rewrites the operations of a query/mutation schema using a
//! small pattern-based rule language.
//!
//! ## Features
//!
//! - **Glob rules** (`*`, `?`) naming queries and mutations to keep or remove
//! - **Allowlists and denylists** - non-deny rules always win over deny rules
//! - **Intercepts** that rewrite arguments or results around the original handler
//! - **TOML rule files** with named interceptors and fixed-argument overrides
//!
//! ## Rule Resolution
//!
//! ```text
//! default allow → deny patterns → first matching allow/intercept pattern
//! ```
//!
//! A rule set that would remove every operation is rejected.
//!
//! ## Example
//!
//! ```
//! use schema_warden::{ObjectType, OperationDescriptor, RuleSet, Schema, TypeRef, transform_schema};
//!
//! let schema = Schema::new(
//!     ObjectType::new("Query")
//!         .with_field(OperationDescriptor::new("hello", TypeRef::non_null("String")))
//!         .with_field(OperationDescriptor::new("world", TypeRef::non_null("String"))),
//! );
//!
//! let rules = RuleSet::new().deny("*").allow("hello");
//! let transformed = transform_schema(&schema, &rules).unwrap();
//!
//! assert!(transformed.query_type().field("hello").is_some());
//! assert!(transformed.query_type().field("world").is_none());
//! ```

pub mod config;
pub mod error;
pub mod rules;
pub mod schema;
pub mod transform;

// Re-export main types
pub use config::{AppConfig, load_config};
pub use error::{AppError, ConfigError, InvalidRuleSetError, Result, SchemaError};
pub use rules::{Decision, Interception, Interceptor, InterceptorRegistry, Resolve, Rule, RuleSet};
pub use schema::{
    Argument, ObjectType, OperationDescriptor, ResolveInfo, ResolveParams, Resolver, Schema,
    SchemaDocument, TypeRef,
};
pub use transform::{SchemaAssembler, transform_schema};
