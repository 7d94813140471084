//! Interceptor registry
//!
//! Configuration files cannot carry code, so intercept rules loaded from a
//! file refer to interceptors by name. The registry maps those names to the
//! transforms the embedding application registered.
//!
//! [`InterceptorRegistry::with_builtins`] starts from a few general-purpose
//! transforms, which is what the command-line tool uses:
//!
//! - `passthrough` - run the original handler unchanged
//! - `trace` - log each invocation, then run the original handler
//! - `nullify` - return `null` without running the original handler

use crate::config::{RuleAction, RuleConfig};
use crate::error::ConfigError;
use crate::rules::intercept::{Interception, Interceptor};
use crate::rules::types::{Rule, RuleSet};
use crate::schema::FieldResult;
use futures::future;
use serde_json::Value;
use std::collections::HashMap;
use std::future::Future;
use tracing::{debug, info};

/// Named interceptors available to configuration files
#[derive(Debug, Clone, Default)]
pub struct InterceptorRegistry {
    interceptors: HashMap<String, Interceptor>,
}

impl InterceptorRegistry {
    /// Create a new empty registry
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a registry holding the built-in interceptors
    pub fn with_builtins() -> Self {
        let mut registry = Self::new();
        registry.register_fn("passthrough", |call| call.proceed());
        registry.register_fn("trace", |call: Interception| {
            let info = call.resolve.info();
            info!(
                operation = %info.field_name,
                parent_type = %info.parent_type,
                args = call.args.len(),
                "Intercepted operation"
            );
            call.proceed()
        });
        registry.register_fn("nullify", |_| future::ready(Ok::<_, anyhow::Error>(Value::Null)));
        registry
    }

    /// Register an interceptor, replacing any previous one with the same name
    pub fn register(&mut self, name: impl Into<String>, interceptor: Interceptor) {
        let name = name.into();
        debug!(name = %name, "Registered interceptor");
        self.interceptors.insert(name, interceptor);
    }

    /// Register an async transform under a name
    pub fn register_fn<F, Fut>(&mut self, name: impl Into<String>, f: F)
    where
        F: Fn(Interception) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = FieldResult> + Send + 'static,
    {
        self.register(name, Interceptor::new(f));
    }

    /// Get an interceptor by name
    pub fn get(&self, name: &str) -> Option<&Interceptor> {
        self.interceptors.get(name)
    }

    /// Registered names, sorted
    pub fn names(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.interceptors.keys().map(|s| s.as_str()).collect();
        names.sort_unstable();
        names
    }

    pub fn len(&self) -> usize {
        self.interceptors.len()
    }

    pub fn is_empty(&self) -> bool {
        self.interceptors.is_empty()
    }

    /// Compile configured rules into a rule set, keeping their order
    pub fn build_rule_set(&self, rules: &[RuleConfig]) -> Result<RuleSet, ConfigError> {
        let mut set = RuleSet::new();

        for (index, config) in rules.iter().enumerate() {
            let rule = match config.action {
                RuleAction::Allow => Rule::Allow,
                RuleAction::Deny => Rule::Deny,
                RuleAction::Intercept => Rule::Intercept(self.interceptor_for(index, config)?),
            };
            set.insert(config.pattern.clone(), rule);
        }

        Ok(set)
    }

    fn interceptor_for(&self, index: usize, config: &RuleConfig) -> Result<Interceptor, ConfigError> {
        if let Some(name) = &config.interceptor {
            return self
                .get(name)
                .cloned()
                .ok_or_else(|| ConfigError::UnknownInterceptor { name: name.clone() });
        }

        if !config.set_args.is_empty() {
            return Ok(Interceptor::override_args(config.set_args.clone()));
        }

        Err(ConfigError::Missing {
            field: format!("rules[{}].interceptor", index),
        })
    }
}
