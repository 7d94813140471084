//! Rule types
//!
//! Core types used by the rule engine.

use crate::rules::intercept::{Interception, Interceptor};
use crate::schema::FieldResult;
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::future::Future;

/// Per-operation decision
#[derive(Debug, Clone)]
pub enum Rule {
    /// Exclude the operation from the schema
    Deny,
    /// Keep the operation unchanged
    Allow,
    /// Keep the operation and route its invocations through a transform
    Intercept(Interceptor),
}

impl Rule {
    /// Build an intercept rule from an async transform
    pub fn intercept<F, Fut>(f: F) -> Self
    where
        F: Fn(Interception) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = FieldResult> + Send + 'static,
    {
        Rule::Intercept(Interceptor::new(f))
    }

    pub fn is_deny(&self) -> bool {
        matches!(self, Rule::Deny)
    }

    pub fn is_allow(&self) -> bool {
        matches!(self, Rule::Allow)
    }

    pub fn is_intercept(&self) -> bool {
        matches!(self, Rule::Intercept(_))
    }

    /// Data-only view of this rule
    pub fn decision(&self) -> Decision {
        match self {
            Rule::Deny => Decision::Deny,
            Rule::Allow => Decision::Allow,
            Rule::Intercept(_) => Decision::Intercept,
        }
    }
}

/// `false` denies, `true` allows
impl From<bool> for Rule {
    fn from(allow: bool) -> Self {
        if allow { Rule::Allow } else { Rule::Deny }
    }
}

impl From<Interceptor> for Rule {
    fn from(interceptor: Interceptor) -> Self {
        Rule::Intercept(interceptor)
    }
}

/// The kind of a rule, without its transform
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Decision {
    Deny,
    Allow,
    Intercept,
}

impl Decision {
    pub const fn as_str(&self) -> &'static str {
        match self {
            Decision::Deny => "deny",
            Decision::Allow => "allow",
            Decision::Intercept => "intercept",
        }
    }
}

impl fmt::Display for Decision {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Raw rules keyed by pattern, in declaration order
///
/// Declaration order decides which rule applies when several non-deny
/// patterns match the same operation, so this is an ordered map. Inserting
/// an existing pattern replaces its rule but keeps its original position.
#[derive(Debug, Clone, Default)]
pub struct RuleSet {
    rules: IndexMap<String, Rule>,
}

impl RuleSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a rule (builder style)
    pub fn with(mut self, pattern: impl Into<String>, rule: impl Into<Rule>) -> Self {
        self.insert(pattern, rule);
        self
    }

    pub fn allow(self, pattern: impl Into<String>) -> Self {
        self.with(pattern, Rule::Allow)
    }

    pub fn deny(self, pattern: impl Into<String>) -> Self {
        self.with(pattern, Rule::Deny)
    }

    pub fn intercept<F, Fut>(self, pattern: impl Into<String>, f: F) -> Self
    where
        F: Fn(Interception) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = FieldResult> + Send + 'static,
    {
        self.with(pattern, Rule::intercept(f))
    }

    /// Add a rule, returning the rule it replaced
    pub fn insert(&mut self, pattern: impl Into<String>, rule: impl Into<Rule>) -> Option<Rule> {
        self.rules.insert(pattern.into(), rule.into())
    }

    /// Get the rule declared for a pattern
    pub fn get(&self, pattern: &str) -> Option<&Rule> {
        self.rules.get(pattern)
    }

    /// Rules in declaration order
    pub fn iter(&self) -> impl Iterator<Item = (&str, &Rule)> {
        self.rules.iter().map(|(k, v)| (k.as_str(), v))
    }

    pub fn patterns(&self) -> impl Iterator<Item = &str> {
        self.rules.keys().map(|k| k.as_str())
    }

    pub fn len(&self) -> usize {
        self.rules.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }
}

impl<P, R> FromIterator<(P, R)> for RuleSet
where
    P: Into<String>,
    R: Into<Rule>,
{
    fn from_iter<I: IntoIterator<Item = (P, R)>>(iter: I) -> Self {
        let mut set = RuleSet::new();
        for (pattern, rule) in iter {
            set.insert(pattern, rule);
        }
        set
    }
}
