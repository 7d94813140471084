//! Rule resolver
//!
//! Turns a raw [`RuleSet`] into one rule per schema operation. For each
//! operation the precedence is (highest to lowest):
//! 1. The first non-deny pattern (allow or intercept) that matches, in
//!    declaration order
//! 2. Any matching deny pattern
//! 3. Allow (the default)
//!
//! Any non-deny match beats any deny match, whatever the patterns look like.
//! This lets `{"*": false, "hello": true}` express an allowlist and
//! `{"hello": false}` a denylist.

use crate::error::InvalidRuleSetError;
use crate::rules::patterns::{Pattern, PatternMatcher};
use crate::rules::types::{Decision, Rule, RuleSet};
use std::collections::{BTreeMap, BTreeSet};
use tracing::{debug, trace, warn};

/// One rule for every operation of a schema
#[derive(Debug, Clone, Default)]
pub struct ResolvedRules {
    rules: BTreeMap<String, Rule>,
}

impl ResolvedRules {
    /// Get the rule for an operation
    pub fn get(&self, name: &str) -> Option<&Rule> {
        self.rules.get(name)
    }

    pub fn decision(&self, name: &str) -> Option<Decision> {
        self.get(name).map(Rule::decision)
    }

    /// All entries, sorted by operation name
    pub fn iter(&self) -> impl Iterator<Item = (&str, &Rule)> {
        self.rules.iter().map(|(k, v)| (k.as_str(), v))
    }

    /// Operations that survive (allowed or intercepted)
    pub fn allowed_names(&self) -> impl Iterator<Item = &str> {
        self.iter().filter(|(_, r)| !r.is_deny()).map(|(n, _)| n)
    }

    pub fn denied_names(&self) -> impl Iterator<Item = &str> {
        self.iter().filter(|(_, r)| r.is_deny()).map(|(n, _)| n)
    }

    pub fn len(&self) -> usize {
        self.rules.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }
}

/// Compiled rule set, ready to resolve operation names
pub struct RuleResolver<'a> {
    rule_set: &'a RuleSet,
    /// Patterns of deny rules
    deny: PatternMatcher,
    /// Non-deny rules in declaration order
    overrides: Vec<(Pattern, &'a Rule)>,
}

impl<'a> RuleResolver<'a> {
    /// Compile the patterns of a rule set
    pub fn new(rule_set: &'a RuleSet) -> Self {
        let deny = PatternMatcher::new(
            rule_set
                .iter()
                .filter(|(_, rule)| rule.is_deny())
                .map(|(pattern, _)| pattern),
        );
        let overrides = rule_set
            .iter()
            .filter(|(_, rule)| !rule.is_deny())
            .map(|(pattern, rule)| (Pattern::new(pattern), rule))
            .collect();

        Self {
            rule_set,
            deny,
            overrides,
        }
    }

    /// Resolve a rule for every operation name
    ///
    /// Fails if no operation would survive, including when there are no
    /// operations at all.
    pub fn resolve<I, S>(&self, names: I) -> Result<ResolvedRules, InvalidRuleSetError>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let names: BTreeSet<String> = names.into_iter().map(|n| n.as_ref().to_string()).collect();

        self.warn_unknown(&names);

        let rules: BTreeMap<String, Rule> = names
            .into_iter()
            .map(|name| {
                let rule = self.decide(&name);
                (name, rule)
            })
            .collect();

        let resolved = ResolvedRules { rules };
        let allowed = resolved.allowed_names().count();

        debug!(
            operations = resolved.len(),
            allowed = allowed,
            denied = resolved.len() - allowed,
            "Resolved rules"
        );

        if allowed == 0 {
            return Err(InvalidRuleSetError::all_denied(resolved.len()));
        }

        Ok(resolved)
    }

    /// Decide the rule for a single operation
    pub fn decide(&self, name: &str) -> Rule {
        if let Some((pattern, rule)) = self.overrides.iter().find(|(p, _)| p.matches(name)) {
            trace!(operation = name, pattern = %pattern, decision = %rule.decision(), "Matched rule");
            return (*rule).clone();
        }

        if let Some(pattern) = self.deny.find_match(name) {
            trace!(operation = name, pattern = pattern, "Matched deny rule");
            return Rule::Deny;
        }

        Rule::Allow
    }

    /// Warn about exact patterns that name no operation
    fn warn_unknown(&self, names: &BTreeSet<String>) {
        for pattern in self.rule_set.patterns() {
            if !Pattern::new(pattern).is_glob() && !names.contains(pattern) {
                warn!(pattern = pattern, "No such query/mutation in schema");
            }
        }
    }
}

/// Resolve `rule_set` against `names`
pub fn resolve_rules<I, S>(rule_set: &RuleSet, names: I) -> Result<ResolvedRules, InvalidRuleSetError>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    RuleResolver::new(rule_set).resolve(names)
}
