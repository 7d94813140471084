//! Schema assembler
//!
//! Rebuilds a schema from the operations that survive a rule set.

use crate::error::InvalidRuleSetError;
use crate::rules::{ResolvedRules, Rule, RuleResolver, RuleSet};
use crate::schema::{ObjectType, Schema};
use crate::transform::operation::transform_operation;
use tracing::{debug, info, instrument};

/// Applies a rule set to schemas
pub struct SchemaAssembler<'a> {
    rules: &'a RuleSet,
}

impl<'a> SchemaAssembler<'a> {
    pub fn new(rules: &'a RuleSet) -> Self {
        Self { rules }
    }

    /// Resolve the rule set against every operation of `schema`
    pub fn resolve(&self, schema: &Schema) -> Result<ResolvedRules, InvalidRuleSetError> {
        RuleResolver::new(self.rules).resolve(schema.operation_names())
    }

    /// Build the transformed schema
    ///
    /// The Query type is always present, even if none of its operations
    /// survive. The Mutation type is dropped when the source has none or
    /// when every mutation is denied.
    #[instrument(skip_all, fields(rules = self.rules.len()))]
    pub fn assemble(&self, schema: &Schema) -> Result<Schema, InvalidRuleSetError> {
        let resolved = self.resolve(schema)?;
        Ok(self.assemble_resolved(schema, &resolved))
    }

    /// Build the transformed schema from rules already resolved for it
    pub fn assemble_resolved(&self, schema: &Schema, resolved: &ResolvedRules) -> Schema {
        let query = transform_type(schema.query_type(), resolved);
        let mutation = match schema.mutation_type().map(|m| transform_type(m, resolved)) {
            Some(mutation) if mutation.is_empty() => {
                debug!(type_name = %mutation.name, "Dropping empty mutation type");
                None
            }
            other => other,
        };

        let transformed = Schema::from_parts(query, mutation);
        info!(
            before = schema.operation_count(),
            after = transformed.operation_count(),
            "Transformed schema"
        );

        transformed
    }
}

fn transform_type(source: &ObjectType, resolved: &ResolvedRules) -> ObjectType {
    source
        .fields()
        .filter_map(|operation| match resolved.get(&operation.name) {
            Some(rule) => transform_operation(operation, rule),
            // Unresolved names get the default rule
            None => transform_operation(operation, &Rule::Allow),
        })
        .fold(source.empty_like(), ObjectType::with_field)
}

/// Apply `rules` to `schema`, returning a new schema
///
/// Fails with [`InvalidRuleSetError`] if the rules deny every operation.
pub fn transform_schema(schema: &Schema, rules: &RuleSet) -> Result<Schema, InvalidRuleSetError> {
    SchemaAssembler::new(rules).assemble(schema)
}
