//! Schema data model
//!
//! Core types describing a schema: operations, their categories, and the
//! schema container. The rule engine only reads and clones these values.

use crate::error::SchemaError;
use crate::schema::resolver::{FieldFuture, ResolveInfo, ResolveParams, Resolver};
use indexmap::IndexMap;
use serde_json::Value;
use std::collections::BTreeSet;
use std::fmt;
use std::str::FromStr;

/// Reference to a type, e.g. `String`, `[Int!]` or `Starship!`
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum TypeRef {
    Named(String),
    List(Box<TypeRef>),
    NonNull(Box<TypeRef>),
}

impl TypeRef {
    pub fn named(name: impl Into<String>) -> Self {
        TypeRef::Named(name.into())
    }

    /// Shorthand for a non-null named type (`Name!`)
    pub fn non_null(name: impl Into<String>) -> Self {
        TypeRef::NonNull(Box::new(TypeRef::named(name)))
    }

    pub fn list(inner: TypeRef) -> Self {
        TypeRef::List(Box::new(inner))
    }

    /// The innermost named type
    pub fn base_name(&self) -> &str {
        match self {
            TypeRef::Named(name) => name,
            TypeRef::List(inner) | TypeRef::NonNull(inner) => inner.base_name(),
        }
    }
}

impl fmt::Display for TypeRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TypeRef::Named(name) => write!(f, "{}", name),
            TypeRef::List(inner) => write!(f, "[{}]", inner),
            TypeRef::NonNull(inner) => write!(f, "{}!", inner),
        }
    }
}

impl FromStr for TypeRef {
    type Err = SchemaError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let invalid = || SchemaError::InvalidType { ty: s.to_string() };
        let trimmed = s.trim();

        if let Some(inner) = trimmed.strip_suffix('!') {
            let inner: TypeRef = inner.parse().map_err(|_| invalid())?;
            if matches!(inner, TypeRef::NonNull(_)) {
                return Err(invalid());
            }
            return Ok(TypeRef::NonNull(Box::new(inner)));
        }

        if let Some(inner) = trimmed.strip_prefix('[') {
            let inner = inner.strip_suffix(']').ok_or_else(invalid)?;
            let inner: TypeRef = inner.parse().map_err(|_| invalid())?;
            return Ok(TypeRef::list(inner));
        }

        let mut chars = trimmed.chars();
        match chars.next() {
            Some(c) if c.is_ascii_alphabetic() || c == '_' => {}
            _ => return Err(invalid()),
        }
        if !chars.all(|c| c.is_ascii_alphanumeric() || c == '_') {
            return Err(invalid());
        }

        Ok(TypeRef::named(trimmed))
    }
}

/// An argument accepted by an operation
#[derive(Debug, Clone, PartialEq)]
pub struct Argument {
    pub name: String,
    pub ty: TypeRef,
    pub default_value: Option<Value>,
    pub description: Option<String>,
}

impl Argument {
    pub fn new(name: impl Into<String>, ty: TypeRef) -> Self {
        Self {
            name: name.into(),
            ty,
            default_value: None,
            description: None,
        }
    }

    pub fn with_default(mut self, value: Value) -> Self {
        self.default_value = Some(value);
        self
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }
}

/// One callable member of a category (a query or a mutation)
#[derive(Debug, Clone)]
pub struct OperationDescriptor {
    /// Operation name, unique within its category
    pub name: String,
    /// Return type
    pub ty: TypeRef,
    /// Arguments in declaration order
    pub args: Vec<Argument>,
    pub description: Option<String>,
    pub deprecation_reason: Option<String>,
    /// Explicit handler; `None` means the default property resolver
    pub resolver: Option<Resolver>,
}

impl OperationDescriptor {
    pub fn new(name: impl Into<String>, ty: TypeRef) -> Self {
        Self {
            name: name.into(),
            ty,
            args: Vec::new(),
            description: None,
            deprecation_reason: None,
            resolver: None,
        }
    }

    pub fn with_arg(mut self, arg: Argument) -> Self {
        self.args.push(arg);
        self
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    pub fn with_deprecation(mut self, reason: impl Into<String>) -> Self {
        self.deprecation_reason = Some(reason.into());
        self
    }

    pub fn with_resolver(mut self, resolver: Resolver) -> Self {
        self.resolver = Some(resolver);
        self
    }

    pub fn is_deprecated(&self) -> bool {
        self.deprecation_reason.is_some()
    }

    /// Get an argument by name
    pub fn arg(&self, name: &str) -> Option<&Argument> {
        self.args.iter().find(|a| a.name == name)
    }

    /// The handler that runs when this operation is invoked
    pub fn effective_resolver(&self) -> Resolver {
        self.resolver.clone().unwrap_or_else(Resolver::property)
    }

    /// Invoke the handler with the given params as-is
    pub fn invoke(&self, params: ResolveParams) -> FieldFuture {
        match &self.resolver {
            Some(resolver) => resolver.call(params),
            None => Resolver::property().call(params),
        }
    }
}

/// A category of operations (the Query or Mutation type)
#[derive(Debug, Clone)]
pub struct ObjectType {
    pub name: String,
    pub description: Option<String>,
    /// Names of the interfaces this type declares
    pub interfaces: Vec<String>,
    fields: IndexMap<String, OperationDescriptor>,
}

impl ObjectType {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            description: None,
            interfaces: Vec::new(),
            fields: IndexMap::new(),
        }
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    pub fn with_interface(mut self, interface: impl Into<String>) -> Self {
        self.interfaces.push(interface.into());
        self
    }

    /// Add an operation, replacing any previous one with the same name
    pub fn with_field(mut self, field: OperationDescriptor) -> Self {
        self.fields.insert(field.name.clone(), field);
        self
    }

    /// Add an operation, rejecting duplicates
    pub fn add_field(&mut self, field: OperationDescriptor) -> Result<(), SchemaError> {
        if self.fields.contains_key(&field.name) {
            return Err(SchemaError::DuplicateOperation {
                category: self.name.clone(),
                name: field.name,
            });
        }
        self.fields.insert(field.name.clone(), field);
        Ok(())
    }

    /// Copy this type's name, description and interfaces with no operations
    pub fn empty_like(&self) -> Self {
        Self {
            name: self.name.clone(),
            description: self.description.clone(),
            interfaces: self.interfaces.clone(),
            fields: IndexMap::new(),
        }
    }

    /// Get an operation by name
    pub fn field(&self, name: &str) -> Option<&OperationDescriptor> {
        self.fields.get(name)
    }

    /// Operations in declaration order
    pub fn fields(&self) -> impl Iterator<Item = &OperationDescriptor> {
        self.fields.values()
    }

    pub fn field_names(&self) -> impl Iterator<Item = &str> {
        self.fields.keys().map(|s| s.as_str())
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    /// Invoke an operation of this type
    ///
    /// Fills the execution info for the operation and applies argument
    /// defaults for arguments the caller did not supply.
    pub fn invoke(&self, name: &str, params: ResolveParams) -> Result<FieldFuture, SchemaError> {
        let field = self
            .fields
            .get(name)
            .ok_or_else(|| SchemaError::UnknownOperation {
                category: self.name.clone(),
                name: name.to_string(),
            })?;

        let mut params = params.with_info(ResolveInfo::new(&self.name, name));
        for arg in &field.args {
            if let Some(default) = &arg.default_value
                && !params.args.contains_key(&arg.name)
            {
                params.args.insert(arg.name.clone(), default.clone());
            }
        }

        Ok(field.invoke(params))
    }
}

/// Top-level schema: one Query type and an optional Mutation type
#[derive(Debug, Clone)]
pub struct Schema {
    query: ObjectType,
    mutation: Option<ObjectType>,
}

impl Schema {
    pub fn new(query: ObjectType) -> Self {
        Self {
            query,
            mutation: None,
        }
    }

    pub fn with_mutation(mut self, mutation: ObjectType) -> Self {
        self.mutation = Some(mutation);
        self
    }

    pub(crate) fn from_parts(query: ObjectType, mutation: Option<ObjectType>) -> Self {
        Self { query, mutation }
    }

    pub fn query_type(&self) -> &ObjectType {
        &self.query
    }

    pub fn mutation_type(&self) -> Option<&ObjectType> {
        self.mutation.as_ref()
    }

    /// All categories, Query first
    pub fn categories(&self) -> impl Iterator<Item = &ObjectType> {
        std::iter::once(&self.query).chain(self.mutation.iter())
    }

    /// Union of all operation names across categories
    pub fn operation_names(&self) -> BTreeSet<String> {
        self.categories()
            .flat_map(|c| c.field_names())
            .map(str::to_string)
            .collect()
    }

    /// Total number of operations across categories
    pub fn operation_count(&self) -> usize {
        self.categories().map(ObjectType::len).sum()
    }
}
