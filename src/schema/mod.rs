//! Schema module
//!
//! The data model the rule engine works on: operations grouped into a
//! required Query type and an optional Mutation type. How a schema is
//! produced (hand-built or from a JSON document) does not matter to the
//! engine.

pub mod document;
pub mod resolver;
pub mod types;

pub use document::{SchemaDocument, load_schema};
pub use resolver::{
    Arguments, Context, FieldFuture, FieldResult, ResolveInfo, ResolveParams, Resolver,
};
pub use types::{Argument, ObjectType, OperationDescriptor, Schema, TypeRef};
