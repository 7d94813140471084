//! Transform module
//!
//! Applies resolved rules to operations and reassembles the schema.

pub mod assembler;
pub mod operation;

pub use assembler::{SchemaAssembler, transform_schema};
pub use operation::transform_operation;
