//! JSON schema documents
//!
//! A schema document lists the categories of a schema with their operations
//! and argument types. Operations built from a document have no explicit
//! resolver; they read their result off the root value.
//!
//! ```json
//! {
//!   "query": {
//!     "name": "Query",
//!     "fields": [
//!       { "name": "hello", "type": "String!" },
//!       { "name": "Starship", "type": "Starship",
//!         "args": [{ "name": "name", "type": "String" }] }
//!     ]
//!   },
//!   "mutation": {
//!     "name": "Mutation",
//!     "fields": [{ "name": "alexaHello", "type": "String!",
//!                  "args": [{ "name": "name", "type": "String!" }] }]
//!   }
//! }
//! ```

use crate::error::SchemaError;
use crate::schema::types::{Argument, ObjectType, OperationDescriptor, Schema, TypeRef};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::path::Path;

/// Root of a schema document
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct SchemaDocument {
    pub query: TypeDocument,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub mutation: Option<TypeDocument>,
}

/// One category in a schema document
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct TypeDocument {
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub interfaces: Vec<String>,
    #[serde(default)]
    pub fields: Vec<FieldDocument>,
}

/// One operation in a schema document
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields, rename_all = "camelCase")]
pub struct FieldDocument {
    pub name: String,
    #[serde(rename = "type")]
    pub ty: String,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub args: Vec<ArgumentDocument>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub deprecation_reason: Option<String>,
}

/// One argument in a schema document
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields, rename_all = "camelCase")]
pub struct ArgumentDocument {
    pub name: String,
    #[serde(rename = "type")]
    pub ty: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub default_value: Option<Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

impl SchemaDocument {
    /// Parse a document from a JSON string
    pub fn from_json(json: &str) -> Result<Self, SchemaError> {
        Ok(serde_json::from_str(json)?)
    }

    /// Read and parse a document from a file
    pub fn from_path(path: impl AsRef<Path>) -> Result<Self, SchemaError> {
        let content = std::fs::read_to_string(path)?;
        Self::from_json(&content)
    }

    /// Describe an existing schema (resolvers are not represented)
    pub fn from_schema(schema: &Schema) -> Self {
        Self {
            query: TypeDocument::from_type(schema.query_type()),
            mutation: schema.mutation_type().map(TypeDocument::from_type),
        }
    }

    /// Build the schema this document describes
    pub fn into_schema(self) -> Result<Schema, SchemaError> {
        let query = self.query.into_type()?;
        let schema = Schema::new(query);

        match self.mutation {
            Some(mutation) => Ok(schema.with_mutation(mutation.into_type()?)),
            None => Ok(schema),
        }
    }
}

impl TypeDocument {
    fn from_type(ty: &ObjectType) -> Self {
        Self {
            name: ty.name.clone(),
            description: ty.description.clone(),
            interfaces: ty.interfaces.clone(),
            fields: ty
                .fields()
                .map(|field| FieldDocument {
                    name: field.name.clone(),
                    ty: field.ty.to_string(),
                    args: field
                        .args
                        .iter()
                        .map(|arg| ArgumentDocument {
                            name: arg.name.clone(),
                            ty: arg.ty.to_string(),
                            default_value: arg.default_value.clone(),
                            description: arg.description.clone(),
                        })
                        .collect(),
                    description: field.description.clone(),
                    deprecation_reason: field.deprecation_reason.clone(),
                })
                .collect(),
        }
    }

    fn into_type(self) -> Result<ObjectType, SchemaError> {
        let mut object = ObjectType::new(self.name);
        object.description = self.description;
        object.interfaces = self.interfaces;

        for field in self.fields {
            let ty: TypeRef = field.ty.parse()?;
            let mut operation = OperationDescriptor::new(field.name, ty);
            operation.description = field.description;
            operation.deprecation_reason = field.deprecation_reason;

            for arg in field.args {
                let ty: TypeRef = arg.ty.parse()?;
                let mut argument = Argument::new(arg.name, ty);
                argument.default_value = arg.default_value;
                argument.description = arg.description;
                operation.args.push(argument);
            }

            object.add_field(operation)?;
        }

        Ok(object)
    }
}

/// Load a schema from a JSON document on disk
pub fn load_schema(path: impl AsRef<Path>) -> Result<Schema, SchemaError> {
    SchemaDocument::from_path(path)?.into_schema()
}

#[cfg(test)]
mod tests {
    use super::*;

    const DOCUMENT: &str = r#"
{
  "query": {
    "name": "Query",
    "description": "Entry points",
    "fields": [
      { "name": "hello", "type": "String!" },
      { "name": "allPersons", "type": "[Person!]!",
        "args": [{ "name": "first", "type": "Int", "defaultValue": 10 }] }
    ]
  },
  "mutation": {
    "name": "Mutation",
    "fields": [
      { "name": "alexaHello", "type": "String!",
        "args": [{ "name": "name", "type": "String!" }],
        "deprecationReason": "use hello" }
    ]
  }
}
"#;

    #[test]
    fn test_parse_document() {
        let schema = SchemaDocument::from_json(DOCUMENT)
            .unwrap()
            .into_schema()
            .unwrap();

        let query = schema.query_type();
        assert_eq!(query.name, "Query");
        assert_eq!(query.description.as_deref(), Some("Entry points"));
        assert_eq!(query.field_names().collect::<Vec<_>>(), vec!["hello", "allPersons"]);

        let all_persons = query.field("allPersons").unwrap();
        assert_eq!(all_persons.ty.to_string(), "[Person!]!");
        let first = all_persons.arg("first").unwrap();
        assert_eq!(first.default_value, Some(serde_json::json!(10)));

        let alexa = schema.mutation_type().unwrap().field("alexaHello").unwrap();
        assert!(alexa.is_deprecated());
        assert!(alexa.resolver.is_none());
    }

    #[test]
    fn test_document_without_mutation() {
        let json = r#"{ "query": { "name": "Query", "fields": [{ "name": "a", "type": "Int" }] } }"#;
        let schema = SchemaDocument::from_json(json).unwrap().into_schema().unwrap();
        assert!(schema.mutation_type().is_none());
    }

    #[test]
    fn test_invalid_type_rejected() {
        let json = r#"{ "query": { "name": "Query", "fields": [{ "name": "a", "type": "[Int" }] } }"#;
        let result = SchemaDocument::from_json(json).unwrap().into_schema();
        assert!(matches!(result, Err(SchemaError::InvalidType { .. })));
    }

    #[test]
    fn test_duplicate_field_rejected() {
        let json = r#"{ "query": { "name": "Query", "fields": [
            { "name": "a", "type": "Int" }, { "name": "a", "type": "String" }
        ] } }"#;
        let result = SchemaDocument::from_json(json).unwrap().into_schema();
        assert!(matches!(result, Err(SchemaError::DuplicateOperation { .. })));
    }

    #[test]
    fn test_unknown_key_rejected() {
        let json = r#"{ "query": { "name": "Query", "fields": [] }, "subscription": {} }"#;
        assert!(matches!(
            SchemaDocument::from_json(json),
            Err(SchemaError::InvalidJson(_))
        ));
    }

    #[test]
    fn test_from_schema_describes_operations() {
        let schema = SchemaDocument::from_json(DOCUMENT)
            .unwrap()
            .into_schema()
            .unwrap();
        let document = SchemaDocument::from_schema(&schema);

        assert_eq!(document.query.fields.len(), 2);
        assert_eq!(document.query.fields[1].args[0].name, "first");
        let mutation = document.mutation.unwrap();
        assert_eq!(mutation.fields[0].deprecation_reason.as_deref(), Some("use hello"));
    }
}
