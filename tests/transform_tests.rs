//! Schema transformation tests
//!
//! Builds small executable schemas and checks which operations survive and
//! how intercepted operations behave when invoked.

use schema_warden::{
    Argument, Interception, ObjectType, OperationDescriptor, ResolveParams, Resolver, RuleSet,
    Schema, TypeRef, schema::Arguments, transform_schema,
};
use serde_json::{Value, json};

// =============================================================================
// Test Helpers
// =============================================================================

fn hello_query() -> ObjectType {
    ObjectType::new("Query").with_field(
        OperationDescriptor::new("hello", TypeRef::non_null("String"))
            .with_resolver(Resolver::sync(|_| Ok(json!("Hello world")))),
    )
}

fn hello_world_query() -> ObjectType {
    ObjectType::new("Query")
        .with_field(
            OperationDescriptor::new("hello", TypeRef::non_null("String"))
                .with_resolver(Resolver::sync(|_| Ok(json!("Hello")))),
        )
        .with_field(
            OperationDescriptor::new("world", TypeRef::non_null("String"))
                .with_resolver(Resolver::sync(|_| Ok(json!("world")))),
        )
}

fn alexa_mutation() -> ObjectType {
    ObjectType::new("Mutation").with_field(
        OperationDescriptor::new("alexaHello", TypeRef::non_null("String"))
            .with_arg(Argument::new("name", TypeRef::non_null("String")))
            .with_resolver(Resolver::sync(|params| {
                let name = params.str_arg("name").unwrap_or_default();
                Ok(json!(format!("Alexa: Hello world, {}", name)))
            })),
    )
}

fn name_args(name: &str) -> Arguments {
    let mut args = Arguments::new();
    args.insert("name".to_string(), json!(name));
    args
}

async fn call_mutation(schema: &Schema, name: &str, args: Arguments) -> Value {
    schema
        .mutation_type()
        .expect("mutation type")
        .invoke(name, ResolveParams::new(args))
        .expect("operation exists")
        .await
        .expect("operation succeeds")
}

// =============================================================================
// Filtering
// =============================================================================

#[tokio::test]
async fn test_empty_rules_yield_identity() {
    let schema = Schema::new(hello_query()).with_mutation(alexa_mutation());

    let transformed = transform_schema(&schema, &RuleSet::new()).unwrap();

    assert!(transformed.query_type().field("hello").is_some());
    assert!(transformed.mutation_type().unwrap().field("alexaHello").is_some());

    let result = transformed
        .query_type()
        .invoke("hello", ResolveParams::default())
        .unwrap()
        .await
        .unwrap();
    assert_eq!(result, json!("Hello world"));

    let result = call_mutation(&transformed, "alexaHello", name_args("Bob")).await;
    assert_eq!(result, json!("Alexa: Hello world, Bob"));
}

#[test]
fn test_exclude_a_query_field() {
    let schema = Schema::new(hello_world_query());
    let rules = RuleSet::new().deny("hello");

    let transformed = transform_schema(&schema, &rules).unwrap();

    let query = transformed.query_type();
    assert!(query.field("hello").is_none());
    assert!(query.field("world").is_some());
}

#[test]
fn test_exclude_everything_fails() {
    let schema = Schema::new(hello_world_query()).with_mutation(alexa_mutation());
    let rules = RuleSet::new().deny("*");

    assert!(transform_schema(&schema, &rules).is_err());
}

#[test]
fn test_exclude_everything_except_one_query() {
    let schema = Schema::new(hello_world_query()).with_mutation(alexa_mutation());
    let rules = RuleSet::new().deny("*").allow("hello");

    let transformed = transform_schema(&schema, &rules).unwrap();

    let query = transformed.query_type();
    assert!(query.field("hello").is_some());
    assert!(query.field("world").is_none());
    assert!(query.field("alexaHello").is_none());
    assert!(transformed.mutation_type().is_none());
    assert_eq!(transformed.operation_count(), 1);
}

#[test]
fn test_keep_only_a_mutation() {
    let schema = Schema::new(hello_world_query()).with_mutation(alexa_mutation());
    let rules = RuleSet::new().deny("*").allow("alexaHello");

    let transformed = transform_schema(&schema, &rules).unwrap();

    assert!(transformed.query_type().is_empty());
    assert_eq!(transformed.query_type().name, "Query");
    assert!(transformed.mutation_type().unwrap().field("alexaHello").is_some());
}

#[test]
fn test_all_mutations_denied_removes_mutation_type() {
    let schema = Schema::new(hello_world_query()).with_mutation(alexa_mutation());
    let rules = RuleSet::new().deny("alexa*");

    let transformed = transform_schema(&schema, &rules).unwrap();

    assert!(transformed.mutation_type().is_none());
    assert_eq!(transformed.query_type().len(), 2);
}

#[test]
fn test_schema_without_mutation_stays_without() {
    let schema = Schema::new(hello_world_query());
    let transformed = transform_schema(&schema, &RuleSet::new()).unwrap();
    assert!(transformed.mutation_type().is_none());
}

#[test]
fn test_deny_prefix_allow_exact() {
    let schema = Schema::new(
        hello_world_query().with_field(OperationDescriptor::new(
            "helloWorld",
            TypeRef::named("String"),
        )),
    );
    let rules = RuleSet::new().deny("hello*").allow("hello");

    let transformed = transform_schema(&schema, &rules).unwrap();

    let names: Vec<_> = transformed.query_type().field_names().collect();
    assert_eq!(names, vec!["hello", "world"]);
}

// =============================================================================
// Interception
// =============================================================================

#[tokio::test]
async fn test_overwrite_args() {
    let schema = Schema::new(hello_query()).with_mutation(alexa_mutation());
    let rules = RuleSet::new().intercept("alexaHello", |call: Interception| {
        call.resolve.invoke(name_args("John"))
    });

    let transformed = transform_schema(&schema, &rules).unwrap();

    let result = call_mutation(&transformed, "alexaHello", name_args("Bob")).await;
    assert_eq!(result, json!("Alexa: Hello world, John"));
}

#[tokio::test]
async fn test_overwrite_data() {
    let schema = Schema::new(hello_query()).with_mutation(alexa_mutation());
    let rules = RuleSet::new().intercept("alexaHello", |call: Interception| async move {
        let result = call.resolve.invoke(call.args.clone()).await?;
        let text = result.as_str().unwrap_or_default().replace("Bob", "Alice");
        Ok::<_, anyhow::Error>(json!(text))
    });

    let transformed = transform_schema(&schema, &rules).unwrap();

    let result = call_mutation(&transformed, "alexaHello", name_args("Bob")).await;
    assert_eq!(result, json!("Alexa: Hello world, Alice"));
}

#[tokio::test]
async fn test_intercept_fabricates_result() {
    let schema = Schema::new(hello_query());
    let rules = RuleSet::new().intercept("hello", |_| async {
        Ok::<_, anyhow::Error>(json!("intercepted"))
    });

    let transformed = transform_schema(&schema, &rules).unwrap();

    let result = transformed
        .query_type()
        .invoke("hello", ResolveParams::default())
        .unwrap()
        .await
        .unwrap();
    assert_eq!(result, json!("intercepted"));
}

#[tokio::test]
async fn test_intercept_sees_parent_and_context() {
    let query = ObjectType::new("Query").with_field(
        OperationDescriptor::new("viewer", TypeRef::named("String")).with_resolver(
            Resolver::sync(|params| {
                let user = params.context::<String>().cloned().unwrap_or_default();
                Ok(json!(format!("{}@{}", user, params.parent["tenant"].as_str().unwrap_or(""))))
            }),
        ),
    );
    let schema = Schema::new(query);
    let rules = RuleSet::new().intercept("viewer", |call: Interception| async move {
        assert_eq!(call.resolve.info().field_name, "viewer");
        assert_eq!(call.resolve.parent()["tenant"], json!("acme"));
        call.proceed().await
    });

    let transformed = transform_schema(&schema, &rules).unwrap();
    let params = ResolveParams::default()
        .with_parent(json!({ "tenant": "acme" }))
        .with_context("alice".to_string());

    let result = transformed
        .query_type()
        .invoke("viewer", params)
        .unwrap()
        .await
        .unwrap();
    assert_eq!(result, json!("alice@acme"));
}

#[tokio::test]
async fn test_transform_does_not_touch_source() {
    let schema = Schema::new(hello_query()).with_mutation(alexa_mutation());
    let rules = RuleSet::new().intercept("alexaHello", |call: Interception| {
        call.resolve.invoke(name_args("John"))
    });

    let _transformed = transform_schema(&schema, &rules).unwrap();

    let result = call_mutation(&schema, "alexaHello", name_args("Bob")).await;
    assert_eq!(result, json!("Alexa: Hello world, Bob"));
}

#[tokio::test]
async fn test_transform_twice_stacks_interceptors() {
    let schema = Schema::new(hello_query()).with_mutation(alexa_mutation());
    let upper = RuleSet::new().intercept("alexaHello", |call: Interception| async move {
        let value = call.proceed().await?;
        Ok::<_, anyhow::Error>(json!(value.as_str().unwrap_or_default().to_uppercase()))
    });
    let rename = RuleSet::new().intercept("alexaHello", |call: Interception| {
        call.resolve.invoke(name_args("John"))
    });

    let once = transform_schema(&schema, &upper).unwrap();
    let twice = transform_schema(&once, &rename).unwrap();

    let result = call_mutation(&twice, "alexaHello", name_args("Bob")).await;
    assert_eq!(result, json!("ALEXA: HELLO WORLD, JOHN"));
}
