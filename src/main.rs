//! Schema Warden CLI
//!
//! Applies a rule file to a schema document and reports what survives.

use anyhow::Context as _;
use clap::{Parser, ValueEnum};
use schema_warden::{
    config::{AppConfig, LogFormat, load_config},
    rules::{Decision, InterceptorRegistry, ResolvedRules},
    schema::{Arguments, ResolveParams, Schema, SchemaDocument, load_schema},
    transform::SchemaAssembler,
};
use serde::Serialize;
use serde_json::Value;
use tracing::{error, info};
use tracing_subscriber::{EnvFilter, fmt, prelude::*};

/// Schema Warden - pattern-based filtering of query/mutation schemas
#[derive(Parser, Debug)]
#[command(name = "schema-warden")]
#[command(version, about, long_about = None)]
struct Args {
    /// Path to the schema document (JSON)
    #[arg(short, long, env = "SCHEMA_WARDEN_SCHEMA")]
    schema: String,

    /// Path to the rule configuration file
    #[arg(short, long, env = "SCHEMA_WARDEN_CONFIG")]
    config: Option<String>,

    /// Log level (trace, debug, info, warn, error); overrides the config file
    #[arg(long, env = "SCHEMA_WARDEN_LOG_LEVEL")]
    log_level: Option<String>,

    /// Output format
    #[arg(long, value_enum, default_value_t = OutputFormat::Text)]
    format: OutputFormat,

    /// Invoke this operation on the transformed schema
    #[arg(long)]
    call: Option<String>,

    /// Arguments for --call, as a JSON object
    #[arg(long, default_value = "{}", requires = "call")]
    args: String,

    /// Root value for --call, as a path to a JSON file
    #[arg(long, requires = "call")]
    root: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum OutputFormat {
    Text,
    Json,
}

/// Decision taken for one operation
#[derive(Debug, Serialize)]
struct OperationReport {
    category: String,
    name: String,
    decision: Decision,
}

#[derive(Debug, Serialize)]
struct Report {
    operations: Vec<OperationReport>,
    schema: SchemaDocument,
    #[serde(skip_serializing_if = "Option::is_none")]
    result: Option<Value>,
}

fn init_logging(config: &AppConfig, level: Option<&str>) {
    let level = level.unwrap_or(config.logging.level.as_str());
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));

    match config.logging.format {
        LogFormat::Pretty => tracing_subscriber::registry()
            .with(fmt::layer().with_writer(std::io::stderr))
            .with(filter)
            .init(),
        LogFormat::Json => tracing_subscriber::registry()
            .with(fmt::layer().json().with_writer(std::io::stderr))
            .with(filter)
            .init(),
    }
}

fn operation_reports(source: &Schema, resolved: &ResolvedRules) -> Vec<OperationReport> {
    source
        .categories()
        .flat_map(|category| {
            category.fields().map(|operation| OperationReport {
                category: category.name.clone(),
                name: operation.name.clone(),
                decision: resolved
                    .decision(&operation.name)
                    .unwrap_or(Decision::Allow),
            })
        })
        .collect()
}

async fn call_operation(schema: &Schema, args: &Args, name: &str) -> anyhow::Result<Value> {
    let arguments: Arguments =
        serde_json::from_str(&args.args).context("--args must be a JSON object")?;

    let parent = match &args.root {
        Some(path) => {
            let content = std::fs::read_to_string(path)
                .with_context(|| format!("Failed to read root value from {}", path))?;
            serde_json::from_str(&content).context("--root must contain JSON")?
        }
        None => Value::Null,
    };

    let category = schema
        .categories()
        .find(|category| category.field(name).is_some())
        .with_context(|| format!("Operation '{}' is not available in the transformed schema", name))?;

    info!(operation = name, category = %category.name, "Invoking operation");
    let params = ResolveParams::new(arguments).with_parent(parent);
    category.invoke(name, params)?.await
}

fn print_text(report: &Report) {
    for operation in &report.operations {
        println!(
            "{:<9} {}.{}",
            operation.decision.as_str(),
            operation.category,
            operation.name
        );
    }

    let kept = report
        .operations
        .iter()
        .filter(|o| o.decision != Decision::Deny)
        .count();
    println!();
    println!("{} of {} operations kept", kept, report.operations.len());
    if report.schema.mutation.is_none() {
        println!("Mutation type: absent");
    }

    if let Some(result) = &report.result {
        println!();
        println!("{}", result);
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Parse CLI arguments
    let args = Args::parse();

    // Load configuration
    let config = load_config(args.config.as_deref())?;

    // Initialize logging
    init_logging(&config, args.log_level.as_deref());

    info!(
        version = env!("CARGO_PKG_VERSION"),
        rules = config.rules.len(),
        "Starting schema-warden"
    );

    let source = load_schema(&args.schema)
        .inspect_err(|e| error!(error = %e, path = %args.schema, "Failed to load schema"))?;

    let registry = InterceptorRegistry::with_builtins();
    let rules = registry
        .build_rule_set(&config.rules)
        .inspect_err(|e| error!(error = %e, "Failed to build rule set"))?;

    let assembler = SchemaAssembler::new(&rules);
    let resolved = assembler
        .resolve(&source)
        .inspect_err(|e| error!(error = %e, "Rule resolution failed"))?;
    let transformed = assembler.assemble_resolved(&source, &resolved);
    let operations = operation_reports(&source, &resolved);

    let result = match &args.call {
        Some(name) => Some(call_operation(&transformed, &args, name).await?),
        None => None,
    };

    let report = Report {
        operations,
        schema: SchemaDocument::from_schema(&transformed),
        result,
    };

    match args.format {
        OutputFormat::Text => print_text(&report),
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&report)?),
    }

    Ok(())
}
