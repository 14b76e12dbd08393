//! `daterule` CLI — validate JSON records against date schema configs.
//!
//! ## Usage
//!
//! ```sh
//! # Validate a record (stdin) against a schema config file
//! echo '{"created":"2026-03-01","expires":"2026-02-01"}' | daterule check --schema rules.json
//!
//! # Validate from a file
//! daterule check --schema rules.json -i record.json
//!
//! # Apply an ambient default timezone
//! daterule check --schema rules.json -i record.json --timezone America/New_York
//!
//! # Print the coerced ISO value of a single field
//! daterule coerce --schema rules.json --field created -i record.json
//! ```
//!
//! The schema config file is a JSON map of field name to date schema, e.g.
//!
//! ```json
//! {
//!   "created": { "startOf": "day", "rules": [{ "op": "gte", "date": "2020-01-01" }] },
//!   "expires": { "min": { "ref": "created" } }
//! }
//! ```

use anyhow::{Context, Result};
use chrono_tz::Tz;
use clap::{Parser, Subcommand};
use daterule_core::{Coerced, DateSchema, Input, ValidationContext};
use std::collections::BTreeMap;
use std::io::{self, Read};
use std::process;

type SchemaMap = BTreeMap<String, DateSchema>;
type Record = serde_json::Map<String, serde_json::Value>;

#[derive(Parser)]
#[command(
    name = "daterule",
    version,
    about = "Date rule validation for JSON records"
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Validate every configured field of a JSON record
    Check {
        /// Schema config file: a JSON map of field name to date schema
        #[arg(short, long)]
        schema: String,
        /// Input record file (reads from stdin if omitted)
        #[arg(short, long)]
        input: Option<String>,
        /// Ambient default timezone (IANA name), applied when a field's
        /// schema sets no zone of its own
        #[arg(long)]
        timezone: Option<String>,
    },
    /// Print the coerced ISO value of a single field
    Coerce {
        /// Schema config file: a JSON map of field name to date schema
        #[arg(short, long)]
        schema: String,
        /// Field to coerce
        #[arg(short, long)]
        field: String,
        /// Input record file (reads from stdin if omitted)
        #[arg(short, long)]
        input: Option<String>,
        /// Ambient default timezone (IANA name)
        #[arg(long)]
        timezone: Option<String>,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    match cli.command {
        Commands::Check {
            schema,
            input,
            timezone,
        } => {
            let schemas = load_schemas(&schema)?;
            let record = read_record(input.as_deref())?;
            let ctx = build_context(&schemas, &record, timezone.as_deref())?;

            let mut failed = false;
            for (field, field_schema) in &schemas {
                let result = field_schema.validate(&field_input(&record, field), &ctx);
                for violation in &result.violations {
                    println!("{}: {}: {}", field, violation.code(), violation);
                    failed = true;
                }
            }
            if failed {
                process::exit(1);
            }
        }
        Commands::Coerce {
            schema,
            field,
            input,
            timezone,
        } => {
            let schemas = load_schemas(&schema)?;
            let field_schema = schemas
                .get(&field)
                .with_context(|| format!("No schema configured for field: {}", field))?;
            let record = read_record(input.as_deref())?;
            let ctx = build_context(&schemas, &record, timezone.as_deref())?;

            let result = field_schema.validate(&field_input(&record, &field), &ctx);
            match result.value {
                Coerced::Valid(value) => println!("{}", value.to_iso()),
                Coerced::Missing => println!("(missing)"),
                Coerced::Invalid { raw } => {
                    eprintln!("invalid date: {}", raw);
                    process::exit(1);
                }
            }
        }
    }

    Ok(())
}

fn load_schemas(path: &str) -> Result<SchemaMap> {
    let text = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read schema file: {}", path))?;
    serde_json::from_str(&text).with_context(|| format!("Failed to parse schema file: {}", path))
}

fn read_record(path: Option<&str>) -> Result<Record> {
    let text = match path {
        Some(path) => std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read file: {}", path))?,
        None => {
            let mut buf = String::new();
            io::stdin()
                .read_to_string(&mut buf)
                .context("Failed to read from stdin")?;
            buf
        }
    };
    let value: serde_json::Value =
        serde_json::from_str(&text).context("Record must be valid JSON")?;
    match value {
        serde_json::Value::Object(map) => Ok(map),
        _ => anyhow::bail!("Record must be a JSON object"),
    }
}

/// Map a record entry onto rule input. Strings are ISO candidates; null and
/// absent are missing; other scalars become text that will fail coercion,
/// mirroring loosely-typed host engines.
fn field_input(record: &Record, field: &str) -> Input {
    match record.get(field) {
        None | Some(serde_json::Value::Null) => Input::Missing,
        Some(serde_json::Value::String(text)) => Input::Text(text.clone()),
        Some(other) => Input::Text(other.to_string()),
    }
}

/// First pass: coerce every configured field so that cross-field references
/// can resolve against sibling values in the second pass.
fn build_context(schemas: &SchemaMap, record: &Record, timezone: Option<&str>) -> Result<ValidationContext> {
    let mut ctx = ValidationContext::new();
    if let Some(zone) = timezone {
        let tz: Tz = zone
            .parse()
            .map_err(|_| anyhow::anyhow!("Invalid timezone: {}", zone))?;
        ctx = ctx.with_timezone(tz);
    }

    let base = ctx.clone();
    for (field, schema) in schemas {
        let result = schema.validate(&field_input(record, field), &base);
        if let Some(value) = result.value.as_value() {
            ctx = ctx.with_field(field.clone(), value);
        }
    }
    Ok(ctx)
}
