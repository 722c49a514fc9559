//! # Inspect Subcommand
//!
//! Compiles a schema file, builds its record type, and describes the
//! accessors the type exposes.

use std::fmt;
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Args;
use recgen_core::SchemaType;
use recgen_specific::RecordType;

/// Arguments for the inspect subcommand.
#[derive(Args, Debug)]
pub struct InspectArgs {
    /// Path to an Avro record schema (`.avsc`/`.json`, or `.yaml`/`.yml`).
    pub schema: PathBuf,

    /// Print the schema's JSON rendering instead of the accessor table.
    #[arg(long)]
    pub json: bool,
}

/// Execute the inspect subcommand.
pub fn run_inspect(args: &InspectArgs) -> Result<u8> {
    let record_type = crate::load_record_type(&args.schema)?;
    if args.json {
        let schema = SchemaType::Record(record_type.schema().clone());
        let rendered =
            serde_json::to_string_pretty(&schema.to_json()).context("rendering schema JSON")?;
        println!("{rendered}");
    } else {
        print!("{}", Description(&record_type));
    }
    Ok(0)
}

/// The human-readable description printed by `inspect`.
pub fn describe(record_type: &RecordType) -> String {
    Description(record_type).to_string()
}

struct Description<'a>(&'a RecordType);

impl fmt::Display for Description<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let record_type = self.0;
        writeln!(f, "record {}", record_type.fullname())?;
        if let Some(doc) = record_type.doc() {
            writeln!(f, "  {doc}")?;
        }
        for accessor in record_type.accessors() {
            writeln!(
                f,
                "  {}: {}  # {}",
                accessor.name(),
                type_label(accessor.field_type()),
                accessor.doc()
            )?;
        }
        Ok(())
    }
}

/// Short label for a field type: named types by full name, containers
/// by their element types.
fn type_label(ty: &SchemaType) -> String {
    match ty {
        SchemaType::Array(items) => format!("array<{}>", type_label(items)),
        SchemaType::Map(values) => format!("map<{}>", type_label(values)),
        SchemaType::Union(branches) => branches
            .iter()
            .map(type_label)
            .collect::<Vec<_>>()
            .join(" | "),
        other => other
            .fullname()
            .unwrap_or_else(|| other.type_name().to_string()),
    }
}
