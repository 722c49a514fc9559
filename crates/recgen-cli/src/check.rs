//! # Check Subcommand
//!
//! Populates an instance of a schema's record type from a JSON datum,
//! writing every entry through its validated setter, then validates the
//! whole instance.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::Args;
use recgen_core::Datum;
use recgen_specific::{RecordInstance, RecordType};

/// Arguments for the check subcommand.
#[derive(Args, Debug)]
pub struct CheckArgs {
    /// Path to an Avro record schema.
    pub schema: PathBuf,

    /// Path to a JSON object holding the field values.
    pub datum: PathBuf,
}

/// Execute the check subcommand.
pub fn run_check(args: &CheckArgs) -> Result<u8> {
    let record_type = crate::load_record_type(&args.schema)?;
    let datum = read_datum(&args.datum)?;
    check_datum(&record_type, datum)
        .with_context(|| format!("checking {}", args.datum.display()))?;
    println!("ok");
    Ok(0)
}

/// Populate and validate an instance of `record_type` from `datum`.
pub fn check_datum(record_type: &RecordType, datum: Datum) -> Result<RecordInstance> {
    let instance = record_type.instance_from_datum(datum)?;
    record_type.validate_instance(&instance)?;
    tracing::debug!(record = %record_type, fields = instance.keys().len(), "instance validated");
    Ok(instance)
}

fn read_datum(path: &Path) -> Result<Datum> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("reading datum: {}", path.display()))?;
    let value: serde_json::Value = serde_json::from_str(&content)
        .with_context(|| format!("parsing datum JSON: {}", path.display()))?;
    Ok(Datum::from(value))
}
