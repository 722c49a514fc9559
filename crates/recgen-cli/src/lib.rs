//! # recgen-cli: Record Type Command-Line Interface
//!
//! A thin clap front end over the library crates.
//!
//! ## Subcommands
//!
//! - `inspect`: Compile a schema and describe its generated record type
//! - `check`: Populate an instance from a JSON datum and validate it
//!
//! Handlers return `anyhow::Result<u8>`, the process exit code on success.

pub mod check;
pub mod inspect;

use std::path::Path;

use anyhow::{Context, Result};
use recgen_specific::{RecordType, RecordTypeFactory};

/// Load the schema file at `path` and build its record type.
pub(crate) fn load_record_type(path: &Path) -> Result<RecordType> {
    let schema = recgen_schema::load_schema_file(path)
        .with_context(|| format!("loading schema: {}", path.display()))?;
    let record_type = RecordTypeFactory::new()
        .build_from(&schema)
        .with_context(|| format!("building record type from {}", path.display()))?;
    Ok(record_type)
}
