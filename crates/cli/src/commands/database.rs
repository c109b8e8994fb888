use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use rmc_core::encode_database;

use crate::commands::load_record_file;
use crate::write_file;

/// Concatenate record files into a database.
pub fn database_command(records: &[PathBuf], output: &Path) -> Result<()> {
    let records = records
        .iter()
        .map(|path| load_record_file(path))
        .collect::<Result<Vec<_>>>()?;

    let database = encode_database(&records).context("Failed to generate database")?;
    write_file(output, database.as_bytes(), "database")?;

    println!("Generated database:");
    println!("  Records: {}", records.len());
    println!("  Size: {} bytes", database.len());
    println!("  Path: {}", output.display());

    Ok(())
}
