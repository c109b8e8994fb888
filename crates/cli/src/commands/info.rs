use std::path::Path;

use anyhow::{Context, Result};
use rmc_core::codec::Database;
use serde::Serialize;

use crate::{read_file, sha256_bytes};

#[derive(Debug, Clone, Serialize)]
pub struct DatabaseInfo {
    pub version: u8,
    pub total_len: usize,
    pub records: Vec<RecordInfo>,
}

#[derive(Debug, Clone, Serialize)]
pub struct RecordInfo {
    pub signature: String,
    pub offset: usize,
    pub length: usize,
    pub entries: Vec<EntryInfo>,
}

#[derive(Debug, Clone, Serialize)]
pub struct EntryInfo {
    /// `blob`, `cmdline`, or `unknown(<tag>)`.
    pub kind: String,
    pub name: String,
    pub size: usize,
    pub sha256: String,
}

/// Summarize a database held in memory.
pub fn database_info(db: &[u8]) -> Result<DatabaseInfo> {
    let database = Database::parse(db)?;
    let mut records = Vec::new();

    for record in database.records() {
        let record = record?;
        let entries = record
            .entries()
            .map(|entry| {
                let entry = entry?;
                Ok(EntryInfo {
                    kind: entry
                        .kind()
                        .map(|kind| kind.as_str().to_string())
                        .unwrap_or_else(|| format!("unknown({})", entry.kind_tag)),
                    name: entry.name_lossy().into_owned(),
                    size: entry.blob.len(),
                    sha256: sha256_bytes(entry.blob),
                })
            })
            .collect::<Result<Vec<_>, rmc_core::RmcError>>()?;

        records.push(RecordInfo {
            signature: record.signature.to_hex(),
            offset: record.offset,
            length: record.length,
            entries,
        });
    }

    Ok(DatabaseInfo { version: database.version(), total_len: database.total_len(), records })
}

/// List the records and entries of a database file.
pub fn info_command(database: &Path, json: bool) -> Result<()> {
    let db = read_file(database, "database")?;
    let info =
        database_info(&db).with_context(|| format!("Invalid database {}", database.display()))?;

    if json {
        println!("{}", serde_json::to_string_pretty(&info)?);
        return Ok(());
    }

    println!("Database: {}", database.display());
    println!("  Version: {}", info.version);
    println!("  Size: {} bytes", info.total_len);
    println!("  Records: {}", info.records.len());
    for record in &info.records {
        println!();
        println!("Record {} (offset {}, {} bytes)", record.signature, record.offset, record.length);
        for entry in &record.entries {
            println!(
                "  - [{}] {} ({} bytes, sha256 {})",
                entry.kind, entry.name, entry.size, entry.sha256
            );
        }
    }

    Ok(())
}
