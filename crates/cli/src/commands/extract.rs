use std::path::{Path, PathBuf};

use anyhow::{anyhow, Context, Result};
use log::debug;
use rmc_core::codec::{Database, CMDLINE_ENTRY_NAME};
use rmc_core::PolicyKind;

use crate::commands::{load_fingerprint_file, print_fingerprint};
use crate::{read_file, write_file};

/// Default directory a database is extracted into.
pub const DEFAULT_EXTRACT_DIR: &str = "rmc_db_dump";

/// Print the contents of a fingerprint file.
pub fn extract_fingerprint_command(path: &Path) -> Result<()> {
    let fingerprint = load_fingerprint_file(path)?;
    println!("Fingerprint in {}:\n", path.display());
    print_fingerprint(&fingerprint);
    Ok(())
}

/// Write every entry of a database to `<out_dir>/<signature>/<name>`.
pub fn extract_database_command(database: &Path, out_dir: &Path) -> Result<()> {
    let db = read_file(database, "database")?;
    let written = extract_database(&db, out_dir)
        .with_context(|| format!("Failed to extract {}", database.display()))?;

    println!("Successfully extracted {}", database.display());
    println!("  Files: {}", written.len());
    println!("  Directory: {}", out_dir.display());
    Ok(())
}

/// Extract a database held in memory. Returns the paths written, in database order.
pub fn extract_database(db: &[u8], out_dir: &Path) -> Result<Vec<PathBuf>> {
    let database = Database::parse(db)?;
    let mut written = Vec::new();

    for record in database.records() {
        let record = record?;
        let record_dir = out_dir.join(record.signature.to_hex());

        for entry in record.entries() {
            let entry = entry?;
            let name = match entry.kind() {
                Some(PolicyKind::CommandLine) => CMDLINE_ENTRY_NAME.to_string(),
                _ => safe_file_name(&entry.name_lossy())?,
            };
            let path = record_dir.join(&name);
            write_file(&path, entry.blob, "extracted entry")?;
            debug!("Extracted {} ({} bytes)", path.display(), entry.blob.len());
            written.push(path);
        }
    }

    Ok(written)
}

/// Entry names come from the database file; refuse any that would leave the record directory.
fn safe_file_name(name: &str) -> Result<String> {
    if name.is_empty() || name == "." || name == ".." || name.contains(['/', '\\']) {
        return Err(anyhow!("Refusing to extract entry with unsafe name `{name}`"));
    }
    Ok(name.to_string())
}
