use std::io::Write;
use std::path::Path;

use anyhow::{Context, Result};
use log::info;
use rmc_core::codec::PolicyKind;
use rmc_core::query;

use crate::commands::fingerprint_for;
use crate::{read_file, write_file, HostOptions};

/// What to look up for the board.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum QueryTarget {
    Blob(String),
    CommandLine,
}

impl QueryTarget {
    fn kind_and_name(&self) -> (PolicyKind, &[u8]) {
        match self {
            QueryTarget::Blob(name) => (PolicyKind::Blob, name.as_bytes()),
            QueryTarget::CommandLine => (PolicyKind::CommandLine, &[][..]),
        }
    }

    fn label(&self) -> String {
        match self {
            QueryTarget::Blob(name) => format!("blob `{name}`"),
            QueryTarget::CommandLine => "command line".to_string(),
        }
    }
}

/// Look up a policy for a board and write it to `output`, or to stdout.
pub fn query_command(
    host: &HostOptions,
    database: &Path,
    target: &QueryTarget,
    fingerprint: Option<&Path>,
    output: Option<&Path>,
) -> Result<()> {
    let db = read_file(database, "database")?;
    let fingerprint = fingerprint_for(host, fingerprint)?;
    let (kind, name) = target.kind_and_name();

    let entry = query(&fingerprint, &db, kind, name)
        .with_context(|| format!("Failed to query {} in {}", target.label(), database.display()))?;

    match output {
        Some(path) => {
            write_file(path, entry.blob, "policy blob")?;
            info!("Wrote {} ({} bytes) to {}", target.label(), entry.blob.len(), path.display());
        }
        None => {
            let mut stdout = std::io::stdout().lock();
            stdout.write_all(entry.blob).context("Failed to write policy blob to stdout")?;
            stdout.flush().context("Failed to flush stdout")?;
        }
    }

    Ok(())
}
