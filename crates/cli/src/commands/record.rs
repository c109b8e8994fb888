use std::path::{Path, PathBuf};

use anyhow::{anyhow, Context, Result};
use log::debug;
use rmc_core::{encode_record, PolicyEntry};

use crate::commands::fingerprint_for;
use crate::manifest::RecordManifest;
use crate::{policy_name_for, read_file, write_file, HostOptions};

/// What goes into a record besides the fingerprint.
#[derive(Debug, Clone, Default)]
pub struct RecordInputs {
    /// Files stored as blobs under their file names.
    pub blobs: Vec<PathBuf>,
    pub cmdline: Option<String>,
    pub manifest: Option<PathBuf>,
}

impl RecordInputs {
    /// Policy entries in order: blob files, then manifest entries, then the command line.
    pub fn policy_entries(&self) -> Result<Vec<PolicyEntry<'static>>> {
        let mut entries = Vec::new();

        for path in &self.blobs {
            let data = read_file(path, "policy file")?;
            let name = policy_name_for(path);
            debug!("Adding blob {name} ({} bytes)", data.len());
            entries.push(PolicyEntry::blob(name.into_bytes(), data));
        }

        if let Some(manifest_path) = &self.manifest {
            let manifest = RecordManifest::load(manifest_path)?;
            let base_dir = manifest_path.parent().unwrap_or_else(|| Path::new("."));
            entries.extend(manifest.policy_entries(base_dir)?);
        }

        if let Some(cmdline) = &self.cmdline {
            entries.push(PolicyEntry::command_line(cmdline.clone().into_bytes()));
        }

        Ok(entries)
    }
}

/// Build a record for a board and write it to `output`.
pub fn record_command(
    host: &HostOptions,
    fingerprint: Option<&Path>,
    inputs: &RecordInputs,
    output: &Path,
) -> Result<()> {
    let entries = inputs.policy_entries()?;
    if entries.is_empty() {
        return Err(anyhow!(
            "A record needs at least one policy entry (-b, --cmdline or --manifest)"
        ));
    }

    let fingerprint = fingerprint_for(host, fingerprint)?;
    let record = encode_record(&fingerprint, &entries).context("Failed to generate record")?;
    write_file(output, record.as_bytes(), "record")?;

    println!("Generated record:");
    println!("  Signature: {}", record.signature());
    println!("  Entries: {}", entries.len());
    println!("  Size: {} bytes", record.len());
    println!("  Path: {}", output.display());

    Ok(())
}
