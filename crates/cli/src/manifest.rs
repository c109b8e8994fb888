use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{anyhow, Context, Result};
use rmc_core::codec::PolicyKind;
use rmc_core::PolicyEntry;
use serde::{Deserialize, Serialize};

use crate::{policy_name_for, read_file};

/// Policy entries to pack into a record, as written by hand.
///
/// ```yaml
/// entries:
///   - kind: blob
///     name: audio.conf
///     path: boards/minnow/audio.conf
///   - kind: cmdline
///     text: "console=ttyS0,115200"
/// ```
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RecordManifest {
    #[serde(default)]
    pub entries: Vec<ManifestEntry>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ManifestEntry {
    pub kind: PolicyKind,
    /// Blob name; defaults to the file name of `path`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    /// File holding the payload, relative to the manifest.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub path: Option<PathBuf>,
    /// Inline payload, mainly for command-line fragments.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub text: Option<String>,
}

impl RecordManifest {
    /// Parse a manifest; `.json` files are read as JSON, anything else as YAML.
    pub fn load(path: &Path) -> Result<Self> {
        let text = fs::read_to_string(path)
            .with_context(|| format!("Failed to read record manifest at {}", path.display()))?;
        let manifest: RecordManifest = if path.extension().is_some_and(|ext| ext == "json") {
            serde_json::from_str(&text).context("Failed to parse record manifest JSON")?
        } else {
            serde_yaml::from_str(&text).context("Failed to parse record manifest YAML")?
        };
        Ok(manifest)
    }

    /// Resolve every entry to its payload. Relative paths are taken from `base_dir`.
    pub fn policy_entries(&self, base_dir: &Path) -> Result<Vec<PolicyEntry<'static>>> {
        self.entries.iter().map(|entry| entry.to_policy_entry(base_dir)).collect()
    }
}

impl ManifestEntry {
    pub fn validate(&self) -> Result<()> {
        match (&self.path, &self.text) {
            (Some(_), Some(_)) => Err(anyhow!("Manifest entry has both `path` and `text`")),
            (None, None) => Err(anyhow!("Manifest entry needs `path` or `text`")),
            (None, Some(_)) if self.kind == PolicyKind::Blob && self.name.is_none() => {
                Err(anyhow!("Blob entry with inline `text` requires a `name`"))
            }
            _ => Ok(()),
        }
    }

    fn to_policy_entry(&self, base_dir: &Path) -> Result<PolicyEntry<'static>> {
        self.validate()?;

        let payload = match (&self.path, &self.text) {
            (Some(path), None) => {
                let full = if path.is_absolute() { path.clone() } else { base_dir.join(path) };
                read_file(&full, "policy file")?
            }
            (None, Some(text)) => text.as_bytes().to_vec(),
            _ => return Err(anyhow!("Manifest entry needs exactly one of `path` or `text`")),
        };

        Ok(match self.kind {
            PolicyKind::CommandLine => PolicyEntry::command_line(payload),
            PolicyKind::Blob => {
                let name = self
                    .name
                    .clone()
                    .or_else(|| self.path.as_deref().map(policy_name_for))
                    .ok_or_else(|| anyhow!("Blob entry has no name"))?;
                PolicyEntry::blob(name.into_bytes(), payload)
            }
        })
    }
}
