use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

/// Which host interface supplies the SMBIOS tables on a running system.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum HostSource {
    /// EFI systab listing plus `/dev/mem`.
    #[default]
    EfiSystab,
    /// The kernel's exported copies under `/sys/firmware/dmi/tables`.
    DmiSysfs,
}

/// Host environment configuration.
///
/// Stored as JSON; every field is optional and falls back to the standard
/// Linux location.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RmcConfig {
    pub systab_path: PathBuf,
    pub mem_path: PathBuf,
    pub dmi_entry_point_path: PathBuf,
    pub dmi_table_path: PathBuf,
    pub default_source: HostSource,
}

impl Default for RmcConfig {
    fn default() -> Self {
        Self {
            systab_path: PathBuf::from("/sys/firmware/efi/systab"),
            mem_path: PathBuf::from("/dev/mem"),
            dmi_entry_point_path: PathBuf::from("/sys/firmware/dmi/tables/smbios_entry_point"),
            dmi_table_path: PathBuf::from("/sys/firmware/dmi/tables/DMI"),
            default_source: HostSource::EfiSystab,
        }
    }
}

/// Load a config file from disk.
pub fn load_config(path: &Path) -> Result<RmcConfig> {
    let config_json = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read config at {}", path.display()))?;
    let config: RmcConfig =
        serde_json::from_str(&config_json).context("Failed to parse config JSON")?;
    Ok(config)
}
