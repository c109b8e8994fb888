use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use rmc_core::config::{HostSource, RmcConfig};
use rmc_core::host::{read_fingerprint, ImageHost};
use rmc_core::Fingerprint;
use sha2::{Digest, Sha256};

pub mod commands;
pub mod logging;
pub mod manifest;

/// Where this board's SMBIOS tables are read from.
#[derive(Debug, Clone, Default)]
pub struct HostOptions {
    pub config: RmcConfig,
    /// Binary SMBIOS dump to read instead of the running system.
    pub smbios_dump: Option<PathBuf>,
}

impl HostOptions {
    /// Read the fingerprint of the board described by these options.
    pub fn read_fingerprint(&self) -> Result<Fingerprint<'static>> {
        if let Some(dump) = &self.smbios_dump {
            let host = ImageHost::from_dump_file(dump)?;
            return read_fingerprint(&host).with_context(|| {
                format!("Failed to read fingerprint from SMBIOS dump {}", dump.display())
            });
        }

        match self.config.default_source {
            HostSource::DmiSysfs => {
                let host = ImageHost::from_dmi_sysfs(
                    &self.config.dmi_entry_point_path,
                    &self.config.dmi_table_path,
                )?;
                read_fingerprint(&host).context("Failed to read fingerprint from DMI sysfs tables")
            }
            HostSource::EfiSystab => read_efi_fingerprint(&self.config),
        }
    }
}

#[cfg(unix)]
fn read_efi_fingerprint(config: &RmcConfig) -> Result<Fingerprint<'static>> {
    let host = rmc_core::host::EfiSystabHost::new(&config.systab_path, &config.mem_path);
    read_fingerprint(&host).with_context(|| {
        format!(
            "Failed to read fingerprint via {} and {} (root permission is usually required)",
            host.systab_path().display(),
            host.mem_path().display()
        )
    })
}

#[cfg(not(unix))]
fn read_efi_fingerprint(_config: &RmcConfig) -> Result<Fingerprint<'static>> {
    anyhow::bail!("Reading SMBIOS through the EFI systab needs a Unix host; use --smbios-dump")
}

/// Read a whole file, naming what it was supposed to be on failure.
pub fn read_file(path: &Path, what: &str) -> Result<Vec<u8>> {
    fs::read(path).with_context(|| format!("Failed to read {what} at {}", path.display()))
}

/// Write a whole file, creating parent directories as needed.
pub fn write_file(path: &Path, bytes: &[u8], what: &str) -> Result<()> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent)
            .with_context(|| format!("Failed to create directory {}", parent.display()))?;
    }
    fs::write(path, bytes).with_context(|| format!("Failed to write {what} to {}", path.display()))
}

/// SHA-256 of a byte slice as lowercase hex.
pub fn sha256_bytes(bytes: &[u8]) -> String {
    let digest = Sha256::digest(bytes);
    format!("{:x}", digest)
}

/// Name a policy file is stored under: the last component of its path.
pub fn policy_name_for(path: &Path) -> String {
    path.file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.to_string_lossy().into_owned())
}
