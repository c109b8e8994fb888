use std::fs::{self, File};
use std::path::{Path, PathBuf};

use log::debug;
use memmap2::{Mmap, MmapOptions};

use super::{HostAdapter, HostError};

/// Hosted Linux: entry point address from the EFI systab listing, memory from `/dev/mem`.
#[derive(Debug, Clone)]
pub struct EfiSystabHost {
    systab_path: PathBuf,
    mem_path: PathBuf,
}

impl EfiSystabHost {
    pub fn new(systab_path: impl Into<PathBuf>, mem_path: impl Into<PathBuf>) -> Self {
        Self { systab_path: systab_path.into(), mem_path: mem_path.into() }
    }

    pub fn systab_path(&self) -> &Path {
        &self.systab_path
    }

    pub fn mem_path(&self) -> &Path {
        &self.mem_path
    }
}

impl Default for EfiSystabHost {
    fn default() -> Self {
        Self::new("/sys/firmware/efi/systab", "/dev/mem")
    }
}

/// Address from the first `SMBIOS3=` or `SMBIOS=` line of a systab listing.
///
/// Lines whose value does not parse as hex are skipped.
pub fn smbios_address_from_systab(listing: &str) -> Option<u64> {
    listing.lines().find_map(|line| {
        let rest = line.strip_prefix("SMBIOS")?;
        let (_, value) = rest.split_once('=')?;
        let value = value.trim();
        let digits = value
            .strip_prefix("0x")
            .or_else(|| value.strip_prefix("0X"))
            .unwrap_or(value);
        u64::from_str_radix(digits, 16).ok()
    })
}

impl HostAdapter for EfiSystabHost {
    type View<'a> = Mmap;

    fn entry_point_address(&self) -> Result<u64, HostError> {
        let listing = fs::read_to_string(&self.systab_path)
            .map_err(|source| HostError::io(&self.systab_path, source))?;
        let address = smbios_address_from_systab(&listing)
            .ok_or_else(|| HostError::EntryPointNotFound(self.systab_path.display().to_string()))?;
        debug!("{} lists SMBIOS at {address:#x}", self.systab_path.display());
        Ok(address)
    }

    fn map_readable(&self, address: u64, length: usize) -> Result<Mmap, HostError> {
        let file =
            File::open(&self.mem_path).map_err(|source| HostError::io(&self.mem_path, source))?;
        // memmap2 aligns the offset down to a page and hands back a view that
        // starts at `address`.
        // SAFETY: the mapping is read-only and firmware tables are not rewritten
        // while the system runs.
        let map = unsafe { MmapOptions::new().offset(address).len(length).map(&file) }
            .map_err(|source| HostError::io(&self.mem_path, source))?;
        Ok(map)
    }
}

