use std::fs;
use std::path::Path;

use log::debug;

use super::{HostAdapter, HostError};
use crate::smbios::rebase_entry_point;

/// Where [`ImageHost::from_parts`] places the structure table, matching the
/// layout of `dmidecode --dump-bin` files.
pub const IMAGE_TABLE_OFFSET: usize = 0x20;

/// SMBIOS image held in memory: entry point at address 0, the structure table
/// at whatever address the entry point names.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImageHost {
    image: Vec<u8>,
}

impl ImageHost {
    /// Use an image already laid out as a binary dump.
    pub fn from_dump(image: Vec<u8>) -> Self {
        Self { image }
    }

    pub fn from_dump_file(path: impl AsRef<Path>) -> Result<Self, HostError> {
        let path = path.as_ref();
        let image = fs::read(path).map_err(|source| HostError::io(path, source))?;
        debug!("Loaded {} byte SMBIOS dump from {}", image.len(), path.display());
        Ok(Self::from_dump(image))
    }

    /// Lay an entry point and a separately stored structure table out as one image.
    ///
    /// The entry point is rewritten to point at [`IMAGE_TABLE_OFFSET`].
    pub fn from_parts(entry_point: &[u8], table: &[u8]) -> Result<Self, HostError> {
        let rebased = rebase_entry_point(entry_point, IMAGE_TABLE_OFFSET as u64)?;
        let mut image = vec![0u8; IMAGE_TABLE_OFFSET];
        image[..rebased.len()].copy_from_slice(&rebased);
        image.extend_from_slice(table);
        Ok(Self { image })
    }

    /// Build an image from the Linux DMI sysfs pair (`smbios_entry_point` and `DMI`).
    pub fn from_dmi_sysfs(
        entry_point_path: impl AsRef<Path>,
        table_path: impl AsRef<Path>,
    ) -> Result<Self, HostError> {
        let entry_point_path = entry_point_path.as_ref();
        let table_path = table_path.as_ref();
        let entry_point =
            fs::read(entry_point_path).map_err(|source| HostError::io(entry_point_path, source))?;
        let table = fs::read(table_path).map_err(|source| HostError::io(table_path, source))?;
        debug!(
            "Loaded {} byte entry point and {} byte table from DMI sysfs",
            entry_point.len(),
            table.len()
        );
        Self::from_parts(&entry_point, &table)
    }

    pub fn as_bytes(&self) -> &[u8] {
        &self.image
    }
}

impl HostAdapter for ImageHost {
    type View<'a> = &'a [u8];

    fn entry_point_address(&self) -> Result<u64, HostError> {
        if self.image.is_empty() {
            return Err(HostError::EntryPointNotFound("an empty SMBIOS image".to_string()));
        }
        Ok(0)
    }

    /// A region that starts inside the image but runs past its end is cut short.
    /// SMBIOS 3 entry points only give a maximum table size, which dumps do not pad to.
    fn map_readable(&self, address: u64, length: usize) -> Result<&[u8], HostError> {
        let out_of_range = || HostError::OutOfRange { address, length: length as u64 };
        let start = usize::try_from(address).map_err(|_| out_of_range())?;
        if start >= self.image.len() {
            return Err(out_of_range());
        }
        let end = start.saturating_add(length).min(self.image.len());
        Ok(&self.image[start..end])
    }
}
