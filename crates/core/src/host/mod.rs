//! Host adapters: where the SMBIOS entry point lives and how to read memory.
//!
//! The table walker only ever sees byte slices. A [`HostAdapter`] supplies them,
//! whether from `/dev/mem` on a running Linux system, from identity-mapped memory
//! before boot, or from an SMBIOS image held in memory.

mod firmware;
mod image;
#[cfg(unix)]
mod sysfs;

use std::io;
use std::path::PathBuf;

use log::{debug, warn};
use thiserror::Error;

use crate::error::RmcError;
use crate::fingerprint::Fingerprint;
use crate::smbios::{
    entry_point_checksum_valid, extract_fingerprint, locate_structure_table,
    StructureTableLocation, ENTRY_POINT_MAX_LEN,
};

pub use firmware::{ConfigurationTable, FirmwareHost, Guid, SMBIOS3_TABLE_GUID, SMBIOS_TABLE_GUID};
pub use image::{ImageHost, IMAGE_TABLE_OFFSET};
#[cfg(unix)]
pub use sysfs::{smbios_address_from_systab, EfiSystabHost};

/// Errors raised while acquiring SMBIOS memory from the host.
#[derive(Debug, Error)]
pub enum HostError {
    #[error("I/O error on {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("No SMBIOS entry point found in {0}")]
    EntryPointNotFound(String),

    #[error("Region {address:#x}+{length:#x} is outside readable memory")]
    OutOfRange { address: u64, length: u64 },

    #[error(transparent)]
    Rmc(#[from] RmcError),
}

impl HostError {
    pub(crate) fn io(path: impl Into<PathBuf>, source: io::Error) -> Self {
        HostError::Io { path: path.into(), source }
    }
}

/// Source of SMBIOS memory.
pub trait HostAdapter {
    /// Readable view returned by [`HostAdapter::map_readable`]. Dropping it releases
    /// the mapping.
    type View<'a>: AsRef<[u8]>
    where
        Self: 'a;

    /// Physical address of the SMBIOS entry point.
    fn entry_point_address(&self) -> Result<u64, HostError>;

    /// Make `length` bytes at `address` readable.
    fn map_readable(&self, address: u64, length: usize) -> Result<Self::View<'_>, HostError>;
}

/// Read the entry point and report where the structure table lives.
///
/// A bad entry point checksum is logged and otherwise ignored.
pub fn locate_table<H: HostAdapter + ?Sized>(
    host: &H,
) -> Result<StructureTableLocation, HostError> {
    let address = host.entry_point_address()?;
    debug!("SMBIOS entry point at {address:#x}");

    let entry_point = host.map_readable(address, ENTRY_POINT_MAX_LEN)?;
    let location = locate_structure_table(entry_point.as_ref())?;
    if !entry_point_checksum_valid(entry_point.as_ref()) {
        warn!("SMBIOS entry point checksum mismatch at {address:#x}; using it anyway");
    }

    debug!(
        "SMBIOS {}.{} ({:?}) structure table at {:#x}, {} bytes",
        location.major_version,
        location.minor_version,
        location.layout,
        location.address,
        location.length
    );
    Ok(location)
}

/// Read this board's fingerprint through `host`.
///
/// The values are copied out of the table mapping before it is released.
pub fn read_fingerprint<H: HostAdapter + ?Sized>(
    host: &H,
) -> Result<Fingerprint<'static>, HostError> {
    let location = locate_table(host)?;
    let length = usize::try_from(location.length).map_err(|_| HostError::OutOfRange {
        address: location.address,
        length: location.length,
    })?;

    let table = host.map_readable(location.address, length)?;
    let fingerprint = extract_fingerprint(table.as_ref())?.into_owned();
    Ok(fingerprint)
}
