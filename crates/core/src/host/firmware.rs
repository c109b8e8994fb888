use core::ffi::c_void;

use log::debug;

use super::{HostAdapter, HostError};

/// UEFI globally unique identifier.
#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Guid {
    pub data1: u32,
    pub data2: u16,
    pub data3: u16,
    pub data4: [u8; 8],
}

impl Guid {
    pub const fn from_values(data1: u32, data2: u16, data3: u16, data4: [u8; 8]) -> Self {
        Self { data1, data2, data3, data4 }
    }
}

/// SMBIOS 3.0 table GUID, f2fd1544-9794-4a2c-992e-e5bbcf20e394.
pub const SMBIOS3_TABLE_GUID: Guid =
    Guid::from_values(0xf2fd1544, 0x9794, 0x4a2c, [0x99, 0x2e, 0xe5, 0xbb, 0xcf, 0x20, 0xe3, 0x94]);

/// SMBIOS table GUID, eb9d2d31-2d88-11d3-9a16-0090273fc14d.
pub const SMBIOS_TABLE_GUID: Guid =
    Guid::from_values(0xeb9d2d31, 0x2d88, 0x11d3, [0x9a, 0x16, 0x00, 0x90, 0x27, 0x3f, 0xc1, 0x4d]);

/// One entry of the UEFI system table's configuration table array.
#[repr(C)]
#[derive(Debug, Clone, Copy)]
pub struct ConfigurationTable {
    pub vendor_guid: Guid,
    pub vendor_table: *const c_void,
}

/// Pre-boot host: entry point from the UEFI configuration table, memory read
/// in place through the firmware's identity mapping.
#[derive(Debug, Clone, Copy)]
pub struct FirmwareHost<'a> {
    tables: &'a [ConfigurationTable],
}

impl<'a> FirmwareHost<'a> {
    /// # Safety
    ///
    /// Every SMBIOS vendor table in `tables`, and any structure table its entry
    /// point names, must be identity-mapped, readable, and left unmodified for `'a`.
    pub unsafe fn new(tables: &'a [ConfigurationTable]) -> Self {
        Self { tables }
    }

    /// # Safety
    ///
    /// `tables` must point to `count` valid entries (the system table's
    /// `ConfigurationTable` and `NumberOfTableEntries`), and the requirements of
    /// [`FirmwareHost::new`] apply.
    pub unsafe fn from_raw(tables: *const ConfigurationTable, count: usize) -> Self {
        if tables.is_null() || count == 0 {
            return Self { tables: &[] };
        }
        // SAFETY: caller guarantees `tables` points to `count` entries valid for 'a.
        Self { tables: unsafe { core::slice::from_raw_parts(tables, count) } }
    }
}

impl<'a> HostAdapter for FirmwareHost<'a> {
    type View<'v> = &'a [u8] where Self: 'v;

    fn entry_point_address(&self) -> Result<u64, HostError> {
        let table = self
            .tables
            .iter()
            .find(|t| t.vendor_guid == SMBIOS3_TABLE_GUID || t.vendor_guid == SMBIOS_TABLE_GUID)
            .ok_or_else(|| {
                HostError::EntryPointNotFound("the UEFI configuration table".to_string())
            })?;
        debug!("SMBIOS configuration table entry {:08x}", table.vendor_guid.data1);
        Ok(table.vendor_table as usize as u64)
    }

    fn map_readable(&self, address: u64, length: usize) -> Result<&'a [u8], HostError> {
        let out_of_range = || HostError::OutOfRange { address, length: length as u64 };
        let start = usize::try_from(address).map_err(|_| out_of_range())?;
        if start == 0 || start.checked_add(length).is_none() {
            return Err(out_of_range());
        }
        // SAFETY: construction promised that SMBIOS memory is identity-mapped and
        // readable for 'a.
        Ok(unsafe { core::slice::from_raw_parts(start as *const u8, length) })
    }
}
