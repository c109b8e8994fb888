//! SMBIOS table walking.
//!
//! Two steps: the entry point names the address and length of the structure table,
//! and the walker reads fingerprint strings out of that table. Both operate on
//! byte slices the host has already made readable, and every read is bounded by
//! the slice, so a truncated or unterminated table is reported as
//! [`RmcError::MalformedTable`](crate::RmcError::MalformedTable) instead of being
//! read past.

mod entry_point;
mod walker;

pub use entry_point::{
    entry_point_checksum_valid, locate_structure_table, rebase_entry_point, EntryPointLayout,
    Smbios21EntryPoint, Smbios30EntryPoint, StructureTableLocation, ENTRY_POINT_MAX_LEN,
    SMBIOS2_ANCHOR, SMBIOS3_ANCHOR,
};
pub use walker::{
    extract_fingerprint, Structure, StructureHeader, StructureTable, Structures,
    STRUCTURE_HEADER_LEN,
};
