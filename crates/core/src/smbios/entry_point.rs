use zerocopy::little_endian::{U16, U32, U64};
use zerocopy::{FromBytes, Immutable, IntoBytes, KnownLayout, Unaligned};

use crate::error::{RmcError, RmcResult};

/// Anchor of the 64-bit (SMBIOS 3.x) entry point.
pub const SMBIOS3_ANCHOR: &[u8; 5] = b"_SM3_";

/// Anchor of the 32-bit (SMBIOS 2.x) entry point.
pub const SMBIOS2_ANCHOR: &[u8; 4] = b"_SM_";

/// Bytes a host must make readable at the entry point address: the larger of
/// the two layouts.
pub const ENTRY_POINT_MAX_LEN: usize = core::mem::size_of::<Smbios21EntryPoint>();

/// SMBIOS 2.1 entry point structure (32-bit table address).
#[repr(C)]
#[derive(Debug, Clone, Copy, FromBytes, IntoBytes, KnownLayout, Immutable, Unaligned)]
pub struct Smbios21EntryPoint {
    /// "_SM_" (0x00)
    pub anchor: [u8; 4],
    pub checksum: u8,
    /// Entry point length, 0x1F (0x05)
    pub length: u8,
    pub major_version: u8,
    pub minor_version: u8,
    pub max_structure_size: U16,
    pub entry_point_revision: u8,
    pub formatted_area: [u8; 5],
    /// "_DMI_" (0x10)
    pub intermediate_anchor: [u8; 5],
    pub intermediate_checksum: u8,
    /// Structure table length (0x16)
    pub table_length: U16,
    /// Structure table address (0x18)
    pub table_address: U32,
    pub structure_count: U16,
    pub bcd_revision: u8,
}

const _: () = assert!(core::mem::size_of::<Smbios21EntryPoint>() == 0x1F);

/// SMBIOS 3.0 entry point structure (64-bit table address).
#[repr(C)]
#[derive(Debug, Clone, Copy, FromBytes, IntoBytes, KnownLayout, Immutable, Unaligned)]
pub struct Smbios30EntryPoint {
    /// "_SM3_" (0x00)
    pub anchor: [u8; 5],
    pub checksum: u8,
    /// Entry point length, 0x18 (0x06)
    pub length: u8,
    pub major_version: u8,
    pub minor_version: u8,
    pub docrev: u8,
    pub entry_point_revision: u8,
    pub reserved: u8,
    /// Structure table maximum size (0x0C)
    pub table_max_size: U32,
    /// Structure table address (0x10)
    pub table_address: U64,
}

const _: () = assert!(core::mem::size_of::<Smbios30EntryPoint>() == 0x18);

/// Which entry point layout the anchor selected.
#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize)]
#[serde(rename_all = "snake_case")]
pub enum EntryPointLayout {
    Bits32,
    Bits64,
}

/// Where the structure table lives, as declared by the entry point.
#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize)]
pub struct StructureTableLocation {
    pub layout: EntryPointLayout,
    pub major_version: u8,
    pub minor_version: u8,
    pub address: u64,
    pub length: u64,
}

/// End of the 32-bit layout's table address field; everything after it is optional.
const SMBIOS2_REQUIRED_LEN: usize = 0x1C;

fn truncated() -> RmcError {
    RmcError::MalformedTable { offset: 0, reason: "entry point truncated" }
}

/// Read the 32-bit layout. Some firmware declares (and sysfs exposes) only 0x1E
/// bytes; missing trailing fields read as zero.
fn read_smbios21(entry_point: &[u8]) -> RmcResult<Smbios21EntryPoint> {
    if entry_point.len() < SMBIOS2_REQUIRED_LEN {
        return Err(truncated());
    }
    let mut raw = [0u8; ENTRY_POINT_MAX_LEN];
    let n = entry_point.len().min(raw.len());
    raw[..n].copy_from_slice(&entry_point[..n]);
    Smbios21EntryPoint::read_from_bytes(&raw).map_err(|_| truncated())
}

/// Read the structure table address and length from an entry point.
///
/// `_SM3_` selects the 64-bit layout, whose maximum-size field is taken as the table
/// length. `_SM_` selects the 32-bit layout and its explicit table length. The
/// checksums are not verified here; callers that care can use
/// [`entry_point_checksum_valid`].
pub fn locate_structure_table(entry_point: &[u8]) -> RmcResult<StructureTableLocation> {
    if entry_point.starts_with(SMBIOS3_ANCHOR) {
        let (ep, _) = Smbios30EntryPoint::read_from_prefix(entry_point).map_err(|_| truncated())?;
        Ok(StructureTableLocation {
            layout: EntryPointLayout::Bits64,
            major_version: ep.major_version,
            minor_version: ep.minor_version,
            address: ep.table_address.get(),
            length: u64::from(ep.table_max_size.get()),
        })
    } else if entry_point.starts_with(SMBIOS2_ANCHOR) {
        let ep = read_smbios21(entry_point)?;
        Ok(StructureTableLocation {
            layout: EntryPointLayout::Bits32,
            major_version: ep.major_version,
            minor_version: ep.minor_version,
            address: u64::from(ep.table_address.get()),
            length: u64::from(ep.table_length.get()),
        })
    } else {
        Err(RmcError::UnrecognizedEntryPoint)
    }
}

/// Check the entry point checksum: the bytes covered by the declared entry point
/// length must sum to zero (mod 256). For the 32-bit layout the intermediate
/// `_DMI_` checksum is checked as well.
pub fn entry_point_checksum_valid(entry_point: &[u8]) -> bool {
    let sums_to_zero = |bytes: &[u8]| bytes.iter().fold(0u8, |acc, b| acc.wrapping_add(*b)) == 0;

    if entry_point.starts_with(SMBIOS3_ANCHOR) {
        match Smbios30EntryPoint::ref_from_prefix(entry_point) {
            Ok((ep, _)) => entry_point.get(..usize::from(ep.length)).is_some_and(sums_to_zero),
            Err(_) => false,
        }
    } else if entry_point.starts_with(SMBIOS2_ANCHOR) {
        match read_smbios21(entry_point) {
            Ok(ep) => {
                let intermediate_end = entry_point.len().min(ENTRY_POINT_MAX_LEN);
                entry_point.get(..usize::from(ep.length)).is_some_and(sums_to_zero)
                    && entry_point.get(0x10..intermediate_end).is_some_and(sums_to_zero)
            }
            Err(_) => false,
        }
    } else {
        false
    }
}

/// Copy of `entry_point` whose structure table address is replaced by `address`.
///
/// Used to lay an entry point and its table out in one image (entry point first,
/// table at `address`), the way binary SMBIOS dumps are stored. Both checksums
/// are recomputed.
pub fn rebase_entry_point(entry_point: &[u8], address: u64) -> RmcResult<Vec<u8>> {
    let fix_checksum = |bytes: &mut [u8], at: usize| {
        bytes[at] = 0;
        let sum = bytes.iter().fold(0u8, |acc, b| acc.wrapping_add(*b));
        bytes[at] = sum.wrapping_neg();
    };

    if entry_point.starts_with(SMBIOS3_ANCHOR) {
        let (mut ep, _) =
            Smbios30EntryPoint::read_from_prefix(entry_point).map_err(|_| truncated())?;
        ep.table_address = U64::new(address);
        let mut out = ep.as_bytes().to_vec();
        let covered = usize::from(ep.length).clamp(6, out.len());
        fix_checksum(&mut out[..covered], 5);
        Ok(out)
    } else if entry_point.starts_with(SMBIOS2_ANCHOR) {
        let mut ep = read_smbios21(entry_point)?;
        let address = u32::try_from(address).map_err(|_| RmcError::MalformedTable {
            offset: 0x18,
            reason: "table address does not fit the 32-bit entry point",
        })?;
        ep.table_address = U32::new(address);
        let mut out = ep.as_bytes().to_vec();
        fix_checksum(&mut out[0x10..0x1F], 5);
        let covered = usize::from(ep.length).clamp(5, out.len());
        fix_checksum(&mut out[..covered], 4);
        Ok(out)
    } else {
        Err(RmcError::UnrecognizedEntryPoint)
    }
}
