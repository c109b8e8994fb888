use std::borrow::Cow;

use zerocopy::little_endian::U16;
use zerocopy::{FromBytes, Immutable, IntoBytes, KnownLayout, Unaligned};

use crate::error::{RmcError, RmcResult};
use crate::fingerprint::{default_fingerprint, Fingerprint, END_OF_TABLE_TYPE};

/// Fixed header of one SMBIOS structure.
#[repr(C)]
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, FromBytes, IntoBytes, Immutable, KnownLayout, Unaligned,
)]
pub struct StructureHeader {
    pub structure_type: u8,
    /// Length of the formatted area, header included.
    pub length: u8,
    pub handle: U16,
}

/// Size of the header every structure starts with (type, length, handle).
pub const STRUCTURE_HEADER_LEN: usize = core::mem::size_of::<StructureHeader>();

const _: () = assert!(STRUCTURE_HEADER_LEN == 4);

/// One structure of the table: formatted area plus its string set.
#[derive(Debug, Clone, Copy)]
pub struct Structure<'a> {
    pub header: StructureHeader,
    /// Offset of the structure from the start of the table.
    pub offset: usize,
    formatted: &'a [u8],
    /// Unformatted area up to and including the last string's terminator.
    strings: &'a [u8],
}

impl<'a> Structure<'a> {
    /// Formatted area, header included.
    pub fn formatted(&self) -> &'a [u8] {
        self.formatted
    }

    /// Resolve a 1-based string number. `0` means "no string" and yields an empty value.
    pub fn string(&self, index: u8) -> RmcResult<&'a [u8]> {
        if index == 0 {
            return Ok(&[]);
        }

        let out_of_range = RmcError::MalformedTable {
            offset: self.offset + self.formatted.len(),
            reason: "string index past the end of the string set",
        };

        // A string set that starts with NUL is the empty set ("\0\0").
        if self.strings.first().map_or(true, |&b| b == 0) {
            return Err(out_of_range);
        }

        let mut rest = self.strings;
        for _ in 1..index {
            let end = rest.iter().position(|&b| b == 0).ok_or(out_of_range.clone())?;
            rest = &rest[end + 1..];
        }
        // Stop at the target's own terminator; the rest of the set is not scanned.
        let end = rest.iter().position(|&b| b == 0).ok_or(out_of_range)?;
        Ok(&rest[..end])
    }

    /// Resolve the string whose index byte sits at `field_offset` in the formatted area.
    ///
    /// Fields beyond the formatted length belong to a newer structure revision than
    /// the producer wrote; they resolve to an empty value.
    pub fn string_at(&self, field_offset: u8) -> RmcResult<&'a [u8]> {
        match self.formatted.get(usize::from(field_offset)) {
            Some(&index) if usize::from(field_offset) >= STRUCTURE_HEADER_LEN => self.string(index),
            _ => Ok(&[]),
        }
    }
}

/// A structure table held in memory, bounded by its declared length.
#[derive(Debug, Clone, Copy)]
pub struct StructureTable<'a> {
    bytes: &'a [u8],
}

impl<'a> StructureTable<'a> {
    pub fn new(bytes: &'a [u8]) -> Self {
        Self { bytes }
    }

    /// Iterate structures up to (not including) the end-of-table structure.
    pub fn structures(&self) -> Structures<'a> {
        Structures { table: self.bytes, pos: 0, done: false }
    }
}

/// Iterator over the structures of a table.
///
/// Yields an error and stops if a header, formatted area, or string set would reach
/// past the table, or if the table ends without an end-of-table structure.
pub struct Structures<'a> {
    table: &'a [u8],
    pos: usize,
    done: bool,
}

impl<'a> Structures<'a> {
    fn fail(&mut self, offset: usize, reason: &'static str) -> Option<RmcResult<Structure<'a>>> {
        self.done = true;
        Some(Err(RmcError::MalformedTable { offset, reason }))
    }
}

impl<'a> Iterator for Structures<'a> {
    type Item = RmcResult<Structure<'a>>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.done {
            return None;
        }

        let pos = self.pos;
        let rest = self.table.get(pos..).unwrap_or_default();
        let Ok((header, _)) = StructureHeader::read_from_prefix(rest) else {
            return self.fail(pos, "table ends before the end-of-table structure");
        };

        if header.structure_type == END_OF_TABLE_TYPE {
            self.done = true;
            return None;
        }

        let formatted_len = usize::from(header.length);
        if formatted_len < STRUCTURE_HEADER_LEN {
            return self.fail(pos, "structure length shorter than its header");
        }
        let Some(formatted) = self.table.get(pos..pos + formatted_len) else {
            return self.fail(pos, "formatted area runs past the table");
        };

        let area_start = pos + formatted_len;
        let area = &self.table[area_start..];
        let Some(double_nul) = area.windows(2).position(|w| w[0] == 0 && w[1] == 0) else {
            return self.fail(area_start, "string set is missing its double-NUL terminator");
        };

        self.pos = area_start + double_nul + 2;
        Some(Ok(Structure { header, offset: pos, formatted, strings: &area[..double_nul + 1] }))
    }
}

/// Build a fingerprint from a structure table.
///
/// Every structure whose type matches a finger's type sets that finger's value, so
/// when a type recurs the last structure wins. Values borrow from `table`.
pub fn extract_fingerprint<'a>(table: &'a [u8]) -> RmcResult<Fingerprint<'a>> {
    let mut fingerprint: Fingerprint<'a> = default_fingerprint();

    for structure in StructureTable::new(table).structures() {
        let structure = structure?;
        for finger in fingerprint.fingers_mut().iter_mut() {
            if finger.structure_type == structure.header.structure_type {
                finger.value = Cow::Borrowed(structure.string_at(finger.offset)?);
            }
        }
    }

    Ok(fingerprint)
}
