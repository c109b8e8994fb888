use zerocopy::little_endian::U64;
use zerocopy::{FromBytes, Immutable, IntoBytes, KnownLayout, Unaligned};

use crate::codec::policy::{PolicyEntry, PolicyRef};
use crate::codec::{allocate, Scope};
use crate::error::{RmcError, RmcResult};
use crate::fingerprint::Fingerprint;
use crate::signature::{record_signature, Signature, SIGNATURE_LEN};

/// Header of a record: board signature and total record length.
#[repr(C)]
#[derive(Debug, Clone, Copy, FromBytes, IntoBytes, Immutable, KnownLayout, Unaligned)]
pub struct RecordHeader {
    pub signature: [u8; SIGNATURE_LEN],
    /// Header plus all entries.
    pub length: U64,
}

/// Header of a policy entry inside a record.
#[repr(C)]
#[derive(Debug, Clone, Copy, FromBytes, IntoBytes, Immutable, KnownLayout, Unaligned)]
pub struct EntryHeader {
    pub kind: u8,
    /// Header plus terminated name plus blob.
    pub length: U64,
}

pub const RECORD_HEADER_LEN: usize = core::mem::size_of::<RecordHeader>();
pub const ENTRY_HEADER_LEN: usize = core::mem::size_of::<EntryHeader>();

const _: () = assert!(RECORD_HEADER_LEN == 40);
const _: () = assert!(ENTRY_HEADER_LEN == 9);

/// An encoded record: one board's signature and its policy entries.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecordBlob {
    bytes: Vec<u8>,
}

impl RecordBlob {
    /// Adopt bytes read from a record file, checking that the header describes them.
    pub fn from_bytes(bytes: Vec<u8>) -> RmcResult<Self> {
        let (header, _) = RecordHeader::read_from_prefix(&bytes).map_err(|_| {
            RmcError::MalformedRecord { offset: 0, reason: "record header truncated" }
        })?;
        if header.length.get() != bytes.len() as u64 {
            return Err(RmcError::MalformedRecord {
                offset: 0,
                reason: "declared record length does not match its size",
            });
        }
        if bytes.len() == RECORD_HEADER_LEN {
            return Err(RmcError::MalformedRecord { offset: 0, reason: "record has no entries" });
        }

        for entry in Entries::new(&bytes, RECORD_HEADER_LEN, bytes.len(), Scope::Record) {
            entry?;
        }
        Ok(Self { bytes })
    }

    pub fn signature(&self) -> Signature {
        let mut raw = [0u8; SIGNATURE_LEN];
        raw.copy_from_slice(&self.bytes[..SIGNATURE_LEN]);
        Signature(raw)
    }

    pub fn as_bytes(&self) -> &[u8] {
        &self.bytes
    }

    pub fn into_bytes(self) -> Vec<u8> {
        self.bytes
    }

    pub fn len(&self) -> usize {
        self.bytes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }

    /// Entries of this record, in stored order. Offsets are relative to the record.
    pub fn entries(&self) -> Entries<'_> {
        Entries::new(&self.bytes, RECORD_HEADER_LEN, self.bytes.len(), Scope::Record)
    }
}

/// Encode a record for `fingerprint` holding `entries` in the given order.
///
/// Fails when the fingerprint has no identity values or `entries` is empty.
pub fn encode_record(
    fingerprint: &Fingerprint<'_>,
    entries: &[PolicyEntry<'_>],
) -> RmcResult<RecordBlob> {
    let signature = record_signature(fingerprint)?;
    if entries.is_empty() {
        return Err(RmcError::EmptyPolicyList);
    }

    let mut total = RECORD_HEADER_LEN;
    for entry in entries {
        entry.validate()?;
        total += ENTRY_HEADER_LEN + entry.name.len() + 1 + entry.blob.len();
    }

    let mut bytes = allocate(total)?;
    let header = RecordHeader {
        signature: signature.0,
        length: U64::new(total as u64),
    };
    bytes.extend_from_slice(header.as_bytes());

    for entry in entries {
        let entry_len = ENTRY_HEADER_LEN + entry.name.len() + 1 + entry.blob.len();
        let entry_header =
            EntryHeader { kind: entry.kind.tag(), length: U64::new(entry_len as u64) };
        bytes.extend_from_slice(entry_header.as_bytes());
        bytes.extend_from_slice(&entry.name);
        bytes.push(0);
        bytes.extend_from_slice(&entry.blob);
    }

    debug_assert_eq!(bytes.len(), total);
    Ok(RecordBlob { bytes })
}

/// Bounded iterator over the entries between `pos` and `end` of a buffer.
///
/// Each step advances by the entry's own declared length. A length that would
/// cross `end`, or an entry without a terminated name, yields an error and ends
/// the iteration.
pub struct Entries<'a> {
    buf: &'a [u8],
    pos: usize,
    end: usize,
    scope: Scope,
    done: bool,
}

impl<'a> Entries<'a> {
    pub(crate) fn new(buf: &'a [u8], start: usize, end: usize, scope: Scope) -> Self {
        Self { buf, pos: start, end, scope, done: false }
    }

    fn fail(&mut self, offset: usize, reason: &'static str) -> Option<RmcResult<PolicyRef<'a>>> {
        self.done = true;
        Some(Err(self.scope.error(offset, reason)))
    }
}

impl<'a> Iterator for Entries<'a> {
    type Item = RmcResult<PolicyRef<'a>>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.done || self.pos >= self.end {
            return None;
        }

        let pos = self.pos;
        if self.end - pos < ENTRY_HEADER_LEN {
            return self.fail(pos, "entry header runs past the end of its record");
        }
        let Ok((header, _)) = EntryHeader::read_from_prefix(&self.buf[pos..self.end]) else {
            return self.fail(pos, "entry header runs past the end of its record");
        };

        let Ok(length) = usize::try_from(header.length.get()) else {
            return self.fail(pos, "entry length does not fit in memory");
        };
        if length <= ENTRY_HEADER_LEN {
            return self.fail(pos, "entry length leaves no room for a name");
        }
        if length > self.end - pos {
            return self.fail(pos, "entry runs past the end of its record");
        }

        let body_start = pos + ENTRY_HEADER_LEN;
        let body = &self.buf[body_start..pos + length];
        let Some(nul) = body.iter().position(|&b| b == 0) else {
            return self.fail(body_start, "entry name is not NUL-terminated");
        };

        self.pos = pos + length;
        Some(Ok(PolicyRef {
            kind_tag: header.kind,
            name: &body[..nul],
            blob: &body[nul + 1..],
            entry_offset: pos,
            blob_offset: body_start + nul + 1,
        }))
    }
}
