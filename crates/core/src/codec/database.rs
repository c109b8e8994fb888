use zerocopy::little_endian::U64;
use zerocopy::{FromBytes, Immutable, IntoBytes, KnownLayout, Unaligned};

use crate::codec::policy::{PolicyKind, PolicyRef};
use crate::codec::record::{Entries, RecordBlob, RecordHeader, RECORD_HEADER_LEN};
use crate::codec::{allocate, Scope};
use crate::error::{RmcError, RmcResult};
use crate::fingerprint::Fingerprint;
use crate::signature::{record_signature, Signature};

/// Database magic, the first five bytes of every database.
pub const DB_MAGIC: &[u8; 5] = b"RMCDB";

/// Format version written by [`encode_database`] and accepted by [`Database::parse`].
pub const DB_VERSION: u8 = 1;

/// Fixed header at the start of a database.
#[repr(C)]
#[derive(Debug, Clone, Copy, FromBytes, IntoBytes, Immutable, KnownLayout, Unaligned)]
pub struct DbHeader {
    pub magic: [u8; 5],
    pub version: u8,
    /// Header plus all records.
    pub length: U64,
}

pub const DB_HEADER_LEN: usize = core::mem::size_of::<DbHeader>();

const _: () = assert!(DB_HEADER_LEN == 14);

/// An encoded database: header followed by concatenated records.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DbBlob {
    bytes: Vec<u8>,
}

impl DbBlob {
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
}

impl AsRef<[u8]> for DbBlob {
    fn as_ref(&self) -> &[u8] {
        &self.bytes
    }
}

/// Concatenate records, in order, behind a database header.
///
/// An empty list is rejected; a header-only database would be indistinguishable
/// from a truncated file.
pub fn encode_database(records: &[RecordBlob]) -> RmcResult<DbBlob> {
    if records.is_empty() {
        return Err(RmcError::EmptyRecordList);
    }

    let total = DB_HEADER_LEN + records.iter().map(RecordBlob::len).sum::<usize>();
    let mut bytes = allocate(total)?;

    let header = DbHeader { magic: *DB_MAGIC, version: DB_VERSION, length: U64::new(total as u64) };
    bytes.extend_from_slice(header.as_bytes());
    for record in records {
        bytes.extend_from_slice(record.as_bytes());
    }

    Ok(DbBlob { bytes })
}

/// True iff `buffer` starts with the database magic.
pub fn is_valid_database(buffer: &[u8]) -> bool {
    buffer.starts_with(DB_MAGIC)
}

/// A validated view over a database buffer.
///
/// Only the bytes covered by the declared total length are scanned; anything the
/// buffer holds past that is ignored.
#[derive(Debug, Clone, Copy)]
pub struct Database<'db> {
    bytes: &'db [u8],
    version: u8,
}

impl<'db> Database<'db> {
    /// Check magic, version and declared length.
    pub fn parse(buffer: &'db [u8]) -> RmcResult<Self> {
        if !is_valid_database(buffer) {
            return Err(RmcError::InvalidMagic);
        }
        let (header, _) = DbHeader::read_from_prefix(buffer).map_err(|_| {
            RmcError::MalformedDatabase { offset: 0, reason: "database header truncated" }
        })?;
        if header.version != DB_VERSION {
            return Err(RmcError::UnsupportedVersion {
                found: header.version,
                expected: DB_VERSION,
            });
        }

        let declared =
            usize::try_from(header.length.get()).map_err(|_| RmcError::MalformedDatabase {
                offset: 6,
                reason: "declared length does not fit in memory",
            })?;
        if declared < DB_HEADER_LEN {
            return Err(RmcError::MalformedDatabase {
                offset: 6,
                reason: "declared length shorter than the database header",
            });
        }
        if declared > buffer.len() {
            return Err(RmcError::MalformedDatabase {
                offset: 6,
                reason: "declared length exceeds the buffer",
            });
        }

        Ok(Self { bytes: &buffer[..declared], version: header.version })
    }

    pub fn version(&self) -> u8 {
        self.version
    }

    /// Declared total length, header included.
    pub fn total_len(&self) -> usize {
        self.bytes.len()
    }

    /// Records in stored order.
    pub fn records(&self) -> Records<'db> {
        Records { bytes: self.bytes, pos: DB_HEADER_LEN, done: false }
    }

    /// First entry of the first record keyed by `signature` that matches `kind`/`name`.
    ///
    /// Only the first record carrying the signature is searched; a later record with
    /// the same signature is never consulted.
    pub fn query_signature(
        &self,
        signature: &Signature,
        kind: PolicyKind,
        name: &[u8],
    ) -> RmcResult<PolicyRef<'db>> {
        for record in self.records() {
            let record = record?;
            if record.signature != *signature {
                continue;
            }
            for entry in record.entries() {
                let entry = entry?;
                if entry.matches(kind, name) {
                    return Ok(entry);
                }
            }
            return Err(RmcError::NotFound);
        }
        Err(RmcError::NotFound)
    }
}

/// Look up the blob `fingerprint`'s board stores under `kind`/`name`.
///
/// A fingerprint without identity values is rejected before the scan.
/// The returned reference borrows `database`. Offsets in it are relative to the
/// start of `database`.
pub fn query<'db>(
    fingerprint: &Fingerprint<'_>,
    database: &'db [u8],
    kind: PolicyKind,
    name: &[u8],
) -> RmcResult<PolicyRef<'db>> {
    let database = Database::parse(database)?;
    let signature = record_signature(fingerprint)?;
    database.query_signature(&signature, kind, name)
}

/// One record inside a database.
#[derive(Debug, Clone, Copy)]
pub struct RecordView<'db> {
    pub signature: Signature,
    /// Offset of the record header within the database.
    pub offset: usize,
    /// Declared record length, header included.
    pub length: usize,
    db: &'db [u8],
}

impl<'db> RecordView<'db> {
    /// Raw record bytes, header included.
    pub fn as_bytes(&self) -> &'db [u8] {
        &self.db[self.offset..self.offset + self.length]
    }

    /// Entries in stored order. Offsets are relative to the database.
    pub fn entries(&self) -> Entries<'db> {
        Entries::new(
            self.db,
            self.offset + RECORD_HEADER_LEN,
            self.offset + self.length,
            Scope::Database,
        )
    }
}

/// Bounded iterator over the records of a database.
pub struct Records<'db> {
    bytes: &'db [u8],
    pos: usize,
    done: bool,
}

impl<'db> Records<'db> {
    fn fail(&mut self, offset: usize, reason: &'static str) -> Option<RmcResult<RecordView<'db>>> {
        self.done = true;
        Some(Err(RmcError::MalformedDatabase { offset, reason }))
    }
}

impl<'db> Iterator for Records<'db> {
    type Item = RmcResult<RecordView<'db>>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.done || self.pos >= self.bytes.len() {
            return None;
        }

        let pos = self.pos;
        let Ok((header, _)) = RecordHeader::read_from_prefix(&self.bytes[pos..]) else {
            return self.fail(pos, "record header runs past the end of the database");
        };
        let Ok(length) = usize::try_from(header.length.get()) else {
            return self.fail(pos, "record length does not fit in memory");
        };
        if length < RECORD_HEADER_LEN {
            return self.fail(pos, "record length shorter than its header");
        }
        if length > self.bytes.len() - pos {
            return self.fail(pos, "record runs past the end of the database");
        }

        self.pos = pos + length;
        Some(Ok(RecordView {
            signature: Signature(header.signature),
            offset: pos,
            length,
            db: self.bytes,
        }))
    }
}
