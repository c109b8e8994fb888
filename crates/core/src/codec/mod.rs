//! Record and database codec.
//!
//! A record holds one board's policy entries behind its signature; a database is a
//! versioned header followed by concatenated records. Encoders allocate and own new
//! buffers. Queries and iterators only borrow the buffer they scan, and every advance
//! by a stored length field is checked against the enclosing length first.

mod database;
mod policy;
mod record;

pub use database::{
    encode_database, is_valid_database, query, Database, DbBlob, DbHeader, RecordView, Records,
    DB_HEADER_LEN, DB_MAGIC, DB_VERSION,
};
pub use policy::{PolicyEntry, PolicyKind, PolicyRef, CMDLINE_ENTRY_NAME};
pub use record::{
    encode_record, Entries, EntryHeader, RecordBlob, RecordHeader, ENTRY_HEADER_LEN,
    RECORD_HEADER_LEN,
};

use crate::error::{RmcError, RmcResult};

/// Which error an entry scan reports when it hits a bad length.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Scope {
    Record,
    Database,
}

impl Scope {
    fn error(self, offset: usize, reason: &'static str) -> RmcError {
        match self {
            Scope::Record => RmcError::MalformedRecord { offset, reason },
            Scope::Database => RmcError::MalformedDatabase { offset, reason },
        }
    }
}

fn allocate(len: usize) -> RmcResult<Vec<u8>> {
    let mut bytes = Vec::new();
    bytes
        .try_reserve_exact(len)
        .map_err(|_| RmcError::AllocationFailure { requested: len })?;
    Ok(bytes)
}
