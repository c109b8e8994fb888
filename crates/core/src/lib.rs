//! rmc-core
//!
//! Core library for runtime machine configuration: identify a board from its
//! SMBIOS tables and look up the board-specific data stored for it.
//!
//! The pieces, bottom-up:
//! - [`smbios`] walks the entry point and structure table.
//! - [`fingerprint`] holds the fixed catalog of identifying strings.
//! - [`signature`] derives the 32-byte key a board's records are stored under.
//! - [`codec`] encodes records and databases and answers queries against them.
//! - [`host`] supplies SMBIOS memory on a given platform.
//!
//! The parsing and query code does no I/O and no logging; it works on borrowed
//! buffers and hands back borrowed results.

pub mod codec;
pub mod config;
pub mod error;
pub mod fingerprint;
pub mod host;
pub mod signature;
pub mod smbios;

pub use codec::{
    encode_database, encode_record, is_valid_database, query, Database, DbBlob, PolicyEntry,
    PolicyKind, PolicyRef, RecordBlob,
};
pub use error::{RmcError, RmcResult};
pub use fingerprint::{default_fingerprint, Finger, FingerRole, Fingerprint};
pub use signature::{derive_signature, record_signature, Signature, SIGNATURE_LEN};
pub use smbios::{extract_fingerprint, locate_structure_table};

/// Returns the library version as encoded at compile time.
pub fn version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}
