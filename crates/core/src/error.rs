use thiserror::Error;

/// Error type for table walking, fingerprint files, and the record/database codec.
///
/// Every failure is returned to the immediate caller; nothing in the core retries,
/// since the input buffers do not change between attempts.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum RmcError {
    /// The entry point anchor is neither `_SM3_` nor `_SM_`.
    #[error("Unrecognized SMBIOS entry point anchor")]
    UnrecognizedEntryPoint,

    /// The structure table (or entry point) is truncated or not properly terminated.
    #[error("Malformed SMBIOS structure table at offset {offset}: {reason}")]
    MalformedTable { offset: usize, reason: &'static str },

    /// A length field inside the database would move the scan outside its bounds.
    #[error("Malformed RMC database at offset {offset}: {reason}")]
    MalformedDatabase { offset: usize, reason: &'static str },

    /// A standalone record blob does not describe its own bytes.
    #[error("Malformed RMC record at offset {offset}: {reason}")]
    MalformedRecord { offset: usize, reason: &'static str },

    /// The buffer does not start with the database magic.
    #[error("Not an RMC database (bad magic)")]
    InvalidMagic,

    /// The database magic matched but the format version is not one we read.
    #[error("Unsupported RMC database version {found}; expected {expected}")]
    UnsupportedVersion { found: u8, expected: u8 },

    /// No record for the board, or no matching entry in the board's record.
    #[error("No matching policy found for this board")]
    NotFound,

    /// A record or database buffer could not be allocated.
    #[error("Failed to allocate {requested} bytes")]
    AllocationFailure { requested: usize },

    /// A fingerprint file does not follow the fixed finger catalog.
    #[error("Corrupt fingerprint file at finger {finger}: {reason}")]
    CorruptFingerprintFile { finger: usize, reason: String },

    /// Both identity values of the fingerprint are empty, so it names no board.
    #[error("Fingerprint has no identity values; cannot derive a board signature")]
    EmptyFingerprint,

    /// A record must carry at least one policy entry.
    #[error("Cannot build a record without policy entries")]
    EmptyPolicyList,

    /// A database must carry at least one record.
    #[error("Cannot build a database without records")]
    EmptyRecordList,

    /// Policy names are stored NUL-terminated and cannot contain NUL themselves.
    #[error("Policy name contains a NUL byte")]
    InvalidPolicyName,

    /// Kind tag not known to this version of the format.
    #[error("Unknown policy kind {0}")]
    UnknownPolicyKind(u8),
}

/// Convenience result type for core operations.
pub type RmcResult<T> = Result<T, RmcError>;
