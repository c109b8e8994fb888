use std::borrow::Cow;

use serde::{Deserialize, Serialize};

use crate::error::{RmcError, RmcResult};

/// Name stored with command-line entries. Lookups of that kind ignore names.
pub const CMDLINE_ENTRY_NAME: &str = "cmdline";

/// Kind tag of a policy entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PolicyKind {
    /// Kernel command-line fragment, stored as the entry blob.
    #[serde(rename = "cmdline")]
    CommandLine,
    /// Named file blob.
    #[serde(rename = "blob")]
    Blob,
}

impl PolicyKind {
    /// Wire tag of this kind.
    pub fn tag(self) -> u8 {
        match self {
            PolicyKind::CommandLine => 0,
            PolicyKind::Blob => 1,
        }
    }

    /// Decode a wire tag.
    pub fn from_tag(tag: u8) -> RmcResult<Self> {
        match tag {
            0 => Ok(PolicyKind::CommandLine),
            1 => Ok(PolicyKind::Blob),
            other => Err(RmcError::UnknownPolicyKind(other)),
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            PolicyKind::CommandLine => "cmdline",
            PolicyKind::Blob => "blob",
        }
    }
}

/// One piece of board-specific data to pack into a record.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PolicyEntry<'a> {
    pub kind: PolicyKind,
    /// Lookup name, without terminator. Must not contain NUL.
    pub name: Cow<'a, [u8]>,
    /// Payload, binary, not terminated.
    pub blob: Cow<'a, [u8]>,
}

impl<'a> PolicyEntry<'a> {
    /// A named file blob.
    pub fn blob(name: impl Into<Cow<'a, [u8]>>, blob: impl Into<Cow<'a, [u8]>>) -> Self {
        Self { kind: PolicyKind::Blob, name: name.into(), blob: blob.into() }
    }

    /// A command-line fragment.
    pub fn command_line(fragment: impl Into<Cow<'a, [u8]>>) -> Self {
        Self {
            kind: PolicyKind::CommandLine,
            name: Cow::Borrowed(CMDLINE_ENTRY_NAME.as_bytes()),
            blob: fragment.into(),
        }
    }

    pub(crate) fn validate(&self) -> RmcResult<()> {
        if self.name.contains(&0) {
            return Err(RmcError::InvalidPolicyName);
        }
        Ok(())
    }
}

/// Zero-copy view of an entry inside a record or database buffer.
///
/// Both slices borrow the buffer the entry was found in, so the buffer cannot be
/// dropped or mutated while the reference is alive.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PolicyRef<'db> {
    /// Raw kind tag as stored. Unknown tags are kept so dumps can show them.
    pub kind_tag: u8,
    pub name: &'db [u8],
    pub blob: &'db [u8],
    /// Offset of the entry header within the scanned buffer.
    pub entry_offset: usize,
    /// Offset of the first blob byte within the scanned buffer.
    pub blob_offset: usize,
}

impl<'db> PolicyRef<'db> {
    pub fn kind(&self) -> Option<PolicyKind> {
        PolicyKind::from_tag(self.kind_tag).ok()
    }

    /// Byte range of the blob within the scanned buffer.
    pub fn blob_range(&self) -> std::ops::Range<usize> {
        self.blob_offset..self.blob_offset + self.blob.len()
    }

    pub fn name_lossy(&self) -> Cow<'db, str> {
        String::from_utf8_lossy(self.name)
    }

    /// Whether this entry answers a query for `kind`/`name`.
    ///
    /// Blob entries must match the name exactly; command-line entries match on
    /// kind alone.
    pub fn matches(&self, kind: PolicyKind, name: &[u8]) -> bool {
        if self.kind_tag != kind.tag() {
            return false;
        }
        match kind {
            PolicyKind::Blob => self.name == name,
            PolicyKind::CommandLine => true,
        }
    }
}
