//! Board signature: the fixed-size key records are addressed by.
//!
//! The signature interleaves the two identity strings of a fingerprint one byte at a
//! time. It is not a hash. Two boards whose identity strings interleave to the same
//! 32 bytes collide, and that risk is accepted in exchange for a key that keeps the
//! readable content of both strings.

use std::fmt;

use crate::error::{RmcError, RmcResult};
use crate::fingerprint::Fingerprint;

/// Length of a signature in bytes.
pub const SIGNATURE_LEN: usize = 32;

/// 32-byte record key derived from a fingerprint.
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
pub struct Signature(pub [u8; SIGNATURE_LEN]);

impl Signature {
    pub fn as_bytes(&self) -> &[u8; SIGNATURE_LEN] {
        &self.0
    }

    /// Lowercase hex of all 32 bytes.
    pub fn to_hex(&self) -> String {
        self.0.iter().map(|b| format!("{b:02x}")).collect()
    }
}

impl fmt::Debug for Signature {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Signature({})", self.to_hex())
    }
}

impl fmt::Display for Signature {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_hex())
    }
}

/// Bytes up to (not including) the first NUL.
fn c_str(bytes: &[u8]) -> &[u8] {
    match bytes.iter().position(|&b| b == 0) {
        Some(end) => &bytes[..end],
        None => bytes,
    }
}

/// Derive the signature of a fingerprint.
///
/// Even positions take the next byte of the system product name, odd positions the
/// next byte of the board product name. As soon as the source for a position is
/// exhausted, the unread remainder of the other source fills the rest of the buffer
/// and derivation stops. Terminators are never copied; unused positions stay zero.
pub fn derive_signature(fingerprint: &Fingerprint<'_>) -> Signature {
    let (system, board) = fingerprint.identity();
    interleave(c_str(system), c_str(board))
}

/// Signature records are stored and looked up under.
///
/// Fails with [`RmcError::EmptyFingerprint`] when both identity values are empty:
/// their all-zero signature would match every board the walker found nothing for.
pub fn record_signature(fingerprint: &Fingerprint<'_>) -> RmcResult<Signature> {
    let (system, board) = fingerprint.identity();
    if c_str(system).is_empty() && c_str(board).is_empty() {
        return Err(RmcError::EmptyFingerprint);
    }
    Ok(derive_signature(fingerprint))
}

fn interleave(even: &[u8], odd: &[u8]) -> Signature {
    let mut raw = [0u8; SIGNATURE_LEN];
    let mut even_pos = 0;
    let mut odd_pos = 0;

    for i in 0..SIGNATURE_LEN {
        let (source, pos, other, other_pos) = if i & 1 == 1 {
            (odd, &mut odd_pos, even, even_pos)
        } else {
            (even, &mut even_pos, odd, odd_pos)
        };

        if *pos >= source.len() {
            let tail = &other[other_pos..];
            let n = tail.len().min(SIGNATURE_LEN - i);
            raw[i..i + n].copy_from_slice(&tail[..n]);
            break;
        }

        raw[i] = source[*pos];
        *pos += 1;
    }

    Signature(raw)
}
