use std::borrow::Cow;

use crate::error::{RmcError, RmcResult};
use crate::fingerprint::{default_fingerprint, Fingerprint, FINGER_CATALOG};

/// Split `bytes` at the first NUL, returning (string, rest after the terminator).
fn take_c_string(bytes: &[u8]) -> Option<(&[u8], &[u8])> {
    let end = bytes.iter().position(|&b| b == 0)?;
    Some((&bytes[..end], &bytes[end + 1..]))
}

fn corrupt(finger: usize, reason: impl Into<String>) -> RmcError {
    RmcError::CorruptFingerprintFile { finger, reason: reason.into() }
}

impl<'a> Fingerprint<'a> {
    /// Serialize into the flat fingerprint file format.
    ///
    /// For each finger in catalog order: `type: u8, offset: u8, name\0, value\0`.
    pub fn to_file_bytes(&self) -> Vec<u8> {
        let mut out = Vec::new();
        for finger in self.fingers() {
            out.push(finger.structure_type);
            out.push(finger.offset);
            out.extend_from_slice(&finger.name);
            out.push(0);
            out.extend_from_slice(&finger.value);
            out.push(0);
        }
        out
    }

    /// Parse a fingerprint file, borrowing names and values from `bytes`.
    ///
    /// The type and offset at every position must match the finger catalog; a
    /// mismatch means the file was produced for a different catalog (or is damaged)
    /// and is rejected rather than skipped. Bytes after the fifth finger are ignored.
    pub fn from_file_bytes(bytes: &'a [u8]) -> RmcResult<Self> {
        let mut fingerprint: Fingerprint<'a> = default_fingerprint();
        let mut rest = bytes;

        for (idx, (finger, spec)) in
            fingerprint.fingers_mut().iter_mut().zip(FINGER_CATALOG.iter()).enumerate()
        {
            let (&structure_type, after_type) =
                rest.split_first().ok_or_else(|| corrupt(idx, "missing type byte"))?;
            if structure_type != spec.structure_type {
                return Err(corrupt(
                    idx,
                    format!(
                        "expected type 0x{:02x}, but got 0x{:02x}",
                        spec.structure_type, structure_type
                    ),
                ));
            }

            let (&offset, after_offset) =
                after_type.split_first().ok_or_else(|| corrupt(idx, "missing offset byte"))?;
            if offset != spec.offset {
                return Err(corrupt(
                    idx,
                    format!("expected offset 0x{:02x}, but got 0x{:02x}", spec.offset, offset),
                ));
            }

            let (name, after_name) =
                take_c_string(after_offset).ok_or_else(|| corrupt(idx, "unterminated name"))?;
            let (value, after_value) =
                take_c_string(after_name).ok_or_else(|| corrupt(idx, "unterminated value"))?;

            finger.name = Cow::Borrowed(name);
            finger.value = Cow::Borrowed(value);
            rest = after_value;
        }

        Ok(fingerprint)
    }
}
