//! Board fingerprints: the fixed set of SMBIOS strings that identify a board.
//!
//! A fingerprint always holds exactly five fingers in catalog order. Values start
//! out empty and are filled either by the structure-table walker or by parsing a
//! fingerprint file. Both sources hand out borrowed values, so a fingerprint
//! extracted from a mapped table lives only as long as the mapping unless it is
//! converted with [`Fingerprint::into_owned`].

mod catalog;
mod file;

use std::borrow::Cow;

use serde::Serialize;

pub use catalog::{FingerRole, FingerSpec, END_OF_TABLE_TYPE, FINGER_CATALOG, FINGER_COUNT};

/// One identifying field: where it comes from and what was found there.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Finger<'a> {
    pub structure_type: u8,
    pub offset: u8,
    /// Label bytes, without the NUL terminator.
    pub name: Cow<'a, [u8]>,
    /// Extracted string bytes, without the NUL terminator. Empty until populated.
    pub value: Cow<'a, [u8]>,
}

impl<'a> Finger<'a> {
    fn from_spec(spec: &FingerSpec) -> Self {
        Self {
            structure_type: spec.structure_type,
            offset: spec.offset,
            name: Cow::Borrowed(spec.name.as_bytes()),
            value: Cow::Borrowed(&[][..]),
        }
    }

    /// Lossy UTF-8 rendering of the value, for display.
    pub fn value_lossy(&self) -> Cow<'_, str> {
        String::from_utf8_lossy(&self.value)
    }

    /// Lossy UTF-8 rendering of the label, for display.
    pub fn name_lossy(&self) -> Cow<'_, str> {
        String::from_utf8_lossy(&self.name)
    }

    fn into_owned(self) -> Finger<'static> {
        Finger {
            structure_type: self.structure_type,
            offset: self.offset,
            name: Cow::Owned(self.name.into_owned()),
            value: Cow::Owned(self.value.into_owned()),
        }
    }
}

/// Five fingers in fixed role order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Fingerprint<'a> {
    fingers: [Finger<'a>; FINGER_COUNT],
}

impl<'a> Fingerprint<'a> {
    /// All fingers in catalog order.
    pub fn fingers(&self) -> &[Finger<'a>] {
        &self.fingers
    }

    pub fn finger(&self, role: FingerRole) -> &Finger<'a> {
        &self.fingers[role.index()]
    }

    /// Replace the value of one finger.
    pub fn set_value(&mut self, role: FingerRole, value: impl Into<Cow<'a, [u8]>>) {
        self.fingers[role.index()].value = value.into();
    }

    pub(crate) fn fingers_mut(&mut self) -> &mut [Finger<'a>; FINGER_COUNT] {
        &mut self.fingers
    }

    /// The two values the signature is derived from, in interleave order.
    pub fn identity(&self) -> (&[u8], &[u8]) {
        (
            &self.finger(FingerRole::SystemProduct).value,
            &self.finger(FingerRole::BoardProduct).value,
        )
    }

    /// Detach the fingerprint from whatever buffer its values borrow from.
    pub fn into_owned(self) -> Fingerprint<'static> {
        let [a, b, c, d, e] = self.fingers;
        Fingerprint {
            fingers: [
                a.into_owned(),
                b.into_owned(),
                c.into_owned(),
                d.into_owned(),
                e.into_owned(),
            ],
        }
    }

    /// Serializable view used for reports.
    pub fn summary(&self) -> FingerprintSummary {
        let fingers = FingerRole::ALL
            .iter()
            .zip(self.fingers.iter())
            .map(|(role, finger)| FingerSummary {
                role: *role,
                structure_type: finger.structure_type,
                offset: finger.offset,
                name: finger.name_lossy().into_owned(),
                value: finger.value_lossy().into_owned(),
            })
            .collect();
        FingerprintSummary { fingers, signature: crate::signature::derive_signature(self).to_hex() }
    }
}

impl Default for Fingerprint<'static> {
    fn default() -> Self {
        default_fingerprint()
    }
}

/// A fingerprint with the catalog's types, offsets and labels and empty values.
pub fn default_fingerprint() -> Fingerprint<'static> {
    Fingerprint { fingers: FINGER_CATALOG.map(|spec| Finger::from_spec(&spec)) }
}

/// Report form of a fingerprint (lossy strings, hex signature).
#[derive(Debug, Clone, Serialize)]
pub struct FingerprintSummary {
    pub fingers: Vec<FingerSummary>,
    pub signature: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct FingerSummary {
    pub role: FingerRole,
    pub structure_type: u8,
    pub offset: u8,
    pub name: String,
    pub value: String,
}
