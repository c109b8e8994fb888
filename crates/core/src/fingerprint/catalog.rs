use serde::Serialize;

/// SMBIOS structure type that terminates a structure table.
///
/// Also used by the reserved fingers as a "never matches" marker, since the walker
/// stops before it would compare an end-of-table structure.
pub const END_OF_TABLE_TYPE: u8 = 127;

/// Number of fingers in every fingerprint.
pub const FINGER_COUNT: usize = 5;

/// Position of a finger inside a fingerprint.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum FingerRole {
    /// Product name from System Information (type 1). First identity source.
    SystemProduct,
    /// Product name from Baseboard Information (type 2). Second identity source.
    BoardProduct,
    /// Version string from Processor Information (type 4).
    ProcessorVersion,
    ReservedA,
    ReservedB,
}

impl FingerRole {
    /// All roles in catalog (and file) order.
    pub const ALL: [FingerRole; FINGER_COUNT] = [
        FingerRole::SystemProduct,
        FingerRole::BoardProduct,
        FingerRole::ProcessorVersion,
        FingerRole::ReservedA,
        FingerRole::ReservedB,
    ];

    /// Position of this role in the catalog.
    pub fn index(self) -> usize {
        match self {
            FingerRole::SystemProduct => 0,
            FingerRole::BoardProduct => 1,
            FingerRole::ProcessorVersion => 2,
            FingerRole::ReservedA => 3,
            FingerRole::ReservedB => 4,
        }
    }
}

/// Fixed description of one finger: where the walker looks for its string.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FingerSpec {
    pub role: FingerRole,
    /// SMBIOS structure type the string is taken from.
    pub structure_type: u8,
    /// Offset of the string-index byte in that structure's formatted area.
    pub offset: u8,
    /// Human-readable label. Written into fingerprint files, never compared.
    pub name: &'static str,
}

/// The finger catalog shared by every producer and consumer of fingerprints.
///
/// Databases are keyed by values derived from these exact fields; changing an entry
/// invalidates every database generated before the change.
pub const FINGER_CATALOG: [FingerSpec; FINGER_COUNT] = [
    FingerSpec {
        role: FingerRole::SystemProduct,
        structure_type: 0x01,
        offset: 0x05,
        name: "product_name",
    },
    FingerSpec {
        role: FingerRole::BoardProduct,
        structure_type: 0x02,
        offset: 0x05,
        name: "product_name",
    },
    FingerSpec {
        role: FingerRole::ProcessorVersion,
        structure_type: 0x04,
        offset: 0x10,
        name: "version",
    },
    FingerSpec {
        role: FingerRole::ReservedA,
        structure_type: END_OF_TABLE_TYPE,
        offset: 0x00,
        name: "reserved",
    },
    FingerSpec {
        role: FingerRole::ReservedB,
        structure_type: END_OF_TABLE_TYPE,
        offset: 0x00,
        name: "reserved",
    },
];
