mod common;

use common::{
    board_table, end_of_table, processor_information, structure, system_information, table,
};
use rmc_core::smbios::{StructureTable, STRUCTURE_HEADER_LEN};
use rmc_core::{extract_fingerprint, FingerRole, RmcError};

#[test]
fn extracts_identity_and_version_strings() {
    let bytes = board_table("Minnowboard", "MinnowBoard MAX", "Intel(R) Atom(TM) E3845");
    let fp = extract_fingerprint(&bytes).expect("fingerprint");

    assert_eq!(fp.finger(FingerRole::SystemProduct).value.as_ref(), b"Minnowboard");
    assert_eq!(fp.finger(FingerRole::BoardProduct).value.as_ref(), b"MinnowBoard MAX");
    assert_eq!(fp.finger(FingerRole::ProcessorVersion).value.as_ref(), b"Intel(R) Atom(TM) E3845");
    assert!(fp.finger(FingerRole::ReservedA).value.is_empty());
    assert!(fp.finger(FingerRole::ReservedB).value.is_empty());
}

#[test]
fn end_of_table_alone_leaves_every_value_empty() {
    let bytes = end_of_table();
    let fp = extract_fingerprint(&bytes).expect("fingerprint");
    assert!(fp.fingers().iter().all(|f| f.value.is_empty()));
}

#[test]
fn recurring_type_keeps_the_last_match() {
    let bytes = table(&[system_information("First"), system_information("Second")]);
    let fp = extract_fingerprint(&bytes).expect("fingerprint");
    assert_eq!(fp.finger(FingerRole::SystemProduct).value.as_ref(), b"Second");
}

#[test]
fn values_borrow_from_the_table() {
    let bytes = board_table("Sys", "Board", "Cpu");
    let fp = extract_fingerprint(&bytes).expect("fingerprint");
    let value = fp.finger(FingerRole::BoardProduct).value.as_ref();
    let range = bytes.as_ptr_range();
    assert!(range.contains(&value.as_ptr()));
}

#[test]
fn string_index_zero_resolves_to_empty() {
    let mut fields = vec![0u8; 0x17];
    fields[0] = 1;
    let bytes = table(&[structure(1, 1, &fields, &["Acme"])]);
    let fp = extract_fingerprint(&bytes).expect("fingerprint");
    assert!(fp.finger(FingerRole::SystemProduct).value.is_empty());
}

#[test]
fn field_beyond_formatted_area_resolves_to_empty() {
    // A type 4 structure too short to hold the version field at 0x10.
    let bytes = table(&[structure(4, 4, &[1, 0, 0, 0], &["CPU0"])]);
    let fp = extract_fingerprint(&bytes).expect("fingerprint");
    assert!(fp.finger(FingerRole::ProcessorVersion).value.is_empty());
}

#[test]
fn string_index_past_the_string_set_is_malformed() {
    let mut fields = vec![0u8; 0x17];
    fields[1] = 5;
    let bytes = table(&[structure(1, 1, &fields, &["only one"])]);
    let err = extract_fingerprint(&bytes).unwrap_err();
    assert!(matches!(err, RmcError::MalformedTable { .. }), "{err:?}");
}

#[test]
fn string_reference_into_empty_set_is_malformed() {
    let mut fields = vec![0u8; 0x17];
    fields[1] = 1;
    let bytes = table(&[structure(1, 1, &fields, &[])]);
    let err = extract_fingerprint(&bytes).unwrap_err();
    assert!(matches!(err, RmcError::MalformedTable { .. }), "{err:?}");
}

#[test]
fn missing_end_of_table_is_malformed() {
    let bytes = system_information("NoEnd");
    let err = extract_fingerprint(&bytes).unwrap_err();
    assert!(err.to_string().contains("end-of-table"), "{err}");
}

#[test]
fn missing_double_nul_is_malformed() {
    let mut bytes = processor_information("cpu");
    bytes.truncate(bytes.len() - 1);
    let err = extract_fingerprint(&bytes).unwrap_err();
    assert!(err.to_string().contains("double-NUL"), "{err}");
}

#[test]
fn formatted_length_past_the_table_is_malformed() {
    let bytes = vec![1u8, 0x40, 0, 0, 1, 2];
    let err = extract_fingerprint(&bytes).unwrap_err();
    assert_eq!(
        err,
        RmcError::MalformedTable { offset: 0, reason: "formatted area runs past the table" }
    );
}

#[test]
fn formatted_length_shorter_than_header_is_malformed() {
    let mut bytes = vec![3u8, 2, 0, 0, 0, 0];
    bytes.extend_from_slice(&end_of_table());
    let err = extract_fingerprint(&bytes).unwrap_err();
    assert!(err.to_string().contains("shorter than its header"), "{err}");
}

#[test]
fn iterator_reports_offsets_and_headers() {
    let bytes = board_table("Sys", "Board", "Cpu");
    let structures: Vec<_> = StructureTable::new(&bytes)
        .structures()
        .collect::<Result<_, _>>()
        .expect("structures");

    let types: Vec<u8> = structures.iter().map(|s| s.header.structure_type).collect();
    assert_eq!(types, vec![0, 1, 2, 4, 11]);
    assert_eq!(structures[0].offset, 0);
    assert_eq!(structures[1].header.handle.get(), 0x0001);
    assert!(structures.iter().all(|s| s.formatted().len() >= STRUCTURE_HEADER_LEN));
    assert_eq!(structures[4].string(1).expect("oem string"), b"oem string");
}
