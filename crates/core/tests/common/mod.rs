//! Builders for synthetic SMBIOS tables and entry points.

#![allow(dead_code)]

use rmc_core::{default_fingerprint, FingerRole, Fingerprint};

/// One structure: header, `fields` after the header, then the string set.
pub fn structure(structure_type: u8, handle: u16, fields: &[u8], strings: &[&str]) -> Vec<u8> {
    let mut out = vec![structure_type, (4 + fields.len()) as u8];
    out.extend_from_slice(&handle.to_le_bytes());
    out.extend_from_slice(fields);
    if strings.is_empty() {
        out.push(0);
    }
    for s in strings {
        out.extend_from_slice(s.as_bytes());
        out.push(0);
    }
    out.push(0);
    out
}

/// Type 1: manufacturer string 1 at 0x04, product name string 2 at 0x05.
pub fn system_information(product: &str) -> Vec<u8> {
    let mut fields = vec![0u8; 0x1B - 4];
    fields[0] = 1;
    fields[1] = 2;
    structure(1, 0x0001, &fields, &["Acme Corp", product])
}

/// Type 2: manufacturer string 1 at 0x04, product name string 2 at 0x05.
pub fn baseboard_information(product: &str) -> Vec<u8> {
    let mut fields = vec![0u8; 0x0F - 4];
    fields[0] = 1;
    fields[1] = 2;
    structure(2, 0x0002, &fields, &["Acme Corp", product])
}

/// Type 4: socket string 1 at 0x04, version string 2 at 0x10.
pub fn processor_information(version: &str) -> Vec<u8> {
    let mut fields = vec![0u8; 0x2A - 4];
    fields[0] = 1;
    fields[0x10 - 4] = 2;
    structure(4, 0x0004, &fields, &["CPU0", version])
}

pub fn end_of_table() -> Vec<u8> {
    structure(127, 0xFFFF, &[], &[])
}

/// Concatenate structures and close the table.
pub fn table(structures: &[Vec<u8>]) -> Vec<u8> {
    let mut out: Vec<u8> = structures.concat();
    out.extend_from_slice(&end_of_table());
    out
}

/// A table with a BIOS structure, the three fingerprinted structures, and an OEM string.
pub fn board_table(system: &str, board: &str, cpu: &str) -> Vec<u8> {
    table(&[
        structure(0, 0x0000, &[1, 2, 0, 0xE8, 0, 0, 0, 0], &["Acme BIOS", "1.0.7"]),
        system_information(system),
        baseboard_information(board),
        processor_information(cpu),
        structure(11, 0x000B, &[1], &["oem string"]),
    ])
}

fn fix_checksum(bytes: &mut [u8], at: usize) {
    bytes[at] = 0;
    let sum = bytes.iter().fold(0u8, |acc, b| acc.wrapping_add(*b));
    bytes[at] = sum.wrapping_neg();
}

/// SMBIOS 3.0 entry point naming a table at `address` of at most `max_size` bytes.
pub fn smbios3_entry_point(address: u64, max_size: u32) -> Vec<u8> {
    let mut ep = b"_SM3_".to_vec();
    ep.extend_from_slice(&[0, 0x18, 3, 2, 0, 1, 0]);
    ep.extend_from_slice(&max_size.to_le_bytes());
    ep.extend_from_slice(&address.to_le_bytes());
    fix_checksum(&mut ep, 5);
    ep
}

/// SMBIOS 2.8 entry point naming a table at `address` of `length` bytes.
pub fn smbios2_entry_point(address: u32, length: u16) -> Vec<u8> {
    let mut ep = b"_SM_".to_vec();
    ep.extend_from_slice(&[0, 0x1F, 2, 8, 0x00, 0x01, 0, 0, 0, 0, 0, 0]);
    ep.extend_from_slice(b"_DMI_");
    ep.push(0);
    ep.extend_from_slice(&length.to_le_bytes());
    ep.extend_from_slice(&address.to_le_bytes());
    ep.extend_from_slice(&5u16.to_le_bytes());
    ep.push(0x28);
    fix_checksum(&mut ep[0x10..0x1F], 5);
    fix_checksum(&mut ep, 4);
    ep
}

/// Binary dump layout: entry point at 0, table at 0x20.
pub fn dump_image(table: &[u8]) -> Vec<u8> {
    let mut image = smbios3_entry_point(0x20, table.len() as u32);
    image.resize(0x20, 0);
    image.extend_from_slice(table);
    image
}

/// Fingerprint with the two identity values set.
pub fn fingerprint(system: &str, board: &str) -> Fingerprint<'static> {
    let mut fp = default_fingerprint();
    fp.set_value(FingerRole::SystemProduct, system.as_bytes().to_vec());
    fp.set_value(FingerRole::BoardProduct, board.as_bytes().to_vec());
    fp
}
