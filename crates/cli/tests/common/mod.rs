#![allow(dead_code)]

use std::fs;
use std::path::{Path, PathBuf};

fn structure(structure_type: u8, handle: u16, fields: &[u8], strings: &[&str]) -> Vec<u8> {
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

/// Structure table with system, baseboard and processor information.
pub fn board_table(system: &str, board: &str, cpu: &str) -> Vec<u8> {
    let mut system_fields = vec![0u8; 0x17];
    system_fields[0] = 1;
    system_fields[1] = 2;
    let mut board_fields = vec![0u8; 0x0B];
    board_fields[0] = 1;
    board_fields[1] = 2;
    let mut cpu_fields = vec![0u8; 0x26];
    cpu_fields[0] = 1;
    cpu_fields[0x0C] = 2;

    let mut out = Vec::new();
    out.extend(structure(1, 1, &system_fields, &["Acme", system]));
    out.extend(structure(2, 2, &board_fields, &["Acme", board]));
    out.extend(structure(4, 4, &cpu_fields, &["CPU0", cpu]));
    out.extend(structure(127, 0xFFFF, &[], &[]));
    out
}

/// `dmidecode --dump-bin` layout: SMBIOS 3.0 entry point at 0, table at 0x20.
pub fn dump_image(table: &[u8]) -> Vec<u8> {
    let mut ep = b"_SM3_".to_vec();
    ep.extend_from_slice(&[0, 0x18, 3, 2, 0, 1, 0]);
    ep.extend_from_slice(&(table.len() as u32).to_le_bytes());
    ep.extend_from_slice(&0x20u64.to_le_bytes());
    let sum = ep.iter().fold(0u8, |acc, b| acc.wrapping_add(*b));
    ep[5] = sum.wrapping_neg();

    ep.resize(0x20, 0);
    ep.extend_from_slice(table);
    ep
}

/// Write a dump for a board into `dir` and return its path.
pub fn write_dump(dir: &Path, file: &str, system: &str, board: &str) -> PathBuf {
    let path = dir.join(file);
    fs::write(&path, dump_image(&board_table(system, board, "Test CPU"))).expect("write dump");
    path
}
