use std::fs;
use std::path::Path;

use rmc::logging::level_for_verbosity;
use rmc::{policy_name_for, read_file, sha256_bytes, write_file};
use tempfile::tempdir;

#[test]
fn sha256_bytes_matches_known_digest() {
    assert_eq!(
        sha256_bytes(b"abc"),
        "ba7816bf8f01cfea414140de5dae2223b00361a396177a9cb410ff61f20015ad"
    );
}

#[test]
fn policy_name_uses_last_path_component() {
    assert_eq!(policy_name_for(Path::new("boards/minnow/audio.conf")), "audio.conf");
    assert_eq!(policy_name_for(Path::new("BOOTX64.cfg")), "BOOTX64.cfg");
}

#[test]
fn write_file_creates_parent_directories() {
    let dir = tempdir().expect("tempdir");
    let path = dir.path().join("a/b/c.bin");
    write_file(&path, b"data", "test file").expect("write");
    assert_eq!(fs::read(&path).expect("read back"), b"data");
}

#[test]
fn read_file_names_what_was_missing() {
    let dir = tempdir().expect("tempdir");
    let err = read_file(&dir.path().join("gone.db"), "database").unwrap_err();
    assert!(err.to_string().contains("Failed to read database"), "{err}");
}

#[test]
fn verbosity_raises_log_level() {
    assert_eq!(level_for_verbosity(0), log::LevelFilter::Warn);
    assert_eq!(level_for_verbosity(1), log::LevelFilter::Info);
    assert_eq!(level_for_verbosity(2), log::LevelFilter::Debug);
    assert_eq!(level_for_verbosity(9), log::LevelFilter::Trace);
}
