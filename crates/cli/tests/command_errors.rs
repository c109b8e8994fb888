mod common;

use std::fs;

use assert_cmd::cargo::cargo_bin_cmd;
use predicates::prelude::*;
use tempfile::tempdir;

#[test]
fn subcommand_is_required() {
    cargo_bin_cmd!("rmc").assert().failure();
}

#[test]
fn query_needs_blob_or_cmdline() {
    let dir = tempdir().expect("tempdir");
    cargo_bin_cmd!("rmc")
        .current_dir(dir.path())
        .args(["query", "-d", "rmc.db"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("--blob").or(predicate::str::contains("--cmdline")));
}

#[test]
fn database_needs_at_least_one_record() {
    cargo_bin_cmd!("rmc").arg("database").assert().failure();
}

#[test]
fn record_without_entries_fails() {
    let dir = tempdir().expect("tempdir");
    let dump = common::write_dump(dir.path(), "board.dump", "Sys", "Brd");
    cargo_bin_cmd!("rmc")
        .current_dir(dir.path())
        .arg("--smbios-dump")
        .arg(&dump)
        .arg("record")
        .assert()
        .failure()
        .stderr(predicate::str::contains("at least one policy entry"));
}

#[test]
fn record_with_missing_blob_file_fails() {
    let dir = tempdir().expect("tempdir");
    let dump = common::write_dump(dir.path(), "board.dump", "Sys", "Brd");
    cargo_bin_cmd!("rmc")
        .current_dir(dir.path())
        .arg("--smbios-dump")
        .arg(&dump)
        .args(["record", "-b", "missing.conf"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Failed to read policy file"));
}

#[test]
fn corrupt_record_file_is_rejected() {
    let dir = tempdir().expect("tempdir");
    fs::write(dir.path().join("bad.record"), b"not a record").expect("write");
    cargo_bin_cmd!("rmc")
        .current_dir(dir.path())
        .args(["database", "bad.record"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Invalid record file"));
}

#[test]
fn non_database_file_is_rejected() {
    let dir = tempdir().expect("tempdir");
    fs::write(dir.path().join("fake.db"), b"SQLite format 3\0").expect("write");
    cargo_bin_cmd!("rmc")
        .current_dir(dir.path())
        .args(["info", "-d", "fake.db"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("bad magic"));
}

#[test]
fn corrupt_fingerprint_file_is_rejected() {
    let dir = tempdir().expect("tempdir");
    fs::write(dir.path().join("bad.fp"), b"\x02\x05product_name\0x\0").expect("write");
    cargo_bin_cmd!("rmc")
        .current_dir(dir.path())
        .args(["extract", "-f", "bad.fp"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Cannot read fingerprint"));
}

#[test]
fn bad_smbios_dump_is_reported() {
    let dir = tempdir().expect("tempdir");
    fs::write(dir.path().join("junk.dump"), vec![0u8; 64]).expect("write");
    cargo_bin_cmd!("rmc")
        .current_dir(dir.path())
        .args(["--smbios-dump", "junk.dump", "fingerprint"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Unrecognized SMBIOS entry point"));
}

#[test]
fn missing_config_file_fails() {
    let dir = tempdir().expect("tempdir");
    cargo_bin_cmd!("rmc")
        .current_dir(dir.path())
        .args(["--config", "nope.json", "info", "-d", "x.db"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Failed to read config"));
}

#[test]
fn dmi_sysfs_source_is_read_from_config() {
    let dir = tempdir().expect("tempdir");
    let table = common::board_table("Configured", "Board", "Cpu");
    let image = common::dump_image(&table);
    fs::write(dir.path().join("smbios_entry_point"), &image[..0x18]).expect("write ep");
    fs::write(dir.path().join("DMI"), &table).expect("write table");
    let config = serde_json::json!({
        "default_source": "dmi-sysfs",
        "dmi_entry_point_path": dir.path().join("smbios_entry_point"),
        "dmi_table_path": dir.path().join("DMI"),
    });
    fs::write(dir.path().join("rmc.json"), config.to_string()).expect("write config");

    cargo_bin_cmd!("rmc")
        .current_dir(dir.path())
        .args(["--config", "rmc.json", "fingerprint"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Finger 0 value  : Configured"));
}

#[cfg(unix)]
#[test]
fn efi_systab_failure_names_the_configured_paths() {
    let dir = tempdir().expect("tempdir");
    let systab = dir.path().join("missing-systab");
    let mem = dir.path().join("missing-mem");
    let config = serde_json::json!({
        "default_source": "efi-systab",
        "systab_path": systab,
        "mem_path": mem,
    });
    fs::write(dir.path().join("rmc.json"), config.to_string()).expect("write config");

    cargo_bin_cmd!("rmc")
        .current_dir(dir.path())
        .args(["--config", "rmc.json", "fingerprint"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("missing-systab"))
        .stderr(predicate::str::contains("missing-mem"));
}
