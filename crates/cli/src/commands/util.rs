use std::path::Path;

use anyhow::{Context, Result};
use log::info;
use rmc_core::{Fingerprint, RecordBlob};

use crate::{read_file, HostOptions};

/// Load and validate a fingerprint file.
pub fn load_fingerprint_file(path: &Path) -> Result<Fingerprint<'static>> {
    let bytes = read_file(path, "fingerprint file")?;
    let fingerprint = Fingerprint::from_file_bytes(&bytes)
        .with_context(|| format!("Cannot read fingerprint from {}", path.display()))?;
    Ok(fingerprint.into_owned())
}

/// Fingerprint from `path` when given, otherwise from this board.
pub fn fingerprint_for(host: &HostOptions, path: Option<&Path>) -> Result<Fingerprint<'static>> {
    match path {
        Some(path) => {
            let fingerprint = load_fingerprint_file(path)?;
            info!("Using fingerprint from {}", path.display());
            Ok(fingerprint)
        }
        None => {
            info!("No fingerprint file given; reading this board's fingerprint");
            host.read_fingerprint()
        }
    }
}

/// Load and validate a record file.
pub fn load_record_file(path: &Path) -> Result<RecordBlob> {
    let bytes = read_file(path, "record file")?;
    RecordBlob::from_bytes(bytes).with_context(|| format!("Invalid record file {}", path.display()))
}

/// Print every finger of a fingerprint, then its signature.
pub fn print_fingerprint(fingerprint: &Fingerprint<'_>) {
    for (i, finger) in fingerprint.fingers().iter().enumerate() {
        println!("Finger {i} type   : 0x{:02x}", finger.structure_type);
        println!("Finger {i} offset : 0x{:02x}", finger.offset);
        println!("Finger {i} name   : {}", finger.name_lossy());
        println!("Finger {i} value  : {}", finger.value_lossy());
        println!();
    }
    println!("Signature: {}", rmc_core::derive_signature(fingerprint));
}
