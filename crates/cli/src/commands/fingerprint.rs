use std::path::Path;

use anyhow::Result;

use crate::commands::print_fingerprint;
use crate::{write_file, HostOptions};

/// Read this board's fingerprint, print it, and store it as a fingerprint file.
pub fn fingerprint_command(host: &HostOptions, output: &Path, json: bool) -> Result<()> {
    let fingerprint = host.read_fingerprint()?;
    write_file(output, &fingerprint.to_file_bytes(), "fingerprint")?;

    if json {
        println!("{}", serde_json::to_string_pretty(&fingerprint.summary())?);
    } else {
        println!("Got fingerprint for board:\n");
        print_fingerprint(&fingerprint);
        println!("Fingerprint written to {}", output.display());
    }

    Ok(())
}
