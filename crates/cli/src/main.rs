use std::path::PathBuf;

use anyhow::Result;
use clap::{ArgAction, Parser, Subcommand};
use rmc::commands::{
    database_command, extract_database_command, extract_fingerprint_command, fingerprint_command,
    info_command, query_command, record_command, QueryTarget, RecordInputs, DEFAULT_EXTRACT_DIR,
};
use rmc::HostOptions;
use rmc_core::config::{load_config, RmcConfig};

/// Runtime machine configuration tool.
///
/// Identifies the board it runs on from its SMBIOS tables, builds records and
/// databases of board-specific files, and looks them up again at run time.
/// Reading the live tables usually requires root permission.
#[derive(Parser, Debug)]
#[command(name = "rmc", version, about = "Runtime machine configuration tool", long_about = None)]
struct Cli {
    /// Increase log output (-v info, -vv debug, -vvv trace).
    #[arg(short, long, action = ArgAction::Count, global = true)]
    verbose: u8,

    /// JSON file describing where the host exposes its SMBIOS tables.
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Read SMBIOS from a binary dump (as written by `dmidecode --dump-bin`) instead of this board.
    #[arg(long, global = true)]
    smbios_dump: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Read this board's fingerprint and store it in a fingerprint file.
    Fingerprint {
        #[arg(short, long, default_value = "rmc.fingerprint")]
        output: PathBuf,

        /// Print the fingerprint as JSON.
        #[arg(long, default_value_t = false)]
        json: bool,
    },

    /// Build a record from a fingerprint and policy files.
    ///
    /// The board's own fingerprint is used when `-f` is not given.
    Record {
        /// Files to pack as named blobs.
        #[arg(short = 'b', long = "blob", num_args = 1..)]
        blobs: Vec<PathBuf>,

        /// Kernel command-line fragment to pack.
        #[arg(long)]
        cmdline: Option<String>,

        /// YAML or JSON manifest listing more entries.
        #[arg(long)]
        manifest: Option<PathBuf>,

        #[arg(short = 'f', long)]
        fingerprint: Option<PathBuf>,

        #[arg(short, long, default_value = "rmc.record")]
        output: PathBuf,
    },

    /// Build a database from record files.
    Database {
        #[arg(required = true)]
        records: Vec<PathBuf>,

        #[arg(short, long, default_value = "rmc.db")]
        output: PathBuf,
    },

    /// Look up a blob (or the command line) stored for a board.
    Query {
        #[arg(short = 'd', long)]
        database: PathBuf,

        /// Name of the blob to fetch.
        #[arg(
            short = 'B',
            long = "blob",
            conflicts_with = "cmdline",
            required_unless_present = "cmdline"
        )]
        blob: Option<String>,

        /// Fetch the command-line fragment instead of a blob.
        #[arg(long, default_value_t = false)]
        cmdline: bool,

        /// Query for the board in this fingerprint file instead of this board.
        #[arg(short = 'f', long)]
        fingerprint: Option<PathBuf>,

        /// Write the result here instead of stdout.
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Print a fingerprint file, or extract a database into a directory tree.
    Extract {
        #[arg(short = 'f', long, conflicts_with = "database", required_unless_present = "database")]
        fingerprint: Option<PathBuf>,

        #[arg(short = 'd', long)]
        database: Option<PathBuf>,

        /// Directory a database is extracted into.
        #[arg(short, long, default_value = DEFAULT_EXTRACT_DIR)]
        output: PathBuf,
    },

    /// List the records and entries of a database.
    Info {
        #[arg(short = 'd', long)]
        database: PathBuf,

        #[arg(long, default_value_t = false)]
        json: bool,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    rmc::logging::init(cli.verbose);

    let config = match &cli.config {
        Some(path) => load_config(path)?,
        None => RmcConfig::default(),
    };
    let host = HostOptions { config, smbios_dump: cli.smbios_dump };

    match cli.command {
        Command::Fingerprint { output, json } => fingerprint_command(&host, &output, json)?,
        Command::Record { blobs, cmdline, manifest, fingerprint, output } => {
            let inputs = RecordInputs { blobs, cmdline, manifest };
            record_command(&host, fingerprint.as_deref(), &inputs, &output)?
        }
        Command::Database { records, output } => database_command(&records, &output)?,
        Command::Query { database, blob, cmdline: _, fingerprint, output } => {
            let target = match blob {
                Some(name) => QueryTarget::Blob(name),
                None => QueryTarget::CommandLine,
            };
            query_command(&host, &database, &target, fingerprint.as_deref(), output.as_deref())?
        }
        Command::Extract { fingerprint, database, output } => match (fingerprint, database) {
            (Some(path), _) => extract_fingerprint_command(&path)?,
            (None, Some(path)) => extract_database_command(&path, &output)?,
            (None, None) => {
                anyhow::bail!("extract requires -f <fingerprint file> or -d <database file>")
            }
        },
        Command::Info { database, json } => info_command(&database, json)?,
    }

    Ok(())
}
