//! Command line interface definition

use clap::{Parser, Subcommand};
use mhlcheck_types::{ColorChoice, HashType};
use std::path::PathBuf;

/// mhlcheck - Verification oracle for media hash list tools
#[derive(Parser)]
#[command(name = "mhlcheck")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(about = "Verification oracle for media hash list tools")]
#[command(long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    #[command(flatten)]
    pub global: GlobalArgs,
}

/// Global arguments available for all commands
#[derive(Parser)]
pub struct GlobalArgs {
    /// Output in JSON format
    #[arg(long, global = true)]
    pub json: bool,

    /// Enable debug logging on stderr
    #[arg(long, global = true)]
    pub debug: bool,

    /// Color output control
    #[arg(long, global = true, value_enum)]
    pub color: Option<ColorChoice>,

    /// Use alternate config file
    #[arg(long, global = true, value_name = "PATH")]
    pub config: Option<PathBuf>,
}

/// Available commands
#[derive(Subcommand)]
pub enum Commands {
    /// Compare two captured hash-spec outputs line by line
    #[command(alias = "cmp")]
    Compare {
        /// Output of the reference hashing tool
        reference: PathBuf,

        /// Output of the tool under test
        candidate: PathBuf,
    },

    /// Check an MHL manifest against a reference hash-spec listing
    Manifest {
        /// MHL file written by the tool under test
        mhl: PathBuf,

        /// Reference hash-spec listing
        #[arg(long, value_name = "HASHSPEC")]
        expect: PathBuf,

        /// Do not report paths present on only one side
        #[arg(long)]
        no_completeness: bool,
    },

    /// Validate a file sequence specification
    #[command(alias = "seq")]
    Sequence {
        /// Sequence such as `1-5, 7, 10-12`
        spec: String,

        /// File name pattern; `{N}` is replaced by each padded number
        #[arg(short, long)]
        pattern: Option<String>,
    },

    /// Print reference hash-spec lines for files
    Hash {
        /// Files to hash
        #[arg(required = true)]
        files: Vec<PathBuf>,

        /// Hash type (md5, sha1, xxhash, xxhash64, xxhash64be); repeatable
        #[arg(short = 't', long = "type", value_name = "TYPE")]
        types: Vec<HashType>,
    },

    /// Judge a captured scenario described in a JSON file
    Scenario {
        /// Scenario file
        file: PathBuf,
    },
}
