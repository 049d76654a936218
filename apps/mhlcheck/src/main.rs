//! mhlcheck - Verification oracle for media hash list tools
//!
//! Thin front end over the oracle crates: loads inputs, runs the
//! requested check and renders verdicts.

mod cli;
mod display;
mod error;

use crate::cli::{Cli, Commands};
use crate::display::{CommandOutput, OutputRenderer};
use crate::error::CliError;
use clap::Parser;
use mhlcheck_config::Config;
use mhlcheck_hash::ReferenceHasher;
use mhlcheck_hashspec::HashSpecList;
use mhlcheck_manifest::ManifestDocument;
use mhlcheck_oracle::{manifest_report, CrossTool, OracleOptions, Scenario};
use mhlcheck_sequence::SequenceSpec;
use mhlcheck_types::OutputFormat;
use std::path::Path;
use std::process;
use tracing::{error, info};

#[tokio::main]
async fn main() {
    // Parse command line arguments first to check for JSON mode
    let cli = Cli::parse();
    let json_mode = cli.global.json;

    init_tracing(json_mode, cli.global.debug);

    match run(cli).await {
        Ok(code) => process::exit(code),
        Err(e) => {
            error!("Application error: {}", e);
            eprintln!("Error: {e}");
            process::exit(1);
        }
    }
}

/// Main application logic, returns the process exit code
async fn run(cli: Cli) -> Result<i32, CliError> {
    info!("Starting mhlcheck v{}", env!("CARGO_PKG_VERSION"));

    // 1. Start with file config (or defaults)
    let mut config = Config::load_or_default(cli.global.config.as_deref()).await?;

    // 2. Merge environment variables
    config.merge_env()?;

    // 3. Apply CLI flags (highest precedence)
    apply_cli_config(&mut config, &cli.global, &cli.command);

    let renderer = OutputRenderer::new(config.general.default_output, config.general.color);
    let options = oracle_options(&config);

    let output = execute_command(cli.command, &config, &options).await?;
    renderer.render(&output)?;

    let code = output.exit_code();
    info!(exit_code = code, "Command completed");
    Ok(code)
}

/// Execute the specified command
async fn execute_command(
    command: Commands,
    config: &Config,
    options: &OracleOptions,
) -> Result<CommandOutput, CliError> {
    match command {
        Commands::Compare {
            reference,
            candidate,
        } => {
            let scenario = Scenario::CrossTool(CrossTool {
                reference: read_text(&reference).await?,
                candidate: read_text(&candidate).await?,
            });
            Ok(CommandOutput::Report(scenario.verify_with(options)?))
        }

        Commands::Manifest { mhl, expect, .. } => {
            let doc = ManifestDocument::from_file(&mhl).await?;
            let list = HashSpecList::from_file(&expect).await?;
            info!(
                manifest = %mhl.display(),
                records = doc.records().len(),
                expectations = list.len(),
                "Checking manifest"
            );
            let table = options.expectations(&list);
            Ok(CommandOutput::Report(manifest_report(&doc, &table, options)))
        }

        Commands::Sequence { spec, pattern } => {
            match SequenceSpec::parse_contiguous(&spec) {
                Ok(spec) => Ok(CommandOutput::Sequence { spec, pattern }),
                Err(e) => Ok(CommandOutput::SequenceRejected(e)),
            }
        }

        Commands::Hash { files, types } => {
            let types = if types.is_empty() {
                config.oracle.default_hash_types.clone()
            } else {
                types
            };
            let hasher = ReferenceHasher::new(types).map_err(mhlcheck_errors::Error::from)?;
            Ok(CommandOutput::Listing(hasher.hash_files(&files).await?))
        }

        Commands::Scenario { file } => {
            let text = read_text(&file).await?;
            let scenario: Scenario = serde_json::from_str(&text)
                .map_err(|e| CliError::InvalidArguments(format!("{}: {e}", file.display())))?;
            Ok(CommandOutput::Report(scenario.verify_with(options)?))
        }
    }
}

async fn read_text(path: &Path) -> Result<String, CliError> {
    tokio::fs::read_to_string(path)
        .await
        .map_err(|e| CliError::Ops(mhlcheck_errors::Error::io_with_path(&e, path)))
}

/// Build oracle options from the merged configuration
fn oracle_options(config: &Config) -> OracleOptions {
    OracleOptions {
        strict_completeness: config.oracle.strict_completeness,
        case_insensitive_hashtype: config.oracle.case_insensitive_hashtype,
        exit_code_overrides: config.exit_codes.overrides().into_iter().collect(),
    }
}

fn apply_cli_config(config: &mut Config, global: &cli::GlobalArgs, command: &cli::Commands) {
    // Global CLI flags override everything
    if let Some(color) = &global.color {
        config.general.color = *color;
    }
    if global.json {
        config.general.default_output = OutputFormat::Json;
    }

    // Command-specific CLI flags
    if let cli::Commands::Manifest {
        no_completeness: true,
        ..
    } = command
    {
        config.oracle.strict_completeness = false;
    }
}

/// Initialize tracing on stderr
///
/// `--json --debug` switches to JSON log records so both streams stay
/// machine-readable.
fn init_tracing(json_mode: bool, debug_enabled: bool) {
    let default_filter = if debug_enabled {
        "info,mhlcheck=debug,mhlcheck_oracle=debug,mhlcheck_hash=debug"
    } else {
        "warn,mhlcheck=info"
    };
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(default_filter));

    if json_mode && debug_enabled {
        tracing_subscriber::fmt()
            .json()
            .with_writer(std::io::stderr)
            .with_env_filter(filter)
            .init();
    } else {
        tracing_subscriber::fmt()
            .with_writer(std::io::stderr)
            .with_env_filter(filter)
            .with_target(false)
            .init();
    }
}
