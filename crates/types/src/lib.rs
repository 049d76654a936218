#![deny(clippy::pedantic, unsafe_code)]
#![allow(clippy::module_name_repetitions)]

//! Core type definitions for mhlcheck
//!
//! Value types shared by the parsers and the oracle: hash families,
//! hash claims, and the exit codes of the tool under test.

pub mod claim;
pub mod exit_code;
pub mod hash_type;

pub use claim::HashClaim;
pub use exit_code::ToolExitCode;
pub use hash_type::HashType;

use serde::{Deserialize, Serialize};

/// How `mhlcheck` prints a report
///
/// Set by `general.default_output`, `MHLCHECK_OUTPUT` or `--json`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    /// One line per verdict, no table; suited to logs and diffs
    Plain,
    /// Verdict table followed by a pass/fail summary
    #[default]
    Tty,
    /// Whole report as one JSON document on stdout
    Json,
}

/// Whether the verdict table and summary are colored
///
/// `Auto` colors only when stdout is a terminal that supports it.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ColorChoice {
    Always,
    #[default]
    Auto,
    Never,
}

impl clap::ValueEnum for ColorChoice {
    fn value_variants<'a>() -> &'a [Self] {
        &[Self::Always, Self::Auto, Self::Never]
    }

    fn to_possible_value(&self) -> Option<clap::builder::PossibleValue> {
        Some(match self {
            Self::Always => clap::builder::PossibleValue::new("always"),
            Self::Auto => clap::builder::PossibleValue::new("auto"),
            Self::Never => clap::builder::PossibleValue::new("never"),
        })
    }
}
