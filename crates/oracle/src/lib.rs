#![deny(clippy::pedantic, unsafe_code)]
#![allow(clippy::module_name_repetitions)]

//! Verification oracle for MHL tool output
//!
//! Compares what the tool under test produced (hash-spec listings,
//! manifests, exit codes, messages) with independently obtained
//! expectations. Every checked fact yields a [`Verdict`]; mismatches are
//! values, not errors. A [`Report`] aggregates verdicts and passes only
//! when all of them match.

mod checks;
mod expectation;
mod scenario;
mod types;

pub use checks::{
    check_completeness, check_exit_code, check_exit_code_value, check_line_substrings,
    check_manifest, check_manifest_with, check_mentions, check_tag_counts, compare_lines,
    compare_outputs, LineSubstring, TagCount, TagMatching,
};
pub use expectation::{ExpectationTable, ExpectedFacts};
pub use scenario::{CrossTool, ManifestContents, Scenario, SequenceRun, SizeOrHashFailure};
pub use types::{Fact, MismatchKind, Report, Verdict};

use mhlcheck_hashspec::HashSpecList;
use mhlcheck_manifest::ManifestDocument;
use mhlcheck_types::ToolExitCode;
use std::collections::HashMap;

/// Knobs that change how scenarios are judged
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OracleOptions {
    /// Report manifest paths that nothing expected, and the reverse
    pub strict_completeness: bool,
    pub case_insensitive_hashtype: bool,
    /// Exit codes the tool under test uses instead of the standard table
    pub exit_code_overrides: HashMap<ToolExitCode, i32>,
}

impl OracleOptions {
    /// The numeric code expected for `code`, honoring overrides
    #[must_use]
    pub fn exit_code(&self, code: ToolExitCode) -> i32 {
        self.exit_code_overrides
            .get(&code)
            .copied()
            .unwrap_or_else(|| code.code())
    }

    #[must_use]
    pub fn tag_matching(&self) -> TagMatching {
        if self.case_insensitive_hashtype {
            TagMatching::CaseInsensitive
        } else {
            TagMatching::Exact
        }
    }

    /// Expectations from a reference listing, hash types spelled to suit
    /// [`OracleOptions::tag_matching`]
    #[must_use]
    pub fn expectations(&self, list: &HashSpecList) -> ExpectationTable {
        match self.tag_matching() {
            TagMatching::CaseInsensitive => ExpectationTable::from_hash_specs(list),
            TagMatching::Exact => ExpectationTable::from_hash_specs_exact(list),
        }
    }
}

/// Digest and size checks, plus completeness when strict
#[must_use]
pub fn manifest_report(
    doc: &ManifestDocument,
    table: &ExpectationTable,
    options: &OracleOptions,
) -> Report {
    let mut report = Report::new();
    report.extend(check_manifest_with(doc, table, options.tag_matching()));
    if options.strict_completeness {
        report.extend(check_completeness(doc, table));
    }
    report
}

impl Default for OracleOptions {
    fn default() -> Self {
        Self {
            strict_completeness: true,
            case_insensitive_hashtype: true,
            exit_code_overrides: HashMap::new(),
        }
    }
}
