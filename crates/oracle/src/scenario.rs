//! Captured test scenarios and how each one is judged

use crate::checks::{
    check_exit_code_value, check_line_substrings, check_mentions, check_tag_counts,
    compare_outputs, LineSubstring, TagCount,
};
use crate::types::Report;
use crate::{manifest_report, OracleOptions};
use mhlcheck_errors::Error;
use mhlcheck_hashspec::HashSpecList;
use mhlcheck_manifest::ManifestDocument;
use mhlcheck_sequence::{expected_exit_code, SequenceSpec};
use mhlcheck_types::ToolExitCode;
use serde::{Deserialize, Serialize};
use tracing::info;

/// Reference tool output against the tool under test
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CrossTool {
    pub reference: String,
    pub candidate: String,
}

/// A written manifest against reference hash-spec output
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ManifestContents {
    /// MHL XML text
    pub manifest: String,
    /// Hash-spec listing of the reference tool
    pub expectations: String,
    #[serde(default)]
    pub sizes: Vec<(String, u64)>,
    #[serde(default)]
    pub tag_counts: Vec<TagCount>,
}

/// A run of the tool over a file sequence
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SequenceRun {
    pub spec: String,
    pub exit_code: i32,
    /// Captured stdout of the run
    #[serde(default)]
    pub output: String,
    /// File name pattern with `{N}`; every rendered name must appear in
    /// the output of a successful run. Checking stops at the first name
    /// that is missing.
    #[serde(default)]
    pub pattern: Option<String>,
}

/// A verification run expected to fail on size, hash or missing file
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SizeOrHashFailure {
    pub expected: ToolExitCode,
    pub exit_code: i32,
    /// Captured stderr of the run
    pub output: String,
    /// The offending path, which the output must name
    pub path: String,
    #[serde(default)]
    pub lines: Vec<LineSubstring>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Scenario {
    CrossTool(CrossTool),
    ManifestContents(ManifestContents),
    SequenceRun(SequenceRun),
    SizeOrHashFailure(SizeOrHashFailure),
}

impl Scenario {
    #[must_use]
    pub fn name(&self) -> &'static str {
        match self {
            Self::CrossTool(_) => "cross_tool",
            Self::ManifestContents(_) => "manifest_contents",
            Self::SequenceRun(_) => "sequence_run",
            Self::SizeOrHashFailure(_) => "size_or_hash_failure",
        }
    }

    /// Judge the scenario with default options
    ///
    /// # Errors
    ///
    /// Returns an error if a captured input is structurally malformed.
    pub fn verify(&self) -> Result<Report, Error> {
        self.verify_with(&OracleOptions::default())
    }

    /// Judge the scenario
    ///
    /// # Errors
    ///
    /// Returns a manifest parse error for malformed XML, and an internal
    /// error for a `SizeOrHashFailure` whose expected code is not a
    /// verification failure.
    pub fn verify_with(&self, options: &OracleOptions) -> Result<Report, Error> {
        let report = match self {
            Self::CrossTool(s) => compare_outputs(&s.reference, &s.candidate)
                .into_iter()
                .collect::<Report>(),
            Self::ManifestContents(s) => verify_manifest(s, options)?,
            Self::SequenceRun(s) => verify_sequence(s, options),
            Self::SizeOrHashFailure(s) => verify_failure(s, options)?,
        };
        info!(
            scenario = self.name(),
            passed = report.passed(),
            checked = report.len(),
            "scenario verified"
        );
        Ok(report)
    }
}

fn verify_manifest(s: &ManifestContents, options: &OracleOptions) -> Result<Report, Error> {
    let doc = ManifestDocument::parse(&s.manifest)?;
    let list = HashSpecList::parse(&s.expectations)?;

    let mut table = options.expectations(&list);
    for (path, size) in &s.sizes {
        table.expect_size(path, *size);
    }

    let mut report = manifest_report(&doc, &table, options);
    report.extend(check_tag_counts(&doc, &s.tag_counts));
    Ok(report)
}

fn verify_sequence(s: &SequenceRun, options: &OracleOptions) -> Report {
    let mut report = Report::new();
    match SequenceSpec::parse_contiguous(&s.spec) {
        Ok(spec) => {
            report.push(check_exit_code_value(
                options.exit_code(ToolExitCode::Success),
                s.exit_code,
            ));
            if let Some(pattern) = &s.pattern {
                // Names stream from the spec; the first one missing ends the walk
                for name in spec.render(pattern) {
                    let verdict = check_mentions(&s.output, &name);
                    let missing = !verdict.is_match();
                    report.push(verdict);
                    if missing {
                        break;
                    }
                }
            }
        }
        Err(e) => {
            report.push(check_exit_code_value(
                options.exit_code(expected_exit_code(&e)),
                s.exit_code,
            ));
        }
    }
    report
}

fn verify_failure(s: &SizeOrHashFailure, options: &OracleOptions) -> Result<Report, Error> {
    if !s.expected.is_verification_failure() {
        return Err(Error::internal(format!(
            "{} is not a size, hash or missing-file failure",
            s.expected
        )));
    }

    let mut report = Report::new();
    report.push(check_exit_code_value(
        options.exit_code(s.expected),
        s.exit_code,
    ));
    report.push(check_mentions(&s.output, &s.path));
    report.extend(check_line_substrings(&s.output, &s.lines));
    Ok(report)
}
