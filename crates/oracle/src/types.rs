//! Verdicts and reports produced by the oracle

use serde::Serialize;
use std::fmt;
use tracing::{debug, warn};

/// The fact a verdict was reached about
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "fact", rename_all = "snake_case")]
pub enum Fact {
    /// Digest of one hash family
    Hash { hashtype: String },
    /// Recorded file size
    Size,
    /// Whether a path is present on both sides
    Presence,
    /// Number of lines in two outputs
    LineCount,
    /// One output line, 0-based
    Line { index: usize },
    /// Number of occurrences of an element
    TagCount { tag: String },
    /// Process exit status of the tool under test
    ExitCode,
}

impl fmt::Display for Fact {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Hash { hashtype } => write!(f, "hash {hashtype}"),
            Self::Size => f.write_str("size"),
            Self::Presence => f.write_str("presence"),
            Self::LineCount => f.write_str("line count"),
            Self::Line { index } => write!(f, "line {index}"),
            Self::TagCount { tag } => write!(f, "<{tag}> count"),
            Self::ExitCode => f.write_str("exit code"),
        }
    }
}

/// Why a fact did not check out
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum MismatchKind {
    SizeMismatch,
    HashMismatch,
    /// Present in the manifest but not expected
    ExtraPath,
    /// Expected but absent from the manifest
    MissingPath,
    /// One path carries several different values for the same fact
    DuplicateConflictingValue,
    LineCountMismatch,
    LineMismatch,
    /// A line is absent or lacks the expected text
    MissingSubstring,
    TagCountMismatch,
    ExitCodeMismatch,
}

impl fmt::Display for MismatchKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::SizeMismatch => "size mismatch",
            Self::HashMismatch => "hash mismatch",
            Self::ExtraPath => "extra path",
            Self::MissingPath => "missing path",
            Self::DuplicateConflictingValue => "conflicting duplicate",
            Self::LineCountMismatch => "line count mismatch",
            Self::LineMismatch => "line mismatch",
            Self::MissingSubstring => "missing substring",
            Self::TagCountMismatch => "tag count mismatch",
            Self::ExitCodeMismatch => "exit code mismatch",
        };
        f.write_str(name)
    }
}

/// Outcome of checking one fact
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "verdict", rename_all = "snake_case")]
pub enum Verdict {
    Match {
        #[serde(flatten)]
        fact: Fact,
        path: Option<String>,
    },
    Mismatch {
        #[serde(flatten)]
        fact: Fact,
        kind: MismatchKind,
        path: Option<String>,
        expected: String,
        actual: String,
    },
}

impl Verdict {
    pub fn matched(fact: Fact, path: Option<&str>) -> Self {
        Self::Match {
            fact,
            path: path.map(str::to_string),
        }
    }

    pub fn mismatch(
        fact: Fact,
        kind: MismatchKind,
        path: Option<&str>,
        expected: impl Into<String>,
        actual: impl Into<String>,
    ) -> Self {
        Self::Mismatch {
            fact,
            kind,
            path: path.map(str::to_string),
            expected: expected.into(),
            actual: actual.into(),
        }
    }

    #[must_use]
    pub fn is_match(&self) -> bool {
        matches!(self, Self::Match { .. })
    }

    #[must_use]
    pub fn fact(&self) -> &Fact {
        match self {
            Self::Match { fact, .. } | Self::Mismatch { fact, .. } => fact,
        }
    }

    #[must_use]
    pub fn path(&self) -> Option<&str> {
        match self {
            Self::Match { path, .. } | Self::Mismatch { path, .. } => path.as_deref(),
        }
    }

    /// The mismatch kind, `None` for a match
    #[must_use]
    pub fn kind(&self) -> Option<MismatchKind> {
        match self {
            Self::Match { .. } => None,
            Self::Mismatch { kind, .. } => Some(*kind),
        }
    }

    fn log(&self) {
        match self {
            Self::Match { fact, path } => {
                debug!(fact = %fact, path = path.as_deref().unwrap_or("-"), "match");
            }
            Self::Mismatch {
                fact,
                kind,
                path,
                expected,
                actual,
            } => {
                warn!(
                    fact = %fact,
                    kind = %kind,
                    path = path.as_deref().unwrap_or("-"),
                    expected = %expected,
                    actual = %actual,
                    "mismatch"
                );
            }
        }
    }
}

impl fmt::Display for Verdict {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Match { fact, path } => match path {
                Some(path) => write!(f, "ok: {fact} of {path}"),
                None => write!(f, "ok: {fact}"),
            },
            Self::Mismatch {
                fact,
                kind,
                path,
                expected,
                actual,
            } => {
                write!(f, "{kind}: {fact}")?;
                if let Some(path) = path {
                    write!(f, " of {path}")?;
                }
                write!(f, " (expected '{expected}', got '{actual}')")
            }
        }
    }
}

/// Aggregated verdicts of one verification run
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Report {
    verdicts: Vec<Verdict>,
}

impl Report {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a verdict, logging it
    pub fn push(&mut self, verdict: Verdict) {
        verdict.log();
        self.verdicts.push(verdict);
    }

    pub fn extend(&mut self, verdicts: impl IntoIterator<Item = Verdict>) {
        for verdict in verdicts {
            self.push(verdict);
        }
    }

    #[must_use]
    pub fn verdicts(&self) -> &[Verdict] {
        &self.verdicts
    }

    /// True iff every verdict is a match
    #[must_use]
    pub fn passed(&self) -> bool {
        self.verdicts.iter().all(Verdict::is_match)
    }

    pub fn mismatches(&self) -> impl Iterator<Item = &Verdict> {
        self.verdicts.iter().filter(|v| !v.is_match())
    }

    /// Mismatches of a single kind
    pub fn of_kind(&self, kind: MismatchKind) -> impl Iterator<Item = &Verdict> {
        self.verdicts.iter().filter(move |v| v.kind() == Some(kind))
    }

    #[must_use]
    pub fn match_count(&self) -> usize {
        self.verdicts.iter().filter(|v| v.is_match()).count()
    }

    #[must_use]
    pub fn mismatch_count(&self) -> usize {
        self.verdicts.len() - self.match_count()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.verdicts.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.verdicts.is_empty()
    }
}

impl FromIterator<Verdict> for Report {
    fn from_iter<I: IntoIterator<Item = Verdict>>(iter: I) -> Self {
        let mut report = Self::new();
        report.extend(iter);
        report
    }
}

impl fmt::Display for Report {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let status = if self.passed() { "PASSED" } else { "FAILED" };
        write!(
            f,
            "{status}: {} checked, {} mismatched",
            self.len(),
            self.mismatch_count()
        )
    }
}
