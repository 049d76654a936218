//! Individual checks, each yielding one verdict per fact

use crate::expectation::ExpectationTable;
use crate::types::{Fact, MismatchKind, Verdict};
use mhlcheck_manifest::ManifestDocument;
use mhlcheck_types::ToolExitCode;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

/// How manifest hash types are matched against expectation keys
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TagMatching {
    /// `MD5` finds `<md5>`
    #[default]
    CaseInsensitive,
    Exact,
}

/// Compare two captured outputs line by line, in order.
///
/// Differing line counts produce a single `LineCountMismatch` and no
/// per-line verdicts.
#[must_use]
pub fn compare_outputs(reference: &str, candidate: &str) -> Vec<Verdict> {
    let reference: Vec<&str> = reference.lines().collect();
    let candidate: Vec<&str> = candidate.lines().collect();
    compare_lines(&reference, &candidate)
}

#[must_use]
pub fn compare_lines(reference: &[&str], candidate: &[&str]) -> Vec<Verdict> {
    if reference.len() != candidate.len() {
        return vec![Verdict::mismatch(
            Fact::LineCount,
            MismatchKind::LineCountMismatch,
            None,
            reference.len().to_string(),
            candidate.len().to_string(),
        )];
    }

    reference
        .iter()
        .zip(candidate)
        .enumerate()
        .map(|(index, (expected, actual))| {
            let fact = Fact::Line { index };
            if expected == actual {
                Verdict::matched(fact, None)
            } else {
                Verdict::mismatch(fact, MismatchKind::LineMismatch, None, *expected, *actual)
            }
        })
        .collect()
}

/// Check every expected digest and size against the manifest
#[must_use]
pub fn check_manifest(doc: &ManifestDocument, table: &ExpectationTable) -> Vec<Verdict> {
    check_manifest_with(doc, table, TagMatching::default())
}

#[must_use]
pub fn check_manifest_with(
    doc: &ManifestDocument,
    table: &ExpectationTable,
    matching: TagMatching,
) -> Vec<Verdict> {
    let mut verdicts = Vec::new();
    for (path, facts) in table.iter() {
        for (hashtype, expected) in &facts.digests {
            let found = digests_for(doc, path, hashtype, matching);
            verdicts.push(three_way(
                Fact::Hash {
                    hashtype: hashtype.clone(),
                },
                MismatchKind::HashMismatch,
                path,
                expected,
                &found,
            ));
        }

        if let Some(size) = facts.size {
            let found: Vec<String> = doc
                .sizes_for(path)
                .into_iter()
                .map(|s| s.to_string())
                .collect();
            let found: Vec<&str> = found.iter().map(String::as_str).collect();
            verdicts.push(three_way(
                Fact::Size,
                MismatchKind::SizeMismatch,
                path,
                &size.to_string(),
                &found,
            ));
        }
    }
    verdicts
}

fn digests_for<'a>(
    doc: &'a ManifestDocument,
    path: &str,
    hashtype: &str,
    matching: TagMatching,
) -> Vec<&'a str> {
    match matching {
        TagMatching::CaseInsensitive => doc.digests_for(path, hashtype),
        TagMatching::Exact => doc
            .records_for(path)
            .into_iter()
            .flat_map(|r| r.elements())
            .filter(|e| e.name == hashtype)
            .map(|e| e.text.as_str())
            .collect(),
    }
}

/// No entries, conflicting entries, or a single value compared
fn three_way(
    fact: Fact,
    kind: MismatchKind,
    path: &str,
    expected: &str,
    found: &[&str],
) -> Verdict {
    let distinct: BTreeSet<&str> = found.iter().copied().collect();
    let mut values = distinct.iter();
    match (values.next(), values.next()) {
        (None, _) => Verdict::mismatch(fact, MismatchKind::MissingPath, Some(path), expected, ""),
        (Some(_), Some(_)) => Verdict::mismatch(
            fact,
            MismatchKind::DuplicateConflictingValue,
            Some(path),
            expected,
            found.join(", "),
        ),
        (Some(actual), None) if *actual == expected => Verdict::matched(fact, Some(path)),
        (Some(actual), None) => Verdict::mismatch(fact, kind, Some(path), expected, *actual),
    }
}

/// Paths recorded in the manifest versus paths expected
#[must_use]
pub fn check_completeness(doc: &ManifestDocument, table: &ExpectationTable) -> Vec<Verdict> {
    let recorded = doc.all_paths();
    let mut verdicts = Vec::new();

    for (path, _) in table.iter() {
        if recorded.contains(path) {
            verdicts.push(Verdict::matched(Fact::Presence, Some(path)));
        } else {
            verdicts.push(Verdict::mismatch(
                Fact::Presence,
                MismatchKind::MissingPath,
                Some(path),
                "present",
                "absent",
            ));
        }
    }

    for path in recorded.into_iter().filter(|p| !table.contains(p)) {
        verdicts.push(Verdict::mismatch(
            Fact::Presence,
            MismatchKind::ExtraPath,
            Some(path),
            "absent",
            "present",
        ));
    }
    verdicts
}

/// Expected number of `tag` elements recorded for `path`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TagCount {
    pub path: String,
    pub tag: String,
    pub count: usize,
}

impl TagCount {
    pub fn new(path: impl Into<String>, tag: impl Into<String>, count: usize) -> Self {
        Self {
            path: path.into(),
            tag: tag.into(),
            count,
        }
    }
}

/// A tag that is absent, or present a different number of times, fails
#[must_use]
pub fn check_tag_counts(doc: &ManifestDocument, expected: &[TagCount]) -> Vec<Verdict> {
    expected
        .iter()
        .map(|e| {
            let fact = Fact::TagCount { tag: e.tag.clone() };
            let actual = doc.tag_count(&e.path, &e.tag);
            if actual == 0 {
                Verdict::mismatch(
                    fact,
                    MismatchKind::MissingPath,
                    Some(e.path.as_str()),
                    e.count.to_string(),
                    "0",
                )
            } else if actual == e.count {
                Verdict::matched(fact, Some(e.path.as_str()))
            } else {
                Verdict::mismatch(
                    fact,
                    MismatchKind::TagCountMismatch,
                    Some(e.path.as_str()),
                    e.count.to_string(),
                    actual.to_string(),
                )
            }
        })
        .collect()
}

/// Lines (0-based) that must each contain `substring`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LineSubstring {
    pub lines: Vec<usize>,
    pub substring: String,
}

impl LineSubstring {
    pub fn new(lines: impl IntoIterator<Item = usize>, substring: impl Into<String>) -> Self {
        Self {
            lines: lines.into_iter().collect(),
            substring: substring.into(),
        }
    }
}

#[must_use]
pub fn check_line_substrings(text: &str, expected: &[LineSubstring]) -> Vec<Verdict> {
    let lines: Vec<&str> = text.lines().collect();
    let mut verdicts = Vec::new();
    for e in expected {
        for &index in &e.lines {
            let fact = Fact::Line { index };
            let verdict = match lines.get(index) {
                Some(line) if line.contains(e.substring.as_str()) => Verdict::matched(fact, None),
                Some(line) => Verdict::mismatch(
                    fact,
                    MismatchKind::MissingSubstring,
                    None,
                    &e.substring,
                    *line,
                ),
                None => Verdict::mismatch(
                    fact,
                    MismatchKind::MissingSubstring,
                    None,
                    &e.substring,
                    format!("<only {} lines>", lines.len()),
                ),
            };
            verdicts.push(verdict);
        }
    }
    verdicts
}

/// Whether any line of `text` mentions `needle`
#[must_use]
pub fn check_mentions(text: &str, needle: &str) -> Verdict {
    if text.lines().any(|l| l.contains(needle)) {
        Verdict::matched(Fact::Presence, Some(needle))
    } else {
        Verdict::mismatch(
            Fact::Presence,
            MismatchKind::MissingSubstring,
            Some(needle),
            "mentioned",
            "not mentioned",
        )
    }
}

#[must_use]
pub fn check_exit_code(expected: ToolExitCode, actual: i32) -> Verdict {
    check_exit_code_value(expected.code(), actual)
}

/// Exit code check against a raw value, for remapped code tables
#[must_use]
pub fn check_exit_code_value(expected: i32, actual: i32) -> Verdict {
    if expected == actual {
        Verdict::matched(Fact::ExitCode, None)
    } else {
        let describe = |code: i32| match ToolExitCode::from_code(code) {
            Some(known) => known.to_string(),
            None => code.to_string(),
        };
        Verdict::mismatch(
            Fact::ExitCode,
            MismatchKind::ExitCodeMismatch,
            None,
            describe(expected),
            describe(actual),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_reordered_lines_fail() {
        let reference = "MD5(a)= 01\nMD5(b)= 02\n";
        let candidate = "MD5(b)= 02\nMD5(a)= 01\n";
        let verdicts = compare_outputs(reference, candidate);
        assert_eq!(verdicts.len(), 2);
        assert!(verdicts.iter().all(|v| v.kind() == Some(MismatchKind::LineMismatch)));
        assert!(compare_outputs(reference, reference).iter().all(Verdict::is_match));
    }

    #[test]
    fn test_crlf_matches_lf() {
        let verdicts = compare_outputs("a\r\nb\r\n", "a\nb");
        assert!(verdicts.iter().all(Verdict::is_match));
    }

    #[test]
    fn test_line_count_mismatch_is_single_verdict() {
        let verdicts = compare_outputs("a\nb\n", "a\n");
        assert_eq!(verdicts.len(), 1);
        assert_eq!(verdicts[0].kind(), Some(MismatchKind::LineCountMismatch));
        assert_eq!(verdicts[0].fact(), &Fact::LineCount);
    }

    #[test]
    fn test_exit_code() {
        assert!(check_exit_code(ToolExitCode::HashMismatch, 16).is_match());
        let v = check_exit_code(ToolExitCode::GapInSequence, 22);
        assert_eq!(v.kind(), Some(MismatchKind::ExitCodeMismatch));
        assert!(v.to_string().contains("22 (InvalidSequence)"));
        assert!(!check_exit_code_value(99, 0).is_match());
    }

    #[test]
    fn test_line_substrings() {
        let text = "first line\nsecond: file0.txt\nthird: file0.txt\n";
        let verdicts = check_line_substrings(
            text,
            &[
                LineSubstring::new([1, 2], "file0.txt"),
                LineSubstring::new([0], "file0.txt"),
                LineSubstring::new([7], "x"),
            ],
        );
        let kinds: Vec<_> = verdicts.iter().map(Verdict::kind).collect();
        assert_eq!(
            kinds,
            vec![
                None,
                None,
                Some(MismatchKind::MissingSubstring),
                Some(MismatchKind::MissingSubstring)
            ]
        );
    }

    #[test]
    fn test_mentions() {
        assert!(check_mentions("error: size of file0.txt", "file0.txt").is_match());
        assert!(!check_mentions("all good", "file0.txt").is_match());
    }
}
