#![deny(clippy::pedantic, unsafe_code)]
#![allow(clippy::module_name_repetitions)]

//! File sequence specifications
//!
//! A sequence spec is a comma-separated list of numbers and inclusive
//! ranges describing the indices of an ordered file series:
//! - `7` - a single file number
//! - `1-5` - files 1 through 5
//! - `01-05, 07` - zero-padded ranges; the width of the low bound is kept
//!
//! Parsing only checks syntax. Whether the described series has holes
//! is a separate question answered by [`SequenceSpec::has_gap`] and
//! [`SequenceSpec::ensure_contiguous`].

use mhlcheck_errors::SequenceError;
use mhlcheck_types::ToolExitCode;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::fmt;
use std::ops::RangeInclusive;
use std::str::FromStr;

/// Placeholder replaced by the file number in [`SequenceSpec::render`]
pub const NUMBER_PLACEHOLDER: &str = "{N}";

/// One comma-separated token of a spec
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SequenceToken {
    pub low: u32,
    pub high: u32,
    /// Digits in the textual low bound, used for zero padding
    pub width: usize,
}

impl SequenceToken {
    fn parse(raw: &str) -> Result<Self, SequenceError> {
        let token = raw.trim();
        if token.is_empty() {
            return Err(SequenceError::invalid(raw, "empty token"));
        }

        match token.split_once('-') {
            Some((low, high)) => {
                let low_value = parse_number(token, low)?;
                let high_value = parse_number(token, high)?;
                if low_value > high_value {
                    return Err(SequenceError::invalid(
                        token,
                        format!("inverted range {low_value} > {high_value}"),
                    ));
                }
                Ok(Self {
                    low: low_value,
                    high: high_value,
                    width: low.trim().len(),
                })
            }
            None => {
                let value = parse_number(token, token)?;
                Ok(Self {
                    low: value,
                    high: value,
                    width: token.len(),
                })
            }
        }
    }

    #[must_use]
    pub fn range(&self) -> RangeInclusive<u32> {
        self.low..=self.high
    }

    #[must_use]
    pub fn is_single(&self) -> bool {
        self.low == self.high
    }
}

impl fmt::Display for SequenceToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let width = self.width;
        if self.is_single() {
            write!(f, "{:0width$}", self.low)
        } else {
            write!(f, "{:0width$}-{:0width$}", self.low, self.high)
        }
    }
}

fn parse_number(token: &str, digits: &str) -> Result<u32, SequenceError> {
    let digits = digits.trim();
    if digits.is_empty() {
        return Err(SequenceError::invalid(token, "missing number"));
    }
    if !digits.bytes().all(|b| b.is_ascii_digit()) {
        return Err(SequenceError::invalid(
            token,
            format!("'{digits}' is not an unsigned integer"),
        ));
    }
    digits
        .parse::<u32>()
        .map_err(|_| SequenceError::invalid(token, format!("'{digits}' is out of range")))
}

/// A parsed, validated sequence specification
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SequenceSpec {
    tokens: Vec<SequenceToken>,
    /// Sorted, non-overlapping, non-adjacent runs
    runs: Vec<RangeInclusive<u32>>,
}

impl SequenceSpec {
    /// Parse a spec string
    ///
    /// # Errors
    ///
    /// Returns `SequenceError::InvalidSyntax` for an empty spec, an empty
    /// or non-numeric token, or an inverted range.
    pub fn parse(s: &str) -> Result<Self, SequenceError> {
        if s.trim().is_empty() {
            return Err(SequenceError::invalid(s, "empty sequence specification"));
        }

        let tokens = s
            .split(',')
            .map(SequenceToken::parse)
            .collect::<Result<Vec<_>, _>>()?;
        let runs = merge_runs(&tokens);

        Ok(Self { tokens, runs })
    }

    /// Parse and require a contiguous series
    ///
    /// # Errors
    ///
    /// Returns `InvalidSyntax` as for [`SequenceSpec::parse`] and
    /// `HasGap` for a well-formed spec with holes.
    pub fn parse_contiguous(s: &str) -> Result<Self, SequenceError> {
        let spec = Self::parse(s)?;
        spec.ensure_contiguous()?;
        Ok(spec)
    }

    /// Tokens in textual order
    #[must_use]
    pub fn tokens(&self) -> &[SequenceToken] {
        &self.tokens
    }

    /// Merged runs of consecutive members, ascending
    #[must_use]
    pub fn runs(&self) -> &[RangeInclusive<u32>] {
        &self.runs
    }

    /// The complete sorted member set
    #[must_use]
    pub fn members(&self) -> BTreeSet<u32> {
        self.iter().collect()
    }

    /// Members in ascending order
    pub fn iter(&self) -> impl Iterator<Item = u32> + '_ {
        self.runs.iter().flat_map(Clone::clone)
    }

    #[must_use]
    pub fn contains(&self, n: u32) -> bool {
        self.runs.iter().any(|r| r.contains(&n))
    }

    #[must_use]
    pub fn len(&self) -> u64 {
        self.runs
            .iter()
            .map(|r| u64::from(*r.end()) - u64::from(*r.start()) + 1)
            .sum()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.runs.is_empty()
    }

    #[must_use]
    pub fn first(&self) -> Option<u32> {
        self.runs.first().map(|r| *r.start())
    }

    #[must_use]
    pub fn last(&self) -> Option<u32> {
        self.runs.last().map(|r| *r.end())
    }

    /// True iff the members do not form one run from min to max
    #[must_use]
    pub fn has_gap(&self) -> bool {
        self.runs.len() > 1
    }

    /// Smallest number between min and max that is not a member
    #[must_use]
    pub fn first_missing(&self) -> Option<u32> {
        if self.has_gap() {
            self.runs.first().map(|r| *r.end() + 1)
        } else {
            None
        }
    }

    /// Fail with `HasGap` unless the series is contiguous
    ///
    /// # Errors
    ///
    /// Returns `SequenceError::HasGap` naming the first missing number.
    pub fn ensure_contiguous(&self) -> Result<(), SequenceError> {
        match (self.first(), self.last(), self.first_missing()) {
            (Some(first), Some(last), Some(first_missing)) => Err(SequenceError::HasGap {
                first,
                last,
                first_missing,
            }),
            _ => Ok(()),
        }
    }

    /// Expand `pattern` once per member, tokens in textual order.
    ///
    /// Every `{N}` is replaced by the number zero-padded to the width of
    /// the token that produced it. Numbers repeated by later tokens are
    /// emitted once. Names are produced lazily, so a spec covering
    /// billions of numbers can be streamed.
    pub fn render<'a>(&'a self, pattern: &'a str) -> impl Iterator<Item = String> + 'a {
        self.tokens.iter().enumerate().flat_map(move |(i, token)| {
            let width = token.width;
            let earlier = merge_runs(&self.tokens[..i]);
            uncovered(&token.range(), &earlier)
                .into_iter()
                .flatten()
                .map(move |n| pattern.replace(NUMBER_PLACEHOLDER, &format!("{n:0width$}")))
        })
    }
}

/// Parts of `range` not covered by the sorted, merged `covered` runs
fn uncovered(
    range: &RangeInclusive<u32>,
    covered: &[RangeInclusive<u32>],
) -> Vec<RangeInclusive<u32>> {
    let mut parts = Vec::new();
    let mut next = Some(*range.start());
    for run in covered {
        let Some(from) = next else { break };
        if run.start() > range.end() {
            break;
        }
        if *run.end() < from {
            continue;
        }
        if *run.start() > from {
            parts.push(from..=*run.start() - 1);
        }
        next = run.end().checked_add(1);
    }
    if let Some(from) = next {
        if from <= *range.end() {
            parts.push(from..=*range.end());
        }
    }
    parts
}

fn merge_runs(tokens: &[SequenceToken]) -> Vec<RangeInclusive<u32>> {
    let mut sorted: Vec<RangeInclusive<u32>> = tokens.iter().map(SequenceToken::range).collect();
    sorted.sort_by_key(|r| (*r.start(), *r.end()));

    let mut runs: Vec<RangeInclusive<u32>> = Vec::with_capacity(sorted.len());
    for range in sorted {
        if let Some(last) = runs.last_mut() {
            if u64::from(*range.start()) <= u64::from(*last.end()) + 1 {
                if range.end() > last.end() {
                    *last = *last.start()..=*range.end();
                }
                continue;
            }
        }
        runs.push(range);
    }
    runs
}

impl FromStr for SequenceSpec {
    type Err = SequenceError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl fmt::Display for SequenceSpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let strs: Vec<_> = self.tokens.iter().map(ToString::to_string).collect();
        write!(f, "{}", strs.join(", "))
    }
}

/// Exit code the tool under test reports for a rejected sequence
#[must_use]
pub fn expected_exit_code(err: &SequenceError) -> ToolExitCode {
    match err {
        SequenceError::HasGap { .. } => ToolExitCode::GapInSequence,
        _ => ToolExitCode::InvalidSequence,
    }
}
