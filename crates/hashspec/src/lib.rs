#![deny(clippy::pedantic, unsafe_code)]
#![allow(clippy::module_name_repetitions)]

//! Hash-spec listing parser for mhlcheck
//!
//! A hash-spec listing is the text printed by a hashing tool, one claim
//! per line:
//!
//! ```text
//! MD5(file0.txt)= 91cae4eeb20d47ca70abbbf058a74e80
//! SHA1(dir/file1.txt) = 55f554955b29f9cd118ef253e8bab03169e063aa
//! ```
//!
//! Lines that do not look like a claim are skipped, so captured terminal
//! output can be fed in as-is. Paths are compared byte-exact; a path
//! containing `)` followed by `=` cannot be represented.

use mhlcheck_errors::{Error, HashSpecError};
use mhlcheck_types::HashClaim;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeSet, HashSet};
use std::fmt;
use std::path::Path;
use tokio::fs;
use tracing::{debug, trace};

const CLAIM_PATTERN: &str = r"^(?P<hashtype>\w+)\((?P<path>.*)\)\s*=\s*(?P<digest>[a-fA-F0-9]+)$";

/// Compiled matcher for hash-spec lines
#[derive(Debug, Clone)]
pub struct HashSpecParser {
    pattern: Regex,
}

impl HashSpecParser {
    /// Build the line matcher
    ///
    /// # Errors
    ///
    /// Returns an internal error if the claim pattern fails to compile.
    pub fn new() -> Result<Self, Error> {
        let pattern = Regex::new(CLAIM_PATTERN).map_err(|e| Error::internal(e.to_string()))?;
        Ok(Self { pattern })
    }

    /// Parse a single line, `None` if it is not a claim
    #[must_use]
    pub fn parse_line(&self, line: &str) -> Option<HashClaim> {
        let line = line.strip_suffix('\r').unwrap_or(line);
        let caps = self.pattern.captures(line)?;
        Some(HashClaim::new(
            caps.name("hashtype")?.as_str(),
            caps.name("path")?.as_str(),
            caps.name("digest")?.as_str(),
        ))
    }

    /// Parse a whole listing, keeping claims in file order
    #[must_use]
    pub fn parse(&self, text: &str) -> HashSpecList {
        let mut entries = Vec::new();
        for (number, line) in text.lines().enumerate() {
            match self.parse_line(line) {
                Some(claim) => entries.push(claim),
                None => trace!(line = number + 1, "skipping non-claim line"),
            }
        }
        debug!(claims = entries.len(), "parsed hash spec listing");
        HashSpecList { entries }
    }
}

/// Ordered list of hash claims
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct HashSpecList {
    entries: Vec<HashClaim>,
}

impl HashSpecList {
    /// Parse a listing with a freshly built parser
    ///
    /// # Errors
    ///
    /// Returns an internal error if the claim pattern fails to compile.
    pub fn parse(text: &str) -> Result<Self, Error> {
        Ok(HashSpecParser::new()?.parse(text))
    }

    /// Read and parse a listing from disk
    ///
    /// # Errors
    ///
    /// Returns `HashSpecError::NotFound` if the file does not exist, an
    /// I/O error carrying the path for other read failures, and
    /// `InvalidEncoding` if the contents are not UTF-8.
    pub async fn from_file(path: &Path) -> Result<Self, Error> {
        let bytes = fs::read(path).await.map_err(|e| {
            if e.kind() == std::io::ErrorKind::NotFound {
                Error::from(HashSpecError::NotFound {
                    path: path.display().to_string(),
                })
            } else {
                Error::io_with_path(&e, path)
            }
        })?;
        let text = String::from_utf8(bytes).map_err(|_| HashSpecError::InvalidEncoding {
            path: path.display().to_string(),
        })?;
        Self::parse(&text)
    }

    #[must_use]
    pub fn from_claims(entries: Vec<HashClaim>) -> Self {
        Self { entries }
    }

    /// All claims in encounter order
    #[must_use]
    pub fn entries(&self) -> &[HashClaim] {
        &self.entries
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Claims for `path`, in encounter order
    #[must_use]
    pub fn entries_for_path(&self, path: &str) -> Vec<&HashClaim> {
        self.entries.iter().filter(|e| e.path == path).collect()
    }

    /// Claims for `path` of `hashtype` (type compared ignoring case)
    #[must_use]
    pub fn hashes_for_path(&self, path: &str, hashtype: &str) -> Vec<&HashClaim> {
        self.entries
            .iter()
            .filter(|e| e.path == path && e.is_type(hashtype))
            .collect()
    }

    /// Set of distinct paths
    #[must_use]
    pub fn distinct_paths(&self) -> BTreeSet<&str> {
        self.entries.iter().map(|e| e.path.as_str()).collect()
    }

    /// Distinct paths in first-seen order
    #[must_use]
    pub fn paths_in_order(&self) -> Vec<&str> {
        let mut seen = HashSet::new();
        self.entries
            .iter()
            .map(|e| e.path.as_str())
            .filter(|p| seen.insert(*p))
            .collect()
    }

    /// Render back to listing text, one claim per line
    #[must_use]
    pub fn to_listing(&self) -> String {
        self.to_string()
    }
}

impl fmt::Display for HashSpecList {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for claim in &self.entries {
            writeln!(f, "{claim}")?;
        }
        Ok(())
    }
}

impl FromIterator<HashClaim> for HashSpecList {
    fn from_iter<I: IntoIterator<Item = HashClaim>>(iter: I) -> Self {
        Self {
            entries: iter.into_iter().collect(),
        }
    }
}

impl<'a> IntoIterator for &'a HashSpecList {
    type Item = &'a HashClaim;
    type IntoIter = std::slice::Iter<'a, HashClaim>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.iter()
    }
}
