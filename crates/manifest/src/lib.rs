#![deny(clippy::pedantic, unsafe_code)]
#![allow(clippy::module_name_repetitions)]

//! MHL manifest handling for mhlcheck
//!
//! Loads a media hash list document into an ordered list of
//! [`PathRecord`]s and answers per-path queries. Repeated groups for the
//! same path are never merged here; the query layer returns every value
//! and callers decide whether more than one distinct value is acceptable.

mod encoding;
mod record;

pub use record::{ManifestElement, PathRecord};

use mhlcheck_errors::{Error, ManifestError};
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::path::Path;
use tracing::{debug, warn};

const HASH_GROUP_TAG: &str = "hash";
const FILE_TAG: &str = "file";
const SIZE_TAG: &str = "size";
const CREATOR_TAG: &str = "creatorinfo";

/// The `<creatorinfo>` block, when present
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CreatorInfo {
    pub name: Option<String>,
    pub username: Option<String>,
    pub hostname: Option<String>,
    pub tool: Option<String>,
    pub startdate: Option<String>,
    pub finishdate: Option<String>,
}

/// Parsed MHL document
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ManifestDocument {
    records: Vec<PathRecord>,
    /// Text of every `<file>` element, including any outside a `<hash>` group
    paths: Vec<String>,
    creator: Option<CreatorInfo>,
}

impl ManifestDocument {
    /// Parse a manifest from text
    ///
    /// Every element named `hash` with a `file` child is a record,
    /// however deeply nested.
    ///
    /// # Errors
    ///
    /// Returns `ManifestError::Parse` if the text is not well-formed XML
    /// and `ManifestError::InvalidSize` if a `size` is not a byte count.
    pub fn parse(text: &str) -> Result<Self, Error> {
        let doc = roxmltree::Document::parse(text).map_err(ManifestError::from)?;

        let mut records = Vec::new();
        let mut paths = Vec::new();
        let mut creator = None;
        for node in doc.descendants().filter(roxmltree::Node::is_element) {
            match node.tag_name().name() {
                HASH_GROUP_TAG => {
                    if let Some(record) = read_record(node)? {
                        records.push(record);
                    }
                }
                FILE_TAG => paths.push(element_text(node)),
                CREATOR_TAG => creator = Some(read_creator(node)),
                _ => {}
            }
        }

        debug!(records = records.len(), paths = paths.len(), "parsed manifest");
        Ok(Self {
            records,
            paths,
            creator,
        })
    }

    /// Parse raw manifest bytes (UTF-8 or BOM-prefixed UTF-16)
    ///
    /// # Errors
    ///
    /// Returns a parse error if the bytes cannot be decoded or parsed.
    pub fn from_bytes(bytes: &[u8]) -> Result<Self, Error> {
        let text = encoding::decode(bytes)?;
        Self::parse(&text)
    }

    /// Load a manifest from disk
    ///
    /// # Errors
    ///
    /// Returns `ManifestError::NotFound` if the file does not exist, an
    /// I/O error carrying the path for any other read failure, or a
    /// parse error as for [`ManifestDocument::parse`].
    pub async fn from_file(path: &Path) -> Result<Self, Error> {
        let bytes = tokio::fs::read(path).await.map_err(|e| {
            if e.kind() == std::io::ErrorKind::NotFound {
                Error::from(ManifestError::NotFound {
                    path: path.display().to_string(),
                })
            } else {
                Error::io_with_path(&e, path)
            }
        })?;
        Self::from_bytes(&bytes)
    }

    /// All records in document order
    #[must_use]
    pub fn records(&self) -> &[PathRecord] {
        &self.records
    }

    #[must_use]
    pub fn creator(&self) -> Option<&CreatorInfo> {
        self.creator.as_ref()
    }

    /// Records for `path`, document order
    #[must_use]
    pub fn records_for(&self, path: &str) -> Vec<&PathRecord> {
        self.records.iter().filter(|r| r.path == path).collect()
    }

    /// Every digest of `hashtype` recorded for `path`, across all groups
    ///
    /// The hash type is matched against element names ignoring case, so
    /// `MD5` finds `<md5>`.
    #[must_use]
    pub fn digests_for(&self, path: &str, hashtype: &str) -> Vec<&str> {
        self.records_for(path)
            .into_iter()
            .flat_map(|r| r.values_of(hashtype))
            .collect()
    }

    /// Every size recorded for `path`, across all groups
    #[must_use]
    pub fn sizes_for(&self, path: &str) -> Vec<u64> {
        self.records_for(path)
            .into_iter()
            .flat_map(|r| r.sizes.iter().copied())
            .collect()
    }

    /// Last recorded digest of `hashtype` for `path`
    #[must_use]
    pub fn digest_for(&self, path: &str, hashtype: &str) -> Option<&str> {
        self.digests_for(path, hashtype).last().copied()
    }

    /// Last recorded size for `path`
    #[must_use]
    pub fn size_for(&self, path: &str) -> Option<u64> {
        self.sizes_for(path).last().copied()
    }

    /// Number of `tag` elements recorded for `path`
    #[must_use]
    pub fn tag_count(&self, path: &str, tag: &str) -> usize {
        self.records_for(path)
            .into_iter()
            .map(|r| r.values_of(tag).len())
            .sum()
    }

    /// Distinct paths appearing anywhere in the document
    ///
    /// Counts every `<file>` element, so a path outside any `<hash>`
    /// group is listed here even though no record carries it.
    #[must_use]
    pub fn all_paths(&self) -> BTreeSet<&str> {
        self.paths.iter().map(String::as_str).collect()
    }

    /// Every `<file>` value in document order, repeats included
    #[must_use]
    pub fn files(&self) -> Vec<&str> {
        self.paths.iter().map(String::as_str).collect()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

fn element_text(node: roxmltree::Node<'_, '_>) -> String {
    node.descendants()
        .filter(roxmltree::Node::is_text)
        .filter_map(|t| t.text())
        .collect::<String>()
        .trim()
        .to_string()
}

fn read_record(node: roxmltree::Node<'_, '_>) -> Result<Option<PathRecord>, ManifestError> {
    let mut path: Option<String> = None;
    let mut sizes = Vec::new();
    let mut elements = Vec::new();

    for child in node.children().filter(roxmltree::Node::is_element) {
        let name = child.tag_name().name().to_string();
        let text = element_text(child);

        if name == FILE_TAG {
            if let Some(existing) = &path {
                warn!(path = %existing, extra = %text, "hash group names more than one file");
            } else {
                path = Some(text.clone());
            }
        }
        elements.push(ManifestElement { name, text });
    }

    let Some(path) = path else {
        return Ok(None);
    };

    for element in elements.iter().filter(|e| e.name == SIZE_TAG) {
        let size = element
            .text
            .parse::<u64>()
            .map_err(|_| ManifestError::InvalidSize {
                path: path.clone(),
                value: element.text.clone(),
            })?;
        sizes.push(size);
    }

    Ok(Some(PathRecord {
        path,
        sizes,
        elements,
    }))
}

fn read_creator(node: roxmltree::Node<'_, '_>) -> CreatorInfo {
    let mut info = CreatorInfo::default();
    for child in node.children().filter(roxmltree::Node::is_element) {
        let value = Some(element_text(child));
        match child.tag_name().name() {
            "name" => info.name = value,
            "username" => info.username = value,
            "hostname" => info.hostname = value,
            "tool" => info.tool = value,
            "startdate" => info.startdate = value,
            "finishdate" => info.finishdate = value,
            _ => {}
        }
    }
    info
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_nested_groups_are_found() {
        let doc = ManifestDocument::parse(
            "<root><batch><hash><file>a.txt</file><md5>01</md5></hash></batch></root>",
        )
        .unwrap();
        assert_eq!(doc.files(), vec!["a.txt"]);
        assert_eq!(doc.digests_for("a.txt", "md5"), vec!["01"]);
    }

    #[test]
    fn test_group_without_file_is_ignored() {
        let doc = ManifestDocument::parse("<hashlist><hash><md5>01</md5></hash></hashlist>").unwrap();
        assert!(doc.is_empty());
    }

    #[test]
    fn test_file_outside_group_is_listed() {
        let doc = ManifestDocument::parse(
            "<hashlist><file>loose.txt</file><hash><file>a.txt</file><md5>01</md5></hash></hashlist>",
        )
        .unwrap();
        assert_eq!(doc.records().len(), 1);
        assert_eq!(doc.files(), vec!["loose.txt", "a.txt"]);
        assert!(doc.all_paths().contains("loose.txt"));
        assert!(doc.records_for("loose.txt").is_empty());
    }

    #[test]
    fn test_invalid_size() {
        let err = ManifestDocument::parse(
            "<hashlist><hash><file>a</file><size>big</size></hash></hashlist>",
        )
        .unwrap_err();
        assert!(matches!(
            err,
            Error::Manifest(ManifestError::InvalidSize { .. })
        ));
    }
}
