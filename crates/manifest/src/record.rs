//! One `<hash>` group of an MHL document

use mhlcheck_types::HashType;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// A leaf element inside a `<hash>` group, in document order
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ManifestElement {
    pub name: String,
    pub text: String,
}

/// All facts recorded by a single `<hash>` group.
///
/// A manifest may contain several groups for the same path (one per
/// seal event); each group stays its own record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PathRecord {
    pub(crate) path: String,
    pub(crate) sizes: Vec<u64>,
    pub(crate) elements: Vec<ManifestElement>,
}

impl PathRecord {
    #[must_use]
    pub fn path(&self) -> &str {
        &self.path
    }

    /// The size recorded by this group, last one if repeated
    #[must_use]
    pub fn size(&self) -> Option<u64> {
        self.sizes.last().copied()
    }

    #[must_use]
    pub fn sizes(&self) -> &[u64] {
        &self.sizes
    }

    /// Every leaf element of the group, `file` and `size` included
    #[must_use]
    pub fn elements(&self) -> &[ManifestElement] {
        &self.elements
    }

    /// Texts of elements named `tag` (case-insensitive), document order
    #[must_use]
    pub fn values_of(&self, tag: &str) -> Vec<&str> {
        self.elements
            .iter()
            .filter(|e| e.name.eq_ignore_ascii_case(tag))
            .map(|e| e.text.as_str())
            .collect()
    }

    /// Digests of the known hash families recorded in this group
    #[must_use]
    pub fn digests(&self) -> BTreeMap<HashType, Vec<&str>> {
        let mut digests: BTreeMap<HashType, Vec<&str>> = BTreeMap::new();
        for element in &self.elements {
            if let Ok(ty) = element.name.parse::<HashType>() {
                digests.entry(ty).or_default().push(element.text.as_str());
            }
        }
        digests
    }
}
