//! What a manifest is expected to record

use mhlcheck_hashspec::HashSpecList;
use mhlcheck_types::HashType;
use serde::Serialize;
use std::collections::BTreeMap;
use tracing::warn;

/// Expected facts for one path
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ExpectedFacts {
    /// Hash type (manifest tag spelling) to digest
    pub digests: BTreeMap<String, String>,
    pub size: Option<u64>,
}

/// Path to expected facts
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ExpectationTable {
    paths: BTreeMap<String, ExpectedFacts>,
}

impl ExpectationTable {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Build from a reference listing.
    ///
    /// Known hash types are normalized to their manifest tag (`MD5` becomes
    /// `md5`), unknown ones are lowercased. A later claim for the same
    /// path and type replaces an earlier one.
    #[must_use]
    pub fn from_hash_specs(list: &HashSpecList) -> Self {
        let mut table = Self::new();
        for claim in list {
            let tag = claim.known_type().map_or_else(
                || claim.hashtype.to_ascii_lowercase(),
                |ty| ty.manifest_tag().to_string(),
            );
            table.expect_digest(&claim.path, tag, &claim.digest);
        }
        table
    }

    /// Build from a reference listing keeping hash types as written
    #[must_use]
    pub fn from_hash_specs_exact(list: &HashSpecList) -> Self {
        let mut table = Self::new();
        for claim in list {
            table.expect_digest(&claim.path, &claim.hashtype, &claim.digest);
        }
        table
    }

    /// Register a path with no facts yet
    pub fn expect_path(&mut self, path: impl Into<String>) -> &mut ExpectedFacts {
        self.paths.entry(path.into()).or_default()
    }

    pub fn expect_digest(
        &mut self,
        path: &str,
        hashtype: impl Into<String>,
        digest: impl Into<String>,
    ) -> &mut Self {
        let hashtype = hashtype.into();
        let digest = digest.into();
        let facts = self.expect_path(path);
        if let Some(previous) = facts.digests.get(&hashtype) {
            if *previous != digest {
                warn!(path, hashtype = %hashtype, previous = %previous, "expectation replaced");
            }
        }
        facts.digests.insert(hashtype, digest);
        self
    }

    /// Shorthand for a known hash family
    pub fn expect_typed(&mut self, path: &str, hashtype: HashType, digest: &str) -> &mut Self {
        self.expect_digest(path, hashtype.manifest_tag(), digest)
    }

    pub fn expect_size(&mut self, path: &str, size: u64) -> &mut Self {
        self.expect_path(path).size = Some(size);
        self
    }

    #[must_use]
    pub fn get(&self, path: &str) -> Option<&ExpectedFacts> {
        self.paths.get(path)
    }

    #[must_use]
    pub fn contains(&self, path: &str) -> bool {
        self.paths.contains_key(path)
    }

    /// Entries sorted by path
    pub fn iter(&self) -> impl Iterator<Item = (&str, &ExpectedFacts)> {
        self.paths.iter().map(|(p, f)| (p.as_str(), f))
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.paths.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.paths.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_hash_specs_normalizes_types() {
        let list = HashSpecList::parse(
            "MD5(a.txt)= 91cae4eeb20d47ca70abbbf058a74e80\n\
             XXHash64BE(a.txt)= ef46db3751d8e999\n\
             CRC32(b.txt)= 1234abcd\n",
        )
        .unwrap();
        let table = ExpectationTable::from_hash_specs(&list);

        let a = table.get("a.txt").unwrap();
        assert_eq!(a.digests["md5"], "91cae4eeb20d47ca70abbbf058a74e80");
        assert_eq!(a.digests["xxhash64be"], "ef46db3751d8e999");
        assert_eq!(table.get("b.txt").unwrap().digests["crc32"], "1234abcd");
        assert_eq!(table.len(), 2);
    }

    #[test]
    fn test_exact_keeps_spelling() {
        let list = HashSpecList::parse("MD5(a.txt)= 00\n").unwrap();
        let table = ExpectationTable::from_hash_specs_exact(&list);
        assert!(table.get("a.txt").unwrap().digests.contains_key("MD5"));
    }

    #[test]
    fn test_builder() {
        let mut table = ExpectationTable::new();
        table
            .expect_typed("f", HashType::Sha1, "aa")
            .expect_size("f", 10)
            .expect_digest("f", "sha1", "bb");
        let f = table.get("f").unwrap();
        assert_eq!(f.size, Some(10));
        assert_eq!(f.digests["sha1"], "bb");
    }
}
