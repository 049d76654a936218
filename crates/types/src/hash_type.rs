//! Hash families understood by the MHL tool
//!
//! Each family has two spellings: the prefix used in hash-spec listings
//! (`MD5(file)= ...`) and the lowercase element name used in MHL
//! manifests (`<md5>...</md5>`).

use mhlcheck_errors::HashError;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum HashType {
    Md5,
    Sha1,
    /// 32-bit xxHash, rendered as a zero-padded 10-digit decimal
    XxHash,
    /// 64-bit xxHash, digest bytes rendered in little-endian order
    XxHash64,
    /// 64-bit xxHash, digest rendered big-endian
    XxHash64Be,
    Null,
}

impl HashType {
    pub const ALL: [HashType; 6] = [
        Self::Md5,
        Self::Sha1,
        Self::XxHash,
        Self::XxHash64,
        Self::XxHash64Be,
        Self::Null,
    ];

    /// Element name inside an MHL `<hash>` group
    #[must_use]
    pub fn manifest_tag(self) -> &'static str {
        match self {
            Self::Md5 => "md5",
            Self::Sha1 => "sha1",
            Self::XxHash => "xxhash",
            Self::XxHash64 => "xxhash64",
            Self::XxHash64Be => "xxhash64be",
            Self::Null => "null",
        }
    }

    /// Prefix used in hash-spec listings
    #[must_use]
    pub fn display_name(self) -> &'static str {
        match self {
            Self::Md5 => "MD5",
            Self::Sha1 => "SHA1",
            Self::XxHash => "XXHash",
            Self::XxHash64 => "XXHash64",
            Self::XxHash64Be => "XXHash64BE",
            Self::Null => "NULL",
        }
    }

    /// Length of a rendered digest in characters
    #[must_use]
    pub fn digest_len(self) -> usize {
        match self {
            Self::Md5 => 32,
            Self::Sha1 => 40,
            Self::XxHash => 10,
            Self::XxHash64 | Self::XxHash64Be => 16,
            Self::Null => 0,
        }
    }

    /// Whether the digest is a decimal number rather than hex
    #[must_use]
    pub fn is_decimal(self) -> bool {
        matches!(self, Self::XxHash)
    }
}

impl fmt::Display for HashType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.display_name())
    }
}

impl FromStr for HashType {
    type Err = HashError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let lowered = s.trim().to_ascii_lowercase();
        Self::ALL
            .into_iter()
            .find(|ty| ty.manifest_tag() == lowered)
            .ok_or(HashError::UnsupportedType {
                name: s.to_string(),
            })
    }
}
