//! A single `TYPE(PATH)= DIGEST` claim

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::HashType;

/// One hash claim as written by a hashing tool.
///
/// The hash type is kept exactly as spelled in the source text; the
/// digest is an opaque string and is never interpreted as a number.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct HashClaim {
    pub hashtype: String,
    pub path: String,
    pub digest: String,
}

impl HashClaim {
    pub fn new(
        hashtype: impl Into<String>,
        path: impl Into<String>,
        digest: impl Into<String>,
    ) -> Self {
        Self {
            hashtype: hashtype.into(),
            path: path.into(),
            digest: digest.into(),
        }
    }

    /// Claim for a known hash family, spelled the way the tool prints it
    pub fn typed(hashtype: HashType, path: impl Into<String>, digest: impl Into<String>) -> Self {
        Self::new(hashtype.display_name(), path, digest)
    }

    /// The known hash family, if the spelling names one
    #[must_use]
    pub fn known_type(&self) -> Option<HashType> {
        self.hashtype.parse().ok()
    }

    /// Whether this claim is of `hashtype`, ignoring case
    #[must_use]
    pub fn is_type(&self, hashtype: &str) -> bool {
        self.hashtype.eq_ignore_ascii_case(hashtype)
    }
}

impl fmt::Display for HashClaim {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}({})= {}", self.hashtype, self.path, self.digest)
    }
}
