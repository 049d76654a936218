//! Reference hashing error types

use std::borrow::Cow;

use crate::UserFacingError;
use thiserror::Error;

#[derive(Debug, Clone, Error)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[non_exhaustive]
pub enum HashError {
    #[error("file not found: {path}")]
    FileNotFound { path: String },

    #[error("not a regular file: {path}")]
    NotAFile { path: String },

    #[error("unsupported hash type: {name}")]
    UnsupportedType { name: String },

    #[error("read failed for {path}: {message}")]
    ReadFailed { path: String, message: String },
}

impl UserFacingError for HashError {
    fn user_message(&self) -> Cow<'_, str> {
        Cow::Owned(self.to_string())
    }

    fn user_hint(&self) -> Option<&'static str> {
        match self {
            Self::UnsupportedType { .. } => {
                Some("Supported types: md5, sha1, xxhash, xxhash64, xxhash64be, null.")
            }
            Self::FileNotFound { .. } | Self::NotAFile { .. } => {
                Some("Pass paths to existing regular files.")
            }
            Self::ReadFailed { .. } => None,
        }
    }

    fn is_retryable(&self) -> bool {
        matches!(self, Self::ReadFailed { .. })
    }

    fn user_code(&self) -> Option<&'static str> {
        let code = match self {
            Self::FileNotFound { .. } => "hash.file_not_found",
            Self::NotAFile { .. } => "hash.not_a_file",
            Self::UnsupportedType { .. } => "hash.unsupported_type",
            Self::ReadFailed { .. } => "hash.read_failed",
        };
        Some(code)
    }
}
