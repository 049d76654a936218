//! Manifest (MHL document) error types

use std::borrow::Cow;

use crate::UserFacingError;
use thiserror::Error;

#[derive(Debug, Clone, Error)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[non_exhaustive]
pub enum ManifestError {
    #[error("manifest not found: {path}")]
    NotFound { path: String },

    #[error("malformed manifest: {message}")]
    Parse { message: String },

    #[error("invalid size for {path}: {value}")]
    InvalidSize { path: String, value: String },
}

impl From<roxmltree::Error> for ManifestError {
    fn from(err: roxmltree::Error) -> Self {
        Self::Parse {
            message: err.to_string(),
        }
    }
}

impl UserFacingError for ManifestError {
    fn user_message(&self) -> Cow<'_, str> {
        Cow::Owned(self.to_string())
    }

    fn user_hint(&self) -> Option<&'static str> {
        match self {
            Self::NotFound { .. } => Some("Check the manifest path; MHL files usually end in `.mhl`."),
            Self::Parse { .. } => Some("The manifest must be well-formed XML with a <hashlist> root."),
            Self::InvalidSize { .. } => Some("Size elements must hold a non-negative byte count."),
        }
    }

    fn user_code(&self) -> Option<&'static str> {
        let code = match self {
            Self::NotFound { .. } => "manifest.not_found",
            Self::Parse { .. } => "manifest.parse",
            Self::InvalidSize { .. } => "manifest.invalid_size",
        };
        Some(code)
    }
}
