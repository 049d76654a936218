//! Hash-spec listing error types

use std::borrow::Cow;

use crate::UserFacingError;
use thiserror::Error;

#[derive(Debug, Clone, Error)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[non_exhaustive]
pub enum HashSpecError {
    #[error("hash spec listing not found: {path}")]
    NotFound { path: String },

    #[error("listing is not valid UTF-8: {path}")]
    InvalidEncoding { path: String },
}

impl UserFacingError for HashSpecError {
    fn user_message(&self) -> Cow<'_, str> {
        Cow::Owned(self.to_string())
    }

    fn user_hint(&self) -> Option<&'static str> {
        match self {
            Self::NotFound { .. } => Some("Capture the reference tool output to a file first."),
            Self::InvalidEncoding { .. } => Some("Re-encode the listing as UTF-8."),
        }
    }

    fn user_code(&self) -> Option<&'static str> {
        let code = match self {
            Self::NotFound { .. } => "hashspec.not_found",
            Self::InvalidEncoding { .. } => "hashspec.invalid_encoding",
        };
        Some(code)
    }
}
