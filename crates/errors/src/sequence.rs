//! Sequence specification error types

use std::borrow::Cow;

use crate::UserFacingError;
use thiserror::Error;

/// The two failure classes of a sequence specification.
///
/// A syntactically broken spec and a well-formed spec describing a
/// sequence with holes are reported differently by the tool under test
/// and must stay distinguishable here.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[non_exhaustive]
pub enum SequenceError {
    #[error("invalid sequence token '{token}': {reason}")]
    InvalidSyntax { token: String, reason: String },

    #[error("sequence {first}-{last} has a gap starting at {first_missing}")]
    HasGap {
        first: u32,
        last: u32,
        first_missing: u32,
    },
}

impl SequenceError {
    /// Shorthand for a syntax error on `token`
    pub fn invalid(token: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::InvalidSyntax {
            token: token.into(),
            reason: reason.into(),
        }
    }

    #[must_use]
    pub fn is_syntax(&self) -> bool {
        matches!(self, Self::InvalidSyntax { .. })
    }

    #[must_use]
    pub fn is_gap(&self) -> bool {
        matches!(self, Self::HasGap { .. })
    }
}

impl UserFacingError for SequenceError {
    fn user_message(&self) -> Cow<'_, str> {
        Cow::Owned(self.to_string())
    }

    fn user_hint(&self) -> Option<&'static str> {
        match self {
            Self::InvalidSyntax { .. } => {
                Some("Use comma-separated numbers or ranges such as `1-5, 7, 10-12`.")
            }
            Self::HasGap { .. } => Some("Add the missing numbers or split the sequence."),
        }
    }

    fn user_code(&self) -> Option<&'static str> {
        let code = match self {
            Self::InvalidSyntax { .. } => "sequence.invalid_syntax",
            Self::HasGap { .. } => "sequence.gap",
        };
        Some(code)
    }
}
