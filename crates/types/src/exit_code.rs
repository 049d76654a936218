//! Exit codes reported by the tool under test

use serde::{Deserialize, Serialize};
use std::fmt;

/// Process exit codes of the MHL tool that the oracle asserts on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ToolExitCode {
    Success,
    Unknown,
    WrongArguments,
    NoSuchFile,
    IoError,
    WrongInputFormat,
    MhlNotFound,
    WrongMhlFormat,
    FileSizeMismatch,
    HashMismatch,
    InvalidSequence,
    GapInSequence,
    NoMhlEntry,
}

impl ToolExitCode {
    #[must_use]
    pub fn code(self) -> i32 {
        match self {
            Self::Success => 0,
            Self::Unknown => 1,
            Self::WrongArguments => 2,
            Self::NoSuchFile => 3,
            Self::IoError => 4,
            Self::WrongInputFormat => 6,
            Self::MhlNotFound => 10,
            Self::WrongMhlFormat => 11,
            Self::FileSizeMismatch => 15,
            Self::HashMismatch => 16,
            Self::InvalidSequence => 22,
            Self::GapInSequence => 23,
            Self::NoMhlEntry => 24,
        }
    }

    #[must_use]
    pub fn from_code(code: i32) -> Option<Self> {
        [
            Self::Success,
            Self::Unknown,
            Self::WrongArguments,
            Self::NoSuchFile,
            Self::IoError,
            Self::WrongInputFormat,
            Self::MhlNotFound,
            Self::WrongMhlFormat,
            Self::FileSizeMismatch,
            Self::HashMismatch,
            Self::InvalidSequence,
            Self::GapInSequence,
            Self::NoMhlEntry,
        ]
        .into_iter()
        .find(|c| c.code() == code)
    }

    /// Verification failures that `mhl verify` reports as a plain "no"
    #[must_use]
    pub fn is_verification_failure(self) -> bool {
        matches!(
            self,
            Self::FileSizeMismatch | Self::HashMismatch | Self::NoSuchFile
        )
    }
}

impl fmt::Display for ToolExitCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({self:?})", self.code())
    }
}
