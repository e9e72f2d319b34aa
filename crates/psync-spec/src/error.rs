//! Error and issue types for descriptor handling.

use std::fmt;

use psync_types::PatchNumber;
use serde::Serialize;
use thiserror::Error;

/// Fatal descriptor errors.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum SpecError {
    /// The patch section cannot be located or parsed.
    #[error("unreadable descriptor: {0}")]
    Unreadable(#[from] UnreadableReason),

    /// A metadata field needed to derive default refs is missing.
    #[error("descriptor does not define {0}")]
    MissingMetadata(&'static str),
}

/// Why a descriptor could not be read.
#[derive(Clone, Debug, Error, PartialEq, Eq)]
pub enum UnreadableReason {
    #[error("patch section start not found")]
    NoStartMarker,

    #[error("patch section starts more than once (again at line {line})")]
    MultipleStartMarkers { line: usize },

    #[error("end of patch section not found")]
    NoEndMarker,

    #[error("Patch{number} is declared more than once")]
    DuplicateTag { number: PatchNumber },

    #[error("cannot parse patch tag at line {line}: {text}")]
    BadTag { line: usize, text: String },
}

/// Convenience type alias for descriptor operations.
pub type SpecResult<T> = std::result::Result<T, SpecError>;

/// A problem in the existing descriptor that is reported and left alone.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum SpecIssue {
    /// `# NNNNN #` header and `PatchN:` tag disagree. The tag wins and the
    /// recorded hash is ignored.
    HeaderMismatch {
        line: usize,
        header: PatchNumber,
        tag: PatchNumber,
    },
    /// Text in the patch section that belongs to no `PatchN:` line.
    StrayText { line: usize, text: String },
}

impl fmt::Display for SpecIssue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::HeaderMismatch { line, header, tag } => write!(
                f,
                "line {line}: header says {} but tag is Patch{tag}",
                header.padded()
            ),
            Self::StrayText { line, text } => {
                let first = text.lines().next().unwrap_or_default();
                write!(f, "line {line}: text without a patch tag: {first}")
            }
        }
    }
}
