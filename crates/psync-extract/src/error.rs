//! Error and diagnostic types for patch extraction.

use std::fmt;

use psync_types::{CommitId, PatchNumber};
use serde::Serialize;
use thiserror::Error;

/// Fatal extraction errors. No partial patch list is produced.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ExtractError {
    /// The bundled-versions patch lists the same package twice.
    #[error("bundled version for {name} appears twice in patch {number}")]
    DuplicateBundledVersion { number: PatchNumber, name: String },
}

/// Convenience type alias for extraction operations.
pub type ExtractResult<T> = std::result::Result<T, ExtractError>;

/// Why a commit was left out of the patch list.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum MalformedReason {
    /// No `NNNNN: ` prefix while other commits in the range have one.
    Unnumbered,
    /// A legacy `name.patch` summary with no patch number anywhere in the
    /// message.
    LegacyWithoutNumber,
    /// The number prefix does not fit a patch number.
    NumberOutOfRange,
}

impl fmt::Display for MalformedReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Unnumbered => "no patch number in summary",
            Self::LegacyWithoutNumber => "cannot find patch number for legacy patch",
            Self::NumberOutOfRange => "patch number out of range",
        })
    }
}

/// A non-fatal problem found during extraction. The run continues.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ExtractIssue {
    /// The commit was excluded from the patch list.
    Malformed {
        commit: CommitId,
        summary: String,
        reason: MalformedReason,
    },
}

impl fmt::Display for ExtractIssue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Malformed {
                commit,
                summary,
                reason,
            } => write!(f, "skipped {}: {reason}: {summary}", commit.short_hex()),
        }
    }
}
