//! Error types for repository access.

use psync_types::{CommitId, TypeError};
use thiserror::Error;

/// Errors that can occur while reading the upstream repository.
#[derive(Debug, Error)]
pub enum GitError {
    /// A reference (branch, tag, commit-ish) did not resolve to a commit.
    #[error("reference not found: {reference}")]
    RefNotFound { reference: String },

    /// The baseline is not on the first-parent history of the branch.
    #[error("{baseline} is not a first-parent ancestor of {branch}")]
    NotAncestor { baseline: String, branch: String },

    /// The walked range is longer than the configured limit, which usually
    /// means the wrong branch or baseline was given.
    #[error("more than {limit} commits between {baseline} and {branch}; wrong branch?")]
    RangeTooLarge {
        limit: usize,
        baseline: String,
        branch: String,
    },

    /// A commit id that should exist could not be read.
    #[error("commit not found: {0}")]
    CommitNotFound(CommitId),

    /// Invalid identifier data.
    #[error("invalid identifier: {0}")]
    Type(#[from] TypeError),

    /// Underlying libgit2 failure.
    #[error("git error: {0}")]
    Git(#[from] git2::Error),
}

/// Convenience type alias for repository operations.
pub type GitResult<T> = std::result::Result<T, GitError>;
