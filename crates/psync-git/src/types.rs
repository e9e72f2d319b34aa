//! Commit data as the rest of patchsync sees it.

use chrono::{DateTime, FixedOffset};
use psync_diff::FileDiff;
use psync_types::CommitId;
use serde::{Deserialize, Serialize};

/// Commit author, as recorded in the commit object.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Author {
    pub name: String,
    pub email: String,
}

impl Author {
    pub fn new(name: impl Into<String>, email: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            email: email.into(),
        }
    }
}

/// Everything about a commit except its diff.
///
/// Walking only needs headers; diffs are loaded for the commits that end up
/// in the range.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CommitHeader {
    pub id: CommitId,
    /// Parent ids in order; the first one is the first parent.
    pub parents: Vec<CommitId>,
    pub author: Author,
    /// Author date. Informational only.
    pub time: DateTime<FixedOffset>,
    /// Raw commit message.
    pub message: String,
}

impl CommitHeader {
    pub fn first_parent(&self) -> Option<&CommitId> {
        self.parents.first()
    }

    pub fn is_merge(&self) -> bool {
        self.parents.len() > 1
    }

    /// First line of the message.
    pub fn summary(&self) -> &str {
        self.message.lines().next().unwrap_or_default()
    }
}

/// A commit together with its diff against the first parent.
///
/// Immutable once read; produced and consumed within one run.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CommitRecord {
    pub header: CommitHeader,
    pub diff: Vec<FileDiff>,
}

impl CommitRecord {
    pub fn new(header: CommitHeader, diff: Vec<FileDiff>) -> Self {
        Self { header, diff }
    }

    pub fn id(&self) -> &CommitId {
        &self.header.id
    }

    pub fn message(&self) -> &str {
        &self.header.message
    }
}
