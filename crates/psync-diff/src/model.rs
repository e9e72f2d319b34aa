//! Structured per-file diffs.

use serde::{Deserialize, Serialize};

/// The kind of change a [`FileDiff`] describes.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum FileStatus {
    /// A new file that did not previously exist.
    Added,
    /// A file that has been removed.
    Deleted,
    /// An existing file whose content has changed.
    Modified,
    /// A file that moved to a new path (possibly with edits).
    Renamed,
}

/// Blob identities of a binary change; the content itself is never diffed.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct BinaryChange {
    /// Hex id of the old blob, `None` when the file was added.
    pub old_id: Option<String>,
    /// Hex id of the new blob, `None` when the file was deleted.
    pub new_id: Option<String>,
}

/// The change to one file between a commit and its first parent.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct FileDiff {
    /// Path before the change, `None` for added files.
    pub old_path: Option<String>,
    /// Path after the change, `None` for deleted files.
    pub new_path: Option<String>,
    pub status: FileStatus,
    /// Set for binary files, in which case `hunks` is empty.
    pub binary: Option<BinaryChange>,
    pub hunks: Vec<DiffHunk>,
}

impl FileDiff {
    /// The path this change is reported under: the new path, or the old
    /// one for deletions.
    pub fn path(&self) -> &str {
        self.new_path
            .as_deref()
            .or(self.old_path.as_deref())
            .unwrap_or_default()
    }

    /// Returns `true` if nothing changed in this file.
    pub fn is_empty(&self) -> bool {
        self.binary.is_none() && self.hunks.iter().all(|h| !h.has_changes())
    }

    /// Total number of lines added across all hunks.
    pub fn additions(&self) -> usize {
        self.hunks
            .iter()
            .flat_map(|h| &h.lines)
            .filter(|l| matches!(l, DiffLine::Added(_)))
            .count()
    }

    /// Total number of lines removed across all hunks.
    pub fn deletions(&self) -> usize {
        self.hunks
            .iter()
            .flat_map(|h| &h.lines)
            .filter(|l| matches!(l, DiffLine::Removed(_)))
            .count()
    }
}

/// A contiguous region of changes in a diff.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct DiffHunk {
    /// Line number in the old content where this hunk starts (1-based, or
    /// the line before the hunk when `old_count` is zero).
    pub old_start: usize,
    /// Number of lines from the old content in this hunk.
    pub old_count: usize,
    /// Line number in the new content where this hunk starts.
    pub new_start: usize,
    /// Number of lines from the new content in this hunk.
    pub new_count: usize,
    /// Function context git prints after the `@@` range, possibly empty.
    pub section: String,
    /// The individual diff lines in this hunk.
    pub lines: Vec<DiffLine>,
}

impl DiffHunk {
    /// Returns `true` if the hunk adds or removes at least one line.
    pub fn has_changes(&self) -> bool {
        self.lines
            .iter()
            .any(|l| matches!(l, DiffLine::Added(_) | DiffLine::Removed(_)))
    }
}

/// A single line in a diff hunk, without its trailing newline.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum DiffLine {
    /// A line present in both old and new (context).
    Context(String),
    /// A line added in the new content.
    Added(String),
    /// A line removed from the old content.
    Removed(String),
    /// `\ No newline at end of file` following the previous line.
    NoNewlineAtEof,
}

impl DiffLine {
    /// The line text, or `None` for the end-of-file marker.
    pub fn text(&self) -> Option<&str> {
        match self {
            DiffLine::Context(t) | DiffLine::Added(t) | DiffLine::Removed(t) => Some(t),
            DiffLine::NoNewlineAtEof => None,
        }
    }
}
