//! Blob-level diff: line-by-line comparison of file contents.
//!
//! Uses the `similar` crate (Myers diff algorithm) to produce structured
//! hunks with context lines. Git-backed repositories get their hunks from
//! libgit2 instead; this path serves snapshot-based repositories.

use psync_crypto::ContentHasher;
use similar::{ChangeTag, TextDiff};

use crate::model::{BinaryChange, DiffHunk, DiffLine, FileDiff, FileStatus};

/// Context lines per hunk, matching `git diff`'s default.
pub const DEFAULT_CONTEXT: usize = 3;

const BLOB_HASHER: ContentHasher = ContentHasher::new("psync-blob-v1");

/// Compute the hunks between two text blobs.
///
/// Returns an empty vec when the contents are identical. Callers are
/// expected to have ruled out binary content (see [`diff_file`]).
pub fn diff_blobs(old: &str, new: &str, context: usize) -> Vec<DiffHunk> {
    if old == new {
        return Vec::new();
    }

    let text_diff = TextDiff::from_lines(old, new);
    let mut hunks = Vec::new();

    for group in text_diff.grouped_ops(context) {
        let (Some(first), Some(last)) = (group.first(), group.last()) else {
            continue;
        };
        let old_range = first.old_range().start..last.old_range().end;
        let new_range = first.new_range().start..last.new_range().end;

        let mut lines = Vec::new();
        for op in &group {
            for change in text_diff.iter_changes(op) {
                let text = change.value().trim_end_matches('\n').to_string();
                lines.push(match change.tag() {
                    ChangeTag::Equal => DiffLine::Context(text),
                    ChangeTag::Delete => DiffLine::Removed(text),
                    ChangeTag::Insert => DiffLine::Added(text),
                });
                if change.missing_newline() {
                    lines.push(DiffLine::NoNewlineAtEof);
                }
            }
        }

        hunks.push(DiffHunk {
            old_start: hunk_start(old_range.start, old_range.len()),
            old_count: old_range.len(),
            new_start: hunk_start(new_range.start, new_range.len()),
            new_count: new_range.len(),
            section: String::new(),
            lines,
        });
    }

    hunks
}

/// Diff one file between two snapshots.
///
/// `None` on either side means the file does not exist there. Returns
/// `None` when both sides are equal (or both absent). Content that is not
/// valid UTF-8 or contains NUL bytes is treated as binary and summarized by
/// blob identity.
pub fn diff_file(
    old_path: &str,
    new_path: &str,
    old: Option<&[u8]>,
    new: Option<&[u8]>,
) -> Option<FileDiff> {
    let status = match (old, new) {
        (None, None) => return None,
        (None, Some(_)) => FileStatus::Added,
        (Some(_), None) => FileStatus::Deleted,
        (Some(a), Some(b)) if a == b && old_path == new_path => return None,
        (Some(_), Some(_)) if old_path != new_path => FileStatus::Renamed,
        (Some(_), Some(_)) => FileStatus::Modified,
    };

    let old_path = old.map(|_| old_path.to_string());
    let new_path = new.map(|_| new_path.to_string());

    let old_text = old.map(as_text);
    let new_text = new.map(as_text);
    if matches!(old_text, Some(None)) || matches!(new_text, Some(None)) {
        return Some(FileDiff {
            old_path,
            new_path,
            status,
            binary: Some(BinaryChange {
                old_id: old.map(|d| BLOB_HASHER.hash(d).to_hex()),
                new_id: new.map(|d| BLOB_HASHER.hash(d).to_hex()),
            }),
            hunks: Vec::new(),
        });
    }

    let hunks = diff_blobs(
        old_text.flatten().unwrap_or_default(),
        new_text.flatten().unwrap_or_default(),
        DEFAULT_CONTEXT,
    );
    Some(FileDiff {
        old_path,
        new_path,
        status,
        binary: None,
        hunks,
    })
}

fn as_text(data: &[u8]) -> Option<&str> {
    if data.contains(&0) {
        return None;
    }
    std::str::from_utf8(data).ok()
}

// Git reports an empty range as starting at the line before it.
fn hunk_start(start: usize, len: usize) -> usize {
    if len == 0 {
        start
    } else {
        start + 1
    }
}
