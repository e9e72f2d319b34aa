//! The normalization pipeline that feeds the fingerprint hash.
//!
//! Output layout, one record per line:
//!
//! ```text
//! file <status> <old path or -> <new path or ->
//! binary <old id or -> <new id or ->        (binary files only)
//! -removed line
//! +added line
//! ```
//!
//! Files are emitted sorted by path. A modified text file whose changes
//! were all stripped contributes nothing; added, deleted, renamed and
//! binary files always contribute their `file` record.

use psync_diff::{DiffLine, FileDiff, FileStatus};

use crate::comments::CommentRegistry;

/// Produce the normalized byte stream for a change set.
pub fn normalize(diffs: &[FileDiff], comments: &CommentRegistry) -> Vec<u8> {
    let mut files: Vec<&FileDiff> = diffs.iter().collect();
    files.sort_by(|a, b| a.path().cmp(b.path()).then(a.old_path.cmp(&b.old_path)));

    let mut out = Vec::new();
    for file in files {
        let lines = semantic_lines(file, comments);
        let structural = file.status != FileStatus::Modified || file.binary.is_some();
        if lines.is_empty() && !structural {
            continue;
        }

        out.extend_from_slice(
            format!(
                "file {} {} {}\n",
                status_tag(file.status),
                file.old_path.as_deref().unwrap_or("-"),
                file.new_path.as_deref().unwrap_or("-"),
            )
            .as_bytes(),
        );
        if let Some(binary) = &file.binary {
            out.extend_from_slice(
                format!(
                    "binary {} {}\n",
                    binary.old_id.as_deref().unwrap_or("-"),
                    binary.new_id.as_deref().unwrap_or("-"),
                )
                .as_bytes(),
            );
        }
        for (sign, text) in lines {
            out.push(sign);
            out.extend_from_slice(text.as_bytes());
            out.push(b'\n');
        }
    }
    out
}

/// Added and removed lines of one file that survive normalization, in diff
/// order, tagged with `b'+'` or `b'-'`.
fn semantic_lines<'a>(file: &'a FileDiff, comments: &CommentRegistry) -> Vec<(u8, &'a str)> {
    let path = file.path();
    file.hunks
        .iter()
        .flat_map(|h| &h.lines)
        .filter_map(|line| match line {
            DiffLine::Added(t) => Some((b'+', clean(t))),
            DiffLine::Removed(t) => Some((b'-', clean(t))),
            DiffLine::Context(_) | DiffLine::NoNewlineAtEof => None,
        })
        .filter(|(_, text)| !comments.is_comment_only(path, text))
        .collect()
}

// Strips `\r` and any other trailing whitespace.
fn clean(line: &str) -> &str {
    line.trim_end()
}

fn status_tag(status: FileStatus) -> &'static str {
    match status {
        FileStatus::Added => "A",
        FileStatus::Deleted => "D",
        FileStatus::Modified => "M",
        FileStatus::Renamed => "R",
    }
}
