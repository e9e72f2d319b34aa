//! Commit message bodies as they appear in descriptor comments.

use std::sync::LazyLock;

use psync_types::PatchNumber;
use regex::Regex;

static CHERRY_PICK_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^\(cherry picked from commit [0-9a-fA-F]{40}\)$").expect("cherry-pick regex")
});

/// Everything after the summary line, untouched apart from trimming.
pub fn raw_body(message: &str) -> &str {
    let message = message.trim();
    match message.split_once('\n') {
        Some((_, rest)) => rest.trim(),
        None => "",
    }
}

/// Body of a numbered or positional commit with bookkeeping trailers
/// removed: `Co-authored-by:` lines and `git cherry-pick -x` notes.
pub fn comment_body(message: &str) -> String {
    let kept: Vec<&str> = raw_body(message)
        .lines()
        .filter(|line| !is_bookkeeping(line))
        .collect();
    kept.join("\n").trim().to_string()
}

/// Body of a legacy commit: kept as-is except for a leading
/// `# NNNNN #` line repeating the patch number.
pub fn legacy_body(message: &str, number: PatchNumber) -> String {
    let body = raw_body(message);
    let padded = number.padded();
    let mut lines = body.lines();
    let first = lines.next().unwrap_or_default().trim();
    if first == format!("# {padded} #") || first == format!("{padded} #") {
        lines.collect::<Vec<_>>().join("\n").trim().to_string()
    } else {
        body.to_string()
    }
}

fn is_bookkeeping(line: &str) -> bool {
    let trimmed = line.trim();
    trimmed.to_ascii_lowercase().starts_with("co-authored-by:") || CHERRY_PICK_RE.is_match(trimmed)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn raw_body_after_summary() {
        assert_eq!(raw_body("00001: x\n\nline one\nline two\n\n"), "line one\nline two");
        assert_eq!(raw_body("only a summary"), "");
    }

    #[test]
    fn drops_co_authors_and_cherry_pick_notes() {
        let message = "00123: Fix\n\
                       \n\
                       Explains the fix.\n\
                       \n\
                       Co-authored-by: A <a@example.com>\n\
                       CO-AUTHORED-BY: B <b@example.com>\n\
                       (cherry picked from commit 0123456789abcdef0123456789abcdef01234567)\n";
        assert_eq!(comment_body(message), "Explains the fix.");
    }

    #[test]
    fn short_cherry_pick_hash_is_kept() {
        let message = "1: x\n\n(cherry picked from commit abc123)\n";
        assert_eq!(comment_body(message), "(cherry picked from commit abc123)");
    }

    #[test]
    fn legacy_body_drops_number_line() {
        let message = "python-2.5-cflags.patch\n\n# 00055 #\nUse our CFLAGS.\n";
        assert_eq!(legacy_body(message, PatchNumber::new(55)), "Use our CFLAGS.");
    }

    #[test]
    fn legacy_body_keeps_unrelated_first_line() {
        let message = "python-2.6-rpath.patch\n\nSet rpath.\n";
        assert_eq!(legacy_body(message, PatchNumber::new(16)), "Set rpath.");
    }
}
