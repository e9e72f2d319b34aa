use psync_crypto::ContentHasher;
use psync_diff::FileDiff;
use psync_types::Fingerprint;
use tracing::trace;

use crate::comments::CommentRegistry;
use crate::normalize::normalize;

/// Computes patch fingerprints over normalized diffs.
#[derive(Clone, Debug)]
pub struct Fingerprinter {
    comments: CommentRegistry,
}

impl Fingerprinter {
    /// A fingerprinter with the built-in comment strategies.
    pub fn new() -> Self {
        Self::with_comments(CommentRegistry::with_defaults())
    }

    /// A fingerprinter with a custom comment registry.
    pub fn with_comments(comments: CommentRegistry) -> Self {
        Self { comments }
    }

    pub fn comments(&self) -> &CommentRegistry {
        &self.comments
    }

    /// The normalized byte stream that [`fingerprint`](Self::fingerprint)
    /// hashes.
    pub fn normalize(&self, diffs: &[FileDiff]) -> Vec<u8> {
        normalize(diffs, &self.comments)
    }

    /// Fingerprint a change set.
    pub fn fingerprint(&self, diffs: &[FileDiff]) -> Fingerprint {
        self.fingerprint_normalized(&self.normalize(diffs))
    }

    /// Fingerprint an already-normalized stream.
    pub fn fingerprint_normalized(&self, normalized: &[u8]) -> Fingerprint {
        let fp = ContentHasher::PATCH.hash(normalized);
        trace!(bytes = normalized.len(), fingerprint = %fp.short_hex(), "fingerprinted patch");
        fp
    }
}

impl Default for Fingerprinter {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;
    use psync_diff::{diff_blobs, diff_file, FileStatus};

    fn modified(path: &str, old: &str, new: &str, context: usize) -> FileDiff {
        let mut diff = diff_file(path, path, Some(old.as_bytes()), Some(new.as_bytes())).unwrap();
        diff.hunks = diff_blobs(old, new, context);
        diff
    }

    #[test]
    fn fingerprint_is_deterministic() {
        let fp = Fingerprinter::new();
        let diff = modified("Lib/os.py", "a\nb\n", "a\nc\n", 3);
        assert_eq!(fp.fingerprint(&[diff.clone()]), fp.fingerprint(&[diff]));
    }

    #[test]
    fn fingerprint_is_stable_across_processes() {
        // Pinned: a changed value means every recorded fingerprint is stale.
        let fp = Fingerprinter::new().fingerprint_normalized(b"file M a a\n-x\n+y\n");
        let expected = ContentHasher::PATCH.hash(b"file M a a\n-x\n+y\n");
        assert_eq!(fp, expected);
        assert_eq!(
            fp.as_bytes(),
            blake3::hash(b"psync-patch-v1:file M a a\n-x\n+y\n").as_bytes()
        );
    }

    #[test]
    fn context_shift_does_not_change_fingerprint() {
        // Same patch rebased onto an upstream that grew lines above it.
        let fp = Fingerprinter::new();
        let before = modified("m.c", "int a;\nint b;\n", "int a;\nint b2;\n", 1);
        let after = modified(
            "m.c",
            "int z;\nint y;\nint a;\nint b;\n",
            "int z;\nint y;\nint a;\nint b2;\n",
            1,
        );
        assert_ne!(before.hunks[0].old_start, after.hunks[0].old_start);
        assert_eq!(fp.fingerprint(&[before]), fp.fingerprint(&[after]));
    }

    #[test]
    fn comment_text_does_not_change_fingerprint() {
        let fp = Fingerprinter::new();
        let v1 = modified("x.py", "a = 1\n", "# Fedora: see bz#1\na = 2\n", 3);
        let v2 = modified("x.py", "a = 1\n", "# Fedora: see bz#2 and upstream\na = 2\n", 3);
        assert_eq!(fp.fingerprint(&[v1]), fp.fingerprint(&[v2]));
    }

    #[test]
    fn semantic_change_changes_fingerprint() {
        let fp = Fingerprinter::new();
        let v1 = modified("x.py", "a = 1\n", "a = 2\n", 3);
        let v2 = modified("x.py", "a = 1\n", "a = 3\n", 3);
        assert_ne!(fp.fingerprint(&[v1]), fp.fingerprint(&[v2]));
    }

    #[test]
    fn same_change_in_different_file_differs() {
        let fp = Fingerprinter::new();
        let a = modified("a.txt", "x\n", "y\n", 3);
        let b = modified("b.txt", "x\n", "y\n", 3);
        assert_ne!(fp.fingerprint(&[a]), fp.fingerprint(&[b]));
    }

    #[test]
    fn registry_choice_affects_comment_handling() {
        let diff = modified("x.py", "a\n", "# note\na\n", 3);
        let with = Fingerprinter::new().fingerprint(&[diff.clone()]);
        let without = Fingerprinter::with_comments(CommentRegistry::empty()).fingerprint(&[diff]);
        assert_ne!(with, without);
        assert_eq!(with, Fingerprinter::new().fingerprint(&[]));
    }

    #[test]
    fn deleted_file_differs_from_empty_change() {
        let fp = Fingerprinter::new();
        let deleted = diff_file("gone.txt", "gone.txt", Some(b"x\n".as_slice()), None).unwrap();
        assert_eq!(deleted.status, FileStatus::Deleted);
        assert_ne!(fp.fingerprint(&[deleted]), fp.fingerprint(&[]));
    }

    proptest! {
        #[test]
        fn prop_context_insensitive(
            lines in prop::collection::vec("[a-z ]{0,12}", 1..40),
            edit in any::<prop::sample::Index>(),
            insert in any::<prop::sample::Index>(),
            ctx_a in 0usize..6,
            ctx_b in 0usize..6,
        ) {
            let old: String = lines.iter().map(|l| format!("{l}\n")).collect();
            let mut new_lines = lines.clone();
            let i = edit.index(new_lines.len());
            new_lines[i] = format!("{} edited", new_lines[i]);
            let j = insert.index(new_lines.len() + 1);
            new_lines.insert(j, "inserted".to_string());
            let new: String = new_lines.iter().map(|l| format!("{l}\n")).collect();

            let fp = Fingerprinter::new();
            let a = modified("f.txt", &old, &new, ctx_a);
            let b = modified("f.txt", &old, &new, ctx_b);
            prop_assert_eq!(fp.fingerprint(&[a]), fp.fingerprint(&[b]));
        }

        #[test]
        fn prop_deterministic(
            old in "[a-z\n]{0,80}",
            new in "[a-z\n]{0,80}",
        ) {
            let fp = Fingerprinter::new();
            if let Some(diff) = diff_file("f.txt", "f.txt", Some(old.as_bytes()), Some(new.as_bytes())) {
                prop_assert_eq!(fp.fingerprint(&[diff.clone()]), fp.fingerprint(&[diff]));
            }
        }
    }
}
