//! Patch file naming.

use std::sync::LazyLock;

use psync_types::PatchNumber;
use regex::Regex;

static UNSAFE_RUN_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[^a-z0-9_-]+").expect("slug regex"));

/// Lowercase `text` and collapse every run of characters outside
/// `[a-z0-9_-]` into a single `-`, trimming dashes at both ends.
pub fn slugify(text: &str) -> String {
    UNSAFE_RUN_RE
        .replace_all(&text.to_lowercase(), "-")
        .trim_matches('-')
        .to_string()
}

/// `{number:05}-{slug}.patch`, or `{number:05}.patch` when the title has
/// nothing usable.
pub fn patch_filename(number: PatchNumber, title: &str) -> String {
    let slug = slugify(title);
    if slug.is_empty() {
        format!("{}.patch", number.padded())
    } else {
        format!("{}-{slug}.patch", number.padded())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn slug_collapses_runs() {
        assert_eq!(slugify("Fix foo: don't crash!"), "fix-foo-don-t-crash");
        assert_eq!(slugify("  --Already_safe-- "), "already_safe");
        assert_eq!(slugify("bpo-12345: Use sys.platlibdir"), "bpo-12345-use-sys-platlibdir");
    }

    #[test]
    fn filename_is_padded() {
        assert_eq!(
            patch_filename(PatchNumber::new(1), "Build with -O3"),
            "00001-build-with--o3.patch"
        );
        assert_eq!(patch_filename(PatchNumber::new(42), "!!!"), "00042.patch");
    }

    #[test]
    fn non_ascii_is_replaced() {
        assert_eq!(slugify("Fix für Ümlaute"), "fix-f-r-mlaute");
    }
}
