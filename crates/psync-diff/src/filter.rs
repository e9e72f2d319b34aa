//! Path-prefix filtering of change sets.
//!
//! Upstream branches sometimes carry non-source changes (CI config, vendor
//! metadata) next to the actual patches. A [`PathFilter`] keeps only the
//! files under the configured prefixes so that unrelated changes never
//! reach the fingerprint or the patch file.

use serde::{Deserialize, Serialize};

use crate::model::FileDiff;

/// Include/exclude path prefixes, matched per path component.
///
/// An empty include list means "everything". Excludes win over includes.
/// `Lib` matches `Lib` and `Lib/os.py` but not `Library/x`.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PathFilter {
    #[serde(default)]
    pub include: Vec<String>,
    #[serde(default)]
    pub exclude: Vec<String>,
}

impl PathFilter {
    /// A filter that keeps everything.
    pub fn all() -> Self {
        Self::default()
    }

    pub fn with_include(mut self, prefix: impl Into<String>) -> Self {
        self.include.push(prefix.into());
        self
    }

    pub fn with_exclude(mut self, prefix: impl Into<String>) -> Self {
        self.exclude.push(prefix.into());
        self
    }

    /// Returns `true` if this filter keeps every path.
    pub fn is_passthrough(&self) -> bool {
        self.include.is_empty() && self.exclude.is_empty()
    }

    /// Whether a single path is kept.
    pub fn matches(&self, path: &str) -> bool {
        if self.exclude.iter().any(|p| under_prefix(path, p)) {
            return false;
        }
        self.include.is_empty() || self.include.iter().any(|p| under_prefix(path, p))
    }

    /// Whether a file change is kept. Renames are kept if either side
    /// matches.
    pub fn keeps(&self, diff: &FileDiff) -> bool {
        [diff.old_path.as_deref(), diff.new_path.as_deref()]
            .into_iter()
            .flatten()
            .any(|p| self.matches(p))
    }

    /// Drop the file changes this filter does not keep.
    pub fn apply(&self, diffs: Vec<FileDiff>) -> Vec<FileDiff> {
        if self.is_passthrough() {
            return diffs;
        }
        diffs.into_iter().filter(|d| self.keeps(d)).collect()
    }
}

fn under_prefix(path: &str, prefix: &str) -> bool {
    let prefix = prefix.trim_end_matches('/');
    if prefix.is_empty() {
        return true;
    }
    match path.strip_prefix(prefix) {
        Some(rest) => rest.is_empty() || rest.starts_with('/'),
        None => false,
    }
}
