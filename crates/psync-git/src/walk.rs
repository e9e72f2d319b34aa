//! The Commit Walker: the first-parent range between a baseline and a
//! branch head.
//!
//! Only the first-parent chain is followed. Commits reachable solely
//! through the second parent of a merge are never part of the range, and
//! the merge commit itself is returned like any other commit so that the
//! extractor can report it.

use psync_types::CommitId;
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::error::{GitError, GitResult};
use crate::traits::CommitSource;
use crate::types::{CommitHeader, CommitRecord};

/// Limits applied while walking.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct WalkOptions {
    /// Give up with [`GitError::RangeTooLarge`] when the range has more
    /// than this many commits. A range of exactly `max_commits` is walked.
    /// `None` walks until the baseline or a root commit.
    pub max_commits: Option<usize>,
}

impl WalkOptions {
    pub fn with_max_commits(max: usize) -> Self {
        Self {
            max_commits: Some(max),
        }
    }
}

/// Commits on the first-parent chain from `baseline` (exclusive) to
/// `branch` (inclusive), oldest first, each with its diff against its
/// first parent.
///
/// Equal baseline and branch give an empty range. A baseline that is not on
/// the branch's first-parent chain fails with [`GitError::NotAncestor`];
/// unresolvable names fail with [`GitError::RefNotFound`]. The repository is
/// only read.
pub fn walk<S>(
    source: &S,
    baseline: &str,
    branch: &str,
    options: &WalkOptions,
) -> GitResult<Vec<CommitRecord>>
where
    S: CommitSource + ?Sized,
{
    let base_id = source.resolve(baseline)?;
    let head_id = source.resolve(branch)?;
    debug!(baseline, base = %base_id.short_hex(), branch, head = %head_id.short_hex(), "resolved range");

    let chain = first_parent_chain(source, base_id, head_id, options).map_err(|e| match e {
        WalkStop::NotAncestor => GitError::NotAncestor {
            baseline: baseline.to_string(),
            branch: branch.to_string(),
        },
        WalkStop::TooLarge(limit) => GitError::RangeTooLarge {
            limit,
            baseline: baseline.to_string(),
            branch: branch.to_string(),
        },
        WalkStop::Git(e) => e,
    })?;

    let mut records = Vec::with_capacity(chain.len());
    for header in chain.into_iter().rev() {
        let diff = source.diff(&header.id)?;
        debug!(commit = %header.id.short_hex(), files = diff.len(), summary = header.summary(), "loaded commit");
        records.push(CommitRecord::new(header, diff));
    }

    info!(baseline, branch, commits = records.len(), "walked commit range");
    Ok(records)
}

enum WalkStop {
    NotAncestor,
    TooLarge(usize),
    Git(GitError),
}

impl From<GitError> for WalkStop {
    fn from(e: GitError) -> Self {
        WalkStop::Git(e)
    }
}

// Newest first. Headers only; diffs are loaded once the range is known.
fn first_parent_chain<S>(
    source: &S,
    base: CommitId,
    head: CommitId,
    options: &WalkOptions,
) -> Result<Vec<CommitHeader>, WalkStop>
where
    S: CommitSource + ?Sized,
{
    let mut chain = Vec::new();
    let mut cursor = head;
    while cursor != base {
        if options.max_commits.is_some_and(|max| chain.len() >= max) {
            return Err(WalkStop::TooLarge(chain.len()));
        }
        let header = source.header(&cursor)?;
        let Some(parent) = header.first_parent().copied() else {
            return Err(WalkStop::NotAncestor);
        };
        chain.push(header);
        cursor = parent;
    }
    Ok(chain)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::memory::{InMemoryRepository, Snapshot};

    /// base -> a -> b on `main`, tagged `v1` at base.
    fn linear() -> (InMemoryRepository, [CommitId; 3]) {
        let mut repo = InMemoryRepository::new();
        let base = repo.commit_edits(None, "release", &[("f", Some("0\n"))]).unwrap();
        let a = repo.commit_edits(Some(base), "00001: a", &[("f", Some("1\n"))]).unwrap();
        let b = repo.commit_edits(Some(a), "00002: b", &[("f", Some("2\n"))]).unwrap();
        repo.set_ref("refs/tags/v1", base);
        repo.set_ref("refs/heads/main", b);
        (repo, [base, a, b])
    }

    fn ids(records: &[CommitRecord]) -> Vec<CommitId> {
        records.iter().map(|r| *r.id()).collect()
    }

    #[test]
    fn walks_oldest_first_excluding_baseline() {
        let (repo, [_, a, b]) = linear();
        let records = walk(&repo, "v1", "main", &WalkOptions::default()).unwrap();
        assert_eq!(ids(&records), vec![a, b]);
        assert_eq!(records[0].diff.len(), 1);
    }

    #[test]
    fn equal_refs_give_empty_range() {
        let (repo, [base, ..]) = linear();
        let records = walk(&repo, "v1", &base.to_hex(), &WalkOptions::default()).unwrap();
        assert!(records.is_empty());
    }

    #[test]
    fn second_parent_history_is_skipped() {
        let (mut repo, [base, a, _]) = linear();
        let side = repo.commit_edits(Some(base), "side work", &[("g", Some("s\n"))]).unwrap();
        let tree: Snapshot = repo.tree(&a).unwrap().clone();
        let merge = repo.commit(&[a, side], "Merge side", tree).unwrap();
        let after = repo.commit_edits(Some(merge), "00003: c", &[("f", Some("3\n"))]).unwrap();
        repo.set_ref("refs/heads/merged", after);

        let records = walk(&repo, "v1", "merged", &WalkOptions::default()).unwrap();
        assert_eq!(ids(&records), vec![a, merge, after]);
        assert!(!ids(&records).contains(&side));
        assert!(records[1].header.is_merge());
    }

    #[test]
    fn baseline_off_the_first_parent_chain() {
        let (mut repo, [base, a, _]) = linear();
        let side = repo.commit_edits(Some(base), "side", &[("g", Some("s\n"))]).unwrap();
        let merge = repo.commit(&[a, side], "Merge", Snapshot::new()).unwrap();
        repo.set_ref("refs/tags/side", side);
        repo.set_ref("refs/heads/m", merge);

        let err = walk(&repo, "side", "m", &WalkOptions::default()).unwrap_err();
        assert!(matches!(
            err,
            GitError::NotAncestor { baseline, branch } if baseline == "side" && branch == "m"
        ));
    }

    #[test]
    fn baseline_newer_than_branch() {
        let (repo, _) = linear();
        let err = walk(&repo, "main", "v1", &WalkOptions::default()).unwrap_err();
        assert!(matches!(err, GitError::NotAncestor { .. }));
    }

    #[test]
    fn unrelated_histories() {
        let (mut repo, _) = linear();
        let other = repo.commit_edits(None, "unrelated root", &[]).unwrap();
        repo.set_ref("refs/tags/other", other);
        let err = walk(&repo, "other", "main", &WalkOptions::default()).unwrap_err();
        assert!(matches!(err, GitError::NotAncestor { .. }));
    }

    #[test]
    fn missing_refs() {
        let (repo, _) = linear();
        let err = walk(&repo, "v9", "main", &WalkOptions::default()).unwrap_err();
        assert!(matches!(err, GitError::RefNotFound { reference } if reference == "v9"));
        let err = walk(&repo, "v1", "fedora-9", &WalkOptions::default()).unwrap_err();
        assert!(matches!(err, GitError::RefNotFound { reference } if reference == "fedora-9"));
    }

    #[test]
    fn range_limit() {
        let (repo, _) = linear();
        assert_eq!(walk(&repo, "v1", "main", &WalkOptions::with_max_commits(2)).unwrap().len(), 2);
        let err = walk(&repo, "v1", "main", &WalkOptions::with_max_commits(1)).unwrap_err();
        assert!(matches!(err, GitError::RangeTooLarge { limit: 1, .. }));
    }

    #[test]
    fn works_through_trait_objects() {
        let (repo, [_, a, b]) = linear();
        let source: &dyn CommitSource = &repo;
        let records = walk(source, "v1", "main", &WalkOptions::default()).unwrap();
        assert_eq!(ids(&records), vec![a, b]);
    }
}
