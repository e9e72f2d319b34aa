//! The [`CommitSource`] trait defining read access to the upstream
//! repository.

use psync_diff::FileDiff;
use psync_types::CommitId;

use crate::error::GitResult;
use crate::types::{CommitHeader, CommitRecord};

/// Read-only access to a repository's commits.
///
/// Implementations never mutate the repository. Reference resolution must
/// accept branch names, tag names, full ref names and full commit ids.
pub trait CommitSource {
    /// Resolve a reference to the commit it points at, peeling tags.
    ///
    /// Fails with [`GitError::RefNotFound`](crate::GitError::RefNotFound)
    /// if the name does not resolve.
    fn resolve(&self, reference: &str) -> GitResult<CommitId>;

    /// Read a commit's metadata.
    fn header(&self, id: &CommitId) -> GitResult<CommitHeader>;

    /// Diff of a commit against its first parent (the empty tree for root
    /// commits).
    fn diff(&self, id: &CommitId) -> GitResult<Vec<FileDiff>>;

    /// Header and diff together.
    fn record(&self, id: &CommitId) -> GitResult<CommitRecord> {
        Ok(CommitRecord::new(self.header(id)?, self.diff(id)?))
    }
}
