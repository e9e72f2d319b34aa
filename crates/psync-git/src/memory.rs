//! In-memory repository for testing and ephemeral use.
//!
//! [`InMemoryRepository`] stores every commit as a full snapshot of file
//! contents and computes diffs on demand with the blob differ. It has no
//! rename detection: a moved file shows up as a deletion plus an addition.

use std::collections::{BTreeMap, BTreeSet, HashMap};

use chrono::{DateTime, FixedOffset, Utc};
use psync_crypto::ContentHasher;
use psync_diff::{diff_file, FileDiff};
use psync_types::CommitId;

use crate::error::{GitError, GitResult};
use crate::traits::CommitSource;
use crate::types::{Author, CommitHeader};

/// File path to file contents, for one commit.
pub type Snapshot = BTreeMap<String, Vec<u8>>;

const COMMIT_HASHER: ContentHasher = ContentHasher::new("psync-memcommit-v1");

// 2023-11-14T22:13:20Z; each commit is a minute after the previous one.
const EPOCH: i64 = 1_700_000_000;

#[derive(Clone, Debug)]
struct StoredCommit {
    header: CommitHeader,
    tree: Snapshot,
}

/// A [`CommitSource`] whose commits live in a `HashMap`.
#[derive(Clone, Debug)]
pub struct InMemoryRepository {
    commits: HashMap<CommitId, StoredCommit>,
    refs: HashMap<String, CommitId>,
    author: Author,
}

impl InMemoryRepository {
    /// Create an empty repository.
    pub fn new() -> Self {
        Self {
            commits: HashMap::new(),
            refs: HashMap::new(),
            author: Author::new("Test Author", "author@example.com"),
        }
    }

    /// Author recorded on commits created from now on.
    pub fn set_author(&mut self, author: Author) {
        self.author = author;
    }

    /// Record a commit with the given parents and full tree.
    pub fn commit(
        &mut self,
        parents: &[CommitId],
        message: impl Into<String>,
        tree: Snapshot,
    ) -> GitResult<CommitId> {
        if let Some(missing) = parents.iter().find(|p| !self.commits.contains_key(p)) {
            return Err(GitError::CommitNotFound(*missing));
        }
        let message = message.into();
        let seq = self.commits.len() as i64;

        let mut hasher = COMMIT_HASHER.streaming();
        hasher.update(&seq.to_le_bytes());
        for parent in parents {
            hasher.update(parent.as_bytes());
        }
        hasher.update(message.as_bytes());
        for (path, data) in &tree {
            hasher
                .update(path.as_bytes())
                .update(&[0])
                .update(&(data.len() as u64).to_le_bytes())
                .update(data);
        }
        let id = CommitId::from_slice(&hasher.finalize().as_bytes()[..20])?;

        let time: DateTime<FixedOffset> = DateTime::<Utc>::from_timestamp(EPOCH + seq * 60, 0)
            .unwrap_or_default()
            .into();
        let header = CommitHeader {
            id,
            parents: parents.to_vec(),
            author: self.author.clone(),
            time,
            message,
        };
        self.commits.insert(id, StoredCommit { header, tree });
        Ok(id)
    }

    /// Record a commit on top of `parent` (or a root commit) by applying
    /// edits to the parent's tree. `None` contents delete the file.
    pub fn commit_edits(
        &mut self,
        parent: Option<CommitId>,
        message: impl Into<String>,
        edits: &[(&str, Option<&str>)],
    ) -> GitResult<CommitId> {
        let mut tree = match parent {
            Some(p) => self.tree(&p)?.clone(),
            None => Snapshot::new(),
        };
        for (path, contents) in edits {
            match contents {
                Some(c) => tree.insert(path.to_string(), c.as_bytes().to_vec()),
                None => tree.remove(*path),
            };
        }
        let parents: Vec<CommitId> = parent.into_iter().collect();
        self.commit(&parents, message, tree)
    }

    /// Point a ref (`main`, `refs/tags/v1`, ...) at a commit.
    pub fn set_ref(&mut self, name: impl Into<String>, id: CommitId) {
        self.refs.insert(name.into(), id);
    }

    /// The full tree of a commit.
    pub fn tree(&self, id: &CommitId) -> GitResult<&Snapshot> {
        self.stored(id).map(|c| &c.tree)
    }

    pub fn len(&self) -> usize {
        self.commits.len()
    }

    pub fn is_empty(&self) -> bool {
        self.commits.is_empty()
    }

    fn stored(&self, id: &CommitId) -> GitResult<&StoredCommit> {
        self.commits.get(id).ok_or(GitError::CommitNotFound(*id))
    }
}

impl Default for InMemoryRepository {
    fn default() -> Self {
        Self::new()
    }
}

impl CommitSource for InMemoryRepository {
    fn resolve(&self, reference: &str) -> GitResult<CommitId> {
        let candidates = [
            reference.to_string(),
            format!("refs/heads/{reference}"),
            format!("refs/tags/{reference}"),
        ];
        if let Some(id) = candidates.iter().find_map(|c| self.refs.get(c)) {
            return Ok(*id);
        }
        match CommitId::from_hex(reference) {
            Ok(id) if self.commits.contains_key(&id) => Ok(id),
            _ => Err(GitError::RefNotFound {
                reference: reference.to_string(),
            }),
        }
    }

    fn header(&self, id: &CommitId) -> GitResult<CommitHeader> {
        self.stored(id).map(|c| c.header.clone())
    }

    fn diff(&self, id: &CommitId) -> GitResult<Vec<FileDiff>> {
        let commit = self.stored(id)?;
        let empty = Snapshot::new();
        let old = match commit.header.first_parent() {
            Some(parent) => &self.stored(parent)?.tree,
            None => &empty,
        };
        let new = &commit.tree;

        let paths: BTreeSet<&String> = old.keys().chain(new.keys()).collect();
        Ok(paths
            .into_iter()
            .filter_map(|path| {
                diff_file(
                    path,
                    path,
                    old.get(path).map(Vec::as_slice),
                    new.get(path).map(Vec::as_slice),
                )
            })
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use psync_diff::FileStatus;

    #[test]
    fn commits_have_distinct_ids() {
        let mut repo = InMemoryRepository::new();
        let a = repo.commit_edits(None, "same", &[]).unwrap();
        let b = repo.commit_edits(None, "same", &[]).unwrap();
        assert_ne!(a, b);
        assert_eq!(repo.len(), 2);
    }

    #[test]
    fn resolve_branches_tags_and_ids() {
        let mut repo = InMemoryRepository::new();
        let c = repo.commit_edits(None, "root", &[("a", Some("x\n"))]).unwrap();
        repo.set_ref("refs/heads/main", c);
        repo.set_ref("refs/tags/v1.0", c);

        assert_eq!(repo.resolve("main").unwrap(), c);
        assert_eq!(repo.resolve("refs/heads/main").unwrap(), c);
        assert_eq!(repo.resolve("v1.0").unwrap(), c);
        assert_eq!(repo.resolve(&c.to_hex()).unwrap(), c);
        assert!(matches!(
            repo.resolve("nope"),
            Err(GitError::RefNotFound { reference }) if reference == "nope"
        ));
    }

    #[test]
    fn unknown_parent_rejected() {
        let mut repo = InMemoryRepository::new();
        let ghost = CommitId::from_raw([7; 20]);
        assert!(matches!(
            repo.commit(&[ghost], "orphan", Snapshot::new()),
            Err(GitError::CommitNotFound(id)) if id == ghost
        ));
    }

    #[test]
    fn diff_against_first_parent() {
        let mut repo = InMemoryRepository::new();
        let base = repo
            .commit_edits(None, "base", &[("keep", Some("1\n")), ("gone", Some("2\n"))])
            .unwrap();
        let next = repo
            .commit_edits(
                Some(base),
                "change",
                &[("keep", Some("1b\n")), ("gone", None), ("new", Some("3\n"))],
            )
            .unwrap();

        let diff = repo.diff(&next).unwrap();
        let statuses: Vec<_> = diff.iter().map(|d| (d.path(), d.status)).collect();
        assert_eq!(
            statuses,
            vec![
                ("gone", FileStatus::Deleted),
                ("keep", FileStatus::Modified),
                ("new", FileStatus::Added),
            ]
        );
    }

    #[test]
    fn root_commit_diffs_against_empty_tree() {
        let mut repo = InMemoryRepository::new();
        let root = repo.commit_edits(None, "root", &[("a", Some("x\n"))]).unwrap();
        let diff = repo.diff(&root).unwrap();
        assert_eq!(diff.len(), 1);
        assert_eq!(diff[0].status, FileStatus::Added);
    }

    #[test]
    fn header_records_parents_and_author() {
        let mut repo = InMemoryRepository::new();
        repo.set_author(Author::new("Jane", "jane@example.org"));
        let a = repo.commit_edits(None, "a", &[]).unwrap();
        let b = repo.commit_edits(None, "b", &[]).unwrap();
        let m = repo.commit(&[a, b], "merge", Snapshot::new()).unwrap();

        let header = repo.header(&m).unwrap();
        assert_eq!(header.parents, vec![a, b]);
        assert_eq!(header.first_parent(), Some(&a));
        assert!(header.is_merge());
        assert_eq!(header.author.name, "Jane");
        assert!(header.time > repo.header(&a).unwrap().time);
    }
}
