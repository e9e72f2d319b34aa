//! [`CommitSource`] on top of a real git repository, through libgit2.

use std::path::Path;

use chrono::{DateTime, FixedOffset, Offset, Utc};
use git2::{Config, Delta, DiffDelta, DiffFile, DiffFindOptions, DiffOptions, ErrorCode, Oid, Patch, Repository};
use psync_diff::{BinaryChange, DiffHunk, DiffLine, FileDiff, FileStatus, DEFAULT_CONTEXT};
use psync_types::CommitId;
use tracing::debug;

use crate::error::{GitError, GitResult};
use crate::traits::CommitSource;
use crate::types::{Author, CommitHeader};

/// A read-only view of an on-disk git repository.
pub struct GitRepository {
    repo: Repository,
    context_lines: u32,
}

impl GitRepository {
    /// Open the repository at `path` (a worktree or a bare repository).
    pub fn open(path: impl AsRef<Path>) -> GitResult<Self> {
        Ok(Self::from_repository(Repository::open(path)?))
    }

    /// Open the repository containing `path`, searching parent directories.
    pub fn discover(path: impl AsRef<Path>) -> GitResult<Self> {
        Ok(Self::from_repository(Repository::discover(path)?))
    }

    pub fn from_repository(repo: Repository) -> Self {
        Self {
            repo,
            context_lines: DEFAULT_CONTEXT as u32,
        }
    }

    /// Number of context lines in generated hunks.
    pub fn with_context_lines(mut self, lines: u32) -> Self {
        self.context_lines = lines;
        self
    }

    pub fn inner(&self) -> &Repository {
        &self.repo
    }

    /// Read a string value from the repository's git configuration, which
    /// includes the user and system levels.
    pub fn config_value(&self, key: &str) -> GitResult<Option<String>> {
        string_value(&self.repo.config()?, key)
    }

    fn find_commit(&self, id: &CommitId) -> GitResult<git2::Commit<'_>> {
        let oid = Oid::from_bytes(id.as_bytes())?;
        self.repo.find_commit(oid).map_err(|e| match e.code() {
            ErrorCode::NotFound => GitError::CommitNotFound(*id),
            _ => e.into(),
        })
    }
}

impl std::fmt::Debug for GitRepository {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GitRepository")
            .field("path", &self.repo.path())
            .field("context_lines", &self.context_lines)
            .finish()
    }
}

impl CommitSource for GitRepository {
    fn resolve(&self, reference: &str) -> GitResult<CommitId> {
        let commit = self
            .repo
            .revparse_single(reference)
            .and_then(|object| object.peel_to_commit());
        match commit {
            Ok(commit) => Ok(commit_id(commit.id())?),
            Err(e) => {
                debug!(reference, error = %e, "reference did not resolve");
                Err(GitError::RefNotFound {
                    reference: reference.to_string(),
                })
            }
        }
    }

    fn header(&self, id: &CommitId) -> GitResult<CommitHeader> {
        let commit = self.find_commit(id)?;
        let parents = commit
            .parent_ids()
            .map(commit_id)
            .collect::<GitResult<Vec<_>>>()?;
        let signature = commit.author();
        Ok(CommitHeader {
            id: *id,
            parents,
            author: Author::new(
                String::from_utf8_lossy(signature.name_bytes()),
                String::from_utf8_lossy(signature.email_bytes()),
            ),
            time: to_datetime(signature.when()),
            message: String::from_utf8_lossy(commit.message_bytes()).into_owned(),
        })
    }

    fn diff(&self, id: &CommitId) -> GitResult<Vec<FileDiff>> {
        let commit = self.find_commit(id)?;
        let new_tree = commit.tree()?;
        let old_tree = match commit.parent_count() {
            0 => None,
            _ => Some(commit.parent(0)?.tree()?),
        };

        // Same hunks as `git format-patch --minimal --patience`.
        let mut options = DiffOptions::new();
        options
            .context_lines(self.context_lines)
            .patience(true)
            .minimal(true);
        let mut diff =
            self.repo
                .diff_tree_to_tree(old_tree.as_ref(), Some(&new_tree), Some(&mut options))?;
        diff.find_similar(Some(DiffFindOptions::new().renames(true)))?;

        let mut files = Vec::with_capacity(diff.deltas().len());
        for idx in 0..diff.deltas().len() {
            // Patch generation loads the blobs and settles the binary flag,
            // so the delta is read afterwards.
            let patch = Patch::from_diff(&diff, idx)?;
            let Some(delta) = diff.get_delta(idx) else {
                continue;
            };
            if let Some(file) = convert_delta(&delta, patch.as_ref())? {
                files.push(file);
            }
        }
        Ok(files)
    }
}

/// Read a string value from the global, XDG and system git configuration,
/// for use outside any repository.
pub fn default_config_value(key: &str) -> GitResult<Option<String>> {
    string_value(&Config::open_default()?, key)
}

fn string_value(config: &Config, key: &str) -> GitResult<Option<String>> {
    match config.get_string(key) {
        Ok(value) => Ok(Some(value)),
        Err(e) if e.code() == ErrorCode::NotFound => Ok(None),
        Err(e) => Err(e.into()),
    }
}

fn commit_id(oid: Oid) -> GitResult<CommitId> {
    Ok(CommitId::from_slice(oid.as_bytes())?)
}

fn to_datetime(time: git2::Time) -> DateTime<FixedOffset> {
    let offset = FixedOffset::east_opt(time.offset_minutes() * 60).unwrap_or_else(|| Utc.fix());
    DateTime::<Utc>::from_timestamp(time.seconds(), 0)
        .unwrap_or_default()
        .with_timezone(&offset)
}

fn convert_delta(delta: &DiffDelta<'_>, patch: Option<&Patch<'_>>) -> GitResult<Option<FileDiff>> {
    let status = match delta.status() {
        Delta::Added | Delta::Copied | Delta::Untracked => FileStatus::Added,
        Delta::Deleted => FileStatus::Deleted,
        Delta::Renamed => FileStatus::Renamed,
        Delta::Modified | Delta::Typechange => FileStatus::Modified,
        _ => return Ok(None),
    };
    let old_path = match status {
        FileStatus::Added => None,
        _ => file_path(&delta.old_file()),
    };
    let new_path = match status {
        FileStatus::Deleted => None,
        _ => file_path(&delta.new_file()),
    };

    let patch = match patch {
        Some(p) if !delta.flags().is_binary() => p,
        _ => {
            return Ok(Some(FileDiff {
                binary: Some(BinaryChange {
                    old_id: old_path.as_ref().and_then(|_| blob_id(&delta.old_file())),
                    new_id: new_path.as_ref().and_then(|_| blob_id(&delta.new_file())),
                }),
                old_path,
                new_path,
                status,
                hunks: Vec::new(),
            }))
        }
    };

    let mut hunks = Vec::with_capacity(patch.num_hunks());
    for h in 0..patch.num_hunks() {
        let (hunk, line_count) = patch.hunk(h)?;
        let mut lines = Vec::with_capacity(line_count);
        for l in 0..line_count {
            let line = patch.line_in_hunk(h, l)?;
            let text = String::from_utf8_lossy(line.content())
                .trim_end_matches('\n')
                .to_string();
            lines.push(match line.origin() {
                '+' => DiffLine::Added(text),
                '-' => DiffLine::Removed(text),
                '=' | '>' | '<' => DiffLine::NoNewlineAtEof,
                _ => DiffLine::Context(text),
            });
        }
        hunks.push(DiffHunk {
            old_start: hunk.old_start() as usize,
            old_count: hunk.old_lines() as usize,
            new_start: hunk.new_start() as usize,
            new_count: hunk.new_lines() as usize,
            section: section_heading(hunk.header()),
            lines,
        });
    }

    Ok(Some(FileDiff {
        old_path,
        new_path,
        status,
        binary: None,
        hunks,
    }))
}

fn file_path(file: &DiffFile<'_>) -> Option<String> {
    file.path().map(|p| p.to_string_lossy().into_owned())
}

fn blob_id(file: &DiffFile<'_>) -> Option<String> {
    let id = file.id();
    (!id.is_zero()).then(|| id.to_string())
}

// "@@ -1,3 +1,4 @@ int main(void)\n" -> "int main(void)"
fn section_heading(header: &[u8]) -> String {
    let header = String::from_utf8_lossy(header);
    header
        .splitn(3, "@@")
        .nth(2)
        .unwrap_or_default()
        .trim()
        .to_string()
}
