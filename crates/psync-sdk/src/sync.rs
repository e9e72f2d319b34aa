//! The in-memory synchronization pipeline.
//!
//! [`Synchronizer::plan`] never touches the filesystem: it reads commits
//! through a [`CommitSource`] and the descriptor as a string, and returns a
//! [`SyncReport`] describing everything that would be written. Writing is
//! the [`Emitter`](crate::Emitter)'s job.

use std::collections::BTreeSet;
use std::ffi::OsStr;
use std::fmt;
use std::path::Path;

use psync_extract::{extract, ExtractIssue, ExtractionMode};
use psync_git::{walk, CommitSource};
use psync_reconcile::{reconcile, EditPlan, PlanSummary};
use psync_spec::SpecIssue;
use psync_types::PatchNumber;
use serde::Serialize;
use tracing::{debug, info, warn};

use crate::config::SyncConfig;
use crate::error::{SdkError, SdkResult};

/// Refs to synchronize from. Missing refs are derived from the descriptor
/// through the config templates.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct SyncRequest {
    pub base: Option<String>,
    pub head: Option<String>,
}

impl SyncRequest {
    pub fn new(base: impl Into<String>, head: impl Into<String>) -> Self {
        Self {
            base: Some(base.into()),
            head: Some(head.into()),
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SyncOutcome {
    /// Descriptor and patch files already match the branch.
    UpToDate,
    Changed,
}

/// A patch file to (re)write in the packaging directory.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct PatchFile {
    pub number: PatchNumber,
    pub filename: String,
    #[serde(skip)]
    pub contents: String,
}

/// Something worth telling the user that did not stop the run.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
#[serde(tag = "source", content = "issue", rename_all = "snake_case")]
pub enum Diagnostic {
    Commit(ExtractIssue),
    Descriptor(SpecIssue),
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Commit(issue) => write!(f, "commit {issue}"),
            Self::Descriptor(issue) => write!(f, "descriptor {issue}"),
        }
    }
}

/// Everything a synchronization run would change.
#[derive(Clone, Debug, Serialize)]
pub struct SyncReport {
    pub outcome: SyncOutcome,
    pub base: String,
    pub head: String,
    pub mode: ExtractionMode,
    pub summary: PlanSummary,
    #[serde(skip)]
    pub plan: EditPlan,
    /// The full rendered descriptor.
    #[serde(skip)]
    pub descriptor: String,
    pub patch_files: Vec<PatchFile>,
    /// Files of removed entries, to delete.
    pub stale_files: Vec<String>,
    pub diagnostics: Vec<Diagnostic>,
}

impl SyncReport {
    pub fn is_up_to_date(&self) -> bool {
        self.outcome == SyncOutcome::UpToDate
    }
}

/// Runs the walk, extract, reconcile and render stages with one config.
#[derive(Clone, Debug, Default)]
pub struct Synchronizer {
    config: SyncConfig,
}

impl Synchronizer {
    pub fn new(config: SyncConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &SyncConfig {
        &self.config
    }

    /// Compute the new descriptor and patch files for `descriptor`.
    ///
    /// Any fatal error (unreadable descriptor, bad refs, duplicate patch
    /// numbers) is returned before a report exists, so nothing can be
    /// written from a failed run.
    pub fn plan(
        &self,
        repo: &dyn CommitSource,
        descriptor: &str,
        request: &SyncRequest,
    ) -> SdkResult<SyncReport> {
        let parsed = psync_spec::parse(descriptor, &self.config.section)?;
        let base = match &request.base {
            Some(base) => base.clone(),
            None => self.config.base_ref(descriptor)?,
        };
        let head = match &request.head {
            Some(head) => head.clone(),
            None => self.config.head_ref(descriptor, request.base.as_deref())?,
        };
        info!(%base, %head, "synchronizing patches");

        let commits = walk(repo, &base, &head, &self.config.walk_options())?;
        let extraction = extract(&commits, &self.config.extract_options())?;
        let plan = reconcile(&parsed.entries, &extraction.patches)?;
        let rendered = psync_reconcile::render(&parsed, &plan, &self.config.section)?;

        let mut patch_files = Vec::new();
        for (patch, filename) in plan.patches_to_write() {
            if !is_plain_filename(filename) {
                return Err(SdkError::UnsafeFilename(filename.to_string()));
            }
            patch_files.push(PatchFile {
                number: patch.number,
                filename: filename.to_string(),
                contents: patch.patch_text.clone(),
            });
        }

        let written: BTreeSet<&str> = patch_files.iter().map(|f| f.filename.as_str()).collect();
        let mut stale = BTreeSet::new();
        for entry in parsed.entries.iter().filter(|e| plan.removals.contains(&e.number)) {
            if written.contains(entry.filename.as_str()) {
                continue;
            }
            if !is_plain_filename(&entry.filename) {
                warn!(filename = %entry.filename, "not deleting file outside the packaging directory");
                continue;
            }
            stale.insert(entry.filename.clone());
        }

        let diagnostics: Vec<Diagnostic> = extraction
            .diagnostics
            .into_iter()
            .map(Diagnostic::Commit)
            .chain(parsed.issues.iter().cloned().map(Diagnostic::Descriptor))
            .collect();
        for diagnostic in &diagnostics {
            warn!("{diagnostic}");
        }

        let outcome = if rendered == descriptor && patch_files.is_empty() {
            SyncOutcome::UpToDate
        } else {
            SyncOutcome::Changed
        };
        debug!(?outcome, files = patch_files.len(), stale = stale.len(), "planned");

        Ok(SyncReport {
            outcome,
            base,
            head,
            mode: extraction.mode,
            summary: plan.summary(),
            plan,
            descriptor: rendered,
            patch_files,
            stale_files: stale.into_iter().collect(),
            diagnostics,
        })
    }
}

/// A bare file name: no directories, not `.` or `..`.
pub(crate) fn is_plain_filename(name: &str) -> bool {
    !name.is_empty() && Path::new(name).file_name() == Some(OsStr::new(name))
}
