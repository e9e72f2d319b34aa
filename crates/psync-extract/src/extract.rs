//! The Patch Extractor.

use psync_diff::PathFilter;
use psync_fingerprint::Fingerprinter;
use psync_git::CommitRecord;
use psync_types::PatchNumber;
use serde::Serialize;
use tracing::{debug, info, warn};

use crate::entry::PatchEntry;
use crate::error::{ExtractIssue, ExtractResult, MalformedReason};
use crate::filename::patch_filename;
use crate::format::format_patch;
use crate::header::{classify, summary, ParsedHeader};
use crate::message::{comment_body, legacy_body};
use crate::trailer::{bundled_versions_trailer, BundledVersionsRule};

/// How patch numbers are assigned for a whole run.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ExtractionMode {
    /// Numbers come from commit summaries; unnumbered commits are skipped.
    Numbered,
    /// No commit carries a number: commits are numbered 1, 2, 3… in order.
    Positional,
}

/// Extraction settings.
#[derive(Clone, Debug, Default)]
pub struct ExtractOptions {
    /// Files outside this filter are dropped from every patch.
    pub filter: PathFilter,
    pub fingerprinter: Fingerprinter,
    /// Patch that receives the bundled-versions trailer, if any.
    pub bundled_versions: Option<BundledVersionsRule>,
}

/// Result of extracting a commit range.
#[derive(Clone, Debug)]
pub struct Extraction {
    /// Patches in walk order.
    pub patches: Vec<PatchEntry>,
    /// Commits that were excluded, with the reason.
    pub diagnostics: Vec<ExtractIssue>,
    pub mode: ExtractionMode,
}

/// Turn a walked commit range into patch entries.
///
/// The numbering mode is chosen once for the whole range: if any commit
/// carries a number (numbered or legacy summary), every unnumbered commit
/// is excluded with a [`ExtractIssue::Malformed`] diagnostic. Otherwise all
/// commits are numbered by position. Duplicate numbers are not checked
/// here.
pub fn extract(commits: &[CommitRecord], options: &ExtractOptions) -> ExtractResult<Extraction> {
    let classified: Vec<_> = commits.iter().map(|c| classify(c.message())).collect();
    let mode = if classified
        .iter()
        .any(|h| h.as_ref().is_ok_and(ParsedHeader::is_numbered))
    {
        ExtractionMode::Numbered
    } else {
        ExtractionMode::Positional
    };
    debug!(?mode, commits = commits.len(), "selected numbering mode");

    let mut patches = Vec::with_capacity(commits.len());
    let mut diagnostics = Vec::new();

    for (position, (commit, header)) in commits.iter().zip(classified).enumerate() {
        let message = commit.message();
        let naming = match (mode, header) {
            (ExtractionMode::Positional, _) => {
                let number = PatchNumber::new(position as u32 + 1);
                let title = summary(message).to_string();
                Naming {
                    number,
                    filename: patch_filename(number, &title),
                    title,
                    body: comment_body(message),
                }
            }
            (ExtractionMode::Numbered, Ok(ParsedHeader::Numbered { number, title })) => Naming {
                number,
                filename: patch_filename(number, &title),
                title,
                body: comment_body(message),
            },
            (ExtractionMode::Numbered, Ok(ParsedHeader::Legacy { number, filename })) => Naming {
                number,
                filename,
                title: String::new(),
                body: legacy_body(message, number),
            },
            (ExtractionMode::Numbered, Ok(ParsedHeader::Unnumbered { .. })) => {
                diagnostics.push(malformed(commit, MalformedReason::Unnumbered));
                continue;
            }
            (ExtractionMode::Numbered, Err(reason)) => {
                diagnostics.push(malformed(commit, reason));
                continue;
            }
        };
        patches.push(build_entry(commit, naming, options)?);
    }

    for issue in &diagnostics {
        warn!(%issue, "excluded commit");
    }
    info!(
        patches = patches.len(),
        excluded = diagnostics.len(),
        ?mode,
        "extracted patches"
    );
    Ok(Extraction {
        patches,
        diagnostics,
        mode,
    })
}

struct Naming {
    number: PatchNumber,
    title: String,
    body: String,
    filename: String,
}

fn build_entry(
    commit: &CommitRecord,
    naming: Naming,
    options: &ExtractOptions,
) -> ExtractResult<PatchEntry> {
    let diff = options.filter.apply(commit.diff.clone());
    let normalized = options.fingerprinter.normalize(&diff);
    let hash = options.fingerprinter.fingerprint_normalized(&normalized);

    let trailer = match options.bundled_versions {
        Some(rule) if rule.patch == naming.number => bundled_versions_trailer(naming.number, &diff)?,
        _ => String::new(),
    };

    debug!(
        number = %naming.number,
        commit = %commit.id().short_hex(),
        files = diff.len(),
        hash = %hash.short_hex(),
        "extracted patch"
    );
    Ok(PatchEntry {
        number: naming.number,
        title: naming.title,
        body: naming.body,
        filename: naming.filename,
        normalized,
        hash,
        commit: *commit.id(),
        patch_text: format_patch(&commit.header, &diff),
        trailer,
    })
}

fn malformed(commit: &CommitRecord, reason: MalformedReason) -> ExtractIssue {
    ExtractIssue::Malformed {
        commit: *commit.id(),
        summary: summary(commit.message()).to_string(),
        reason,
    }
}
