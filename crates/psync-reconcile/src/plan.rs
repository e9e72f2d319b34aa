use std::collections::{BTreeMap, BTreeSet};

use psync_extract::PatchEntry;
use psync_spec::{ParsedDescriptor, SectionEntry};
use psync_types::{Fingerprint, PatchNumber};
use serde::Serialize;

use crate::error::{ReconcileError, ReconcileResult};

/// An existing entry whose patch content changed.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PatchUpdate {
    /// Hash recorded in the descriptor; `None` for entries without one.
    pub old_hash: Option<Fingerprint>,
    pub entry: PatchEntry,
    /// Filename already used by the descriptor, kept on update.
    pub filename: String,
}

/// The changes needed to bring the descriptor in line with the branch.
///
/// `order` lists every patch of the result in branch order; it is exactly
/// the union of additions, updates and unchanged entries.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct EditPlan {
    pub additions: Vec<PatchEntry>,
    pub removals: BTreeSet<PatchNumber>,
    pub updates: BTreeMap<PatchNumber, PatchUpdate>,
    pub unchanged: BTreeSet<PatchNumber>,
    pub order: Vec<PatchNumber>,
    /// New number -> removed number, for additions whose content matches a
    /// removed entry exactly.
    pub renumbered: BTreeMap<PatchNumber, PatchNumber>,
}

/// Counts for reporting.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize)]
pub struct PlanSummary {
    pub added: usize,
    pub removed: usize,
    pub updated: usize,
    pub unchanged: usize,
    pub renumbered: usize,
}

impl EditPlan {
    /// No entry is added, removed or updated. Kept entries may still move
    /// if the descriptor lists them in a different order than the branch.
    pub fn is_noop(&self) -> bool {
        self.additions.is_empty() && self.removals.is_empty() && self.updates.is_empty()
    }

    pub fn summary(&self) -> PlanSummary {
        PlanSummary {
            added: self.additions.len(),
            removed: self.removals.len(),
            updated: self.updates.len(),
            unchanged: self.unchanged.len(),
            renumbered: self.renumbered.len(),
        }
    }

    pub fn addition(&self, number: PatchNumber) -> Option<&PatchEntry> {
        self.additions.iter().find(|p| p.number == number)
    }

    /// Patches whose files must be (re)written, with the filename to use.
    pub fn patches_to_write(&self) -> Vec<(&PatchEntry, &str)> {
        let mut out: Vec<(&PatchEntry, &str)> =
            self.additions.iter().map(|p| (p, p.filename.as_str())).collect();
        out.extend(self.updates.values().map(|u| (&u.entry, u.filename.as_str())));
        out.sort_by_key(|(p, _)| p.number);
        out
    }

    /// Section entries in final order, for [`psync_spec::render`].
    pub fn section_entries<'a>(
        &'a self,
        existing: &'a ParsedDescriptor,
    ) -> ReconcileResult<Vec<SectionEntry<'a>>> {
        self.order
            .iter()
            .map(|&number| {
                if let Some(update) = self.updates.get(&number) {
                    return Ok(SectionEntry::Fresh {
                        patch: &update.entry,
                        filename: &update.filename,
                    });
                }
                if let Some(patch) = self.addition(number) {
                    return Ok(SectionEntry::Fresh {
                        patch,
                        filename: &patch.filename,
                    });
                }
                existing
                    .entry(number)
                    .map(SectionEntry::Existing)
                    .ok_or(ReconcileError::UnknownEntry(number))
            })
            .collect()
    }
}
