//! The Descriptor Reconciler.

use std::collections::{BTreeMap, BTreeSet, HashMap};

use psync_extract::PatchEntry;
use psync_spec::{DescriptorEntry, ParsedDescriptor, SectionMarkers};
use psync_types::PatchNumber;
use tracing::{debug, info};

use crate::error::{ReconcileError, ReconcileResult};
use crate::plan::{EditPlan, PatchUpdate};

/// Compare existing descriptor entries with freshly extracted patches.
///
/// - a fresh number absent from the descriptor is an addition;
/// - a recorded hash equal to the fresh hash leaves the entry unchanged;
/// - a different or missing recorded hash is an update, keeping the
///   existing filename;
/// - descriptor numbers absent from `fresh` are removals.
///
/// The final order is the order of `fresh`. Duplicate numbers in `fresh`
/// fail with [`ReconcileError::DuplicatePatchNumber`] before anything else.
pub fn reconcile(
    existing: &[DescriptorEntry],
    fresh: &[PatchEntry],
) -> ReconcileResult<EditPlan> {
    let mut seen = BTreeSet::new();
    for patch in fresh {
        if !seen.insert(patch.number) {
            return Err(ReconcileError::DuplicatePatchNumber {
                number: patch.number,
            });
        }
    }

    let by_number: HashMap<PatchNumber, &DescriptorEntry> =
        existing.iter().map(|e| (e.number, e)).collect();

    let mut plan = EditPlan::default();
    for patch in fresh {
        plan.order.push(patch.number);
        match by_number.get(&patch.number) {
            None => {
                debug!(number = %patch.number, "new patch");
                plan.additions.push(patch.clone());
            }
            Some(entry) if entry.recorded_hash == Some(patch.hash) => {
                plan.unchanged.insert(patch.number);
            }
            Some(entry) => {
                debug!(
                    number = %patch.number,
                    old = ?entry.recorded_hash.map(|h| h.short_hex()),
                    new = %patch.hash.short_hex(),
                    "patch changed"
                );
                plan.updates.insert(
                    patch.number,
                    PatchUpdate {
                        old_hash: entry.recorded_hash,
                        entry: patch.clone(),
                        filename: entry.filename.clone(),
                    },
                );
            }
        }
    }

    plan.removals = existing
        .iter()
        .map(|e| e.number)
        .filter(|n| !seen.contains(n))
        .collect();

    let removed_by_hash: BTreeMap<_, _> = existing
        .iter()
        .filter(|e| plan.removals.contains(&e.number))
        .filter_map(|e| e.recorded_hash.map(|h| (h, e.number)))
        .collect();
    for patch in &plan.additions {
        if let Some(&old) = removed_by_hash.get(&patch.hash) {
            plan.renumbered.insert(patch.number, old);
        }
    }

    let summary = plan.summary();
    info!(
        added = summary.added,
        removed = summary.removed,
        updated = summary.updated,
        unchanged = summary.unchanged,
        renumbered = summary.renumbered,
        "reconciled patch section"
    );
    Ok(plan)
}

/// Render the descriptor that results from applying `plan` to `parsed`.
pub fn render(
    parsed: &ParsedDescriptor,
    plan: &EditPlan,
    markers: &SectionMarkers,
) -> ReconcileResult<String> {
    let entries = plan.section_entries(parsed)?;
    Ok(psync_spec::render(parsed, &entries, markers))
}
