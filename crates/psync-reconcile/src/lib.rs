//! Descriptor reconciliation for patchsync.
//!
//! Compares the patches extracted from the upstream branch with the
//! entries already recorded in the descriptor and produces an
//! [`EditPlan`]: which entries to add, remove or update, which stay
//! untouched, and the final order (always the branch order).

pub mod error;
pub mod plan;
pub mod reconcile;

pub use error::{ReconcileError, ReconcileResult};
pub use plan::{EditPlan, PatchUpdate, PlanSummary};
pub use reconcile::{reconcile, render};
