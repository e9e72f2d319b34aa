//! Error types for reconciliation.

use psync_types::PatchNumber;
use thiserror::Error;

/// Errors that prevent an edit plan from being produced or applied.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ReconcileError {
    /// Two extracted patches carry the same number.
    #[error("patch number {number} is used by more than one commit")]
    DuplicatePatchNumber { number: PatchNumber },

    /// A plan refers to an entry the descriptor does not have.
    #[error("plan keeps patch {0} but the descriptor has no such entry")]
    UnknownEntry(PatchNumber),
}

/// Convenience type alias for reconciliation operations.
pub type ReconcileResult<T> = std::result::Result<T, ReconcileError>;
