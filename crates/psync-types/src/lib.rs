//! Foundation types for patchsync.
//!
//! Every other patchsync crate depends on `psync-types`.
//!
//! # Key Types
//!
//! - [`CommitId`]: Opaque 20-byte commit identifier from the upstream repository
//! - [`Fingerprint`]: 32-byte content digest of a normalized patch
//! - [`PatchNumber`]: Positive patch number as recorded in the packaging descriptor

pub mod commit;
pub mod error;
pub mod fingerprint;
pub mod number;

pub use commit::CommitId;
pub use error::TypeError;
pub use fingerprint::Fingerprint;
pub use number::PatchNumber;
