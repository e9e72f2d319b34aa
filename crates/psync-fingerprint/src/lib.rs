//! Content fingerprints for patches.
//!
//! A patch's fingerprint must stay the same when the patch is rebased onto
//! a new upstream release (commit ids change, context lines shift) and when
//! only comments are touched. The [`Fingerprinter`] gets there by hashing a
//! normalized form of the diff:
//!
//! 1. hunk headers and end-of-file markers are dropped,
//! 2. context lines are dropped, keeping only added/removed lines,
//! 3. comment-only lines are dropped, using a [`CommentStrategy`] chosen by
//!    file extension from a [`CommentRegistry`] (unknown types: no-op),
//! 4. line endings and trailing whitespace are normalized.
//!
//! The normalized stream is hashed with [`psync_crypto::ContentHasher::PATCH`].

pub mod comments;
pub mod fingerprint;
pub mod normalize;

pub use comments::{CFamilyComments, CommentRegistry, CommentStrategy, HashComments};
pub use fingerprint::Fingerprinter;
pub use normalize::normalize;
