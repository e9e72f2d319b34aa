//! Diff model for patchsync.
//!
//! A commit's change set is a list of [`FileDiff`]s, each holding the
//! hunks git (or the in-memory backend) produced for one file. This crate
//! owns that model, the `similar`-based line diff used when no git is
//! involved, the unified-diff renderer used for patch files, and the path
//! filter that drops changes outside the patch-relevant part of the tree.
//!
//! # Key Types
//!
//! - [`FileDiff`] / [`FileStatus`] / [`BinaryChange`] -- one file's change
//! - [`DiffHunk`] / [`DiffLine`] -- line-level hunks
//! - [`PathFilter`] -- include/exclude path prefixes

pub mod blob_diff;
pub mod filter;
pub mod model;
pub mod unified;

pub use blob_diff::{diff_blobs, diff_file, DEFAULT_CONTEXT};
pub use filter::PathFilter;
pub use model::{BinaryChange, DiffHunk, DiffLine, FileDiff, FileStatus};
pub use unified::{render_file, render_unified};
