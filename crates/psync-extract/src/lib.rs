//! Patch extraction for patchsync.
//!
//! Turns the walked commit range into an ordered list of [`PatchEntry`]
//! records: one per patch-bearing commit, each carrying its number, the
//! comment text for the descriptor, a fingerprint of its filtered diff and
//! the text of its patch file.
//!
//! Commit summaries are classified into a [`ParsedHeader`]. Numbering mode
//! is decided once per run ([`ExtractionMode`]): if any commit carries a
//! patch number, unnumbered commits are reported as malformed and skipped;
//! otherwise every commit is numbered by position.

pub mod entry;
pub mod error;
pub mod extract;
pub mod filename;
pub mod format;
pub mod header;
pub mod message;
pub mod trailer;

pub use entry::PatchEntry;
pub use error::{ExtractError, ExtractIssue, ExtractResult, MalformedReason};
pub use extract::{extract, ExtractOptions, Extraction, ExtractionMode};
pub use filename::{patch_filename, slugify};
pub use format::format_patch;
pub use header::{classify, ParsedHeader};
pub use trailer::{bundled_versions_trailer, BundledVersionsRule};
