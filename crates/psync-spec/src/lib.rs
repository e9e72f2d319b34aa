//! The packaging descriptor: the patch section of an RPM spec file.
//!
//! Only the patch section is interpreted. Everything before its start
//! marker and after its end marker is carried through verbatim, and so are
//! existing entries that do not change.
//!
//! ```text
//! # (Patches taken from github.com/fedora-python/cpython)
//!
//! # 00123 # 5f0c…64 hex digits…
//! # Fix foo
//! Patch123: 00123-fix-foo.patch
//!
//! # (New patches go here ^^^)
//! ```

pub mod error;
pub mod markers;
pub mod metadata;
pub mod parse;
pub mod render;

pub use error::{SpecError, SpecIssue, SpecResult, UnreadableReason};
pub use markers::SectionMarkers;
pub use metadata::{release, upstream_version};
pub use parse::{parse, DescriptorEntry, ParsedDescriptor};
pub use render::{render, render_entry, SectionEntry};
