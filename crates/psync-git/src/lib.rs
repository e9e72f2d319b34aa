//! Upstream repository access for patchsync.
//!
//! The core never talks to git directly: it reads commits through the
//! [`CommitSource`] trait, which a libgit2-backed [`GitRepository`] and an
//! in-memory [`InMemoryRepository`] both implement. On top of that sits the
//! Commit Walker, [`walk`], which produces the first-parent range between a
//! baseline release and a maintenance branch head.
//!
//! # Modules
//!
//! - [`error`]: Error types for repository access and walking
//! - [`types`]: [`CommitHeader`], [`CommitRecord`], [`Author`]
//! - [`traits`]: The [`CommitSource`] trait
//! - [`repository`]: [`GitRepository`] on top of `git2`
//! - [`memory`]: Snapshot-based [`InMemoryRepository`] for tests
//! - [`walk`]: The Commit Walker

pub mod error;
pub mod memory;
pub mod repository;
pub mod traits;
pub mod types;
pub mod walk;

pub use error::{GitError, GitResult};
pub use memory::{InMemoryRepository, Snapshot};
pub use repository::{default_config_value, GitRepository};
pub use traits::CommitSource;
pub use types::{Author, CommitHeader, CommitRecord};
pub use walk::{walk, WalkOptions};
