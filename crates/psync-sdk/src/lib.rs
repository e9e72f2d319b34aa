//! High-level API for patchsync.
//!
//! [`Synchronizer`] runs the whole pipeline in memory: walk the upstream
//! branch, extract and fingerprint its patches, parse the descriptor and
//! reconcile the two. The resulting [`SyncReport`] can be inspected (dry
//! run) or handed to an [`Emitter`] to update the packaging directory.
//!
//! ```ignore
//! let repo = GitRepository::open("../cpython")?;
//! let config = SyncConfig::discover(".")?;
//! let text = std::fs::read_to_string("python3.12.spec")?;
//! let report = Synchronizer::new(config).plan(&repo, &text, &SyncRequest::default())?;
//! Emitter::new("python3.12.spec").apply(&report)?;
//! ```

pub mod config;
pub mod emitter;
pub mod error;
pub mod sync;

pub use config::{SyncConfig, CONFIG_FILE};
pub use emitter::{Emitted, Emitter};
pub use error::{SdkError, SdkResult};
pub use sync::{Diagnostic, PatchFile, SyncOutcome, SyncReport, SyncRequest, Synchronizer};
