use std::path::PathBuf;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum SdkError {
    #[error("git error: {0}")]
    Git(#[from] psync_git::GitError),

    #[error("extraction error: {0}")]
    Extract(#[from] psync_extract::ExtractError),

    #[error("descriptor error: {0}")]
    Spec(#[from] psync_spec::SpecError),

    #[error("reconcile error: {0}")]
    Reconcile(#[from] psync_reconcile::ReconcileError),

    #[error("invalid config {path}: {source}")]
    Config {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },

    #[error("refusing to write outside the packaging directory: {0}")]
    UnsafeFilename(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

pub type SdkResult<T> = Result<T, SdkError>;
