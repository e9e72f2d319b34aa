use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

#[derive(Parser)]
#[command(
    name = "psync",
    about = "Keep a spec file's patch list in sync with an upstream patch branch",
    version,
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,

    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[arg(long, global = true, default_value = "text")]
    pub format: OutputFormat,
}

#[derive(Clone, Copy, Debug, clap::ValueEnum)]
pub enum OutputFormat {
    Text,
    Json,
}

#[derive(Subcommand)]
pub enum Command {
    /// Update the spec file and patch files from the patch branch
    Sync(SyncArgs),
    /// Show what `sync` would change without writing anything
    Status(StatusArgs),
    /// Print the fingerprint of one commit's patch
    Fingerprint(FingerprintArgs),
}

/// Which descriptor to update, and from where.
#[derive(Args, Clone, Debug, Default)]
pub struct TargetArgs {
    /// Spec file; defaults to the only `*.spec` in the current directory
    pub spec: Option<PathBuf>,
    /// Upstream clone; defaults to git config `psync.upstream`
    #[arg(short, long)]
    pub repo: Option<PathBuf>,
    /// Baseline ref; defaults to `v{upstream_version}`
    #[arg(short, long)]
    pub base: Option<String>,
    /// Patch branch; defaults to `fedora-{upstream_version}-{release}`
    #[arg(short = 'f', long = "head")]
    pub head: Option<String>,
    /// Config file; defaults to `.psync.toml` next to the spec file
    #[arg(long)]
    pub config: Option<PathBuf>,
}

#[derive(Args)]
pub struct SyncArgs {
    #[command(flatten)]
    pub target: TargetArgs,
    #[arg(long)]
    pub dry_run: bool,
}

#[derive(Args)]
pub struct StatusArgs {
    #[command(flatten)]
    pub target: TargetArgs,
}

#[derive(Args)]
pub struct FingerprintArgs {
    /// Commit or ref to fingerprint
    pub commit: String,
    #[arg(short, long)]
    pub repo: Option<PathBuf>,
    #[arg(long)]
    pub config: Option<PathBuf>,
}
