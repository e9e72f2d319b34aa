use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{bail, Context};
use colored::Colorize;
use psync_fingerprint::Fingerprinter;
use psync_git::{default_config_value, CommitSource, GitRepository};
use psync_sdk::{Emitted, Emitter, SyncConfig, SyncReport, SyncRequest, Synchronizer};
use psync_types::PatchNumber;
use tracing::debug;

use crate::cli::*;

/// Git config key holding the path of the upstream clone.
const UPSTREAM_KEY: &str = "psync.upstream";

pub fn run_command(cli: Cli) -> anyhow::Result<()> {
    match cli.command {
        Command::Sync(args) => cmd_sync(args.target, args.dry_run, cli.format),
        Command::Status(args) => cmd_sync(args.target, true, cli.format),
        Command::Fingerprint(args) => cmd_fingerprint(args, cli.format),
    }
}

fn cmd_sync(target: TargetArgs, dry_run: bool, format: OutputFormat) -> anyhow::Result<()> {
    let spec = match target.spec {
        Some(spec) => spec,
        None => find_spec(Path::new("."))?,
    };
    let emitter = Emitter::new(&spec);
    let config = load_config(target.config.as_deref(), emitter.dir())?;
    let repo = open_upstream(target.repo.as_deref(), emitter.dir())?;
    let text = fs::read_to_string(&spec)
        .with_context(|| format!("cannot read {}", spec.display()))?;

    let request = SyncRequest {
        base: target.base,
        head: target.head,
    };
    let report = Synchronizer::new(config).plan(&repo, &text, &request)?;
    let emitted = if dry_run {
        None
    } else {
        Some(emitter.apply(&report)?)
    };

    match format {
        OutputFormat::Json => {
            let value = serde_json::json!({
                "spec": spec,
                "dry_run": dry_run,
                "report": report,
                "applied": emitted,
            });
            println!("{}", serde_json::to_string_pretty(&value)?);
        }
        OutputFormat::Text => print_report(&spec, &report, emitted.as_ref()),
    }
    Ok(())
}

fn print_report(spec: &Path, report: &SyncReport, emitted: Option<&Emitted>) {
    for diagnostic in &report.diagnostics {
        println!("{} {diagnostic}", "warning:".yellow().bold());
    }
    let spec_name = spec.display().to_string();
    if report.is_up_to_date() {
        println!(
            "{} {} is up to date with {}",
            "✓".green().bold(),
            spec_name.bold(),
            report.head.yellow()
        );
        return;
    }

    println!("Patches {}..{}:", report.base.cyan(), report.head.yellow());
    let plan = &report.plan;
    for &number in &plan.order {
        if let Some(patch) = plan.addition(number) {
            let moved = plan
                .renumbered
                .get(&number)
                .map(|old| format!(" (was {})", old.padded()))
                .unwrap_or_default();
            println!(
                "  {} {} {}{}",
                "+".green().bold(),
                number.padded(),
                patch.filename,
                moved.dimmed()
            );
        } else if let Some(update) = plan.updates.get(&number) {
            println!("  {} {} {}", "~".yellow().bold(), number.padded(), update.filename);
        }
    }
    for number in &plan.removals {
        println!("  {} {}", "-".red().bold(), removed_label(*number, report));
    }

    let summary = report.summary;
    println!(
        "{} added, {} updated, {} removed, {} unchanged",
        summary.added.to_string().green(),
        summary.updated.to_string().yellow(),
        summary.removed.to_string().red(),
        summary.unchanged
    );
    match emitted {
        None => println!("{}", "Dry run: nothing written.".dimmed()),
        Some(emitted) => println!(
            "{} Wrote {} patch files, removed {}, updated {}",
            "✓".green().bold(),
            emitted.written.len(),
            emitted.removed.len(),
            spec_name.bold()
        ),
    }
}

fn removed_label(number: PatchNumber, report: &SyncReport) -> String {
    let prefix = format!("{}-", number.padded());
    match report.stale_files.iter().find(|f| f.starts_with(&prefix)) {
        Some(file) => format!("{} {file}", number.padded()),
        None => format!("Patch{number}"),
    }
}

fn cmd_fingerprint(args: FingerprintArgs, format: OutputFormat) -> anyhow::Result<()> {
    let cwd = Path::new(".");
    let config = load_config(args.config.as_deref(), cwd)?;
    let repo = open_upstream(args.repo.as_deref(), cwd)?;

    let id = repo.resolve(&args.commit)?;
    let diff = config.path_filter().apply(repo.diff(&id)?);
    let fingerprint = Fingerprinter::new().fingerprint(&diff);

    match format {
        OutputFormat::Json => {
            let value = serde_json::json!({
                "commit": id.to_hex(),
                "fingerprint": fingerprint.to_string(),
            });
            println!("{}", serde_json::to_string_pretty(&value)?);
        }
        OutputFormat::Text => println!("{fingerprint}"),
    }
    Ok(())
}

fn load_config(path: Option<&Path>, dir: &Path) -> anyhow::Result<SyncConfig> {
    Ok(match path {
        Some(path) => SyncConfig::load(path)?,
        None => SyncConfig::discover(dir)?,
    })
}

/// The upstream clone: `--repo`, else git config `psync.upstream` as seen
/// from the packaging directory. A relative configured path is taken
/// relative to that directory.
fn open_upstream(repo: Option<&Path>, dir: &Path) -> anyhow::Result<GitRepository> {
    let path = match repo {
        Some(path) => path.to_path_buf(),
        None => match configured_upstream(dir) {
            Some(path) => path,
            None => bail!(
                "no upstream repository: pass --repo or set `git config {UPSTREAM_KEY} <path>`"
            ),
        },
    };
    GitRepository::open(&path)
        .with_context(|| format!("cannot open upstream repository {}", path.display()))
}

fn configured_upstream(dir: &Path) -> Option<PathBuf> {
    let value = match GitRepository::discover(dir) {
        Ok(packaging) => packaging.config_value(UPSTREAM_KEY),
        Err(e) => {
            debug!(error = %e, "packaging directory is not a git checkout");
            default_config_value(UPSTREAM_KEY)
        }
    };
    let path = PathBuf::from(value.ok().flatten()?);
    Some(if path.is_relative() { dir.join(path) } else { path })
}

/// The single `*.spec` file in `dir`.
fn find_spec(dir: &Path) -> anyhow::Result<PathBuf> {
    let mut specs = Vec::new();
    for entry in fs::read_dir(dir).with_context(|| format!("cannot list {}", dir.display()))? {
        let path = entry?.path();
        if path.is_file() && path.extension().is_some_and(|ext| ext == "spec") {
            specs.push(path);
        }
    }
    match specs.len() {
        0 => bail!("no .spec file in {}", dir.display()),
        1 => Ok(specs.remove(0)),
        n => bail!("{n} .spec files in {}; name one explicitly", dir.display()),
    }
}
