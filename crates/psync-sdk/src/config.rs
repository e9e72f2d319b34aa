//! Synchronizer configuration, read from `.psync.toml`.
//!
//! ```toml
//! max_patches = 100
//! exclude_paths = [".github", "Misc/NEWS.d"]
//! branch_template = "fedora-{upstream_version}-{release}"
//!
//! [section]
//! end = "# (New patches go here ^^^)"
//!
//! [bundled_versions]
//! patch = 189
//! ```

use std::fs;
use std::path::{Path, PathBuf};

use psync_diff::PathFilter;
use psync_extract::{BundledVersionsRule, ExtractOptions};
use psync_fingerprint::Fingerprinter;
use psync_git::WalkOptions;
use psync_spec::SectionMarkers;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::{SdkError, SdkResult};

/// Name of the config file looked up in the packaging directory.
pub const CONFIG_FILE: &str = ".psync.toml";

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SyncConfig {
    /// Walking more commits than this means the refs are probably wrong.
    pub max_patches: Option<usize>,
    pub include_paths: Vec<String>,
    pub exclude_paths: Vec<String>,
    pub section: SectionMarkers,
    pub bundled_versions: Option<BundledVersionsRule>,
    /// Default head ref. `{upstream_version}` and `{release}` are replaced
    /// with values read from the descriptor; an explicit base overrides
    /// the version.
    pub branch_template: String,
    /// Default baseline ref, with `{upstream_version}` replaced.
    pub base_template: String,
}

impl Default for SyncConfig {
    fn default() -> Self {
        Self {
            max_patches: Some(100),
            include_paths: Vec::new(),
            exclude_paths: Vec::new(),
            section: SectionMarkers::default(),
            bundled_versions: Some(BundledVersionsRule::default()),
            branch_template: "fedora-{upstream_version}-{release}".into(),
            base_template: "v{upstream_version}".into(),
        }
    }
}

impl SyncConfig {
    pub fn load(path: impl AsRef<Path>) -> SdkResult<Self> {
        let path = path.as_ref();
        let text = fs::read_to_string(path)?;
        toml::from_str(&text).map_err(|source| SdkError::Config {
            path: path.to_path_buf(),
            source,
        })
    }

    /// Load `dir/.psync.toml` if it exists, defaults otherwise.
    pub fn discover(dir: impl AsRef<Path>) -> SdkResult<Self> {
        let path: PathBuf = dir.as_ref().join(CONFIG_FILE);
        if path.is_file() {
            debug!(path = %path.display(), "loading config");
            Self::load(path)
        } else {
            Ok(Self::default())
        }
    }

    pub fn path_filter(&self) -> PathFilter {
        PathFilter {
            include: self.include_paths.clone(),
            exclude: self.exclude_paths.clone(),
        }
    }

    pub fn walk_options(&self) -> WalkOptions {
        WalkOptions {
            max_commits: self.max_patches,
        }
    }

    pub fn extract_options(&self) -> ExtractOptions {
        ExtractOptions {
            filter: self.path_filter(),
            fingerprinter: Fingerprinter::new(),
            bundled_versions: self.bundled_versions,
        }
    }

    /// Baseline ref derived from the descriptor's metadata.
    pub fn base_ref(&self, descriptor: &str) -> SdkResult<String> {
        let mut name = self.base_template.clone();
        if name.contains("{upstream_version}") {
            let version = psync_spec::upstream_version(descriptor)?;
            name = name.replace("{upstream_version}", &version);
        }
        Ok(name)
    }

    /// Head ref derived from the descriptor's metadata.
    ///
    /// With an explicit `base` that fits `base_template`, the upstream
    /// version is taken from it instead: `v3.12.1` gives `3.12.1`.
    pub fn head_ref(&self, descriptor: &str, base: Option<&str>) -> SdkResult<String> {
        let mut name = self.branch_template.clone();
        if name.contains("{upstream_version}") {
            let version = match base.and_then(|b| self.version_from_base(b)) {
                Some(version) => version.to_string(),
                None => psync_spec::upstream_version(descriptor)?,
            };
            name = name.replace("{upstream_version}", &version);
        }
        if name.contains("{release}") {
            let release = psync_spec::release(descriptor)?;
            name = name.replace("{release}", &release);
        }
        Ok(name)
    }

    /// Inverse of `base_template` for one ref name.
    fn version_from_base<'a>(&self, base: &'a str) -> Option<&'a str> {
        let (prefix, suffix) = self.base_template.split_once("{upstream_version}")?;
        base.strip_prefix(prefix)?
            .strip_suffix(suffix)
            .filter(|v| !v.is_empty())
    }
}
