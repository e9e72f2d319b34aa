//! Descriptor trailers attached after a patch's `PatchN:` line.
//!
//! One patch removes the pinned setuptools/pip versions from
//! `Lib/ensurepip/__init__.py`; the versions it removes are recorded in the
//! descriptor as `%global` definitions so that packaging can refer to the
//! wheels it bundles.

use std::collections::BTreeMap;
use std::sync::LazyLock;

use psync_diff::{DiffLine, FileDiff};
use psync_types::PatchNumber;
use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::error::{ExtractError, ExtractResult};

static BUNDLED_VERSION_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"^_([A-Z]+)_VERSION = "([0-9.]+)""#).expect("bundled version regex")
});

const BUNDLED_VERSION_BLURB: &str = "
# The following versions of setuptools/pip are bundled when this patch is not applied.
# The versions are written in Lib/ensurepip/__init__.py, this patch removes them.
# When the bundled setuptools/pip wheel is updated, the patch no longer applies cleanly.
# In such cases, the patch needs to be amended and the versions updated here:
";

/// Which patch gets the bundled-versions trailer.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct BundledVersionsRule {
    pub patch: PatchNumber,
}

impl Default for BundledVersionsRule {
    fn default() -> Self {
        Self {
            patch: PatchNumber::new(189),
        }
    }
}

/// Build the trailer for the bundled-versions patch from the
/// `_NAME_VERSION = "x.y"` lines its diff removes.
///
/// The result starts with a newline and is appended directly after the
/// `PatchN:` line. Names are lowercased and sorted.
pub fn bundled_versions_trailer(number: PatchNumber, diff: &[FileDiff]) -> ExtractResult<String> {
    let mut versions = BTreeMap::new();
    let removed = diff
        .iter()
        .flat_map(|f| &f.hunks)
        .flat_map(|h| &h.lines)
        .filter_map(|line| match line {
            DiffLine::Removed(text) => Some(text.trim()),
            _ => None,
        });
    for line in removed {
        let Some(caps) = BUNDLED_VERSION_RE.captures(line) else {
            continue;
        };
        let name = caps[1].to_string();
        if versions.contains_key(&name) {
            return Err(ExtractError::DuplicateBundledVersion { number, name });
        }
        versions.insert(name, caps[2].to_string());
    }

    let mut trailer = BUNDLED_VERSION_BLURB.to_string();
    for (name, version) in versions {
        trailer.push_str(&format!("%global {}_version {version}\n", name.to_lowercase()));
    }
    Ok(trailer)
}
