//! Writes a [`SyncReport`] into the packaging directory.

use std::fs;
use std::io::{self, Write};
use std::path::{Path, PathBuf};

use serde::Serialize;
use tracing::{debug, info};

use crate::error::{SdkError, SdkResult};
use crate::sync::{is_plain_filename, SyncReport};

/// What [`Emitter::apply`] changed on disk.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize)]
pub struct Emitted {
    pub written: Vec<String>,
    pub removed: Vec<String>,
    pub descriptor_updated: bool,
}

/// Applies reports next to one descriptor file.
#[derive(Clone, Debug)]
pub struct Emitter {
    dir: PathBuf,
    descriptor: PathBuf,
}

impl Emitter {
    /// Patch files go into the descriptor's directory.
    pub fn new(descriptor: impl Into<PathBuf>) -> Self {
        let descriptor = descriptor.into();
        let dir = match descriptor.parent() {
            Some(parent) if !parent.as_os_str().is_empty() => parent.to_path_buf(),
            _ => PathBuf::from("."),
        };
        Self { dir, descriptor }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Write patch files, delete stale ones, then replace the descriptor.
    ///
    /// Patch files are staged in a temporary directory inside the packaging
    /// directory and renamed into place once all of them are written. The
    /// descriptor is written last, through a temporary file and a rename.
    /// An up-to-date report writes nothing.
    pub fn apply(&self, report: &SyncReport) -> SdkResult<Emitted> {
        if report.is_up_to_date() {
            debug!("up to date, nothing to write");
            return Ok(Emitted::default());
        }
        let unsafe_name = report
            .patch_files
            .iter()
            .map(|f| f.filename.as_str())
            .chain(report.stale_files.iter().map(String::as_str))
            .find(|name| !is_plain_filename(name));
        if let Some(name) = unsafe_name {
            return Err(SdkError::UnsafeFilename(name.to_string()));
        }

        let staging = tempfile::Builder::new()
            .prefix(".psync-")
            .tempdir_in(&self.dir)?;
        for file in &report.patch_files {
            fs::write(staging.path().join(&file.filename), &file.contents)?;
        }

        let mut emitted = Emitted::default();
        for file in &report.patch_files {
            fs::rename(staging.path().join(&file.filename), self.dir.join(&file.filename))?;
            debug!(filename = %file.filename, "wrote patch");
            emitted.written.push(file.filename.clone());
        }
        for name in &report.stale_files {
            match fs::remove_file(self.dir.join(name)) {
                Ok(()) => emitted.removed.push(name.clone()),
                Err(e) if e.kind() == io::ErrorKind::NotFound => {
                    debug!(filename = %name, "stale patch already gone");
                }
                Err(e) => return Err(e.into()),
            }
        }

        let mut tmp = tempfile::NamedTempFile::new_in(&self.dir)?;
        tmp.write_all(report.descriptor.as_bytes())?;
        tmp.flush()?;
        tmp.persist(&self.descriptor).map_err(|e| e.error)?;
        emitted.descriptor_updated = true;

        info!(
            written = emitted.written.len(),
            removed = emitted.removed.len(),
            descriptor = %self.descriptor.display(),
            "applied patch changes"
        );
        Ok(emitted)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sync::tests::{scenario_repo, DESCRIPTOR};
    use crate::sync::{PatchFile, SyncRequest, Synchronizer};
    use psync_types::PatchNumber;

    fn entries(dir: &Path) -> Vec<String> {
        let mut names: Vec<String> = fs::read_dir(dir)
            .unwrap()
            .map(|e| e.unwrap().file_name().to_string_lossy().into_owned())
            .collect();
        names.sort();
        names
    }

    #[test]
    fn apply_writes_patches_and_descriptor() {
        let dir = tempfile::tempdir().unwrap();
        let spec = dir.path().join("python3.12.spec");
        fs::write(&spec, DESCRIPTOR).unwrap();

        let repo = scenario_repo();
        let sync = Synchronizer::default();
        let report = sync.plan(&repo, DESCRIPTOR, &SyncRequest::default()).unwrap();
        let emitted = Emitter::new(&spec).apply(&report).unwrap();

        assert_eq!(emitted.written, vec!["00123-fix-foo.patch", "00124-fix-bar.patch"]);
        assert!(emitted.descriptor_updated);
        assert_eq!(
            entries(dir.path()),
            vec!["00123-fix-foo.patch", "00124-fix-bar.patch", "python3.12.spec"]
        );
        let written = fs::read_to_string(&spec).unwrap();
        assert_eq!(written, report.descriptor);
        let patch = fs::read_to_string(dir.path().join("00123-fix-foo.patch")).unwrap();
        assert_eq!(patch, report.patch_files[0].contents);

        let again = sync.plan(&repo, &written, &SyncRequest::default()).unwrap();
        assert!(again.is_up_to_date());
        assert_eq!(Emitter::new(&spec).apply(&again).unwrap(), Emitted::default());
    }

    #[test]
    fn stale_files_are_removed() {
        let dir = tempfile::tempdir().unwrap();
        let spec = dir.path().join("p.spec");
        fs::write(&spec, "old").unwrap();
        fs::write(dir.path().join("00125-gone.patch"), "x").unwrap();

        let mut report = Synchronizer::default()
            .plan(&scenario_repo(), DESCRIPTOR, &SyncRequest::default())
            .unwrap();
        report.patch_files.clear();
        report.stale_files = vec!["00125-gone.patch".into(), "00126-missing.patch".into()];

        let emitted = Emitter::new(&spec).apply(&report).unwrap();
        assert_eq!(emitted.removed, vec!["00125-gone.patch"]);
        assert_eq!(entries(dir.path()), vec!["p.spec"]);
    }

    #[test]
    fn unsafe_names_write_nothing() {
        let dir = tempfile::tempdir().unwrap();
        let spec = dir.path().join("p.spec");
        fs::write(&spec, "old").unwrap();

        let mut report = Synchronizer::default()
            .plan(&scenario_repo(), DESCRIPTOR, &SyncRequest::default())
            .unwrap();
        report.patch_files.push(PatchFile {
            number: PatchNumber::new(9),
            filename: "../escape.patch".into(),
            contents: String::new(),
        });

        let err = Emitter::new(&spec).apply(&report).unwrap_err();
        assert!(matches!(err, SdkError::UnsafeFilename(name) if name == "../escape.patch"));
        assert_eq!(entries(dir.path()), vec!["p.spec"]);
        assert_eq!(fs::read_to_string(&spec).unwrap(), "old");
    }

    #[test]
    fn bare_descriptor_name_uses_current_dir() {
        assert_eq!(Emitter::new("python3.spec").dir(), Path::new("."));
        assert_eq!(Emitter::new("/tmp/x/python3.spec").dir(), Path::new("/tmp/x"));
    }
}
