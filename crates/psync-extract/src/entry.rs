use psync_types::{CommitId, Fingerprint, PatchNumber};
use serde::Serialize;

/// One patch derived from one commit.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct PatchEntry {
    pub number: PatchNumber,
    /// Summary without the number prefix. Empty for legacy patches, whose
    /// summary is their filename.
    pub title: String,
    /// Descriptor comment text below the title.
    pub body: String,
    pub filename: String,
    /// Normalized diff stream the fingerprint was computed over.
    #[serde(skip)]
    pub normalized: Vec<u8>,
    pub hash: Fingerprint,
    pub commit: CommitId,
    /// Full text of the patch file.
    #[serde(skip)]
    pub patch_text: String,
    /// Extra descriptor lines after the `PatchN:` line; starts with `\n`
    /// when present.
    pub trailer: String,
}

impl PatchEntry {
    /// Title and body as one block, separated by a blank line.
    pub fn comment(&self) -> String {
        match (self.title.is_empty(), self.body.is_empty()) {
            (_, true) => self.title.clone(),
            (true, false) => self.body.clone(),
            (false, false) => format!("{}\n\n{}", self.title, self.body),
        }
    }
}
