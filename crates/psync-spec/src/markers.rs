use serde::{Deserialize, Serialize};

/// Lines delimiting the patch section.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SectionMarkers {
    /// Canonical start marker, always written on render.
    pub start: String,
    /// Older markers also accepted as the section start. When one of these
    /// opens the section, its line is part of the section's content.
    pub start_markers: Vec<String>,
    pub end: String,
}

impl SectionMarkers {
    /// Whether `line` (trailing whitespace removed) opens the section.
    pub fn is_start(&self, line: &str) -> bool {
        line == self.start || self.start_markers.iter().any(|m| m == line)
    }

    pub fn is_canonical_start(&self, line: &str) -> bool {
        line == self.start
    }

    pub fn is_end(&self, line: &str) -> bool {
        line == self.end
    }
}

impl Default for SectionMarkers {
    fn default() -> Self {
        Self {
            start: "# (Patches taken from github.com/fedora-python/cpython)".into(),
            start_markers: vec![
                "# 00001 #".into(),
                "# Modules/Setup.dist is ultimately used by the \"makesetup\" script to construct"
                    .into(),
            ],
            end: "# (New patches go here ^^^)".into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_accept_legacy_starts() {
        let markers = SectionMarkers::default();
        assert!(markers.is_start("# (Patches taken from github.com/fedora-python/cpython)"));
        assert!(markers.is_start("# 00001 #"));
        assert!(!markers.is_canonical_start("# 00001 #"));
        assert!(!markers.is_start("# 00001 # abc"));
        assert!(markers.is_end("# (New patches go here ^^^)"));
    }

    #[test]
    fn partial_config_keeps_defaults() {
        let markers: SectionMarkers = serde_json::from_str(r##"{"end": "# END"}"##).unwrap();
        assert_eq!(markers.end, "# END");
        assert_eq!(markers.start, SectionMarkers::default().start);
    }
}
