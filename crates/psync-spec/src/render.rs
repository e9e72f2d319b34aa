//! Patch section rendering.

use psync_extract::PatchEntry;

use crate::markers::SectionMarkers;
use crate::parse::{DescriptorEntry, ParsedDescriptor};

/// One entry of the section to be written.
#[derive(Clone, Copy, Debug)]
pub enum SectionEntry<'a> {
    /// Written back verbatim.
    Existing(&'a DescriptorEntry),
    /// Rendered from a fresh patch under the given filename.
    Fresh {
        patch: &'a PatchEntry,
        filename: &'a str,
    },
}

/// Reassemble a descriptor around a new patch section.
///
/// Entries are written in the given order, each preceded by a blank line.
/// The preamble, stray section tail and postamble come from `parsed`.
pub fn render(
    parsed: &ParsedDescriptor,
    entries: &[SectionEntry<'_>],
    markers: &SectionMarkers,
) -> String {
    let mut out = String::with_capacity(parsed.preamble.len() + parsed.postamble.len() + 4096);
    out.push_str(&parsed.preamble);
    out.push_str(&markers.start);
    out.push('\n');
    for entry in entries {
        out.push('\n');
        match entry {
            SectionEntry::Existing(existing) => out.push_str(&existing.text),
            SectionEntry::Fresh { patch, filename } => {
                out.push_str(&render_entry(patch, filename));
            }
        }
    }
    if !parsed.section_tail.is_empty() {
        out.push('\n');
        out.push_str(&parsed.section_tail);
    }
    out.push('\n');
    out.push_str(&markers.end);
    out.push('\n');
    out.push_str(&parsed.postamble);
    out
}

/// The descriptor block for one patch:
///
/// ```text
/// # 00123 # <fingerprint>
/// # Title
/// #
/// # Body line
/// Patch123: 00123-title.patch
/// ```
///
/// followed directly by the patch's trailer, if any. `%` in comments is
/// doubled so RPM does not expand it.
pub fn render_entry(patch: &PatchEntry, filename: &str) -> String {
    let mut out = format!("# {} # {}\n", patch.number.padded(), patch.hash);
    for line in patch.comment().lines() {
        let line = line.trim_end().replace('%', "%%");
        if line.is_empty() {
            out.push_str("#\n");
        } else {
            out.push_str("# ");
            out.push_str(&line);
            out.push('\n');
        }
    }
    out.push_str(&format!("Patch{}: {filename}", patch.number));
    if patch.trailer.is_empty() {
        out.push('\n');
    } else {
        out.push_str(&patch.trailer);
        if !patch.trailer.ends_with('\n') {
            out.push('\n');
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parse::parse;
    use psync_types::{CommitId, Fingerprint, PatchNumber};

    fn patch(number: u32, title: &str, body: &str) -> PatchEntry {
        PatchEntry {
            number: PatchNumber::new(number),
            title: title.into(),
            body: body.into(),
            filename: format!("{number:05}-x.patch"),
            normalized: Vec::new(),
            hash: Fingerprint::from_hash([0x11; 32]),
            commit: CommitId::zero(),
            patch_text: String::new(),
            trailer: String::new(),
        }
    }

    const SPEC: &str = "Name: python\n\
                        # (Patches taken from github.com/fedora-python/cpython)\n\
                        \n\
                        # 00001 #\n\
                        # Old entry\n\
                        Patch1: 00001-old.patch\n\
                        \n\
                        # (New patches go here ^^^)\n\
                        %description\n";

    #[test]
    fn entry_layout() {
        let text = render_entry(&patch(123, "Fix 100% of foo", "First.\n\nSecond."), "f.patch");
        let hash = "11".repeat(32);
        assert_eq!(
            text,
            format!(
                "# 00123 # {hash}\n# Fix 100%% of foo\n#\n# First.\n#\n# Second.\nPatch123: f.patch\n"
            )
        );
    }

    #[test]
    fn trailer_follows_tag_line() {
        let mut p = patch(189, "Wheels", "");
        p.trailer = "\n# blurb\n%global pip_version 1.0\n".into();
        let text = render_entry(&p, "00189-wheels.patch");
        assert!(text.ends_with("Patch189: 00189-wheels.patch\n# blurb\n%global pip_version 1.0\n"));
    }

    #[test]
    fn header_shaped_title_survives_reparse() {
        let markers = SectionMarkers::default();
        let parsed = parse(SPEC, &markers).unwrap();
        let fresh = patch(200, "5 # fix", "");
        let entries = [SectionEntry::Fresh {
            patch: &fresh,
            filename: "00200-5-fix.patch",
        }];
        let text = render(&parsed, &entries, &markers);
        assert!(text.contains("\n# 5 # fix\nPatch200: "));

        let reparsed = parse(&text, &markers).unwrap();
        assert!(reparsed.issues.is_empty());
        assert_eq!(reparsed.entries.len(), 1);
        assert_eq!(reparsed.entries[0].number, PatchNumber::new(200));
        assert_eq!(reparsed.entries[0].recorded_hash, Some(fresh.hash));
    }

    #[test]
    fn existing_entries_rendered_verbatim() {
        let markers = SectionMarkers::default();
        let parsed = parse(SPEC, &markers).unwrap();
        let entries: Vec<_> = parsed.entries.iter().map(SectionEntry::Existing).collect();
        assert_eq!(render(&parsed, &entries, &markers), SPEC);
    }

    #[test]
    fn fresh_entries_appended_in_order() {
        let markers = SectionMarkers::default();
        let parsed = parse(SPEC, &markers).unwrap();
        let fresh = patch(2, "New", "");
        let entries = [
            SectionEntry::Existing(&parsed.entries[0]),
            SectionEntry::Fresh {
                patch: &fresh,
                filename: "00002-new.patch",
            },
        ];
        let text = render(&parsed, &entries, &markers);
        assert!(text.contains("Patch1: 00001-old.patch\n\n# 00002 # "));
        assert!(text.ends_with("Patch2: 00002-new.patch\n\n# (New patches go here ^^^)\n%description\n"));

        let reparsed = parse(&text, &markers).unwrap();
        assert_eq!(reparsed.entries[1].recorded_hash, Some(fresh.hash));
        assert_eq!(render(&reparsed, &[SectionEntry::Existing(&reparsed.entries[0]), SectionEntry::Existing(&reparsed.entries[1])], &markers), text);
    }

    #[test]
    fn legacy_start_marker_replaced_by_canonical() {
        let markers = SectionMarkers::default();
        let text = "# 00001 #\nPatch1: a.patch\n# (New patches go here ^^^)\n";
        let parsed = parse(text, &markers).unwrap();
        let entries: Vec<_> = parsed.entries.iter().map(SectionEntry::Existing).collect();
        let rendered = render(&parsed, &entries, &markers);
        assert_eq!(
            rendered,
            "# (Patches taken from github.com/fedora-python/cpython)\n\n# 00001 #\nPatch1: a.patch\n\n# (New patches go here ^^^)\n"
        );
        assert_eq!(parse(&rendered, &markers).unwrap().entries, parsed.entries);
    }

    #[test]
    fn section_tail_kept_before_end_marker() {
        let markers = SectionMarkers::default();
        let parsed = ParsedDescriptor {
            section_tail: "# leftover\n".into(),
            ..ParsedDescriptor::default()
        };
        let text = render(&parsed, &[], &markers);
        assert!(text.ends_with("\n# leftover\n\n# (New patches go here ^^^)\n"));
    }
}
