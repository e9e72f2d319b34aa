//! Patch section parsing.
//!
//! The section is split into blocks. A block is an optional
//! `# NNNNN #[ hash]` header, comment lines, one `PatchN: filename` tag and
//! trailer lines. It ends at a blank line after its tag, at the next header
//! or at the next tag. Blocks without a tag are stray text: it is kept in
//! front of the following entry, or as the section tail when nothing
//! follows.

use std::collections::BTreeSet;
use std::sync::LazyLock;

use psync_types::{Fingerprint, PatchNumber};
use regex::Regex;
use tracing::{debug, warn};

use crate::error::{SpecIssue, SpecResult, UnreadableReason};
use crate::markers::SectionMarkers;

static HEADER_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^# (\d+) #(?:[ \t]+(\S+))?$").expect("header regex"));

static TAG_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^Patch(\d+):[ \t]*(\S+)$").expect("tag regex"));

static TAG_LIKE_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^Patch\w*:").expect("tag prefix regex"));

/// One existing entry of the patch section.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct DescriptorEntry {
    pub number: PatchNumber,
    pub filename: String,
    /// Fingerprint from the entry header. `None` for entries written by
    /// other tools, entries without a header, or a header/tag mismatch.
    pub recorded_hash: Option<Fingerprint>,
    /// The entry's lines, verbatim, each ending in `\n`.
    pub text: String,
}

/// A descriptor split around its patch section.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ParsedDescriptor {
    /// Everything before the start marker line.
    pub preamble: String,
    pub entries: Vec<DescriptorEntry>,
    /// Stray text after the last entry.
    pub section_tail: String,
    /// Everything after the end marker line.
    pub postamble: String,
    pub issues: Vec<SpecIssue>,
}

impl ParsedDescriptor {
    pub fn entry(&self, number: PatchNumber) -> Option<&DescriptorEntry> {
        self.entries.iter().find(|e| e.number == number)
    }

    pub fn numbers(&self) -> impl Iterator<Item = PatchNumber> + '_ {
        self.entries.iter().map(|e| e.number)
    }
}

/// Parse a descriptor.
///
/// Fails with [`SpecError::Unreadable`](crate::SpecError::Unreadable) when
/// the section cannot be delimited, a tag line cannot be parsed, or a patch
/// number is declared twice.
pub fn parse(text: &str, markers: &SectionMarkers) -> SpecResult<ParsedDescriptor> {
    let lines: Vec<&str> = text.split_inclusive('\n').collect();

    let start = lines
        .iter()
        .position(|l| markers.is_start(key(l)))
        .ok_or(UnreadableReason::NoStartMarker)?;
    if let Some(again) = lines[start + 1..]
        .iter()
        .position(|l| markers.is_canonical_start(key(l)))
    {
        return Err(UnreadableReason::MultipleStartMarkers {
            line: start + again + 2,
        }
        .into());
    }
    let end = lines[start + 1..]
        .iter()
        .position(|l| markers.is_end(key(l)))
        .map(|i| start + 1 + i)
        .ok_or(UnreadableReason::NoEndMarker)?;

    // A legacy start marker is content: either the first entry's header or
    // the first line of its comment.
    let body_start = if markers.is_canonical_start(key(lines[start])) {
        start + 1
    } else {
        start
    };

    let mut section = Section::default();
    let mut block = Block::default();
    for (offset, raw) in lines[body_start..end].iter().enumerate() {
        let line_no = body_start + offset + 1;
        let line = raw.trim_end_matches('\n');
        let trimmed = line.trim_end();

        if trimmed.is_empty() {
            if block.tag.is_some() {
                section.finish(std::mem::take(&mut block));
            } else if !block.lines.is_empty() {
                block.lines.push(line);
            }
            continue;
        }

        // Inside a headed comment, header-shaped lines are comment text.
        let header = HEADER_RE.captures(trimmed).filter(|_| !block.in_comment());
        if let Some(caps) = header {
            if !block.lines.is_empty() {
                section.finish(std::mem::take(&mut block));
            }
            if let Ok(number) = caps[1].parse::<PatchNumber>() {
                block.header = Some((number, caps.get(2).map(|m| m.as_str().to_string())));
            }
            block.push(line_no, line);
            continue;
        }

        if TAG_LIKE_RE.is_match(trimmed) {
            let bad_tag = || UnreadableReason::BadTag {
                line: line_no,
                text: trimmed.to_string(),
            };
            let caps = TAG_RE.captures(trimmed).ok_or_else(bad_tag)?;
            let number = caps[1].parse::<PatchNumber>().map_err(|_| bad_tag())?;
            if block.tag.is_some() {
                section.finish(std::mem::take(&mut block));
            }
            block.tag = Some((number, caps[2].to_string()));
            block.push(line_no, line);
            continue;
        }

        block.push(line_no, line);
    }
    if !block.lines.is_empty() {
        section.finish(block);
    }

    let mut seen = BTreeSet::new();
    for entry in &section.entries {
        if !seen.insert(entry.number) {
            return Err(UnreadableReason::DuplicateTag {
                number: entry.number,
            }
            .into());
        }
    }
    for issue in &section.issues {
        warn!(%issue, "descriptor issue");
    }
    debug!(entries = section.entries.len(), "parsed patch section");

    let mut tail = section.pending;
    while tail.last().is_some_and(|l| l.trim().is_empty()) {
        tail.pop();
    }
    Ok(ParsedDescriptor {
        preamble: lines[..start].concat(),
        entries: section.entries,
        section_tail: join_lines(&tail),
        postamble: lines[end + 1..].concat(),
        issues: section.issues,
    })
}

#[derive(Default)]
struct Block<'a> {
    first_line: usize,
    lines: Vec<&'a str>,
    header: Option<(PatchNumber, Option<String>)>,
    tag: Option<(PatchNumber, String)>,
}

impl<'a> Block<'a> {
    /// Headed, untagged, and not interrupted by a blank line.
    fn in_comment(&self) -> bool {
        self.header.is_some()
            && self.tag.is_none()
            && self.lines.last().is_some_and(|l| !l.trim().is_empty())
    }

    fn push(&mut self, line_no: usize, line: &'a str) {
        if self.lines.is_empty() {
            self.first_line = line_no;
        }
        self.lines.push(line);
    }
}

#[derive(Default)]
struct Section<'a> {
    entries: Vec<DescriptorEntry>,
    issues: Vec<SpecIssue>,
    /// Stray lines waiting for the next entry.
    pending: Vec<&'a str>,
}

impl<'a> Section<'a> {
    fn finish(&mut self, block: Block<'a>) {
        let Some((number, filename)) = block.tag else {
            self.issues.push(SpecIssue::StrayText {
                line: block.first_line,
                text: join_lines(&block.lines),
            });
            self.pending.extend(block.lines);
            return;
        };

        let recorded_hash = match block.header {
            Some((header, hash)) if header == number => {
                hash.and_then(|h| Fingerprint::from_hex(&h).ok())
            }
            Some((header, _)) => {
                self.issues.push(SpecIssue::HeaderMismatch {
                    line: block.first_line,
                    header,
                    tag: number,
                });
                None
            }
            None => None,
        };

        let mut lines = std::mem::take(&mut self.pending);
        lines.extend(block.lines);
        self.entries.push(DescriptorEntry {
            number,
            filename,
            recorded_hash,
            text: join_lines(&lines),
        });
    }
}

fn key(line: &str) -> &str {
    line.trim_end()
}

fn join_lines(lines: &[&str]) -> String {
    lines.iter().map(|l| format!("{l}\n")).collect()
}
