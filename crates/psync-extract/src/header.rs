//! Commit summary classification.
//!
//! Two styles of patch-bearing summary are recognized:
//!
//! ```text
//! 00123: Fix the frobnicator          numbered
//! python-2.6-rpath.patch              legacy, number found in the body
//! ```
//!
//! Anything else is [`ParsedHeader::Unnumbered`].

use std::sync::LazyLock;

use psync_types::PatchNumber;
use regex::Regex;

use crate::error::MalformedReason;

static NUMBERED_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^(\d+): (.+)$").expect("numbered summary regex"));

static SAFE_FILENAME_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[A-Za-z0-9._-]+$").expect("filename regex"));

static LEGACY_NUMBER_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\d{5,}").expect("legacy number regex"));

/// Legacy patches whose messages never carried a number.
const SPECIAL_PATCH_NUMBERS: &[(&str, u32)] = &[
    ("python-2.7.1-config.patch", 0),
    ("python-2.6-rpath.patch", 16),
    ("python-2.6.4-distutils-rpath.patch", 17),
];

/// The classified first line of a commit message.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ParsedHeader {
    /// `NNNNN: title`
    Numbered { number: PatchNumber, title: String },
    /// A summary that is itself a patch filename.
    Legacy {
        number: PatchNumber,
        filename: String,
    },
    /// No recognizable patch number.
    Unnumbered { title: String },
}

impl ParsedHeader {
    pub fn number(&self) -> Option<PatchNumber> {
        match self {
            Self::Numbered { number, .. } | Self::Legacy { number, .. } => Some(*number),
            Self::Unnumbered { .. } => None,
        }
    }

    /// Whether this header carries a patch number.
    pub fn is_numbered(&self) -> bool {
        self.number().is_some()
    }
}

/// First line of a message, with surrounding whitespace removed.
pub fn summary(message: &str) -> &str {
    message.trim().lines().next().unwrap_or_default().trim()
}

/// Classify a full commit message by its summary line.
///
/// Fails only for summaries that look like patch headers but whose number
/// cannot be determined.
pub fn classify(message: &str) -> Result<ParsedHeader, MalformedReason> {
    let summary = summary(message);

    if let Some(caps) = NUMBERED_RE.captures(summary) {
        let number = caps[1]
            .parse::<PatchNumber>()
            .map_err(|_| MalformedReason::NumberOutOfRange)?;
        return Ok(ParsedHeader::Numbered {
            number,
            title: caps[2].trim().to_string(),
        });
    }

    if summary.ends_with(".patch") && SAFE_FILENAME_RE.is_match(summary) {
        let number = match LEGACY_NUMBER_RE.find(message) {
            Some(m) => m
                .as_str()
                .parse::<PatchNumber>()
                .map_err(|_| MalformedReason::NumberOutOfRange)?,
            None => SPECIAL_PATCH_NUMBERS
                .iter()
                .find(|(name, _)| *name == summary)
                .map(|(_, n)| PatchNumber::new(*n))
                .ok_or(MalformedReason::LegacyWithoutNumber)?,
        };
        return Ok(ParsedHeader::Legacy {
            number,
            filename: summary.to_string(),
        });
    }

    Ok(ParsedHeader::Unnumbered {
        title: summary.to_string(),
    })
}
