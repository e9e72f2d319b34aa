use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::TypeError;

/// A patch number as used in `PatchNNN:` tags and `# NNNNN #` headers.
///
/// Numbers are unique within a patch set. They are displayed unpadded and
/// padded to five digits in headers and filenames via [`PatchNumber::padded`].
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PatchNumber(u32);

impl PatchNumber {
    pub const fn new(n: u32) -> Self {
        Self(n)
    }

    pub fn get(self) -> u32 {
        self.0
    }

    /// Zero-padded five-digit form (`123` -> `"00123"`).
    pub fn padded(self) -> String {
        format!("{:05}", self.0)
    }
}

impl FromStr for PatchNumber {
    type Err = TypeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s.is_empty() || !s.bytes().all(|b| b.is_ascii_digit()) {
            return Err(TypeError::InvalidPatchNumber(s.to_string()));
        }
        s.parse::<u32>()
            .map(Self)
            .map_err(|e| TypeError::InvalidPatchNumber(format!("{s}: {e}")))
    }
}

impl fmt::Debug for PatchNumber {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

impl fmt::Display for PatchNumber {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<u32> for PatchNumber {
    fn from(n: u32) -> Self {
        Self(n)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_leading_zeros() {
        assert_eq!("00123".parse::<PatchNumber>().unwrap(), PatchNumber::new(123));
    }

    #[test]
    fn padded_is_five_digits() {
        assert_eq!(PatchNumber::new(1).padded(), "00001");
        assert_eq!(PatchNumber::new(123456).padded(), "123456");
    }

    #[test]
    fn rejects_signs_and_garbage() {
        assert!("+12".parse::<PatchNumber>().is_err());
        assert!("".parse::<PatchNumber>().is_err());
        assert!("12a".parse::<PatchNumber>().is_err());
        assert!("99999999999".parse::<PatchNumber>().is_err());
    }

    #[test]
    fn display_is_unpadded() {
        assert_eq!(PatchNumber::new(7).to_string(), "7");
    }
}
