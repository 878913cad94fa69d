//! Hardware identifiers: 12 hex digits, normalized to uppercase.

use crate::error::IdentifierError;
use std::fmt;
use std::str::FromStr;

/// Length of a hardware identifier in hex digits.
pub const IDENTIFIER_LEN: usize = 12;

/// Vendor prefixes the rule table knows about.
pub const VENDOR_PREFIXES: [&str; 2] = ["000413", "00087B"];

/// A syntactically valid hardware identifier.
///
/// Construction checks length and hex digits only; vendor and model checks belong
/// to the classifier.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct HardwareIdentifier(String);

impl HardwareIdentifier {
    pub fn parse(raw: &str) -> Result<Self, IdentifierError> {
        let trimmed = raw.trim();
        if trimmed.len() != IDENTIFIER_LEN {
            return Err(IdentifierError::Length {
                input: raw.to_string(),
                len: trimmed.chars().count(),
            });
        }
        if !trimmed.chars().all(|c| c.is_ascii_hexdigit()) {
            return Err(IdentifierError::NotHex(raw.to_string()));
        }
        Ok(Self(trimmed.to_ascii_uppercase()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// The first six digits (the vendor block).
    pub fn prefix(&self) -> &str {
        &self.0[..6]
    }

    /// The last six digits (the device block).
    pub fn suffix(&self) -> &str {
        &self.0[6..]
    }

    pub fn has_known_vendor(&self) -> bool {
        VENDOR_PREFIXES.contains(&self.prefix())
    }
}

impl FromStr for HardwareIdentifier {
    type Err = IdentifierError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl fmt::Display for HardwareIdentifier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for HardwareIdentifier {
    fn as_ref(&self) -> &str {
        &self.0
    }
}
