//! Channel identifiers, the anatomical taxonomy and the grouping used by the
//! channel picker.

pub mod organize;
pub mod selection;
pub mod taxonomy;

pub use organize::{organize, ChannelGroup, DetectedChannels};
pub use selection::ChannelSelection;
pub use taxonomy::{region_of, Region};

use serde::{Deserialize, Serialize};
use std::borrow::Borrow;
use std::fmt;

/// Normalized channel identifier: upper-case ASCII letters and digits, never empty.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct ChannelName(String);

impl ChannelName {
    /// Normalize a raw header or label.
    ///
    /// Trims, drops byte-order marks and non-breaking spaces, drops every
    /// character that is not an ASCII letter or digit, then upper-cases.
    /// Returns `None` when nothing is left.
    pub fn normalize(raw: &str) -> Option<Self> {
        let name: String = raw
            .trim()
            .chars()
            .filter(|c| !matches!(c, '\u{FEFF}' | '\u{A0}'))
            .filter(char::is_ascii_alphanumeric)
            .map(|c| c.to_ascii_uppercase())
            .collect();
        if name.is_empty() {
            None
        } else {
            Some(Self(name))
        }
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl TryFrom<String> for ChannelName {
    type Error = String;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::normalize(&value).ok_or_else(|| format!("'{}' is not a valid channel name", value))
    }
}

impl From<ChannelName> for String {
    fn from(name: ChannelName) -> Self {
        name.0
    }
}

impl Borrow<str> for ChannelName {
    fn borrow(&self) -> &str {
        &self.0
    }
}

impl AsRef<str> for ChannelName {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ChannelName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}
