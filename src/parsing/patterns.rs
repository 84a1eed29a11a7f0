//! Structural patterns of the block export and row classification.
//!
//! Three regexes drive the transform:
//! - block start: `^APD\d+$`
//! - message sender: a plain email address
//! - conversation identifier quality: strict UUID v4
//!
//! Metadata keys are matched by exact string equality, not by regex.

use std::fmt;
use std::sync::LazyLock;

use regex::Regex;
use serde::{Deserialize, Serialize};

static BLOCK_START_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"^APD\d+$").unwrap());

static EMAIL_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[A-Za-z0-9._%+-]+@[A-Za-z0-9.-]+\.[A-Za-z]{2,}$").unwrap());

static UUID_V4_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"^[0-9a-fA-F]{8}-[0-9a-fA-F]{4}-4[0-9a-fA-F]{3}-[89abAB][0-9a-fA-F]{3}-[0-9a-fA-F]{12}$",
    )
    .unwrap()
});

/// Metadata keys recognised inside a block.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum MetadataKey {
    /// `Conversation Identifier:`
    ConversationIdentifier,
    /// `Platform Call ID:`
    PlatformCallId,
    /// `Date and time:`
    DateAndTime,
}

impl MetadataKey {
    /// Exact `col1` literal that introduces this key.
    pub fn literal(self) -> &'static str {
        match self {
            MetadataKey::ConversationIdentifier => "Conversation Identifier:",
            MetadataKey::PlatformCallId => "Platform Call ID:",
            MetadataKey::DateAndTime => "Date and time:",
        }
    }

    /// Returns all keys.
    pub fn all() -> &'static [MetadataKey] {
        &[
            MetadataKey::ConversationIdentifier,
            MetadataKey::PlatformCallId,
            MetadataKey::DateAndTime,
        ]
    }

    /// Matches a `col1` value against the key literals.
    pub fn from_literal(value: &str) -> Option<Self> {
        Self::all().iter().copied().find(|k| k.literal() == value)
    }
}

impl fmt::Display for MetadataKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.literal())
    }
}

/// What a raw row is, decided from its first column alone.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum RowKind {
    /// `col1` is an extraction-batch marker such as `APD137`.
    BlockStart,
    /// `col1` is one of the metadata key literals.
    Metadata(MetadataKey),
    /// `col1` is a sender email address.
    Message,
    /// Anything else: blank separators, unknown keys, noise.
    Unclassified,
}

impl RowKind {
    pub fn is_message(self) -> bool {
        matches!(self, RowKind::Message)
    }

    pub fn is_block_start(self) -> bool {
        matches!(self, RowKind::BlockStart)
    }
}

/// Classifies a row by its first column.
///
/// Priority is block start, then metadata key, then message. A value can
/// therefore never be both a metadata row and a message row.
///
/// # Example
///
/// ```
/// use convforensic::parsing::{MetadataKey, RowKind, classify};
///
/// assert_eq!(classify(Some("APD12")), RowKind::BlockStart);
/// assert_eq!(classify(Some("Date and time:")), RowKind::Metadata(MetadataKey::DateAndTime));
/// assert_eq!(classify(Some("a@b.com")), RowKind::Message);
/// assert_eq!(classify(None), RowKind::Unclassified);
/// ```
pub fn classify(col1: Option<&str>) -> RowKind {
    let Some(value) = col1 else {
        return RowKind::Unclassified;
    };

    if is_block_start(value) {
        RowKind::BlockStart
    } else if let Some(key) = MetadataKey::from_literal(value) {
        RowKind::Metadata(key)
    } else if is_email(value) {
        RowKind::Message
    } else {
        RowKind::Unclassified
    }
}

/// `true` for `APD` followed by one or more digits, nothing else.
pub fn is_block_start(value: &str) -> bool {
    BLOCK_START_RE.is_match(value)
}

/// `true` for `local@domain.tld` with a TLD of at least two letters.
pub fn is_email(value: &str) -> bool {
    EMAIL_RE.is_match(value)
}

/// `true` for a textually valid UUID v4 (version nibble 4, RFC variant).
pub fn is_uuid_v4(value: &str) -> bool {
    UUID_V4_RE.is_match(value)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_block_start_pattern() {
        assert!(is_block_start("APD1"));
        assert!(is_block_start("APD137"));
        assert!(!is_block_start("APD"));
        assert!(!is_block_start("apd1"));
        assert!(!is_block_start(" APD1"));
        assert!(!is_block_start("APD1 "));
        assert!(!is_block_start("APD1a"));
        assert!(!is_block_start("XAPD1"));
    }

    #[test]
    fn test_email_pattern() {
        assert!(is_email("a@b.com"));
        assert!(is_email("first.last+tag@mail.example.co"));
        assert!(!is_email("a@b"));
        assert!(!is_email("a@b.c"));
        assert!(!is_email("@b.com"));
        assert!(!is_email("a b@c.com"));
        assert!(!is_email("a@b.com "));
        assert!(!is_email("Conversation Identifier:"));
    }

    #[test]
    fn test_uuid_v4_pattern() {
        assert!(is_uuid_v4("3f2b8c1e-9d4a-4e6b-8a7c-1d2e3f4a5b6c"));
        assert!(is_uuid_v4("3F2B8C1E-9D4A-4E6B-BA7C-1D2E3F4A5B6C"));
        assert!(!is_uuid_v4("not-a-uuid"));
        assert!(!is_uuid_v4("uuid-1"));
        // version 1
        assert!(!is_uuid_v4("123e4567-e89b-12d3-a456-426614174000"));
        // bad variant
        assert!(!is_uuid_v4("3f2b8c1e-9d4a-4e6b-7a7c-1d2e3f4a5b6c"));
        assert!(!is_uuid_v4("3f2b8c1e9d4a4e6b8a7c1d2e3f4a5b6c"));
    }

    #[test]
    fn test_metadata_literals_are_exact() {
        assert_eq!(
            MetadataKey::from_literal("Platform Call ID:"),
            Some(MetadataKey::PlatformCallId)
        );
        assert_eq!(MetadataKey::from_literal("Platform Call ID"), None);
        assert_eq!(MetadataKey::from_literal("platform call id:"), None);
        assert_eq!(MetadataKey::from_literal(" Date and time:"), None);
    }

    #[test]
    fn test_classify_priority() {
        assert_eq!(classify(Some("APD9")), RowKind::BlockStart);
        assert_eq!(
            classify(Some("Conversation Identifier:")),
            RowKind::Metadata(MetadataKey::ConversationIdentifier)
        );
        assert_eq!(classify(Some("x@y.org")), RowKind::Message);
        assert_eq!(classify(Some("Participants:")), RowKind::Unclassified);
        assert_eq!(classify(None), RowKind::Unclassified);
    }

    #[test]
    fn test_metadata_display() {
        assert_eq!(MetadataKey::DateAndTime.to_string(), "Date and time:");
    }
}
