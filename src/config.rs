//! Configuration for the transform.
//!
//! [`TransformConfig`] is the only adjustable surface of the core
//! transform. It is built once, validated, and then passed by reference;
//! nothing inside the pipeline mutates it.
//!
//! # Example
//!
//! ```rust
//! use convforensic::config::{OrphanPolicy, TransformConfig};
//!
//! let config = TransformConfig::new()
//!     .with_deleted_marker("<message removed>")
//!     .with_orphan_policy(OrphanPolicy::Reject);
//!
//! assert!(config.validate().is_ok());
//! ```

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::{ForensicError, Result};
use crate::parsing::{DEFAULT_DATETIME_FORMAT, is_valid_format};

/// Exact text the export writes in place of a retracted message.
pub const DEFAULT_DELETED_MARKER: &str = "[Deleted Message]";

/// What to do with rows that appear before the first block-start marker.
///
/// A well-formed export always opens with a marker, so such rows point at
/// a truncated or spliced file.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OrphanPolicy {
    /// Materialize them as the unassigned conversation `UNASSIGNED-0`.
    #[default]
    Keep,
    /// Drop them from both output tables.
    Discard,
    /// Fail the transform.
    Reject,
}

impl OrphanPolicy {
    /// Returns all policy names.
    pub fn all_names() -> &'static [&'static str] {
        &["keep", "discard", "reject"]
    }
}

impl fmt::Display for OrphanPolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            OrphanPolicy::Keep => write!(f, "keep"),
            OrphanPolicy::Discard => write!(f, "discard"),
            OrphanPolicy::Reject => write!(f, "reject"),
        }
    }
}

impl FromStr for OrphanPolicy {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "keep" => Ok(OrphanPolicy::Keep),
            "discard" | "drop" => Ok(OrphanPolicy::Discard),
            "reject" | "fail" => Ok(OrphanPolicy::Reject),
            _ => Err(format!(
                "Unknown orphan policy: '{}'. Expected one of: {}",
                s,
                OrphanPolicy::all_names().join(", ")
            )),
        }
    }
}

/// Parameters of the core transform.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct TransformConfig {
    /// Literal message text that marks a deleted message (default: `[Deleted Message]`)
    pub deleted_marker: String,

    /// chrono format of `Date and time:` values (default: `%m/%d/%y %I:%M:%S %p`)
    pub datetime_format: String,

    /// Handling of rows preceding the first block-start marker (default: keep)
    pub orphan_policy: OrphanPolicy,
}

impl Default for TransformConfig {
    fn default() -> Self {
        Self {
            deleted_marker: DEFAULT_DELETED_MARKER.to_string(),
            datetime_format: DEFAULT_DATETIME_FORMAT.to_string(),
            orphan_policy: OrphanPolicy::Keep,
        }
    }
}

impl TransformConfig {
    /// Creates a new configuration with default values.
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the deleted-message marker.
    #[must_use]
    pub fn with_deleted_marker(mut self, marker: impl Into<String>) -> Self {
        self.deleted_marker = marker.into();
        self
    }

    /// Sets the datetime format.
    #[must_use]
    pub fn with_datetime_format(mut self, format: impl Into<String>) -> Self {
        self.datetime_format = format.into();
        self
    }

    /// Sets the orphan-row policy.
    #[must_use]
    pub fn with_orphan_policy(mut self, policy: OrphanPolicy) -> Self {
        self.orphan_policy = policy;
        self
    }

    /// Checks that the configuration can drive a transform.
    pub fn validate(&self) -> Result<()> {
        if self.deleted_marker.is_empty() {
            return Err(ForensicError::invalid_config(
                "deleted marker must not be empty",
            ));
        }
        if !is_valid_format(&self.datetime_format) {
            return Err(ForensicError::invalid_config(format!(
                "unusable datetime format '{}'",
                self.datetime_format
            )));
        }
        Ok(())
    }

    /// Loads a configuration from a JSON file. Missing fields take defaults.
    #[cfg(feature = "json-output")]
    pub fn from_json_file(path: impl AsRef<std::path::Path>) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        let config: Self = serde_json::from_str(&content)?;
        config.validate()?;
        Ok(config)
    }
}
