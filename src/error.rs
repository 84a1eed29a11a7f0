//! Unified error types for convforensic.
//!
//! This module provides a single [`ForensicError`] enum covering every
//! failure the library can report. Only *structural* problems become errors:
//! unreadable input, an empty export, a bad configuration, or a message
//! table that fails the validation gate. Content anomalies (bad dates,
//! missing metadata, non-UUID identifiers) are never errors; they surface
//! as nulls and flags in the output tables.

use std::io;
use std::path::PathBuf;

use thiserror::Error;

/// A specialized [`Result`] type for convforensic operations.
///
/// # Example
///
/// ```rust
/// use convforensic::error::Result;
/// use convforensic::record::RawTable;
///
/// fn load() -> Result<RawTable> {
///     Ok(RawTable::from_pairs(Vec::<(Option<String>, Option<String>)>::new()))
/// }
/// ```
pub type Result<T> = std::result::Result<T, ForensicError>;

/// The error type for all convforensic operations.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum ForensicError {
    /// An I/O error occurred while reading the export or writing output.
    #[error("IO error: {0}")]
    Io(#[from] io::Error),

    /// The raw export could not be read as CSV.
    #[error("Failed to read raw export{}: {source}", path.as_ref().map(|p| format!(" (file: {})", p.display())).unwrap_or_default())]
    Ingest {
        /// The underlying CSV error
        #[source]
        source: csv::Error,
        /// The file being read, if known
        path: Option<PathBuf>,
    },

    /// A CSV error occurred while writing a table.
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    /// A JSON error occurred while writing a table or loading a config file.
    #[cfg(feature = "json-output")]
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// The raw export contained no rows at all.
    #[error("Raw export is empty: nothing to transform")]
    EmptyInput,

    /// Rows were found before the first block-start marker and the
    /// configured policy rejects them.
    #[error("{count} row(s) precede the first block-start marker (first at row {first_row})")]
    OrphanRows {
        /// Number of rows in block 0
        count: usize,
        /// `row_num` of the first such row
        first_row: usize,
    },

    /// The transform configuration is unusable.
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    /// An output format was unknown or not compiled in.
    #[error("Invalid output format: {message}")]
    InvalidFormat {
        /// Description of what went wrong
        message: String,
    },

    /// The materialized message table failed the validation gate.
    #[error("Validation failed: {0}")]
    Validation(#[from] ValidationError),
}

/// Reasons the validation gate can reject a message table.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    /// One or more required columns are absent from the table header.
    #[error("missing required columns: {}", .0.join(", "))]
    MissingColumns(Vec<String>),

    /// A message row has no sender.
    #[error("sender_email is empty at row {row_num}")]
    EmptySender {
        /// Source row of the offending message
        row_num: usize,
    },

    /// A message row carries a non-positive sequence number.
    #[error("message_sequence must be >= 1 (row {row_num} has {sequence})")]
    NonPositiveSequence {
        /// Source row of the offending message
        row_num: usize,
        /// The sequence value found
        sequence: usize,
    },
}

// ============================================================================
// Convenience constructors
// ============================================================================

impl ForensicError {
    pub fn ingest(source: csv::Error, path: Option<PathBuf>) -> Self {
        ForensicError::Ingest { source, path }
    }

    pub fn orphan_rows(count: usize, first_row: usize) -> Self {
        ForensicError::OrphanRows { count, first_row }
    }

    pub fn invalid_config(message: impl Into<String>) -> Self {
        ForensicError::InvalidConfig(message.into())
    }

    pub fn invalid_format(message: impl Into<String>) -> Self {
        ForensicError::InvalidFormat {
            message: message.into(),
        }
    }

    pub fn is_io(&self) -> bool {
        matches!(self, ForensicError::Io(_))
    }

    pub fn is_empty_input(&self) -> bool {
        matches!(self, ForensicError::EmptyInput)
    }

    pub fn is_validation(&self) -> bool {
        matches!(self, ForensicError::Validation(_))
    }

    pub fn is_invalid_config(&self) -> bool {
        matches!(self, ForensicError::InvalidConfig(_))
    }
}
