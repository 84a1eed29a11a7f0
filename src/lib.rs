//! # convforensic
//!
//! Recovers a normalized message table and a conversation summary from a
//! corrupted two-column conversation export.
//!
//! ## Overview
//!
//! The raw export is a flat stream of `(col1, col2)` rows. Conversations
//! are delimited only by block-start markers (`APD<digits>`), metadata
//! (`Conversation Identifier:`, `Platform Call ID:`, `Date and time:`) may
//! appear anywhere inside a block, and message rows are recognized by an
//! email address in the first column. The transform:
//!
//! - segments rows into blocks and propagates each block's metadata to all
//!   of its rows;
//! - keeps only message rows, numbering them within their block;
//! - derives forensic flags (deleted status, deleted-anywhere in the
//!   conversation, UUID shape of the conversation identifier);
//! - summarizes every conversation.
//!
//! Every output row keeps the `row_num` of the raw row it came from, so any
//! finding can be traced back to the evidence.
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use convforensic::prelude::*;
//!
//! fn main() -> Result<()> {
//!     let raw = read_raw_csv("raw_export.csv")?;
//!     let output = transform(&raw, &TransformConfig::default())?;
//!     validate_messages(&output.messages)?;
//!
//!     write_csv(&output.messages, "clean_messages.csv")?;
//!     write_csv(&output.summaries, "conversation_summary.csv")?;
//!     Ok(())
//! }
//! ```
//!
//! ## Module Structure
//!
//! - [`record`] - [`RawRow`](record::RawRow) and [`RawTable`](record::RawTable)
//! - [`ingest`] - reading the raw CSV export
//! - [`parsing`] - row classification, identifier patterns, datetime parsing
//! - [`config`] - [`TransformConfig`](config::TransformConfig) and [`OrphanPolicy`](config::OrphanPolicy)
//! - [`core`] - segmentation, materialization, validation, writers, reports
//! - [`format`] - [`OutputFormat`](format::OutputFormat) and format dispatch
//! - [`error`] - [`ForensicError`] and [`Result`]
//! - `cli`, `logging` - command-line surface (feature `cli`)
//! - [`prelude`] - convenient re-exports

#[cfg(feature = "cli")]
pub mod cli;
pub mod config;
pub mod core;
pub mod error;
pub mod format;
pub mod ingest;
#[cfg(feature = "cli")]
pub mod logging;
pub mod parsing;
pub mod record;

pub use error::{ForensicError, Result};

/// Convenient re-exports for common usage.
///
/// ```rust
/// use convforensic::prelude::*;
/// ```
pub mod prelude {
    pub use crate::error::{ForensicError, Result, ValidationError};

    pub use crate::config::{OrphanPolicy, TransformConfig};
    pub use crate::ingest::{parse_raw_csv_str, read_raw_csv};
    pub use crate::record::{RawRow, RawTable};

    pub use crate::core::models::{ConversationSummary, MessageRecord, MessageStatus};
    pub use crate::core::{TransformOutput, TransformStats, transform, validate_messages};

    pub use crate::core::output::{TableRow, to_csv, write_csv};
    #[cfg(feature = "json-output")]
    pub use crate::core::output::{to_json, to_jsonl, write_json, write_jsonl};

    pub use crate::format::{OutputFormat, write_table};
}
