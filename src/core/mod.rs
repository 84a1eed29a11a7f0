//! Core transform logic.
//!
//! This module contains:
//! - [`segment`] - Block segmentation and metadata propagation
//! - [`materialize`] - Message rows, forensic flags and conversation summaries
//! - [`pipeline`] - The [`transform`] entry point and [`TransformStats`]
//! - [`validate`] - The gate run before anything is persisted
//! - [`models`] - Output table types and column orders
//! - [`output`] - Format writers (CSV, JSON, JSONL)
//! - `report` - Investigation reports (feature `reports`)
//!
//! # Quick Start
//!
//! ```rust
//! use convforensic::config::TransformConfig;
//! use convforensic::core::{TransformOutput, to_csv, transform, validate_messages};
//! use convforensic::record::RawTable;
//!
//! let raw = RawTable::from_pairs([(Some("APD1"), None), (Some("a@b.com"), Some("hi"))]);
//! let TransformOutput { messages, summaries, .. } = transform(&raw, &TransformConfig::default())?;
//! validate_messages(&messages)?;
//!
//! let csv = to_csv(&summaries)?;
//! assert!(csv.starts_with("conv_seq,"));
//! # Ok::<(), convforensic::ForensicError>(())
//! ```

pub mod materialize;
pub mod models;
pub mod output;
pub mod pipeline;
#[cfg(feature = "reports")]
pub mod report;
pub mod segment;
pub mod validate;

pub use models::{ConversationSummary, MessageRecord, MessageStatus};
pub use output::{TableRow, to_csv, write_csv};
#[cfg(feature = "json-output")]
pub use output::{to_json, to_jsonl, write_json, write_jsonl};
pub use pipeline::{TransformOutput, TransformStats, transform};
pub use validate::{validate_columns, validate_messages};
