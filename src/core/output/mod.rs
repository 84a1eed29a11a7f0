//! Table writers.
//!
//! - [`write_csv`] / [`to_csv`] - comma-delimited CSV with a header row
//! - [`write_json`] / [`to_json`] - pretty JSON array - requires `json-output` feature
//! - [`write_jsonl`] / [`to_jsonl`] - one JSON object per line - requires `json-output` feature
//!
//! Every writer is generic over [`TableRow`], so the message table, the
//! conversation summary and the investigation reports share one code path.
//! Writers take rows in the order given and add nothing that depends on the
//! environment, so identical input always yields identical bytes.
//!
//! # Example
//!
//! ```rust
//! use convforensic::config::TransformConfig;
//! use convforensic::core::output::to_csv;
//! use convforensic::core::transform;
//! use convforensic::record::RawTable;
//!
//! let raw = RawTable::from_pairs([(Some("APD1"), None), (Some("a@b.com"), Some("hi"))]);
//! let output = transform(&raw, &TransformConfig::default())?;
//!
//! let csv = to_csv(&output.summaries)?;
//! assert!(csv.starts_with("conv_seq,extraction_group_id,conversation_uid"));
//! # Ok::<(), convforensic::ForensicError>(())
//! ```

mod csv_writer;
#[cfg(feature = "json-output")]
mod json_writer;
#[cfg(feature = "json-output")]
mod jsonl_writer;

pub use csv_writer::{to_csv, write_csv};
#[cfg(feature = "json-output")]
pub use json_writer::{to_json, write_json};
#[cfg(feature = "json-output")]
pub use jsonl_writer::{to_jsonl, write_jsonl};

use crate::core::models::{
    ConversationSummary, MESSAGE_COLUMNS, MessageRecord, SUMMARY_COLUMNS, format_datetime,
};

/// Separator between participant emails in a CSV cell.
pub const PARTICIPANT_SEPARATOR: &str = "|";

/// A row of an output table.
pub trait TableRow: serde::Serialize {
    /// Header, in output order.
    fn columns() -> &'static [&'static str];

    /// Cells as CSV text, aligned with [`columns`](Self::columns).
    /// `None` renders as an empty cell.
    fn csv_record(&self) -> Vec<String>;
}

pub(crate) fn opt(value: Option<&str>) -> String {
    value.unwrap_or_default().to_string()
}

impl TableRow for MessageRecord {
    fn columns() -> &'static [&'static str] {
        MESSAGE_COLUMNS
    }

    fn csv_record(&self) -> Vec<String> {
        vec![
            opt(self.extraction_group_id.as_deref()),
            self.conversation_uid.clone(),
            self.conversation_block_id.to_string(),
            opt(self.conversation_id.as_deref()),
            self.conversation_id_is_uuid.to_string(),
            opt(self.platform_call_id.as_deref()),
            format_datetime(self.conversation_datetime).unwrap_or_default(),
            self.sender_email.clone(),
            self.message_text.clone(),
            self.message_len.to_string(),
            self.message_status.to_string(),
            self.has_deleted_in_conversation.to_string(),
            self.message_sequence.to_string(),
            self.row_num.to_string(),
            self.conv_seq.to_string(),
        ]
    }
}

impl TableRow for ConversationSummary {
    fn columns() -> &'static [&'static str] {
        SUMMARY_COLUMNS
    }

    fn csv_record(&self) -> Vec<String> {
        vec![
            self.conv_seq.to_string(),
            opt(self.extraction_group_id.as_deref()),
            self.conversation_uid.clone(),
            opt(self.conversation_id.as_deref()),
            opt(self.platform_call_id.as_deref()),
            format_datetime(self.conversation_datetime).unwrap_or_default(),
            self.message_count.to_string(),
            self.participants.join(PARTICIPANT_SEPARATOR),
            self.deleted_count.to_string(),
            self.has_deleted_messages.to_string(),
        ]
    }
}
