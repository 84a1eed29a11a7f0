//! Data model of the transform: annotated rows, block metadata, and the two
//! output tables.

use std::fmt;
use std::rc::Rc;

use chrono::NaiveDateTime;
use serde::{Serialize, Serializer};

use crate::parsing::RowKind;
use crate::record::RawRow;

/// Rendering of timestamps in every output format.
pub const DATETIME_OUTPUT_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// `conversation_uid` prefix for rows preceding the first block-start marker.
pub const UNASSIGNED_GROUP: &str = "UNASSIGNED";

/// Column order of the message table.
pub const MESSAGE_COLUMNS: &[&str] = &[
    "extraction_group_id",
    "conversation_uid",
    "conversation_block_id",
    "conversation_id",
    "conversation_id_is_uuid",
    "platform_call_id",
    "conversation_datetime",
    "sender_email",
    "message_text",
    "message_len",
    "message_status",
    "has_deleted_in_conversation",
    "message_sequence",
    "row_num",
    "conv_seq",
];

/// Column order of the conversation summary table.
pub const SUMMARY_COLUMNS: &[&str] = &[
    "conv_seq",
    "extraction_group_id",
    "conversation_uid",
    "conversation_id",
    "platform_call_id",
    "conversation_datetime",
    "message_count",
    "participants",
    "deleted_count",
    "has_deleted_messages",
];

/// Metadata of one block, resolved once and shared by all its rows.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BlockMetadata {
    /// Block index (`conv_seq`).
    pub conv_seq: usize,
    /// `col1` of the block-start row; `None` for block 0.
    pub extraction_group_id: Option<String>,
    /// First `Conversation Identifier:` value in the block.
    pub conversation_id: Option<String>,
    /// First `Platform Call ID:` value in the block.
    pub platform_call_id: Option<String>,
    /// First `Date and time:` value in the block, unparsed.
    pub datetime_raw: Option<String>,
    /// `datetime_raw` parsed with the configured format.
    pub conversation_datetime: Option<NaiveDateTime>,
    /// `row_num` of the first row of the block.
    pub first_row_num: usize,
}

impl BlockMetadata {
    /// `<extraction_group_id>-<conv_seq>`, unique within one export.
    pub fn conversation_uid(&self) -> String {
        format!(
            "{}-{}",
            self.extraction_group_id.as_deref().unwrap_or(UNASSIGNED_GROUP),
            self.conv_seq
        )
    }

    /// `true` if at least one metadata key was found in the block.
    pub fn has_metadata(&self) -> bool {
        self.conversation_id.is_some()
            || self.platform_call_id.is_some()
            || self.datetime_raw.is_some()
    }

    /// `true` if a `Date and time:` value was present but did not parse.
    pub fn has_unparsed_datetime(&self) -> bool {
        self.datetime_raw.is_some() && self.conversation_datetime.is_none()
    }
}

/// A raw row joined with its block index, classification and block metadata.
#[derive(Debug, Clone)]
pub struct AnnotatedRow<'a> {
    /// The untouched source row.
    pub raw: &'a RawRow,
    /// Classification of `raw.col1`.
    pub kind: RowKind,
    /// Number of block-start rows up to and including this one.
    pub conv_seq: usize,
    /// Metadata of the enclosing block.
    pub block: Rc<BlockMetadata>,
}

impl AnnotatedRow<'_> {
    pub fn row_num(&self) -> usize {
        self.raw.row_num()
    }
}

/// Whether a message was retracted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum MessageStatus {
    Normal,
    Deleted,
}

impl MessageStatus {
    pub fn as_str(self) -> &'static str {
        match self {
            MessageStatus::Normal => "normal",
            MessageStatus::Deleted => "deleted",
        }
    }

    pub fn is_deleted(self) -> bool {
        matches!(self, MessageStatus::Deleted)
    }
}

impl fmt::Display for MessageStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One row of the message table.
///
/// Field order matches [`MESSAGE_COLUMNS`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MessageRecord {
    pub extraction_group_id: Option<String>,
    pub conversation_uid: String,
    pub conversation_block_id: usize,
    pub conversation_id: Option<String>,
    pub conversation_id_is_uuid: bool,
    pub platform_call_id: Option<String>,
    #[serde(serialize_with = "serialize_datetime")]
    pub conversation_datetime: Option<NaiveDateTime>,
    pub sender_email: String,
    pub message_text: String,
    pub message_len: usize,
    pub message_status: MessageStatus,
    pub has_deleted_in_conversation: bool,
    pub message_sequence: usize,
    pub row_num: usize,
    pub conv_seq: usize,
}

impl MessageRecord {
    pub fn is_deleted(&self) -> bool {
        self.message_status.is_deleted()
    }
}

/// One row of the conversation summary table.
///
/// Field order matches [`SUMMARY_COLUMNS`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ConversationSummary {
    pub conv_seq: usize,
    pub extraction_group_id: Option<String>,
    pub conversation_uid: String,
    pub conversation_id: Option<String>,
    pub platform_call_id: Option<String>,
    #[serde(serialize_with = "serialize_datetime")]
    pub conversation_datetime: Option<NaiveDateTime>,
    pub message_count: usize,
    /// Distinct sender emails, sorted.
    pub participants: Vec<String>,
    pub deleted_count: usize,
    pub has_deleted_messages: bool,
}

/// Renders an optional timestamp with [`DATETIME_OUTPUT_FORMAT`].
pub fn format_datetime(ts: Option<NaiveDateTime>) -> Option<String> {
    ts.map(|ts| ts.format(DATETIME_OUTPUT_FORMAT).to_string())
}

#[allow(clippy::ref_option)]
pub(crate) fn serialize_datetime<S>(
    ts: &Option<NaiveDateTime>,
    serializer: S,
) -> Result<S::Ok, S::Error>
where
    S: Serializer,
{
    match format_datetime(*ts) {
        Some(s) => serializer.serialize_some(&s),
        None => serializer.serialize_none(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    #[test]
    fn test_conversation_uid() {
        let block = BlockMetadata {
            conv_seq: 4,
            extraction_group_id: Some("APD137".into()),
            ..BlockMetadata::default()
        };
        assert_eq!(block.conversation_uid(), "APD137-4");
    }

    #[test]
    fn test_unassigned_uid() {
        let block = BlockMetadata::default();
        assert_eq!(block.conversation_uid(), "UNASSIGNED-0");
    }

    #[test]
    fn test_unparsed_datetime_flag() {
        let mut block = BlockMetadata {
            datetime_raw: Some("garbage".into()),
            ..BlockMetadata::default()
        };
        assert!(block.has_unparsed_datetime());
        block.conversation_datetime = NaiveDate::from_ymd_opt(2019, 10, 10)
            .unwrap()
            .and_hms_opt(16, 10, 12);
        assert!(!block.has_unparsed_datetime());
    }

    #[test]
    fn test_status_display() {
        assert_eq!(MessageStatus::Normal.to_string(), "normal");
        assert_eq!(MessageStatus::Deleted.to_string(), "deleted");
        assert!(MessageStatus::Deleted.is_deleted());
    }

    #[test]
    fn test_columns_match_fields() {
        let record = MessageRecord {
            extraction_group_id: Some("APD1".into()),
            conversation_uid: "APD1-1".into(),
            conversation_block_id: 1,
            conversation_id: None,
            conversation_id_is_uuid: false,
            platform_call_id: None,
            conversation_datetime: None,
            sender_email: "a@b.com".into(),
            message_text: "hi".into(),
            message_len: 2,
            message_status: MessageStatus::Normal,
            has_deleted_in_conversation: false,
            message_sequence: 1,
            row_num: 2,
            conv_seq: 1,
        };
        let value = serde_json::to_value(&record).unwrap();
        let keys: Vec<&str> = value
            .as_object()
            .unwrap()
            .keys()
            .map(String::as_str)
            .collect();
        for column in MESSAGE_COLUMNS {
            assert!(keys.contains(column), "missing {column}");
        }
        assert_eq!(keys.len(), MESSAGE_COLUMNS.len());
        assert_eq!(value["conversation_datetime"], serde_json::Value::Null);
        assert_eq!(value["message_status"], "normal");
    }
}
