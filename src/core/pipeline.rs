//! The transform entry point: raw table in, message table and conversation
//! summary out.

use std::fmt;

use serde::Serialize;
use tracing::{info, warn};

use crate::config::{OrphanPolicy, TransformConfig};
use crate::core::materialize::{materialize_messages, summarize_conversations};
use crate::core::models::{ConversationSummary, MessageRecord};
use crate::core::segment::segment;
use crate::error::{ForensicError, Result};
use crate::parsing::is_uuid_v4;
use crate::record::RawTable;

/// Counters describing one transform run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct TransformStats {
    pub raw_rows: usize,
    pub blocks: usize,
    pub message_rows: usize,
    pub conversations: usize,
    pub deleted_messages: usize,
    pub orphan_rows: usize,
    pub blocks_without_messages: usize,
    /// Blocks carrying none of the three metadata keys.
    pub blocks_without_metadata: usize,
    pub unparsed_datetimes: usize,
    pub non_uuid_conversation_ids: usize,
}

impl TransformStats {
    /// Share of raw rows that became messages, in percent.
    pub fn message_ratio(&self) -> f64 {
        if self.raw_rows == 0 {
            return 0.0;
        }
        self.message_rows as f64 / self.raw_rows as f64 * 100.0
    }
}

impl fmt::Display for TransformStats {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} raw rows, {} blocks, {} messages in {} conversations ({} deleted)",
            self.raw_rows, self.blocks, self.message_rows, self.conversations, self.deleted_messages
        )
    }
}

/// Result of [`transform`].
#[derive(Debug, Clone, PartialEq)]
pub struct TransformOutput {
    /// Message table, in `row_num` order.
    pub messages: Vec<MessageRecord>,
    /// Conversation summary, in `conv_seq` order.
    pub summaries: Vec<ConversationSummary>,
    pub stats: TransformStats,
}

/// Transforms a raw export into the message table and conversation summary.
///
/// Fails only on structural problems: an invalid configuration, an empty
/// table, or orphan rows under [`OrphanPolicy::Reject`].
///
/// # Example
///
/// ```
/// use convforensic::config::TransformConfig;
/// use convforensic::core::transform;
/// use convforensic::record::RawTable;
///
/// let raw = RawTable::from_pairs([
///     (Some("APD1"), None),
///     (Some("Conversation Identifier:"), Some("uuid-1")),
///     (Some("a@b.com"), Some("hello")),
///     (Some("c@d.com"), Some("[Deleted Message]")),
/// ]);
///
/// let output = transform(&raw, &TransformConfig::default())?;
/// assert_eq!(output.messages.len(), 2);
/// assert!(output.summaries[0].has_deleted_messages);
/// # Ok::<(), convforensic::ForensicError>(())
/// ```
pub fn transform(raw: &RawTable, config: &TransformConfig) -> Result<TransformOutput> {
    config.validate()?;
    if raw.is_empty() {
        return Err(ForensicError::EmptyInput);
    }

    let mut segmented = segment(raw, config);

    let orphan_rows = segmented.orphan_rows().count();
    if orphan_rows > 0 {
        let first_row = segmented.rows()[0].row_num();
        match config.orphan_policy {
            OrphanPolicy::Reject => {
                return Err(ForensicError::orphan_rows(orphan_rows, first_row));
            }
            OrphanPolicy::Discard => {
                warn!(orphan_rows, first_row, "discarding rows before first block marker");
                segmented = segmented.without_orphans();
            }
            OrphanPolicy::Keep => {
                warn!(
                    orphan_rows,
                    first_row, "rows before first block marker kept as unassigned conversation"
                );
            }
        }
    }

    let messages = materialize_messages(&segmented, config);
    let summaries = summarize_conversations(&messages);

    let stats = TransformStats {
        raw_rows: raw.len(),
        blocks: segmented.block_count(),
        message_rows: messages.len(),
        conversations: summaries.len(),
        deleted_messages: messages.iter().filter(|m| m.is_deleted()).count(),
        orphan_rows,
        blocks_without_messages: segmented
            .blocks()
            .filter(|b| b.conv_seq > 0)
            .filter(|b| summaries.binary_search_by_key(&b.conv_seq, |s| s.conv_seq).is_err())
            .count(),
        blocks_without_metadata: segmented
            .blocks()
            .filter(|b| b.conv_seq > 0 && !b.has_metadata())
            .count(),
        unparsed_datetimes: segmented.blocks().filter(|b| b.has_unparsed_datetime()).count(),
        non_uuid_conversation_ids: summaries
            .iter()
            .filter(|s| s.conversation_id.as_deref().is_some_and(|id| !is_uuid_v4(id)))
            .count(),
    };

    info!(
        raw_rows = stats.raw_rows,
        blocks = stats.blocks,
        messages = stats.message_rows,
        conversations = stats.conversations,
        deleted = stats.deleted_messages,
        "transform complete"
    );

    Ok(TransformOutput {
        messages,
        summaries,
        stats,
    })
}
