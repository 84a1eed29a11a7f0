//! Message materialization, forensic flags and conversation summaries.
//!
//! Only rows classified as [`RowKind::Message`](crate::parsing::RowKind) become
//! messages. Every other row (markers, metadata, separators) is dropped
//! here but stays reachable through the `row_num` of the surviving rows.
//!
//! Per-block reductions (sequence numbering, the deleted-anywhere flag,
//! the summary) iterate rows in `row_num` order and group by `conv_seq`
//! with ordered maps, so the output never depends on hash iteration order.

use std::collections::{BTreeMap, BTreeSet};

use tracing::debug;

use crate::config::TransformConfig;
use crate::core::models::{ConversationSummary, MessageRecord, MessageStatus};
use crate::core::segment::SegmentedExport;
use crate::parsing::is_uuid_v4;

/// Builds the message table from segmented rows.
///
/// Messages are returned in `row_num` order.
pub fn materialize_messages(
    segmented: &SegmentedExport<'_>,
    config: &TransformConfig,
) -> Vec<MessageRecord> {
    let mut sequence_by_block: BTreeMap<usize, usize> = BTreeMap::new();

    let mut messages: Vec<MessageRecord> = segmented
        .rows()
        .iter()
        .filter(|row| row.kind.is_message())
        .map(|row| {
            let block = &row.block;
            let sender_email = row.raw.col1().unwrap_or_default().to_string();
            let message_text = row.raw.col2().unwrap_or_default().to_string();
            let message_status = if message_text == config.deleted_marker {
                MessageStatus::Deleted
            } else {
                MessageStatus::Normal
            };

            let sequence = sequence_by_block.entry(row.conv_seq).or_insert(0);
            *sequence += 1;

            MessageRecord {
                extraction_group_id: block.extraction_group_id.clone(),
                conversation_uid: block.conversation_uid(),
                conversation_block_id: row.conv_seq,
                conversation_id: block.conversation_id.clone(),
                conversation_id_is_uuid: block.conversation_id.as_deref().is_some_and(is_uuid_v4),
                platform_call_id: block.platform_call_id.clone(),
                conversation_datetime: block.conversation_datetime,
                message_len: message_text.chars().count(),
                sender_email,
                message_text,
                message_status,
                has_deleted_in_conversation: false,
                message_sequence: *sequence,
                row_num: row.row_num(),
                conv_seq: row.conv_seq,
            }
        })
        .collect();

    // Block-wide reduction, then broadcast.
    let blocks_with_deleted: BTreeSet<usize> = messages
        .iter()
        .filter(|m| m.is_deleted())
        .map(|m| m.conv_seq)
        .collect();
    for message in &mut messages {
        message.has_deleted_in_conversation = blocks_with_deleted.contains(&message.conv_seq);
    }

    debug!(
        messages = messages.len(),
        blocks_with_deleted = blocks_with_deleted.len(),
        "messages materialized"
    );

    messages
}

/// Groups a finished message table into one summary row per `conv_seq`.
///
/// Blocks without messages produce no summary row.
pub fn summarize_conversations(messages: &[MessageRecord]) -> Vec<ConversationSummary> {
    let mut groups: BTreeMap<usize, (ConversationSummary, BTreeSet<&str>)> = BTreeMap::new();

    for message in messages {
        let (summary, participants) = groups.entry(message.conv_seq).or_insert_with(|| {
            (
                ConversationSummary {
                    conv_seq: message.conv_seq,
                    extraction_group_id: message.extraction_group_id.clone(),
                    conversation_uid: message.conversation_uid.clone(),
                    conversation_id: message.conversation_id.clone(),
                    platform_call_id: message.platform_call_id.clone(),
                    conversation_datetime: message.conversation_datetime,
                    message_count: 0,
                    participants: Vec::new(),
                    deleted_count: 0,
                    has_deleted_messages: false,
                },
                BTreeSet::new(),
            )
        });

        summary.message_count += 1;
        if message.is_deleted() {
            summary.deleted_count += 1;
        }
        participants.insert(message.sender_email.as_str());
    }

    groups
        .into_values()
        .map(|(mut summary, participants)| {
            summary.participants = participants.into_iter().map(str::to_string).collect();
            summary.has_deleted_messages = summary.deleted_count > 0;
            summary
        })
        .collect()
}
