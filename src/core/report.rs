//! Investigation reports over the clean message table.
//!
//! Each report is a plain grouping over [`MessageRecord`]s: deletions per
//! conversation, participant activity, conversation volume, hourly
//! timeline, inter-message gaps, conversation duration and burst activity.
//! Ties are broken by identifier so every report is deterministic.
//!
//! # Example
//!
//! ```
//! use convforensic::config::TransformConfig;
//! use convforensic::core::report::participant_activity;
//! use convforensic::core::transform;
//! use convforensic::record::RawTable;
//!
//! let raw = RawTable::from_pairs([
//!     (Some("APD1"), None),
//!     (Some("a@b.com"), Some("hi")),
//!     (Some("a@b.com"), Some("again")),
//!     (Some("c@d.com"), Some("yo")),
//! ]);
//! let output = transform(&raw, &TransformConfig::default())?;
//!
//! let activity = participant_activity(&output.messages);
//! assert_eq!(activity[0].sender_email, "a@b.com");
//! assert_eq!(activity[0].message_count, 2);
//! # Ok::<(), convforensic::ForensicError>(())
//! ```

use std::collections::{BTreeMap, BTreeSet};
use std::fs;
use std::path::{Path, PathBuf};

use chrono::{NaiveDateTime, Timelike};
use serde::{Serialize, Serializer};
use tracing::info;

use crate::core::models::{
    DATETIME_OUTPUT_FORMAT, MessageRecord, MessageStatus, format_datetime, serialize_datetime,
};
use crate::core::output::{TableRow, opt, write_csv};
use crate::error::Result;

/// Default gap, in seconds, under which a message counts as part of a burst.
pub const DEFAULT_BURST_THRESHOLD_SECONDS: i64 = 60;

/// Conversations containing at least one deleted message.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DeletedConversation {
    pub conversation_uid: String,
    pub deleted_message_count: usize,
    pub total_messages: usize,
}

/// Message count per sender.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ParticipantActivity {
    pub sender_email: String,
    pub message_count: usize,
    pub conversations_involved: usize,
}

/// Message volume per conversation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ConversationVolume {
    pub conversation_uid: String,
    pub message_count: usize,
    pub participant_count: usize,
    pub has_deleted: bool,
}

/// Messages per hour.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TimelineBucket {
    #[serde(serialize_with = "serialize_hour")]
    pub hour: NaiveDateTime,
    pub message_count: usize,
}

/// Gap to the previous message of the same conversation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MessageTimeGap {
    pub conversation_uid: String,
    pub sender_email: String,
    #[serde(serialize_with = "serialize_datetime")]
    pub conversation_datetime: Option<NaiveDateTime>,
    pub message_sequence: usize,
    pub time_gap_seconds: Option<i64>,
    pub message_status: MessageStatus,
}

/// First and last timestamp of a conversation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ConversationDuration {
    pub conversation_uid: String,
    #[serde(serialize_with = "serialize_datetime")]
    pub conversation_start: Option<NaiveDateTime>,
    #[serde(serialize_with = "serialize_datetime")]
    pub conversation_end: Option<NaiveDateTime>,
    pub message_count: usize,
    pub participant_count: usize,
    pub has_deleted: bool,
    pub conversation_duration_seconds: Option<i64>,
}

/// Share of messages sent within the burst threshold of their predecessor.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BurstActivity {
    pub conversation_uid: String,
    pub burst_message_count: usize,
    pub total_messages: usize,
    pub burst_ratio: f64,
    pub burst_threshold_seconds: i64,
}

fn serialize_hour<S: Serializer>(
    hour: &NaiveDateTime,
    serializer: S,
) -> std::result::Result<S::Ok, S::Error> {
    serializer.serialize_str(&hour.format(DATETIME_OUTPUT_FORMAT).to_string())
}

/// Per-conversation accumulator shared by several reports.
#[derive(Default)]
struct ConversationStats<'a> {
    messages: usize,
    deleted: usize,
    senders: BTreeSet<&'a str>,
    start: Option<NaiveDateTime>,
    end: Option<NaiveDateTime>,
}

fn by_conversation(messages: &[MessageRecord]) -> BTreeMap<&str, ConversationStats<'_>> {
    let mut groups: BTreeMap<&str, ConversationStats<'_>> = BTreeMap::new();
    for message in messages {
        let entry = groups.entry(message.conversation_uid.as_str()).or_default();
        entry.messages += 1;
        if message.is_deleted() {
            entry.deleted += 1;
        }
        entry.senders.insert(message.sender_email.as_str());
        if let Some(ts) = message.conversation_datetime {
            entry.start = Some(entry.start.map_or(ts, |s| s.min(ts)));
            entry.end = Some(entry.end.map_or(ts, |e| e.max(ts)));
        }
    }
    groups
}

/// Conversations with deletions, most deletions first.
pub fn deleted_conversations(messages: &[MessageRecord]) -> Vec<DeletedConversation> {
    let mut rows: Vec<DeletedConversation> = by_conversation(messages)
        .into_iter()
        .filter(|(_, stats)| stats.deleted > 0)
        .map(|(uid, stats)| DeletedConversation {
            conversation_uid: uid.to_string(),
            deleted_message_count: stats.deleted,
            total_messages: stats.messages,
        })
        .collect();
    // BTreeMap order is the tie-break; the sort is stable.
    rows.sort_by(|a, b| b.deleted_message_count.cmp(&a.deleted_message_count));
    rows
}

/// Messages and conversations per sender, most active first.
pub fn participant_activity(messages: &[MessageRecord]) -> Vec<ParticipantActivity> {
    let mut groups: BTreeMap<&str, (usize, BTreeSet<&str>)> = BTreeMap::new();
    for message in messages {
        let (count, conversations) = groups.entry(message.sender_email.as_str()).or_default();
        *count += 1;
        conversations.insert(message.conversation_uid.as_str());
    }

    let mut rows: Vec<ParticipantActivity> = groups
        .into_iter()
        .map(|(sender, (count, conversations))| ParticipantActivity {
            sender_email: sender.to_string(),
            message_count: count,
            conversations_involved: conversations.len(),
        })
        .collect();
    rows.sort_by(|a, b| b.message_count.cmp(&a.message_count));
    rows
}

/// Message and participant counts per conversation, largest first.
pub fn conversation_volume(messages: &[MessageRecord]) -> Vec<ConversationVolume> {
    let mut rows: Vec<ConversationVolume> = by_conversation(messages)
        .into_iter()
        .map(|(uid, stats)| ConversationVolume {
            conversation_uid: uid.to_string(),
            message_count: stats.messages,
            participant_count: stats.senders.len(),
            has_deleted: stats.deleted > 0,
        })
        .collect();
    rows.sort_by(|a, b| b.message_count.cmp(&a.message_count));
    rows
}

/// Messages per hour, oldest first. Messages without a timestamp are skipped.
pub fn timeline_activity(messages: &[MessageRecord]) -> Vec<TimelineBucket> {
    let mut buckets: BTreeMap<NaiveDateTime, usize> = BTreeMap::new();
    for ts in messages.iter().filter_map(|m| m.conversation_datetime) {
        if let Some(hour) = ts.date().and_hms_opt(ts.hour(), 0, 0) {
            *buckets.entry(hour).or_default() += 1;
        }
    }
    buckets
        .into_iter()
        .map(|(hour, message_count)| TimelineBucket {
            hour,
            message_count,
        })
        .collect()
}

/// Gap to the previous message within each conversation.
///
/// Messages are ordered by conversation, then timestamp (missing last),
/// then `message_sequence`. The first message of a conversation, and any
/// message where either timestamp is missing, has no gap.
pub fn message_time_gaps(messages: &[MessageRecord]) -> Vec<MessageTimeGap> {
    let mut ordered: Vec<&MessageRecord> = messages.iter().collect();
    ordered.sort_by(|a, b| {
        a.conversation_uid
            .cmp(&b.conversation_uid)
            .then_with(|| {
                (a.conversation_datetime.is_none(), a.conversation_datetime)
                    .cmp(&(b.conversation_datetime.is_none(), b.conversation_datetime))
            })
            .then_with(|| a.message_sequence.cmp(&b.message_sequence))
    });

    let mut previous: Option<&MessageRecord> = None;
    ordered
        .into_iter()
        .map(|message| {
            let time_gap_seconds = previous
                .filter(|p| p.conversation_uid == message.conversation_uid)
                .and_then(|p| p.conversation_datetime)
                .zip(message.conversation_datetime)
                .map(|(prev, cur)| (cur - prev).num_seconds());
            previous = Some(message);
            MessageTimeGap {
                conversation_uid: message.conversation_uid.clone(),
                sender_email: message.sender_email.clone(),
                conversation_datetime: message.conversation_datetime,
                message_sequence: message.message_sequence,
                time_gap_seconds,
                message_status: message.message_status,
            }
        })
        .collect()
}

/// Start, end and length of every conversation.
pub fn conversation_duration(messages: &[MessageRecord]) -> Vec<ConversationDuration> {
    by_conversation(messages)
        .into_iter()
        .map(|(uid, stats)| ConversationDuration {
            conversation_uid: uid.to_string(),
            conversation_start: stats.start,
            conversation_end: stats.end,
            message_count: stats.messages,
            participant_count: stats.senders.len(),
            has_deleted: stats.deleted > 0,
            conversation_duration_seconds: stats
                .start
                .zip(stats.end)
                .map(|(start, end)| (end - start).num_seconds()),
        })
        .collect()
}

/// Burst messages per conversation: gap to the previous message at most
/// `threshold_seconds`.
pub fn burst_activity(messages: &[MessageRecord], threshold_seconds: i64) -> Vec<BurstActivity> {
    let mut groups: BTreeMap<String, (usize, usize)> = BTreeMap::new();
    for gap in message_time_gaps(messages) {
        let (bursts, total) = groups.entry(gap.conversation_uid).or_default();
        *total += 1;
        if gap.time_gap_seconds.is_some_and(|s| s <= threshold_seconds) {
            *bursts += 1;
        }
    }

    groups
        .into_iter()
        .map(|(uid, (bursts, total))| BurstActivity {
            conversation_uid: uid,
            burst_message_count: bursts,
            total_messages: total,
            burst_ratio: bursts as f64 / total as f64,
            burst_threshold_seconds: threshold_seconds,
        })
        .collect()
}

/// Writes every report as CSV into `dir`, returning the written paths.
pub fn write_reports(dir: impl AsRef<Path>, messages: &[MessageRecord]) -> Result<Vec<PathBuf>> {
    let dir = dir.as_ref();
    fs::create_dir_all(dir)?;

    let mut written = Vec::new();
    emit(
        dir,
        "conversations_with_deleted_messages.csv",
        &deleted_conversations(messages),
        &mut written,
    )?;
    emit(dir, "participant_activity.csv", &participant_activity(messages), &mut written)?;
    emit(dir, "conversation_volume.csv", &conversation_volume(messages), &mut written)?;
    emit(dir, "timeline_activity.csv", &timeline_activity(messages), &mut written)?;
    emit(dir, "message_time_gaps.csv", &message_time_gaps(messages), &mut written)?;
    emit(dir, "conversation_duration.csv", &conversation_duration(messages), &mut written)?;
    emit(
        dir,
        "burst_activity.csv",
        &burst_activity(messages, DEFAULT_BURST_THRESHOLD_SECONDS),
        &mut written,
    )?;

    info!(reports = written.len(), dir = %dir.display(), "investigation reports written");
    Ok(written)
}

fn emit<T: TableRow>(
    dir: &Path,
    name: &str,
    rows: &[T],
    written: &mut Vec<PathBuf>,
) -> Result<()> {
    let path = dir.join(name);
    write_csv(rows, &path)?;
    written.push(path);
    Ok(())
}

// ============================================================================
// CSV rendering
// ============================================================================

fn opt_num(value: Option<i64>) -> String {
    value.map(|v| v.to_string()).unwrap_or_default()
}

impl TableRow for DeletedConversation {
    fn columns() -> &'static [&'static str] {
        &["conversation_uid", "deleted_message_count", "total_messages"]
    }

    fn csv_record(&self) -> Vec<String> {
        vec![
            self.conversation_uid.clone(),
            self.deleted_message_count.to_string(),
            self.total_messages.to_string(),
        ]
    }
}

impl TableRow for ParticipantActivity {
    fn columns() -> &'static [&'static str] {
        &["sender_email", "message_count", "conversations_involved"]
    }

    fn csv_record(&self) -> Vec<String> {
        vec![
            self.sender_email.clone(),
            self.message_count.to_string(),
            self.conversations_involved.to_string(),
        ]
    }
}

impl TableRow for ConversationVolume {
    fn columns() -> &'static [&'static str] {
        &["conversation_uid", "message_count", "participant_count", "has_deleted"]
    }

    fn csv_record(&self) -> Vec<String> {
        vec![
            self.conversation_uid.clone(),
            self.message_count.to_string(),
            self.participant_count.to_string(),
            self.has_deleted.to_string(),
        ]
    }
}

impl TableRow for TimelineBucket {
    fn columns() -> &'static [&'static str] {
        &["hour", "message_count"]
    }

    fn csv_record(&self) -> Vec<String> {
        vec![
            self.hour.format(DATETIME_OUTPUT_FORMAT).to_string(),
            self.message_count.to_string(),
        ]
    }
}

impl TableRow for MessageTimeGap {
    fn columns() -> &'static [&'static str] {
        &[
            "conversation_uid",
            "sender_email",
            "conversation_datetime",
            "message_sequence",
            "time_gap_seconds",
            "message_status",
        ]
    }

    fn csv_record(&self) -> Vec<String> {
        vec![
            self.conversation_uid.clone(),
            self.sender_email.clone(),
            opt(format_datetime(self.conversation_datetime).as_deref()),
            self.message_sequence.to_string(),
            opt_num(self.time_gap_seconds),
            self.message_status.to_string(),
        ]
    }
}

impl TableRow for ConversationDuration {
    fn columns() -> &'static [&'static str] {
        &[
            "conversation_uid",
            "conversation_start",
            "conversation_end",
            "message_count",
            "participant_count",
            "has_deleted",
            "conversation_duration_seconds",
        ]
    }

    fn csv_record(&self) -> Vec<String> {
        vec![
            self.conversation_uid.clone(),
            opt(format_datetime(self.conversation_start).as_deref()),
            opt(format_datetime(self.conversation_end).as_deref()),
            self.message_count.to_string(),
            self.participant_count.to_string(),
            self.has_deleted.to_string(),
            opt_num(self.conversation_duration_seconds),
        ]
    }
}

impl TableRow for BurstActivity {
    fn columns() -> &'static [&'static str] {
        &[
            "conversation_uid",
            "burst_message_count",
            "total_messages",
            "burst_ratio",
            "burst_threshold_seconds",
        ]
    }

    fn csv_record(&self) -> Vec<String> {
        vec![
            self.conversation_uid.clone(),
            self.burst_message_count.to_string(),
            self.total_messages.to_string(),
            format!("{:.4}", self.burst_ratio),
            self.burst_threshold_seconds.to_string(),
        ]
    }
}
