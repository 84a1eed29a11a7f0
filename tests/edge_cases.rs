//! Edge case tests for damaged and unusual exports.

use convforensic::prelude::*;

fn transform_str(csv: &str) -> Result<TransformOutput> {
    let raw = parse_raw_csv_str(csv)?;
    transform(&raw, &TransformConfig::default())
}

// =========================================================================
// Structural edge cases
// =========================================================================

#[test]
fn test_empty_export_is_fatal() {
    let err = transform_str("").unwrap_err();
    assert!(err.is_empty_input());
}

#[test]
fn test_only_blank_rows() {
    let output = transform_str(",\n,\n").unwrap();
    assert!(output.messages.is_empty());
    assert!(output.summaries.is_empty());
    assert_eq!(output.stats.orphan_rows, 2);
}

#[test]
fn test_markers_only() {
    let output = transform_str("APD1,\nAPD2,\nAPD3,\n").unwrap();
    assert!(output.messages.is_empty());
    assert_eq!(output.stats.blocks, 3);
    assert_eq!(output.stats.blocks_without_messages, 3);
    assert_eq!(output.stats.blocks_without_metadata, 3);
}

#[test]
fn test_single_column_rows() {
    let output = transform_str("APD1\na@b.com\n").unwrap();
    assert_eq!(output.messages.len(), 1);
    assert_eq!(output.messages[0].message_text, "");
    assert_eq!(output.messages[0].message_len, 0);
}

#[test]
fn test_extra_columns_ignored() {
    let output = transform_str("APD1,,junk\na@b.com,hi,extra,more\n").unwrap();
    assert_eq!(output.messages[0].message_text, "hi");
}

// =========================================================================
// Block marker edge cases
// =========================================================================

#[test]
fn test_marker_must_be_exact() {
    let output = transform_str(
        "APD1,\n apd2,\nAPD3 ,\nAPD,\nAPDx1,\nXAPD4,\napd5,\na@b.com,hi\n",
    )
    .unwrap();
    assert_eq!(output.stats.blocks, 1);
    assert_eq!(output.messages[0].conversation_uid, "APD1-1");
}

#[test]
fn test_reused_marker_creates_distinct_conversations() {
    let output = transform_str("APD7,\na@b.com,one\nAPD7,\na@b.com,two\n").unwrap();
    let uids: Vec<&str> = output
        .messages
        .iter()
        .map(|m| m.conversation_uid.as_str())
        .collect();
    assert_eq!(uids, vec!["APD7-1", "APD7-2"]);
    assert_eq!(output.summaries.len(), 2);
    assert!(output.messages.iter().all(|m| m.message_sequence == 1));
}

// =========================================================================
// Metadata edge cases
// =========================================================================

#[test]
fn test_metadata_key_requires_exact_literal() {
    let output = transform_str(
        "APD1,\nconversation identifier:,x\nConversation Identifier,y\n Conversation Identifier:,z\na@b.com,hi\n",
    )
    .unwrap();
    assert_eq!(output.messages[0].conversation_id, None);
}

#[test]
fn test_duplicate_metadata_first_wins() {
    let output = transform_str(
        "APD1,\nPlatform Call ID:,first\na@b.com,hi\nPlatform Call ID:,second\n",
    )
    .unwrap();
    assert_eq!(output.messages[0].platform_call_id.as_deref(), Some("first"));
}

#[test]
fn test_metadata_never_crosses_blocks() {
    let output = transform_str(
        "APD1,\nConversation Identifier:,c1\nAPD2,\na@b.com,hi\n",
    )
    .unwrap();
    assert_eq!(output.messages[0].conversation_id, None);
}

#[test]
fn test_metadata_row_is_never_a_message() {
    // The value cell holds an email; col1 is the key literal.
    let output = transform_str("APD1,\nConversation Identifier:,x@y.com\n").unwrap();
    assert!(output.messages.is_empty());
}

// =========================================================================
// Datetime edge cases
// =========================================================================

#[test]
fn test_datetime_variants() {
    let cases = [
        ("10/10/19 4:10:12 PM", Some("2019-10-10 16:10:12")),
        ("10/10/19 04:10:12 PM", Some("2019-10-10 16:10:12")),
        ("01/01/20 12:00:00 AM", Some("2020-01-01 00:00:00")),
        ("01/01/20 12:00:00 PM", Some("2020-01-01 12:00:00")),
        ("2019-10-10 16:10:12", None),
        ("13/40/19 4:10:12 PM", None),
        ("10/10/19 16:10:12", None),
        ("", None),
    ];

    for (value, expected) in cases {
        let csv = format!("APD1,\nDate and time:,{value}\na@b.com,hi\n");
        let output = transform_str(&csv).unwrap();
        let got = output.messages[0]
            .conversation_datetime
            .map(|d| d.format("%Y-%m-%d %H:%M:%S").to_string());
        assert_eq!(got.as_deref(), expected, "input {value:?}");
    }
}

#[test]
fn test_custom_datetime_format() {
    let raw = parse_raw_csv_str("APD1,\nDate and time:,2019-10-10T16:10:12\na@b.com,hi\n").unwrap();
    let config = TransformConfig::new().with_datetime_format("%Y-%m-%dT%H:%M:%S");
    let output = transform(&raw, &config).unwrap();
    assert!(output.messages[0].conversation_datetime.is_some());
}

// =========================================================================
// Message edge cases
// =========================================================================

#[test]
fn test_email_shapes() {
    let csv = "APD1,\n\
               a@b.com,ok\n\
               first.last+tag@sub.example.co.uk,ok\n\
               a@b,no tld\n\
               a@b.c,short tld\n\
               @b.com,no local\n\
               a b@c.com,space\n\
               a@b.com ,trailing space\n";
    let output = transform_str(csv).unwrap();
    let senders: Vec<&str> = output
        .messages
        .iter()
        .map(|m| m.sender_email.as_str())
        .collect();
    assert_eq!(senders, vec!["a@b.com", "first.last+tag@sub.example.co.uk"]);
}

#[test]
fn test_unicode_and_quoting_survive() {
    let output = transform_str(
        "APD1,\na@b.com,\"Привет, мир 🎉\"\na@b.com,\"say \"\"hi\"\"\"\n",
    )
    .unwrap();
    assert_eq!(output.messages[0].message_text, "Привет, мир 🎉");
    assert_eq!(output.messages[0].message_len, 13);
    assert_eq!(output.messages[1].message_text, "say \"hi\"");
}

#[test]
fn test_whitespace_text_is_not_deleted() {
    let output = transform_str("APD1,\na@b.com,\" [Deleted Message]\"\n").unwrap();
    assert!(!output.messages[0].is_deleted());
    assert!(!output.messages[0].has_deleted_in_conversation);
}

#[test]
fn test_all_messages_deleted() {
    let output = transform_str("APD1,\na@b.com,[Deleted Message]\nc@d.com,[Deleted Message]\n")
        .unwrap();
    assert_eq!(output.summaries[0].deleted_count, 2);
    assert_eq!(output.summaries[0].message_count, 2);
}

// =========================================================================
// Orphan rows
// =========================================================================

#[test]
fn test_orphan_policies() {
    let csv = "a@b.com,early\nnoise,\nAPD1,\nc@d.com,late\n";
    let raw = parse_raw_csv_str(csv).unwrap();

    let kept = transform(&raw, &TransformConfig::default()).unwrap();
    assert_eq!(kept.messages.len(), 2);
    assert_eq!(kept.messages[0].conversation_block_id, 0);
    assert_eq!(kept.stats.orphan_rows, 2);

    let discarded = transform(
        &raw,
        &TransformConfig::new().with_orphan_policy(OrphanPolicy::Discard),
    )
    .unwrap();
    assert_eq!(discarded.messages.len(), 1);
    assert_eq!(discarded.summaries.len(), 1);

    let err = transform(
        &raw,
        &TransformConfig::new().with_orphan_policy(OrphanPolicy::Reject),
    )
    .unwrap_err();
    assert!(matches!(
        err,
        ForensicError::OrphanRows {
            count: 2,
            first_row: 1
        }
    ));
}

#[test]
fn test_export_starting_with_marker_has_no_orphans() {
    let raw = parse_raw_csv_str("APD1,\na@b.com,x\n").unwrap();
    let config = TransformConfig::new().with_orphan_policy(OrphanPolicy::Reject);
    assert!(transform(&raw, &config).is_ok());
}
