//! Validation gate run between the transform and persistence.
//!
//! A failure here aborts output writing: a message table that cannot be
//! traced or ordered must never reach disk.

use crate::core::models::MessageRecord;
use crate::core::output::to_csv;
use crate::error::{Result, ValidationError};

/// Columns every persisted message table must carry.
pub const REQUIRED_COLUMNS: &[&str] = &[
    "conversation_id",
    "platform_call_id",
    "conversation_datetime",
    "sender_email",
    "message_text",
    "message_sequence",
];

/// Checks that `header` contains every required column.
pub fn validate_columns<S: AsRef<str>>(header: &[S]) -> Result<()> {
    let missing: Vec<String> = REQUIRED_COLUMNS
        .iter()
        .filter(|required| !header.iter().any(|h| h.as_ref() == **required))
        .map(|c| (*c).to_string())
        .collect();

    if missing.is_empty() {
        Ok(())
    } else {
        Err(ValidationError::MissingColumns(missing).into())
    }
}

/// Validates a message table before it is written.
///
/// # Example
///
/// ```
/// use convforensic::config::TransformConfig;
/// use convforensic::core::{transform, validate_messages};
/// use convforensic::record::RawTable;
///
/// let raw = RawTable::from_pairs([(Some("APD1"), None), (Some("a@b.com"), Some("hi"))]);
/// let output = transform(&raw, &TransformConfig::default())?;
/// validate_messages(&output.messages)?;
/// # Ok::<(), convforensic::ForensicError>(())
/// ```
pub fn validate_messages(messages: &[MessageRecord]) -> Result<()> {
    validate_columns(&emitted_message_header()?)?;

    for message in messages {
        if message.sender_email.is_empty() {
            return Err(ValidationError::EmptySender {
                row_num: message.row_num,
            }
            .into());
        }
        if message.message_sequence < 1 {
            return Err(ValidationError::NonPositiveSequence {
                row_num: message.row_num,
                sequence: message.message_sequence,
            }
            .into());
        }
    }

    Ok(())
}

/// Header row the CSV writer produces for the message table.
fn emitted_message_header() -> Result<Vec<String>> {
    let rendered = to_csv::<MessageRecord>(&[])?;
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(false)
        .from_reader(rendered.as_bytes());
    let header = match reader.records().next() {
        Some(record) => record?.iter().map(str::to_string).collect(),
        None => Vec::new(),
    };
    Ok(header)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::models::{MESSAGE_COLUMNS, MessageStatus};
    use crate::error::ForensicError;

    fn message(sender: &str, sequence: usize) -> MessageRecord {
        MessageRecord {
            extraction_group_id: Some("APD1".into()),
            conversation_uid: "APD1-1".into(),
            conversation_block_id: 1,
            conversation_id: None,
            conversation_id_is_uuid: false,
            platform_call_id: None,
            conversation_datetime: None,
            sender_email: sender.into(),
            message_text: "x".into(),
            message_len: 1,
            message_status: MessageStatus::Normal,
            has_deleted_in_conversation: false,
            message_sequence: sequence,
            row_num: 2,
            conv_seq: 1,
        }
    }

    #[test]
    fn test_valid_table_passes() {
        assert!(validate_messages(&[message("a@b.com", 1), message("c@d.com", 2)]).is_ok());
        assert!(validate_messages(&[]).is_ok());
    }

    #[test]
    fn test_empty_sender_fails() {
        let err = validate_messages(&[message("", 1)]).unwrap_err();
        assert!(matches!(
            err,
            ForensicError::Validation(ValidationError::EmptySender { row_num: 2 })
        ));
    }

    #[test]
    fn test_zero_sequence_fails() {
        let err = validate_messages(&[message("a@b.com", 0)]).unwrap_err();
        assert!(matches!(
            err,
            ForensicError::Validation(ValidationError::NonPositiveSequence { .. })
        ));
    }

    #[test]
    fn test_missing_columns() {
        let err = validate_columns(&["sender_email", "message_text"][..]).unwrap_err();
        match err {
            ForensicError::Validation(ValidationError::MissingColumns(cols)) => {
                assert_eq!(
                    cols,
                    vec![
                        "conversation_id",
                        "platform_call_id",
                        "conversation_datetime",
                        "message_sequence"
                    ]
                );
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_message_columns_satisfy_gate() {
        assert!(validate_columns(MESSAGE_COLUMNS).is_ok());
    }

    #[test]
    fn test_gate_checks_writer_header() {
        let header = emitted_message_header().unwrap();
        assert_eq!(header, MESSAGE_COLUMNS);
        assert!(validate_columns(&header).is_ok());
        assert!(validate_columns(&header[..3]).is_err());
    }
}
