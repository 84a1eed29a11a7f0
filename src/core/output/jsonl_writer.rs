//! JSON Lines (JSONL) output writer.

use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

use super::TableRow;
use crate::error::Result;

/// Writes rows to a JSONL file, one object per line.
pub fn write_jsonl<T: TableRow>(rows: &[T], output_path: impl AsRef<Path>) -> Result<()> {
    let file = File::create(output_path)?;
    let mut writer = BufWriter::new(file);

    for row in rows {
        serde_json::to_writer(&mut writer, row)?;
        writeln!(writer)?;
    }

    writer.flush()?;
    Ok(())
}

/// Converts rows to a JSONL string.
pub fn to_jsonl<T: TableRow>(rows: &[T]) -> Result<String> {
    let mut output = String::new();
    for row in rows {
        output.push_str(&serde_json::to_string(row)?);
        output.push('\n');
    }
    Ok(output)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::TransformConfig;
    use crate::core::transform;
    use crate::record::RawTable;
    use tempfile::NamedTempFile;

    #[test]
    fn test_jsonl_one_object_per_message() {
        let raw = RawTable::from_pairs([
            (Some("APD1"), None),
            (Some("a@b.com"), Some("one")),
            (Some("a@b.com"), Some("two")),
        ]);
        let output = transform(&raw, &TransformConfig::default()).unwrap();
        let jsonl = to_jsonl(&output.messages).unwrap();

        let lines: Vec<&str> = jsonl.lines().collect();
        assert_eq!(lines.len(), 2);
        let second: serde_json::Value = serde_json::from_str(lines[1]).unwrap();
        assert_eq!(second["message_sequence"], 2);
        assert_eq!(second["row_num"], 3);
    }

    #[test]
    fn test_write_jsonl_matches_string() {
        let raw = RawTable::from_pairs([(Some("APD1"), None), (Some("a@b.com"), Some("one"))]);
        let output = transform(&raw, &TransformConfig::default()).unwrap();
        let temp_file = NamedTempFile::new().unwrap();
        write_jsonl(&output.messages, temp_file.path()).unwrap();
        let content = std::fs::read_to_string(temp_file.path()).unwrap();
        assert_eq!(content, to_jsonl(&output.messages).unwrap());
    }
}
