//! Raw CSV ingestion.
//!
//! The export has no reliable header and exactly two meaningful columns.
//! Records are read with a flexible width: extra columns are ignored and
//! short records leave the missing column empty. Values are never coerced.

use std::fs::File;
use std::io::{BufReader, Read};
use std::path::Path;

use tracing::debug;

use crate::error::{ForensicError, Result};
use crate::record::RawTable;

/// Reads a raw export file into a [`RawTable`].
///
/// # Example
///
/// ```rust,no_run
/// use convforensic::ingest::read_raw_csv;
///
/// let table = read_raw_csv("data/raw/conversations.csv")?;
/// println!("{} raw rows", table.len());
/// # Ok::<(), convforensic::ForensicError>(())
/// ```
pub fn read_raw_csv(path: impl AsRef<Path>) -> Result<RawTable> {
    let path = path.as_ref();
    let file = File::open(path)?;
    read_rows(BufReader::new(file)).map_err(|e| match e {
        ForensicError::Ingest { source, path: None } => {
            ForensicError::ingest(source, Some(path.to_path_buf()))
        }
        other => other,
    })
}

/// Reads raw rows from any reader (a file, stdin, an in-memory buffer).
pub fn read_raw_csv_from<R: Read>(reader: R) -> Result<RawTable> {
    read_rows(reader)
}

/// Parses raw rows from a string.
pub fn parse_raw_csv_str(content: &str) -> Result<RawTable> {
    read_rows(content.as_bytes())
}

fn read_rows<R: Read>(reader: R) -> Result<RawTable> {
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(false)
        .flexible(true)
        .from_reader(reader);

    let mut pairs = Vec::new();
    for result in reader.records() {
        let record = result.map_err(|e| ForensicError::ingest(e, None))?;
        pairs.push((
            record.get(0).map(str::to_string),
            record.get(1).map(str::to_string),
        ));
    }

    debug!(rows = pairs.len(), "raw export read");
    Ok(RawTable::from_pairs(pairs))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn test_parse_two_columns() {
        let table = parse_raw_csv_str("APD1,\nConversation Identifier:,uuid-1\na@b.com,hello\n")
            .unwrap();
        assert_eq!(table.len(), 3);
        assert_eq!(table.get(1).unwrap().col1(), Some("APD1"));
        assert_eq!(table.get(1).unwrap().col2(), None);
        assert_eq!(table.get(3).unwrap().col2(), Some("hello"));
    }

    #[test]
    fn test_short_and_long_records() {
        let table = parse_raw_csv_str("only\na,b,c,d\n").unwrap();
        assert_eq!(table.get(1).unwrap().col1(), Some("only"));
        assert_eq!(table.get(1).unwrap().col2(), None);
        assert_eq!(table.get(2).unwrap().col2(), Some("b"));
    }

    #[test]
    fn test_quoted_values_keep_commas() {
        let table = parse_raw_csv_str("a@b.com,\"hi, there\"\n").unwrap();
        assert_eq!(table.get(1).unwrap().col2(), Some("hi, there"));
    }

    #[test]
    fn test_numeric_looking_values_stay_strings() {
        let table = parse_raw_csv_str("Platform Call ID:,000123\n").unwrap();
        assert_eq!(table.get(1).unwrap().col2(), Some("000123"));
    }

    #[test]
    fn test_read_from_file() {
        let mut file = NamedTempFile::new().unwrap();
        writeln!(file, "APD7,").unwrap();
        writeln!(file, "x@y.org,text").unwrap();
        let table = read_raw_csv(file.path()).unwrap();
        assert_eq!(table.len(), 2);
    }

    #[test]
    fn test_missing_file_is_io_error() {
        let err = read_raw_csv("/definitely/not/here.csv").unwrap_err();
        assert!(err.is_io());
    }

    #[test]
    fn test_empty_content() {
        let table = parse_raw_csv_str("").unwrap();
        assert!(table.is_empty());
    }
}
