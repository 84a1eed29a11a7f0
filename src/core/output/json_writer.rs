//! JSON output writer.

use std::fs::File;
use std::io::Write;
use std::path::Path;

use super::TableRow;
use crate::error::Result;

/// Writes rows to a JSON file as a pretty-printed array.
///
/// Nulls are `null`, participants are arrays, timestamps are
/// `YYYY-MM-DD HH:MM:SS` strings.
pub fn write_json<T: TableRow>(rows: &[T], output_path: impl AsRef<Path>) -> Result<()> {
    let json = to_json(rows)?;
    let mut file = File::create(output_path)?;
    file.write_all(json.as_bytes())?;
    Ok(())
}

/// Converts rows to a JSON array string.
pub fn to_json<T: TableRow>(rows: &[T]) -> Result<String> {
    Ok(serde_json::to_string_pretty(rows)?)
}
