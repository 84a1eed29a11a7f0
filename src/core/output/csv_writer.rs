//! CSV output writer.

use std::fs::File;
use std::io::Write;
use std::path::Path;

use super::TableRow;
use crate::error::Result;

/// Writes rows to a CSV file.
///
/// # Format
/// - Delimiter: `,`
/// - Header: [`TableRow::columns`]
/// - Nulls: empty cells; booleans: `true` / `false`
/// - Encoding: UTF-8
pub fn write_csv<T: TableRow>(rows: &[T], output_path: impl AsRef<Path>) -> Result<()> {
    let file = File::create(output_path)?;
    write_rows(rows, file)
}

/// Converts rows to a CSV string.
pub fn to_csv<T: TableRow>(rows: &[T]) -> Result<String> {
    let mut buffer = Vec::new();
    write_rows(rows, &mut buffer)?;
    Ok(String::from_utf8_lossy(&buffer).into_owned())
}

fn write_rows<T: TableRow, W: Write>(rows: &[T], sink: W) -> Result<()> {
    let mut writer = csv::WriterBuilder::new().from_writer(sink);

    writer.write_record(T::columns())?;
    for row in rows {
        writer.write_record(row.csv_record())?;
    }

    writer.flush()?;
    Ok(())
}
