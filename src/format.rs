//! Output format types for convforensic.
//!
//! These types do not depend on the CLI framework, so library callers can
//! pick a format without pulling in clap.
//!
//! # Example
//!
//! ```rust
//! # #[cfg(feature = "json-output")]
//! # fn example() -> convforensic::Result<()> {
//! use convforensic::format::{OutputFormat, write_table};
//! use convforensic::core::MessageRecord;
//!
//! let messages: Vec<MessageRecord> = Vec::new();
//! write_table(&messages, "clean_messages.jsonl", OutputFormat::Jsonl)?;
//!
//! let format = OutputFormat::from_path("conversation_summary.json")?;
//! assert_eq!(format, OutputFormat::Json);
//! # Ok(())
//! # }
//! ```

use std::fmt;
use std::fs;
use std::path::Path;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::core::output::TableRow;
use crate::error::{ForensicError, Result};

/// Output format for the message and summary tables.
///
/// - [`Csv`](OutputFormat::Csv) - comma-separated with a header row
/// - [`Json`](OutputFormat::Json) - one pretty-printed array
/// - [`Jsonl`](OutputFormat::Jsonl) - one object per line
///
/// ```rust
/// use convforensic::format::OutputFormat;
/// use std::str::FromStr;
///
/// let format = OutputFormat::from_str("ndjson").unwrap();
/// assert_eq!(format, OutputFormat::Jsonl);
/// assert_eq!(format.extension(), "jsonl");
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
#[non_exhaustive]
pub enum OutputFormat {
    #[default]
    Csv,
    Json,
    Jsonl,
}

impl OutputFormat {
    /// File extension, without the dot.
    pub fn extension(&self) -> &'static str {
        match self {
            OutputFormat::Csv => "csv",
            OutputFormat::Json => "json",
            OutputFormat::Jsonl => "jsonl",
        }
    }

    pub fn all_names() -> &'static [&'static str] {
        &["csv", "json", "jsonl", "ndjson"]
    }

    pub fn all() -> &'static [OutputFormat] {
        &[OutputFormat::Csv, OutputFormat::Json, OutputFormat::Jsonl]
    }

    /// Detects the format from a file extension.
    pub fn from_path(path: impl AsRef<Path>) -> Result<Self> {
        let ext = path
            .as_ref()
            .extension()
            .and_then(|e| e.to_str())
            .unwrap_or("")
            .to_lowercase();

        ext.parse().map_err(|_| {
            ForensicError::invalid_format(format!(
                "Unknown file extension: '.{ext}'. Expected one of: csv, json, jsonl"
            ))
        })
    }
}

impl fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            OutputFormat::Csv => write!(f, "CSV"),
            OutputFormat::Json => write!(f, "JSON"),
            OutputFormat::Jsonl => write!(f, "JSONL"),
        }
    }
}

impl FromStr for OutputFormat {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "csv" => Ok(OutputFormat::Csv),
            "json" => Ok(OutputFormat::Json),
            "jsonl" | "ndjson" => Ok(OutputFormat::Jsonl),
            _ => Err(format!(
                "Unknown format: '{}'. Expected one of: {}",
                s,
                OutputFormat::all_names().join(", ")
            )),
        }
    }
}

/// Writes a table to `path` in the given format.
///
/// # Errors
///
/// Returns an error if the format's feature is not enabled or the file
/// cannot be written.
pub fn write_table<T: TableRow>(
    rows: &[T],
    path: impl AsRef<Path>,
    format: OutputFormat,
) -> Result<()> {
    let path = path.as_ref();
    match format {
        OutputFormat::Csv => crate::core::output::write_csv(rows, path),
        #[cfg(feature = "json-output")]
        OutputFormat::Json => crate::core::output::write_json(rows, path),
        #[cfg(feature = "json-output")]
        OutputFormat::Jsonl => crate::core::output::write_jsonl(rows, path),
        #[allow(unreachable_patterns)]
        _ => Err(missing_feature(format)),
    }
}

/// Renders a table as a string in the given format.
pub fn to_format_string<T: TableRow>(rows: &[T], format: OutputFormat) -> Result<String> {
    match format {
        OutputFormat::Csv => crate::core::output::to_csv(rows),
        #[cfg(feature = "json-output")]
        OutputFormat::Json => crate::core::output::to_json(rows),
        #[cfg(feature = "json-output")]
        OutputFormat::Jsonl => crate::core::output::to_jsonl(rows),
        #[allow(unreachable_patterns)]
        _ => Err(missing_feature(format)),
    }
}

/// Writes pre-rendered `(path, content)` pairs, all or none.
///
/// If any write fails, files already written by this call are removed
/// before the error is returned.
pub fn commit_outputs<P: AsRef<Path>>(outputs: &[(P, String)]) -> Result<()> {
    for (index, (path, content)) in outputs.iter().enumerate() {
        if let Err(e) = fs::write(path, content) {
            for (written, _) in &outputs[..index] {
                let written = written.as_ref();
                if let Err(cleanup) = fs::remove_file(written) {
                    warn!(
                        path = %written.display(),
                        error = %cleanup,
                        "could not roll back output"
                    );
                }
            }
            return Err(e.into());
        }
    }
    Ok(())
}

#[allow(dead_code)]
fn missing_feature(format: OutputFormat) -> ForensicError {
    ForensicError::invalid_format(format!(
        "Output format {format} requires the 'json-output' feature to be enabled"
    ))
}
