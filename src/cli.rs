//! Command-line interface definition using clap.
//!
//! - [`Args`] - CLI argument structure
//! - [`OutputFormat`] - output format as a clap value
//! - [`OrphanArg`] - orphan policy as a clap value
//!
//! Flags override values loaded with `--config`, which in turn override
//! the defaults of [`TransformConfig`].

use std::path::{Path, PathBuf};

use clap::{Parser, ValueEnum};

use crate::config::{OrphanPolicy, TransformConfig};
use crate::error::Result;
use crate::format;

/// Recover the message table and conversation summary from a corrupted
/// two-column block export.
#[derive(Parser, Debug, Clone)]
#[command(name = "convforensic")]
#[command(version, about, long_about = None)]
#[command(after_help = "EXAMPLES:
    convforensic raw_export.csv
    convforensic raw_export.csv -o out/ --format jsonl
    convforensic raw_export.csv --orphans reject --reports
    convforensic raw_export.csv --config case_42.json -vv")]
pub struct Args {
    /// Path to the raw two-column CSV export
    pub input: PathBuf,

    /// Directory receiving clean_messages and conversation_summary
    #[arg(short, long, default_value = "data/processed")]
    pub output_dir: PathBuf,

    /// Output format
    #[arg(short, long, value_enum, default_value = "csv")]
    pub format: OutputFormat,

    /// Exact message text marking a deleted message
    #[arg(long, value_name = "TEXT")]
    pub deleted_marker: Option<String>,

    /// chrono format of "Date and time:" values
    #[arg(long, value_name = "FORMAT")]
    pub datetime_format: Option<String>,

    /// What to do with rows before the first block marker
    #[arg(long, value_enum, value_name = "POLICY")]
    pub orphans: Option<OrphanArg>,

    /// JSON file with transform settings
    #[arg(long, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Also write investigation reports into <OUTPUT_DIR>/reports
    #[arg(long)]
    pub reports: bool,

    /// Increase log verbosity (-v info, -vv debug, -vvv trace)
    #[arg(short, long, action = clap::ArgAction::Count)]
    pub verbose: u8,

    /// Only log errors
    #[arg(short, long, conflicts_with = "verbose")]
    pub quiet: bool,
}

impl Args {
    /// Resolves the effective transform configuration.
    pub fn transform_config(&self) -> Result<TransformConfig> {
        let mut config = match &self.config {
            Some(path) => TransformConfig::from_json_file(path)?,
            None => TransformConfig::default(),
        };

        if let Some(marker) = &self.deleted_marker {
            config = config.with_deleted_marker(marker.clone());
        }
        if let Some(fmt) = &self.datetime_format {
            config = config.with_datetime_format(fmt.clone());
        }
        if let Some(orphans) = self.orphans {
            config = config.with_orphan_policy(orphans.into());
        }

        config.validate()?;
        Ok(config)
    }

    /// `<output_dir>/<stem>.<ext>` for the selected format.
    pub fn output_path(&self, stem: &str) -> PathBuf {
        output_path(&self.output_dir, stem, self.format.into())
    }
}

fn output_path(dir: &Path, stem: &str, format: format::OutputFormat) -> PathBuf {
    dir.join(format!("{stem}.{}", format.extension()))
}

/// Output format options.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, ValueEnum, Default)]
pub enum OutputFormat {
    /// Comma-separated table with header
    #[default]
    Csv,
    /// Pretty-printed JSON array
    Json,
    /// One JSON object per line
    #[value(alias = "ndjson")]
    Jsonl,
}

impl From<OutputFormat> for format::OutputFormat {
    fn from(value: OutputFormat) -> Self {
        match value {
            OutputFormat::Csv => format::OutputFormat::Csv,
            OutputFormat::Json => format::OutputFormat::Json,
            OutputFormat::Jsonl => format::OutputFormat::Jsonl,
        }
    }
}

impl std::fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        std::fmt::Display::fmt(&format::OutputFormat::from(*self), f)
    }
}

/// Orphan row policy options.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, ValueEnum)]
pub enum OrphanArg {
    /// Keep them as conversation UNASSIGNED-0
    Keep,
    /// Drop them with a warning
    #[value(alias = "drop")]
    Discard,
    /// Abort the run
    #[value(alias = "fail")]
    Reject,
}

impl From<OrphanArg> for OrphanPolicy {
    fn from(value: OrphanArg) -> Self {
        match value {
            OrphanArg::Keep => OrphanPolicy::Keep,
            OrphanArg::Discard => OrphanPolicy::Discard,
            OrphanArg::Reject => OrphanPolicy::Reject,
        }
    }
}
