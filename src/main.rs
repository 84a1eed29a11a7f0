//! # convforensic CLI
//!
//! Command-line interface for the convforensic library.

use std::fs;
use std::process;
use std::time::Instant;

use clap::Parser as ClapParser;
use tracing::info;

use convforensic::ForensicError;
use convforensic::cli::Args;
use convforensic::core::{MessageRecord, transform, validate_messages};
use convforensic::format::{commit_outputs, to_format_string};
use convforensic::ingest::read_raw_csv;
use convforensic::logging::init_logging;

fn main() {
    if let Err(e) = run() {
        eprintln!("❌ Error: {}", e);
        process::exit(1);
    }
}

fn run() -> Result<(), ForensicError> {
    let total_start = Instant::now();
    let args = <Args as ClapParser>::parse();
    init_logging(args.verbose, args.quiet)?;

    let config = args.transform_config()?;
    let messages_path = args.output_path("clean_messages");
    let summary_path = args.output_path("conversation_summary");

    println!("🔎 convforensic v{}", env!("CARGO_PKG_VERSION"));
    println!("━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━");
    println!("📂 Input:   {}", args.input.display());
    println!("💾 Output:  {}", args.output_dir.display());
    println!("📄 Format:  {}", args.format);
    println!("🗑️  Marker:  {}", config.deleted_marker);
    println!("🧩 Orphans: {}", config.orphan_policy);
    println!();

    // Step 1: Ingest
    println!("⏳ Reading raw export...");
    let read_start = Instant::now();
    let raw = read_raw_csv(&args.input)?;
    println!(
        "   Read {} rows ({:.2}s)",
        raw.len(),
        read_start.elapsed().as_secs_f64()
    );

    // Step 2: Transform
    println!("🧱 Segmenting blocks and materializing messages...");
    let transform_start = Instant::now();
    let output = transform(&raw, &config)?;
    println!(
        "   {} ({:.2}s)",
        output.stats,
        transform_start.elapsed().as_secs_f64()
    );

    // Step 3: Validate before anything touches disk
    println!("🛡️  Validating message table...");
    validate_messages(&output.messages)?;

    // Step 4: Persist
    println!("💾 Writing {}...", args.format);
    let write_start = Instant::now();
    fs::create_dir_all(&args.output_dir)?;
    let format = args.format.into();
    let rendered = [
        (&messages_path, to_format_string(&output.messages, format)?),
        (&summary_path, to_format_string(&output.summaries, format)?),
    ];
    commit_outputs(&rendered)?;
    println!("   Written in {:.2}s", write_start.elapsed().as_secs_f64());

    if args.reports {
        write_reports(&args, &output.messages)?;
    }

    let stats = output.stats;
    info!(
        messages = %messages_path.display(),
        summary = %summary_path.display(),
        "outputs written"
    );

    println!();
    println!("✅ Done! Output saved to {}", args.output_dir.display());

    println!();
    println!("📊 Summary:");
    println!("   Raw rows:       {}", stats.raw_rows);
    println!("   Blocks:         {}", stats.blocks);
    println!(
        "   Messages:       {} ({:.1}% of rows)",
        stats.message_rows,
        stats.message_ratio()
    );
    println!("   Conversations:  {}", stats.conversations);
    println!("   Deleted:        {}", stats.deleted_messages);
    if stats.orphan_rows > 0 {
        println!("   ⚠️  Orphan rows: {}", stats.orphan_rows);
    }
    if stats.blocks_without_metadata > 0 {
        println!("   ⚠️  Blocks without metadata: {}", stats.blocks_without_metadata);
    }
    if stats.unparsed_datetimes > 0 {
        println!("   ⚠️  Unparsed dates: {}", stats.unparsed_datetimes);
    }
    if stats.non_uuid_conversation_ids > 0 {
        println!("   ⚠️  Non-UUID ids: {}", stats.non_uuid_conversation_ids);
    }

    println!();
    println!("⚡ Performance:");
    println!(
        "   Total time:  {:.2}s",
        total_start.elapsed().as_secs_f64()
    );

    Ok(())
}

#[cfg(feature = "reports")]
fn write_reports(args: &Args, messages: &[MessageRecord]) -> Result<(), ForensicError> {
    println!("📈 Writing investigation reports...");
    let reports_dir = args.output_dir.join("reports");
    let written = convforensic::core::report::write_reports(reports_dir, messages)?;
    println!("   {} reports", written.len());
    Ok(())
}

#[cfg(not(feature = "reports"))]
fn write_reports(_args: &Args, _messages: &[MessageRecord]) -> Result<(), ForensicError> {
    println!("⏭️  Skipping reports (built without the 'reports' feature)");
    Ok(())
}
