//! Example: Using convforensic as a library
//!
//! Run with: cargo run --example library_usage

use convforensic::core::report::{deleted_conversations, participant_activity};
use convforensic::prelude::*;

const RAW_EXPORT: &str = "\
alice@example.com,orphaned before any marker
APD1,
Conversation Identifier:,3f2b8c1e-9d4a-4e6b-8a7c-1d2e3f4a5b6c
Platform Call ID:,call-001
Date and time:,10/10/19 4:10:12 PM
alice@example.com,hey
bob@example.com,\"hi, what's up?\"
alice@example.com,[Deleted Message]
APD2,
bob@example.com,second conversation
Date and time:,not a date
Conversation Identifier:,legacy-42
";

fn main() -> std::result::Result<(), Box<dyn std::error::Error>> {
    println!("=== convforensic Library Usage Examples ===\n");

    // Example 1: Ingest
    println!("1. Reading the raw export:");
    let raw = parse_raw_csv_str(RAW_EXPORT)?;
    println!("   {} raw rows", raw.len());

    // Example 2: Default transform keeps orphan rows
    println!("\n2. Transform with default settings:");
    let output = transform(&raw, &TransformConfig::default())?;
    validate_messages(&output.messages)?;
    println!("   {}", output.stats);
    for m in &output.messages {
        println!(
            "   row {:>2} {:<14} #{} {:<20} {:?}",
            m.row_num, m.conversation_uid, m.message_sequence, m.sender_email, m.message_status
        );
    }

    // Example 3: Reject exports that do not open with a marker
    println!("\n3. Strict orphan policy:");
    let strict = TransformConfig::new().with_orphan_policy(OrphanPolicy::Reject);
    match transform(&raw, &strict) {
        Ok(_) => println!("   unexpectedly accepted"),
        Err(e) => println!("   rejected: {}", e),
    }

    // Example 4: Conversation summary
    println!("\n4. Conversation summary:");
    for s in &output.summaries {
        println!(
            "   {:<14} messages={} deleted={} participants={}",
            s.conversation_uid,
            s.message_count,
            s.deleted_count,
            s.participants.join("|")
        );
    }

    // Example 5: Reports
    println!("\n5. Investigation reports:");
    for d in deleted_conversations(&output.messages) {
        println!(
            "   {} has {} deleted of {}",
            d.conversation_uid, d.deleted_message_count, d.total_messages
        );
    }
    for p in participant_activity(&output.messages) {
        println!(
            "   {} sent {} messages in {} conversations",
            p.sender_email, p.message_count, p.conversations_involved
        );
    }

    // Example 6: Output formats
    println!("\n6. Output as CSV:");
    println!("{}", to_csv(&output.summaries)?);

    println!("7. Output as JSONL:");
    print!("{}", to_jsonl(&output.messages[..1])?);

    println!("\n=== All examples completed! ===");
    Ok(())
}
