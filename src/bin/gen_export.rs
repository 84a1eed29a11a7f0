//! Synthetic raw export generator for stress testing convforensic.
//!
//! Usage: cargo run --features gen-test --bin gen_export -- [blocks] [output] [seed]
//! Example: cargo run --features gen-test --bin gen_export -- 50000 heavy_export.csv 7
//!
//! Produces the same damage seen in real exports: rows before the first
//! marker, reused markers, metadata after messages, duplicated metadata,
//! malformed dates, non-UUID identifiers, noise rows and multi-line text.

use std::env;
use std::io;
use std::time::Instant;

use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::{Rng, SeedableRng};

const DELETED_MARKER: &str = "[Deleted Message]";

const SENDERS: &[&str] = &[
    "alice@example.com",
    "bob.smith@corp.example.org",
    "carol+tag@mail.example.net",
    "dave_99@example.co.uk",
    "eve@sub.domain.example.com",
    "mallory@example.io",
];

const TEXTS: &[&str] = &[
    "ok",
    "see you at 5",
    "did you send the file?",
    "call me, it's urgent",
    "\"quoted\" reply",
    "line one\nline two",
    "Привет 👋",
    "村上さん、了解です",
    "   ",
    "[deleted message]",
];

const NOISE: &[(&str, &str)] = &[
    ("", ""),
    ("Participants:", "alice@example.com; bob.smith@corp.example.org"),
    ("Platform:", "Teams"),
    ("-----", ""),
    ("not-an-email", "stray value"),
    ("alice@example", "looks like a sender but is not"),
];

const BAD_DATES: &[&str] = &["2019-10-10T16:10:12", "13/45/19 4:10:12 PM", "unknown", ""];

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args: Vec<String> = env::args().collect();

    let blocks: usize = args.get(1).and_then(|s| s.parse().ok()).unwrap_or(10_000);
    let output = args.get(2).map_or("heavy_export.csv", String::as_str);
    let seed: u64 = args.get(3).and_then(|s| s.parse().ok()).unwrap_or(42);

    println!("🧪 Synthetic Export Generator");
    println!("━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━");
    println!("   Blocks:   {}", blocks);
    println!("   Output:   {}", output);
    println!("   Seed:     {}", seed);
    println!();

    let start = Instant::now();
    let mut writer = csv::WriterBuilder::new()
        .flexible(true)
        .from_path(output)?;
    let mut rng = StdRng::seed_from_u64(seed);
    let mut rows = 0usize;

    // Truncated head: a few rows before the first marker.
    for _ in 0..rng.gen_range(0..3) {
        write_row(&mut writer, random_sender(&mut rng), random_text(&mut rng))?;
        rows += 1;
    }

    for block in 0..blocks {
        rows += write_block(&mut writer, &mut rng, block)?;

        if block > 0 && block % 10_000 == 0 {
            println!("   ... {} blocks, {} rows", block, rows);
        }
    }
    writer.flush()?;

    println!();
    println!(
        "✅ Wrote {} rows in {:.2}s",
        rows,
        start.elapsed().as_secs_f64()
    );
    Ok(())
}

fn write_block<W: io::Write>(
    writer: &mut csv::Writer<W>,
    rng: &mut StdRng,
    block: usize,
) -> csv::Result<usize> {
    // Markers are reused across blocks about one time in ten.
    let marker_id = if block > 0 && rng.gen_bool(0.1) {
        rng.gen_range(0..block)
    } else {
        block
    };
    let marker = format!("APD{}", marker_id + 1);

    let mut body: Vec<(String, String)> = Vec::new();

    if rng.gen_bool(0.9) {
        body.push(("Conversation Identifier:".into(), conversation_id(rng)));
    }
    if rng.gen_bool(0.8) {
        body.push((
            "Platform Call ID:".into(),
            format!("{:016x}", rng.r#gen::<u64>()),
        ));
    }
    if rng.gen_bool(0.9) {
        body.push(("Date and time:".into(), datetime(rng)));
    }
    if rng.gen_bool(0.05) {
        // A later duplicate that must lose to the first occurrence.
        body.push(("Conversation Identifier:".into(), "duplicate-id".into()));
    }

    let participants = rng.gen_range(1..=3);
    let senders: Vec<&str> = SENDERS.choose_multiple(rng, participants).copied().collect();
    for _ in 0..rng.gen_range(0..12) {
        let sender = senders.choose(rng).copied().unwrap_or(SENDERS[0]);
        let text = if rng.gen_bool(0.08) {
            DELETED_MARKER.to_string()
        } else {
            random_text(rng).to_string()
        };
        body.push((sender.to_string(), text));
    }
    for _ in 0..rng.gen_range(0..3) {
        if let Some(&(a, b)) = NOISE.choose(rng) {
            body.push((a.to_string(), b.to_string()));
        }
    }

    // Metadata is not guaranteed to precede the messages.
    body.shuffle(rng);

    write_row(writer, &marker, "")?;
    for (col1, col2) in &body {
        write_row(writer, col1, col2)?;
    }
    Ok(body.len() + 1)
}

fn write_row<W: io::Write>(writer: &mut csv::Writer<W>, col1: &str, col2: &str) -> csv::Result<()> {
    writer.write_record([col1, col2])
}

fn random_sender(rng: &mut StdRng) -> &'static str {
    SENDERS.choose(rng).copied().unwrap_or(SENDERS[0])
}

fn random_text(rng: &mut StdRng) -> &'static str {
    TEXTS.choose(rng).copied().unwrap_or(TEXTS[0])
}

fn conversation_id(rng: &mut StdRng) -> String {
    if rng.gen_bool(0.85) {
        let variant = *[b'8', b'9', b'a', b'b'].choose(rng).unwrap_or(&b'8') as char;
        format!(
            "{:08x}-{:04x}-4{:03x}-{}{:03x}-{:012x}",
            rng.r#gen::<u32>(),
            rng.r#gen::<u16>(),
            rng.gen_range(0..0x1000u32),
            variant,
            rng.gen_range(0..0x1000u32),
            rng.gen_range(0..0x1_0000_0000_0000u64),
        )
    } else {
        format!("conv-{}", rng.gen_range(1000..9999))
    }
}

fn datetime(rng: &mut StdRng) -> String {
    if rng.gen_bool(0.1) {
        return BAD_DATES.choose(rng).copied().unwrap_or("unknown").to_string();
    }
    let hour = rng.gen_range(1..=12);
    format!(
        "{:02}/{:02}/{:02} {}:{:02}:{:02} {}",
        rng.gen_range(1..=12),
        rng.gen_range(1..=28),
        rng.gen_range(15..=24),
        hour,
        rng.gen_range(0..60),
        rng.gen_range(0..60),
        if rng.gen_bool(0.5) { "AM" } else { "PM" }
    )
}
