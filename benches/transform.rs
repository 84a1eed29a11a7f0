//! Benchmarks for convforensic ingestion, transform and output.
//!
//! Run with: `cargo bench`
//! Run specific group: `cargo bench --bench transform -- transform`

use criterion::{BenchmarkId, Criterion, Throughput, black_box, criterion_group, criterion_main};

use convforensic::config::TransformConfig;
use convforensic::core::output::{to_csv, to_json, to_jsonl};
use convforensic::core::report::{burst_activity, message_time_gaps};
use convforensic::core::transform;
use convforensic::ingest::parse_raw_csv_str;
use convforensic::record::RawTable;

// =============================================================================
// Test Data Generators
// =============================================================================

/// Raw export with `blocks` blocks of three metadata rows and eight messages.
fn generate_export_csv(blocks: usize) -> String {
    let mut lines = Vec::with_capacity(blocks * 12);
    for b in 0..blocks {
        lines.push(format!("APD{},", b + 1));
        lines.push(format!(
            "Conversation Identifier:,{:08x}-1234-4abc-8def-{:012x}",
            b, b
        ));
        lines.push(format!("Platform Call ID:,call-{}", b));
        lines.push(format!(
            "Date and time:,{:02}/{:02}/19 {}:{:02}:00 PM",
            b % 12 + 1,
            b % 28 + 1,
            b % 12 + 1,
            b % 60
        ));
        for m in 0..8 {
            let sender = if m % 2 == 0 { "alice@example.com" } else { "bob@example.com" };
            if m == 7 && b % 5 == 0 {
                lines.push(format!("{},[Deleted Message]", sender));
            } else {
                lines.push(format!("{},\"Message {} in block {}\"", sender, m, b));
            }
        }
    }
    lines.join("\n")
}

fn generate_table(blocks: usize) -> RawTable {
    parse_raw_csv_str(&generate_export_csv(blocks)).unwrap()
}

// =============================================================================
// Ingestion Benchmarks
// =============================================================================

fn bench_ingest(c: &mut Criterion) {
    let mut group = c.benchmark_group("ingest");

    for blocks in [100_usize, 1_000, 10_000] {
        let csv = generate_export_csv(blocks);
        group.throughput(Throughput::Bytes(csv.len() as u64));
        group.bench_with_input(BenchmarkId::from_parameter(blocks), &csv, |b, csv| {
            b.iter(|| {
                let table = parse_raw_csv_str(black_box(csv)).unwrap();
                black_box(table)
            });
        });
    }

    group.finish();
}

// =============================================================================
// Transform Benchmarks
// =============================================================================

fn bench_transform(c: &mut Criterion) {
    let mut group = c.benchmark_group("transform");
    let config = TransformConfig::default();

    for blocks in [100_usize, 1_000, 10_000, 50_000] {
        let table = generate_table(blocks);
        group.throughput(Throughput::Elements(table.len() as u64));
        group.bench_with_input(BenchmarkId::from_parameter(blocks), &table, |b, table| {
            b.iter(|| {
                let output = transform(black_box(table), &config).unwrap();
                black_box(output)
            });
        });
    }

    group.finish();
}

// =============================================================================
// Output Benchmarks
// =============================================================================

fn bench_output(c: &mut Criterion) {
    let mut group = c.benchmark_group("output");
    let output = transform(&generate_table(5_000), &TransformConfig::default()).unwrap();
    group.throughput(Throughput::Elements(output.messages.len() as u64));

    group.bench_function("csv", |b| {
        b.iter(|| black_box(to_csv(black_box(&output.messages)).unwrap()));
    });
    group.bench_function("json", |b| {
        b.iter(|| black_box(to_json(black_box(&output.messages)).unwrap()));
    });
    group.bench_function("jsonl", |b| {
        b.iter(|| black_box(to_jsonl(black_box(&output.messages)).unwrap()));
    });

    group.finish();
}

// =============================================================================
// Report Benchmarks
// =============================================================================

fn bench_reports(c: &mut Criterion) {
    let mut group = c.benchmark_group("reports");
    let output = transform(&generate_table(5_000), &TransformConfig::default()).unwrap();
    group.throughput(Throughput::Elements(output.messages.len() as u64));

    group.bench_function("message_time_gaps", |b| {
        b.iter(|| black_box(message_time_gaps(black_box(&output.messages))));
    });
    group.bench_function("burst_activity", |b| {
        b.iter(|| black_box(burst_activity(black_box(&output.messages), 60)));
    });

    group.finish();
}

criterion_group!(
    benches,
    bench_ingest,
    bench_transform,
    bench_output,
    bench_reports
);
criterion_main!(benches);
