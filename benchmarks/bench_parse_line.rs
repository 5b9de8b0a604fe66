use std::hint::black_box;

use criterion::{criterion_group, criterion_main, Criterion};

use reqtrace::analysis::{correlate, detect_failed_requests, sort_timeline};
use reqtrace::parsers::parse_line;
use reqtrace::LogEntry;

const FULL_LINE: &str =
    "2023-12-25T14:30:15.123Z [ERROR] user-service: User authentication failed, request_id=req_abc123, user_id=user_789";
const DEGRADED_LINE: &str = "2023-12-25T14:30:15.123+02:00 [INFO] cron: nightly run started,";
const MALFORMED_LINE: &str = "Dec 25 14:30:15 host sshd[42]: Accepted publickey for root";

fn bench_parse_full(c: &mut Criterion) {
    c.bench_function("parse_line_full", |b| {
        b.iter(|| {
            black_box(parse_line(black_box(FULL_LINE)).ok());
        });
    });
}

fn bench_parse_degraded(c: &mut Criterion) {
    c.bench_function("parse_line_degraded", |b| {
        b.iter(|| {
            black_box(parse_line(black_box(DEGRADED_LINE)).ok());
        });
    });
}

fn bench_parse_malformed(c: &mut Criterion) {
    c.bench_function("parse_line_malformed", |b| {
        b.iter(|| {
            black_box(parse_line(black_box(MALFORMED_LINE)).is_err());
        });
    });
}

fn sample_entries(count: usize) -> Vec<LogEntry> {
    (0..count)
        .filter_map(|i| {
            let level = if i % 50 == 0 { "ERROR" } else { "INFO" };
            let line = format!(
                "2024-01-01T00:{:02}:{:02}.{:03}Z [{}] svc{}: step {}, request_id=req_{}",
                (count - i) % 60,
                i % 60,
                i % 1000,
                level,
                i % 8,
                i,
                i % 500
            );
            parse_line(&line).ok().map(|parsed| parsed.entry)
        })
        .collect()
}

fn bench_correlate_and_detect(c: &mut Criterion) {
    let entries = sample_entries(10_000);
    c.bench_function("correlate_detect_10k", |b| {
        b.iter(|| {
            let groups = correlate(black_box(&entries));
            black_box(detect_failed_requests(&groups));
        });
    });
}

fn bench_sort_timeline(c: &mut Criterion) {
    let entries = sample_entries(1_000);
    c.bench_function("sort_timeline_1k", |b| {
        b.iter(|| {
            black_box(sort_timeline(black_box(&entries)));
        });
    });
}

criterion_group!(
    benches,
    bench_parse_full,
    bench_parse_degraded,
    bench_parse_malformed,
    bench_correlate_and_detect,
    bench_sort_timeline
);
criterion_main!(benches);
