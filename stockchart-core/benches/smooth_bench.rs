//! Criterion benchmarks for the load hot paths.
//!
//! Benchmarks:
//! 1. Moving-average smoothing across window sizes (should scale with series length only)
//! 2. Alignment padding for a late-listed series
//! 3. Quote parsing of a Yahoo-layout response

use chrono::{Duration, NaiveDate};
use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use stockchart_core::data::{align, QuoteParser};
use stockchart_core::indicators::smooth;
use stockchart_core::{AveragingWindow, Series};

// ── Helpers ──────────────────────────────────────────────────────────

fn base() -> NaiveDate {
    NaiveDate::from_ymd_opt(2000, 1, 1).unwrap()
}

fn make_series(n: usize) -> Series {
    (0..n)
        .map(|i| {
            let close = 100.0 + (i as f64 * 0.1).sin() * 10.0;
            (base() + Duration::days(i as i64), close)
        })
        .collect()
}

fn make_csv(n: usize) -> String {
    let mut out = String::from("Date,Open,High,Low,Close,Adj Close,Volume\n");
    for (date, close) in make_series(n).iter() {
        out.push_str(&format!(
            "{},{:.2},{:.2},{:.2},{close:.2},{close:.2},1000\n",
            date.format("%Y-%m-%d"),
            close - 0.3,
            close + 1.5,
            close - 1.5,
        ));
    }
    out
}

// ── Benchmarks ───────────────────────────────────────────────────────

fn bench_smooth(c: &mut Criterion) {
    let series = make_series(6_000);
    let mut group = c.benchmark_group("smooth");
    for window in [5usize, 50, 200] {
        group.bench_with_input(BenchmarkId::from_parameter(window), &window, |b, &w| {
            b.iter(|| smooth(black_box(series.clone()), AveragingWindow::new(w)))
        });
    }
    group.finish();
}

fn bench_align(c: &mut Criterion) {
    let series = make_series(2_000);
    let data_start = base();
    let reference = data_start - Duration::days(3_650);
    c.bench_function("align_late_listing", |b| {
        b.iter(|| {
            align(
                black_box(series.clone()),
                reference,
                data_start,
                AveragingWindow::new(50),
            )
        })
    });
}

fn bench_parse(c: &mut Criterion) {
    let raw = make_csv(6_000);
    let parser = QuoteParser::default();
    c.bench_function("parse_yahoo_csv", |b| b.iter(|| parser.parse(black_box(&raw), true)));
}

criterion_group!(benches, bench_smooth, bench_align, bench_parse);
criterion_main!(benches);
