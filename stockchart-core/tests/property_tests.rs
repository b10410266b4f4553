//! Property tests for parsing, smoothing and alignment invariants.
//!
//! Uses proptest to verify:
//! 1. Parsed series are ascending with unique dates, last-seen wins
//! 2. Smoothing with window 0 is the identity
//! 3. Smoothed length and values match a direct trailing mean
//! 4. Alignment starts at the reference date and zeroes the padded span
//! 5. Alignment is idempotent

use chrono::{Duration, NaiveDate};
use proptest::prelude::*;
use std::collections::HashMap;
use stockchart_core::config::ParserConfig;
use stockchart_core::data::{align, QuoteParser};
use stockchart_core::indicators::{smooth, InsufficientDataError};
use stockchart_core::{AveragingWindow, Series};

// ── Strategies (proptest) ────────────────────────────────────────────

fn base() -> NaiveDate {
    NaiveDate::from_ymd_opt(2020, 1, 1).unwrap()
}

fn arb_price() -> impl Strategy<Value = f64> {
    (0.0..1000.0_f64).prop_map(|p| (p * 100.0).round() / 100.0)
}

/// Records as (day offset, price); offsets may repeat.
fn arb_records() -> impl Strategy<Value = Vec<(i64, f64)>> {
    prop::collection::vec((0..60_i64, arb_price()), 1..80)
}

/// Consecutive-day series of the given prices.
fn series_of(prices: &[f64]) -> Series {
    prices
        .iter()
        .enumerate()
        .map(|(i, &p)| (base() + Duration::days(i as i64), p))
        .collect()
}

fn pair_parser() -> QuoteParser {
    QuoteParser::new(&ParserConfig {
        price_field: 1,
        has_header: false,
        ..ParserConfig::default()
    })
}

// ── 1. Parser ordering ───────────────────────────────────────────────

proptest! {
    #[test]
    fn parsed_series_is_ascending_and_last_wins(records in arb_records()) {
        let raw: String = records
            .iter()
            .map(|(off, p)| format!("{},{p}\n", (base() + Duration::days(*off)).format("%Y-%m-%d")))
            .collect();
        let series = pair_parser().parse(&raw, false).unwrap();

        let dates: Vec<_> = series.dates().collect();
        prop_assert!(dates.windows(2).all(|w| w[0] < w[1]));

        let mut last_seen = HashMap::new();
        for (off, p) in &records {
            last_seen.insert(base() + Duration::days(*off), *p);
        }
        prop_assert_eq!(series.len(), last_seen.len());
        for (date, price) in series.iter() {
            prop_assert_eq!(Some(&price), last_seen.get(&date));
        }
    }
}

// ── 2–3. Smoothing ───────────────────────────────────────────────────

proptest! {
    #[test]
    fn zero_window_is_identity(prices in prop::collection::vec(arb_price(), 0..50)) {
        let series = series_of(&prices);
        prop_assert_eq!(smooth(series.clone(), AveragingWindow::NONE).unwrap(), series);
    }

    #[test]
    fn smoothed_points_are_trailing_means(
        prices in prop::collection::vec(arb_price(), 1..120),
        window in 1..30_usize,
    ) {
        let series = series_of(&prices);
        let result = smooth(series, AveragingWindow::new(window));

        if prices.len() < window {
            prop_assert_eq!(
                result.unwrap_err(),
                InsufficientDataError { required: window, available: prices.len() }
            );
        } else {
            let out = result.unwrap();
            prop_assert_eq!(out.len(), prices.len() - window + 1);
            for (k, (date, mean)) in out.iter().enumerate() {
                let end = k + window - 1;
                prop_assert_eq!(date, base() + Duration::days(end as i64));
                let direct: f64 = prices[k..=end].iter().sum::<f64>() / window as f64;
                prop_assert!((mean - direct).abs() < 1e-6, "k={} mean={} direct={}", k, mean, direct);
            }
        }
    }
}

// ── 4–5. Alignment ───────────────────────────────────────────────────

proptest! {
    #[test]
    fn aligned_series_starts_at_reference_and_zeroes_padding(
        prices in prop::collection::vec(1.0..500.0_f64, 1..40),
        listing_delay in 0..90_i64,
        window in 0..10_usize,
    ) {
        prop_assume!(prices.len() >= window);
        let reference = base();
        let data_start = reference + Duration::days(listing_delay);
        let raw: Series = prices
            .iter()
            .enumerate()
            .map(|(i, &p)| (data_start + Duration::days(i as i64), p))
            .collect();

        let window = AveragingWindow::new(window);
        let smoothed = smooth(raw, window).unwrap();
        let aligned = align(smoothed.clone(), reference, data_start, window);

        prop_assert_eq!(aligned.first_date(), Some(reference));
        let pad_end = data_start + Duration::days(window.days() as i64);
        for date in reference.iter_days().take_while(|d| *d < pad_end) {
            prop_assert_eq!(aligned.get(date), Some(0.0), "date {}", date);
        }
        for (date, price) in smoothed.iter().filter(|(d, _)| *d >= pad_end) {
            prop_assert_eq!(aligned.get(date), Some(price));
        }
    }

    #[test]
    fn alignment_is_idempotent(
        prices in prop::collection::vec(arb_price(), 1..40),
        listing_delay in -10..40_i64,
        lag in 0..8_usize,
    ) {
        let data_start = base() + Duration::days(listing_delay);
        let series: Series = prices
            .iter()
            .enumerate()
            .map(|(i, &p)| (data_start + Duration::days(i as i64), p))
            .collect();
        let lag = AveragingWindow::new(lag);

        let once = align(series, base(), data_start, lag);
        let twice = align(once.clone(), base(), data_start, lag);
        prop_assert_eq!(once, twice);
    }
}
