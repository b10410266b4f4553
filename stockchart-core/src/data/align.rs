//! Shared-axis alignment padding.
//!
//! A chart that overlays several series needs every series defined over the
//! full visible date axis. A fetched series can start later than the chart's
//! reference start (no history before listing), and smoothing removes its
//! first dates. Both gaps are filled with zero sentinels here.
//!
//! The lag region is measured from `data_start`, the first date of the series
//! *before* smoothing. Passing the smoothed series' own first date shifts the
//! lag region forward by `window - 1` days.

use crate::domain::{AveragingWindow, DuplicatePolicy, Series};
use chrono::NaiveDate;
use tracing::debug;

/// Price written for padded dates.
pub const SENTINEL: f64 = 0.0;

/// Counts of what `align` inserted.
///
/// Sentinels are plain zeros in the output series; this report is how a
/// caller tells padding apart from real zero-price observations.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct AlignReport {
    /// Sentinels for `reference_start <= d < data_start`.
    pub leading_pad: usize,
    /// Sentinels for `data_start <= d < data_start + lag_days`.
    pub lag_pad: usize,
    /// Lag-region dates that held a smoothed value before padding.
    pub displaced: usize,
}

impl AlignReport {
    pub fn total_pad(&self) -> usize {
        self.leading_pad + self.lag_pad
    }
}

/// Pad `series` so it starts at `reference_start`.
///
/// - every day in `[reference_start, data_start)` is added as a sentinel,
///   unless the series already holds that date;
/// - every day in `[data_start, data_start + lag_days)` is set to the sentinel;
/// - everything else in `series` is carried through unchanged.
///
/// When `data_start < reference_start` nothing is added before `data_start`
/// and no early data is dropped.
pub fn align(
    series: Series,
    reference_start: NaiveDate,
    data_start: NaiveDate,
    lag_days: AveragingWindow,
) -> Series {
    align_with_report(series, reference_start, data_start, lag_days).0
}

/// `align` for an unsmoothed series, taking `data_start` from the series.
pub fn align_raw(series: Series, reference_start: NaiveDate, lag_days: AveragingWindow) -> Series {
    match series.first_date() {
        Some(data_start) => align(series, reference_start, data_start, lag_days),
        None => series,
    }
}

/// `align`, also returning what was inserted.
pub fn align_with_report(
    mut series: Series,
    reference_start: NaiveDate,
    data_start: NaiveDate,
    lag_days: AveragingWindow,
) -> (Series, AlignReport) {
    let mut report = AlignReport::default();

    for date in reference_start.iter_days().take_while(|d| *d < data_start) {
        if series.insert(date, SENTINEL, DuplicatePolicy::FirstWins).is_none() {
            report.leading_pad += 1;
        }
    }

    for date in data_start.iter_days().take(lag_days.days()) {
        if series.insert(date, SENTINEL, DuplicatePolicy::LastWins).is_some() {
            report.displaced += 1;
        }
        report.lag_pad += 1;
    }

    debug!(
        leading = report.leading_pad,
        lag = report.lag_pad,
        displaced = report.displaced,
        points = series.len(),
        "aligned series"
    );
    (series, report)
}
