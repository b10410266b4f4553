//! Trailing simple moving average over a date-indexed series.
//!
//! Lookback: window - 1. The first `window - 1` dates have no full trailing
//! window and are dropped from the output (not zero-filled; that is the
//! alignment step's job).

use crate::domain::{AveragingWindow, DuplicatePolicy, Series};
use std::collections::VecDeque;
use thiserror::Error;
use tracing::debug;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
#[error("insufficient data: a {required}-day average needs {required} quotes, found {available}")]
pub struct InsufficientDataError {
    pub required: usize,
    pub available: usize,
}

/// Bounded working window with a running sum.
///
/// `push` adds the newest value and, once the window is full, evicts the
/// oldest, so each step is O(1). The sum is Neumaier-compensated: evicting a
/// value much larger than the rest of the window leaves the remaining sum
/// exact instead of cancelling to zero.
#[derive(Debug, Clone)]
pub struct RollingMean {
    window: VecDeque<f64>,
    capacity: usize,
    sum: f64,
    compensation: f64,
}

impl RollingMean {
    pub fn new(capacity: usize) -> Self {
        assert!(capacity >= 1, "RollingMean capacity must be >= 1");
        Self {
            window: VecDeque::with_capacity(capacity + 1),
            capacity,
            sum: 0.0,
            compensation: 0.0,
        }
    }

    /// Add a value. Returns the mean once `capacity` values have been seen.
    pub fn push(&mut self, value: f64) -> Option<f64> {
        self.window.push_back(value);
        self.accumulate(value);
        if self.window.len() > self.capacity {
            if let Some(oldest) = self.window.pop_front() {
                self.accumulate(-oldest);
            }
        }
        self.is_full()
            .then(|| (self.sum + self.compensation) / self.capacity as f64)
    }

    fn accumulate(&mut self, value: f64) {
        let total = self.sum + value;
        if self.sum.abs() >= value.abs() {
            self.compensation += (self.sum - total) + value;
        } else {
            self.compensation += (value - total) + self.sum;
        }
        self.sum = total;
    }

    pub fn is_full(&self) -> bool {
        self.window.len() == self.capacity
    }

    pub fn len(&self) -> usize {
        self.window.len()
    }

    pub fn is_empty(&self) -> bool {
        self.window.is_empty()
    }
}

/// Smooth `series` with a trailing `window`-day arithmetic mean.
///
/// A zero window returns the series unchanged. Otherwise each output point is
/// keyed at the last date of its window, and the output has
/// `len - window + 1` points.
pub fn smooth(series: Series, window: AveragingWindow) -> Result<Series, InsufficientDataError> {
    if window.is_none() {
        return Ok(series);
    }

    let period = window.days();
    if series.len() < period {
        return Err(InsufficientDataError {
            required: period,
            available: series.len(),
        });
    }

    let input_len = series.len();
    let mut rolling = RollingMean::new(period);
    let mut out = Series::new();
    for (date, price) in series {
        if let Some(mean) = rolling.push(price) {
            out.insert(date, mean, DuplicatePolicy::LastWins);
        }
    }

    debug!(window = period, input = input_len, output = out.len(), "smoothed series");
    Ok(out)
}
