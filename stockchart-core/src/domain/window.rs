//! Averaging windows and date ranges.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// Trailing moving-average length in days. Zero means no smoothing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct AveragingWindow(usize);

impl AveragingWindow {
    pub const NONE: AveragingWindow = AveragingWindow(0);

    pub const fn new(days: usize) -> Self {
        Self(days)
    }

    pub const fn days(self) -> usize {
        self.0
    }

    pub const fn is_none(self) -> bool {
        self.0 == 0
    }
}

/// `"none"` for the zero window, otherwise the day count.
impl fmt::Display for AveragingWindow {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_none() {
            f.write_str("none")
        } else {
            write!(f, "{}", self.0)
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("invalid averaging window '{0}': expected \"none\" or a day count")]
pub struct InvalidWindow(pub String);

impl FromStr for AveragingWindow {
    type Err = InvalidWindow;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        if trimmed.eq_ignore_ascii_case("none") {
            return Ok(Self::NONE);
        }
        trimmed
            .parse::<usize>()
            .map(Self)
            .map_err(|_| InvalidWindow(s.to_string()))
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("date range start {start} is after end {end}")]
pub struct InvalidDateRange {
    pub start: NaiveDate,
    pub end: NaiveDate,
}

/// Inclusive calendar date range with `start <= end`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct DateRange {
    start: NaiveDate,
    end: NaiveDate,
}

impl DateRange {
    pub fn new(start: NaiveDate, end: NaiveDate) -> Result<Self, InvalidDateRange> {
        if start > end {
            return Err(InvalidDateRange { start, end });
        }
        Ok(Self { start, end })
    }

    pub fn start(&self) -> NaiveDate {
        self.start
    }

    pub fn end(&self) -> NaiveDate {
        self.end
    }
}
