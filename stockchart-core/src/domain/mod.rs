//! Domain types: series, averaging windows, date ranges.

pub mod series;
pub mod window;

pub use series::{DuplicatePolicy, NamedSeries, Series};
pub use window::{AveragingWindow, DateRange, InvalidDateRange, InvalidWindow};
