//! Stockchart Core — quote ingestion and shared-axis alignment.
//!
//! This crate turns a ticker symbol and a date range into a series that can be
//! overlaid against other independently-fetched series on one chart:
//! - Domain types (series, averaging windows, date ranges, named series)
//! - Quote parsing from delimited text, with an explicit duplicate-date policy
//! - Trailing moving-average smoothing over a bounded working window
//! - Alignment padding with zero sentinels for missing history and smoothing lag
//! - The load pipeline that composes the three behind an injected transport
//! - A chart registry with stable removal and overlay table construction

pub mod chart;
pub mod config;
pub mod data;
pub mod domain;
pub mod indicators;
pub mod pipeline;

pub use chart::{ChartError, ChartSink, OverlayTable, SeriesHandle, SeriesRegistry};
pub use config::{ConfigError, StockchartConfig};
pub use domain::{AveragingWindow, DateRange, DuplicatePolicy, NamedSeries, Series};
pub use pipeline::{LoadError, SeriesPipeline};
