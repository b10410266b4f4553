//! Load pipeline: fetch → parse → smooth → align.
//!
//! `SeriesPipeline::load` is the one entry point the display layer uses. A
//! failure at any step aborts the load; no partial series is returned and
//! nothing is retried.

use crate::chart::{ChartError, ChartSink, SeriesHandle};
use crate::config::{ParserConfig, StockchartConfig, WindowConfig};
use crate::data::{
    align_with_report, is_ticker_symbol, ParseError, QuoteParser, QuoteTransport, TransportError,
};
use crate::domain::{AveragingWindow, DateRange, NamedSeries};
use crate::indicators::{smooth, InsufficientDataError};
use thiserror::Error;
use tracing::{debug, info};

/// Every way a load can fail.
#[derive(Debug, Error)]
pub enum LoadError {
    #[error("invalid request: {0}")]
    InvalidRequest(String),

    #[error(transparent)]
    Transport(#[from] TransportError),

    #[error(transparent)]
    Parse(#[from] ParseError),

    #[error(transparent)]
    InsufficientData(#[from] InsufficientDataError),

    #[error(transparent)]
    Chart(#[from] ChartError),
}

impl LoadError {
    /// True when the symbol's data could not be retrieved at all.
    pub fn is_retrieval_failure(&self) -> bool {
        matches!(self, LoadError::Transport(_))
    }
}

/// Display name for a loaded series: `"<SYMBOL> (<window>)"`.
pub fn display_name(symbol: &str, window: AveragingWindow) -> String {
    format!("{} ({window})", symbol.to_uppercase())
}

pub struct SeriesPipeline<'a> {
    transport: &'a dyn QuoteTransport,
    parser: QuoteParser,
    has_header: bool,
    windows: WindowConfig,
}

impl<'a> SeriesPipeline<'a> {
    /// Pipeline over `transport` accepting any averaging window.
    pub fn new(transport: &'a dyn QuoteTransport, parser: &ParserConfig) -> Self {
        Self {
            transport,
            parser: QuoteParser::new(parser),
            has_header: parser.has_header,
            windows: WindowConfig { allowed: Vec::new() },
        }
    }

    pub fn from_config(transport: &'a dyn QuoteTransport, config: &StockchartConfig) -> Self {
        Self::new(transport, &config.parser).with_windows(config.windows.clone())
    }

    /// Restrict the accepted averaging windows.
    pub fn with_windows(mut self, windows: WindowConfig) -> Self {
        self.windows = windows;
        self
    }

    /// Fetch, parse, smooth and align one symbol.
    pub fn load(
        &self,
        symbol: &str,
        range: DateRange,
        window: AveragingWindow,
    ) -> Result<NamedSeries, LoadError> {
        let symbol = validate_symbol(symbol)?;
        if !self.windows.permits(window) {
            return Err(LoadError::InvalidRequest(format!(
                "averaging window {window} is not one of the configured windows"
            )));
        }

        info!(
            symbol,
            %window,
            start = %range.start(),
            end = %range.end(),
            transport = self.transport.name(),
            "loading series"
        );

        let raw = self.transport.fetch(symbol, range.start(), range.end())?;
        let text = std::str::from_utf8(&raw).map_err(|_| ParseError::Encoding)?;
        let mut quotes = self.parser.parse(text, self.has_header)?;
        let after_end = quotes.truncate_after(range.end());
        debug!(quotes = quotes.len(), after_end, "quote list length");

        // The lag region is measured from the first raw quote, not the
        // first smoothed one. Empty here means every row was past the end.
        let data_start = quotes.first_date().ok_or(ParseError::Empty)?;

        let smoothed = smooth(quotes, window)?;
        debug!(points = smoothed.len(), "after moving average");

        let (aligned, report) = align_with_report(smoothed, range.start(), data_start, window);
        debug!(points = aligned.len(), padded = report.total_pad(), "after padding");

        Ok(NamedSeries::new(display_name(symbol, window), aligned))
    }

    /// `load`, then register the result with `sink`.
    ///
    /// Nothing is added to the sink when the load fails.
    pub fn load_into(
        &self,
        sink: &mut dyn ChartSink,
        symbol: &str,
        range: DateRange,
        window: AveragingWindow,
    ) -> Result<SeriesHandle, LoadError> {
        let series = self.load(symbol, range, window)?;
        Ok(sink.add_series(series)?)
    }
}

fn validate_symbol(symbol: &str) -> Result<&str, LoadError> {
    let trimmed = symbol.trim();
    if trimmed.is_empty() {
        return Err(LoadError::InvalidRequest("symbol is empty".into()));
    }
    if !is_ticker_symbol(trimmed) {
        return Err(LoadError::InvalidRequest(format!(
            "symbol '{trimmed}' may only contain letters, digits and . ^ = -"
        )));
    }
    Ok(trimmed)
}
