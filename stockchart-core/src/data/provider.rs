//! Quote transport trait and structured transport errors.
//!
//! The QuoteTransport trait abstracts over where raw quote text comes from
//! (an HTTP download, a local directory) so the pipeline can be driven by
//! either and mocked for tests.

use chrono::NaiveDate;
use thiserror::Error;

/// Failure to retrieve raw quote data for a symbol.
///
/// Every variant is reported to the user as "symbol could not be retrieved".
#[derive(Debug, Clone, PartialEq, Error)]
pub enum TransportError {
    #[error("network unreachable: {0}")]
    Network(String),

    #[error("HTTP {status} for {symbol}")]
    Http { status: u16, symbol: String },

    #[error("symbol not found: {symbol}")]
    SymbolNotFound { symbol: String },

    #[error("failed to read {path}: {message}")]
    Io { path: String, message: String },
}

/// Characters a ticker may contain besides ASCII alphanumerics
/// (`BRK.B`, `^GSPC`, `EURUSD=X`, `BTC-USD`).
const TICKER_PUNCTUATION: &[char] = &['.', '^', '=', '-'];

/// True for a non-empty symbol made only of ticker characters.
///
/// Anything else could escape a quote directory or rewrite a request URL.
pub fn is_ticker_symbol(symbol: &str) -> bool {
    !symbol.is_empty()
        && symbol
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || TICKER_PUNCTUATION.contains(&c))
}

/// Source of raw delimited quote text.
///
/// Implementations block until the data arrives or the fetch fails. They do
/// not retry; timeouts, if any, are the implementation's own.
pub trait QuoteTransport: Send + Sync {
    /// Human-readable name of this transport.
    fn name(&self) -> &str;

    /// Fetch raw quote records for `symbol` over `[start, end]`.
    fn fetch(&self, symbol: &str, start: NaiveDate, end: NaiveDate)
        -> Result<Vec<u8>, TransportError>;
}

impl<T: QuoteTransport + ?Sized> QuoteTransport for Box<T> {
    fn name(&self) -> &str {
        (**self).name()
    }

    fn fetch(
        &self,
        symbol: &str,
        start: NaiveDate,
        end: NaiveDate,
    ) -> Result<Vec<u8>, TransportError> {
        (**self).fetch(symbol, start, end)
    }
}
