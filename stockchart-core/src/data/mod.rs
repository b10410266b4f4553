//! Quote ingestion: transports, parsing, alignment.

pub mod align;
pub mod directory;
pub mod parse;
pub mod provider;
pub mod yahoo;

pub use align::{align, align_raw, align_with_report, AlignReport, SENTINEL};
pub use directory::DirectoryTransport;
pub use parse::{ParseError, QuoteParser};
pub use provider::{is_ticker_symbol, QuoteTransport, TransportError};
pub use yahoo::HttpTransport;
