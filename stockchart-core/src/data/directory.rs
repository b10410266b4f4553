//! Offline transport reading `<dir>/<SYMBOL>.csv`.
//!
//! The file is returned whole; the date range is not applied here. Early rows
//! are kept by the alignment step, and the pipeline drops rows after the end
//! of the requested range. Symbols outside the ticker alphabet are refused,
//! so a lookup never leaves `dir`.

use super::provider::{is_ticker_symbol, QuoteTransport, TransportError};
use chrono::NaiveDate;
use std::path::{Path, PathBuf};
use tracing::debug;

#[derive(Debug, Clone)]
pub struct DirectoryTransport {
    dir: PathBuf,
}

impl DirectoryTransport {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Path for a symbol. Symbols are looked up uppercased.
    pub fn symbol_path(&self, symbol: &str) -> PathBuf {
        self.dir.join(format!("{}.csv", symbol.to_uppercase()))
    }
}

impl QuoteTransport for DirectoryTransport {
    fn name(&self) -> &str {
        "directory"
    }

    fn fetch(
        &self,
        symbol: &str,
        _start: NaiveDate,
        _end: NaiveDate,
    ) -> Result<Vec<u8>, TransportError> {
        if !is_ticker_symbol(symbol) {
            return Err(TransportError::SymbolNotFound {
                symbol: symbol.to_string(),
            });
        }
        let path = self.symbol_path(symbol);
        debug!(path = %path.display(), "reading quote file");

        std::fs::read(&path).map_err(|e| match e.kind() {
            std::io::ErrorKind::NotFound => TransportError::SymbolNotFound {
                symbol: symbol.to_string(),
            },
            _ => TransportError::Io {
                path: path.display().to_string(),
                message: e.to_string(),
            },
        })
    }
}
