//! HTTP quote transport.
//!
//! Downloads daily history as delimited text from a URL template. The default
//! template targets Yahoo Finance's CSV history download, which serves
//! `Date,Open,High,Low,Close,Adj Close,Volume` with a header row.
//!
//! Yahoo Finance has no official API and is subject to unannounced format
//! changes. `DirectoryTransport` is the offline fallback.

use super::provider::{is_ticker_symbol, QuoteTransport, TransportError};
use crate::config::TransportConfig;
use chrono::NaiveDate;
use std::time::Duration;
use tracing::debug;

/// Blocking HTTP transport. One request per fetch, no retries.
pub struct HttpTransport {
    client: reqwest::blocking::Client,
    url_template: String,
}

impl HttpTransport {
    pub fn new(config: &TransportConfig) -> Result<Self, TransportError> {
        let client = reqwest::blocking::Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .user_agent(config.user_agent.as_str())
            .build()
            .map_err(|e| TransportError::Network(format!("failed to build HTTP client: {e}")))?;

        Ok(Self {
            client,
            url_template: config.url_template.clone(),
        })
    }

    /// Fill the URL template for a symbol and date range.
    ///
    /// `{period1}` is the start date at 00:00:00 UTC and `{period2}` the end
    /// date at 23:59:59 UTC, both as unix seconds.
    pub fn history_url(&self, symbol: &str, start: NaiveDate, end: NaiveDate) -> String {
        let start_ts = midnight_ts(start);
        let end_ts = midnight_ts(end) + 86_399;
        self.url_template
            .replace("{symbol}", symbol)
            .replace("{period1}", &start_ts.to_string())
            .replace("{period2}", &end_ts.to_string())
    }
}

fn midnight_ts(date: NaiveDate) -> i64 {
    date.and_time(chrono::NaiveTime::MIN).and_utc().timestamp()
}

impl QuoteTransport for HttpTransport {
    fn name(&self) -> &str {
        "http"
    }

    fn fetch(
        &self,
        symbol: &str,
        start: NaiveDate,
        end: NaiveDate,
    ) -> Result<Vec<u8>, TransportError> {
        if !is_ticker_symbol(symbol) {
            return Err(TransportError::SymbolNotFound {
                symbol: symbol.to_string(),
            });
        }
        let url = self.history_url(symbol, start, end);
        debug!(%url, "requesting quote history");

        let resp = self
            .client
            .get(&url)
            .send()
            .map_err(|e| TransportError::Network(e.to_string()))?;

        let status = resp.status();
        if status == reqwest::StatusCode::NOT_FOUND {
            return Err(TransportError::SymbolNotFound {
                symbol: symbol.to_string(),
            });
        }
        if !status.is_success() {
            return Err(TransportError::Http {
                status: status.as_u16(),
                symbol: symbol.to_string(),
            });
        }

        let body = resp
            .bytes()
            .map_err(|e| TransportError::Network(e.to_string()))?;
        debug!(bytes = body.len(), "received quote history");
        Ok(body.to_vec())
    }
}
