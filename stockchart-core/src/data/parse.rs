//! Delimited quote record parsing.
//!
//! Field 0 of every record holds the date; a configured field holds the
//! closing price. Records need not be sorted. Dates that appear more than
//! once resolve by [`DuplicatePolicy::LastWins`].

use crate::config::ParserConfig;
use crate::domain::{DuplicatePolicy, Series};
use chrono::NaiveDate;
use thiserror::Error;
use tracing::debug;

#[derive(Debug, Clone, PartialEq, Error)]
pub enum ParseError {
    #[error("line {line}: expected at least {required} fields, found {found}")]
    MissingField {
        line: u64,
        required: usize,
        found: usize,
    },

    #[error("line {line}: invalid date '{value}'")]
    InvalidDate { line: u64, value: String },

    #[error("line {line}: invalid price '{value}'")]
    InvalidPrice { line: u64, value: String },

    #[error("line {line}: malformed record: {message}")]
    Csv { line: u64, message: String },

    #[error("response is not valid UTF-8")]
    Encoding,

    #[error("response contains no quote records")]
    Empty,
}

/// Parser for one fixed record layout.
#[derive(Debug, Clone)]
pub struct QuoteParser {
    delimiter: u8,
    date_format: String,
    price_field: usize,
    duplicates: DuplicatePolicy,
}

impl QuoteParser {
    /// Build a parser from a layout. Non-ASCII delimiters fall back to `,`;
    /// `StockchartConfig::validate` rejects them before this point.
    pub fn new(config: &ParserConfig) -> Self {
        let delimiter = u8::try_from(config.delimiter)
            .ok()
            .filter(u8::is_ascii)
            .unwrap_or(b',');
        Self {
            delimiter,
            date_format: config.date_format.clone(),
            price_field: config.price_field,
            duplicates: DuplicatePolicy::LastWins,
        }
    }

    pub fn price_field(&self) -> usize {
        self.price_field
    }

    /// Parse `raw` into an ascending series. No partial result on failure.
    pub fn parse(&self, raw: &str, has_header: bool) -> Result<Series, ParseError> {
        let raw = raw.strip_prefix('\u{feff}').unwrap_or(raw);
        let mut reader = csv::ReaderBuilder::new()
            .has_headers(has_header)
            .delimiter(self.delimiter)
            .flexible(true)
            .trim(csv::Trim::All)
            .from_reader(raw.as_bytes());

        let mut series = Series::new();
        let mut records = 0usize;
        let mut duplicates = 0usize;

        for (index, result) in reader.records().enumerate() {
            let fallback_line = index as u64 + 1 + u64::from(has_header);
            let record = result.map_err(|e| ParseError::Csv {
                line: e.position().map_or(fallback_line, |p| p.line()),
                message: e.to_string(),
            })?;
            let line = record.position().map_or(fallback_line, |p| p.line());

            let (date, price) = self.parse_record(&record, line)?;
            if series.insert(date, price, self.duplicates).is_some() {
                duplicates += 1;
            }
            records += 1;
        }

        if series.is_empty() {
            return Err(ParseError::Empty);
        }

        debug!(records, duplicates, points = series.len(), "parsed quote records");
        Ok(series)
    }

    fn parse_record(
        &self,
        record: &csv::StringRecord,
        line: u64,
    ) -> Result<(NaiveDate, f64), ParseError> {
        let required = self.price_field + 1;
        if record.len() < required {
            return Err(ParseError::MissingField {
                line,
                required,
                found: record.len(),
            });
        }

        let date_field = &record[0];
        let date = NaiveDate::parse_from_str(date_field, &self.date_format).map_err(|_| {
            ParseError::InvalidDate {
                line,
                value: date_field.to_string(),
            }
        })?;

        let price_field = &record[self.price_field];
        let price = price_field
            .parse::<f64>()
            .ok()
            .filter(|p| p.is_finite() && *p >= 0.0)
            .ok_or_else(|| ParseError::InvalidPrice {
                line,
                value: price_field.to_string(),
            })?;
        // -0.0 passes the check above; store it as +0.0.
        let price = price + 0.0;

        Ok((date, price))
    }
}

impl Default for QuoteParser {
    fn default() -> Self {
        Self::new(&ParserConfig::default())
    }
}
