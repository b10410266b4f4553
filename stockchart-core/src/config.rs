//! TOML-loadable settings for the load pipeline.
//!
//! Every section has defaults, so an empty file (or no file) is a valid
//! configuration. The defaults describe a Yahoo-style history download:
//! `Date,Open,High,Low,Close,Adj Close,Volume` with a header row.

use crate::domain::{AveragingWindow, DateRange, InvalidDateRange};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::path::Path;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config {path}: {message}")]
    Io { path: String, message: String },

    #[error("invalid TOML: {0}")]
    Toml(#[from] toml::de::Error),

    #[error("invalid config: {0}")]
    Invalid(String),
}

/// Layout of the delimited quote records.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ParserConfig {
    /// Field separator. Must be a single ASCII character.
    pub delimiter: char,
    /// `chrono` format string for field 0.
    pub date_format: String,
    /// Zero-based index of the closing price field.
    pub price_field: usize,
    /// Whether the first record is a header row.
    pub has_header: bool,
}

impl Default for ParserConfig {
    fn default() -> Self {
        Self {
            delimiter: ',',
            date_format: "%Y-%m-%d".into(),
            price_field: 4,
            has_header: true,
        }
    }
}

/// Default date range bounds.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RangeConfig {
    /// Fixed epoch used when no start date is given.
    pub default_start: NaiveDate,
}

impl Default for RangeConfig {
    fn default() -> Self {
        Self {
            default_start: NaiveDate::from_ymd_opt(2000, 1, 1).unwrap_or(NaiveDate::MIN),
        }
    }
}

impl RangeConfig {
    /// Resolve optional bounds against the defaults (`default_start`, `today`).
    pub fn resolve(
        &self,
        start: Option<NaiveDate>,
        end: Option<NaiveDate>,
        today: NaiveDate,
    ) -> Result<DateRange, InvalidDateRange> {
        DateRange::new(
            start.unwrap_or(self.default_start),
            end.unwrap_or(today),
        )
    }
}

/// The selectable averaging windows.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct WindowConfig {
    /// Allowed trailing-day counts; `0` is "none". Empty allows any window.
    pub allowed: Vec<AveragingWindow>,
}

impl Default for WindowConfig {
    fn default() -> Self {
        Self {
            allowed: [0, 5, 10, 20, 50, 100, 200]
                .into_iter()
                .map(AveragingWindow::new)
                .collect(),
        }
    }
}

impl WindowConfig {
    pub fn permits(&self, window: AveragingWindow) -> bool {
        self.allowed.is_empty() || self.allowed.contains(&window)
    }
}

/// HTTP transport settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TransportConfig {
    /// Download URL with `{symbol}`, `{period1}` and `{period2}` placeholders.
    pub url_template: String,
    pub timeout_secs: u64,
    pub user_agent: String,
}

impl Default for TransportConfig {
    fn default() -> Self {
        Self {
            url_template: "https://query1.finance.yahoo.com/v7/finance/download/{symbol}\
                           ?period1={period1}&period2={period2}&interval=1d&events=history"
                .into(),
            timeout_secs: 30,
            user_agent: "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36".into(),
        }
    }
}

/// Top-level configuration.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct StockchartConfig {
    pub parser: ParserConfig,
    pub range: RangeConfig,
    pub windows: WindowConfig,
    pub transport: TransportConfig,
}

impl StockchartConfig {
    pub fn from_toml_str(s: &str) -> Result<Self, ConfigError> {
        let config: StockchartConfig = toml::from_str(s)?;
        config.validate()?;
        Ok(config)
    }

    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let text = std::fs::read_to_string(path).map_err(|e| ConfigError::Io {
            path: path.display().to_string(),
            message: e.to_string(),
        })?;
        Self::from_toml_str(&text)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if !self.parser.delimiter.is_ascii() {
            return Err(ConfigError::Invalid(format!(
                "delimiter {:?} is not a single ASCII character",
                self.parser.delimiter
            )));
        }
        if self.parser.price_field == 0 {
            return Err(ConfigError::Invalid(
                "price_field 0 is the date field".into(),
            ));
        }
        if self.parser.date_format.is_empty() {
            return Err(ConfigError::Invalid("date_format is empty".into()));
        }
        if !self.transport.url_template.contains("{symbol}") {
            return Err(ConfigError::Invalid(
                "url_template has no {symbol} placeholder".into(),
            ));
        }
        if self.transport.timeout_secs == 0 {
            return Err(ConfigError::Invalid("timeout_secs must be > 0".into()));
        }
        Ok(())
    }
}
