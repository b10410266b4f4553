//! Stockchart CLI — load symbols and print overlay-ready series.
//!
//! Commands:
//! - `load` — fetch one or more symbols, smooth and align them to a shared
//!   reference start, and write them as one table on a common date axis
//! - `parse` — parse a local quote file and print the (optionally smoothed) series

use anyhow::{bail, Context, Result};
use chrono::NaiveDate;
use clap::{Parser, Subcommand, ValueEnum};
use serde::Serialize;
use std::io::Write;
use std::path::{Path, PathBuf};
use stockchart_core::data::{DirectoryTransport, HttpTransport, QuoteParser, QuoteTransport};
use stockchart_core::indicators::smooth;
use stockchart_core::{
    AveragingWindow, DateRange, OverlayTable, Series, SeriesPipeline, SeriesRegistry,
    StockchartConfig,
};
use tracing::warn;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(
    name = "stockchart",
    about = "Stockchart CLI — aligned daily quote series for shared-axis charts"
)]
struct Cli {
    /// Path to a TOML config file. Defaults to <config dir>/stockchart/config.toml if present.
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Load symbols through the pipeline and print them on one date axis.
    Load {
        /// Symbols to load (e.g., SPY QQQ AAPL).
        #[arg(required = true)]
        symbols: Vec<String>,

        /// Trailing moving-average window in days, or "none".
        #[arg(long, default_value = "none")]
        window: AveragingWindow,

        /// Start date (YYYY-MM-DD). Defaults to the configured epoch.
        #[arg(long)]
        start: Option<String>,

        /// End date (YYYY-MM-DD). Defaults to today.
        #[arg(long)]
        end: Option<String>,

        /// Read <DIR>/<SYMBOL>.csv instead of downloading.
        #[arg(long)]
        dir: Option<PathBuf>,

        /// Output format.
        #[arg(long, value_enum, default_value_t = OutputFormat::Csv)]
        format: OutputFormat,
    },
    /// Parse a local quote file and print the series.
    Parse {
        /// Quote file to parse.
        file: PathBuf,

        /// Treat the first record as data, not a header.
        #[arg(long, default_value_t = false)]
        no_header: bool,

        /// Trailing moving-average window in days, or "none".
        #[arg(long, default_value = "none")]
        window: AveragingWindow,
    },
}

#[derive(Clone, Copy, ValueEnum)]
enum OutputFormat {
    Csv,
    Json,
}

fn main() -> Result<()> {
    init_tracing();
    let cli = Cli::parse();
    let config = load_config(cli.config.as_deref())?;

    match cli.command {
        Commands::Load {
            symbols,
            window,
            start,
            end,
            dir,
            format,
        } => run_load(&config, symbols, window, start, end, dir, format),
        Commands::Parse {
            file,
            no_header,
            window,
        } => run_parse(&config, &file, !no_header, window),
    }
}

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("stockchart_core=info,stockchart_cli=info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

/// Explicit `--config` must exist; the default location is optional.
fn load_config(explicit: Option<&Path>) -> Result<StockchartConfig> {
    if let Some(path) = explicit {
        return StockchartConfig::from_file(path)
            .with_context(|| format!("loading config {}", path.display()));
    }
    let default_path = dirs::config_dir().map(|d| d.join("stockchart").join("config.toml"));
    match default_path {
        Some(path) if path.is_file() => StockchartConfig::from_file(&path)
            .with_context(|| format!("loading config {}", path.display())),
        _ => Ok(StockchartConfig::default()),
    }
}

fn parse_date(s: Option<&str>) -> Result<Option<NaiveDate>> {
    s.map(|s| NaiveDate::parse_from_str(s, "%Y-%m-%d"))
        .transpose()
        .context("dates must be YYYY-MM-DD")
}

fn run_load(
    config: &StockchartConfig,
    symbols: Vec<String>,
    window: AveragingWindow,
    start: Option<String>,
    end: Option<String>,
    dir: Option<PathBuf>,
    format: OutputFormat,
) -> Result<()> {
    let today = chrono::Local::now().date_naive();
    let range = config
        .range
        .resolve(parse_date(start.as_deref())?, parse_date(end.as_deref())?, today)?;

    let transport: Box<dyn QuoteTransport> = match dir {
        Some(dir) => Box::new(DirectoryTransport::new(dir)),
        None => Box::new(HttpTransport::new(&config.transport)?),
    };
    let pipeline = SeriesPipeline::from_config(transport.as_ref(), config);
    let mut registry = SeriesRegistry::new();
    let failed = load_symbols(
        &pipeline,
        &mut registry,
        &symbols,
        range,
        window,
        std::io::stderr().lock(),
    )?;

    if !registry.is_empty() {
        let table = registry.overlay();
        let stdout = std::io::stdout();
        match format {
            OutputFormat::Csv => write_overlay_csv(&table, stdout.lock())?,
            OutputFormat::Json => write_overlay_json(&table, stdout.lock())?,
        }
    }

    if failed > 0 {
        std::process::exit(1);
    }
    Ok(())
}

/// Load each symbol into `registry`, reporting failures to `errors`.
///
/// A failed symbol leaves earlier series in place. Returns the failure count.
fn load_symbols(
    pipeline: &SeriesPipeline<'_>,
    registry: &mut SeriesRegistry,
    symbols: &[String],
    range: DateRange,
    window: AveragingWindow,
    mut errors: impl Write,
) -> Result<usize> {
    let mut failed = 0usize;

    for symbol in symbols {
        match pipeline.load_into(registry, symbol, range, window) {
            Ok(handle) => tracing::info!(series = handle.name(), "series added"),
            Err(e) if e.is_retrieval_failure() => {
                warn!(symbol = %symbol, error = %e, "retrieval failed");
                writeln!(errors, "Stock symbol \"{symbol}\" could not be retrieved.")?;
                failed += 1;
            }
            Err(e) => {
                warn!(symbol = %symbol, error = %e, "load failed");
                writeln!(errors, "Error for {symbol}: {e}")?;
                failed += 1;
            }
        }
    }
    Ok(failed)
}

fn run_parse(
    config: &StockchartConfig,
    file: &Path,
    has_header: bool,
    window: AveragingWindow,
) -> Result<()> {
    let text = std::fs::read_to_string(file)
        .with_context(|| format!("reading {}", file.display()))?;
    let parser = QuoteParser::new(&config.parser);
    let series = parser.parse(&text, has_header)?;
    let smoothed = smooth(series, window)?;
    if smoothed.is_empty() {
        bail!("no points after smoothing");
    }
    write_series_csv(&smoothed, std::io::stdout().lock())
}

fn write_overlay_csv(table: &OverlayTable, out: impl Write) -> Result<()> {
    let mut wtr = csv::Writer::from_writer(out);

    let mut header = vec!["date".to_string()];
    header.extend(table.columns.iter().map(|c| c.name.clone()));
    wtr.write_record(&header)?;

    for (row, date) in table.dates.iter().enumerate() {
        let mut record = vec![date.format("%Y-%m-%d").to_string()];
        record.extend(
            table
                .columns
                .iter()
                .map(|c| c.values[row].map(|v| v.to_string()).unwrap_or_default()),
        );
        wtr.write_record(&record)?;
    }
    wtr.flush()?;
    Ok(())
}

/// JSON shape: one object per series with its points in date order.
#[derive(Serialize)]
struct JsonSeries<'a> {
    name: &'a str,
    points: Vec<JsonPoint>,
}

#[derive(Serialize)]
struct JsonPoint {
    date: NaiveDate,
    price: f64,
}

fn write_overlay_json(table: &OverlayTable, mut out: impl Write) -> Result<()> {
    let series: Vec<JsonSeries<'_>> = table
        .columns
        .iter()
        .map(|c| JsonSeries {
            name: &c.name,
            points: table
                .dates
                .iter()
                .zip(&c.values)
                .filter_map(|(date, v)| v.map(|price| JsonPoint { date: *date, price }))
                .collect(),
        })
        .collect();
    serde_json::to_writer_pretty(&mut out, &series)?;
    writeln!(out)?;
    Ok(())
}

fn write_series_csv(series: &Series, out: impl Write) -> Result<()> {
    let mut wtr = csv::Writer::from_writer(out);
    wtr.write_record(["date", "price"])?;
    for (date, price) in series.iter() {
        wtr.write_record([date.format("%Y-%m-%d").to_string(), price.to_string()])?;
    }
    wtr.flush()?;
    Ok(())
}
