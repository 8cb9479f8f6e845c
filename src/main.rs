use analytics::{Classification, StreakRuns, calculate_all_metrics, classify};
use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand};
use configuration::{Config, OutputFormat, PriceMode, load_config};
use core_types::{Candle, DayType};
use market_data::CsvLoader;
use rust_decimal::Decimal;
use serde::Serialize;
use std::path::{Path, PathBuf};
use tracing_subscriber::{EnvFilter, FmtSubscriber};

mod render;

/// The main entry point for the win/loss report tool.
fn main() -> Result<()> {
    // A missing .env file is fine; variables may come from the shell instead.
    dotenvy::dotenv().ok();

    // Parse command-line arguments
    let cli = Cli::parse();

    let config = load_config(cli.config.as_deref()).context("Failed to load configuration")?;
    init_tracing(&config.logging.level)?;

    // Execute the appropriate command
    match cli.command {
        Commands::Report(args) => handle_report(args, config),
        Commands::Classify(args) => handle_classify(args, config),
        Commands::Streaks(args) => handle_streaks(args, config),
    }
}

fn init_tracing(default_level: &str) -> Result<()> {
    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(default_level))
        .with_context(|| format!("Invalid log level '{default_level}'"))?;

    let subscriber = FmtSubscriber::builder()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .finish();
    tracing::subscriber::set_global_default(subscriber)?;
    Ok(())
}

// ==============================================================================
// CLI Structure
// ==============================================================================

/// Win/loss ratio, win rate and streak statistics for daily price series.
#[derive(Parser)]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Path to a TOML configuration file. Defaults to ./winloss.toml when present.
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Compute every win/loss metric for a price file.
    Report(DataArgs),
    /// Show the win/loss/neutral breakdown and the label of every period.
    Classify(DataArgs),
    /// List the win or loss streaks of a price file.
    Streaks(StreaksArgs),
}

/// Input and output options shared by every command. Each one overrides the
/// matching configuration value.
#[derive(Args)]
struct DataArgs {
    /// The CSV file to read.
    #[arg(long, short)]
    file: PathBuf,

    /// Compare close to open per row, or each price to the previous one.
    #[arg(long, value_enum)]
    mode: Option<PriceMode>,

    /// The price column used in close-to-close mode.
    #[arg(long)]
    column: Option<String>,

    /// Keep only rows for this symbol.
    #[arg(long)]
    symbol: Option<String>,

    #[arg(long, value_enum)]
    format: Option<OutputFormat>,

    /// Decimal places shown for ratios, rates and averages.
    #[arg(long)]
    precision: Option<u32>,
}

#[derive(Parser)]
struct StreaksArgs {
    #[command(flatten)]
    data: DataArgs,

    /// Which streaks to list: win (green) or loss (red).
    #[arg(long, default_value = "win")]
    kind: DayType,
}

impl DataArgs {
    /// Layers the command-line flags over the loaded configuration.
    fn apply(&self, mut config: Config) -> Result<Config> {
        if let Some(mode) = self.mode {
            config.data.mode = mode;
        }
        if let Some(column) = &self.column {
            config.data.price_column = column.clone();
        }
        if let Some(symbol) = &self.symbol {
            config.data.symbol = Some(symbol.clone());
        }
        if let Some(format) = self.format {
            config.report.format = format;
        }
        if let Some(precision) = self.precision {
            config.report.precision = precision;
        }
        config.validate()?;
        Ok(config)
    }
}

// ==============================================================================
// Data Loading
// ==============================================================================

/// Prices as read from disk, in the shape the configured mode needs.
enum Series {
    Candles(Vec<Candle>),
    Closes(Vec<Decimal>),
}

impl Series {
    fn load(path: &Path, config: &Config) -> Result<Self> {
        let mut loader = CsvLoader::new();
        if let Some(symbol) = &config.data.symbol {
            loader = loader.with_symbol(symbol.clone());
        }

        let series = match config.data.mode {
            PriceMode::OpenClose => Series::Candles(loader.load_candles(path)?),
            PriceMode::CloseToClose => {
                Series::Closes(loader.load_closes(path, &config.data.price_column)?)
            }
        };

        tracing::info!(
            file = %path.display(),
            mode = ?config.data.mode,
            rows = series.len(),
            "Loaded price series"
        );
        Ok(series)
    }

    fn len(&self) -> usize {
        match self {
            Series::Candles(candles) => candles.len(),
            Series::Closes(closes) => closes.len(),
        }
    }

    fn classify(&self) -> Result<Classification> {
        let classification = match self {
            Series::Candles(candles) => classify(candles)?,
            Series::Closes(closes) => classify(closes)?,
        };
        Ok(classification)
    }
}

// ==============================================================================
// Command Handlers
// ==============================================================================

#[derive(Serialize)]
struct ReportOutput<'a, T: Serialize> {
    source: String,
    mode: PriceMode,
    #[serde(flatten)]
    body: &'a T,
}

impl<'a, T: Serialize> ReportOutput<'a, T> {
    fn new(args: &DataArgs, config: &Config, body: &'a T) -> Self {
        Self {
            source: args.file.display().to_string(),
            mode: config.data.mode,
            body,
        }
    }
}

fn print_json<T: Serialize>(value: &T) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

fn handle_report(args: DataArgs, config: Config) -> Result<()> {
    let config = args.apply(config)?;
    let series = Series::load(&args.file, &config)?;

    // Classify once; the labeled sequence feeds every metric.
    let classification = series.classify()?;
    let report = calculate_all_metrics(&classification.labels)?;

    match config.report.format {
        OutputFormat::Table => {
            let dp = config.report.precision;
            println!("{}", render::metrics_table(&report, dp));
            println!("{}", render::breakdown_table(&report.breakdown, dp));
        }
        OutputFormat::Json => print_json(&ReportOutput::new(&args, &config, &report))?,
    }
    Ok(())
}

fn handle_classify(args: DataArgs, config: Config) -> Result<()> {
    let config = args.apply(config)?;
    let series = Series::load(&args.file, &config)?;
    let classification = series.classify()?;

    match config.report.format {
        OutputFormat::Table => {
            println!(
                "{}",
                render::breakdown_table(&classification.breakdown, config.report.precision)
            );
            println!("{}", render::labels_table(&classification.labels));
        }
        OutputFormat::Json => print_json(&ReportOutput::new(&args, &config, &classification))?,
    }
    Ok(())
}

#[derive(Serialize)]
struct StreakSummary<'a> {
    kind: DayType,
    runs: &'a [usize],
    max: usize,
    average: Decimal,
}

fn handle_streaks(args: StreaksArgs, config: Config) -> Result<()> {
    let config = args.data.apply(config)?;
    let series = Series::load(&args.data.file, &config)?;
    let classification = series.classify()?;

    let runs = StreakRuns::scan(classification.labels.as_slice());
    let summary = StreakSummary {
        kind: args.kind,
        runs: runs.runs(args.kind)?,
        max: runs.max(args.kind)?,
        average: runs.average(args.kind)?,
    };

    match config.report.format {
        OutputFormat::Table => {
            println!("{}", render::streaks_table(&summary, config.report.precision));
        }
        OutputFormat::Json => print_json(&ReportOutput::new(&args.data, &config, &summary))?,
    }
    Ok(())
}
