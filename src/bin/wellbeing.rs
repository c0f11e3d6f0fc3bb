//! Wellbeing CLI - Command-line interface for the analytics engine
//!
//! Commands:
//! - correlate: Rank metric correlations against a target
//! - trend: Rolling trend and fitted direction of a metric
//! - summary: Achievements, streaks and milestones
//! - history: Daily series of the dashboard metrics
//! - breakdown: Logged hours split by time category
//! - generate: Write a synthetic check-in log

use clap::{Parser, Subcommand};
use chrono::NaiveDate;
use serde::Serialize;
use std::fs;
use std::io::{self, Read, Write};
use std::path::{Path, PathBuf};
use std::process::ExitCode;

use wellbeing_analytics::{
    generate, AnalyticsConfig, AnalyticsError, AnalyticsProcessor, Dataset, ENGINE_VERSION,
    PRODUCER_NAME,
};

/// Wellbeing - Analytics for personal well-being logs
#[derive(Parser)]
#[command(name = "wellbeing")]
#[command(author = "Synheart AI Inc")]
#[command(version = ENGINE_VERSION)]
#[command(about = "Compute correlations, trends and milestones from a check-in log", long_about = None)]
struct Cli {
    /// Engine configuration file (JSON)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Pretty-print JSON output (default when stdout is a terminal)
    #[arg(long, global = true)]
    pretty: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Rank correlations of every numeric metric against a target
    Correlate {
        /// Dataset file path (use - for stdin)
        #[arg(short, long)]
        input: PathBuf,

        /// Target metric
        #[arg(long, default_value = "physical_energy")]
        metric: String,
    },

    /// Rolling trend and fitted direction of a metric
    Trend {
        /// Dataset file path (use - for stdin)
        #[arg(short, long)]
        input: PathBuf,

        /// Metric to analyse
        #[arg(long, default_value = "physical_energy")]
        metric: String,

        /// Rolling window in days (overrides config)
        #[arg(long)]
        window_days: Option<usize>,

        /// Lookback in weeks (overrides config)
        #[arg(long)]
        lookback_weeks: Option<u32>,
    },

    /// Achievements, streaks and milestones
    Summary {
        /// Dataset file path (use - for stdin)
        #[arg(short, long)]
        input: PathBuf,

        /// Summary period in days (overrides config)
        #[arg(long)]
        period_days: Option<u32>,
    },

    /// Daily series of dashboard metrics
    History {
        /// Dataset file path (use - for stdin)
        #[arg(short, long)]
        input: PathBuf,

        /// Metrics to include (defaults to the history chart metrics)
        #[arg(long, value_delimiter = ',')]
        metrics: Vec<String>,
    },

    /// Logged hours split by time category
    Breakdown {
        /// Dataset file path (use - for stdin)
        #[arg(short, long)]
        input: PathBuf,
    },

    /// Write a synthetic check-in log
    Generate {
        /// Number of days to generate
        #[arg(long, default_value = "30", allow_hyphen_values = true)]
        days: i64,

        /// First day (YYYY-MM-DD)
        #[arg(long, default_value = "2024-01-01")]
        start_date: String,

        /// Random seed
        #[arg(long, default_value = "42")]
        seed: u64,

        /// Output file path (use - for stdout)
        #[arg(short, long, default_value = "-")]
        output: PathBuf,
    },
}

fn main() -> ExitCode {
    env_logger::Builder::new()
        .format_timestamp_millis()
        .filter_level(log::LevelFilter::Warn)
        .parse_default_env()
        .init();

    let cli = Cli::parse();

    match run(cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            log::error!("{e:?}");
            eprintln!(
                "{}",
                serde_json::to_string(&CliError::from(e))
                    .unwrap_or_else(|_| "Unknown error".to_string())
            );
            ExitCode::FAILURE
        }
    }
}

fn run(cli: Cli) -> Result<(), WellbeingCliError> {
    let mut config = match &cli.config {
        Some(path) => AnalyticsConfig::from_json(&read_input(path)?)?,
        None => AnalyticsConfig::default(),
    };
    let pretty = cli.pretty || atty::is(atty::Stream::Stdout);

    match cli.command {
        Commands::Correlate { input, metric } => {
            let dataset = load_dataset(&input)?;
            let processor = AnalyticsProcessor::with_config(config)?;
            emit(&processor.correlate(&dataset, &metric)?, pretty)
        }
        Commands::Trend {
            input,
            metric,
            window_days,
            lookback_weeks,
        } => {
            if let Some(window_days) = window_days {
                config.window_days = window_days;
            }
            if let Some(lookback_weeks) = lookback_weeks {
                config.lookback_weeks = lookback_weeks;
            }
            let dataset = load_dataset(&input)?;
            let processor = AnalyticsProcessor::with_config(config)?;
            emit(&processor.trend(&dataset, &metric)?, pretty)
        }
        Commands::Summary { input, period_days } => {
            if let Some(period_days) = period_days {
                config.period_days = period_days;
            }
            let dataset = load_dataset(&input)?;
            let processor = AnalyticsProcessor::with_config(config)?;
            emit(&processor.summary(&dataset)?, pretty)
        }
        Commands::History { input, metrics } => {
            let dataset = load_dataset(&input)?;
            let processor = AnalyticsProcessor::with_config(config)?;
            let metrics: Vec<&str> = metrics.iter().map(String::as_str).collect();
            emit(&processor.history(&dataset, &metrics)?, pretty)
        }
        Commands::Breakdown { input } => {
            let dataset = load_dataset(&input)?;
            let processor = AnalyticsProcessor::with_config(config)?;
            emit(&processor.time_breakdown(&dataset)?, pretty)
        }
        Commands::Generate {
            days,
            start_date,
            seed,
            output,
        } => {
            let start = NaiveDate::parse_from_str(&start_date, "%Y-%m-%d")
                .map_err(|e| WellbeingCliError::InvalidDate(format!("{start_date}: {e}")))?;
            let dataset = generate(days, start, seed);
            log::info!(
                "{} {} generated {} entries",
                PRODUCER_NAME,
                ENGINE_VERSION,
                dataset.len()
            );
            let json = if pretty && output.as_os_str() == "-" {
                serde_json::to_string_pretty(&dataset)?
            } else {
                dataset.to_json()?
            };
            write_output(&output, &json)
        }
    }
}

fn load_dataset(path: &Path) -> Result<Dataset, WellbeingCliError> {
    let dataset = Dataset::from_json(&read_input(path)?)?;
    log::info!("loaded {} entries from {:?}", dataset.len(), path);
    Ok(dataset)
}

fn read_input(path: &Path) -> Result<String, WellbeingCliError> {
    if path.as_os_str() == "-" {
        let mut buffer = String::new();
        io::stdin().read_to_string(&mut buffer)?;
        Ok(buffer)
    } else {
        Ok(fs::read_to_string(path)?)
    }
}

fn write_output(path: &Path, content: &str) -> Result<(), WellbeingCliError> {
    if path.as_os_str() == "-" {
        let mut stdout = io::stdout().lock();
        writeln!(stdout, "{content}")?;
        stdout.flush()?;
    } else {
        fs::write(path, content)?;
    }
    Ok(())
}

fn emit<T: Serialize>(value: &T, pretty: bool) -> Result<(), WellbeingCliError> {
    let json = if pretty {
        serde_json::to_string_pretty(value)?
    } else {
        serde_json::to_string(value)?
    };
    write_output(Path::new("-"), &json)
}

// Error types

#[derive(Debug)]
enum WellbeingCliError {
    Io(io::Error),
    Analytics(AnalyticsError),
    Json(serde_json::Error),
    InvalidDate(String),
}

impl From<io::Error> for WellbeingCliError {
    fn from(e: io::Error) -> Self {
        WellbeingCliError::Io(e)
    }
}

impl From<AnalyticsError> for WellbeingCliError {
    fn from(e: AnalyticsError) -> Self {
        WellbeingCliError::Analytics(e)
    }
}

impl From<serde_json::Error> for WellbeingCliError {
    fn from(e: serde_json::Error) -> Self {
        WellbeingCliError::Json(e)
    }
}

#[derive(Serialize)]
struct CliError {
    code: String,
    message: String,
    hint: Option<String>,
}

impl From<WellbeingCliError> for CliError {
    fn from(e: WellbeingCliError) -> Self {
        match e {
            WellbeingCliError::Io(e) => CliError {
                code: "IO_ERROR".to_string(),
                message: e.to_string(),
                hint: Some("Check file paths and permissions".to_string()),
            },
            WellbeingCliError::Json(e) => CliError {
                code: "JSON_ERROR".to_string(),
                message: e.to_string(),
                hint: Some("Check JSON syntax".to_string()),
            },
            WellbeingCliError::InvalidDate(msg) => CliError {
                code: "INVALID_DATE".to_string(),
                message: msg,
                hint: Some("Use the YYYY-MM-DD format".to_string()),
            },
            WellbeingCliError::Analytics(e) => {
                let (code, hint) = match &e {
                    AnalyticsError::InvalidMetric { .. } => (
                        "INVALID_METRIC",
                        "Use a numeric column or the mood column",
                    ),
                    AnalyticsError::InsufficientData { .. } => (
                        "INSUFFICIENT_DATA",
                        "Widen the lookback or log the metric more often",
                    ),
                    AnalyticsError::DivisionUndefined(_) => (
                        "DIVISION_UNDEFINED",
                        "The selected period holds no entries",
                    ),
                    AnalyticsError::EmptyDataset(_) => {
                        ("EMPTY_DATASET", "Ensure the dataset has entries")
                    }
                    AnalyticsError::JsonError(_) => (
                        "JSON_ERROR",
                        "Ensure input matches the dataset schema (columns + entries)",
                    ),
                    AnalyticsError::InvalidConfig(_) => {
                        ("INVALID_CONFIG", "Review the configuration values")
                    }
                };
                CliError {
                    code: code.to_string(),
                    message: e.to_string(),
                    hint: Some(hint.to_string()),
                }
            }
        }
    }
}
