//! CLI definition and dispatch.

use chrono::NaiveDate;
use clap::{Parser, Subcommand};
use std::path::{Path, PathBuf};
use std::process::ExitCode;

use crate::adapters::clock::{FixedClock, SystemClock};
use crate::adapters::diagnostics::TracingSink;
use crate::adapters::file_config_adapter::FileConfigAdapter;
use crate::adapters::json_report_adapter::JsonReportAdapter;
use crate::adapters::snapshot_dir_adapter::SnapshotDirAdapter;
use crate::domain::analysis::{AnalyzerConfig, QuantAnalyzer};
use crate::domain::config_validation::validate_analysis_config;
use crate::domain::error::QuantError;
use crate::domain::tickers::parse_tickers;
use crate::ports::clock_port::ClockPort;
use crate::ports::config_port::ConfigPort;
use crate::ports::data_port::MarketDataPort;
use crate::ports::report_port::ReportPort;

#[derive(Parser, Debug)]
#[command(name = "quantlens", about = "Per-ticker quantitative signal analysis")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Analyse one or more tickers and print the results as JSON
    Analyze {
        #[arg(short, long)]
        config: PathBuf,
        /// Snapshot directory; overrides [data] directory
        #[arg(long)]
        data_dir: Option<PathBuf>,
        /// Comma-separated tickers; overrides [analysis] tickers
        #[arg(long)]
        ticker: Option<String>,
        /// Analyse as of this date (YYYY-MM-DD); overrides [data] as_of
        #[arg(long)]
        as_of: Option<NaiveDate>,
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
    /// Validate a configuration file
    Validate {
        #[arg(short, long)]
        config: PathBuf,
    },
}

pub fn run(cli: Cli) -> ExitCode {
    match cli.command {
        Command::Analyze {
            config,
            data_dir,
            ticker,
            as_of,
            output,
        } => run_analyze(
            &config,
            data_dir.as_deref(),
            ticker.as_deref(),
            as_of,
            output,
        ),
        Command::Validate { config } => run_validate(&config),
    }
}

pub fn load_config(path: &Path) -> Result<FileConfigAdapter, ExitCode> {
    FileConfigAdapter::from_file(path).map_err(|e| {
        eprintln!("error: {e}");
        ExitCode::from(&e)
    })
}

/// CLI override first, then `[analysis] tickers`.
pub fn resolve_tickers(
    ticker_override: Option<&str>,
    config: &dyn ConfigPort,
) -> Result<Vec<String>, QuantError> {
    let (list, key) = match ticker_override {
        Some(list) => (list.to_string(), "--ticker"),
        None => match config.get_string("analysis", "tickers") {
            Some(list) => (list, "tickers"),
            None => {
                return Err(QuantError::ConfigMissing {
                    section: "analysis".into(),
                    key: "tickers".into(),
                });
            }
        },
    };
    parse_tickers(&list).map_err(|e| QuantError::ConfigInvalid {
        section: "analysis".into(),
        key: key.into(),
        reason: e.to_string(),
    })
}

pub fn resolve_data_dir(
    dir_override: Option<&Path>,
    config: &dyn ConfigPort,
) -> Result<PathBuf, QuantError> {
    let dir = match dir_override {
        Some(d) => d.to_path_buf(),
        None => config
            .get_string("data", "directory")
            .map(PathBuf::from)
            .ok_or_else(|| QuantError::ConfigMissing {
                section: "data".into(),
                key: "directory".into(),
            })?,
    };
    if !dir.is_dir() {
        return Err(QuantError::ConfigInvalid {
            section: "data".into(),
            key: "directory".into(),
            reason: format!("{} is not a directory", dir.display()),
        });
    }
    Ok(dir)
}

fn run_analyze(
    config_path: &Path,
    data_dir: Option<&Path>,
    ticker_override: Option<&str>,
    as_of_override: Option<NaiveDate>,
    output: Option<PathBuf>,
) -> ExitCode {
    // Stage 1: load and validate config
    eprintln!("Loading config from {}", config_path.display());
    let adapter = match load_config(config_path) {
        Ok(a) => a,
        Err(code) => return code,
    };
    let analyzer_config = match validate_analysis_config(&adapter) {
        Ok(c) => c,
        Err(e) => {
            eprintln!("error: {e}");
            return (&e).into();
        }
    };

    // Stage 2: resolve tickers and data source
    let tickers = match resolve_tickers(ticker_override, &adapter) {
        Ok(t) => t,
        Err(e) => {
            eprintln!("error: {e}");
            return (&e).into();
        }
    };
    let dir = match resolve_data_dir(data_dir, &adapter) {
        Ok(d) => d,
        Err(e) => {
            eprintln!("error: {e}");
            return (&e).into();
        }
    };

    // A fixed as-of date pins the clock too, so reruns are reproducible.
    let as_of = as_of_override.or_else(|| adapter.get_date("data", "as_of"));
    let clock: Box<dyn ClockPort> = match as_of {
        Some(date) => Box::new(FixedClock::on_date(date)),
        None => Box::new(SystemClock),
    };
    let data = SnapshotDirAdapter::new(dir, clock.today());

    eprintln!(
        "Analysing {} ticker(s) as of {} (period {}, risk-free rate {})",
        tickers.len(),
        data.as_of(),
        analyzer_config.historical_period,
        analyzer_config.risk_free_rate
    );

    // Stage 3: analyse and report
    analyze_and_report(
        analyzer_config,
        &data,
        clock.as_ref(),
        &tickers,
        &JsonReportAdapter::new(output),
    )
}

pub fn analyze_and_report(
    config: AnalyzerConfig,
    data: &dyn MarketDataPort,
    clock: &dyn ClockPort,
    tickers: &[String],
    report: &dyn ReportPort,
) -> ExitCode {
    let sink = TracingSink;
    let analyzer = QuantAnalyzer::new(config, data, &sink, clock);
    let results = analyzer.analyze_all(tickers);

    for result in &results {
        match (&result.error, &result.trading_signal) {
            (Some(err), _) => eprintln!("  {}: failed ({err})", result.ticker),
            (None, Some(signal)) => eprintln!(
                "  {}: {} (score {:.2})",
                result.ticker, signal.signal, signal.confidence_score
            ),
            (None, None) => eprintln!("  {}: no market data", result.ticker),
        }
    }

    if let Err(e) = report.write_all(&results) {
        eprintln!("error: {e}");
        return (&e).into();
    }

    if results.iter().all(|r| r.is_failed()) {
        ExitCode::from(5)
    } else {
        ExitCode::SUCCESS
    }
}

fn run_validate(config_path: &Path) -> ExitCode {
    eprintln!("Validating config: {}", config_path.display());
    let adapter = match load_config(config_path) {
        Ok(a) => a,
        Err(code) => return code,
    };

    let config = match validate_analysis_config(&adapter) {
        Ok(c) => c,
        Err(e) => {
            eprintln!("error: {e}");
            return (&e).into();
        }
    };

    eprintln!("\nAnalysis:");
    eprintln!("  Risk-free rate:    {}", config.risk_free_rate);
    eprintln!("  Historical period: {}", config.historical_period);

    eprintln!("\nData:");
    match adapter.get_string("data", "directory") {
        Some(dir) => eprintln!("  Directory: {dir}"),
        None => eprintln!("  Directory: (not set, pass --data-dir)"),
    }
    match adapter.get_date("data", "as_of") {
        Some(date) => eprintln!("  As of:     {date}"),
        None => eprintln!("  As of:     today"),
    }

    match adapter.get_string("analysis", "tickers") {
        Some(list) => match parse_tickers(&list) {
            Ok(t) => eprintln!("\nTickers: {}", t.join(", ")),
            Err(e) => {
                eprintln!("error: {e}");
                return ExitCode::from(2);
            }
        },
        None => eprintln!("\nTickers: (not set, pass --ticker)"),
    }

    eprintln!("\nConfiguration OK");
    ExitCode::SUCCESS
}
