//! CLI definition and dispatch.

use clap::{Parser, Subcommand};
use std::path::{Path, PathBuf};
use std::process::ExitCode;
use tracing::{error, info, warn};

use crate::adapters::csv_report_adapter::CsvReportAdapter;
use crate::adapters::file_config_adapter::FileConfigAdapter;
use crate::adapters::open_price_source;
use crate::domain::config_validation::{
    SignalWindows, build_capital, build_parameters, build_signal_windows, validate_capital,
};
use crate::domain::driver::{self, RunReport};
use crate::domain::error::RiskAllocError;
use crate::domain::holdings::{Holdings, allocate_shares};
use crate::domain::portfolio::Portfolio;
use crate::domain::rebalance::RebalanceParameters;
use crate::domain::selector::select_candidates;
use crate::domain::table::SeriesTable;
use crate::domain::transform::{breakout, log_returns};
use crate::ports::config_port::ConfigPort;
use crate::ports::data_port::DataPort;
use crate::ports::report_port::ReportPort;

#[derive(Parser, Debug)]
#[command(
    name = "riskalloc",
    about = "Capacity-constrained incremental portfolio rebalancer"
)]
pub struct Cli {
    /// Increase log detail (-v debug, -vv trace)
    #[arg(short, long, global = true, action = clap::ArgAction::Count)]
    pub verbose: u8,
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Run the rebalancer over a price file and size the final holdings
    Allocate {
        #[arg(short, long)]
        config: PathBuf,
        #[arg(short, long)]
        prices: Option<PathBuf>,
        #[arg(long)]
        capital: Option<f64>,
        /// Write every step's weights to this CSV file
        #[arg(short, long)]
        output: Option<PathBuf>,
        /// Write the final holdings to this CSV file
        #[arg(long)]
        holdings_output: Option<PathBuf>,
        #[arg(long)]
        dry_run: bool,
    },
    /// Validate a configuration file
    Validate {
        #[arg(short, long)]
        config: PathBuf,
    },
    /// Show the signal table and the latest candidates
    Signals {
        #[arg(short, long)]
        config: PathBuf,
        #[arg(short, long)]
        prices: Option<PathBuf>,
    },
}

/// Everything one allocation run produces.
#[derive(Debug, Clone)]
pub struct AllocationResult {
    pub report: RunReport,
    pub holdings: Holdings,
    pub capital: f64,
}

pub fn run(cli: Cli) -> ExitCode {
    match cli.command {
        Command::Allocate {
            config,
            prices,
            capital,
            output,
            holdings_output,
            dry_run,
        } => {
            if dry_run {
                run_dry_run(&config)
            } else {
                run_allocate(
                    &config,
                    prices.as_deref(),
                    capital,
                    output.as_deref(),
                    holdings_output.as_deref(),
                )
            }
        }
        Command::Validate { config } => run_dry_run(&config),
        Command::Signals { config, prices } => run_signals(&config, prices.as_deref()),
    }
}

fn fail(err: &RiskAllocError) -> ExitCode {
    error!("{err}");
    err.into()
}

pub fn load_config(path: &Path) -> Result<FileConfigAdapter, RiskAllocError> {
    info!("Loading config from {}", path.display());
    FileConfigAdapter::from_file(path)
}

pub fn resolve_prices_path(
    prices_override: Option<&Path>,
    config: &dyn ConfigPort,
) -> Result<PathBuf, RiskAllocError> {
    if let Some(p) = prices_override {
        return Ok(p.to_path_buf());
    }
    config
        .get_string("data", "prices")
        .filter(|s| !s.trim().is_empty())
        .map(|s| PathBuf::from(s.trim()))
        .ok_or_else(|| RiskAllocError::config_missing("data", "prices"))
}

/// Prices → log returns → breakout distances.
pub fn build_signals(
    prices: &SeriesTable,
    windows: SignalWindows,
) -> Result<SeriesTable, RiskAllocError> {
    let returns = log_returns(prices);
    let signals = breakout(&returns, windows.fast, windows.slow)?;
    if signals.is_empty() {
        return Err(RiskAllocError::InsufficientData {
            rows: prices.row_count(),
            minimum: windows.slow + 1,
        });
    }
    Ok(signals)
}

pub fn run_allocation_pipeline(
    data_port: &dyn DataPort,
    params: &RebalanceParameters,
    windows: SignalWindows,
    capital: f64,
) -> Result<AllocationResult, RiskAllocError> {
    params.validate()?;
    validate_capital(capital)?;

    let prices = data_port.load_prices()?;
    let signals = build_signals(&prices, windows)?;
    info!(
        "Running rebalancer: {} steps, {} tickers, max {} positions",
        signals.row_count(),
        signals.tickers().len(),
        params.max_positions
    );

    let report = driver::run(&signals, params, Portfolio::new())?;
    let final_portfolio = report.final_portfolio().cloned().unwrap_or_default();
    let last_prices = prices
        .last_row()
        .ok_or(RiskAllocError::InsufficientData { rows: 0, minimum: 1 })?;
    let holdings = allocate_shares(&final_portfolio, &last_prices, capital)?;

    Ok(AllocationResult {
        report,
        holdings,
        capital,
    })
}

fn run_allocate(
    config_path: &Path,
    prices_override: Option<&Path>,
    capital_override: Option<f64>,
    output_path: Option<&Path>,
    holdings_path: Option<&Path>,
) -> ExitCode {
    // Stage 1: config
    let adapter = match load_config(config_path) {
        Ok(a) => a,
        Err(e) => return fail(&e),
    };

    // Stage 2: typed parameters, all validated before touching data
    let params = match build_parameters(&adapter).and_then(|p| p.validate().map(|_| p)) {
        Ok(p) => p,
        Err(e) => return fail(&e),
    };
    let windows = match build_signal_windows(&adapter) {
        Ok(w) => w,
        Err(e) => return fail(&e),
    };
    let capital = match capital_override {
        Some(c) => c,
        None => match build_capital(&adapter) {
            Ok(c) => c,
            Err(e) => return fail(&e),
        },
    };

    // Stage 3: data source
    let prices_path = match resolve_prices_path(prices_override, &adapter) {
        Ok(p) => p,
        Err(e) => return fail(&e),
    };
    info!("Loading prices from {}", prices_path.display());
    let data_port = match open_price_source(&prices_path) {
        Ok(p) => p,
        Err(e) => return fail(&e),
    };

    // Stage 4: run
    let result = match run_allocation_pipeline(data_port.as_ref(), &params, windows, capital) {
        Ok(r) => r,
        Err(e) => {
            if let RiskAllocError::StepFailed {
                last_completed: Some(last),
                ..
            } = &e
            {
                warn!(
                    "Last completed step {} ({}): portfolio {} exposure {:.4}",
                    last.step, last.date, last.portfolio, last.exposure
                );
            }
            return fail(&e);
        }
    };

    // Stage 5: reports
    let steps_path = output_path
        .map(Path::to_path_buf)
        .or_else(|| adapter.get_string("report", "steps_path").map(PathBuf::from));
    let holdings_path = holdings_path
        .map(Path::to_path_buf)
        .or_else(|| adapter.get_string("report", "holdings_path").map(PathBuf::from));
    if let Err(e) = write_reports(
        &CsvReportAdapter,
        &result,
        steps_path.as_deref(),
        holdings_path.as_deref(),
    ) {
        return fail(&e);
    }

    print_holdings(&result);
    ExitCode::SUCCESS
}

pub fn write_reports(
    report_port: &dyn ReportPort,
    result: &AllocationResult,
    steps_path: Option<&Path>,
    holdings_path: Option<&Path>,
) -> Result<(), RiskAllocError> {
    if let Some(path) = steps_path {
        report_port.write_steps(&result.report, &path.display().to_string())?;
        info!("Step weights written to: {}", path.display());
    }
    if let Some(path) = holdings_path {
        report_port.write_holdings(&result.holdings, &path.display().to_string())?;
        info!("Holdings written to: {}", path.display());
    }
    Ok(())
}

fn print_holdings(result: &AllocationResult) {
    if let Some(last) = result.report.final_step() {
        println!(
            "Final portfolio ({}, exposure {:.4}): {}",
            last.date, last.exposure, last.portfolio
        );
    }
    for h in &result.holdings.positions {
        println!("{}: {} shares @ {:.2}", h.ticker, h.shares, h.price);
    }
    println!(
        "${:.2} of ${:.2} capital leftover",
        result.holdings.leftover, result.capital
    );
}

pub fn run_dry_run(config_path: &Path) -> ExitCode {
    let adapter = match load_config(config_path) {
        Ok(a) => a,
        Err(e) => return fail(&e),
    };

    let params = match build_parameters(&adapter).and_then(|p| p.validate().map(|_| p)) {
        Ok(p) => p,
        Err(e) => return fail(&e),
    };
    let windows = match build_signal_windows(&adapter) {
        Ok(w) => w,
        Err(e) => return fail(&e),
    };
    let capital = match build_capital(&adapter) {
        Ok(c) => c,
        Err(e) => return fail(&e),
    };

    info!("Allocation:");
    info!("  max_start:       {}", params.max_start);
    info!("  max_ongoing:     {}", params.max_ongoing);
    info!("  max_positions:   {}", params.max_positions);
    info!("  risk_allocation: {}", params.risk_allocation);
    info!("  long_short:      {}", params.long_short);
    info!("Signal windows: fast {}, slow {}", windows.fast, windows.slow);
    info!("Capital: {:.2}", capital);

    match adapter.get_string("data", "prices") {
        Some(p) => info!("Prices: {}", p),
        None => warn!("no [data] prices configured; pass --prices when allocating"),
    }

    info!("Configuration is valid");
    ExitCode::SUCCESS
}

fn run_signals(config_path: &Path, prices_override: Option<&Path>) -> ExitCode {
    let adapter = match load_config(config_path) {
        Ok(a) => a,
        Err(e) => return fail(&e),
    };
    let params = match build_parameters(&adapter).and_then(|p| p.validate().map(|_| p)) {
        Ok(p) => p,
        Err(e) => return fail(&e),
    };
    let windows = match build_signal_windows(&adapter) {
        Ok(w) => w,
        Err(e) => return fail(&e),
    };
    let signals = match resolve_prices_path(prices_override, &adapter)
        .and_then(|p| open_price_source(&p))
        .and_then(|port| port.load_prices())
        .and_then(|prices| build_signals(&prices, windows))
    {
        Ok(s) => s,
        Err(e) => return fail(&e),
    };

    println!(
        "{} signal rows, {} tickers",
        signals.row_count(),
        signals.tickers().len()
    );
    if let Some(row) = signals.last_row() {
        let candidates = select_candidates(&row, params.max_positions);
        println!("Candidates on {} (lowest first):", row.date);
        for c in &candidates {
            println!("  {}: {:.6}", c.ticker, c.score);
        }
    }
    ExitCode::SUCCESS
}
