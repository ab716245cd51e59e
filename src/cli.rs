//! CLI definition and stage orchestration.
//!
//! Each subcommand loads ports, runs one stage (or the whole pipeline) and
//! maps errors to a stable exit code. Stage functions take port trait objects
//! so tests can drive them with mocks.

use clap::{Parser, Subcommand};
use std::path::PathBuf;
use std::process::ExitCode;

use crate::adapters::coingecko_adapter::{CoinGeckoAdapter, DEFAULT_API_BASE};
use crate::adapters::csv_data_adapter::CsvDataAdapter;
use crate::adapters::csv_report_adapter::CsvReportAdapter;
use crate::adapters::file_config_adapter::FileConfigAdapter;
use crate::domain::analyzer::{self, analyze_timeframe, ChartKind, CoinAnalysis};
use crate::domain::backtest::{run_backtest, summarize, BacktestSummary, TradeResult};
use crate::domain::bar::close_series;
use crate::domain::classify::{self, resolve, ClassifiedSignal};
use crate::domain::config_validation::{validate_analyzer_config, validate_pipeline_config};
use crate::domain::correlation::{self, correlate, CorrelationRecord};
use crate::domain::error::PipelineError;
use crate::domain::market::{average_change_24h, MarketChart};
use crate::domain::risk::RiskReport;
use crate::domain::signal;
use crate::ports::config_port::ConfigPort;
use crate::ports::data_port::DataPort;
use crate::ports::market_data_port::MarketDataPort;
use crate::ports::report_port::ReportPort;

#[derive(Parser, Debug)]
#[command(name = "domsig", about = "USDT dominance correlation signals and backtesting")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Compute coin/dominance correlations per timeframe
    Signals {
        #[arg(short, long)]
        config: PathBuf,
        /// Restrict to a single timeframe
        #[arg(long)]
        timeframe: Option<String>,
    },
    /// Classify correlations into trades with entry/exit levels
    Classify {
        #[arg(short, long)]
        config: PathBuf,
    },
    /// Simulate classified trades and summarize returns per timeframe
    Backtest {
        #[arg(short, long)]
        config: PathBuf,
    },
    /// Run signals, classify and backtest in order
    Pipeline {
        #[arg(short, long)]
        config: PathBuf,
    },
    /// Live correlation analysis of one coin against USDT dominance
    Analyze {
        /// Market-data API coin id, e.g. "bitcoin"
        #[arg(long, default_value = "bitcoin")]
        coin: String,
        #[arg(short, long)]
        config: Option<PathBuf>,
    },
    /// Market-wide risk signal from dominance and top-coin breadth
    Risk {
        #[arg(short, long)]
        config: Option<PathBuf>,
    },
    /// List symbols with stored data for a timeframe
    ListSymbols {
        #[arg(long)]
        timeframe: String,
        #[arg(short, long)]
        config: PathBuf,
    },
    /// Validate a configuration file
    Validate {
        #[arg(short, long)]
        config: PathBuf,
    },
}

pub fn run(cli: Cli) -> ExitCode {
    match cli.command {
        Command::Signals { config, timeframe } => run_signals(&config, timeframe.as_deref()),
        Command::Classify { config } => run_classify(&config),
        Command::Backtest { config } => run_backtest_cmd(&config),
        Command::Pipeline { config } => run_pipeline(&config),
        Command::Analyze { coin, config } => run_analyze(&coin, config.as_ref()),
        Command::Risk { config } => run_risk(config.as_ref()),
        Command::ListSymbols { timeframe, config } => run_list_symbols(&timeframe, &config),
        Command::Validate { config } => run_validate(&config),
    }
}

/// Pipeline parameters resolved from config, with defaults for absent keys.
#[derive(Debug, Clone)]
pub struct PipelineConfig {
    pub data_dir: PathBuf,
    pub timeframes: Vec<String>,
    pub threshold: f64,
    pub min_samples: usize,
    pub tp_pct: f64,
    pub sl_pct: f64,
}

/// Live analyzer parameters resolved from config.
#[derive(Debug, Clone)]
pub struct AnalyzerConfig {
    pub threshold: f64,
    pub api_base: String,
    pub top_limit: usize,
}

pub fn load_config(path: &PathBuf) -> Result<FileConfigAdapter, ExitCode> {
    FileConfigAdapter::from_file(path).map_err(|e| {
        let err = PipelineError::ConfigParse {
            file: path.display().to_string(),
            reason: e.to_string(),
        };
        eprintln!("error: {err}");
        ExitCode::from(&err)
    })
}

pub fn build_pipeline_config(adapter: &dyn ConfigPort) -> PipelineConfig {
    let timeframes = adapter
        .get_string("signals", "timeframes")
        .unwrap_or_else(|| "15m,2h,4h,1d,1wk".to_string())
        .split(',')
        .map(|tf| tf.trim().to_string())
        .filter(|tf| !tf.is_empty())
        .collect();

    PipelineConfig {
        data_dir: PathBuf::from(
            adapter
                .get_string("data", "dir")
                .unwrap_or_else(|| "data".to_string()),
        ),
        timeframes,
        threshold: adapter.get_double("signals", "threshold", signal::DEFAULT_THRESHOLD),
        min_samples: adapter.get_int(
            "signals",
            "min_samples",
            correlation::DEFAULT_MIN_SAMPLES as i64,
        ) as usize,
        tp_pct: adapter.get_double("classify", "tp_pct", classify::DEFAULT_TP_PCT),
        sl_pct: adapter.get_double("classify", "sl_pct", classify::DEFAULT_SL_PCT),
    }
}

pub fn build_analyzer_config(adapter: &dyn ConfigPort) -> AnalyzerConfig {
    AnalyzerConfig {
        threshold: adapter.get_double("analyze", "threshold", analyzer::DEFAULT_THRESHOLD),
        api_base: adapter
            .get_string("analyze", "api_base")
            .unwrap_or_else(|| DEFAULT_API_BASE.to_string()),
        top_limit: adapter.get_int("analyze", "top_limit", 100) as usize,
    }
}

fn load_validated_pipeline_config(config_path: &PathBuf) -> Result<PipelineConfig, ExitCode> {
    let adapter = load_config(config_path)?;
    if let Err(e) = validate_pipeline_config(&adapter) {
        eprintln!("error: {e}");
        return Err(ExitCode::from(&e));
    }
    Ok(build_pipeline_config(&adapter))
}

// --- Stage: signals ---

/// Compute correlations for every configured timeframe. A timeframe without
/// a dominance series is skipped with a warning; other timeframes proceed.
pub fn run_signals_stage(
    data: &dyn DataPort,
    report: &dyn ReportPort,
    config: &PipelineConfig,
    only_timeframe: Option<&str>,
) -> Result<Vec<CorrelationRecord>, PipelineError> {
    let mut all_records = Vec::new();
    let mut processed_any = false;

    if let Some(tf) = only_timeframe {
        if !config.timeframes.iter().any(|t| t == tf) {
            eprintln!("warning: timeframe {tf} not in configured timeframes");
        }
    }

    for timeframe in &config.timeframes {
        if only_timeframe.is_some_and(|tf| tf != timeframe.as_str()) {
            continue;
        }

        let dominance_bars = match data.load_dominance(timeframe) {
            Ok(bars) => bars,
            Err(e @ PipelineError::MissingDominance { .. }) => {
                eprintln!("warning: {e}, skipping");
                continue;
            }
            Err(e) => return Err(e),
        };
        let dominance = close_series(&dominance_bars);

        eprintln!("Computing correlations for {timeframe}...");
        let mut records = Vec::new();
        for symbol in data.list_symbols(timeframe)? {
            let bars = match data.load_series(&symbol, timeframe) {
                Ok(bars) => bars,
                Err(e) => {
                    eprintln!("warning: skipping {symbol} {timeframe} ({e})");
                    continue;
                }
            };
            let prices = close_series(&bars);
            if let Some(record) =
                correlate(&symbol, timeframe, &prices, &dominance, config.min_samples)
            {
                records.push(record);
            }
        }

        report.write_correlations(timeframe, &records)?;
        all_records.extend(records);
        processed_any = true;
    }

    if processed_any {
        report.write_correlation_summary(&all_records)?;
    }
    Ok(all_records)
}

// --- Stage: classify ---

/// Classify the stored correlation summary and resolve entry/exit levels.
/// Neutral records and records without a usable anchor bar are dropped.
pub fn run_classify_stage(
    data: &dyn DataPort,
    report: &dyn ReportPort,
    config: &PipelineConfig,
) -> Result<Vec<ClassifiedSignal>, PipelineError> {
    let records = data.load_correlations()?.ok_or_else(|| PipelineError::Data {
        reason: "no correlation summary found; run the signals stage first".into(),
    })?;

    let mut signals = Vec::new();
    for record in &records {
        let bars = match data.load_series(&record.symbol, &record.timeframe) {
            Ok(bars) => bars,
            Err(e) => {
                eprintln!(
                    "warning: skipping {} {} ({e})",
                    record.symbol, record.timeframe
                );
                continue;
            }
        };
        if let Some(sig) = resolve(record, &bars, config.threshold, config.tp_pct, config.sl_pct) {
            signals.push(sig);
        }
    }

    report.write_classifications(&signals)?;
    Ok(signals)
}

// --- Stage: backtest ---

/// Simulate stored classifications and aggregate mean return per timeframe.
/// A missing classification summary is a graceful no-op, not an error.
pub fn run_backtest_stage(
    data: &dyn DataPort,
    report: &dyn ReportPort,
) -> Result<(Vec<TradeResult>, BacktestSummary), PipelineError> {
    let Some(signals) = data.load_classifications()? else {
        eprintln!("No classification data found");
        return Ok((Vec::new(), BacktestSummary::new()));
    };

    let trades = run_backtest(&signals);
    let summary = summarize(&trades);
    report.write_backtest(&trades, &summary)?;
    Ok((trades, summary))
}

// --- Live path ---

/// Fetch a coin chart, degrading to an empty chart with a warning on failure
/// so downstream statistics run on well-defined degenerate input.
fn fetch_chart_degraded(
    market: &dyn MarketDataPort,
    coin_id: &str,
    days: u32,
    interval: Option<&str>,
) -> MarketChart {
    match market.market_chart(coin_id, days, interval) {
        Ok(chart) => chart,
        Err(e) => {
            eprintln!("warning: failed to fetch market chart for {coin_id} ({e})");
            MarketChart::default()
        }
    }
}

/// Approximate dominance history from tether, bitcoin and ethereum caps.
fn fetch_dominance_series(
    market: &dyn MarketDataPort,
    days: u32,
    interval: Option<&str>,
) -> Vec<(i64, f64)> {
    let usdt = fetch_chart_degraded(market, "tether", days, interval);
    let btc = fetch_chart_degraded(market, "bitcoin", days, interval);
    let eth = fetch_chart_degraded(market, "ethereum", days, interval);
    analyzer::dominance_series(&usdt.market_caps, &btc.market_caps, &eth.market_caps)
}

/// Analyze one coin against USDT dominance over the analyzer timeframes.
/// Intraday timeframes use a 2-day 5-minute chart, daily ones a 30-day chart.
pub fn run_analyze_stage(
    market: &dyn MarketDataPort,
    coin_id: &str,
    threshold: f64,
) -> Vec<CoinAnalysis> {
    let intraday_dominance = fetch_dominance_series(market, 2, None);
    let intraday_prices = fetch_chart_degraded(market, coin_id, 2, None).prices;

    let daily_dominance = fetch_dominance_series(market, 30, Some("daily"));
    let daily_prices = fetch_chart_degraded(market, coin_id, 30, Some("daily")).prices;

    analyzer::TIMEFRAMES
        .iter()
        .map(|tf| {
            let (prices, dominance) = match tf.chart {
                ChartKind::Intraday => (&intraday_prices, &intraday_dominance),
                ChartKind::Daily => (&daily_prices, &daily_dominance),
            };
            analyze_timeframe(tf, prices, dominance, threshold)
        })
        .collect()
}

/// Compute the market-wide risk report. Both fetches degrade with a warning:
/// dominance to 0.0, the coin listing to empty.
pub fn run_risk_stage(market: &dyn MarketDataPort, top_limit: usize) -> RiskReport {
    let dominance = match market.global_dominance("usdt") {
        Ok(d) => d,
        Err(e) => {
            eprintln!("warning: failed to fetch USDT dominance ({e}); using 0.0");
            0.0
        }
    };

    let coins = match market.top_coins(top_limit) {
        Ok(coins) => coins,
        Err(e) => {
            eprintln!("warning: failed to fetch market data ({e})");
            Vec::new()
        }
    };

    RiskReport::new(dominance, average_change_24h(&coins), coins.len())
}

// --- Command wrappers ---

fn run_signals(config_path: &PathBuf, only_timeframe: Option<&str>) -> ExitCode {
    let config = match load_validated_pipeline_config(config_path) {
        Ok(c) => c,
        Err(code) => return code,
    };
    let data = CsvDataAdapter::new(config.data_dir.clone());
    let report = CsvReportAdapter::new(config.data_dir.clone());

    match run_signals_stage(&data, &report, &config, only_timeframe) {
        Ok(records) => {
            eprintln!("Wrote {} correlation records", records.len());
            ExitCode::SUCCESS
        }
        Err(e) => {
            eprintln!("error: {e}");
            ExitCode::from(&e)
        }
    }
}

fn run_classify(config_path: &PathBuf) -> ExitCode {
    let config = match load_validated_pipeline_config(config_path) {
        Ok(c) => c,
        Err(code) => return code,
    };
    let data = CsvDataAdapter::new(config.data_dir.clone());
    let report = CsvReportAdapter::new(config.data_dir.clone());

    match run_classify_stage(&data, &report, &config) {
        Ok(signals) => {
            eprintln!("Wrote {} classified signals", signals.len());
            ExitCode::SUCCESS
        }
        Err(e) => {
            eprintln!("error: {e}");
            ExitCode::from(&e)
        }
    }
}

fn run_backtest_cmd(config_path: &PathBuf) -> ExitCode {
    let config = match load_validated_pipeline_config(config_path) {
        Ok(c) => c,
        Err(code) => return code,
    };
    let data = CsvDataAdapter::new(config.data_dir.clone());
    let report = CsvReportAdapter::new(config.data_dir.clone());

    match run_backtest_stage(&data, &report) {
        Ok((trades, summary)) => {
            eprintln!("Simulated {} trades", trades.len());
            for (timeframe, mean_return) in &summary {
                println!("{timeframe}: mean return {:.6}", mean_return);
            }
            ExitCode::SUCCESS
        }
        Err(e) => {
            eprintln!("error: {e}");
            ExitCode::from(&e)
        }
    }
}

fn run_pipeline(config_path: &PathBuf) -> ExitCode {
    let config = match load_validated_pipeline_config(config_path) {
        Ok(c) => c,
        Err(code) => return code,
    };
    let data = CsvDataAdapter::new(config.data_dir.clone());
    let report = CsvReportAdapter::new(config.data_dir.clone());

    let result = run_signals_stage(&data, &report, &config, None)
        .and_then(|_| run_classify_stage(&data, &report, &config))
        .and_then(|_| run_backtest_stage(&data, &report));

    match result {
        Ok((trades, summary)) => {
            eprintln!("Pipeline complete: {} trades", trades.len());
            for (timeframe, mean_return) in &summary {
                println!("{timeframe}: mean return {:.6}", mean_return);
            }
            ExitCode::SUCCESS
        }
        Err(e) => {
            eprintln!("error: {e}");
            ExitCode::from(&e)
        }
    }
}

fn load_analyzer_config(config_path: Option<&PathBuf>) -> Result<AnalyzerConfig, ExitCode> {
    let adapter = match config_path {
        Some(path) => load_config(path)?,
        None => FileConfigAdapter::from_string("").expect("empty config is valid"),
    };
    if let Err(e) = validate_analyzer_config(&adapter) {
        eprintln!("error: {e}");
        return Err(ExitCode::from(&e));
    }
    Ok(build_analyzer_config(&adapter))
}

fn format_level(level: Option<f64>) -> String {
    match level {
        Some(v) => format!("{v:.4}"),
        None => "n/a".to_string(),
    }
}

fn run_analyze(coin_id: &str, config_path: Option<&PathBuf>) -> ExitCode {
    let config = match load_analyzer_config(config_path) {
        Ok(c) => c,
        Err(code) => return code,
    };
    let market = match CoinGeckoAdapter::new(&config.api_base) {
        Ok(m) => m,
        Err(e) => {
            eprintln!("error: {e}");
            return ExitCode::from(&e);
        }
    };

    eprintln!("Analyzing {coin_id} against USDT dominance...");
    for row in run_analyze_stage(&market, coin_id, config.threshold) {
        println!(
            "{}: corr={:.4} conf={:.4} {} entry={} exit={}",
            row.timeframe,
            row.correlation,
            row.confidence,
            row.signal,
            format_level(row.entry),
            format_level(row.exit),
        );
    }
    ExitCode::SUCCESS
}

fn run_risk(config_path: Option<&PathBuf>) -> ExitCode {
    let config = match load_analyzer_config(config_path) {
        Ok(c) => c,
        Err(code) => return code,
    };
    let market = match CoinGeckoAdapter::new(&config.api_base) {
        Ok(m) => m,
        Err(e) => {
            eprintln!("error: {e}");
            return ExitCode::from(&e);
        }
    };

    let report = run_risk_stage(&market, config.top_limit);
    println!("USDT dominance: {:.2}%", report.dominance_pct);
    println!(
        "Average 24h change across {} coins: {:.2}%",
        report.coins_sampled, report.avg_change_pct
    );
    println!("Market bias: {}", report.bias);
    ExitCode::SUCCESS
}

fn run_list_symbols(timeframe: &str, config_path: &PathBuf) -> ExitCode {
    let config = match load_validated_pipeline_config(config_path) {
        Ok(c) => c,
        Err(code) => return code,
    };
    let data = CsvDataAdapter::new(config.data_dir);

    match data.list_symbols(timeframe) {
        Ok(symbols) => {
            for symbol in symbols {
                println!("{symbol}");
            }
            ExitCode::SUCCESS
        }
        Err(e) => {
            eprintln!("error: {e}");
            ExitCode::from(&e)
        }
    }
}

fn run_validate(config_path: &PathBuf) -> ExitCode {
    let adapter = match load_config(config_path) {
        Ok(a) => a,
        Err(code) => return code,
    };
    if let Err(e) = validate_pipeline_config(&adapter) {
        eprintln!("error: {e}");
        return ExitCode::from(&e);
    }
    if let Err(e) = validate_analyzer_config(&adapter) {
        eprintln!("error: {e}");
        return ExitCode::from(&e);
    }
    eprintln!("Config OK");
    ExitCode::SUCCESS
}
