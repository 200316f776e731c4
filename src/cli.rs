//! CLI definition and dispatch.

use chrono::NaiveDate;
use clap::{Parser, Subcommand};
use std::collections::{HashMap, HashSet};
use std::path::PathBuf;
use std::process::ExitCode;

use crate::adapters::csv_adapter::{CsvAdapter, load_holdings};
use crate::adapters::file_config_adapter::FileConfigAdapter;
use crate::domain::analysis::{PortfolioAnalysis, analyze_portfolio};
use crate::domain::beta::{BetaSource, CovarianceBeta, StaticBetaTable};
use crate::domain::config::AnalyticsConfig;
use crate::domain::config_validation::validate_analytics_config;
use crate::domain::diversification::{SectorLookup, SectorTable};
use crate::domain::error::AnalyticsError;
use crate::domain::holding::Holding;
use crate::domain::indicator::{
    IndicatorPanel, IndicatorResult, IndicatorValue, analyze_instrument, calculate_indicator,
};
use crate::domain::ohlcv::PriceSeries;
use crate::domain::recommendation::{Recommendations, recommend};
use crate::domain::signal::SignalSummary;
use crate::ports::config_port::ConfigPort;
use crate::ports::data_port::PriceHistoryPort;

#[derive(Parser, Debug)]
#[command(name = "bistfolio", about = "Technical indicators and portfolio risk analytics")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Compute one indicator, or all of them, for an instrument
    Indicators {
        /// Directory holding <INSTRUMENT>.csv price files
        #[arg(short, long)]
        data: PathBuf,
        #[arg(short, long)]
        instrument: String,
        /// Indicator name (SMA, EMA, RSI, MACD, BOLLINGER, STOCHASTIC, WILLIAMS_R, CCI)
        #[arg(long)]
        indicator: Option<String>,
        /// Indicator parameter as key=value, repeatable
        #[arg(short, long, value_parser = parse_param)]
        param: Vec<(String, String)>,
    },
    /// Full technical analysis of an instrument
    Analyze {
        #[arg(short, long)]
        data: PathBuf,
        #[arg(short, long)]
        instrument: String,
    },
    /// Portfolio metrics, risk, diversification and recommendations
    Portfolio {
        #[arg(short, long)]
        config: Option<PathBuf>,
        #[arg(short, long)]
        data: PathBuf,
        /// Holdings CSV: instrument,quantity,average_cost,current_price[,daily_change_pct]
        #[arg(long)]
        holdings: PathBuf,
        /// Market index instrument for measured betas instead of the beta table
        #[arg(long)]
        market: Option<String>,
    },
    /// Validate an analytics configuration
    Validate {
        #[arg(short, long)]
        config: PathBuf,
    },
}

pub fn run(cli: Cli) -> ExitCode {
    match cli.command {
        Command::Indicators {
            data,
            instrument,
            indicator,
            param,
        } => run_indicators(&data, &instrument, indicator.as_deref(), &param),
        Command::Analyze { data, instrument } => run_analyze(&data, &instrument),
        Command::Portfolio {
            config,
            data,
            holdings,
            market,
        } => run_portfolio(config.as_ref(), &data, &holdings, market.as_deref()),
        Command::Validate { config } => run_validate(&config),
    }
}

pub fn parse_param(s: &str) -> Result<(String, String), String> {
    let (key, value) = s
        .split_once('=')
        .ok_or_else(|| format!("expected key=value, got '{}'", s))?;
    let key = key.trim();
    if key.is_empty() {
        return Err(format!("empty parameter name in '{}'", s));
    }
    Ok((key.to_lowercase(), value.trim().to_string()))
}

pub fn load_config(path: &PathBuf) -> Result<FileConfigAdapter, ExitCode> {
    FileConfigAdapter::from_file(path).map_err(|e| {
        let err = AnalyticsError::ConfigParse {
            file: path.display().to_string(),
            reason: e.to_string(),
        };
        eprintln!("error: {err}");
        ExitCode::from(&err)
    })
}

/// Full history of one instrument.
pub fn load_series(
    port: &dyn PriceHistoryPort,
    instrument: &str,
) -> Result<PriceSeries, AnalyticsError> {
    port.fetch_series(instrument, NaiveDate::MIN, NaiveDate::MAX)
}

/// Price history for every held instrument the port lists. Instruments that
/// are not listed or fail to load are skipped and valued at their current
/// price.
pub fn load_prices(
    port: &dyn PriceHistoryPort,
    holdings: &[Holding],
) -> Result<HashMap<String, PriceSeries>, AnalyticsError> {
    let available: HashSet<String> = port.list_instruments()?.into_iter().collect();
    let mut prices = HashMap::new();
    for holding in holdings {
        let instrument = holding.instrument.as_str();
        if prices.contains_key(instrument) {
            continue;
        }
        if !available.contains(instrument) {
            tracing::warn!(instrument, "no price file");
            continue;
        }
        match load_series(port, instrument) {
            Ok(series) => {
                prices.insert(holding.instrument.clone(), series);
            }
            Err(e) => {
                tracing::warn!(instrument, error = %e, "price history skipped");
            }
        }
    }
    Ok(prices)
}

fn run_indicators(
    data: &PathBuf,
    instrument: &str,
    indicator: Option<&str>,
    params: &[(String, String)],
) -> ExitCode {
    let port = CsvAdapter::new(data.clone());
    let series = match load_series(&port, instrument) {
        Ok(s) => s,
        Err(e) => {
            eprintln!("error: {e}");
            return (&e).into();
        }
    };
    tracing::info!(instrument, bars = series.len(), "price history loaded");

    match indicator {
        Some(name) => {
            let params: HashMap<String, String> = params.iter().cloned().collect();
            match calculate_indicator(&series, name, &params) {
                Ok(result) => {
                    print!("{}", format_result(&result));
                    ExitCode::SUCCESS
                }
                Err(e) => {
                    eprintln!("error: {e}");
                    (&e).into()
                }
            }
        }
        None => {
            if !params.is_empty() {
                tracing::warn!("--param is ignored without --indicator");
            }
            let analysis = analyze_instrument(&series);
            print!("{}", format_panel(&analysis.panel));
            ExitCode::SUCCESS
        }
    }
}

fn run_analyze(data: &PathBuf, instrument: &str) -> ExitCode {
    let port = CsvAdapter::new(data.clone());
    let series = match load_series(&port, instrument) {
        Ok(s) => s,
        Err(e) => {
            eprintln!("error: {e}");
            return (&e).into();
        }
    };

    let analysis = analyze_instrument(&series);
    println!("Instrument:  {}", analysis.instrument);
    match (analysis.current_price, analysis.analysis_date) {
        (Some(price), Some(date)) => {
            println!("Price:       {:.2}", price);
            println!("As of:       {}", date);
        }
        _ => println!("Price:       n/a"),
    }
    println!("Data points: {}", analysis.data_points);
    println!();
    print!("{}", format_panel(&analysis.panel));
    ExitCode::SUCCESS
}

fn run_portfolio(
    config_path: Option<&PathBuf>,
    data: &PathBuf,
    holdings_path: &PathBuf,
    market: Option<&str>,
) -> ExitCode {
    let adapter = match config_path {
        Some(path) => {
            tracing::info!(path = %path.display(), "loading config");
            match load_config(path) {
                Ok(a) => Some(a),
                Err(code) => return code,
            }
        }
        None => None,
    };

    let (config, beta_table, sectors) = match &adapter {
        Some(a) => {
            let config = match AnalyticsConfig::from_config(a) {
                Ok(c) => c,
                Err(e) => {
                    eprintln!("error: {e}");
                    return (&e).into();
                }
            };
            let betas = match StaticBetaTable::from_config(a) {
                Ok(b) => b,
                Err(e) => {
                    eprintln!("error: {e}");
                    return (&e).into();
                }
            };
            (config, betas, SectorTable::from_config(a))
        }
        None => (
            AnalyticsConfig::default(),
            StaticBetaTable::default(),
            SectorTable::default(),
        ),
    };

    let holdings = match load_holdings(holdings_path) {
        Ok(h) => h,
        Err(e) => {
            eprintln!("error: {e}");
            return (&e).into();
        }
    };
    tracing::info!(holdings = holdings.len(), "holdings loaded");

    let port = CsvAdapter::new(data.clone());
    let prices = match load_prices(&port, &holdings) {
        Ok(p) => p,
        Err(e) => {
            eprintln!("error: {e}");
            return (&e).into();
        }
    };

    let covariance;
    let betas: &dyn BetaSource = match market {
        Some(index) => match load_series(&port, index) {
            Ok(series) => {
                covariance = CovarianceBeta::estimate(&series, &prices);
                &covariance
            }
            Err(e) => {
                eprintln!("error: market index {index}: {e}");
                return (&e).into();
            }
        },
        None => &beta_table,
    };

    match run_portfolio_pipeline(&holdings, &prices, &config, betas, &sectors) {
        Ok((analysis, recommendations)) => {
            print!("{}", format_portfolio(&analysis, &recommendations));
            ExitCode::SUCCESS
        }
        Err(e) => {
            eprintln!("error: {e}");
            (&e).into()
        }
    }
}

pub fn run_portfolio_pipeline(
    holdings: &[Holding],
    prices: &HashMap<String, PriceSeries>,
    config: &AnalyticsConfig,
    betas: &dyn BetaSource,
    sectors: &dyn SectorLookup,
) -> Result<(PortfolioAnalysis, Recommendations), AnalyticsError> {
    let analysis = analyze_portfolio(holdings, prices, config, betas, sectors)?;
    let recommendations = recommend(&analysis);
    Ok((analysis, recommendations))
}

fn run_validate(config_path: &PathBuf) -> ExitCode {
    eprintln!("Validating config: {}", config_path.display());
    let adapter = match load_config(config_path) {
        Ok(a) => a,
        Err(code) => return code,
    };

    if let Err(e) = validate_analytics_config(&adapter) {
        eprintln!("error: {e}");
        return (&e).into();
    }

    let config = match AnalyticsConfig::from_config(&adapter) {
        Ok(c) => c,
        Err(e) => {
            eprintln!("error: {e}");
            return (&e).into();
        }
    };

    eprintln!("  risk_free_rate: {}", config.risk_free_rate);
    eprintln!("  lookback_days:  {}", config.lookback_days);
    match config.as_of {
        Some(d) => eprintln!("  as_of:          {}", d),
        None => eprintln!("  as_of:          latest bar"),
    }
    eprintln!("  sector overrides: {}", adapter.get_section("sectors").len());
    eprintln!("  beta overrides:   {}", adapter.get_section("betas").len());
    eprintln!("\nConfiguration is valid.");
    ExitCode::SUCCESS
}

pub fn format_value(value: &IndicatorValue) -> String {
    match value {
        IndicatorValue::Simple(v) => format!("{:.2}", v),
        IndicatorValue::Macd {
            line,
            signal,
            histogram,
        } => format!("line={:.4} signal={:.4} hist={:.4}", line, signal, histogram),
        IndicatorValue::Bollinger {
            upper,
            middle,
            lower,
        } => format!("upper={:.2} middle={:.2} lower={:.2}", upper, middle, lower),
        IndicatorValue::Stochastic { k, d } => format!("%K={:.2} %D={:.2}", k, d),
    }
}

/// One line per date, then the signal.
pub fn format_result(result: &IndicatorResult) -> String {
    let mut out = format!("{}\n", result.config);
    for (i, date) in result.dates.iter().enumerate() {
        if let Some(value) = result.output.get(i) {
            out.push_str(&format!("{}  {}\n", date, format_value(&value)));
        }
    }
    if let Some(signal) = result.signal {
        out.push_str(&format!("Signal: {}\n", signal));
    }
    out
}

pub fn format_panel(panel: &IndicatorPanel) -> String {
    let mut out = String::new();
    for (kind, result) in &panel.results {
        match result {
            Ok(r) => {
                let value = r.current().map(|v| format_value(&v)).unwrap_or_default();
                let signal = r.signal.map(|s| s.to_string()).unwrap_or_else(|| "-".into());
                out.push_str(&format!("{:<12} {:<8} {}\n", kind.name(), signal, value));
            }
            Err(e) => out.push_str(&format!("{:<12} {:<8} {}\n", kind.name(), "n/a", e)),
        }
    }
    out.push_str(&format_summary(&panel.summary));
    out
}

fn format_summary(summary: &SignalSummary) -> String {
    format!(
        "\nOverall: {} (strength {:.2}; buy {}, sell {}, neutral {})\n",
        summary.overall, summary.strength, summary.buy_count, summary.sell_count,
        summary.neutral_count
    )
}

pub fn format_portfolio(analysis: &PortfolioAnalysis, rec: &Recommendations) -> String {
    let m = &analysis.metrics;
    let r = &analysis.risk;
    let d = &analysis.diversification;
    let mut out = String::new();

    out.push_str("Performance\n");
    out.push_str(&format!("  Total value:        {:.2}\n", m.total_value));
    out.push_str(&format!("  Total cost:         {:.2}\n", m.total_cost));
    out.push_str(&format!(
        "  Profit/loss:        {:.2} ({:.2}%)\n",
        m.total_profit_loss, m.total_profit_loss_pct
    ));
    out.push_str(&format!("  Daily return:       {:.4}\n", m.daily_return));
    out.push_str(&format!("  Expected return:    {:.4}\n", m.expected_annual_return));
    out.push_str(&format!("  Sharpe:             {:.4}\n", m.sharpe_ratio));
    out.push_str(&format!("  Sortino:            {}\n", m.sortino_ratio));
    out.push_str(&format!("  Max drawdown:       {:.4}\n", m.max_drawdown));
    out.push_str(&format!("  Beta:               {:.4}\n", m.beta));

    out.push_str("\nRisk\n");
    out.push_str(&format!("  Volatility:         {:.4}\n", r.volatility));
    out.push_str(&format!("  VaR 95%:            {:.4}\n", r.var_95));
    out.push_str(&format!("  VaR 99%:            {:.4}\n", r.var_99));
    out.push_str(&format!("  Risk score:         {:.4} ({})\n", r.risk_score, r.risk_level));
    out.push_str(&format!("  Tracking error:     {:.4}\n", r.tracking_error));
    out.push_str(&format!("  Downside deviation: {:.4}\n", r.downside_deviation));

    out.push_str("\nDiversification\n");
    out.push_str(&format!("  Score:              {:.4}\n", d.diversification_score));
    out.push_str(&format!("  Concentration:      {:.4}\n", d.concentration_risk));
    out.push_str(&format!("  Holdings:           {}\n", d.number_of_holdings));
    out.push_str(&format!("  Largest holding:    {:.2}%\n", d.largest_holding_pct * 100.0));
    out.push_str(&format!("  Effective stocks:   {:.2}\n", d.effective_number_of_stocks));
    for (sector, weight) in &d.sector_allocation {
        out.push_str(&format!("    {:<20} {:.2}%\n", sector, weight * 100.0));
    }

    out.push_str(&format!("\nOverall score: {:.1} / 100\n", rec.overall_score));
    out.push_str(&format!("Assessment: {}\n", rec.risk_assessment));
    for line in rec
        .general
        .iter()
        .chain(&rec.rebalance)
        .chain(&rec.diversification_tips)
    {
        out.push_str(&format!("  - {}\n", line));
    }
    if let Some(date) = rec.next_review {
        out.push_str(&format!("Next review: {}\n", date));
    }
    out
}
