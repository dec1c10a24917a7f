//! Strikewise CLI
//!
//! Command-line interface for strike projection and contract selection.

use std::fs;
use std::path::PathBuf;

use anyhow::Context;
use chrono::NaiveDateTime;
use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use strikewise::models::black_scholes;
use strikewise::prelude::*;

#[derive(Debug, Parser)]
#[command(name = "strikewise", version, about = "Option strike projection and contract selection")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Project every strike of a chain snapshot and select contracts
    Analyze {
        /// Normalized option chain snapshot (JSON)
        #[arg(long)]
        snapshot: PathBuf,
        /// Analysis request (JSON)
        #[arg(long)]
        request: PathBuf,
        /// Analysis configuration (JSON); defaults apply when omitted
        #[arg(long)]
        config: Option<PathBuf>,
        /// Also write the projection table to this CSV file
        #[arg(long)]
        projections_csv: Option<PathBuf>,
        /// Print the full response as JSON instead of tables
        #[arg(long)]
        json: bool,
        /// Local time the analysis runs at (e.g. 2025-06-23T09:45:00); defaults to now
        #[arg(long)]
        as_of: Option<NaiveDateTime>,
    },
    /// Price a single option and optionally backsolve IV from a market price
    Price {
        #[arg(long)]
        spot: f64,
        #[arg(long)]
        strike: f64,
        /// Volatility in percent
        #[arg(long)]
        vol_pct: f64,
        /// Calendar days to expiry
        #[arg(long)]
        days: f64,
        #[arg(long, default_value_t = 0.065)]
        rate: f64,
        /// call/CE or put/PE
        #[arg(long, default_value = "call")]
        kind: OptionType,
        /// Observed premium to backsolve IV from
        #[arg(long)]
        market_price: Option<f64>,
    },
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    match cli.command {
        Command::Analyze {
            snapshot,
            request,
            config,
            projections_csv,
            json,
            as_of,
        } => run_analyze(snapshot, request, config, projections_csv, json, as_of),
        Command::Price {
            spot,
            strike,
            vol_pct,
            days,
            rate,
            kind,
            market_price,
        } => {
            run_price(spot, strike, vol_pct, days, rate, kind, market_price);
            Ok(())
        }
    }
}

fn run_analyze(
    snapshot_path: PathBuf,
    request_path: PathBuf,
    config_path: Option<PathBuf>,
    projections_csv: Option<PathBuf>,
    json: bool,
    as_of: Option<NaiveDateTime>,
) -> anyhow::Result<()> {
    let snapshot = ChainSnapshot::from_json_file(&snapshot_path)
        .with_context(|| format!("loading snapshot {:?}", snapshot_path))?;

    let request_json = fs::read_to_string(&request_path)
        .with_context(|| format!("reading request {:?}", request_path))?;
    let request: AnalysisRequest =
        serde_json::from_str(&request_json).context("parsing analysis request")?;

    let config = match config_path {
        Some(path) => AnalysisConfig::from_json_file(&path)
            .with_context(|| format!("loading config {:?}", path))?,
        None => AnalysisConfig::default(),
    };

    let now = as_of.unwrap_or_else(|| chrono::Local::now().naive_local());
    let response = analyze(&request, &snapshot, &config, now)?;

    if let Some(path) = projections_csv {
        write_projections_csv_file(&path, &response.projections)?;
    }

    if json {
        println!("{}", serde_json::to_string_pretty(&response)?);
        return Ok(());
    }

    print_report(&request, &snapshot, &response);
    Ok(())
}

fn fmt_opt(value: Option<f64>, width: usize, decimals: usize) -> String {
    match value {
        Some(v) => format!("{:>width$.decimals$}", v, width = width, decimals = decimals),
        None => format!("{:>width$}", "-", width = width),
    }
}

fn print_report(request: &AnalysisRequest, snapshot: &ChainSnapshot, response: &AnalysisResponse) {
    let s = &response.scenario;

    println!("Strikewise Analysis");
    println!("===================\n");
    println!("  Instrument: {}", request.instrument_key);
    println!("  Expiry:     {} ({})", request.expiry_date, s.option_type.short_label());
    println!("  Spot:       {:.2}", s.current_spot);
    if let Some(atm) = snapshot.atm_strike() {
        println!("  ATM strike: {:.2}", atm);
    }
    println!("  Target:     {:.2}", s.target_spot);
    println!("  Stop-loss:  {:.2}", s.stop_spot);
    println!("  T:          {:.6} years ({:.2} days)", s.time_to_expiry, s.time_to_expiry * 365.0);
    println!("  Lot size:   {}\n", s.lot_size);

    println!("--- Projections ---\n");
    println!(
        "{:>10} {:>9} {:>9} {:>9} {:>11} {:>10} {:>10} {:>8} {:>8} {:>7} {:>9} {:>7} {:>6}",
        "Strike", "LTP", "Target", "SL", "Cap/Lot", "Profit", "Loss", "Profit%", "Loss%",
        "Delta", "Gamma", "IV", "R:R"
    );
    for p in &response.projections {
        println!(
            "{:>10.2} {} {} {} {} {} {} {} {} {} {} {} {}",
            p.strike,
            fmt_opt(p.ltp, 9, 2),
            fmt_opt(p.target_premium, 9, 2),
            fmt_opt(p.stop_premium, 9, 2),
            fmt_opt(p.capital_per_lot, 11, 2),
            fmt_opt(p.profit_per_lot, 10, 2),
            fmt_opt(p.loss_per_lot, 10, 2),
            fmt_opt(p.profit_pct, 8, 2),
            fmt_opt(p.loss_pct, 8, 2),
            fmt_opt(p.delta, 7, 4),
            fmt_opt(p.gamma, 9, 6),
            fmt_opt(p.iv_used, 7, 2),
            fmt_opt(p.reward_to_risk(), 6, 2),
        );
    }
    println!(
        "\n  {} strikes, {} fully priced",
        response.projections.len(),
        response.actionable_projections().count()
    );

    println!("\n--- Selected Contracts ---\n");
    if response.selected_contracts.is_empty() {
        println!("  No contract fits the capital and risk budgets.");
        return;
    }

    println!(
        "{:>10} {:>5} {:>9} {:>9} {:>9} {:>12} {:>12} {:>12}",
        "Strike", "Lots", "Entry", "Target", "SL", "Reward", "Risk", "Cost"
    );
    for c in &response.selected_contracts {
        println!(
            "{:>10.2} {:>5} {:>9.2} {:>9.2} {:>9.2} {:>12.2} {:>12.2} {:>12.2}",
            c.strike,
            c.lots,
            c.entry_price,
            c.target_price,
            c.stop_price,
            c.total_reward,
            c.total_risk,
            c.total_cost
        );
    }
    println!(
        "\n  Capital used: {:.2} of {:.2}",
        response.total_cost(),
        request.capital
    );
    println!(
        "  Risk taken:   {:.2} of {:.2}",
        response.total_risk(),
        request.risk_tolerance
    );
    println!("  Reward:       {:.2}", response.total_reward());
}

fn run_price(
    spot: f64,
    strike: f64,
    vol_pct: f64,
    days: f64,
    rate: f64,
    kind: OptionType,
    market_price: Option<f64>,
) {
    let time = days / 365.0;
    let vol = vol_pct / 100.0;

    println!("Black-Scholes Pricing:");
    println!("  Spot: {:.2}", spot);
    println!("  Strike: {:.2}", strike);
    println!("  Time: {:.2} days", days);
    println!("  Rate: {:.2}%", rate * 100.0);
    println!("  Vol: {:.2}%\n", vol_pct);

    match black_scholes::price_and_greeks(spot, strike, rate, vol, time, kind) {
        Some(q) => {
            println!("{} ({}):", kind, kind.short_label());
            println!("  Price: {:.2}", q.price);
            println!("  Intrinsic: {:.2}", kind.intrinsic(spot, strike));
            println!("  Delta: {:.4}", q.delta);
            println!("  Gamma: {:.6}", q.gamma);
        }
        None => println!("  Price undefined (time and volatility must be positive)"),
    }

    if let Some(market_price) = market_price {
        println!("\nImplied Volatility Solver:");
        let config = IvSolverConfig::default();
        match black_scholes::solve_implied_vol(market_price, spot, strike, rate, time, kind, &config) {
            Ok(iv) => println!("  Premium {:.2} implies {:.2}% vol", market_price, iv),
            Err(reason) => println!("  IV solve failed: {}", reason),
        }
    }
}
