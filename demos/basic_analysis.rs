//! Example: Projecting a small NIFTY call chain and selecting contracts
//!
//! Run with: cargo run --example basic_analysis

use chrono::NaiveDate;
use strikewise::prelude::*;

fn main() -> StrikewiseResult<()> {
    let expiry = NaiveDate::from_ymd_opt(2025, 6, 26).expect("valid date");
    let now = NaiveDate::from_ymd_opt(2025, 6, 23)
        .and_then(|d| d.and_hms_opt(9, 45, 0))
        .expect("valid timestamp");

    let mut snapshot = ChainSnapshot::new("NSE_INDEX|Nifty 50", 22150.0, expiry);
    for (strike, ltp, iv) in [
        (22000.0, Some(212.4), Some(13.8)),
        (22100.0, Some(148.9), Some(13.4)),
        (22200.0, Some(97.3), None),
        (22300.0, Some(58.1), Some(13.1)),
        (22400.0, None, None),
    ] {
        let mut row = ChainRow::new(strike);
        row.call_ltp = ltp;
        row.call_iv = iv;
        snapshot.add_row(row);
    }

    let request = AnalysisRequest {
        instrument_key: snapshot.instrument_key.clone(),
        expiry_date: expiry,
        spot_target_gain: 120.0,
        spot_sl_loss: 50.0,
        capital: 60_000.0,
        risk_tolerance: 12_000.0,
        minutes_to_hit_target: 45,
        option_type: OptionType::Call,
    };

    let response = analyze(&request, &snapshot, &AnalysisConfig::default(), now)?;

    println!("=== Projections ===\n");
    for p in &response.projections {
        println!(
            "{:>8.0}  ltp {:>8}  target {:>8}  sl {:>8}  iv {:>6}",
            p.strike,
            p.ltp.map_or("-".to_string(), |v| format!("{:.2}", v)),
            p.target_premium.map_or("-".to_string(), |v| format!("{:.2}", v)),
            p.stop_premium.map_or("-".to_string(), |v| format!("{:.2}", v)),
            p.iv_used.map_or("-".to_string(), |v| format!("{:.2}", v)),
        );
    }

    println!("\n=== Selection ===\n");
    for c in &response.selected_contracts {
        println!(
            "{:>8.0}  x{:<3} cost {:>10.2}  risk {:>9.2}  reward {:>10.2}",
            c.strike, c.lots, c.total_cost, c.total_risk, c.total_reward
        );
    }

    println!("\n=== Projections CSV ===\n");
    write_projections_csv(std::io::stdout(), &response.projections)?;
    Ok(())
}
