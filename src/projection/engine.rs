//! Projection pass over the strike table

use tracing::debug;

use crate::core::{round2, round_to, StrikeQuote};
use crate::models::{price, price_and_greeks, solve_implied_vol};

use super::{Projection, ProjectionConfig, Scenario};

/// Project every strike, preserving input order and length
pub fn project_strikes(
    quotes: &[StrikeQuote],
    scenario: &Scenario,
    config: &ProjectionConfig,
) -> Vec<Projection> {
    let projections: Vec<Projection> = quotes
        .iter()
        .map(|quote| project_strike(quote, scenario, config))
        .collect();

    debug!(
        strikes = projections.len(),
        fully_priced = projections.iter().filter(|p| p.is_fully_priced()).count(),
        "projected strike table"
    );

    projections
}

/// Project a single strike
pub fn project_strike(
    quote: &StrikeQuote,
    scenario: &Scenario,
    config: &ProjectionConfig,
) -> Projection {
    let lot_size = quote.effective_lot_size(scenario.lot_size);
    let mut row = Projection::unpriced(quote, lot_size);
    row.strike = round2(quote.strike);
    row.ltp = quote.last_price.filter(|p| p.is_finite()).map(round2);

    let Some(entry) = quote.entry_price() else {
        debug!(strike = quote.strike, "no usable last price");
        return row;
    };

    let lots = f64::from(lot_size);
    let capital_per_lot = entry * lots;
    row.capital_per_lot = Some(round2(capital_per_lot));

    let Some(vol_pct) = resolve_vol_pct(quote, entry, scenario, config) else {
        return row;
    };
    row.iv_used = Some(round2(vol_pct));

    let sigma = vol_pct / 100.0;
    let strike = quote.strike;
    let target = price_and_greeks(
        scenario.target_spot,
        strike,
        scenario.rate,
        sigma,
        scenario.time_to_expiry,
        scenario.option_type,
    );
    let stop = price(
        scenario.stop_spot,
        strike,
        scenario.rate,
        sigma,
        scenario.time_to_expiry,
        scenario.option_type,
    );

    let (Some(target), Some(stop_premium)) = (target, stop) else {
        debug!(strike, "scenario repricing undefined");
        return row;
    };

    // Calls gain when the premium rises, puts are mirrored
    let phi = scenario.option_type.phi();
    let profit_per_lot = phi * (target.price - entry) * lots;
    let loss_per_lot = phi * (entry - stop_premium) * lots;
    let pct = |amount: f64| {
        if capital_per_lot > 0.0 {
            amount / capital_per_lot * 100.0
        } else {
            0.0
        }
    };

    row.target_premium = Some(round2(target.price));
    row.stop_premium = Some(round2(stop_premium));
    row.profit_per_lot = Some(round2(profit_per_lot));
    row.loss_per_lot = Some(round2(loss_per_lot));
    row.profit_pct = Some(round2(pct(profit_per_lot)));
    row.loss_pct = Some(round2(pct(loss_per_lot)));
    row.delta = Some(round_to(target.delta, 4));
    row.gamma = Some(round_to(target.gamma, 6));
    row
}

/// Exchange IV when plausible, otherwise backsolved from the entry price
fn resolve_vol_pct(
    quote: &StrikeQuote,
    entry: f64,
    scenario: &Scenario,
    config: &ProjectionConfig,
) -> Option<f64> {
    let max_vol = config.max_supplied_vol_pct;
    if let Some(vol) = quote.supplied_vol_pct(max_vol) {
        return Some(vol);
    }

    match solve_implied_vol(
        entry,
        scenario.current_spot,
        quote.strike,
        scenario.rate,
        scenario.time_to_expiry,
        scenario.option_type,
        &config.iv_solver,
    ) {
        Ok(vol) if vol > 0.0 && vol <= max_vol => Some(vol),
        Ok(vol) => {
            debug!(strike = quote.strike, vol, "backsolved IV out of range");
            None
        }
        Err(reason) => {
            debug!(strike = quote.strike, %reason, "IV backsolve failed");
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::OptionType;

    const SPOT: f64 = 22150.0;
    const RATE: f64 = 0.065;

    fn scenario(option_type: OptionType) -> Scenario {
        let (target_spot, stop_spot) = match option_type {
            OptionType::Call => (SPOT + 150.0, SPOT - 75.0),
            OptionType::Put => (SPOT - 150.0, SPOT + 75.0),
        };
        Scenario {
            target_spot,
            stop_spot,
            current_spot: SPOT,
            time_to_expiry: 5.0 / 365.0,
            rate: RATE,
            lot_size: 75,
            option_type,
        }
    }

    /// Quote priced by the model itself at the given volatility
    fn fair_quote(strike: f64, vol: f64, s: &Scenario) -> StrikeQuote {
        let ltp = price(SPOT, strike, RATE, vol, s.time_to_expiry, s.option_type).unwrap();
        StrikeQuote::new(strike).with_last_price(ltp).with_open_interest(1200)
    }

    #[test]
    fn test_call_projection_fields() {
        let s = scenario(OptionType::Call);
        let quote = fair_quote(22200.0, 0.14, &s).with_implied_vol_pct(14.0);
        let row = project_strike(&quote, &s, &ProjectionConfig::default());

        assert!(row.is_fully_priced());
        assert_eq!(row.iv_used, Some(14.0));
        assert_eq!(row.open_interest, 1200);
        assert_eq!(row.lot_size, 75);

        // Capital comes from the unrounded entry price, rounded once
        let entry = quote.last_price.unwrap();
        assert_eq!(row.capital_per_lot, Some(round2(entry * 75.0)));
        assert!((row.capital_per_lot.unwrap() - row.ltp.unwrap() * 75.0).abs() <= 0.005 * 75.0);

        let ltp = row.ltp.unwrap();
        assert!(row.target_premium.unwrap() > ltp);
        assert!(row.stop_premium.unwrap() < ltp);
        assert!(row.profit_per_lot.unwrap() > 0.0);
        assert!(row.loss_per_lot.unwrap() > 0.0);

        let delta = row.delta.unwrap();
        assert!(delta > 0.0 && delta < 1.0);
        assert!(row.gamma.unwrap() > 0.0);

        let expected_pct = row.profit_per_lot.unwrap() / row.capital_per_lot.unwrap() * 100.0;
        assert!((row.profit_pct.unwrap() - expected_pct).abs() < 0.05);
    }

    #[test]
    fn test_put_projection_is_mirrored() {
        let s = scenario(OptionType::Put);
        let quote = fair_quote(22100.0, 0.15, &s).with_implied_vol_pct(15.0);
        let row = project_strike(&quote, &s, &ProjectionConfig::default());

        let ltp = row.ltp.unwrap();
        assert!(row.target_premium.unwrap() > ltp);
        assert!(row.stop_premium.unwrap() < ltp);
        // Profit is entry - target for puts, so with the raw premium moves it goes negative
        let profit = row.profit_per_lot.unwrap();
        let loss = row.loss_per_lot.unwrap();
        assert!((profit - (ltp - row.target_premium.unwrap()) * 75.0).abs() < 1.0);
        assert!((loss - (row.stop_premium.unwrap() - ltp) * 75.0).abs() < 1.0);
        assert!(row.delta.unwrap() < 0.0);
    }

    #[test]
    fn test_missing_price_row() {
        let s = scenario(OptionType::Call);
        let quote = StrikeQuote::new(23000.0).with_open_interest(40);
        let row = project_strike(&quote, &s, &ProjectionConfig::default());

        assert_eq!(row, Projection::unpriced(&quote, 75));

        let zero = StrikeQuote::new(23000.0).with_last_price(0.0);
        let row = project_strike(&zero, &s, &ProjectionConfig::default());
        assert_eq!(row.ltp, Some(0.0));
        assert_eq!(row.capital_per_lot, None);
        assert_eq!(row.iv_used, None);
    }

    #[test]
    fn test_backsolves_when_supplied_iv_implausible() {
        let s = scenario(OptionType::Call);
        let config = ProjectionConfig::default();

        for bad_iv in [None, Some(0.0), Some(-4.0), Some(151.0)] {
            let mut quote = fair_quote(22150.0, 0.18, &s);
            quote.implied_vol_pct = bad_iv;
            let row = project_strike(&quote, &s, &config);
            let iv = row.iv_used.unwrap();
            assert!((iv - 18.0).abs() < 0.05, "iv {} for supplied {:?}", iv, bad_iv);
        }
    }

    #[test]
    fn test_unsolvable_iv_keeps_capital_only() {
        let s = scenario(OptionType::Call);
        // A call priced above the underlying has no implied volatility
        let quote = StrikeQuote::new(22000.0).with_last_price(30000.0);
        let row = project_strike(&quote, &s, &ProjectionConfig::default());

        assert_eq!(row.ltp, Some(30000.0));
        assert_eq!(row.capital_per_lot, Some(2_250_000.0));
        assert_eq!(row.iv_used, None);
        assert_eq!(row.target_premium, None);
        assert_eq!(row.profit_per_lot, None);
        assert_eq!(row.delta, None);
    }

    #[test]
    fn test_undefined_scenario_keeps_partial_row() {
        let mut s = scenario(OptionType::Call);
        s.stop_spot = 0.0;
        let quote = fair_quote(22200.0, 0.14, &s).with_implied_vol_pct(14.0);
        let row = project_strike(&quote, &s, &ProjectionConfig::default());

        assert!(row.capital_per_lot.is_some());
        assert_eq!(row.iv_used, Some(14.0));
        assert_eq!(row.target_premium, None);
        assert_eq!(row.stop_premium, None);
        assert_eq!(row.profit_pct, None);
        assert!(!row.is_fully_priced());
    }

    #[test]
    fn test_zero_lot_size_reports_zero_pct() {
        let mut s = scenario(OptionType::Call);
        s.lot_size = 0;
        let quote = fair_quote(22200.0, 0.14, &s).with_implied_vol_pct(14.0);
        let row = project_strike(&quote, &s, &ProjectionConfig::default());

        assert_eq!(row.capital_per_lot, Some(0.0));
        assert_eq!(row.profit_pct, Some(0.0));
        assert_eq!(row.loss_pct, Some(0.0));
    }

    #[test]
    fn test_table_length_and_order_preserved() {
        let s = scenario(OptionType::Call);
        let quotes = vec![
            StrikeQuote::new(21900.0),
            fair_quote(22000.0, 0.15, &s),
            StrikeQuote::new(22100.0).with_last_price(-1.0),
            StrikeQuote::new(22200.0).with_last_price(30000.0),
            fair_quote(22300.0, 0.13, &s).with_implied_vol_pct(13.0),
            StrikeQuote::new(22400.0).with_last_price(f64::NAN),
        ];

        let rows = project_strikes(&quotes, &s, &ProjectionConfig::default());

        assert_eq!(rows.len(), quotes.len());
        for (row, quote) in rows.iter().zip(&quotes) {
            assert_eq!(row.strike, quote.strike);
        }
        assert!(rows[1].is_fully_priced());
        assert!(rows[4].is_fully_priced());
        assert!(!rows[0].is_fully_priced());
        assert_eq!(rows[5].ltp, None);
    }

    #[test]
    fn test_quote_lot_size_override() {
        let s = scenario(OptionType::Call);
        let mut quote = fair_quote(22200.0, 0.14, &s).with_implied_vol_pct(14.0);
        quote.lot_size = Some(50);
        let row = project_strike(&quote, &s, &ProjectionConfig::default());

        assert_eq!(row.lot_size, 50);
        assert_eq!(row.capital_per_lot, Some(round2(quote.last_price.unwrap() * 50.0)));
    }

    #[test]
    fn test_empty_table() {
        let rows = project_strikes(&[], &scenario(OptionType::Put), &ProjectionConfig::default());
        assert!(rows.is_empty());
    }
}
