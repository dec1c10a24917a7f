//! Strike Projection
//!
//! Reprices every strike of one expiry at a target spot and a stop-loss spot
//! and reports what a single lot would make or lose in each scenario.
//!
//! Per strike:
//! 1. **Entry price**: rows without a positive last price stay unpriced
//! 2. **Volatility**: exchange IV if plausible, otherwise backsolved from the last price
//! 3. **Scenarios**: Black-Scholes at target and stop spot with the resolved volatility
//!
//! A row is emitted for every input strike, in input order, whatever branch it
//! ends in. Fields that could not be computed are `None`.

mod engine;

pub use engine::*;

use serde::{Deserialize, Serialize};

use crate::core::{OptionType, StrikeQuote, StrikewiseError, StrikewiseResult};
use crate::models::IvSolverConfig;

/// Market scenario shared by every strike of one request
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Scenario {
    /// Underlying price at which the trade is closed for profit
    pub target_spot: f64,
    /// Underlying price at which the trade is stopped out
    pub stop_spot: f64,
    /// Underlying price now (used for IV backsolving)
    pub current_spot: f64,
    /// Years from the exit moment to expiry
    pub time_to_expiry: f64,
    /// Continuously compounded risk-free rate (decimal)
    pub rate: f64,
    /// Contracts per lot, unless a quote overrides it
    pub lot_size: u32,
    /// Side being traded
    pub option_type: OptionType,
}

impl Scenario {
    /// Whole-request checks; per-strike problems are never errors
    pub fn validate(&self) -> StrikewiseResult<()> {
        for (name, spot) in [
            ("current spot", self.current_spot),
            ("target spot", self.target_spot),
            ("stop-loss spot", self.stop_spot),
        ] {
            if !(spot.is_finite() && spot > 0.0) {
                return Err(StrikewiseError::invalid_input(format!(
                    "{} must be positive, got {}",
                    name, spot
                )));
            }
        }
        if !(self.time_to_expiry.is_finite() && self.time_to_expiry > 0.0) {
            return Err(StrikewiseError::invalid_input(format!(
                "time to expiry must be positive, got {:.6} years",
                self.time_to_expiry
            )));
        }
        if !self.rate.is_finite() {
            return Err(StrikewiseError::invalid_input("rate must be finite"));
        }
        if self.lot_size == 0 {
            return Err(StrikewiseError::invalid_input("lot size must be positive"));
        }
        Ok(())
    }
}

/// Tunables for the projection pass
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ProjectionConfig {
    /// Exchange IV above this (percent) is treated as bad data and backsolved
    /// Default: 150.0
    pub max_supplied_vol_pct: f64,

    /// Newton-Raphson settings for backsolving
    pub iv_solver: IvSolverConfig,
}

impl Default for ProjectionConfig {
    fn default() -> Self {
        Self {
            max_supplied_vol_pct: 150.0,
            iv_solver: IvSolverConfig::default(),
        }
    }
}

/// Projected risk/reward for one strike
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Projection {
    pub strike: f64,
    /// Last traded price (entry price)
    pub ltp: Option<f64>,
    /// Model premium at the target spot
    pub target_premium: Option<f64>,
    /// Model premium at the stop-loss spot
    pub stop_premium: Option<f64>,
    pub capital_per_lot: Option<f64>,
    pub profit_per_lot: Option<f64>,
    pub loss_per_lot: Option<f64>,
    /// Profit as a percentage of capital per lot
    pub profit_pct: Option<f64>,
    /// Loss as a percentage of capital per lot
    pub loss_pct: Option<f64>,
    /// Delta at the target spot
    pub delta: Option<f64>,
    /// Gamma at the target spot
    pub gamma: Option<f64>,
    /// Volatility used for repricing, in percent
    pub iv_used: Option<f64>,
    pub open_interest: u64,
    pub lot_size: u32,
}

impl Projection {
    /// Row carrying only the quote's identity; every derived field is `None`
    pub fn unpriced(quote: &StrikeQuote, lot_size: u32) -> Self {
        Self {
            strike: quote.strike,
            ltp: None,
            target_premium: None,
            stop_premium: None,
            capital_per_lot: None,
            profit_per_lot: None,
            loss_per_lot: None,
            profit_pct: None,
            loss_pct: None,
            delta: None,
            gamma: None,
            iv_used: None,
            open_interest: quote.open_interest,
            lot_size,
        }
    }

    /// Both scenarios were priced and every derived field is present
    pub fn is_fully_priced(&self) -> bool {
        self.profit_pct.is_some()
            && self.loss_pct.is_some()
            && self.delta.is_some()
            && self.gamma.is_some()
            && self.iv_used.is_some()
    }

    /// Reward-to-risk ratio per lot
    pub fn reward_to_risk(&self) -> Option<f64> {
        match (self.profit_per_lot, self.loss_per_lot) {
            (Some(p), Some(l)) if l > 0.0 => Some(p / l),
            _ => None,
        }
    }
}
