//! Black-Scholes Model
//!
//! Provides:
//! - European option pricing with delta and gamma
//! - Implied volatility solver (Newton-Raphson)
//!
//! No dividend yield is modelled. Every entry point reports an undefined
//! result as `None` (or an [`IvFailure`]) rather than a NaN.

use std::f64::consts::{PI, SQRT_2};

use serde::{Deserialize, Serialize};
use statrs::function::erf::erfc;
use thiserror::Error;

use crate::core::{BsmQuote, OptionType};

/// Standard normal CDF
pub fn norm_cdf(x: f64) -> f64 {
    0.5 * erfc(-x / SQRT_2)
}

/// Standard normal PDF
pub fn norm_pdf(x: f64) -> f64 {
    (-0.5 * x * x).exp() / (2.0 * PI).sqrt()
}

/// Black-Scholes d1 parameter
pub fn d1(spot: f64, strike: f64, rate: f64, vol: f64, time: f64) -> f64 {
    ((spot / strike).ln() + (rate + 0.5 * vol * vol) * time) / (vol * time.sqrt())
}

/// Black-Scholes d2 parameter
pub fn d2(spot: f64, strike: f64, rate: f64, vol: f64, time: f64) -> f64 {
    d1(spot, strike, rate, vol, time) - vol * time.sqrt()
}

/// Black-Scholes European price, delta and gamma
///
/// Returns `None` when `time <= 0` or `vol <= 0`, and also when spot or strike
/// is non-positive (the log-moneyness is undefined there).
pub fn price_and_greeks(
    spot: f64,
    strike: f64,
    rate: f64,
    vol: f64,
    time: f64,
    option_type: OptionType,
) -> Option<BsmQuote> {
    if !(time > 0.0) || !(vol > 0.0) {
        return None;
    }
    if !(spot > 0.0) || !(strike > 0.0) {
        return None;
    }

    let sqrt_t = time.sqrt();
    let d1 = d1(spot, strike, rate, vol, time);
    let d2 = d1 - vol * sqrt_t;
    let df = (-rate * time).exp();

    let (price, delta) = match option_type {
        OptionType::Call => (
            spot * norm_cdf(d1) - strike * df * norm_cdf(d2),
            norm_cdf(d1),
        ),
        OptionType::Put => (
            strike * df * norm_cdf(-d2) - spot * norm_cdf(-d1),
            -norm_cdf(-d1),
        ),
    };

    // Gamma (same for call and put)
    let gamma = norm_pdf(d1) / (spot * vol * sqrt_t);

    Some(BsmQuote::new(price, delta, gamma)).filter(BsmQuote::is_finite)
}

/// Black-Scholes European price only
pub fn price(
    spot: f64,
    strike: f64,
    rate: f64,
    vol: f64,
    time: f64,
    option_type: OptionType,
) -> Option<f64> {
    price_and_greeks(spot, strike, rate, vol, time, option_type).map(|q| q.price)
}

/// Newton-Raphson settings for the IV solver
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct IvSolverConfig {
    /// Starting volatility (decimal)
    /// Default: 0.20
    pub initial_vol: f64,

    /// Maximum Newton steps before giving up
    /// Default: 100
    pub max_iterations: u32,

    /// Absolute price error accepted as converged
    /// Default: 1e-5
    pub price_tolerance: f64,

    /// Vega below this aborts the solve (division would be unstable)
    /// Default: 1e-8
    pub min_vega: f64,
}

impl Default for IvSolverConfig {
    fn default() -> Self {
        Self {
            initial_vol: 0.20,
            max_iterations: 100,
            price_tolerance: 1e-5,
            min_vega: 1e-8,
        }
    }
}

/// Why an implied volatility could not be backsolved
#[derive(Error, Debug, Clone, Copy, PartialEq)]
pub enum IvFailure {
    #[error("non-positive option price")]
    NonPositivePrice,

    #[error("non-positive time to expiry")]
    NonPositiveTime,

    #[error("non-positive spot or strike")]
    InvalidUnderlying,

    #[error("vega {vega:.3e} below minimum at iteration {iteration}")]
    VegaUnderflow { iteration: u32, vega: f64 },

    #[error("volatility stepped to {vol:.6} at iteration {iteration}")]
    NonPositiveVol { iteration: u32, vol: f64 },

    #[error("model price not finite at vol {vol:.6}, iteration {iteration}")]
    NonFinitePrice { iteration: u32, vol: f64 },

    #[error("no convergence after {iterations} iterations")]
    NotConverged { iterations: u32 },
}

/// Implied volatility via Newton-Raphson, in percentage units
///
/// Each step reprices with [`price_and_greeks`] and divides the price error by
/// the analytic vega `S·φ(d1)·√T`.
pub fn solve_implied_vol(
    option_price: f64,
    spot: f64,
    strike: f64,
    rate: f64,
    time: f64,
    option_type: OptionType,
    config: &IvSolverConfig,
) -> Result<f64, IvFailure> {
    if !(option_price > 0.0) {
        return Err(IvFailure::NonPositivePrice);
    }
    if !(time > 0.0) {
        return Err(IvFailure::NonPositiveTime);
    }
    if !(spot > 0.0) || !(strike > 0.0) {
        return Err(IvFailure::InvalidUnderlying);
    }

    let sqrt_t = time.sqrt();
    let mut vol = config.initial_vol;

    for iteration in 0..config.max_iterations {
        if !(vol > 0.0) {
            return Err(IvFailure::NonPositiveVol { iteration, vol });
        }
        let model_price = price(spot, strike, rate, vol, time, option_type)
            .ok_or(IvFailure::NonFinitePrice { iteration, vol })?;

        let vega = spot * norm_pdf(d1(spot, strike, rate, vol, time)) * sqrt_t;
        if !(vega >= config.min_vega) {
            return Err(IvFailure::VegaUnderflow { iteration, vega });
        }

        let diff = model_price - option_price;
        if diff.abs() < config.price_tolerance {
            return Ok(vol * 100.0);
        }

        vol -= diff / vega;
        if vol <= 0.0 {
            return Err(IvFailure::NonPositiveVol { iteration, vol });
        }
    }

    Err(IvFailure::NotConverged {
        iterations: config.max_iterations,
    })
}

/// Implied volatility in percentage units, `None` on any solver failure
pub fn implied_volatility(
    option_price: f64,
    spot: f64,
    strike: f64,
    rate: f64,
    time: f64,
    option_type: OptionType,
    config: &IvSolverConfig,
) -> Option<f64> {
    solve_implied_vol(option_price, spot, strike, rate, time, option_type, config).ok()
}
