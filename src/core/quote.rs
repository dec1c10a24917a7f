//! Strike quote data
//!
//! One row of the normalized strike table for a single expiry and option side.

use serde::{Deserialize, Serialize};

/// Market data for one strike
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StrikeQuote {
    /// Strike price
    pub strike: f64,
    /// Last traded price
    #[serde(default)]
    pub last_price: Option<f64>,
    /// Implied volatility reported by the exchange, in percent (e.g. 14.5)
    #[serde(default)]
    pub implied_vol_pct: Option<f64>,
    /// Open interest
    #[serde(default)]
    pub open_interest: u64,
    /// Lot size override for this strike
    #[serde(default)]
    pub lot_size: Option<u32>,
}

impl StrikeQuote {
    /// Create a quote with only the strike populated
    pub fn new(strike: f64) -> Self {
        Self {
            strike,
            last_price: None,
            implied_vol_pct: None,
            open_interest: 0,
            lot_size: None,
        }
    }

    pub fn with_last_price(mut self, price: f64) -> Self {
        self.last_price = Some(price);
        self
    }

    pub fn with_implied_vol_pct(mut self, vol_pct: f64) -> Self {
        self.implied_vol_pct = Some(vol_pct);
        self
    }

    pub fn with_open_interest(mut self, oi: u64) -> Self {
        self.open_interest = oi;
        self
    }

    /// Entry price if it is usable (present, finite and positive)
    pub fn entry_price(&self) -> Option<f64> {
        self.last_price.filter(|p| p.is_finite() && *p > 0.0)
    }

    /// Supplied IV if it falls inside (0, max_vol_pct]
    pub fn supplied_vol_pct(&self, max_vol_pct: f64) -> Option<f64> {
        self.implied_vol_pct
            .filter(|v| v.is_finite() && *v > 0.0 && *v <= max_vol_pct)
    }

    /// Lot size for this strike, falling back to the request default
    pub fn effective_lot_size(&self, default: u32) -> u32 {
        self.lot_size.unwrap_or(default)
    }
}
