//! Model output for a single pricing scenario

use serde::{Deserialize, Serialize};

/// Black-Scholes price with first and second order spot sensitivities
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BsmQuote {
    /// Model premium
    pub price: f64,
    /// Delta: dV/dS (sensitivity to spot)
    pub delta: f64,
    /// Gamma: d²V/dS² (sensitivity of delta to spot)
    pub gamma: f64,
}

impl BsmQuote {
    pub fn new(price: f64, delta: f64, gamma: f64) -> Self {
        Self { price, delta, gamma }
    }

    /// All three values are finite numbers
    pub fn is_finite(&self) -> bool {
        self.price.is_finite() && self.delta.is_finite() && self.gamma.is_finite()
    }
}
