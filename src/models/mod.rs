//! Pricing Models
//!
//! Implements:
//! - Black-Scholes (scenario pricing, delta/gamma, IV backsolving)

pub mod black_scholes;

pub use black_scholes::*;
