//! Core data types for Strikewise
//!
//! Defines fundamental types:
//! - OptionType: call/put, with exchange shorthand (CE/PE)
//! - StrikeQuote: one row of the normalized strike table
//! - BsmQuote: model price with delta and gamma
//! - StrikewiseError: whole-request failures
//! - round_to: presentation rounding shared by every output table

pub mod option;
pub mod quote;
pub mod greeks;
pub mod error;
pub mod precision;

pub use option::*;
pub use quote::*;
pub use greeks::*;
pub use error::*;
pub use precision::*;
