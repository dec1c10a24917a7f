//! Option type definitions
//!
//! Exchanges quoting Indian index options label the sides `CE` (call) and
//! `PE` (put); both spellings are accepted wherever an option type is parsed.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use super::error::StrikewiseError;

/// Option type (Call or Put)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OptionType {
    #[serde(alias = "CE", alias = "Call", alias = "ce")]
    Call,
    #[serde(alias = "PE", alias = "Put", alias = "pe")]
    Put,
}

impl OptionType {
    /// Payoff direction: +1 for call, -1 for put
    pub fn phi(&self) -> f64 {
        match self {
            OptionType::Call => 1.0,
            OptionType::Put => -1.0,
        }
    }

    /// Intrinsic value at given spot
    pub fn intrinsic(&self, spot: f64, strike: f64) -> f64 {
        match self {
            OptionType::Call => (spot - strike).max(0.0),
            OptionType::Put => (strike - spot).max(0.0),
        }
    }

    /// Exchange shorthand
    pub fn short_label(&self) -> &'static str {
        match self {
            OptionType::Call => "CE",
            OptionType::Put => "PE",
        }
    }
}

impl fmt::Display for OptionType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            OptionType::Call => write!(f, "call"),
            OptionType::Put => write!(f, "put"),
        }
    }
}

impl FromStr for OptionType {
    type Err = StrikewiseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "call" | "ce" | "c" => Ok(OptionType::Call),
            "put" | "pe" | "p" => Ok(OptionType::Put),
            other => Err(StrikewiseError::invalid_input(format!(
                "unknown option type '{}' (expected call/CE or put/PE)",
                other
            ))),
        }
    }
}
