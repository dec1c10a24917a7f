//! Configuration for the analysis pipeline

use std::fs;
use std::path::Path;

use chrono::NaiveTime;
use serde::{Deserialize, Serialize};

use crate::core::{StrikewiseError, StrikewiseResult};
use crate::projection::ProjectionConfig;

/// Market constants and solver settings applied to every request
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct AnalysisConfig {
    /// Continuously compounded risk-free rate (decimal)
    /// Default: 0.065
    pub risk_free_rate: f64,

    /// Contracts per lot for the underlying
    /// Default: 75 (NIFTY)
    pub lot_size: u32,

    /// Time of day at which contracts expire on the expiry date
    /// Default: 15:30:00 (NSE close)
    pub expiry_cutoff: NaiveTime,

    /// Stage settings for the projection pass
    #[serde(flatten)]
    pub projection: ProjectionConfig,
}

impl Default for AnalysisConfig {
    fn default() -> Self {
        Self {
            risk_free_rate: 0.065,
            lot_size: 75,
            expiry_cutoff: NaiveTime::from_hms_opt(15, 30, 0).unwrap_or_default(),
            projection: ProjectionConfig::default(),
        }
    }
}

impl AnalysisConfig {
    /// Load from a JSON file; missing keys take their defaults
    pub fn from_json_file(path: impl AsRef<Path>) -> StrikewiseResult<Self> {
        let json = fs::read_to_string(path.as_ref())?;
        let config: Self = serde_json::from_str(&json)?;
        config.validate()?;
        Ok(config)
    }

    /// Reject settings no request could run with
    pub fn validate(&self) -> StrikewiseResult<()> {
        if !self.risk_free_rate.is_finite() {
            return Err(StrikewiseError::invalid_input("risk_free_rate must be finite"));
        }
        if self.lot_size == 0 {
            return Err(StrikewiseError::invalid_input("lot_size must be positive"));
        }
        if !(self.projection.max_supplied_vol_pct > 0.0) {
            return Err(StrikewiseError::invalid_input(
                "max_supplied_vol_pct must be positive",
            ));
        }
        let solver = &self.projection.iv_solver;
        if !(solver.initial_vol > 0.0) || !(solver.price_tolerance > 0.0) {
            return Err(StrikewiseError::invalid_input(
                "iv_solver initial_vol and price_tolerance must be positive",
            ));
        }
        Ok(())
    }
}
