//! Option chain snapshots
//!
//! A snapshot is the already-normalized chain for one underlying and expiry:
//! one row per strike with both sides' last price, IV and open interest.
//! Fetching it from a broker happens elsewhere; this module only reads and
//! writes the JSON form and slices out one side as a strike table.

use std::fs;
use std::path::Path;

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use crate::core::{OptionType, StrikeQuote, StrikewiseError, StrikewiseResult};

/// Both sides of the chain at one strike
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChainRow {
    pub strike: f64,
    #[serde(default)]
    pub call_ltp: Option<f64>,
    #[serde(default)]
    pub put_ltp: Option<f64>,
    /// Exchange IV in percent
    #[serde(default)]
    pub call_iv: Option<f64>,
    /// Exchange IV in percent
    #[serde(default)]
    pub put_iv: Option<f64>,
    #[serde(default)]
    pub call_oi: Option<u64>,
    #[serde(default)]
    pub put_oi: Option<u64>,
}

impl ChainRow {
    pub fn new(strike: f64) -> Self {
        Self {
            strike,
            call_ltp: None,
            put_ltp: None,
            call_iv: None,
            put_iv: None,
            call_oi: None,
            put_oi: None,
        }
    }

    /// The requested side as a strike quote
    pub fn quote(&self, option_type: OptionType) -> StrikeQuote {
        let (last_price, implied_vol_pct, oi) = match option_type {
            OptionType::Call => (self.call_ltp, self.call_iv, self.call_oi),
            OptionType::Put => (self.put_ltp, self.put_iv, self.put_oi),
        };
        StrikeQuote {
            strike: self.strike,
            last_price,
            implied_vol_pct,
            open_interest: oi.unwrap_or(0),
            lot_size: None,
        }
    }
}

/// Normalized chain for one underlying and expiry
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChainSnapshot {
    /// Broker instrument key of the underlying (e.g. "NSE_INDEX|Nifty 50")
    pub instrument_key: String,
    /// Underlying spot at snapshot time
    pub spot: f64,
    /// Expiry date of every row
    pub expiry: NaiveDate,
    /// When the snapshot was taken
    #[serde(default = "Utc::now")]
    pub timestamp: DateTime<Utc>,
    /// One row per strike
    #[serde(default)]
    pub rows: Vec<ChainRow>,
}

impl ChainSnapshot {
    pub fn new(instrument_key: impl Into<String>, spot: f64, expiry: NaiveDate) -> Self {
        Self {
            instrument_key: instrument_key.into(),
            spot,
            expiry,
            timestamp: Utc::now(),
            rows: Vec::new(),
        }
    }

    /// Add a row, keeping rows sorted by strike
    pub fn add_row(&mut self, row: ChainRow) {
        self.rows.push(row);
        self.rows.sort_by(|a, b| a.strike.total_cmp(&b.strike));
    }

    /// Strike closest to spot
    pub fn atm_strike(&self) -> Option<f64> {
        self.rows
            .iter()
            .map(|r| r.strike)
            .min_by(|a, b| (self.spot - a).abs().total_cmp(&(self.spot - b).abs()))
    }

    /// One side of the chain as a strike table, ascending by strike
    pub fn strike_table(&self, option_type: OptionType) -> Vec<StrikeQuote> {
        let mut table: Vec<StrikeQuote> =
            self.rows.iter().map(|r| r.quote(option_type)).collect();
        table.sort_by(|a, b| a.strike.total_cmp(&b.strike));
        table
    }

    pub fn from_json_str(json: &str) -> StrikewiseResult<Self> {
        let snapshot: Self = serde_json::from_str(json)?;
        if !snapshot.spot.is_finite() {
            return Err(StrikewiseError::data("snapshot spot is not a number"));
        }
        Ok(snapshot)
    }

    /// Load a snapshot written by [`ChainSnapshot::to_json_file`] or an upstream fetcher
    pub fn from_json_file(path: impl AsRef<Path>) -> StrikewiseResult<Self> {
        let path = path.as_ref();
        let json = fs::read_to_string(path)?;
        let snapshot = Self::from_json_str(&json)?;

        tracing::info!(
            "Loaded {} chain for {} ({} strikes) from {:?}",
            snapshot.instrument_key,
            snapshot.expiry,
            snapshot.rows.len(),
            path
        );
        Ok(snapshot)
    }

    pub fn to_json_file(&self, path: impl AsRef<Path>) -> StrikewiseResult<()> {
        let json = serde_json::to_string_pretty(self)?;
        fs::write(path.as_ref(), json)?;
        tracing::info!("Saved {} chain to {:?}", self.instrument_key, path.as_ref());
        Ok(())
    }
}
