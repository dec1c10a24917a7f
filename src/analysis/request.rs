//! Request handling: from a trader's view to a projection scenario

use chrono::{Duration, NaiveDate, NaiveDateTime, NaiveTime};
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::core::{OptionType, StrikeQuote, StrikewiseError, StrikewiseResult};
use crate::data::ChainSnapshot;
use crate::projection::{project_strikes, ProjectionConfig, Scenario};
use crate::selection::select_contracts;

use super::{AnalysisConfig, AnalysisResponse};

const SECONDS_PER_YEAR: f64 = 365.0 * 24.0 * 60.0 * 60.0;

/// What the trader expects and can afford
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AnalysisRequest {
    /// Broker instrument key of the underlying
    pub instrument_key: String,
    pub expiry_date: NaiveDate,
    /// Points added to spot for the target scenario
    pub spot_target_gain: f64,
    /// Points subtracted from spot for the stop-loss scenario
    pub spot_sl_loss: f64,
    /// Capital budget (premium outlay)
    pub capital: f64,
    /// Maximum aggregate loss across selected contracts
    pub risk_tolerance: f64,
    /// Expected minutes until the target is hit
    #[serde(default)]
    pub minutes_to_hit_target: u32,
    pub option_type: OptionType,
}

impl AnalysisRequest {
    /// Spot level for the target scenario
    pub fn target_spot(&self, spot: f64) -> f64 {
        spot + self.spot_target_gain
    }

    /// Spot level for the stop-loss scenario
    pub fn stop_spot(&self, spot: f64) -> f64 {
        spot - self.spot_sl_loss
    }

    /// Build the projection scenario as of `now`
    pub fn scenario(
        &self,
        spot: f64,
        config: &AnalysisConfig,
        now: NaiveDateTime,
    ) -> StrikewiseResult<Scenario> {
        let scenario = Scenario {
            target_spot: self.target_spot(spot),
            stop_spot: self.stop_spot(spot),
            current_spot: spot,
            time_to_expiry: time_to_expiry(
                self.expiry_date,
                config.expiry_cutoff,
                now,
                self.minutes_to_hit_target,
            ),
            rate: config.risk_free_rate,
            lot_size: config.lot_size,
            option_type: self.option_type,
        };
        scenario.validate()?;
        Ok(scenario)
    }

    fn validate_budgets(&self) -> StrikewiseResult<()> {
        validate_budgets(self.capital, self.risk_tolerance)
    }
}

/// Years between the exit moment (`now` plus the holding horizon) and expiry
///
/// Negative once the exit moment is past the expiry cutoff.
pub fn time_to_expiry(
    expiry_date: NaiveDate,
    cutoff: NaiveTime,
    now: NaiveDateTime,
    minutes_ahead: u32,
) -> f64 {
    let expiry = expiry_date.and_time(cutoff);
    let exit = now + Duration::minutes(i64::from(minutes_ahead));
    (expiry - exit).num_milliseconds() as f64 / 1000.0 / SECONDS_PER_YEAR
}

fn validate_budgets(capital: f64, risk_tolerance: f64) -> StrikewiseResult<()> {
    if !(capital.is_finite() && capital >= 0.0) {
        return Err(StrikewiseError::invalid_input(format!(
            "capital must be a non-negative amount, got {}",
            capital
        )));
    }
    if !(risk_tolerance.is_finite() && risk_tolerance >= 0.0) {
        return Err(StrikewiseError::invalid_input(format!(
            "risk tolerance must be a non-negative amount, got {}",
            risk_tolerance
        )));
    }
    Ok(())
}

/// Project and select over an already-built strike table
pub fn analyze_table(
    quotes: &[StrikeQuote],
    scenario: &Scenario,
    config: &ProjectionConfig,
    capital: f64,
    risk_tolerance: f64,
) -> StrikewiseResult<AnalysisResponse> {
    if quotes.is_empty() {
        return Err(StrikewiseError::invalid_input("no strikes supplied"));
    }
    scenario.validate()?;
    validate_budgets(capital, risk_tolerance)?;

    let projections = project_strikes(quotes, scenario, config);
    let selected_contracts = select_contracts(&projections, capital, risk_tolerance);

    Ok(AnalysisResponse {
        scenario: scenario.clone(),
        projections,
        selected_contracts,
    })
}

/// Full analysis of one request against a chain snapshot
pub fn analyze(
    request: &AnalysisRequest,
    snapshot: &ChainSnapshot,
    config: &AnalysisConfig,
    now: NaiveDateTime,
) -> StrikewiseResult<AnalysisResponse> {
    config.validate()?;
    request.validate_budgets()?;

    if snapshot.expiry != request.expiry_date {
        return Err(StrikewiseError::invalid_input(format!(
            "snapshot expiry {} does not match requested expiry {}",
            snapshot.expiry, request.expiry_date
        )));
    }

    let quotes = snapshot.strike_table(request.option_type);
    let scenario = request.scenario(snapshot.spot, config, now)?;

    info!(
        instrument = %request.instrument_key,
        expiry = %request.expiry_date,
        option_type = %request.option_type,
        strikes = quotes.len(),
        spot = snapshot.spot,
        target_spot = scenario.target_spot,
        stop_spot = scenario.stop_spot,
        time_to_expiry = scenario.time_to_expiry,
        "running option analysis"
    );

    let response = analyze_table(
        &quotes,
        &scenario,
        &config.projection,
        request.capital,
        request.risk_tolerance,
    )?;

    info!(
        projections = response.projections.len(),
        actionable = response.actionable_projections().count(),
        selected = response.selected_contracts.len(),
        "analysis complete"
    );
    Ok(response)
}
