//! Option Analysis
//!
//! The request-level entry point. Turns a trader's expectation (a move in
//! spot, a holding horizon, a capital and a risk budget) into a projection
//! scenario, projects every strike of the chain snapshot, and selects
//! contracts.
//!
//! Only whole-request problems are errors here: no strikes, a scenario with a
//! non-positive spot, an exit moment past expiry, or a negative budget.

mod config;
mod request;

pub use config::*;
pub use request::*;

use serde::{Deserialize, Serialize};

use crate::projection::{Projection, Scenario};
use crate::selection::SelectedContract;

/// Everything one analysis produced
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AnalysisResponse {
    /// Scenario the strikes were projected under
    pub scenario: Scenario,
    /// One row per strike, in strike-table order
    pub projections: Vec<Projection>,
    /// Funded contracts, most capital-efficient first
    pub selected_contracts: Vec<SelectedContract>,
}

impl AnalysisResponse {
    /// Rows with both scenarios priced (P&L percentages, Greeks and IV present)
    pub fn actionable_projections(&self) -> impl Iterator<Item = &Projection> {
        self.projections.iter().filter(|p| p.is_fully_priced())
    }

    /// Capital committed across the selection
    pub fn total_cost(&self) -> f64 {
        self.selected_contracts.iter().map(|c| c.total_cost).sum()
    }

    /// Loss if every selected contract is stopped out
    pub fn total_risk(&self) -> f64 {
        self.selected_contracts.iter().map(|c| c.total_risk).sum()
    }

    /// Gain if every selected contract reaches target
    pub fn total_reward(&self) -> f64 {
        self.selected_contracts.iter().map(|c| c.total_reward).sum()
    }
}
