//! Contract Selection
//!
//! Allocates whole lots across projected strikes under two budgets at once:
//! capital (premium paid) and risk (aggregate stop-loss amount).
//!
//! The allocation is a single greedy pass:
//! 1. **Rank**: profit-per-lot ÷ capital-per-lot, descending; ties keep input order
//! 2. **Fill**: each candidate takes as many lots as both remaining budgets allow
//! 3. **Stop**: once capital cannot buy a lot of anything left, or risk is spent
//!
//! Greedy filling is budget-feasible by construction but is not a global
//! optimum: an early, efficient strike can consume budget that a combination
//! of later strikes would have used better. Nothing is backtracked.

use std::ops::ControlFlow;

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::core::round2;
use crate::projection::Projection;

/// A strike funded by the allocation
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SelectedContract {
    pub strike: f64,
    /// Whole lots bought, always at least one
    pub lots: u32,
    pub entry_price: f64,
    pub target_price: f64,
    pub stop_price: f64,
    pub total_reward: f64,
    pub total_risk: f64,
    pub total_cost: f64,
}

/// A projection row that qualifies for allocation
#[derive(Debug, Clone, PartialEq)]
pub struct Candidate {
    pub strike: f64,
    pub entry_price: f64,
    pub target_price: f64,
    pub stop_price: f64,
    pub cost_per_lot: f64,
    pub reward_per_lot: f64,
    pub risk_per_lot: f64,
}

impl Candidate {
    /// Rows with every allocation input defined and strictly positive
    pub fn from_projection(row: &Projection) -> Option<Self> {
        let positive = |v: Option<f64>| v.filter(|x| x.is_finite() && *x > 0.0);

        Some(Self {
            strike: row.strike,
            entry_price: row.ltp?,
            target_price: row.target_premium?,
            stop_price: row.stop_premium?,
            cost_per_lot: positive(row.capital_per_lot)?,
            reward_per_lot: positive(row.profit_per_lot)?,
            risk_per_lot: positive(row.loss_per_lot)?,
        })
    }

    /// Ranking key: reward earned per unit of capital
    pub fn efficiency(&self) -> f64 {
        self.reward_per_lot / self.cost_per_lot
    }

    /// Whole lots affordable under both budgets
    fn affordable_lots(&self, remaining_capital: f64, remaining_risk: f64) -> f64 {
        (remaining_capital / self.cost_per_lot)
            .min(remaining_risk / self.risk_per_lot)
            .floor()
    }
}

/// Running state of the greedy fold
#[derive(Debug, Clone, PartialEq)]
pub struct Allocation {
    pub remaining_capital: f64,
    pub remaining_risk: f64,
    pub selected: Vec<SelectedContract>,
}

impl Allocation {
    pub fn new(capital: f64, risk_tolerance: f64) -> Self {
        Self {
            remaining_capital: capital,
            remaining_risk: risk_tolerance,
            selected: Vec::new(),
        }
    }

    /// Fund as many lots of `candidate` as the budgets allow
    fn take(mut self, candidate: &Candidate) -> Self {
        let lots = candidate
            .affordable_lots(self.remaining_capital, self.remaining_risk)
            .min(f64::from(u32::MAX));
        if !(lots >= 1.0) {
            return self;
        }

        let total_cost = lots * candidate.cost_per_lot;
        let total_risk = lots * candidate.risk_per_lot;
        let total_reward = lots * candidate.reward_per_lot;

        self.selected.push(SelectedContract {
            strike: round2(candidate.strike),
            lots: lots as u32,
            entry_price: round2(candidate.entry_price),
            target_price: round2(candidate.target_price),
            stop_price: round2(candidate.stop_price),
            total_reward: round2(total_reward),
            total_risk: round2(total_risk),
            total_cost: round2(total_cost),
        });
        self.remaining_capital -= total_cost;
        self.remaining_risk -= total_risk;
        self
    }

    /// Nothing further can be funded
    fn exhausted(&self, cheapest_remaining: f64) -> bool {
        self.remaining_capital < cheapest_remaining || self.remaining_risk <= 0.0
    }
}

/// Qualifying candidates ranked by descending efficiency (stable)
pub fn rank_candidates(projections: &[Projection]) -> Vec<Candidate> {
    let mut candidates: Vec<Candidate> = projections
        .iter()
        .filter_map(Candidate::from_projection)
        .collect();
    candidates.sort_by(|a, b| b.efficiency().total_cmp(&a.efficiency()));
    candidates
}

/// Greedy lot allocation under capital and risk budgets
///
/// Result order is processing order (descending efficiency), not strike order.
/// Returns an empty vector when no row qualifies or the budgets buy nothing.
pub fn select_contracts(
    projections: &[Projection],
    capital: f64,
    risk_tolerance: f64,
) -> Vec<SelectedContract> {
    let candidates = rank_candidates(projections);
    if candidates.is_empty() {
        debug!("no projection qualifies for allocation");
        return Vec::new();
    }

    // cheapest_after[i] = min cost among candidates[i + 1..]
    let mut cheapest_after = vec![f64::INFINITY; candidates.len()];
    for i in (0..candidates.len().saturating_sub(1)).rev() {
        cheapest_after[i] = cheapest_after[i + 1].min(candidates[i + 1].cost_per_lot);
    }

    let folded = candidates.iter().zip(&cheapest_after).try_fold(
        Allocation::new(capital, risk_tolerance),
        |allocation, (candidate, &cheapest_remaining)| {
            let allocation = allocation.take(candidate);
            if allocation.exhausted(cheapest_remaining) {
                ControlFlow::Break(allocation)
            } else {
                ControlFlow::Continue(allocation)
            }
        },
    );
    let allocation = match folded {
        ControlFlow::Continue(a) | ControlFlow::Break(a) => a,
    };

    debug!(
        candidates = candidates.len(),
        selected = allocation.selected.len(),
        remaining_capital = allocation.remaining_capital,
        remaining_risk = allocation.remaining_risk,
        "allocation complete"
    );

    allocation.selected
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::StrikeQuote;
    use proptest::prelude::*;

    fn row(strike: f64, capital: f64, profit: f64, loss: f64) -> Projection {
        let lot = 75.0;
        let ltp = capital / lot;
        let mut p = Projection::unpriced(&StrikeQuote::new(strike), 75);
        p.ltp = Some(ltp);
        p.target_premium = Some(ltp + profit / lot);
        p.stop_premium = Some(ltp - loss / lot);
        p.capital_per_lot = Some(capital);
        p.profit_per_lot = Some(profit);
        p.loss_per_lot = Some(loss);
        p
    }

    #[test]
    fn test_worked_example_single_contract() {
        let rows = vec![
            row(22000.0, 7500.0, 3000.0, 1500.0),
            row(22100.0, 6000.0, 1800.0, 1200.0),
        ];

        let selected = select_contracts(&rows, 100_000.0, 20_000.0);

        assert_eq!(selected.len(), 1);
        let c = &selected[0];
        assert_eq!(c.strike, 22000.0);
        assert_eq!(c.lots, 13);
        assert_eq!(c.total_cost, 97_500.0);
        assert_eq!(c.total_risk, 19_500.0);
        assert_eq!(c.total_reward, 39_000.0);
        assert_eq!(c.entry_price, 100.0);
        assert_eq!(c.target_price, 140.0);
        assert_eq!(c.stop_price, 80.0);
    }

    #[test]
    fn test_processing_order_is_efficiency_order() {
        let rows = vec![
            row(21900.0, 3000.0, 300.0, 500.0),  // 0.10
            row(22000.0, 3000.0, 1200.0, 500.0), // 0.40
            row(22100.0, 3000.0, 600.0, 500.0),  // 0.20
        ];

        let selected = select_contracts(&rows, 10_000.0, 1_000_000.0);
        let strikes: Vec<f64> = selected.iter().map(|c| c.strike).collect();

        // 3 lots of 22000 leave 1000, below every remaining cost
        assert_eq!(strikes, vec![22000.0]);

        let selected = select_contracts(&rows, 30_000.0, 3_000.0);
        let strikes: Vec<f64> = selected.iter().map(|c| c.strike).collect();
        // risk binds first: 6 lots of 22000 spend all 3000 of risk
        assert_eq!(strikes, vec![22000.0]);
        assert_eq!(selected[0].lots, 6);
    }

    #[test]
    fn test_fills_multiple_strikes() {
        let rows = vec![
            row(22000.0, 5000.0, 2000.0, 1000.0), // 0.40
            row(22100.0, 2000.0, 600.0, 400.0),   // 0.30
        ];

        let selected = select_contracts(&rows, 14_000.0, 100_000.0);

        assert_eq!(selected.len(), 2);
        assert_eq!((selected[0].strike, selected[0].lots), (22000.0, 2));
        assert_eq!((selected[1].strike, selected[1].lots), (22100.0, 2));
    }

    #[test]
    fn test_skips_unaffordable_then_continues() {
        let rows = vec![
            row(22000.0, 9000.0, 4500.0, 1000.0), // 0.50, too expensive
            row(22100.0, 2000.0, 600.0, 400.0),   // 0.30
        ];

        let selected = select_contracts(&rows, 5_000.0, 100_000.0);

        assert_eq!(selected.len(), 1);
        assert_eq!(selected[0].strike, 22100.0);
        assert_eq!(selected[0].lots, 2);
    }

    #[test]
    fn test_ties_keep_input_order() {
        let rows = vec![
            row(22200.0, 4000.0, 1000.0, 500.0),
            row(22000.0, 2000.0, 500.0, 250.0),
            row(22100.0, 4000.0, 1000.0, 500.0),
        ];

        let ranked = rank_candidates(&rows);
        let strikes: Vec<f64> = ranked.iter().map(|c| c.strike).collect();
        assert_eq!(strikes, vec![22200.0, 22000.0, 22100.0]);
    }

    #[test]
    fn test_lot_count_capped_not_skipped() {
        // 1e10 / 1.5 lots is past u32::MAX; the strike is still funded
        let rows = vec![row(22000.0, 1.5, 3.0, 1.0)];

        let selected = select_contracts(&rows, 1e10, 1e10);

        assert_eq!(selected.len(), 1);
        assert_eq!(selected[0].lots, u32::MAX);
        assert!(selected[0].total_cost <= 1e10);
        assert!(selected[0].total_risk <= 1e10);
    }

    #[test]
    fn test_no_candidates_yields_empty() {
        assert!(select_contracts(&[], 100_000.0, 20_000.0).is_empty());

        let mut unpriced = Projection::unpriced(&StrikeQuote::new(22000.0), 75);
        unpriced.capital_per_lot = Some(7500.0);
        let rows = vec![
            unpriced,
            row(22100.0, 6000.0, -300.0, 1200.0),
            row(22200.0, 6000.0, 1800.0, 0.0),
            row(22300.0, 0.0, 1800.0, 1200.0),
        ];
        assert!(select_contracts(&rows, 100_000.0, 20_000.0).is_empty());
    }

    #[test]
    fn test_zero_budgets_yield_empty() {
        let rows = vec![row(22000.0, 7500.0, 3000.0, 1500.0)];
        assert!(select_contracts(&rows, 0.0, 20_000.0).is_empty());
        assert!(select_contracts(&rows, 100_000.0, 0.0).is_empty());
        assert!(select_contracts(&rows, 7_499.0, 20_000.0).is_empty());
    }

    fn arb_row() -> impl Strategy<Value = Projection> {
        (
            20000.0..24000.0f64,
            1.0..20_000.0f64,
            -2_000.0..10_000.0f64,
            -500.0..5_000.0f64,
        )
            .prop_map(|(strike, capital, profit, loss)| {
                row(strike.round(), round2(capital), round2(profit), round2(loss))
            })
    }

    proptest! {
        #[test]
        fn prop_budgets_never_exceeded(
            rows in proptest::collection::vec(arb_row(), 0..25),
            capital in 0.0..500_000.0f64,
            risk in 0.0..100_000.0f64,
        ) {
            let selected = select_contracts(&rows, capital, risk);

            let cost: f64 = selected.iter().map(|c| c.total_cost).sum();
            let total_risk: f64 = selected.iter().map(|c| c.total_risk).sum();
            prop_assert!(cost <= capital + 1e-6);
            prop_assert!(total_risk <= risk + 1e-6);
            prop_assert!(selected.iter().all(|c| c.lots > 0));
            prop_assert!(selected.len() <= rows.len());
        }

        #[test]
        fn prop_selection_follows_efficiency(
            rows in proptest::collection::vec(arb_row(), 0..25),
            capital in 0.0..500_000.0f64,
            risk in 0.0..100_000.0f64,
        ) {
            let selected = select_contracts(&rows, capital, risk);
            let efficiencies: Vec<f64> = selected
                .iter()
                .map(|c| c.total_reward / c.total_cost)
                .collect();
            prop_assert!(efficiencies.windows(2).all(|w| w[0] >= w[1] - 1e-6));
        }
    }
}
