//! # Strikewise - Strike Projection and Contract Selection
//!
//! Scenario analysis for a single underlying's options across every strike of
//! one expiry: what each strike is worth if spot reaches a target, what it is
//! worth if spot hits a stop-loss, and which contracts to buy with a given
//! capital and risk budget.
//!
//! ## Key Components
//!
//! - **Black-Scholes**: Price, delta and gamma for one scenario
//! - **IV Solver**: Newton-Raphson backsolve when the exchange IV is unusable
//! - **Projection**: Target/stop repricing and per-lot P&L for every strike
//! - **Selection**: Greedy lot allocation under capital and risk budgets
//! - **Analysis**: Request handling on top of a normalized chain snapshot
//!
//! ## Usage
//!
//! ```rust,no_run
//! use strikewise::prelude::*;
//!
//! let snapshot = ChainSnapshot::from_json_file("data/sample_chain.json").unwrap();
//! let request: AnalysisRequest =
//!     serde_json::from_str(&std::fs::read_to_string("data/sample_request.json").unwrap()).unwrap();
//!
//! let now = chrono::Local::now().naive_local();
//! let response = analyze(&request, &snapshot, &AnalysisConfig::default(), now).unwrap();
//!
//! for c in &response.selected_contracts {
//!     println!("{} x{} cost {:.2}", c.strike, c.lots, c.total_cost);
//! }
//! ```
//!
//! ## What This Does NOT Do
//!
//! - Model American exercise or dividends
//! - Account for bid-ask spread or slippage
//! - Build multi-leg strategies
//! - Find the optimal allocation (selection is a greedy heuristic)

pub mod analysis;
pub mod core;
pub mod data;
pub mod models;
pub mod projection;
pub mod selection;

/// Prelude with commonly used types
pub mod prelude {
    // Core types
    pub use crate::core::{
        round_to, BsmQuote, OptionType, StrikeQuote, StrikewiseError, StrikewiseResult,
    };

    // Pricing
    pub use crate::models::{
        implied_volatility, norm_cdf, norm_pdf, price as bs_price, price_and_greeks,
        solve_implied_vol, IvFailure, IvSolverConfig,
    };

    // Projection and selection
    pub use crate::projection::{
        project_strike, project_strikes, Projection, ProjectionConfig, Scenario,
    };
    pub use crate::selection::{rank_candidates, select_contracts, Candidate, SelectedContract};

    // Analysis
    pub use crate::analysis::{
        analyze, analyze_table, time_to_expiry, AnalysisConfig, AnalysisRequest,
        AnalysisResponse,
    };

    // Data
    pub use crate::data::{
        write_projections_csv, write_projections_csv_file, write_selection_csv, ChainRow,
        ChainSnapshot,
    };
}

// Re-export main types at crate root
pub use crate::core::{StrikewiseError, StrikewiseResult};
pub use crate::analysis::{analyze, AnalysisConfig, AnalysisRequest, AnalysisResponse};
