//! Data loading and export
//!
//! Handles:
//! - Normalized option chain snapshots (JSON)
//! - CSV export of projection and selection tables

pub mod snapshot;
pub mod export;

pub use snapshot::*;
pub use export::*;
