//! Dimension-boost requirement solver.

pub mod logic;
pub mod types;

pub use logic::{lose_boost, perform_boost, perform_boost_with, DimBoost};
pub use types::{DimBoostModes, DimBoostRequirement};
