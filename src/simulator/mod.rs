//! Economy simulator for Monte Carlo analysis.
//!
//! Runs many seeded playthroughs against the real [`Engine`](crate::core::Engine)
//! to analyze:
//! - Time to first infinity and boost pacing
//! - Challenge completion rates
//! - Doom cycles, cataclysm counts and timed-currency income
//!
//! Dimension production lives outside the engine, so the runner drives a
//! small stand-in model (see `production`) between ticks.

mod config;
mod production;
mod report;
mod reset_handler;
mod runner;

pub use config::SimConfig;
pub use report::{RunStats, SimReport};
pub use reset_handler::SimResetHandler;
pub use runner::run_simulation;
