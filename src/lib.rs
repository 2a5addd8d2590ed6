//! Antimatter Core - progression and economy engine for an incremental game.
//!
//! Big-number currencies, cost scaling, upgrade purchases, item-driven
//! modifier effects, nested challenges, the dimension-boost solver and the
//! celestial doom loop. Presentation, formatting and persistence are left to
//! the host; state advances only through [`core::GameLoop::tick`].

pub mod build_info;
pub mod celestial;
pub mod challenges;
pub mod core;
pub mod cost;
pub mod dimboost;
pub mod effects;
pub mod simulator;
pub mod upgrades;

pub use crate::core::{Engine, EngineError, GameLoop, GameState, Magnitude, Result};
