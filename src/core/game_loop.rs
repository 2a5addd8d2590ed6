//! Shared game loop trait for the engine and the simulator.

use super::error::Result;
use super::game_state::GameState;
use super::tick::TickResult;
use crate::celestial::CelestialInputs;

/// Core game loop trait - implemented by the engine façade.
///
/// Lets the simulator drive any engine configuration (real orchestrator,
/// recording orchestrator, custom registry) through one interface.
pub trait GameLoop {
    /// Advances by `delta_ms` of real time.
    fn tick(&mut self, delta_ms: f64, inputs: &CelestialInputs) -> Result<TickResult>;

    fn state(&self) -> &GameState;

    fn state_mut(&mut self) -> &mut GameState;
}
