//! Core engine: numeric type, currencies, state, reset seam, tick and façade.

pub mod constants;
pub mod currency;
pub mod engine;
pub mod error;
pub mod game_loop;
pub mod game_state;
pub mod magnitude;
pub mod reset;
pub mod tick;

pub use currency::{Currency, CurrencyId, Wallet};
pub use engine::Engine;
pub use error::{EngineError, Result};
pub use game_loop::GameLoop;
pub use game_state::{DimensionState, GameState, Records};
pub use magnitude::Magnitude;
pub use reset::{NoopOrchestrator, RecordingOrchestrator, ResetKind, ResetOptions, ResetOrchestrator};
pub use tick::{game_tick, TickEvent, TickResult};
