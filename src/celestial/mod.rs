//! Celestial doom mode: the armageddon cycle, timed sub-currencies and the
//! mechanics doom switches off.

pub mod logic;
pub mod types;

pub use logic::{
    cataclysm, chaos_dimension_discount, chaos_gain_multiplier, enter_doom, famine_exponent,
    famine_multiplier, is_disabled, is_disabled_by_name, pestilence_interval_multiplier,
    remnants_gain, tick, CelestialTickResult,
};
pub use types::{
    CelestialInputs, CelestialRates, DoomState, Mechanic, TimedCurrency, TimerState,
};
