//! Single-step engine tick.
//!
//! Runs the per-frame stages in a fixed order and reports what happened as
//! a list of [`TickEvent`]s. All IO and presentation stay with the caller.

use super::error::{EngineError, Result};
use super::game_state::GameState;
use super::magnitude::Magnitude;
use super::reset::ResetOrchestrator;
use crate::celestial::{self, CelestialInputs, CelestialRates, TimedCurrency};
use crate::challenges::{self, ChallengeId};
use serde::{Deserialize, Serialize};

/// Something the tick did that the caller may want to react to.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum TickEvent {
    // ── Challenges ──────────────────────────────────────────────
    /// Antimatter crossed an infinity challenge's unlock threshold.
    InfinityChallengeUnlocked { id: ChallengeId },

    // ── Doom ────────────────────────────────────────────────────
    /// The armageddon interval elapsed and the cycle was reset.
    Cataclysm { remnants: Magnitude },

    /// A timed currency bar filled.
    TimedCurrencyGranted {
        currency: TimedCurrency,
        amount: Magnitude,
    },

    /// Dimension cost scaling depends on chaos and must be recomputed.
    CostScaleRefresh,
}

/// Result of processing a single tick.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TickResult {
    /// Events produced during this tick, in chronological order.
    pub events: Vec<TickEvent>,
}

impl TickResult {
    pub fn had_cataclysm(&self) -> bool {
        self.events
            .iter()
            .any(|event| matches!(event, TickEvent::Cataclysm { .. }))
    }

    /// Total granted to `currency` this tick.
    pub fn granted(&self, currency: TimedCurrency) -> Magnitude {
        self.events
            .iter()
            .filter_map(|event| match event {
                TickEvent::TimedCurrencyGranted {
                    currency: granted,
                    amount,
                } if *granted == currency => Some(*amount),
                _ => None,
            })
            .fold(Magnitude::ZERO, |total, amount| total + amount)
    }

    pub fn unlocked_challenges(&self) -> Vec<ChallengeId> {
        self.events
            .iter()
            .filter_map(|event| match event {
                TickEvent::InfinityChallengeUnlocked { id } => Some(*id),
                _ => None,
            })
            .collect()
    }
}

/// Advances the engine by `delta_ms` of real time.
///
/// Stages, in order: infinity challenge unlock scan, doom timers and
/// cataclysm, run clock. A rejected delta leaves state untouched.
pub fn game_tick(
    state: &mut GameState,
    delta_ms: f64,
    inputs: &CelestialInputs,
    orchestrator: &mut dyn ResetOrchestrator,
) -> Result<TickResult> {
    if !delta_ms.is_finite() || delta_ms < 0.0 {
        return Err(EngineError::invalid_input(format!(
            "tick delta must be a finite non-negative number of milliseconds, got {delta_ms}"
        )));
    }
    let mut result = TickResult::default();

    // ── 1. Challenge unlocks ─────────────────────────────────────
    for id in challenges::try_unlock_infinity_challenges(state) {
        result
            .events
            .push(TickEvent::InfinityChallengeUnlocked { id });
    }

    // ── 2. Doom ──────────────────────────────────────────────────
    let rates = CelestialRates::from_inputs(state, inputs);
    let doom = celestial::tick(state, delta_ms, &rates, orchestrator)?;
    if let Some(remnants) = doom.cataclysm {
        result.events.push(TickEvent::Cataclysm { remnants });
    }
    for (currency, amount) in doom.grants {
        result
            .events
            .push(TickEvent::TimedCurrencyGranted { currency, amount });
    }
    if doom.cost_scale_refresh {
        result.events.push(TickEvent::CostScaleRefresh);
    }

    // ── 3. Run clock ─────────────────────────────────────────────
    state.records.this_infinity_ms += delta_ms;

    Ok(result)
}
