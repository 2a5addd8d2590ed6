//! Orchestrator that actually wipes progress, for simulated runs.

use crate::core::constants::STARTING_ANTIMATTER;
use crate::core::currency::CurrencyId;
use crate::core::game_state::GameState;
use crate::core::magnitude::Magnitude;
use crate::core::reset::{ResetKind, ResetOptions, ResetOrchestrator};
use std::collections::BTreeMap;
use tracing::debug;

/// Performs the resets the engine requests and counts them by kind.
#[derive(Debug, Clone, Default)]
pub struct SimResetHandler {
    pub counts: BTreeMap<&'static str, u64>,
}

impl SimResetHandler {
    pub fn count(&self, label: &str) -> u64 {
        self.counts.get(label).copied().unwrap_or(0)
    }
}

pub(crate) fn label(kind: ResetKind) -> &'static str {
    match kind {
        ResetKind::Challenge(_) => "challenge",
        ResetKind::ExitChallenges => "exit_challenges",
        ResetKind::DimensionBoost => "dimension_boost",
        ResetKind::Armageddon => "armageddon",
        ResetKind::Doom => "doom",
    }
}

/// Back to starting antimatter with no dimensions. Boosts survive.
pub(crate) fn reset_dimensions(state: &mut GameState) {
    state.dimensions.clear_amounts();
    state
        .wallet
        .set(CurrencyId::Antimatter, Magnitude::from_f64(STARTING_ANTIMATTER));
}

/// Dimensions, boosts and the run clock.
pub(crate) fn reset_infinity(state: &mut GameState) {
    reset_dimensions(state);
    state.dimensions.boosts = 0;
    state.records.this_infinity_ms = 0.0;
}

impl ResetOrchestrator for SimResetHandler {
    fn perform_reset(&mut self, state: &mut GameState, kind: ResetKind, options: ResetOptions) {
        *self.counts.entry(label(kind)).or_default() += 1;
        debug!(kind = label(kind), forced = options.force, "Sim reset");
        match kind {
            ResetKind::DimensionBoost => reset_dimensions(state),
            ResetKind::Challenge(_) | ResetKind::ExitChallenges => reset_infinity(state),
            ResetKind::Armageddon | ResetKind::Doom => {
                reset_infinity(state);
                state.wallet.set(CurrencyId::InfinityPoints, Magnitude::ZERO);
            }
        }
    }
}
