//! Requirement solver and the boost actions built on it.

use super::types::{DimBoostModes, DimBoostRequirement};
use crate::core::constants::{
    DIMBOOST_BASE_AMOUNT, DIMBOOST_BASE_POWER, DIMBOOST_EIGHT_TIER_STEP, DIMBOOST_SIX_TIER_STEP,
    MAX_BULK_BOOSTS, STARTING_ANTIMATTER,
};
use crate::core::currency::CurrencyId;
use crate::core::game_state::{DimensionState, GameState};
use crate::core::magnitude::Magnitude;
use crate::core::reset::{ResetKind, ResetOptions, ResetOrchestrator};
use crate::cost::max_affordable_binary_search;
use tracing::info;

/// Read-only view for solving boost requirements.
#[derive(Debug, Clone, Copy)]
pub struct DimBoost<'a> {
    dims: &'a DimensionState,
    modes: DimBoostModes,
}

impl<'a> DimBoost<'a> {
    pub fn new(dims: &'a DimensionState, modes: DimBoostModes) -> Self {
        Self { dims, modes }
    }

    pub fn from_state(state: &'a GameState) -> Self {
        Self::new(&state.dimensions, DimBoostModes::from_state(state))
    }

    pub fn modes(&self) -> &DimBoostModes {
        &self.modes
    }

    pub fn purchased(&self) -> u64 {
        self.dims.boosts
    }

    pub fn can_unlock_new_dimension(&self) -> bool {
        self.purchased().saturating_add(4) < u64::from(self.modes.max_tiers)
    }

    pub fn requirement(&self) -> DimBoostRequirement {
        self.bulk_requirement(1)
    }

    /// Requirement for reaching `purchased + bulk` boosts.
    pub fn bulk_requirement(&self, bulk: u64) -> DimBoostRequirement {
        let modes = &self.modes;
        let target_count = self.purchased().saturating_add(bulk);
        let tier = target_count
            .saturating_add(3)
            .min(u64::from(modes.max_tiers)) as u8;
        let target = target_count as f64;

        let mut amount = DIMBOOST_BASE_AMOUNT;
        if tier == 6 && modes.max_tiers == 6 {
            amount += ((target - 3.0) * (DIMBOOST_SIX_TIER_STEP - modes.discount)).ceil();
        } else if tier == 8 {
            amount += ((target - 5.0) * (DIMBOOST_EIGHT_TIER_STEP - modes.discount)).ceil();
        }
        if modes.cubic_surcharge {
            amount += (target - 1.0).powi(3) + target - 1.0;
        }
        amount -= modes.flat_reduction;
        if modes.flat_bonus_completed {
            amount -= 1.0;
        }
        amount *= modes.charged_multiplier;

        DimBoostRequirement {
            tier,
            amount: amount.ceil(),
        }
    }

    fn satisfied(&self, bulk: u64) -> bool {
        self.bulk_requirement(bulk).is_satisfied(self.dims)
    }

    /// How many boosts the current dimensions pay for at once.
    pub fn max_purchasable(&self) -> u64 {
        // New tiers unlock one at a time
        if self.can_unlock_new_dimension() && self.satisfied(1) {
            return 1;
        }
        let first = self.bulk_requirement(1);
        if !first.is_satisfied(self.dims) {
            return 0;
        }
        let second = self.bulk_requirement(2);
        if !second.is_satisfied(self.dims) {
            return 1;
        }

        // Extrapolate from the 1-vs-2 step, then verify against the real
        // piecewise requirement.
        let increase = second.amount - first.amount;
        let owned = self.dims.amount(first.tier).to_f64();
        let guess = if increase > 0.0 {
            let estimate = 1.0 + ((owned - first.amount) / increase).floor();
            if estimate >= MAX_BULK_BOOSTS as f64 {
                MAX_BULK_BOOSTS
            } else {
                (estimate as u64).max(2)
            }
        } else {
            MAX_BULK_BOOSTS
        };
        if self.satisfied(guess) {
            return guess;
        }
        max_affordable_binary_search(|bulk| self.satisfied(bulk), 2, guess)
    }

    pub fn can_be_bought(&self) -> bool {
        if self.modes.infinity_locked {
            return false;
        }
        !self
            .modes
            .boost_cap
            .is_some_and(|cap| self.purchased() >= cap)
    }

    /// Per-boost dimension multiplier. Boost-limited runs get none.
    pub fn power(&self) -> Magnitude {
        if self.modes.boost_cap.is_some() {
            return Magnitude::ONE;
        }
        Magnitude::from_f64(DIMBOOST_BASE_POWER * self.modes.power_multiplier)
    }

    /// Boost multiplier on a 1-based tier; never below 1.
    pub fn multiplier_to_tier(&self, tier: u8) -> Magnitude {
        let exponent = self.purchased() as f64 + 1.0 - f64::from(tier);
        self.power().pow(exponent).clamp_min(Magnitude::ONE)
    }
}

/// Buys every affordable boost and resets through the orchestrator.
/// Returns the boosts bought.
pub fn perform_boost(state: &mut GameState, orchestrator: &mut dyn ResetOrchestrator) -> u64 {
    perform_boost_with(state, DimBoostModes::from_state(state), orchestrator)
}

pub fn perform_boost_with(
    state: &mut GameState,
    modes: DimBoostModes,
    orchestrator: &mut dyn ResetOrchestrator,
) -> u64 {
    let boost = DimBoost::new(&state.dimensions, modes);
    if !boost.can_be_bought() {
        return 0;
    }
    let bought = boost.max_purchasable();
    if bought == 0 {
        return 0;
    }
    state.dimensions.boosts = state.dimensions.boosts.saturating_add(bought);
    orchestrator.perform_reset(state, ResetKind::DimensionBoost, ResetOptions::default());
    info!(bought, boosts = state.dimensions.boosts, "Dimension boost");
    bought
}

/// Takes one boost away and forces a boost reset back to starting antimatter.
pub fn lose_boost(state: &mut GameState, orchestrator: &mut dyn ResetOrchestrator) {
    state.dimensions.boosts = state.dimensions.boosts.saturating_sub(1);
    orchestrator.perform_reset(state, ResetKind::DimensionBoost, ResetOptions::forced());
    state
        .wallet
        .set(CurrencyId::Antimatter, Magnitude::from_f64(STARTING_ANTIMATTER));
    info!(boosts = state.dimensions.boosts, "Dimension boost lost");
}
