//! Stand-in dimension production for simulated runs.
//!
//! Tier n produces tier n-1 and the first tier produces antimatter, each
//! scaled by the boost multiplier. Every tick half of the antimatter left is
//! spent on each unlocked tier, highest first.

use crate::core::constants::{MAX_DIMENSION_TIERS, MS_PER_SECOND};
use crate::core::currency::CurrencyId;
use crate::core::engine::Engine;
use crate::core::error::Result;
use crate::core::game_loop::GameLoop;
use crate::core::magnitude::Magnitude;
use crate::core::reset::ResetOrchestrator;

/// Tiers open before any boost.
const BASE_UNLOCKED_TIERS: u64 = 4;
/// Price of one unit of tier n is 10^(n * this).
const TIER_COST_DECADES: f64 = 1.5;

pub(crate) fn unlocked_tiers<O: ResetOrchestrator>(engine: &mut Engine<O>) -> Result<u8> {
    let max_tiers = engine.boost_modes()?.max_tiers;
    let open = BASE_UNLOCKED_TIERS.saturating_add(engine.state().dimensions.boosts);
    Ok(open.min(u64::from(max_tiers.min(MAX_DIMENSION_TIERS))) as u8)
}

/// Advances production by `delta_ms` and buys dimensions. Returns the
/// antimatter produced per second.
pub(crate) fn produce<O: ResetOrchestrator>(
    engine: &mut Engine<O>,
    delta_ms: f64,
) -> Result<Magnitude> {
    let tiers = unlocked_tiers(engine)?;
    let delta = Magnitude::from_f64(delta_ms / MS_PER_SECOND);
    let mut multipliers = Vec::with_capacity(tiers as usize);
    for tier in 1..=tiers {
        multipliers.push(engine.boost_multiplier(tier)?);
    }

    let state = engine.state_mut();
    let mut per_second = Magnitude::ZERO;
    for (tier, multiplier) in (1..=tiers).zip(multipliers) {
        let produced = state.dimensions.amount(tier) * multiplier;
        if tier == 1 {
            per_second = produced;
            state.wallet.gain(CurrencyId::Antimatter, produced * delta);
        } else {
            let below = state.dimensions.amount(tier - 1);
            state.dimensions.set_amount(tier - 1, below + produced * delta);
        }
    }

    let half = Magnitude::from_f64(0.5);
    for tier in (1..=tiers).rev() {
        let price = Magnitude::pow10(TIER_COST_DECADES * f64::from(tier));
        let budget = state.antimatter() * half;
        if budget < price {
            continue;
        }
        let bought = (budget / price).floor();
        if state.wallet.spend(CurrencyId::Antimatter, bought * price) {
            let owned = state.dimensions.amount(tier);
            state.dimensions.set_amount(tier, owned + bought);
        }
    }
    Ok(per_second)
}
