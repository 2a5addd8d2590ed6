//! Doom tick loop: armageddon timing, cataclysms and timed-currency grants.

use super::types::{CelestialInputs, CelestialRates, Mechanic, TimedCurrency};
use crate::core::constants::{
    ARMAGEDDON_BASE_INTERVAL_MS, FAMINE_MULTIPLIER_BASE, FAMINE_SOFTCAP, MS_PER_SECOND,
    SPEED_UPGRADE_FACTOR, TIMED_CURRENCY_BAR,
};
use crate::core::currency::CurrencyId;
use crate::core::error::{EngineError, Result};
use crate::core::game_state::GameState;
use crate::core::magnitude::Magnitude;
use crate::core::reset::{ResetKind, ResetOptions, ResetOrchestrator};
use crate::upgrades::data::TIMED_GAIN;
use tracing::{debug, info};

impl CelestialRates {
    pub fn from_inputs(state: &GameState, inputs: &CelestialInputs) -> Self {
        let speed = |currency: TimedCurrency| {
            SPEED_UPGRADE_FACTOR.powf(state.celestial.timer(currency).speed_upgrades as f64)
        };

        let boosts = state.dimensions.boosts as f64;
        let famine_fill = TimedCurrency::Famine.base_fill_seconds()
            / ((boosts + 2.0).log10() + 1.0).log10()
            / speed(TimedCurrency::Famine);

        let replicanti_decades = inputs.replicanti.log10().max(0.0);
        let pestilence_fill = TimedCurrency::Pestilence.base_fill_seconds()
            / ((replicanti_decades + 1.0).log10() + 1.0)
            / speed(TimedCurrency::Pestilence);

        let shard_decades = (inputs.time_shards + Magnitude::ONE).log10();
        let chaos_fill = TimedCurrency::Chaos.base_fill_seconds()
            / (shard_decades.powf(0.3) / 3.0)
            / speed(TimedCurrency::Chaos);

        let boost = state.upgrades.owned(TIMED_GAIN).saturating_add(1) as f64;
        let pestilence_gain = if state.celestial.timer(TimedCurrency::Chaos).unlocked {
            chaos_gain_multiplier(state)
        } else {
            1.0
        };

        let production_decades = (inputs.antimatter_per_second + Magnitude::ONE).log10();
        let speed_modifier = (production_decades + 1.0).log10().powi(2).max(1.0);

        Self {
            speed_modifier,
            armageddon_interval_ms: ARMAGEDDON_BASE_INTERVAL_MS * pestilence_interval_multiplier(state),
            fill_time_s: [famine_fill, pestilence_fill, chaos_fill],
            gain: [boost, pestilence_gain * boost, boost],
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct CelestialTickResult {
    /// Remnants granted by a cataclysm this tick, if one fired.
    pub cataclysm: Option<Magnitude>,
    pub grants: Vec<(TimedCurrency, Magnitude)>,
    /// A chaos grant changes dimension cost scaling.
    pub cost_scale_refresh: bool,
}

/// Advances doom by `delta_ms` of real time.
pub fn tick(
    state: &mut GameState,
    delta_ms: f64,
    rates: &CelestialRates,
    orchestrator: &mut dyn ResetOrchestrator,
) -> Result<CelestialTickResult> {
    if !delta_ms.is_finite() || delta_ms < 0.0 {
        return Err(EngineError::invalid_input(format!(
            "tick delta must be a finite non-negative number of milliseconds, got {delta_ms}"
        )));
    }
    let mut result = CelestialTickResult::default();

    state.celestial.armageddon_duration_ms += delta_ms * rates.speed_modifier;
    if state.celestial.doomed && state.celestial.armageddon_duration_ms > rates.armageddon_interval_ms
    {
        result.cataclysm = Some(cataclysm(state, true, orchestrator));
    }

    if state.celestial.doomed {
        let antimatter = state.antimatter();
        let doom = &mut state.celestial;
        doom.peak_this_cycle = doom.peak_this_cycle.max(antimatter);
    }

    let delta_s = delta_ms / MS_PER_SECOND;
    for currency in TimedCurrency::ALL {
        let timer = state.celestial.timer_mut(currency);
        if !timer.unlocked {
            continue;
        }
        timer.timer += delta_s * TIMED_CURRENCY_BAR / rates.fill_time(currency);
        if timer.timer < TIMED_CURRENCY_BAR {
            continue;
        }
        let bars = (timer.timer / TIMED_CURRENCY_BAR).floor();
        // Leftover progress is dropped, not carried.
        timer.timer = 0.0;
        let granted = Magnitude::from_f64(rates.gain(currency) * bars);
        state.wallet.gain(currency.currency(), granted);
        debug!(currency = %currency, granted = %granted, "Timed currency granted");
        result.grants.push((currency, granted));
        if currency == TimedCurrency::Chaos {
            result.cost_scale_refresh = true;
        }
    }
    Ok(result)
}

/// Ends the armageddon cycle: optional remnants, a full reset, and fresh
/// duration, peak and bar progress. Timed-currency balances stay in the
/// wallet. Returns the remnants granted.
pub fn cataclysm(
    state: &mut GameState,
    gain: bool,
    orchestrator: &mut dyn ResetOrchestrator,
) -> Magnitude {
    let remnants = if gain {
        remnants_gain(state)
    } else {
        Magnitude::ZERO
    };
    state.wallet.gain(CurrencyId::Remnants, remnants);
    orchestrator.perform_reset(state, ResetKind::Armageddon, ResetOptions::forced());
    state.celestial.armageddon_duration_ms = 0.0;
    state.celestial.peak_this_cycle = Magnitude::ZERO;
    for timer in &mut state.celestial.timers {
        timer.timer = 0.0;
    }
    info!(remnants = %remnants, "Armageddon");
    remnants
}

/// Enters doom mode through a full reset. False if already doomed.
pub fn enter_doom(state: &mut GameState, orchestrator: &mut dyn ResetOrchestrator) -> bool {
    if state.celestial.doomed {
        return false;
    }
    orchestrator.perform_reset(state, ResetKind::Doom, ResetOptions::forced());
    state.celestial.doomed = true;
    state.celestial.armageddon_duration_ms = 0.0;
    state.celestial.peak_this_cycle = Magnitude::ZERO;
    info!("Entered doom");
    true
}

pub fn is_disabled(state: &GameState, _mechanic: Mechanic) -> bool {
    state.celestial.doomed
}

/// Name-based lookup. Names outside [`Mechanic`] count as disabled while
/// doomed, same as every known one.
pub fn is_disabled_by_name(state: &GameState, name: &str) -> bool {
    match name.parse::<Mechanic>() {
        Ok(mechanic) => is_disabled(state, mechanic),
        Err(_) => {
            debug!(name, "Unrecognized mechanic name");
            state.celestial.doomed
        }
    }
}

// =============================================================================
// Bonuses
// =============================================================================

pub fn remnants_gain(state: &GameState) -> Magnitude {
    let decades = (state.celestial.peak_this_cycle + Magnitude::ONE).log10();
    Magnitude::from_f64((decades + 1.0).log10().powi(3))
}

/// Antimatter multiplier from famine, softcapped past 1e100.
pub fn famine_multiplier(state: &GameState) -> Magnitude {
    let amount = state.wallet.value(CurrencyId::Famine).to_f64();
    let base = Magnitude::from_f64(FAMINE_MULTIPLIER_BASE).pow(amount);
    let softcap = Magnitude::from_f64(FAMINE_SOFTCAP);
    if base < softcap {
        return base;
    }
    let excess = (base / softcap + Magnitude::ONE).log10();
    softcap * Magnitude::from_f64(excess.powi(5))
}

/// Antimatter exponent from famine.
pub fn famine_exponent(state: &GameState) -> f64 {
    let decades = (state.wallet.value(CurrencyId::Famine) + Magnitude::ONE).log10();
    1.0 + (decades + 1.0).log10() / 10.0
}

/// Armageddon interval stretch; 1 until pestilence is unlocked.
pub fn pestilence_interval_multiplier(state: &GameState) -> f64 {
    if !state.celestial.timer(TimedCurrency::Pestilence).unlocked {
        return 1.0;
    }
    (state.wallet.value(CurrencyId::Pestilence) + Magnitude::ONE)
        .log10()
        .max(1.0)
}

/// Pestilence gain multiplier from chaos.
pub fn chaos_gain_multiplier(state: &GameState) -> f64 {
    state.wallet.value(CurrencyId::Chaos).to_f64().sqrt() + 1.0
}

/// Dimension cost divisor from chaos, capped at the largest finite double.
pub fn chaos_dimension_discount(state: &GameState) -> Magnitude {
    let chaos = state.wallet.value(CurrencyId::Chaos).to_f64();
    Magnitude::from(10u32)
        .pow(chaos * chaos)
        .min(Magnitude::number_max())
}
