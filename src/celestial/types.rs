//! Doom-mode state, timed sub-currencies and the disable-mechanic table.

use crate::core::constants::{
    CHAOS_BASE_FILL_SECONDS, FAMINE_BASE_FILL_SECONDS, PESTILENCE_BASE_FILL_SECONDS,
};
use crate::core::currency::CurrencyId;
use crate::core::magnitude::Magnitude;
use serde::{Deserialize, Serialize};

#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    PartialOrd,
    Ord,
    Serialize,
    Deserialize,
    strum::Display,
    strum::EnumString,
)]
#[strum(serialize_all = "snake_case", ascii_case_insensitive)]
pub enum TimedCurrency {
    Famine,
    Pestilence,
    Chaos,
}

impl TimedCurrency {
    pub const ALL: [TimedCurrency; 3] = [
        TimedCurrency::Famine,
        TimedCurrency::Pestilence,
        TimedCurrency::Chaos,
    ];

    /// Wallet balance the timer pays into.
    pub fn currency(&self) -> CurrencyId {
        match self {
            TimedCurrency::Famine => CurrencyId::Famine,
            TimedCurrency::Pestilence => CurrencyId::Pestilence,
            TimedCurrency::Chaos => CurrencyId::Chaos,
        }
    }

    pub fn base_fill_seconds(&self) -> f64 {
        match self {
            TimedCurrency::Famine => FAMINE_BASE_FILL_SECONDS,
            TimedCurrency::Pestilence => PESTILENCE_BASE_FILL_SECONDS,
            TimedCurrency::Chaos => CHAOS_BASE_FILL_SECONDS,
        }
    }

    fn index(self) -> usize {
        match self {
            TimedCurrency::Famine => 0,
            TimedCurrency::Pestilence => 1,
            TimedCurrency::Chaos => 2,
        }
    }
}

/// Fill bar of one timed currency. The earned amount lives in the wallet.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TimerState {
    /// Progress toward the next grant, in bar units of 10.
    pub timer: f64,
    pub unlocked: bool,
    pub speed_upgrades: u64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DoomState {
    pub doomed: bool,
    pub armageddon_duration_ms: f64,
    /// Highest antimatter seen since the last cataclysm.
    pub peak_this_cycle: Magnitude,
    pub timers: [TimerState; 3],
}

impl Default for DoomState {
    fn default() -> Self {
        Self {
            doomed: false,
            armageddon_duration_ms: 0.0,
            peak_this_cycle: Magnitude::ZERO,
            timers: [TimerState::default(); 3],
        }
    }
}

impl DoomState {
    pub fn timer(&self, currency: TimedCurrency) -> &TimerState {
        &self.timers[currency.index()]
    }

    pub fn timer_mut(&mut self, currency: TimedCurrency) -> &mut TimerState {
        &mut self.timers[currency.index()]
    }
}

/// Mechanics that doom mode can switch off.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    Serialize,
    Deserialize,
    strum::Display,
    strum::EnumString,
    strum::EnumIter,
)]
pub enum Mechanic {
    #[strum(serialize = "IPGain")]
    IpGain,
    #[strum(serialize = "EPGain")]
    EpGain,
    #[strum(serialize = "achievements")]
    Achievements,
    #[strum(serialize = "IPMults")]
    IpMults,
    #[strum(serialize = "EPMults")]
    EpMults,
    #[strum(serialize = "galaxies")]
    Galaxies,
    #[strum(serialize = "InfinitiedMults")]
    InfinitiedMults,
    #[strum(serialize = "infinitiedGen")]
    InfinitiedGen,
    #[strum(serialize = "eternityGain")]
    EternityGain,
    #[strum(serialize = "eternityMults")]
    EternityMults,
    #[strum(serialize = "studies")]
    Studies,
    #[strum(serialize = "EPgen")]
    EpGen,
    #[strum(serialize = "autoec")]
    AutoEc,
    #[strum(serialize = "replicantiIntervalMult")]
    ReplicantiIntervalMult,
    #[strum(serialize = "tpMults")]
    TpMults,
    #[strum(serialize = "equipGlyphs")]
    EquipGlyphs,
    #[strum(serialize = "V")]
    V,
}

/// Quantities owned outside this crate that the doom rates depend on.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CelestialInputs {
    pub replicanti: Magnitude,
    pub time_shards: Magnitude,
    pub antimatter_per_second: Magnitude,
}

impl Default for CelestialInputs {
    fn default() -> Self {
        Self {
            replicanti: Magnitude::ONE,
            time_shards: Magnitude::ZERO,
            antimatter_per_second: Magnitude::ZERO,
        }
    }
}

/// Rates derived once per tick from state and inputs.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CelestialRates {
    pub speed_modifier: f64,
    pub armageddon_interval_ms: f64,
    /// Seconds to fill one bar, per timed currency. May be infinite.
    pub fill_time_s: [f64; 3],
    /// Units granted per full bar, per timed currency.
    pub gain: [f64; 3],
}

impl CelestialRates {
    pub fn fill_time(&self, currency: TimedCurrency) -> f64 {
        self.fill_time_s[currency.index()]
    }

    pub fn gain(&self, currency: TimedCurrency) -> f64 {
        self.gain[currency.index()]
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;
    use strum::IntoEnumIterator;

    #[test]
    fn test_mechanic_names_roundtrip() {
        for mechanic in Mechanic::iter() {
            let name = mechanic.to_string();
            assert_eq!(Mechanic::from_str(&name).unwrap(), mechanic);
        }
        assert_eq!(Mechanic::iter().count(), 17);
    }

    #[test]
    fn test_mechanic_names_are_exact() {
        assert_eq!(Mechanic::from_str("EPgen").unwrap(), Mechanic::EpGen);
        assert_eq!(Mechanic::from_str("EPGain").unwrap(), Mechanic::EpGain);
        assert!(Mechanic::from_str("glyphs").is_err());
    }

    #[test]
    fn test_timers_index_by_currency() {
        let mut doom = DoomState::default();
        doom.timer_mut(TimedCurrency::Chaos).unlocked = true;
        assert!(doom.timer(TimedCurrency::Chaos).unlocked);
        assert!(!doom.timer(TimedCurrency::Famine).unlocked);
        assert_eq!(TimedCurrency::Pestilence.currency(), CurrencyId::Pestilence);
    }

    #[test]
    fn test_doom_state_defaults_on_load() {
        let doom: DoomState = serde_json::from_str(r#"{"doomed":true}"#).unwrap();
        assert!(doom.doomed);
        assert_eq!(doom.peak_this_cycle, Magnitude::ZERO);
        assert_eq!(doom.timers, [TimerState::default(); 3]);
    }
}
