use super::constants::{MAX_DIMENSION_TIERS, STARTING_ANTIMATTER, TACHYON_GALAXY_BASE_THRESHOLD};
use super::currency::{CurrencyId, Wallet};
use super::magnitude::Magnitude;
use crate::celestial::DoomState;
use crate::challenges::ChallengeProgress;
use crate::upgrades::UpgradeState;
use serde::{Deserialize, Serialize};

/// Antimatter dimension amounts and boost bookkeeping.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DimensionState {
    /// Amount owned per tier; index 0 is the first dimension.
    pub amounts: [Magnitude; MAX_DIMENSION_TIERS as usize],
    /// Purchased dimension boosts.
    pub boosts: u64,
    /// Cubic requirement surcharge from an outer challenge.
    pub cubic_surcharge: bool,
    /// Per-boost requirement discount for the tier-6 and tier-8 steps.
    pub requirement_discount: f64,
    /// Flat reduction applied to every boost requirement.
    pub requirement_reduction: f64,
    /// Charged-upgrade multiplier on the final requirement.
    pub charged_multiplier: f64,
}

impl Default for DimensionState {
    fn default() -> Self {
        Self {
            amounts: [Magnitude::ZERO; MAX_DIMENSION_TIERS as usize],
            boosts: 0,
            cubic_surcharge: false,
            requirement_discount: 0.0,
            requirement_reduction: 0.0,
            charged_multiplier: 1.0,
        }
    }
}

impl DimensionState {
    /// Amount of a 1-based tier; out-of-range tiers read as zero.
    pub fn amount(&self, tier: u8) -> Magnitude {
        if tier == 0 {
            return Magnitude::ZERO;
        }
        self.amounts
            .get(tier as usize - 1)
            .copied()
            .unwrap_or(Magnitude::ZERO)
    }

    pub fn set_amount(&mut self, tier: u8, amount: Magnitude) {
        if tier == 0 {
            return;
        }
        if let Some(slot) = self.amounts.get_mut(tier as usize - 1) {
            *slot = amount.clamp_min(Magnitude::ZERO);
        }
    }

    /// Zeroes every tier. Boost count is kept.
    pub fn clear_amounts(&mut self) {
        self.amounts = [Magnitude::ZERO; MAX_DIMENSION_TIERS as usize];
    }
}

/// Run counters and one-off flags that several subsystems read.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Records {
    /// Elapsed time in the current infinity, in milliseconds.
    pub this_infinity_ms: f64,
    pub infinities: u64,
    /// Infinities carried across eternities.
    pub banked_infinities: u64,
    pub eternities: u64,
    /// Antimatter galaxies owned, replicanti galaxies included.
    pub galaxies: u64,
    pub base_tachyon_galaxies: u64,
    pub total_tachyon_galaxies: u64,
    pub next_galaxy_threshold: Magnitude,
    /// Tachyon multiplier applied retroactively per tachyon upgrade bought.
    pub retroactive_tp_factor: f64,
    /// Infinity has been broken; antimatter may exceed the infinity limit.
    pub break_infinity: bool,
}

impl Default for Records {
    fn default() -> Self {
        Self {
            this_infinity_ms: 0.0,
            infinities: 0,
            banked_infinities: 0,
            eternities: 0,
            galaxies: 0,
            base_tachyon_galaxies: 0,
            total_tachyon_galaxies: 0,
            next_galaxy_threshold: Magnitude::from_f64(TACHYON_GALAXY_BASE_THRESHOLD),
            retroactive_tp_factor: 1.0,
            break_infinity: false,
        }
    }
}

/// Whole persisted game state. Each subsystem owns one field and receives
/// the state explicitly; nothing here is global.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct GameState {
    pub wallet: Wallet,
    pub upgrades: UpgradeState,
    pub challenges: ChallengeProgress,
    pub dimensions: DimensionState,
    pub celestial: DoomState,
    pub records: Records,
}

impl GameState {
    /// Fresh state with the starting antimatter balance.
    pub fn new() -> Self {
        let mut state = Self::default();
        state
            .wallet
            .gain(CurrencyId::Antimatter, Magnitude::from_f64(STARTING_ANTIMATTER));
        state
    }

    pub fn antimatter(&self) -> Magnitude {
        self.wallet.value(CurrencyId::Antimatter)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_game_state() {
        let state = GameState::new();
        assert_eq!(state.antimatter(), Magnitude::from(10u32));
        assert_eq!(state.dimensions.boosts, 0);
        assert_eq!(state.records.retroactive_tp_factor, 1.0);
        assert!(!state.celestial.doomed);
    }

    #[test]
    fn test_dimension_amount_bounds() {
        let mut dims = DimensionState::default();
        dims.set_amount(8, Magnitude::from(42u32));
        dims.set_amount(9, Magnitude::from(1u32));
        dims.set_amount(0, Magnitude::from(1u32));
        assert_eq!(dims.amount(8), Magnitude::from(42u32));
        assert_eq!(dims.amount(9), Magnitude::ZERO);
        assert_eq!(dims.amount(0), Magnitude::ZERO);
        dims.clear_amounts();
        assert_eq!(dims.amount(8), Magnitude::ZERO);
    }

    #[test]
    fn test_missing_fields_default_on_load() {
        let state: GameState = serde_json::from_str("{}").unwrap();
        assert_eq!(state.dimensions.charged_multiplier, 1.0);
        assert_eq!(state.records.next_galaxy_threshold, Magnitude::from(1000u32));
        assert_eq!(state.antimatter(), Magnitude::ZERO);
    }

    #[test]
    fn test_serde_roundtrip_keeps_progress() {
        let mut state = GameState::new();
        state.dimensions.boosts = 7;
        state.records.infinities = 3;
        let json = serde_json::to_string(&state).unwrap();
        let back: GameState = serde_json::from_str(&json).unwrap();
        assert_eq!(back.dimensions.boosts, 7);
        assert_eq!(back.records.infinities, 3);
        assert_eq!(back.antimatter(), Magnitude::from(10u32));
    }
}
