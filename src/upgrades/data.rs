//! Static upgrade tables with their purchase callbacks.

use super::types::{Milestone, RebuyableDef, SetUpgradeDef, UpgradeKey};
use crate::celestial::{is_disabled, Mechanic, TimedCurrency};
use crate::core::constants::{
    REALITY_REBUYABLE_CROSSOVER, SPEED_UPGRADE_FACTOR, TACHYON_GALAXY_BASE_THRESHOLD,
};
use crate::core::currency::CurrencyId;
use crate::core::game_state::GameState;
use crate::core::magnitude::Magnitude;
use crate::cost::CostLaw;

const NO_MILESTONES: &[Milestone] = &[];

fn always(_: &GameState) -> bool {
    true
}

fn doomed(state: &GameState) -> bool {
    state.celestial.doomed
}

// =============================================================================
// Dilation
// =============================================================================

pub const DT_GAIN: UpgradeKey = UpgradeKey::dilation(1);
pub const GALAXY_THRESHOLD: UpgradeKey = UpgradeKey::dilation(2);
pub const TACHYON_GAIN: UpgradeKey = UpgradeKey::dilation(3);
pub const DOUBLE_GALAXIES: UpgradeKey = UpgradeKey::dilation(4);

fn double_per_level(owned: u64) -> Magnitude {
    Magnitude::from(2u32).pow(owned as f64)
}

fn threshold_shrink(owned: u64) -> Magnitude {
    Magnitude::from_f64(0.8_f64.powf(owned as f64))
}

/// Cheaper galaxies restart galaxy tracking and cost the dilated time on hand.
fn restart_galaxies(state: &mut GameState, _bought: u64) {
    state.wallet.currency_mut(CurrencyId::DilatedTime).reset();
    state.records.next_galaxy_threshold = Magnitude::from_f64(TACHYON_GALAXY_BASE_THRESHOLD);
    state.records.base_tachyon_galaxies = 0;
    state.records.total_tachyon_galaxies = 0;
}

/// Tachyon gain applies retroactively to particles already held.
fn apply_retroactive_tachyons(state: &mut GameState, bought: u64) {
    if is_disabled(state, Mechanic::TpMults) {
        return;
    }
    let factor = Magnitude::from_f64(state.records.retroactive_tp_factor).pow(bought as f64);
    state
        .wallet
        .currency_mut(CurrencyId::TachyonParticles)
        .multiply(factor);
}

fn double_tachyon_galaxies(state: &mut GameState) {
    state.records.total_tachyon_galaxies = state.records.total_tachyon_galaxies.saturating_mul(2);
}

const fn dilation_set(
    id: u32,
    cost: f64,
    on_purchased: Option<fn(&mut GameState)>,
) -> SetUpgradeDef {
    SetUpgradeDef {
        key: UpgradeKey::dilation(id),
        currency: CurrencyId::DilatedTime,
        cost,
        available: always,
        on_purchased,
    }
}

// =============================================================================
// Reality
// =============================================================================

const fn hybrid(initial: f64, increment: f64, ratio_step: f64) -> CostLaw {
    CostLaw::Hybrid {
        initial,
        increment,
        crossover: REALITY_REBUYABLE_CROSSOVER,
        ratio_step,
    }
}

fn triple_effect(owned: u64) -> Magnitude {
    Magnitude::from(3u32).pow(owned as f64)
}

fn quintuple_effect(owned: u64) -> Magnitude {
    Magnitude::from(5u32).pow(owned as f64)
}

/// Past the crossover the per-purchase ratio grows by a tenth of the base
/// increment each purchase.
const fn reality_rebuyable(
    id: u32,
    initial: f64,
    increment: f64,
    ratio_step: f64,
    effect: fn(u64) -> Magnitude,
) -> RebuyableDef {
    RebuyableDef {
        key: UpgradeKey::reality(id),
        currency: CurrencyId::RealityMachines,
        cost_law: hybrid(initial, increment, ratio_step),
        cap: None,
        available: always,
        effect,
        on_purchase: None,
        milestones: NO_MILESTONES,
    }
}

pub const BIG_FIRST_ETERNITY: UpgradeKey = UpgradeKey::reality(10);
pub const BANKED_INFINITIES: UpgradeKey = UpgradeKey::reality(11);
pub const ETERNITY_COUNT: UpgradeKey = UpgradeKey::reality(14);
pub const GALAXY_HORDE: UpgradeKey = UpgradeKey::reality(21);
pub const EP_SURPLUS: UpgradeKey = UpgradeKey::reality(25);

/// Infinity points pushed past 1e450 before the first eternity.
fn huge_first_eternity(state: &GameState) -> bool {
    state.records.eternities == 0
        && state.wallet.value(CurrencyId::InfinityPoints) >= Magnitude::pow10(450.0)
}

fn many_banked_infinities(state: &GameState) -> bool {
    state.records.banked_infinities >= 1_000_000_000_000
}

fn many_eternities(state: &GameState) -> bool {
    state.records.eternities >= 10_000_000
}

fn many_galaxies(state: &GameState) -> bool {
    state.records.galaxies >= 2800
}

fn eternity_point_surplus(state: &GameState) -> bool {
    state.wallet.value(CurrencyId::EternityPoints) >= Magnitude::pow10(11111.0)
}

/// One-time reality upgrades open once their record requirement is met.
const fn reality_set(id: u32, cost: f64, available: fn(&GameState) -> bool) -> SetUpgradeDef {
    SetUpgradeDef {
        key: UpgradeKey::reality(id),
        currency: CurrencyId::RealityMachines,
        cost,
        available,
        on_purchased: None,
    }
}

// =============================================================================
// Celestial
// =============================================================================

pub const UNLOCK_FAMINE: UpgradeKey = UpgradeKey::celestial(1);
pub const UNLOCK_PESTILENCE: UpgradeKey = UpgradeKey::celestial(2);
pub const UNLOCK_CHAOS: UpgradeKey = UpgradeKey::celestial(3);
pub const FAMINE_SPEED: UpgradeKey = UpgradeKey::celestial(11);
pub const PESTILENCE_SPEED: UpgradeKey = UpgradeKey::celestial(12);
pub const CHAOS_SPEED: UpgradeKey = UpgradeKey::celestial(13);
pub const TIMED_GAIN: UpgradeKey = UpgradeKey::celestial(14);

const SPEED_CAP: u64 = 20;

fn unlock_famine(state: &mut GameState) {
    state.celestial.timer_mut(TimedCurrency::Famine).unlocked = true;
}

fn unlock_pestilence(state: &mut GameState) {
    state.celestial.timer_mut(TimedCurrency::Pestilence).unlocked = true;
}

fn unlock_chaos(state: &mut GameState) {
    state.celestial.timer_mut(TimedCurrency::Chaos).unlocked = true;
}

fn famine_faster(state: &mut GameState, bought: u64) {
    state.celestial.timer_mut(TimedCurrency::Famine).speed_upgrades += bought;
}

fn pestilence_faster(state: &mut GameState, bought: u64) {
    state.celestial.timer_mut(TimedCurrency::Pestilence).speed_upgrades += bought;
}

fn chaos_faster(state: &mut GameState, bought: u64) {
    state.celestial.timer_mut(TimedCurrency::Chaos).speed_upgrades += bought;
}

fn speed_effect(owned: u64) -> Magnitude {
    Magnitude::from_f64(SPEED_UPGRADE_FACTOR.powf(owned as f64))
}

fn gain_effect(owned: u64) -> Magnitude {
    Magnitude::from(owned.saturating_add(1))
}

fn famine_unlocked(state: &GameState) -> bool {
    doomed(state) && state.celestial.timer(TimedCurrency::Famine).unlocked
}

fn pestilence_unlocked(state: &GameState) -> bool {
    doomed(state) && state.celestial.timer(TimedCurrency::Pestilence).unlocked
}

fn chaos_unlocked(state: &GameState) -> bool {
    doomed(state) && state.celestial.timer(TimedCurrency::Chaos).unlocked
}

const fn celestial_set(
    id: u32,
    cost: f64,
    on_purchased: fn(&mut GameState),
) -> SetUpgradeDef {
    SetUpgradeDef {
        key: UpgradeKey::celestial(id),
        currency: CurrencyId::Remnants,
        cost,
        available: doomed,
        on_purchased: Some(on_purchased),
    }
}

/// Maxing a timer's speed opens the next timer without paying remnants.
const FAMINE_MAXED: &[Milestone] = &[Milestone {
    at: SPEED_CAP,
    on_reach: unlock_pestilence,
}];

const PESTILENCE_MAXED: &[Milestone] = &[Milestone {
    at: SPEED_CAP,
    on_reach: unlock_chaos,
}];

const fn speed_rebuyable(
    id: u32,
    currency: CurrencyId,
    available: fn(&GameState) -> bool,
    on_purchase: fn(&mut GameState, u64),
    milestones: &'static [Milestone],
) -> RebuyableDef {
    RebuyableDef {
        key: UpgradeKey::celestial(id),
        currency,
        cost_law: CostLaw::geometric(10.0, 2.0),
        cap: Some(SPEED_CAP),
        available,
        effect: speed_effect,
        on_purchase: Some(on_purchase),
        milestones,
    }
}

// =============================================================================
// Tables
// =============================================================================

static REBUYABLES: [RebuyableDef; 12] = [
    RebuyableDef {
        key: DT_GAIN,
        currency: CurrencyId::DilatedTime,
        cost_law: CostLaw::geometric(1e4, 10.0),
        cap: None,
        available: always,
        effect: double_per_level,
        on_purchase: None,
        milestones: NO_MILESTONES,
    },
    RebuyableDef {
        key: GALAXY_THRESHOLD,
        currency: CurrencyId::DilatedTime,
        cost_law: CostLaw::geometric(1e6, 100.0),
        cap: Some(34),
        available: always,
        effect: threshold_shrink,
        on_purchase: Some(restart_galaxies),
        milestones: NO_MILESTONES,
    },
    RebuyableDef {
        key: TACHYON_GAIN,
        currency: CurrencyId::DilatedTime,
        cost_law: CostLaw::geometric(1e7, 20.0),
        cap: None,
        available: always,
        effect: triple_effect,
        on_purchase: Some(apply_retroactive_tachyons),
        milestones: NO_MILESTONES,
    },
    reality_rebuyable(1, 1.0, 30.0, 3.0, triple_effect),
    reality_rebuyable(2, 1.0, 30.0, 3.0, triple_effect),
    reality_rebuyable(3, 2.0, 30.0, 3.0, triple_effect),
    reality_rebuyable(4, 2.0, 30.0, 3.0, triple_effect),
    reality_rebuyable(5, 3.0, 50.0, 5.0, quintuple_effect),
    speed_rebuyable(11, CurrencyId::Famine, famine_unlocked, famine_faster, FAMINE_MAXED),
    speed_rebuyable(
        12,
        CurrencyId::Pestilence,
        pestilence_unlocked,
        pestilence_faster,
        PESTILENCE_MAXED,
    ),
    speed_rebuyable(13, CurrencyId::Chaos, chaos_unlocked, chaos_faster, NO_MILESTONES),
    RebuyableDef {
        key: TIMED_GAIN,
        currency: CurrencyId::Remnants,
        cost_law: CostLaw::geometric(5.0, 4.0),
        cap: Some(10),
        available: doomed,
        effect: gain_effect,
        on_purchase: None,
        milestones: NO_MILESTONES,
    },
];

static SET_UPGRADES: [SetUpgradeDef; 15] = [
    dilation_set(4, 5e6, Some(double_tachyon_galaxies)),
    dilation_set(5, 1e9, None),
    dilation_set(6, 5e7, None),
    dilation_set(7, 2e12, None),
    dilation_set(8, 1e10, None),
    dilation_set(9, 1e11, None),
    dilation_set(10, 1e15, None),
    celestial_set(1, 10.0, unlock_famine),
    celestial_set(2, 50.0, unlock_pestilence),
    celestial_set(3, 200.0, unlock_chaos),
    reality_set(10, 15.0, huge_first_eternity),
    reality_set(11, 50.0, many_banked_infinities),
    reality_set(14, 50.0, many_eternities),
    reality_set(21, 1e5, many_galaxies),
    reality_set(25, 1e5, eternity_point_surplus),
];

pub fn rebuyables() -> &'static [RebuyableDef] {
    &REBUYABLES
}

pub fn set_upgrades() -> &'static [SetUpgradeDef] {
    &SET_UPGRADES
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::upgrades::logic::Upgrade;
    use std::collections::BTreeSet;

    #[test]
    fn test_keys_are_unique() {
        let mut seen = BTreeSet::new();
        for key in rebuyables()
            .iter()
            .map(|def| def.key)
            .chain(set_upgrades().iter().map(|def| def.key))
        {
            assert!(seen.insert(key), "{key} defined twice");
        }
    }

    #[test]
    fn test_every_cost_law_is_valid() {
        for def in rebuyables() {
            def.cost_law.validate().unwrap();
        }
    }

    #[test]
    fn test_reality_effects() {
        let def = rebuyables().iter().find(|d| d.key == UpgradeKey::reality(5)).unwrap();
        assert_eq!((def.effect)(2), Magnitude::from(25u32));
        let def = rebuyables().iter().find(|d| d.key == UpgradeKey::reality(1)).unwrap();
        assert_eq!((def.effect)(3), Magnitude::from(27u32));
    }

    #[test]
    fn test_galaxy_threshold_restarts_galaxies() {
        let def = rebuyables().iter().find(|d| d.key == GALAXY_THRESHOLD).unwrap();
        let mut state = GameState::new();
        state.wallet.set(CurrencyId::DilatedTime, Magnitude::from_f64(2e6));
        state.records.base_tachyon_galaxies = 4;
        state.records.total_tachyon_galaxies = 8;
        state.records.next_galaxy_threshold = Magnitude::from_f64(5e4);

        assert_eq!(def.purchase(&mut state, 1).unwrap(), 1);
        assert_eq!(state.wallet.value(CurrencyId::DilatedTime), Magnitude::ZERO);
        assert_eq!(state.records.total_tachyon_galaxies, 0);
        assert_eq!(state.records.base_tachyon_galaxies, 0);
        assert_eq!(state.records.next_galaxy_threshold, Magnitude::from(1000u32));
    }

    #[test]
    fn test_tachyon_gain_retroactive() {
        let def = rebuyables().iter().find(|d| d.key == TACHYON_GAIN).unwrap();
        let mut state = GameState::new();
        state.wallet.set(CurrencyId::DilatedTime, Magnitude::from_f64(1e7));
        state.wallet.set(CurrencyId::TachyonParticles, Magnitude::from(100u32));
        state.records.retroactive_tp_factor = 2.0;

        assert_eq!(def.purchase(&mut state, 1).unwrap(), 1);
        assert_eq!(
            state.wallet.value(CurrencyId::TachyonParticles),
            Magnitude::from(200u32)
        );
    }

    #[test]
    fn test_tachyon_gain_not_retroactive_while_doomed() {
        let def = rebuyables().iter().find(|d| d.key == TACHYON_GAIN).unwrap();
        let mut state = GameState::new();
        state.celestial.doomed = true;
        state.wallet.set(CurrencyId::DilatedTime, Magnitude::from_f64(1e7));
        state.wallet.set(CurrencyId::TachyonParticles, Magnitude::from(100u32));
        state.records.retroactive_tp_factor = 2.0;

        assert_eq!(def.purchase(&mut state, 1).unwrap(), 1);
        assert_eq!(
            state.wallet.value(CurrencyId::TachyonParticles),
            Magnitude::from(100u32)
        );
    }

    #[test]
    fn test_double_galaxies() {
        let def = set_upgrades().iter().find(|d| d.key == DOUBLE_GALAXIES).unwrap();
        let mut state = GameState::new();
        state.wallet.set(CurrencyId::DilatedTime, Magnitude::from_f64(5e6));
        state.records.total_tachyon_galaxies = 7;
        assert!(def.purchase_once(&mut state));
        assert_eq!(state.records.total_tachyon_galaxies, 14);
        assert!(!def.purchase_once(&mut state));
        assert_eq!(state.records.total_tachyon_galaxies, 14);
    }

    #[test]
    fn test_celestial_upgrades_need_doom() {
        let def = set_upgrades().iter().find(|d| d.key == UNLOCK_FAMINE).unwrap();
        let mut state = GameState::new();
        state.wallet.set(CurrencyId::Remnants, Magnitude::from(100u32));
        assert!(!def.purchase_once(&mut state));

        state.celestial.doomed = true;
        assert!(def.purchase_once(&mut state));
        assert!(state.celestial.timer(TimedCurrency::Famine).unlocked);
        assert_eq!(state.wallet.value(CurrencyId::Remnants), Magnitude::from(90u32));
    }

    #[test]
    fn test_speed_upgrade_paid_in_timed_currency() {
        let def = rebuyables().iter().find(|d| d.key == FAMINE_SPEED).unwrap();
        let mut state = GameState::new();
        state.celestial.doomed = true;
        state.wallet.set(CurrencyId::Famine, Magnitude::from(30u32));
        assert_eq!(def.purchase(&mut state, 5).unwrap(), 0);

        state.celestial.timer_mut(TimedCurrency::Famine).unlocked = true;
        // 10 + 20 = 30
        assert_eq!(def.purchase(&mut state, 5).unwrap(), 2);
        assert_eq!(state.celestial.timer(TimedCurrency::Famine).speed_upgrades, 2);
        assert_eq!(state.wallet.value(CurrencyId::Famine), Magnitude::ZERO);
    }
}
