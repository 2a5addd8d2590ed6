//! Purchase rules shared by every upgrade table.

use super::data;
use super::types::{RebuyableDef, SetUpgradeDef, UpgradeKey};
use crate::core::currency::CurrencyId;
use crate::core::error::{EngineError, Result};
use crate::core::game_state::GameState;
use crate::core::magnitude::Magnitude;
use crate::cost::remaining_capacity;
use tracing::debug;

/// Capability common to rebuyable and one-time upgrades.
pub trait Upgrade {
    fn key(&self) -> UpgradeKey;

    fn currency(&self) -> CurrencyId;

    /// Price of the next single purchase.
    fn cost(&self, state: &GameState) -> Result<Magnitude>;

    fn is_available(&self, state: &GameState) -> bool;

    /// Buys up to `count` and returns how many were bought. Zero when
    /// unavailable, capped or unaffordable.
    fn purchase(&self, state: &mut GameState, count: u64) -> Result<u64>;
}

// =============================================================================
// Rebuyable
// =============================================================================

impl RebuyableDef {
    pub fn owned(&self, state: &GameState) -> u64 {
        state.upgrades.owned(self.key)
    }

    pub fn is_capped(&self, state: &GameState) -> bool {
        self.cap.is_some_and(|cap| self.owned(state) >= cap)
    }

    /// Cost of the next `count` purchases.
    pub fn next_cost(&self, state: &GameState, count: u64) -> Result<Magnitude> {
        self.cost_law.cost_of_purchase(self.owned(state), count)
    }

    pub fn max_affordable(&self, state: &GameState) -> Result<u64> {
        if !(self.available)(state) {
            return Ok(0);
        }
        let owned = self.owned(state);
        let room = remaining_capacity(owned, self.cap);
        if room == 0 {
            return Ok(0);
        }
        let affordable = self
            .cost_law
            .max_affordable(state.wallet.value(self.currency), owned)?;
        Ok(affordable.min(room))
    }

    pub fn effect_value(&self, state: &GameState) -> Magnitude {
        (self.effect)(self.owned(state))
    }
}

impl Upgrade for RebuyableDef {
    fn key(&self) -> UpgradeKey {
        self.key
    }

    fn currency(&self) -> CurrencyId {
        self.currency
    }

    fn cost(&self, state: &GameState) -> Result<Magnitude> {
        self.cost_law.single_cost(self.owned(state))
    }

    fn is_available(&self, state: &GameState) -> bool {
        (self.available)(state)
    }

    fn purchase(&self, state: &mut GameState, count: u64) -> Result<u64> {
        let bought = self.max_affordable(state)?.min(count);
        if bought == 0 {
            return Ok(0);
        }
        let owned = self.owned(state);
        let cost = self.cost_law.cost_of_purchase(owned, bought)?;
        if !state.wallet.spend(self.currency, cost) {
            return Ok(0);
        }
        let now_owned = owned.saturating_add(bought);
        state.upgrades.set_owned(self.key, now_owned);
        debug!(upgrade = %self.key, bought, owned = now_owned, cost = %cost, "Purchased rebuyable");

        if let Some(on_purchase) = self.on_purchase {
            on_purchase(state, bought);
        }
        for milestone in self.milestones {
            if owned < milestone.at && now_owned >= milestone.at {
                (milestone.on_reach)(state);
            }
        }
        Ok(bought)
    }
}

// =============================================================================
// One-time
// =============================================================================

impl SetUpgradeDef {
    pub fn is_bought(&self, state: &GameState) -> bool {
        state.upgrades.is_member(self.key)
    }

    pub fn price(&self) -> Magnitude {
        Magnitude::from_f64(self.cost)
    }

    /// Buys the upgrade once. Repeat calls after success return false and
    /// never debit again.
    pub fn purchase_once(&self, state: &mut GameState) -> bool {
        if !(self.available)(state) || self.is_bought(state) {
            return false;
        }
        if !state.wallet.spend(self.currency, self.price()) {
            return false;
        }
        state.upgrades.insert(self.key);
        debug!(upgrade = %self.key, cost = self.cost, "Purchased upgrade");
        if let Some(on_purchased) = self.on_purchased {
            on_purchased(state);
        }
        true
    }
}

impl Upgrade for SetUpgradeDef {
    fn key(&self) -> UpgradeKey {
        self.key
    }

    fn currency(&self) -> CurrencyId {
        self.currency
    }

    fn cost(&self, _state: &GameState) -> Result<Magnitude> {
        Ok(self.price())
    }

    fn is_available(&self, state: &GameState) -> bool {
        (self.available)(state)
    }

    fn purchase(&self, state: &mut GameState, count: u64) -> Result<u64> {
        if count == 0 {
            return Ok(0);
        }
        Ok(u64::from(self.purchase_once(state)))
    }
}

// =============================================================================
// Catalog
// =============================================================================

#[derive(Debug, Clone, Copy)]
pub enum UpgradeRef {
    Rebuyable(&'static RebuyableDef),
    Set(&'static SetUpgradeDef),
}

impl UpgradeRef {
    fn as_upgrade(&self) -> &dyn Upgrade {
        match self {
            UpgradeRef::Rebuyable(def) => *def,
            UpgradeRef::Set(def) => *def,
        }
    }

    /// Cost of the next `count` purchases. A one-time upgrade costs nothing
    /// more once bought.
    pub fn next_cost(&self, state: &GameState, count: u64) -> Result<Magnitude> {
        match self {
            UpgradeRef::Rebuyable(def) => def.next_cost(state, count),
            UpgradeRef::Set(def) if count == 0 || def.is_bought(state) => Ok(Magnitude::ZERO),
            UpgradeRef::Set(def) => Ok(def.price()),
        }
    }

    pub fn max_affordable(&self, state: &GameState) -> Result<u64> {
        match self {
            UpgradeRef::Rebuyable(def) => def.max_affordable(state),
            UpgradeRef::Set(def) => Ok(u64::from(
                (def.available)(state)
                    && !def.is_bought(state)
                    && state.wallet.value(def.currency) >= def.price(),
            )),
        }
    }

    /// Rebuyable effect at the current count; `None` for one-time upgrades.
    pub fn effect_value(&self, state: &GameState) -> Option<Magnitude> {
        match self {
            UpgradeRef::Rebuyable(def) => Some(def.effect_value(state)),
            UpgradeRef::Set(_) => None,
        }
    }

    pub fn is_capped(&self, state: &GameState) -> bool {
        match self {
            UpgradeRef::Rebuyable(def) => def.is_capped(state),
            UpgradeRef::Set(def) => def.is_bought(state),
        }
    }

    pub fn is_bought(&self, state: &GameState) -> bool {
        match self {
            UpgradeRef::Rebuyable(def) => def.owned(state) > 0,
            UpgradeRef::Set(def) => def.is_bought(state),
        }
    }
}

impl Upgrade for UpgradeRef {
    fn key(&self) -> UpgradeKey {
        self.as_upgrade().key()
    }

    fn currency(&self) -> CurrencyId {
        self.as_upgrade().currency()
    }

    fn cost(&self, state: &GameState) -> Result<Magnitude> {
        self.as_upgrade().cost(state)
    }

    fn is_available(&self, state: &GameState) -> bool {
        self.as_upgrade().is_available(state)
    }

    fn purchase(&self, state: &mut GameState, count: u64) -> Result<u64> {
        self.as_upgrade().purchase(state, count)
    }
}

pub fn find(key: UpgradeKey) -> Option<UpgradeRef> {
    if let Some(def) = data::rebuyables().iter().find(|def| def.key == key) {
        return Some(UpgradeRef::Rebuyable(def));
    }
    data::set_upgrades()
        .iter()
        .find(|def| def.key == key)
        .map(UpgradeRef::Set)
}

/// Like [`find`], but an unknown key is an error.
pub fn lookup(key: UpgradeKey) -> Result<UpgradeRef> {
    find(key).ok_or_else(|| EngineError::UnknownUpgrade {
        key: key.to_string(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cost::CostLaw;
    use crate::upgrades::types::Milestone;

    fn always(_: &GameState) -> bool {
        true
    }

    fn never(_: &GameState) -> bool {
        false
    }

    fn linear(owned: u64) -> Magnitude {
        Magnitude::from(owned)
    }

    fn bump_infinities(state: &mut GameState) {
        state.records.infinities += 1;
    }

    fn count_purchases(state: &mut GameState, bought: u64) {
        state.records.eternities += bought;
    }

    static MILESTONES: [Milestone; 2] = [
        Milestone {
            at: 3,
            on_reach: bump_infinities,
        },
        Milestone {
            at: 5,
            on_reach: bump_infinities,
        },
    ];

    static TEST_REBUYABLE: RebuyableDef = RebuyableDef {
        key: UpgradeKey::reality(99),
        currency: CurrencyId::RealityMachines,
        cost_law: CostLaw::geometric(1.0, 30.0),
        cap: Some(6),
        available: always,
        effect: linear,
        on_purchase: Some(count_purchases),
        milestones: &MILESTONES,
    };

    static FLAT_REBUYABLE: RebuyableDef = RebuyableDef {
        key: UpgradeKey::reality(97),
        currency: CurrencyId::RealityMachines,
        cost_law: CostLaw::geometric(1.0, 1.0),
        cap: None,
        available: always,
        effect: linear,
        on_purchase: None,
        milestones: &[],
    };

    static LOCKED_SET: SetUpgradeDef = SetUpgradeDef {
        key: UpgradeKey::dilation(99),
        currency: CurrencyId::DilatedTime,
        cost: 10.0,
        available: never,
        on_purchased: None,
    };

    static OPEN_SET: SetUpgradeDef = SetUpgradeDef {
        key: UpgradeKey::dilation(98),
        currency: CurrencyId::DilatedTime,
        cost: 10.0,
        available: always,
        on_purchased: Some(bump_infinities),
    };

    fn funded(currency: CurrencyId, amount: f64) -> GameState {
        let mut state = GameState::new();
        state.wallet.set(currency, Magnitude::from_f64(amount));
        state
    }

    #[test]
    fn test_buys_two_for_thirty_one() {
        let mut state = funded(CurrencyId::RealityMachines, 31.0);
        assert_eq!(TEST_REBUYABLE.max_affordable(&state).unwrap(), 2);
        assert_eq!(TEST_REBUYABLE.purchase(&mut state, 10).unwrap(), 2);
        assert_eq!(state.wallet.value(CurrencyId::RealityMachines), Magnitude::ZERO);
        assert_eq!(TEST_REBUYABLE.owned(&state), 2);
        assert_eq!(state.records.eternities, 2);
    }

    #[test]
    fn test_thirty_buys_one() {
        let mut state = funded(CurrencyId::RealityMachines, 30.0);
        assert_eq!(TEST_REBUYABLE.purchase(&mut state, 5).unwrap(), 1);
        assert_eq!(
            state.wallet.value(CurrencyId::RealityMachines),
            Magnitude::from(29u32)
        );
    }

    #[test]
    fn test_request_clamps_purchase() {
        let mut state = funded(CurrencyId::RealityMachines, 1e9);
        assert_eq!(TEST_REBUYABLE.purchase(&mut state, 1).unwrap(), 1);
        assert_eq!(TEST_REBUYABLE.purchase(&mut state, 0).unwrap(), 0);
        assert_eq!(TEST_REBUYABLE.owned(&state), 1);
    }

    #[test]
    fn test_cap_stops_purchases() {
        let mut state = funded(CurrencyId::RealityMachines, 1e300);
        assert_eq!(TEST_REBUYABLE.purchase(&mut state, 100).unwrap(), 6);
        assert!(TEST_REBUYABLE.is_capped(&state));
        let before = state.wallet.value(CurrencyId::RealityMachines);
        assert_eq!(TEST_REBUYABLE.purchase(&mut state, 100).unwrap(), 0);
        assert_eq!(TEST_REBUYABLE.max_affordable(&state).unwrap(), 0);
        assert_eq!(state.wallet.value(CurrencyId::RealityMachines), before);
    }

    #[test]
    fn test_unaffordable_leaves_state() {
        let mut state = funded(CurrencyId::RealityMachines, 0.5);
        assert_eq!(TEST_REBUYABLE.purchase(&mut state, 1).unwrap(), 0);
        assert_eq!(TEST_REBUYABLE.owned(&state), 0);
        assert_eq!(state.records.eternities, 0);
    }

    #[test]
    fn test_milestones_fire_once_per_crossing() {
        let mut state = funded(CurrencyId::RealityMachines, 1e300);
        TEST_REBUYABLE.purchase(&mut state, 2).unwrap();
        assert_eq!(state.records.infinities, 0);
        // 2 -> 6 crosses both 3 and 5
        TEST_REBUYABLE.purchase(&mut state, 4).unwrap();
        assert_eq!(state.records.infinities, 2);
    }

    #[test]
    fn test_milestone_at_exact_landing() {
        let mut state = funded(CurrencyId::RealityMachines, 1e300);
        TEST_REBUYABLE.purchase(&mut state, 3).unwrap();
        assert_eq!(state.records.infinities, 1);
        TEST_REBUYABLE.purchase(&mut state, 1).unwrap();
        assert_eq!(state.records.infinities, 1);
    }

    #[test]
    fn test_unavailable_set_debits_nothing() {
        let mut state = funded(CurrencyId::DilatedTime, 1e6);
        assert!(!LOCKED_SET.purchase_once(&mut state));
        assert_eq!(state.wallet.value(CurrencyId::DilatedTime), Magnitude::from(1_000_000u32));
        assert!(!LOCKED_SET.is_bought(&state));
    }

    #[test]
    fn test_set_purchase_is_idempotent() {
        let mut state = funded(CurrencyId::DilatedTime, 25.0);
        assert!(OPEN_SET.purchase_once(&mut state));
        assert!(!OPEN_SET.purchase_once(&mut state));
        assert_eq!(state.wallet.value(CurrencyId::DilatedTime), Magnitude::from(15u32));
        assert_eq!(state.records.infinities, 1);
        assert_eq!(OPEN_SET.purchase(&mut state, 1).unwrap(), 0);
    }

    #[test]
    fn test_set_unaffordable() {
        let mut state = funded(CurrencyId::DilatedTime, 9.0);
        assert!(!OPEN_SET.purchase_once(&mut state));
        assert!(!OPEN_SET.is_bought(&state));
    }

    #[test]
    fn test_ref_views() {
        let state = funded(CurrencyId::DilatedTime, 25.0);
        let set = UpgradeRef::Set(&OPEN_SET);
        assert_eq!(set.max_affordable(&state).unwrap(), 1);
        assert_eq!(set.next_cost(&state, 1).unwrap(), Magnitude::from(10u32));
        assert_eq!(set.effect_value(&state), None);

        let rebuyable = UpgradeRef::Rebuyable(&TEST_REBUYABLE);
        assert_eq!(rebuyable.next_cost(&state, 2).unwrap(), Magnitude::from(31u32));
        assert_eq!(rebuyable.effect_value(&state), Some(Magnitude::ZERO));
        assert!(!rebuyable.is_bought(&state));
    }

    #[test]
    fn test_lookup_unknown_key() {
        let err = lookup(UpgradeKey::reality(999)).unwrap_err();
        assert_eq!(err.error_code(), "ENGINE_UNKNOWN_UPGRADE");
        assert!(find(UpgradeKey::dilation(1)).is_some());
    }

    #[test]
    fn test_uncapped_bulk_purchase_saturates_owned() {
        let mut state = GameState::new();
        state
            .wallet
            .set(CurrencyId::RealityMachines, Magnitude::pow10(30.0));
        state.upgrades.set_owned(FLAT_REBUYABLE.key, 5);

        let bought = FLAT_REBUYABLE.purchase(&mut state, u64::MAX).unwrap();
        assert!(bought > u64::MAX - 5);
        assert_eq!(FLAT_REBUYABLE.owned(&state), u64::MAX);
    }
}
