//! Upgrade keys, persisted ownership and the static definition shapes.

use crate::core::currency::CurrencyId;
use crate::core::game_state::GameState;
use crate::core::magnitude::Magnitude;
use crate::cost::CostLaw;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};
use std::fmt;

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
pub enum UpgradeGroup {
    Dilation,
    Reality,
    Celestial,
}

impl UpgradeGroup {
    pub const ALL: [UpgradeGroup; 3] = [
        UpgradeGroup::Dilation,
        UpgradeGroup::Reality,
        UpgradeGroup::Celestial,
    ];
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct UpgradeKey {
    pub group: UpgradeGroup,
    pub id: u32,
}

impl UpgradeKey {
    pub const fn new(group: UpgradeGroup, id: u32) -> Self {
        Self { group, id }
    }

    pub const fn dilation(id: u32) -> Self {
        Self::new(UpgradeGroup::Dilation, id)
    }

    pub const fn reality(id: u32) -> Self {
        Self::new(UpgradeGroup::Reality, id)
    }

    pub const fn celestial(id: u32) -> Self {
        Self::new(UpgradeGroup::Celestial, id)
    }
}

impl fmt::Display for UpgradeKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.group, self.id)
    }
}

/// Persisted upgrade ownership: rebuyable counts and one-time memberships.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct UpgradeState {
    rebuyables: BTreeMap<UpgradeGroup, BTreeMap<u32, u64>>,
    sets: BTreeMap<UpgradeGroup, BTreeSet<u32>>,
}

impl UpgradeState {
    pub fn owned(&self, key: UpgradeKey) -> u64 {
        self.rebuyables
            .get(&key.group)
            .and_then(|counts| counts.get(&key.id))
            .copied()
            .unwrap_or(0)
    }

    pub fn set_owned(&mut self, key: UpgradeKey, owned: u64) {
        self.rebuyables
            .entry(key.group)
            .or_default()
            .insert(key.id, owned);
    }

    pub fn is_member(&self, key: UpgradeKey) -> bool {
        self.sets
            .get(&key.group)
            .is_some_and(|members| members.contains(&key.id))
    }

    /// Returns false if already a member.
    pub fn insert(&mut self, key: UpgradeKey) -> bool {
        self.sets.entry(key.group).or_default().insert(key.id)
    }

    pub fn members(&self, group: UpgradeGroup) -> impl Iterator<Item = u32> + '_ {
        self.sets.get(&group).into_iter().flatten().copied()
    }

    /// Full prestige wipe of one group's one-time upgrades. The only way a
    /// membership is ever removed.
    pub fn wipe_sets(&mut self, group: UpgradeGroup) {
        self.sets.remove(&group);
    }
}

/// Fires once when a purchase carries `owned` from below `at` to `at` or
/// beyond.
#[derive(Clone, Copy)]
pub struct Milestone {
    pub at: u64,
    pub on_reach: fn(&mut GameState),
}

impl fmt::Debug for Milestone {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Milestone").field("at", &self.at).finish()
    }
}

/// Repeatedly purchasable upgrade.
#[derive(Clone, Copy)]
pub struct RebuyableDef {
    pub key: UpgradeKey,
    pub currency: CurrencyId,
    pub cost_law: CostLaw,
    pub cap: Option<u64>,
    pub available: fn(&GameState) -> bool,
    /// Effect as a function of the owned count.
    pub effect: fn(u64) -> Magnitude,
    /// Runs after every successful purchase with the count just bought.
    pub on_purchase: Option<fn(&mut GameState, u64)>,
    pub milestones: &'static [Milestone],
}

impl fmt::Debug for RebuyableDef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RebuyableDef")
            .field("key", &self.key)
            .field("currency", &self.currency)
            .field("cost_law", &self.cost_law)
            .field("cap", &self.cap)
            .field("milestones", &self.milestones)
            .finish()
    }
}

/// One-time upgrade tracked by membership.
#[derive(Clone, Copy)]
pub struct SetUpgradeDef {
    pub key: UpgradeKey,
    pub currency: CurrencyId,
    pub cost: f64,
    pub available: fn(&GameState) -> bool,
    pub on_purchased: Option<fn(&mut GameState)>,
}

impl fmt::Debug for SetUpgradeDef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SetUpgradeDef")
            .field("key", &self.key)
            .field("currency", &self.currency)
            .field("cost", &self.cost)
            .finish()
    }
}
