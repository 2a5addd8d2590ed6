//! Upgrade states: rebuyable upgrades priced by a cost law and one-time
//! upgrades tracked by membership. Side effects are declared next to each
//! definition in [`data`].

pub mod data;
pub mod logic;
pub mod types;

pub use logic::{find, lookup, Upgrade, UpgradeRef};
pub use types::{Milestone, RebuyableDef, SetUpgradeDef, UpgradeGroup, UpgradeKey, UpgradeState};
