//! Modifier effects: declarative per-effect combination of equipped-item
//! contributions, with optional softcaps that report when they engage.

pub mod data;
pub mod equipped;
pub mod registry;
pub mod types;

pub use equipped::{EffectCache, EquippedItems, Item, ModifierSource};
pub use registry::EffectRegistry;
pub use types::{Combinator, Combined, EffectConfig, EffectId, ItemType};
