//! Equipped items as a modifier source, and the per-equip-set effect cache.

use super::registry::EffectRegistry;
use super::types::{Combined, EffectId, ItemType};
use crate::core::constants::MAX_EQUIPPED_ITEMS;
use crate::core::error::Result;
use crate::core::magnitude::Magnitude;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use tracing::debug;

/// Provides raw per-item contributions for an effect.
pub trait ModifierSource {
    /// Contributions to `effect` from equipped items whose type is in `types`.
    fn contributions(&self, effect: EffectId, types: &[ItemType]) -> Vec<Magnitude>;

    /// Changes whenever the equipped set changes.
    fn generation(&self) -> u64;
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Item {
    pub item_type: ItemType,
    pub level: u32,
    pub effects: Vec<(EffectId, Magnitude)>,
}

impl Item {
    pub fn new(item_type: ItemType, level: u32) -> Self {
        Self {
            item_type,
            level,
            effects: Vec::new(),
        }
    }

    pub fn with_effect(mut self, id: EffectId, value: Magnitude) -> Self {
        self.effects.push((id, value));
        self
    }

    pub fn effect(&self, id: EffectId) -> Option<Magnitude> {
        self.effects
            .iter()
            .find(|(effect, _)| *effect == id)
            .map(|(_, value)| *value)
    }
}

/// Fixed number of item slots.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EquippedItems {
    slots: Vec<Option<Item>>,
    #[serde(skip)]
    generation: u64,
}

impl Default for EquippedItems {
    fn default() -> Self {
        Self::with_capacity(MAX_EQUIPPED_ITEMS)
    }
}

impl EquippedItems {
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            slots: vec![None; capacity],
            generation: 0,
        }
    }

    pub fn capacity(&self) -> usize {
        self.slots.len()
    }

    pub fn len(&self) -> usize {
        self.slots.iter().flatten().count()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Puts the item in the first free slot. Returns `None` when full.
    pub fn equip(&mut self, item: Item) -> Option<usize> {
        let slot = self.slots.iter().position(Option::is_none)?;
        debug!(slot, item_type = %item.item_type, "Equipped item");
        self.slots[slot] = Some(item);
        self.generation += 1;
        Some(slot)
    }

    pub fn unequip(&mut self, slot: usize) -> Option<Item> {
        let item = self.slots.get_mut(slot)?.take()?;
        debug!(slot, item_type = %item.item_type, "Unequipped item");
        self.generation += 1;
        Some(item)
    }

    pub fn items(&self) -> impl Iterator<Item = &Item> {
        self.slots.iter().flatten()
    }
}

impl ModifierSource for EquippedItems {
    fn contributions(&self, effect: EffectId, types: &[ItemType]) -> Vec<Magnitude> {
        self.items()
            .filter(|item| types.contains(&item.item_type))
            .filter_map(|item| item.effect(effect))
            .collect()
    }

    fn generation(&self) -> u64 {
        self.generation
    }
}

/// Memoized effect values for one equip-set generation.
#[derive(Debug, Clone, Default)]
pub struct EffectCache {
    generation: Option<u64>,
    values: BTreeMap<EffectId, Combined>,
}

impl EffectCache {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(
        &mut self,
        registry: &EffectRegistry,
        source: &dyn ModifierSource,
        id: EffectId,
    ) -> Result<Combined> {
        let generation = source.generation();
        if self.generation != Some(generation) {
            self.values.clear();
            self.generation = Some(generation);
        }
        if let Some(cached) = self.values.get(&id) {
            return Ok(*cached);
        }
        debug!(effect = %id, generation, "Effect cache miss");
        let combined = registry.evaluate_source(id, source)?;
        self.values.insert(id, combined);
        Ok(combined)
    }

    pub fn invalidate(&mut self) {
        self.generation = None;
        self.values.clear();
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}
