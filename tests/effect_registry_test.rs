//! Effect registry and cache behavior: built-in table contents, combinators,
//! softcaps, registration contracts and cache invalidation.

use antimatter_core::effects::{
    Combinator, Combined, EffectCache, EffectConfig, EffectId, EffectRegistry, EquippedItems,
    Item, ItemType, ModifierSource,
};
use antimatter_core::{EngineError, Magnitude};

// =============================================================================
// Helpers
// =============================================================================

fn m(v: f64) -> Magnitude {
    Magnitude::from_f64(v)
}

fn close(a: Magnitude, b: f64) -> bool {
    (a.to_f64() - b).abs() < 1e-9
}

fn registry() -> EffectRegistry {
    EffectRegistry::with_builtins().unwrap()
}

fn never_neutral(_values: &[Magnitude]) -> Combined {
    Combined::uncapped(Magnitude::from(2u32))
}

// =============================================================================
// Built-in table
// =============================================================================

#[test]
fn test_every_effect_is_registered() {
    let registry = registry();
    assert_eq!(registry.len(), EffectId::ALL.len());
    for id in EffectId::ALL {
        assert!(registry.contains(id), "{id} missing");
    }
}

#[test]
fn test_empty_inputs_are_neutral() {
    let registry = registry();
    let product = registry.evaluate(EffectId::TimePow, &[]).unwrap();
    assert_eq!(product, Combined::uncapped(Magnitude::ONE));
    let sum = registry.evaluate(EffectId::DilationTtGen, &[]).unwrap();
    assert_eq!(sum, Combined::uncapped(Magnitude::ZERO));
}

#[test]
fn test_replication_power_is_neutral_at_one() {
    let combined = registry()
        .evaluate(EffectId::ReplicationPow, &[m(1.5), m(1.25)])
        .unwrap();
    assert!(close(combined.value, 1.75));
    assert!(!combined.capped);
}

#[test]
fn test_softcaps_report_engagement() {
    let registry = registry();
    let below = registry.evaluate(EffectId::DilationPow, &[m(2.0), m(4.0)]).unwrap();
    assert!(close(below.value, 8.0));
    assert!(!below.capped);

    let above = registry.evaluate(EffectId::DilationPow, &[m(2.0), m(13.0)]).unwrap();
    assert!(close(above.value, 14.0));
    assert!(above.capped);

    let rate = registry.evaluate(EffectId::InfinityRate, &[m(0.5), m(0.7)]).unwrap();
    assert!(close(rate.value, 0.8));
    assert!(rate.capped);
}

#[test]
fn test_free_tick_mult_never_reaches_zero() {
    let combined = registry()
        .evaluate(EffectId::TimeFreeTickMult, &[m(1e-3), m(1e-3)])
        .unwrap();
    assert!(close(combined.value, 1e-5));
    assert!(combined.capped);
}

// =============================================================================
// Registration contracts
// =============================================================================

#[test]
fn test_duplicate_registration_is_a_configuration_error() {
    let mut registry = registry();
    let err = registry
        .register(EffectConfig {
            id: EffectId::TimePow,
            applies_to: &[ItemType::Time],
            combinator: Combinator::Product,
            softcap: None,
        })
        .unwrap_err();
    assert!(matches!(err, EngineError::DuplicateEffect { .. }));
    assert!(err.is_configuration());
}

#[test]
fn test_non_neutral_custom_combinator_rejected() {
    let mut registry = EffectRegistry::new(&ItemType::ALL);
    let err = registry
        .register(EffectConfig {
            id: EffectId::PowerMult,
            applies_to: &[ItemType::Power],
            combinator: Combinator::Custom(never_neutral),
            softcap: None,
        })
        .unwrap_err();
    assert_eq!(err.error_code(), "ENGINE_INVARIANT_VIOLATION");
    assert!(registry.is_empty());
}

#[test]
fn test_unknown_item_type_rejected() {
    let mut registry = EffectRegistry::new(&[ItemType::Time]);
    let err = registry
        .register(EffectConfig {
            id: EffectId::TeresaRm,
            applies_to: &[ItemType::Teresa],
            combinator: Combinator::Product,
            softcap: None,
        })
        .unwrap_err();
    assert!(err.is_configuration());
}

#[test]
fn test_unregistered_effect_is_an_error() {
    let registry = EffectRegistry::new(&ItemType::ALL);
    let err = registry.evaluate(EffectId::TimeSpeed, &[]).unwrap_err();
    assert_eq!(err.error_code(), "ENGINE_UNKNOWN_EFFECT");
}

// =============================================================================
// Equipped items and cache
// =============================================================================

#[test]
fn test_only_matching_item_types_contribute() {
    let mut items = EquippedItems::default();
    items.equip(Item::new(ItemType::Time, 1).with_effect(EffectId::TimeSpeed, m(2.0)));
    items.equip(Item::new(ItemType::Power, 1).with_effect(EffectId::TimeSpeed, m(50.0)));
    items.equip(Item::new(ItemType::Time, 1).with_effect(EffectId::TimeSpeed, m(3.0)));
    let combined = registry()
        .evaluate_source(EffectId::TimeSpeed, &items)
        .unwrap();
    assert!(close(combined.value, 6.0));
}

#[test]
fn test_cache_follows_equip_changes() {
    let registry = registry();
    let mut items = EquippedItems::default();
    let mut cache = EffectCache::new();

    let slot = items
        .equip(Item::new(ItemType::Teresa, 1).with_effect(EffectId::TeresaGlyph, m(4.0)))
        .unwrap();
    let first = cache.get(&registry, &items, EffectId::TeresaGlyph).unwrap();
    assert!(close(first.value, 4.0));
    assert_eq!(cache.len(), 1);

    let before = items.generation();
    items.unequip(slot);
    assert_ne!(items.generation(), before);
    let second = cache.get(&registry, &items, EffectId::TeresaGlyph).unwrap();
    assert_eq!(second.value, Magnitude::ZERO);
}

#[test]
fn test_slots_are_limited() {
    let mut items = EquippedItems::with_capacity(2);
    assert_eq!(items.equip(Item::new(ItemType::Time, 1)), Some(0));
    assert_eq!(items.equip(Item::new(ItemType::Time, 2)), Some(1));
    assert_eq!(items.equip(Item::new(ItemType::Time, 3)), None);
    assert_eq!(items.len(), 2);
}
