//! Effect registration and evaluation.

use super::data::builtin_effects;
use super::equipped::ModifierSource;
use super::types::{Combinator, Combined, EffectConfig, EffectId, ItemType};
use crate::core::error::{EngineError, Result};
use crate::core::magnitude::Magnitude;
use std::collections::BTreeMap;
use tracing::warn;

#[derive(Debug, Clone)]
pub struct EffectRegistry {
    known_types: Vec<ItemType>,
    configs: BTreeMap<EffectId, EffectConfig>,
}

impl EffectRegistry {
    pub fn new(known_types: &[ItemType]) -> Self {
        Self {
            known_types: known_types.to_vec(),
            configs: BTreeMap::new(),
        }
    }

    /// Registry over every item type holding the built-in table.
    /// Fails on the first invalid entry.
    pub fn with_builtins() -> Result<Self> {
        let mut registry = Self::new(&ItemType::ALL);
        for config in builtin_effects() {
            registry.register(*config)?;
        }
        Ok(registry)
    }

    pub fn register(&mut self, config: EffectConfig) -> Result<()> {
        if let Err(err) = self.check(&config) {
            warn!(effect = %config.id, code = err.error_code(), %err, "Rejected effect registration");
            return Err(err);
        }
        self.configs.insert(config.id, config);
        Ok(())
    }

    fn check(&self, config: &EffectConfig) -> Result<()> {
        if self.configs.contains_key(&config.id) {
            return Err(EngineError::DuplicateEffect {
                id: config.id.to_string(),
            });
        }
        if config.applies_to.is_empty() {
            return Err(EngineError::invariant(config.id, "applies to no item types"));
        }
        if let Some(unknown) = config
            .applies_to
            .iter()
            .find(|t| !self.known_types.contains(*t))
        {
            return Err(EngineError::invariant(
                config.id,
                format!("references unknown item type {unknown}"),
            ));
        }
        if let Combinator::Custom(combine) = config.combinator {
            let empty = combine(&[]);
            let neutral = empty.value == Magnitude::ZERO || empty.value == Magnitude::ONE;
            if !neutral || empty.capped {
                return Err(EngineError::invariant(
                    config.id,
                    format!(
                        "combinator must return an uncapped 0 or 1 for no input, got {} (capped: {})",
                        empty.value, empty.capped
                    ),
                ));
            }
        }
        Ok(())
    }

    pub fn config(&self, id: EffectId) -> Option<&EffectConfig> {
        self.configs.get(&id)
    }

    pub fn contains(&self, id: EffectId) -> bool {
        self.configs.contains_key(&id)
    }

    pub fn len(&self) -> usize {
        self.configs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.configs.is_empty()
    }

    /// Combines `values`, then applies the softcap if one is configured.
    /// `capped` is set when the combinator reported a cap or the softcap
    /// changed the value.
    pub fn evaluate(&self, id: EffectId, values: &[Magnitude]) -> Result<Combined> {
        let config = self.configs.get(&id).ok_or_else(|| EngineError::UnknownEffect {
            id: id.to_string(),
        })?;
        let raw = config.combinator.combine(values);
        Ok(match config.softcap {
            Some(softcap) => {
                let value = softcap(raw.value);
                Combined {
                    value,
                    capped: raw.capped || value != raw.value,
                }
            }
            None => raw,
        })
    }

    /// Evaluates against whatever the source currently has equipped.
    pub fn evaluate_source(&self, id: EffectId, source: &dyn ModifierSource) -> Result<Combined> {
        let config = self.configs.get(&id).ok_or_else(|| EngineError::UnknownEffect {
            id: id.to_string(),
        })?;
        let values = source.contributions(id, config.applies_to);
        self.evaluate(id, &values)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::effects::data::{floor_at_epsilon, sqrt_past_ten};

    fn m(v: f64) -> Magnitude {
        Magnitude::from_f64(v)
    }

    fn non_neutral(_: &[Magnitude]) -> Combined {
        Combined::uncapped(Magnitude::from(2u32))
    }

    fn capped_on_empty(_: &[Magnitude]) -> Combined {
        Combined {
            value: Magnitude::ZERO,
            capped: true,
        }
    }

    #[test]
    fn test_builtins_register() {
        let registry = EffectRegistry::with_builtins().unwrap();
        assert_eq!(registry.len(), 27);
        assert!(registry.contains(EffectId::PowerMult));
    }

    #[test]
    fn test_empty_evaluation_is_neutral() {
        let registry = EffectRegistry::with_builtins().unwrap();
        assert_eq!(
            registry.evaluate(EffectId::DilationTtGen, &[]).unwrap(),
            Combined::uncapped(Magnitude::ZERO)
        );
        assert_eq!(
            registry.evaluate(EffectId::TimePow, &[]).unwrap(),
            Combined::uncapped(Magnitude::ONE)
        );
    }

    #[test]
    fn test_softcap_reports_capping() {
        let registry = EffectRegistry::with_builtins().unwrap();
        let below = registry.evaluate(EffectId::DilationPow, &[m(2.0), m(3.0)]).unwrap();
        assert_eq!(below, Combined::uncapped(m(6.0)));

        let above = registry.evaluate(EffectId::DilationPow, &[m(13.0), m(2.0)]).unwrap();
        assert!(above.capped);
        assert_eq!(above.value, m(14.0));
    }

    #[test]
    fn test_rejects_non_neutral_custom_combinator() {
        let mut registry = EffectRegistry::new(&ItemType::ALL);
        let err = registry
            .register(EffectConfig {
                id: EffectId::TimePow,
                applies_to: &[ItemType::Time],
                combinator: Combinator::Custom(non_neutral),
                softcap: None,
            })
            .unwrap_err();
        assert!(err.is_configuration());
        assert!(registry.is_empty());

        let err = registry
            .register(EffectConfig {
                id: EffectId::TimePow,
                applies_to: &[ItemType::Time],
                combinator: Combinator::Custom(capped_on_empty),
                softcap: None,
            })
            .unwrap_err();
        assert_eq!(err.error_code(), "ENGINE_INVARIANT_VIOLATION");
    }

    #[test]
    fn test_rejects_unknown_item_type() {
        let mut registry = EffectRegistry::new(&[ItemType::Time, ItemType::Power]);
        let err = registry
            .register(EffectConfig {
                id: EffectId::TeresaRm,
                applies_to: &[ItemType::Teresa],
                combinator: Combinator::Product,
                softcap: None,
            })
            .unwrap_err();
        assert!(err.to_string().contains("teresa"));
    }

    #[test]
    fn test_rejects_empty_type_list() {
        let mut registry = EffectRegistry::new(&ItemType::ALL);
        assert!(registry
            .register(EffectConfig {
                id: EffectId::TimeSpeed,
                applies_to: &[],
                combinator: Combinator::Sum,
                softcap: None,
            })
            .is_err());
    }

    #[test]
    fn test_rejects_duplicate_registration() {
        let mut registry = EffectRegistry::new(&ItemType::ALL);
        let config = EffectConfig {
            id: EffectId::TimeFreeTickMult,
            applies_to: &[ItemType::Time],
            combinator: Combinator::Product,
            softcap: Some(floor_at_epsilon),
        };
        registry.register(config).unwrap();
        let err = registry.register(config).unwrap_err();
        assert_eq!(
            err,
            EngineError::DuplicateEffect {
                id: "timefreeTickMult".into()
            }
        );
        assert_eq!(registry.len(), 1);
    }

    #[test]
    fn test_unknown_effect_on_evaluate() {
        let mut registry = EffectRegistry::new(&ItemType::ALL);
        registry
            .register(EffectConfig {
                id: EffectId::DilationPow,
                applies_to: &[ItemType::Dilation],
                combinator: Combinator::Product,
                softcap: Some(sqrt_past_ten),
            })
            .unwrap();
        let err = registry.evaluate(EffectId::PowerPow, &[]).unwrap_err();
        assert_eq!(err.error_code(), "ENGINE_UNKNOWN_EFFECT");
    }
}
