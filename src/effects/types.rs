//! Effect identifiers, item types and combination rules.

use crate::core::magnitude::Magnitude;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Type tag carried by every equippable item.
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
    strum::AsRefStr,
)]
#[strum(serialize_all = "snake_case", ascii_case_insensitive)]
pub enum ItemType {
    Time,
    Dilation,
    Replication,
    Infinity,
    Power,
    Teresa,
}

impl ItemType {
    pub const ALL: [ItemType; 6] = [
        ItemType::Time,
        ItemType::Dilation,
        ItemType::Replication,
        ItemType::Infinity,
        ItemType::Power,
        ItemType::Teresa,
    ];
}

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
    strum::AsRefStr,
)]
#[strum(ascii_case_insensitive)]
pub enum EffectId {
    #[strum(serialize = "timepow")]
    TimePow,
    #[strum(serialize = "timespeed")]
    TimeSpeed,
    #[strum(serialize = "timefreeTickMult")]
    TimeFreeTickMult,
    #[strum(serialize = "timeeternity")]
    TimeEternity,
    #[strum(serialize = "dilationdilationMult")]
    DilationDilationMult,
    #[strum(serialize = "dilationgalaxyThreshold")]
    DilationGalaxyThreshold,
    #[strum(serialize = "dilationTTgen")]
    DilationTtGen,
    #[strum(serialize = "dilationpow")]
    DilationPow,
    #[strum(serialize = "replicationspeed")]
    ReplicationSpeed,
    #[strum(serialize = "replicationpow")]
    ReplicationPow,
    #[strum(serialize = "replicationdtgain")]
    ReplicationDtGain,
    #[strum(serialize = "replicationglyphlevel")]
    ReplicationGlyphLevel,
    #[strum(serialize = "infinitypow")]
    InfinityPow,
    #[strum(serialize = "infinityrate")]
    InfinityRate,
    #[strum(serialize = "infinityipgain")]
    InfinityIpGain,
    #[strum(serialize = "infinityinfmult")]
    InfinityInfMult,
    #[strum(serialize = "powerpow")]
    PowerPow,
    #[strum(serialize = "powermult")]
    PowerMult,
    #[strum(serialize = "powerdimboost")]
    PowerDimBoost,
    #[strum(serialize = "powerbuy10")]
    PowerBuy10,
    #[strum(serialize = "teresawormhole")]
    TeresaWormhole,
    #[strum(serialize = "teresarm")]
    TeresaRm,
    #[strum(serialize = "teresaglyph")]
    TeresaGlyph,
    #[strum(serialize = "teresaachievement")]
    TeresaAchievement,
    #[strum(serialize = "teresaforgotten")]
    TeresaForgotten,
    #[strum(serialize = "teresaunknown")]
    TeresaUnknown,
    #[strum(serialize = "teresaantimatter")]
    TeresaAntimatter,
}

impl EffectId {
    pub const ALL: [EffectId; 27] = [
        EffectId::TimePow,
        EffectId::TimeSpeed,
        EffectId::TimeFreeTickMult,
        EffectId::TimeEternity,
        EffectId::DilationDilationMult,
        EffectId::DilationGalaxyThreshold,
        EffectId::DilationTtGen,
        EffectId::DilationPow,
        EffectId::ReplicationSpeed,
        EffectId::ReplicationPow,
        EffectId::ReplicationDtGain,
        EffectId::ReplicationGlyphLevel,
        EffectId::InfinityPow,
        EffectId::InfinityRate,
        EffectId::InfinityIpGain,
        EffectId::InfinityInfMult,
        EffectId::PowerPow,
        EffectId::PowerMult,
        EffectId::PowerDimBoost,
        EffectId::PowerBuy10,
        EffectId::TeresaWormhole,
        EffectId::TeresaRm,
        EffectId::TeresaGlyph,
        EffectId::TeresaAchievement,
        EffectId::TeresaForgotten,
        EffectId::TeresaUnknown,
        EffectId::TeresaAntimatter,
    ];
}

/// Result of combining contributions: the value and whether any cap engaged.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Combined {
    pub value: Magnitude,
    pub capped: bool,
}

impl Combined {
    pub fn uncapped(value: Magnitude) -> Self {
        Self {
            value,
            capped: false,
        }
    }
}

pub type CombineFn = fn(&[Magnitude]) -> Combined;
pub type SoftcapFn = fn(Magnitude) -> Magnitude;

#[derive(Clone, Copy)]
pub enum Combinator {
    Sum,
    Product,
    /// Arbitrary reduction. Must return 0 or 1, uncapped, for no input.
    Custom(CombineFn),
}

impl fmt::Debug for Combinator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Combinator::Sum => f.write_str("Sum"),
            Combinator::Product => f.write_str("Product"),
            Combinator::Custom(_) => f.write_str("Custom"),
        }
    }
}

impl Combinator {
    pub fn combine(&self, values: &[Magnitude]) -> Combined {
        match self {
            Combinator::Sum => Combined::uncapped(values.iter().sum()),
            Combinator::Product => Combined::uncapped(values.iter().product()),
            Combinator::Custom(f) => f(values),
        }
    }
}

/// Declarative description of one effect. Immutable once registered.
#[derive(Debug, Clone, Copy)]
pub struct EffectConfig {
    pub id: EffectId,
    pub applies_to: &'static [ItemType],
    pub combinator: Combinator,
    pub softcap: Option<SoftcapFn>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;

    #[test]
    fn test_effect_ids_parse_from_names() {
        assert_eq!(EffectId::from_str("timefreeTickMult"), Ok(EffectId::TimeFreeTickMult));
        assert_eq!(EffectId::from_str("DILATIONTTGEN"), Ok(EffectId::DilationTtGen));
        assert_eq!(EffectId::PowerBuy10.to_string(), "powerbuy10");
        assert!(EffectId::from_str("cursedgalaxies").is_err());
    }

    #[test]
    fn test_all_effect_names_unique() {
        let mut names: Vec<String> = EffectId::ALL.iter().map(|e| e.to_string()).collect();
        names.sort();
        names.dedup();
        assert_eq!(names.len(), EffectId::ALL.len());
    }

    #[test]
    fn test_builtin_combinators_on_empty_input() {
        assert_eq!(
            Combinator::Sum.combine(&[]),
            Combined::uncapped(Magnitude::ZERO)
        );
        assert_eq!(
            Combinator::Product.combine(&[]),
            Combined::uncapped(Magnitude::ONE)
        );
    }

    #[test]
    fn test_sum_and_product() {
        let values = [Magnitude::from(2u32), Magnitude::from(5u32)];
        assert_eq!(Combinator::Sum.combine(&values).value, Magnitude::from(7u32));
        assert_eq!(
            Combinator::Product.combine(&values).value,
            Magnitude::from(10u32)
        );
    }
}
