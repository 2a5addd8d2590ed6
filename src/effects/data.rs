//! Built-in effect table plus the custom combinators and softcaps it uses.

use super::types::{Combinator, Combined, EffectConfig, EffectId, ItemType};
use crate::core::magnitude::Magnitude;

const TIME: &[ItemType] = &[ItemType::Time];
const DILATION: &[ItemType] = &[ItemType::Dilation];
const REPLICATION: &[ItemType] = &[ItemType::Replication];
const INFINITY: &[ItemType] = &[ItemType::Infinity];
const POWER: &[ItemType] = &[ItemType::Power];
const TERESA: &[ItemType] = &[ItemType::Teresa];

/// Contributors past which the glyph-level combinator starts tapering.
const TAPER_THRESHOLD: usize = 2;
const GLYPH_LEVEL_KNEE: f64 = 0.1;

// =============================================================================
// Custom combinators
// =============================================================================

/// Additive, but neutral at 1: `1 + Σ(v - 1)`.
pub fn replication_power(values: &[Magnitude]) -> Combined {
    let sum: Magnitude = values.iter().sum();
    Combined::uncapped(sum + Magnitude::ONE - Magnitude::from(values.len() as u64))
}

/// Additive with a taper once more than two items contribute, and a hard
/// knee at 0.1 past which growth is cut to a fifth.
pub fn glyph_level_taper(values: &[Magnitude]) -> Combined {
    let mut sum: f64 = values.iter().map(Magnitude::to_f64).sum();
    let tapered = values.len() > TAPER_THRESHOLD;
    if tapered {
        sum *= 6.0 / (values.len() as f64 + 4.0);
    }
    if sum > GLYPH_LEVEL_KNEE {
        Combined {
            value: Magnitude::from_f64(GLYPH_LEVEL_KNEE + 0.2 * (sum - GLYPH_LEVEL_KNEE)),
            capped: true,
        }
    } else {
        Combined {
            value: Magnitude::from_f64(sum),
            capped: tapered,
        }
    }
}

/// Full-range product for effects that leave f64 range.
pub fn magnitude_product(values: &[Magnitude]) -> Combined {
    Combined::uncapped(values.iter().product())
}

// =============================================================================
// Softcaps
// =============================================================================

/// Keeps a shrinking multiplier from reaching zero.
pub fn floor_at_epsilon(value: Magnitude) -> Magnitude {
    value.max(Magnitude::from_f64(1e-5))
}

/// `10 + sqrt(v - 10)` past 10.
pub fn sqrt_past_ten(value: Magnitude) -> Magnitude {
    let ten = Magnitude::from(10u32);
    if value > ten {
        ten + (value - ten).pow(0.5)
    } else {
        value
    }
}

/// `0.7 + 0.2 (v - 0.7)` past 0.7.
pub fn linear_past_point_seven(value: Magnitude) -> Magnitude {
    let knee = Magnitude::from_f64(0.7);
    if value > knee {
        knee + Magnitude::from_f64(0.2) * (value - knee)
    } else {
        value
    }
}

const fn config(
    id: EffectId,
    applies_to: &'static [ItemType],
    combinator: Combinator,
) -> EffectConfig {
    EffectConfig {
        id,
        applies_to,
        combinator,
        softcap: None,
    }
}

static BUILTIN_EFFECTS: [EffectConfig; 27] = [
    config(EffectId::TimePow, TIME, Combinator::Product),
    config(EffectId::TimeSpeed, TIME, Combinator::Product),
    EffectConfig {
        id: EffectId::TimeFreeTickMult,
        applies_to: TIME,
        combinator: Combinator::Product,
        softcap: Some(floor_at_epsilon),
    },
    config(EffectId::TimeEternity, TIME, Combinator::Product),
    config(EffectId::DilationDilationMult, DILATION, Combinator::Product),
    config(EffectId::DilationGalaxyThreshold, DILATION, Combinator::Product),
    config(EffectId::DilationTtGen, DILATION, Combinator::Sum),
    EffectConfig {
        id: EffectId::DilationPow,
        applies_to: DILATION,
        combinator: Combinator::Product,
        softcap: Some(sqrt_past_ten),
    },
    config(EffectId::ReplicationSpeed, REPLICATION, Combinator::Product),
    config(
        EffectId::ReplicationPow,
        REPLICATION,
        Combinator::Custom(replication_power),
    ),
    config(EffectId::ReplicationDtGain, REPLICATION, Combinator::Sum),
    config(
        EffectId::ReplicationGlyphLevel,
        REPLICATION,
        Combinator::Custom(glyph_level_taper),
    ),
    config(EffectId::InfinityPow, INFINITY, Combinator::Product),
    EffectConfig {
        id: EffectId::InfinityRate,
        applies_to: INFINITY,
        combinator: Combinator::Sum,
        softcap: Some(linear_past_point_seven),
    },
    config(EffectId::InfinityIpGain, INFINITY, Combinator::Product),
    config(EffectId::InfinityInfMult, INFINITY, Combinator::Product),
    config(EffectId::PowerPow, POWER, Combinator::Product),
    config(
        EffectId::PowerMult,
        POWER,
        Combinator::Custom(magnitude_product),
    ),
    config(EffectId::PowerDimBoost, POWER, Combinator::Product),
    config(EffectId::PowerBuy10, POWER, Combinator::Product),
    config(EffectId::TeresaWormhole, TERESA, Combinator::Product),
    config(EffectId::TeresaRm, TERESA, Combinator::Product),
    config(EffectId::TeresaGlyph, TERESA, Combinator::Sum),
    config(EffectId::TeresaAchievement, TERESA, Combinator::Product),
    config(EffectId::TeresaForgotten, TERESA, Combinator::Product),
    config(EffectId::TeresaUnknown, TERESA, Combinator::Product),
    config(EffectId::TeresaAntimatter, TERESA, Combinator::Product),
];

pub fn builtin_effects() -> &'static [EffectConfig] {
    &BUILTIN_EFFECTS
}
