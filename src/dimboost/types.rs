use crate::challenges::data::{
    BOOST_BONUS_CHALLENGE, BOOST_LIMIT_CHALLENGE, RESTRICTED_TIERS_CHALLENGE,
};
use crate::challenges::{Challenge, ChallengeId};
use crate::core::constants::{
    BOOST_LIMIT_CHALLENGE_MAX, BOOST_LIMIT_CHALLENGE_MAX_RESTRICTED, MAX_DIMENSION_TIERS,
    RESTRICTED_DIMENSION_TIERS,
};
use crate::core::game_state::{DimensionState, GameState};
use crate::core::magnitude::Magnitude;
use serde::{Deserialize, Serialize};

/// Amount of one dimension tier a boost needs.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DimBoostRequirement {
    /// 1-based dimension tier.
    pub tier: u8,
    pub amount: f64,
}

impl DimBoostRequirement {
    pub fn is_satisfied(&self, dims: &DimensionState) -> bool {
        dims.amount(self.tier) >= Magnitude::from_f64(self.amount)
    }
}

/// Everything besides the boost count that shapes a requirement.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DimBoostModes {
    pub max_tiers: u8,
    pub cubic_surcharge: bool,
    /// Subtracted from the per-boost step at tiers six and eight.
    pub discount: f64,
    pub flat_reduction: f64,
    /// Takes one more off every requirement.
    pub flat_bonus_completed: bool,
    pub charged_multiplier: f64,
    /// Boosts past this buy nothing; `None` when unlimited.
    pub boost_cap: Option<u64>,
    /// Scales the base boost power.
    pub power_multiplier: f64,
    /// Antimatter is past the infinity limit without the limit broken.
    pub infinity_locked: bool,
}

impl Default for DimBoostModes {
    fn default() -> Self {
        Self {
            max_tiers: MAX_DIMENSION_TIERS,
            cubic_surcharge: false,
            discount: 0.0,
            flat_reduction: 0.0,
            flat_bonus_completed: false,
            charged_multiplier: 1.0,
            boost_cap: None,
            power_multiplier: 1.0,
            infinity_locked: false,
        }
    }
}

fn running(state: &GameState, id: ChallengeId) -> bool {
    Challenge::get(id).is_ok_and(|challenge| challenge.is_running(state))
}

impl DimBoostModes {
    pub fn from_state(state: &GameState) -> Self {
        let restricted = running(state, RESTRICTED_TIERS_CHALLENGE);
        let boost_cap = running(state, BOOST_LIMIT_CHALLENGE).then_some(if restricted {
            BOOST_LIMIT_CHALLENGE_MAX_RESTRICTED
        } else {
            BOOST_LIMIT_CHALLENGE_MAX
        });
        Self {
            max_tiers: if restricted {
                RESTRICTED_DIMENSION_TIERS
            } else {
                MAX_DIMENSION_TIERS
            },
            cubic_surcharge: state.dimensions.cubic_surcharge,
            discount: state.dimensions.requirement_discount,
            flat_reduction: state.dimensions.requirement_reduction,
            flat_bonus_completed: state.challenges.is_completed(BOOST_BONUS_CHALLENGE),
            charged_multiplier: state.dimensions.charged_multiplier,
            boost_cap,
            power_multiplier: 1.0,
            infinity_locked: !state.records.break_infinity
                && state.antimatter() > Magnitude::number_max(),
        }
    }

    pub fn with_power_multiplier(mut self, multiplier: f64) -> Self {
        self.power_multiplier = multiplier;
        self
    }
}
