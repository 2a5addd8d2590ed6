//! Static challenge tables.

use super::types::{ChallengeClass, ChallengeConfig, ChallengeId, Goal, UnlockRequirement};

/// Normal challenges that infinity challenge 1 runs alongside itself.
const IC1_BUNDLE: &[u8] = &[1, 2, 3, 4, 5, 6, 7, 8, 10, 11];

/// Normal challenge that caps unlockable dimension tiers at six.
pub const RESTRICTED_TIERS_CHALLENGE: ChallengeId = ChallengeId::normal(10);
/// Normal challenge that limits dimension boosts.
pub const BOOST_LIMIT_CHALLENGE: ChallengeId = ChallengeId::normal(8);
/// Completing this one takes one off every boost requirement.
pub const BOOST_BONUS_CHALLENGE: ChallengeId = ChallengeId::infinity(5);

const fn normal(id: u8, enterable: bool) -> ChallengeConfig {
    ChallengeConfig {
        id: ChallengeId::normal(id),
        goal: Goal::NumberMax,
        unlock: if id == 1 {
            UnlockRequirement::Always
        } else {
            UnlockRequirement::Infinities(1)
        },
        enterable,
        bundles: &[],
    }
}

const fn infinity(id: u8, goal_log10: f64, unlock_log10: f64) -> ChallengeConfig {
    ChallengeConfig {
        id: ChallengeId::infinity(id),
        goal: Goal::PowerOfTen(goal_log10),
        unlock: UnlockRequirement::AntimatterLog10(unlock_log10),
        enterable: true,
        bundles: if id == 1 { IC1_BUNDLE } else { &[] },
    }
}

static NORMAL_CHALLENGES: [ChallengeConfig; 12] = [
    normal(1, false),
    normal(2, true),
    normal(3, true),
    normal(4, true),
    normal(5, true),
    normal(6, true),
    normal(7, true),
    normal(8, true),
    normal(9, true),
    normal(10, true),
    normal(11, true),
    normal(12, true),
];

// Unlock thresholds rise strictly so unlocking stays sequential.
static INFINITY_CHALLENGES: [ChallengeConfig; 8] = [
    infinity(1, 650.0, 2000.0),
    infinity(2, 10500.0, 11000.0),
    infinity(3, 5000.0, 12000.0),
    infinity(4, 13000.0, 14000.0),
    infinity(5, 16500.0, 18000.0),
    infinity(6, 22222.301_029_995_66, 22500.0),
    infinity(7, 10000.0, 23000.0),
    infinity(8, 27000.0, 28000.0),
];

pub fn all(class: ChallengeClass) -> &'static [ChallengeConfig] {
    match class {
        ChallengeClass::Normal => &NORMAL_CHALLENGES,
        ChallengeClass::Infinity => &INFINITY_CHALLENGES,
    }
}

pub fn config(id: ChallengeId) -> Option<&'static ChallengeConfig> {
    all(id.class).iter().find(|config| config.id == id)
}
