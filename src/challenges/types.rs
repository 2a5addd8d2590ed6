//! Challenge identifiers, static configuration and persisted progress.

use crate::core::game_state::GameState;
use crate::core::magnitude::Magnitude;
use serde::{Deserialize, Serialize};
use std::cell::Cell;
use std::collections::BTreeMap;
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
pub enum ChallengeClass {
    Normal,
    Infinity,
}

impl ChallengeClass {
    pub const ALL: [ChallengeClass; 2] = [ChallengeClass::Normal, ChallengeClass::Infinity];

    fn index(self) -> usize {
        match self {
            ChallengeClass::Normal => 0,
            ChallengeClass::Infinity => 1,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct ChallengeId {
    pub class: ChallengeClass,
    pub id: u8,
}

impl ChallengeId {
    pub const fn normal(id: u8) -> Self {
        Self {
            class: ChallengeClass::Normal,
            id,
        }
    }

    pub const fn infinity(id: u8) -> Self {
        Self {
            class: ChallengeClass::Infinity,
            id,
        }
    }
}

impl fmt::Display for ChallengeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.class {
            ChallengeClass::Normal => write!(f, "challenge{}", self.id),
            ChallengeClass::Infinity => write!(f, "postc{}", self.id),
        }
    }
}

/// Derived lifecycle state. Running wins over Completed, which wins over
/// Unlocked.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, strum::Display)]
#[strum(serialize_all = "snake_case")]
pub enum ChallengeStatus {
    Locked,
    Unlocked,
    Running,
    Completed,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Goal {
    /// Largest finite double.
    NumberMax,
    /// `10^x`.
    PowerOfTen(f64),
}

impl Goal {
    pub fn value(&self) -> Magnitude {
        match *self {
            Goal::NumberMax => Magnitude::number_max(),
            Goal::PowerOfTen(exponent) => Magnitude::pow10(exponent),
        }
    }
}

/// Progress predicate guarding `unlock`. Every variant is monotone in
/// progress: once met it stays met.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum UnlockRequirement {
    Always,
    Infinities(u64),
    /// Current antimatter at least `10^x`.
    AntimatterLog10(f64),
}

impl UnlockRequirement {
    pub fn is_met(&self, state: &GameState) -> bool {
        match *self {
            UnlockRequirement::Always => true,
            UnlockRequirement::Infinities(n) => state.records.infinities >= n,
            UnlockRequirement::AntimatterLog10(exponent) => {
                state.antimatter() >= Magnitude::pow10(exponent)
            }
        }
    }
}

#[derive(Debug, Clone, Copy)]
pub struct ChallengeConfig {
    pub id: ChallengeId,
    pub goal: Goal,
    pub unlock: UnlockRequirement,
    /// Some challenges exist only as a completion marker and cannot be entered.
    pub enterable: bool,
    /// Normal challenges that also count as running while this one runs.
    pub bundles: &'static [u8],
}

/// Lazily computed best-time aggregates for one class.
#[derive(Debug, Clone, Default)]
pub(crate) struct TimeAggregates {
    pub(crate) sum_ms: Cell<Option<f64>>,
    pub(crate) worst_ms: Cell<Option<Option<f64>>>,
}

impl TimeAggregates {
    fn invalidate(&self) {
        self.sum_ms.set(None);
        self.worst_ms.set(None);
    }
}

/// Persisted challenge progress. Fields are only reachable through methods
/// so every best-time write drops the memoized aggregates.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ChallengeProgress {
    current_normal: Option<u8>,
    current_infinity: Option<u8>,
    /// Append-only; a challenge appears at most once.
    completed: Vec<ChallengeId>,
    unlocked: Vec<ChallengeId>,
    /// Best completion time in milliseconds; absent means no record.
    normal_best_ms: BTreeMap<u8, f64>,
    infinity_best_ms: BTreeMap<u8, f64>,
    #[serde(skip)]
    aggregates: [TimeAggregates; 2],
}

impl ChallengeProgress {
    pub fn current(&self, class: ChallengeClass) -> Option<u8> {
        match class {
            ChallengeClass::Normal => self.current_normal,
            ChallengeClass::Infinity => self.current_infinity,
        }
    }

    pub fn set_current(&mut self, class: ChallengeClass, id: Option<u8>) {
        match class {
            ChallengeClass::Normal => self.current_normal = id,
            ChallengeClass::Infinity => self.current_infinity = id,
        }
    }

    pub fn completed(&self) -> &[ChallengeId] {
        &self.completed
    }

    pub fn is_completed(&self, id: ChallengeId) -> bool {
        self.completed.contains(&id)
    }

    /// False when already present.
    pub fn mark_completed(&mut self, id: ChallengeId) -> bool {
        if self.is_completed(id) {
            return false;
        }
        self.completed.push(id);
        true
    }

    pub fn unlocked(&self) -> &[ChallengeId] {
        &self.unlocked
    }

    pub fn is_unlocked(&self, id: ChallengeId) -> bool {
        self.unlocked.contains(&id)
    }

    /// False when already present.
    pub fn mark_unlocked(&mut self, id: ChallengeId) -> bool {
        if self.is_unlocked(id) {
            return false;
        }
        self.unlocked.push(id);
        true
    }

    pub fn best_times(&self, class: ChallengeClass) -> &BTreeMap<u8, f64> {
        match class {
            ChallengeClass::Normal => &self.normal_best_ms,
            ChallengeClass::Infinity => &self.infinity_best_ms,
        }
    }

    fn best_times_mut(&mut self, class: ChallengeClass) -> &mut BTreeMap<u8, f64> {
        match class {
            ChallengeClass::Normal => &mut self.normal_best_ms,
            ChallengeClass::Infinity => &mut self.infinity_best_ms,
        }
    }

    /// Stores a best time and drops the class aggregates.
    pub fn set_best_time(&mut self, id: ChallengeId, elapsed_ms: f64) {
        self.best_times_mut(id.class).insert(id.id, elapsed_ms);
        self.aggregates[id.class.index()].invalidate();
    }

    /// Replaces a whole class of best times, e.g. from an imported save.
    /// Negative and non-finite entries are skipped.
    pub fn replace_best_times(&mut self, class: ChallengeClass, times: BTreeMap<u8, f64>) {
        let valid = times
            .into_iter()
            .filter(|(_, ms)| ms.is_finite() && *ms >= 0.0)
            .collect();
        *self.best_times_mut(class) = valid;
        self.aggregates[class.index()].invalidate();
    }

    pub(crate) fn aggregates(&self, class: ChallengeClass) -> &TimeAggregates {
        &self.aggregates[class.index()]
    }

    /// Whether the class aggregates are currently memoized.
    pub fn aggregates_cached(&self, class: ChallengeClass) -> bool {
        let cache = self.aggregates(class);
        cache.sum_ms.get().is_some() || cache.worst_ms.get().is_some()
    }
}
