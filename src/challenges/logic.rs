//! Challenge lifecycle: unlock, start, complete and best-time tracking.

use super::data;
use super::types::{
    ChallengeClass, ChallengeConfig, ChallengeId, ChallengeStatus, UnlockRequirement,
};
use crate::core::constants::AUTO_COMPLETE_ETERNITIES;
use crate::core::error::{EngineError, Result};
use crate::core::game_state::GameState;
use crate::core::magnitude::Magnitude;
use crate::core::reset::{ResetKind, ResetOptions, ResetOrchestrator};
use tracing::info;

/// Handle over one static challenge config. All state lives in
/// [`GameState::challenges`].
#[derive(Debug, Clone, Copy)]
pub struct Challenge {
    config: &'static ChallengeConfig,
}

impl Challenge {
    pub fn get(id: ChallengeId) -> Result<Self> {
        data::config(id)
            .map(|config| Self { config })
            .ok_or_else(|| EngineError::UnknownChallenge { id: id.to_string() })
    }

    pub fn normal(id: u8) -> Result<Self> {
        Self::get(ChallengeId::normal(id))
    }

    pub fn infinity(id: u8) -> Result<Self> {
        Self::get(ChallengeId::infinity(id))
    }

    pub fn id(&self) -> ChallengeId {
        self.config.id
    }

    pub fn config(&self) -> &'static ChallengeConfig {
        self.config
    }

    pub fn goal(&self) -> Magnitude {
        self.config.goal.value()
    }

    pub fn is_unlocked(&self, state: &GameState) -> bool {
        self.config.unlock == UnlockRequirement::Always
            || state.challenges.is_unlocked(self.id())
    }

    /// Directly current, or pulled in by a running challenge's bundle.
    pub fn is_running(&self, state: &GameState) -> bool {
        let id = self.id();
        if state.challenges.current(id.class) == Some(id.id) {
            return true;
        }
        id.class == ChallengeClass::Normal
            && current(state, ChallengeClass::Infinity)
                .is_some_and(|outer| outer.config.bundles.contains(&id.id))
    }

    pub fn is_completed(&self, state: &GameState) -> bool {
        state.challenges.is_completed(self.id())
    }

    pub fn status(&self, state: &GameState) -> ChallengeStatus {
        if self.is_running(state) {
            ChallengeStatus::Running
        } else if self.is_completed(state) {
            ChallengeStatus::Completed
        } else if self.is_unlocked(state) {
            ChallengeStatus::Unlocked
        } else {
            ChallengeStatus::Locked
        }
    }

    /// Returns true only on the call that actually unlocks.
    pub fn unlock(&self, state: &mut GameState) -> bool {
        if self.is_unlocked(state) || !self.config.unlock.is_met(state) {
            return false;
        }
        state.challenges.mark_unlocked(self.id());
        info!(challenge = %self.id(), "Challenge unlocked");
        true
    }

    pub fn start(&self, state: &mut GameState, orchestrator: &mut dyn ResetOrchestrator) -> bool {
        self.start_with_goal(state, orchestrator, None)
    }

    /// Silent no-op while locked or for marker-only challenges.
    pub fn start_with_goal(
        &self,
        state: &mut GameState,
        orchestrator: &mut dyn ResetOrchestrator,
        goal: Option<Magnitude>,
    ) -> bool {
        if !self.config.enterable || !self.is_unlocked(state) {
            return false;
        }
        let id = self.id();
        state.challenges.set_current(id.class, Some(id.id));
        let goal = goal.unwrap_or_else(|| self.goal());
        orchestrator.perform_reset(state, ResetKind::Challenge(id), ResetOptions::with_goal(goal));
        if id.class == ChallengeClass::Infinity {
            state.records.break_infinity = true;
        }
        info!(challenge = %id, goal = %goal, "Challenge started");
        true
    }

    pub fn complete(&self, state: &mut GameState) -> bool {
        if !state.challenges.mark_completed(self.id()) {
            return false;
        }
        info!(challenge = %self.id(), "Challenge completed");
        true
    }

    pub fn best_time(&self, state: &GameState) -> Option<f64> {
        state
            .challenges
            .best_times(self.id().class)
            .get(&self.id().id)
            .copied()
    }

    /// Strict min-accumulator. Returns whether the record changed.
    pub fn record_time(&self, state: &mut GameState, elapsed_ms: f64) -> Result<bool> {
        if !elapsed_ms.is_finite() || elapsed_ms < 0.0 {
            return Err(EngineError::invalid_input(format!(
                "elapsed time must be a finite non-negative number of milliseconds, got {elapsed_ms}"
            )));
        }
        if self.best_time(state).is_some_and(|best| elapsed_ms >= best) {
            return Ok(false);
        }
        state.challenges.set_best_time(self.id(), elapsed_ms);
        Ok(true)
    }

    /// Records the current infinity's elapsed time if this challenge runs.
    pub fn update_time(&self, state: &mut GameState) -> Result<bool> {
        if !self.is_running(state) {
            return Ok(false);
        }
        let elapsed = state.records.this_infinity_ms;
        self.record_time(state, elapsed)
    }
}

// =============================================================================
// Class views
// =============================================================================

pub fn current(state: &GameState, class: ChallengeClass) -> Option<Challenge> {
    let id = state.challenges.current(class)?;
    data::config(ChallengeId { class, id }).map(|config| Challenge { config })
}

pub fn is_any_running(state: &GameState, class: ChallengeClass) -> bool {
    current(state, class).is_some()
}

pub fn completed(state: &GameState, class: ChallengeClass) -> Vec<ChallengeId> {
    state
        .challenges
        .completed()
        .iter()
        .copied()
        .filter(|id| id.class == class)
        .collect()
}

/// Leaves every running challenge through one reset.
pub fn exit_all(state: &mut GameState, orchestrator: &mut dyn ResetOrchestrator) {
    state.challenges.set_current(ChallengeClass::Normal, None);
    state.challenges.set_current(ChallengeClass::Infinity, None);
    orchestrator.perform_reset(state, ResetKind::ExitChallenges, ResetOptions::default());
    info!("Exited all challenges");
}

/// Unlocks infinity challenges in order while antimatter covers the next
/// threshold. Past enough eternities each newly unlocked one is also
/// completed. Returns the ids unlocked by this call.
pub fn try_unlock_infinity_challenges(state: &mut GameState) -> Vec<ChallengeId> {
    let mut unlocked = Vec::new();
    for config in data::all(ChallengeClass::Infinity) {
        let challenge = Challenge { config };
        if challenge.is_unlocked(state) {
            continue;
        }
        if !challenge.unlock(state) {
            break;
        }
        if state.records.eternities > AUTO_COMPLETE_ETERNITIES {
            challenge.complete(state);
        }
        unlocked.push(challenge.id());
    }
    unlocked
}

/// Sum of recorded best times for a class, memoized until the next write.
pub fn best_time_sum(state: &GameState, class: ChallengeClass) -> f64 {
    let cache = state.challenges.aggregates(class);
    if let Some(sum) = cache.sum_ms.get() {
        return sum;
    }
    let sum = state.challenges.best_times(class).values().sum();
    cache.sum_ms.set(Some(sum));
    sum
}

/// Slowest recorded best time for a class, memoized until the next write.
pub fn worst_best_time(state: &GameState, class: ChallengeClass) -> Option<f64> {
    let cache = state.challenges.aggregates(class);
    if let Some(worst) = cache.worst_ms.get() {
        return worst;
    }
    let worst = state
        .challenges
        .best_times(class)
        .values()
        .copied()
        .fold(None, |acc: Option<f64>, t| Some(acc.map_or(t, |a| a.max(t))));
    cache.worst_ms.set(Some(worst));
    worst
}
