//! Reset orchestration seam.
//!
//! The engine never wipes progress itself. Challenge starts, boosts and
//! cataclysms ask a [`ResetOrchestrator`] to do it and only re-read state
//! afterwards.

use super::game_state::GameState;
use super::magnitude::Magnitude;
use crate::challenges::ChallengeId;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ResetKind {
    /// Entering a challenge.
    Challenge(ChallengeId),
    /// Leaving every running challenge.
    ExitChallenges,
    DimensionBoost,
    /// Celestial cataclysm.
    Armageddon,
    /// Entering doom mode.
    Doom,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct ResetOptions {
    /// Goal override for the run that starts after the reset.
    pub goal: Option<Magnitude>,
    /// Skip the orchestrator's own eligibility checks.
    pub force: bool,
}

impl ResetOptions {
    pub fn with_goal(goal: Magnitude) -> Self {
        Self {
            goal: Some(goal),
            force: false,
        }
    }

    pub fn forced() -> Self {
        Self {
            goal: None,
            force: true,
        }
    }
}

pub trait ResetOrchestrator {
    fn perform_reset(&mut self, state: &mut GameState, kind: ResetKind, options: ResetOptions);
}

/// Orchestrator that leaves state alone.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoopOrchestrator;

impl ResetOrchestrator for NoopOrchestrator {
    fn perform_reset(&mut self, _state: &mut GameState, _kind: ResetKind, _options: ResetOptions) {}
}

/// Orchestrator that only records what it was asked to do.
#[derive(Debug, Clone, Default)]
pub struct RecordingOrchestrator {
    pub calls: Vec<(ResetKind, ResetOptions)>,
}

impl RecordingOrchestrator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn count(&self, kind: ResetKind) -> usize {
        self.calls.iter().filter(|(k, _)| *k == kind).count()
    }

    pub fn last(&self) -> Option<&(ResetKind, ResetOptions)> {
        self.calls.last()
    }
}

impl ResetOrchestrator for RecordingOrchestrator {
    fn perform_reset(&mut self, _state: &mut GameState, kind: ResetKind, options: ResetOptions) {
        self.calls.push((kind, options));
    }
}
