//! Challenge state machine.
//!
//! A challenge moves `Locked -> Unlocked -> Running -> Completed`, may be
//! re-entered once completed, and never goes back to locked. Each class has
//! a single current slot.

pub mod data;
pub mod logic;
pub mod types;

pub use logic::{
    best_time_sum, completed, current, exit_all, is_any_running, try_unlock_infinity_challenges,
    worst_best_time, Challenge,
};
pub use types::{
    ChallengeClass, ChallengeConfig, ChallengeId, ChallengeProgress, ChallengeStatus, Goal,
    UnlockRequirement,
};
