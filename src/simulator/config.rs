//! Simulation configuration.

use crate::core::constants::TICK_INTERVAL_MS;

/// Configuration for a simulation run.
#[derive(Debug, Clone)]
pub struct SimConfig {
    /// Number of simulation runs to perform
    pub num_runs: u32,

    /// Random seed for reproducibility (None = random)
    pub seed: Option<u64>,

    /// Maximum engine ticks per run before timeout
    pub max_ticks_per_run: u64,

    /// Real time covered by one tick, in milliseconds
    pub tick_ms: f64,

    /// Infinities a run needs to count as completed
    pub target_infinities: u64,

    /// Chance per tick of trying a random upgrade purchase
    pub purchase_chance: f64,

    /// Whether to enter and clear challenges
    pub simulate_challenges: bool,

    /// Infinity count at which the run enters doom (None = never)
    pub doom_after_infinities: Option<u64>,

    /// Log verbosity (0 = silent, 1 = summary, 2 = per run)
    pub verbosity: u8,
}

impl Default for SimConfig {
    fn default() -> Self {
        Self {
            num_runs: 100,
            seed: None,
            max_ticks_per_run: 200_000,
            tick_ms: TICK_INTERVAL_MS,
            target_infinities: 5,
            purchase_chance: 0.05,
            simulate_challenges: true,
            doom_after_infinities: None,
            verbosity: 1,
        }
    }
}

impl SimConfig {
    /// Quick config for checking early pacing
    pub fn quick() -> Self {
        Self {
            num_runs: 20,
            max_ticks_per_run: 50_000,
            target_infinities: 1,
            simulate_challenges: false,
            ..Default::default()
        }
    }

    /// Runs that reach doom early and spend most of their time in it
    pub fn doom_cycle_test() -> Self {
        Self {
            num_runs: 25,
            target_infinities: 4,
            doom_after_infinities: Some(1),
            ..Default::default()
        }
    }

    /// Challenge pacing: long runs with challenges always on
    pub fn challenge_sweep(num_runs: u32) -> Self {
        Self {
            num_runs,
            max_ticks_per_run: 400_000,
            target_infinities: 12,
            simulate_challenges: true,
            ..Default::default()
        }
    }
}
