//! Main simulation runner driving the real engine.
//!
//! Statistics are tracked externally from [`TickResult`] events and from the
//! reset handler's counters.

use super::config::SimConfig;
use super::production::produce;
use super::report::{RunStats, SimReport};
use super::reset_handler::{reset_infinity, SimResetHandler};
use crate::celestial::{CelestialInputs, TimedCurrency};
use crate::challenges::{self, Challenge, ChallengeClass, ChallengeId, ChallengeStatus};
use crate::core::currency::CurrencyId;
use crate::core::engine::Engine;
use crate::core::error::Result;
use crate::core::game_loop::GameLoop;
use crate::core::magnitude::Magnitude;
use crate::core::tick::{TickEvent, TickResult};
use crate::upgrades::{self, UpgradeKey};
use rand::seq::SliceRandom;
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use tracing::{debug, info};

/// Outer-layer currencies each infinity pays into, standing in for the
/// layers above antimatter that this crate does not model.
const OUTER_CURRENCIES: [CurrencyId; 5] = [
    CurrencyId::InfinityPoints,
    CurrencyId::EternityPoints,
    CurrencyId::TachyonParticles,
    CurrencyId::DilatedTime,
    CurrencyId::RealityMachines,
];

/// Chance per tick of starting a challenge when none is running.
const CHALLENGE_CHANCE: f64 = 0.001;

/// Run the full simulation and return a report.
pub fn run_simulation(config: &SimConfig) -> Result<SimReport> {
    let mut all_runs = Vec::with_capacity(config.num_runs as usize);

    for run_idx in 0..config.num_runs {
        // Create RNG for this run
        let mut rng = match config.seed {
            Some(seed) => ChaCha8Rng::seed_from_u64(seed.wrapping_add(u64::from(run_idx))),
            None => ChaCha8Rng::from_entropy(),
        };

        let run_stats = simulate_single_run(config, &mut rng)?;
        if config.verbosity >= 2 {
            info!(
                run = run_idx + 1,
                of = config.num_runs,
                infinities = run_stats.infinities,
                boosts = run_stats.total_boosts,
                challenges = run_stats.challenges_completed,
                cataclysms = run_stats.cataclysms,
                "Run finished"
            );
        }
        all_runs.push(run_stats);
    }

    Ok(SimReport::from_runs(all_runs, config.max_ticks_per_run))
}

/// Tracks statistics during a simulation run.
/// Accumulates data from TickResult events.
#[derive(Debug, Default)]
struct SimStats {
    total_boosts: u64,
    upgrades_bought: u64,
    challenges_completed: u64,
    infinity_challenges_unlocked: u64,
    cataclysms: u64,
    remnants_earned: f64,
    timed_grants: [f64; 3],
    first_infinity_tick: Option<u64>,
}

impl SimStats {
    fn process_tick(&mut self, result: &TickResult) {
        for event in &result.events {
            match event {
                TickEvent::InfinityChallengeUnlocked { .. } => {
                    self.infinity_challenges_unlocked += 1;
                }
                TickEvent::Cataclysm { remnants } => {
                    self.cataclysms += 1;
                    self.remnants_earned += remnants.to_f64();
                }
                TickEvent::TimedCurrencyGranted { currency, amount } => {
                    let slot = match currency {
                        TimedCurrency::Famine => 0,
                        TimedCurrency::Pestilence => 1,
                        TimedCurrency::Chaos => 2,
                    };
                    self.timed_grants[slot] += amount.to_f64();
                }
                TickEvent::CostScaleRefresh => {}
            }
        }
    }
}

fn simulate_single_run(config: &SimConfig, rng: &mut ChaCha8Rng) -> Result<RunStats> {
    let mut engine = Engine::new(SimResetHandler::default())?;
    let mut stats = SimStats::default();
    let mut inputs = CelestialInputs::default();
    let mut ticks = 0;

    while ticks < config.max_ticks_per_run {
        ticks += 1;
        inputs.antimatter_per_second = produce(&mut engine, config.tick_ms)?;
        let result = engine.tick(config.tick_ms, &inputs)?;
        stats.process_tick(&result);

        let boosted = engine.dimension_boost()?;
        stats.total_boosts += boosted;

        if rng.gen_bool(config.purchase_chance) {
            stats.upgrades_bought += try_random_purchase(&mut engine, rng)?;
        }

        if config.simulate_challenges {
            maybe_start_challenge(&mut engine, rng)?;
        }

        if config.simulate_challenges && challenge_timed_out(&engine) {
            engine.exit_challenges();
        }

        if can_crunch(&engine) {
            stats.challenges_completed += big_crunch(&mut engine)?;
            if stats.first_infinity_tick.is_none() {
                stats.first_infinity_tick = Some(ticks);
            }
            // Replicanti and time shards scale with infinities in lieu of
            // the layers that would produce them.
            let infinities = engine.state().records.infinities as f64;
            inputs.replicanti = Magnitude::pow10(infinities * 10.0);
            inputs.time_shards = Magnitude::pow10(infinities * 5.0);
        }

        if config
            .doom_after_infinities
            .is_some_and(|after| engine.state().records.infinities >= after)
        {
            engine.enter_doom();
        }

        if engine.state().records.infinities >= config.target_infinities {
            break;
        }
    }

    let state = engine.state();
    Ok(RunStats {
        infinities: state.records.infinities,
        reached_target: state.records.infinities >= config.target_infinities,
        total_ticks: ticks,
        first_infinity_tick: stats.first_infinity_tick,
        final_boosts: state.dimensions.boosts,
        total_boosts: stats.total_boosts,
        upgrades_bought: stats.upgrades_bought,
        challenges_completed: stats.challenges_completed,
        infinity_challenges_unlocked: stats.infinity_challenges_unlocked,
        doomed: state.celestial.doomed,
        cataclysms: stats.cataclysms,
        remnants_earned: stats.remnants_earned,
        famine_earned: stats.timed_grants[0],
        pestilence_earned: stats.timed_grants[1],
        chaos_earned: stats.timed_grants[2],
        resets: engine
            .orchestrator()
            .counts
            .iter()
            .map(|(label, count)| (label.to_string(), *count))
            .collect(),
    })
}

/// Tries one random upgrade, as many times as affordable.
fn try_random_purchase(engine: &mut Engine<SimResetHandler>, rng: &mut ChaCha8Rng) -> Result<u64> {
    let keys: Vec<UpgradeKey> = upgrades::data::rebuyables()
        .iter()
        .map(|def| def.key)
        .chain(upgrades::data::set_upgrades().iter().map(|def| def.key))
        .collect();
    let Some(&key) = keys.choose(rng) else {
        return Ok(0);
    };
    let bought = engine.purchase(key, u64::MAX)?;
    if bought > 0 {
        debug!(upgrade = %key, bought, "Sim purchase");
    }
    Ok(bought)
}

fn maybe_start_challenge(engine: &mut Engine<SimResetHandler>, rng: &mut ChaCha8Rng) -> Result<()> {
    let state = engine.state();
    if challenges::is_any_running(state, ChallengeClass::Normal)
        || challenges::is_any_running(state, ChallengeClass::Infinity)
        || !rng.gen_bool(CHALLENGE_CHANCE)
    {
        return Ok(());
    }
    let mut candidates: Vec<ChallengeId> = Vec::new();
    for class in ChallengeClass::ALL {
        for config in challenges::data::all(class) {
            if Challenge::get(config.id)?.status(state) == ChallengeStatus::Unlocked {
                candidates.push(config.id);
            }
        }
    }
    if let Some(&id) = candidates.choose(rng) {
        engine.start_challenge(id)?;
    }
    Ok(())
}

/// A challenge that has run this long is abandoned.
const CHALLENGE_TIME_LIMIT_MS: f64 = 3_600_000.0;

fn challenge_timed_out(engine: &Engine<SimResetHandler>) -> bool {
    let state = engine.state();
    (challenges::is_any_running(state, ChallengeClass::Normal)
        || challenges::is_any_running(state, ChallengeClass::Infinity))
        && state.records.this_infinity_ms > CHALLENGE_TIME_LIMIT_MS
}

/// Crunch at the infinity limit, or at the goal while an infinity
/// challenge has the limit broken.
fn can_crunch(engine: &Engine<SimResetHandler>) -> bool {
    let state = engine.state();
    let goal = challenges::current(state, ChallengeClass::Infinity)
        .map_or_else(Magnitude::number_max, |challenge| challenge.goal());
    state.antimatter() >= goal
}

/// Infinity: completes a challenge whose goal was reached, pays the outer
/// layers and starts the next run. Returns challenges completed.
fn big_crunch(engine: &mut Engine<SimResetHandler>) -> Result<u64> {
    let mut completed = 0;
    for class in ChallengeClass::ALL {
        if let Some(challenge) = challenges::current(engine.state(), class) {
            if engine.state().antimatter() >= challenge.goal()
                && engine.complete_challenge(challenge.id())?
            {
                completed += 1;
            }
        }
    }
    for config in challenges::data::all(ChallengeClass::Normal) {
        engine.unlock_challenge(config.id)?;
    }
    if completed > 0 {
        engine.exit_challenges();
    }

    let state = engine.state_mut();
    state.records.infinities += 1;
    let infinities = state.records.infinities as f64;
    for currency in OUTER_CURRENCIES {
        state.wallet.gain(currency, Magnitude::pow10(infinities * 2.0));
    }
    state.wallet.gain(CurrencyId::Remnants, Magnitude::from_f64(infinities));
    reset_infinity(state);
    debug!(infinities, "Big crunch");
    Ok(completed)
}
