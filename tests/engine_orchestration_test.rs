//! Engine façade driven end to end: tick event ordering, resets routed to
//! the orchestrator, and state surviving a save round trip.

use antimatter_core::celestial::{CelestialInputs, TimedCurrency};
use antimatter_core::challenges::{ChallengeId, ChallengeStatus};
use antimatter_core::core::constants::DIMBOOST_BASE_POWER;
use antimatter_core::core::{CurrencyId, RecordingOrchestrator, ResetKind, TickEvent};
use antimatter_core::effects::{EffectId, Item, ItemType};
use antimatter_core::simulator::SimResetHandler;
use antimatter_core::{Engine, GameLoop, GameState, Magnitude};

// =============================================================================
// Helpers
// =============================================================================

fn recording_engine() -> Engine<RecordingOrchestrator> {
    Engine::new(RecordingOrchestrator::new()).unwrap()
}

fn sim_engine() -> Engine<SimResetHandler> {
    Engine::new(SimResetHandler::default()).unwrap()
}

fn run_ticks(game: &mut dyn GameLoop, ticks: u32, delta_ms: f64) -> Vec<TickEvent> {
    let mut events = Vec::new();
    for _ in 0..ticks {
        events.extend(game.tick(delta_ms, &CelestialInputs::default()).unwrap().events);
    }
    events
}

// =============================================================================
// Tick pipeline
// =============================================================================

#[test]
fn test_tick_events_follow_stage_order() {
    let mut engine = recording_engine();
    assert!(engine.enter_doom());

    let state = engine.state_mut();
    state
        .wallet
        .set(CurrencyId::Antimatter, Magnitude::pow10(2000.0));
    state.celestial.peak_this_cycle = Magnitude::pow10(100.0);
    for currency in [TimedCurrency::Famine, TimedCurrency::Chaos] {
        state.celestial.timer_mut(currency).unlocked = true;
    }

    // One long tick: past the armageddon interval and longer than both
    // fill times, so bars fill again after the cataclysm clears them.
    let inputs = CelestialInputs {
        time_shards: Magnitude::pow10(1000.0),
        ..CelestialInputs::default()
    };
    let result = engine.tick(25_000.0, &inputs).unwrap();

    assert_eq!(result.events.len(), 5);
    assert_eq!(
        result.events[0],
        TickEvent::InfinityChallengeUnlocked {
            id: ChallengeId::infinity(1)
        }
    );
    assert!(matches!(
        result.events[1],
        TickEvent::Cataclysm { remnants } if remnants > Magnitude::ONE
    ));
    assert!(matches!(
        result.events[2],
        TickEvent::TimedCurrencyGranted { currency: TimedCurrency::Famine, .. }
    ));
    assert!(matches!(
        result.events[3],
        TickEvent::TimedCurrencyGranted { currency: TimedCurrency::Chaos, .. }
    ));
    assert_eq!(result.events[4], TickEvent::CostScaleRefresh);
    assert!(result.had_cataclysm());
    assert_eq!(result.unlocked_challenges(), vec![ChallengeId::infinity(1)]);
    assert_eq!(engine.orchestrator().count(ResetKind::Armageddon), 1);
}

#[test]
fn test_infinity_challenge_unlock_reported_once() {
    let mut engine = recording_engine();
    engine
        .state_mut()
        .wallet
        .set(CurrencyId::Antimatter, Magnitude::pow10(2000.0));
    let first = engine.tick(50.0, &CelestialInputs::default()).unwrap();
    let second = engine.tick(50.0, &CelestialInputs::default()).unwrap();
    assert_eq!(first.unlocked_challenges().len(), 1);
    assert!(second.events.is_empty());
    assert_eq!(
        engine.challenge_status(ChallengeId::infinity(1)).unwrap(),
        ChallengeStatus::Unlocked
    );
}

#[test]
fn test_game_loop_as_trait_object() {
    let mut engine = recording_engine();
    let events = run_ticks(&mut engine, 100, 50.0);
    assert!(events.is_empty());
    assert_eq!(engine.state().records.this_infinity_ms, 5_000.0);

    assert!(engine.tick(-5.0, &CelestialInputs::default()).is_err());
    assert_eq!(engine.state().records.this_infinity_ms, 5_000.0);
}

// =============================================================================
// Resets through a real orchestrator
// =============================================================================

#[test]
fn test_dimension_boost_resets_dimensions() {
    let mut engine = sim_engine();
    let state = engine.state_mut();
    state.dimensions.set_amount(4, Magnitude::from(20u32));
    state
        .wallet
        .set(CurrencyId::Antimatter, Magnitude::pow10(9.0));

    assert_eq!(engine.dimension_boost().unwrap(), 1);
    assert_eq!(engine.state().dimensions.boosts, 1);
    assert_eq!(engine.state().dimensions.amount(4), Magnitude::ZERO);
    assert_eq!(engine.currency(CurrencyId::Antimatter), Magnitude::from(10u32));
    assert_eq!(engine.orchestrator().count("dimension_boost"), 1);

    // Nothing left to pay for a second one.
    assert_eq!(engine.dimension_boost().unwrap(), 0);
    assert_eq!(engine.orchestrator().count("dimension_boost"), 1);
}

#[test]
fn test_lose_boost_forces_reset() {
    let mut engine = sim_engine();
    engine.state_mut().dimensions.boosts = 3;
    engine
        .state_mut()
        .wallet
        .set(CurrencyId::Antimatter, Magnitude::pow10(30.0));
    engine.lose_boost();
    assert_eq!(engine.state().dimensions.boosts, 2);
    assert_eq!(engine.currency(CurrencyId::Antimatter), Magnitude::from(10u32));
}

#[test]
fn test_challenge_start_wipes_the_run() {
    let mut engine = sim_engine();
    let id = ChallengeId::normal(2);
    let state = engine.state_mut();
    state.records.infinities = 1;
    state.records.this_infinity_ms = 12_000.0;
    state.dimensions.boosts = 3;

    assert!(engine.unlock_challenge(id).unwrap());
    assert!(engine.start_challenge(id).unwrap());
    assert_eq!(engine.state().dimensions.boosts, 0);
    assert_eq!(engine.state().records.this_infinity_ms, 0.0);
    assert_eq!(engine.orchestrator().count("challenge"), 1);

    engine.exit_challenges();
    assert_eq!(engine.challenge_status(id).unwrap(), ChallengeStatus::Unlocked);
    assert_eq!(engine.orchestrator().count("exit_challenges"), 1);
}

#[test]
fn test_doom_cycle_with_real_resets() {
    let mut engine = sim_engine();
    engine
        .state_mut()
        .wallet
        .set(CurrencyId::InfinityPoints, Magnitude::from(500u32));
    assert!(engine.enter_doom());
    assert_eq!(engine.currency(CurrencyId::InfinityPoints), Magnitude::ZERO);

    let events = run_ticks(&mut engine, 101, 50.0);
    assert_eq!(
        events
            .iter()
            .filter(|event| matches!(event, TickEvent::Cataclysm { .. }))
            .count(),
        1
    );
    assert_eq!(engine.orchestrator().count("armageddon"), 1);
    assert_eq!(engine.orchestrator().count("doom"), 1);
    assert_eq!(engine.state().celestial.armageddon_duration_ms, 0.0);
}

// =============================================================================
// Effects and persistence
// =============================================================================

#[test]
fn test_equipped_power_scales_boost_multiplier() {
    let mut engine = recording_engine();
    engine.state_mut().dimensions.boosts = 2;
    let base = engine.boost_multiplier(1).unwrap();
    assert_eq!(base, Magnitude::from_f64(DIMBOOST_BASE_POWER).pow(2.0));

    engine
        .equip(
            Item::new(ItemType::Power, 5)
                .with_effect(EffectId::PowerDimBoost, Magnitude::from_f64(1.5)),
        )
        .unwrap();
    let boosted = engine.boost_multiplier(1).unwrap();
    assert_eq!(boosted, Magnitude::from_f64(DIMBOOST_BASE_POWER * 1.5).pow(2.0));
    assert!(boosted > base);
}

#[test]
fn test_state_survives_save_round_trip() {
    let mut engine = recording_engine();
    let id = ChallengeId::normal(5);
    let state = engine.state_mut();
    state.records.infinities = 1;
    state
        .wallet
        .set(CurrencyId::DilatedTime, Magnitude::from_f64(2.5e7));
    engine.unlock_challenge(id).unwrap();
    engine.start_challenge(id).unwrap();

    let saved = serde_json::to_string(&engine.into_state()).unwrap();
    let loaded: GameState = serde_json::from_str(&saved).unwrap();
    let resumed = Engine::from_state(loaded, RecordingOrchestrator::new()).unwrap();

    assert_eq!(
        resumed.currency(CurrencyId::DilatedTime),
        Magnitude::from_f64(2.5e7)
    );
    assert_eq!(resumed.challenge_status(id).unwrap(), ChallengeStatus::Running);
}
