//! Engine façade implementing the [`GameLoop`] trait.
//!
//! [`Engine`] owns the game state, the effect registry with its cache, the
//! equipped items and the reset orchestrator. It is the one place that
//! wires the subsystems together:
//!
//! 1. **Actions** - purchases, challenge starts, boosts, doom, equipment.
//!    Each forwards to its subsystem with the owned state and orchestrator.
//! 2. **Views** - costs, statuses and effect values. Effect reads go through
//!    the cache, so they take `&mut self`.
//! 3. **Ticks** - [`GameLoop::tick`] runs [`game_tick`] on the owned state.

use super::currency::CurrencyId;
use super::error::Result;
use super::game_loop::GameLoop;
use super::game_state::GameState;
use super::magnitude::Magnitude;
use super::reset::{NoopOrchestrator, ResetOrchestrator};
use super::tick::{game_tick, TickResult};
use crate::celestial::{self, CelestialInputs, Mechanic};
use crate::challenges::{self, Challenge, ChallengeId, ChallengeStatus};
use crate::dimboost::{self, DimBoost, DimBoostModes};
use crate::effects::{Combined, EffectCache, EffectId, EffectRegistry, EquippedItems, Item};
use crate::upgrades::{self, Upgrade, UpgradeKey};
use tracing::debug;

pub struct Engine<O = NoopOrchestrator> {
    state: GameState,
    registry: EffectRegistry,
    equipped: EquippedItems,
    cache: EffectCache,
    orchestrator: O,
}

impl<O: ResetOrchestrator> Engine<O> {
    /// Fresh game with the built-in effect table.
    pub fn new(orchestrator: O) -> Result<Self> {
        Self::from_state(GameState::new(), orchestrator)
    }

    /// Resume from an existing state (for save/load).
    pub fn from_state(state: GameState, orchestrator: O) -> Result<Self> {
        Ok(Self::with_registry(
            state,
            EffectRegistry::with_builtins()?,
            orchestrator,
        ))
    }

    pub fn with_registry(state: GameState, registry: EffectRegistry, orchestrator: O) -> Self {
        Self {
            state,
            registry,
            equipped: EquippedItems::default(),
            cache: EffectCache::new(),
            orchestrator,
        }
    }

    pub fn orchestrator(&self) -> &O {
        &self.orchestrator
    }

    pub fn orchestrator_mut(&mut self) -> &mut O {
        &mut self.orchestrator
    }

    pub fn equipped(&self) -> &EquippedItems {
        &self.equipped
    }

    pub fn into_state(self) -> GameState {
        self.state
    }

    // =========================================================================
    // Actions
    // =========================================================================

    /// Buys up to `count` of an upgrade. Returns how many were bought.
    pub fn purchase(&mut self, key: UpgradeKey, count: u64) -> Result<u64> {
        upgrades::lookup(key)?.purchase(&mut self.state, count)
    }

    pub fn start_challenge(&mut self, id: ChallengeId) -> Result<bool> {
        Ok(Challenge::get(id)?.start(&mut self.state, &mut self.orchestrator))
    }

    pub fn start_challenge_with_goal(&mut self, id: ChallengeId, goal: Magnitude) -> Result<bool> {
        Ok(Challenge::get(id)?.start_with_goal(&mut self.state, &mut self.orchestrator, Some(goal)))
    }

    /// Records the run time if the challenge is running, then marks it done.
    pub fn complete_challenge(&mut self, id: ChallengeId) -> Result<bool> {
        let challenge = Challenge::get(id)?;
        challenge.update_time(&mut self.state)?;
        Ok(challenge.complete(&mut self.state))
    }

    pub fn unlock_challenge(&mut self, id: ChallengeId) -> Result<bool> {
        Ok(Challenge::get(id)?.unlock(&mut self.state))
    }

    pub fn exit_challenges(&mut self) {
        challenges::exit_all(&mut self.state, &mut self.orchestrator);
    }

    /// Buys every affordable dimension boost. Returns the boosts bought.
    pub fn dimension_boost(&mut self) -> Result<u64> {
        let modes = self.boost_modes()?;
        Ok(dimboost::perform_boost_with(
            &mut self.state,
            modes,
            &mut self.orchestrator,
        ))
    }

    pub fn lose_boost(&mut self) {
        dimboost::lose_boost(&mut self.state, &mut self.orchestrator);
    }

    pub fn enter_doom(&mut self) -> bool {
        celestial::enter_doom(&mut self.state, &mut self.orchestrator)
    }

    /// Equips into the first free slot. `None` when full or when doom has
    /// disabled equipping.
    pub fn equip(&mut self, item: Item) -> Option<usize> {
        if celestial::is_disabled(&self.state, Mechanic::EquipGlyphs) {
            debug!("Equip refused while doomed");
            return None;
        }
        let slot = self.equipped.equip(item)?;
        self.cache.invalidate();
        Some(slot)
    }

    pub fn unequip(&mut self, slot: usize) -> Option<Item> {
        let item = self.equipped.unequip(slot)?;
        self.cache.invalidate();
        Some(item)
    }

    // =========================================================================
    // Views
    // =========================================================================

    pub fn next_cost(&self, key: UpgradeKey, count: u64) -> Result<Magnitude> {
        upgrades::lookup(key)?.next_cost(&self.state, count)
    }

    pub fn max_affordable(&self, key: UpgradeKey) -> Result<u64> {
        upgrades::lookup(key)?.max_affordable(&self.state)
    }

    pub fn upgrade_effect(&self, key: UpgradeKey) -> Result<Option<Magnitude>> {
        Ok(upgrades::lookup(key)?.effect_value(&self.state))
    }

    pub fn challenge_status(&self, id: ChallengeId) -> Result<ChallengeStatus> {
        Ok(Challenge::get(id)?.status(&self.state))
    }

    pub fn currency(&self, id: CurrencyId) -> Magnitude {
        self.state.wallet.value(id)
    }

    /// Combined value of an effect over the equipped items, memoized per
    /// equip set.
    pub fn effect(&mut self, id: EffectId) -> Result<Combined> {
        self.cache.get(&self.registry, &self.equipped, id)
    }

    pub fn is_disabled(&self, mechanic: Mechanic) -> bool {
        celestial::is_disabled(&self.state, mechanic)
    }

    pub fn is_disabled_by_name(&self, name: &str) -> bool {
        celestial::is_disabled_by_name(&self.state, name)
    }

    /// Boost modes from state with the equipped boost-power effect applied.
    pub fn boost_modes(&mut self) -> Result<DimBoostModes> {
        let power = self.effect(EffectId::PowerDimBoost)?.value.to_f64();
        Ok(DimBoostModes::from_state(&self.state).with_power_multiplier(power))
    }

    /// Dimension multiplier from boosts, for a 1-based tier.
    pub fn boost_multiplier(&mut self, tier: u8) -> Result<Magnitude> {
        let modes = self.boost_modes()?;
        Ok(DimBoost::new(&self.state.dimensions, modes).multiplier_to_tier(tier))
    }
}

impl<O: ResetOrchestrator> GameLoop for Engine<O> {
    fn tick(&mut self, delta_ms: f64, inputs: &CelestialInputs) -> Result<TickResult> {
        game_tick(&mut self.state, delta_ms, inputs, &mut self.orchestrator)
    }

    fn state(&self) -> &GameState {
        &self.state
    }

    fn state_mut(&mut self) -> &mut GameState {
        &mut self.state
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::error::EngineError;
    use crate::core::reset::{RecordingOrchestrator, ResetKind};
    use crate::effects::ItemType;
    use crate::upgrades::data::{DT_GAIN, UNLOCK_FAMINE};

    fn engine() -> Engine<RecordingOrchestrator> {
        Engine::new(RecordingOrchestrator::new()).unwrap()
    }

    #[test]
    fn test_purchase_through_engine() {
        let mut engine = engine();
        engine
            .state_mut()
            .wallet
            .set(CurrencyId::DilatedTime, Magnitude::from_f64(1.1e5));
        assert_eq!(engine.max_affordable(DT_GAIN).unwrap(), 2);
        assert_eq!(engine.purchase(DT_GAIN, 5).unwrap(), 2);
        assert_eq!(engine.state().upgrades.owned(DT_GAIN), 2);
        assert_eq!(engine.next_cost(DT_GAIN, 1).unwrap(), Magnitude::pow10(6.0));
    }

    #[test]
    fn test_unknown_keys_are_errors() {
        let mut engine = engine();
        let err = engine.purchase(UpgradeKey::dilation(999), 1).unwrap_err();
        assert_eq!(err.error_code(), "ENGINE_UNKNOWN_UPGRADE");
        let err = engine.start_challenge(ChallengeId::normal(99)).unwrap_err();
        assert!(matches!(err, EngineError::UnknownChallenge { .. }));
    }

    #[test]
    fn test_challenge_cycle_records_time() {
        let mut engine = engine();
        engine.state_mut().records.infinities = 1;
        let id = ChallengeId::normal(3);
        assert!(!engine.start_challenge(id).unwrap());
        assert!(engine.unlock_challenge(id).unwrap());
        assert!(engine.start_challenge(id).unwrap());
        assert_eq!(engine.challenge_status(id).unwrap(), ChallengeStatus::Running);
        engine.state_mut().records.this_infinity_ms = 4200.0;
        assert!(engine.complete_challenge(id).unwrap());
        assert_eq!(
            Challenge::get(id).unwrap().best_time(engine.state()),
            Some(4200.0)
        );
        engine.exit_challenges();
        assert_eq!(engine.challenge_status(id).unwrap(), ChallengeStatus::Completed);
        assert_eq!(engine.orchestrator().count(ResetKind::ExitChallenges), 1);
    }

    #[test]
    fn test_equip_invalidates_effect_cache() {
        let mut engine = engine();
        assert_eq!(
            engine.effect(EffectId::PowerDimBoost).unwrap().value,
            Magnitude::ONE
        );
        let slot = engine
            .equip(
                Item::new(ItemType::Power, 10)
                    .with_effect(EffectId::PowerDimBoost, Magnitude::from(3u32)),
            )
            .unwrap();
        assert_eq!(
            engine.effect(EffectId::PowerDimBoost).unwrap().value,
            Magnitude::from(3u32)
        );
        assert_eq!(engine.boost_modes().unwrap().power_multiplier, 3.0);
        engine.unequip(slot).unwrap();
        assert_eq!(
            engine.effect(EffectId::PowerDimBoost).unwrap().value,
            Magnitude::ONE
        );
    }

    #[test]
    fn test_doom_disables_equipping() {
        let mut engine = engine();
        assert!(engine.enter_doom());
        assert!(!engine.enter_doom());
        assert!(engine.is_disabled(Mechanic::EquipGlyphs));
        assert!(engine.is_disabled_by_name("somethingElse"));
        assert_eq!(engine.equip(Item::new(ItemType::Power, 1)), None);
        assert_eq!(engine.orchestrator().count(ResetKind::Doom), 1);
    }

    #[test]
    fn test_doom_timer_unlock_and_tick() {
        let mut engine = engine();
        engine.enter_doom();
        engine
            .state_mut()
            .wallet
            .set(CurrencyId::Remnants, Magnitude::from(10u32));
        assert_eq!(engine.purchase(UNLOCK_FAMINE, 1).unwrap(), 1);
        let result = engine.tick(60_000.0, &CelestialInputs::default()).unwrap();
        assert!(engine.currency(CurrencyId::Famine) > Magnitude::ZERO);
        assert!(result.granted(celestial::TimedCurrency::Famine) > Magnitude::ZERO);
    }
}
