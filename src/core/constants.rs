// Tick and timing
pub const TICK_INTERVAL_MS: f64 = 50.0;
pub const MS_PER_SECOND: f64 = 1000.0;

// Dimension boosts
pub const DIMBOOST_BASE_AMOUNT: f64 = 20.0;
pub const DIMBOOST_SIX_TIER_STEP: f64 = 20.0;
pub const DIMBOOST_EIGHT_TIER_STEP: f64 = 15.0;
pub const DIMBOOST_BASE_POWER: f64 = 2.0;
pub const MAX_DIMENSION_TIERS: u8 = 8;
pub const RESTRICTED_DIMENSION_TIERS: u8 = 6;
/// Boosts past these counts do nothing in the boost-limited challenge.
pub const BOOST_LIMIT_CHALLENGE_MAX: u64 = 5;
pub const BOOST_LIMIT_CHALLENGE_MAX_RESTRICTED: u64 = 2;
/// Upper bound for a single bulk boost search.
pub const MAX_BULK_BOOSTS: u64 = 1 << 40;

// Challenges
pub const NORMAL_CHALLENGE_COUNT: u8 = 12;
pub const INFINITY_CHALLENGE_COUNT: u8 = 8;
/// Eternity count past which newly unlocked infinity challenges auto-complete.
pub const AUTO_COMPLETE_ETERNITIES: u64 = 6;

// Cost scaling
/// Reality rebuyables turn super-geometric once a single purchase costs this much.
pub const REALITY_REBUYABLE_CROSSOVER: f64 = 1e30;
/// Probe ceiling for non-invertible cost laws.
pub const MAX_PROBE_PURCHASES: u64 = 1 << 50;

// Dilation
pub const TACHYON_GALAXY_BASE_THRESHOLD: f64 = 1000.0;

// Celestial doom loop
pub const ARMAGEDDON_BASE_INTERVAL_MS: f64 = 5000.0;
/// Timed-currency bars fill from 0 to this value.
pub const TIMED_CURRENCY_BAR: f64 = 10.0;
pub const SPEED_UPGRADE_FACTOR: f64 = 1.2;
pub const FAMINE_BASE_FILL_SECONDS: f64 = 2.5;
pub const PESTILENCE_BASE_FILL_SECONDS: f64 = 10.0;
pub const CHAOS_BASE_FILL_SECONDS: f64 = 10.0;
pub const FAMINE_MULTIPLIER_BASE: f64 = 1.1;
pub const FAMINE_SOFTCAP: f64 = 1e100;

// Starting values
pub const STARTING_ANTIMATTER: f64 = 10.0;

// Effects
pub const MAX_EQUIPPED_ITEMS: usize = 5;
