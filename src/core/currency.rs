//! Currency ledger: named non-negative balances with guarded mutation.

use super::magnitude::Magnitude;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

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
    strum::AsRefStr,
)]
#[strum(serialize_all = "snake_case", ascii_case_insensitive)]
pub enum CurrencyId {
    Antimatter,
    InfinityPoints,
    EternityPoints,
    TachyonParticles,
    DilatedTime,
    RealityMachines,
    Remnants,
    Famine,
    Pestilence,
    Chaos,
}

impl CurrencyId {
    pub const ALL: [CurrencyId; 10] = [
        CurrencyId::Antimatter,
        CurrencyId::InfinityPoints,
        CurrencyId::EternityPoints,
        CurrencyId::TachyonParticles,
        CurrencyId::DilatedTime,
        CurrencyId::RealityMachines,
        CurrencyId::Remnants,
        CurrencyId::Famine,
        CurrencyId::Pestilence,
        CurrencyId::Chaos,
    ];

    /// Display name for reports
    pub fn name(&self) -> &'static str {
        match self {
            CurrencyId::Antimatter => "Antimatter",
            CurrencyId::InfinityPoints => "Infinity Points",
            CurrencyId::EternityPoints => "Eternity Points",
            CurrencyId::TachyonParticles => "Tachyon Particles",
            CurrencyId::DilatedTime => "Dilated Time",
            CurrencyId::RealityMachines => "Reality Machines",
            CurrencyId::Remnants => "Remnants",
            CurrencyId::Famine => "Famine",
            CurrencyId::Pestilence => "Pestilence",
            CurrencyId::Chaos => "Chaos",
        }
    }
}

/// A single balance. The value never drops below zero.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(from = "RawCurrency")]
pub struct Currency {
    pub id: CurrencyId,
    value: Magnitude,
}

#[derive(Deserialize)]
struct RawCurrency {
    id: CurrencyId,
    value: Magnitude,
}

impl From<RawCurrency> for Currency {
    /// Negative balances from a damaged save load as zero.
    fn from(raw: RawCurrency) -> Self {
        Self {
            id: raw.id,
            value: raw.value.clamp_min(Magnitude::ZERO),
        }
    }
}

impl Currency {
    pub fn new(id: CurrencyId) -> Self {
        Self {
            id,
            value: Magnitude::ZERO,
        }
    }

    pub fn value(&self) -> Magnitude {
        self.value
    }

    /// Adds a positive amount. Zero and negative amounts are ignored.
    pub fn gain(&mut self, amount: Magnitude) {
        if amount.is_positive() {
            self.value += amount;
        }
    }

    /// Debits `cost` if the balance covers it. Leaves the balance untouched
    /// and returns `false` otherwise.
    pub fn spend(&mut self, cost: Magnitude) -> bool {
        if cost.is_negative() || self.value < cost {
            return false;
        }
        self.value = (self.value - cost).clamp_min(Magnitude::ZERO);
        true
    }

    /// Unconditional debit clamped at zero.
    pub fn subtract(&mut self, amount: Magnitude) {
        if amount.is_positive() {
            self.value = (self.value - amount).clamp_min(Magnitude::ZERO);
        }
    }

    pub fn multiply(&mut self, factor: Magnitude) {
        self.value = (self.value * factor).clamp_min(Magnitude::ZERO);
    }

    /// Raises the balance to `value` if it is currently lower.
    pub fn bump_to(&mut self, value: Magnitude) {
        self.value = self.value.max(value);
    }

    pub fn reset(&mut self) {
        self.value = Magnitude::ZERO;
    }
}

/// Every currency balance in the game. Absent entries read as zero.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Wallet {
    balances: BTreeMap<CurrencyId, Currency>,
}

impl Wallet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn value(&self, id: CurrencyId) -> Magnitude {
        self.balances
            .get(&id)
            .map(Currency::value)
            .unwrap_or(Magnitude::ZERO)
    }

    pub fn get(&self, id: CurrencyId) -> Currency {
        self.balances
            .get(&id)
            .copied()
            .unwrap_or_else(|| Currency::new(id))
    }

    /// Mutable access, inserting a zero balance on first use.
    pub fn currency_mut(&mut self, id: CurrencyId) -> &mut Currency {
        self.balances
            .entry(id)
            .or_insert_with(|| Currency::new(id))
    }

    pub fn gain(&mut self, id: CurrencyId, amount: Magnitude) {
        self.currency_mut(id).gain(amount);
    }

    pub fn spend(&mut self, id: CurrencyId, cost: Magnitude) -> bool {
        self.currency_mut(id).spend(cost)
    }

    /// Overwrites a balance, clamping negatives to zero.
    pub fn set(&mut self, id: CurrencyId, value: Magnitude) {
        let currency = self.currency_mut(id);
        currency.reset();
        currency.gain(value);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;

    #[test]
    fn test_spend_insufficient_leaves_value() {
        let mut c = Currency::new(CurrencyId::DilatedTime);
        c.gain(Magnitude::from(30u32));
        assert!(!c.spend(Magnitude::from(31u32)));
        assert_eq!(c.value(), Magnitude::from(30u32));
        assert!(c.spend(Magnitude::from(30u32)));
        assert_eq!(c.value(), Magnitude::ZERO);
    }

    #[test]
    fn test_gain_ignores_non_positive() {
        let mut c = Currency::new(CurrencyId::Antimatter);
        c.gain(Magnitude::from(-5.0));
        c.gain(Magnitude::ZERO);
        assert_eq!(c.value(), Magnitude::ZERO);
    }

    #[test]
    fn test_subtract_clamps_at_zero() {
        let mut c = Currency::new(CurrencyId::Remnants);
        c.gain(Magnitude::from(3u32));
        c.subtract(Magnitude::from(10u32));
        assert_eq!(c.value(), Magnitude::ZERO);
    }

    #[test]
    fn test_multiply_and_bump() {
        let mut c = Currency::new(CurrencyId::TachyonParticles);
        c.gain(Magnitude::from(4u32));
        c.multiply(Magnitude::from(2.5));
        assert_eq!(c.value(), Magnitude::from(10u32));
        c.bump_to(Magnitude::from(8u32));
        assert_eq!(c.value(), Magnitude::from(10u32));
        c.bump_to(Magnitude::from(12u32));
        assert_eq!(c.value(), Magnitude::from(12u32));
        c.multiply(Magnitude::from(-1.0));
        assert_eq!(c.value(), Magnitude::ZERO);
    }

    #[test]
    fn test_wallet_absent_reads_zero() {
        let mut wallet = Wallet::new();
        assert_eq!(wallet.value(CurrencyId::Chaos), Magnitude::ZERO);
        wallet.gain(CurrencyId::Chaos, Magnitude::from(2u32));
        assert_eq!(wallet.value(CurrencyId::Chaos), Magnitude::from(2u32));
        wallet.set(CurrencyId::Chaos, Magnitude::from(-1.0));
        assert_eq!(wallet.value(CurrencyId::Chaos), Magnitude::ZERO);
    }

    #[test]
    fn test_currency_id_parses_snake_case() {
        assert_eq!(
            CurrencyId::from_str("dilated_time"),
            Ok(CurrencyId::DilatedTime)
        );
        assert_eq!(CurrencyId::Remnants.to_string(), "remnants");
        assert!(CurrencyId::from_str("gold").is_err());
    }

    #[test]
    fn test_wallet_serde_roundtrip() {
        let mut wallet = Wallet::new();
        wallet.gain(CurrencyId::Antimatter, Magnitude::pow10(500.0));
        let json = serde_json::to_string(&wallet).unwrap();
        let back: Wallet = serde_json::from_str(&json).unwrap();
        assert_eq!(back.value(CurrencyId::Antimatter), Magnitude::pow10(500.0));
    }

    #[test]
    fn test_negative_balance_loads_as_zero() {
        let mut json = serde_json::to_value(Currency::new(CurrencyId::Famine)).unwrap();
        json["value"] = serde_json::json!({ "mantissa": -5.0, "exponent": 0 });
        let loaded: Currency = serde_json::from_value(json).unwrap();
        assert_eq!(loaded.value(), Magnitude::ZERO);
        assert!(!loaded.value().is_negative());

        let mut wallet = Wallet::new();
        wallet.gain(CurrencyId::Chaos, Magnitude::from(3u32));
        let mut json = serde_json::to_value(&wallet).unwrap();
        let entry = json["balances"]
            .as_object_mut()
            .and_then(|balances| balances.values_mut().next())
            .unwrap();
        entry["value"] = serde_json::json!({ "mantissa": -1.0, "exponent": 400 });
        let loaded: Wallet = serde_json::from_value(json).unwrap();
        assert_eq!(loaded.value(CurrencyId::Chaos), Magnitude::ZERO);
    }
}
