//! Cost laws attached to rebuyable upgrades.

use super::logic::{
    correct_estimate, geometric_sum, ln_gamma, max_affordable, max_affordable_binary_search,
    validate_params,
};
use crate::core::constants::MAX_PROBE_PURCHASES;
use crate::core::error::{EngineError, Result};
use crate::core::magnitude::Magnitude;
use serde::{Deserialize, Serialize};

/// Terms this far below the running total no longer change a tail sum.
const TAIL_PRECISION: f64 = 1e-17;
const MAX_TAIL_TERMS: u64 = 100_000;

/// How the price of a rebuyable grows with each purchase.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum CostLaw {
    /// Purchase `k` costs `initial * increment^k`.
    Geometric { initial: f64, increment: f64 },
    /// Geometric until a single purchase reaches `crossover`; from there the
    /// per-purchase ratio grows by `ratio_step` with every purchase.
    Hybrid {
        initial: f64,
        increment: f64,
        crossover: f64,
        ratio_step: f64,
    },
}

impl CostLaw {
    pub const fn geometric(initial: f64, increment: f64) -> Self {
        CostLaw::Geometric { initial, increment }
    }

    pub fn validate(&self) -> Result<()> {
        match *self {
            CostLaw::Geometric { initial, increment } => {
                validate_params(Magnitude::from_f64(initial), increment)
            }
            CostLaw::Hybrid {
                initial,
                increment,
                crossover,
                ratio_step,
            } => {
                validate_params(Magnitude::from_f64(initial), increment)?;
                if !(crossover.is_finite() && crossover > 0.0) {
                    return Err(EngineError::invalid_input(format!(
                        "hybrid crossover must be positive, got {crossover}"
                    )));
                }
                if !(ratio_step.is_finite() && ratio_step > 0.0) {
                    return Err(EngineError::invalid_input(format!(
                        "hybrid ratio step must be positive, got {ratio_step}"
                    )));
                }
                Ok(())
            }
        }
    }

    /// Cost of the next single purchase after `owned`.
    pub fn single_cost(&self, owned: u64) -> Result<Magnitude> {
        self.cost_of_purchase(owned, 1)
    }

    /// Total cost of `count` purchases starting after `owned`.
    pub fn cost_of_purchase(&self, owned: u64, count: u64) -> Result<Magnitude> {
        self.validate()?;
        Ok(self.sum_unchecked(owned, count))
    }

    /// Largest count affordable with `funds` after `owned`.
    pub fn max_affordable(&self, funds: Magnitude, owned: u64) -> Result<u64> {
        match *self {
            CostLaw::Geometric { initial, increment } => {
                max_affordable(funds, owned, Magnitude::from_f64(initial), increment)
            }
            CostLaw::Hybrid { .. } => {
                self.validate()?;
                if self.sum_unchecked(owned, 1) > funds {
                    return Ok(0);
                }
                let affordable = |n: u64| self.sum_unchecked(owned, n) <= funds;
                let mut upper = 2u64;
                while upper < MAX_PROBE_PURCHASES && affordable(upper) {
                    upper = upper.saturating_mul(2);
                }
                let n = max_affordable_binary_search(affordable, 1, upper);
                Ok(correct_estimate(n, affordable))
            }
        }
    }

    fn sum_unchecked(&self, owned: u64, count: u64) -> Magnitude {
        match *self {
            CostLaw::Geometric { initial, increment } => {
                geometric_sum(owned, count, Magnitude::from_f64(initial), increment)
            }
            CostLaw::Hybrid {
                initial,
                increment,
                crossover,
                ratio_step,
            } => {
                let hybrid = HybridShape::new(initial, increment, crossover, ratio_step);
                hybrid.sum(owned, count)
            }
        }
    }
}

/// Precomputed pieces of a hybrid law.
struct HybridShape {
    initial: Magnitude,
    increment: f64,
    ratio_step: f64,
    /// First purchase index priced past the crossover.
    knee: u64,
    /// Single cost at `knee`.
    knee_cost: Magnitude,
}

impl HybridShape {
    fn new(initial: f64, increment: f64, crossover: f64, ratio_step: f64) -> Self {
        let initial_m = Magnitude::from_f64(initial);
        let crossover_m = Magnitude::from_f64(crossover);
        let geo = |k: u64| initial_m * Magnitude::from_f64(increment).pow(k as f64);
        let knee = if initial_m >= crossover_m {
            0
        } else if increment == 1.0 {
            MAX_PROBE_PURCHASES
        } else {
            let guess = ((crossover / initial).log10() / increment.log10()).ceil();
            let mut k = if guess.is_finite() && guess > 0.0 {
                guess as u64
            } else {
                0
            };
            while k > 0 && geo(k - 1) >= crossover_m {
                k -= 1;
            }
            while geo(k) < crossover_m {
                k += 1;
            }
            k
        };
        Self {
            initial: initial_m,
            increment,
            ratio_step,
            knee,
            knee_cost: geo(knee),
        }
    }

    /// Ratio between purchase `k` and `k - 1` past the knee.
    fn ratio_into(&self, k: u64) -> f64 {
        self.increment + self.ratio_step * (k - self.knee) as f64
    }

    /// Single cost of purchase index `k >= knee`:
    /// `knee_cost * step^m * Γ(a + m + 1) / Γ(a + 1)` with `a = increment / step`.
    fn tail_single(&self, k: u64) -> Magnitude {
        let m = (k - self.knee) as f64;
        if m == 0.0 {
            return self.knee_cost;
        }
        let a = self.increment / self.ratio_step;
        let log10_growth = m * self.ratio_step.log10()
            + (ln_gamma(a + m + 1.0) - ln_gamma(a + 1.0)) / std::f64::consts::LN_10;
        self.knee_cost * Magnitude::pow10(log10_growth)
    }

    fn sum(&self, owned: u64, count: u64) -> Magnitude {
        if count == 0 {
            return Magnitude::ZERO;
        }
        let end = owned.saturating_add(count);
        let geo_end = end.min(self.knee);
        let mut total = if owned < geo_end {
            geometric_sum(owned, geo_end - owned, self.initial, self.increment)
        } else {
            Magnitude::ZERO
        };
        let tail_start = owned.max(self.knee);
        if tail_start >= end {
            return total;
        }
        // Walk backward from the most expensive term until the rest vanish.
        let mut k = end - 1;
        let mut term = self.tail_single(k);
        let mut tail = Magnitude::ZERO;
        let mut steps = 0u64;
        loop {
            tail += term;
            if k == tail_start || steps >= MAX_TAIL_TERMS {
                break;
            }
            if term < tail * Magnitude::from_f64(TAIL_PRECISION) {
                break;
            }
            term = term / Magnitude::from_f64(self.ratio_into(k));
            k -= 1;
            steps += 1;
        }
        total += tail;
        total
    }
}
