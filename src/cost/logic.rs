//! Bulk-purchase cost sums and affordability searches.

use crate::core::error::{EngineError, Result};
use crate::core::magnitude::Magnitude;

/// Correction steps allowed after the closed-form estimate.
const MAX_CORRECTION_STEPS: u32 = 64;

pub(crate) fn validate_params(initial: Magnitude, increment: f64) -> Result<()> {
    if !initial.is_positive() {
        return Err(EngineError::invalid_input(format!(
            "initial cost must be positive, got {initial}"
        )));
    }
    if !increment.is_finite() || increment < 1.0 {
        return Err(EngineError::invalid_input(format!(
            "cost increment must be a finite value >= 1, got {increment}"
        )));
    }
    Ok(())
}

/// Cost of buying `count` more after `owned`, under a geometric law where
/// purchase `k` (0-based) costs `initial * increment^k`.
pub fn cost_of_purchase(
    owned: u64,
    count: u64,
    initial: Magnitude,
    increment: f64,
) -> Result<Magnitude> {
    validate_params(initial, increment)?;
    Ok(geometric_sum(owned, count, initial, increment))
}

pub(crate) fn geometric_sum(owned: u64, count: u64, initial: Magnitude, increment: f64) -> Magnitude {
    if count == 0 {
        return Magnitude::ZERO;
    }
    if increment == 1.0 {
        return initial * Magnitude::from(count);
    }
    let ratio = Magnitude::from_f64(increment);
    let first = initial * ratio.pow(owned as f64);
    let span = ratio.pow(count as f64) - Magnitude::ONE;
    first * span / Magnitude::from_f64(increment - 1.0)
}

/// Largest `n` with `cost_of_purchase(owned, n) <= funds`.
pub fn max_affordable(funds: Magnitude, owned: u64, initial: Magnitude, increment: f64) -> Result<u64> {
    validate_params(initial, increment)?;
    if !funds.is_positive() {
        return Ok(0);
    }
    let estimate = if increment == 1.0 {
        (funds / initial).floor().to_u64_saturating()
    } else {
        let ratio = Magnitude::from_f64(increment);
        let first = initial * ratio.pow(owned as f64);
        let scaled = funds * Magnitude::from_f64(increment - 1.0) / first + Magnitude::ONE;
        let n = (scaled.log10() / increment.log10()).floor();
        if n.is_finite() && n > 0.0 {
            n as u64
        } else {
            0
        }
    };
    Ok(correct_estimate(estimate, |n| {
        geometric_sum(owned, n, initial, increment) <= funds
    }))
}

/// Nudges a closed-form estimate onto the exact boundary of `affordable`.
pub(crate) fn correct_estimate(estimate: u64, mut affordable: impl FnMut(u64) -> bool) -> u64 {
    let mut n = estimate;
    let mut steps = 0;
    while n > 0 && !affordable(n) && steps < MAX_CORRECTION_STEPS {
        n -= 1;
        steps += 1;
    }
    steps = 0;
    while n < u64::MAX && affordable(n + 1) && steps < MAX_CORRECTION_STEPS {
        n += 1;
        steps += 1;
    }
    n
}

/// Integer search over a monotone predicate.
///
/// Returns `lower` when `pred(lower)` is false, `upper` when `pred(upper)`
/// is true, and otherwise the largest `r` in range with `pred(r)` true and
/// `pred(r + 1)` false. The predicate must be monotone non-increasing in
/// truth over `[lower, upper]`.
pub fn max_affordable_binary_search(
    mut pred: impl FnMut(u64) -> bool,
    lower: u64,
    upper: u64,
) -> u64 {
    if !pred(lower) {
        return lower;
    }
    if upper <= lower || pred(upper) {
        return upper.max(lower);
    }
    let (mut lo, mut hi) = (lower, upper);
    while hi - lo > 1 {
        let mid = lo + (hi - lo) / 2;
        if pred(mid) {
            lo = mid;
        } else {
            hi = mid;
        }
    }
    lo
}

/// Purchases left before `cap`; an absent cap never runs out.
pub fn remaining_capacity(owned: u64, cap: Option<u64>) -> u64 {
    cap.map_or(u64::MAX, |c| c.saturating_sub(owned))
}

/// Natural log of the gamma function for `x > 0` (Lanczos, g = 7).
pub(crate) fn ln_gamma(x: f64) -> f64 {
    const G: f64 = 7.0;
    const COEFFS: [f64; 9] = [
        0.999_999_999_999_809_9,
        676.520_368_121_885_1,
        -1_259.139_216_722_402_8,
        771.323_428_777_653_1,
        -176.615_029_162_140_6,
        12.507_343_278_686_905,
        -0.138_571_095_265_720_12,
        9.984_369_578_019_572e-6,
        1.505_632_735_149_311_6e-7,
    ];
    let x = x - 1.0;
    let t = x + G + 0.5;
    let series = COEFFS
        .iter()
        .enumerate()
        .skip(1)
        .fold(COEFFS[0], |acc, (i, c)| acc + c / (x + i as f64));
    0.5 * (2.0 * std::f64::consts::PI).ln() + (x + 0.5) * t.ln() - t + series.ln()
}
