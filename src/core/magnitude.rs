//! Arbitrary-range numeric magnitude used for every currency, cost and effect.
//!
//! Values that fit comfortably in an `f64` (decade -299..=299) are stored
//! exactly as that `f64`, so integer costs such as `1 + 30` compare exactly.
//! Everything else is stored as a base-10 mantissa in `[1, 10)` with an `i64`
//! exponent and handled in log space. Results beyond [`Magnitude::MAX`]
//! saturate, results below the smallest exponent flush to zero, and NaN never
//! escapes: the type is totally ordered.

use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::fmt;
use std::iter::{Product, Sum};
use std::ops::{Add, AddAssign, Div, DivAssign, Mul, MulAssign, Neg, Sub, SubAssign};

/// Largest exponent before saturation.
pub const MAX_EXPONENT: i64 = 9_000_000_000_000_000;

/// Decades strictly inside this bound keep the exact `f64` form.
const SMALL_DECADE_LIMIT: i64 = 300;

/// Terms more than this many decades apart do not affect a sum.
const SIGNIFICANT_DECADES: i64 = 17;

#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
#[serde(from = "RawMagnitude")]
pub struct Magnitude {
    mantissa: f64,
    exponent: i64,
}

/// Wire form. Loaded values are renormalized before use.
#[derive(Deserialize)]
struct RawMagnitude {
    mantissa: f64,
    #[serde(default)]
    exponent: i64,
}

impl From<RawMagnitude> for Magnitude {
    fn from(raw: RawMagnitude) -> Self {
        Magnitude::from_scientific(raw.mantissa, raw.exponent)
    }
}

impl Magnitude {
    pub const ZERO: Magnitude = Magnitude {
        mantissa: 0.0,
        exponent: 0,
    };
    pub const ONE: Magnitude = Magnitude {
        mantissa: 1.0,
        exponent: 0,
    };
    /// Saturation sentinel. Arithmetic never produces anything larger.
    pub const MAX: Magnitude = Magnitude {
        mantissa: 9.999_999_999_999_998,
        exponent: MAX_EXPONENT,
    };

    /// Largest finite `f64`; the default goal of a normal challenge.
    pub fn number_max() -> Self {
        Self::from_f64(f64::MAX)
    }

    pub fn from_f64(value: f64) -> Self {
        Self::from_scientific(value, 0)
    }

    /// `10^power`.
    pub fn pow10(power: f64) -> Self {
        if power.is_nan() {
            return Self::ZERO;
        }
        if power >= (MAX_EXPONENT + 1) as f64 {
            return Self::MAX;
        }
        if power < -(MAX_EXPONENT as f64) {
            return Self::ZERO;
        }
        if power.abs() < (SMALL_DECADE_LIMIT - 1) as f64 {
            return Self::from_f64(10f64.powf(power));
        }
        let decade = power.floor();
        Self::from_scientific(10f64.powf(power - decade), decade as i64)
    }

    /// Builds `mantissa * 10^exponent` for any finite mantissa.
    pub fn from_scientific(mantissa: f64, exponent: i64) -> Self {
        if mantissa.is_nan() || mantissa == 0.0 {
            return Self::ZERO;
        }
        if mantissa.is_infinite() {
            return Self::saturated(mantissa < 0.0);
        }
        if exponent == 0 && mantissa.abs() >= f64::MIN_POSITIVE {
            let decade = decade_of(mantissa);
            if decade.abs() < SMALL_DECADE_LIMIT {
                return Self {
                    mantissa,
                    exponent: 0,
                };
            }
        }
        let (m, shift) = split_decade(mantissa);
        let e = exponent.saturating_add(shift);
        if e > MAX_EXPONENT {
            return Self::saturated(m < 0.0);
        }
        if e < -MAX_EXPONENT {
            return Self::ZERO;
        }
        if e.abs() < SMALL_DECADE_LIMIT {
            return Self {
                mantissa: m * 10f64.powi(e as i32),
                exponent: 0,
            };
        }
        Self {
            mantissa: m,
            exponent: e,
        }
    }

    fn saturated(negative: bool) -> Self {
        if negative {
            -Self::MAX
        } else {
            Self::MAX
        }
    }

    fn is_small(&self) -> bool {
        self.exponent == 0
    }

    pub fn is_zero(&self) -> bool {
        self.mantissa == 0.0
    }

    pub fn is_positive(&self) -> bool {
        self.mantissa > 0.0
    }

    pub fn is_negative(&self) -> bool {
        self.mantissa < 0.0
    }

    pub fn signum(&self) -> i8 {
        if self.mantissa > 0.0 {
            1
        } else if self.mantissa < 0.0 {
            -1
        } else {
            0
        }
    }

    /// Mantissa in `[1, 10)` and decade exponent.
    pub fn scientific(&self) -> (f64, i64) {
        if self.is_zero() {
            return (0.0, 0);
        }
        if self.is_small() {
            return split_decade(self.mantissa);
        }
        (self.mantissa, self.exponent)
    }

    fn log10_abs(&self) -> f64 {
        if self.is_small() {
            self.mantissa.abs().log10()
        } else {
            self.exponent as f64 + self.mantissa.abs().log10()
        }
    }

    /// Base-10 logarithm; `-inf` for zero and negative values.
    pub fn log10(&self) -> f64 {
        if !self.is_positive() {
            return f64::NEG_INFINITY;
        }
        self.log10_abs()
    }

    pub fn abs(self) -> Self {
        if self.is_negative() {
            -self
        } else {
            self
        }
    }

    pub fn pow(self, power: f64) -> Self {
        if power.is_nan() {
            return Self::ZERO;
        }
        if power == 0.0 {
            return Self::ONE;
        }
        if self.is_zero() {
            return if power > 0.0 { Self::ZERO } else { Self::MAX };
        }
        let negative = self.is_negative() && power.fract() == 0.0 && (power % 2.0).abs() == 1.0;
        if self.is_small() {
            let raw = self.mantissa.abs().powf(power);
            if raw.is_finite() && raw >= f64::MIN_POSITIVE {
                let result = Self::from_f64(raw);
                return if negative { -result } else { result };
            }
        }
        let result = Self::pow10(self.log10_abs() * power);
        if negative {
            -result
        } else {
            result
        }
    }

    pub fn floor(self) -> Self {
        if self.is_small() {
            return Self::from_f64(self.mantissa.floor());
        }
        if self.exponent > 0 {
            return self;
        }
        if self.is_negative() {
            -Self::ONE
        } else {
            Self::ZERO
        }
    }

    pub fn ceil(self) -> Self {
        if self.is_small() {
            return Self::from_f64(self.mantissa.ceil());
        }
        if self.exponent > 0 {
            return self;
        }
        if self.is_negative() {
            Self::ZERO
        } else {
            Self::ONE
        }
    }

    pub fn clamp_min(self, floor: Self) -> Self {
        self.max(floor)
    }

    pub fn clamp_max(self, ceiling: Self) -> Self {
        self.min(ceiling)
    }

    /// Nearest `f64`, saturating at `±f64::MAX`.
    pub fn to_f64(&self) -> f64 {
        if self.is_small() {
            return self.mantissa;
        }
        if self.exponent > 308 {
            return if self.is_negative() { -f64::MAX } else { f64::MAX };
        }
        if self.exponent < -330 {
            return 0.0;
        }
        let value = self.mantissa * 10f64.powi(self.exponent as i32);
        if value.is_infinite() {
            if value < 0.0 {
                -f64::MAX
            } else {
                f64::MAX
            }
        } else {
            value
        }
    }

    /// Truncating conversion to a count, saturating at `u64::MAX`.
    pub fn to_u64_saturating(&self) -> u64 {
        if !self.is_positive() {
            return 0;
        }
        if self.is_small() {
            return self.mantissa as u64;
        }
        if self.exponent > 0 {
            u64::MAX
        } else {
            0
        }
    }

    fn cmp_abs(&self, other: &Self) -> Ordering {
        match (self.is_small(), other.is_small()) {
            (true, true) => self.mantissa.abs().total_cmp(&other.mantissa.abs()),
            (false, false) => self
                .exponent
                .cmp(&other.exponent)
                .then(self.mantissa.abs().total_cmp(&other.mantissa.abs())),
            (true, false) => {
                if other.exponent > 0 {
                    Ordering::Less
                } else {
                    Ordering::Greater
                }
            }
            (false, true) => {
                if self.exponent > 0 {
                    Ordering::Greater
                } else {
                    Ordering::Less
                }
            }
        }
    }
}

/// Floor of `log10(|value|)`, corrected for rounding at decade boundaries.
fn decade_of(value: f64) -> i64 {
    split_decade(value).1
}

/// Splits a finite non-zero `f64` into a mantissa in `[1, 10)` and a decade.
fn split_decade(value: f64) -> (f64, i64) {
    let mut decade = value.abs().log10().floor() as i64;
    let mut mantissa = scale_by_decades(value, -decade);
    if mantissa.abs() >= 10.0 {
        mantissa /= 10.0;
        decade += 1;
    } else if mantissa.abs() < 1.0 {
        mantissa *= 10.0;
        decade -= 1;
    }
    (mantissa, decade)
}

/// `value * 10^decades` without overflowing the intermediate power.
fn scale_by_decades(value: f64, decades: i64) -> f64 {
    if decades > 300 {
        value * 1e300 * 10f64.powi((decades - 300) as i32)
    } else if decades < -300 {
        value * 1e-300 * 10f64.powi((decades + 300) as i32)
    } else {
        value * 10f64.powi(decades as i32)
    }
}

impl Default for Magnitude {
    fn default() -> Self {
        Self::ZERO
    }
}

impl PartialEq for Magnitude {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for Magnitude {}

impl PartialOrd for Magnitude {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Magnitude {
    fn cmp(&self, other: &Self) -> Ordering {
        let (a, b) = (self.signum(), other.signum());
        if a != b {
            return a.cmp(&b);
        }
        match a {
            0 => Ordering::Equal,
            1 => self.cmp_abs(other),
            _ => self.cmp_abs(other).reverse(),
        }
    }
}

impl Neg for Magnitude {
    type Output = Magnitude;

    fn neg(self) -> Self {
        if self.is_zero() {
            return Self::ZERO;
        }
        Self {
            mantissa: -self.mantissa,
            exponent: self.exponent,
        }
    }
}

impl Add for Magnitude {
    type Output = Magnitude;

    fn add(self, rhs: Self) -> Self {
        if self.is_zero() {
            return rhs;
        }
        if rhs.is_zero() {
            return self;
        }
        if self.is_small() && rhs.is_small() {
            return Self::from_f64(self.mantissa + rhs.mantissa);
        }
        let (big, small) = if self.cmp_abs(&rhs) == Ordering::Less {
            (rhs, self)
        } else {
            (self, rhs)
        };
        let (bm, be) = big.scientific();
        let (sm, se) = small.scientific();
        let gap = be.saturating_sub(se);
        if gap > SIGNIFICANT_DECADES {
            return big;
        }
        Self::from_scientific(bm + sm / 10f64.powi(gap as i32), be)
    }
}

impl Sub for Magnitude {
    type Output = Magnitude;

    fn sub(self, rhs: Self) -> Self {
        self + (-rhs)
    }
}

impl Mul for Magnitude {
    type Output = Magnitude;

    fn mul(self, rhs: Self) -> Self {
        if self.is_zero() || rhs.is_zero() {
            return Self::ZERO;
        }
        if self.is_small() && rhs.is_small() {
            let product = self.mantissa * rhs.mantissa;
            if product.is_finite() && product.abs() >= f64::MIN_POSITIVE {
                return Self::from_f64(product);
            }
        }
        let (am, ae) = self.scientific();
        let (bm, be) = rhs.scientific();
        Self::from_scientific(am * bm, ae.saturating_add(be))
    }
}

impl Div for Magnitude {
    type Output = Magnitude;

    /// Division by zero saturates; `0 / 0` is zero.
    fn div(self, rhs: Self) -> Self {
        if self.is_zero() {
            return Self::ZERO;
        }
        if rhs.is_zero() {
            return Self::saturated(self.is_negative());
        }
        if self.is_small() && rhs.is_small() {
            let quotient = self.mantissa / rhs.mantissa;
            if quotient.is_finite() && quotient.abs() >= f64::MIN_POSITIVE {
                return Self::from_f64(quotient);
            }
        }
        let (am, ae) = self.scientific();
        let (bm, be) = rhs.scientific();
        Self::from_scientific(am / bm, ae.saturating_sub(be))
    }
}

impl AddAssign for Magnitude {
    fn add_assign(&mut self, rhs: Self) {
        *self = *self + rhs;
    }
}

impl SubAssign for Magnitude {
    fn sub_assign(&mut self, rhs: Self) {
        *self = *self - rhs;
    }
}

impl MulAssign for Magnitude {
    fn mul_assign(&mut self, rhs: Self) {
        *self = *self * rhs;
    }
}

impl DivAssign for Magnitude {
    fn div_assign(&mut self, rhs: Self) {
        *self = *self / rhs;
    }
}

impl Sum for Magnitude {
    fn sum<I: Iterator<Item = Magnitude>>(iter: I) -> Self {
        iter.fold(Self::ZERO, |acc, x| acc + x)
    }
}

impl<'a> Sum<&'a Magnitude> for Magnitude {
    fn sum<I: Iterator<Item = &'a Magnitude>>(iter: I) -> Self {
        iter.fold(Self::ZERO, |acc, x| acc + *x)
    }
}

impl Product for Magnitude {
    fn product<I: Iterator<Item = Magnitude>>(iter: I) -> Self {
        iter.fold(Self::ONE, |acc, x| acc * x)
    }
}

impl<'a> Product<&'a Magnitude> for Magnitude {
    fn product<I: Iterator<Item = &'a Magnitude>>(iter: I) -> Self {
        iter.fold(Self::ONE, |acc, x| acc * *x)
    }
}

impl From<f64> for Magnitude {
    fn from(value: f64) -> Self {
        Self::from_f64(value)
    }
}

impl From<u64> for Magnitude {
    fn from(value: u64) -> Self {
        Self::from_f64(value as f64)
    }
}

impl From<u32> for Magnitude {
    fn from(value: u32) -> Self {
        Self::from_f64(value as f64)
    }
}

impl From<i32> for Magnitude {
    fn from(value: i32) -> Self {
        Self::from_f64(value as f64)
    }
}

impl fmt::Display for Magnitude {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_small() && (self.is_zero() || (1e-3..1e6).contains(&self.mantissa.abs())) {
            return write!(f, "{}", self.mantissa);
        }
        let (m, e) = self.scientific();
        write!(f, "{:.3}e{}", m, e)
    }
}
