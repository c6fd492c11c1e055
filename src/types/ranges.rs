// Copyright (c) 2024 Mike Tsao

use core::{
    fmt::Display,
    ops::{Mul, RangeInclusive},
};
use serde::{Deserialize, Serialize};

/// [RangedF64] enforces the given range limits while not becoming too expensive
/// to use compared to a plain f64. It clamps at creation and when converting
/// from an f64. Math operations are not checked, so prefer f64 sourced from
/// [RangedF64] when doing arithmetic.
///
/// Note that [RangedF64] doesn't tell you when clamping happens. It just does
/// it, silently.
#[derive(Clone, Copy, Debug, PartialEq, PartialOrd, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct RangedF64<const LOWER: i8, const UPPER: i8>(pub f64);
#[allow(missing_docs)]
impl<const LOWER: i8, const UPPER: i8> RangedF64<LOWER, UPPER> {
    /// The highest valid value.
    pub const MAX: f64 = UPPER as f64;
    /// The lowest valid value.
    pub const MIN: f64 = LOWER as f64;
    /// A zero value.
    pub const ZERO: f64 = 0.0;

    pub fn new(value: f64) -> Self {
        Self(value.clamp(Self::MIN, Self::MAX))
    }
    pub const fn maximum() -> Self {
        Self(Self::MAX)
    }
    pub const fn zero() -> Self {
        Self(Self::ZERO)
    }
}
impl<const LOWER: i8, const UPPER: i8> Display for RangedF64<LOWER, UPPER> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_fmt(format_args!("{}", self.0))
    }
}
impl<const LOWER: i8, const UPPER: i8> From<RangedF64<LOWER, UPPER>> for f64 {
    fn from(value: RangedF64<LOWER, UPPER>) -> Self {
        value.0.clamp(Self::MIN, Self::MAX)
    }
}
impl<const LOWER: i8, const UPPER: i8> From<f64> for RangedF64<LOWER, UPPER> {
    fn from(value: f64) -> Self {
        Self(value.clamp(Self::MIN, Self::MAX))
    }
}

/// A [Normal] is a RangedF64 whose range is [0.0, 1.0]. Envelope amplitudes and
/// the sustain level are [Normal]s.
pub type Normal = RangedF64<0, 1>;
#[allow(missing_docs)]
impl Normal {
    pub const fn range() -> RangeInclusive<f64> {
        0.0..=1.0
    }
    pub const fn new_const(value: f64) -> Self {
        Self(value)
    }
}
impl Default for Normal {
    // Full scale, so that a default-constructed gain doesn't silence a signal.
    fn default() -> Self {
        Self(1.0)
    }
}
impl Mul<Normal> for f64 {
    type Output = Self;

    fn mul(self, rhs: Normal) -> Self::Output {
        self * rhs.0
    }
}
impl Mul<f64> for Normal {
    type Output = Self;

    fn mul(self, rhs: f64) -> Self::Output {
        Self(self.0 * rhs)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn normal_clamps_on_entry() {
        assert_eq!(Normal::new(1.5), Normal::maximum());
        assert_eq!(Normal::new(-0.5), Normal::zero());
        assert_eq!(Normal::from(0.25).0, 0.25);
        assert_eq!(Normal::from(2.0), Normal::maximum());
    }

    #[test]
    fn normal_math_is_unchecked() {
        // Arithmetic may wander out of range; conversion back to f64 clamps.
        let n = Normal::new(0.8) * 2.0;
        assert_eq!(n.0, 1.6);
        assert_eq!(f64::from(n), 1.0);
        assert_eq!(0.5 * Normal::new(0.5), 0.25);
    }

    #[test]
    fn normal_defaults_to_full_scale() {
        assert_eq!(Normal::default().0, 1.0);
    }
}
