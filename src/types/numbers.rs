// Copyright (c) 2024 Mike Tsao

//! Numeric types used throughout the system.

use core::{
    fmt::Display,
    ops::{Add, AddAssign, Div, Mul},
};
use serde::{Deserialize, Serialize};

/// [Sample] represents a single-channel audio sample before it's packed into a
/// [SampleFormat](crate::types::SampleFormat). It isn't clamped; overtones can
/// push it past 1.0.
#[derive(Clone, Copy, Debug, Default, PartialEq, PartialOrd)]
pub struct Sample(pub f64);
impl Sample {
    /// A [Sample] that is silent.
    pub const SILENCE: Sample = Sample(0.0);
    /// A [Sample] having the nominal maximum positive value.
    pub const MAX: Sample = Sample(1.0);
    /// A [Sample] having the nominal maximum negative value.
    pub const MIN: Sample = Sample(-1.0);
}
impl Add<Self> for Sample {
    type Output = Self;

    fn add(self, rhs: Self) -> Self::Output {
        Self(self.0 + rhs.0)
    }
}
impl AddAssign<Self> for Sample {
    fn add_assign(&mut self, rhs: Self) {
        self.0 += rhs.0;
    }
}
impl Mul<f64> for Sample {
    type Output = Self;

    fn mul(self, rhs: f64) -> Self::Output {
        Self(self.0 * rhs)
    }
}
impl From<f64> for Sample {
    fn from(value: f64) -> Self {
        Sample(value)
    }
}
impl From<f32> for Sample {
    fn from(value: f32) -> Self {
        Sample(value as f64)
    }
}
impl From<Sample> for f64 {
    fn from(value: Sample) -> Self {
        value.0
    }
}

/// Hertz. 440 = A4.
#[derive(Clone, Copy, Debug, Default, PartialEq, PartialOrd, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct FrequencyHz(pub f64);
impl FrequencyHz {
    /// Whether this frequency can drive an oscillator.
    pub fn is_audible_candidate(&self) -> bool {
        self.0.is_finite() && self.0 > 0.0
    }
}
impl Display for FrequencyHz {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_fmt(format_args!("{:.2}Hz", self.0))
    }
}
impl From<f64> for FrequencyHz {
    fn from(value: f64) -> Self {
        Self(value)
    }
}
impl From<FrequencyHz> for f64 {
    fn from(value: FrequencyHz) -> Self {
        value.0
    }
}
impl Mul<f64> for FrequencyHz {
    type Output = Self;

    fn mul(self, rhs: f64) -> Self::Output {
        Self(self.0 * rhs)
    }
}
impl Div<Self> for FrequencyHz {
    type Output = f64;

    fn div(self, rhs: Self) -> Self::Output {
        self.0 / rhs.0
    }
}
