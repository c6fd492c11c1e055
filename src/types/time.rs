// Copyright (c) 2024 Mike Tsao

use core::{
    fmt::Display,
    ops::{Add, Mul, Sub},
    time::Duration,
};
use serde::{Deserialize, Serialize};

/// Represents the [seconds](https://en.wikipedia.org/wiki/Second) unit of time.
#[derive(Clone, Copy, Debug, Default, PartialEq, PartialOrd, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct Seconds(pub f64);
impl Seconds {
    /// Zero seconds.
    pub const fn zero() -> Seconds {
        Seconds(0.0)
    }
}
impl Display for Seconds {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_fmt(format_args!("{}s", self.0))
    }
}
impl From<f64> for Seconds {
    fn from(value: f64) -> Self {
        Self(value)
    }
}
impl From<Duration> for Seconds {
    fn from(value: Duration) -> Self {
        Self(value.as_secs_f64())
    }
}
impl Add<Self> for Seconds {
    type Output = Self;

    fn add(self, rhs: Self) -> Self::Output {
        Self(self.0 + rhs.0)
    }
}
impl Sub<Self> for Seconds {
    type Output = Self;

    fn sub(self, rhs: Self) -> Self::Output {
        Self(self.0 - rhs.0)
    }
}
impl Mul<f64> for Seconds {
    type Output = Self;

    fn mul(self, rhs: f64) -> Self::Output {
        Self(self.0 * rhs)
    }
}

/// Samples per second. Always a positive integer.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct SampleRate(pub usize);
#[allow(missing_docs)]
impl SampleRate {
    pub const DEFAULT_SAMPLE_RATE: usize = 48000;
    pub const DEFAULT: SampleRate = SampleRate::new(Self::DEFAULT_SAMPLE_RATE);

    pub const fn new(value: usize) -> Self {
        Self(value)
    }

    /// The highest frequency this rate can represent without aliasing.
    pub fn nyquist(&self) -> f64 {
        self.0 as f64 / 2.0
    }

    /// The time at which the given sample index occurs.
    pub fn seconds_at(&self, index: u64) -> Seconds {
        Seconds(index as f64 / self.0 as f64)
    }
}
impl Default for SampleRate {
    fn default() -> Self {
        Self::DEFAULT
    }
}
impl Display for SampleRate {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_fmt(format_args!("{}Hz", self.0))
    }
}
impl From<SampleRate> for f64 {
    fn from(value: SampleRate) -> Self {
        value.0 as f64
    }
}
impl From<usize> for SampleRate {
    fn from(value: usize) -> Self {
        Self::new(value)
    }
}
