// Copyright (c) 2024 Mike Tsao

use crate::{traits::Generates, types::Sample};
use derive_builder::Builder;
use serde::{Deserialize, Serialize};

/// Produces a constant signal. Used for ensuring that a known signal value gets
/// all the way through the packer.
#[derive(Clone, Builder, Debug, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
#[builder(default)]
pub struct ConstantSource {
    /// The value of the constant signal. It isn't limited to [-1.0, 1.0],
    /// because this source exists to test edge conditions.
    level: f64,
}
impl Generates<Sample> for ConstantSource {
    fn generate(&mut self, _start: u64, values: &mut [Sample]) {
        values.fill(Sample(self.level));
    }
}
impl ConstantSource {
    /// Higher than maximum valid positive value.
    pub const TOO_LOUD: f64 = 1.1;
    /// Maximum valid positive value.
    pub const LOUD: f64 = 1.0;
    /// An ordinary positive value.
    pub const MEDIUM: f64 = 0.5;
    /// Silence.
    pub const SILENT: f64 = 0.0;
    /// Lowest negative value.
    pub const LOUD_NEGATIVE: f64 = -1.0;

    /// Creates a source that always emits `level`.
    pub fn new_with(level: f64) -> Self {
        Self { level }
    }

    /// The constant signal level.
    pub fn level(&self) -> f64 {
        self.level
    }
}
