// Copyright (c) 2024 Mike Tsao

//! Common data types used throughout the system.

/// The most commonly used imports.
pub mod prelude {
    pub use super::{
        FrequencyHz, Normal, Sample, SampleFormat, SampleRate, Seconds, Timbre,
    };
}

pub use {
    format::{SampleFormat, Timbre},
    numbers::{FrequencyHz, Sample},
    ranges::{Normal, RangedF64},
    time::{SampleRate, Seconds},
};

mod format;
mod numbers;
mod ranges;
mod time;
