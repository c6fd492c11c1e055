// Copyright (c) 2024 Mike Tsao

use crate::{
    error::{Error, Result},
    types::{FrequencyHz, SampleFormat, SampleRate, Timbre},
};
use core::time::Duration;
use derivative::Derivative;
use derive_builder::Builder;
use serde::{Deserialize, Serialize};

/// Settings shared by every stream in a run: how fast, how wide, and how each
/// sample is encoded.
#[derive(Clone, Builder, Debug, Derivative, PartialEq, Serialize, Deserialize)]
#[derivative(Default)]
#[builder(default)]
#[serde(rename_all = "kebab-case")]
pub struct StreamConfig {
    /// Frames per second.
    pub sample_rate: SampleRate,
    /// Channels per frame. Every channel carries the same signal.
    #[derivative(Default(value = "2"))]
    pub channel_count: u16,
    /// The encoding of each channel's sample.
    pub format: SampleFormat,
}
impl StreamConfig {
    /// Checks that the configuration describes a real stream.
    pub fn validate(&self) -> Result<()> {
        if self.sample_rate.0 == 0 {
            return Err(Error::invalid("sample rate", "must be positive, got 0"));
        }
        if self.channel_count == 0 {
            return Err(Error::invalid("channel count", "must be at least 1, got 0"));
        }
        Ok(())
    }

    /// Bytes in one frame: one sample for each channel.
    pub fn frame_size(&self) -> usize {
        self.channel_count as usize * self.format.bytes_per_sample()
    }
}

/// One note to play.
#[derive(Clone, Builder, Debug, Derivative, PartialEq, Serialize, Deserialize)]
#[derivative(Default)]
#[builder(default, setter(into))]
#[serde(rename_all = "kebab-case")]
pub struct NoteRequest {
    /// The fundamental's pitch.
    #[derivative(Default(value = "FrequencyHz(440.0)"))]
    pub frequency: FrequencyHz,
    /// How long the note lasts, release included.
    #[derivative(Default(value = "Duration::from_millis(18)"))]
    pub duration: Duration,
    /// Radians. Use the previous note's ending phase to avoid a click between
    /// notes; zero for the first note.
    pub starting_phase: f64,
    /// Overrides the format's [default timbre](SampleFormat::default_timbre).
    #[builder(setter(strip_option))]
    pub timbre: Option<Timbre>,
}
impl NoteRequest {
    /// A note that starts at phase zero with the format's default timbre.
    pub fn new(frequency: FrequencyHz, duration: Duration) -> Self {
        Self {
            frequency,
            duration,
            starting_phase: 0.0,
            timbre: None,
        }
    }

    /// Returns this note, beginning at the given phase instead.
    pub fn with_starting_phase(mut self, starting_phase: f64) -> Self {
        self.starting_phase = starting_phase;
        self
    }

    /// The timbre this note gets when encoded as `format`.
    pub fn timbre_for(&self, format: SampleFormat) -> Timbre {
        self.timbre.unwrap_or_else(|| format.default_timbre())
    }
}
