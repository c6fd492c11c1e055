// Copyright (c) 2024 Mike Tsao

use crate::types::FrequencyHz;

/// The piano key that sounds [REFERENCE_FREQUENCY]. Keys are numbered from 1.
pub const REFERENCE_KEY: u8 = 49;
/// A4.
pub const REFERENCE_FREQUENCY: FrequencyHz = FrequencyHz(440.0);
/// The number of keys on the extended keyboard, which reaches beyond the 88
/// keys of a standard piano.
pub const KEY_COUNT: u8 = 99;

/// Returns the twelve-tone equal-tempered frequency of the given piano key.
pub fn piano_key_frequency(key: u8) -> FrequencyHz {
    REFERENCE_FREQUENCY * 2.0f64.powf((key as f64 - REFERENCE_KEY as f64) / 12.0)
}
