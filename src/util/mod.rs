// Copyright (c) 2024 Mike Tsao

//! System utilities.

/// Commonly used imports.
pub mod prelude {
    pub use super::{keys::piano_key_frequency, rng::Rng};
}

pub use keys::{piano_key_frequency, KEY_COUNT, REFERENCE_FREQUENCY, REFERENCE_KEY};
pub use rng::Rng;

mod keys;
mod rng;
