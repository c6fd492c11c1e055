// Copyright (c) 2024 Mike Tsao

//! The traits that connect signal generators to the byte streams that carry
//! their output.

use core::fmt::Debug;

/// Quick import of all important traits.
pub mod prelude {
    pub use super::Generates;
}

/// Something that [Generates] produces a signal that's a pure function of the
/// sample index. Stateless generators make it possible to resume a stream at
/// any position without replaying it.
pub trait Generates<V>: Debug {
    /// Fills `values` with the signal for the consecutive sample indexes
    /// beginning at `start`.
    fn generate(&mut self, start: u64, values: &mut [V]);
}
