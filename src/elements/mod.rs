// Copyright (c) 2024 Mike Tsao

//! Building blocks for note synthesis: the amplitude envelope and the
//! fundamental-plus-overtones signal it shapes.

/// The most commonly used imports.
pub mod prelude {
    pub use super::{
        EnvelopeShape, EnvelopeShapeBuilder, OvertonePhasing, PartialSynthesizer, SynthesisParams,
        SynthesisParamsBuilder,
    };
}

pub use envelope::{Envelope, EnvelopeShape, EnvelopeShapeBuilder};
pub use partials::{
    Overtone, OvertonePhasing, PartialSynthesizer, SynthesisParams, SynthesisParamsBuilder,
};

mod envelope;
mod partials;
