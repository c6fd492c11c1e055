// Copyright (c) 2024 Mike Tsao

#![deny(missing_docs, unused_imports, unused_variables)]
#![allow(rustdoc::private_intra_doc_links)]

//! Notestream turns musical notes into streams of PCM bytes.
//!
//! A note is a sine fundamental plus a handful of overtones, shaped by an ADSR
//! envelope. The caller describes the note with a [NoteRequest](cores::NoteRequest),
//! builds a [NoteStream](cores::NoteStream), and then pulls byte buffers of any
//! size from it until it reports end-of-stream.
//!
//! * *Easiest*: Use a [Voice](cores::Voice), which carries the waveform's phase
//!   from one note to the next so that a melody doesn't click between notes.
//! * *More control*: Build each [NoteStream](cores::NoteStream) yourself and pass
//!   the previous note's [ending
//!   phase](cores::StreamPacker::ending_phase()) to the next one.
//! * *Maximum control*: Use the [Envelope](elements::Envelope) and
//!   [PartialSynthesizer](elements::PartialSynthesizer) directly, or drive a
//!   [StreamPacker](cores::StreamPacker) with your own
//!   [Generates](traits::Generates) implementation.
//!
//! All work happens synchronously inside the pull call. A stream belongs to
//! one caller at a time; simultaneous notes each get their own stream.

/// A collection of imports that are useful to users of this crate. `use
/// notestream::prelude::*;` for easier onboarding.
pub mod prelude {
    pub use super::{
        cores::prelude::*, elements::prelude::*, error::Error, traits::prelude::*,
        types::prelude::*, util::prelude::*,
    };
}

pub use {
    cores::{NoteStream, Voice},
    error::{Error, Result},
};

pub mod cores;
pub mod elements;
pub mod error;
pub mod traits;
pub mod types;
pub mod util;
