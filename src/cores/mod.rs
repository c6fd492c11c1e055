// Copyright (c) 2024 Mike Tsao

//! The streaming machinery: configuration, the packer that turns a signal into
//! byte frames, and the [Voice] that chains notes together.

/// The most commonly used imports.
pub mod prelude {
    pub use super::{
        ConstantSource, NoteRequest, NoteRequestBuilder, NoteStream, Pulled, StreamConfig,
        StreamConfigBuilder, StreamPacker, StreamState, Voice,
    };
}

pub use config::{NoteRequest, NoteRequestBuilder, StreamConfig, StreamConfigBuilder};
pub use constant::{ConstantSource, ConstantSourceBuilder};
pub use packer::{NoteStream, Pulled, StreamPacker, StreamState};
pub use voice::Voice;

mod config;
mod constant;
mod leftover;
mod packer;
mod voice;
