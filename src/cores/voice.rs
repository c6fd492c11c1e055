// Copyright (c) 2024 Mike Tsao

use super::{NoteRequest, NoteStream, StreamConfig};
use crate::{elements::SynthesisParams, error::Result, types::FrequencyHz};
use core::time::Duration;

/// Plays a sequence of notes, each picking up the waveform where the last one
/// left off.
#[derive(Clone, Debug)]
pub struct Voice {
    config: StreamConfig,
    params: SynthesisParams,
    phase: f64,
}
impl Voice {
    /// Checks both halves up front, so that [Voice::play()] fails only for bad
    /// notes.
    pub fn new(config: StreamConfig, params: SynthesisParams) -> Result<Self> {
        config.validate()?;
        params.validate()?;
        Ok(Self {
            config,
            params,
            phase: 0.0,
        })
    }

    /// Starts the next note. The voice advances to the note's ending phase
    /// right away, whether or not the returned stream is ever pulled.
    pub fn play(&mut self, frequency: FrequencyHz, duration: Duration) -> Result<NoteStream> {
        self.play_note(&NoteRequest::new(frequency, duration))
    }

    /// Like [Voice::play()], but with full control over the note. The
    /// request's starting phase is ignored in favor of the voice's.
    pub fn play_note(&mut self, note: &NoteRequest) -> Result<NoteStream> {
        let note = note.clone().with_starting_phase(self.phase);
        let stream = NoteStream::new(&self.config, &self.params, &note)?;
        self.phase = stream.ending_phase();
        Ok(stream)
    }

    /// The phase the next note will start at.
    pub fn phase(&self) -> f64 {
        self.phase
    }

    /// Starts the next note from phase zero.
    pub fn reset_phase(&mut self) {
        self.phase = 0.0;
    }

    #[allow(missing_docs)]
    pub fn config(&self) -> &StreamConfig {
        &self.config
    }

    #[allow(missing_docs)]
    pub fn params(&self) -> &SynthesisParams {
        &self.params
    }
}
