// Copyright (c) 2024 Mike Tsao

use super::{leftover::Leftover, NoteRequest, StreamConfig};
use crate::{
    elements::{PartialSynthesizer, SynthesisParams},
    error::{Error, Result},
    traits::Generates,
    types::{Sample, SampleFormat},
};
use core::time::Duration;
use strum_macros::Display;

const NANOS_PER_SECOND: u128 = 1_000_000_000;

/// The outcome of a successful [StreamPacker::pull()].
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Pulled {
    /// This many bytes were written, and the stream has more to give.
    Bytes(usize),
    /// This many bytes were written, possibly zero, and the stream is done.
    EndOfStream(usize),
}
impl Pulled {
    /// How many bytes were written.
    pub fn len(&self) -> usize {
        match self {
            Pulled::Bytes(n) | Pulled::EndOfStream(n) => *n,
        }
    }

    /// Whether nothing was written.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Whether the stream has finished.
    pub fn is_end_of_stream(&self) -> bool {
        matches!(self, Pulled::EndOfStream(_))
    }
}

/// Where a [StreamPacker] is in its life.
#[derive(Clone, Copy, Debug, Display, PartialEq, Eq)]
pub enum StreamState {
    /// More frames remain to be generated.
    Streaming,
    /// Part of a frame is held back from the last pull, waiting for the next.
    Draining,
    /// Everything has been delivered. Terminal.
    Exhausted,
}

/// Turns a [Generates] signal into a stream of encoded frames that callers pull
/// in buffers of whatever size suits them.
///
/// Frames are generated on demand, whole frames at a time. When a caller's
/// buffer ends partway through a frame, the rest of that frame waits in a small
/// leftover store and goes out first on the next pull.
#[derive(Debug)]
pub struct StreamPacker<G: Generates<Sample>> {
    generator: G,
    format: SampleFormat,
    integer_scale: f64,
    frame_size: usize,

    /// None if the stream is too long to address.
    total_len: Option<u64>,
    /// Bytes generated so far, including any still held in `leftover`.
    position: u64,
    leftover: Leftover,
    is_end_signaled: bool,
    ending_phase: f64,

    // Working buffers, reused across pulls.
    samples: Vec<Sample>,
    scratch: Vec<u8>,
}

/// The stream for one synthesized note.
pub type NoteStream = StreamPacker<PartialSynthesizer>;

impl StreamPacker<PartialSynthesizer> {
    /// Prepares a note for streaming. Nothing is synthesized until the first
    /// pull.
    pub fn new(
        config: &StreamConfig,
        params: &SynthesisParams,
        note: &NoteRequest,
    ) -> Result<Self> {
        config.validate()?;
        let synthesizer = PartialSynthesizer::new(
            config.sample_rate,
            note.frequency,
            note.duration.into(),
            note.starting_phase,
            note.timbre_for(config.format),
            params,
        )?;
        let total_len = stream_len(config, note.duration);
        let ending_phase = match total_len {
            Some(len) => synthesizer.phase_after(len / config.frame_size() as u64),
            None => synthesizer.starting_phase(),
        };
        log::debug!(
            "note {} for {:?} as {}: {:?} bytes in {}-byte frames, phase {:.4} -> {:.4}",
            note.frequency,
            note.duration,
            config.format,
            total_len,
            config.frame_size(),
            synthesizer.starting_phase(),
            ending_phase
        );
        Ok(Self::new_with(
            synthesizer,
            config,
            params.integer_scale,
            total_len,
            ending_phase,
        ))
    }
}

impl<G: Generates<Sample>> StreamPacker<G> {
    /// Streams an arbitrary generator for `duration`. Such a stream has no
    /// notion of phase, so its [ending phase](Self::ending_phase()) is zero.
    pub fn new_with_generator(
        generator: G,
        config: &StreamConfig,
        duration: Duration,
        integer_scale: f64,
    ) -> Result<Self> {
        config.validate()?;
        if duration.is_zero() {
            return Err(Error::invalid("duration", "must be positive, got 0"));
        }
        if !integer_scale.is_finite() || integer_scale < 0.0 {
            return Err(Error::invalid(
                "integer scale",
                format!("must be non-negative, got {integer_scale}"),
            ));
        }
        Ok(Self::new_with(
            generator,
            config,
            integer_scale,
            stream_len(config, duration),
            0.0,
        ))
    }

    fn new_with(
        generator: G,
        config: &StreamConfig,
        integer_scale: f64,
        total_len: Option<u64>,
        ending_phase: f64,
    ) -> Self {
        let frame_size = config.frame_size();
        Self {
            generator,
            format: config.format,
            integer_scale,
            frame_size,
            total_len,
            position: 0,
            leftover: Leftover::new(frame_size),
            is_end_signaled: false,
            ending_phase,
            samples: Vec::default(),
            scratch: Vec::default(),
        }
    }

    /// Fills as much of `buffer` as the stream can, and reports whether the
    /// stream has ended.
    ///
    /// [Pulled::EndOfStream] arrives exactly once, on the pull that delivers
    /// the last byte (or on the first pull of an empty stream). Every pull
    /// after that writes nothing and reports [Pulled::EndOfStream] again. An
    /// error leaves the stream exactly as it was.
    pub fn pull(&mut self, buffer: &mut [u8]) -> Result<Pulled> {
        let total_len = self.total_len.ok_or(Error::Overflow)?;
        if self.is_end_signaled {
            return Ok(Pulled::EndOfStream(0));
        }

        // Everything fallible happens before any state changes.
        let from_leftover = self.leftover.len().min(buffer.len());
        let request = buffer.len() - from_leftover;
        let generate_len = self.plan_generation(request, total_len)?;

        let mut written = self.leftover.drain_into(buffer);
        if generate_len > 0 {
            self.render(self.position / self.frame_size as u64, generate_len);
            let copied = request.min(generate_len);
            buffer[written..written + copied].copy_from_slice(&self.scratch[..copied]);
            self.leftover.stash(&self.scratch[copied..generate_len]);
            self.position += generate_len as u64;
            written += copied;
        }
        log::trace!(
            "pulled {written} of {} bytes at {}/{total_len}, {} held",
            buffer.len(),
            self.position,
            self.leftover.len()
        );

        if self.position == total_len && self.leftover.is_empty() {
            self.is_end_signaled = true;
            log::debug!("end of stream after {total_len} bytes");
            Ok(Pulled::EndOfStream(written))
        } else {
            Ok(Pulled::Bytes(written))
        }
    }

    // Whole frames enough to cover the request, but no more than remain.
    fn plan_generation(&self, request: usize, total_len: u64) -> Result<usize> {
        if request == 0 {
            return Ok(0);
        }
        let frame_size = self.frame_size as u64;
        let request = u64::try_from(request).map_err(|_| Error::Overflow)?;
        let wanted = request
            .div_ceil(frame_size)
            .checked_mul(frame_size)
            .ok_or(Error::Overflow)?;
        let remaining = total_len - self.position;
        usize::try_from(wanted.min(remaining)).map_err(|_| Error::Overflow)
    }

    fn render(&mut self, start_frame: u64, len: usize) {
        let frames = len / self.frame_size;
        self.samples.resize(frames, Sample::SILENCE);
        self.generator.generate(start_frame, &mut self.samples);
        self.scratch.resize(len, 0);
        for (frame, sample) in self
            .scratch
            .chunks_exact_mut(self.frame_size)
            .zip(self.samples.iter())
        {
            self.format
                .encode_frame(*sample, self.integer_scale, frame);
        }
    }

    /// Where the stream is in its life.
    pub fn state(&self) -> StreamState {
        if !self.leftover.is_empty() {
            StreamState::Draining
        } else if self.is_end_signaled || self.total_len == Some(self.position) {
            StreamState::Exhausted
        } else {
            StreamState::Streaming
        }
    }

    /// The stream's full length in bytes, always a whole number of frames and
    /// a multiple of four.
    pub fn total_len(&self) -> Result<u64> {
        self.total_len.ok_or(Error::Overflow)
    }

    /// Bytes generated so far, including any held back for the next pull.
    pub fn position(&self) -> u64 {
        self.position
    }

    /// Bytes handed to the caller so far.
    pub fn delivered(&self) -> u64 {
        self.position - self.leftover.len() as u64
    }

    /// Bytes per frame.
    pub fn frame_size(&self) -> usize {
        self.frame_size
    }

    #[allow(missing_docs)]
    pub fn format(&self) -> SampleFormat {
        self.format
    }

    /// The phase, in [0, 2π), at which the next note should start so that its
    /// waveform continues this one's. Known from construction onward.
    pub fn ending_phase(&self) -> f64 {
        self.ending_phase
    }

    /// The signal source.
    pub fn generator(&self) -> &G {
        &self.generator
    }
}

impl<G: Generates<Sample>> std::io::Read for StreamPacker<G> {
    fn read(&mut self, buf: &mut [u8]) -> std::io::Result<usize> {
        self.pull(buf)
            .map(|pulled| pulled.len())
            .map_err(|e| std::io::Error::new(std::io::ErrorKind::Other, e))
    }
}

/// Stream length in bytes: duration × sample rate × frame size, rounded down
/// so that it ends on both a frame boundary and a four-byte boundary.
fn stream_len(config: &StreamConfig, duration: Duration) -> Option<u64> {
    let frame_size = config.frame_size() as u128;
    let block = frame_size / gcd(frame_size, 4) * 4;
    let bytes = frame_size
        .checked_mul(config.sample_rate.0 as u128)?
        .checked_mul(duration.as_nanos())?
        / NANOS_PER_SECOND;
    u64::try_from(bytes / block * block).ok()
}

fn gcd(a: u128, b: u128) -> u128 {
    if b == 0 {
        a
    } else {
        gcd(b, a % b)
    }
}
