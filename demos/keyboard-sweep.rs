// Copyright (c) 2024 Mike Tsao

//! The `keyboard-sweep` example plays every key of an extended piano keyboard,
//! highest first, and writes the result as a WAV file (or raw PCM). Each key
//! starts before the last one has finished, so several notes sound at once,
//! each from its own stream.

use clap::Parser;
use notestream::{prelude::*, util::KEY_COUNT};
use std::{
    fs::File,
    io::{BufWriter, Write},
    path::{Path, PathBuf},
    time::Duration,
};

/// A new note starts after this fraction of the previous note's length.
const NOTE_SPACING: f64 = 0.6;

#[derive(Parser, Debug)]
#[clap(author, version, about, long_about = None)]
struct Args {
    /// Where to write the output
    #[clap(default_value = "keyboard-sweep.wav")]
    output: PathBuf,

    /// Frames per second
    #[clap(short = 'r', long, default_value_t = 48000)]
    sample_rate: usize,

    /// Channels per frame
    #[clap(short = 'c', long, default_value_t = 2)]
    channel_count: u16,

    /// Sample format: u8, s16le, or f32le
    #[clap(short = 'f', long, default_value = "s16le")]
    format: SampleFormat,

    /// Length of each note in milliseconds
    #[clap(short = 'd', long, default_value_t = 120)]
    duration_ms: u64,

    /// Fixed seed for overtone phases (default derives it from each note's
    /// frequency)
    #[clap(short = 's', long)]
    seed: Option<u64>,

    /// Bytes requested per pull. Odd sizes exercise the partial-frame path.
    #[clap(short = 'b', long, default_value_t = 1001)]
    buffer_size: usize,

    /// Write headerless PCM instead of WAV
    #[clap(long, value_parser)]
    raw: bool,
}

/// A note that's still being pulled, and where it lands in the mix.
struct Sounding {
    stream: NoteStream,
    start_frame: usize,
    received: Vec<u8>,
    frames_mixed: usize,
}
impl Sounding {
    fn new(stream: NoteStream, start_frame: usize) -> Self {
        Self {
            stream,
            start_frame,
            received: Vec::default(),
            frames_mixed: 0,
        }
    }

    /// Pulls until the note has covered the mix up to `until_frame`. Returns
    /// false once the note has ended.
    fn advance(
        &mut self,
        until_frame: usize,
        buffer: &mut [u8],
        mix: &mut Vec<f64>,
    ) -> anyhow::Result<bool> {
        let wanted = until_frame.saturating_sub(self.start_frame) * self.stream.frame_size();
        let mut is_sounding = true;
        while is_sounding && (self.stream.delivered() as usize) < wanted {
            let n = buffer.len().min(wanted - self.stream.delivered() as usize);
            let pulled = self.stream.pull(&mut buffer[..n])?;
            self.received.extend_from_slice(&buffer[..pulled.len()]);
            is_sounding = !pulled.is_end_of_stream();
        }
        self.mix_into(mix);
        Ok(is_sounding)
    }

    // Adds every whole frame received so far. A partial frame waits for the
    // rest of its bytes.
    fn mix_into(&mut self, mix: &mut Vec<f64>) {
        let frame_size = self.stream.frame_size();
        let whole = self.received.len() / frame_size * frame_size;
        let first = self.start_frame + self.frames_mixed;
        let frames = whole / frame_size;
        if mix.len() < first + frames {
            mix.resize(first + frames, 0.0);
        }
        for (slot, frame) in mix[first..first + frames]
            .iter_mut()
            .zip(self.received[..whole].chunks_exact(frame_size))
        {
            *slot += decode(self.stream.format(), frame);
        }
        self.frames_mixed += frames;
        self.received.drain(..whole);
    }
}

fn main() -> anyhow::Result<()> {
    env_logger::init();
    let args = Args::parse();

    let config = StreamConfigBuilder::default()
        .sample_rate(SampleRate::new(args.sample_rate))
        .channel_count(args.channel_count)
        .format(args.format)
        .build()?;
    let params = SynthesisParamsBuilder::default()
        .overtone_phasing(match args.seed {
            Some(seed) => OvertonePhasing::Seeded(seed),
            None => OvertonePhasing::FromFrequency,
        })
        .build()?;
    let mut voice = Voice::new(config.clone(), params)?;

    let duration = Duration::from_millis(args.duration_ms);
    let spacing =
        ((duration.as_secs_f64() * NOTE_SPACING * args.sample_rate as f64).round() as usize).max(1);
    let mut buffer = vec![0u8; args.buffer_size.max(1)];
    let mut mix = Vec::default();
    let mut keys = (1..=KEY_COUNT).rev();
    let mut sounding: Vec<Sounding> = Vec::default();
    let mut step_end = 0;
    let mut most_at_once = 0;
    loop {
        match keys.next() {
            Some(key) => sounding.push(Sounding::new(
                voice.play(piano_key_frequency(key), duration)?,
                step_end,
            )),
            None if sounding.is_empty() => break,
            None => {}
        }
        most_at_once = most_at_once.max(sounding.len());
        step_end += spacing;

        let mut still_sounding = Vec::with_capacity(sounding.len());
        for mut note in sounding.drain(..) {
            if note.advance(step_end, &mut buffer, &mut mix)? {
                still_sounding.push(note);
            }
        }
        sounding = still_sounding;
    }
    eprintln!(
        "Rendered {KEY_COUNT} notes, up to {most_at_once} at once, into {} frames of {} at {}",
        mix.len(),
        config.format,
        config.sample_rate
    );

    if args.raw {
        write_raw(&args.output, &config, &mix)?;
    } else {
        write_wav(&args.output, &config, &mix)?;
    }
    eprintln!("Wrote {}", args.output.display());
    Ok(())
}

/// One channel of a frame, in the format's own units.
fn decode(format: SampleFormat, frame: &[u8]) -> f64 {
    match format {
        SampleFormat::Float32Le => f32::from_le_bytes([frame[0], frame[1], frame[2], frame[3]]) as f64,
        SampleFormat::UnsignedInt8 => frame[0] as f64 - 128.0,
        SampleFormat::SignedInt16Le => i16::from_le_bytes([frame[0], frame[1]]) as f64,
    }
}

fn write_raw(path: &Path, config: &StreamConfig, mix: &[f64]) -> anyhow::Result<()> {
    let mut writer = BufWriter::new(File::create(path)?);
    for value in mix {
        let bytes = match config.format {
            SampleFormat::Float32Le => (*value as f32).to_le_bytes().to_vec(),
            SampleFormat::UnsignedInt8 => vec![(value.round() + 128.0).clamp(0.0, 255.0) as u8],
            SampleFormat::SignedInt16Le => (value
                .round()
                .clamp(i16::MIN as f64, i16::MAX as f64) as i16)
                .to_le_bytes()
                .to_vec(),
        };
        for _ in 0..config.channel_count {
            writer.write_all(&bytes)?;
        }
    }
    writer.flush()?;
    Ok(())
}

fn write_wav(path: &Path, config: &StreamConfig, mix: &[f64]) -> anyhow::Result<()> {
    let (bits_per_sample, sample_format) = match config.format {
        SampleFormat::Float32Le => (32, hound::SampleFormat::Float),
        SampleFormat::UnsignedInt8 => (8, hound::SampleFormat::Int),
        SampleFormat::SignedInt16Le => (16, hound::SampleFormat::Int),
    };
    let spec = hound::WavSpec {
        channels: config.channel_count,
        sample_rate: u32::try_from(config.sample_rate.0)?,
        bits_per_sample,
        sample_format,
    };
    let mut writer = hound::WavWriter::create(path, spec)?;
    for value in mix {
        for _ in 0..config.channel_count {
            match config.format {
                SampleFormat::Float32Le => writer.write_sample(*value as f32)?,
                // hound takes 8-bit samples as signed and offsets them itself.
                SampleFormat::UnsignedInt8 => {
                    writer.write_sample(value.round().clamp(-128.0, 127.0) as i8)?
                }
                SampleFormat::SignedInt16Le => writer
                    .write_sample(value.round().clamp(i16::MIN as f64, i16::MAX as f64) as i16)?,
            }
        }
    }
    writer.finalize()?;
    Ok(())
}
