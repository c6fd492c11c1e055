// Copyright (c) 2024 Mike Tsao

use crate::{error::Error, types::Sample};
use byteorder::{ByteOrder, LittleEndian};
use core::str::FromStr;
use serde::{Deserialize, Serialize};
use strum::IntoEnumIterator;
use strum_macros::{Display, EnumCount, EnumIter, FromRepr, IntoStaticStr};

/// The binary encodings a stream can produce. All multi-byte encodings are
/// little-endian.
#[derive(
    Clone,
    Copy,
    Debug,
    Default,
    Display,
    EnumCount,
    EnumIter,
    Eq,
    FromRepr,
    Hash,
    IntoStaticStr,
    PartialEq,
    Serialize,
    Deserialize,
)]
#[repr(u8)]
pub enum SampleFormat {
    /// 32-bit IEEE float, unclamped.
    #[strum(serialize = "f32le")]
    #[serde(rename = "f32le")]
    Float32Le = 0,
    /// Unsigned 8-bit with silence at 128.
    #[strum(serialize = "u8")]
    #[serde(rename = "u8")]
    UnsignedInt8 = 1,
    /// Signed 16-bit.
    #[default]
    #[strum(serialize = "s16le")]
    #[serde(rename = "s16le")]
    SignedInt16Le = 2,
}
impl SampleFormat {
    /// Width of one encoded sample of one channel.
    pub const fn bytes_per_sample(&self) -> usize {
        match self {
            SampleFormat::Float32Le => 4,
            SampleFormat::UnsignedInt8 => 1,
            SampleFormat::SignedInt16Le => 2,
        }
    }

    /// Which [Timbre] a note in this format gets unless it asks otherwise.
    pub const fn default_timbre(&self) -> Timbre {
        match self {
            SampleFormat::Float32Le => Timbre::Rich,
            SampleFormat::UnsignedInt8 | SampleFormat::SignedInt16Le => Timbre::Pure,
        }
    }

    /// Encodes one sample into `out`, which must be exactly
    /// [SampleFormat::bytes_per_sample()] long. `integer_scale` attenuates the
    /// integer encodings, which saturate rather than wrap. The float encoding
    /// ignores it and passes the value through.
    pub fn encode(&self, sample: Sample, integer_scale: f64, out: &mut [u8]) {
        match self {
            SampleFormat::Float32Le => LittleEndian::write_f32(out, sample.0 as f32),
            SampleFormat::UnsignedInt8 => out[0] = quantize_u8(sample, integer_scale),
            SampleFormat::SignedInt16Le => {
                LittleEndian::write_i16(out, quantize_i16(sample, integer_scale))
            }
        }
    }

    /// Writes the same sample to every channel of `frame`. The frame's length
    /// determines the channel count.
    pub fn encode_frame(&self, sample: Sample, integer_scale: f64, frame: &mut [u8]) {
        frame
            .chunks_exact_mut(self.bytes_per_sample())
            .for_each(|channel| self.encode(sample, integer_scale, channel));
    }
}
impl FromStr for SampleFormat {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        SampleFormat::iter()
            .find(|format| <&'static str>::from(format) == s)
            .ok_or_else(|| {
                Error::InvalidFormat(format!("{s} (expected one of u8, s16le, or f32le)"))
            })
    }
}
impl TryFrom<u8> for SampleFormat {
    type Error = Error;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        SampleFormat::from_repr(value)
            .ok_or_else(|| Error::InvalidFormat(format!("format discriminant {value}")))
    }
}

fn quantize_u8(sample: Sample, scale: f64) -> u8 {
    const MAX: f64 = 127.0;
    ((sample.0 * scale * MAX).round() + 128.0).clamp(u8::MIN as f64, u8::MAX as f64) as u8
}

fn quantize_i16(sample: Sample, scale: f64) -> i16 {
    const MAX: f64 = 32767.0;
    (sample.0 * scale * MAX)
        .round()
        .clamp(i16::MIN as f64, i16::MAX as f64) as i16
}

/// Whether a note mixes overtones into its fundamental.
#[derive(Clone, Copy, Debug, Default, Display, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Timbre {
    /// A unit-amplitude enveloped sine, nothing else.
    Pure,
    /// The weighted fundamental plus its overtones.
    #[default]
    Rich,
}
