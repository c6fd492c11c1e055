// Copyright (c) 2024 Mike Tsao

use crate::{
    elements::{Envelope, EnvelopeShape},
    error::{Error, Result},
    traits::Generates,
    types::{FrequencyHz, Sample, SampleRate, Seconds, Timbre},
    util::Rng,
};
use core::f64::consts::TAU;
use derivative::Derivative;
use derive_builder::Builder;
use serde::{Deserialize, Serialize};

/// Where each note's overtone phases come from. Phases are drawn once when the
/// note is built and held for its whole life.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum OvertonePhasing {
    /// Every note draws from an [Rng] with this seed.
    Seeded(u64),
    /// The seed is derived from the note's frequency, so repeated notes of the
    /// same pitch sound identical and renders are reproducible.
    #[default]
    FromFrequency,
    /// The seed comes from the OS, so every run sounds slightly different.
    Entropy,
}
impl OvertonePhasing {
    fn rng_for(&self, frequency: FrequencyHz) -> Result<Rng> {
        Ok(match self {
            OvertonePhasing::Seeded(seed) => Rng::new_with_seed(*seed as u128),
            OvertonePhasing::FromFrequency => Rng::new_with_seed(frequency.0.to_bits() as u128),
            OvertonePhasing::Entropy => Rng::new_from_entropy()?,
        })
    }
}

/// The timbre of every note a stream plays: envelope shape, the balance
/// between fundamental and overtones, and the scale applied to integer sample
/// formats.
#[derive(Clone, Builder, Debug, Derivative, PartialEq, Serialize, Deserialize)]
#[derivative(Default)]
#[builder(default)]
#[serde(rename_all = "kebab-case")]
pub struct SynthesisParams {
    /// The amplitude envelope, fitted to each note's duration.
    pub envelope: EnvelopeShape,
    /// Peak amplitude of the fundamental in the [Timbre::Rich] mix.
    #[derivative(Default(value = "0.6"))]
    pub fundamental_amplitude: f64,
    /// Amplitude of the first overtone. Each later overtone has half the
    /// amplitude of the one before it.
    #[derivative(Default(value = "0.6 * 0.33"))]
    pub overtone_amplitude: f64,
    /// How many overtones to add to the fundamental.
    #[derivative(Default(value = "8"))]
    pub overtone_count: usize,
    /// Overtone `i` (counting from 1) sounds at `i * overtone_multiplier`
    /// times the fundamental frequency.
    #[derivative(Default(value = "2.0"))]
    pub overtone_multiplier: f64,
    /// Attenuation applied when packing into integer sample formats.
    #[derivative(Default(value = "0.3"))]
    pub integer_scale: f64,
    /// Where overtone phases come from.
    pub overtone_phasing: OvertonePhasing,
}
impl SynthesisParams {
    /// The most overtones a note may ask for. Each halves in amplitude, so the
    /// 64th is far below anything a 32-bit float can carry.
    pub const MAX_OVERTONE_COUNT: usize = 64;

    /// Checks that every parameter is usable.
    pub fn validate(&self) -> Result<()> {
        self.envelope.validate()?;
        for (name, value) in [
            ("fundamental amplitude", self.fundamental_amplitude),
            ("overtone amplitude", self.overtone_amplitude),
            ("integer scale", self.integer_scale),
        ] {
            if !value.is_finite() || value < 0.0 {
                return Err(Error::invalid(
                    name,
                    format!("must be non-negative, got {value}"),
                ));
            }
        }
        if self.overtone_count > Self::MAX_OVERTONE_COUNT {
            return Err(Error::invalid(
                "overtone count",
                format!(
                    "must be at most {}, got {}",
                    Self::MAX_OVERTONE_COUNT,
                    self.overtone_count
                ),
            ));
        }
        if !self.overtone_multiplier.is_finite() || self.overtone_multiplier <= 0.0 {
            return Err(Error::invalid(
                "overtone multiplier",
                format!("must be positive, got {}", self.overtone_multiplier),
            ));
        }
        Ok(())
    }
}

/// One sine partial above the fundamental.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Overtone {
    /// Frequency as a multiple of the fundamental.
    pub harmonic: f64,
    /// Peak amplitude before the release taper.
    pub amplitude: f64,
    /// Phase offset in radians, in [0, 2π).
    pub phase: f64,
}

/// Computes the instantaneous value of a note's fundamental and overtones at
/// any sample index.
///
/// The fundamental is shaped by the note's [Envelope]. Overtones keep their
/// amplitude until the release stage, then taper linearly to zero by the end of
/// the note. Nothing is clipped here; that's the packer's job.
#[derive(Clone, Debug)]
pub struct PartialSynthesizer {
    sample_rate: SampleRate,
    frequency: FrequencyHz,
    /// Samples per cycle of the fundamental.
    period: f64,
    starting_phase: f64,
    envelope: Envelope,
    fundamental_amplitude: f64,
    overtones: Vec<Overtone>,
}
impl PartialSynthesizer {
    /// Builds a synthesizer for one note. `starting_phase` is in radians and is
    /// usually the previous note's ending phase.
    pub fn new(
        sample_rate: SampleRate,
        frequency: FrequencyHz,
        duration: Seconds,
        starting_phase: f64,
        timbre: Timbre,
        params: &SynthesisParams,
    ) -> Result<Self> {
        if sample_rate.0 == 0 {
            return Err(Error::invalid("sample rate", "must be positive, got 0"));
        }
        if !frequency.is_audible_candidate() {
            return Err(Error::invalid(
                "frequency",
                format!("must be positive, got {}", frequency.0),
            ));
        }
        if !duration.0.is_finite() || duration.0 <= 0.0 {
            return Err(Error::invalid(
                "duration",
                format!("must be positive, got {duration}"),
            ));
        }
        if !starting_phase.is_finite() {
            return Err(Error::invalid(
                "starting phase",
                format!("must be finite, got {starting_phase}"),
            ));
        }
        params.validate()?;

        let (fundamental_amplitude, overtones) = match timbre {
            Timbre::Pure => (1.0, Vec::default()),
            Timbre::Rich => (
                params.fundamental_amplitude,
                Self::overtones_for(sample_rate, frequency, params)?,
            ),
        };
        Ok(Self {
            sample_rate,
            frequency,
            period: f64::from(sample_rate) / frequency.0,
            starting_phase: wrap_phase(starting_phase),
            envelope: params.envelope.resolve(duration),
            fundamental_amplitude,
            overtones,
        })
    }

    // Overtone `i` always gets the `i`th phase drawn, whatever the sample rate.
    // Harmonics only rise, so the first one at or above Nyquist ends the list.
    fn overtones_for(
        sample_rate: SampleRate,
        frequency: FrequencyHz,
        params: &SynthesisParams,
    ) -> Result<Vec<Overtone>> {
        let audible = (1..=params.overtone_count)
            .take_while(|i| {
                (frequency * (*i as f64 * params.overtone_multiplier)).0 < sample_rate.nyquist()
            })
            .count();
        let mut rng = params.overtone_phasing.rng_for(frequency)?;
        let mut amplitude = params.overtone_amplitude;
        let mut overtones = Vec::with_capacity(audible);
        for i in 1..=audible {
            overtones.push(Overtone {
                harmonic: i as f64 * params.overtone_multiplier,
                amplitude,
                phase: rng.rand_float() * TAU,
            });
            amplitude *= 0.5;
        }
        Ok(overtones)
    }

    /// The raw fundamental oscillation at sample `index`, without envelope or
    /// amplitude. This is the waveform whose phase carries across notes.
    pub fn carrier(&self, index: u64) -> f64 {
        (TAU * index as f64 / self.period + self.starting_phase).sin()
    }

    /// The enveloped fundamental at sample `index`.
    pub fn fundamental(&self, index: u64) -> f64 {
        let amplitude = self.envelope.amplitude(self.sample_rate.seconds_at(index));
        self.carrier(index) * self.fundamental_amplitude * amplitude
    }

    /// The sum of all overtones at sample `index`.
    pub fn overtones(&self, index: u64) -> f64 {
        if self.overtones.is_empty() {
            return 0.0;
        }
        let taper = self
            .envelope
            .release_remaining(self.sample_rate.seconds_at(index));
        let cycles = index as f64 / self.period;
        self.overtones
            .iter()
            .map(|o| (TAU * o.harmonic * cycles + o.phase).sin() * o.amplitude)
            .sum::<f64>()
            * taper
    }

    /// The complete mix at sample `index`.
    pub fn sample(&self, index: u64) -> Sample {
        Sample(self.fundamental(index) + self.overtones(index))
    }

    /// The phase, in [0, 2π), that the fundamental reaches after `frames`
    /// samples. Pass it to the next note to continue the waveform seamlessly.
    pub fn phase_after(&self, frames: u64) -> f64 {
        wrap_phase(self.starting_phase + TAU * frames as f64 / self.period)
    }

    /// The overtones that survived the Nyquist cut, lowest first.
    pub fn overtone_partials(&self) -> &[Overtone] {
        &self.overtones
    }

    /// The phase offsets of the overtones, lowest first.
    pub fn overtone_phases(&self) -> Vec<f64> {
        self.overtones.iter().map(|o| o.phase).collect()
    }

    #[allow(missing_docs)]
    pub fn envelope(&self) -> &Envelope {
        &self.envelope
    }

    #[allow(missing_docs)]
    pub fn frequency(&self) -> FrequencyHz {
        self.frequency
    }

    #[allow(missing_docs)]
    pub fn sample_rate(&self) -> SampleRate {
        self.sample_rate
    }

    /// Samples per cycle of the fundamental.
    pub fn period(&self) -> f64 {
        self.period
    }

    /// The phase the note starts at, reduced to [0, 2π).
    pub fn starting_phase(&self) -> f64 {
        self.starting_phase
    }
}

// `rem_euclid` rounds tiny negative angles up to exactly 2π.
fn wrap_phase(phase: f64) -> f64 {
    let wrapped = phase.rem_euclid(TAU);
    if wrapped >= TAU {
        0.0
    } else {
        wrapped
    }
}

impl Generates<Sample> for PartialSynthesizer {
    fn generate(&mut self, start: u64, values: &mut [Sample]) {
        for (index, value) in (start..).zip(values.iter_mut()) {
            *value = self.sample(index);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use float_cmp::approx_eq;
    use more_asserts::{assert_gt, assert_lt};

    const SAMPLE_RATE: SampleRate = SampleRate::new(48000);

    fn a440(timbre: Timbre, phase: f64) -> PartialSynthesizer {
        PartialSynthesizer::new(
            SAMPLE_RATE,
            FrequencyHz(440.0),
            Seconds(1.0),
            phase,
            timbre,
            &SynthesisParams::default(),
        )
        .unwrap()
    }

    #[test]
    fn default_params() {
        let params = SynthesisParams::default();
        assert_eq!(params.fundamental_amplitude, 0.6);
        assert!(approx_eq!(f64, params.overtone_amplitude, 0.198, epsilon = 1e-12));
        assert_eq!(params.overtone_count, 8);
        assert_eq!(params.overtone_multiplier, 2.0);
        assert_eq!(params.integer_scale, 0.3);
        assert_eq!(params.overtone_phasing, OvertonePhasing::FromFrequency);
        assert!(params.validate().is_ok());
        assert_eq!(params, SynthesisParamsBuilder::default().build().unwrap());
    }

    #[test]
    fn carrier_matches_sine() {
        let synth = a440(Timbre::Pure, 0.0);
        assert_eq!(synth.carrier(0), 0.0);
        let period = 48000.0 / 440.0;
        for p in [1u64, 17, 109, 4800] {
            assert!(approx_eq!(
                f64,
                synth.carrier(p),
                (TAU * p as f64 / period).sin(),
                epsilon = 1e-12
            ));
        }
    }

    #[test]
    fn pure_timbre_is_enveloped_unit_sine() {
        let synth = a440(Timbre::Pure, 0.0);
        assert!(synth.overtone_partials().is_empty());
        for p in [0u64, 100, 2400, 30000, 47999] {
            let t = SAMPLE_RATE.seconds_at(p);
            let expected = synth.carrier(p) * synth.envelope().amplitude(t).0;
            assert_eq!(synth.sample(p).0, expected);
        }
    }

    #[test]
    fn overtones_halve_and_stack_on_even_harmonics() {
        let synth = a440(Timbre::Rich, 0.0);
        let overtones = synth.overtone_partials();
        assert_eq!(overtones.len(), 8);
        for (i, pair) in overtones.windows(2).enumerate() {
            assert!(approx_eq!(
                f64,
                pair[1].amplitude,
                pair[0].amplitude / 2.0,
                epsilon = 1e-12
            ));
            assert_eq!(pair[0].harmonic, 2.0 * (i + 1) as f64);
        }
        for o in overtones {
            assert!((0.0..TAU).contains(&o.phase));
        }
    }

    #[test]
    fn overtones_above_nyquist_are_dropped() {
        // 4 kHz at 48 kHz: harmonics 2, 4 ... 16 reach 64 kHz, so only those
        // below 24 kHz survive.
        let synth = PartialSynthesizer::new(
            SAMPLE_RATE,
            FrequencyHz(4000.0),
            Seconds(1.0),
            0.0,
            Timbre::Rich,
            &SynthesisParams::default(),
        )
        .unwrap();
        let harmonics: Vec<f64> = synth
            .overtone_partials()
            .iter()
            .map(|o| o.harmonic)
            .collect();
        assert_eq!(harmonics, vec![2.0, 4.0]);
    }

    #[test]
    fn overtone_phases_are_fixed_per_note() {
        let params = SynthesisParamsBuilder::default()
            .overtone_phasing(OvertonePhasing::Seeded(42))
            .build()
            .unwrap();
        let make = |frequency: f64| {
            PartialSynthesizer::new(
                SAMPLE_RATE,
                FrequencyHz(frequency),
                Seconds(1.0),
                0.0,
                Timbre::Rich,
                &params,
            )
            .unwrap()
        };
        let first = make(440.0);
        let second = make(440.0);
        assert_eq!(first.overtone_phases(), second.overtone_phases());

        // Same index, same value: phases don't drift from call to call.
        assert_eq!(first.sample(1234), first.sample(1234));
        assert_eq!(first.sample(1234), second.sample(1234));

        // From-frequency seeding differs between pitches.
        let a = a440(Timbre::Rich, 0.0);
        let b = PartialSynthesizer::new(
            SAMPLE_RATE,
            FrequencyHz(441.0),
            Seconds(1.0),
            0.0,
            Timbre::Rich,
            &SynthesisParams::default(),
        )
        .unwrap();
        assert_ne!(a.overtone_phases(), b.overtone_phases());
    }

    #[test]
    fn overtones_taper_to_silence() {
        let synth = a440(Timbre::Rich, 0.0);
        // Before release, the overtones are untouched.
        let cycles = 1000.0 / synth.period();
        let raw: f64 = synth
            .overtone_partials()
            .iter()
            .map(|o| (TAU * o.harmonic * cycles + o.phase).sin() * o.amplitude)
            .sum();
        assert!(approx_eq!(f64, synth.overtones(1000), raw, epsilon = 1e-12));
        // At the very end of the note, they're gone.
        assert_eq!(synth.overtones(48000), 0.0);
    }

    #[test]
    fn rich_mix_is_fundamental_plus_overtones() {
        let synth = a440(Timbre::Rich, 0.0);
        for p in [5u64, 480, 24000] {
            assert_eq!(
                synth.sample(p).0,
                synth.fundamental(p) + synth.overtones(p)
            );
        }
        let peak = (0..48000u64)
            .map(|p| synth.fundamental(p).abs())
            .fold(0.0, f64::max);
        assert_lt!(peak, 0.6 + 1e-9);
        assert_gt!(peak, 0.59);
    }

    #[test]
    fn phase_wraps_and_continues() {
        let synth = a440(Timbre::Pure, 0.5);
        let frames = 864;
        let phase = synth.phase_after(frames);
        assert!((0.0..TAU).contains(&phase));
        let next = a440(Timbre::Pure, phase);
        assert!(approx_eq!(
            f64,
            next.carrier(0),
            synth.carrier(frames),
            epsilon = 1e-9
        ));

        let wrapped = a440(Timbre::Pure, -TAU / 4.0);
        assert!(approx_eq!(f64, wrapped.starting_phase(), 3.0 * TAU / 4.0, epsilon = 1e-12));
    }

    #[test]
    fn generate_fills_consecutive_indexes() {
        let mut synth = a440(Timbre::Rich, 0.0);
        let mut values = [Sample::SILENCE; 16];
        synth.generate(100, &mut values);
        for (i, value) in values.iter().enumerate() {
            assert_eq!(*value, synth.sample(100 + i as u64));
        }
    }

    #[test]
    fn degenerate_notes_are_rejected() {
        let params = SynthesisParams::default();
        let make = |rate: usize, frequency: f64, duration: f64, phase: f64| {
            PartialSynthesizer::new(
                SampleRate::new(rate),
                FrequencyHz(frequency),
                Seconds(duration),
                phase,
                Timbre::Rich,
                &params,
            )
        };
        for result in [
            make(0, 440.0, 1.0, 0.0),
            make(48000, 0.0, 1.0, 0.0),
            make(48000, -440.0, 1.0, 0.0),
            make(48000, 440.0, 0.0, 0.0),
            make(48000, 440.0, 1.0, f64::NAN),
        ] {
            assert!(matches!(result, Err(Error::InvalidParameter { .. })));
        }
    }

    #[test]
    fn overtone_count_is_capped() {
        for count in [SynthesisParams::MAX_OVERTONE_COUNT + 1, usize::MAX] {
            let params = SynthesisParamsBuilder::default()
                .overtone_count(count)
                .build()
                .unwrap();
            assert!(matches!(
                params.validate(),
                Err(Error::InvalidParameter { name: "overtone count", .. })
            ));
            assert!(matches!(
                PartialSynthesizer::new(
                    SAMPLE_RATE,
                    FrequencyHz(440.0),
                    Seconds(0.018),
                    0.0,
                    Timbre::Rich,
                    &params,
                ),
                Err(Error::InvalidParameter { name: "overtone count", .. })
            ));
        }
    }

    #[test]
    fn overtone_list_stops_at_nyquist_without_reshuffling_phases() {
        let params_with = |count: usize| {
            SynthesisParamsBuilder::default()
                .overtone_count(count)
                .overtone_phasing(OvertonePhasing::Seeded(7))
                .build()
                .unwrap()
        };
        let make = |frequency: f64, params: &SynthesisParams| {
            PartialSynthesizer::new(
                SAMPLE_RATE,
                FrequencyHz(frequency),
                Seconds(1.0),
                0.0,
                Timbre::Rich,
                params,
            )
            .unwrap()
        };
        let most = params_with(SynthesisParams::MAX_OVERTONE_COUNT);
        assert!(most.validate().is_ok());

        // 20 Hz × 2 × 64 is well under 24 kHz, so every overtone survives.
        assert_eq!(make(20.0, &most).overtone_partials().len(), 64);
        // 440 Hz × 2 × 27 = 23760 Hz is the last one below Nyquist.
        let high = make(440.0, &most);
        assert_eq!(high.overtone_partials().len(), 27);

        let few = make(440.0, &params_with(8));
        assert_eq!(few.overtone_phases()[..], high.overtone_phases()[..8]);
    }

    #[test]
    fn tiny_negative_phases_wrap_below_two_pi() {
        let synth = a440(Timbre::Pure, -1e-17);
        assert_eq!(synth.starting_phase(), 0.0);
        assert!((0.0..TAU).contains(&synth.phase_after(0)));
    }
}
