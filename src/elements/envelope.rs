// Copyright (c) 2024 Mike Tsao

use crate::{
    error::{Error, Result},
    types::{Normal, Seconds},
};
use derivative::Derivative;
use derive_builder::Builder;
use serde::{Deserialize, Serialize};

/// The proportions of an ADSR envelope, independent of any note's length.
///
/// Attack, decay, and release are fractions of the note's duration, so a short
/// note gets a short attack. Sustain is a level, not a time: the sustain stage
/// lasts for whatever the other three stages leave over.
#[derive(Clone, Builder, Debug, Derivative, PartialEq, Serialize, Deserialize)]
#[derivative(Default)]
#[builder(default, setter(into))]
#[serde(rename_all = "kebab-case")]
pub struct EnvelopeShape {
    /// Fraction of the note spent rising from silence to full amplitude.
    #[derivative(Default(value = "0.01"))]
    attack: f64,
    /// Fraction of the note spent falling from full amplitude to the sustain
    /// level.
    #[derivative(Default(value = "0.2"))]
    decay: f64,
    /// Amplitude held between decay and release.
    #[derivative(Default(value = "Normal::new_const(0.7)"))]
    sustain: Normal,
    /// Fraction of the note, at its end, spent fading out.
    #[derivative(Default(value = "0.5"))]
    release: f64,
    /// How many time constants of exponential decay fit into the release
    /// stage. 1.0 is the textbook curve, which is still at 37% of the sustain
    /// level when the note ends; larger values fade closer to silence.
    #[derivative(Default(value = "5.0"))]
    release_steepness: f64,
}
impl EnvelopeShape {
    /// Returns the attack fraction.
    pub fn attack(&self) -> f64 {
        self.attack
    }

    /// Returns the decay fraction.
    pub fn decay(&self) -> f64 {
        self.decay
    }

    /// Returns the sustain level.
    pub fn sustain(&self) -> Normal {
        self.sustain
    }

    /// Returns the release fraction.
    pub fn release(&self) -> f64 {
        self.release
    }

    /// Returns the release steepness.
    pub fn release_steepness(&self) -> f64 {
        self.release_steepness
    }

    /// Checks that the stages fit inside a note.
    pub fn validate(&self) -> Result<()> {
        for (name, fraction) in [
            ("envelope attack", self.attack),
            ("envelope decay", self.decay),
            ("envelope release", self.release),
        ] {
            if !fraction.is_finite() || fraction < 0.0 {
                return Err(Error::invalid(
                    name,
                    format!("must be a non-negative fraction of the note, got {fraction}"),
                ));
            }
        }
        let total = self.attack + self.decay + self.release;
        if total > 1.0 {
            return Err(Error::invalid(
                "envelope",
                format!("attack + decay + release is {total}, which exceeds the whole note"),
            ));
        }
        if !Normal::range().contains(&self.sustain.0) {
            return Err(Error::invalid(
                "envelope sustain",
                format!("must be in [0, 1], got {}", self.sustain.0),
            ));
        }
        if !self.release_steepness.is_finite() || self.release_steepness <= 0.0 {
            return Err(Error::invalid(
                "envelope release steepness",
                format!("must be positive, got {}", self.release_steepness),
            ));
        }
        Ok(())
    }

    /// Fits this shape to a note of the given duration.
    pub fn resolve(&self, duration: Seconds) -> Envelope {
        Envelope {
            attack: duration * self.attack,
            decay: duration * self.decay,
            sustain: self.sustain,
            release: duration * self.release,
            duration,
            release_steepness: self.release_steepness,
        }
    }
}

/// An ADSR envelope fitted to one note. It's a pure function of elapsed time,
/// so it can be evaluated at any point in any order.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Envelope {
    attack: Seconds,
    decay: Seconds,
    sustain: Normal,
    release: Seconds,
    duration: Seconds,
    release_steepness: f64,
}
impl Envelope {
    /// Returns the amplitude `time` after the note began.
    ///
    /// A stage of zero length is skipped. Boundaries belong to the later
    /// stage: the amplitude exactly at the end of the attack is computed by
    /// the decay formula.
    pub fn amplitude(&self, time: Seconds) -> Normal {
        let t = time.0;
        let attack = self.attack.0;
        let decay = self.decay.0;
        let release = self.release.0;
        let sustain = self.sustain.0;

        if attack > 0.0 && t < attack {
            Normal::new(t / attack)
        } else if decay > 0.0 && t < attack + decay {
            Normal::new(1.0 - (t - attack) / decay * (1.0 - sustain))
        } else if t < self.release_start().0 {
            self.sustain
        } else if release > 0.0 {
            let elapsed = t - self.release_start().0;
            Normal::new(sustain * (-self.release_steepness * elapsed / release).exp())
        } else {
            Normal::zero()
        }
    }

    /// When the release stage begins.
    pub fn release_start(&self) -> Seconds {
        self.duration - self.release
    }

    /// How much of the release stage remains at `time`, from 1.0 at its start
    /// down to 0.0 at the end of the note. Before the release stage, this is
    /// 1.0.
    pub fn release_remaining(&self, time: Seconds) -> Normal {
        if self.release.0 > 0.0 && time >= self.release_start() {
            Normal::new((self.duration - time).0 / self.release.0)
        } else {
            Normal::maximum()
        }
    }

    #[allow(missing_docs)]
    pub fn attack(&self) -> Seconds {
        self.attack
    }

    #[allow(missing_docs)]
    pub fn decay(&self) -> Seconds {
        self.decay
    }

    #[allow(missing_docs)]
    pub fn sustain(&self) -> Normal {
        self.sustain
    }

    #[allow(missing_docs)]
    pub fn release(&self) -> Seconds {
        self.release
    }

    /// The length of the note this envelope was fitted to.
    pub fn duration(&self) -> Seconds {
        self.duration
    }
}
