// Copyright (c) 2024 Mike Tsao

//! Errors that can occur while configuring or pulling a stream.

use thiserror::Error;

/// Everything that can go wrong. None of these is transient: retrying the same
/// call with the same inputs reproduces the same error.
#[derive(Debug, Error, PartialEq)]
pub enum Error {
    /// The caller named a sample format that doesn't exist.
    #[error("unsupported sample format: {0}")]
    InvalidFormat(String),

    /// A construction parameter was out of range.
    #[error("invalid {name}: {reason}")]
    InvalidParameter {
        /// Which parameter.
        name: &'static str,
        /// What's wrong with it.
        reason: String,
    },

    /// The stream is too long to address.
    #[error("stream length exceeds the representable range")]
    Overflow,

    /// The OS couldn't provide a random seed.
    #[error("couldn't gather a random seed: {0}")]
    Entropy(#[from] getrandom::Error),
}
impl Error {
    pub(crate) fn invalid(name: &'static str, reason: impl Into<String>) -> Self {
        Self::InvalidParameter {
            name,
            reason: reason.into(),
        }
    }
}

/// A [Result](core::result::Result) whose error is always [Error].
pub type Result<T> = core::result::Result<T, Error>;
