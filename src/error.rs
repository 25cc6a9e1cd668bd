// Shamir A., How to Share a Secret,
// Communications of the ACM, 22, 1979, pp. 612--613.
//
// Licensed under the GPL-2.0-or-later OR LGPL-2.0-or-later.

//! error types for ssss

use std::io;

use thiserror::Error;

pub type Result<T> = std::result::Result<T, Error>;

/// Broad class of a failure, for callers that only care which side
/// (caller, input, share set, environment) was at fault.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    Configuration,
    InputFormat,
    Consistency,
    Resource,
}

#[derive(Debug, Error)]
pub enum Error {
    // === configuration ===
    #[error("invalid security level {0} (must be a multiple of 8 in 8..=1024)")]
    InvalidSecurityLevel(u32),

    #[error("security level {0} too small for diffusion (need at least 64)")]
    SecurityLevelTooSmallForDiffusion(u32),

    #[error("invalid threshold/share count: threshold {threshold}, shares {shares}")]
    InvalidThreshold { threshold: u32, shares: u32 },

    #[error("prefix token too long: {len} > {max}")]
    TokenTooLong { len: usize, max: usize },

    // === input format ===
    #[error("input string too short: expected {expected}, got {actual}")]
    InputTooShort { expected: usize, actual: usize },

    #[error("input string too long: at most {max}, got {actual}")]
    InputTooLong { max: usize, actual: usize },

    #[error("invalid syntax")]
    InvalidSyntax,

    #[error("binary data detected, use hex mode")]
    BinaryData,

    #[error("invalid share")]
    InvalidShare,

    #[error("share has illegal length ({0} hex digits)")]
    ShareHasIllegalLength(usize),

    #[error("secret does not fit below the field order")]
    SecretOutOfRange,

    #[error("missing share {number} of {threshold}")]
    MissingShare { number: u32, threshold: u32 },

    // === consistency ===
    #[error("shares have different security levels: {expected} vs {actual}")]
    DifferentSecurityLevels { expected: u32, actual: u32 },

    #[error("shares disagree on the threshold: {expected} vs {actual}")]
    DifferentThresholds { expected: u32, actual: u32 },

    #[error("shares inconsistent, perhaps a single share was used twice")]
    SharesInconsistent,

    // === resource ===
    #[error("cannot open random source: {0}")]
    OpenRandom(#[source] io::Error),

    #[error("cannot read random source: {0}")]
    ReadRandom(#[source] io::Error),

    #[error("cannot close random source: {0}")]
    CloseRandom(#[source] io::Error),

    #[error("buffer too small: need {needed}, capacity {capacity}")]
    BufferTooSmall { needed: usize, capacity: usize },

    #[error(transparent)]
    Io(#[from] io::Error),
}

impl Error {
    pub fn category(&self) -> ErrorCategory {
        use Error::*;
        match self {
            InvalidSecurityLevel(_)
            | SecurityLevelTooSmallForDiffusion(_)
            | InvalidThreshold { .. }
            | TokenTooLong { .. } => ErrorCategory::Configuration,
            InputTooShort { .. }
            | InputTooLong { .. }
            | InvalidSyntax
            | BinaryData
            | SecretOutOfRange
            | InvalidShare
            | ShareHasIllegalLength(_)
            | MissingShare { .. } => ErrorCategory::InputFormat,
            DifferentSecurityLevels { .. } | DifferentThresholds { .. } | SharesInconsistent => {
                ErrorCategory::Consistency
            }
            OpenRandom(_) | ReadRandom(_) | CloseRandom(_) | BufferTooSmall { .. } | Io(_) => {
                ErrorCategory::Resource
            }
        }
    }
}
