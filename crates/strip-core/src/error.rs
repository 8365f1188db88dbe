//! Error and warning types raised by configuration loading and playback.

use thiserror::Error;

/// Fatal problems found while validating a [`crate::PresentationConfig`].
///
/// These abort startup; nothing in the per-frame path returns them.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ConfigError {
    #[error("window for `{signal}` is empty or inverted: [{start}, {end})")]
    EmptyWindow { signal: String, start: f32, end: f32 },

    #[error("window for `{signal}` has a NaN bound")]
    NanBound { signal: String },

    #[error("ambient window `{signal}` references an unknown channel")]
    UnknownChannel { signal: String },

    #[error("channel `{0}` is defined more than once")]
    DuplicateChannel(String),

    #[error("channel `{channel}` has base volume {volume} outside [0, 1]")]
    VolumeOutOfRange { channel: String, volume: f32 },

    #[error("sequence length must be non-negative, got {0}")]
    NegativeSequenceLength(f32),

    #[error("interactive region `{0}` is registered more than once")]
    DuplicateRegion(String),

    #[error("invalid tuning: {0}")]
    InvalidTuning(&'static str),
}

/// Non-fatal: two windows of the same exclusivity group overlap.
///
/// The engine keeps running and the later-declared window wins inside the
/// overlapping range.
#[derive(Debug, Clone, PartialEq, Error)]
#[error(
    "{table} windows `{first}` [{first_start}, {first_end}) and `{second}` [{second_start}, {second_end}) overlap"
)]
pub struct OverlapWarning {
    pub table: &'static str,
    pub first: String,
    pub first_start: f32,
    pub first_end: f32,
    pub second: String,
    pub second_start: f32,
    pub second_end: f32,
}

/// The output refused to start playing (typically an autoplay policy).
///
/// Recoverable: the channel stays stopped until an explicit retry.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("playback rejected: {reason}")]
pub struct PlaybackRejected {
    pub reason: String,
}

impl PlaybackRejected {
    pub fn new(reason: impl Into<String>) -> Self {
        Self {
            reason: reason.into(),
        }
    }
}
