//! Error types for serpentone.

use thiserror::Error;

/// Result type alias for serpentone operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur while building or playing the instrument.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum Error {
    /// A note number outside the MIDI range 0-127.
    #[error("note number {0} is outside the MIDI range 0-127")]
    NoteOutOfRange(i32),

    /// A ratio table that does not hold exactly one ratio per pitch class.
    #[error("ratio table must hold 12 ratios, got {len}")]
    InvalidRatioTable { len: usize },

    /// A zero numerator or denominator at `index` of a ratio table.
    #[error("interval ratio at index {index} is not positive")]
    NonPositiveRatio { index: usize },

    /// An interval ratio with a zero numerator or denominator.
    #[error("interval ratio {numerator}/{denominator} has a zero term")]
    InvalidRatio { numerator: u32, denominator: u32 },

    /// A reference frequency that is zero, negative or not finite.
    #[error("reference frequency must be positive and finite, got {0} Hz")]
    InvalidReferencePitch(f64),

    /// A key name that is not a pitch class.
    #[error("unknown key: {0:?}")]
    UnknownKey(String),

    /// A tuning name that does not match any tuning system.
    #[error("unknown tuning system: {0:?}")]
    UnknownTuning(String),

    /// A patch name that does not match any synth patch.
    #[error("unknown patch: {0:?}")]
    UnknownPatch(String),

    /// Invalid configuration parameter.
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),

    /// The voice backend could not service a start or stop request.
    #[error("voice backend unavailable: {0}")]
    BackendUnavailable(String),

    /// The performer thread is gone and no longer accepts commands.
    #[error("dispatcher closed: performer is not running")]
    DispatchClosed,
}
