//! Low-level DSP primitives used by the voice bank.
//!
//! These components are allocation-free and realtime-safe, making them safe to
//! embed directly inside voice structs.

/// Attack/decay/sustain envelope with a release time chosen per note-off.
pub mod envelope;
/// Phase-accumulator oscillators.
pub mod oscillator;

pub use envelope::{Envelope, EnvelopeStage};
pub use oscillator::{Oscillator, Waveform};

/// Shortest stage duration in seconds; shorter values would click.
pub(crate) const MIN_TIME: f32 = 1.0 / 48_000.0;
