//! Instrument settings.

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::{
    io::qwerty::MAX_OCTAVE,
    synth::{poly::DEFAULT_RELEASE_SECONDS, Patch},
    tuning::{Key, NoteNumber, ReferencePitch, TuningKind, TuningSystem, A4_FREQ},
    Error, Result,
};

/// Everything needed to set up a performance.
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Debug, Clone, PartialEq)]
pub struct InstrumentConfig {
    /// Frequency of A4 in Hz
    pub reference_hz: f64,
    pub tuning: TuningKind,
    pub key: Key,
    pub patch: Patch,
    /// Fade-out applied on every note-off, in seconds
    pub release_seconds: f32,
    /// Size of the voice bank
    pub max_voices: usize,
    /// Commands that can queue up before input sources block
    pub command_capacity: usize,
    /// Capacity of the ring carrying events to the UI
    pub event_capacity: usize,
    /// Octave the QWERTY home row starts in
    pub start_octave: u8,
    /// Only accept MIDI from this channel (0-15); `None` for omni
    pub midi_channel: Option<u8>,
}

impl InstrumentConfig {
    pub fn new() -> Self {
        Self {
            reference_hz: A4_FREQ,
            tuning: TuningKind::Equal,
            key: Key::C,
            patch: Patch::Sine,
            release_seconds: DEFAULT_RELEASE_SECONDS,
            max_voices: 16,
            command_capacity: 256,
            event_capacity: 1024,
            start_octave: 5,
            midi_channel: None,
        }
    }

    pub fn tuning(mut self, tuning: TuningKind) -> Self {
        self.tuning = tuning;
        self
    }

    pub fn key(mut self, key: Key) -> Self {
        self.key = key;
        self
    }

    /// Frequency of A4 in Hz.
    pub fn reference_hz(mut self, hz: f64) -> Self {
        self.reference_hz = hz;
        self
    }

    pub fn patch(mut self, patch: Patch) -> Self {
        self.patch = patch;
        self
    }

    pub fn release(mut self, seconds: f32) -> Self {
        self.release_seconds = seconds;
        self
    }

    pub fn max_voices(mut self, voices: usize) -> Self {
        self.max_voices = voices;
        self
    }

    pub fn start_octave(mut self, octave: u8) -> Self {
        self.start_octave = octave;
        self
    }

    pub fn midi_channel(mut self, channel: Option<u8>) -> Self {
        self.midi_channel = channel;
        self
    }

    pub fn validate(&self) -> Result<()> {
        self.reference()?;
        if !self.release_seconds.is_finite() || self.release_seconds < 0.0 {
            return Err(Error::InvalidConfig(format!(
                "release must be zero or more seconds, got {}",
                self.release_seconds
            )));
        }
        if self.max_voices == 0 {
            return Err(Error::InvalidConfig("max_voices must be at least 1".into()));
        }
        if self.command_capacity == 0 || self.event_capacity == 0 {
            return Err(Error::InvalidConfig(
                "queue capacities must be at least 1".into(),
            ));
        }
        if self.start_octave > MAX_OCTAVE {
            return Err(Error::InvalidConfig(format!(
                "start octave must be 0-{MAX_OCTAVE}, got {}",
                self.start_octave
            )));
        }
        if let Some(channel) = self.midi_channel.filter(|c| *c > 15) {
            return Err(Error::InvalidConfig(format!(
                "MIDI channel must be 0-15, got {channel}"
            )));
        }
        Ok(())
    }

    /// A4 pinned to the configured frequency.
    pub fn reference(&self) -> Result<ReferencePitch> {
        ReferencePitch::new(self.reference_hz, NoteNumber::A4)
    }

    /// The tuning system this config selects. Fails on a bad reference pitch.
    pub fn build_tuning(&self) -> Result<TuningSystem> {
        Ok(self.tuning.build(self.key, self.reference()?))
    }
}

impl Default for InstrumentConfig {
    fn default() -> Self {
        Self::new()
    }
}
