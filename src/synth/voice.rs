use crate::dsp::{Envelope, Oscillator, Waveform};

use super::{Patch, VoiceHandle};

/// Spread between the two saws of the default patch, in cents either side.
const DETUNE_CENTS: f32 = 7.0;

/// Fade used when every voice is cut at once.
const ALL_OFF_RELEASE: f32 = 0.01;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VoiceState {
    Free,      // Available for allocation
    Held,      // Gate open, envelope in attack/decay/sustain
    Releasing, // Gate closed, envelope fading out
}

/// One slot in the voice bank. Plays whatever patch it was started with.
#[derive(Debug, Clone)]
pub struct Voice {
    handle: Option<VoiceHandle>,
    state: VoiceState,
    age: u64,
    amplitude: f32,
    patch: Patch,
    sample_rate: f32,
    primary: Oscillator,
    secondary: Oscillator,
    envelope: Envelope,
}

impl Voice {
    pub fn new(sample_rate: f32) -> Self {
        Self {
            handle: None,
            state: VoiceState::Free,
            age: 0,
            amplitude: 0.0,
            patch: Patch::Sine,
            sample_rate,
            primary: Oscillator::sine(),
            secondary: Oscillator::sine(),
            envelope: Envelope::default(),
        }
    }

    pub fn start(
        &mut self,
        handle: VoiceHandle,
        frequency: f32,
        amplitude: f32,
        patch: Patch,
        age: u64,
    ) {
        self.handle = Some(handle);
        self.state = VoiceState::Held;
        self.age = age;
        self.amplitude = amplitude.clamp(0.0, 1.0);
        self.patch = patch;

        let sr = self.sample_rate;
        match patch {
            Patch::Default => {
                let spread = (DETUNE_CENTS / 1200.0).exp2();
                self.primary.set_waveform(Waveform::Saw);
                self.secondary.set_waveform(Waveform::Saw);
                self.primary.set_frequency(frequency * spread, sr);
                self.secondary.set_frequency(frequency / spread, sr);
            }
            Patch::Sine => {
                self.primary.set_waveform(Waveform::Sine);
                self.primary.set_frequency(frequency, sr);
            }
            Patch::Mockingboard => {
                self.primary.set_waveform(Waveform::Sine);
                self.secondary.set_waveform(Waveform::Triangle);
                self.primary.set_frequency(frequency, sr);
                self.secondary.set_frequency(frequency * 0.5, sr);
            }
        }
        self.primary.reset(0.0);
        // Offset the second saw so the pair doesn't start phase-locked.
        self.secondary.reset(0.5);
        self.envelope.gate_on();
    }

    pub fn release(&mut self, release_seconds: f32) {
        if self.state == VoiceState::Held {
            self.state = VoiceState::Releasing;
            self.envelope.gate_off(release_seconds, self.sample_rate);
        }
    }

    pub fn release_now(&mut self) {
        self.release(ALL_OFF_RELEASE);
    }

    /// Add this voice into `out`.
    pub fn render(&mut self, out: &mut [f32]) {
        if self.state == VoiceState::Free {
            return;
        }

        for sample in out.iter_mut() {
            let level = self.envelope.next_sample(self.sample_rate);
            let wave = match self.patch {
                Patch::Default => 0.5 * (self.primary.next_sample() + self.secondary.next_sample()),
                Patch::Sine => self.primary.next_sample(),
                Patch::Mockingboard => self.primary.next_sample() * self.secondary.next_sample(),
            };
            *sample += wave * level * self.amplitude;
        }

        if self.state == VoiceState::Releasing && !self.envelope.is_active() {
            self.free();
        }
    }

    pub fn free(&mut self) {
        self.state = VoiceState::Free;
        self.handle = None;
    }

    pub fn is_free(&self) -> bool {
        self.state == VoiceState::Free
    }

    pub fn handle(&self) -> Option<VoiceHandle> {
        self.handle
    }

    pub fn age(&self) -> u64 {
        self.age
    }

    pub fn state(&self) -> VoiceState {
        self.state
    }
}
