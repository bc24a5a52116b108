use super::MIN_TIME;

/*
Gate Envelope
=============

A linear attack/decay/sustain envelope whose release length is decided when
the gate closes rather than when the envelope is built. The polyphony layer
asks for "stop this voice with a 0.3 s fade" and that number travels with the
stop request, so one envelope shape can serve different release times.

Vocabulary
----------

  level      Current output, 0.0 to 1.0. Multiplies the oscillator.

  gate       gate_on() opens it (start of a note), gate_off() closes it.

  stage      Idle, Attack, Decay, Sustain or Release.


Shape
-----

  Level
    1.0 ┐     ╱╲
        │    ╱  ╲___________
    S   │   ╱               ╲
        │  ╱                 ╲
    0.0 └─╱───────────────────╲──→ Time
          A    D      S        R (given at gate_off)

Attack and decay are stepped per sample:

    attack step = 1.0 / (attack_seconds * sample_rate)
    decay step  = (1.0 - sustain) / (decay_seconds * sample_rate)

Release snapshots the level at gate_off and interpolates it to zero over a
fixed sample count so it always lands exactly on 0.0, whatever stage the gate
closed in. Closing during the attack therefore fades from the partial level
instead of jumping to the sustain level first.

A zero-length release is clamped to one sample: the shortest fade the
envelope can produce without a discontinuity larger than one step.
*/

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EnvelopeStage {
    Idle,
    Attack,
    Decay,
    Sustain,
    Release,
}

#[derive(Debug, Clone)]
pub struct Envelope {
    attack_time: f32,
    decay_time: f32,
    sustain_level: f32,

    stage: EnvelopeStage,
    level: f32,

    release_start_level: f32,
    release_total_samples: u32,
    release_elapsed_samples: u32,
}

impl Envelope {
    pub fn new(attack: f32, decay: f32, sustain: f32) -> Self {
        Self {
            attack_time: attack.max(MIN_TIME),
            decay_time: decay.max(MIN_TIME),
            sustain_level: sustain.clamp(0.0, 1.0),

            stage: EnvelopeStage::Idle,
            level: 0.0,

            release_start_level: 0.0,
            release_total_samples: 1,
            release_elapsed_samples: 0,
        }
    }

    /// Open the gate. Restarts the attack from zero.
    pub fn gate_on(&mut self) {
        self.level = 0.0;
        self.stage = EnvelopeStage::Attack;
        self.release_elapsed_samples = 0;
    }

    /// Close the gate and fade to zero over `release_seconds`.
    pub fn gate_off(&mut self, release_seconds: f32, sample_rate: f32) {
        if self.stage == EnvelopeStage::Idle {
            return;
        }
        self.release_start_level = self.level;
        self.release_total_samples = (release_seconds.max(0.0) * sample_rate).round().max(1.0) as u32;
        self.release_elapsed_samples = 0;
        self.stage = EnvelopeStage::Release;
    }

    /// Advance one sample and return the new level.
    #[inline]
    pub fn next_sample(&mut self, sample_rate: f32) -> f32 {
        match self.stage {
            EnvelopeStage::Idle => {
                self.level = 0.0;
            }
            EnvelopeStage::Attack => {
                self.level += 1.0 / (self.attack_time * sample_rate);
                if self.level >= 1.0 {
                    self.level = 1.0;
                    self.stage = EnvelopeStage::Decay;
                }
            }
            EnvelopeStage::Decay => {
                let drop = 1.0 - self.sustain_level;
                self.level -= drop / (self.decay_time * sample_rate);
                if self.level <= self.sustain_level {
                    self.level = self.sustain_level;
                    self.stage = EnvelopeStage::Sustain;
                }
            }
            EnvelopeStage::Sustain => {
                self.level = self.sustain_level;
            }
            EnvelopeStage::Release => {
                self.release_elapsed_samples = self.release_elapsed_samples.saturating_add(1);
                let progress =
                    self.release_elapsed_samples as f32 / self.release_total_samples as f32;
                self.level = (self.release_start_level * (1.0 - progress)).max(0.0);

                if self.release_elapsed_samples >= self.release_total_samples {
                    self.level = 0.0;
                    self.stage = EnvelopeStage::Idle;
                }
            }
        }

        debug_assert!((0.0..=1.0).contains(&self.level));
        self.level
    }

    /// True until a release has run to completion.
    pub fn is_active(&self) -> bool {
        self.stage != EnvelopeStage::Idle
    }

    pub fn level(&self) -> f32 {
        self.level
    }

    pub fn stage(&self) -> EnvelopeStage {
        self.stage
    }
}

impl Default for Envelope {
    /// 10 ms attack, 100 ms decay, 70% sustain.
    fn default() -> Self {
        Self::new(0.01, 0.1, 0.7)
    }
}
