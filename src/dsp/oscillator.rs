#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/*
Phase-Accumulator Oscillator
============================

Phase runs from 0.0 to 1.0 once per cycle. Each sample it advances by

    increment = frequency / sample_rate

and wraps back into [0, 1). The waveform is a pure function of phase:

    Sine      sin(2π·phase)
    Saw       2·phase − 1              (ramp up, jump down)
    Triangle  1 − 4·|phase − 0.5|      (peaks at ±1)

These are naive (non-bandlimited) shapes. Saw aliases audibly above a few kHz
but the instrument's keyboard range keeps most fundamentals well below that.
*/

#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Waveform {
    Sine,
    Saw,
    Triangle,
}

#[derive(Debug, Clone)]
pub struct Oscillator {
    waveform: Waveform,
    phase: f32,
    increment: f32,
}

impl Oscillator {
    pub fn new(waveform: Waveform) -> Self {
        Self {
            waveform,
            phase: 0.0,
            increment: 0.0,
        }
    }

    pub fn sine() -> Self {
        Self::new(Waveform::Sine)
    }

    pub fn saw() -> Self {
        Self::new(Waveform::Saw)
    }

    pub fn triangle() -> Self {
        Self::new(Waveform::Triangle)
    }

    pub fn set_waveform(&mut self, waveform: Waveform) {
        self.waveform = waveform;
    }

    pub fn set_frequency(&mut self, frequency: f32, sample_rate: f32) {
        self.increment = frequency / sample_rate;
    }

    /// Restart the cycle at `phase` (wrapped into 0..1).
    pub fn reset(&mut self, phase: f32) {
        self.phase = phase.rem_euclid(1.0);
    }

    #[inline]
    pub fn next_sample(&mut self) -> f32 {
        let phase = self.phase;
        let out = match self.waveform {
            Waveform::Sine => (phase * std::f32::consts::TAU).sin(),
            Waveform::Saw => 2.0 * phase - 1.0,
            Waveform::Triangle => 1.0 - 4.0 * (phase - 0.5).abs(),
        };

        self.phase += self.increment;
        self.phase -= self.phase.floor();
        out
    }

    pub fn phase(&self) -> f32 {
        self.phase
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn cycle(mut osc: Oscillator, samples: usize) -> Vec<f32> {
        osc.set_frequency(1.0, samples as f32);
        (0..samples).map(|_| osc.next_sample()).collect()
    }

    #[test]
    fn waveforms_stay_in_range() {
        for waveform in [Waveform::Sine, Waveform::Saw, Waveform::Triangle] {
            let samples = cycle(Oscillator::new(waveform), 64);
            assert!(samples.iter().all(|s| (-1.0..=1.0).contains(s)), "{waveform:?}");
        }
    }

    #[test]
    fn triangle_peaks_mid_cycle() {
        let samples = cycle(Oscillator::triangle(), 8);
        assert_eq!(samples[0], -1.0);
        assert_eq!(samples[4], 1.0);
    }

    #[test]
    fn phase_wraps() {
        let mut osc = Oscillator::saw();
        osc.set_frequency(3.0, 4.0);
        for _ in 0..10 {
            osc.next_sample();
            assert!((0.0..1.0).contains(&osc.phase()));
        }
    }
}
