/*
Pitch Model
===========

Everything in this module is plain arithmetic on f64. Nothing here knows
about keys, tables or voices; the tuning systems build on these helpers.

Vocabulary
----------

  reference   A (frequency, note number) pair that pins the scale to a real
              pitch. Concert pitch is A4 = 440 Hz on MIDI note 69.

  offset      Signed distance in semitones between a note and the reference
              (or anchor) note.

  octaves     How many whole octaves the offset spans, rounded toward
              negative infinity.

  pitch class Which of the 12 chromatic slots the offset lands on, 0..=11.


Equal Temperament
-----------------

Every semitone has the same ratio, 2^(1/12):

    f = reference_hz * 2^(offset / 12)

An offset of zero gives exactly reference_hz (exp2(0.0) is exactly 1.0).


Ratio-Based Scales
------------------

A table holds one frequency ratio per pitch class inside a single octave.
The offset is split into (octaves, pitch_class) and the table supplies the
in-octave ratio:

    f = anchor_hz * ratio[pitch_class] * 2^octaves

The split MUST use Euclidean division. Truncating division rounds toward
zero, so an offset of -1 would become (0, -1) instead of (-1, 11):

    offset   truncating      euclidean
    ------   -------------   -----------
      14     ( 1,  2)        ( 1,  2)
      -1     ( 0, -1)  !!    (-1, 11)
     -13     (-1, -1)  !!    (-2, 11)

i32::div_euclid / i32::rem_euclid give the second column.


Cents
-----

1200 cents per octave, 100 per equal-tempered semitone:

    cents = 1200 * log2(ratio)
*/

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use super::NoteNumber;
use crate::{Error, Result};

/// Reference frequency for A4.
pub const A4_FREQ: f64 = 440.0;

/// Semitones per octave.
pub const SEMITONES_PER_OCTAVE: i32 = 12;

/// Cents per octave.
pub const CENTS_PER_OCTAVE: f64 = 1200.0;

/// The (frequency, note) pair a tuning system is pinned to.
///
/// The frequency is always finite and positive.
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(try_from = "RawReferencePitch"))]
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ReferencePitch {
    frequency: f64,
    note: NoteNumber,
}

impl ReferencePitch {
    /// Pin `note` to `frequency` Hz, rejecting zero, negative and non-finite
    /// frequencies.
    pub fn new(frequency: f64, note: NoteNumber) -> Result<Self> {
        if !frequency.is_finite() || frequency <= 0.0 {
            return Err(Error::InvalidReferencePitch(frequency));
        }
        Ok(Self { frequency, note })
    }

    /// Concert pitch: A4 = 440 Hz.
    pub const fn concert() -> Self {
        Self {
            frequency: A4_FREQ,
            note: NoteNumber::A4,
        }
    }

    /// Frequency of [`note`](Self::note) in Hz.
    #[inline]
    pub fn frequency(self) -> f64 {
        self.frequency
    }

    /// Note that sounds at [`frequency`](Self::frequency).
    #[inline]
    pub fn note(self) -> NoteNumber {
        self.note
    }
}

#[cfg(feature = "serde")]
#[derive(Deserialize)]
struct RawReferencePitch {
    frequency: f64,
    note: NoteNumber,
}

#[cfg(feature = "serde")]
impl TryFrom<RawReferencePitch> for ReferencePitch {
    type Error = Error;

    fn try_from(raw: RawReferencePitch) -> Result<Self> {
        Self::new(raw.frequency, raw.note)
    }
}

impl Default for ReferencePitch {
    fn default() -> Self {
        Self::concert()
    }
}

/// Split a semitone offset into whole octaves and a pitch class in `0..12`.
///
/// Uses Euclidean division so notes below the anchor land in the right
/// pitch class.
#[inline]
pub fn split_octave(offset: i32) -> (i32, usize) {
    (
        offset.div_euclid(SEMITONES_PER_OCTAVE),
        offset.rem_euclid(SEMITONES_PER_OCTAVE) as usize,
    )
}

/// Frequency ratio of an equal-tempered interval of `semitones`.
#[inline]
pub fn semitone_ratio(semitones: f64) -> f64 {
    (semitones / SEMITONES_PER_OCTAVE as f64).exp2()
}

/// `reference_hz * ratio * 2^octaves`.
#[inline]
pub fn frequency(reference_hz: f64, ratio: f64, octaves: i32) -> f64 {
    reference_hz * ratio * 2.0_f64.powi(octaves)
}

/// Equal-tempered frequency of `note` against `reference`.
#[inline]
pub fn equal_tempered(reference: ReferencePitch, note: NoteNumber) -> f64 {
    let offset = note.get() as i32 - reference.note.get() as i32;
    reference.frequency * semitone_ratio(offset as f64)
}

/// Frequency of `note` in a 12-degree ratio scale whose degree 0 sounds at
/// `anchor_hz` on `anchor_note`.
#[inline]
pub fn ratio_based(anchor_hz: f64, anchor_note: i32, note: NoteNumber, ratios: &[f64; 12]) -> f64 {
    let (octaves, pitch_class) = split_octave(note.get() as i32 - anchor_note);
    frequency(anchor_hz, ratios[pitch_class], octaves)
}

/// Size of a frequency ratio in cents.
#[inline]
pub fn ratio_to_cents(ratio: f64) -> f64 {
    CENTS_PER_OCTAVE * ratio.log2()
}

/// Distance from `b_hz` up to `a_hz` in cents (negative when `a` is lower).
#[inline]
pub fn cents_between(a_hz: f64, b_hz: f64) -> f64 {
    ratio_to_cents(a_hz / b_hz)
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn split_is_euclidean_below_the_anchor() {
        assert_eq!(split_octave(0), (0, 0));
        assert_eq!(split_octave(14), (1, 2));
        assert_eq!(split_octave(-1), (-1, 11));
        assert_eq!(split_octave(-12), (-1, 0));
        assert_eq!(split_octave(-13), (-2, 11));
        assert_eq!(split_octave(-69), (-6, 3));
    }

    #[test]
    fn split_recomposes_the_offset() {
        for offset in -127..=127 {
            let (octaves, pitch_class) = split_octave(offset);
            assert!(pitch_class < 12);
            assert_eq!(octaves * 12 + pitch_class as i32, offset);
        }
    }

    #[test]
    fn reference_note_is_a_fixed_point() {
        let reference = ReferencePitch::concert();
        assert_eq!(equal_tempered(reference, NoteNumber::A4), 440.0);

        let baroque = ReferencePitch::new(415.0, NoteNumber::A4).unwrap();
        assert_eq!(equal_tempered(baroque, NoteNumber::A4), 415.0);
    }

    #[test]
    fn reference_frequency_must_be_positive_and_finite() {
        for hz in [0.0, -440.0, f64::NAN, f64::INFINITY, f64::NEG_INFINITY] {
            assert!(
                matches!(
                    ReferencePitch::new(hz, NoteNumber::A4),
                    Err(Error::InvalidReferencePitch(_))
                ),
                "{hz} Hz should be rejected"
            );
        }
        let tiny = ReferencePitch::new(f64::MIN_POSITIVE, NoteNumber::A4).unwrap();
        assert_eq!(tiny.frequency(), f64::MIN_POSITIVE);
        assert_eq!(tiny.note(), NoteNumber::A4);
    }

    #[test]
    fn middle_c_is_about_261_hz() {
        let c4 = equal_tempered(ReferencePitch::concert(), NoteNumber::C4);
        assert_relative_eq!(c4, 261.625_565_300_598_6, max_relative = 1e-12);
    }

    #[test]
    fn ratio_based_applies_octaves_both_ways() {
        let ratios = [1.0, 1.1, 1.2, 1.3, 1.4, 1.5, 1.6, 1.7, 1.8, 1.9, 1.95, 1.99];
        let anchor = 60;

        let up = ratio_based(100.0, anchor, NoteNumber::new(74).unwrap(), &ratios);
        assert_relative_eq!(up, 100.0 * 1.2 * 2.0);

        let down = ratio_based(100.0, anchor, NoteNumber::new(59).unwrap(), &ratios);
        assert_relative_eq!(down, 100.0 * 1.99 * 0.5);
    }

    #[test]
    fn cents_of_common_intervals() {
        assert_relative_eq!(ratio_to_cents(2.0), 1200.0);
        assert_relative_eq!(ratio_to_cents(semitone_ratio(1.0)), 100.0, epsilon = 1e-9);
        assert_relative_eq!(ratio_to_cents(1.5), 701.955, epsilon = 1e-3);
        assert_relative_eq!(cents_between(220.0, 440.0), -1200.0);
    }
}
