//! Tuning systems: note number → frequency under different temperaments.
//!
//! A [`TuningSystem`] is an immutable value. Switching tuning means building
//! a new one and swapping it into an [`ActiveTuning`]; nothing is mutated in
//! place.

pub mod active;
pub mod pitch;
pub mod ratio;

use std::{borrow::Cow, fmt, str::FromStr};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::{Error, Result};

pub use active::ActiveTuning;
pub use pitch::{ReferencePitch, A4_FREQ};
pub use ratio::{IntervalRatio, RatioTable, JUST_INTONATION, PYTHAGOREAN};

const SHARP_NAMES: [&str; 12] = [
    "C", "C#", "D", "D#", "E", "F", "F#", "G", "G#", "A", "A#", "B",
];

/// A MIDI note number, 0-127. Middle C (C4) is 60.
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(try_from = "u8", into = "u8"))]
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct NoteNumber(u8);

impl NoteNumber {
    pub const MIN: Self = Self(0);
    pub const MAX: Self = Self(127);
    /// Middle C
    pub const C4: Self = Self(60);
    /// A440 tuning reference
    pub const A4: Self = Self(69);

    /// Build a note number, rejecting values outside 0-127.
    pub fn new(value: i32) -> Result<Self> {
        u8::try_from(value)
            .ok()
            .filter(|v| *v <= Self::MAX.0)
            .map(Self)
            .ok_or(Error::NoteOutOfRange(value))
    }

    #[inline]
    pub const fn get(self) -> u8 {
        self.0
    }

    /// Chromatic pitch class, C = 0 through B = 11.
    #[inline]
    pub const fn pitch_class(self) -> u8 {
        self.0 % 12
    }

    /// Octave in scientific pitch notation (note 60 is in octave 4).
    pub const fn octave(self) -> i8 {
        (self.0 / 12) as i8 - 1
    }

    /// Scientific pitch name, e.g. `"F#3"`.
    pub fn name(self) -> String {
        self.to_string()
    }

    /// Shift by `semitones`, failing if the result leaves the MIDI range.
    pub fn transpose(self, semitones: i32) -> Result<Self> {
        Self::new(self.0 as i32 + semitones)
    }

    /// Every note in the MIDI range, lowest first.
    pub fn all() -> impl Iterator<Item = Self> {
        (Self::MIN.0..=Self::MAX.0).map(Self)
    }
}

impl fmt::Display for NoteNumber {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}{}",
            SHARP_NAMES[self.pitch_class() as usize],
            self.octave()
        )
    }
}

impl TryFrom<u8> for NoteNumber {
    type Error = Error;

    fn try_from(value: u8) -> Result<Self> {
        Self::new(value as i32)
    }
}

impl TryFrom<i32> for NoteNumber {
    type Error = Error;

    fn try_from(value: i32) -> Result<Self> {
        Self::new(value)
    }
}

impl From<NoteNumber> for u8 {
    fn from(note: NoteNumber) -> Self {
        note.0
    }
}

/// The pitch class a ratio table is anchored to.
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(try_from = "u8", into = "u8"))]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Key(u8);

impl Key {
    pub const C: Self = Self(0);
    pub const A: Self = Self(9);

    /// Key from a pitch class; values wrap into 0-11.
    pub const fn from_pitch_class(pitch_class: u8) -> Self {
        Self(pitch_class % 12)
    }

    #[inline]
    pub const fn pitch_class(self) -> u8 {
        self.0
    }

    /// Move the key by `semitones`, wrapping around the octave.
    pub fn transpose(self, semitones: i32) -> Self {
        Self((self.0 as i32 + semitones).rem_euclid(12) as u8)
    }

    pub fn name(self) -> &'static str {
        SHARP_NAMES[self.0 as usize]
    }
}

impl fmt::Display for Key {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl TryFrom<u8> for Key {
    type Error = Error;

    /// Accepts pitch classes 0-11 only; use [`Key::from_pitch_class`] to wrap.
    fn try_from(pitch_class: u8) -> Result<Self> {
        if pitch_class < 12 {
            Ok(Self(pitch_class))
        } else {
            Err(Error::UnknownKey(format!("pitch class {pitch_class}")))
        }
    }
}

impl From<Key> for u8 {
    fn from(key: Key) -> Self {
        key.0
    }
}

impl FromStr for Key {
    type Err = Error;

    /// Parses `C`, `f#`, `Bb`, `Ds`, `E♭`. Accidentals stack (`C##` is D).
    fn from_str(s: &str) -> Result<Self> {
        let unknown = || Error::UnknownKey(s.to_string());
        let mut chars = s.trim().chars();

        let letter = chars.next().ok_or_else(unknown)?;
        let base: i32 = match letter.to_ascii_uppercase() {
            'C' => 0,
            'D' => 2,
            'E' => 4,
            'F' => 5,
            'G' => 7,
            'A' => 9,
            'B' => 11,
            _ => return Err(unknown()),
        };

        let mut shift = 0;
        for accidental in chars {
            shift += match accidental {
                '#' | 's' | 'S' | '♯' => 1,
                'b' | '♭' => -1,
                _ => return Err(unknown()),
            };
        }

        Ok(Self::C.transpose(base + shift))
    }
}

/// The selectable tuning systems.
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum TuningKind {
    /// 12-tone equal temperament
    #[default]
    Equal,
    /// 5-limit just intonation
    Just,
    /// Pythagorean tuning
    Pythagorean,
}

impl TuningKind {
    pub const ALL: [Self; 3] = [Self::Equal, Self::Just, Self::Pythagorean];

    /// Build the tuning system. The key is ignored by equal temperament.
    pub fn build(self, key: Key, reference: ReferencePitch) -> TuningSystem {
        match self {
            Self::Equal => TuningSystem::equal_temperament().with_reference(reference),
            Self::Just => TuningSystem::just_intonation(key).with_reference(reference),
            Self::Pythagorean => TuningSystem::pythagorean(key).with_reference(reference),
        }
    }

    /// The next kind in [`TuningKind::ALL`], wrapping.
    pub fn next(self) -> Self {
        match self {
            Self::Equal => Self::Just,
            Self::Just => Self::Pythagorean,
            Self::Pythagorean => Self::Equal,
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            Self::Equal => "Equal Temperament",
            Self::Just => "Just Intonation",
            Self::Pythagorean => "Pythagorean",
        }
    }
}

impl fmt::Display for TuningKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for TuningKind {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "equal" | "et" | "12tet" | "12-tet" | "equal-temperament" => Ok(Self::Equal),
            "just" | "ji" | "just-intonation" => Ok(Self::Just),
            "pythagorean" | "pyth" => Ok(Self::Pythagorean),
            _ => Err(Error::UnknownTuning(s.to_string())),
        }
    }
}

/// A ratio table anchored to a key.
///
/// The key's tonic sounds at its equal-tempered frequency; every other note
/// takes its ratio from the table by its distance above the nearest tonic
/// below it. Octave boundaries stay where the chromatic scale puts them.
#[derive(Debug, Clone, PartialEq)]
pub struct RatioTuning {
    name: Cow<'static, str>,
    kind: Option<TuningKind>,
    table: RatioTable,
    key: Key,
    reference: ReferencePitch,
    // Derived once at construction.
    anchor_note: i32,
    anchor_hz: f64,
    ratios: [f64; 12],
}

impl RatioTuning {
    fn new(
        name: Cow<'static, str>,
        kind: Option<TuningKind>,
        table: RatioTable,
        key: Key,
        reference: ReferencePitch,
    ) -> Self {
        let key_shift = key.pitch_class() as i32 - reference.note().pitch_class() as i32;
        Self {
            name,
            kind,
            table,
            key,
            reference,
            anchor_note: reference.note().get() as i32 + key_shift,
            anchor_hz: reference.frequency() * pitch::semitone_ratio(key_shift as f64),
            ratios: table.values(),
        }
    }

    #[inline]
    pub fn to_frequency(&self, note: NoteNumber) -> f64 {
        pitch::ratio_based(self.anchor_hz, self.anchor_note, note, &self.ratios)
    }

    pub fn table(&self) -> &RatioTable {
        &self.table
    }

    pub fn key(&self) -> Key {
        self.key
    }
}

/// Maps note numbers to frequencies.
///
/// `to_frequency` is pure and total over [`NoteNumber`]; all validation
/// happens when the system is built.
#[derive(Debug, Clone, PartialEq)]
pub enum TuningSystem {
    EqualTemperament { reference: ReferencePitch },
    RatioBased(RatioTuning),
}

impl TuningSystem {
    /// 12-TET at concert pitch.
    pub fn equal_temperament() -> Self {
        Self::EqualTemperament {
            reference: ReferencePitch::concert(),
        }
    }

    /// 5-limit just intonation in `key`.
    pub fn just_intonation(key: Key) -> Self {
        Self::RatioBased(RatioTuning::new(
            Cow::Borrowed(TuningKind::Just.name()),
            Some(TuningKind::Just),
            JUST_INTONATION,
            key,
            ReferencePitch::concert(),
        ))
    }

    /// Pythagorean tuning in `key`.
    pub fn pythagorean(key: Key) -> Self {
        Self::RatioBased(RatioTuning::new(
            Cow::Borrowed(TuningKind::Pythagorean.name()),
            Some(TuningKind::Pythagorean),
            PYTHAGOREAN,
            key,
            ReferencePitch::concert(),
        ))
    }

    /// A custom ratio-based tuning. Fails unless `ratios` holds 12 entries.
    pub fn ratio_based(
        name: impl Into<String>,
        ratios: &[IntervalRatio],
        key: Key,
    ) -> Result<Self> {
        let table = RatioTable::new(ratios)?;
        Ok(Self::RatioBased(RatioTuning::new(
            Cow::Owned(name.into()),
            None,
            table,
            key,
            ReferencePitch::concert(),
        )))
    }

    /// Same system pinned to a different reference pitch.
    pub fn with_reference(self, reference: ReferencePitch) -> Self {
        match self {
            Self::EqualTemperament { .. } => Self::EqualTemperament { reference },
            Self::RatioBased(t) => {
                Self::RatioBased(RatioTuning::new(t.name, t.kind, t.table, t.key, reference))
            }
        }
    }

    /// Frequency in Hz for `note`.
    #[inline]
    pub fn to_frequency(&self, note: NoteNumber) -> f64 {
        match self {
            Self::EqualTemperament { reference } => pitch::equal_tempered(*reference, note),
            Self::RatioBased(tuning) => tuning.to_frequency(note),
        }
    }

    /// Deviation of `note` from 12-TET at the same reference, in cents.
    pub fn cents_from_equal(&self, note: NoteNumber) -> f64 {
        let equal = pitch::equal_tempered(self.reference(), note);
        pitch::cents_between(self.to_frequency(note), equal)
    }

    pub fn name(&self) -> &str {
        match self {
            Self::EqualTemperament { .. } => TuningKind::Equal.name(),
            Self::RatioBased(tuning) => &tuning.name,
        }
    }

    /// Which built-in system this is; `None` for custom ratio tables.
    pub fn kind(&self) -> Option<TuningKind> {
        match self {
            Self::EqualTemperament { .. } => Some(TuningKind::Equal),
            Self::RatioBased(tuning) => tuning.kind,
        }
    }

    /// The anchoring key; `None` for equal temperament.
    pub fn key(&self) -> Option<Key> {
        match self {
            Self::EqualTemperament { .. } => None,
            Self::RatioBased(tuning) => Some(tuning.key),
        }
    }

    pub fn reference(&self) -> ReferencePitch {
        match self {
            Self::EqualTemperament { reference } => *reference,
            Self::RatioBased(tuning) => tuning.reference,
        }
    }
}

impl Default for TuningSystem {
    fn default() -> Self {
        Self::equal_temperament()
    }
}

impl fmt::Display for TuningSystem {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.key() {
            Some(key) => write!(f, "{} ({})", self.name(), key),
            None => f.write_str(self.name()),
        }
    }
}
