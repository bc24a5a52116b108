//! Exact interval ratios and the 12-entry tables ratio-based tunings use.

use std::fmt;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::{Error, Result};

use super::pitch;

/// A frequency multiplier relative to the root, kept as an exact fraction.
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(try_from = "RawRatio"))]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct IntervalRatio {
    numerator: u32,
    denominator: u32,
}

impl IntervalRatio {
    /// Unison, 1/1.
    pub const UNISON: Self = Self::exact(1, 1);

    /// Build a ratio, rejecting a zero numerator or denominator.
    pub fn new(numerator: u32, denominator: u32) -> Result<Self> {
        if numerator == 0 || denominator == 0 {
            return Err(Error::InvalidRatio {
                numerator,
                denominator,
            });
        }
        Ok(Self::exact(numerator, denominator))
    }

    const fn exact(numerator: u32, denominator: u32) -> Self {
        Self {
            numerator,
            denominator,
        }
    }

    pub fn numerator(self) -> u32 {
        self.numerator
    }

    pub fn denominator(self) -> u32 {
        self.denominator
    }

    /// The ratio as a float. This is the only place precision is given up.
    #[inline]
    pub fn value(self) -> f64 {
        self.numerator as f64 / self.denominator as f64
    }

    /// Interval size in cents.
    pub fn cents(self) -> f64 {
        pitch::ratio_to_cents(self.value())
    }
}

#[cfg(feature = "serde")]
#[derive(Deserialize)]
struct RawRatio {
    numerator: u32,
    denominator: u32,
}

#[cfg(feature = "serde")]
impl TryFrom<RawRatio> for IntervalRatio {
    type Error = Error;

    fn try_from(raw: RawRatio) -> Result<Self> {
        Self::new(raw.numerator, raw.denominator)
    }
}

impl fmt::Display for IntervalRatio {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.numerator, self.denominator)
    }
}

/// One ratio per pitch class, unison through major seventh.
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct RatioTable {
    ratios: [IntervalRatio; 12],
}

impl RatioTable {
    /// Build a table from exactly 12 ratios.
    pub fn new(ratios: &[IntervalRatio]) -> Result<Self> {
        let ratios: [IntervalRatio; 12] = ratios
            .try_into()
            .map_err(|_| Error::InvalidRatioTable { len: ratios.len() })?;
        Ok(Self { ratios })
    }

    /// Build a table from `(numerator, denominator)` pairs.
    ///
    /// Reports the index of the first non-positive entry.
    pub fn from_fractions(fractions: &[(u32, u32)]) -> Result<Self> {
        if fractions.len() != 12 {
            return Err(Error::InvalidRatioTable {
                len: fractions.len(),
            });
        }
        let mut ratios = [IntervalRatio::UNISON; 12];
        for (index, &(numerator, denominator)) in fractions.iter().enumerate() {
            ratios[index] = IntervalRatio::new(numerator, denominator)
                .map_err(|_| Error::NonPositiveRatio { index })?;
        }
        Ok(Self { ratios })
    }

    /// Ratio for a pitch class (0-11).
    pub fn get(&self, pitch_class: usize) -> IntervalRatio {
        self.ratios[pitch_class % 12]
    }

    /// All ratios evaluated as floats.
    pub fn values(&self) -> [f64; 12] {
        self.ratios.map(IntervalRatio::value)
    }

    pub fn iter(&self) -> impl Iterator<Item = IntervalRatio> + '_ {
        self.ratios.iter().copied()
    }
}

/// 5-limit just intonation.
pub const JUST_INTONATION: RatioTable = RatioTable {
    ratios: [
        IntervalRatio::exact(1, 1),   // Unison
        IntervalRatio::exact(16, 15), // Minor second
        IntervalRatio::exact(9, 8),   // Major second
        IntervalRatio::exact(6, 5),   // Minor third
        IntervalRatio::exact(5, 4),   // Major third
        IntervalRatio::exact(4, 3),   // Perfect fourth
        IntervalRatio::exact(45, 32), // Tritone
        IntervalRatio::exact(3, 2),   // Perfect fifth
        IntervalRatio::exact(8, 5),   // Minor sixth
        IntervalRatio::exact(5, 3),   // Major sixth
        IntervalRatio::exact(9, 5),   // Minor seventh
        IntervalRatio::exact(15, 8),  // Major seventh
    ],
};

/// Pythagorean tuning, stacked pure fifths folded into one octave.
pub const PYTHAGOREAN: RatioTable = RatioTable {
    ratios: [
        IntervalRatio::exact(1, 1),
        IntervalRatio::exact(256, 243), // limma
        IntervalRatio::exact(9, 8),
        IntervalRatio::exact(32, 27),
        IntervalRatio::exact(81, 64), // ditone
        IntervalRatio::exact(4, 3),
        IntervalRatio::exact(729, 512),
        IntervalRatio::exact(3, 2),
        IntervalRatio::exact(128, 81),
        IntervalRatio::exact(27, 16),
        IntervalRatio::exact(16, 9),
        IntervalRatio::exact(243, 128),
    ],
};
