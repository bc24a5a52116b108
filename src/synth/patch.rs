use std::{fmt, str::FromStr};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::Error;

/// The built-in voice sounds.
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Patch {
    /// Two slightly detuned saws
    Default,
    /// Pure sine
    Sine,
    /// Sine ring-modulated by a triangle one octave down
    Mockingboard,
}

impl Patch {
    pub const ALL: [Self; 3] = [Self::Default, Self::Sine, Self::Mockingboard];

    pub fn name(self) -> &'static str {
        match self {
            Self::Default => "Default",
            Self::Sine => "Sine",
            Self::Mockingboard => "Mockingboard",
        }
    }
}

impl fmt::Display for Patch {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Patch {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Error> {
        match s.trim().to_ascii_lowercase().as_str() {
            "default" | "saw" => Ok(Self::Default),
            "sine" => Ok(Self::Sine),
            "mockingboard" | "mock" => Ok(Self::Mockingboard),
            _ => Err(Error::UnknownPatch(s.to_string())),
        }
    }
}
