pub mod config;
pub mod dsp;
pub mod engine; // Command dispatch to the single performer thread
pub mod error;
pub mod io;
pub mod synth; // Voice backend, polyphony and the voice bank
pub mod tuning; // Note number to frequency

pub use config::InstrumentConfig;
pub use error::{Error, Result};

/// Largest block the voice bank is asked to render at once.
pub const MAX_BLOCK_SIZE: usize = 2048;
