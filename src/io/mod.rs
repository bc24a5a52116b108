// Purpose - turn raw input (MIDI bytes, typed keys) into engine commands

pub mod converter;
pub mod midi;
pub mod qwerty;

pub use converter::{midi_to_command, velocity_to_amplitude};
pub use midi::MidiEvent;
pub use qwerty::QwertyKeyboard;
