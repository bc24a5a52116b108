use crate::{
    synth::Patch,
    tuning::{NoteNumber, TuningSystem},
};

/// A request from an input source to the performer.
#[derive(Debug, Clone, PartialEq)]
pub enum Command {
    NoteOn { note: NoteNumber, velocity: u8 },
    NoteOff { note: NoteNumber },
    /// Replace the active tuning for notes started after this command.
    SelectTuning(TuningSystem),
    SelectPatch(Patch),
    /// Stop every voice and end the performer loop.
    Shutdown,
}
