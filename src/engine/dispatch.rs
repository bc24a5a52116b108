use crossbeam_channel::{bounded, Receiver, Sender};

use crate::{
    synth::Patch,
    tuning::{NoteNumber, TuningSystem},
    Error, Result,
};

use super::Command;

/// Create a dispatcher and the receiver a [`Performer`](super::Performer)
/// drains. `send` blocks while `capacity` commands are queued.
pub fn command_channel(capacity: usize) -> (Dispatcher, Receiver<Command>) {
    let (tx, rx) = bounded(capacity.max(1));
    (Dispatcher { tx }, rx)
}

/// Cloneable sending half of the command channel. One clone per input source.
#[derive(Debug, Clone)]
pub struct Dispatcher {
    tx: Sender<Command>,
}

impl Dispatcher {
    pub fn send(&self, command: Command) -> Result<()> {
        self.tx.send(command).map_err(|_| Error::DispatchClosed)
    }

    pub fn note_on(&self, note: NoteNumber, velocity: u8) -> Result<()> {
        self.send(Command::NoteOn { note, velocity })
    }

    pub fn note_off(&self, note: NoteNumber) -> Result<()> {
        self.send(Command::NoteOff { note })
    }

    pub fn select_tuning(&self, system: TuningSystem) -> Result<()> {
        self.send(Command::SelectTuning(system))
    }

    pub fn select_patch(&self, patch: Patch) -> Result<()> {
        self.send(Command::SelectPatch(patch))
    }

    pub fn shutdown(&self) -> Result<()> {
        self.send(Command::Shutdown)
    }
}
