use std::{io, thread::JoinHandle};

use crossbeam_channel::Receiver;
use tracing::{debug, info, warn};

use crate::{
    synth::{Patch, PolyphonyManager, VoiceBackend},
    tuning::{Key, NoteNumber},
};

use super::Command;

/// What happened as a result of a command, for display.
#[derive(Debug, Clone, PartialEq)]
pub enum PerformanceEvent {
    NoteStarted {
        note: NoteNumber,
        frequency: f64,
        velocity: u8,
        retriggered: bool,
    },
    NoteStopped {
        note: NoteNumber,
    },
    TuningChanged {
        name: String,
        key: Option<Key>,
    },
    PatchChanged(Patch),
    /// Human-readable notice, mostly backend failures.
    Status(String),
    /// The performer has shut down; no more events follow.
    Stopped,
}

/// Totals for one performer run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PerformanceReport {
    pub notes_started: usize,
    pub notes_stopped: usize,
    pub errors: usize,
}

/// Single consumer of the command channel. The only caller of
/// `note_on`/`note_off` on its manager.
pub struct Performer<B: VoiceBackend> {
    manager: PolyphonyManager<B>,
    report: PerformanceReport,
}

impl<B: VoiceBackend> Performer<B> {
    pub fn new(manager: PolyphonyManager<B>) -> Self {
        Self {
            manager,
            report: PerformanceReport::default(),
        }
    }

    /// Apply commands until `Shutdown` arrives or every dispatcher is
    /// dropped, then stop all voices.
    pub fn run<F>(&mut self, receiver: Receiver<Command>, mut observer: F) -> PerformanceReport
    where
        F: FnMut(PerformanceEvent),
    {
        info!("performer started");
        for command in receiver.iter() {
            if command == Command::Shutdown {
                debug!("shutdown requested");
                break;
            }
            self.apply(command, &mut observer);
        }

        self.stop_all(&mut observer);
        observer(PerformanceEvent::Stopped);
        info!(
            started = self.report.notes_started,
            stopped = self.report.notes_stopped,
            errors = self.report.errors,
            "performer stopped"
        );
        self.report
    }

    /// Run on a named thread. The join handle yields the final report.
    pub fn spawn<F>(
        mut self,
        receiver: Receiver<Command>,
        observer: F,
    ) -> io::Result<JoinHandle<PerformanceReport>>
    where
        B: Send + 'static,
        F: FnMut(PerformanceEvent) + Send + 'static,
    {
        std::thread::Builder::new()
            .name("serpentone-performer".into())
            .spawn(move || self.run(receiver, observer))
    }

    /// Apply one command. `Shutdown` is treated like any other stop-all
    /// request here; only `run` ends the loop on it.
    pub fn apply<F>(&mut self, command: Command, observer: &mut F)
    where
        F: FnMut(PerformanceEvent),
    {
        match command {
            Command::NoteOn { note, velocity } => {
                let was_sounding = self.manager.is_sounding(note);
                match self.manager.note_on(note, velocity) {
                    Ok(started) => {
                        self.report.notes_started += 1;
                        observer(PerformanceEvent::NoteStarted {
                            note,
                            frequency: started.frequency,
                            velocity,
                            retriggered: started.retriggered,
                        });
                    }
                    Err(err) => {
                        if was_sounding && !self.manager.is_sounding(note) {
                            self.report.notes_stopped += 1;
                            observer(PerformanceEvent::NoteStopped { note });
                        }
                        self.fail(format!("{note}: {err}"), observer);
                    }
                }
            }
            Command::NoteOff { note } => match self.manager.note_off(note) {
                Ok(true) => {
                    self.report.notes_stopped += 1;
                    observer(PerformanceEvent::NoteStopped { note });
                }
                Ok(false) => {}
                Err(err) => self.fail(format!("{note}: {err}"), observer),
            },
            Command::SelectTuning(system) => {
                let name = system.name().to_string();
                let key = system.key();
                self.manager.set_active_tuning(system);
                observer(PerformanceEvent::TuningChanged { name, key });
            }
            Command::SelectPatch(patch) => match self.manager.select_patch(patch) {
                Ok(()) => observer(PerformanceEvent::PatchChanged(patch)),
                Err(err) => self.fail(format!("patch {patch}: {err}"), observer),
            },
            Command::Shutdown => self.stop_all(observer),
        }
    }

    pub fn manager(&self) -> &PolyphonyManager<B> {
        &self.manager
    }

    pub fn report(&self) -> PerformanceReport {
        self.report
    }

    pub fn into_manager(self) -> PolyphonyManager<B> {
        self.manager
    }

    fn stop_all<F>(&mut self, observer: &mut F)
    where
        F: FnMut(PerformanceEvent),
    {
        let before = self.manager.active_notes();
        let result = self.manager.shutdown();

        for note in before {
            if !self.manager.is_sounding(note) {
                self.report.notes_stopped += 1;
                observer(PerformanceEvent::NoteStopped { note });
            }
        }
        if let Err(err) = result {
            self.fail(format!("shutdown: {err}"), observer);
        }
    }

    fn fail<F>(&mut self, message: String, observer: &mut F)
    where
        F: FnMut(PerformanceEvent),
    {
        warn!("{message}");
        self.report.errors += 1;
        observer(PerformanceEvent::Status(message));
    }
}
