//! UI-side model, rebuilt from performer events.

use std::{
    collections::{BTreeMap, VecDeque},
    sync::{
        atomic::{AtomicU8, Ordering},
        Arc,
    },
    time::{Duration, Instant},
};

use serpentone::{
    engine::PerformanceEvent,
    synth::Patch,
    tuning::{pitch, Key, NoteNumber, ReferencePitch, TuningSystem},
    InstrumentConfig,
};

/// Status lines kept on screen.
pub const STATUS_HISTORY: usize = 20;

/// One sounding note as shown in the notes panel.
#[derive(Debug, Clone, Copy)]
pub struct NoteRow {
    pub frequency: f64,
    /// Deviation from 12-TET at the configured reference
    pub cents: f64,
    pub velocity: u8,
}

pub struct UiState {
    pub tuning_name: String,
    pub key: Option<Key>,
    pub patch: Patch,
    pub notes: BTreeMap<NoteNumber, NoteRow>,
    pub status: VecDeque<(Duration, String)>,
    pub stopped: bool,
    reference: ReferencePitch,
    octave: Arc<AtomicU8>,
    started: Instant,
}

impl UiState {
    pub fn new(config: &InstrumentConfig, tuning: &TuningSystem, octave: Arc<AtomicU8>) -> Self {
        let reference = tuning.reference();
        let mut state = Self {
            tuning_name: tuning.name().to_string(),
            key: tuning.key(),
            patch: config.patch,
            notes: BTreeMap::new(),
            status: VecDeque::with_capacity(STATUS_HISTORY),
            stopped: false,
            reference,
            octave,
            started: Instant::now(),
        };
        state.push_status(format!("Ready: {tuning}, A4 = {} Hz", reference.frequency()));
        state
    }

    pub fn apply(&mut self, event: PerformanceEvent) {
        match event {
            PerformanceEvent::NoteStarted {
                note,
                frequency,
                velocity,
                ..
            } => {
                let equal = pitch::equal_tempered(self.reference, note);
                self.notes.insert(
                    note,
                    NoteRow {
                        frequency,
                        cents: pitch::cents_between(frequency, equal),
                        velocity,
                    },
                );
            }
            PerformanceEvent::NoteStopped { note } => {
                self.notes.remove(&note);
            }
            PerformanceEvent::TuningChanged { name, key } => {
                let message = match key {
                    Some(key) => format!("Tuning: {name} in {key}"),
                    None => format!("Tuning: {name}"),
                };
                self.tuning_name = name;
                self.key = key;
                self.push_status(message);
            }
            PerformanceEvent::PatchChanged(patch) => {
                self.patch = patch;
                self.push_status(format!("Patch: {patch}"));
            }
            PerformanceEvent::Status(message) => self.push_status(message),
            PerformanceEvent::Stopped => {
                self.notes.clear();
                self.stopped = true;
            }
        }
    }

    /// The performer or the input thread went away without a `Stopped` event.
    pub fn mark_lost(&mut self, reason: &str) {
        self.notes.clear();
        self.stopped = true;
        self.push_status(format!("Stopped: {reason}"));
    }

    pub fn octave(&self) -> u8 {
        self.octave.load(Ordering::Relaxed)
    }

    fn push_status(&mut self, message: String) {
        if self.status.len() == STATUS_HISTORY {
            self.status.pop_front();
        }
        self.status.push_back((self.started.elapsed(), message));
    }
}
