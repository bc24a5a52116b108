use std::{
    collections::{BTreeMap, BTreeSet},
    sync::Arc,
};

use tracing::{debug, info, warn};

use crate::{
    io::converter::velocity_to_amplitude,
    tuning::{ActiveTuning, NoteNumber, TuningSystem},
    Result,
};

use super::{Patch, VoiceBackend, VoiceHandle};

/// Release time used unless [`PolyphonyManager::with_release`] says otherwise.
pub const DEFAULT_RELEASE_SECONDS: f32 = 0.3;

/// A note that is currently sounding.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ActiveVoice {
    pub handle: VoiceHandle,
    /// Frequency fixed at note-on; later tuning changes don't move it.
    pub frequency: f64,
    pub amplitude: f32,
    pub velocity: u8,
}

/// What a successful `note_on` did.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct NoteStarted {
    pub note: NoteNumber,
    pub handle: VoiceHandle,
    pub frequency: f64,
    pub amplitude: f32,
    /// The note was already sounding and its old voice was stopped first.
    pub retriggered: bool,
}

/// Tracks which notes are sounding and keeps at most one voice per note.
///
/// Not thread-safe by itself: one owner (the performer thread) calls
/// `note_on`/`note_off`, everything else talks to it through commands.
pub struct PolyphonyManager<B: VoiceBackend> {
    backend: B,
    tuning: ActiveTuning,
    voices: BTreeMap<NoteNumber, ActiveVoice>,
    release_seconds: f32,
}

impl<B: VoiceBackend> PolyphonyManager<B> {
    pub fn new(backend: B, tuning: TuningSystem) -> Self {
        Self::with_active_tuning(backend, ActiveTuning::new(tuning))
    }

    /// Share an existing tuning slot, e.g. one the UI also reads.
    pub fn with_active_tuning(backend: B, tuning: ActiveTuning) -> Self {
        Self {
            backend,
            tuning,
            voices: BTreeMap::new(),
            release_seconds: DEFAULT_RELEASE_SECONDS,
        }
    }

    /// Set the release time passed to every `stop`.
    pub fn with_release(mut self, seconds: f32) -> Self {
        self.release_seconds = seconds.max(0.0);
        self
    }

    /// Start `note`, stopping its current voice first if it is already held.
    ///
    /// On backend failure the note map is left as it was, except when the
    /// old voice was stopped and the new one failed to start: then the note
    /// is no longer sounding and its entry is gone.
    pub fn note_on(&mut self, note: NoteNumber, velocity: u8) -> Result<NoteStarted> {
        let retriggered = match self.voices.get(&note) {
            Some(existing) => {
                let handle = existing.handle;
                self.backend
                    .stop(handle, self.release_seconds)
                    .inspect_err(|err| warn!(%note, %err, "retrigger stop failed"))?;
                self.voices.remove(&note);
                true
            }
            None => false,
        };

        let frequency = self.tuning.load().to_frequency(note);
        let amplitude = velocity_to_amplitude(velocity);
        let handle = self
            .backend
            .start(frequency, amplitude)
            .inspect_err(|err| warn!(%note, %err, "voice start failed"))?;

        self.voices.insert(
            note,
            ActiveVoice {
                handle,
                frequency,
                amplitude,
                velocity,
            },
        );
        debug!(%note, frequency, velocity, retriggered, "note on");

        Ok(NoteStarted {
            note,
            handle,
            frequency,
            amplitude,
            retriggered,
        })
    }

    /// Release `note`. Returns `false` without touching the backend if the
    /// note wasn't sounding.
    pub fn note_off(&mut self, note: NoteNumber) -> Result<bool> {
        let Some(voice) = self.voices.get(&note) else {
            return Ok(false);
        };

        self.backend
            .stop(voice.handle, self.release_seconds)
            .inspect_err(|err| warn!(%note, %err, "voice stop failed"))?;
        self.voices.remove(&note);
        debug!(%note, "note off");
        Ok(true)
    }

    /// Stop every sounding note and return how many were stopped.
    ///
    /// Every voice gets a stop attempt even if an earlier one fails. Notes
    /// whose stop failed stay in the map and the first error is returned.
    pub fn shutdown(&mut self) -> Result<usize> {
        let release = self.release_seconds;
        let backend = &mut self.backend;
        let mut stopped = 0;
        let mut first_error = None;

        self.voices
            .retain(|note, voice| match backend.stop(voice.handle, release) {
                Ok(()) => {
                    stopped += 1;
                    false
                }
                Err(err) => {
                    warn!(%note, %err, "voice stop failed during shutdown");
                    if first_error.is_none() {
                        first_error = Some(err);
                    }
                    true
                }
            });

        if stopped > 0 {
            info!(stopped, "all notes stopped");
        }
        match first_error {
            Some(err) => Err(err),
            None => Ok(stopped),
        }
    }

    /// Replace the tuning used for future notes. Sounding voices keep the
    /// frequency they started with.
    pub fn set_active_tuning(&mut self, system: TuningSystem) -> Arc<TuningSystem> {
        info!(tuning = %system, "tuning changed");
        self.tuning.set(system)
    }

    pub fn select_patch(&mut self, patch: Patch) -> Result<()> {
        self.backend.select_patch(patch)?;
        info!(%patch, "patch changed");
        Ok(())
    }

    pub fn tuning(&self) -> Arc<TuningSystem> {
        self.tuning.load()
    }

    pub fn active_tuning(&self) -> &ActiveTuning {
        &self.tuning
    }

    pub fn active_notes(&self) -> BTreeSet<NoteNumber> {
        self.voices.keys().copied().collect()
    }

    /// Sounding notes with their voices, lowest note first.
    pub fn active_voices(&self) -> impl Iterator<Item = (NoteNumber, &ActiveVoice)> + '_ {
        self.voices.iter().map(|(note, voice)| (*note, voice))
    }

    pub fn is_sounding(&self, note: NoteNumber) -> bool {
        self.voices.contains_key(&note)
    }

    pub fn release_seconds(&self) -> f32 {
        self.release_seconds
    }

    pub fn backend(&self) -> &B {
        &self.backend
    }

    pub fn backend_mut(&mut self) -> &mut B {
        &mut self.backend
    }

    pub fn into_backend(self) -> B {
        self.backend
    }
}
