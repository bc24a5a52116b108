//! The seam between note bookkeeping and sound production.

use crate::Result;

use super::Patch;

/// Opaque token for one started voice, issued by the backend.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct VoiceHandle(u64);

impl VoiceHandle {
    pub const fn new(id: u64) -> Self {
        Self(id)
    }

    pub const fn id(self) -> u64 {
        self.0
    }
}

/// Something that can start and stop sounding voices.
///
/// Errors are reported as [`crate::Error::BackendUnavailable`] and are not
/// retried by the caller.
pub trait VoiceBackend {
    /// Begin a voice at `frequency_hz` with linear `amplitude` (0.0-1.0).
    fn start(&mut self, frequency_hz: f64, amplitude: f32) -> Result<VoiceHandle>;

    /// Release a voice, fading it out over `release_seconds`.
    fn stop(&mut self, handle: VoiceHandle, release_seconds: f32) -> Result<()>;

    /// Switch the sound used by voices started from now on.
    fn select_patch(&mut self, _patch: Patch) -> Result<()> {
        Ok(())
    }
}

impl<B: VoiceBackend + ?Sized> VoiceBackend for Box<B> {
    fn start(&mut self, frequency_hz: f64, amplitude: f32) -> Result<VoiceHandle> {
        (**self).start(frequency_hz, amplitude)
    }

    fn stop(&mut self, handle: VoiceHandle, release_seconds: f32) -> Result<()> {
        (**self).stop(handle, release_seconds)
    }

    fn select_patch(&mut self, patch: Patch) -> Result<()> {
        (**self).select_patch(patch)
    }
}
