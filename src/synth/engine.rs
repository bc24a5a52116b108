//! Both ends of the voice ring.
//!
//! [`RingBackend`] lives on the control side and turns `start`/`stop` calls
//! into [`VoiceMessage`]s. [`VoiceBank`] lives inside the audio callback,
//! drains those messages at the top of each block and renders the voices.
//! The ring is the only thing the two share.

use rtrb::{Consumer, Producer, RingBuffer};
use tracing::trace;

use crate::{Error, Result};

use super::{
    message::{MessageReceiver, VoiceMessage},
    voice::{Voice, VoiceState},
    Patch, VoiceBackend, VoiceHandle,
};

/// Create the SPSC ring connecting a [`RingBackend`] to a [`VoiceBank`].
pub fn voice_ring(capacity: usize) -> (Producer<VoiceMessage>, Consumer<VoiceMessage>) {
    RingBuffer::new(capacity)
}

/// [`VoiceBackend`] that forwards to a [`VoiceBank`] over an rtrb ring.
pub struct RingBackend {
    tx: Producer<VoiceMessage>,
    next_handle: u64,
    patch: Patch,
}

impl RingBackend {
    pub fn new(tx: Producer<VoiceMessage>) -> Self {
        Self {
            tx,
            next_handle: 1,
            patch: Patch::Sine,
        }
    }

    pub fn with_patch(mut self, patch: Patch) -> Self {
        self.patch = patch;
        self
    }

    pub fn patch(&self) -> Patch {
        self.patch
    }

    /// Ask the bank to fade out every voice.
    pub fn all_off(&mut self) -> Result<()> {
        self.push(VoiceMessage::AllOff)
    }

    fn push(&mut self, msg: VoiceMessage) -> Result<()> {
        if self.tx.is_abandoned() {
            return Err(Error::BackendUnavailable("voice bank was dropped".into()));
        }
        self.tx
            .push(msg)
            .map_err(|_| Error::BackendUnavailable("voice ring is full".into()))
    }
}

impl VoiceBackend for RingBackend {
    fn start(&mut self, frequency_hz: f64, amplitude: f32) -> Result<VoiceHandle> {
        let handle = VoiceHandle::new(self.next_handle);
        self.push(VoiceMessage::Start {
            handle,
            frequency: frequency_hz as f32,
            amplitude,
            patch: self.patch,
        })?;
        self.next_handle += 1;
        Ok(handle)
    }

    fn stop(&mut self, handle: VoiceHandle, release_seconds: f32) -> Result<()> {
        self.push(VoiceMessage::Release {
            handle,
            release_seconds,
        })
    }

    fn select_patch(&mut self, patch: Patch) -> Result<()> {
        self.patch = patch;
        Ok(())
    }
}

/// Fixed pool of voices rendered on the audio thread.
///
/// All allocation happens in [`VoiceBank::new`]; `render_block` never
/// allocates.
pub struct VoiceBank<R: MessageReceiver = Consumer<VoiceMessage>> {
    voices: Vec<Voice>,
    rx: R,
    gain: f32,
    frame_counter: u64,
}

impl<R: MessageReceiver> VoiceBank<R> {
    pub fn new(sample_rate: f32, max_voices: usize, rx: R) -> Self {
        let voices = (0..max_voices.max(1))
            .map(|_| Voice::new(sample_rate))
            .collect();

        Self {
            voices,
            rx,
            gain: 0.25,
            frame_counter: 0,
        }
    }

    /// Output gain applied to the mix. Defaults to 0.25 so a handful of
    /// full-velocity voices stays clear of clipping.
    pub fn with_gain(mut self, gain: f32) -> Self {
        self.gain = gain;
        self
    }

    /// Overwrite `out` with the next block of mono audio.
    pub fn render_block(&mut self, out: &mut [f32]) {
        while let Some(msg) = self.rx.pop() {
            self.handle(msg);
        }

        out.fill(0.0);
        for voice in &mut self.voices {
            voice.render(out);
        }
        for sample in out.iter_mut() {
            *sample *= self.gain;
        }

        self.frame_counter += out.len() as u64;
    }

    /// Voices currently producing sound (held or releasing).
    pub fn active_voices(&self) -> usize {
        self.voices.iter().filter(|v| !v.is_free()).count()
    }

    pub fn capacity(&self) -> usize {
        self.voices.len()
    }

    fn handle(&mut self, msg: VoiceMessage) {
        match msg {
            VoiceMessage::Start {
                handle,
                frequency,
                amplitude,
                patch,
            } => {
                let age = self.frame_counter;
                let voice = self.allocate_voice();
                voice.start(handle, frequency, amplitude, patch, age);
            }
            VoiceMessage::Release {
                handle,
                release_seconds,
            } => {
                // A stolen voice no longer carries the handle; nothing to do.
                if let Some(voice) = self
                    .voices
                    .iter_mut()
                    .find(|v| v.handle() == Some(handle))
                {
                    voice.release(release_seconds);
                }
            }
            VoiceMessage::AllOff => {
                for voice in &mut self.voices {
                    voice.release_now();
                }
            }
        }
    }

    fn allocate_voice(&mut self) -> &mut Voice {
        // Free voice first, then the oldest releasing one, then the oldest held.
        let idx = self
            .voices
            .iter()
            .position(Voice::is_free)
            .or_else(|| self.oldest(VoiceState::Releasing))
            .or_else(|| self.oldest(VoiceState::Held))
            .unwrap_or(0);

        if !self.voices[idx].is_free() {
            trace!(slot = idx, "stealing voice");
        }
        &mut self.voices[idx]
    }

    fn oldest(&self, state: VoiceState) -> Option<usize> {
        self.voices
            .iter()
            .enumerate()
            .filter(|(_, v)| v.state() == state)
            .min_by_key(|(_, v)| v.age())
            .map(|(idx, _)| idx)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE_RATE: f32 = 1_000.0;

    #[test]
    fn backend_fails_when_ring_is_full() {
        let (tx, _rx) = voice_ring(2);
        let mut backend = RingBackend::new(tx);

        let first = backend.start(440.0, 1.0).unwrap();
        let second = backend.start(440.0, 1.0).unwrap();
        assert_ne!(first, second);

        assert!(matches!(
            backend.start(440.0, 1.0),
            Err(Error::BackendUnavailable(_))
        ));
    }

    #[test]
    fn backend_fails_when_bank_is_gone() {
        let (tx, rx) = voice_ring(8);
        let mut backend = RingBackend::new(tx);
        drop(rx);

        assert!(matches!(
            backend.stop(VoiceHandle::new(1), 0.1),
            Err(Error::BackendUnavailable(_))
        ));
    }

    #[test]
    fn start_carries_selected_patch() {
        let (tx, mut rx) = voice_ring(8);
        let mut backend = RingBackend::new(tx);
        backend.select_patch(Patch::Mockingboard).unwrap();
        backend.start(220.0, 0.5).unwrap();

        match rx.pop() {
            Ok(VoiceMessage::Start { patch, frequency, .. }) => {
                assert_eq!(patch, Patch::Mockingboard);
                assert_eq!(frequency, 220.0);
            }
            other => panic!("unexpected message: {other:?}"),
        }
    }

    #[test]
    fn bank_renders_and_releases() {
        let (tx, rx) = voice_ring(16);
        let mut backend = RingBackend::new(tx);
        let mut bank = VoiceBank::new(SAMPLE_RATE, 4, rx);
        let mut block = vec![0.0; 64];

        bank.render_block(&mut block);
        assert!(block.iter().all(|s| *s == 0.0));

        let handle = backend.start(100.0, 1.0).unwrap();
        bank.render_block(&mut block);
        assert_eq!(bank.active_voices(), 1);
        assert!(block.iter().any(|s| s.abs() > 0.0));

        backend.stop(handle, 0.01).unwrap();
        bank.render_block(&mut block);
        assert_eq!(bank.active_voices(), 0);
    }

    #[test]
    fn bank_steals_when_full() {
        let (tx, rx) = voice_ring(16);
        let mut backend = RingBackend::new(tx);
        let mut bank = VoiceBank::new(SAMPLE_RATE, 2, rx);
        let mut block = vec![0.0; 8];

        for _ in 0..3 {
            backend.start(200.0, 1.0).unwrap();
            bank.render_block(&mut block);
        }
        assert_eq!(bank.active_voices(), 2);
        assert_eq!(bank.capacity(), 2);
    }
}
