use rtrb::Consumer;

use super::{Patch, VoiceHandle};

/// Control messages from the backend to the audio thread.
#[derive(Debug, Copy, Clone, PartialEq)]
pub enum VoiceMessage {
    Start {
        handle: VoiceHandle,
        frequency: f32,
        amplitude: f32,
        patch: Patch,
    },
    Release {
        handle: VoiceHandle,
        release_seconds: f32,
    },
    AllOff,
}

pub trait MessageReceiver {
    fn pop(&mut self) -> Option<VoiceMessage>;
}

impl MessageReceiver for Consumer<VoiceMessage> {
    fn pop(&mut self) -> Option<VoiceMessage> {
        Consumer::pop(self).ok()
    }
}
