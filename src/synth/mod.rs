// Purpose: Voice lifecycle, polyphony and the realtime voice bank
// The manager above the backend trait decides which notes sound; the bank
// below the ring decides what they sound like.

pub mod backend;
pub mod engine;
pub mod message;
pub mod patch;
pub mod poly;
pub mod voice;

pub use backend::{VoiceBackend, VoiceHandle};
pub use engine::{voice_ring, RingBackend, VoiceBank};
pub use patch::Patch;
pub use poly::{ActiveVoice, NoteStarted, PolyphonyManager};
