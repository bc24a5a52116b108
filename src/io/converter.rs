use crate::{engine::Command, io::midi::MidiEvent, tuning::NoteNumber};

/// Map a decoded MIDI event to a note command.
///
/// `channel_filter` of `None` listens on every channel. A note-on with
/// velocity 0 is a note-off, as most keyboards send it.
pub fn midi_to_command(midi: MidiEvent, channel_filter: Option<u8>) -> Option<Command> {
    if channel_filter.is_some_and(|wanted| wanted != midi.channel()) {
        return None;
    }

    match midi {
        MidiEvent::NoteOn { key, velocity, .. } if velocity > 0 => Some(Command::NoteOn {
            note: NoteNumber::new(key as i32).ok()?,
            velocity,
        }),
        MidiEvent::NoteOn { key, .. } | MidiEvent::NoteOff { key, .. } => Some(Command::NoteOff {
            note: NoteNumber::new(key as i32).ok()?,
        }),
        _ => None,
    }
}

/// Linear velocity scaling: 0 is silent, 127 is full scale.
pub fn velocity_to_amplitude(velocity: u8) -> f32 {
    velocity.min(127) as f32 / 127.0
}
