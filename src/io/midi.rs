#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MidiEvent {
    NoteOn { channel: u8, key: u8, velocity: u8 },
    NoteOff { channel: u8, key: u8, velocity: u8 },
    ControlChange { channel: u8, controller: u8, value: u8 },
    PitchBend { channel: u8, value: i16 },
    ProgramChange { channel: u8, program: u8 },
}

impl MidiEvent {
    /// Decode one channel voice message.
    ///
    /// Returns `None` for system messages, truncated messages and data bytes
    /// without a status byte (running status is not tracked).
    pub fn from_bytes(bytes: &[u8]) -> Option<Self> {
        let (&status, data) = bytes.split_first()?;
        if status < 0x80 {
            return None;
        }
        let channel = status & 0x0F;
        let data = |i: usize| data.get(i).map(|b| b & 0x7F);

        let event = match status & 0xF0 {
            0x80 => Self::NoteOff {
                channel,
                key: data(0)?,
                velocity: data(1)?,
            },
            0x90 => Self::NoteOn {
                channel,
                key: data(0)?,
                velocity: data(1)?,
            },
            0xB0 => Self::ControlChange {
                channel,
                controller: data(0)?,
                value: data(1)?,
            },
            0xC0 => Self::ProgramChange {
                channel,
                program: data(0)?,
            },
            0xE0 => {
                let lsb = data(0)? as i16;
                let msb = data(1)? as i16;
                Self::PitchBend {
                    channel,
                    value: ((msb << 7) | lsb) - 8192,
                }
            }
            _ => return None,
        };
        Some(event)
    }

    pub fn channel(&self) -> u8 {
        match *self {
            Self::NoteOn { channel, .. }
            | Self::NoteOff { channel, .. }
            | Self::ControlChange { channel, .. }
            | Self::PitchBend { channel, .. }
            | Self::ProgramChange { channel, .. } => channel,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn decodes_note_messages() {
        assert_eq!(
            MidiEvent::from_bytes(&[0x93, 60, 100]),
            Some(MidiEvent::NoteOn {
                channel: 3,
                key: 60,
                velocity: 100
            })
        );
        assert_eq!(
            MidiEvent::from_bytes(&[0x80, 61, 0]),
            Some(MidiEvent::NoteOff {
                channel: 0,
                key: 61,
                velocity: 0
            })
        );
    }

    #[test]
    fn decodes_pitch_bend_around_center() {
        let center = MidiEvent::from_bytes(&[0xE0, 0x00, 0x40]);
        assert_eq!(center, Some(MidiEvent::PitchBend { channel: 0, value: 0 }));

        let top = MidiEvent::from_bytes(&[0xE1, 0x7F, 0x7F]);
        assert_eq!(top, Some(MidiEvent::PitchBend { channel: 1, value: 8191 }));
    }

    #[test]
    fn program_change_has_one_data_byte() {
        assert_eq!(
            MidiEvent::from_bytes(&[0xC2, 5]),
            Some(MidiEvent::ProgramChange {
                channel: 2,
                program: 5
            })
        );
    }

    #[test]
    fn rejects_what_it_cannot_decode() {
        assert_eq!(MidiEvent::from_bytes(&[]), None);
        assert_eq!(MidiEvent::from_bytes(&[60, 100]), None); // running status
        assert_eq!(MidiEvent::from_bytes(&[0x90, 60]), None); // truncated
        assert_eq!(MidiEvent::from_bytes(&[0xF8]), None); // clock
    }
}
