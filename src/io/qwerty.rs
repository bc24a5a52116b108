//! Computer-keyboard piano.
//!
//! The home row plays a chromatic scale the way a piano roll lays it out:
//! `a` is C, `w` is C#, `s` is D and so on up to `'` (F one octave up).
//!
//! ```text
//!  w e   t y u   o p
//! a s d f g h j k l ; '
//! ```
//!
//! Other keys: `z`/`x` octave down/up, `c`/`v`/`b` patch, `1`/`2`/`3` tuning,
//! `-`/`=` key down/up a semitone.

use std::collections::HashMap;

use crate::{
    engine::Command,
    synth::Patch,
    tuning::{Key, NoteNumber, ReferencePitch, TuningKind},
};

const NOTE_KEYS: &str = "awsedftgyhujkolp;'";

/// Highest selectable octave. Octave 10 only reaches up to note 127.
pub const MAX_OCTAVE: u8 = 10;

/// Velocity for every key press; a typing keyboard has no touch sensitivity.
pub const QWERTY_VELOCITY: u8 = 64;

/// Stateful QWERTY decoder. Turns key presses and releases into commands.
#[derive(Debug, Clone)]
pub struct QwertyKeyboard {
    octave: u8,
    tuning: TuningKind,
    key: Key,
    reference: ReferencePitch,
    latch: bool,
    // Note each held key started, so a later octave change can't strand it.
    held: HashMap<char, NoteNumber>,
}

impl QwertyKeyboard {
    pub fn new(octave: u8) -> Self {
        Self {
            octave: octave.min(MAX_OCTAVE),
            tuning: TuningKind::default(),
            key: Key::C,
            reference: ReferencePitch::concert(),
            latch: false,
            held: HashMap::new(),
        }
    }

    /// Starting tuning, used to rebuild the system when `-`/`=` move the key.
    pub fn with_tuning(mut self, tuning: TuningKind, key: Key, reference: ReferencePitch) -> Self {
        self.tuning = tuning;
        self.key = key;
        self.reference = reference;
        self
    }

    /// In latch mode a second press of a held key releases it. For terminals
    /// that never report key releases.
    pub fn with_latch(mut self, latch: bool) -> Self {
        self.latch = latch;
        self
    }

    pub fn press(&mut self, c: char) -> Option<Command> {
        let c = c.to_ascii_lowercase();

        if let Some(offset) = NOTE_KEYS.find(c) {
            if self.held.contains_key(&c) {
                // Auto-repeat, unless latching.
                return if self.latch { self.release_held(c) } else { None };
            }
            let note = NoteNumber::new(self.octave as i32 * 12 + offset as i32).ok()?;
            self.held.insert(c, note);
            return Some(Command::NoteOn {
                note,
                velocity: QWERTY_VELOCITY,
            });
        }

        match c {
            'z' => {
                self.octave = self.octave.saturating_sub(1);
                None
            }
            'x' => {
                self.octave = (self.octave + 1).min(MAX_OCTAVE);
                None
            }
            'c' => Some(Command::SelectPatch(Patch::Default)),
            'v' => Some(Command::SelectPatch(Patch::Sine)),
            'b' => Some(Command::SelectPatch(Patch::Mockingboard)),
            '1' => self.select_tuning(TuningKind::Equal),
            '2' => self.select_tuning(TuningKind::Just),
            '3' => self.select_tuning(TuningKind::Pythagorean),
            '-' => self.move_key(-1),
            '=' => self.move_key(1),
            _ => None,
        }
    }

    pub fn release(&mut self, c: char) -> Option<Command> {
        if self.latch {
            return None;
        }
        self.release_held(c.to_ascii_lowercase())
    }

    /// Release every held key, e.g. when input focus is lost.
    pub fn release_all(&mut self) -> Vec<Command> {
        self.held
            .drain()
            .map(|(_, note)| Command::NoteOff { note })
            .collect()
    }

    pub fn octave(&self) -> u8 {
        self.octave
    }

    pub fn key(&self) -> Key {
        self.key
    }

    pub fn tuning(&self) -> TuningKind {
        self.tuning
    }

    pub fn is_latching(&self) -> bool {
        self.latch
    }

    fn release_held(&mut self, c: char) -> Option<Command> {
        self.held.remove(&c).map(|note| Command::NoteOff { note })
    }

    fn select_tuning(&mut self, kind: TuningKind) -> Option<Command> {
        self.tuning = kind;
        Some(Command::SelectTuning(kind.build(self.key, self.reference)))
    }

    fn move_key(&mut self, semitones: i32) -> Option<Command> {
        self.key = self.key.transpose(semitones);
        self.select_tuning(self.tuning)
    }
}

impl Default for QwertyKeyboard {
    fn default() -> Self {
        Self::new(5)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn on(n: i32) -> Option<Command> {
        Some(Command::NoteOn {
            note: NoteNumber::new(n).unwrap(),
            velocity: QWERTY_VELOCITY,
        })
    }

    fn off(n: i32) -> Option<Command> {
        Some(Command::NoteOff {
            note: NoteNumber::new(n).unwrap(),
        })
    }

    #[test]
    fn home_row_is_chromatic_from_the_octave() {
        let mut kb = QwertyKeyboard::new(5);
        assert_eq!(kb.press('a'), on(60));
        assert_eq!(kb.press('w'), on(61));
        assert_eq!(kb.press('k'), on(72));
        assert_eq!(kb.press('\''), on(77));
    }

    #[test]
    fn release_survives_octave_change() {
        let mut kb = QwertyKeyboard::new(5);
        assert_eq!(kb.press('a'), on(60));
        kb.press('x');
        assert_eq!(kb.octave(), 6);
        assert_eq!(kb.release('a'), off(60));
        assert_eq!(kb.press('a'), on(72));
    }

    #[test]
    fn octave_is_clamped() {
        let mut kb = QwertyKeyboard::new(0);
        kb.press('z');
        assert_eq!(kb.octave(), 0);
        for _ in 0..20 {
            kb.press('x');
        }
        assert_eq!(kb.octave(), MAX_OCTAVE);
        // 10 * 12 + 8 is past the MIDI range.
        assert_eq!(kb.press('y'), None);
        assert_eq!(kb.press('a'), on(120));
    }

    #[test]
    fn auto_repeat_is_ignored() {
        let mut kb = QwertyKeyboard::default();
        assert!(kb.press('s').is_some());
        assert_eq!(kb.press('s'), None);
        assert_eq!(kb.release('s'), off(62));
        assert_eq!(kb.release('s'), None);
    }

    #[test]
    fn latch_toggles_on_second_press() {
        let mut kb = QwertyKeyboard::default().with_latch(true);
        assert_eq!(kb.press('d'), on(64));
        assert_eq!(kb.release('d'), None);
        assert_eq!(kb.press('d'), off(64));
        assert_eq!(kb.press('d'), on(64));
    }

    #[test]
    fn selection_keys() {
        let mut kb = QwertyKeyboard::default();
        assert_eq!(kb.press('b'), Some(Command::SelectPatch(Patch::Mockingboard)));

        match kb.press('3') {
            Some(Command::SelectTuning(system)) => assert_eq!(system.name(), "Pythagorean"),
            other => panic!("expected tuning selection, got {other:?}"),
        }

        match kb.press('=') {
            Some(Command::SelectTuning(system)) => {
                assert_eq!(system.key(), Some(Key::C.transpose(1)));
                assert_eq!(system.name(), "Pythagorean");
            }
            other => panic!("expected tuning selection, got {other:?}"),
        }
        assert_eq!(kb.key().name(), "C#");
    }

    #[test]
    fn release_all_drains_held_keys() {
        let mut kb = QwertyKeyboard::default();
        kb.press('a');
        kb.press('g');
        assert_eq!(kb.release_all().len(), 2);
        assert_eq!(kb.release('a'), None);
    }
}
