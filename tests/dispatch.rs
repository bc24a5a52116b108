use std::{
    sync::{Arc, Mutex},
    thread,
};

use serpentone::{
    engine::{command_channel, PerformanceEvent, Performer},
    synth::{Patch, PolyphonyManager, VoiceBackend, VoiceHandle},
    tuning::{ActiveTuning, Key, NoteNumber, TuningSystem},
    Result,
};

#[derive(Default)]
struct Silent {
    next: u64,
    patch: Option<Patch>,
}

impl VoiceBackend for Silent {
    fn start(&mut self, _: f64, _: f32) -> Result<VoiceHandle> {
        self.next += 1;
        Ok(VoiceHandle::new(self.next))
    }

    fn stop(&mut self, _: VoiceHandle, _: f32) -> Result<()> {
        Ok(())
    }

    fn select_patch(&mut self, patch: Patch) -> Result<()> {
        self.patch = Some(patch);
        Ok(())
    }
}

fn note(n: i32) -> NoteNumber {
    NoteNumber::new(n).unwrap()
}

/// Note events for `range`, in the order a performer should apply them.
fn expected(range: std::ops::Range<i32>) -> Vec<(bool, u8)> {
    range.flat_map(|n| [(true, n as u8), (false, n as u8)]).collect()
}

#[test]
fn each_source_keeps_its_order() {
    let (dispatcher, rx) = command_channel(4);
    let events = Arc::new(Mutex::new(Vec::new()));
    let sink = events.clone();

    let performer = Performer::new(PolyphonyManager::new(Silent::default(), TuningSystem::default()))
        .spawn(rx, move |event| sink.lock().unwrap().push(event))
        .unwrap();

    let sources: Vec<_> = [20..50, 70..100]
        .into_iter()
        .map(|range| {
            let dispatcher = dispatcher.clone();
            thread::spawn(move || {
                for n in range {
                    dispatcher.note_on(note(n), 100).unwrap();
                    dispatcher.note_off(note(n)).unwrap();
                }
            })
        })
        .collect();
    for source in sources {
        source.join().unwrap();
    }
    dispatcher.shutdown().unwrap();

    let report = performer.join().unwrap();
    assert_eq!(report.notes_started, 60);
    assert_eq!(report.notes_stopped, 60);
    assert_eq!(report.errors, 0);

    let events = events.lock().unwrap();
    let note_events: Vec<(bool, u8)> = events
        .iter()
        .filter_map(|event| match event {
            PerformanceEvent::NoteStarted { note, .. } => Some((true, note.get())),
            PerformanceEvent::NoteStopped { note } => Some((false, note.get())),
            _ => None,
        })
        .collect();

    let low: Vec<_> = note_events.iter().copied().filter(|(_, n)| *n < 60).collect();
    let high: Vec<_> = note_events.iter().copied().filter(|(_, n)| *n >= 60).collect();
    assert_eq!(low, expected(20..50));
    assert_eq!(high, expected(70..100));
    assert_eq!(events.last(), Some(&PerformanceEvent::Stopped));
}

#[test]
fn selections_are_ordered_with_notes() {
    let (dispatcher, rx) = command_channel(16);
    let active = ActiveTuning::default();
    let manager = PolyphonyManager::with_active_tuning(Silent::default(), active.clone());

    dispatcher.note_on(note(64), 100).unwrap();
    dispatcher
        .select_tuning(TuningSystem::just_intonation(Key::C))
        .unwrap();
    dispatcher.note_on(note(76), 100).unwrap();
    dispatcher.select_patch(Patch::Mockingboard).unwrap();
    dispatcher.shutdown().unwrap();

    let mut events = Vec::new();
    let mut performer = Performer::new(manager);
    performer.run(rx, |event| events.push(event));

    let frequencies: Vec<f64> = events
        .iter()
        .filter_map(|event| match event {
            PerformanceEvent::NoteStarted { frequency, .. } => Some(*frequency),
            _ => None,
        })
        .collect();
    let et = TuningSystem::equal_temperament();
    let ji = TuningSystem::just_intonation(Key::C);
    assert_eq!(
        frequencies,
        vec![et.to_frequency(note(64)), ji.to_frequency(note(76))]
    );

    assert!(events.contains(&PerformanceEvent::PatchChanged(Patch::Mockingboard)));
    assert_eq!(performer.manager().backend().patch, Some(Patch::Mockingboard));
    assert_eq!(active.load().key(), Some(Key::C));
}
