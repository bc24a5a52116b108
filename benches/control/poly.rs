//! Benchmarks for note-on/note-off churn through the polyphony manager.

use std::hint::black_box;

use criterion::Criterion;
use serpentone::{
    synth::{PolyphonyManager, VoiceBackend, VoiceHandle},
    tuning::{Key, NoteNumber, TuningSystem},
    Result,
};

/// Backend that does nothing, so only the manager is measured.
struct Null(u64);

impl VoiceBackend for Null {
    fn start(&mut self, _: f64, _: f32) -> Result<VoiceHandle> {
        self.0 += 1;
        Ok(VoiceHandle::new(self.0))
    }

    fn stop(&mut self, _: VoiceHandle, _: f32) -> Result<()> {
        Ok(())
    }
}

pub fn bench_poly(c: &mut Criterion) {
    let mut group = c.benchmark_group("control/poly");
    let notes: Vec<NoteNumber> = (48..72).filter_map(|n| NoteNumber::new(n).ok()).collect();

    let mut poly = PolyphonyManager::new(Null(0), TuningSystem::just_intonation(Key::C));
    group.bench_function("chord_on_off", |b| {
        b.iter(|| {
            for &note in &notes {
                let _ = poly.note_on(black_box(note), 100);
            }
            for &note in &notes {
                let _ = poly.note_off(black_box(note));
            }
        })
    });

    let mut poly = PolyphonyManager::new(Null(0), TuningSystem::default());
    group.bench_function("retrigger", |b| {
        b.iter(|| {
            let _ = poly.note_on(black_box(NoteNumber::C4), 100);
        })
    });

    group.finish();
}
