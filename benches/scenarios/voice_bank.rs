//! Benchmarks for the voice bank with chords held in each patch.

use std::hint::black_box;

use criterion::{BenchmarkId, Criterion};
use serpentone::{
    synth::{voice_ring, Patch, PolyphonyManager, RingBackend, VoiceBank},
    tuning::{NoteNumber, TuningSystem},
};

use crate::BLOCK_SIZES;

pub fn bench_voice_bank(c: &mut Criterion) {
    let mut group = c.benchmark_group("scenarios/voice_bank");

    for patch in Patch::ALL {
        for &size in BLOCK_SIZES {
            let (tx, rx) = voice_ring(64);
            let mut poly =
                PolyphonyManager::new(RingBackend::new(tx).with_patch(patch), TuningSystem::default());
            let mut bank = VoiceBank::new(48_000.0, 16, rx);
            let mut buffer = vec![0.0f32; size];

            // Eight-note chord, held
            for n in [48, 52, 55, 59, 60, 64, 67, 71] {
                if let Ok(note) = NoteNumber::new(n) {
                    let _ = poly.note_on(note, 100);
                }
            }
            bank.render_block(&mut buffer);

            group.bench_with_input(
                BenchmarkId::new(patch.name(), size),
                &size,
                |b, _| {
                    b.iter(|| {
                        bank.render_block(black_box(&mut buffer));
                    })
                },
            );
        }
    }

    group.finish();
}
