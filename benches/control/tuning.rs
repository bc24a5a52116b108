//! Benchmarks for note-to-frequency conversion across the MIDI range.

use std::hint::black_box;

use criterion::{BenchmarkId, Criterion};
use serpentone::tuning::{Key, NoteNumber, TuningSystem};

pub fn bench_tuning(c: &mut Criterion) {
    let mut group = c.benchmark_group("control/tuning");

    let systems = [
        TuningSystem::equal_temperament(),
        TuningSystem::just_intonation(Key::C),
        TuningSystem::pythagorean(Key::A),
    ];

    for system in &systems {
        group.bench_with_input(
            BenchmarkId::new("all_notes", system.name()),
            system,
            |b, system| {
                b.iter(|| {
                    NoteNumber::all()
                        .map(|note| system.to_frequency(black_box(note)))
                        .sum::<f64>()
                })
            },
        );
    }

    group.finish();
}
