use approx::assert_relative_eq;
use serpentone::tuning::{
    pitch, Key, NoteNumber, ReferencePitch, TuningKind, TuningSystem,
};

fn note(n: i32) -> NoteNumber {
    NoteNumber::new(n).unwrap()
}

/// Every built-in system in every key.
fn all_systems() -> Vec<TuningSystem> {
    let mut systems = vec![TuningSystem::equal_temperament()];
    for pitch_class in 0..12 {
        let key = Key::from_pitch_class(pitch_class);
        systems.push(TuningSystem::just_intonation(key));
        systems.push(TuningSystem::pythagorean(key));
    }
    systems
}

#[test]
fn concert_a_is_exact() {
    assert_eq!(TuningSystem::equal_temperament().to_frequency(note(69)), 440.0);
}

#[test]
fn octaves_double_in_every_system() {
    for system in all_systems() {
        for n in 0..=115 {
            let low = system.to_frequency(note(n));
            let high = system.to_frequency(note(n + 12));
            assert_relative_eq!(high / low, 2.0, max_relative = 1e-9);
        }
    }
}

#[test]
fn frequencies_rise_with_note_number() {
    for system in all_systems() {
        let freqs: Vec<f64> = NoteNumber::all().map(|n| system.to_frequency(n)).collect();
        assert!(freqs.iter().all(|f| f.is_finite() && *f > 0.0), "{system}");
        assert!(freqs.windows(2).all(|w| w[0] < w[1]), "{system}");
    }
}

#[test]
fn just_major_third_in_c() {
    let ji = TuningSystem::just_intonation(Key::C);
    assert_relative_eq!(
        ji.to_frequency(note(64)) / ji.to_frequency(note(60)),
        5.0 / 4.0,
        max_relative = 1e-12
    );
}

#[test]
fn pythagorean_fifth_and_ditone_in_c() {
    let pyth = TuningSystem::pythagorean(Key::C);
    let c4 = pyth.to_frequency(note(60));
    assert_relative_eq!(pyth.to_frequency(note(67)) / c4, 3.0 / 2.0, max_relative = 1e-12);
    assert_relative_eq!(pyth.to_frequency(note(64)) / c4, 81.0 / 64.0, max_relative = 1e-12);
}

#[test]
fn major_third_deviation_from_equal_temperament() {
    let e4 = note(64);
    let pyth = TuningSystem::pythagorean(Key::C).cents_from_equal(e4);
    let ji = TuningSystem::just_intonation(Key::C).cents_from_equal(e4);

    assert_relative_eq!(pyth, 7.82, epsilon = 0.01);
    assert_relative_eq!(ji, -13.69, epsilon = 0.01);
}

#[test]
fn notes_far_below_the_tonic_use_euclidean_octaves() {
    let et = TuningSystem::equal_temperament();
    for key in [Key::C, Key::A, "F#".parse().unwrap()] {
        for system in [TuningSystem::just_intonation(key), TuningSystem::pythagorean(key)] {
            // The tonic pitch class is equal-tempered in every octave, even
            // the ones under the anchor.
            let lowest_tonic = note(key.pitch_class() as i32);
            assert_relative_eq!(
                system.to_frequency(lowest_tonic),
                et.to_frequency(lowest_tonic),
                max_relative = 1e-12
            );
            // The major seventh above it takes the table's last degree.
            let seventh = lowest_tonic.transpose(11).unwrap();
            let ratio = system.to_frequency(seventh) / system.to_frequency(lowest_tonic);
            assert!(ratio > 1.8 && ratio < 2.0);
        }
    }
}

#[test]
fn cents_helpers_agree() {
    let reference = ReferencePitch::concert();
    let c4 = pitch::equal_tempered(reference, note(60));
    let g4 = pitch::equal_tempered(reference, note(67));
    assert_relative_eq!(pitch::cents_between(g4, c4), 700.0, epsilon = 1e-9);
}

#[test]
fn kinds_build_what_they_name() {
    let reference = ReferencePitch::new(442.0, NoteNumber::A4).unwrap();
    for kind in TuningKind::ALL {
        let system = kind.build(Key::C, reference);
        assert_eq!(system.kind(), Some(kind));
        assert_eq!(system.name(), kind.name());
        assert_eq!(system.reference(), reference);
    }
}

#[test]
fn construction_errors_are_reported() {
    use serpentone::{tuning::IntervalRatio, Error};

    assert_eq!(NoteNumber::new(200), Err(Error::NoteOutOfRange(200)));
    assert_eq!("X#".parse::<Key>(), Err(Error::UnknownKey("X#".into())));
    assert_eq!(
        "werckmeister".parse::<TuningKind>(),
        Err(Error::UnknownTuning("werckmeister".into()))
    );
    assert_eq!(
        TuningSystem::ratio_based("short", &[IntervalRatio::UNISON; 11], Key::C),
        Err(Error::InvalidRatioTable { len: 11 })
    );
    assert_eq!(
        IntervalRatio::new(5, 0),
        Err(Error::InvalidRatio {
            numerator: 5,
            denominator: 0
        })
    );
}

#[test]
fn unusable_reference_pitch_never_reaches_a_tuning() {
    use serpentone::{Error, InstrumentConfig};

    assert!(matches!(
        ReferencePitch::new(-440.0, NoteNumber::A4),
        Err(Error::InvalidReferencePitch(_))
    ));
    assert!(matches!(
        InstrumentConfig::new()
            .tuning(TuningKind::Just)
            .reference_hz(f64::NAN)
            .build_tuning(),
        Err(Error::InvalidReferencePitch(_))
    ));

    // Every system that can be built plays positive, finite pitches.
    let low = ReferencePitch::new(1.0, NoteNumber::A4).unwrap();
    for kind in TuningKind::ALL {
        let system = kind.build(Key::C, low);
        for n in NoteNumber::all() {
            let hz = system.to_frequency(n);
            assert!(hz.is_finite() && hz > 0.0, "{kind} gave {hz} Hz for {n}");
        }
    }
}
