//! End-to-end production tests.
//!
//! These tests build small databases through the public API and check the
//! produced pattern text column by column.

use noterand_core::model::{Channel, Effect, Instrument, Octave, Offset, PitchClass, Range, Volume};
use noterand_core::produce::{
    create_rng, produce, produce_run, ProductionSettings, ProductionWarning, HEADER,
    SEGMENT_WIDTH,
};
use noterand_core::{link, Database, ParentId, Scope};
use pretty_assertions::assert_eq;

// =============================================================================
// Helper Functions
// =============================================================================

/// Splits one output line into per-channel `(note, volume, effect)` columns.
fn columns(line: &str) -> Vec<(&str, &str, &str)> {
    assert_eq!(line.len() % SEGMENT_WIDTH, 0, "ragged line {:?}", line);
    (0..line.len() / SEGMENT_WIDTH)
        .map(|i| {
            let segment = &line[i * SEGMENT_WIDTH..(i + 1) * SEGMENT_WIDTH];
            assert!(segment.starts_with('|'));
            (&segment[1..6], &segment[6..9], &segment[9..12])
        })
        .collect()
}

// =============================================================================
// Scenarios
// =============================================================================

#[test]
fn test_single_note_channel() {
    let mut db = Database::new();
    let mut channel = Channel::default();
    channel.overwrite = false;
    let channel = db.add_channel(channel);
    let instrument = db.add(Scope::Root, Instrument::new(1).unwrap());
    let octave = db.add(Scope::Root, Octave::new(5, vec![PitchClass::C]).unwrap());
    link::attach(&mut db, ParentId::Instrument(instrument), &[octave.into()]).unwrap();
    link::attach(&mut db, ParentId::Channel(channel), &[instrument.into()]).unwrap();

    let run = produce_run(&db, 2, &mut create_rng(42));
    assert_eq!(
        run.text,
        format!("{}\n|C-501      \n|C-501      \n", HEADER)
    );
}

#[test]
fn test_channel_cap_warns() {
    let mut db = Database::new();
    for _ in 0..130 {
        db.add_channel(Channel::default());
    }
    let production = produce(
        &db,
        ProductionSettings { lines: 2, runs: 1 },
        &mut create_rng(0),
    );
    assert_eq!(production.channels_used, 127);
    assert_eq!(
        production.warnings,
        vec![ProductionWarning::TooManyChannels {
            available: 130,
            used: 127
        }]
    );
    let line = production.runs[0].lines().nth(1).unwrap();
    assert_eq!(columns(line).len(), 127);
}

#[test]
fn test_global_pools_feed_channels() {
    let mut db = Database::new();
    let mut channel = Channel::default();
    channel.volumes.pool.use_globals = true;
    channel.effects.pool.use_globals = true;
    db.add_channel(channel);
    db.add(Scope::Globals, Volume::new('p', Range::single(32)).unwrap());
    db.add(Scope::Globals, Effect::new('X', Range::single(0x80)).unwrap());

    let run = produce_run(&db, 4, &mut create_rng(9));
    for line in run.text.lines().skip(1) {
        assert_eq!(columns(line), vec![(".....", "p32", "X80")]);
    }
}

#[test]
fn test_offsets_follow_announced_area() {
    let mut db = Database::new();
    let mut channel = Channel::default();
    channel.instruments.spacing = Range::single(1);
    let channel = db.add_channel(channel);
    let instrument = db.add(Scope::Root, Instrument::new(2).unwrap());
    let offset = db.add(
        Scope::Globals,
        Offset::new(Range::new(1, 3), Range::new(0x40, 0x80)),
    );
    link::attach(&mut db, ParentId::Instrument(instrument), &[offset.into()]).unwrap();
    link::attach(&mut db, ParentId::Channel(channel), &[instrument.into()]).unwrap();

    let run = produce_run(&db, 400, &mut create_rng(77));
    let mut area = None;
    let mut checked = 0;
    for line in run.text.lines().skip(1) {
        let (_, _, effect) = columns(line)[0];
        if let Some(hex) = effect.strip_prefix("SA") {
            area = Some(u32::from_str_radix(hex, 16).unwrap());
        } else if let Some(hex) = effect.strip_prefix('O') {
            let value = u32::from_str_radix(hex, 16).unwrap();
            // The first event plays before any announcement.
            let Some(area) = area else { continue };
            if area == 1 {
                assert!(value >= 0x40, "SA1 O{:02X}", value);
            }
            if area == 3 {
                assert!(value <= 0x80, "SA3 O{:02X}", value);
            }
            checked += 1;
        }
    }
    assert!(checked > 100);
}

#[test]
fn test_seed_reproduces_runs() {
    let mut db = Database::new();
    let mut channel = Channel::default();
    channel.instruments.spacing = Range::new(0, 3);
    channel.effects.spacing = Range::new(1, 5);
    let channel = db.add_channel(channel);
    let instrument = db.add(Scope::Root, Instrument::new(125).unwrap());
    let octave = db.add(Scope::Root, Octave::default());
    let volume = db.add(Scope::Root, Volume::full('v').unwrap());
    let effect = db.add(Scope::Root, Effect::new('S', Range::new(0, 0xFF)).unwrap());
    link::attach(
        &mut db,
        ParentId::Instrument(instrument),
        &[octave.into(), volume.into()],
    )
    .unwrap();
    link::attach(
        &mut db,
        ParentId::Channel(channel),
        &[instrument.into(), effect.into()],
    )
    .unwrap();

    let settings = ProductionSettings { lines: 64, runs: 2 };
    let first = produce(&db, settings, &mut create_rng(2024));
    let second = produce(&db, settings, &mut create_rng(2024));
    assert_eq!(first, second);

    let notes: Vec<&str> = first.runs[0]
        .lines()
        .skip(1)
        .map(|line| columns(line)[0].0)
        .filter(|note| *note != ".....")
        .collect();
    assert!(!notes.is_empty());
    assert!(notes.iter().all(|note| note.ends_with("<5")), "{:?}", notes);
}
