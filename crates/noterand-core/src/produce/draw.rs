//! Random selection from slots and rendering of column text.

use rand::Rng;
use rand_pcg::Pcg32;

use crate::database::{Database, PoolMember};
use crate::ids::{EffectId, InstrumentId, VolumeId};
use crate::model::{Effect, Instrument, Octave, Offset, Range, Slot, Volume};

/// One pre-computed instrument event.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Event {
    pub note: Option<String>,
    pub volume: Option<String>,
    /// Offset value text; the sample area is announced separately.
    pub offset: Option<String>,
}

/// The draw pool of a slot: its members in order, then globals of the same
/// kind it does not already list when the slot opts in.
pub fn candidates<T: PoolMember>(db: &Database, slot: &Slot<T::Id>) -> Vec<T::Id> {
    let mut pool = slot.members().to_vec();
    if slot.use_globals {
        for id in db.globals().ids::<T>() {
            if !pool.contains(&id) {
                pool.push(id);
            }
        }
    }
    pool
}

/// Draws one member uniformly. An empty pool draws nothing and leaves the
/// generator untouched.
pub fn pick<'a, T: PoolMember>(
    db: &'a Database,
    slot: &Slot<T::Id>,
    rng: &mut Pcg32,
) -> Option<&'a T> {
    let pool = candidates::<T>(db, slot);
    if pool.is_empty() {
        return None;
    }
    let id = pool[rng.gen_range(0..pool.len())];
    db.get::<T>(id)
}

pub fn draw_value(range: Range, rng: &mut Pcg32) -> u32 {
    rng.gen_range(range.low()..=range.high())
}

/// Volume column text: command letter and a two-digit decimal value.
pub fn render_volume(code: char, value: u32) -> String {
    format!("{}{:02}", code, value)
}

/// Effect column text: command and a two-digit hex value.
pub fn render_effect(code: char, value: u32) -> String {
    format!("{}{:02X}", code, value)
}

pub fn render_offset(value: u32) -> String {
    format!("O{:02X}", value)
}

/// Sample area announcement for the effect column.
pub fn render_sample_area(area: u32) -> String {
    format!("SA{:X}", area)
}

pub fn roll_volume(db: &Database, slot: &Slot<VolumeId>, rng: &mut Pcg32) -> Option<String> {
    let volume = pick::<Volume>(db, slot, rng)?;
    Some(render_volume(volume.code(), draw_value(volume.range(), rng)))
}

pub fn roll_effect(db: &Database, slot: &Slot<EffectId>, rng: &mut Pcg32) -> Option<String> {
    let effect = pick::<Effect>(db, slot, rng)?;
    Some(render_effect(effect.code(), draw_value(effect.range(), rng)))
}

/// Draws a sample area, then a value usable inside it.
///
/// # Returns
/// The sample area and the rendered offset value.
pub fn roll_offset(offset: &Offset, rng: &mut Pcg32) -> (u32, String) {
    let area = draw_value(offset.sample_area(), rng);
    let value = draw_value(offset.values_in_area(area), rng);
    (area, render_offset(value))
}

/// Draws the next instrument event of a channel.
///
/// Draw order: instrument, octave, pitch, volume, volume value, sample area,
/// offset value.
///
/// # Returns
/// The event and the sample area it needs; `current_area` when it needs none.
pub fn roll_event(
    db: &Database,
    instruments: &Slot<InstrumentId>,
    current_area: u32,
    rng: &mut Pcg32,
) -> (Event, u32) {
    let Some(instrument) = pick::<Instrument>(db, instruments, rng) else {
        return (Event::default(), current_area);
    };

    let note = pick::<Octave>(db, &instrument.octaves, rng).and_then(|octave| {
        let classes = octave.pitch_classes();
        if classes.is_empty() {
            return None;
        }
        let pitch = classes[rng.gen_range(0..classes.len())];
        Some(format!("{}{}", octave.note(pitch), instrument.code()))
    });
    let volume = roll_volume(db, &instrument.volumes, rng);

    let (area, offset) = match instrument.offset().and_then(|id| db.get::<Offset>(id)) {
        Some(offset) => {
            let (area, text) = roll_offset(offset, rng);
            (area, Some(text))
        }
        None => (current_area, None),
    };

    (
        Event {
            note,
            volume,
            offset,
        },
        area,
    )
}
