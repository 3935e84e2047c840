//! Human-readable one-line descriptions for listings.

use crate::database::{Database, Scope};
use crate::ids::StructureId;
use crate::model::{Channel, Effect, Instrument, Octave, Offset, Range, Slot, Volume};

/// Default number of entries per listing page.
pub const PAGE_LENGTH: usize = 10;

/// Describes one structure, or `None` if the id is unknown.
pub fn summary(db: &Database, id: StructureId) -> Option<String> {
    let text = match id {
        StructureId::Channel(id) => channel_summary(db.channel(id)?),
        StructureId::Instrument(id) => instrument_summary(db.get::<Instrument>(id)?),
        StructureId::Octave(id) => octave_summary(db.get::<Octave>(id)?),
        StructureId::Volume(id) => volume_summary(db.get::<Volume>(id)?),
        StructureId::Effect(id) => effect_summary(db.get::<Effect>(id)?),
        StructureId::Offset(id) => offset_summary(db.get::<Offset>(id)?),
    };
    let marker = match db.scope_of(id)? {
        Scope::Root => "",
        Scope::Globals => "[global] ",
    };
    Some(format!("{}{}", marker, text))
}

fn counted(count: usize, noun: &str) -> String {
    format!("{} {}{}", count, noun, if count == 1 { "" } else { "s" })
}

fn slot_count<Id: Copy + PartialEq>(slot: &Slot<Id>, noun: &str) -> String {
    let globals = if slot.use_globals { " (G)" } else { "" };
    format!("{}{}", counted(slot.len(), noun), globals)
}

fn usage(count: usize, noun: &str) -> String {
    if count == 0 {
        "Not in use.".to_string()
    } else {
        format!("Used by {}.", counted(count, noun))
    }
}

fn channel_summary(channel: &Channel) -> String {
    format!(
        "Uses {} at {}, {} at {}, and {} at {}. {} {}",
        slot_count(&channel.instruments.pool, "Instrument"),
        channel.instruments.spacing,
        slot_count(&channel.volumes.pool, "Volume"),
        channel.volumes.spacing,
        slot_count(&channel.effects.pool, "Effect"),
        channel.effects.spacing,
        if channel.overwrite {
            "Overwriting."
        } else {
            "Preserving."
        },
        if channel.muted { "Muted." } else { "In use." },
    )
}

fn instrument_summary(instrument: &Instrument) -> String {
    format!(
        "Instrument #{} ({}). Uses {}, {}, and {}. {}",
        instrument.number(),
        instrument.code(),
        slot_count(&instrument.octaves, "Octave"),
        slot_count(&instrument.volumes, "Volume"),
        match instrument.offset() {
            Some(offset) => format!("Offset {}", offset),
            None => "no Offset".to_string(),
        },
        usage(instrument.used_by().len(), "Channel"),
    )
}

fn octave_summary(octave: &Octave) -> String {
    let pitches = if octave.is_full() {
        "It uses the full octave.".to_string()
    } else {
        let labels: Vec<&str> = octave.pitch_classes().iter().map(|p| p.label()).collect();
        format!("It is limited to {}.", labels.join(" "))
    };
    format!(
        "Pitch {}. {} {}",
        octave.pitch_index(),
        pitches,
        usage(octave.used_by().len(), "Instrument")
    )
}

fn value_range(range: Range, hex: bool) -> String {
    let show = |value: u32| {
        if hex {
            format!("{:X}", value)
        } else {
            value.to_string()
        }
    };
    if range.is_single() {
        format!("The value is always {}.", show(range.low()))
    } else {
        format!(
            "The value range is {} to {}.",
            show(range.low()),
            show(range.high())
        )
    }
}

fn volume_summary(volume: &Volume) -> String {
    format!(
        "Volume Control {}. {} Used by {}, and {}.",
        volume.code(),
        value_range(volume.range(), false),
        counted(volume.used_by().channels().len(), "Channel"),
        counted(volume.used_by().instruments().len(), "Instrument"),
    )
}

fn effect_summary(effect: &Effect) -> String {
    format!(
        "Effect {}. {} {}",
        effect.code(),
        value_range(effect.range(), true),
        usage(effect.used_by().len(), "Channel"),
    )
}

/// Describes the reachable offset values of an Offset.
pub fn offset_range_text(offset: &Offset) -> String {
    let sa = offset.sample_area();
    let values = offset.values();
    if sa.is_single() {
        let values = if values.is_single() {
            format!("The Offset Value is always {:02X}.", values.low())
        } else {
            format!(
                "The Offset range is {:02X} to {:02X}.",
                values.low(),
                values.high()
            )
        };
        format!("The Sample Area is always {:X}. {}", sa.low(), values)
    } else {
        format!(
            "The Offset range is SA{:X}-O{:02X} to SA{:X}-O{:02X}.",
            sa.low(),
            values.low(),
            sa.high(),
            values.high()
        )
    }
}

fn offset_summary(offset: &Offset) -> String {
    format!(
        "{} {}",
        offset_range_text(offset),
        usage(offset.used_by().len(), "Instrument")
    )
}

/// Splits a listing into pages of `page_length` entries.
///
/// There is always at least one page, possibly empty.
pub fn paginate<T: Clone>(items: &[T], page_length: usize) -> Vec<Vec<T>> {
    if items.is_empty() || page_length == 0 {
        return vec![items.to_vec()];
    }
    items.chunks(page_length).map(|page| page.to_vec()).collect()
}
