//! Structure fields given on the command line.
//!
//! `add` builds a new structure from [`FieldArgs`]; `edit` applies the same
//! arguments to an existing one. A field that does not belong to the
//! structure's kind is an error rather than silently ignored.

use anyhow::{anyhow, bail, Result};
use noterand_core::model::{
    Channel, Effect, Instrument, Octave, Offset, PitchClass, Range, Structure, Volume, MAX_VALUE,
};
use noterand_core::{Database, StructureId, StructureKind};

use crate::cli_args::FieldArgs;

/// Flags accepted for each kind, as spelled on the command line.
fn accepted(kind: StructureKind) -> &'static [&'static str] {
    match kind {
        StructureKind::Channel => &[
            "instrument-spacing",
            "volume-spacing",
            "effect-spacing",
            "instrument-globals",
            "volume-globals",
            "effect-globals",
            "overwrite",
            "muted",
        ],
        StructureKind::Instrument => &["number", "octave-globals", "volume-globals"],
        StructureKind::Octave => &["pitch", "pitches"],
        StructureKind::Volume | StructureKind::Effect => &["code", "range"],
        StructureKind::Offset => &["sample-area", "range"],
    }
}

impl FieldArgs {
    /// Flags that were given, in declaration order.
    pub fn given(&self) -> Vec<&'static str> {
        let flags = [
            ("number", self.number.is_some()),
            ("pitch", self.pitch.is_some()),
            ("pitches", self.pitches.is_some()),
            ("code", self.code.is_some()),
            ("range", self.range.is_some()),
            ("sample-area", self.sample_area.is_some()),
            ("instrument-spacing", self.instrument_spacing.is_some()),
            ("volume-spacing", self.volume_spacing.is_some()),
            ("effect-spacing", self.effect_spacing.is_some()),
            ("instrument-globals", self.instrument_globals.is_some()),
            ("octave-globals", self.octave_globals.is_some()),
            ("volume-globals", self.volume_globals.is_some()),
            ("effect-globals", self.effect_globals.is_some()),
            ("overwrite", self.overwrite.is_some()),
            ("muted", self.muted.is_some()),
        ];
        flags
            .into_iter()
            .filter_map(|(flag, given)| given.then_some(flag))
            .collect()
    }

    fn check_kind(&self, kind: StructureKind) -> Result<()> {
        let accepted = accepted(kind);
        if let Some(flag) = self.given().into_iter().find(|f| !accepted.contains(f)) {
            bail!(
                "--{} does not apply to {}; use {}",
                flag,
                kind.counted(2),
                accepted
                    .iter()
                    .map(|f| format!("--{}", f))
                    .collect::<Vec<_>>()
                    .join(", ")
            );
        }
        Ok(())
    }

    fn pitch_classes(&self) -> Result<Option<Vec<PitchClass>>> {
        let Some(labels) = &self.pitches else {
            return Ok(None);
        };
        let pitches = labels
            .iter()
            .map(|label| label.parse::<PitchClass>())
            .collect::<Result<Vec<_>, _>>()?;
        Ok(Some(pitches))
    }
}

/// Builds a new structure of `kind`, unset fields taking their defaults.
pub fn build(kind: StructureKind, fields: &FieldArgs) -> Result<Structure> {
    fields.check_kind(kind)?;
    Ok(match kind {
        StructureKind::Channel => {
            let mut channel = Channel::default();
            apply_channel(&mut channel, fields);
            Structure::Channel(channel)
        }
        StructureKind::Instrument => {
            let mut instrument = Instrument::new(fields.number.unwrap_or(1))?;
            apply_instrument(&mut instrument, fields)?;
            Structure::Instrument(instrument)
        }
        StructureKind::Octave => {
            let mut octave = Octave::default();
            apply_octave(&mut octave, fields)?;
            Structure::Octave(octave)
        }
        StructureKind::Volume => {
            let mut volume = Volume::full(fields.code.unwrap_or('v'))?;
            apply_volume(&mut volume, fields)?;
            Structure::Volume(volume)
        }
        StructureKind::Effect => {
            let mut effect = Effect::new(fields.code.unwrap_or('A'), Range::new(0, MAX_VALUE))?;
            apply_effect(&mut effect, fields)?;
            Structure::Effect(effect)
        }
        StructureKind::Offset => {
            let mut offset = Offset::default();
            apply_offset(&mut offset, fields);
            Structure::Offset(offset)
        }
    })
}

/// Applies the given fields to an existing structure.
///
/// Nothing changes unless every field is valid.
pub fn apply(db: &mut Database, id: StructureId, fields: &FieldArgs) -> Result<()> {
    fields.check_kind(id.kind())?;
    let missing = || anyhow!("No such structure: {}", id);
    match id {
        StructureId::Channel(id) => apply_channel(db.channel_mut(id).ok_or_else(missing)?, fields),
        StructureId::Instrument(id) => {
            let mut edited = db.get::<Instrument>(id).ok_or_else(missing)?.clone();
            apply_instrument(&mut edited, fields)?;
            *db.get_mut::<Instrument>(id).ok_or_else(missing)? = edited;
        }
        StructureId::Octave(id) => {
            let mut edited = db.get::<Octave>(id).ok_or_else(missing)?.clone();
            apply_octave(&mut edited, fields)?;
            *db.get_mut::<Octave>(id).ok_or_else(missing)? = edited;
        }
        StructureId::Volume(id) => {
            let mut edited = db.get::<Volume>(id).ok_or_else(missing)?.clone();
            apply_volume(&mut edited, fields)?;
            *db.get_mut::<Volume>(id).ok_or_else(missing)? = edited;
        }
        StructureId::Effect(id) => {
            let mut edited = db.get::<Effect>(id).ok_or_else(missing)?.clone();
            apply_effect(&mut edited, fields)?;
            *db.get_mut::<Effect>(id).ok_or_else(missing)? = edited;
        }
        StructureId::Offset(id) => {
            apply_offset(db.get_mut::<Offset>(id).ok_or_else(missing)?, fields)
        }
    }
    Ok(())
}

fn apply_channel(channel: &mut Channel, fields: &FieldArgs) {
    if let Some(spacing) = fields.instrument_spacing {
        channel.instruments.spacing = spacing;
    }
    if let Some(spacing) = fields.volume_spacing {
        channel.volumes.spacing = spacing;
    }
    if let Some(spacing) = fields.effect_spacing {
        channel.effects.spacing = spacing;
    }
    if let Some(globals) = fields.instrument_globals {
        channel.instruments.pool.use_globals = globals;
    }
    if let Some(globals) = fields.volume_globals {
        channel.volumes.pool.use_globals = globals;
    }
    if let Some(globals) = fields.effect_globals {
        channel.effects.pool.use_globals = globals;
    }
    if let Some(overwrite) = fields.overwrite {
        channel.overwrite = overwrite;
    }
    if let Some(muted) = fields.muted {
        channel.muted = muted;
    }
}

fn apply_instrument(instrument: &mut Instrument, fields: &FieldArgs) -> Result<()> {
    if let Some(number) = fields.number {
        instrument.set_number(number)?;
    }
    if let Some(globals) = fields.octave_globals {
        instrument.octaves.use_globals = globals;
    }
    if let Some(globals) = fields.volume_globals {
        instrument.volumes.use_globals = globals;
    }
    Ok(())
}

fn apply_octave(octave: &mut Octave, fields: &FieldArgs) -> Result<()> {
    if let Some(pitch) = fields.pitch {
        octave.set_pitch_index(pitch)?;
    }
    if let Some(pitches) = fields.pitch_classes()? {
        octave.set_pitch_classes(pitches)?;
    }
    Ok(())
}

fn apply_volume(volume: &mut Volume, fields: &FieldArgs) -> Result<()> {
    if let Some(code) = fields.code {
        volume.set_code(code)?;
    }
    if let Some(range) = fields.range {
        volume.set_range(range);
    }
    Ok(())
}

fn apply_effect(effect: &mut Effect, fields: &FieldArgs) -> Result<()> {
    if let Some(code) = fields.code {
        effect.set_code(code)?;
    }
    if let Some(range) = fields.range {
        effect.set_range(range);
    }
    Ok(())
}

fn apply_offset(offset: &mut Offset, fields: &FieldArgs) {
    if let Some(sample_area) = fields.sample_area {
        offset.set_sample_area(sample_area);
    }
    if let Some(values) = fields.range {
        offset.set_values(values);
    }
}
