//! Structure kinds stored in a noterand database.
//!
//! Structures are plain data. Forward links (slot members) and back-references
//! (`used_by`) are crate-private so that only [`crate::link`] changes them.

mod channel;
mod command;
mod instrument;
mod octave;
mod range;
mod slot;

pub use channel::Channel;
pub use command::{
    Effect, Offset, RangedCommand, Volume, VolumeUsers, EFFECT_CODES, LIMITED_VOLUME_MAX,
    VOLUME_CODES, VOLUME_MAX,
};
pub use instrument::{Instrument, MAX_INSTRUMENT};
pub use octave::{Octave, PitchClass, MAX_PITCH_INDEX};
pub use range::{Range, MAX_SAMPLE_AREA, MAX_VALUE};
pub use slot::{Slot, SpacedSlot};

use crate::ids::StructureKind;

/// Any one structure, by value.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Structure {
    Channel(Channel),
    Instrument(Instrument),
    Octave(Octave),
    Volume(Volume),
    Effect(Effect),
    Offset(Offset),
}

impl Structure {
    pub fn kind(&self) -> StructureKind {
        match self {
            Structure::Channel(_) => StructureKind::Channel,
            Structure::Instrument(_) => StructureKind::Instrument,
            Structure::Octave(_) => StructureKind::Octave,
            Structure::Volume(_) => StructureKind::Volume,
            Structure::Effect(_) => StructureKind::Effect,
            Structure::Offset(_) => StructureKind::Offset,
        }
    }
}

macro_rules! impl_from_structure {
    ($($kind:ident),*) => {
        $(
            impl From<$kind> for Structure {
                fn from(value: $kind) -> Self {
                    Structure::$kind(value)
                }
            }
        )*
    };
}

impl_from_structure!(Channel, Instrument, Octave, Volume, Effect, Offset);
