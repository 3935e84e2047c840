//! Typed structure identifiers.
//!
//! Every structure is addressed by an id allocated from one database-wide
//! counter, so ids are unique across the root and globals graphs and two
//! structures with identical field values remain distinguishable.

use serde::{Deserialize, Serialize};
use std::fmt;

/// The six kinds of structure a database can hold.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StructureKind {
    Channel,
    Instrument,
    Octave,
    Volume,
    Effect,
    Offset,
}

impl StructureKind {
    /// Returns all structure kinds in listing order.
    pub fn all() -> &'static [StructureKind] {
        &[
            StructureKind::Channel,
            StructureKind::Instrument,
            StructureKind::Octave,
            StructureKind::Volume,
            StructureKind::Effect,
            StructureKind::Offset,
        ]
    }

    /// Lowercase token used on the command line and in id strings.
    pub fn as_str(&self) -> &'static str {
        match self {
            StructureKind::Channel => "channel",
            StructureKind::Instrument => "instrument",
            StructureKind::Octave => "octave",
            StructureKind::Volume => "volume",
            StructureKind::Effect => "effect",
            StructureKind::Offset => "offset",
        }
    }

    /// Capitalized singular name for human-readable output.
    pub fn name(&self) -> &'static str {
        match self {
            StructureKind::Channel => "Channel",
            StructureKind::Instrument => "Instrument",
            StructureKind::Octave => "Octave",
            StructureKind::Volume => "Volume",
            StructureKind::Effect => "Effect",
            StructureKind::Offset => "Offset",
        }
    }

    /// Capitalized name, pluralized when `count != 1`.
    pub fn counted(&self, count: usize) -> String {
        if count == 1 {
            self.name().to_string()
        } else {
            format!("{}s", self.name())
        }
    }
}

impl fmt::Display for StructureKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl std::str::FromStr for StructureKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "channel" | "channels" | "ch" => Ok(StructureKind::Channel),
            "instrument" | "instruments" | "ins" => Ok(StructureKind::Instrument),
            "octave" | "octaves" | "oct" => Ok(StructureKind::Octave),
            "volume" | "volumes" | "vol" => Ok(StructureKind::Volume),
            "effect" | "effects" | "fx" => Ok(StructureKind::Effect),
            "offset" | "offsets" | "off" => Ok(StructureKind::Offset),
            _ => Err(format!("unknown structure kind: {}", s)),
        }
    }
}

/// Conversion between a typed id and its raw counter value.
pub trait RawId: Copy + Ord {
    fn raw(self) -> u32;
    fn from_raw(raw: u32) -> Self;
}

macro_rules! structure_id {
    ($(#[$doc:meta])* $name:ident => $kind:ident) => {
        $(#[$doc])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
        #[serde(transparent)]
        pub struct $name(pub u32);

        impl RawId for $name {
            fn raw(self) -> u32 {
                self.0
            }

            fn from_raw(raw: u32) -> Self {
                $name(raw)
            }
        }

        impl From<$name> for StructureId {
            fn from(id: $name) -> Self {
                StructureId::$kind(id)
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{}:{}", StructureKind::$kind, self.0)
            }
        }
    };
}

structure_id!(
    /// Identifies a [`crate::model::Channel`].
    ChannelId => Channel
);
structure_id!(
    /// Identifies a [`crate::model::Instrument`].
    InstrumentId => Instrument
);
structure_id!(
    /// Identifies a [`crate::model::Octave`].
    OctaveId => Octave
);
structure_id!(
    /// Identifies a [`crate::model::Volume`].
    VolumeId => Volume
);
structure_id!(
    /// Identifies a [`crate::model::Effect`].
    EffectId => Effect
);
structure_id!(
    /// Identifies a [`crate::model::Offset`].
    OffsetId => Offset
);

/// Any structure id, tagged with its kind.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(tag = "kind", content = "id", rename_all = "snake_case")]
pub enum StructureId {
    Channel(ChannelId),
    Instrument(InstrumentId),
    Octave(OctaveId),
    Volume(VolumeId),
    Effect(EffectId),
    Offset(OffsetId),
}

impl StructureId {
    /// Builds an id of the given kind from a raw counter value.
    pub fn new(kind: StructureKind, raw: u32) -> Self {
        match kind {
            StructureKind::Channel => StructureId::Channel(ChannelId(raw)),
            StructureKind::Instrument => StructureId::Instrument(InstrumentId(raw)),
            StructureKind::Octave => StructureId::Octave(OctaveId(raw)),
            StructureKind::Volume => StructureId::Volume(VolumeId(raw)),
            StructureKind::Effect => StructureId::Effect(EffectId(raw)),
            StructureKind::Offset => StructureId::Offset(OffsetId(raw)),
        }
    }

    pub fn kind(&self) -> StructureKind {
        match self {
            StructureId::Channel(_) => StructureKind::Channel,
            StructureId::Instrument(_) => StructureKind::Instrument,
            StructureId::Octave(_) => StructureKind::Octave,
            StructureId::Volume(_) => StructureKind::Volume,
            StructureId::Effect(_) => StructureKind::Effect,
            StructureId::Offset(_) => StructureKind::Offset,
        }
    }

    pub fn raw(&self) -> u32 {
        match *self {
            StructureId::Channel(id) => id.0,
            StructureId::Instrument(id) => id.0,
            StructureId::Octave(id) => id.0,
            StructureId::Volume(id) => id.0,
            StructureId::Effect(id) => id.0,
            StructureId::Offset(id) => id.0,
        }
    }
}

impl fmt::Display for StructureId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.kind(), self.raw())
    }
}

impl std::str::FromStr for StructureId {
    type Err = String;

    /// Parses `kind:number`, e.g. `channel:3` or `ins:12`.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (kind, raw) = s
            .split_once(':')
            .ok_or_else(|| format!("expected kind:number, got: {}", s))?;
        let kind: StructureKind = kind.trim().parse()?;
        let raw: u32 = raw
            .trim()
            .parse()
            .map_err(|_| format!("invalid structure number: {}", raw))?;
        Ok(StructureId::new(kind, raw))
    }
}

/// A structure that owns slots other structures can be attached to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ParentId {
    Channel(ChannelId),
    Instrument(InstrumentId),
}

impl ParentId {
    pub fn kind(&self) -> StructureKind {
        match self {
            ParentId::Channel(_) => StructureKind::Channel,
            ParentId::Instrument(_) => StructureKind::Instrument,
        }
    }
}

impl From<ParentId> for StructureId {
    fn from(id: ParentId) -> Self {
        match id {
            ParentId::Channel(id) => StructureId::Channel(id),
            ParentId::Instrument(id) => StructureId::Instrument(id),
        }
    }
}

impl TryFrom<StructureId> for ParentId {
    type Error = StructureKind;

    fn try_from(id: StructureId) -> Result<Self, Self::Error> {
        match id {
            StructureId::Channel(id) => Ok(ParentId::Channel(id)),
            StructureId::Instrument(id) => Ok(ParentId::Instrument(id)),
            other => Err(other.kind()),
        }
    }
}

impl fmt::Display for ParentId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        StructureId::from(*self).fmt(f)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_structure_id() {
        assert_eq!(
            "channel:3".parse::<StructureId>(),
            Ok(StructureId::Channel(ChannelId(3)))
        );
        assert_eq!(
            "ins:12".parse::<StructureId>(),
            Ok(StructureId::Instrument(InstrumentId(12)))
        );
        assert_eq!(
            "Volumes: 7".parse::<StructureId>(),
            Ok(StructureId::Volume(VolumeId(7)))
        );
    }

    #[test]
    fn test_parse_structure_id_rejects_garbage() {
        assert!("channel".parse::<StructureId>().is_err());
        assert!("widget:1".parse::<StructureId>().is_err());
        assert!("octave:x".parse::<StructureId>().is_err());
    }

    #[test]
    fn test_display_round_trips() {
        for kind in StructureKind::all() {
            let id = StructureId::new(*kind, 9);
            assert_eq!(id.to_string().parse::<StructureId>(), Ok(id));
        }
    }

    #[test]
    fn test_parent_conversion() {
        let id = StructureId::Instrument(InstrumentId(4));
        assert_eq!(ParentId::try_from(id), Ok(ParentId::Instrument(InstrumentId(4))));
        assert_eq!(
            ParentId::try_from(StructureId::Octave(OctaveId(1))),
            Err(StructureKind::Octave)
        );
    }

    #[test]
    fn test_counted_names() {
        assert_eq!(StructureKind::Effect.counted(1), "Effect");
        assert_eq!(StructureKind::Effect.counted(0), "Effects");
        assert_eq!(StructureKind::Volume.counted(3), "Volumes");
    }
}
