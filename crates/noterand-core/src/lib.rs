//! noterand Core - Linked Structure Database and Tracker Pattern Production
//!
//! This crate holds a user-curated database of reusable musical building blocks
//! (channels, instruments, octaves, volume commands, effects and sample offsets),
//! keeps the links between them consistent in both directions, and turns the
//! linked graph into randomized OpenMPT pattern text.
//!
//! # Determinism
//!
//! Production consumes a single PCG32 generator in a fixed traversal order
//! (instrument, octave, volume, offset, per channel per line). Given the same
//! database and seed, the produced text is identical.
//!
//! # Example
//!
//! ```
//! use noterand_core::model::{Channel, Instrument, Octave, PitchClass};
//! use noterand_core::produce::{create_rng, produce_run};
//! use noterand_core::{link, Database, ParentId, Scope};
//!
//! let mut db = Database::new();
//! let octave = db.add(Scope::Root, Octave::new(5, vec![PitchClass::C]).unwrap());
//! let instrument = db.add(Scope::Root, Instrument::new(1).unwrap());
//! let channel = db.add_channel(Channel::default());
//!
//! link::attach(&mut db, ParentId::Instrument(instrument), &[octave.into()]).unwrap();
//! link::attach(&mut db, ParentId::Channel(channel), &[instrument.into()]).unwrap();
//!
//! let run = produce_run(&db, 4, &mut create_rng(42));
//! assert!(run.text.starts_with("ModPlug Tracker  IT\n"));
//! ```
//!
//! # Module Structure
//!
//! - [`ids`]: Typed structure identifiers and the closed kind enumeration
//! - [`model`]: The six structure kinds and their shared value shapes
//! - [`link`]: Bidirectional link maintenance
//! - [`database`]: Root and globals graphs, merge, move and copy
//! - [`persist`]: Hashed JSON save/load
//! - [`summary`]: Human-readable descriptions for listings
//! - [`produce`]: The per-channel line generator

pub mod database;
pub mod error;
pub mod ids;
pub mod link;
pub mod model;
pub mod persist;
pub mod produce;
pub mod summary;

pub use database::{Database, MergeMode, Pool, Scope};
pub use error::{DatabaseError, LinkError, ModelError, PersistError};
pub use ids::{
    ChannelId, EffectId, InstrumentId, OctaveId, OffsetId, ParentId, StructureId, StructureKind,
    VolumeId,
};

/// Crate version for reports.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_version() {
        assert!(!VERSION.is_empty());
    }
}
