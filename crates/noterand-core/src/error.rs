//! Error types for structure construction, linking, database edits and persistence.

use thiserror::Error;

use crate::database::Scope;
use crate::ids::{StructureId, StructureKind};

/// A structure field was given a value outside its domain.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ModelError {
    /// Instrument numbers are 1-255.
    #[error("Instrument number must be within 1 and 255, got {0}")]
    InstrumentNumber(u32),

    /// Octave pitch indices are 0-9.
    #[error("Octave pitch must be within 0 and 9, got {0}")]
    PitchIndex(u32),

    /// Pitch label is not one of the 12 chromatic labels.
    #[error("Unknown pitch label: {0:?}")]
    PitchLabel(String),

    /// An octave must keep at least one pitch class.
    #[error("An Octave needs at least one pitch")]
    NoPitchClasses,

    /// Volume column commands are `v p a b c d e f g h`.
    #[error("Invalid Volume command: {0:?}")]
    VolumeCode(char),

    /// Effect column commands are `#`, `\` and `A`-`Z`.
    #[error("Invalid Effect command: {0:?}")]
    EffectCode(char),

    /// A stored range reaches past what its field accepts.
    #[error("{field} range {low}-{high} exceeds {max}")]
    OutOfRange {
        field: &'static str,
        low: u32,
        high: u32,
        max: u32,
    },
}

impl ModelError {
    pub fn code(&self) -> &'static str {
        match self {
            ModelError::InstrumentNumber(_) => "MODEL_001",
            ModelError::PitchIndex(_) => "MODEL_002",
            ModelError::PitchLabel(_) => "MODEL_003",
            ModelError::NoPitchClasses => "MODEL_004",
            ModelError::VolumeCode(_) => "MODEL_005",
            ModelError::EffectCode(_) => "MODEL_006",
            ModelError::OutOfRange { .. } => "MODEL_007",
        }
    }
}

/// A link operation was asked to do something the graph cannot express.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum LinkError {
    /// The child kind has no slot on the parent kind.
    #[error("Cannot attach {child} to {parent}")]
    Incompatible {
        parent: StructureKind,
        child: StructureKind,
    },

    /// Only Channels and Instruments have slots.
    #[error("Nothing can be attached to {0}")]
    NotAParent(StructureKind),

    /// The id does not exist in either graph.
    #[error("No such structure: {0}")]
    Unknown(StructureId),
}

impl LinkError {
    pub fn code(&self) -> &'static str {
        match self {
            LinkError::Incompatible { .. } => "LINK_001",
            LinkError::NotAParent(_) => "LINK_002",
            LinkError::Unknown(_) => "LINK_003",
        }
    }
}

/// A database edit could not be applied.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DatabaseError {
    /// The id does not exist in the requested graph.
    #[error("No {scope} structure {id}")]
    NotInScope { id: StructureId, scope: Scope },

    /// The id does not exist in either graph.
    #[error("No such structure: {0}")]
    Unknown(StructureId),

    /// The globals graph never holds Channels.
    #[error("Channels can only live in the root database")]
    GlobalChannel,

    #[error(transparent)]
    Link(#[from] LinkError),

    #[error(transparent)]
    Model(#[from] ModelError),
}

impl DatabaseError {
    pub fn code(&self) -> &'static str {
        match self {
            DatabaseError::NotInScope { .. } => "DB_001",
            DatabaseError::Unknown(_) => "DB_002",
            DatabaseError::GlobalChannel => "DB_003",
            DatabaseError::Link(err) => err.code(),
            DatabaseError::Model(err) => err.code(),
        }
    }
}

/// Saving or loading a database file failed.
#[derive(Debug, Error)]
pub enum PersistError {
    /// IO error reading or writing the file.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// The file is not valid JSON for a database envelope.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// The envelope format tag is not ours.
    #[error("Not a noterand database (format {0:?})")]
    Format(String),

    /// The envelope version is newer than this build understands.
    #[error("Unsupported database version {0}")]
    Version(u32),

    /// The stored hash does not match the stored database.
    #[error("Database hash mismatch: expected {expected}, found {actual}")]
    HashMismatch { expected: String, actual: String },

    /// The stored links are not symmetric.
    #[error("Database links are inconsistent: {}", .0.join("; "))]
    BrokenLinks(Vec<String>),

    /// Stored structures hold values no constructor would accept.
    #[error("Database values are out of range: {}", .0.join("; "))]
    OutOfDomain(Vec<String>),
}

impl PersistError {
    pub fn code(&self) -> &'static str {
        match self {
            PersistError::Io(_) => "PERSIST_001",
            PersistError::Json(_) => "PERSIST_002",
            PersistError::Format(_) => "PERSIST_003",
            PersistError::Version(_) => "PERSIST_004",
            PersistError::HashMismatch { .. } => "PERSIST_005",
            PersistError::BrokenLinks(_) => "PERSIST_006",
            PersistError::OutOfDomain(_) => "PERSIST_007",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ids::ChannelId;

    #[test]
    fn test_error_codes_are_stable() {
        assert_eq!(ModelError::NoPitchClasses.code(), "MODEL_004");
        assert_eq!(
            DatabaseError::from(LinkError::Unknown(ChannelId(1).into())).code(),
            "LINK_003"
        );
        assert_eq!(PersistError::Version(9).code(), "PERSIST_004");
    }

    #[test]
    fn test_incompatible_message() {
        let err = LinkError::Incompatible {
            parent: StructureKind::Channel,
            child: StructureKind::Octave,
        };
        assert_eq!(err.to_string(), "Cannot attach octave to channel");
    }
}
