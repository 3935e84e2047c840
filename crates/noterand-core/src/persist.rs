//! Hashed JSON save and load.
//!
//! A database file is an envelope around the serialized [`Database`]:
//!
//! ```text
//! { "format": "noterand-db", "version": 1, "hash": "<blake3 hex>", "database": { ... } }
//! ```
//!
//! The hash is `hex(BLAKE3(canonical_json(database)))`, where the canonical
//! form has sorted object keys and no whitespace. Loading verifies the format
//! tag, the version, the hash, link symmetry and every stored value's domain
//! before handing the database back, so a caller never merges a half-valid
//! file.

use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

use crate::database::{Database, MergeMode, Pool, PoolMember, Scope};
use crate::error::{ModelError, PersistError};
use crate::ids::StructureId;
use crate::link;
use crate::model::{Effect, Instrument, Octave, Offset, Volume};

/// Format tag written into every envelope.
pub const FORMAT: &str = "noterand-db";

/// Envelope version this build writes and reads.
pub const FORMAT_VERSION: u32 = 1;

#[derive(Debug, Serialize, Deserialize)]
struct Envelope<D> {
    format: String,
    version: u32,
    hash: String,
    database: D,
}

/// Computes the canonical BLAKE3 hash of a database.
///
/// # Returns
/// * A 64-character lowercase hexadecimal string
pub fn database_hash(db: &Database) -> Result<String, PersistError> {
    let value = serde_json::to_value(db)?;
    Ok(value_hash(&value))
}

/// Hashes a JSON value in canonical form. `serde_json::Value` objects are
/// ordered maps, so compact serialization already sorts keys.
fn value_hash(value: &serde_json::Value) -> String {
    let canonical = value.to_string();
    blake3::hash(canonical.as_bytes()).to_hex().to_string()
}

/// Serializes a database into its pretty-printed envelope.
pub fn to_json(db: &Database) -> Result<String, PersistError> {
    let database = serde_json::to_value(db)?;
    let envelope = Envelope {
        format: FORMAT.to_string(),
        version: FORMAT_VERSION,
        hash: value_hash(&database),
        database,
    };
    Ok(serde_json::to_string_pretty(&envelope)?)
}

/// Parses and verifies an envelope.
pub fn from_json(text: &str) -> Result<Database, PersistError> {
    let raw: Envelope<serde_json::Value> = serde_json::from_str(text)?;
    if raw.format != FORMAT {
        return Err(PersistError::Format(raw.format));
    }
    if raw.version != FORMAT_VERSION {
        return Err(PersistError::Version(raw.version));
    }
    let actual = value_hash(&raw.database);
    if actual != raw.hash {
        return Err(PersistError::HashMismatch {
            expected: raw.hash,
            actual,
        });
    }

    // Typed structures are read from the text itself; integer map keys do
    // not survive a detour through `Value`.
    let envelope: Envelope<Database> = serde_json::from_str(text)?;
    let problems = link::check(&envelope.database);
    if !problems.is_empty() {
        return Err(PersistError::BrokenLinks(problems));
    }
    let problems = domain_problems(&envelope.database);
    if !problems.is_empty() {
        return Err(PersistError::OutOfDomain(problems));
    }
    Ok(envelope.database)
}

/// Lists every stored structure whose values fall outside their domain.
fn domain_problems(db: &Database) -> Vec<String> {
    let mut problems = Vec::new();
    for pool in [db.pool(Scope::Root), db.globals()] {
        check_kind::<Instrument>(&mut problems, pool, Instrument::validate);
        check_kind::<Octave>(&mut problems, pool, Octave::validate);
        check_kind::<Volume>(&mut problems, pool, Volume::validate);
        check_kind::<Effect>(&mut problems, pool, Effect::validate);
        check_kind::<Offset>(&mut problems, pool, Offset::validate);
    }
    problems
}

fn check_kind<T: PoolMember>(
    problems: &mut Vec<String>,
    pool: &Pool,
    validate: fn(&T) -> Result<(), ModelError>,
) {
    for (id, item) in pool.iter::<T>() {
        if let Err(err) = validate(item) {
            problems.push(format!("{}: {}", Into::<StructureId>::into(id), err));
        }
    }
}

/// Writes a database file.
pub fn save(db: &Database, path: impl AsRef<Path>) -> Result<(), PersistError> {
    let json = to_json(db)?;
    fs::write(path, json)?;
    Ok(())
}

/// Reads and verifies a database file.
pub fn load(path: impl AsRef<Path>) -> Result<Database, PersistError> {
    let text = fs::read_to_string(path)?;
    from_json(&text)
}

impl Database {
    /// Loads a database file and merges it into this one.
    ///
    /// This database is untouched when loading fails.
    pub fn load_merge(
        &mut self,
        path: impl AsRef<Path>,
        mode: MergeMode,
    ) -> Result<(), PersistError> {
        let loaded = load(path)?;
        self.merge(loaded, mode);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::database::Scope;
    use crate::ids::ParentId;
    use crate::model::{Channel, PitchClass, Range};
    use pretty_assertions::assert_eq;

    fn sample() -> Database {
        let mut db = Database::new();
        let channel = db.add_channel(Channel::default());
        let effect = db.add(Scope::Globals, Effect::new('S', Range::new(0x10, 0x1F)).unwrap());
        link::attach(&mut db, ParentId::Channel(channel), &[effect.into()]).unwrap();
        db
    }

    #[test]
    fn test_json_round_trip() {
        let db = sample();
        let json = to_json(&db).unwrap();
        assert!(json.contains("\"format\": \"noterand-db\""));
        assert_eq!(from_json(&json).unwrap(), db);
    }

    #[test]
    fn test_hash_is_stable() {
        let db = sample();
        let hash = database_hash(&db).unwrap();
        assert_eq!(hash.len(), 64);
        assert_eq!(hash, database_hash(&db.clone()).unwrap());
        assert_ne!(hash, database_hash(&Database::new()).unwrap());
    }

    #[test]
    fn test_rejects_wrong_format_and_version() {
        let json = to_json(&sample()).unwrap();

        let other = json.replace("noterand-db", "something-else");
        assert!(matches!(from_json(&other), Err(PersistError::Format(f)) if f == "something-else"));

        let newer = json.replace("\"version\": 1", "\"version\": 2");
        assert!(matches!(from_json(&newer), Err(PersistError::Version(2))));
    }

    #[test]
    fn test_rejects_tampered_database() {
        let json = to_json(&sample()).unwrap();
        let tampered = json.replace("\"muted\": false", "\"muted\": true");
        assert_ne!(json, tampered);
        assert!(matches!(
            from_json(&tampered),
            Err(PersistError::HashMismatch { .. })
        ));
    }

    /// Re-seals an edited database so only the domain checks can catch it.
    fn resealed(json: &str, from: &str, to: &str) -> String {
        let mut envelope: serde_json::Value = serde_json::from_str(json).unwrap();
        let edited = envelope["database"].to_string().replace(from, to);
        assert_ne!(edited, envelope["database"].to_string());
        envelope["database"] = serde_json::from_str(&edited).unwrap();
        envelope["hash"] = value_hash(&envelope["database"]).into();
        envelope.to_string()
    }

    #[test]
    fn test_rejects_out_of_range_values() {
        let mut db = Database::new();
        let offset = db.add(Scope::Root, Offset::new(Range::single(2), Range::new(0, 0x40)));
        let json = to_json(&db).unwrap();

        let wide = resealed(&json, "\"sample_area\":[2,2]", "\"sample_area\":[26,26]");
        match from_json(&wide) {
            Err(PersistError::OutOfDomain(problems)) => {
                assert_eq!(problems.len(), 1);
                assert!(problems[0].starts_with(&StructureId::from(offset).to_string()));
                assert!(problems[0].contains("exceeds 15"), "{}", problems[0]);
            }
            other => panic!("expected an out-of-range error, got {:?}", other),
        }
    }

    #[test]
    fn test_rejects_instrument_zero_and_high_pitch() {
        let mut db = Database::new();
        db.add(Scope::Globals, Instrument::new(7).unwrap());
        db.add(Scope::Root, Octave::new(4, vec![PitchClass::C]).unwrap());
        let json = to_json(&db).unwrap();

        let zero = resealed(&json, "\"number\":7", "\"number\":0");
        assert!(matches!(from_json(&zero), Err(PersistError::OutOfDomain(_))));

        let high = resealed(&json, "\"pitch_index\":4", "\"pitch_index\":12");
        let err = from_json(&high).unwrap_err();
        assert_eq!(err.code(), "PERSIST_007");
    }

    #[test]
    fn test_rejects_garbage() {
        assert!(matches!(from_json("not json"), Err(PersistError::Json(_))));
    }

    #[test]
    fn test_load_missing_file_leaves_database_alone() {
        let mut db = sample();
        let before = db.clone();
        let result = db.load_merge("/nonexistent/noterand-db.json", MergeMode::Replace);
        assert!(matches!(result, Err(PersistError::Io(_))));
        assert_eq!(db, before);
    }
}
