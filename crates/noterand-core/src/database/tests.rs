//! Tests for the two-graph database.

use super::*;
use crate::error::LinkError;
use crate::ids::ParentId;
use crate::model::{PitchClass, Range};
use pretty_assertions::assert_eq;

fn linked_pair(db: &mut Database) -> (ChannelId, InstrumentId, OctaveId) {
    let channel = db.add_channel(Channel::default());
    let instrument = db.add(Scope::Root, Instrument::new(12).unwrap());
    let octave = db.add(Scope::Globals, Octave::new(3, vec![PitchClass::E]).unwrap());
    link::attach(db, ParentId::Channel(channel), &[instrument.into()]).unwrap();
    link::attach(db, ParentId::Instrument(instrument), &[octave.into()]).unwrap();
    (channel, instrument, octave)
}

#[test]
fn test_ids_are_unique_across_graphs() {
    let mut db = Database::new();
    let a = db.add(Scope::Root, Volume::full('v').unwrap());
    let b = db.add(Scope::Globals, Volume::full('p').unwrap());
    let c = db.add_channel(Channel::default());
    assert_eq!((a.0, b.0, c.0), (1, 2, 3));
    assert_eq!(db.last_id(), 3);
    assert_eq!(db.scope_of(a.into()), Some(Scope::Root));
    assert_eq!(db.scope_of(b.into()), Some(Scope::Globals));
    assert!(db.get::<Volume>(b).is_some());
}

#[test]
fn test_add_drops_carried_links() {
    let mut db = Database::new();
    let (_, instrument, _) = linked_pair(&mut db);
    let copy = db.get::<Instrument>(instrument).unwrap().clone();
    let id = db.add(Scope::Root, copy);
    let stored = db.get::<Instrument>(id).unwrap();
    assert!(stored.octaves.is_empty());
    assert!(stored.used_by().is_empty());
    assert!(link::check(&db).is_empty());
}

#[test]
fn test_list_in_insertion_order() {
    let mut db = Database::new();
    let first = db.add(Scope::Root, Effect::new('A', Range::default()).unwrap());
    db.add(Scope::Globals, Effect::new('B', Range::default()).unwrap());
    let third = db.add(Scope::Root, Effect::new('C', Range::default()).unwrap());
    assert_eq!(
        db.list(Scope::Root, StructureKind::Effect),
        vec![StructureId::from(first), third.into()]
    );
    assert_eq!(db.list(Scope::Globals, StructureKind::Channel), vec![]);
}

#[test]
fn test_pool_iter_pairs_ids_with_members() {
    let mut db = Database::new();
    let first = db.add(Scope::Globals, Effect::new('A', Range::default()).unwrap());
    let second = db.add(Scope::Globals, Effect::new('S', Range::default()).unwrap());
    let codes: Vec<(EffectId, char)> = db
        .globals()
        .iter::<Effect>()
        .map(|(id, effect)| (id, effect.code()))
        .collect();
    assert_eq!(codes, vec![(first, 'A'), (second, 'S')]);
    assert_eq!(db.pool(Scope::Root).iter::<Effect>().count(), 0);
}

#[test]
fn test_insert_refuses_global_channel() {
    let mut db = Database::new();
    let result = db.insert(Scope::Globals, Structure::Channel(Channel::default()));
    assert_eq!(result, Err(DatabaseError::GlobalChannel));
    assert!(db.is_empty());
    assert_eq!(db.last_id(), 0);
}

#[test]
fn test_remove_detaches_everything() {
    let mut db = Database::new();
    let (channel, instrument, octave) = linked_pair(&mut db);

    let removed = db.remove(Scope::Root, instrument.into()).unwrap();
    assert_eq!(removed.kind(), StructureKind::Instrument);
    assert!(db.channel(channel).unwrap().instruments.pool.is_empty());
    assert!(db.get::<Octave>(octave).unwrap().used_by().is_empty());
    assert!(link::check(&db).is_empty());
}

#[test]
fn test_remove_checks_scope() {
    let mut db = Database::new();
    let (_, _, octave) = linked_pair(&mut db);
    assert_eq!(
        db.remove(Scope::Root, octave.into()),
        Err(DatabaseError::NotInScope {
            id: octave.into(),
            scope: Scope::Root,
        })
    );
    assert!(db.get::<Octave>(octave).is_some());
    assert!(db.remove(Scope::Globals, octave.into()).is_ok());
}

#[test]
fn test_move_keeps_id_and_links() {
    let mut db = Database::new();
    let (channel, instrument, octave) = linked_pair(&mut db);

    db.move_to(instrument.into(), Scope::Globals).unwrap();
    assert_eq!(db.scope_of(instrument.into()), Some(Scope::Globals));
    assert_eq!(
        db.channel(channel).unwrap().instruments.pool.members(),
        &[instrument]
    );
    assert!(db.get::<Octave>(octave).unwrap().used_by().contains(&instrument));
    assert!(link::check(&db).is_empty());

    assert_eq!(
        db.move_to(channel.into(), Scope::Globals),
        Err(DatabaseError::GlobalChannel)
    );
}

#[test]
fn test_duplicate_is_unlinked() {
    let mut db = Database::new();
    let (channel, instrument, _) = linked_pair(&mut db);

    let copy = db.duplicate(instrument.into()).unwrap();
    let StructureId::Instrument(copy) = copy else {
        panic!("expected an instrument, got {}", copy);
    };
    let stored = db.get::<Instrument>(copy).unwrap();
    assert_eq!(stored.number(), 12);
    assert!(stored.octaves.is_empty());
    assert_eq!(db.scope_of(copy.into()), Some(Scope::Root));

    let channel_copy = db.duplicate(channel.into()).unwrap();
    assert_eq!(channel_copy.kind(), StructureKind::Channel);
    assert!(link::check(&db).is_empty());
}

#[test]
fn test_toggle_muted() {
    let mut db = Database::new();
    let channel = db.add_channel(Channel::default());
    assert_eq!(db.toggle_muted(channel), Ok(true));
    assert_eq!(db.toggle_muted(channel), Ok(false));
    assert_eq!(
        db.toggle_muted(ChannelId(40)),
        Err(DatabaseError::Unknown(ChannelId(40).into()))
    );
}

#[test]
fn test_merge_replace() {
    let mut db = Database::new();
    db.add_channel(Channel::default());
    let mut other = Database::new();
    linked_pair(&mut other);

    db.merge(other.clone(), MergeMode::Replace);
    assert_eq!(db, other);
}

#[test]
fn test_merge_append_remaps_links() {
    let mut db = Database::new();
    let (own_channel, _, _) = linked_pair(&mut db);
    let mut other = Database::new();
    linked_pair(&mut other);

    db.merge(other, MergeMode::Append);
    assert_eq!(db.last_id(), 6);
    assert!(link::check(&db).is_empty());

    let channels: Vec<ChannelId> = db.channels().map(|(id, _)| id).collect();
    assert_eq!(channels, vec![own_channel, ChannelId(4)]);
    let appended = db.channel(ChannelId(4)).unwrap();
    assert_eq!(appended.instruments.pool.members(), &[InstrumentId(5)]);
    assert!(db
        .get::<Octave>(OctaveId(6))
        .unwrap()
        .used_by()
        .contains(&InstrumentId(5)));
    assert_eq!(db.scope_of(OctaveId(6).into()), Some(Scope::Globals));
}

#[test]
fn test_wipe() {
    let mut db = Database::new();
    linked_pair(&mut db);
    db.wipe();
    assert!(db.is_empty());
    assert_eq!(db, Database::new());
}

#[test]
fn test_errors_wrap_link_errors() {
    let err: DatabaseError = LinkError::NotAParent(StructureKind::Offset).into();
    assert_eq!(err.code(), "LINK_002");
    assert_eq!(err.to_string(), "Nothing can be attached to offset");
}

#[test]
fn test_scope_and_mode_parse() {
    assert_eq!("Globals".parse::<Scope>(), Ok(Scope::Globals));
    assert_eq!("root".parse::<Scope>(), Ok(Scope::Root));
    assert!("local".parse::<Scope>().is_err());
    assert_eq!("overwrite".parse::<MergeMode>(), Ok(MergeMode::Replace));
    assert_eq!("append".parse::<MergeMode>(), Ok(MergeMode::Append));
}
