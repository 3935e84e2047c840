//! Bidirectional link maintenance.
//!
//! A parent lists a child in one of its slots exactly when the child lists
//! the parent in the matching back-reference set. Every function here keeps
//! both sides in step; nothing else in the crate edits slot members or
//! `used_by` sets of structures already in a database.
//!
//! Compatible pairs:
//!
//! | Parent     | Children                     |
//! |------------|------------------------------|
//! | Channel    | Instrument, Volume, Effect   |
//! | Instrument | Octave, Volume, Offset (one) |

use std::collections::BTreeSet;

use crate::database::{Database, PoolMember, Scope};
use crate::error::LinkError;
use crate::ids::{ChannelId, ParentId, RawId, StructureId, StructureKind};
use crate::model::{Channel, Effect, Instrument, Octave, Offset, Volume};

/// Returns an error unless `child` kinds can sit in a `parent` slot.
pub fn check_compatible(parent: StructureKind, child: StructureKind) -> Result<(), LinkError> {
    match (parent, child) {
        (
            StructureKind::Channel,
            StructureKind::Instrument | StructureKind::Volume | StructureKind::Effect,
        ) => Ok(()),
        (
            StructureKind::Instrument,
            StructureKind::Octave | StructureKind::Volume | StructureKind::Offset,
        ) => Ok(()),
        (StructureKind::Channel | StructureKind::Instrument, child) => {
            Err(LinkError::Incompatible { parent, child })
        }
        (parent, _) => Err(LinkError::NotAParent(parent)),
    }
}

/// Attaches each child to the matching slot of `parent`, in order.
///
/// Children already attached are skipped, so repeating a call changes
/// nothing. Attaching an Offset to an Instrument replaces its previous
/// Offset. Every child is validated before anything changes.
///
/// # Returns
/// The number of new links created.
pub fn attach(
    db: &mut Database,
    parent: ParentId,
    children: &[StructureId],
) -> Result<usize, LinkError> {
    if !db.contains(parent.into()) {
        return Err(LinkError::Unknown(parent.into()));
    }
    for child in children {
        check_compatible(parent.kind(), child.kind())?;
        if !db.contains(*child) {
            return Err(LinkError::Unknown(*child));
        }
    }

    let mut linked = 0;
    for child in children {
        if link_one(db, parent, *child)? {
            linked += 1;
        }
    }
    Ok(linked)
}

fn link_one(db: &mut Database, parent: ParentId, child: StructureId) -> Result<bool, LinkError> {
    match (parent, child) {
        (ParentId::Channel(p), StructureId::Instrument(c)) => {
            if !channel(db, p)?.instruments.pool.insert(c) {
                return Ok(false);
            }
            member::<Instrument>(db, c)?.used_by.insert(p);
        }
        (ParentId::Channel(p), StructureId::Volume(c)) => {
            if !channel(db, p)?.volumes.pool.insert(c) {
                return Ok(false);
            }
            member::<Volume>(db, c)?.used_by.channels.insert(p);
        }
        (ParentId::Channel(p), StructureId::Effect(c)) => {
            if !channel(db, p)?.effects.pool.insert(c) {
                return Ok(false);
            }
            member::<Effect>(db, c)?.used_by.insert(p);
        }
        (ParentId::Instrument(p), StructureId::Octave(c)) => {
            if !member::<Instrument>(db, p)?.octaves.insert(c) {
                return Ok(false);
            }
            member::<Octave>(db, c)?.used_by.insert(p);
        }
        (ParentId::Instrument(p), StructureId::Volume(c)) => {
            if !member::<Instrument>(db, p)?.volumes.insert(c) {
                return Ok(false);
            }
            member::<Volume>(db, c)?.used_by.instruments.insert(p);
        }
        (ParentId::Instrument(p), StructureId::Offset(c)) => {
            let instrument = member::<Instrument>(db, p)?;
            if instrument.offset == Some(c) {
                return Ok(false);
            }
            if let Some(previous) = instrument.offset.replace(c) {
                if let Some(offset) = partner::<Offset>(db, previous) {
                    offset.used_by.remove(&p);
                }
            }
            member::<Offset>(db, c)?.used_by.insert(p);
        }
        (parent, child) => {
            return Err(LinkError::Incompatible {
                parent: parent.kind(),
                child: child.kind(),
            })
        }
    }
    Ok(true)
}

/// Removes the single link between `parent` and `child`, both directions.
///
/// # Returns
/// Whether a link existed.
pub fn detach(
    db: &mut Database,
    parent: ParentId,
    child: StructureId,
) -> Result<bool, LinkError> {
    check_compatible(parent.kind(), child.kind())?;
    if !db.contains(child) {
        return Err(LinkError::Unknown(child));
    }
    let removed = match (parent, child) {
        (ParentId::Channel(p), StructureId::Instrument(c)) => {
            let removed = channel(db, p)?.instruments.pool.remove(c);
            member::<Instrument>(db, c)?.used_by.remove(&p);
            removed
        }
        (ParentId::Channel(p), StructureId::Volume(c)) => {
            let removed = channel(db, p)?.volumes.pool.remove(c);
            member::<Volume>(db, c)?.used_by.channels.remove(&p);
            removed
        }
        (ParentId::Channel(p), StructureId::Effect(c)) => {
            let removed = channel(db, p)?.effects.pool.remove(c);
            member::<Effect>(db, c)?.used_by.remove(&p);
            removed
        }
        (ParentId::Instrument(p), StructureId::Octave(c)) => {
            let removed = member::<Instrument>(db, p)?.octaves.remove(c);
            member::<Octave>(db, c)?.used_by.remove(&p);
            removed
        }
        (ParentId::Instrument(p), StructureId::Volume(c)) => {
            let removed = member::<Instrument>(db, p)?.volumes.remove(c);
            member::<Volume>(db, c)?.used_by.instruments.remove(&p);
            removed
        }
        (ParentId::Instrument(p), StructureId::Offset(c)) => {
            let instrument = member::<Instrument>(db, p)?;
            let removed = instrument.offset == Some(c);
            if removed {
                instrument.offset = None;
            }
            member::<Offset>(db, c)?.used_by.remove(&p);
            removed
        }
        (parent, child) => {
            return Err(LinkError::Incompatible {
                parent: parent.kind(),
                child: child.kind(),
            })
        }
    };
    Ok(removed)
}

/// Severs every link `id` takes part in, in both directions.
///
/// Only `id`'s own edges are removed; its former partners stay in the
/// database. The caller removes `id` itself afterwards.
pub fn detach_all(db: &mut Database, id: StructureId) -> Result<(), LinkError> {
    match id {
        StructureId::Channel(id) => {
            let channel = channel(db, id)?;
            let instruments = std::mem::take(&mut channel.instruments.pool.members);
            let volumes = std::mem::take(&mut channel.volumes.pool.members);
            let effects = std::mem::take(&mut channel.effects.pool.members);
            for instrument in instruments {
                if let Some(instrument) = partner::<Instrument>(db, instrument) {
                    instrument.used_by.remove(&id);
                }
            }
            for volume in volumes {
                if let Some(volume) = partner::<Volume>(db, volume) {
                    volume.used_by.channels.remove(&id);
                }
            }
            for effect in effects {
                if let Some(effect) = partner::<Effect>(db, effect) {
                    effect.used_by.remove(&id);
                }
            }
        }
        StructureId::Instrument(id) => {
            let instrument = member::<Instrument>(db, id)?;
            let channels = std::mem::take(&mut instrument.used_by);
            let octaves = std::mem::take(&mut instrument.octaves.members);
            let volumes = std::mem::take(&mut instrument.volumes.members);
            let offset = instrument.offset.take();
            for channel in channels {
                if let Some(channel) = partner_channel(db, channel) {
                    channel.instruments.pool.remove(id);
                }
            }
            for octave in octaves {
                if let Some(octave) = partner::<Octave>(db, octave) {
                    octave.used_by.remove(&id);
                }
            }
            for volume in volumes {
                if let Some(volume) = partner::<Volume>(db, volume) {
                    volume.used_by.instruments.remove(&id);
                }
            }
            if let Some(offset) = offset.and_then(|offset| partner::<Offset>(db, offset)) {
                offset.used_by.remove(&id);
            }
        }
        StructureId::Octave(id) => {
            let instruments = std::mem::take(&mut member::<Octave>(db, id)?.used_by);
            for instrument in instruments {
                if let Some(instrument) = partner::<Instrument>(db, instrument) {
                    instrument.octaves.remove(id);
                }
            }
        }
        StructureId::Volume(id) => {
            let volume = member::<Volume>(db, id)?;
            let channels = std::mem::take(&mut volume.used_by.channels);
            let instruments = std::mem::take(&mut volume.used_by.instruments);
            for channel in channels {
                if let Some(channel) = partner_channel(db, channel) {
                    channel.volumes.pool.remove(id);
                }
            }
            for instrument in instruments {
                if let Some(instrument) = partner::<Instrument>(db, instrument) {
                    instrument.volumes.remove(id);
                }
            }
        }
        StructureId::Effect(id) => {
            let channels = std::mem::take(&mut member::<Effect>(db, id)?.used_by);
            for channel in channels {
                if let Some(channel) = partner_channel(db, channel) {
                    channel.effects.pool.remove(id);
                }
            }
        }
        StructureId::Offset(id) => {
            let instruments = std::mem::take(&mut member::<Offset>(db, id)?.used_by);
            for instrument in instruments {
                if let Some(instrument) = partner::<Instrument>(db, instrument) {
                    if instrument.offset == Some(id) {
                        instrument.offset = None;
                    }
                }
            }
        }
    }
    Ok(())
}

fn channel(db: &mut Database, id: ChannelId) -> Result<&mut Channel, LinkError> {
    db.channel_mut(id).ok_or(LinkError::Unknown(id.into()))
}

fn member<T: PoolMember>(db: &mut Database, id: T::Id) -> Result<&mut T, LinkError> {
    db.get_mut::<T>(id).ok_or_else(|| LinkError::Unknown(id.into()))
}

/// Looks up the far side of an existing link. A miss means the graph was
/// already inconsistent.
fn partner<T: PoolMember>(db: &mut Database, id: T::Id) -> Option<&mut T> {
    let found = db.get_mut::<T>(id);
    debug_assert!(
        found.is_some(),
        "dangling link to {}",
        Into::<StructureId>::into(id)
    );
    found
}

fn partner_channel(db: &mut Database, id: ChannelId) -> Option<&mut Channel> {
    let found = db.channel_mut(id);
    debug_assert!(found.is_some(), "dangling link to {}", id);
    found
}

/// Verifies link symmetry and id uniqueness across both graphs.
///
/// # Returns
/// One message per violation; empty when the graph is consistent.
pub fn check(db: &Database) -> Vec<String> {
    let mut problems = Vec::new();

    let mut seen = BTreeSet::new();
    for id in db.all_ids() {
        if !seen.insert(id.raw()) {
            problems.push(format!("id {} is used more than once", id.raw()));
        }
        if id.raw() > db.last_id() {
            problems.push(format!("{} is above the id counter {}", id, db.last_id()));
        }
    }

    for (id, channel) in db.channels() {
        let parent = StructureId::from(id);
        check_members(&mut problems, parent, channel.instruments.pool.members(), |c| {
            db.get::<Instrument>(c).map(|i| i.used_by.contains(&id))
        });
        check_members(&mut problems, parent, channel.volumes.pool.members(), |c| {
            db.get::<Volume>(c).map(|v| v.used_by.channels.contains(&id))
        });
        check_members(&mut problems, parent, channel.effects.pool.members(), |c| {
            db.get::<Effect>(c).map(|e| e.used_by.contains(&id))
        });
    }

    for pool in [db.pool(Scope::Root), db.globals()] {
        for (id, instrument) in pool.iter::<Instrument>() {
            let parent = StructureId::from(id);
            check_members(&mut problems, parent, instrument.octaves.members(), |c| {
                db.get::<Octave>(c).map(|o| o.used_by.contains(&id))
            });
            check_members(&mut problems, parent, instrument.volumes.members(), |c| {
                db.get::<Volume>(c).map(|v| v.used_by.instruments.contains(&id))
            });
            if let Some(offset) = instrument.offset {
                check_members(&mut problems, parent, &[offset], |c| {
                    db.get::<Offset>(c).map(|o| o.used_by.contains(&id))
                });
            }
            check_users(&mut problems, id.into(), &instrument.used_by, |p| {
                db.channel(p).map(|c| c.instruments.pool.contains(id))
            });
        }
        for (id, octave) in pool.iter::<Octave>() {
            check_users(&mut problems, id.into(), &octave.used_by, |p| {
                db.get::<Instrument>(p).map(|i| i.octaves.contains(id))
            });
        }
        for (id, volume) in pool.iter::<Volume>() {
            check_users(&mut problems, id.into(), &volume.used_by.channels, |p| {
                db.channel(p).map(|c| c.volumes.pool.contains(id))
            });
            check_users(&mut problems, id.into(), &volume.used_by.instruments, |p| {
                db.get::<Instrument>(p).map(|i| i.volumes.contains(id))
            });
        }
        for (id, effect) in pool.iter::<Effect>() {
            check_users(&mut problems, id.into(), &effect.used_by, |p| {
                db.channel(p).map(|c| c.effects.pool.contains(id))
            });
        }
        for (id, offset) in pool.iter::<Offset>() {
            check_users(&mut problems, id.into(), &offset.used_by, |p| {
                db.get::<Instrument>(p).map(|i| i.offset == Some(id))
            });
        }
    }

    problems
}

/// Checks forward links: each member exists, appears once, and points back.
fn check_members<I: RawId + Into<StructureId>>(
    problems: &mut Vec<String>,
    parent: StructureId,
    members: &[I],
    links_back: impl Fn(I) -> Option<bool>,
) {
    for (index, child) in members.iter().enumerate() {
        let child_id: StructureId = (*child).into();
        if members[..index].contains(child) {
            problems.push(format!("{} lists {} twice", parent, child_id));
        }
        match links_back(*child) {
            None => problems.push(format!("{} lists missing {}", parent, child_id)),
            Some(false) => problems.push(format!(
                "{} lists {} but is not in its back-references",
                parent, child_id
            )),
            Some(true) => {}
        }
    }
}

/// Checks back-references: each user exists and lists the child.
fn check_users<P: RawId + Into<StructureId>>(
    problems: &mut Vec<String>,
    child: StructureId,
    users: &BTreeSet<P>,
    lists_child: impl Fn(P) -> Option<bool>,
) {
    for user in users {
        let user_id: StructureId = (*user).into();
        match lists_child(*user) {
            None => problems.push(format!("{} is used by missing {}", child, user_id)),
            Some(false) => problems.push(format!(
                "{} claims use by {} which does not list it",
                child, user_id
            )),
            Some(true) => {}
        }
    }
}
