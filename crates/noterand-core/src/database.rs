//! The structure database: a root graph and a Channel-less globals graph.
//!
//! Every operation names the graph it works on with an explicit [`Scope`].
//! Ids come from one counter shared by both graphs, so a slot may list
//! members from either graph and lookups by id never need a scope.

use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};
use std::fmt;

use crate::error::DatabaseError;
use crate::ids::{
    ChannelId, EffectId, InstrumentId, OctaveId, OffsetId, RawId, StructureId, StructureKind,
    VolumeId,
};
use crate::link;
use crate::model::{Channel, Effect, Instrument, Octave, Offset, Structure, Volume};

/// Which graph of the database an operation targets.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Scope {
    Root,
    Globals,
}

impl Scope {
    pub fn as_str(&self) -> &'static str {
        match self {
            Scope::Root => "root",
            Scope::Globals => "globals",
        }
    }
}

impl fmt::Display for Scope {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl std::str::FromStr for Scope {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "root" => Ok(Scope::Root),
            "global" | "globals" => Ok(Scope::Globals),
            _ => Err(format!(
                "unknown database scope: {} (expected root or globals)",
                s
            )),
        }
    }
}

/// How [`Database::merge`] combines a loaded database with this one.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MergeMode {
    /// The loaded database supersedes this one entirely.
    Replace,
    /// Every structure list of the loaded database is appended to ours.
    Append,
}

impl std::str::FromStr for MergeMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "replace" | "overwrite" => Ok(MergeMode::Replace),
            "append" => Ok(MergeMode::Append),
            _ => Err(format!(
                "unknown merge mode: {} (expected replace or append)",
                s
            )),
        }
    }
}

/// The five non-Channel structure lists of one graph.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Pool {
    pub(crate) instruments: BTreeMap<InstrumentId, Instrument>,
    pub(crate) octaves: BTreeMap<OctaveId, Octave>,
    pub(crate) volumes: BTreeMap<VolumeId, Volume>,
    pub(crate) effects: BTreeMap<EffectId, Effect>,
    pub(crate) offsets: BTreeMap<OffsetId, Offset>,
}

/// A structure kind stored in a [`Pool`].
pub trait PoolMember: Sized + 'static {
    type Id: RawId + Into<StructureId>;

    fn table(pool: &Pool) -> &BTreeMap<Self::Id, Self>;
    fn table_mut(pool: &mut Pool) -> &mut BTreeMap<Self::Id, Self>;
    fn into_structure(self) -> Structure;
    /// A copy carrying no links in either direction.
    fn unlinked(&self) -> Self;
}

macro_rules! pool_member {
    ($ty:ident, $id:ident, $field:ident) => {
        impl PoolMember for $ty {
            type Id = $id;

            fn table(pool: &Pool) -> &BTreeMap<$id, $ty> {
                &pool.$field
            }

            fn table_mut(pool: &mut Pool) -> &mut BTreeMap<$id, $ty> {
                &mut pool.$field
            }

            fn into_structure(self) -> Structure {
                Structure::$ty(self)
            }

            fn unlinked(&self) -> Self {
                self.unlinked_copy()
            }
        }
    };
}

pool_member!(Instrument, InstrumentId, instruments);
pool_member!(Octave, OctaveId, octaves);
pool_member!(Volume, VolumeId, volumes);
pool_member!(Effect, EffectId, effects);
pool_member!(Offset, OffsetId, offsets);

impl Pool {
    pub fn get<T: PoolMember>(&self, id: T::Id) -> Option<&T> {
        T::table(self).get(&id)
    }

    /// Ids of one kind, in insertion order.
    pub fn ids<T: PoolMember>(&self) -> Vec<T::Id> {
        T::table(self).keys().copied().collect()
    }

    pub fn iter<T: PoolMember>(&self) -> impl Iterator<Item = (T::Id, &T)> + '_ {
        T::table(self).iter().map(|(id, item)| (*id, item))
    }

    pub fn contains(&self, id: StructureId) -> bool {
        match id {
            StructureId::Channel(_) => false,
            StructureId::Instrument(id) => self.instruments.contains_key(&id),
            StructureId::Octave(id) => self.octaves.contains_key(&id),
            StructureId::Volume(id) => self.volumes.contains_key(&id),
            StructureId::Effect(id) => self.effects.contains_key(&id),
            StructureId::Offset(id) => self.offsets.contains_key(&id),
        }
    }

    /// Ids of one kind as tagged ids, in insertion order.
    pub fn list(&self, kind: StructureKind) -> Vec<StructureId> {
        match kind {
            StructureKind::Channel => Vec::new(),
            StructureKind::Instrument => tagged(&self.instruments),
            StructureKind::Octave => tagged(&self.octaves),
            StructureKind::Volume => tagged(&self.volumes),
            StructureKind::Effect => tagged(&self.effects),
            StructureKind::Offset => tagged(&self.offsets),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.instruments.is_empty()
            && self.octaves.is_empty()
            && self.volumes.is_empty()
            && self.effects.is_empty()
            && self.offsets.is_empty()
    }

    fn take(&mut self, id: StructureId) -> Option<Structure> {
        match id {
            StructureId::Channel(_) => None,
            StructureId::Instrument(id) => {
                self.instruments.remove(&id).map(Structure::Instrument)
            }
            StructureId::Octave(id) => self.octaves.remove(&id).map(Structure::Octave),
            StructureId::Volume(id) => self.volumes.remove(&id).map(Structure::Volume),
            StructureId::Effect(id) => self.effects.remove(&id).map(Structure::Effect),
            StructureId::Offset(id) => self.offsets.remove(&id).map(Structure::Offset),
        }
    }

    /// Stores a structure under an id of the same kind. Channels are refused.
    fn put(&mut self, id: StructureId, structure: Structure) -> Result<(), DatabaseError> {
        match (id, structure) {
            (StructureId::Instrument(id), Structure::Instrument(s)) => {
                self.instruments.insert(id, s);
            }
            (StructureId::Octave(id), Structure::Octave(s)) => {
                self.octaves.insert(id, s);
            }
            (StructureId::Volume(id), Structure::Volume(s)) => {
                self.volumes.insert(id, s);
            }
            (StructureId::Effect(id), Structure::Effect(s)) => {
                self.effects.insert(id, s);
            }
            (StructureId::Offset(id), Structure::Offset(s)) => {
                self.offsets.insert(id, s);
            }
            _ => return Err(DatabaseError::GlobalChannel),
        }
        Ok(())
    }

    fn append(&mut self, other: Pool) {
        self.instruments.extend(other.instruments);
        self.octaves.extend(other.octaves);
        self.volumes.extend(other.volumes);
        self.effects.extend(other.effects);
        self.offsets.extend(other.offsets);
    }

    fn all_ids(&self) -> impl Iterator<Item = StructureId> + '_ {
        StructureKind::all()
            .iter()
            .flat_map(move |kind| self.list(*kind))
    }
}

fn tagged<I: RawId + Into<StructureId>, T>(table: &BTreeMap<I, T>) -> Vec<StructureId> {
    table.keys().map(|id| (*id).into()).collect()
}

/// The per-project graph: playable Channels plus a pool of building blocks.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RootGraph {
    pub(crate) channels: BTreeMap<ChannelId, Channel>,
    pub(crate) pool: Pool,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Database {
    next_id: u32,
    root: RootGraph,
    globals: Pool,
}

impl Database {
    /// An empty root graph and an empty globals graph.
    pub fn new() -> Self {
        Self::default()
    }

    /// Drops every structure in both graphs.
    pub fn wipe(&mut self) {
        *self = Self::new();
    }

    pub fn is_empty(&self) -> bool {
        self.root.channels.is_empty() && self.root.pool.is_empty() && self.globals.is_empty()
    }

    fn allocate(&mut self) -> u32 {
        self.next_id += 1;
        self.next_id
    }

    /// The highest id handed out so far.
    pub fn last_id(&self) -> u32 {
        self.next_id
    }

    pub fn pool(&self, scope: Scope) -> &Pool {
        match scope {
            Scope::Root => &self.root.pool,
            Scope::Globals => &self.globals,
        }
    }

    fn pool_mut(&mut self, scope: Scope) -> &mut Pool {
        match scope {
            Scope::Root => &mut self.root.pool,
            Scope::Globals => &mut self.globals,
        }
    }

    pub fn globals(&self) -> &Pool {
        &self.globals
    }

    pub fn add_channel(&mut self, channel: Channel) -> ChannelId {
        let id = ChannelId(self.allocate());
        self.root.channels.insert(id, channel.unlinked_copy());
        id
    }

    /// Adds a structure to one graph. Any links it carries are dropped; use
    /// [`link::attach`] to connect it.
    pub fn add<T: PoolMember>(&mut self, scope: Scope, item: T) -> T::Id {
        let id = T::Id::from_raw(self.allocate());
        T::table_mut(self.pool_mut(scope)).insert(id, item.unlinked());
        id
    }

    /// Adds any structure kind. Channels may only go to the root graph.
    pub fn insert(
        &mut self,
        scope: Scope,
        structure: Structure,
    ) -> Result<StructureId, DatabaseError> {
        Ok(match structure {
            Structure::Channel(channel) => {
                if scope == Scope::Globals {
                    return Err(DatabaseError::GlobalChannel);
                }
                self.add_channel(channel).into()
            }
            Structure::Instrument(item) => self.add(scope, item).into(),
            Structure::Octave(item) => self.add(scope, item).into(),
            Structure::Volume(item) => self.add(scope, item).into(),
            Structure::Effect(item) => self.add(scope, item).into(),
            Structure::Offset(item) => self.add(scope, item).into(),
        })
    }

    pub fn channel(&self, id: ChannelId) -> Option<&Channel> {
        self.root.channels.get(&id)
    }

    /// Mutable access for editing flags and spacing; slot members stay
    /// under the link manager's control.
    pub fn channel_mut(&mut self, id: ChannelId) -> Option<&mut Channel> {
        self.root.channels.get_mut(&id)
    }

    /// Channels in order.
    pub fn channels(&self) -> impl Iterator<Item = (ChannelId, &Channel)> + '_ {
        self.root.channels.iter().map(|(id, channel)| (*id, channel))
    }

    /// Looks a structure up in either graph.
    pub fn get<T: PoolMember>(&self, id: T::Id) -> Option<&T> {
        self.root.pool.get(id).or_else(|| self.globals.get(id))
    }

    pub fn get_mut<T: PoolMember>(&mut self, id: T::Id) -> Option<&mut T> {
        if T::table(&self.root.pool).contains_key(&id) {
            T::table_mut(&mut self.root.pool).get_mut(&id)
        } else {
            T::table_mut(&mut self.globals).get_mut(&id)
        }
    }

    /// The graph holding `id`, if any.
    pub fn scope_of(&self, id: StructureId) -> Option<Scope> {
        match id {
            StructureId::Channel(id) => self
                .root
                .channels
                .contains_key(&id)
                .then_some(Scope::Root),
            other if self.root.pool.contains(other) => Some(Scope::Root),
            other if self.globals.contains(other) => Some(Scope::Globals),
            _ => None,
        }
    }

    pub fn contains(&self, id: StructureId) -> bool {
        self.scope_of(id).is_some()
    }

    /// Ids of one kind in one graph, in order.
    pub fn list(&self, scope: Scope, kind: StructureKind) -> Vec<StructureId> {
        match (scope, kind) {
            (Scope::Root, StructureKind::Channel) => tagged(&self.root.channels),
            (Scope::Globals, StructureKind::Channel) => Vec::new(),
            (scope, kind) => self.pool(scope).list(kind),
        }
    }

    /// Every id in both graphs.
    pub fn all_ids(&self) -> Vec<StructureId> {
        tagged(&self.root.channels)
            .into_iter()
            .chain(self.root.pool.all_ids())
            .chain(self.globals.all_ids())
            .collect()
    }

    /// Severs every link of `id` and removes it from `scope`.
    pub fn remove(&mut self, scope: Scope, id: StructureId) -> Result<Structure, DatabaseError> {
        if self.scope_of(id) != Some(scope) {
            return Err(DatabaseError::NotInScope { id, scope });
        }
        link::detach_all(self, id)?;
        let removed = match id {
            StructureId::Channel(channel) => {
                self.root.channels.remove(&channel).map(Structure::Channel)
            }
            other => self.pool_mut(scope).take(other),
        };
        removed.ok_or(DatabaseError::NotInScope { id, scope })
    }

    /// Moves a non-Channel structure to the other graph, keeping its id
    /// and its links.
    pub fn move_to(&mut self, id: StructureId, scope: Scope) -> Result<(), DatabaseError> {
        let from = self.scope_of(id).ok_or(DatabaseError::Unknown(id))?;
        if id.kind() == StructureKind::Channel {
            return Err(DatabaseError::GlobalChannel);
        }
        if from == scope {
            return Ok(());
        }
        let structure = self
            .pool_mut(from)
            .take(id)
            .ok_or(DatabaseError::Unknown(id))?;
        self.pool_mut(scope).put(id, structure)
    }

    /// Copies a structure's settings into a new, unlinked structure in the
    /// same graph.
    pub fn duplicate(&mut self, id: StructureId) -> Result<StructureId, DatabaseError> {
        let scope = self.scope_of(id).ok_or(DatabaseError::Unknown(id))?;
        let copy = match id {
            StructureId::Channel(id) => self.channel(id).map(|c| Structure::Channel(c.clone())),
            StructureId::Instrument(id) => self.unlinked_structure::<Instrument>(id),
            StructureId::Octave(id) => self.unlinked_structure::<Octave>(id),
            StructureId::Volume(id) => self.unlinked_structure::<Volume>(id),
            StructureId::Effect(id) => self.unlinked_structure::<Effect>(id),
            StructureId::Offset(id) => self.unlinked_structure::<Offset>(id),
        }
        .ok_or(DatabaseError::Unknown(id))?;
        self.insert(scope, copy)
    }

    fn unlinked_structure<T: PoolMember>(&self, id: T::Id) -> Option<Structure> {
        self.get::<T>(id).map(|item| item.unlinked().into_structure())
    }

    /// Flips a Channel's mute flag and returns the new state.
    pub fn toggle_muted(&mut self, id: ChannelId) -> Result<bool, DatabaseError> {
        let channel = self
            .channel_mut(id)
            .ok_or(DatabaseError::Unknown(id.into()))?;
        channel.muted = !channel.muted;
        Ok(channel.muted)
    }

    /// Combines a loaded database into this one.
    ///
    /// Append renumbers every structure of `other` above this database's ids,
    /// rewriting its links consistently, then concatenates each list. The
    /// loaded links are trusted as saved.
    pub fn merge(&mut self, other: Database, mode: MergeMode) {
        match mode {
            MergeMode::Replace => *self = other,
            MergeMode::Append => {
                let mut remap = Remap::default();
                for id in other.all_ids() {
                    let fresh = self.allocate();
                    remap.0.insert(id.raw(), fresh);
                }
                let Database { root, globals, .. } = other;
                let channels = root
                    .channels
                    .into_iter()
                    .map(|(id, channel)| (remap.id(id), remap.channel(channel)));
                self.root.channels.extend(channels);
                self.root.pool.append(remap.pool(root.pool));
                self.globals.append(remap.pool(globals));
            }
        }
    }
}

/// Old-to-new raw id mapping used when appending a database.
#[derive(Default)]
struct Remap(BTreeMap<u32, u32>);

impl Remap {
    fn id<I: RawId>(&self, id: I) -> I {
        I::from_raw(self.0.get(&id.raw()).copied().unwrap_or(id.raw()))
    }

    fn vec<I: RawId>(&self, ids: &mut Vec<I>) {
        for id in ids.iter_mut() {
            *id = self.id(*id);
        }
    }

    fn set<I: RawId>(&self, ids: &BTreeSet<I>) -> BTreeSet<I> {
        ids.iter().map(|id| self.id(*id)).collect()
    }

    fn channel(&self, mut channel: Channel) -> Channel {
        self.vec(&mut channel.instruments.pool.members);
        self.vec(&mut channel.volumes.pool.members);
        self.vec(&mut channel.effects.pool.members);
        channel
    }

    fn pool(&self, pool: Pool) -> Pool {
        Pool {
            instruments: pool
                .instruments
                .into_iter()
                .map(|(id, mut item)| {
                    self.vec(&mut item.octaves.members);
                    self.vec(&mut item.volumes.members);
                    item.offset = item.offset.map(|offset| self.id(offset));
                    item.used_by = self.set(&item.used_by);
                    (self.id(id), item)
                })
                .collect(),
            octaves: pool
                .octaves
                .into_iter()
                .map(|(id, mut item)| {
                    item.used_by = self.set(&item.used_by);
                    (self.id(id), item)
                })
                .collect(),
            volumes: pool
                .volumes
                .into_iter()
                .map(|(id, mut item)| {
                    item.used_by.channels = self.set(&item.used_by.channels);
                    item.used_by.instruments = self.set(&item.used_by.instruments);
                    (self.id(id), item)
                })
                .collect(),
            effects: pool
                .effects
                .into_iter()
                .map(|(id, mut item)| {
                    item.used_by = self.set(&item.used_by);
                    (self.id(id), item)
                })
                .collect(),
            offsets: pool
                .offsets
                .into_iter()
                .map(|(id, mut item)| {
                    item.used_by = self.set(&item.used_by);
                    (self.id(id), item)
                })
                .collect(),
        }
    }
}

#[cfg(test)]
mod tests;
