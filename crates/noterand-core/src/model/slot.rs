//! Slots: a parent's ordered pool of one child kind.

use serde::{Deserialize, Serialize};

use super::range::Range;

/// A parent's local members of one kind plus the globals opt-in flag.
///
/// Members are only added or removed through [`crate::link`], which keeps
/// the children's back-references in step.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Slot<Id> {
    pub(crate) members: Vec<Id>,
    /// Draw from the globals pool as well as the local members.
    #[serde(default)]
    pub use_globals: bool,
}

impl<Id> Default for Slot<Id> {
    fn default() -> Self {
        Self {
            members: Vec::new(),
            use_globals: false,
        }
    }
}

impl<Id: Copy + PartialEq> Slot<Id> {
    pub fn members(&self) -> &[Id] {
        &self.members
    }

    pub fn contains(&self, id: Id) -> bool {
        self.members.contains(&id)
    }

    pub fn len(&self) -> usize {
        self.members.len()
    }

    pub fn is_empty(&self) -> bool {
        self.members.is_empty()
    }

    /// Appends `id` unless already present. Returns whether it was added.
    pub(crate) fn insert(&mut self, id: Id) -> bool {
        if self.contains(id) {
            return false;
        }
        self.members.push(id);
        true
    }

    pub(crate) fn remove(&mut self, id: Id) -> bool {
        let before = self.members.len();
        self.members.retain(|member| *member != id);
        self.members.len() != before
    }
}

/// A Channel slot: a [`Slot`] with its own spacing between draws.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SpacedSlot<Id> {
    pub pool: Slot<Id>,
    /// Inclusive number of lines to wait between draws.
    pub spacing: Range,
}

impl<Id> Default for SpacedSlot<Id> {
    fn default() -> Self {
        Self {
            pool: Slot::default(),
            spacing: Range::default(),
        }
    }
}
