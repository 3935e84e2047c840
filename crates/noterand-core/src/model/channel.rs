//! Channel: one playable tracker column group.

use serde::{Deserialize, Serialize};

use super::slot::SpacedSlot;
use crate::ids::{EffectId, InstrumentId, VolumeId};

/// A playable channel. Only the root graph holds channels.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Channel {
    pub instruments: SpacedSlot<InstrumentId>,
    pub volumes: SpacedSlot<VolumeId>,
    pub effects: SpacedSlot<EffectId>,
    /// Render empty columns as `.` so pasting overwrites existing data.
    pub overwrite: bool,
    /// Muted channels are skipped during production.
    pub muted: bool,
}

impl Default for Channel {
    fn default() -> Self {
        Self {
            instruments: SpacedSlot::default(),
            volumes: SpacedSlot::default(),
            effects: SpacedSlot::default(),
            overwrite: true,
            muted: false,
        }
    }
}

impl Channel {
    /// The fill character for empty columns.
    pub fn fill(&self) -> char {
        if self.overwrite {
            '.'
        } else {
            ' '
        }
    }

    /// A copy of this channel's settings with no members.
    pub fn unlinked_copy(&self) -> Self {
        let mut copy = self.clone();
        copy.instruments.pool.members.clear();
        copy.volumes.pool.members.clear();
        copy.effects.pool.members.clear();
        copy
    }
}
