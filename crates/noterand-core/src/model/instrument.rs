//! Instrument: a sample number with its own octave, volume and offset choices.

use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

use super::slot::Slot;
use crate::error::ModelError;
use crate::ids::{ChannelId, OctaveId, OffsetId, VolumeId};

/// Largest instrument number OpenMPT accepts.
pub const MAX_INSTRUMENT: u32 = 255;

/// Characters used for the tens digit of an instrument number in pasted
/// pattern text; numbers past 99 continue through ASCII.
const TENS_DIGITS: &[u8; 26] = b"0123456789:;<=>?@ABCDEFGHI";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Instrument {
    number: u8,
    pub octaves: Slot<OctaveId>,
    pub volumes: Slot<VolumeId>,
    pub(crate) offset: Option<OffsetId>,
    pub(crate) used_by: BTreeSet<ChannelId>,
}

impl Instrument {
    pub fn new(number: u32) -> Result<Self, ModelError> {
        Ok(Self {
            number: checked_number(number)?,
            octaves: Slot::default(),
            volumes: Slot::default(),
            offset: None,
            used_by: BTreeSet::new(),
        })
    }

    pub fn number(&self) -> u32 {
        self.number as u32
    }

    pub fn set_number(&mut self, number: u32) -> Result<(), ModelError> {
        self.number = checked_number(number)?;
        Ok(())
    }

    pub fn validate(&self) -> Result<(), ModelError> {
        checked_number(self.number()).map(|_| ())
    }

    /// Two-character instrument column text, e.g. `01` or `<5` for 125.
    pub fn code(&self) -> String {
        let tens = TENS_DIGITS[(self.number / 10) as usize] as char;
        format!("{}{}", tens, self.number % 10)
    }

    pub fn offset(&self) -> Option<OffsetId> {
        self.offset
    }

    /// Channels that list this instrument locally.
    pub fn used_by(&self) -> &BTreeSet<ChannelId> {
        &self.used_by
    }

    pub fn unlinked_copy(&self) -> Self {
        let mut copy = self.clone();
        copy.octaves.members.clear();
        copy.volumes.members.clear();
        copy.offset = None;
        copy.used_by.clear();
        copy
    }
}

fn checked_number(number: u32) -> Result<u8, ModelError> {
    if (1..=MAX_INSTRUMENT).contains(&number) {
        Ok(number as u8)
    } else {
        Err(ModelError::InstrumentNumber(number))
    }
}
