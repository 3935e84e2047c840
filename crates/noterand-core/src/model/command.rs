//! Column commands: volume-column commands, effect commands and sample offsets.
//!
//! Volume and Effect share the [`RangedCommand`] shape by composition. They
//! differ in who may reference them: a Volume can sit in both Channel and
//! Instrument slots, so it tracks two back-reference sets.

use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

use super::range::{Range, MAX_SAMPLE_AREA, MAX_VALUE};
use crate::error::ModelError;
use crate::ids::{ChannelId, InstrumentId};

/// Volume column command letters.
pub const VOLUME_CODES: &str = "vpabcdefgh";

/// Effect column command characters.
pub const EFFECT_CODES: &str = "#\\ABCDEFGHIJKLMNOPQRSTUVWXYZ";

/// Highest value for volume (`v`) and panning (`p`) commands.
pub const VOLUME_MAX: u32 = 64;

/// Highest value for the slide and vibrato volume-column commands.
pub const LIMITED_VOLUME_MAX: u32 = 9;

/// A one-character command with the inclusive range its value is drawn from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct RangedCommand {
    pub code: char,
    pub range: Range,
}

/// Back-references for a [`Volume`], one set per parent kind.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct VolumeUsers {
    pub(crate) channels: BTreeSet<ChannelId>,
    pub(crate) instruments: BTreeSet<InstrumentId>,
}

impl VolumeUsers {
    pub fn channels(&self) -> &BTreeSet<ChannelId> {
        &self.channels
    }

    pub fn instruments(&self) -> &BTreeSet<InstrumentId> {
        &self.instruments
    }

    pub fn is_empty(&self) -> bool {
        self.channels.is_empty() && self.instruments.is_empty()
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Volume {
    command: RangedCommand,
    pub(crate) used_by: VolumeUsers,
}

impl Volume {
    /// Creates a volume command; the code is lowercased and the range is
    /// clamped to what that command accepts.
    pub fn new(code: char, range: Range) -> Result<Self, ModelError> {
        let code = checked_volume_code(code)?;
        Ok(Self {
            command: RangedCommand {
                code,
                range: range.clamped(volume_limit(code)),
            },
            used_by: VolumeUsers::default(),
        })
    }

    /// A volume command spanning its full value range.
    pub fn full(code: char) -> Result<Self, ModelError> {
        let code = checked_volume_code(code)?;
        Self::new(code, Range::new(0, volume_limit(code)))
    }

    pub fn command(&self) -> &RangedCommand {
        &self.command
    }

    pub fn code(&self) -> char {
        self.command.code
    }

    pub fn range(&self) -> Range {
        self.command.range
    }

    /// Highest value this volume's command accepts.
    pub fn limit(&self) -> u32 {
        volume_limit(self.command.code)
    }

    /// Changes the command; the current range shrinks to fit the new limit.
    pub fn set_code(&mut self, code: char) -> Result<(), ModelError> {
        let code = checked_volume_code(code)?;
        self.command.code = code;
        self.command.range = self.command.range.clamped(volume_limit(code));
        Ok(())
    }

    pub fn set_range(&mut self, range: Range) {
        self.command.range = range.clamped(self.limit());
    }

    /// Checks values that bypassed the constructor, e.g. when deserialized.
    pub fn validate(&self) -> Result<(), ModelError> {
        if checked_volume_code(self.code())? != self.code() {
            return Err(ModelError::VolumeCode(self.code()));
        }
        self.range().check_within("Volume", self.limit())
    }

    pub fn used_by(&self) -> &VolumeUsers {
        &self.used_by
    }

    pub fn unlinked_copy(&self) -> Self {
        Self {
            command: self.command,
            used_by: VolumeUsers::default(),
        }
    }
}

fn checked_volume_code(code: char) -> Result<char, ModelError> {
    let lower = code.to_ascii_lowercase();
    if VOLUME_CODES.contains(lower) {
        Ok(lower)
    } else {
        Err(ModelError::VolumeCode(code))
    }
}

fn volume_limit(code: char) -> u32 {
    if code == 'v' || code == 'p' {
        VOLUME_MAX
    } else {
        LIMITED_VOLUME_MAX
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Effect {
    command: RangedCommand,
    pub(crate) used_by: BTreeSet<ChannelId>,
}

impl Effect {
    pub fn new(code: char, range: Range) -> Result<Self, ModelError> {
        Ok(Self {
            command: RangedCommand {
                code: checked_effect_code(code)?,
                range: range.clamped(MAX_VALUE),
            },
            used_by: BTreeSet::new(),
        })
    }

    pub fn command(&self) -> &RangedCommand {
        &self.command
    }

    pub fn code(&self) -> char {
        self.command.code
    }

    pub fn range(&self) -> Range {
        self.command.range
    }

    pub fn set_code(&mut self, code: char) -> Result<(), ModelError> {
        self.command.code = checked_effect_code(code)?;
        Ok(())
    }

    pub fn set_range(&mut self, range: Range) {
        self.command.range = range.clamped(MAX_VALUE);
    }

    pub fn validate(&self) -> Result<(), ModelError> {
        if checked_effect_code(self.code())? != self.code() {
            return Err(ModelError::EffectCode(self.code()));
        }
        self.range().check_within("Effect", MAX_VALUE)
    }

    /// Channels that list this effect locally.
    pub fn used_by(&self) -> &BTreeSet<ChannelId> {
        &self.used_by
    }

    pub fn unlinked_copy(&self) -> Self {
        Self {
            command: self.command,
            used_by: BTreeSet::new(),
        }
    }
}

fn checked_effect_code(code: char) -> Result<char, ModelError> {
    let upper = code.to_ascii_uppercase();
    if EFFECT_CODES.contains(upper) {
        Ok(upper)
    } else {
        Err(ModelError::EffectCode(code))
    }
}

/// A sample offset spread over one or more sample areas.
///
/// The reachable offsets run from `SA{sample_area.low}` `O{values.low}` up to
/// `SA{sample_area.high}` `O{values.high}`; areas strictly between the two
/// ends use every offset value.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Offset {
    sample_area: Range,
    values: Range,
    pub(crate) used_by: BTreeSet<InstrumentId>,
}

impl Default for Offset {
    fn default() -> Self {
        Self {
            sample_area: Range::single(0),
            values: Range::new(0, MAX_VALUE),
            used_by: BTreeSet::new(),
        }
    }
}

impl Offset {
    pub fn new(sample_area: Range, values: Range) -> Self {
        Self {
            sample_area: sample_area.clamped(MAX_SAMPLE_AREA),
            values: values.clamped(MAX_VALUE),
            used_by: BTreeSet::new(),
        }
    }

    pub fn sample_area(&self) -> Range {
        self.sample_area
    }

    pub fn values(&self) -> Range {
        self.values
    }

    pub fn set_sample_area(&mut self, sample_area: Range) {
        self.sample_area = sample_area.clamped(MAX_SAMPLE_AREA);
    }

    pub fn set_values(&mut self, values: Range) {
        self.values = values.clamped(MAX_VALUE);
    }

    pub fn validate(&self) -> Result<(), ModelError> {
        self.sample_area.check_within("Sample area", MAX_SAMPLE_AREA)?;
        self.values.check_within("Offset", MAX_VALUE)
    }

    /// The offset values usable inside one sample area.
    pub fn values_in_area(&self, area: u32) -> Range {
        let low = if area == self.sample_area.low() {
            self.values.low()
        } else {
            0
        };
        let high = if area == self.sample_area.high() {
            self.values.high()
        } else {
            MAX_VALUE
        };
        Range::new(low, high)
    }

    /// Instruments using this offset.
    pub fn used_by(&self) -> &BTreeSet<InstrumentId> {
        &self.used_by
    }

    pub fn unlinked_copy(&self) -> Self {
        Self::new(self.sample_area, self.values)
    }
}
