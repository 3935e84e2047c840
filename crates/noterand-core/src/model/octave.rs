//! Octave: a pitch index with the subset of pitch classes it may play.

use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

use crate::error::ModelError;
use crate::ids::InstrumentId;

/// Highest octave number in the pattern editor.
pub const MAX_PITCH_INDEX: u32 = 9;

/// One of the 12 chromatic pitch classes, labelled the way OpenMPT
/// writes them in the note column.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum PitchClass {
    #[serde(rename = "C-")]
    C,
    #[serde(rename = "C#")]
    CSharp,
    #[serde(rename = "D-")]
    D,
    #[serde(rename = "D#")]
    DSharp,
    #[serde(rename = "E-")]
    E,
    #[serde(rename = "F-")]
    F,
    #[serde(rename = "F#")]
    FSharp,
    #[serde(rename = "G-")]
    G,
    #[serde(rename = "G#")]
    GSharp,
    #[serde(rename = "A-")]
    A,
    #[serde(rename = "A#")]
    ASharp,
    #[serde(rename = "B-")]
    B,
}

impl PitchClass {
    pub fn all() -> &'static [PitchClass; 12] {
        &[
            PitchClass::C,
            PitchClass::CSharp,
            PitchClass::D,
            PitchClass::DSharp,
            PitchClass::E,
            PitchClass::F,
            PitchClass::FSharp,
            PitchClass::G,
            PitchClass::GSharp,
            PitchClass::A,
            PitchClass::ASharp,
            PitchClass::B,
        ]
    }

    pub fn label(&self) -> &'static str {
        match self {
            PitchClass::C => "C-",
            PitchClass::CSharp => "C#",
            PitchClass::D => "D-",
            PitchClass::DSharp => "D#",
            PitchClass::E => "E-",
            PitchClass::F => "F-",
            PitchClass::FSharp => "F#",
            PitchClass::G => "G-",
            PitchClass::GSharp => "G#",
            PitchClass::A => "A-",
            PitchClass::ASharp => "A#",
            PitchClass::B => "B-",
        }
    }
}

impl std::fmt::Display for PitchClass {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.label())
    }
}

impl std::str::FromStr for PitchClass {
    type Err = ModelError;

    /// Accepts the column label (`C#`, `D-`) or a bare natural (`d`).
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let upper = s.trim().to_uppercase();
        let label = if upper.len() == 1 {
            format!("{}-", upper)
        } else {
            upper
        };
        PitchClass::all()
            .iter()
            .copied()
            .find(|pitch| pitch.label() == label)
            .ok_or_else(|| ModelError::PitchLabel(s.to_string()))
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Octave {
    pitch_index: u8,
    pitch_classes: Vec<PitchClass>,
    pub(crate) used_by: BTreeSet<InstrumentId>,
}

impl Default for Octave {
    fn default() -> Self {
        Self {
            pitch_index: 5,
            pitch_classes: PitchClass::all().to_vec(),
            used_by: BTreeSet::new(),
        }
    }
}

impl Octave {
    pub fn new(pitch_index: u32, pitch_classes: Vec<PitchClass>) -> Result<Self, ModelError> {
        let mut octave = Self::default();
        octave.set_pitch_index(pitch_index)?;
        octave.set_pitch_classes(pitch_classes)?;
        Ok(octave)
    }

    pub fn pitch_index(&self) -> u32 {
        self.pitch_index as u32
    }

    pub fn set_pitch_index(&mut self, pitch_index: u32) -> Result<(), ModelError> {
        if pitch_index > MAX_PITCH_INDEX {
            return Err(ModelError::PitchIndex(pitch_index));
        }
        self.pitch_index = pitch_index as u8;
        Ok(())
    }

    pub fn pitch_classes(&self) -> &[PitchClass] {
        &self.pitch_classes
    }

    /// Replaces the playable pitch classes, dropping repeats but keeping order.
    pub fn set_pitch_classes(&mut self, pitch_classes: Vec<PitchClass>) -> Result<(), ModelError> {
        let mut unique = Vec::with_capacity(pitch_classes.len());
        for pitch in pitch_classes {
            if !unique.contains(&pitch) {
                unique.push(pitch);
            }
        }
        if unique.is_empty() {
            return Err(ModelError::NoPitchClasses);
        }
        self.pitch_classes = unique;
        Ok(())
    }

    /// Checks values that bypassed the constructor.
    pub fn validate(&self) -> Result<(), ModelError> {
        if self.pitch_index() > MAX_PITCH_INDEX {
            return Err(ModelError::PitchIndex(self.pitch_index()));
        }
        if self.pitch_classes.is_empty() {
            return Err(ModelError::NoPitchClasses);
        }
        Ok(())
    }

    /// Whether every chromatic pitch class is playable.
    pub fn is_full(&self) -> bool {
        self.pitch_classes.len() == PitchClass::all().len()
    }

    /// Note column text for one of this octave's pitch classes, e.g. `C#5`.
    pub fn note(&self, pitch: PitchClass) -> String {
        format!("{}{}", pitch.label(), self.pitch_index)
    }

    /// Instruments that list this octave locally.
    pub fn used_by(&self) -> &BTreeSet<InstrumentId> {
        &self.used_by
    }

    pub fn unlinked_copy(&self) -> Self {
        let mut copy = self.clone();
        copy.used_by.clear();
        copy
    }
}
