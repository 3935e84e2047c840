//! Pattern text production.
//!
//! Every active channel runs its own [`ChannelRun`]: three spacing
//! countdowns (instrument, volume, effect) and a pending instrument event
//! rolled one firing ahead. Each output line concatenates the segments of all
//! active channels in channel order.
//!
//! All draws come from one PCG32 generator, consumed channel by channel
//! within a line, so a seed reproduces a run exactly.

mod channel;
mod countdown;
mod draw;

pub use channel::{ChannelRun, COMMAND_WIDTH, NOTE_WIDTH, SEGMENT_WIDTH};
pub use countdown::Countdown;
pub use draw::{
    candidates, render_effect, render_offset, render_sample_area, render_volume, roll_offset,
    Event,
};

use rand::SeedableRng;
use rand_pcg::Pcg32;
use std::fmt;

use crate::database::Database;
use crate::ids::ChannelId;
use crate::model::Channel;

/// First line of every pattern file; OpenMPT refuses pasted text without it.
pub const HEADER: &str = "ModPlug Tracker  IT";

/// Most channels an IT pattern holds.
pub const MAX_CHANNELS: usize = 127;

/// Creates a PCG32 RNG from a 32-bit seed.
///
/// The 32-bit seed is expanded to 64 bits by duplicating the value in both
/// halves.
pub fn create_rng(seed: u32) -> Pcg32 {
    let seed64 = (seed as u64) | ((seed as u64) << 32);
    Pcg32::seed_from_u64(seed64)
}

/// How much text to produce.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ProductionSettings {
    /// Lines per run, header excluded.
    pub lines: usize,
    /// Independent runs, each with freshly initialized channels.
    pub runs: usize,
}

impl Default for ProductionSettings {
    fn default() -> Self {
        Self { lines: 64, runs: 1 }
    }
}

/// Recoverable conditions noticed while producing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ProductionWarning {
    /// More active channels than a pattern can hold; the rest were skipped.
    TooManyChannels { available: usize, used: usize },
}

impl fmt::Display for ProductionWarning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ProductionWarning::TooManyChannels { available, used } => write!(
                f,
                "{} channels are active but only {} fit in a pattern; the rest were skipped",
                available, used
            ),
        }
    }
}

/// One produced pattern.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Run {
    /// Header line plus one line per requested line, each newline-terminated.
    pub text: String,
    pub channels_used: usize,
    pub warnings: Vec<ProductionWarning>,
}

/// The result of [`produce`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Production {
    pub runs: Vec<String>,
    pub channels_used: usize,
    pub warnings: Vec<ProductionWarning>,
}

/// Unmuted channels in order, capped at [`MAX_CHANNELS`].
pub fn active_channels(db: &Database) -> (Vec<(ChannelId, &Channel)>, Option<ProductionWarning>) {
    let mut active: Vec<(ChannelId, &Channel)> =
        db.channels().filter(|(_, channel)| !channel.muted).collect();
    let warning = (active.len() > MAX_CHANNELS).then(|| ProductionWarning::TooManyChannels {
        available: active.len(),
        used: MAX_CHANNELS,
    });
    active.truncate(MAX_CHANNELS);
    (active, warning)
}

/// Produces one pattern of `lines` lines.
pub fn produce_run(db: &Database, lines: usize, rng: &mut Pcg32) -> Run {
    let (active, warning) = active_channels(db);
    let mut channels: Vec<ChannelRun<'_>> = active
        .iter()
        .map(|(_, channel)| ChannelRun::new(db, channel, rng))
        .collect();

    let mut text = String::with_capacity((lines + 1) * (channels.len() * SEGMENT_WIDTH + 1));
    text.push_str(HEADER);
    text.push('\n');
    for _ in 0..lines {
        for channel in channels.iter_mut() {
            text.push_str(&channel.line(rng));
        }
        text.push('\n');
    }

    Run {
        text,
        channels_used: channels.len(),
        warnings: warning.into_iter().collect(),
    }
}

/// Produces `settings.runs` patterns from one generator.
pub fn produce(db: &Database, settings: ProductionSettings, rng: &mut Pcg32) -> Production {
    let mut production = Production {
        runs: Vec::with_capacity(settings.runs),
        channels_used: 0,
        warnings: Vec::new(),
    };
    for _ in 0..settings.runs {
        let run = produce_run(db, settings.lines, rng);
        production.channels_used = run.channels_used;
        for warning in run.warnings {
            if !production.warnings.contains(&warning) {
                production.warnings.push(warning);
            }
        }
        production.runs.push(run.text);
    }
    production
}
