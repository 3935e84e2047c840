//! One channel's line generator.

use rand_pcg::Pcg32;

use super::countdown::Countdown;
use super::draw::{render_sample_area, roll_effect, roll_event, roll_volume, Event};
use crate::database::Database;
use crate::model::Channel;

/// Width of the note column (`C#5` plus the instrument code).
pub const NOTE_WIDTH: usize = 5;

/// Width of the volume and effect columns.
pub const COMMAND_WIDTH: usize = 3;

/// Width of one rendered channel segment, separator included.
pub const SEGMENT_WIDTH: usize = 1 + NOTE_WIDTH + 2 * COMMAND_WIDTH;

/// Production state of one channel for one run.
///
/// The next instrument event is always rolled one firing ahead, so its sample
/// area can be announced on the line before it plays. The first event is
/// rolled before any line exists: it plays on line 1 unannounced, so its
/// offset lands in sample area 0 whatever area it was drawn for.
#[derive(Debug, Clone)]
pub struct ChannelRun<'a> {
    db: &'a Database,
    channel: &'a Channel,
    instruments: Countdown,
    volumes: Countdown,
    effects: Countdown,
    pending: Event,
    current_area: u32,
    next_area: u32,
}

impl<'a> ChannelRun<'a> {
    /// Arms every slot and rolls the first pending event.
    pub fn new(db: &'a Database, channel: &'a Channel, rng: &mut Pcg32) -> Self {
        let (pending, next_area) = roll_event(db, &channel.instruments.pool, 0, rng);
        Self {
            db,
            channel,
            instruments: Countdown::armed(),
            volumes: Countdown::armed(),
            effects: Countdown::armed(),
            pending,
            current_area: 0,
            next_area,
        }
    }

    pub fn instrument_countdown(&self) -> Countdown {
        self.instruments
    }

    pub fn current_area(&self) -> u32 {
        self.current_area
    }

    pub fn next_area(&self) -> u32 {
        self.next_area
    }

    /// Advances one line and renders this channel's segment.
    pub fn line(&mut self, rng: &mut Pcg32) -> String {
        let mut note = None;
        let mut volume = None;
        let mut effect = None;

        if self.instruments.remaining() == 1 && self.next_area != self.current_area {
            effect = Some(render_sample_area(self.next_area));
            self.current_area = self.next_area;
        }

        if self.instruments.tick(self.channel.instruments.spacing, rng) {
            let fired = std::mem::take(&mut self.pending);
            note = fired.note;
            volume = fired.volume;
            if effect.is_none() {
                effect = fired.offset;
            }
            let (pending, next_area) =
                roll_event(self.db, &self.channel.instruments.pool, self.current_area, rng);
            self.pending = pending;
            self.next_area = next_area;
        }

        if volume.is_none() && self.volumes.tick(self.channel.volumes.spacing, rng) {
            volume = roll_volume(self.db, &self.channel.volumes.pool, rng);
        }

        if effect.is_none() && self.effects.tick(self.channel.effects.spacing, rng) {
            effect = roll_effect(self.db, &self.channel.effects.pool, rng);
        }

        let fill = self.channel.fill();
        let mut segment = String::with_capacity(SEGMENT_WIDTH);
        segment.push('|');
        push_field(&mut segment, note.as_deref(), NOTE_WIDTH, fill);
        push_field(&mut segment, volume.as_deref(), COMMAND_WIDTH, fill);
        push_field(&mut segment, effect.as_deref(), COMMAND_WIDTH, fill);
        segment
    }
}

/// Writes `text` cut or padded to `width`; an empty field is all `fill`.
fn push_field(out: &mut String, text: Option<&str>, width: usize, fill: char) {
    let text = text.unwrap_or("");
    let mut written = 0;
    for c in text.chars().take(width) {
        out.push(c);
        written += 1;
    }
    for _ in written..width {
        out.push(fill);
    }
}
