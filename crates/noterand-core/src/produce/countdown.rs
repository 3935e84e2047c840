//! Per-slot spacing countdowns.

use rand::Rng;
use rand_pcg::Pcg32;

use crate::model::Range;

/// Lines left before a slot may draw again.
///
/// An armed countdown (zero) fires on its next tick and reseeds from the
/// slot's spacing; a waiting one just counts down.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Countdown {
    remaining: u32,
}

impl Countdown {
    /// An armed countdown, firing on the first tick.
    pub fn armed() -> Self {
        Self::default()
    }

    pub fn remaining(&self) -> u32 {
        self.remaining
    }

    /// Advances one line.
    ///
    /// # Returns
    /// Whether the slot fires on this line.
    pub fn tick(&mut self, spacing: Range, rng: &mut Pcg32) -> bool {
        if self.remaining == 0 {
            self.remaining = rng.gen_range(spacing.low()..=spacing.high());
            true
        } else {
            self.remaining -= 1;
            false
        }
    }
}
