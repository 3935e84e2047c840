//! Inclusive integer ranges with a maintained `low <= high` ordering.

use serde::{Deserialize, Serialize};

use crate::error::ModelError;

/// Largest effect, volume-table or offset value.
pub const MAX_VALUE: u32 = 255;

/// Largest sample area an offset can select.
pub const MAX_SAMPLE_AREA: u32 = 15;

/// An inclusive `[low, high]` interval.
///
/// Every constructor and edit keeps `low <= high`: a high bound below the low
/// bound is raised to the low bound. Serialized as a two-element array.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "(u32, u32)", into = "(u32, u32)")]
pub struct Range {
    low: u32,
    high: u32,
}

impl Range {
    pub fn new(low: u32, high: u32) -> Self {
        Self {
            low,
            high: high.max(low),
        }
    }

    /// Creates a range with both bounds clamped to `max` first.
    pub fn within(low: u32, high: u32, max: u32) -> Self {
        Self::new(low.min(max), high.min(max))
    }

    /// A range holding exactly one value.
    pub fn single(value: u32) -> Self {
        Self::new(value, value)
    }

    pub fn low(&self) -> u32 {
        self.low
    }

    pub fn high(&self) -> u32 {
        self.high
    }

    pub fn is_single(&self) -> bool {
        self.low == self.high
    }

    pub fn contains(&self, value: u32) -> bool {
        (self.low..=self.high).contains(&value)
    }

    /// Moves the low bound, dragging the high bound up with it if needed.
    pub fn set_low(&mut self, low: u32) {
        *self = Self::new(low, self.high);
    }

    /// Moves the high bound; a value below the low bound becomes the low bound.
    pub fn set_high(&mut self, high: u32) {
        *self = Self::new(self.low, high);
    }

    /// Fails when the high bound is above `max`.
    pub fn check_within(&self, field: &'static str, max: u32) -> Result<(), ModelError> {
        if self.high > max {
            return Err(ModelError::OutOfRange {
                field,
                low: self.low,
                high: self.high,
                max,
            });
        }
        Ok(())
    }

    /// Returns this range with both bounds clamped to `max`.
    pub fn clamped(self, max: u32) -> Self {
        Self::within(self.low, self.high, max)
    }
}

impl Default for Range {
    fn default() -> Self {
        Self::single(0)
    }
}

impl From<(u32, u32)> for Range {
    fn from((low, high): (u32, u32)) -> Self {
        Self::new(low, high)
    }
}

impl From<Range> for (u32, u32) {
    fn from(range: Range) -> Self {
        (range.low, range.high)
    }
}

impl std::fmt::Display for Range {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}-{}", self.low, self.high)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_clamps_high_to_low() {
        let range = Range::new(10, 4);
        assert_eq!(range.low(), 10);
        assert_eq!(range.high(), 10);
    }

    #[test]
    fn test_edits_keep_order() {
        let mut range = Range::new(2, 8);
        range.set_low(12);
        assert_eq!((range.low(), range.high()), (12, 12));
        range.set_high(20);
        range.set_high(5);
        assert_eq!((range.low(), range.high()), (12, 12));
    }

    #[test]
    fn test_within_caps_both_bounds() {
        let range = Range::within(40, 300, MAX_VALUE);
        assert_eq!((range.low(), range.high()), (40, 255));
        let range = Range::within(99, 120, 64);
        assert_eq!((range.low(), range.high()), (64, 64));
    }

    #[test]
    fn test_deserialize_repairs_inverted_range() {
        let range: Range = serde_json::from_str("[9, 3]").unwrap();
        assert_eq!(range, Range::single(9));
        assert_eq!(serde_json::to_string(&Range::new(1, 2)).unwrap(), "[1,2]");
    }
}
