//! Lane model
//!
//! Three fixed lateral tracks. A [`Lane`] can only be built in range, so
//! internal callers never see an invalid index; raw indices coming from the
//! outside go through [`Lane::new`].

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Number of lanes on the track
pub const LANE_COUNT: usize = 3;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum LaneError {
    #[error("lane index {0} is out of range (0..{LANE_COUNT})")]
    InvalidLane(usize),
}

/// A lane index in `0..LANE_COUNT`
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "u8", into = "u8")]
pub struct Lane(u8);

impl Lane {
    pub const LEFT: Lane = Lane(0);
    pub const CENTER: Lane = Lane(1);
    pub const RIGHT: Lane = Lane(2);
    pub const ALL: [Lane; LANE_COUNT] = [Lane::LEFT, Lane::CENTER, Lane::RIGHT];

    pub fn new(index: usize) -> Result<Self, LaneError> {
        if index < LANE_COUNT {
            Ok(Lane(index as u8))
        } else {
            Err(LaneError::InvalidLane(index))
        }
    }

    #[inline]
    pub fn index(self) -> usize {
        self.0 as usize
    }

    /// One lane to the left, clamped at the left edge
    pub fn left(self) -> Self {
        Lane(self.0.saturating_sub(1))
    }

    /// One lane to the right, clamped at the right edge
    pub fn right(self) -> Self {
        Lane((self.0 + 1).min(LANE_COUNT as u8 - 1))
    }
}

impl Default for Lane {
    fn default() -> Self {
        Lane::CENTER
    }
}

impl TryFrom<u8> for Lane {
    type Error = LaneError;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        Lane::new(value as usize)
    }
}

impl From<Lane> for u8 {
    fn from(lane: Lane) -> Self {
        lane.0
    }
}

/// Lane index to lateral world coordinate
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LaneTable {
    offsets: [f32; LANE_COUNT],
}

impl LaneTable {
    pub fn new(offsets: [f32; LANE_COUNT]) -> Self {
        Self { offsets }
    }

    #[inline]
    pub fn offset(&self, lane: Lane) -> f32 {
        self.offsets[lane.index()]
    }

    /// Lookup by raw index
    pub fn lane_to_offset(&self, index: usize) -> Result<f32, LaneError> {
        Lane::new(index).map(|lane| self.offset(lane))
    }

    /// Lane whose coordinate is closest to `x`
    pub fn nearest(&self, x: f32) -> Lane {
        Lane::ALL
            .into_iter()
            .min_by(|a, b| {
                (self.offset(*a) - x)
                    .abs()
                    .total_cmp(&(self.offset(*b) - x).abs())
            })
            .unwrap_or_default()
    }
}
