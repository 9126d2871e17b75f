//! Deterministic simulation module
//!
//! All gameplay logic lives here. This module must be pure and deterministic:
//! - Caller-supplied frame deltas, clamped
//! - Seeded RNG only
//! - Stable iteration order (by entity ID)
//! - No rendering or platform dependencies

pub mod autopilot;
pub mod collision;
pub mod intro;
pub mod lane;
pub mod player;
pub mod spawner;
pub mod state;
pub mod tick;

pub use collision::{Aabb, Resolution, Support};
pub use intro::{IntroScript, IntroStep};
pub use lane::{LANE_COUNT, Lane, LaneError, LaneTable};
pub use player::PlayerState;
pub use spawner::{ClusterPattern, SpawnEvent, Spawner};
pub use state::{
    Chaser, Fish, GameEvent, GameOverCause, GamePhase, Obstacle, ObstacleKind, Ramp, World,
};
pub use tick::{Game, Intent, Snapshot};
