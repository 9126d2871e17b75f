//! World entities and game-level types
//!
//! Everything the presenter reads each frame lives here: obstacles, fish,
//! the chaser, the phase machine and the events queued for the frame.

use serde::{Deserialize, Serialize};

use super::lane::Lane;
use crate::consts::*;
use crate::tuning::ChaserTuning;
use crate::{ease_toward, lerp};

/// Current phase of the game
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum GamePhase {
    /// Scripted opening sequence
    Intro,
    /// Waiting for the start command
    Ready,
    /// Active run
    Playing,
    /// Run ended, waiting for restart
    GameOver,
}

/// Ramp geometry carried by a ramp truck
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Ramp {
    /// Length of the sloped segment
    pub ramp_length: f32,
    /// Length of the flat roof behind the slope
    pub roof_length: f32,
    /// Height of the roof (top of the slope)
    pub roof_height: f32,
}

impl Ramp {
    /// Surface height `along` units back from the foot of the ramp
    pub fn height_along(&self, along: f32) -> f32 {
        if along <= self.ramp_length {
            lerp(0.0, self.roof_height, (along / self.ramp_length).max(0.0))
        } else {
            self.roof_height
        }
    }

    pub fn total_length(&self) -> f32 {
        self.ramp_length + self.roof_length
    }
}

/// Obstacle variants
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum ObstacleKind {
    DogHouse,
    Dog,
    CatCatcherTruck,
    TallTruck,
    RampTruck(Ramp),
}

impl ObstacleKind {
    /// Lateral width of the collision box
    pub fn width(&self) -> f32 {
        match self {
            ObstacleKind::DogHouse => DOG_HOUSE_WIDTH,
            ObstacleKind::Dog => DOG_WIDTH,
            ObstacleKind::CatCatcherTruck | ObstacleKind::TallTruck | ObstacleKind::RampTruck(_) => {
                TRUCK_WIDTH
            }
        }
    }

    /// Height of the top of the collision box
    pub fn height(&self) -> f32 {
        match self {
            ObstacleKind::DogHouse => DOG_HOUSE_HEIGHT,
            ObstacleKind::Dog => DOG_HEIGHT,
            ObstacleKind::CatCatcherTruck => CATCHER_TRUCK_ROOF,
            ObstacleKind::TallTruck => TALL_TRUCK_ROOF,
            ObstacleKind::RampTruck(ramp) => ramp.roof_height,
        }
    }

    /// Total longitudinal length
    pub fn length(&self) -> f32 {
        match self {
            ObstacleKind::DogHouse => DOG_HOUSE_WIDTH,
            ObstacleKind::Dog => 1.4,
            ObstacleKind::CatCatcherTruck => CATCHER_TRUCK_LENGTH,
            ObstacleKind::TallTruck => TALL_TRUCK_LENGTH,
            ObstacleKind::RampTruck(ramp) => ramp.total_length(),
        }
    }

    /// Flat-roofed trucks that can be stood on after arriving from a ramp
    pub fn is_box_truck(&self) -> bool {
        matches!(self, ObstacleKind::CatCatcherTruck | ObstacleKind::TallTruck)
    }

    pub fn name(&self) -> &'static str {
        match self {
            ObstacleKind::DogHouse => "dog house",
            ObstacleKind::Dog => "dog",
            ObstacleKind::CatCatcherTruck => "cat catcher truck",
            ObstacleKind::TallTruck => "tall truck",
            ObstacleKind::RampTruck(_) => "ramp truck",
        }
    }
}

/// An obstacle scrolling toward the player
///
/// `z` is the obstacle's center, except for ramp trucks where it marks the
/// foot of the ramp (the end that reaches the player first).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Obstacle {
    pub id: u32,
    pub lane: Lane,
    pub z: f32,
    pub kind: ObstacleKind,
}

impl Obstacle {
    /// Longitudinal extent as `(back, front)`; front has the larger z
    pub fn extent(&self) -> (f32, f32) {
        match self.kind {
            ObstacleKind::RampTruck(ramp) => (self.z - ramp.total_length(), self.z),
            kind => {
                let half = kind.length() / 2.0;
                (self.z - half, self.z + half)
            }
        }
    }

    /// Span tested against the collision band: small obstacles by their
    /// center, trucks by their whole length
    pub fn band_span(&self) -> (f32, f32) {
        match self.kind {
            ObstacleKind::DogHouse | ObstacleKind::Dog => (self.z, self.z),
            _ => self.extent(),
        }
    }

    /// Whether the longitudinal slot `z` lies on this obstacle
    pub fn covers(&self, z: f32) -> bool {
        let (back, front) = self.extent();
        z >= back && z <= front
    }

    /// Walkable height at world coordinate `z`, ignoring whether the surface
    /// is reachable. `None` when `z` is off the obstacle.
    pub fn surface_height_at(&self, z: f32) -> Option<f32> {
        if !self.covers(z) {
            return None;
        }
        match self.kind {
            ObstacleKind::RampTruck(ramp) => Some(ramp.height_along(self.z - z)),
            kind => Some(kind.height()),
        }
    }
}

/// A fish collectible
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Fish {
    pub id: u32,
    pub lane: Lane,
    pub z: f32,
    /// Height above the ground
    pub vertical_offset: f32,
}

/// The dog chasing the player
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Chaser {
    pub lateral: f32,
    /// Distance behind the player
    pub distance: f32,
    pub visible: bool,
    /// Seconds since the run started
    pub chase_time: f32,
}

impl Chaser {
    pub fn new(tuning: &ChaserTuning, lateral: f32) -> Self {
        Self {
            lateral,
            distance: tuning.base_distance,
            visible: true,
            chase_time: 0.0,
        }
    }

    /// Advance one tick. Returns true on the tick the chaser drops out of view.
    pub fn advance(&mut self, tuning: &ChaserTuning, player_lateral: f32, dt: f32) -> bool {
        if !self.visible {
            return false;
        }
        self.chase_time += dt;
        self.lateral = ease_toward(self.lateral, player_lateral, tuning.lateral_smoothing, dt);
        if self.chase_time > tuning.warmup {
            self.distance += tuning.recede_rate * dt;
        }
        if self.distance >= tuning.max_distance {
            self.visible = false;
            return true;
        }
        false
    }

    pub fn has_captured(&self, tuning: &ChaserTuning) -> bool {
        self.visible && self.distance <= tuning.capture_distance
    }
}

/// Live obstacles and fish, ordered by id
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct World {
    pub obstacles: Vec<Obstacle>,
    pub fish: Vec<Fish>,
    next_id: u32,
}

impl World {
    pub fn new() -> Self {
        Self {
            obstacles: Vec::new(),
            fish: Vec::new(),
            next_id: 1,
        }
    }

    /// Allocate a new entity ID
    pub fn next_entity_id(&mut self) -> u32 {
        let id = self.next_id;
        self.next_id += 1;
        id
    }

    pub fn add_obstacle(&mut self, lane: Lane, z: f32, kind: ObstacleKind) -> u32 {
        let id = self.next_entity_id();
        self.obstacles.push(Obstacle { id, lane, z, kind });
        id
    }

    pub fn add_fish(&mut self, lane: Lane, z: f32, vertical_offset: f32) -> u32 {
        let id = self.next_entity_id();
        self.fish.push(Fish {
            id,
            lane,
            z,
            vertical_offset,
        });
        id
    }

    /// Move everything toward the player and drop what has passed `despawn_z`
    pub fn scroll(&mut self, distance: f32, despawn_z: f32) {
        for obstacle in &mut self.obstacles {
            obstacle.z += distance;
        }
        for fish in &mut self.fish {
            fish.z += distance;
        }
        self.obstacles.retain(|o| o.extent().0 <= despawn_z);
        self.fish.retain(|f| f.z <= despawn_z);
    }

    /// Remove a fish by id; false if it is already gone
    pub fn take_fish(&mut self, id: u32) -> bool {
        let before = self.fish.len();
        self.fish.retain(|f| f.id != id);
        self.fish.len() != before
    }
}

impl Default for World {
    fn default() -> Self {
        Self::new()
    }
}

/// Why a run ended
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum GameOverCause {
    Collision { obstacle_id: u32, kind: ObstacleKind },
    Captured,
}

/// Notifications for the presenter, drained once per frame
#[derive(Debug, Clone, PartialEq, Serialize)]
pub enum GameEvent {
    PhaseChanged { from: GamePhase, to: GamePhase },
    IntroCaption(&'static str),
    Jumped,
    Slid,
    Landed { height: f32 },
    FishCollected { id: u32, total: u32 },
    ChaserLost,
    GameOver { cause: GameOverCause, score: u64, fish: u32 },
}
