//! Game balance and physics tuning
//!
//! Loaded once per run (JSON, missing fields fall back to defaults) and
//! never mutated while a run is in progress.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Errors raised while loading a tuning file
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to parse tuning JSON: {0}")]
    Parse(#[from] serde_json::Error),
    #[error("invalid tuning value `{field}`: {reason}")]
    Invalid {
        field: &'static str,
        reason: &'static str,
    },
}

/// Spawner probabilities
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SpawnWeights {
    /// Chance a spawn event blocks two lanes instead of one
    pub double_block_chance: f32,
    /// Relative obstacle weights
    pub catcher_truck: f32,
    pub ramp_truck: f32,
    pub dog_house: f32,
    pub dog: f32,
    /// Chance a ramp is followed by a tall truck cluster
    pub tall_cluster_chance: f32,
    /// Chance of a standalone fish in a free lane
    pub fish_chance: f32,
}

impl Default for SpawnWeights {
    fn default() -> Self {
        Self {
            double_block_chance: 0.3,
            catcher_truck: 0.12,
            ramp_truck: 0.15,
            dog_house: 0.36,
            dog: 0.37,
            tall_cluster_chance: 0.7,
            fish_chance: 0.7,
        }
    }
}

/// Chaser behaviour
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ChaserTuning {
    /// Distance behind the player when a run starts
    pub base_distance: f32,
    /// Seconds the chaser holds its distance before falling back
    pub warmup: f32,
    /// Units per second the chaser falls back after warm-up
    pub recede_rate: f32,
    /// Beyond this distance the chaser is hidden and stops moving
    pub max_distance: f32,
    /// At or below this distance the player is captured
    pub capture_distance: f32,
    /// Lateral easing rate toward the player
    pub lateral_smoothing: f32,
}

impl Default for ChaserTuning {
    fn default() -> Self {
        Self {
            base_distance: 8.0,
            warmup: 5.0,
            recede_rate: 3.0,
            max_distance: 30.0,
            capture_distance: 2.0,
            lateral_smoothing: 2.0,
        }
    }
}

/// Complete simulation tuning
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SimConfig {
    // === World speed ===
    /// World scroll speed at the start of a run
    pub start_speed: f32,
    /// Speed ceiling
    pub max_speed: f32,
    /// Speed gained per second
    pub speed_ramp: f32,

    // === Lanes ===
    /// Lateral coordinate of each lane, left to right
    pub lanes: [f32; 3],
    /// Lateral easing rate toward the target lane
    pub lateral_smoothing: f32,

    // === Vertical physics ===
    pub gravity: f32,
    pub jump_force: f32,
    /// Seconds a slide lasts
    pub slide_duration: f32,

    // === Spawning ===
    /// Longitudinal coordinate where entities appear
    pub spawn_z: f32,
    /// Entities are removed once fully past this coordinate
    pub despawn_z: f32,
    /// Scroll distance between spawn events
    pub min_obstacle_gap: f32,
    pub spawn: SpawnWeights,

    // === Collision ===
    /// Half width of the longitudinal band around the player that is checked
    pub collision_band: f32,

    // === Scoring ===
    pub score_rate: f32,
    pub fish_value: u64,

    pub chaser: ChaserTuning,

    /// Largest frame delta accepted by a single tick
    pub max_delta: f32,
}

impl Default for SimConfig {
    fn default() -> Self {
        Self {
            start_speed: 15.0,
            max_speed: 35.0,
            speed_ramp: 0.5,

            lanes: [-3.0, 0.0, 3.0],
            lateral_smoothing: 10.0,

            gravity: 30.0,
            jump_force: 12.0,
            slide_duration: 0.5,

            spawn_z: -80.0,
            despawn_z: 20.0,
            min_obstacle_gap: 30.0,
            spawn: SpawnWeights::default(),

            collision_band: 2.0,

            score_rate: 10.0,
            fish_value: 50,

            chaser: ChaserTuning::default(),

            max_delta: 1.0 / 15.0,
        }
    }
}

impl SimConfig {
    /// Parse a tuning file; absent fields keep their defaults
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        log::info!("Loaded tuning (speed {} -> {})", config.start_speed, config.max_speed);
        Ok(config)
    }

    /// Reject values the simulation cannot run with
    pub fn validate(&self) -> Result<(), ConfigError> {
        fn positive(field: &'static str, value: f32) -> Result<(), ConfigError> {
            if value.is_finite() && value > 0.0 {
                Ok(())
            } else {
                Err(ConfigError::Invalid {
                    field,
                    reason: "must be a positive number",
                })
            }
        }

        fn probability(field: &'static str, value: f32) -> Result<(), ConfigError> {
            if (0.0..=1.0).contains(&value) {
                Ok(())
            } else {
                Err(ConfigError::Invalid {
                    field,
                    reason: "must be within [0, 1]",
                })
            }
        }

        positive("start_speed", self.start_speed)?;
        positive("max_speed", self.max_speed)?;
        if self.max_speed < self.start_speed {
            return Err(ConfigError::Invalid {
                field: "max_speed",
                reason: "must not be below start_speed",
            });
        }
        if !(self.speed_ramp.is_finite() && self.speed_ramp >= 0.0) {
            return Err(ConfigError::Invalid {
                field: "speed_ramp",
                reason: "must be zero or positive",
            });
        }
        if !self.lanes.windows(2).all(|w| w[0] < w[1]) {
            return Err(ConfigError::Invalid {
                field: "lanes",
                reason: "must be strictly increasing",
            });
        }
        positive("lateral_smoothing", self.lateral_smoothing)?;
        positive("gravity", self.gravity)?;
        positive("jump_force", self.jump_force)?;
        positive("slide_duration", self.slide_duration)?;
        positive("min_obstacle_gap", self.min_obstacle_gap)?;
        positive("collision_band", self.collision_band)?;
        positive("max_delta", self.max_delta)?;
        if self.spawn_z >= crate::consts::PLAYER_Z || self.despawn_z <= crate::consts::PLAYER_Z {
            return Err(ConfigError::Invalid {
                field: "spawn_z",
                reason: "spawn must lie ahead of the player and despawn behind",
            });
        }

        let w = &self.spawn;
        probability("spawn.double_block_chance", w.double_block_chance)?;
        probability("spawn.tall_cluster_chance", w.tall_cluster_chance)?;
        probability("spawn.fish_chance", w.fish_chance)?;
        let weights = [w.catcher_truck, w.ramp_truck, w.dog_house, w.dog];
        if weights.iter().any(|x| !x.is_finite() || *x < 0.0) || weights.iter().sum::<f32>() <= 0.0 {
            return Err(ConfigError::Invalid {
                field: "spawn",
                reason: "obstacle weights must be non-negative and not all zero",
            });
        }

        let c = &self.chaser;
        positive("chaser.lateral_smoothing", c.lateral_smoothing)?;
        if !(c.capture_distance < c.base_distance && c.base_distance < c.max_distance) {
            return Err(ConfigError::Invalid {
                field: "chaser",
                reason: "requires capture_distance < base_distance < max_distance",
            });
        }
        let non_negative = |x: f32| x.is_finite() && x >= 0.0;
        if !(non_negative(c.warmup) && non_negative(c.recede_rate)) {
            return Err(ConfigError::Invalid {
                field: "chaser",
                reason: "warmup and recede_rate must not be negative",
            });
        }
        Ok(())
    }

    /// Seconds a jump from flat ground stays airborne
    #[inline]
    pub fn jump_airtime(&self) -> f32 {
        2.0 * self.jump_force / self.gravity
    }

    /// Apex height of a jump above its take-off surface
    #[inline]
    pub fn jump_apex(&self) -> f32 {
        self.jump_force * self.jump_force / (2.0 * self.gravity)
    }
}
