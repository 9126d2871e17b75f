//! Catway Surfers - an endless three-lane runner
//!
//! Core modules:
//! - `sim`: Deterministic simulation (kinematics, spawning, collisions, game loop)
//! - `tuning`: Data-driven game balance
//! - `web`: Browser entry point (wasm32 only)
//!
//! Rendering and input wiring live outside this crate: a presenter reads
//! [`sim::Snapshot`] and drains [`sim::GameEvent`]s every frame, and the
//! input layer translates device events into [`sim::Intent`]s.

pub mod sim;
pub mod tuning;
#[cfg(target_arch = "wasm32")]
pub mod web;

pub use sim::{Game, GameEvent, GamePhase, Intent, Snapshot};
pub use tuning::{ConfigError, SimConfig};

/// Fixed world geometry (sizes are in world units, heights measured from the ground)
pub mod consts {
    /// Longitudinal slot the player occupies; the world scrolls past it toward +z
    pub const PLAYER_Z: f32 = 0.0;

    /// Player collision box (standing)
    pub const PLAYER_WIDTH: f32 = 0.8;
    pub const PLAYER_HEIGHT: f32 = 1.0;
    pub const PLAYER_LENGTH: f32 = 1.6;
    /// Height multiplier while sliding (profile collapses to half)
    pub const SLIDE_HEIGHT_SCALE: f32 = 0.5;
    /// Player box is shrunk by this much on every side before obstacle checks
    pub const PLAYER_BOX_INSET: f32 = 0.2;

    /// Cosmetic run bob amplitude and frequency
    pub const RUN_BOB_AMPLITUDE: f32 = 0.1;
    pub const RUN_BOB_FREQUENCY: f32 = 15.0;
    /// Rising above support by more than this starts a fall
    pub const FALL_MARGIN: f32 = 0.3;
    /// Below this height on flat ground the player counts as grounded
    pub const GROUNDED_THRESHOLD: f32 = 0.15;
    /// Lateral distance at which the current lane catches up with the target
    pub const LANE_SETTLE_DISTANCE: f32 = 0.15;

    /// DogHouse: 2x2 box with a pointed roof
    pub const DOG_HOUSE_WIDTH: f32 = 2.0;
    pub const DOG_HOUSE_HEIGHT: f32 = 2.5;
    /// Minimum height an airborne player needs to clear a dog house
    pub const DOG_HOUSE_CLEARANCE: f32 = 1.5;

    pub const DOG_WIDTH: f32 = 0.9;
    pub const DOG_HEIGHT: f32 = 1.25;

    pub const TRUCK_WIDTH: f32 = 2.4;
    pub const CATCHER_TRUCK_LENGTH: f32 = 6.0;
    pub const CATCHER_TRUCK_ROOF: f32 = 2.0;
    pub const TALL_TRUCK_LENGTH: f32 = 7.0;
    pub const TALL_TRUCK_ROOF: f32 = 3.2;

    /// RampTruck geometry ranges (roof height = ramp length * slope)
    pub const RAMP_LENGTH_MIN: f32 = 8.0;
    pub const RAMP_LENGTH_MAX: f32 = 10.0;
    pub const RAMP_ROOF_LENGTH_MIN: f32 = 8.0;
    pub const RAMP_ROOF_LENGTH_MAX: f32 = 14.0;
    pub const RAMP_SLOPE_MIN: f32 = 0.28;
    pub const RAMP_SLOPE_MAX: f32 = 0.3;

    /// Roof heights are accepted this far below the roof (one tick of fall)
    pub const ROOF_TOLERANCE: f32 = 0.25;

    /// Fish: hovering height, half extents and pickup expansion
    pub const FISH_HOVER: f32 = 1.0;
    pub const FISH_HALF_EXTENTS: (f32, f32, f32) = (0.3, 0.18, 0.45);
    pub const FISH_PICKUP_EXPAND: f32 = 0.5;
    /// Standalone fish sit this far beyond the spawn slot
    pub const FISH_SLOT_OFFSET: f32 = 5.0;
}

/// Linear interpolation between `a` and `b`
#[inline]
pub fn lerp(a: f32, b: f32, t: f32) -> f32 {
    a + (b - a) * t
}

/// Exponential ease of `current` toward `target` (never overshoots for `rate * dt <= 1`)
#[inline]
pub fn ease_toward(current: f32, target: f32, rate: f32, dt: f32) -> f32 {
    current + (target - current) * (rate * dt).min(1.0)
}
