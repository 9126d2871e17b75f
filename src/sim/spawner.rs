//! Obstacle and fish spawner
//!
//! Fires one spawn event every `min_obstacle_gap` units of scroll. An event
//! blocks one or two lanes (never three) at the spawn slot, may drop a fish
//! in a free lane, and a ramp truck may bring a cluster of tall trucks
//! further out that can be reached by jumping off its roof.

use rand::Rng;

use super::lane::{LANE_COUNT, Lane};
use super::state::{ObstacleKind, Ramp, World};
use crate::consts::*;
use crate::tuning::{SimConfig, SpawnWeights};

/// Free track kept between the back of one event and the front of the next
pub const EVENT_CLEARANCE: f32 = 6.0;
/// Gap between trucks lined up in one lane
pub const TRUCK_LINE_GAP: f32 = 1.0;
/// Gap range between a ramp roof and the tall trucks behind it
const CLUSTER_GAP_MIN: f32 = 2.0;
const CLUSTER_GAP_MAX: f32 = 6.0;
const MAX_ATTACHED_FISH: usize = 3;

/// Layout of the tall trucks that can follow a ramp
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ClusterPattern {
    /// One truck in a random lane
    Single,
    /// Two trucks side by side
    Pair,
    /// Two or three trucks one behind the other
    Line(usize),
}

/// What a spawn event produced
#[derive(Debug, Clone, Default)]
pub struct SpawnEvent {
    /// Lanes blocked at the spawn slot
    pub blocked: Vec<Lane>,
    pub obstacles: Vec<u32>,
    pub fish: Vec<u32>,
    pub cluster: Option<ClusterPattern>,
    /// Distance from the spawn slot to the back of the furthest entity
    pub footprint: f32,
}

/// Distance accumulator driving spawn events
#[derive(Debug, Clone, Default)]
pub struct Spawner {
    accumulator: f32,
}

impl Spawner {
    pub fn new() -> Self {
        Self { accumulator: 0.0 }
    }

    /// Scroll distance accumulated since the last event
    pub fn accumulated(&self) -> f32 {
        self.accumulator
    }

    /// Add scrolled distance; fires an event once the gap is covered
    pub fn advance(
        &mut self,
        distance: f32,
        world: &mut World,
        rng: &mut impl Rng,
        config: &SimConfig,
        speed: f32,
    ) -> Option<SpawnEvent> {
        self.accumulator += distance;
        if self.accumulator < config.min_obstacle_gap {
            return None;
        }
        let event = spawn_event(world, rng, config, speed);
        // Long events hold the next one back until they have scrolled clear
        let excess = event.footprint + EVENT_CLEARANCE - config.min_obstacle_gap;
        self.accumulator = -excess.max(0.0);
        log::debug!(
            "Spawn event: blocked {:?}, {} obstacles, {} fish, cluster {:?}",
            event.blocked.iter().map(|l| l.index()).collect::<Vec<_>>(),
            event.obstacles.len(),
            event.fish.len(),
            event.cluster
        );
        Some(event)
    }
}

/// Obstacle outcome of a weighted draw
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Draw {
    CatCatcherTruck,
    RampTruck,
    DogHouse,
    Dog,
}

/// Weighted obstacle draw; without ramps the other weights renormalize
fn draw_obstacle(rng: &mut impl Rng, weights: &SpawnWeights, allow_ramp: bool) -> Option<Draw> {
    let table = [
        (Draw::CatCatcherTruck, weights.catcher_truck),
        (Draw::RampTruck, if allow_ramp { weights.ramp_truck } else { 0.0 }),
        (Draw::DogHouse, weights.dog_house),
        (Draw::Dog, weights.dog),
    ];
    let total: f32 = table.iter().map(|(_, w)| w).sum();
    if total <= 0.0 {
        return None;
    }
    let mut roll = rng.random::<f32>() * total;
    for (draw, weight) in table {
        if weight > 0.0 && roll < weight {
            return Some(draw);
        }
        roll -= weight;
    }
    // Rounding can leave the roll a hair past the last bucket
    table.iter().rev().find(|(_, w)| *w > 0.0).map(|(d, _)| *d)
}

fn random_ramp(rng: &mut impl Rng) -> Ramp {
    let ramp_length = rng.random_range(RAMP_LENGTH_MIN..=RAMP_LENGTH_MAX);
    let roof_length = rng.random_range(RAMP_ROOF_LENGTH_MIN..=RAMP_ROOF_LENGTH_MAX);
    let slope = rng.random_range(RAMP_SLOPE_MIN..=RAMP_SLOPE_MAX);
    Ramp {
        ramp_length,
        roof_length,
        roof_height: ramp_length * slope,
    }
}

/// Build one spawn event at `config.spawn_z`
pub fn spawn_event(world: &mut World, rng: &mut impl Rng, config: &SimConfig, speed: f32) -> SpawnEvent {
    let spawn_z = config.spawn_z;
    let mut event = SpawnEvent::default();
    let mut back = spawn_z;

    let count = if rng.random_bool(config.spawn.double_block_chance as f64) {
        2
    } else {
        1
    };
    let mut free: Vec<Lane> = Lane::ALL.to_vec();

    for i in 0..count.min(LANE_COUNT - 1) {
        // A ramp claims the whole slot, so it can only be the first draw
        let Some(draw) = draw_obstacle(rng, &config.spawn, i == 0) else {
            break;
        };
        let lane = free.remove(rng.random_range(0..free.len()));
        event.blocked.push(lane);

        match draw {
            Draw::DogHouse => event.obstacles.push(world.add_obstacle(lane, spawn_z, ObstacleKind::DogHouse)),
            Draw::Dog => event.obstacles.push(world.add_obstacle(lane, spawn_z, ObstacleKind::Dog)),
            Draw::CatCatcherTruck => {
                let z = spawn_z - CATCHER_TRUCK_LENGTH / 2.0;
                back = back.min(spawn_z - CATCHER_TRUCK_LENGTH);
                event
                    .obstacles
                    .push(world.add_obstacle(lane, z, ObstacleKind::CatCatcherTruck));
            }
            Draw::RampTruck => {
                let ramp = random_ramp(rng);
                event
                    .obstacles
                    .push(world.add_obstacle(lane, spawn_z, ObstacleKind::RampTruck(ramp)));
                let roof_end = spawn_z - ramp.total_length();
                back = back.min(roof_end);

                let fish_count = rng.random_range(0..=MAX_ATTACHED_FISH);
                for k in 0..fish_count {
                    let along = ramp.total_length() * (k + 1) as f32 / (fish_count + 1) as f32;
                    let height = ramp.height_along(along) + FISH_HOVER;
                    event.fish.push(world.add_fish(lane, spawn_z - along, height));
                }

                if rng.random_bool(config.spawn.tall_cluster_chance as f64) {
                    let (pattern, cluster_back) = spawn_tall_cluster(world, rng, config, speed, roof_end, &mut event);
                    event.cluster = Some(pattern);
                    back = back.min(cluster_back);
                }
                break;
            }
        }
    }

    if !free.is_empty() && rng.random_bool(config.spawn.fish_chance as f64) {
        let lane = free[rng.random_range(0..free.len())];
        let z = spawn_z - FISH_SLOT_OFFSET;
        back = back.min(z);
        event.fish.push(world.add_fish(lane, z, FISH_HOVER));
    }

    event.footprint = spawn_z - back;
    event
}

/// Place tall trucks behind a ramp roof ending at `roof_end`. Returns the
/// pattern used and the back edge of the cluster.
fn spawn_tall_cluster(
    world: &mut World,
    rng: &mut impl Rng,
    config: &SimConfig,
    speed: f32,
    roof_end: f32,
    event: &mut SpawnEvent,
) -> (ClusterPattern, f32) {
    // Keep the gap well inside the distance covered by one jump
    let reach = speed * config.jump_airtime();
    let max_gap = (reach * 0.5).clamp(CLUSTER_GAP_MIN, CLUSTER_GAP_MAX);
    let gap = if max_gap > CLUSTER_GAP_MIN {
        rng.random_range(CLUSTER_GAP_MIN..max_gap)
    } else {
        CLUSTER_GAP_MIN
    };
    let front = roof_end - gap;
    let first_z = front - TALL_TRUCK_LENGTH / 2.0;

    let mut placed: Vec<(Lane, f32)> = Vec::with_capacity(3);
    let pattern = match rng.random_range(0..3) {
        0 => {
            placed.push((Lane::ALL[rng.random_range(0..LANE_COUNT)], first_z));
            ClusterPattern::Single
        }
        1 => {
            let mut lanes = Lane::ALL.to_vec();
            let a = lanes.remove(rng.random_range(0..lanes.len()));
            let b = lanes.remove(rng.random_range(0..lanes.len()));
            placed.push((a, first_z));
            placed.push((b, first_z));
            ClusterPattern::Pair
        }
        _ => {
            let lane = Lane::ALL[rng.random_range(0..LANE_COUNT)];
            let n = rng.random_range(2..=3);
            for k in 0..n {
                placed.push((lane, first_z - k as f32 * (TALL_TRUCK_LENGTH + TRUCK_LINE_GAP)));
            }
            ClusterPattern::Line(n)
        }
    };

    let mut back = front;
    for &(lane, z) in &placed {
        event
            .obstacles
            .push(world.add_obstacle(lane, z, ObstacleKind::TallTruck));
        back = back.min(z - TALL_TRUCK_LENGTH / 2.0);
    }

    // Fish spread over the roofs, round-robin across trucks
    let fish_count = rng.random_range(0..=MAX_ATTACHED_FISH);
    for k in 0..fish_count {
        let (lane, z) = placed[k % placed.len()];
        let offset = (k / placed.len()) as f32 * 2.0 - 2.0;
        event
            .fish
            .push(world.add_fish(lane, z + offset, TALL_TRUCK_ROOF + FISH_HOVER));
    }

    (pattern, back)
}
