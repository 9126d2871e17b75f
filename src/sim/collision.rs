//! Collision & support resolution
//!
//! Runs once per tick before the player is integrated. Produces the support
//! height under the player, the fish picked up this tick and, if the run
//! ends, why. Resolution only reads state; the game loop applies the result.

use glam::Vec3;
use serde::Serialize;

use super::lane::LaneTable;
use super::player::PlayerState;
use super::state::{Chaser, GameOverCause, Obstacle, ObstacleKind, World};
use crate::consts::*;
use crate::tuning::SimConfig;

/// Axis-aligned box: x lateral, y up, z longitudinal
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Aabb {
    pub min: Vec3,
    pub max: Vec3,
}

impl Aabb {
    pub fn from_center(center: Vec3, half_extents: Vec3) -> Self {
        Self {
            min: center - half_extents,
            max: center + half_extents,
        }
    }

    pub fn expand(&self, amount: f32) -> Self {
        Self {
            min: self.min - Vec3::splat(amount),
            max: self.max + Vec3::splat(amount),
        }
    }

    pub fn intersects(&self, other: &Aabb) -> bool {
        self.min.cmplt(other.max).all() && other.min.cmplt(self.max).all()
    }

    /// Overlap in x and y only; z is gated separately by the collision band
    pub fn intersects_xy(&self, other: &Aabb) -> bool {
        self.min.x < other.max.x
            && other.min.x < self.max.x
            && self.min.y < other.max.y
            && other.min.y < self.max.y
    }
}

/// Ground under the player for one tick
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Support {
    pub height: f32,
    /// Player is over a ramp truck (slope or roof)
    pub on_ramp: bool,
}

impl Support {
    pub fn ground() -> Self {
        Self {
            height: 0.0,
            on_ramp: false,
        }
    }
}

/// Outcome of one resolver pass
#[derive(Debug, Clone, PartialEq)]
pub struct Resolution {
    pub support: Support,
    /// Fish ids touched this tick
    pub pickups: Vec<u32>,
    pub fatal: Option<GameOverCause>,
}

/// Player collision box, inset on every side
pub fn player_box(player: &PlayerState) -> Aabb {
    let min = Vec3::new(
        player.lateral - PLAYER_WIDTH / 2.0,
        player.vertical,
        PLAYER_Z - PLAYER_LENGTH / 2.0,
    );
    let max = Vec3::new(
        player.lateral + PLAYER_WIDTH / 2.0,
        player.vertical + player.profile_height(),
        PLAYER_Z + PLAYER_LENGTH / 2.0,
    );
    Aabb { min, max }.expand(-PLAYER_BOX_INSET)
}

pub fn obstacle_box(obstacle: &Obstacle, lanes: &LaneTable) -> Aabb {
    let x = lanes.offset(obstacle.lane);
    let half_width = obstacle.kind.width() / 2.0;
    let (back, front) = obstacle.extent();
    Aabb {
        min: Vec3::new(x - half_width, 0.0, back),
        max: Vec3::new(x + half_width, obstacle.kind.height(), front),
    }
}

/// Highest surface under the player in its target lane
pub fn resolve_support(player: &PlayerState, world: &World) -> Support {
    let mut support = Support::ground();
    for obstacle in world.obstacles.iter().filter(|o| o.lane == player.target_lane) {
        let candidate = match obstacle.kind {
            ObstacleKind::RampTruck(_) => {
                let height = obstacle.surface_height_at(PLAYER_Z);
                if height.is_some() {
                    support.on_ramp = true;
                }
                height
            }
            // Box trucks only carry a player who came over from a ramp and
            // is already level with the roof
            ObstacleKind::CatCatcherTruck | ObstacleKind::TallTruck => {
                if on_roof(player, obstacle.kind.height()) {
                    obstacle.surface_height_at(PLAYER_Z)
                } else {
                    None
                }
            }
            ObstacleKind::DogHouse | ObstacleKind::Dog => None,
        };
        if let Some(height) = candidate {
            support.height = support.height.max(height);
        }
    }
    support
}

/// Arrived from a ramp and within landing tolerance of `roof`
fn on_roof(player: &PlayerState, roof: f32) -> bool {
    player.was_on_elevated && player.vertical + ROOF_TOLERANCE >= roof
}

/// Whether the player survives overlapping `obstacle`
fn passes(player: &PlayerState, kind: &ObstacleKind) -> bool {
    match kind {
        ObstacleKind::DogHouse => player.is_jumping && player.vertical >= DOG_HOUSE_CLEARANCE,
        ObstacleKind::Dog => false,
        ObstacleKind::CatCatcherTruck => player.is_sliding || on_roof(player, CATCHER_TRUCK_ROOF),
        ObstacleKind::TallTruck => on_roof(player, TALL_TRUCK_ROOF),
        ObstacleKind::RampTruck(_) => true,
    }
}

/// First obstacle inside the collision band that ends the run
pub fn find_fatal_obstacle<'a>(
    player: &PlayerState,
    world: &'a World,
    lanes: &LaneTable,
    band: f32,
) -> Option<&'a Obstacle> {
    let body = player_box(player);
    world.obstacles.iter().find(|obstacle| {
        if matches!(obstacle.kind, ObstacleKind::RampTruck(_)) {
            return false;
        }
        // Trucks are cleared once their back edge is behind the player
        if obstacle.kind.is_box_truck() && obstacle.extent().0 > PLAYER_Z {
            return false;
        }
        let (back, front) = obstacle.band_span();
        let in_band = back < PLAYER_Z + band && front > PLAYER_Z - band;
        in_band
            && body.intersects_xy(&obstacle_box(obstacle, lanes))
            && !passes(player, &obstacle.kind)
    })
}

/// Fish whose expanded bounds touch the player
pub fn find_pickups(player: &PlayerState, world: &World, lanes: &LaneTable, band: f32) -> Vec<u32> {
    let body = player_box(player);
    let (hx, hy, hz) = FISH_HALF_EXTENTS;
    world
        .fish
        .iter()
        .filter(|fish| (fish.z - PLAYER_Z).abs() < band)
        .filter(|fish| {
            let center = Vec3::new(lanes.offset(fish.lane), fish.vertical_offset, fish.z);
            Aabb::from_center(center, Vec3::new(hx, hy, hz))
                .expand(FISH_PICKUP_EXPAND)
                .intersects(&body)
        })
        .map(|fish| fish.id)
        .collect()
}

/// Full resolver pass. The first fatal condition wins; an obstacle death
/// also suppresses pickups for the tick.
pub fn resolve(
    player: &PlayerState,
    world: &World,
    chaser: &Chaser,
    config: &SimConfig,
    lanes: &LaneTable,
) -> Resolution {
    let support = resolve_support(player, world);

    if let Some(obstacle) = find_fatal_obstacle(player, world, lanes, config.collision_band) {
        return Resolution {
            support,
            pickups: Vec::new(),
            fatal: Some(GameOverCause::Collision {
                obstacle_id: obstacle.id,
                kind: obstacle.kind,
            }),
        };
    }

    let pickups = find_pickups(player, world, lanes, config.collision_band);
    let fatal = chaser
        .has_captured(&config.chaser)
        .then_some(GameOverCause::Captured);

    Resolution {
        support,
        pickups,
        fatal,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::lane::Lane;
    use crate::sim::state::Ramp;
    use proptest::prelude::*;

    fn setup() -> (SimConfig, LaneTable, PlayerState, World) {
        let config = SimConfig::default();
        let lanes = LaneTable::new(config.lanes);
        let player = PlayerState::new(&lanes);
        (config, lanes, player, World::new())
    }

    fn ramp_kind() -> ObstacleKind {
        ObstacleKind::RampTruck(Ramp {
            ramp_length: 8.0,
            roof_length: 10.0,
            roof_height: 2.4,
        })
    }

    #[test]
    fn test_aabb_intersection() {
        let a = Aabb::from_center(Vec3::ZERO, Vec3::ONE);
        let b = Aabb::from_center(Vec3::new(1.5, 0.0, 0.0), Vec3::ONE);
        let c = Aabb::from_center(Vec3::new(2.5, 0.0, 0.0), Vec3::ONE);
        assert!(a.intersects(&b));
        assert!(!a.intersects(&c));
        assert!(a.expand(0.6).intersects(&c));
        let far_z = Aabb::from_center(Vec3::new(0.0, 0.0, 10.0), Vec3::ONE);
        assert!(!a.intersects(&far_z));
        assert!(a.intersects_xy(&far_z));
    }

    #[test]
    fn test_support_on_ramp_slope_and_roof() {
        let (_, _, player, mut world) = setup();
        world.add_obstacle(Lane::CENTER, 4.0, ramp_kind());
        let support = resolve_support(&player, &world);
        assert!(support.on_ramp);
        assert!((support.height - 1.2).abs() < 1e-5);

        world.obstacles[0].z = 12.0;
        let support = resolve_support(&player, &world);
        assert_eq!(support.height, 2.4);

        // Other lanes never support
        world.obstacles[0].lane = Lane::LEFT;
        assert_eq!(resolve_support(&player, &world), Support::ground());
    }

    #[test]
    fn test_box_truck_roof_needs_elevated_memory() {
        let (_, _, mut player, mut world) = setup();
        world.add_obstacle(Lane::CENTER, 0.0, ObstacleKind::TallTruck);
        player.vertical = TALL_TRUCK_ROOF;
        assert_eq!(resolve_support(&player, &world).height, 0.0);
        player.was_on_elevated = true;
        assert_eq!(resolve_support(&player, &world).height, TALL_TRUCK_ROOF);
    }

    #[test]
    fn test_box_truck_roof_not_reachable_from_below() {
        let (_, _, mut player, mut world) = setup();
        world.add_obstacle(Lane::CENTER, 0.0, ObstacleKind::CatCatcherTruck);
        player.was_on_elevated = true;
        player.is_jumping = true;
        player.vertical = 0.6;
        assert_eq!(resolve_support(&player, &world), Support::ground());
        // Within landing tolerance of the roof
        player.vertical = CATCHER_TRUCK_ROOF - ROOF_TOLERANCE;
        assert_eq!(resolve_support(&player, &world).height, CATCHER_TRUCK_ROOF);
    }

    #[test]
    fn test_support_takes_highest_candidate() {
        let (_, _, mut player, mut world) = setup();
        player.was_on_elevated = true;
        player.vertical = TALL_TRUCK_ROOF;
        world.add_obstacle(Lane::CENTER, 0.0, ObstacleKind::CatCatcherTruck);
        world.add_obstacle(Lane::CENTER, 1.0, ObstacleKind::TallTruck);
        world.add_obstacle(Lane::CENTER, 0.0, ObstacleKind::Dog);
        assert_eq!(resolve_support(&player, &world).height, TALL_TRUCK_ROOF);
    }

    #[test]
    fn test_dog_house_needs_airborne_clearance() {
        let (config, lanes, mut player, mut world) = setup();
        world.add_obstacle(Lane::CENTER, 0.5, ObstacleKind::DogHouse);

        player.vertical = 1.6;
        player.is_jumping = true;
        assert!(find_fatal_obstacle(&player, &world, &lanes, config.collision_band).is_none());

        // Same height while standing on something is still a crash
        player.is_jumping = false;
        assert!(find_fatal_obstacle(&player, &world, &lanes, config.collision_band).is_some());

        player.is_jumping = true;
        player.vertical = 1.0;
        assert!(find_fatal_obstacle(&player, &world, &lanes, config.collision_band).is_some());
    }

    #[test]
    fn test_dog_always_fatal_on_overlap() {
        let (config, lanes, mut player, mut world) = setup();
        world.add_obstacle(Lane::CENTER, 0.0, ObstacleKind::Dog);
        player.is_sliding = true;
        assert!(find_fatal_obstacle(&player, &world, &lanes, config.collision_band).is_some());
        player.is_sliding = false;
        player.is_jumping = true;
        player.vertical = 0.5;
        assert!(find_fatal_obstacle(&player, &world, &lanes, config.collision_band).is_some());
        // Clean over the top: no overlap at all
        player.vertical = 2.0;
        assert!(find_fatal_obstacle(&player, &world, &lanes, config.collision_band).is_none());
    }

    #[test]
    fn test_catcher_truck_slide_under_or_ride_on_top() {
        let (config, lanes, mut player, mut world) = setup();
        world.add_obstacle(Lane::CENTER, 0.0, ObstacleKind::CatCatcherTruck);
        assert!(find_fatal_obstacle(&player, &world, &lanes, config.collision_band).is_some());

        player.is_sliding = true;
        assert!(find_fatal_obstacle(&player, &world, &lanes, config.collision_band).is_none());

        player.is_sliding = false;
        player.was_on_elevated = true;
        player.vertical = CATCHER_TRUCK_ROOF;
        assert!(find_fatal_obstacle(&player, &world, &lanes, config.collision_band).is_none());
    }

    #[test]
    fn test_tall_truck_sliding_does_not_help() {
        let (config, lanes, mut player, mut world) = setup();
        world.add_obstacle(Lane::CENTER, 2.0, ObstacleKind::TallTruck);
        player.is_sliding = true;
        assert!(find_fatal_obstacle(&player, &world, &lanes, config.collision_band).is_some());
    }

    #[test]
    fn test_ramp_truck_never_fatal() {
        let (config, lanes, player, mut world) = setup();
        world.add_obstacle(Lane::CENTER, 3.0, ramp_kind());
        assert!(find_fatal_obstacle(&player, &world, &lanes, config.collision_band).is_none());
    }

    #[test]
    fn test_adjacent_lane_does_not_collide() {
        let (config, lanes, player, mut world) = setup();
        world.add_obstacle(Lane::LEFT, 0.0, ObstacleKind::DogHouse);
        world.add_obstacle(Lane::RIGHT, 0.0, ObstacleKind::TallTruck);
        assert!(find_fatal_obstacle(&player, &world, &lanes, config.collision_band).is_none());
    }

    #[test]
    fn test_band_edges_for_small_obstacles() {
        let (config, lanes, player, mut world) = setup();
        world.add_obstacle(Lane::CENTER, -2.0, ObstacleKind::Dog);
        assert!(find_fatal_obstacle(&player, &world, &lanes, config.collision_band).is_none());
        world.obstacles[0].z = -1.99;
        assert!(find_fatal_obstacle(&player, &world, &lanes, config.collision_band).is_some());
        world.obstacles[0].z = 2.0;
        assert!(find_fatal_obstacle(&player, &world, &lanes, config.collision_band).is_none());
    }

    #[test]
    fn test_dropping_off_a_passed_truck_is_safe() {
        let (config, lanes, mut player, mut world) = setup();
        world.add_obstacle(Lane::CENTER, TALL_TRUCK_LENGTH / 2.0 + 0.5, ObstacleKind::TallTruck);
        player.was_on_elevated = true;
        player.is_jumping = true;
        player.vertical = 1.0;
        assert!(find_fatal_obstacle(&player, &world, &lanes, config.collision_band).is_none());
        world.obstacles[0].z -= 1.0;
        assert!(find_fatal_obstacle(&player, &world, &lanes, config.collision_band).is_some());
    }

    #[test]
    fn test_moving_into_neighbour_lane_hits_small_obstacles() {
        let (config, lanes, mut player, mut world) = setup();
        world.add_obstacle(Lane::RIGHT, 1.0, ObstacleKind::Dog);
        world.add_obstacle(Lane::LEFT, 1.5, ObstacleKind::DogHouse);
        assert!(find_fatal_obstacle(&player, &world, &lanes, config.collision_band).is_none());

        // Mid lane change, before the target lane is reached
        player.target_lane = Lane::RIGHT;
        player.lateral = 2.5;
        let hit = find_fatal_obstacle(&player, &world, &lanes, config.collision_band);
        assert_eq!(hit.map(|o| o.kind), Some(ObstacleKind::Dog));

        player.target_lane = Lane::LEFT;
        player.lateral = -2.0;
        let hit = find_fatal_obstacle(&player, &world, &lanes, config.collision_band);
        assert_eq!(hit.map(|o| o.kind), Some(ObstacleKind::DogHouse));
    }

    #[test]
    fn test_pickups_in_band_only() {
        let (config, lanes, player, mut world) = setup();
        let near = world.add_fish(Lane::CENTER, 0.5, FISH_HOVER);
        world.add_fish(Lane::CENTER, -5.0, FISH_HOVER);
        world.add_fish(Lane::RIGHT, 0.0, FISH_HOVER);
        // Roof fish far above the player's head
        world.add_fish(Lane::CENTER, 0.0, 4.5);
        assert_eq!(find_pickups(&player, &world, &lanes, config.collision_band), vec![near]);
    }

    #[test]
    fn test_resolve_obstacle_death_suppresses_pickups() {
        let (config, lanes, player, mut world) = setup();
        let chaser = Chaser::new(&config.chaser, 0.0);
        let dog = world.add_obstacle(Lane::CENTER, 0.0, ObstacleKind::Dog);
        world.add_fish(Lane::CENTER, 0.0, FISH_HOVER);
        let resolution = resolve(&player, &world, &chaser, &config, &lanes);
        assert!(resolution.pickups.is_empty());
        assert_eq!(
            resolution.fatal,
            Some(GameOverCause::Collision {
                obstacle_id: dog,
                kind: ObstacleKind::Dog
            })
        );
    }

    #[test]
    fn test_resolve_capture() {
        let (config, lanes, player, world) = setup();
        let mut chaser = Chaser::new(&config.chaser, 0.0);
        assert_eq!(resolve(&player, &world, &chaser, &config, &lanes).fatal, None);
        chaser.distance = config.chaser.capture_distance;
        assert_eq!(
            resolve(&player, &world, &chaser, &config, &lanes).fatal,
            Some(GameOverCause::Captured)
        );
    }

    proptest! {
        #[test]
        fn prop_ramp_height_monotonic(
            ramp_length in 8.0f32..10.0,
            slope in 0.28f32..0.3,
            a in 0.0f32..1.0,
            b in 0.0f32..1.0,
        ) {
            prop_assume!((a - b).abs() > 1e-3);
            let (lo, hi) = if a < b { (a, b) } else { (b, a) };
            let obstacle = Obstacle {
                id: 1,
                lane: Lane::CENTER,
                z: 0.0,
                kind: ObstacleKind::RampTruck(Ramp {
                    ramp_length,
                    roof_length: 10.0,
                    roof_height: ramp_length * slope,
                }),
            };
            // Further up the slope means a smaller z
            let near = obstacle.surface_height_at(-lo * ramp_length).unwrap();
            let far = obstacle.surface_height_at(-hi * ramp_length).unwrap();
            prop_assert!(far > near);
        }

        #[test]
        fn prop_tall_truck_fatal_unless_arrived_elevated(
            z in -2.0f32..2.0,
            vertical in 0.0f32..6.0,
            jumping: bool,
            sliding: bool,
        ) {
            let (config, lanes, mut player, mut world) = setup();
            world.add_obstacle(Lane::CENTER, z, ObstacleKind::TallTruck);
            player.vertical = vertical;
            player.is_jumping = jumping;
            player.is_sliding = sliding && !jumping;
            player.was_on_elevated = false;
            let overlapping = player_box(&player).intersects_xy(&obstacle_box(&world.obstacles[0], &lanes));
            let fatal = find_fatal_obstacle(&player, &world, &lanes, config.collision_band).is_some();
            prop_assert_eq!(fatal, overlapping);
            prop_assert_eq!(resolve_support(&player, &world).height, 0.0);
        }
    }
}
