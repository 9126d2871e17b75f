//! Demo autopilot
//!
//! Picks at most one intent per frame by looking at what is coming down the
//! lanes. Drives the headless demo; the game never needs it.

use super::lane::Lane;
use super::state::{GamePhase, Obstacle, ObstacleKind};
use super::tick::{Game, Intent};
use crate::consts::{PLAYER_Z, ROOF_TOLERANCE};

/// How far ahead obstacles and fish are considered
const LOOKAHEAD: f32 = 30.0;
/// Lead time before an obstacle enters the collision band
const REACTION_TIME: f32 = 0.15;

pub fn decide(game: &Game) -> Option<Intent> {
    match game.phase() {
        GamePhase::Ready => Some(Intent::StartGame),
        GamePhase::Playing => steer(game),
        GamePhase::Intro | GamePhase::GameOver => None,
    }
}

/// Nearest obstacle in `lane` that would still end the run
fn threat_in(game: &Game, lane: Lane) -> Option<&Obstacle> {
    let player = game.player();
    game.world()
        .obstacles
        .iter()
        .filter(|o| o.lane == lane && !matches!(o.kind, ObstacleKind::RampTruck(_)))
        .filter(|o| {
            let (back, front) = o.extent();
            back <= PLAYER_Z && front > PLAYER_Z - LOOKAHEAD
        })
        // Already riding above it
        .filter(|o| !(player.was_on_elevated && player.vertical + ROOF_TOLERANCE >= o.kind.height()))
        .max_by(|a, b| a.extent().1.total_cmp(&b.extent().1))
}

fn steer(game: &Game) -> Option<Intent> {
    let player = game.player();
    let lane = player.target_lane;
    let Some(threat) = threat_in(game, lane) else {
        return seek_fish(game);
    };

    for (candidate, intent) in [(lane.left(), Intent::MoveLeft), (lane.right(), Intent::MoveRight)] {
        if candidate != lane && threat_in(game, candidate).is_none() {
            return Some(intent);
        }
    }

    // Boxed in: time a jump or slide against the band edge
    let (_, front) = threat.band_span();
    let trigger = PLAYER_Z - game.config().collision_band - game.speed() * REACTION_TIME;
    if front < trigger {
        return None;
    }
    match threat.kind {
        ObstacleKind::DogHouse | ObstacleKind::Dog => (!player.is_jumping).then_some(Intent::Jump),
        ObstacleKind::CatCatcherTruck => (!player.is_sliding).then_some(Intent::Slide),
        ObstacleKind::TallTruck | ObstacleKind::RampTruck(_) => None,
    }
}

fn seek_fish(game: &Game) -> Option<Intent> {
    let lane = game.player().target_lane;
    let fish = game
        .world()
        .fish
        .iter()
        .filter(|f| f.z < PLAYER_Z && f.z > PLAYER_Z - LOOKAHEAD)
        .max_by(|a, b| a.z.total_cmp(&b.z))?;

    let (candidate, intent) = match fish.lane.index().cmp(&lane.index()) {
        std::cmp::Ordering::Less => (lane.left(), Intent::MoveLeft),
        std::cmp::Ordering::Greater => (lane.right(), Intent::MoveRight),
        std::cmp::Ordering::Equal => return None,
    };
    threat_in(game, candidate).is_none().then_some(intent)
}
