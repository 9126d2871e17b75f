//! Player kinematics
//!
//! Lateral easing between lanes, jump/slide transitions and vertical
//! integration against the support height resolved for the current tick.
//! Falling off an elevated edge is modelled as a jump with zero initial
//! velocity, so airborne motion has a single code path.

use serde::{Deserialize, Serialize};

use super::collision::Support;
use super::lane::{Lane, LaneTable};
use crate::consts::*;
use crate::ease_toward;
use crate::tuning::SimConfig;

/// Motion state of the player
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlayerState {
    pub current_lane: Lane,
    pub target_lane: Lane,
    /// Lateral world position, eased toward the target lane
    pub lateral: f32,
    /// Height of the player's feet above the ground
    pub vertical: f32,
    pub jump_velocity: f32,
    pub is_jumping: bool,
    pub is_sliding: bool,
    /// Set while on a ramp or roof; cleared only once back on flat ground
    pub was_on_elevated: bool,
    /// Seconds spent in the current slide
    pub slide_elapsed: f32,
    /// Support height resolved on the last tick
    pub support_height: f32,
}

impl PlayerState {
    pub fn new(lanes: &LaneTable) -> Self {
        Self {
            current_lane: Lane::CENTER,
            target_lane: Lane::CENTER,
            lateral: lanes.offset(Lane::CENTER),
            vertical: 0.0,
            jump_velocity: 0.0,
            is_jumping: false,
            is_sliding: false,
            was_on_elevated: false,
            slide_elapsed: 0.0,
            support_height: 0.0,
        }
    }

    pub fn move_left(&mut self) {
        self.target_lane = self.target_lane.left();
    }

    pub fn move_right(&mut self) {
        self.target_lane = self.target_lane.right();
    }

    /// Start a jump. Rejected while airborne; an active slide is cancelled.
    pub fn jump(&mut self, jump_force: f32) -> bool {
        if self.is_jumping {
            return false;
        }
        self.end_slide();
        self.is_jumping = true;
        self.jump_velocity = jump_force;
        true
    }

    /// Start a slide. Rejected while already sliding; a jump in progress is
    /// cancelled and the player drops straight onto the current support.
    pub fn slide(&mut self) -> bool {
        if self.is_sliding {
            return false;
        }
        if self.is_jumping {
            self.is_jumping = false;
            self.jump_velocity = 0.0;
            self.vertical = self.support_height;
        }
        self.is_sliding = true;
        self.slide_elapsed = 0.0;
        true
    }

    /// Drop all airborne, slide and elevation state, keeping position
    pub fn settle(&mut self) {
        self.end_slide();
        self.is_jumping = false;
        self.jump_velocity = 0.0;
        self.was_on_elevated = false;
    }

    fn end_slide(&mut self) {
        self.is_sliding = false;
        self.slide_elapsed = 0.0;
    }

    /// Height of the collision profile (collapsed while sliding)
    pub fn profile_height(&self) -> f32 {
        if self.is_sliding {
            PLAYER_HEIGHT * SLIDE_HEIGHT_SCALE
        } else {
            PLAYER_HEIGHT
        }
    }

    /// Advance one tick against `support`. Returns the landing height if the
    /// player touched down this tick.
    pub fn integrate(
        &mut self,
        support: &Support,
        config: &SimConfig,
        lanes: &LaneTable,
        time: f32,
        dt: f32,
    ) -> Option<f32> {
        // No sliding under a ramp
        if support.on_ramp && self.is_sliding {
            self.end_slide();
        }
        self.support_height = support.height;
        if support.height > 0.0 || support.on_ramp {
            self.was_on_elevated = true;
        }

        let target_x = lanes.offset(self.target_lane);
        self.lateral = ease_toward(self.lateral, target_x, config.lateral_smoothing, dt);
        self.current_lane = if (self.lateral - target_x).abs() < LANE_SETTLE_DISTANCE {
            self.target_lane
        } else {
            lanes.nearest(self.lateral)
        };

        if self.is_sliding {
            self.slide_elapsed += dt;
            if self.slide_elapsed >= config.slide_duration {
                self.end_slide();
            }
        }

        let mut landed = None;
        if self.is_jumping {
            self.jump_velocity -= config.gravity * dt;
            self.vertical += self.jump_velocity * dt;
            if self.vertical <= support.height {
                self.vertical = support.height;
                self.jump_velocity = 0.0;
                self.is_jumping = false;
                landed = Some(support.height);
            }
        } else if self.vertical > support.height + FALL_MARGIN {
            // Walked off an edge
            self.end_slide();
            self.is_jumping = true;
            self.jump_velocity = 0.0;
        } else if self.is_sliding {
            self.vertical = support.height;
        } else {
            self.vertical = support.height + run_bob(time);
        }

        if !self.is_jumping && !support.on_ramp && self.vertical < GROUNDED_THRESHOLD {
            self.was_on_elevated = false;
        }

        landed
    }
}

/// Cosmetic bounce while running
#[inline]
pub fn run_bob(time: f32) -> f32 {
    (time * RUN_BOB_FREQUENCY).sin().abs() * RUN_BOB_AMPLITUDE
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    const DT: f32 = 1.0 / 60.0;

    fn setup() -> (SimConfig, LaneTable, PlayerState) {
        let config = SimConfig::default();
        let lanes = LaneTable::new(config.lanes);
        let player = PlayerState::new(&lanes);
        (config, lanes, player)
    }

    fn flat(height: f32) -> Support {
        Support {
            height,
            on_ramp: false,
        }
    }

    #[test]
    fn test_jump_returns_to_ground_after_airtime() {
        let (config, lanes, mut player) = setup();
        assert!(player.jump(config.jump_force));
        assert!(!player.jump(config.jump_force));

        let mut t = 0.0;
        let mut apex: f32 = 0.0;
        loop {
            t += DT;
            let landed = player.integrate(&flat(0.0), &config, &lanes, t, DT);
            apex = apex.max(player.vertical);
            if landed.is_some() {
                break;
            }
            assert!(t < 2.0, "never landed");
        }
        // 2 * 12 / 30 = 0.8 s, within a tick of discretisation error
        assert!((t - config.jump_airtime()).abs() <= 2.0 * DT, "landed at {t}");
        assert!((apex - config.jump_apex()).abs() < 0.25, "apex {apex}");
        assert_eq!(player.vertical, 0.0);
        assert!(!player.is_jumping);
    }

    #[test]
    fn test_jump_cancels_slide() {
        let (config, _, mut player) = setup();
        assert!(player.slide());
        assert!(player.jump(config.jump_force));
        assert!(player.is_jumping);
        assert!(!player.is_sliding);
        assert_eq!(player.slide_elapsed, 0.0);
    }

    #[test]
    fn test_slide_cancels_jump_and_snaps_to_support() {
        let (config, lanes, mut player) = setup();
        player.integrate(&flat(1.5), &config, &lanes, 0.0, DT);
        player.jump(config.jump_force);
        for i in 0..10 {
            player.integrate(&flat(1.5), &config, &lanes, i as f32 * DT, DT);
        }
        assert!(player.vertical > 2.0);

        assert!(player.slide());
        assert!(!player.is_jumping);
        assert!(player.is_sliding);
        assert_eq!(player.vertical, 1.5);
        assert_eq!(player.jump_velocity, 0.0);
        assert!(!player.slide());
    }

    #[test]
    fn test_slide_auto_ends_and_restarts() {
        let (config, lanes, mut player) = setup();
        // Power-of-two step keeps the elapsed sum exact
        let dt = 1.0 / 64.0;
        player.slide();
        for i in 0..31 {
            player.integrate(&flat(0.0), &config, &lanes, i as f32 * dt, dt);
            assert!(player.is_sliding);
            assert_eq!(player.vertical, 0.0);
        }
        player.integrate(&flat(0.0), &config, &lanes, 0.5, dt);
        assert!(!player.is_sliding);

        // A fresh slide gets the full duration again
        assert!(player.slide());
        player.integrate(&flat(0.0), &config, &lanes, 0.6, dt);
        assert!(player.is_sliding);
        assert_eq!(player.slide_elapsed, dt);
    }

    #[test]
    fn test_ramp_cancels_slide() {
        let (config, lanes, mut player) = setup();
        player.slide();
        let ramp = Support {
            height: 0.2,
            on_ramp: true,
        };
        player.integrate(&ramp, &config, &lanes, 0.0, DT);
        assert!(!player.is_sliding);
        assert!(player.was_on_elevated);
    }

    #[test]
    fn test_walking_off_edge_starts_zero_velocity_fall() {
        let (config, lanes, mut player) = setup();
        player.integrate(&flat(2.5), &config, &lanes, 0.0, DT);
        assert!(player.was_on_elevated);
        assert!(player.vertical >= 2.5);

        player.integrate(&flat(0.0), &config, &lanes, DT, DT);
        assert!(player.is_jumping);
        assert_eq!(player.jump_velocity, 0.0);
        // Still elevated while airborne
        assert!(player.was_on_elevated);

        let mut landed = None;
        for i in 0..120 {
            landed = player.integrate(&flat(0.0), &config, &lanes, i as f32 * DT, DT);
            if landed.is_some() {
                break;
            }
        }
        assert_eq!(landed, Some(0.0));
        assert!(!player.was_on_elevated);
    }

    #[test]
    fn test_lateral_eases_without_snapping() {
        let (config, lanes, mut player) = setup();
        player.move_right();
        player.integrate(&flat(0.0), &config, &lanes, 0.0, DT);
        assert!(player.lateral > 0.0 && player.lateral < 3.0);
        assert_eq!(player.current_lane, Lane::CENTER);
        for i in 0..60 {
            player.integrate(&flat(0.0), &config, &lanes, i as f32 * DT, DT);
        }
        assert_eq!(player.current_lane, Lane::RIGHT);
        assert!((player.lateral - 3.0).abs() < 0.01);
    }

    #[derive(Debug, Clone)]
    enum Action {
        Left,
        Right,
        Jump,
        Slide,
        Tick(f32),
    }

    fn action() -> impl Strategy<Value = Action> {
        prop_oneof![
            Just(Action::Left),
            Just(Action::Right),
            Just(Action::Jump),
            Just(Action::Slide),
            (0.0f32..3.5).prop_map(Action::Tick),
        ]
    }

    proptest! {
        #[test]
        fn prop_lane_and_posture_invariants(actions in proptest::collection::vec(action(), 1..200)) {
            let (config, lanes, mut player) = setup();
            let mut t = 0.0;
            for action in actions {
                match action {
                    Action::Left => player.move_left(),
                    Action::Right => player.move_right(),
                    Action::Jump => { player.jump(config.jump_force); }
                    Action::Slide => { player.slide(); }
                    Action::Tick(height) => {
                        t += DT;
                        let support = flat(height);
                        player.integrate(&support, &config, &lanes, t, DT);
                        prop_assert!(!(player.is_jumping && player.is_sliding));
                        if !player.is_jumping {
                            prop_assert!(player.vertical >= support.height);
                        }
                    }
                }
                prop_assert!(player.target_lane.index() <= 2);
                prop_assert!(player.current_lane.index() <= 2);
            }
        }
    }
}
