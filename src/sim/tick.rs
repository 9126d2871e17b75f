//! Frame-driven game loop
//!
//! [`Game`] owns all simulation state and is the only thing that mutates it.
//! The host calls [`Game::update`] once per rendered frame and forwards
//! player intents through [`Game::handle`]; the presenter reads
//! [`Game::snapshot`] and drains [`Game::drain_events`].

use rand::SeedableRng;
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};

use super::collision;
use super::intro::{IntroScript, IntroStep};
use super::lane::LaneTable;
use super::player::PlayerState;
use super::spawner::Spawner;
use super::state::{Chaser, Fish, GameEvent, GameOverCause, GamePhase, Obstacle, World};
use crate::tuning::{ConfigError, SimConfig};

/// Logical commands from the input layer
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Intent {
    MoveLeft,
    MoveRight,
    Jump,
    Slide,
    StartGame,
    ResetGame,
    SkipIntro,
}

/// State of a single run, rebuilt from scratch on every start
#[derive(Debug, Clone)]
struct Run {
    player: PlayerState,
    world: World,
    chaser: Chaser,
    spawner: Spawner,
    score: f32,
    fish_collected: u32,
    speed: f32,
    /// Total distance scrolled
    distance: f32,
    /// Seconds since the run started
    time: f32,
}

impl Run {
    fn new(config: &SimConfig, lanes: &LaneTable) -> Self {
        let player = PlayerState::new(lanes);
        let chaser = Chaser::new(&config.chaser, player.lateral);
        Self {
            player,
            world: World::new(),
            chaser,
            spawner: Spawner::new(),
            score: 0.0,
            fish_collected: 0,
            speed: config.start_speed,
            distance: 0.0,
            time: 0.0,
        }
    }
}

/// Read-only view handed to the presenter each frame
#[derive(Debug, Clone, Serialize)]
pub struct Snapshot<'a> {
    pub phase: GamePhase,
    pub seed: u64,
    pub intro_step: IntroStep,
    pub player: &'a PlayerState,
    pub obstacles: &'a [Obstacle],
    pub fish: &'a [Fish],
    pub chaser: &'a Chaser,
    pub score: u64,
    pub fish_collected: u32,
    pub speed: f32,
    pub distance: f32,
}

/// The game loop controller
#[derive(Debug, Clone)]
pub struct Game {
    config: SimConfig,
    lanes: LaneTable,
    seed: u64,
    rng: Pcg32,
    phase: GamePhase,
    intro: IntroScript,
    run: Run,
    events: Vec<GameEvent>,
}

impl Game {
    /// New game with default tuning, starting at the intro
    pub fn new(seed: u64) -> Self {
        Self::build(seed, SimConfig::default())
    }

    /// New game with custom tuning
    pub fn with_config(seed: u64, config: SimConfig) -> Result<Self, ConfigError> {
        config.validate()?;
        Ok(Self::build(seed, config))
    }

    fn build(seed: u64, config: SimConfig) -> Self {
        let lanes = LaneTable::new(config.lanes);
        let run = Run::new(&config, &lanes);
        let intro = IntroScript::default();
        let events = intro
            .step
            .caption()
            .map(GameEvent::IntroCaption)
            .into_iter()
            .collect();
        log::info!("Game created with seed {}", seed);
        Self {
            config,
            lanes,
            seed,
            rng: Pcg32::seed_from_u64(seed),
            phase: GamePhase::Intro,
            intro,
            run,
            events,
        }
    }

    pub fn phase(&self) -> GamePhase {
        self.phase
    }

    pub fn seed(&self) -> u64 {
        self.seed
    }

    pub fn config(&self) -> &SimConfig {
        &self.config
    }

    pub fn lanes(&self) -> &LaneTable {
        &self.lanes
    }

    pub fn player(&self) -> &PlayerState {
        &self.run.player
    }

    pub fn world(&self) -> &World {
        &self.run.world
    }

    #[cfg(test)]
    pub(crate) fn world_mut(&mut self) -> &mut World {
        &mut self.run.world
    }

    pub fn chaser(&self) -> &Chaser {
        &self.run.chaser
    }

    pub fn score(&self) -> u64 {
        self.run.score.floor() as u64
    }

    pub fn fish_collected(&self) -> u32 {
        self.run.fish_collected
    }

    pub fn speed(&self) -> f32 {
        self.run.speed
    }

    pub fn snapshot(&self) -> Snapshot<'_> {
        Snapshot {
            phase: self.phase,
            seed: self.seed,
            intro_step: self.intro.step,
            player: &self.run.player,
            obstacles: &self.run.world.obstacles,
            fish: &self.run.world.fish,
            chaser: &self.run.chaser,
            score: self.score(),
            fish_collected: self.run.fish_collected,
            speed: self.run.speed,
            distance: self.run.distance,
        }
    }

    /// Events queued since the last drain
    pub fn drain_events(&mut self) -> Vec<GameEvent> {
        std::mem::take(&mut self.events)
    }

    pub fn move_left(&mut self) {
        self.handle(Intent::MoveLeft);
    }

    pub fn move_right(&mut self) {
        self.handle(Intent::MoveRight);
    }

    pub fn jump(&mut self) {
        self.handle(Intent::Jump);
    }

    pub fn slide(&mut self) {
        self.handle(Intent::Slide);
    }

    pub fn start_game(&mut self) {
        self.handle(Intent::StartGame);
    }

    pub fn reset_game(&mut self) {
        self.handle(Intent::ResetGame);
    }

    pub fn skip_intro(&mut self) {
        self.handle(Intent::SkipIntro);
    }

    /// Apply one intent; intents that make no sense in the current phase are ignored
    pub fn handle(&mut self, intent: Intent) {
        match (self.phase, intent) {
            (GamePhase::Intro, Intent::SkipIntro) => {
                self.intro.step = IntroStep::Done;
                self.set_phase(GamePhase::Ready);
            }
            (GamePhase::Ready, Intent::StartGame) | (GamePhase::GameOver, Intent::ResetGame) => {
                self.start_run();
            }
            (GamePhase::Playing, Intent::MoveLeft) => self.run.player.move_left(),
            (GamePhase::Playing, Intent::MoveRight) => self.run.player.move_right(),
            (GamePhase::Playing, Intent::Jump) => {
                if self.run.player.jump(self.config.jump_force) {
                    self.events.push(GameEvent::Jumped);
                }
            }
            (GamePhase::Playing, Intent::Slide) => {
                if self.run.player.slide() {
                    self.events.push(GameEvent::Slid);
                }
            }
            (phase, intent) => log::trace!("Ignoring {:?} during {:?}", intent, phase),
        }
    }

    /// Advance the simulation by one frame of `delta` seconds
    pub fn update(&mut self, delta: f32) {
        let dt = self.clamp_delta(delta);
        match self.phase {
            GamePhase::Intro => self.update_intro(dt),
            GamePhase::Playing => self.update_playing(dt),
            GamePhase::Ready | GamePhase::GameOver => {}
        }
    }

    fn clamp_delta(&self, delta: f32) -> f32 {
        if !delta.is_finite() || delta < 0.0 {
            log::warn!("Rejected frame delta {}", delta);
            return 0.0;
        }
        delta.min(self.config.max_delta)
    }

    fn set_phase(&mut self, to: GamePhase) {
        let from = self.phase;
        if from == to {
            return;
        }
        log::info!("Phase {:?} -> {:?}", from, to);
        self.phase = to;
        self.events.push(GameEvent::PhaseChanged { from, to });
    }

    fn start_run(&mut self) {
        self.run = Run::new(&self.config, &self.lanes);
        log::info!("Run started (seed {})", self.seed);
        self.set_phase(GamePhase::Playing);
    }

    fn update_intro(&mut self, dt: f32) {
        if let Some(step) = self.intro.advance(dt) {
            if let Some(caption) = step.caption() {
                self.events.push(GameEvent::IntroCaption(caption));
            }
            if step == IntroStep::Done {
                self.set_phase(GamePhase::Ready);
            }
        }
    }

    fn update_playing(&mut self, dt: f32) {
        let config = &self.config;
        let run = &mut self.run;

        run.time += dt;
        run.score += config.score_rate * dt;
        if run.speed < config.max_speed {
            run.speed = (run.speed + config.speed_ramp * dt).min(config.max_speed);
        }

        let step = run.speed * dt;
        run.distance += step;
        run.world.scroll(step, config.despawn_z);
        run.spawner
            .advance(step, &mut run.world, &mut self.rng, config, run.speed);

        let resolution = collision::resolve(&run.player, &run.world, &run.chaser, config, &self.lanes);

        for id in resolution.pickups {
            if run.world.take_fish(id) {
                run.fish_collected += 1;
                run.score += config.fish_value as f32;
                self.events.push(GameEvent::FishCollected {
                    id,
                    total: run.fish_collected,
                });
            }
        }

        if let Some(cause) = resolution.fatal {
            self.game_over(cause);
            return;
        }

        if let Some(height) = run
            .player
            .integrate(&resolution.support, config, &self.lanes, run.time, dt)
        {
            self.events.push(GameEvent::Landed { height });
        }

        if run.chaser.advance(&config.chaser, run.player.lateral, dt) {
            log::info!("Chaser fell out of view after {:.1}s", run.chaser.chase_time);
            self.events.push(GameEvent::ChaserLost);
        }
    }

    fn game_over(&mut self, cause: GameOverCause) {
        self.run.player.settle();
        let score = self.score();
        let fish = self.run.fish_collected;
        match cause {
            GameOverCause::Collision { kind, .. } => {
                log::info!("Game over: hit a {} (score {}, fish {})", kind.name(), score, fish)
            }
            GameOverCause::Captured => log::info!("Game over: captured (score {}, fish {})", score, fish),
        }
        self.events.push(GameEvent::GameOver { cause, score, fish });
        self.set_phase(GamePhase::GameOver);
    }
}
