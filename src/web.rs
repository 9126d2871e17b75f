//! Browser entry point
//!
//! The page owns rendering and input. It forwards key/touch events as
//! intents, calls `update` from its animation frame loop with the frame
//! delta in seconds, and reads the state back as JSON.

use wasm_bindgen::prelude::*;

use crate::sim::Game;
use crate::tuning::SimConfig;

#[wasm_bindgen(start)]
pub fn wasm_main() {
    console_error_panic_hook::set_once();
    if console_log::init_with_level(log::Level::Info).is_err() {
        log::warn!("Logger was already initialized");
    }
    log::info!("Catway Surfers (web) starting...");
}

/// JavaScript handle to one game
#[wasm_bindgen]
pub struct WebGame {
    game: Game,
}

#[wasm_bindgen]
impl WebGame {
    /// New game seeded from the clock
    #[wasm_bindgen(constructor)]
    pub fn new() -> WebGame {
        let seed = js_sys::Date::now() as u64;
        log::info!("Game initialized with seed: {}", seed);
        WebGame {
            game: Game::new(seed),
        }
    }

    /// New game with tuning overrides from a JSON document
    #[wasm_bindgen(js_name = withConfig)]
    pub fn with_config(config_json: &str) -> Result<WebGame, JsError> {
        let config = SimConfig::from_json(config_json)?;
        let seed = js_sys::Date::now() as u64;
        Ok(WebGame {
            game: Game::with_config(seed, config)?,
        })
    }

    /// Advance by the frame delta in seconds
    pub fn update(&mut self, delta: f32) {
        self.game.update(delta);
    }

    #[wasm_bindgen(js_name = moveLeft)]
    pub fn move_left(&mut self) {
        self.game.move_left();
    }

    #[wasm_bindgen(js_name = moveRight)]
    pub fn move_right(&mut self) {
        self.game.move_right();
    }

    pub fn jump(&mut self) {
        self.game.jump();
    }

    pub fn slide(&mut self) {
        self.game.slide();
    }

    #[wasm_bindgen(js_name = startGame)]
    pub fn start_game(&mut self) {
        self.game.start_game();
    }

    #[wasm_bindgen(js_name = resetGame)]
    pub fn reset_game(&mut self) {
        self.game.reset_game();
    }

    #[wasm_bindgen(js_name = skipIntro)]
    pub fn skip_intro(&mut self) {
        self.game.skip_intro();
    }

    /// Score as a JS number
    pub fn score(&self) -> f64 {
        self.game.score() as f64
    }

    #[wasm_bindgen(js_name = snapshotJson)]
    pub fn snapshot_json(&self) -> Result<String, JsError> {
        Ok(serde_json::to_string(&self.game.snapshot())?)
    }

    /// Events since the last call, as a JSON array
    #[wasm_bindgen(js_name = drainEventsJson)]
    pub fn drain_events_json(&mut self) -> Result<String, JsError> {
        Ok(serde_json::to_string(&self.game.drain_events())?)
    }
}

impl Default for WebGame {
    fn default() -> Self {
        Self::new()
    }
}
