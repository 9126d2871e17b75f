//! Catway Surfers entry point
//!
//! Native builds run a headless demo: the autopilot plays one run at 60 Hz
//! and the result is logged. The browser build starts from `web::wasm_main`.
//!
//! Usage: `catway-surfers [seed] [seconds] [config.json]`

#[cfg(not(target_arch = "wasm32"))]
fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
    log::info!("Catway Surfers (native) starting...");

    if let Err(e) = demo::run(std::env::args().skip(1).collect()) {
        log::error!("{}", e);
        std::process::exit(1);
    }
}

#[cfg(target_arch = "wasm32")]
fn main() {
    // WASM entry point is web::wasm_main, this is just to satisfy the compiler
}

#[cfg(not(target_arch = "wasm32"))]
mod demo {
    use catway_surfers::sim::autopilot;
    use catway_surfers::{ConfigError, Game, GameEvent, GamePhase, SimConfig};

    const FRAME_DT: f32 = 1.0 / 60.0;
    const DEFAULT_SECONDS: f32 = 60.0;

    #[derive(Debug, thiserror::Error)]
    pub enum DemoError {
        #[error("invalid {name} argument: {value:?}")]
        Argument { name: &'static str, value: String },
        #[error("cannot read {path}: {source}")]
        Io {
            path: String,
            source: std::io::Error,
        },
        #[error("bad tuning file: {0}")]
        Config(#[from] ConfigError),
    }

    pub fn run(args: Vec<String>) -> Result<(), DemoError> {
        let mut args = args.into_iter();
        let seed = match args.next() {
            Some(value) => value.parse().map_err(|_| DemoError::Argument { name: "seed", value })?,
            None => 42,
        };
        let seconds: f32 = match args.next() {
            Some(value) => match value.parse::<f32>() {
                Ok(s) if s.is_finite() && s > 0.0 => s,
                _ => return Err(DemoError::Argument { name: "seconds", value }),
            },
            None => DEFAULT_SECONDS,
        };
        let config = match args.next() {
            Some(path) => {
                let json = std::fs::read_to_string(&path).map_err(|source| DemoError::Io {
                    path: path.clone(),
                    source,
                })?;
                SimConfig::from_json(&json)?
            }
            None => SimConfig::default(),
        };

        let mut game = Game::with_config(seed, config)?;
        game.skip_intro();

        let frames = (seconds / FRAME_DT).ceil() as u64;
        for frame in 0..frames {
            if let Some(intent) = autopilot::decide(&game) {
                game.handle(intent);
            }
            game.update(FRAME_DT);

            for event in game.drain_events() {
                match event {
                    GameEvent::FishCollected { total, .. } => log::debug!("Fish #{}", total),
                    GameEvent::ChaserLost => log::info!("Got away from the dog"),
                    _ => {}
                }
            }

            if frame % 600 == 0 {
                let snapshot = game.snapshot();
                log::info!(
                    "t={:.0}s score={} fish={} speed={:.1}",
                    frame as f32 * FRAME_DT,
                    snapshot.score,
                    snapshot.fish_collected,
                    snapshot.speed
                );
            }

            if game.phase() == GamePhase::GameOver {
                break;
            }
        }

        let snapshot = game.snapshot();
        let outcome = if game.phase() == GamePhase::GameOver {
            "crashed"
        } else {
            "survived"
        };
        log::info!(
            "Demo {} after {:.0} units: score {}, {} fish",
            outcome,
            snapshot.distance,
            snapshot.score,
            snapshot.fish_collected
        );
        Ok(())
    }
}
