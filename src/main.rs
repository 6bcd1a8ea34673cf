//! Coin Rain entry point
//!
//! On the web this only boots logging; the JavaScript renderer constructs a
//! `WebGame`. Natively it plays a few headless seeded sessions with a
//! simulated player tapping at random, which is handy for balance tuning.

#[cfg(target_arch = "wasm32")]
use wasm_bindgen::prelude::*;

#[cfg(target_arch = "wasm32")]
#[wasm_bindgen(start)]
pub fn wasm_main() {
    coin_rain::platform::web::boot();
}

#[cfg(target_arch = "wasm32")]
fn main() {
    // WASM entry point is wasm_main, this is just to satisfy the compiler
}

#[cfg(not(target_arch = "wasm32"))]
mod headless {
    use std::path::PathBuf;

    use rand::{Rng, SeedableRng};
    use rand_pcg::Pcg32;

    use coin_rain::sim::{Game, GameEvent, ScreenSignal, TickInput, tick};
    use coin_rain::{GameConfig, PersonalBest, RunResult, ViewportAdapter};

    const FRAME_MS: f32 = 1000.0 / 60.0;
    /// Two simulated minutes per run
    const MAX_FRAMES: u32 = 60 * 120;
    /// Chance per frame that the simulated player taps something
    const TAP_CHANCE: f64 = 0.03;
    const RUNS: u64 = 5;

    pub fn run() {
        let mut args = std::env::args().skip(1);
        let config_path = args.next().map(PathBuf::from);
        let seed: u64 = args.next().and_then(|s| s.parse().ok()).unwrap_or(12345);

        let config = GameConfig::load_or_default(config_path.as_deref());
        let mut best = PersonalBest::default();

        for run_seed in seed..seed + RUNS {
            let result = match play(config.clone(), run_seed) {
                Ok(result) => result,
                Err(e) => {
                    log::error!("Cannot start session: {}", e);
                    return;
                }
            };
            let summary = best.record(result);
            println!(
                "run {} (seed {}): score {}, best streak {}{}",
                summary.runs_played,
                run_seed,
                summary.run.score,
                summary.run.best_streak,
                if summary.new_best { " - new best" } else { "" }
            );
        }

        if let Some(top) = best.best {
            println!("personal best {} (streak {})", top.score, top.best_streak);
        }
    }

    /// Play one seeded session to game over or time up
    fn play(config: GameConfig, seed: u64) -> Result<RunResult, coin_rain::ConfigError> {
        let mut game = Game::new(
            config,
            ViewportAdapter::new("iPhone", 3.0),
            ScreenSignal::new(390.0, 844.0, true),
            seed,
        )?;
        let mut player = Pcg32::seed_from_u64(seed.wrapping_add(1));

        let mut frame = 0;
        while frame < MAX_FRAMES && !game.state().is_game_over() {
            let mut input = TickInput::default();

            // Rotate the phone halfway through
            if frame == MAX_FRAMES / 2 {
                input.viewport = Some(ScreenSignal::new(844.0, 390.0, true));
            }

            // Objects are a mystery until tapped: pick any visible one
            if player.random_bool(TAP_CHANCE) {
                let visible: Vec<_> = game
                    .pool()
                    .iter_active()
                    .filter(|(_, e)| e.pos.y > 0.0 && !e.revealed)
                    .map(|(h, _)| h)
                    .collect();
                if !visible.is_empty() {
                    input.reveals.push(visible[player.random_range(0..visible.len())]);
                }
            }

            tick(&mut game, &input, FRAME_MS);

            for event in game.drain_events() {
                match event {
                    GameEvent::CoinRevealed { points, .. } => log::debug!("+{}", points),
                    GameEvent::BombRevealed { .. } => log::debug!("Boom"),
                    GameEvent::GameOver { final_score } => log::info!(
                        "Game over at {:.1}s, score {}",
                        frame as f32 * FRAME_MS / 1000.0,
                        final_score
                    ),
                    _ => {}
                }
            }
            frame += 1;
        }

        Ok(RunResult::from_state(game.state()))
    }
}

#[cfg(not(target_arch = "wasm32"))]
fn main() {
    env_logger::init();
    log::info!("Coin Rain (native) starting headless sessions...");
    headless::run();
}
