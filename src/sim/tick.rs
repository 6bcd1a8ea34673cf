//! Per-frame input dispatch
//!
//! The host loop gathers whatever arrived during a frame into a `TickInput`
//! and hands it over once. Inputs are applied in a fixed order so a replay of
//! the same inputs reproduces the same session.

use super::entity::EntityHandle;
use super::game::{Game, ScreenSignal};

/// Inbound events collected during one frame
#[derive(Debug, Clone, Default)]
pub struct TickInput {
    /// Latest screen signals (resize, orientation change, visibility resume)
    pub viewport: Option<ScreenSignal>,
    /// Tab hidden
    pub pause: bool,
    /// Tab visible again
    pub resume: bool,
    /// Restart button pressed
    pub reset: bool,
    /// Entities hit by pointer presses, in press order
    pub reveals: Vec<EntityHandle>,
}

/// Apply one frame of input, then advance the simulation by `dt_ms`
///
/// Order: viewport, pause/resume, reset, reveals, simulation step. Geometry is
/// settled before anything reads it, and reveals land on entities as they
/// were drawn last frame.
pub fn tick(game: &mut Game, input: &TickInput, dt_ms: f32) {
    if let Some(screen) = input.viewport {
        game.viewport_changed(screen.width, screen.height, screen.touch_capable);
    }

    if input.pause {
        game.pause();
    }
    if input.resume {
        game.resume();
    }

    if input.reset {
        game.reset();
    }

    for &handle in &input.reveals {
        game.pointer_reveal(handle);
    }

    game.tick(dt_ms);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::GameConfig;
    use crate::sim::state::GameEvent;
    use crate::viewport::ViewportAdapter;

    const FRAME_MS: f32 = 1000.0 / 60.0;

    fn new_game(seed: u64) -> Game {
        Game::new(
            GameConfig::default(),
            ViewportAdapter::desktop(),
            ScreenSignal::new(1280.0, 720.0, false),
            seed,
        )
        .unwrap()
    }

    #[test]
    fn test_reveals_applied_before_step() {
        let mut game = new_game(21);
        let idle = TickInput::default();
        for _ in 0..61 {
            tick(&mut game, &idle, FRAME_MS);
        }
        let handles: Vec<_> = game.pool().iter_active().map(|(h, _)| h).collect();
        assert_eq!(handles.len(), 1);

        // Duplicate taps in one frame count once
        let input = TickInput {
            reveals: vec![handles[0], handles[0]],
            ..Default::default()
        };
        tick(&mut game, &input, FRAME_MS);
        assert!(game.pool().get(handles[0]).is_none());
        let state = game.state();
        assert!(state.score > 0 || state.lives == 2);
        assert!(state.streak <= 1);
    }

    #[test]
    fn test_pause_then_resume() {
        let mut game = new_game(22);
        let pause = TickInput {
            pause: true,
            ..Default::default()
        };
        tick(&mut game, &pause, FRAME_MS);
        assert!(game.is_paused());

        for _ in 0..120 {
            tick(&mut game, &TickInput::default(), FRAME_MS);
        }
        assert_eq!(game.pool().active_count(), 0);

        let resume = TickInput {
            resume: true,
            ..Default::default()
        };
        tick(&mut game, &resume, FRAME_MS);
        assert!(!game.is_paused());
    }

    #[test]
    fn test_viewport_before_step() {
        let mut game = new_game(23);
        game.drain_events();
        let input = TickInput {
            viewport: Some(ScreenSignal::new(390.0, 844.0, true)),
            ..Default::default()
        };
        tick(&mut game, &input, FRAME_MS);
        assert!(game.geometry().mobile_layout);
        assert!(matches!(
            game.drain_events().first(),
            Some(GameEvent::GeometryChanged { .. })
        ));
    }

    #[test]
    fn test_replay_is_deterministic() {
        let script = |game: &mut Game| {
            let mut log = Vec::new();
            for frame in 0..900 {
                let reveals = if frame % 45 == 0 {
                    game.pool().iter_active().map(|(h, _)| h).take(1).collect()
                } else {
                    Vec::new()
                };
                let input = TickInput {
                    reveals,
                    ..Default::default()
                };
                tick(game, &input, FRAME_MS);
                log.extend(game.drain_events());
            }
            log
        };
        let mut a = new_game(77);
        let mut b = new_game(77);
        assert_eq!(script(&mut a), script(&mut b));
        assert_eq!(a.state(), b.state());
    }
}
