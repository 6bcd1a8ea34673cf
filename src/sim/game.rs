//! Game session: the owned composition of viewport, pool, scheduler and
//! state machine, driven by inbound events.

use rand::SeedableRng;
use rand_pcg::Pcg32;

use super::entity::EntityHandle;
use super::machine::GameStateMachine;
use super::pool::ObjectPool;
use super::remap::remap;
use super::spawn::SpawnScheduler;
use super::state::{GameEvent, GameState};
use crate::config::{ConfigError, GameConfig};
use crate::consts::MAX_FRAME_MS;
use crate::viewport::{DeviceGeometry, ViewportAdapter};

/// Raw screen signals delivered on resize / orientation / visibility resume
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ScreenSignal {
    pub width: f32,
    pub height: f32,
    pub touch_capable: bool,
}

impl ScreenSignal {
    pub fn new(width: f32, height: f32, touch_capable: bool) -> Self {
        Self {
            width,
            height,
            touch_capable,
        }
    }
}

/// One play session
pub struct Game {
    adapter: ViewportAdapter,
    geometry: DeviceGeometry,
    pool: ObjectPool,
    scheduler: SpawnScheduler,
    machine: GameStateMachine,
    rng: Pcg32,
    seed: u64,
    paused: bool,
}

impl Game {
    /// Start a session; fails if `config` does not validate
    pub fn new(
        config: GameConfig,
        adapter: ViewportAdapter,
        screen: ScreenSignal,
        seed: u64,
    ) -> Result<Self, ConfigError> {
        let machine = GameStateMachine::new(config)?;
        let geometry = adapter.compute_geometry(screen.width, screen.height, screen.touch_capable);
        log::info!(
            "Session start: seed {}, {:?} {:.0}x{:.0} (scale {:.2})",
            seed,
            geometry.device_class,
            geometry.game_width,
            geometry.game_height,
            geometry.scale_factor
        );
        let mut game = Self {
            adapter,
            geometry,
            pool: ObjectPool::new(machine.config().pool_capacity),
            scheduler: SpawnScheduler::new(),
            machine,
            rng: Pcg32::seed_from_u64(seed),
            seed,
            paused: false,
        };
        game.machine.emit(GameEvent::GeometryChanged { geometry });
        Ok(game)
    }

    pub fn state(&self) -> &GameState {
        self.machine.state()
    }

    pub fn geometry(&self) -> &DeviceGeometry {
        &self.geometry
    }

    pub fn pool(&self) -> &ObjectPool {
        &self.pool
    }

    pub fn config(&self) -> &GameConfig {
        self.machine.config()
    }

    pub fn seed(&self) -> u64 {
        self.seed
    }

    pub fn is_paused(&self) -> bool {
        self.paused
    }

    pub fn drain_events(&mut self) -> Vec<GameEvent> {
        self.machine.drain_events()
    }

    /// Advance one frame: fall, recycle off-screen entities, maybe spawn
    pub fn tick(&mut self, dt_ms: f32) {
        if self.paused || self.machine.state().is_game_over() {
            return;
        }
        let dt_ms = if dt_ms.is_finite() {
            dt_ms.clamp(0.0, MAX_FRAME_MS)
        } else {
            0.0
        };
        let dt = dt_ms / 1000.0;

        for entity in self.pool.iter_active_mut() {
            entity.fall(dt);
        }
        let floor = self.geometry.game_height + self.machine.config().offscreen_margin;
        let expired = self.pool.release_where(|e| e.pos.y > floor);
        if expired > 0 {
            log::debug!("{} entities fell off screen", expired);
        }

        let interval = self.machine.state().spawn_interval_ms;
        if self.scheduler.advance(dt_ms, interval) {
            if let Some((handle, kind)) = self.scheduler.spawn_object(
                &mut self.pool,
                &self.geometry,
                self.machine.config(),
                &mut self.rng,
            ) {
                self.machine.emit(GameEvent::Spawned { handle, kind });
            }
        }
    }

    /// A pointer press landed on `handle`
    ///
    /// Presses while paused are dropped, not queued for resume.
    pub fn pointer_reveal(&mut self, handle: EntityHandle) -> bool {
        if self.paused {
            log::debug!("Ignoring reveal while paused");
            return false;
        }
        self.machine
            .reveal(handle, &mut self.pool, &mut self.scheduler)
    }

    /// Recompute geometry and re-project live entities if anything changed
    pub fn viewport_changed(&mut self, width: f32, height: f32, touch_capable: bool) {
        let next = self.adapter.compute_geometry(width, height, touch_capable);
        if next == self.geometry {
            return;
        }
        remap(
            &mut self.pool,
            &self.geometry,
            &next,
            self.machine.config().entity_scale,
        );
        log::debug!(
            "Geometry changed: {:.0}x{:.0} -> {:.0}x{:.0}",
            self.geometry.game_width,
            self.geometry.game_height,
            next.game_width,
            next.game_height
        );
        self.geometry = next;
        self.machine.emit(GameEvent::GeometryChanged { geometry: next });
    }

    /// Suspend falling and spawning (tab hidden)
    pub fn pause(&mut self) {
        if !self.paused {
            self.paused = true;
            self.scheduler.pause();
            log::info!("Paused");
        }
    }

    pub fn resume(&mut self) {
        if self.paused {
            self.paused = false;
            self.scheduler.resume();
            log::info!("Resumed");
        }
    }

    /// Start over after game over
    pub fn reset(&mut self) -> bool {
        self.machine.reset(&mut self.scheduler)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::entity::ObjectKind;
    use crate::sim::state::GamePhase;

    fn new_game(seed: u64) -> Game {
        Game::new(
            GameConfig::default(),
            ViewportAdapter::desktop(),
            ScreenSignal::new(1280.0, 720.0, false),
            seed,
        )
        .unwrap()
    }

    fn run(game: &mut Game, frames: usize) {
        for _ in 0..frames {
            game.tick(1000.0 / 60.0);
        }
    }

    #[test]
    fn test_initial_geometry_event() {
        let mut game = new_game(1);
        let events = game.drain_events();
        assert!(matches!(events[0], GameEvent::GeometryChanged { .. }));
    }

    #[test]
    fn test_spawns_on_interval() {
        let mut game = new_game(1);
        game.drain_events();
        // Just under one second: nothing yet
        run(&mut game, 59);
        assert_eq!(game.pool().active_count(), 0);
        run(&mut game, 2);
        assert_eq!(game.pool().active_count(), 1);
        assert!(game
            .drain_events()
            .iter()
            .any(|e| matches!(e, GameEvent::Spawned { .. })));
    }

    #[test]
    fn test_entities_fall_and_expire() {
        let mut game = new_game(3);
        run(&mut game, 62);
        let (handle, entity) = game.pool().iter_active().next().unwrap();
        assert!(entity.pos.y > -50.0);

        // At 200 px/s or more, 870 px to the recycle line takes under 5 s
        run(&mut game, 60 * 5);
        assert!(game.pool().get(handle).is_none());
        assert!(game.pool().active_count() <= game.config().pool_capacity);
    }

    #[test]
    fn test_pause_freezes_everything() {
        let mut game = new_game(5);
        run(&mut game, 61);
        let before: Vec<_> = game.pool().iter_active().map(|(_, e)| e.pos).collect();
        game.pause();
        run(&mut game, 600);
        let after: Vec<_> = game.pool().iter_active().map(|(_, e)| e.pos).collect();
        assert_eq!(before, after);

        let (handle, _) = game.pool().iter_active().next().unwrap();
        assert!(!game.pointer_reveal(handle));

        game.resume();
        run(&mut game, 1);
        let moved: Vec<_> = game.pool().iter_active().map(|(_, e)| e.pos).collect();
        assert_ne!(before, moved);
    }

    #[test]
    fn test_same_seed_same_session() {
        let mut a = new_game(99);
        let mut b = new_game(99);
        run(&mut a, 600);
        run(&mut b, 600);
        assert_eq!(a.drain_events(), b.drain_events());
        let pa: Vec<_> = a.pool().iter_active().map(|(h, e)| (h, e.pos, e.kind)).collect();
        let pb: Vec<_> = b.pool().iter_active().map(|(h, e)| (h, e.pos, e.kind)).collect();
        assert_eq!(pa, pb);
    }

    #[test]
    fn test_viewport_change_remaps() {
        let mut game = new_game(7);
        run(&mut game, 61);
        let (handle, entity) = game.pool().iter_active().next().unwrap();
        let rel_x = entity.pos.x / game.geometry().game_width;
        game.drain_events();

        game.viewport_changed(1920.0, 1080.0, false);
        let entity = game.pool().get(handle).unwrap();
        assert!((entity.pos.x / game.geometry().game_width - rel_x).abs() < 1e-5);
        assert!(matches!(
            game.drain_events().as_slice(),
            [GameEvent::GeometryChanged { .. }]
        ));

        // Same signals again: no event
        game.viewport_changed(1920.0, 1080.0, false);
        assert!(game.drain_events().is_empty());
    }

    #[test]
    fn test_game_over_stops_spawning_until_reset() {
        let mut config = GameConfig::default();
        config.weights.bomb_probability = 1.0;
        let mut game = Game::new(
            config,
            ViewportAdapter::desktop(),
            ScreenSignal::new(1280.0, 720.0, false),
            11,
        )
        .unwrap();

        for _ in 0..3 {
            run(&mut game, 61);
            let (handle, entity) = game.pool().iter_active().next().unwrap();
            assert_eq!(entity.kind, ObjectKind::Bomb);
            assert!(game.pointer_reveal(handle));
        }
        assert_eq!(game.state().phase, GamePhase::GameOver);
        assert_eq!(game.pool().active_count(), 0);

        run(&mut game, 600);
        assert_eq!(game.pool().active_count(), 0);

        assert!(game.reset());
        assert_eq!(game.state().lives, 3);
        run(&mut game, 61);
        assert_eq!(game.pool().active_count(), 1);
    }

    #[test]
    fn test_invalid_config_is_rejected() {
        let screen = ScreenSignal::new(1280.0, 720.0, false);
        let config = GameConfig {
            min_spawn_interval_ms: 2000,
            ..GameConfig::default()
        };
        assert!(Game::new(config, ViewportAdapter::desktop(), screen, 1).is_err());

        let config = GameConfig {
            fall_speed_max: f32::INFINITY,
            ..GameConfig::default()
        };
        assert!(matches!(
            Game::new(config, ViewportAdapter::desktop(), screen, 1),
            Err(ConfigError::NonFinite { name: "fall_speed_max", .. })
        ));

        let config = GameConfig {
            fall_speed_min: f32::NAN,
            ..GameConfig::default()
        };
        assert!(Game::new(config, ViewportAdapter::desktop(), screen, 1).is_err());
    }

    #[test]
    fn test_fast_entities_still_recycle() {
        let config = GameConfig {
            fall_speed_min: 5000.0,
            fall_speed_max: 10000.0,
            ..GameConfig::default()
        };
        let mut game = Game::new(
            config,
            ViewportAdapter::desktop(),
            ScreenSignal::new(1280.0, 720.0, false),
            13,
        )
        .unwrap();
        // Each spawn crosses the recycle line within a few frames
        run(&mut game, 60 * 10);
        assert!(game.pool().active_count() <= 1);
    }
}
