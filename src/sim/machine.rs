//! Scoring and lives state machine
//!
//! Applies reveal outcomes to `GameState`, drives bonus mode and the spawn
//! rate, and queues events. Late or duplicate inputs degrade to no-ops.

use super::entity::{EntityHandle, FallingEntity, ObjectKind};
use super::pool::ObjectPool;
use super::spawn::SpawnScheduler;
use super::state::{GameEvent, GamePhase, GameState};
use crate::config::{ConfigError, GameConfig};

#[derive(Debug, Clone)]
pub struct GameStateMachine {
    config: GameConfig,
    state: GameState,
    events: Vec<GameEvent>,
}

impl GameStateMachine {
    /// Rejects configs that would break the counters' bounds
    pub fn new(config: GameConfig) -> Result<Self, ConfigError> {
        config.validate()?;
        let state = GameState::new(&config);
        Ok(Self {
            config,
            state,
            events: Vec::new(),
        })
    }

    pub fn state(&self) -> &GameState {
        &self.state
    }

    pub fn config(&self) -> &GameConfig {
        &self.config
    }

    pub(crate) fn emit(&mut self, event: GameEvent) {
        self.events.push(event);
    }

    /// Take all queued events in emission order
    pub fn drain_events(&mut self) -> Vec<GameEvent> {
        std::mem::take(&mut self.events)
    }

    /// Route a pointer hit: guard, score, then recycle the slot
    ///
    /// Returns `true` if the reveal changed the game.
    pub fn reveal(
        &mut self,
        handle: EntityHandle,
        pool: &mut ObjectPool,
        scheduler: &mut SpawnScheduler,
    ) -> bool {
        if self.state.is_game_over() {
            log::debug!("Ignoring reveal of slot {} after game over", handle.index);
            return false;
        }
        let Some(entity) = pool.reveal(handle).cloned() else {
            log::debug!("Ignoring reveal of slot {} (inactive or already revealed)", handle.index);
            return false;
        };

        // Coins vanish once collected, bombs explode; either way the slot frees up
        pool.release(handle);

        match entity.kind {
            ObjectKind::Coin(_) => {
                let points = self.on_coin_revealed(&entity);
                self.emit(GameEvent::CoinRevealed {
                    handle,
                    points,
                    pos: entity.pos,
                });
            }
            ObjectKind::Bomb => {
                self.emit(GameEvent::BombRevealed {
                    handle,
                    pos: entity.pos,
                });
                self.on_bomb_revealed(&entity, pool, scheduler);
            }
        }
        true
    }

    /// Score a coin; returns the points awarded
    ///
    /// Points use the multiplier in effect *before* this coin, so the coin
    /// that completes the streak is not itself boosted.
    pub fn on_coin_revealed(&mut self, entity: &FallingEntity) -> u64 {
        if self.state.is_game_over() {
            return 0;
        }
        let points = entity.value as u64 * self.state.multiplier as u64;
        self.state.score = self.state.score.saturating_add(points);
        self.state.streak = self.state.streak.saturating_add(1);
        self.state.best_streak = self.state.best_streak.max(self.state.streak);

        if self.state.streak >= self.config.streak_bonus_threshold && !self.state.bonus_mode_active
        {
            self.activate_bonus();
        }

        self.state.spawn_interval_ms = self
            .state
            .spawn_interval_ms
            .saturating_sub(self.config.spawn_interval_step_ms)
            .max(self.config.min_spawn_interval_ms);

        self.emit(GameEvent::ScoreUpdated {
            score: self.state.score,
        });
        self.emit(GameEvent::StreakUpdated {
            streak: self.state.streak,
        });
        points
    }

    /// Lose a life; ends the run when the last one goes
    pub fn on_bomb_revealed(
        &mut self,
        _entity: &FallingEntity,
        pool: &mut ObjectPool,
        scheduler: &mut SpawnScheduler,
    ) {
        if self.state.is_game_over() {
            return;
        }
        self.state.lives = self.state.lives.saturating_sub(1);
        self.state.streak = 0;

        if self.state.bonus_mode_active {
            self.deactivate_bonus();
        }

        self.emit(GameEvent::LivesUpdated {
            lives: self.state.lives,
        });
        self.emit(GameEvent::StreakUpdated { streak: 0 });

        if self.state.lives == 0 {
            self.game_over(pool, scheduler);
        }
    }

    /// Start a new run; ignored unless the current one is over
    pub fn reset(&mut self, scheduler: &mut SpawnScheduler) -> bool {
        if !self.state.is_game_over() {
            log::debug!("Ignoring reset while playing");
            return false;
        }
        self.state = GameState::new(&self.config);
        scheduler.start();
        log::info!("Game reset");

        self.emit(GameEvent::ScoreUpdated { score: 0 });
        self.emit(GameEvent::LivesUpdated {
            lives: self.state.lives,
        });
        self.emit(GameEvent::StreakUpdated { streak: 0 });
        true
    }

    fn activate_bonus(&mut self) {
        self.state.bonus_mode_active = true;
        self.state.multiplier = self.config.bonus_multiplier;
        log::info!(
            "Bonus mode on (x{}) at streak {}",
            self.state.multiplier,
            self.state.streak
        );
        self.emit(GameEvent::BonusActivated {
            multiplier: self.state.multiplier,
        });
    }

    fn deactivate_bonus(&mut self) {
        self.state.bonus_mode_active = false;
        self.state.multiplier = 1;
        log::info!("Bonus mode off");
        self.emit(GameEvent::BonusDeactivated);
    }

    fn game_over(&mut self, pool: &mut ObjectPool, scheduler: &mut SpawnScheduler) {
        self.state.phase = GamePhase::GameOver;
        scheduler.stop();
        pool.deactivate_all();
        log::info!(
            "Game over: score {}, best streak {}",
            self.state.score,
            self.state.best_streak
        );
        self.emit(GameEvent::GameOver {
            final_score: self.state.score,
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::entity::CoinTier;
    use glam::Vec2;

    struct Fixture {
        machine: GameStateMachine,
        pool: ObjectPool,
        scheduler: SpawnScheduler,
    }

    impl Fixture {
        fn new() -> Self {
            let config = GameConfig::default();
            Self {
                pool: ObjectPool::new(config.pool_capacity),
                machine: GameStateMachine::new(config).unwrap(),
                scheduler: SpawnScheduler::new(),
            }
        }

        fn place(&mut self, kind: ObjectKind) -> EntityHandle {
            let handle = self.pool.acquire_free_slot().unwrap();
            self.pool
                .slot_mut(handle)
                .unwrap()
                .spawn(Vec2::new(100.0, 200.0), kind, 300.0, 1.0);
            handle
        }

        fn reveal(&mut self, kind: ObjectKind) -> bool {
            let handle = self.place(kind);
            self.machine
                .reveal(handle, &mut self.pool, &mut self.scheduler)
        }
    }

    const GOLD: ObjectKind = ObjectKind::Coin(CoinTier::Gold);

    #[test]
    fn test_bonus_uses_pre_activation_multiplier() {
        let mut f = Fixture::new();
        f.reveal(GOLD);
        f.reveal(GOLD);
        assert_eq!(f.machine.state().score, 100);
        assert!(!f.machine.state().bonus_mode_active);

        f.machine.drain_events();
        f.reveal(GOLD);
        let state = f.machine.state();
        assert_eq!(state.score, 150);
        assert!(state.bonus_mode_active);
        assert_eq!(state.multiplier, 5);

        let events = f.machine.drain_events();
        assert!(events.contains(&GameEvent::BonusActivated { multiplier: 5 }));
        assert!(events.contains(&GameEvent::ScoreUpdated { score: 150 }));
        assert!(events.contains(&GameEvent::StreakUpdated { streak: 3 }));

        f.reveal(GOLD);
        assert_eq!(f.machine.state().score, 400);
        // Activation fires once per bonus period
        let events = f.machine.drain_events();
        assert!(!events.iter().any(|e| matches!(e, GameEvent::BonusActivated { .. })));
    }

    #[test]
    fn test_bomb_ends_bonus_and_streak() {
        let mut f = Fixture::new();
        for _ in 0..3 {
            f.reveal(GOLD);
        }
        f.machine.drain_events();
        f.reveal(ObjectKind::Bomb);
        let state = f.machine.state();
        assert_eq!(state.lives, 2);
        assert_eq!(state.streak, 0);
        assert_eq!(state.best_streak, 3);
        assert_eq!(state.multiplier, 1);
        assert!(!state.bonus_mode_active);

        let events = f.machine.drain_events();
        assert!(events.contains(&GameEvent::BonusDeactivated));
        assert!(events.contains(&GameEvent::LivesUpdated { lives: 2 }));
        assert!(events.contains(&GameEvent::StreakUpdated { streak: 0 }));
    }

    #[test]
    fn test_three_bombs_game_over_once() {
        let mut f = Fixture::new();
        f.reveal(GOLD);
        f.place(GOLD);
        for _ in 0..3 {
            f.reveal(ObjectKind::Bomb);
        }
        let state = f.machine.state().clone();
        assert_eq!(state.lives, 0);
        assert_eq!(state.phase, GamePhase::GameOver);
        assert!(!f.scheduler.is_running());
        assert_eq!(f.pool.active_count(), 0);

        let events = f.machine.drain_events();
        let game_overs: Vec<_> = events
            .iter()
            .filter(|e| matches!(e, GameEvent::GameOver { .. }))
            .collect();
        assert_eq!(game_overs, vec![&GameEvent::GameOver { final_score: 50 }]);

        // A late fourth bomb changes nothing
        assert!(!f.reveal(ObjectKind::Bomb));
        assert_eq!(f.machine.state(), &state);
        assert!(f.machine.drain_events().is_empty());
    }

    #[test]
    fn test_duplicate_reveal_is_noop() {
        let mut f = Fixture::new();
        let handle = f.place(GOLD);
        assert!(f.machine.reveal(handle, &mut f.pool, &mut f.scheduler));
        let snapshot = f.machine.state().clone();
        assert!(!f.machine.reveal(handle, &mut f.pool, &mut f.scheduler));
        assert_eq!(f.machine.state(), &snapshot);

        let bomb = f.place(ObjectKind::Bomb);
        f.pool.release(bomb);
        assert!(!f.machine.reveal(bomb, &mut f.pool, &mut f.scheduler));
        assert_eq!(f.machine.state().lives, 3);
    }

    #[test]
    fn test_spawn_interval_tightens_to_floor() {
        let mut f = Fixture::new();
        f.reveal(GOLD);
        assert_eq!(f.machine.state().spawn_interval_ms, 990);
        f.reveal(ObjectKind::Bomb);
        assert_eq!(f.machine.state().spawn_interval_ms, 990);

        for _ in 0..200 {
            f.reveal(ObjectKind::Coin(CoinTier::Bronze));
        }
        assert_eq!(f.machine.state().spawn_interval_ms, 300);
    }

    #[test]
    fn test_rejects_config_that_would_raise_interval() {
        let config = GameConfig {
            initial_spawn_interval_ms: 1000,
            min_spawn_interval_ms: 2000,
            ..GameConfig::default()
        };
        assert!(matches!(
            GameStateMachine::new(config),
            Err(ConfigError::InvertedRange { name: "spawn_interval_ms", .. })
        ));
    }

    #[test]
    fn test_reset_only_from_game_over() {
        let mut f = Fixture::new();
        f.reveal(GOLD);
        assert!(!f.machine.reset(&mut f.scheduler));
        assert_eq!(f.machine.state().score, 50);

        for _ in 0..3 {
            f.reveal(ObjectKind::Bomb);
        }
        f.machine.drain_events();
        assert!(f.machine.reset(&mut f.scheduler));
        let state = f.machine.state();
        assert_eq!(state, &GameState::new(&GameConfig::default()));
        assert!(f.scheduler.is_running());
        assert!(f
            .machine
            .drain_events()
            .contains(&GameEvent::LivesUpdated { lives: 3 }));
    }

    #[test]
    fn test_reveal_emits_anchor_events() {
        let mut f = Fixture::new();
        let handle = f.place(GOLD);
        f.machine.reveal(handle, &mut f.pool, &mut f.scheduler);
        let events = f.machine.drain_events();
        assert!(events.contains(&GameEvent::CoinRevealed {
            handle,
            points: 50,
            pos: Vec2::new(100.0, 200.0),
        }));
        assert!(f.pool.get(handle).is_none());
    }
}
