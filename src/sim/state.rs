//! Game state and outbound events
//!
//! `GameState` is owned by the state machine and only read elsewhere.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::entity::{EntityHandle, ObjectKind};
use crate::config::GameConfig;
use crate::viewport::DeviceGeometry;

/// Current phase of gameplay
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum GamePhase {
    /// Objects are falling and reveals are scored
    Playing,
    /// Run ended; only a reset is accepted
    GameOver,
}

/// State-change notifications for the presentation layer
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum GameEvent {
    GeometryChanged { geometry: DeviceGeometry },
    ScoreUpdated { score: u64 },
    LivesUpdated { lives: u8 },
    StreakUpdated { streak: u32 },
    BonusActivated { multiplier: u32 },
    BonusDeactivated,
    GameOver { final_score: u64 },
    Spawned { handle: EntityHandle, kind: ObjectKind },
    /// Floating "+points" text anchor
    CoinRevealed { handle: EntityHandle, points: u64, pos: Vec2 },
    /// Explosion anchor
    BombRevealed { handle: EntityHandle, pos: Vec2 },
}

/// Score, lives and pacing for one run
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GameState {
    pub phase: GamePhase,
    pub score: u64,
    pub lives: u8,
    /// Consecutive coins since the last bomb or reset
    pub streak: u32,
    /// Longest streak this run
    pub best_streak: u32,
    pub multiplier: u32,
    pub bonus_mode_active: bool,
    /// Milliseconds between spawns; only ever shrinks within a run
    pub spawn_interval_ms: u32,
}

impl GameState {
    /// Fresh run state from the config
    pub fn new(config: &GameConfig) -> Self {
        Self {
            phase: GamePhase::Playing,
            score: 0,
            lives: config.initial_lives,
            streak: 0,
            best_streak: 0,
            multiplier: 1,
            bonus_mode_active: false,
            spawn_interval_ms: config.initial_spawn_interval_ms,
        }
    }

    pub fn is_game_over(&self) -> bool {
        self.phase == GamePhase::GameOver
    }
}
