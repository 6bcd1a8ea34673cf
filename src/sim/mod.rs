//! Deterministic simulation module
//!
//! All gameplay logic lives here. This module must be pure and deterministic:
//! - Frame deltas come from the host, clamped
//! - Seeded RNG only
//! - Stable iteration order (by pool slot)
//! - No rendering or platform dependencies

pub mod entity;
pub mod game;
pub mod machine;
pub mod pool;
pub mod remap;
pub mod spawn;
pub mod state;
pub mod tick;

pub use entity::{BOMB_SIZE, CoinTier, EntityHandle, FallingEntity, ObjectKind};
pub use game::{Game, ScreenSignal};
pub use machine::GameStateMachine;
pub use pool::{DEFAULT_POOL_CAPACITY, ObjectPool};
pub use remap::remap;
pub use spawn::{SpawnScheduler, draw_kind, select_kind};
pub use state::{GameEvent, GamePhase, GameState};
pub use tick::{TickInput, tick};
