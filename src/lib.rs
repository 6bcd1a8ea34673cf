//! Coin Rain - a falling coins and bombs arcade core
//!
//! Core modules:
//! - `viewport`: Device classification, logical resolution and safe area
//! - `sim`: Deterministic simulation (pool, spawning, scoring state machine)
//! - `config`: Data-driven game balance, loadable from JSON
//! - `best`: Personal best shown on the game-over screen
//! - `platform`: Browser boundary for a JavaScript renderer

pub mod best;
pub mod config;
pub mod platform;
pub mod sim;
pub mod viewport;

pub use best::{GameOverSummary, PersonalBest, RunResult};
pub use config::{ConfigError, GameConfig, SpawnWeights};
pub use viewport::{DeviceClass, DeviceGeometry, Orientation, SafeArea, ViewportAdapter};

/// Game configuration constants
pub mod consts {
    /// Logical resolution bounds, applied after the aspect fit
    pub const MIN_GAME_WIDTH: f32 = 320.0;
    pub const MAX_GAME_WIDTH: f32 = 2048.0;
    pub const MIN_GAME_HEIGHT: f32 = 480.0;
    pub const MAX_GAME_HEIGHT: f32 = 2048.0;

    /// Tall base resolution used in portrait or on mobile
    pub const BASE_WIDTH: f32 = 720.0;
    pub const BASE_HEIGHT: f32 = 1280.0;
    /// Wide aspect used for landscape desktop
    pub const WIDE_ASPECT: f32 = 16.0 / 9.0;

    /// Scale baselines: smaller on mobile so UI reads larger on small screens
    pub const MOBILE_SCALE_BASELINE: f32 = 720.0;
    pub const DESKTOP_SCALE_BASELINE: f32 = 1280.0;

    /// Safe area padding
    pub const MOBILE_PADDING: f32 = 20.0;
    pub const DESKTOP_PADDING: f32 = 10.0;
    /// Extra insets on mobile portrait (notch / gesture bar)
    pub const NOTCH_INSET_TOP: f32 = 30.0;
    pub const GESTURE_INSET_BOTTOM: f32 = 20.0;

    /// Smallest font size `DeviceGeometry::font_size` will return
    pub const MIN_FONT_SIZE: f32 = 12.0;

    /// Longest frame delta the simulation will integrate (ms)
    pub const MAX_FRAME_MS: f32 = 100.0;
}
