//! Game balance configuration
//!
//! Defaults match the shipped game. A JSON document may override any subset of
//! fields; missing fields fall back to the defaults.

use std::path::Path;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::sim::CoinTier;

/// Tolerance when checking that tier probabilities sum to 1
const PROBABILITY_EPSILON: f64 = 1e-6;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
    #[error("malformed config: {0}")]
    Parse(#[from] serde_json::Error),
    #[error("coin tier probabilities sum to {0}, expected 1")]
    TierProbabilitySum(f64),
    #[error("probability out of range [0, 1]: {0}")]
    ProbabilityOutOfRange(f64),
    #[error("no coin tiers configured")]
    NoTiers,
    #[error("invalid range for {name}: min {min} > max {max}")]
    InvertedRange { name: &'static str, min: f64, max: f64 },
    #[error("{0} must be greater than zero")]
    Zero(&'static str),
    #[error("bonus multiplier must be at least 1, got {0}")]
    Multiplier(u32),
    #[error("{name} must be finite, got {value}")]
    NonFinite { name: &'static str, value: f32 },
}

/// One coin tier and its draw probability
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TierWeight {
    pub tier: CoinTier,
    pub probability: f64,
}

/// Spawn distribution: ordered coin tiers plus an independent bomb chance
///
/// Tier order is significant. The cumulative walk visits tiers in list order,
/// so a seeded RNG always yields the same sequence of kinds.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SpawnWeights {
    pub tiers: Vec<TierWeight>,
    pub bomb_probability: f64,
}

impl Default for SpawnWeights {
    fn default() -> Self {
        Self {
            tiers: CoinTier::ALL
                .iter()
                .map(|&tier| TierWeight {
                    tier,
                    probability: tier.default_probability(),
                })
                .collect(),
            bomb_probability: 0.25,
        }
    }
}

impl SpawnWeights {
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.tiers.is_empty() {
            return Err(ConfigError::NoTiers);
        }
        check_probability(self.bomb_probability)?;
        for weight in &self.tiers {
            check_probability(weight.probability)?;
        }
        let sum: f64 = self.tiers.iter().map(|w| w.probability).sum();
        if (sum - 1.0).abs() > PROBABILITY_EPSILON {
            return Err(ConfigError::TierProbabilitySum(sum));
        }
        Ok(())
    }
}

fn check_finite(name: &'static str, value: f32) -> Result<(), ConfigError> {
    if value.is_finite() {
        Ok(())
    } else {
        Err(ConfigError::NonFinite { name, value })
    }
}

fn check_probability(p: f64) -> Result<(), ConfigError> {
    if (0.0..=1.0).contains(&p) {
        Ok(())
    } else {
        Err(ConfigError::ProbabilityOutOfRange(p))
    }
}

/// Tunable game parameters
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GameConfig {
    // === Lives & scoring ===
    pub initial_lives: u8,
    /// Consecutive coins needed to enter bonus mode
    pub streak_bonus_threshold: u32,
    /// Score multiplier while bonus mode is active
    pub bonus_multiplier: u32,

    // === Spawn rate (ms between spawns) ===
    pub initial_spawn_interval_ms: u32,
    pub min_spawn_interval_ms: u32,
    /// Interval reduction per revealed coin
    pub spawn_interval_step_ms: u32,

    // === Falling entities ===
    /// Fall speed range in logical pixels per second
    pub fall_speed_min: f32,
    pub fall_speed_max: f32,
    pub pool_capacity: usize,
    /// Horizontal inset from the safe area edges for spawn positions
    pub spawn_margin: f32,
    /// Spawn height (negative = above the visible top edge)
    pub spawn_y: f32,
    /// How far below the viewport an entity may fall before it is recycled
    pub offscreen_margin: f32,
    /// Entity visual scale relative to the device scale factor
    pub entity_scale: f32,

    pub weights: SpawnWeights,
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            initial_lives: 3,
            streak_bonus_threshold: 3,
            bonus_multiplier: 5,

            initial_spawn_interval_ms: 1000,
            min_spawn_interval_ms: 300,
            spawn_interval_step_ms: 10,

            fall_speed_min: 200.0,
            fall_speed_max: 400.0,
            pool_capacity: 20,
            spawn_margin: 50.0,
            spawn_y: -50.0,
            offscreen_margin: 100.0,
            entity_scale: 0.8,

            weights: SpawnWeights::default(),
        }
    }
}

impl GameConfig {
    /// Parse and validate a JSON config
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// Read, parse and validate a JSON config file
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let json = std::fs::read_to_string(path)?;
        Self::from_json(&json)
    }

    /// Load a config file if given, falling back to defaults on any error
    pub fn load_or_default(path: Option<&Path>) -> Self {
        let Some(path) = path else {
            log::info!("Using default game config");
            return Self::default();
        };
        match Self::from_file(path) {
            Ok(config) => {
                log::info!("Loaded game config from {}", path.display());
                config
            }
            Err(e) => {
                log::warn!("Ignoring config {}: {}", path.display(), e);
                Self::default()
            }
        }
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.initial_lives == 0 {
            return Err(ConfigError::Zero("initial_lives"));
        }
        if self.streak_bonus_threshold == 0 {
            return Err(ConfigError::Zero("streak_bonus_threshold"));
        }
        if self.bonus_multiplier < 1 {
            return Err(ConfigError::Multiplier(self.bonus_multiplier));
        }
        if self.pool_capacity == 0 {
            return Err(ConfigError::Zero("pool_capacity"));
        }
        if self.spawn_interval_step_ms == 0 {
            return Err(ConfigError::Zero("spawn_interval_step_ms"));
        }
        if self.min_spawn_interval_ms == 0 {
            return Err(ConfigError::Zero("min_spawn_interval_ms"));
        }
        if self.min_spawn_interval_ms > self.initial_spawn_interval_ms {
            return Err(ConfigError::InvertedRange {
                name: "spawn_interval_ms",
                min: self.min_spawn_interval_ms as f64,
                max: self.initial_spawn_interval_ms as f64,
            });
        }
        check_finite("fall_speed_min", self.fall_speed_min)?;
        check_finite("fall_speed_max", self.fall_speed_max)?;
        check_finite("spawn_margin", self.spawn_margin)?;
        check_finite("spawn_y", self.spawn_y)?;
        check_finite("offscreen_margin", self.offscreen_margin)?;
        check_finite("entity_scale", self.entity_scale)?;
        if self.entity_scale <= 0.0 {
            return Err(ConfigError::Zero("entity_scale"));
        }
        if self.fall_speed_min > self.fall_speed_max {
            return Err(ConfigError::InvertedRange {
                name: "fall_speed",
                min: self.fall_speed_min as f64,
                max: self.fall_speed_max as f64,
            });
        }
        self.weights.validate()
    }
}
