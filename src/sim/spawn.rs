//! Spawn timer and weighted kind selection
//!
//! The scheduler only decides *when* to spawn; the interval itself lives in
//! `GameState` and is tightened by the state machine as the player scores.

use glam::Vec2;
use rand::Rng;

use super::entity::{CoinTier, EntityHandle, ObjectKind};
use super::pool::ObjectPool;
use crate::config::{GameConfig, SpawnWeights};
use crate::viewport::DeviceGeometry;

/// Periodic spawn timer with pause and stop
#[derive(Debug, Clone)]
pub struct SpawnScheduler {
    elapsed_ms: f32,
    running: bool,
    paused: bool,
}

impl Default for SpawnScheduler {
    fn default() -> Self {
        Self::new()
    }
}

impl SpawnScheduler {
    /// A running, unpaused scheduler
    pub fn new() -> Self {
        Self {
            elapsed_ms: 0.0,
            running: true,
            paused: false,
        }
    }

    pub fn is_running(&self) -> bool {
        self.running
    }

    pub fn is_paused(&self) -> bool {
        self.paused
    }

    /// (Re)start from a fresh interval
    pub fn start(&mut self) {
        self.running = true;
        self.elapsed_ms = 0.0;
    }

    /// Stop for good; no spawn is reported again until `start`
    pub fn stop(&mut self) {
        self.running = false;
        self.elapsed_ms = 0.0;
    }

    pub fn pause(&mut self) {
        self.paused = true;
    }

    /// Resume where the timer left off
    pub fn resume(&mut self) {
        self.paused = false;
    }

    /// Accumulate `dt_ms` and report whether a spawn is due
    ///
    /// Fires at most once per call. Any further whole intervals that elapsed
    /// (a long stall) are dropped rather than replayed as a burst.
    pub fn advance(&mut self, dt_ms: f32, interval_ms: u32) -> bool {
        if !self.running || self.paused || dt_ms <= 0.0 {
            return false;
        }
        let interval = interval_ms.max(1) as f32;
        self.elapsed_ms += dt_ms;
        if self.elapsed_ms < interval {
            return false;
        }
        self.elapsed_ms = (self.elapsed_ms - interval) % interval;
        true
    }

    /// Fill one pool slot inside the safe area
    ///
    /// Returns `None` (and spawns nothing) when the pool is exhausted.
    pub fn spawn_object<R: Rng + ?Sized>(
        &self,
        pool: &mut ObjectPool,
        geometry: &DeviceGeometry,
        config: &GameConfig,
        rng: &mut R,
    ) -> Option<(EntityHandle, ObjectKind)> {
        let Some(handle) = pool.acquire_free_slot() else {
            log::debug!("Spawn skipped: pool exhausted ({} slots)", pool.capacity());
            return None;
        };

        let safe = &geometry.safe_area;
        let lo = safe.left + config.spawn_margin;
        let hi = safe.right - config.spawn_margin;
        let x = if lo < hi {
            rng.random_range(lo..=hi)
        } else {
            (safe.left + safe.right) / 2.0
        };

        let kind = draw_kind(&config.weights, rng);

        let fall_speed = if config.fall_speed_min < config.fall_speed_max {
            rng.random_range(config.fall_speed_min..=config.fall_speed_max)
        } else {
            config.fall_speed_min
        };

        let scale = geometry.scale_factor * config.entity_scale;
        let entity = pool.slot_mut(handle)?;
        entity.spawn(Vec2::new(x, config.spawn_y), kind, fall_speed, scale);
        log::debug!("Spawned {:?} in slot {} at x={:.0}", kind, handle.index, x);
        Some((handle, kind))
    }
}

/// Two-stage draw: one roll for bomb-or-coin, a second roll for the tier
pub fn draw_kind<R: Rng + ?Sized>(weights: &SpawnWeights, rng: &mut R) -> ObjectKind {
    let r1: f64 = rng.random();
    if r1 < weights.bomb_probability {
        return ObjectKind::Bomb;
    }
    let r2: f64 = rng.random();
    ObjectKind::Coin(select_tier(weights, r2))
}

/// Pure kind selection from two uniform rolls in [0, 1)
pub fn select_kind(weights: &SpawnWeights, r1: f64, r2: f64) -> ObjectKind {
    if r1 < weights.bomb_probability {
        ObjectKind::Bomb
    } else {
        ObjectKind::Coin(select_tier(weights, r2))
    }
}

/// Walk tiers in order until the running sum reaches `r`
fn select_tier(weights: &SpawnWeights, r: f64) -> CoinTier {
    let mut cumulative = 0.0;
    for weight in &weights.tiers {
        cumulative += weight.probability;
        if cumulative >= r {
            return weight.tier;
        }
    }
    // Float shortfall when r is within rounding error of 1
    weights
        .tiers
        .last()
        .map(|w| w.tier)
        .unwrap_or(CoinTier::Bronze)
}
