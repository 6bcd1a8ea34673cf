//! Falling entity types

use glam::Vec2;
use serde::{Deserialize, Serialize};

/// Coin tiers, cheapest first
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum CoinTier {
    Bronze,
    Silver,
    Gold,
    Platinum,
    Diamond,
}

impl CoinTier {
    pub const ALL: [CoinTier; 5] = [
        CoinTier::Bronze,
        CoinTier::Silver,
        CoinTier::Gold,
        CoinTier::Platinum,
        CoinTier::Diamond,
    ];

    /// Base points before the multiplier
    pub fn value(&self) -> u32 {
        match self {
            CoinTier::Bronze => 10,
            CoinTier::Silver => 25,
            CoinTier::Gold => 50,
            CoinTier::Platinum => 100,
            CoinTier::Diamond => 500,
        }
    }

    /// Draw probability in the default spawn weights
    pub fn default_probability(&self) -> f64 {
        match self {
            CoinTier::Bronze => 0.35,
            CoinTier::Silver => 0.25,
            CoinTier::Gold => 0.20,
            CoinTier::Platinum => 0.15,
            CoinTier::Diamond => 0.05,
        }
    }

    /// Sprite size at scale 1.0
    pub fn size(&self) -> f32 {
        match self {
            CoinTier::Bronze => 30.0,
            CoinTier::Silver => 35.0,
            CoinTier::Gold => 40.0,
            CoinTier::Platinum => 45.0,
            CoinTier::Diamond => 50.0,
        }
    }
}

/// What a falling object turns out to be once revealed
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ObjectKind {
    Coin(CoinTier),
    Bomb,
}

/// Sprite size for bombs at scale 1.0
pub const BOMB_SIZE: f32 = 40.0;

impl ObjectKind {
    /// Points awarded before the multiplier (0 for bombs)
    pub fn value(&self) -> u32 {
        match self {
            ObjectKind::Coin(tier) => tier.value(),
            ObjectKind::Bomb => 0,
        }
    }

    pub fn size(&self) -> f32 {
        match self {
            ObjectKind::Coin(tier) => tier.size(),
            ObjectKind::Bomb => BOMB_SIZE,
        }
    }

    pub fn is_bomb(&self) -> bool {
        matches!(self, ObjectKind::Bomb)
    }
}

/// Stable reference to a pool slot
///
/// The generation changes every time the slot is reused, so a handle held
/// across a recycle (a late duplicate tap) no longer resolves.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct EntityHandle {
    pub index: u32,
    pub generation: u32,
}

/// A pooled falling object
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FallingEntity {
    pub pos: Vec2,
    pub kind: ObjectKind,
    pub value: u32,
    /// Logical pixels per second
    pub fall_speed: f32,
    /// Visual scale (device scale factor times the entity scale)
    pub scale: f32,
    pub revealed: bool,
    pub active: bool,
    pub(crate) generation: u32,
}

impl Default for FallingEntity {
    fn default() -> Self {
        Self {
            pos: Vec2::ZERO,
            kind: ObjectKind::Coin(CoinTier::Bronze),
            value: 0,
            fall_speed: 0.0,
            scale: 1.0,
            revealed: false,
            active: false,
            generation: 0,
        }
    }
}

impl FallingEntity {
    /// Initialize a freshly acquired slot
    pub fn spawn(&mut self, pos: Vec2, kind: ObjectKind, fall_speed: f32, scale: f32) {
        self.pos = pos;
        self.kind = kind;
        self.value = kind.value();
        self.fall_speed = fall_speed;
        self.scale = scale;
        self.revealed = false;
        self.active = true;
    }

    /// Advance the fall by `dt` seconds
    pub fn fall(&mut self, dt: f32) {
        self.pos.y += self.fall_speed * dt;
    }

    pub fn generation(&self) -> u32 {
        self.generation
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_kind_values() {
        assert_eq!(ObjectKind::Coin(CoinTier::Gold).value(), 50);
        assert_eq!(ObjectKind::Coin(CoinTier::Diamond).value(), 500);
        assert_eq!(ObjectKind::Bomb.value(), 0);
        assert!(ObjectKind::Bomb.is_bomb());
        assert_eq!(ObjectKind::Bomb.size(), BOMB_SIZE);
    }

    #[test]
    fn test_spawn_and_fall() {
        let mut entity = FallingEntity::default();
        entity.revealed = true;
        entity.spawn(Vec2::new(100.0, -50.0), ObjectKind::Coin(CoinTier::Silver), 200.0, 0.8);
        assert!(entity.active);
        assert!(!entity.revealed);
        assert_eq!(entity.value, 25);

        entity.fall(0.5);
        assert!((entity.pos.y - 50.0).abs() < 1e-5);
        assert_eq!(entity.pos.x, 100.0);
    }
}
