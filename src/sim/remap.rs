//! Re-project live entities after a viewport change

use glam::Vec2;

use super::pool::ObjectPool;
use crate::viewport::DeviceGeometry;

/// Keep every active entity at the same relative spot in the new viewport
///
/// Positions are mapped by their fraction of the previous logical size. An
/// axis whose previous size is zero is left untouched.
pub fn remap(pool: &mut ObjectPool, previous: &DeviceGeometry, next: &DeviceGeometry, entity_scale: f32) {
    let old = Vec2::new(previous.game_width, previous.game_height);
    let new = Vec2::new(next.game_width, next.game_height);
    let ratio = Vec2::new(
        if old.x > 0.0 { new.x / old.x } else { 1.0 },
        if old.y > 0.0 { new.y / old.y } else { 1.0 },
    );
    let scale = next.scale_factor * entity_scale;

    for entity in pool.iter_active_mut() {
        entity.pos *= ratio;
        entity.scale = scale;
    }
}
