//! Fixed-capacity object pool for falling entities
//!
//! Slots are allocated once. Acquire hands out the lowest free index so slot
//! usage is deterministic; release is idempotent and bumps the generation.

use super::entity::{EntityHandle, FallingEntity};

/// Default number of pooled entities
pub const DEFAULT_POOL_CAPACITY: usize = 20;

#[derive(Debug, Clone)]
pub struct ObjectPool {
    slots: Vec<FallingEntity>,
}

impl Default for ObjectPool {
    fn default() -> Self {
        Self::new(DEFAULT_POOL_CAPACITY)
    }
}

impl ObjectPool {
    pub fn new(capacity: usize) -> Self {
        Self {
            slots: vec![FallingEntity::default(); capacity],
        }
    }

    pub fn capacity(&self) -> usize {
        self.slots.len()
    }

    pub fn active_count(&self) -> usize {
        self.slots.iter().filter(|e| e.active).count()
    }

    fn handle_for(index: usize, entity: &FallingEntity) -> EntityHandle {
        EntityHandle {
            index: index as u32,
            generation: entity.generation,
        }
    }

    /// Claim the first inactive slot, or `None` if the pool is exhausted
    ///
    /// The slot stays inactive until it is spawned into; callers are expected
    /// to spawn immediately.
    pub fn acquire_free_slot(&mut self) -> Option<EntityHandle> {
        self.slots
            .iter()
            .position(|e| !e.active)
            .map(|i| Self::handle_for(i, &self.slots[i]))
    }

    /// Resolve a handle to a live entity
    pub fn get(&self, handle: EntityHandle) -> Option<&FallingEntity> {
        self.slots
            .get(handle.index as usize)
            .filter(|e| e.active && e.generation == handle.generation)
    }

    /// Resolve a handle to a slot for spawning into, live or not
    pub(crate) fn slot_mut(&mut self, handle: EntityHandle) -> Option<&mut FallingEntity> {
        self.slots
            .get_mut(handle.index as usize)
            .filter(|e| e.generation == handle.generation)
    }

    /// Mark an entity revealed, returning it only on the first valid reveal
    ///
    /// Inactive, already revealed, and stale-generation handles return `None`.
    pub fn reveal(&mut self, handle: EntityHandle) -> Option<&FallingEntity> {
        let entity = self.slots.get_mut(handle.index as usize)?;
        if !entity.active || entity.revealed || entity.generation != handle.generation {
            return None;
        }
        entity.revealed = true;
        Some(&*entity)
    }

    /// Return a slot to the pool. Releasing twice is a no-op.
    pub fn release(&mut self, handle: EntityHandle) {
        if let Some(entity) = self.slots.get_mut(handle.index as usize) {
            if entity.active && entity.generation == handle.generation {
                Self::deactivate(entity);
            }
        }
    }

    /// Deactivate every slot (game over / teardown)
    pub fn deactivate_all(&mut self) {
        for entity in self.slots.iter_mut().filter(|e| e.active) {
            Self::deactivate(entity);
        }
    }

    fn deactivate(entity: &mut FallingEntity) {
        entity.active = false;
        entity.revealed = false;
        entity.fall_speed = 0.0;
        entity.generation = entity.generation.wrapping_add(1);
    }

    /// Active entities with their handles, in slot order
    pub fn iter_active(&self) -> impl Iterator<Item = (EntityHandle, &FallingEntity)> {
        self.slots
            .iter()
            .enumerate()
            .filter(|(_, e)| e.active)
            .map(|(i, e)| (Self::handle_for(i, e), e))
    }

    pub(crate) fn iter_active_mut(&mut self) -> impl Iterator<Item = &mut FallingEntity> {
        self.slots.iter_mut().filter(|e| e.active)
    }

    /// Release every active entity matching `predicate`, returning how many
    pub(crate) fn release_where<F>(&mut self, mut predicate: F) -> usize
    where
        F: FnMut(&FallingEntity) -> bool,
    {
        let mut released = 0;
        for entity in self.slots.iter_mut() {
            if entity.active && predicate(entity) {
                Self::deactivate(entity);
                released += 1;
            }
        }
        released
    }
}
