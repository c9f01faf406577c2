//! Utilities for *entities* in ECS.

use std::collections::VecDeque;
use std::fmt;

use crate::{Component, Registry, Result};

/// Raw identifier of the *entity*.
pub type EntityId = usize;

/// Unique identifier of the *entity* of ECS.
///
/// Entity carries no data itself: all of its state lives in component pools
/// of the [`Registry`] which created it. Identifiers of killed entities are
/// reused after the kill was flushed.
///
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[repr(transparent)]
pub struct Entity(EntityId);

impl Entity {
    /// Creates entity handle from the raw identifier.
    pub const fn from_raw(id: EntityId) -> Self {
        Self(id)
    }

    /// Raw identifier of this entity.
    pub const fn id(self) -> EntityId {
        self.0
    }

    /// Enqueues this entity for destruction on the next flush.
    pub fn kill(self, registry: &mut Registry) {
        registry.kill_entity(self)
    }

    /// Attaches component to this entity, replacing previous value of the same type.
    pub fn add_component<T>(self, registry: &mut Registry, component: T) -> Result<()>
    where
        T: Component,
    {
        registry.add_component(self, component)
    }

    /// Detaches component of type `T` from this entity, if any.
    pub fn remove_component<T>(self, registry: &mut Registry) -> Option<T>
    where
        T: Component,
    {
        registry.remove_component::<T>(self)
    }

    /// Returns `true` if component of type `T` is attached to this entity.
    pub fn has_component<T>(self, registry: &Registry) -> bool
    where
        T: Component,
    {
        registry.has_component::<T>(self)
    }

    /// Retrieves an immutable reference to component of type `T`.
    pub fn get_component<T>(self, registry: &Registry) -> Result<&T>
    where
        T: Component,
    {
        registry.get_component::<T>(self)
    }

    /// Retrieves a mutable reference to component of type `T`.
    pub fn get_component_mut<T>(self, registry: &mut Registry) -> Result<&mut T>
    where
        T: Component,
    {
        registry.get_component_mut::<T>(self)
    }

    /// Binds unique tag name to this entity.
    pub fn tag(self, registry: &mut Registry, tag: &str) -> Result<()> {
        registry.tag_entity(self, tag)
    }

    /// Returns `true` if this entity is tagged with given name.
    pub fn has_tag(self, registry: &Registry, tag: &str) -> bool {
        registry.entity_has_tag(self, tag)
    }

    /// Moves this entity into the group with given name.
    pub fn group(self, registry: &mut Registry, group: &str) -> Result<()> {
        registry.group_entity(self, group)
    }

    /// Returns `true` if this entity belongs to the group with given name.
    pub fn belongs_to_group(self, registry: &Registry, group: &str) -> bool {
        registry.entity_belongs_to_group(self, group)
    }
}

impl fmt::Display for Entity {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "Entity({})", self.0)
    }
}

/// Allocator of entity identifiers.
///
/// New identifiers come from a monotonically increasing counter,
/// released ones are reused in the order they were released.
///
#[derive(Debug, Default)]
pub(crate) struct EntityAllocator {
    next_id: EntityId,
    free_ids: VecDeque<EntityId>,
    alive: Vec<bool>,
}

impl EntityAllocator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn allocate(&mut self) -> Entity {
        let id = match self.free_ids.pop_front() {
            Some(id) => id,
            None => {
                let id = self.next_id;
                self.next_id += 1;
                self.alive.push(false);
                id
            }
        };
        self.alive[id] = true;
        Entity(id)
    }

    /// Marks entity as dead and makes its identifier available for reuse.
    ///
    /// Returns `false` if entity was not alive.
    ///
    pub fn release(&mut self, entity: Entity) -> bool {
        if !self.is_alive(entity) {
            return false;
        }
        self.alive[entity.0] = false;
        self.free_ids.push_back(entity.0);
        true
    }

    pub fn is_alive(&self, entity: Entity) -> bool {
        self.alive.get(entity.0).copied().unwrap_or(false)
    }

    /// Count of identifiers ever handed out.
    pub fn capacity(&self) -> usize {
        self.next_id
    }

    pub fn alive_count(&self) -> usize {
        self.next_id - self.free_ids.len()
    }

    #[cfg(test)]
    pub fn free_ids(&self) -> impl Iterator<Item = EntityId> + '_ {
        self.free_ids.iter().copied()
    }
}
