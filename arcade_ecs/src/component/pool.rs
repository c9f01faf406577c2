//! Densely packed storage for statically typed components.

use std::collections::HashMap;
use std::ops::{Index, IndexMut};

use downcast_rs::{impl_downcast, Downcast};

use super::Component;
use crate::Entity;

/// Initial capacity of the newly created pool.
pub const DEFAULT_POOL_CAPACITY: usize = 100;

/// Storage for statically typed components of ECS.
///
/// Components are packed into contiguous memory without holes (a *sparse set*):
/// removal moves the last component into the freed slot,
/// so insertion, removal and lookup by entity are all O(1).
///
#[derive(Debug)]
pub struct Pool<T>
where
    T: Component,
{
    /// Components are actually stored here.
    components: Vec<T>,
    /// Owner of the component in the same slot of `components`.
    index_to_entity: Vec<Entity>,
    entity_to_index: HashMap<Entity, usize>,
}

impl<T> Pool<T>
where
    T: Component,
{
    /// Creates an empty pool with [default capacity](DEFAULT_POOL_CAPACITY).
    pub fn new() -> Self {
        Self::with_capacity(DEFAULT_POOL_CAPACITY)
    }

    /// Creates an empty pool which can hold `capacity` components without reallocation.
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            components: Vec::with_capacity(capacity),
            index_to_entity: Vec::with_capacity(capacity),
            entity_to_index: HashMap::with_capacity(capacity),
        }
    }

    /// Attaches component to the entity.
    /// If component was already attached, it will be replaced by value.
    ///
    /// Returns previously attached component, if any.
    ///
    pub fn set(&mut self, entity: Entity, component: T) -> Option<T> {
        if let Some(&index) = self.entity_to_index.get(&entity) {
            return Some(std::mem::replace(&mut self.components[index], component));
        }
        if self.components.len() == self.components.capacity() {
            let additional = self.components.capacity().max(1);
            self.components.reserve_exact(additional);
            self.index_to_entity.reserve_exact(additional);
        }
        let index = self.components.len();
        self.components.push(component);
        self.index_to_entity.push(entity);
        self.entity_to_index.insert(entity, index);
        None
    }

    /// Detaches component from the entity.
    /// The last component of the pool takes the place of the removed one.
    ///
    /// Returns component that was attached to the entity.
    ///
    pub fn remove(&mut self, entity: Entity) -> Option<T> {
        let index = self.entity_to_index.remove(&entity)?;
        let component = self.components.swap_remove(index);
        self.index_to_entity.swap_remove(index);
        if let Some(&moved) = self.index_to_entity.get(index) {
            self.entity_to_index.insert(moved, index);
        }
        Some(component)
    }

    /// Returns `true` if component was attached to the entity.
    pub fn contains(&self, entity: Entity) -> bool {
        self.entity_to_index.contains_key(&entity)
    }

    /// Retrieves an immutable reference to component attached to the entity.
    pub fn get(&self, entity: Entity) -> Option<&T> {
        let index = *self.entity_to_index.get(&entity)?;
        self.components.get(index)
    }

    /// Retrieves a mutable reference to component attached to the entity.
    pub fn get_mut(&mut self, entity: Entity) -> Option<&mut T> {
        let index = *self.entity_to_index.get(&entity)?;
        self.components.get_mut(index)
    }

    /// Slot of the component attached to the entity.
    pub fn index_of(&self, entity: Entity) -> Option<usize> {
        self.entity_to_index.get(&entity).copied()
    }

    /// Count of components in the pool.
    pub fn len(&self) -> usize {
        self.components.len()
    }

    pub fn is_empty(&self) -> bool {
        self.components.is_empty()
    }

    /// Count of components the pool can hold without reallocation.
    pub fn capacity(&self) -> usize {
        self.components.capacity()
    }

    /// Removes all components, keeping allocated memory.
    pub fn clear(&mut self) {
        self.components.clear();
        self.index_to_entity.clear();
        self.entity_to_index.clear();
    }

    /// Owners of the components, in slot order.
    pub fn entities(&self) -> &[Entity] {
        &self.index_to_entity
    }

    /// Packed components, in slot order.
    pub fn components(&self) -> &[T] {
        &self.components
    }

    /// Returns immutable iterator over all components with their entities.
    pub fn iter(&self) -> impl Iterator<Item = (Entity, &T)> {
        self.index_to_entity
            .iter()
            .copied()
            .zip(self.components.iter())
    }

    /// Returns mutable iterator over all components with their entities.
    pub fn iter_mut(&mut self) -> impl Iterator<Item = (Entity, &mut T)> {
        self.index_to_entity
            .iter()
            .copied()
            .zip(self.components.iter_mut())
    }
}

impl<T> Default for Pool<T>
where
    T: Component,
{
    fn default() -> Self {
        Self::new()
    }
}

pub struct IntoIter<T>
where
    T: Component,
{
    inner: std::iter::Zip<std::vec::IntoIter<Entity>, std::vec::IntoIter<T>>,
}

impl<T> Iterator for IntoIter<T>
where
    T: Component,
{
    type Item = (Entity, T);

    fn next(&mut self) -> Option<Self::Item> {
        self.inner.next()
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.inner.size_hint()
    }
}

impl<T> IntoIterator for Pool<T>
where
    T: Component,
{
    type Item = (Entity, T);
    type IntoIter = IntoIter<T>;

    fn into_iter(self) -> Self::IntoIter {
        IntoIter {
            inner: self.index_to_entity.into_iter().zip(self.components),
        }
    }
}

impl<T> Index<Entity> for Pool<T>
where
    T: Component,
{
    type Output = T;

    /// # Panics
    ///
    /// Panics if there is no component attached to the entity.
    ///
    fn index(&self, entity: Entity) -> &Self::Output {
        self.get(entity)
            .expect("there is no component attached to the entity")
    }
}

impl<T> IndexMut<Entity> for Pool<T>
where
    T: Component,
{
    fn index_mut(&mut self, entity: Entity) -> &mut Self::Output {
        self.get_mut(entity)
            .expect("there is no component attached to the entity")
    }
}

/// Pool with erased type of components,
/// so pools of all component types can be stored side by side.
///
pub(crate) trait AnyPool: Downcast {
    /// Detaches component of the entity, if any.
    fn remove_entity(&mut self, entity: Entity) -> bool;

    fn contains_entity(&self, entity: Entity) -> bool;

    fn size(&self) -> usize;
}

impl_downcast!(AnyPool);

impl<T> AnyPool for Pool<T>
where
    T: Component,
{
    fn remove_entity(&mut self, entity: Entity) -> bool {
        self.remove(entity).is_some()
    }

    fn contains_entity(&self, entity: Entity) -> bool {
        self.contains(entity)
    }

    fn size(&self) -> usize {
        self.len()
    }
}
