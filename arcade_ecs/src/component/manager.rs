//! Utilities for managing component pools.

use std::any::TypeId;

use super::{types::ComponentTypes, AnyPool, Component, ComponentId, ComponentType, Pool};
use crate::{Entity, Result};

/// Manager of all component pools of ECS.
///
/// Pools are indexed by [`ComponentId`], the same way as signature bits.
///
pub struct ComponentManager {
    types: ComponentTypes,
    pools: Vec<Option<Box<dyn AnyPool>>>,
    pool_capacity: usize,
}

impl ComponentManager {
    /// Creates new component manager; each pool starts with given capacity.
    pub fn new(pool_capacity: usize) -> Self {
        Self {
            types: ComponentTypes::default(),
            pools: Vec::new(),
            pool_capacity,
        }
    }

    /// Assigns signature bit to the component type, if it was not assigned yet.
    pub fn register(&mut self, component_type: ComponentType) -> Result<ComponentId> {
        self.types.register(component_type)
    }

    pub fn id_of<T>(&self) -> Option<ComponentId>
    where
        T: Component,
    {
        self.types.id_of(TypeId::of::<T>())
    }

    pub fn component_type(&self, id: ComponentId) -> Option<&ComponentType> {
        self.types.get(id)
    }

    /// Count of registered component types.
    pub fn type_count(&self) -> usize {
        self.types.len()
    }

    /// Inserts component of type `T` and attaches it to the entity.
    /// If component was already attached, it will be replaced by value.
    ///
    /// Returns bit of the component type and previously attached component, if any.
    ///
    pub fn insert<T>(&mut self, entity: Entity, component: T) -> Result<(ComponentId, Option<T>)>
    where
        T: Component,
    {
        let id = self.register(ComponentType::of::<T>())?;
        let storage = self.get_or_create_storage::<T>(id);
        Ok((id, storage.set(entity, component)))
    }

    /// Removes component of type `T` and detaches it from the entity.
    ///
    /// Returns bit of the component type and component that was attached to the entity.
    ///
    pub fn remove<T>(&mut self, entity: Entity) -> Option<(ComponentId, T)>
    where
        T: Component,
    {
        let id = self.id_of::<T>()?;
        let storage = self.get_storage_mut::<T>(id)?;
        storage.remove(entity).map(|component| (id, component))
    }

    /// Retrieves an immutable reference to component of type `T` attached to the entity.
    pub fn get<T>(&self, entity: Entity) -> Option<&T>
    where
        T: Component,
    {
        self.pool::<T>()?.get(entity)
    }

    /// Retrieves a mutable reference to component of type `T` attached to the entity.
    pub fn get_mut<T>(&mut self, entity: Entity) -> Option<&mut T>
    where
        T: Component,
    {
        let id = self.id_of::<T>()?;
        self.get_storage_mut::<T>(id)?.get_mut(entity)
    }

    /// Pool of components of type `T`, if any component of this type was ever attached.
    pub fn pool<T>(&self) -> Option<&Pool<T>>
    where
        T: Component,
    {
        let id = self.id_of::<T>()?;
        let boxed = self.pools.get(id.index())?.as_ref()?;
        boxed.downcast_ref::<Pool<T>>()
    }

    /// Detaches components of all types from the entity.
    ///
    /// Returns count of detached components.
    ///
    pub fn remove_entity(&mut self, entity: Entity) -> usize {
        self.pools
            .iter_mut()
            .flatten()
            .map(|pool| pool.remove_entity(entity))
            .filter(|&removed| removed)
            .count()
    }

    /// Returns `true` if pool of the component type holds a component of the entity.
    pub fn contains(&self, id: ComponentId, entity: Entity) -> bool {
        self.pools
            .get(id.index())
            .and_then(Option::as_ref)
            .map(|pool| pool.contains_entity(entity))
            .unwrap_or(false)
    }

    /// Returns `true` if any pool still holds a component of the entity.
    pub fn holds_entity(&self, entity: Entity) -> bool {
        self.pools
            .iter()
            .flatten()
            .any(|pool| pool.contains_entity(entity))
    }

    /// Total count of components in all pools.
    pub fn component_count(&self) -> usize {
        self.pools.iter().flatten().map(|pool| pool.size()).sum()
    }

    fn get_storage_mut<T>(&mut self, id: ComponentId) -> Option<&mut Pool<T>>
    where
        T: Component,
    {
        let boxed = self.pools.get_mut(id.index())?.as_mut()?;
        boxed.downcast_mut::<Pool<T>>()
    }

    fn get_or_create_storage<T>(&mut self, id: ComponentId) -> &mut Pool<T>
    where
        T: Component,
    {
        if id.index() >= self.pools.len() {
            self.pools.resize_with(id.index() + 1, || None);
        }
        let capacity = self.pool_capacity;
        let boxed = self.pools[id.index()].get_or_insert_with(|| {
            log::trace!("pool for component {} created", id);
            Box::new(Pool::<T>::with_capacity(capacity)) as Box<dyn AnyPool>
        });
        match boxed.downcast_mut::<Pool<T>>() {
            Some(pool) => pool,
            None => unreachable!("pool of component {} holds another type", id),
        }
    }
}
