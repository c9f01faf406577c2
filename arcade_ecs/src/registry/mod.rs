//! Registry which owns all state of ECS.

use std::any::{type_name, TypeId};
use std::collections::{BTreeSet, HashMap, HashSet};
use std::fmt;

use anymap2::AnyMap;

use crate::component::{ComponentManager, ComponentType};
use crate::entity::EntityAllocator;
use crate::index::{GroupIndex, TagIndex};
use crate::{
    Component, ComponentId, EcsError, Entity, Pool, Result, Signature, System, SystemRecord,
    DEFAULT_POOL_CAPACITY,
};

mod tests;

/// Storage for entities, components and systems of ECS.
///
/// Creation and destruction of entities are deferred:
/// [`create_entity`](Registry::create_entity) and [`kill_entity`](Registry::kill_entity)
/// only enqueue the entity, and the queues are flushed by [`update`](Registry::update)
/// once per frame, before any system runs.
///
pub struct Registry {
    entities: EntityAllocator,
    /// Component signature of each entity, indexed by entity id.
    signatures: Vec<Signature>,
    components: ComponentManager,
    /// Records of systems keyed by system type.
    records: HashMap<TypeId, SystemRecord>,
    /// System instances, one per type.
    systems: AnyMap,
    entities_to_be_added: Vec<Entity>,
    entities_to_be_killed: BTreeSet<Entity>,
    /// Flushed entities whose signature changed since the last flush.
    entities_to_be_synced: BTreeSet<Entity>,
    tags: TagIndex,
    groups: GroupIndex,
}

impl Registry {
    /// Creates an empty registry.
    pub fn new() -> Self {
        Self::with_pool_capacity(DEFAULT_POOL_CAPACITY)
    }

    /// Creates an empty registry whose component pools start with given capacity.
    pub fn with_pool_capacity(pool_capacity: usize) -> Self {
        log::debug!("registry created");
        Self {
            entities: EntityAllocator::new(),
            signatures: Vec::new(),
            components: ComponentManager::new(pool_capacity),
            records: HashMap::new(),
            systems: AnyMap::new(),
            entities_to_be_added: Vec::new(),
            entities_to_be_killed: BTreeSet::new(),
            entities_to_be_synced: BTreeSet::new(),
            tags: TagIndex::default(),
            groups: GroupIndex::default(),
        }
    }

    /// Flushes pending entity changes.
    ///
    /// In order:
    /// 1. created entities are added to every system they match;
    /// 2. entities whose components changed are re-matched against every system;
    /// 3. killed entities are removed from systems, pools, tags and groups,
    ///    and their identifiers become available for reuse.
    ///
    pub fn update(&mut self) {
        let added = std::mem::take(&mut self.entities_to_be_added);
        for &entity in &added {
            self.entities_to_be_synced.remove(&entity);
            self.add_entity_to_systems(entity);
        }

        let synced = std::mem::take(&mut self.entities_to_be_synced);
        for &entity in &synced {
            self.sync_entity_with_systems(entity);
        }

        let killed = std::mem::take(&mut self.entities_to_be_killed);
        for &entity in &killed {
            self.destroy_entity(entity);
        }

        if !(added.is_empty() && synced.is_empty() && killed.is_empty()) {
            log::trace!(
                "registry flushed: {} added, {} synced, {} killed, {} alive",
                added.len(),
                synced.len(),
                killed.len(),
                self.entity_count(),
            );
        }
    }

    /// Creates new entity.
    ///
    /// The entity becomes visible to systems after the next [`update`](Registry::update).
    ///
    pub fn create_entity(&mut self) -> Entity {
        let entity = self.entities.allocate();
        let id = entity.id();
        if id >= self.signatures.len() {
            self.signatures.resize(id + 1, Signature::EMPTY);
        }
        debug_assert!(self.signatures[id].is_empty(), "reused entity has components");
        self.entities_to_be_added.push(entity);
        log::debug!("{} created", entity);
        entity
    }

    /// Enqueues the entity for destruction.
    ///
    /// The entity stays visible to systems until the next [`update`](Registry::update).
    /// Killing an entity which is not alive does nothing.
    ///
    pub fn kill_entity(&mut self, entity: Entity) {
        if !self.is_alive(entity) {
            log::warn!("cannot kill {}: it is not alive", entity);
            return;
        }
        if self.entities_to_be_killed.insert(entity) {
            log::debug!("{} marked to be killed", entity);
        }
    }

    /// Returns `true` if the entity was created and its kill was not flushed yet.
    pub fn is_alive(&self, entity: Entity) -> bool {
        self.entities.is_alive(entity)
    }

    /// Count of alive entities, including ones not flushed yet.
    pub fn entity_count(&self) -> usize {
        self.entities.alive_count()
    }

    /// Signature of components attached to the entity.
    pub fn signature_of(&self, entity: Entity) -> Result<Signature> {
        self.check_alive(entity)?;
        Ok(self.signatures[entity.id()])
    }

    /// Assigns signature bit to component type `T`, if it was not assigned yet.
    ///
    /// Component types are also registered implicitly when first attached or required.
    ///
    /// # Errors
    ///
    /// An error is returned if all [`MAX_COMPONENTS`](crate::MAX_COMPONENTS) bits are taken.
    ///
    pub fn register_component<T>(&mut self) -> Result<ComponentId>
    where
        T: Component,
    {
        self.components.register(ComponentType::of::<T>())
    }

    /// Signature bit of component type `T`, if it was registered.
    pub fn component_id<T>(&self) -> Option<ComponentId>
    where
        T: Component,
    {
        self.components.id_of::<T>()
    }

    /// Count of registered component types.
    pub fn component_type_count(&self) -> usize {
        self.components.type_count()
    }

    /// Attaches component to the entity.
    /// If component of the same type was already attached, it will be replaced by value.
    ///
    /// Systems see the new signature after the next [`update`](Registry::update).
    ///
    pub fn add_component<T>(&mut self, entity: Entity, component: T) -> Result<()>
    where
        T: Component,
    {
        self.check_alive(entity)?;
        let (id, previous) = self.components.insert(entity, component)?;
        if previous.is_none() {
            self.signatures[entity.id()].set(id);
            self.entities_to_be_synced.insert(entity);
            log::trace!("component `{}` added to {}", type_name::<T>(), entity);
        }
        Ok(())
    }

    /// Detaches component of type `T` from the entity.
    ///
    /// Returns detached component; does nothing if there was no such component.
    ///
    pub fn remove_component<T>(&mut self, entity: Entity) -> Option<T>
    where
        T: Component,
    {
        if !self.is_alive(entity) {
            return None;
        }
        let (id, component) = self.components.remove::<T>(entity)?;
        self.signatures[entity.id()].reset(id);
        self.entities_to_be_synced.insert(entity);
        log::trace!("component `{}` removed from {}", type_name::<T>(), entity);
        Some(component)
    }

    /// Returns `true` if component of type `T` is attached to the entity.
    pub fn has_component<T>(&self, entity: Entity) -> bool
    where
        T: Component,
    {
        match (self.signature_of(entity), self.component_id::<T>()) {
            (Ok(signature), Some(id)) => signature.test(id),
            _ => false,
        }
    }

    /// Retrieves an immutable reference to component of type `T` attached to the entity.
    pub fn get_component<T>(&self, entity: Entity) -> Result<&T>
    where
        T: Component,
    {
        self.check_alive(entity)?;
        self.components
            .get(entity)
            .ok_or_else(|| Self::component_not_found::<T>(entity))
    }

    /// Retrieves a mutable reference to component of type `T` attached to the entity.
    pub fn get_component_mut<T>(&mut self, entity: Entity) -> Result<&mut T>
    where
        T: Component,
    {
        self.check_alive(entity)?;
        self.components
            .get_mut(entity)
            .ok_or_else(|| Self::component_not_found::<T>(entity))
    }

    /// Pool of all components of type `T`, if any was ever attached.
    pub fn pool<T>(&self) -> Option<&Pool<T>>
    where
        T: Component,
    {
        self.components.pool()
    }

    /// Adds system to the registry.
    ///
    /// Required components of the system are registered and turned into its signature.
    /// Already flushed entities are matched against the system right away.
    ///
    /// # Errors
    ///
    /// An error is returned if system of the same type was already added,
    /// or if its required components exceed signature capacity.
    ///
    pub fn add_system<S>(&mut self, system: S) -> Result<()>
    where
        S: System,
    {
        let type_id = TypeId::of::<S>();
        let name = system.name();
        if self.records.contains_key(&type_id) {
            return Err(EcsError::DuplicateSystem(name));
        }
        let signature = system
            .requirements()
            .component_types()
            .iter()
            .map(|&component_type| self.components.register(component_type))
            .collect::<Result<Signature>>()?;

        let mut record = SystemRecord::new(name, signature);
        let pending: HashSet<Entity> = self.entities_to_be_added.iter().copied().collect();
        for id in 0..self.signatures.len() {
            let entity = Entity::from_raw(id);
            if self.is_alive(entity) && !pending.contains(&entity) {
                record.sync_entity(entity, self.signatures[id]);
            }
        }
        log::debug!(
            "system `{}` added with signature {} matching {} entities",
            name,
            signature,
            record.entities().len(),
        );
        self.records.insert(type_id, record);
        self.systems.insert(system);
        Ok(())
    }

    /// Removes system from the registry, returning it.
    pub fn remove_system<S>(&mut self) -> Result<S>
    where
        S: System,
    {
        self.records
            .remove(&TypeId::of::<S>())
            .ok_or_else(Self::system_not_found::<S>)?;
        let system = self
            .systems
            .remove::<S>()
            .ok_or_else(Self::system_not_found::<S>)?;
        log::debug!("system `{}` removed", system.name());
        Ok(system)
    }

    /// Returns `true` if system of type `S` was added.
    pub fn has_system<S>(&self) -> bool
    where
        S: System,
    {
        self.records.contains_key(&TypeId::of::<S>())
    }

    /// Retrieves an immutable reference to the system of type `S`.
    pub fn get_system<S>(&self) -> Result<&S>
    where
        S: System,
    {
        self.systems
            .get::<S>()
            .ok_or_else(Self::system_not_found::<S>)
    }

    /// Retrieves a mutable reference to the system of type `S`.
    pub fn get_system_mut<S>(&mut self) -> Result<&mut S>
    where
        S: System,
    {
        self.systems
            .get_mut::<S>()
            .ok_or_else(Self::system_not_found::<S>)
    }

    /// Record of the system of type `S`.
    pub fn system_record<S>(&self) -> Result<&SystemRecord>
    where
        S: System,
    {
        self.records
            .get(&TypeId::of::<S>())
            .ok_or_else(Self::system_not_found::<S>)
    }

    /// Snapshot of entities handled by the system of type `S`.
    ///
    /// The snapshot is not affected by entities created or killed while iterating it.
    ///
    pub fn system_entities<S>(&self) -> Result<Vec<Entity>>
    where
        S: System,
    {
        self.system_record::<S>()
            .map(|record| record.entities().to_vec())
    }

    /// Runs closure with the system of type `S` borrowed together with the registry.
    ///
    /// The system is detached from the registry for the duration of the call,
    /// so [`get_system`](Registry::get_system) of the same type fails inside the closure,
    /// while [`system_entities`](Registry::system_entities) keeps working.
    ///
    pub fn with_system<S, R>(&mut self, f: impl FnOnce(&mut S, &mut Self) -> R) -> Result<R>
    where
        S: System,
    {
        let mut system = self
            .systems
            .remove::<S>()
            .ok_or_else(Self::system_not_found::<S>)?;
        let result = f(&mut system, self);
        if self.has_system::<S>() {
            self.systems.insert(system);
        }
        Ok(result)
    }

    /// Binds unique tag to the entity.
    ///
    /// Previous tag of the entity and previous holder of the tag are released.
    ///
    pub fn tag_entity(&mut self, entity: Entity, tag: &str) -> Result<()> {
        self.check_alive(entity)?;
        self.tags.insert(entity, tag);
        Ok(())
    }

    /// Returns `true` if the entity is tagged with given name.
    pub fn entity_has_tag(&self, entity: Entity, tag: &str) -> bool {
        self.tags.has_tag(entity, tag)
    }

    /// Entity tagged with given name.
    pub fn entity_by_tag(&self, tag: &str) -> Result<Entity> {
        self.tags
            .entity(tag)
            .ok_or_else(|| EcsError::TagNotFound(tag.to_owned()))
    }

    /// Tag of the entity, if any.
    pub fn tag_of(&self, entity: Entity) -> Option<&str> {
        self.tags.tag_of(entity)
    }

    /// Releases tag of the entity; does nothing if the entity has no tag.
    pub fn remove_entity_tag(&mut self, entity: Entity) {
        self.tags.remove(entity);
    }

    /// Moves the entity into the group with given name.
    pub fn group_entity(&mut self, entity: Entity, group: &str) -> Result<()> {
        self.check_alive(entity)?;
        self.groups.insert(entity, group);
        Ok(())
    }

    /// Returns `true` if the entity belongs to the group with given name.
    pub fn entity_belongs_to_group(&self, entity: Entity, group: &str) -> bool {
        self.groups.belongs_to_group(entity, group)
    }

    /// Members of the group; empty if the group was never created.
    pub fn entities_in_group(&self, group: &str) -> Vec<Entity> {
        self.groups.entities(group)
    }

    /// Group of the entity, if any.
    pub fn group_of(&self, entity: Entity) -> Option<&str> {
        self.groups.group_of(entity)
    }

    /// Moves the entity out of its group; does nothing if the entity has no group.
    pub fn remove_entity_group(&mut self, entity: Entity) {
        self.groups.remove(entity);
    }

    /// Checks internal invariants of the registry, logging every violation.
    ///
    /// Intended for debugging: it walks over every entity and every system.
    ///
    pub fn validate(&self) -> bool {
        let pending: HashSet<Entity> = self.entities_to_be_added.iter().copied().collect();
        let mut valid = true;
        for (id, signature) in self.signatures.iter().enumerate() {
            let entity = Entity::from_raw(id);
            if !self.is_alive(entity) {
                if !signature.is_empty() || self.components.holds_entity(entity) {
                    log::error!("dead {} still has components", entity);
                    valid = false;
                }
                continue;
            }
            for index in 0..self.components.type_count() {
                let component = ComponentId::new(index);
                if signature.test(component) != self.components.contains(component, entity) {
                    let name = self
                        .components
                        .component_type(component)
                        .map(ComponentType::name)
                        .unwrap_or("<unknown>");
                    log::error!("signature of {} disagrees with pool of `{}`", entity, name);
                    valid = false;
                }
            }
            let flushed =
                !pending.contains(&entity) && !self.entities_to_be_synced.contains(&entity);
            for record in self.records.values() {
                if flushed && record.matches(*signature) != record.contains(entity) {
                    log::error!("membership of {} in `{}` is stale", entity, record.name());
                    valid = false;
                }
            }
        }
        valid
    }

    fn add_entity_to_systems(&mut self, entity: Entity) {
        let signature = self.signatures[entity.id()];
        for record in self.records.values_mut() {
            if record.matches(signature) {
                record.add_entity(entity);
            }
        }
    }

    fn sync_entity_with_systems(&mut self, entity: Entity) {
        if !self.is_alive(entity) {
            return;
        }
        let signature = self.signatures[entity.id()];
        for record in self.records.values_mut() {
            record.sync_entity(entity, signature);
        }
    }

    fn remove_entity_from_systems(&mut self, entity: Entity) {
        for record in self.records.values_mut() {
            record.remove_entity(entity);
        }
    }

    fn destroy_entity(&mut self, entity: Entity) {
        self.remove_entity_from_systems(entity);
        self.signatures[entity.id()].clear();
        let released = self.components.remove_entity(entity);
        self.remove_entity_tag(entity);
        self.remove_entity_group(entity);
        self.entities.release(entity);
        log::debug!("{} killed, {} component(s) released", entity, released);
    }

    fn check_alive(&self, entity: Entity) -> Result<()> {
        if self.is_alive(entity) {
            Ok(())
        } else {
            Err(EcsError::EntityNotFound(entity))
        }
    }

    fn component_not_found<T>(entity: Entity) -> EcsError
    where
        T: Component,
    {
        EcsError::ComponentNotFound {
            entity,
            component: type_name::<T>(),
        }
    }

    fn system_not_found<S>() -> EcsError
    where
        S: System,
    {
        EcsError::SystemNotFound(type_name::<S>())
    }
}

impl Default for Registry {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for Registry {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.debug_struct("Registry")
            .field("entities", &self.entity_count())
            .field("entity_capacity", &self.entities.capacity())
            .field("component_types", &self.component_type_count())
            .field("components", &self.components.component_count())
            .field("systems", &self.records.len())
            .field("entities_to_be_added", &self.entities_to_be_added)
            .field("entities_to_be_killed", &self.entities_to_be_killed)
            .finish()
    }
}

impl Drop for Registry {
    fn drop(&mut self) {
        log::debug!("registry destroyed");
    }
}
