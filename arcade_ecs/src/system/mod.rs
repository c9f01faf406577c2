//! Utilities for *systems* in ECS.

use std::{any::type_name, collections::HashSet};

pub use signature::*;

use crate::{component::ComponentType, Component, Entity};

mod signature;

/// Objects of this trait represent *system* of ECS.
///
/// A system declares which components it requires;
/// the registry then keeps track of every entity having all of them.
/// Update logic lives in the system itself and is driven by the game loop
/// through [`Registry::with_system`](crate::Registry::with_system).
///
pub trait System: 'static {
    /// Component types which an entity must have to be handled by this system.
    fn requirements(&self) -> Requirements;

    /// Human readable name of the system.
    fn name(&self) -> &'static str {
        type_name::<Self>()
    }
}

/// List of component types required by the system.
///
/// Types are turned into a [`Signature`] by the registry once,
/// when the system is added.
///
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct Requirements {
    component_types: Vec<ComponentType>,
}

impl Requirements {
    /// Creates requirements without any component types.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates requirements from the set of component types.
    pub fn of<S>() -> Self
    where
        S: ComponentSet,
    {
        let mut requirements = Self::new();
        S::component_types()
            .into_iter()
            .for_each(|component_type| requirements.push(component_type));
        requirements
    }

    /// Requires component of type `T`.
    pub fn require_component<T>(mut self) -> Self
    where
        T: Component,
    {
        self.push(ComponentType::of::<T>());
        self
    }

    /// Required component types, without duplicates.
    pub fn component_types(&self) -> &[ComponentType] {
        &self.component_types
    }

    fn push(&mut self, component_type: ComponentType) {
        if !self.component_types.contains(&component_type) {
            self.component_types.push(component_type);
        }
    }
}

/// Registry-side state of the system: required signature
/// and entities which matched it at the last flush.
///
#[derive(Debug, Clone)]
pub struct SystemRecord {
    name: &'static str,
    signature: Signature,
    entities: Vec<Entity>,
    members: HashSet<Entity>,
}

impl SystemRecord {
    pub(crate) fn new(name: &'static str, signature: Signature) -> Self {
        Self {
            name,
            signature,
            entities: Vec::new(),
            members: HashSet::new(),
        }
    }

    pub fn name(&self) -> &'static str {
        self.name
    }

    /// Signature required by the system.
    pub fn signature(&self) -> Signature {
        self.signature
    }

    /// Returns `true` if entity with given signature should be handled by the system.
    pub fn matches(&self, signature: Signature) -> bool {
        signature.contains(self.signature)
    }

    /// Entities handled by the system, in order they were added to it.
    pub fn entities(&self) -> &[Entity] {
        &self.entities
    }

    pub fn contains(&self, entity: Entity) -> bool {
        self.members.contains(&entity)
    }

    pub(crate) fn add_entity(&mut self, entity: Entity) {
        if self.members.insert(entity) {
            self.entities.push(entity);
        }
    }

    pub(crate) fn remove_entity(&mut self, entity: Entity) -> bool {
        if !self.members.remove(&entity) {
            return false;
        }
        if let Some(index) = self.entities.iter().position(|&other| other == entity) {
            self.entities.remove(index);
        }
        true
    }

    /// Adds or removes the entity depending on whether its signature matches.
    pub(crate) fn sync_entity(&mut self, entity: Entity, signature: Signature) {
        if self.matches(signature) {
            self.add_entity(entity);
        } else {
            self.remove_entity(entity);
        }
    }
}
