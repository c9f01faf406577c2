//! Assignment of signature bits to component types.

use std::any::TypeId;
use std::collections::HashMap;

use super::{ComponentId, ComponentType};
use crate::{EcsError, Result, MAX_COMPONENTS};

/// Table of component types known to the registry.
///
/// Each type gets the next free bit on its first registration;
/// registering the same type again returns the same bit.
/// The table belongs to exactly one registry, so unrelated registries
/// never share (or exhaust) each other's bits.
///
#[derive(Debug, Default)]
pub(crate) struct ComponentTypes {
    ids: HashMap<TypeId, ComponentId>,
    types: Vec<ComponentType>,
}

impl ComponentTypes {
    pub fn register(&mut self, component_type: ComponentType) -> Result<ComponentId> {
        if let Some(&id) = self.ids.get(&component_type.type_id()) {
            return Ok(id);
        }
        if self.types.len() >= MAX_COMPONENTS {
            return Err(EcsError::InvalidCapacity {
                component: component_type.name(),
                capacity: MAX_COMPONENTS,
            });
        }
        let id = ComponentId::new(self.types.len());
        self.ids.insert(component_type.type_id(), id);
        self.types.push(component_type);
        log::debug!(
            "component `{}` registered with id {}",
            component_type.name(),
            id,
        );
        Ok(id)
    }

    pub fn id_of(&self, type_id: TypeId) -> Option<ComponentId> {
        self.ids.get(&type_id).copied()
    }

    pub fn get(&self, id: ComponentId) -> Option<&ComponentType> {
        self.types.get(id.index())
    }

    pub fn len(&self) -> usize {
        self.types.len()
    }
}
