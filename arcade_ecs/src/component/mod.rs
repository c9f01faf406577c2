//! Utilities for *components* in ECS.

use std::any::{type_name, Any, TypeId};
use std::fmt;

pub use pool::*;

pub(crate) use manager::ComponentManager;

mod manager;
mod pool;
mod types;

/// Objects of this trait represent *component* of ECS.
///
/// Components should be just plain data without any behaviour.
///
pub trait Component: Any {}

impl<T> Component for T where T: Any {}

/// Identifier of the component *type*, which is also its bit in a [`Signature`](crate::Signature).
///
/// Identifiers are assigned by the registry in order of registration
/// and stay the same for the whole lifetime of the registry.
///
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[repr(transparent)]
pub struct ComponentId(usize);

impl ComponentId {
    pub(crate) const fn new(index: usize) -> Self {
        Self(index)
    }

    /// Bit index of this component type.
    pub const fn index(self) -> usize {
        self.0
    }
}

impl fmt::Display for ComponentId {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Runtime description of the component type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ComponentType {
    type_id: TypeId,
    name: &'static str,
}

impl ComponentType {
    /// Describes component type `T`.
    pub fn of<T>() -> Self
    where
        T: Component,
    {
        Self {
            type_id: TypeId::of::<T>(),
            name: type_name::<T>(),
        }
    }

    pub fn type_id(&self) -> TypeId {
        self.type_id
    }

    /// Human readable name of the type.
    pub fn name(&self) -> &'static str {
        self.name
    }
}
