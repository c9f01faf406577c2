//! Error types of ECS.

use thiserror::Error;

use crate::Entity;

/// Result of any ECS operation which can fail.
pub type Result<T> = std::result::Result<T, EcsError>;

/// Error that can happen while working with the [`Registry`](crate::Registry).
///
/// Every failure is local to the operation which produced it:
/// the registry itself stays consistent and usable.
///
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum EcsError {
    #[error("no component `{component}` is attached to {entity}")]
    ComponentNotFound {
        entity: Entity,
        component: &'static str,
    },

    #[error("{0} is not alive")]
    EntityNotFound(Entity),

    #[error("system `{0}` was not added to the registry")]
    SystemNotFound(&'static str),

    #[error("no entity is tagged with `{0}`")]
    TagNotFound(String),

    #[error("cannot register component `{component}`: at most {capacity} component types are supported")]
    InvalidCapacity {
        component: &'static str,
        capacity: usize,
    },

    #[error("system `{0}` was already added to the registry")]
    DuplicateSystem(&'static str),
}
