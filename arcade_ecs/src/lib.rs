//! Entity Component System (ECS) utilities for arcade game engine.
//!
//! The [`Registry`] owns every piece of ECS state: entity signatures,
//! component pools, system records and tag/group indices.
//! Entity creation and destruction are deferred until the next call of
//! [`Registry::update`], so systems never observe an entity disappearing
//! in the middle of a frame.
//!
//! Systems communicate with each other through the [`EventBus`].

pub use component::{Component, ComponentId, ComponentType, Pool, DEFAULT_POOL_CAPACITY};
pub use entity::{Entity, EntityId};
pub use error::{EcsError, Result};
pub use event::{Event, EventBus};
pub use registry::Registry;
pub use system::{ComponentSet, Requirements, Signature, System, SystemRecord, MAX_COMPONENTS};

mod component;
mod entity;
mod error;
mod event;
mod index;
mod registry;
mod system;
