//! Events of the arcade game.

use arcade_ecs::Entity;

use crate::input::Key;

/// Emitted once for every pair of colliding entities.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub struct CollisionEvent {
    pub a: Entity,
    pub b: Entity,
}

/// Emitted for every key pressed by the player.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub struct KeyPressedEvent {
    pub key: Key,
}
