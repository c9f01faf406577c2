//! Headless arcade game built on top of the ECS:
//! the player shoots projectiles at enemies and enemies shoot back.

use std::time::Duration;

use arcade_ecs::{EventBus, Registry, Result};

use crate::app::DeltaTime;
use crate::config::MapSize;

pub use prefabs::*;

pub mod components;
pub mod events;
pub mod systems;

mod prefabs;
mod tests;

use systems::*;

/// Tag of the entity controlled by the player.
pub const PLAYER_TAG: &str = "player";

/// Group of enemy entities.
pub const ENEMIES_GROUP: &str = "enemies";

/// Group of projectile entities.
pub const PROJECTILES_GROUP: &str = "projectiles";

/// Adds every gameplay system to the registry.
pub fn add_systems(registry: &mut Registry) -> Result<()> {
    registry.add_system(MovementSystem)?;
    registry.add_system(CollisionSystem)?;
    registry.add_system(DamageSystem)?;
    registry.add_system(KeyboardControlSystem)?;
    registry.add_system(ProjectileEmitSystem)?;
    registry.add_system(ProjectileLifecycleSystem)?;
    Ok(())
}

/// Subscribes event handlers of gameplay systems.
///
/// `now` is game time at which handled input events happen.
///
pub fn subscribe_to_events(
    registry: &Registry,
    event_bus: &mut EventBus<Registry>,
    now: Duration,
) -> Result<()> {
    registry
        .get_system::<DamageSystem>()?
        .subscribe_to_events(event_bus);
    registry
        .get_system::<KeyboardControlSystem>()?
        .subscribe_to_events(event_bus);
    registry
        .get_system::<ProjectileEmitSystem>()?
        .subscribe_to_events(event_bus, now);
    Ok(())
}

/// Runs gameplay systems for one frame.
///
/// `now` is game time at the end of the frame.
///
pub fn update_systems(
    registry: &mut Registry,
    event_bus: &mut EventBus<Registry>,
    delta_time: DeltaTime,
    now: Duration,
    map_size: MapSize,
) -> Result<()> {
    registry.with_system(|system: &mut MovementSystem, registry| {
        system.update(registry, delta_time, map_size)
    })??;
    let collisions = registry.with_system(|system: &mut CollisionSystem, registry| {
        system.update(registry, event_bus)
    })??;
    if collisions > 0 {
        log::trace!("{} collision(s) this frame", collisions);
    }
    registry.with_system(|system: &mut ProjectileEmitSystem, registry| {
        system.update(registry, now)
    })??;
    registry.with_system(|system: &mut ProjectileLifecycleSystem, registry| {
        system.update(registry, now)
    })??;
    Ok(())
}
