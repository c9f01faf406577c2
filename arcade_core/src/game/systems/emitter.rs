use std::time::Duration;

use arcade_ecs::{Entity, EventBus, Registry, Requirements, Result, System};
use ultraviolet::Vec2;

use crate::game::components::{BoxCollider, ProjectileEmitter, RigidBody, Transform};
use crate::game::events::KeyPressedEvent;
use crate::game::{spawn_projectile, PLAYER_TAG};
use crate::input::Key;

/// Fires projectiles from emitters: on demand for the player,
/// periodically for emitters with repeat frequency.
#[derive(Debug, Default)]
pub struct ProjectileEmitSystem;

impl System for ProjectileEmitSystem {
    fn requirements(&self) -> Requirements {
        Requirements::of::<(ProjectileEmitter, Transform)>()
    }
}

impl ProjectileEmitSystem {
    /// Subscribes to the fire key; shots are stamped with game time `now`.
    pub fn subscribe_to_events(&self, event_bus: &mut EventBus<Registry>, now: Duration) {
        event_bus.subscribe(move |event: &mut KeyPressedEvent, registry: &mut Registry| {
            if event.key != Key::Space {
                return;
            }
            if let Err(error) = Self::fire(registry, now) {
                log::error!("cannot fire projectile: {}", error);
            }
        });
    }

    fn fire(registry: &mut Registry, now: Duration) -> Result<()> {
        for entity in registry.system_entities::<Self>()? {
            if !registry.entity_has_tag(entity, PLAYER_TAG) {
                continue;
            }
            let emitter = *registry.get_component::<ProjectileEmitter>(entity)?;
            let mut velocity = emitter.velocity;
            if registry.has_component::<RigidBody>(entity) {
                let own = registry.get_component::<RigidBody>(entity)?.velocity;
                if own.x != 0.0 {
                    velocity.x = velocity.x * own.x.signum() + own.x;
                    velocity.y = 0.0;
                }
                if own.y != 0.0 {
                    velocity.y = velocity.y * own.y.signum() + own.y;
                    velocity.x = 0.0;
                }
            }
            let position = muzzle(registry, entity)?;
            let projectile = spawn_projectile(registry, position, velocity, emitter.projectile(now))?;
            log::debug!("{} fired {}", entity, projectile);
        }
        Ok(())
    }

    /// Emits projectiles from every emitter whose repeat frequency has elapsed.
    pub fn update(&mut self, registry: &mut Registry, now: Duration) -> Result<()> {
        for entity in registry.system_entities::<Self>()? {
            let emitter = *registry.get_component::<ProjectileEmitter>(entity)?;
            if !emitter.is_due(now) {
                continue;
            }
            let position = muzzle(registry, entity)?;
            let projectile =
                spawn_projectile(registry, position, emitter.velocity, emitter.projectile(now))?;
            log::trace!("{} emitted {}", entity, projectile);
            registry
                .get_component_mut::<ProjectileEmitter>(entity)?
                .last_emission_time = now;
        }
        Ok(())
    }
}

/// Center of the entity box, or its position if it has no box.
fn muzzle(registry: &Registry, entity: Entity) -> Result<Vec2> {
    let transform = registry.get_component::<Transform>(entity)?;
    if !registry.has_component::<BoxCollider>(entity) {
        return Ok(transform.position);
    }
    let collider = registry.get_component::<BoxCollider>(entity)?;
    let size = Vec2::new(collider.width, collider.height) * transform.scale;
    Ok(transform.position + collider.offset + size / 2.0)
}
