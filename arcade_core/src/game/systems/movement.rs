use arcade_ecs::{Registry, Requirements, Result, System};

use crate::app::DeltaTime;
use crate::config::MapSize;
use crate::game::components::{RigidBody, Transform};
use crate::game::PLAYER_TAG;

/// Moves entities by their velocity.
///
/// Entities which leave the map are killed, except for the player.
///
#[derive(Debug, Default)]
pub struct MovementSystem;

impl System for MovementSystem {
    fn requirements(&self) -> Requirements {
        Requirements::of::<(Transform, RigidBody)>()
    }
}

impl MovementSystem {
    pub fn update(
        &mut self,
        registry: &mut Registry,
        delta_time: DeltaTime,
        map_size: MapSize,
    ) -> Result<()> {
        let dt = delta_time.as_secs_f32();
        for entity in registry.system_entities::<Self>()? {
            let velocity = registry.get_component::<RigidBody>(entity)?.velocity;
            let transform = registry.get_component_mut::<Transform>(entity)?;
            transform.position += velocity * dt;

            let position = transform.position;
            let outside = !map_size.contains(position.x, position.y);
            if outside && !registry.entity_has_tag(entity, PLAYER_TAG) {
                log::debug!("{} left the map at ({}, {})", entity, position.x, position.y);
                registry.kill_entity(entity);
            }
        }
        Ok(())
    }
}
