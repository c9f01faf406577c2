use arcade_ecs::{Entity, EventBus, Registry, Requirements, Result, System};

use crate::game::components::{BoxCollider, Health, Projectile};
use crate::game::events::CollisionEvent;
use crate::game::{ENEMIES_GROUP, PLAYER_TAG, PROJECTILES_GROUP};

/// Applies damage of projectiles to the player and enemies.
#[derive(Debug, Default)]
pub struct DamageSystem;

impl System for DamageSystem {
    fn requirements(&self) -> Requirements {
        Requirements::of::<(BoxCollider,)>()
    }
}

impl DamageSystem {
    pub fn subscribe_to_events(&self, event_bus: &mut EventBus<Registry>) {
        event_bus.subscribe(Self::on_collision);
    }

    fn on_collision(event: &mut CollisionEvent, registry: &mut Registry) {
        let CollisionEvent { a, b } = *event;
        for (projectile, target) in [(a, b), (b, a)] {
            if let Err(error) = Self::on_projectile_hit(registry, projectile, target) {
                log::error!(
                    "cannot apply damage of {} to {}: {}",
                    projectile,
                    target,
                    error,
                );
            }
        }
    }

    fn on_projectile_hit(
        registry: &mut Registry,
        projectile: Entity,
        target: Entity,
    ) -> Result<()> {
        if !registry.entity_belongs_to_group(projectile, PROJECTILES_GROUP) {
            return Ok(());
        }
        // friendly projectiles hit enemies only, hostile ones hit the player only
        let hit_by_friendly = if registry.entity_has_tag(target, PLAYER_TAG) {
            false
        } else if registry.entity_belongs_to_group(target, ENEMIES_GROUP) {
            true
        } else {
            return Ok(());
        };
        let hit = *registry.get_component::<Projectile>(projectile)?;
        if hit.friendly != hit_by_friendly {
            return Ok(());
        }

        let health = registry.get_component_mut::<Health>(target)?;
        health.percentage -= hit.damage_percent;
        let percentage = health.percentage;
        log::debug!("{} hit {}, health is now {}%", projectile, target, percentage);
        if percentage <= 0 {
            registry.kill_entity(target);
        }
        registry.kill_entity(projectile);
        Ok(())
    }
}
