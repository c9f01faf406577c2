use std::time::Duration;

use arcade_ecs::{Registry, Requirements, Result, System};

use crate::game::components::Projectile;

/// Kills projectiles which outlived their duration.
#[derive(Debug, Default)]
pub struct ProjectileLifecycleSystem;

impl System for ProjectileLifecycleSystem {
    fn requirements(&self) -> Requirements {
        Requirements::of::<(Projectile,)>()
    }
}

impl ProjectileLifecycleSystem {
    /// Checks projectiles against current game time.
    pub fn update(&mut self, registry: &mut Registry, now: Duration) -> Result<()> {
        for entity in registry.system_entities::<Self>()? {
            if registry.get_component::<Projectile>(entity)?.is_expired(now) {
                log::debug!("{} expired", entity);
                registry.kill_entity(entity);
            }
        }
        Ok(())
    }
}
