use std::time::Duration;

use arcade_ecs::{Entity, Registry, Result};
use ultraviolet::Vec2;

use crate::game::components::*;
use crate::game::{ENEMIES_GROUP, PLAYER_TAG, PROJECTILES_GROUP};

const SPRITE_SIZE: f32 = 32.0;

const PLAYER_SHOT_SPEED: f32 = 300.0;
const PLAYER_SHOT_DURATION: Duration = Duration::from_secs(4);
const PLAYER_SHOT_DAMAGE: i32 = 10;

/// Creates the player, tagged with [`PLAYER_TAG`], which fires friendly shots on demand.
pub fn spawn_player(registry: &mut Registry, position: Vec2, speed: f32) -> Result<Entity> {
    let player = registry.create_entity();
    player.add_component(registry, Transform::new(position))?;
    player.add_component(registry, RigidBody::default())?;
    player.add_component(registry, BoxCollider::new(SPRITE_SIZE, SPRITE_SIZE))?;
    player.add_component(registry, Health::default())?;
    player.add_component(registry, KeyboardControlled::with_speed(speed))?;
    player.add_component(
        registry,
        ProjectileEmitter::on_demand(
            Vec2::broadcast(PLAYER_SHOT_SPEED),
            PLAYER_SHOT_DURATION,
            PLAYER_SHOT_DAMAGE,
            true,
        ),
    )?;
    player.tag(registry, PLAYER_TAG)?;
    Ok(player)
}

/// Creates an enemy in the [`ENEMIES_GROUP`].
pub fn spawn_enemy(registry: &mut Registry, position: Vec2, velocity: Vec2) -> Result<Entity> {
    let enemy = registry.create_entity();
    enemy.add_component(registry, Transform::new(position))?;
    enemy.add_component(registry, RigidBody::new(velocity))?;
    enemy.add_component(registry, BoxCollider::new(SPRITE_SIZE, SPRITE_SIZE))?;
    enemy.add_component(registry, Health::default())?;
    enemy.group(registry, ENEMIES_GROUP)?;
    Ok(enemy)
}

/// Creates a projectile in the [`PROJECTILES_GROUP`].
pub fn spawn_projectile(
    registry: &mut Registry,
    position: Vec2,
    velocity: Vec2,
    projectile: Projectile,
) -> Result<Entity> {
    let entity = registry.create_entity();
    entity.add_component(registry, Transform::new(position))?;
    entity.add_component(registry, RigidBody::new(velocity))?;
    entity.add_component(registry, BoxCollider::new(4.0, 4.0))?;
    entity.add_component(registry, projectile)?;
    entity.group(registry, PROJECTILES_GROUP)?;
    Ok(entity)
}

impl Projectile {
    /// Projectile of the player which hits enemies.
    pub fn friendly(damage_percent: i32, duration: Duration, spawn_time: Duration) -> Self {
        Self {
            friendly: true,
            damage_percent,
            duration,
            spawn_time,
        }
    }

    /// Projectile of an enemy which hits the player.
    pub fn hostile(damage_percent: i32, duration: Duration, spawn_time: Duration) -> Self {
        Self {
            friendly: false,
            ..Self::friendly(damage_percent, duration, spawn_time)
        }
    }
}
