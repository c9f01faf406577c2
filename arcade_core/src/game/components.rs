//! Components of the arcade game.

use std::time::Duration;

use ultraviolet::Vec2;

/// Position, scale and rotation of the entity on the map.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct Transform {
    pub position: Vec2,
    pub scale: Vec2,
    /// Rotation in degrees, clockwise, where `0` faces right.
    pub rotation: f32,
}

impl Transform {
    pub fn new(position: Vec2) -> Self {
        Self {
            position,
            ..Self::default()
        }
    }
}

impl Default for Transform {
    fn default() -> Self {
        Self {
            position: Vec2::zero(),
            scale: Vec2::broadcast(1.0),
            rotation: 0.0,
        }
    }
}

/// Velocity of the entity, in map units per second.
#[derive(Debug, Copy, Clone, Default, PartialEq)]
pub struct RigidBody {
    pub velocity: Vec2,
}

impl RigidBody {
    pub fn new(velocity: Vec2) -> Self {
        Self { velocity }
    }
}

/// Axis aligned box used to detect collisions.
///
/// Box is placed at entity position shifted by offset
/// and is scaled together with the entity.
///
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct BoxCollider {
    pub width: f32,
    pub height: f32,
    pub offset: Vec2,
}

impl BoxCollider {
    pub fn new(width: f32, height: f32) -> Self {
        Self {
            width,
            height,
            offset: Vec2::zero(),
        }
    }
}

/// Health of the entity. The entity dies when it drops to zero.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub struct Health {
    pub percentage: i32,
}

impl Default for Health {
    fn default() -> Self {
        Self { percentage: 100 }
    }
}

/// Projectile which damages entities it collides with.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct Projectile {
    /// Friendly projectiles hit enemies, other ones hit the player.
    pub friendly: bool,
    pub damage_percent: i32,
    /// Lifetime of the projectile.
    pub duration: Duration,
    /// Game time at which the projectile was spawned.
    pub spawn_time: Duration,
}

impl Projectile {
    /// Returns `true` if the projectile outlived its duration at given game time.
    pub fn is_expired(&self, now: Duration) -> bool {
        now.saturating_sub(self.spawn_time) >= self.duration
    }
}

/// Source of projectiles fired by the entity.
///
/// Emitters without repeat frequency fire only on demand,
/// i.e. when the player presses the fire key.
///
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct ProjectileEmitter {
    pub velocity: Vec2,
    pub repeat_frequency: Option<Duration>,
    /// Lifetime of emitted projectiles.
    pub duration: Duration,
    pub damage_percent: i32,
    pub friendly: bool,
    /// Game time of the last automatic emission.
    pub last_emission_time: Duration,
}

impl ProjectileEmitter {
    pub fn on_demand(
        velocity: Vec2,
        duration: Duration,
        damage_percent: i32,
        friendly: bool,
    ) -> Self {
        Self {
            velocity,
            repeat_frequency: None,
            duration,
            damage_percent,
            friendly,
            last_emission_time: Duration::ZERO,
        }
    }

    pub fn repeating(
        velocity: Vec2,
        repeat_frequency: Duration,
        duration: Duration,
        damage_percent: i32,
        friendly: bool,
    ) -> Self {
        Self {
            repeat_frequency: Some(repeat_frequency),
            ..Self::on_demand(velocity, duration, damage_percent, friendly)
        }
    }

    /// Creates projectile component for a projectile emitted at given game time.
    pub fn projectile(&self, spawn_time: Duration) -> Projectile {
        Projectile {
            friendly: self.friendly,
            damage_percent: self.damage_percent,
            duration: self.duration,
            spawn_time,
        }
    }

    /// Returns `true` if automatic emission is due at given game time.
    pub fn is_due(&self, now: Duration) -> bool {
        self.repeat_frequency
            .map_or(false, |frequency| now.saturating_sub(self.last_emission_time) >= frequency)
    }
}

/// Velocities applied to the entity when arrow keys are pressed.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct KeyboardControlled {
    pub up_velocity: Vec2,
    pub right_velocity: Vec2,
    pub down_velocity: Vec2,
    pub left_velocity: Vec2,
}

impl KeyboardControlled {
    /// Same speed in every direction.
    pub fn with_speed(speed: f32) -> Self {
        Self {
            up_velocity: Vec2::new(0.0, -speed),
            right_velocity: Vec2::new(speed, 0.0),
            down_velocity: Vec2::new(0.0, speed),
            left_velocity: Vec2::new(-speed, 0.0),
        }
    }
}
