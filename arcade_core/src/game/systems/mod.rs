//! Gameplay systems of the arcade game.

pub use collision::CollisionSystem;
pub use damage::DamageSystem;
pub use emitter::ProjectileEmitSystem;
pub use keyboard::KeyboardControlSystem;
pub use movement::MovementSystem;
pub use projectile::ProjectileLifecycleSystem;

mod collision;
mod damage;
mod emitter;
mod keyboard;
mod movement;
mod projectile;
