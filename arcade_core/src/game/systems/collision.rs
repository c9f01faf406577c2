use arcade_ecs::{Entity, EventBus, Registry, Requirements, Result, System};
use ultraviolet::Vec2;

use crate::game::components::{BoxCollider, Transform};
use crate::game::events::CollisionEvent;

/// Detects collisions between boxes of entities.
#[derive(Debug, Default)]
pub struct CollisionSystem;

impl System for CollisionSystem {
    fn requirements(&self) -> Requirements {
        Requirements::of::<(Transform, BoxCollider)>()
    }
}

impl CollisionSystem {
    /// Emits [`CollisionEvent`] once for every pair of colliding entities.
    ///
    /// Returns count of collisions found.
    ///
    pub fn update(
        &mut self,
        registry: &mut Registry,
        event_bus: &mut EventBus<Registry>,
    ) -> Result<usize> {
        let boxes = registry
            .system_entities::<Self>()?
            .into_iter()
            .map(|entity| Aabb::of(registry, entity).map(|aabb| (entity, aabb)))
            .collect::<Result<Vec<_>>>()?;

        let mut collisions = 0;
        for (i, &(a, a_box)) in boxes.iter().enumerate() {
            for &(b, b_box) in &boxes[i + 1..] {
                if a_box.intersects(&b_box) {
                    log::trace!("{} is colliding with {}", a, b);
                    event_bus.emit(CollisionEvent { a, b }, registry);
                    collisions += 1;
                }
            }
        }
        Ok(collisions)
    }
}

#[derive(Debug, Copy, Clone)]
struct Aabb {
    min: Vec2,
    max: Vec2,
}

impl Aabb {
    fn of(registry: &Registry, entity: Entity) -> Result<Self> {
        let transform = registry.get_component::<Transform>(entity)?;
        let collider = registry.get_component::<BoxCollider>(entity)?;
        let min = transform.position + collider.offset;
        let size = Vec2::new(collider.width, collider.height) * transform.scale;
        Ok(Self {
            min,
            max: min + size,
        })
    }

    fn intersects(&self, other: &Self) -> bool {
        self.min.x < other.max.x
            && self.max.x > other.min.x
            && self.min.y < other.max.y
            && self.max.y > other.min.y
    }
}
