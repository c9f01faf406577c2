#![cfg(test)]

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use super::*;
use crate::{Requirements, MAX_COMPONENTS};

#[derive(Debug, Clone, Copy, PartialEq)]
struct Position {
    x: f32,
    y: f32,
}

#[derive(Debug, Clone, Copy, PartialEq)]
struct Velocity {
    x: f32,
    y: f32,
}

#[derive(Debug, Clone, Copy, PartialEq)]
struct Health(i32);

#[derive(Default)]
struct MovementSystem {
    updates: usize,
}

impl System for MovementSystem {
    fn requirements(&self) -> Requirements {
        Requirements::new()
            .require_component::<Position>()
            .require_component::<Velocity>()
    }
}

impl MovementSystem {
    fn update(&mut self, registry: &mut Registry) -> Result<()> {
        for entity in registry.system_entities::<Self>()? {
            let velocity = *registry.get_component::<Velocity>(entity)?;
            let position = registry.get_component_mut::<Position>(entity)?;
            position.x += velocity.x;
            position.y += velocity.y;
        }
        self.updates += 1;
        Ok(())
    }
}

struct PositionSystem;

impl System for PositionSystem {
    fn requirements(&self) -> Requirements {
        Requirements::of::<(Position,)>()
    }
}

fn origin() -> Position {
    Position { x: 0.0, y: 0.0 }
}

#[test]
fn test_created_entity_is_visible_after_update() {
    let mut registry = Registry::new();
    registry.add_system(PositionSystem).unwrap();

    let entity = registry.create_entity();
    registry.add_component(entity, origin()).unwrap();
    assert!(registry.is_alive(entity));
    assert!(registry.system_entities::<PositionSystem>().unwrap().is_empty());

    registry.update();
    assert_eq!(registry.system_entities::<PositionSystem>().unwrap(), [entity]);
    assert!(registry.validate());
}

#[test]
fn test_system_matches_only_entities_with_required_components() {
    let mut registry = Registry::new();
    let e1 = registry.create_entity();
    e1.add_component(&mut registry, origin()).unwrap();
    let _e2 = registry.create_entity();
    registry.add_system(PositionSystem).unwrap();
    registry.update();

    assert_eq!(registry.system_entities::<PositionSystem>().unwrap(), [e1]);

    e1.kill(&mut registry);
    // still visible until the flush
    assert_eq!(registry.system_entities::<PositionSystem>().unwrap(), [e1]);
    registry.update();

    assert!(registry.system_entities::<PositionSystem>().unwrap().is_empty());
    assert!(matches!(
        registry.get_component::<Position>(e1),
        Err(EcsError::EntityNotFound(entity)) if entity == e1
    ));
}

#[test]
fn test_superset_signature_matches() {
    let mut registry = Registry::new();
    registry.add_system(MovementSystem::default()).unwrap();

    let both = registry.create_entity();
    both.add_component(&mut registry, origin()).unwrap();
    both.add_component(&mut registry, Velocity { x: 1.0, y: 0.0 }).unwrap();
    both.add_component(&mut registry, Health(100)).unwrap();

    let only_position = registry.create_entity();
    only_position.add_component(&mut registry, origin()).unwrap();

    registry.update();
    assert_eq!(registry.system_entities::<MovementSystem>().unwrap(), [both]);
}

#[test]
fn test_component_changes_apply_on_next_flush() {
    let mut registry = Registry::new();
    registry.add_system(MovementSystem::default()).unwrap();
    let entity = registry.create_entity();
    entity.add_component(&mut registry, origin()).unwrap();
    registry.update();
    assert!(registry.system_entities::<MovementSystem>().unwrap().is_empty());

    entity.add_component(&mut registry, Velocity { x: 1.0, y: 1.0 }).unwrap();
    assert!(registry.system_entities::<MovementSystem>().unwrap().is_empty());
    registry.update();
    assert_eq!(registry.system_entities::<MovementSystem>().unwrap(), [entity]);

    assert_eq!(
        entity.remove_component::<Velocity>(&mut registry),
        Some(Velocity { x: 1.0, y: 1.0 })
    );
    assert!(!entity.has_component::<Velocity>(&registry));
    assert_eq!(registry.system_entities::<MovementSystem>().unwrap(), [entity]);
    registry.update();
    assert!(registry.system_entities::<MovementSystem>().unwrap().is_empty());
    assert!(registry.validate());
}

#[test]
fn test_component_access() {
    let mut registry = Registry::new();
    let entity = registry.create_entity();

    assert!(!registry.has_component::<Position>(entity));
    assert!(matches!(
        registry.get_component::<Position>(entity),
        Err(EcsError::ComponentNotFound { .. })
    ));

    registry.add_component(entity, Position { x: 1.0, y: 2.0 }).unwrap();
    assert!(registry.has_component::<Position>(entity));
    assert_eq!(
        registry.get_component::<Position>(entity),
        Ok(&Position { x: 1.0, y: 2.0 })
    );

    entity.get_component_mut::<Position>(&mut registry).unwrap().x = 5.0;
    assert_eq!(entity.get_component::<Position>(&registry).unwrap().x, 5.0);

    // overwrite keeps a single component
    registry.add_component(entity, origin()).unwrap();
    assert_eq!(registry.pool::<Position>().map(Pool::len), Some(1));
    assert_eq!(registry.get_component::<Position>(entity), Ok(&origin()));

    // removing twice is a no-op
    assert!(registry.remove_component::<Position>(entity).is_some());
    assert!(registry.remove_component::<Position>(entity).is_none());
    assert!(registry.remove_component::<Velocity>(entity).is_none());
}

#[test]
fn test_dead_entity_operations() {
    let mut registry = Registry::new();
    let entity = Entity::from_raw(17);

    assert_eq!(
        registry.add_component(entity, origin()),
        Err(EcsError::EntityNotFound(entity))
    );
    assert_eq!(registry.tag_entity(entity, "ghost"), Err(EcsError::EntityNotFound(entity)));
    assert_eq!(registry.group_entity(entity, "ghosts"), Err(EcsError::EntityNotFound(entity)));
    assert!(registry.remove_component::<Position>(entity).is_none());
    registry.kill_entity(entity);
    registry.update();
    assert_eq!(registry.entity_count(), 0);
}

#[test]
fn test_killed_ids_are_reused_without_stale_data() {
    let mut registry = Registry::new();
    registry.add_system(PositionSystem).unwrap();

    let first = registry.create_entity();
    first.add_component(&mut registry, Position { x: 3.0, y: 4.0 }).unwrap();
    first.add_component(&mut registry, Health(10)).unwrap();
    first.tag(&mut registry, "player").unwrap();
    first.group(&mut registry, "heroes").unwrap();
    registry.update();

    first.kill(&mut registry);
    registry.update();
    assert!(!registry.is_alive(first));
    assert_eq!(registry.entities.free_ids().collect::<Vec<_>>(), [first.id()]);

    let revived = registry.create_entity();
    assert_eq!(revived.id(), first.id());
    assert_eq!(registry.signature_of(revived), Ok(Signature::EMPTY));
    assert!(!revived.has_component::<Position>(&registry));
    assert!(registry.get_component::<Health>(revived).is_err());
    assert!(!revived.has_tag(&registry, "player"));
    assert!(!revived.belongs_to_group(&registry, "heroes"));
    assert!(registry.entities_in_group("heroes").is_empty());
    assert!(matches!(registry.entity_by_tag("player"), Err(EcsError::TagNotFound(_))));

    registry.update();
    assert!(registry.system_entities::<PositionSystem>().unwrap().is_empty());
    assert!(registry.validate());
}

#[test]
fn test_kill_twice_and_create_kill_same_frame() {
    let mut registry = Registry::new();
    registry.add_system(PositionSystem).unwrap();

    let entity = registry.create_entity();
    entity.add_component(&mut registry, origin()).unwrap();
    entity.kill(&mut registry);
    entity.kill(&mut registry);
    registry.update();

    assert!(!registry.is_alive(entity));
    assert!(registry.system_entities::<PositionSystem>().unwrap().is_empty());
    assert_eq!(registry.pool::<Position>().map(Pool::len), Some(0));
    assert_eq!(registry.entities.free_ids().count(), 1);
}

#[test]
fn test_random_create_kill_sequences() {
    let mut rng = StdRng::seed_from_u64(42);
    let mut registry = Registry::new();
    registry.add_system(MovementSystem::default()).unwrap();
    let mut alive: Vec<Entity> = Vec::new();

    for _frame in 0..200 {
        for _ in 0..rng.gen_range(0..5) {
            let entity = registry.create_entity();
            assert_eq!(registry.signature_of(entity), Ok(Signature::EMPTY));
            entity.add_component(&mut registry, origin()).unwrap();
            if rng.gen_bool(0.5) {
                entity.add_component(&mut registry, Velocity { x: 1.0, y: 0.0 }).unwrap();
            }
            alive.push(entity);
        }
        let mut killed = Vec::new();
        for _ in 0..rng.gen_range(0..3) {
            if alive.is_empty() {
                break;
            }
            let entity = alive.swap_remove(rng.gen_range(0..alive.len()));
            entity.kill(&mut registry);
            killed.push(entity);
        }
        registry.update();

        for entity in killed {
            assert!(!registry.is_alive(entity) || alive.contains(&entity));
            assert!(registry.entities.free_ids().any(|id| id == entity.id()));
        }
        assert_eq!(registry.entity_count(), alive.len());
        assert_eq!(registry.pool::<Position>().map(Pool::len), Some(alive.len()));
    }
    assert!(registry.validate());
}

#[test]
fn test_systems() {
    let mut registry = Registry::new();
    assert!(!registry.has_system::<MovementSystem>());
    assert!(matches!(
        registry.get_system::<MovementSystem>(),
        Err(EcsError::SystemNotFound(_))
    ));

    registry.add_system(MovementSystem::default()).unwrap();
    assert!(registry.has_system::<MovementSystem>());
    assert!(matches!(
        registry.add_system(MovementSystem::default()),
        Err(EcsError::DuplicateSystem(_))
    ));

    let entity = registry.create_entity();
    entity.add_component(&mut registry, origin()).unwrap();
    entity.add_component(&mut registry, Velocity { x: 2.0, y: -1.0 }).unwrap();
    registry.update();

    registry
        .with_system(|movement: &mut MovementSystem, registry| {
            assert!(registry.get_system::<MovementSystem>().is_err());
            movement.update(registry)
        })
        .unwrap()
        .unwrap();
    assert_eq!(registry.get_system::<MovementSystem>().unwrap().updates, 1);
    assert_eq!(
        registry.get_component::<Position>(entity),
        Ok(&Position { x: 2.0, y: -1.0 })
    );

    let signature = registry.system_record::<MovementSystem>().unwrap().signature();
    assert_eq!(signature.len(), 2);

    registry.get_system_mut::<MovementSystem>().unwrap().updates = 7;
    let movement = registry.remove_system::<MovementSystem>().unwrap();
    assert_eq!(movement.updates, 7);
    assert!(!registry.has_system::<MovementSystem>());
    assert!(registry.system_entities::<MovementSystem>().is_err());
    assert!(registry.remove_system::<MovementSystem>().is_err());
}

#[test]
fn test_system_added_later_sees_flushed_entities() {
    let mut registry = Registry::new();
    let flushed = registry.create_entity();
    flushed.add_component(&mut registry, origin()).unwrap();
    registry.update();
    let pending = registry.create_entity();
    pending.add_component(&mut registry, origin()).unwrap();

    registry.add_system(PositionSystem).unwrap();
    assert_eq!(registry.system_entities::<PositionSystem>().unwrap(), [flushed]);
    registry.update();
    assert_eq!(
        registry.system_entities::<PositionSystem>().unwrap(),
        [flushed, pending]
    );
}

#[test]
fn test_system_added_later_with_many_pending_entities() {
    let mut registry = Registry::new();
    let flushed: Vec<_> = (0..500)
        .map(|_| {
            let entity = registry.create_entity();
            entity.add_component(&mut registry, origin()).unwrap();
            entity
        })
        .collect();
    registry.update();
    let pending: Vec<_> = (0..2000)
        .map(|_| {
            let entity = registry.create_entity();
            entity.add_component(&mut registry, origin()).unwrap();
            entity
        })
        .collect();

    registry.add_system(PositionSystem).unwrap();
    assert_eq!(registry.system_entities::<PositionSystem>().unwrap(), flushed);
    assert!(registry.validate());

    registry.update();
    let expected: Vec<_> = flushed.iter().chain(&pending).copied().collect();
    assert_eq!(registry.system_entities::<PositionSystem>().unwrap(), expected);
    assert!(registry.validate());
}

#[test]
fn test_snapshot_is_stable_while_killing() {
    let mut registry = Registry::new();
    registry.add_system(PositionSystem).unwrap();
    let entities: Vec<_> = (0..5)
        .map(|_| {
            let entity = registry.create_entity();
            entity.add_component(&mut registry, origin()).unwrap();
            entity
        })
        .collect();
    registry.update();

    let snapshot = registry.system_entities::<PositionSystem>().unwrap();
    for &entity in &snapshot {
        entity.kill(&mut registry);
        registry.create_entity();
        assert!(registry.get_component::<Position>(entity).is_ok());
    }
    assert_eq!(snapshot, entities);

    registry.update();
    assert!(registry.system_entities::<PositionSystem>().unwrap().is_empty());
}

#[test]
fn test_tags_and_groups() {
    let mut registry = Registry::new();
    let player = registry.create_entity();
    let e3 = registry.create_entity();
    let e4 = registry.create_entity();

    player.tag(&mut registry, "player").unwrap();
    e3.group(&mut registry, "enemies").unwrap();

    assert!(player.has_tag(&registry, "player"));
    assert_eq!(registry.entity_by_tag("player"), Ok(player));
    assert_eq!(registry.tag_of(player), Some("player"));
    assert!(e3.belongs_to_group(&registry, "enemies"));
    assert!(!e4.belongs_to_group(&registry, "enemies"));
    assert_eq!(registry.entities_in_group("enemies"), [e3]);
    assert!(registry.entities_in_group("bosses").is_empty());
    assert_eq!(registry.group_of(e3), Some("enemies"));

    registry.remove_entity_tag(player);
    registry.remove_entity_tag(player);
    registry.remove_entity_group(e4);
    assert!(!player.has_tag(&registry, "player"));
}

#[test]
fn test_component_types_are_registry_scoped() {
    let mut first = Registry::new();
    let mut second = Registry::new();

    assert_eq!(first.register_component::<Position>().map(|id| id.index()), Ok(0));
    assert_eq!(second.register_component::<Velocity>().map(|id| id.index()), Ok(0));
    assert_eq!(second.register_component::<Position>().map(|id| id.index()), Ok(1));
    assert_eq!(first.component_id::<Velocity>(), None);
    assert_eq!(first.component_type_count(), 1);
}

#[test]
fn test_system_requirements_exceeding_capacity() {
    struct Marker<const N: usize>;

    struct HugeSystem;

    impl System for HugeSystem {
        fn requirements(&self) -> Requirements {
            Requirements::of::<(
                Marker<0>,
                Marker<1>,
                Marker<2>,
                Marker<3>,
                Marker<4>,
                Marker<5>,
                Marker<6>,
                Marker<7>,
                Marker<8>,
                Marker<9>,
                Marker<10>,
                Marker<11>,
            )>()
        }
    }

    let mut registry = Registry::new();
    macro_rules! register {
        ($($n:literal)*) => {
            $( registry.register_component::<[u8; $n]>().unwrap(); )*
        };
    }
    register!(1 2 3 4 5 6 7 8 9 10 11 12 13 14 15 16 17 18 19 20 21 22 23 24 25);
    assert_eq!(registry.component_type_count(), 25);

    let error = registry.add_system(HugeSystem).unwrap_err();
    assert_eq!(
        error,
        EcsError::InvalidCapacity {
            component: std::any::type_name::<Marker<7>>(),
            capacity: MAX_COMPONENTS,
        }
    );
    assert!(!registry.has_system::<HugeSystem>());
}
