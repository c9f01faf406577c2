#![cfg(test)]

use std::cell::RefCell;
use std::rc::Rc;
use std::time::Duration;

use arcade_ecs::{EventBus, Registry};
use ultraviolet::Vec2;

use super::components::*;
use super::events::{CollisionEvent, KeyPressedEvent};
use super::*;
use crate::config::MapSize;
use crate::input::Key;

const STEP: Duration = Duration::from_millis(100);
const LONG: Duration = Duration::from_secs(10);

fn setup() -> (Registry, EventBus<Registry>) {
    let mut registry = Registry::new();
    add_systems(&mut registry).unwrap();
    (registry, EventBus::new())
}

fn run_frame(registry: &mut Registry, event_bus: &mut EventBus<Registry>, now: Duration) {
    event_bus.reset();
    subscribe_to_events(registry, event_bus, now).unwrap();
    registry.update();
    update_systems(registry, event_bus, STEP, now, MapSize::default()).unwrap();
}

fn assert_near(actual: Vec2, expected: Vec2) {
    assert!(
        (actual - expected).mag() < 1e-3,
        "expected {:?}, got {:?}",
        expected,
        actual,
    );
}

#[test]
fn test_movement_kills_entities_leaving_the_map() {
    let (mut registry, mut event_bus) = setup();
    let player = spawn_player(&mut registry, Vec2::new(100.0, 100.0), 50.0).unwrap();
    let velocity = Vec2::new(100.0, 0.0);
    let enemy = spawn_enemy(&mut registry, Vec2::new(300.0, 100.0), velocity).unwrap();
    let runaway = spawn_enemy(&mut registry, Vec2::new(795.0, 300.0), velocity).unwrap();
    player
        .get_component_mut::<RigidBody>(&mut registry)
        .unwrap()
        .velocity = Vec2::new(-2000.0, 0.0);

    run_frame(&mut registry, &mut event_bus, STEP);
    assert_near(
        registry.get_component::<Transform>(enemy).unwrap().position,
        Vec2::new(310.0, 100.0),
    );
    assert_near(
        registry.get_component::<Transform>(player).unwrap().position,
        Vec2::new(-100.0, 100.0),
    );

    run_frame(&mut registry, &mut event_bus, STEP * 2);
    assert!(registry.is_alive(player));
    assert!(registry.is_alive(enemy));
    assert!(!registry.is_alive(runaway));
    assert_eq!(registry.entities_in_group(ENEMIES_GROUP), [enemy]);
}

#[test]
fn test_collisions_are_reported_once_per_pair() {
    let (mut registry, mut event_bus) = setup();
    let a = spawn_enemy(&mut registry, Vec2::new(100.0, 100.0), Vec2::zero()).unwrap();
    let b = spawn_enemy(&mut registry, Vec2::new(120.0, 120.0), Vec2::zero()).unwrap();
    let c = spawn_enemy(&mut registry, Vec2::new(140.0, 100.0), Vec2::zero()).unwrap();
    let _far = spawn_enemy(&mut registry, Vec2::new(500.0, 500.0), Vec2::zero()).unwrap();
    registry.update();

    let pairs = Rc::new(RefCell::new(Vec::new()));
    let sink = Rc::clone(&pairs);
    event_bus.subscribe(move |event: &mut CollisionEvent, _: &mut Registry| {
        sink.borrow_mut().push((event.a, event.b));
    });

    let count = registry
        .with_system(|system: &mut CollisionSystem, registry| {
            system.update(registry, &mut event_bus)
        })
        .unwrap()
        .unwrap();
    assert_eq!(count, 3);
    assert_eq!(*pairs.borrow(), [(a, b), (a, c), (b, c)]);
}

#[test]
fn test_touching_boxes_do_not_collide() {
    let (mut registry, mut event_bus) = setup();
    spawn_enemy(&mut registry, Vec2::new(100.0, 100.0), Vec2::zero()).unwrap();
    spawn_enemy(&mut registry, Vec2::new(132.0, 100.0), Vec2::zero()).unwrap();
    registry.update();

    let count = registry
        .with_system(|system: &mut CollisionSystem, registry| {
            system.update(registry, &mut event_bus)
        })
        .unwrap()
        .unwrap();
    assert_eq!(count, 0);
}

#[test]
fn test_friendly_projectile_damages_enemy() {
    let (mut registry, mut event_bus) = setup();
    let enemy = spawn_enemy(&mut registry, Vec2::new(100.0, 100.0), Vec2::zero()).unwrap();
    let projectile = spawn_projectile(
        &mut registry,
        Vec2::new(110.0, 110.0),
        Vec2::zero(),
        Projectile::friendly(30, LONG, Duration::ZERO),
    )
    .unwrap();

    run_frame(&mut registry, &mut event_bus, STEP);
    // kills are applied at the next flush
    assert!(registry.is_alive(projectile));
    assert_eq!(registry.get_component::<Health>(enemy).unwrap().percentage, 70);

    run_frame(&mut registry, &mut event_bus, STEP * 2);
    assert!(!registry.is_alive(projectile));
    assert!(registry.is_alive(enemy));
    assert_eq!(registry.get_component::<Health>(enemy).unwrap().percentage, 70);
}

#[test]
fn test_lethal_projectile_kills_enemy() {
    let (mut registry, mut event_bus) = setup();
    let enemy = spawn_enemy(&mut registry, Vec2::new(100.0, 100.0), Vec2::zero()).unwrap();
    spawn_projectile(
        &mut registry,
        Vec2::new(110.0, 110.0),
        Vec2::zero(),
        Projectile::friendly(100, LONG, Duration::ZERO),
    )
    .unwrap();

    run_frame(&mut registry, &mut event_bus, STEP);
    run_frame(&mut registry, &mut event_bus, STEP * 2);
    assert!(!registry.is_alive(enemy));
    assert!(registry.entities_in_group(ENEMIES_GROUP).is_empty());
    assert!(registry.entities_in_group(PROJECTILES_GROUP).is_empty());
}

#[test]
fn test_projectiles_spare_their_own_side() {
    let (mut registry, mut event_bus) = setup();
    let player = spawn_player(&mut registry, Vec2::new(400.0, 400.0), 50.0).unwrap();
    let enemy = spawn_enemy(&mut registry, Vec2::new(100.0, 100.0), Vec2::zero()).unwrap();
    let hostile = spawn_projectile(
        &mut registry,
        Vec2::new(110.0, 110.0),
        Vec2::zero(),
        Projectile::hostile(50, LONG, Duration::ZERO),
    )
    .unwrap();
    let friendly = spawn_projectile(
        &mut registry,
        Vec2::new(410.0, 410.0),
        Vec2::zero(),
        Projectile::friendly(50, LONG, Duration::ZERO),
    )
    .unwrap();

    run_frame(&mut registry, &mut event_bus, STEP);
    run_frame(&mut registry, &mut event_bus, STEP * 2);
    assert!(registry.is_alive(hostile));
    assert!(registry.is_alive(friendly));
    assert_eq!(registry.get_component::<Health>(enemy).unwrap().percentage, 100);
    assert_eq!(registry.get_component::<Health>(player).unwrap().percentage, 100);
}

#[test]
fn test_hostile_projectile_damages_player() {
    let (mut registry, mut event_bus) = setup();
    let player = spawn_player(&mut registry, Vec2::new(400.0, 400.0), 50.0).unwrap();
    let hostile = spawn_projectile(
        &mut registry,
        Vec2::new(410.0, 410.0),
        Vec2::zero(),
        Projectile::hostile(25, LONG, Duration::ZERO),
    )
    .unwrap();

    run_frame(&mut registry, &mut event_bus, STEP);
    run_frame(&mut registry, &mut event_bus, STEP * 2);
    assert!(!registry.is_alive(hostile));
    assert_eq!(registry.get_component::<Health>(player).unwrap().percentage, 75);
}

#[test]
fn test_keyboard_control() {
    let (mut registry, mut event_bus) = setup();
    let player = spawn_player(&mut registry, Vec2::new(100.0, 100.0), 50.0).unwrap();
    let enemy = spawn_enemy(&mut registry, Vec2::new(300.0, 300.0), Vec2::zero()).unwrap();
    registry.update();
    subscribe_to_events(&registry, &mut event_bus, Duration::ZERO).unwrap();

    event_bus.emit(KeyPressedEvent { key: Key::Up }, &mut registry);
    assert_eq!(
        registry.get_component::<RigidBody>(player).unwrap().velocity,
        Vec2::new(0.0, -50.0)
    );
    assert_eq!(registry.get_component::<Transform>(player).unwrap().rotation, 270.0);

    event_bus.emit(KeyPressedEvent { key: Key::Left }, &mut registry);
    event_bus.emit(KeyPressedEvent { key: Key::Space }, &mut registry);
    assert_eq!(
        registry.get_component::<RigidBody>(player).unwrap().velocity,
        Vec2::new(-50.0, 0.0)
    );
    assert_eq!(registry.get_component::<Transform>(player).unwrap().rotation, 180.0);
    assert_eq!(
        registry.get_component::<RigidBody>(enemy).unwrap().velocity,
        Vec2::zero()
    );
}

#[test]
fn test_projectiles_expire() {
    let (mut registry, mut event_bus) = setup();
    let short = spawn_projectile(
        &mut registry,
        Vec2::new(100.0, 100.0),
        Vec2::zero(),
        Projectile::friendly(10, Duration::from_millis(150), Duration::ZERO),
    )
    .unwrap();
    let long = spawn_projectile(
        &mut registry,
        Vec2::new(300.0, 300.0),
        Vec2::zero(),
        Projectile::friendly(10, LONG, Duration::ZERO),
    )
    .unwrap();

    run_frame(&mut registry, &mut event_bus, STEP);
    run_frame(&mut registry, &mut event_bus, STEP * 2);
    assert!(registry.is_alive(short));
    run_frame(&mut registry, &mut event_bus, STEP * 3);
    assert!(!registry.is_alive(short));
    assert!(registry.is_alive(long));
}

#[test]
fn test_projectile_without_component_is_skipped() {
    let (mut registry, mut event_bus) = setup();
    let enemy = spawn_enemy(&mut registry, Vec2::new(100.0, 100.0), Vec2::zero()).unwrap();
    let projectile = registry.create_entity();
    projectile.group(&mut registry, PROJECTILES_GROUP).unwrap();
    registry.update();
    subscribe_to_events(&registry, &mut event_bus, Duration::ZERO).unwrap();

    // projectile without its component cannot hit anything
    event_bus.emit(CollisionEvent { a: projectile, b: enemy }, &mut registry);
    registry.update();
    assert!(registry.is_alive(projectile));
    assert_eq!(registry.get_component::<Health>(enemy).unwrap().percentage, 100);
}

#[test]
fn test_player_fires_on_space() {
    let (mut registry, mut event_bus) = setup();
    let player = spawn_player(&mut registry, Vec2::new(100.0, 100.0), 50.0).unwrap();
    let enemy = spawn_enemy(&mut registry, Vec2::new(400.0, 400.0), Vec2::zero()).unwrap();
    enemy
        .add_component(
            &mut registry,
            ProjectileEmitter::on_demand(Vec2::new(-100.0, 0.0), LONG, 10, false),
        )
        .unwrap();
    registry.update();
    subscribe_to_events(&registry, &mut event_bus, STEP).unwrap();

    // standing still, the shot keeps velocity of the emitter
    event_bus.emit(KeyPressedEvent { key: Key::Space }, &mut registry);
    let shots = registry.entities_in_group(PROJECTILES_GROUP);
    assert_eq!(shots.len(), 1);
    let first = shots[0];
    assert_eq!(
        registry.get_component::<Transform>(first).unwrap().position,
        Vec2::new(116.0, 116.0)
    );
    assert_eq!(
        registry.get_component::<RigidBody>(first).unwrap().velocity,
        Vec2::new(300.0, 300.0)
    );
    let projectile = *registry.get_component::<Projectile>(first).unwrap();
    assert!(projectile.friendly);
    assert_eq!(projectile.spawn_time, STEP);

    // moving, the shot follows the direction of the player
    event_bus.emit(KeyPressedEvent { key: Key::Right }, &mut registry);
    event_bus.emit(KeyPressedEvent { key: Key::Space }, &mut registry);
    let shots = registry.entities_in_group(PROJECTILES_GROUP);
    assert_eq!(shots.len(), 2);
    let second = shots.into_iter().find(|&shot| shot != first).unwrap();
    assert_eq!(
        registry.get_component::<RigidBody>(second).unwrap().velocity,
        Vec2::new(350.0, 0.0)
    );

    registry.update();
    assert!(registry.is_alive(player));
    assert_eq!(registry.get_component::<Health>(player).unwrap().percentage, 100);
}

#[test]
fn test_repeating_emitter_fires_periodically() {
    let (mut registry, mut event_bus) = setup();
    let enemy = spawn_enemy(&mut registry, Vec2::new(400.0, 300.0), Vec2::zero()).unwrap();
    enemy
        .add_component(
            &mut registry,
            ProjectileEmitter::repeating(Vec2::zero(), STEP * 3, LONG, 10, false),
        )
        .unwrap();

    let mut frame = 0;
    let mut run_until = |registry: &mut Registry, last: u32| {
        while frame < last {
            frame += 1;
            run_frame(registry, &mut event_bus, STEP * frame);
        }
        registry.entities_in_group(PROJECTILES_GROUP).len()
    };
    assert_eq!(run_until(&mut registry, 2), 0);
    assert_eq!(run_until(&mut registry, 3), 1);
    assert_eq!(run_until(&mut registry, 5), 1);
    assert_eq!(run_until(&mut registry, 9), 3);

    let emitter = registry.get_component::<ProjectileEmitter>(enemy).unwrap();
    assert_eq!(emitter.last_emission_time, STEP * 9);
    assert_eq!(registry.get_component::<Health>(enemy).unwrap().percentage, 100);
    for shot in registry.entities_in_group(PROJECTILES_GROUP) {
        assert!(!registry.get_component::<Projectile>(shot).unwrap().friendly);
    }
}
