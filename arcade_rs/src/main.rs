//! Simple arcade game based on Rust and `arcade_ecs`

use std::error::Error;
use std::time::Duration;

use arcade_core::config::{Config, ENGINE_NAME, ENGINE_VERSION};
use arcade_core::game;
use arcade_core::game::components::{Health, Projectile, ProjectileEmitter};
use arcade_core::input::{Key, ScriptedInput};
use arcade_ecs::{Entity, Registry};
use log::LevelFilter;
use ultraviolet::Vec2;

mod logger;

const APP_NAME: &str = env!("CARGO_CRATE_NAME", "library must be compiled by Cargo");
const APP_VERSION_STR: &str = env!("CARGO_PKG_VERSION", "library must be compiled by Cargo");

/// Count of frames played by the demo.
const FRAME_LIMIT: u64 = 180;

/// Entry point of `arcade_rs` game
fn main() -> Result<(), Box<dyn Error + Send + Sync + 'static>> {
    let level = if cfg!(debug_assertions) {
        LevelFilter::Debug
    } else {
        LevelFilter::Info
    };
    let _handle = match logger::init(level) {
        Ok(handle) => {
            log::info!("logger initialized successfully");
            Some(handle)
        }
        Err(error) => {
            eprintln!("cannot initialize logger: {}", error);
            None
        }
    };
    log::info!("running on {} v{}", ENGINE_NAME, *ENGINE_VERSION);

    let version: semver::Version = APP_VERSION_STR.parse()?;
    let enable_validation = cfg!(debug_assertions);
    let config = Config::new(APP_NAME.to_string(), version, enable_validation)
        .with_frame_limit(Some(FRAME_LIMIT));

    let input = ScriptedInput::new()
        .press(20, Key::Up)
        .press(40, Key::Space)
        .press(60, Key::Right)
        .press(70, Key::Space)
        .press(100, Key::Down)
        .press(FRAME_LIMIT - 1, Key::Escape);
    let mut application = arcade_core::init(config)?.with_input(input);
    let level = load_level(application.registry_mut())?;

    let mut last_report = Duration::ZERO;
    application.run(|registry, frame| {
        if frame.elapsed - last_report >= Duration::from_secs(1) {
            last_report = frame.elapsed;
            report(registry, &level);
        }
    })?;
    report(application.registry(), &level);
    Ok(())
}

/// Entities of the demo level.
struct Level {
    player: Entity,
    enemies: Vec<Entity>,
}

fn load_level(registry: &mut Registry) -> arcade_ecs::Result<Level> {
    let player = game::spawn_player(registry, Vec2::new(100.0, 300.0), 80.0)?;
    let enemies = vec![
        game::spawn_enemy(registry, Vec2::new(500.0, 290.0), Vec2::zero())?,
        game::spawn_enemy(registry, Vec2::new(600.0, 100.0), Vec2::new(-20.0, 0.0))?,
        game::spawn_enemy(registry, Vec2::new(700.0, 500.0), Vec2::new(50.0, 0.0))?,
    ];
    enemies[1].add_component(
        registry,
        ProjectileEmitter::repeating(
            Vec2::new(-100.0, 0.0),
            Duration::from_secs(2),
            Duration::from_secs(3),
            10,
            false,
        ),
    )?;
    game::spawn_projectile(
        registry,
        Vec2::new(140.0, 310.0),
        Vec2::new(300.0, 0.0),
        Projectile::friendly(60, Duration::from_secs(4), Duration::ZERO),
    )?;
    game::spawn_projectile(
        registry,
        Vec2::new(600.0, 140.0),
        Vec2::new(-150.0, 0.0),
        Projectile::hostile(20, Duration::from_secs(2), Duration::ZERO),
    )?;
    log::info!("level loaded with {} entities", registry.entity_count());
    Ok(Level { player, enemies })
}

fn report(registry: &Registry, level: &Level) {
    let health = |entity: Entity| {
        registry
            .get_component::<Health>(entity)
            .map(|health| health.percentage)
            .ok()
    };
    match health(level.player) {
        Some(percentage) => log::info!("player health: {}%", percentage),
        None => log::info!("player is dead"),
    }
    let alive = level
        .enemies
        .iter()
        .filter_map(|&enemy| health(enemy).map(|percentage| (enemy, percentage)))
        .collect::<Vec<_>>();
    log::info!(
        "{} of {} enemies alive: {:?}, {} entities total",
        alive.len(),
        level.enemies.len(),
        alive,
        registry.entity_count(),
    );
}
