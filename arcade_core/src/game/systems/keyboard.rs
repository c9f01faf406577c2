use arcade_ecs::{EventBus, Registry, Requirements, Result, System};

use crate::game::components::{KeyboardControlled, RigidBody, Transform};
use crate::game::events::KeyPressedEvent;
use crate::input::Key;

/// Steers keyboard controlled entities with arrow keys.
#[derive(Debug, Default)]
pub struct KeyboardControlSystem;

impl System for KeyboardControlSystem {
    fn requirements(&self) -> Requirements {
        Requirements::of::<(KeyboardControlled, RigidBody, Transform)>()
    }
}

impl KeyboardControlSystem {
    pub fn subscribe_to_events(&self, event_bus: &mut EventBus<Registry>) {
        event_bus.subscribe(|event: &mut KeyPressedEvent, registry: &mut Registry| {
            if let Err(error) = Self::on_key_pressed(event, registry) {
                log::error!("cannot handle key {}: {}", event.key, error);
            }
        });
    }

    fn on_key_pressed(event: &mut KeyPressedEvent, registry: &mut Registry) -> Result<()> {
        for entity in registry.system_entities::<Self>()? {
            let controls = *registry.get_component::<KeyboardControlled>(entity)?;
            let (velocity, rotation) = match event.key {
                Key::Up => (controls.up_velocity, 270.0),
                Key::Right => (controls.right_velocity, 0.0),
                Key::Down => (controls.down_velocity, 90.0),
                Key::Left => (controls.left_velocity, 180.0),
                _ => return Ok(()),
            };
            registry.get_component_mut::<RigidBody>(entity)?.velocity = velocity;
            registry.get_component_mut::<Transform>(entity)?.rotation = rotation;
        }
        Ok(())
    }
}
