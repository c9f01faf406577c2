//! Utilities for engine initialization.

use std::sync::atomic::{AtomicBool, Ordering};
use std::time::{Duration, Instant};

use arcade_ecs::{EventBus, Registry};

use crate::config::Config;
use crate::error::{Error, Result};
use crate::game::{self, events::KeyPressedEvent};
use crate::input::{InputSource, Key, ScriptedInput};

/// Type which represents duration between two frames.
pub type DeltaTime = Duration;

/// Information about the frame passed to render callback.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub struct Frame {
    /// Index of the frame, starting from zero.
    pub index: u64,
    /// Fixed duration of the frame.
    pub delta_time: DeltaTime,
    /// Game time at the end of the frame.
    pub elapsed: Duration,
}

/// General context of game engine.
///
/// Owns the ECS registry together with the event bus and drives the game loop.
/// Unique instance can be created using [`init`] function.
///
pub struct Application {
    config: Config,
    registry: Registry,
    event_bus: EventBus<Registry>,
    input: Box<dyn InputSource>,
    frame: u64,
    elapsed: Duration,
    running: bool,
}

impl Application {
    /// Creates application which is not tracked by [`init`].
    ///
    /// Any count of such applications could exist at the same time.
    ///
    /// # Errors
    ///
    /// An error is returned if configuration is invalid.
    ///
    pub fn new(config: Config) -> Result<Self> {
        config.validate()?;
        let mut registry = Registry::new();
        game::add_systems(&mut registry)?;
        let mut event_bus = EventBus::new();
        game::subscribe_to_events(&registry, &mut event_bus, Duration::ZERO)?;

        log::info!(
            "application `{}` v{} created: {} fps, map {}",
            config.name(),
            config.version(),
            config.fps(),
            config.map_size(),
        );
        Ok(Self {
            config,
            registry,
            event_bus,
            input: Box::new(ScriptedInput::new()),
            frame: 0,
            elapsed: Duration::ZERO,
            running: true,
        })
    }

    /// Replaces source of key presses.
    pub fn with_input(mut self, input: impl InputSource + 'static) -> Self {
        self.input = Box::new(input);
        self
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    pub fn registry(&self) -> &Registry {
        &self.registry
    }

    pub fn registry_mut(&mut self) -> &mut Registry {
        &mut self.registry
    }

    /// Count of frames processed so far.
    pub fn frame_count(&self) -> u64 {
        self.frame
    }

    /// Game time elapsed so far.
    pub fn elapsed(&self) -> Duration {
        self.elapsed
    }

    /// Returns `false` once the game was asked to stop.
    pub fn is_running(&self) -> bool {
        self.running
    }

    /// Polls key presses of the current frame and emits [`KeyPressedEvent`] for each.
    ///
    /// Pressing [`Key::Escape`] stops the game.
    ///
    pub fn process_input(&mut self) {
        for key in self.input.poll(self.frame) {
            if key == Key::Escape {
                log::info!("escape pressed, stopping the game");
                self.running = false;
                continue;
            }
            self.event_bus
                .emit(KeyPressedEvent { key }, &mut self.registry);
        }
    }

    /// Advances the game by one fixed step.
    ///
    /// Event subscriptions are renewed, pending entity changes are flushed
    /// and then gameplay systems are run.
    /// Input of the next frame is handled at game time reached by this one.
    ///
    pub fn update(&mut self) -> Result<()> {
        let delta_time = self.config.delta_time();
        let now = self.elapsed + delta_time;

        self.event_bus.reset();
        game::subscribe_to_events(&self.registry, &mut self.event_bus, now)?;
        self.registry.update();

        game::update_systems(
            &mut self.registry,
            &mut self.event_bus,
            delta_time,
            now,
            self.config.map_size(),
        )?;
        if self.config.enable_validation() && !self.registry.validate() {
            log::error!("registry is inconsistent after frame {}", self.frame);
        }

        self.elapsed = now;
        self.frame += 1;
        Ok(())
    }

    /// Invokes render callback with read-only view of the game.
    pub fn render(&self, mut callback: impl FnMut(&Registry, Frame)) {
        let frame = Frame {
            index: self.frame.saturating_sub(1),
            delta_time: self.config.delta_time(),
            elapsed: self.elapsed,
        };
        callback(&self.registry, frame)
    }

    /// Runs the game loop until the game is stopped or frame limit is reached.
    ///
    /// # Errors
    ///
    /// An error is returned if any gameplay system fails.
    ///
    pub fn run(&mut self, mut callback: impl FnMut(&Registry, Frame)) -> Result<()> {
        let delta_time = self.config.delta_time();
        while self.running && !self.limit_reached() {
            let frame_start = Instant::now();

            self.process_input();
            if !self.running {
                break;
            }
            self.update()?;
            self.render(&mut callback);

            if self.config.real_time() {
                if let Some(remaining) = delta_time.checked_sub(frame_start.elapsed()) {
                    std::thread::sleep(remaining);
                }
            }
        }
        log::info!(
            "game stopped after {} frame(s), {} entities alive",
            self.frame,
            self.registry.entity_count(),
        );
        Ok(())
    }

    fn limit_reached(&self) -> bool {
        matches!(self.config.frame_limit(), Some(limit) if self.frame >= limit)
    }
}

/// Creates a unique [`Application`] instance.
/// If application instance was created earlier, function call will return an error.
///
/// # Errors
///
/// An error is returned if application instance have already been initialized
/// or if configuration is invalid.
///
pub fn init(config: Config) -> Result<Application> {
    static FLAG: AtomicBool = AtomicBool::new(false);
    const UNINITIALIZED: bool = false;
    const INITIALIZED: bool = true;

    let initialized = FLAG
        .compare_exchange(
            UNINITIALIZED,
            INITIALIZED,
            Ordering::SeqCst,
            Ordering::SeqCst,
        )
        .is_err();

    if initialized {
        return Err(Error::Initialized);
    }
    Application::new(config)
}
