//! Configuration utilities for game engine and your game.

use std::time::Duration;

use semver::Version;

use crate::app::DeltaTime;
use crate::error::{Error, Result};

/// This struct represents general configuration of game engine.
#[derive(Debug, Clone)]
pub struct Config {
    name: String,
    version: Version,
    enable_validation: bool,
    fps: u32,
    map_size: MapSize,
    frame_limit: Option<u64>,
    real_time: bool,
}

pub const ENGINE_NAME: &str = env!("CARGO_CRATE_NAME", "library must be compiled by Cargo");

const ENGINE_VERSION_STR: &str = env!("CARGO_PKG_VERSION", "library must be compiled by Cargo");
lazy_static::lazy_static! {
    pub static ref ENGINE_VERSION: Version =
        Version::parse(ENGINE_VERSION_STR).unwrap_or_else(|_| Version::new(0, 0, 0));
}

/// Frames per second targeted by default.
pub const DEFAULT_FPS: u32 = 60;

impl Config {
    /// Creates new configuration with given name, version and validation usage.
    ///
    /// Other settings have their default values:
    /// [`DEFAULT_FPS`] frames per second, [default](MapSize::default) map size,
    /// no frame limit and real time frame pacing.
    ///
    pub const fn new(name: String, version: Version, enable_validation: bool) -> Self {
        Self {
            name,
            version,
            enable_validation,
            fps: DEFAULT_FPS,
            map_size: MapSize::DEFAULT,
            frame_limit: None,
            real_time: true,
        }
    }

    /// Sets count of frames per second.
    pub fn with_fps(mut self, fps: u32) -> Self {
        self.fps = fps;
        self
    }

    /// Sets size of the game map.
    pub fn with_map_size(mut self, map_size: impl Into<MapSize>) -> Self {
        self.map_size = map_size.into();
        self
    }

    /// Sets count of frames after which the game stops.
    pub fn with_frame_limit(mut self, frame_limit: Option<u64>) -> Self {
        self.frame_limit = frame_limit;
        self
    }

    /// Sets if frames should be paced in real time.
    ///
    /// If not, frames follow each other without sleeping,
    /// but the game still advances by fixed [delta time](Config::delta_time).
    ///
    pub fn with_real_time(mut self, real_time: bool) -> Self {
        self.real_time = real_time;
        self
    }

    /// Name of your game.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Semver version of your game.
    pub fn version(&self) -> &Version {
        &self.version
    }

    /// If game will use validation (useful for debugging).
    pub fn enable_validation(&self) -> bool {
        self.enable_validation
    }

    /// Count of frames per second.
    pub fn fps(&self) -> u32 {
        self.fps
    }

    /// Size of the game map. Entities leaving it are destroyed.
    pub fn map_size(&self) -> MapSize {
        self.map_size
    }

    /// Count of frames after which the game stops, if any.
    pub fn frame_limit(&self) -> Option<u64> {
        self.frame_limit
    }

    /// If frames are paced in real time.
    pub fn real_time(&self) -> bool {
        self.real_time
    }

    /// Fixed duration of one frame.
    pub fn delta_time(&self) -> DeltaTime {
        Duration::from_secs(1) / self.fps.max(1)
    }

    /// Checks if configuration can be used to run the game.
    ///
    /// # Errors
    ///
    /// An error is returned if frames per second or any side of the map is zero.
    ///
    pub fn validate(&self) -> Result<()> {
        if self.fps == 0 {
            return Err(Error::InvalidConfig("frames per second must be positive".into()));
        }
        if self.map_size.width == 0 || self.map_size.height == 0 {
            return Err(Error::InvalidConfig(format!(
                "map size {} must not be empty",
                self.map_size,
            )));
        }
        Ok(())
    }
}

impl Default for Config {
    fn default() -> Self {
        Self::new(
            "Hello World".to_string(),
            Version::new(0, 0, 0),
            cfg!(debug_assertions),
        )
    }
}

/// Size of the game map.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub struct MapSize {
    pub width: u32,
    pub height: u32,
}

impl MapSize {
    const DEFAULT: Self = Self::new(800, 600);

    /// Creates new size of map.
    pub const fn new(width: u32, height: u32) -> Self {
        Self { width, height }
    }

    /// Returns `true` if the point lies inside of the map.
    pub fn contains(&self, x: f32, y: f32) -> bool {
        x >= 0.0 && y >= 0.0 && x < self.width as f32 && y < self.height as f32
    }
}

impl Default for MapSize {
    fn default() -> Self {
        Self::DEFAULT
    }
}

impl std::fmt::Display for MapSize {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        write!(f, "{}x{}", self.width, self.height)
    }
}

impl From<(u32, u32)> for MapSize {
    fn from(tuple: (u32, u32)) -> Self {
        Self::new(tuple.0, tuple.1)
    }
}

impl From<MapSize> for (u32, u32) {
    fn from(size: MapSize) -> Self {
        (size.width, size.height)
    }
}
