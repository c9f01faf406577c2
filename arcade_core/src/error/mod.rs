//! Utilities for game engine error handling.

use arcade_ecs::EcsError;
use thiserror::Error;

/// Result of any operation which can return an error.
pub type Result<T> = std::result::Result<T, Error>;

/// General error type of game engine.
#[derive(Debug, Error)]
pub enum Error {
    #[error("cannot create more than one application instance")]
    Initialized,

    #[error("invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("ECS error: {0}")]
    Ecs(#[from] EcsError),
}
