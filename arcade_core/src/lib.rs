//! API for simple arcade game engine built on top of `arcade_ecs`.

pub use app::init;

pub mod app;
pub mod config;
pub mod error;
pub mod game;
pub mod input;
