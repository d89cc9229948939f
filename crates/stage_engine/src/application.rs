//! Application trait and lifecycle management

use thiserror::Error;

use crate::assets::AssetError;
use crate::config::ConfigError;
use crate::engine::{Engine, EngineError};
use crate::scene::SceneError;

/// Application lifecycle trait
///
/// Implement this trait to create an application driven by
/// [`Engine::run`]. The engine calls `initialize` once, then `update`
/// every frame until [`Engine::quit`] is requested, then `cleanup`.
pub trait Application {
    /// Initialize the application
    ///
    /// Called once after the engine is initialized. Use this to build the
    /// scene, place cameras, and queue asset loads.
    fn initialize(&mut self, engine: &mut Engine) -> Result<(), AppError>;

    /// Update the application
    ///
    /// Called every frame, before the engine processes loads and pumps
    /// notifications for that frame.
    ///
    /// # Arguments
    /// * `engine` - Mutable reference to the engine
    /// * `delta_time` - Time since last frame in seconds
    fn update(&mut self, engine: &mut Engine, delta_time: f32) -> Result<(), AppError>;

    /// Cleanup the application
    ///
    /// Called when the application is shutting down.
    fn cleanup(&mut self, engine: &mut Engine);
}

/// Application-level errors
#[derive(Error, Debug)]
pub enum AppError {
    /// Application setup failed
    #[error("Initialization failed: {0}")]
    InitializationFailed(String),

    /// Engine error propagated to application level
    #[error("Engine error: {0}")]
    Engine(#[from] EngineError),

    /// Asset loading error
    #[error("Asset error: {0}")]
    Asset(#[from] AssetError),

    /// Scene graph error
    #[error("Scene error: {0}")]
    Scene(#[from] SceneError),

    /// Configuration error
    #[error("Config error: {0}")]
    Config(#[from] ConfigError),
}
