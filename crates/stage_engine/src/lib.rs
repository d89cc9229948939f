//! # Stage Engine
//!
//! A small 3D stage and scene engine with cooperative, event-driven asset
//! loading. Everything runs on the caller's thread: loads are queued and
//! serviced incrementally by the engine tick, and completion notifications
//! fire as one-shot callbacks on that same tick.
//!
//! ## Features
//!
//! - **Stage Display Modes**: design/physical resolution mapping with scale
//!   and screen orientation modes, plus an optional stats readout
//! - **Scene Graph**: slotmap-backed nodes (scenes, groups, meshes, cameras)
//!   with ordered children and world transforms
//! - **Asynchronous Assets**: budgeted load queue for hierarchy descriptors,
//!   OBJ meshes, RON/MTL materials, and PNG textures
//! - **One-Shot Events**: load notifications keyed by (event kind, target),
//!   consumed on dispatch
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use stage_engine::prelude::*;
//!
//! struct MyApp;
//!
//! impl Application for MyApp {
//!     fn initialize(&mut self, engine: &mut Engine) -> Result<(), AppError> {
//!         let _scene = engine.stage_mut().add_scene("main")?;
//!         Ok(())
//!     }
//!
//!     fn update(&mut self, engine: &mut Engine, _delta_time: f32) -> Result<(), AppError> {
//!         engine.quit();
//!         Ok(())
//!     }
//!
//!     fn cleanup(&mut self, _engine: &mut Engine) {}
//! }
//!
//! fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let config = EngineConfig::default();
//!     let mut app = MyApp;
//!     Engine::run(config, &mut app)?;
//!     Ok(())
//! }
//! ```

#![warn(missing_docs)]
#![warn(clippy::all, clippy::pedantic, clippy::nursery)]
#![allow(clippy::module_name_repetitions, clippy::similar_names, clippy::too_many_arguments)]

pub mod foundation;
pub mod events;
pub mod scene;
pub mod assets;
pub mod stage;
pub mod config;

mod application;
mod engine;

pub use application::{AppError, Application};
pub use engine::{AssetConfig, Engine, EngineConfig, EngineContext, EngineError};

#[cfg(test)]
mod tests;

/// Common imports for engine users
pub mod prelude {
    pub use crate::{
        assets::{AssetId, Assets, LoadState, MaterialHandle, MeshHandle, TextureHandle},
        config::Config,
        events::{EventBus, EventKind, EventTarget, LoadEvent},
        foundation::{
            math::{Mat4, Quat, Transform, Vec3, Vec4},
            time::{Stopwatch, Timer},
        },
        scene::{CameraParams, MeshNode, Node, NodeFlags, NodeId, SceneError, SceneGraph},
        stage::{ScaleMode, ScreenMode, Stage, StageConfig, StageStats},
        AppError, Application, AssetConfig, Engine, EngineConfig, EngineContext, EngineError,
    };
}
