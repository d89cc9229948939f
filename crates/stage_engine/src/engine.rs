//! Core engine implementation
//!
//! The engine owns the stage, the asset system, and the event bus, and
//! advances them with a cooperative, single-threaded tick: process a
//! budget of queued loads, then pump the resulting notifications to
//! their one-shot handlers.

use std::time::{Duration, Instant};

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::application::Application;
use crate::assets::Assets;
use crate::config::Config;
use crate::events::{EventBus, EventKind, EventTarget, LoadEvent, OnceHandler};
use crate::foundation::time::{Stopwatch, Timer};
use crate::scene::{NodeFlags, NodeId};
use crate::stage::{Stage, StageConfig};

/// Main engine struct
///
/// The engine coordinates all subsystems and manages the main loop.
pub struct Engine {
    /// The stage, owning the scene graph
    pub stage: Stage,

    /// Asset loading system
    pub assets: Assets,

    /// Load notification bus
    pub events: EventBus,

    /// Frame timing
    timer: Timer,

    /// Engine configuration
    config: EngineConfig,

    /// Whether the engine should continue running
    running: bool,
}

impl Engine {
    /// Create a new engine instance
    pub fn new(config: EngineConfig) -> Result<Self, EngineError> {
        log::info!("Initializing engine...");

        if config.stage.physical_width == 0 || config.stage.physical_height == 0 {
            return Err(EngineError::InitializationFailed(
                "stage physical size must be non-zero".to_string(),
            ));
        }

        let stage = Stage::new(config.stage.clone());
        let assets = Assets::new(&config.assets);
        let events = EventBus::new();
        let timer = Timer::new();

        Ok(Self {
            stage,
            assets,
            events,
            timer,
            config,
            running: true,
        })
    }

    /// Run the engine main loop with the given application
    pub fn run<T: Application>(config: EngineConfig, app: &mut T) -> Result<(), EngineError> {
        let mut engine = Self::new(config)?;

        app.initialize(&mut engine)
            .map_err(|e| EngineError::ApplicationError(format!("App initialization: {}", e)))?;

        log::info!("Starting main loop...");

        while engine.running {
            let frame_start = Instant::now();

            let delta_time = engine.timer.delta_time();
            app.update(&mut engine, delta_time)
                .map_err(|e| EngineError::ApplicationError(format!("App update: {}", e)))?;

            engine.update();
            engine.pace(frame_start);
        }

        app.cleanup(&mut engine);

        log::info!(
            "Engine shutdown complete ({} frames, {:.1} fps average)",
            engine.timer.frame_count(),
            engine.timer.average_fps()
        );
        Ok(())
    }

    /// Advance one cooperative tick
    ///
    /// Order matters: loads settle first, then the notifications they
    /// emitted are pumped, so a handler registered before a tick sees
    /// every event from that tick.
    pub(crate) fn update(&mut self) {
        self.timer.update();

        let load_watch = Stopwatch::start_new();
        self.assets
            .process(self.stage.graph_mut(), &mut self.events);
        let load_time_us = load_watch.elapsed().as_micros() as u64;

        let dispatch_watch = Stopwatch::start_new();
        self.pump_events();
        let dispatch_time_us = dispatch_watch.elapsed().as_micros() as u64;

        self.stage.update_stats(
            &self.timer,
            &self.assets,
            &self.events,
            load_time_us,
            dispatch_time_us,
        );
    }

    /// Drain the event queue, running one-shot handlers
    fn pump_events(&mut self) {
        while let Some(event) = self.events.pop() {
            let handlers = self.events.take_handlers(&event);
            if handlers.is_empty() {
                log::trace!("No handlers for {:?} on {:?}", event.kind, event.target);
                continue;
            }

            for handler in handlers {
                let mut ctx = EngineContext {
                    stage: &mut self.stage,
                    assets: &mut self.assets,
                    events: &mut self.events,
                };
                handler(&mut ctx, &event);
            }
        }
    }

    /// Sleep out the remainder of the frame budget
    fn pace(&self, frame_start: Instant) {
        if self.config.target_fps == 0 {
            return;
        }

        let target = Duration::from_secs_f32(1.0 / self.config.target_fps as f32);
        let elapsed = frame_start.elapsed();
        if elapsed < target {
            std::thread::sleep(target - elapsed);
        }
    }

    /// Register a one-shot handler for a load notification
    ///
    /// If the target has already settled, the settled notification is
    /// replayed on the next tick, so subscribing after a fast load still
    /// fires the handler exactly once.
    pub fn once<F>(&mut self, kind: EventKind, target: EventTarget, handler: F)
    where
        F: FnOnce(&mut EngineContext<'_>, &LoadEvent) + 'static,
    {
        subscribe_once(
            &self.stage,
            &self.assets,
            &mut self.events,
            kind,
            target,
            Box::new(handler),
        );
    }

    /// Queue a hierarchy load into `root`
    pub fn load_hierarchy(&mut self, root: NodeId, path: &str) {
        self.assets.load_hierarchy(root, path);
    }

    /// Request engine shutdown
    pub fn quit(&mut self) {
        log::info!("Engine shutdown requested");
        self.running = false;
    }

    /// Whether the main loop will keep running
    pub fn is_running(&self) -> bool {
        self.running
    }

    /// Get the stage
    pub fn stage(&self) -> &Stage {
        &self.stage
    }

    /// Get mutable access to the stage
    pub fn stage_mut(&mut self) -> &mut Stage {
        &mut self.stage
    }

    /// Get the asset system
    pub fn assets(&self) -> &Assets {
        &self.assets
    }

    /// Get mutable access to the asset system
    pub fn assets_mut(&mut self) -> &mut Assets {
        &mut self.assets
    }

    /// Get the event bus
    pub fn events(&self) -> &EventBus {
        &self.events
    }

    /// Get mutable access to the event bus
    pub fn events_mut(&mut self) -> &mut EventBus {
        &mut self.events
    }

    /// Get the frame timer
    pub fn timer(&self) -> &Timer {
        &self.timer
    }

    /// Get the current frame delta time
    pub fn delta_time(&self) -> f32 {
        self.timer.delta_time()
    }
}

/// Mutable engine view handed to event handlers
///
/// Handlers get the same subsystems the application does, minus the main
/// loop: they can inspect the graph, mutate assets, and register
/// follow-up subscriptions.
pub struct EngineContext<'a> {
    /// The stage, owning the scene graph
    pub stage: &'a mut Stage,

    /// Asset loading system
    pub assets: &'a mut Assets,

    /// Load notification bus
    pub events: &'a mut EventBus,
}

impl EngineContext<'_> {
    /// Register a one-shot handler, with the same replay semantics as
    /// [`Engine::once`]
    pub fn once<F>(&mut self, kind: EventKind, target: EventTarget, handler: F)
    where
        F: FnOnce(&mut EngineContext<'_>, &LoadEvent) + 'static,
    {
        subscribe_once(
            self.stage,
            self.assets,
            self.events,
            kind,
            target,
            Box::new(handler),
        );
    }

    /// Queue a hierarchy load into `root`
    pub fn load_hierarchy(&mut self, root: NodeId, path: &str) {
        self.assets.load_hierarchy(root, path);
    }
}

fn subscribe_once(
    stage: &Stage,
    assets: &Assets,
    events: &mut EventBus,
    kind: EventKind,
    target: EventTarget,
    handler: OnceHandler,
) {
    // A target that already settled will never emit again on its own;
    // replay its notification so the new subscription still fires.
    // Duplicates are harmless: dispatch consumes handlers on first match.
    if let Some(event) = replay_for(stage, assets, target) {
        log::trace!(
            "Replaying {:?} for a late subscription on {:?}",
            event.kind,
            target
        );
        events.emit(event);
    }
    events.once_boxed(kind, target, handler);
}

fn replay_for(stage: &Stage, assets: &Assets, target: EventTarget) -> Option<LoadEvent> {
    match target {
        EventTarget::Asset(id) => assets.replay_event(id),
        EventTarget::Node(id) => {
            let node = stage.graph().node(id)?;
            let path = node.hierarchy_source()?;
            if node.flags.contains(NodeFlags::HIERARCHY_READY) {
                Some(LoadEvent::completed(EventKind::HierarchyLoaded, target, path))
            } else if node.flags.contains(NodeFlags::HIERARCHY_FAILED) {
                let message = node.hierarchy_error().unwrap_or("hierarchy load failed");
                Some(LoadEvent::failed(target, path, message))
            } else {
                None
            }
        }
    }
}

/// Engine configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    /// Stage configuration
    pub stage: StageConfig,

    /// Asset system configuration
    pub assets: AssetConfig,

    /// Frame pacing target, 0 to run unpaced
    pub target_fps: u32,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            stage: StageConfig::default(),
            assets: AssetConfig::default(),
            target_fps: 60,
        }
    }
}

impl Config for EngineConfig {}

/// Asset system configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct AssetConfig {
    /// Asset search paths
    pub search_paths: Vec<String>,

    /// Maximum queued loads processed per tick
    pub loads_per_update: usize,
}

impl Default for AssetConfig {
    fn default() -> Self {
        Self {
            search_paths: vec!["resources".to_string()],
            loads_per_update: 16,
        }
    }
}

/// Engine-level errors
#[derive(Error, Debug)]
pub enum EngineError {
    /// Initialization error
    #[error("Engine initialization failed: {0}")]
    InitializationFailed(String),

    /// Application error
    #[error("Application error: {0}")]
    ApplicationError(String),
}
