//! Stage: the logical display surface and scene container
//!
//! The stage resolves a design size against the physical surface through
//! a scale mode and an orientation mode, owns the scene graph, and keeps
//! the per-tick statistics. All of the size math is pure and testable
//! without a window.

pub mod stats;

pub use stats::StageStats;

use serde::{Deserialize, Serialize};

use crate::assets::Assets;
use crate::events::EventBus;
use crate::foundation::time::Timer;
use crate::scene::{NodeId, SceneError, SceneGraph};

/// How the design size maps onto the physical surface
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ScaleMode {
    /// Keep the design size, no scaling
    NoScale,
    /// Stretch to fill, ignoring aspect ratio
    ExactFit,
    /// Scale to fit entirely within the surface, letterboxing
    ShowAll,
    /// Scale to cover the surface, cropping
    NoBorder,
    /// Stage size tracks the physical size exactly
    Full,
    /// Keep the design width, derive height from the physical aspect
    FixedWidth,
    /// Keep the design height, derive width from the physical aspect
    FixedHeight,
}

/// Forced orientation of the stage
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ScreenMode {
    /// Keep the physical orientation
    None,
    /// Force landscape
    Horizontal,
    /// Force portrait
    Vertical,
}

/// Stage configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct StageConfig {
    /// Design width in pixels, 0 to use the physical width
    pub design_width: u32,

    /// Design height in pixels, 0 to use the physical height
    pub design_height: u32,

    /// Physical surface width in pixels
    pub physical_width: u32,

    /// Physical surface height in pixels
    pub physical_height: u32,

    /// How the design size maps onto the surface
    pub scale_mode: ScaleMode,

    /// Forced orientation
    pub screen_mode: ScreenMode,

    /// Whether multisampling is requested
    pub antialias: bool,

    /// Whether to log the stats summary once per second
    pub show_stats: bool,
}

impl Default for StageConfig {
    fn default() -> Self {
        Self {
            design_width: 0,
            design_height: 0,
            physical_width: 1280,
            physical_height: 720,
            scale_mode: ScaleMode::Full,
            screen_mode: ScreenMode::None,
            antialias: true,
            show_stats: false,
        }
    }
}

/// Apply a forced orientation to a physical size
pub fn apply_screen_mode(mode: ScreenMode, width: u32, height: u32) -> (u32, u32) {
    match mode {
        ScreenMode::None => (width, height),
        ScreenMode::Horizontal => {
            if height > width {
                (height, width)
            } else {
                (width, height)
            }
        }
        ScreenMode::Vertical => {
            if width > height {
                (height, width)
            } else {
                (width, height)
            }
        }
    }
}

/// Resolve the effective stage size for a configuration
pub fn compute_stage_size(config: &StageConfig) -> (u32, u32) {
    let (physical_width, physical_height) = apply_screen_mode(
        config.screen_mode,
        config.physical_width,
        config.physical_height,
    );

    let design_width = if config.design_width == 0 {
        physical_width
    } else {
        config.design_width
    };
    let design_height = if config.design_height == 0 {
        physical_height
    } else {
        config.design_height
    };

    match config.scale_mode {
        ScaleMode::Full => (physical_width, physical_height),
        ScaleMode::FixedWidth => {
            let height = u64::from(design_width) * u64::from(physical_height)
                / u64::from(physical_width.max(1));
            (design_width, height as u32)
        }
        ScaleMode::FixedHeight => {
            let width = u64::from(design_height) * u64::from(physical_width)
                / u64::from(physical_height.max(1));
            (width as u32, design_height)
        }
        // The remaining modes keep the logical design size; they differ in
        // how the surface is scaled, not in stage coordinates
        ScaleMode::NoScale | ScaleMode::ExactFit | ScaleMode::ShowAll | ScaleMode::NoBorder => {
            (design_width, design_height)
        }
    }
}

/// The logical display surface, owning the scene graph
pub struct Stage {
    config: StageConfig,
    width: u32,
    height: u32,
    graph: SceneGraph,
    stats: StageStats,
    stats_visible: bool,
    last_stats_log: f32,
}

impl Stage {
    /// Create a stage, resolving the effective size from the configuration
    pub fn new(config: StageConfig) -> Self {
        let (width, height) = compute_stage_size(&config);
        log::info!(
            "Stage {}x{} ({:?}/{:?}, antialias: {})",
            width,
            height,
            config.scale_mode,
            config.screen_mode,
            config.antialias
        );

        let stats_visible = config.show_stats;
        Self {
            config,
            width,
            height,
            graph: SceneGraph::new(),
            stats: StageStats::default(),
            stats_visible,
            last_stats_log: 0.0,
        }
    }

    /// The configuration the stage was created with
    pub fn config(&self) -> &StageConfig {
        &self.config
    }

    /// Effective stage width in pixels
    pub fn width(&self) -> u32 {
        self.width
    }

    /// Effective stage height in pixels
    pub fn height(&self) -> u32 {
        self.height
    }

    /// Width over height of the effective stage size
    pub fn aspect_ratio(&self) -> f32 {
        self.width as f32 / self.height as f32
    }

    /// The scene graph
    pub fn graph(&self) -> &SceneGraph {
        &self.graph
    }

    /// Mutable access to the scene graph
    pub fn graph_mut(&mut self) -> &mut SceneGraph {
        &mut self.graph
    }

    /// Create a scene node under the stage root
    pub fn add_scene(&mut self, name: &str) -> Result<NodeId, SceneError> {
        self.graph.add_scene(name)
    }

    /// Turn the periodic stats log line on or off
    pub fn show_stats(&mut self, visible: bool) {
        self.stats_visible = visible;
    }

    /// Whether the stats log line is on
    pub fn stats_visible(&self) -> bool {
        self.stats_visible
    }

    /// The most recent tick's statistics
    pub fn stats(&self) -> &StageStats {
        &self.stats
    }

    /// Refresh the statistics from the current tick
    pub(crate) fn update_stats(
        &mut self,
        timer: &Timer,
        assets: &Assets,
        events: &EventBus,
        load_time_us: u64,
        dispatch_time_us: u64,
    ) {
        self.stats = StageStats {
            fps: timer.current_fps(),
            frame_time_ms: timer.delta_time() * 1000.0,
            node_count: self.graph.node_count(),
            pending_loads: assets.pending_loads(),
            loaded_assets: assets.loaded_count(),
            failed_loads: assets.failed_count(),
            pending_events: events.pending_events(),
            handler_count: events.handler_count(),
            dispatched_events: events.dispatched_count(),
            load_time_us,
            dispatch_time_us,
        };

        if self.stats_visible && timer.total_time() - self.last_stats_log >= 1.0 {
            log::info!("{}", self.stats.summary());
            self.last_stats_log = timer.total_time();
        }
    }
}
