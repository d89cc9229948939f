//! Engine statistics

/// Counters describing the current engine tick
///
/// Refreshed every update regardless of visibility; turning stats on only
/// controls whether the once-per-second summary line is logged.
#[derive(Debug, Clone, Default)]
pub struct StageStats {
    /// Current FPS (based on last frame time)
    pub fps: f32,

    /// Frame time in milliseconds
    pub frame_time_ms: f32,

    /// Number of nodes in the scene graph, including the root
    pub node_count: usize,

    /// Queued loads not yet processed
    pub pending_loads: usize,

    /// Assets that finished loading
    pub loaded_assets: usize,

    /// Assets whose load failed
    pub failed_loads: usize,

    /// Events waiting for dispatch
    pub pending_events: usize,

    /// One-shot handlers still registered
    pub handler_count: usize,

    /// Events dispatched since startup
    pub dispatched_events: u64,

    /// Time spent processing loads this tick (microseconds)
    pub load_time_us: u64,

    /// Time spent dispatching events this tick (microseconds)
    pub dispatch_time_us: u64,
}

impl StageStats {
    /// One-line summary for the periodic stats log
    pub fn summary(&self) -> String {
        format!(
            "fps {:.1} | frame {:.2}ms | nodes {} | loads {} pending, {} loaded, {} failed | events {} queued, {} handlers, {} dispatched | load {}us, dispatch {}us",
            self.fps,
            self.frame_time_ms,
            self.node_count,
            self.pending_loads,
            self.loaded_assets,
            self.failed_loads,
            self.pending_events,
            self.handler_count,
            self.dispatched_events,
            self.load_time_us,
            self.dispatch_time_us,
        )
    }
}
