//! Engine-level integration tests
//!
//! These drive whole engine ticks against the fixture assets shipped
//! under `resources/test/`, exercising the staged load cascade the way a
//! real application does: scene setup, one-shot subscriptions, and
//! cooperative loads settling over several updates.

mod failure_paths;

use crate::engine::{AssetConfig, Engine, EngineConfig};
use crate::stage::StageConfig;

/// Engine configuration pointed at the fixture assets
fn fixture_config() -> EngineConfig {
    EngineConfig {
        stage: StageConfig::default(),
        assets: AssetConfig {
            search_paths: vec![concat!(env!("CARGO_MANIFEST_DIR"), "/resources/test").to_string()],
            loads_per_update: 4,
        },
        target_fps: 0,
    }
}

/// Tick the engine a fixed number of times
///
/// A small budget per tick means a cascade needs several updates to
/// settle; ten is comfortably more than the deepest fixture chain.
fn settle(engine: &mut Engine, ticks: usize) {
    for _ in 0..ticks {
        engine.update();
    }
}
