//! Asset storage tables
//!
//! Each asset type lives in its own table keyed by [`AssetId`]. Entries
//! are created in the `Loading` state when a load is queued and settle to
//! `Loaded` or `Failed`, keeping the path and error message around for
//! dedup and for replaying notifications to late subscribers.

use std::collections::HashMap;

use crate::assets::handle::{AssetHandle, AssetId};
use crate::assets::{MaterialAsset, MeshAsset, TextureAsset};
use crate::events::{EventKind, EventTarget, LoadEvent};

/// Lifecycle state of a stored asset
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoadState {
    /// Queued or currently being read
    Loading,
    /// Ready for use
    Loaded,
    /// The load failed; the entry keeps the error message
    Failed,
}

struct AssetEntry<T> {
    path: String,
    state: LoadState,
    asset: Option<T>,
    error: Option<String>,
}

/// Table of one asset type, with path-based dedup
pub(crate) struct AssetTable<T> {
    entries: HashMap<AssetId, AssetEntry<T>>,
    by_path: HashMap<String, AssetHandle<T>>,
}

impl<T> AssetTable<T> {
    fn new() -> Self {
        Self {
            entries: HashMap::new(),
            by_path: HashMap::new(),
        }
    }

    /// Reserve an entry for a queued load and hand out its handle
    pub(crate) fn insert_pending(&mut self, path: &str) -> AssetHandle<T> {
        let handle = AssetHandle::new(AssetId::next());
        self.entries.insert(
            handle.id(),
            AssetEntry {
                path: path.to_string(),
                state: LoadState::Loading,
                asset: None,
                error: None,
            },
        );
        self.by_path.insert(path.to_string(), handle);
        handle
    }

    /// Store a finished asset
    pub(crate) fn complete(&mut self, handle: AssetHandle<T>, asset: T) {
        if let Some(entry) = self.entries.get_mut(&handle.id()) {
            entry.state = LoadState::Loaded;
            entry.asset = Some(asset);
        }
    }

    /// Record a failed load
    pub(crate) fn fail(&mut self, handle: AssetHandle<T>, message: &str) {
        if let Some(entry) = self.entries.get_mut(&handle.id()) {
            entry.state = LoadState::Failed;
            entry.error = Some(message.to_string());
        }
    }

    pub(crate) fn get(&self, handle: AssetHandle<T>) -> Option<&T> {
        self.entries.get(&handle.id()).and_then(|e| e.asset.as_ref())
    }

    pub(crate) fn get_mut(&mut self, handle: AssetHandle<T>) -> Option<&mut T> {
        self.entries
            .get_mut(&handle.id())
            .and_then(|e| e.asset.as_mut())
    }

    pub(crate) fn state(&self, handle: AssetHandle<T>) -> Option<LoadState> {
        self.entries.get(&handle.id()).map(|e| e.state)
    }

    pub(crate) fn path(&self, handle: AssetHandle<T>) -> Option<&str> {
        self.entries.get(&handle.id()).map(|e| e.path.as_str())
    }

    /// Handle already allocated for a path, if any
    pub(crate) fn handle_for_path(&self, path: &str) -> Option<AssetHandle<T>> {
        self.by_path.get(path).copied()
    }

    fn count_state(&self, state: LoadState) -> usize {
        self.entries.values().filter(|e| e.state == state).count()
    }

    /// The settled notification for an entry, or None while it loads
    fn replay(&self, id: AssetId, kind: EventKind) -> Option<LoadEvent> {
        let entry = self.entries.get(&id)?;
        match entry.state {
            LoadState::Loading => None,
            LoadState::Loaded => Some(LoadEvent::completed(
                kind,
                EventTarget::Asset(id),
                entry.path.clone(),
            )),
            LoadState::Failed => Some(LoadEvent::failed(
                EventTarget::Asset(id),
                entry.path.clone(),
                entry.error.as_deref().unwrap_or("unknown error"),
            )),
        }
    }
}

/// All asset tables together
pub(crate) struct AssetStore {
    pub(crate) meshes: AssetTable<MeshAsset>,
    pub(crate) materials: AssetTable<MaterialAsset>,
    pub(crate) textures: AssetTable<TextureAsset>,
}

impl AssetStore {
    pub(crate) fn new() -> Self {
        Self {
            meshes: AssetTable::new(),
            materials: AssetTable::new(),
            textures: AssetTable::new(),
        }
    }

    /// Reconstruct the settled event for an asset id, whichever table owns it
    pub(crate) fn replay_event(&self, id: AssetId) -> Option<LoadEvent> {
        if let Some(event) = self.meshes.replay(id, EventKind::MeshLoaded) {
            return Some(event);
        }
        if let Some(event) = self.materials.replay(id, EventKind::MaterialLoaded) {
            return Some(event);
        }
        self.textures.replay(id, EventKind::TextureLoaded)
    }

    pub(crate) fn loaded_count(&self) -> usize {
        self.meshes.count_state(LoadState::Loaded)
            + self.materials.count_state(LoadState::Loaded)
            + self.textures.count_state(LoadState::Loaded)
    }

    pub(crate) fn failed_count(&self) -> usize {
        self.meshes.count_state(LoadState::Failed)
            + self.materials.count_state(LoadState::Failed)
            + self.textures.count_state(LoadState::Failed)
    }
}
