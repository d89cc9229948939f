//! Asset identifiers and typed handles

use std::fmt;
use std::hash::{Hash, Hasher};
use std::marker::PhantomData;
use std::sync::atomic::{AtomicU64, Ordering};

use crate::assets::{MaterialAsset, MeshAsset, TextureAsset};

static NEXT_ID: AtomicU64 = AtomicU64::new(1);

/// Globally unique asset identifier
///
/// Ids are unique across all asset types, so an id alone is enough to
/// address an asset in load notifications.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct AssetId(u64);

impl AssetId {
    /// Allocate the next unused id
    pub(crate) fn next() -> Self {
        Self(NEXT_ID.fetch_add(1, Ordering::Relaxed))
    }

    /// The raw numeric value, for logging
    pub fn raw(&self) -> u64 {
        self.0
    }
}

impl fmt::Display for AssetId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "asset#{}", self.0)
    }
}

/// Typed handle to a stored asset
pub struct AssetHandle<T> {
    id: AssetId,
    _phantom: PhantomData<fn() -> T>,
}

impl<T> AssetHandle<T> {
    pub(crate) fn new(id: AssetId) -> Self {
        Self {
            id,
            _phantom: PhantomData,
        }
    }

    /// The underlying asset id
    pub fn id(&self) -> AssetId {
        self.id
    }
}

// Handles are plain ids: they copy and compare independently of T.
impl<T> Clone for AssetHandle<T> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<T> Copy for AssetHandle<T> {}

impl<T> PartialEq for AssetHandle<T> {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
    }
}

impl<T> Eq for AssetHandle<T> {}

impl<T> Hash for AssetHandle<T> {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.id.hash(state);
    }
}

impl<T> fmt::Debug for AssetHandle<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("AssetHandle").field(&self.id).finish()
    }
}

/// Handle to a mesh asset
pub type MeshHandle = AssetHandle<MeshAsset>;

/// Handle to a material asset
pub type MaterialHandle = AssetHandle<MaterialAsset>;

/// Handle to a texture asset
pub type TextureHandle = AssetHandle<TextureAsset>;
