//! Asset loading and storage
//!
//! Loads never block the frame: requests queue up, and each engine tick
//! drains a bounded number of them, emitting a notification through the
//! event bus as each one settles. Assets are deduplicated by path, so two
//! nodes referencing the same file share one handle.

pub mod handle;
pub mod hierarchy;
pub mod loader;
pub mod materials;
pub mod mesh;
pub mod obj_loader;
pub mod store;
pub mod texture;

pub use handle::{AssetHandle, AssetId, MaterialHandle, MeshHandle, TextureHandle};
pub use hierarchy::{HierarchyFile, HierarchyNodeDesc, HierarchyNodeKind};
pub use loader::Assets;
pub use materials::{MaterialAsset, MaterialFile, MtlData, MtlParser};
pub use mesh::{MeshAsset, Vertex};
pub use obj_loader::{ObjError, ObjLoader};
pub use store::LoadState;
pub use texture::TextureAsset;

use thiserror::Error;

/// Asset loading errors
#[derive(Error, Debug)]
pub enum AssetError {
    /// Asset not found in any search path
    #[error("Asset not found: {0}")]
    NotFound(String),

    /// A file was read but could not be parsed
    #[error("Failed to parse '{path}': {message}")]
    Parse {
        /// Path of the offending file
        path: String,
        /// What went wrong
        message: String,
    },

    /// Unsupported asset format
    #[error("Unsupported format: {0}")]
    UnsupportedFormat(String),

    /// IO error during asset loading
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}
