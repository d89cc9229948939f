//! Scene graph: nodes, hierarchy operations, and cameras

pub mod camera;
pub mod graph;
pub mod node;

pub use camera::{view_matrix, CameraParams};
pub use graph::SceneGraph;
pub use node::{MeshFilter, MeshNode, MeshRenderer, Node, NodeFlags, NodeId, NodeKind, SceneState};

use thiserror::Error;

/// Scene graph errors
#[derive(Error, Debug)]
pub enum SceneError {
    /// Referenced node does not exist
    #[error("node not found: {0:?}")]
    NodeNotFound(NodeId),

    /// Operation requires a scene node
    #[error("node is not a scene: {0:?}")]
    NotAScene(NodeId),

    /// Operation requires a camera node
    #[error("node is not a camera: {0:?}")]
    NotACamera(NodeId),
}
