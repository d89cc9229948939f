//! Scene graph node types

use crate::assets::{MaterialHandle, MeshHandle};
use crate::foundation::collections::TypedHandle;
use crate::foundation::math::Transform;
use crate::scene::camera::CameraParams;
use bitflags::bitflags;
use std::path::PathBuf;

/// Stable identifier for a node in a [`crate::scene::SceneGraph`]
pub type NodeId = TypedHandle<Node>;

bitflags! {
    /// Node state flags
    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    pub struct NodeFlags: u8 {
        /// Node participates in updates
        const ACTIVE = 0b0001;
        /// Node's transform is not expected to change at runtime
        const STATIC = 0b0010;
        /// A hierarchy load into this node completed
        const HIERARCHY_READY = 0b0100;
        /// A hierarchy load into this node failed
        const HIERARCHY_FAILED = 0b1000;
    }
}

impl Default for NodeFlags {
    fn default() -> Self {
        Self::ACTIVE
    }
}

/// Geometry reference held by a mesh node
#[derive(Debug, Clone)]
pub struct MeshFilter {
    /// The mesh asset this node renders, shared between nodes that
    /// reference the same path
    pub shared_mesh: MeshHandle,
}

/// Render state held by a mesh node
#[derive(Debug, Clone)]
pub struct MeshRenderer {
    /// Material assets applied to the mesh, in submesh order
    pub shared_materials: Vec<MaterialHandle>,
}

/// Payload of a mesh-bearing node
#[derive(Debug, Clone)]
pub struct MeshNode {
    /// Geometry reference
    pub mesh_filter: MeshFilter,
    /// Materials applied to the geometry
    pub mesh_renderer: MeshRenderer,
}

/// Per-scene state
#[derive(Debug, Clone, Default)]
pub struct SceneState {
    /// The camera the scene renders through
    pub current_camera: Option<NodeId>,
}

/// What a node is
#[derive(Debug, Clone)]
pub enum NodeKind {
    /// A scene root, added directly under the stage
    Scene(SceneState),
    /// A plain grouping node
    Group,
    /// A node carrying geometry and materials
    Mesh(MeshNode),
    /// A perspective camera
    Camera(CameraParams),
}

/// A node in the scene graph
#[derive(Debug)]
pub struct Node {
    /// Display name, used in logs
    pub name: String,

    /// Local transform relative to the parent
    pub transform: Transform,

    /// State flags
    pub flags: NodeFlags,

    pub(crate) kind: NodeKind,
    pub(crate) hierarchy_source: Option<PathBuf>,
    pub(crate) hierarchy_error: Option<String>,
    pub(crate) parent: Option<NodeId>,
    pub(crate) children: Vec<NodeId>,
}

impl Node {
    fn with_kind(name: &str, kind: NodeKind) -> Self {
        Self {
            name: name.to_string(),
            transform: Transform::identity(),
            flags: NodeFlags::default(),
            kind,
            hierarchy_source: None,
            hierarchy_error: None,
            parent: None,
            children: Vec::new(),
        }
    }

    /// Create a grouping node
    pub fn group(name: &str) -> Self {
        Self::with_kind(name, NodeKind::Group)
    }

    /// Create a scene node
    pub fn scene(name: &str) -> Self {
        Self::with_kind(name, NodeKind::Scene(SceneState::default()))
    }

    /// Create a camera node
    pub fn camera(name: &str, params: CameraParams) -> Self {
        Self::with_kind(name, NodeKind::Camera(params))
    }

    /// Create a mesh node
    pub fn mesh(name: &str, mesh_node: MeshNode) -> Self {
        Self::with_kind(name, NodeKind::Mesh(mesh_node))
    }

    /// What this node is
    pub fn kind(&self) -> &NodeKind {
        &self.kind
    }

    /// Whether this node is a scene
    pub fn is_scene(&self) -> bool {
        matches!(self.kind, NodeKind::Scene(_))
    }

    /// Whether this node is a camera
    pub fn is_camera(&self) -> bool {
        matches!(self.kind, NodeKind::Camera(_))
    }

    /// Whether this node carries a mesh
    pub fn is_mesh(&self) -> bool {
        matches!(self.kind, NodeKind::Mesh(_))
    }

    /// Typed access to the mesh payload, if this is a mesh node
    pub fn mesh_node(&self) -> Option<&MeshNode> {
        match &self.kind {
            NodeKind::Mesh(mesh_node) => Some(mesh_node),
            _ => None,
        }
    }

    /// Typed access to the camera parameters, if this is a camera node
    pub fn camera_params(&self) -> Option<&CameraParams> {
        match &self.kind {
            NodeKind::Camera(params) => Some(params),
            _ => None,
        }
    }

    /// The camera a scene node currently renders through
    pub fn current_camera(&self) -> Option<NodeId> {
        match &self.kind {
            NodeKind::Scene(state) => state.current_camera,
            _ => None,
        }
    }

    /// Ordered child node ids
    pub fn children(&self) -> &[NodeId] {
        &self.children
    }

    /// Parent node id, if any
    pub fn parent(&self) -> Option<NodeId> {
        self.parent
    }

    /// The path this node's hierarchy was loaded from, once a load into it
    /// has settled
    pub fn hierarchy_source(&self) -> Option<&std::path::Path> {
        self.hierarchy_source.as_deref()
    }

    /// Why the hierarchy load into this node failed, if it did
    pub fn hierarchy_error(&self) -> Option<&str> {
        self.hierarchy_error.as_deref()
    }
}
