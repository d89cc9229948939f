//! Hierarchy file format
//!
//! A hierarchy file is a RON description of a node tree: names,
//! transforms, and for mesh nodes the mesh and material files to load.
//! It is the on-disk shape behind [`crate::engine::Engine::load_hierarchy`].

use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::assets::AssetError;
use crate::foundation::math::{Transform, Vec3};
use crate::scene::NodeFlags;

/// A node tree description loaded from a .hier.ron file
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HierarchyFile {
    /// Display name of the hierarchy
    pub name: String,

    /// Top-level nodes, instantiated in order under the target node
    pub nodes: Vec<HierarchyNodeDesc>,
}

impl HierarchyFile {
    /// Read and parse a hierarchy file from disk
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self, AssetError> {
        let path = path.as_ref();
        let contents = fs::read_to_string(path)?;
        Self::parse(&contents).map_err(|e| AssetError::Parse {
            path: path.display().to_string(),
            message: e.to_string(),
        })
    }

    /// Parse hierarchy file contents
    pub fn parse(contents: &str) -> Result<Self, ron::error::SpannedError> {
        ron::from_str(contents)
    }
}

/// One node in a hierarchy description
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HierarchyNodeDesc {
    /// Node name
    pub name: String,

    /// Local position
    #[serde(default)]
    pub position: [f32; 3],

    /// Local rotation as XYZ Euler angles in degrees
    #[serde(default)]
    pub rotation_euler_deg: [f32; 3],

    /// Local scale
    #[serde(default = "default_scale")]
    pub scale: [f32; 3],

    /// Whether the node starts active
    #[serde(default = "default_active")]
    pub active: bool,

    /// Whether the node is marked static
    #[serde(default)]
    pub is_static: bool,

    /// What kind of node to instantiate
    #[serde(default)]
    pub kind: HierarchyNodeKind,

    /// Child node descriptions
    #[serde(default)]
    pub children: Vec<HierarchyNodeDesc>,
}

fn default_scale() -> [f32; 3] {
    [1.0, 1.0, 1.0]
}

fn default_active() -> bool {
    true
}

impl HierarchyNodeDesc {
    /// The local transform this description encodes
    pub fn transform(&self) -> Transform {
        let mut transform = Transform::from_position(Vec3::from(self.position));
        transform.rotate_euler_deg(Vec3::from(self.rotation_euler_deg), true);
        transform.scale = Vec3::from(self.scale);
        transform
    }

    /// The node flags this description encodes
    pub fn flags(&self) -> NodeFlags {
        let mut flags = NodeFlags::empty();
        if self.active {
            flags |= NodeFlags::ACTIVE;
        }
        if self.is_static {
            flags |= NodeFlags::STATIC;
        }
        flags
    }
}

/// Node kind within a hierarchy description
#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum HierarchyNodeKind {
    /// A plain transform node
    Group,
    /// A mesh node referencing a mesh file and its material files
    Mesh {
        /// Path to the mesh file, resolved against the search paths
        mesh: String,
        /// Material file paths, one per material slot
        materials: Vec<String>,
    },
}

impl Default for HierarchyNodeKind {
    fn default() -> Self {
        Self::Group
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    const SAMPLE: &str = r#"
HierarchyFile(
    name: "two_boxes",
    nodes: [
        (
            name: "box_a",
            position: (0.0, 1.0, 0.0),
            kind: Mesh(
                mesh: "meshes/box.obj",
                materials: ["materials/red.mat.ron"],
            ),
        ),
        (
            name: "box_b",
            scale: (2.0, 2.0, 2.0),
            is_static: true,
            kind: Group,
            children: [
                (name: "marker"),
            ],
        ),
    ],
)
"#;

    #[test]
    fn test_parse_sample_hierarchy() {
        let file = HierarchyFile::parse(SAMPLE).unwrap();
        assert_eq!(file.name, "two_boxes");
        assert_eq!(file.nodes.len(), 2);

        match &file.nodes[0].kind {
            HierarchyNodeKind::Mesh { mesh, materials } => {
                assert_eq!(mesh, "meshes/box.obj");
                assert_eq!(materials.len(), 1);
            }
            HierarchyNodeKind::Group => panic!("expected a mesh node"),
        }

        assert_eq!(file.nodes[1].children.len(), 1);
        assert_eq!(file.nodes[1].children[0].name, "marker");
    }

    #[test]
    fn test_description_defaults() {
        let file = HierarchyFile::parse(SAMPLE).unwrap();
        let marker = &file.nodes[1].children[0];

        assert_eq!(marker.scale, [1.0, 1.0, 1.0]);
        assert!(marker.active);
        assert!(!marker.is_static);
        assert!(matches!(marker.kind, HierarchyNodeKind::Group));
    }

    #[test]
    fn test_transform_and_flags_conversion() {
        let file = HierarchyFile::parse(SAMPLE).unwrap();

        let transform = file.nodes[1].transform();
        assert_relative_eq!(transform.scale, Vec3::new(2.0, 2.0, 2.0));

        let flags = file.nodes[1].flags();
        assert!(flags.contains(NodeFlags::ACTIVE));
        assert!(flags.contains(NodeFlags::STATIC));

        let inactive = HierarchyNodeDesc {
            name: "ghost".to_string(),
            active: false,
            ..file.nodes[1].children[0].clone()
        };
        assert!(!inactive.flags().contains(NodeFlags::ACTIVE));
    }
}
