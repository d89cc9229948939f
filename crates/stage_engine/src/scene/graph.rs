//! Scene graph storage and hierarchy operations
//!
//! Nodes live in a slotmap arena under a fixed root node. Child order is
//! insertion order, and stays stable: hierarchy instantiation relies on it
//! to make "first child" a meaningful lookup.

use crate::foundation::collections::HandleMap;
use crate::foundation::math::{Mat4, Transform};
use crate::scene::node::{Node, NodeId, NodeKind};
use crate::scene::SceneError;

/// Arena of scene nodes with a fixed root
pub struct SceneGraph {
    nodes: HandleMap<Node>,
    root: NodeId,
}

impl SceneGraph {
    /// Create a new graph containing only the root node
    pub fn new() -> Self {
        let mut nodes = HandleMap::new();
        let root = NodeId::new(nodes.insert(Node::group("root")));
        Self { nodes, root }
    }

    /// The fixed root node
    pub fn root(&self) -> NodeId {
        self.root
    }

    /// Add a scene node directly under the root
    pub fn add_scene(&mut self, name: &str) -> Result<NodeId, SceneError> {
        let root = self.root;
        let id = self.add_child(root, Node::scene(name))?;
        log::info!("Scene '{}' created", name);
        Ok(id)
    }

    /// Append a node as the last child of `parent`
    pub fn add_child(&mut self, parent: NodeId, node: Node) -> Result<NodeId, SceneError> {
        if !self.nodes.contains_key(parent.key()) {
            return Err(SceneError::NodeNotFound(parent));
        }

        let id = NodeId::new(self.nodes.insert(node));
        if let Some(child) = self.nodes.get_mut(id.key()) {
            child.parent = Some(parent);
        }
        if let Some(parent_node) = self.nodes.get_mut(parent.key()) {
            parent_node.children.push(id);
        }
        Ok(id)
    }

    /// Look up a node
    pub fn node(&self, id: NodeId) -> Option<&Node> {
        self.nodes.get(id.key())
    }

    /// Look up a node mutably
    pub fn node_mut(&mut self, id: NodeId) -> Option<&mut Node> {
        self.nodes.get_mut(id.key())
    }

    /// Whether the graph contains the node
    pub fn contains(&self, id: NodeId) -> bool {
        self.nodes.contains_key(id.key())
    }

    /// The `index`-th child of `parent`, in insertion order
    pub fn child_at(&self, parent: NodeId, index: usize) -> Option<NodeId> {
        self.node(parent)?.children.get(index).copied()
    }

    /// Ordered children of a node (empty for unknown ids)
    pub fn children(&self, id: NodeId) -> &[NodeId] {
        self.node(id).map_or(&[], Node::children)
    }

    /// Parent of a node
    pub fn parent(&self, id: NodeId) -> Option<NodeId> {
        self.node(id)?.parent
    }

    /// Total number of nodes, including the root
    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    /// Scene nodes currently attached under the root
    pub fn scenes(&self) -> Vec<NodeId> {
        self.children(self.root)
            .iter()
            .copied()
            .filter(|id| self.node(*id).is_some_and(Node::is_scene))
            .collect()
    }

    /// Point a scene at the camera it should render through
    ///
    /// Both ids are validated: `scene` must be a scene node and `camera` a
    /// camera node.
    pub fn set_current_camera(&mut self, scene: NodeId, camera: NodeId) -> Result<(), SceneError> {
        if !self.node(camera).is_some_and(Node::is_camera) {
            return Err(SceneError::NotACamera(camera));
        }
        let scene_node = self
            .nodes
            .get_mut(scene.key())
            .ok_or(SceneError::NodeNotFound(scene))?;
        match &mut scene_node.kind {
            NodeKind::Scene(state) => {
                state.current_camera = Some(camera);
                Ok(())
            }
            _ => Err(SceneError::NotAScene(scene)),
        }
    }

    /// The camera a scene renders through, if one was set
    pub fn current_camera(&self, scene: NodeId) -> Option<NodeId> {
        self.node(scene)?.current_camera()
    }

    /// Root-to-node transform, combining every ancestor's local transform
    pub fn world_transform(&self, id: NodeId) -> Option<Transform> {
        let mut chain = Vec::new();
        let mut current = Some(id);
        while let Some(node_id) = current {
            let node = self.node(node_id)?;
            chain.push(node_id);
            current = node.parent;
        }

        let mut result = Transform::identity();
        for node_id in chain.iter().rev() {
            if let Some(node) = self.node(*node_id) {
                result = result.combine(&node.transform);
            }
        }
        Some(result)
    }

    /// Root-to-node transform as a matrix
    pub fn world_matrix(&self, id: NodeId) -> Option<Mat4> {
        self.world_transform(id).map(|t| t.to_matrix())
    }
}

impl Default for SceneGraph {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::foundation::math::Vec3;
    use crate::scene::camera::CameraParams;
    use approx::assert_relative_eq;

    const EPSILON: f32 = 1e-6;

    #[test]
    fn test_children_keep_insertion_order() {
        let mut graph = SceneGraph::new();
        let scene = graph.add_scene("main").unwrap();
        let first = graph.add_child(scene, Node::group("first")).unwrap();
        let second = graph.add_child(scene, Node::group("second")).unwrap();

        assert_eq!(graph.child_at(scene, 0), Some(first));
        assert_eq!(graph.child_at(scene, 1), Some(second));
        assert_eq!(graph.child_at(scene, 2), None);
        assert_eq!(graph.parent(first), Some(scene));
        assert_eq!(graph.scenes(), vec![scene]);
    }

    #[test]
    fn test_add_child_rejects_unknown_parent() {
        let mut graph = SceneGraph::new();
        let mut other = SceneGraph::new();
        let foreign = other.add_scene("elsewhere").unwrap();
        let foreign_child = other.add_child(foreign, Node::group("x")).unwrap();

        let result = graph.add_child(foreign_child, Node::group("orphan"));
        assert!(matches!(result, Err(SceneError::NodeNotFound(_))));
    }

    #[test]
    fn test_set_current_camera_validates_kinds() {
        let mut graph = SceneGraph::new();
        let scene = graph.add_scene("main").unwrap();
        let group = graph.add_child(scene, Node::group("not_a_camera")).unwrap();
        let camera = graph
            .add_child(scene, Node::camera("camera", CameraParams::new(0.0, 0.1, 100.0)))
            .unwrap();

        assert!(matches!(
            graph.set_current_camera(scene, group),
            Err(SceneError::NotACamera(_))
        ));
        assert!(matches!(
            graph.set_current_camera(group, camera),
            Err(SceneError::NotAScene(_))
        ));

        graph.set_current_camera(scene, camera).unwrap();
        assert_eq!(graph.current_camera(scene), Some(camera));
    }

    #[test]
    fn test_world_transform_combines_ancestors() {
        let mut graph = SceneGraph::new();
        let scene = graph.add_scene("main").unwrap();
        let parent = graph.add_child(scene, Node::group("parent")).unwrap();
        let child = graph.add_child(parent, Node::group("child")).unwrap();

        if let Some(node) = graph.node_mut(parent) {
            node.transform.scale = Vec3::new(10.0, 10.0, 10.0);
        }
        if let Some(node) = graph.node_mut(child) {
            node.transform.position = Vec3::new(1.0, 0.0, 0.0);
        }

        let world = graph.world_transform(child).unwrap();
        assert_relative_eq!(world.position, Vec3::new(10.0, 0.0, 0.0), epsilon = EPSILON);
        assert_relative_eq!(world.scale, Vec3::new(10.0, 10.0, 10.0), epsilon = EPSILON);
    }

    #[test]
    fn test_kind_accessors() {
        let mut graph = SceneGraph::new();
        let scene = graph.add_scene("main").unwrap();
        let camera = graph
            .add_child(scene, Node::camera("camera", CameraParams::new(1.5, 0.1, 100.0)))
            .unwrap();

        let camera_node = graph.node(camera).unwrap();
        assert!(camera_node.is_camera());
        assert!(!camera_node.is_mesh());
        assert!(camera_node.mesh_node().is_none());
        assert_relative_eq!(camera_node.camera_params().unwrap().aspect, 1.5);

        let scene_node = graph.node(scene).unwrap();
        assert!(scene_node.is_scene());
        assert!(scene_node.current_camera().is_none());
    }
}
