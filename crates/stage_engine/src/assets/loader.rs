//! Cooperative asset loading
//!
//! [`Assets`] owns the load queue and the asset tables. Each engine tick
//! drains a bounded number of queued requests, so a large hierarchy
//! spreads its IO across frames instead of stalling one. Failures mark
//! the affected entry, emit [`EventKind::LoadFailed`], and leave the
//! queue running.

use std::collections::VecDeque;
use std::fs;
use std::path::PathBuf;

use crate::assets::handle::{AssetId, MaterialHandle, MeshHandle, TextureHandle};
use crate::assets::hierarchy::{HierarchyFile, HierarchyNodeDesc, HierarchyNodeKind};
use crate::assets::materials::{MaterialAsset, MaterialFile, MtlParser};
use crate::assets::obj_loader::ObjLoader;
use crate::assets::store::{AssetStore, LoadState};
use crate::assets::texture::TextureAsset;
use crate::assets::{AssetError, MeshAsset};
use crate::engine::AssetConfig;
use crate::events::{EventBus, EventKind, EventTarget, LoadEvent};
use crate::foundation::math::Vec4;
use crate::scene::{
    MeshFilter, MeshNode, MeshRenderer, Node, NodeFlags, NodeId, SceneError, SceneGraph,
};

enum LoadRequest {
    Hierarchy { root: NodeId, path: String },
    Mesh { handle: MeshHandle },
    Material { handle: MaterialHandle },
    Texture { handle: TextureHandle },
}

/// Asset loading front end
pub struct Assets {
    store: AssetStore,
    queue: VecDeque<LoadRequest>,
    search_paths: Vec<String>,
    loads_per_update: usize,
}

impl Assets {
    /// Create an asset system from configuration
    pub fn new(config: &AssetConfig) -> Self {
        Self {
            store: AssetStore::new(),
            queue: VecDeque::new(),
            search_paths: config.search_paths.clone(),
            loads_per_update: config.loads_per_update.max(1),
        }
    }

    /// Queue a hierarchy load into `root`
    ///
    /// The nodes described by the file are attached under `root` when the
    /// load completes. `root`'s own transform is never touched, so state
    /// applied to it while the load is in flight survives.
    pub fn load_hierarchy(&mut self, root: NodeId, path: &str) {
        log::info!("Loading hierarchy '{}'", path);
        self.queue.push_back(LoadRequest::Hierarchy {
            root,
            path: path.to_string(),
        });
    }

    /// Queue a mesh load, reusing the existing handle for a known path
    pub fn request_mesh(&mut self, path: &str) -> MeshHandle {
        if let Some(handle) = self.store.meshes.handle_for_path(path) {
            return handle;
        }
        let handle = self.store.meshes.insert_pending(path);
        log::debug!("Queued mesh '{}' as {}", path, handle.id());
        self.queue.push_back(LoadRequest::Mesh { handle });
        handle
    }

    /// Queue a material load, reusing the existing handle for a known path
    pub fn request_material(&mut self, path: &str) -> MaterialHandle {
        if let Some(handle) = self.store.materials.handle_for_path(path) {
            return handle;
        }
        let handle = self.store.materials.insert_pending(path);
        log::debug!("Queued material '{}' as {}", path, handle.id());
        self.queue.push_back(LoadRequest::Material { handle });
        handle
    }

    /// Queue a texture load, reusing the existing handle for a known path
    pub fn request_texture(&mut self, path: &str) -> TextureHandle {
        if let Some(handle) = self.store.textures.handle_for_path(path) {
            return handle;
        }
        let handle = self.store.textures.insert_pending(path);
        log::debug!("Queued texture '{}' as {}", path, handle.id());
        self.queue.push_back(LoadRequest::Texture { handle });
        handle
    }

    /// Get a loaded mesh
    pub fn mesh(&self, handle: MeshHandle) -> Option<&MeshAsset> {
        self.store.meshes.get(handle)
    }

    /// Get a loaded material
    pub fn material(&self, handle: MaterialHandle) -> Option<&MaterialAsset> {
        self.store.materials.get(handle)
    }

    /// Get mutable access to a loaded material
    ///
    /// The material is shared: every node whose renderer references the
    /// same handle sees the change.
    pub fn material_mut(&mut self, handle: MaterialHandle) -> Option<&mut MaterialAsset> {
        self.store.materials.get_mut(handle)
    }

    /// Get a loaded texture
    pub fn texture(&self, handle: TextureHandle) -> Option<&TextureAsset> {
        self.store.textures.get(handle)
    }

    /// Load state of a mesh entry
    pub fn mesh_state(&self, handle: MeshHandle) -> Option<LoadState> {
        self.store.meshes.state(handle)
    }

    /// Load state of a material entry
    pub fn material_state(&self, handle: MaterialHandle) -> Option<LoadState> {
        self.store.materials.state(handle)
    }

    /// Load state of a texture entry
    pub fn texture_state(&self, handle: TextureHandle) -> Option<LoadState> {
        self.store.textures.state(handle)
    }

    /// Number of queued requests not yet processed
    pub fn pending_loads(&self) -> usize {
        self.queue.len()
    }

    /// Number of assets that finished loading
    pub fn loaded_count(&self) -> usize {
        self.store.loaded_count()
    }

    /// Number of assets whose load failed
    pub fn failed_count(&self) -> usize {
        self.store.failed_count()
    }

    pub(crate) fn replay_event(&self, id: AssetId) -> Option<LoadEvent> {
        self.store.replay_event(id)
    }

    /// Drain up to the per-tick budget of queued loads
    pub(crate) fn process(&mut self, graph: &mut SceneGraph, events: &mut EventBus) {
        for _ in 0..self.loads_per_update {
            let request = match self.queue.pop_front() {
                Some(request) => request,
                None => return,
            };

            match request {
                LoadRequest::Hierarchy { root, path } => {
                    self.process_hierarchy(root, &path, graph, events);
                }
                LoadRequest::Mesh { handle } => self.process_mesh(handle, events),
                LoadRequest::Material { handle } => self.process_material(handle, events),
                LoadRequest::Texture { handle } => self.process_texture(handle, events),
            }
        }
    }

    fn process_hierarchy(
        &mut self,
        root: NodeId,
        path: &str,
        graph: &mut SceneGraph,
        events: &mut EventBus,
    ) {
        if !graph.contains(root) {
            log::error!("Hierarchy '{}' load dropped: target node is gone", path);
            events.emit(LoadEvent::failed(
                EventTarget::Node(root),
                path,
                "target node no longer exists",
            ));
            return;
        }

        let file = match self.resolve(path).and_then(HierarchyFile::load) {
            Ok(file) => file,
            Err(e) => {
                Self::fail_hierarchy(graph, events, root, path, &e.to_string());
                return;
            }
        };

        if let Err(e) = self.instantiate(root, &file, graph) {
            Self::fail_hierarchy(graph, events, root, path, &e.to_string());
            return;
        }

        if let Some(node) = graph.node_mut(root) {
            node.flags |= NodeFlags::HIERARCHY_READY;
            node.hierarchy_source = Some(PathBuf::from(path));
        }
        log::info!(
            "Hierarchy '{}' attached {} root node(s)",
            file.name,
            file.nodes.len()
        );
        events.emit(LoadEvent::completed(
            EventKind::HierarchyLoaded,
            EventTarget::Node(root),
            path,
        ));
    }

    fn fail_hierarchy(
        graph: &mut SceneGraph,
        events: &mut EventBus,
        root: NodeId,
        path: &str,
        message: &str,
    ) {
        if let Some(node) = graph.node_mut(root) {
            node.flags |= NodeFlags::HIERARCHY_FAILED;
            node.hierarchy_source = Some(PathBuf::from(path));
            node.hierarchy_error = Some(message.to_string());
        }
        log::error!("Hierarchy '{}' failed to load: {}", path, message);
        events.emit(LoadEvent::failed(EventTarget::Node(root), path, message));
    }

    fn instantiate(
        &mut self,
        root: NodeId,
        file: &HierarchyFile,
        graph: &mut SceneGraph,
    ) -> Result<(), SceneError> {
        for desc in &file.nodes {
            self.instantiate_node(root, desc, graph)?;
        }
        Ok(())
    }

    fn instantiate_node(
        &mut self,
        parent: NodeId,
        desc: &HierarchyNodeDesc,
        graph: &mut SceneGraph,
    ) -> Result<(), SceneError> {
        let mut node = match &desc.kind {
            HierarchyNodeKind::Group => Node::group(&desc.name),
            HierarchyNodeKind::Mesh { mesh, materials } => {
                // Mesh before materials, so notifications arrive in that order
                let shared_mesh = self.request_mesh(mesh);
                let shared_materials = materials
                    .iter()
                    .map(|material| self.request_material(material))
                    .collect();
                Node::mesh(
                    &desc.name,
                    MeshNode {
                        mesh_filter: MeshFilter { shared_mesh },
                        mesh_renderer: MeshRenderer { shared_materials },
                    },
                )
            }
        };
        node.transform = desc.transform();
        node.flags = desc.flags();

        let id = graph.add_child(parent, node)?;
        for child in &desc.children {
            self.instantiate_node(id, child, graph)?;
        }
        Ok(())
    }

    fn process_mesh(&mut self, handle: MeshHandle, events: &mut EventBus) {
        let path = match self.store.meshes.path(handle) {
            Some(path) => path.to_string(),
            None => return,
        };

        let loaded = self.resolve(&path).and_then(|full_path| {
            ObjLoader::load_obj(&full_path).map_err(|e| AssetError::Parse {
                path: path.clone(),
                message: e.to_string(),
            })
        });

        match loaded {
            Ok(mesh) => {
                log::debug!("Mesh '{}' loaded: {} triangle(s)", path, mesh.triangle_count());
                self.store.meshes.complete(handle, mesh);
                events.emit(LoadEvent::completed(
                    EventKind::MeshLoaded,
                    EventTarget::Asset(handle.id()),
                    path,
                ));
            }
            Err(e) => {
                let message = e.to_string();
                log::error!("Mesh '{}' failed to load: {}", path, message);
                self.store.meshes.fail(handle, &message);
                events.emit(LoadEvent::failed(
                    EventTarget::Asset(handle.id()),
                    path,
                    &message,
                ));
            }
        }
    }

    fn process_material(&mut self, handle: MaterialHandle, events: &mut EventBus) {
        let path = match self.store.materials.path(handle) {
            Some(path) => path.to_string(),
            None => return,
        };

        match self.load_material(&path) {
            Ok(material) => {
                log::debug!("Material '{}' loaded as '{}'", path, material.name);
                self.store.materials.complete(handle, material);
                events.emit(LoadEvent::completed(
                    EventKind::MaterialLoaded,
                    EventTarget::Asset(handle.id()),
                    path,
                ));
            }
            Err(e) => {
                let message = e.to_string();
                log::error!("Material '{}' failed to load: {}", path, message);
                self.store.materials.fail(handle, &message);
                events.emit(LoadEvent::failed(
                    EventTarget::Asset(handle.id()),
                    path,
                    &message,
                ));
            }
        }
    }

    fn load_material(&mut self, path: &str) -> Result<MaterialAsset, AssetError> {
        let full_path = self.resolve(path)?;
        let contents = fs::read_to_string(&full_path)?;

        let (mut material, texture_path) = if path.ends_with(".mtl") {
            let mut parsed = MtlParser::parse(&contents).map_err(|message| AssetError::Parse {
                path: path.to_string(),
                message,
            })?;
            if parsed.is_empty() {
                return Err(AssetError::Parse {
                    path: path.to_string(),
                    message: "no materials defined".to_string(),
                });
            }
            if parsed.len() > 1 {
                log::warn!(
                    "Material library '{}' defines {} materials, using the first",
                    path,
                    parsed.len()
                );
            }
            let data = parsed.remove(0);
            let albedo = Vec4::new(data.diffuse.x, data.diffuse.y, data.diffuse.z, data.dissolve);
            (MaterialAsset::new(data.name, albedo), data.diffuse_map)
        } else if path.ends_with(".ron") {
            let file = MaterialFile::parse(&contents).map_err(|e| AssetError::Parse {
                path: path.to_string(),
                message: e.to_string(),
            })?;
            let texture_path = file.albedo_texture.clone();
            (file.into_asset(), texture_path)
        } else {
            return Err(AssetError::UnsupportedFormat(path.to_string()));
        };

        // The texture loads on its own; the material does not wait for it
        if let Some(texture_path) = texture_path {
            material.albedo_texture = Some(self.request_texture(&texture_path));
        }

        Ok(material)
    }

    fn process_texture(&mut self, handle: TextureHandle, events: &mut EventBus) {
        let path = match self.store.textures.path(handle) {
            Some(path) => path.to_string(),
            None => return,
        };

        match self.resolve(&path).and_then(TextureAsset::from_file) {
            Ok(texture) => {
                log::debug!("Texture '{}' loaded: {}x{}", path, texture.width, texture.height);
                self.store.textures.complete(handle, texture);
                events.emit(LoadEvent::completed(
                    EventKind::TextureLoaded,
                    EventTarget::Asset(handle.id()),
                    path,
                ));
            }
            Err(e) => {
                let message = e.to_string();
                log::error!("Texture '{}' failed to load: {}", path, message);
                self.store.textures.fail(handle, &message);
                events.emit(LoadEvent::failed(
                    EventTarget::Asset(handle.id()),
                    path,
                    &message,
                ));
            }
        }
    }

    /// Try each search path, then the bare path
    fn resolve(&self, path: &str) -> Result<PathBuf, AssetError> {
        for search_path in &self.search_paths {
            let mut candidate = PathBuf::from(search_path);
            candidate.push(path);
            if candidate.exists() {
                return Ok(candidate);
            }
        }

        let bare = PathBuf::from(path);
        if bare.exists() {
            return Ok(bare);
        }

        Err(AssetError::NotFound(path.to_string()))
    }
}
