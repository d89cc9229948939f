//! Showcase demo: staged hierarchical model loading
//!
//! Builds a scene with a fixed camera, kicks off an asynchronous load of
//! a hierarchical model, and retints every material of the model's first
//! mesh once the staged notifications arrive: hierarchy first, then the
//! mesh, then each material. The placeholder node is scaled up while the
//! load is still in flight, showing that state applied to it survives
//! load completion.

use std::cell::Cell;
use std::rc::Rc;

use stage_engine::prelude::*;

const CONFIG_PATH: &str = "resources/showcase.toml";
const MODEL_PATH: &str = "hierarchies/showcase.hier.ron";

/// Frame budget before the demo gives up on unsettled assets
const MAX_FRAMES: u64 = 600;

struct ShowcaseApp {
    placeholder: Option<NodeId>,
    expected: Rc<Cell<usize>>,
    tinted: Rc<Cell<usize>>,
    failed: Rc<Cell<bool>>,
    frames: u64,
}

impl ShowcaseApp {
    fn new() -> Self {
        Self {
            placeholder: None,
            expected: Rc::new(Cell::new(0)),
            tinted: Rc::new(Cell::new(0)),
            failed: Rc::new(Cell::new(false)),
            frames: 0,
        }
    }
}

impl Application for ShowcaseApp {
    fn initialize(&mut self, engine: &mut Engine) -> Result<(), AppError> {
        let scene = engine.stage_mut().add_scene("showcase")?;

        let camera = engine.stage_mut().graph_mut().add_child(
            scene,
            Node::camera("camera", CameraParams::new(0.0, 0.1, 100.0)),
        )?;
        engine
            .stage_mut()
            .graph_mut()
            .set_current_camera(scene, camera)?;
        if let Some(node) = engine.stage_mut().graph_mut().node_mut(camera) {
            node.transform.translate(Vec3::new(0.0, 0.8, 1.5), true);
            node.transform.rotate_euler_deg(Vec3::new(-30.0, 0.0, 0.0), true);
        }
        log::info!("Camera placed at (0.0, 0.8, 1.5), pitched -30 degrees");

        let placeholder = engine
            .stage_mut()
            .graph_mut()
            .add_child(scene, Node::group("model"))?;
        self.placeholder = Some(placeholder);

        let expected = Rc::clone(&self.expected);
        let tinted = Rc::clone(&self.tinted);
        engine.once(
            EventKind::HierarchyLoaded,
            EventTarget::Node(placeholder),
            move |ctx, event| {
                log::info!("Hierarchy '{}' ready", event.path.display());

                let Some(first) = ctx.stage.graph().child_at(placeholder, 0) else {
                    log::error!("Loaded hierarchy has no first child");
                    return;
                };
                let Some(mesh_node) = ctx
                    .stage
                    .graph()
                    .node(first)
                    .and_then(Node::mesh_node)
                    .cloned()
                else {
                    log::error!("First child of the loaded hierarchy is not a mesh node");
                    return;
                };

                let mesh = mesh_node.mesh_filter.shared_mesh;
                ctx.once(
                    EventKind::MeshLoaded,
                    EventTarget::Asset(mesh.id()),
                    move |ctx, _event| {
                        let materials = mesh_node.mesh_renderer.shared_materials.clone();
                        log::info!("Mesh ready, waiting on {} material(s)", materials.len());
                        expected.set(materials.len());

                        for material in materials {
                            let tinted = Rc::clone(&tinted);
                            ctx.once(
                                EventKind::MaterialLoaded,
                                EventTarget::Asset(material.id()),
                                move |ctx, event| {
                                    if let Some(asset) = ctx.assets.material_mut(material) {
                                        asset.albedo = Vec4::new(3.5, 3.5, 3.5, 1.0);
                                        log::info!(
                                            "Material '{}' tinted ({})",
                                            asset.name,
                                            event.path.display()
                                        );
                                    }
                                    tinted.set(tinted.get() + 1);
                                },
                            );
                        }
                    },
                );
            },
        );

        let failed = Rc::clone(&self.failed);
        engine.once(
            EventKind::LoadFailed,
            EventTarget::Node(placeholder),
            move |_ctx, event| {
                log::error!(
                    "Model load failed: {}",
                    event.error.as_deref().unwrap_or("unknown error")
                );
                failed.set(true);
            },
        );

        engine.load_hierarchy(placeholder, MODEL_PATH);

        // Scale applies now; the children inherit it when they arrive
        if let Some(node) = engine.stage_mut().graph_mut().node_mut(placeholder) {
            node.transform.scale = Vec3::new(10.0, 10.0, 10.0);
        }
        log::info!("Model load queued, placeholder scaled to (10, 10, 10)");

        Ok(())
    }

    fn update(&mut self, engine: &mut Engine, _delta_time: f32) -> Result<(), AppError> {
        self.frames += 1;

        if self.failed.get() {
            log::error!("Giving up after a load failure");
            engine.quit();
            return Ok(());
        }

        let expected = self.expected.get();
        if expected > 0 && self.tinted.get() == expected {
            log::info!("All {} material(s) tinted, demo complete", expected);
            engine.quit();
            return Ok(());
        }

        if self.frames > MAX_FRAMES {
            log::warn!("Assets did not settle within {} frames, quitting", MAX_FRAMES);
            engine.quit();
        }

        Ok(())
    }

    fn cleanup(&mut self, engine: &mut Engine) {
        if let Some(node) = self
            .placeholder
            .and_then(|id| engine.stage().graph().node(id))
        {
            log::info!(
                "Model local scale at shutdown: ({}, {}, {})",
                node.transform.scale.x,
                node.transform.scale.y,
                node.transform.scale.z
            );
        }
    }
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    stage_engine::foundation::logging::init(log::LevelFilter::Info);

    log::info!("Starting showcase demo...");

    let config = EngineConfig::load_or_default(CONFIG_PATH);
    let mut app = ShowcaseApp::new();
    Engine::run(config, &mut app)?;

    Ok(())
}
