//! Load failure behavior
//!
//! Bad paths and bad files must never take the engine down: the affected
//! node or asset is marked failed, a `LoadFailed` notification goes out,
//! and the tick keeps running.

use std::cell::Cell;
use std::rc::Rc;

use approx::assert_relative_eq;

use crate::assets::LoadState;
use crate::engine::Engine;
use crate::events::{EventKind, EventTarget};
use crate::foundation::math::Vec3;
use crate::scene::{Node, NodeFlags};
use crate::tests::{fixture_config, settle};

#[test]
fn test_missing_hierarchy_path_does_not_panic() {
    let mut engine = Engine::new(fixture_config()).unwrap();
    let scene = engine.stage_mut().add_scene("main").unwrap();
    let placeholder = engine
        .stage_mut()
        .graph_mut()
        .add_child(scene, Node::group("model"))
        .unwrap();

    let failures = Rc::new(Cell::new(0u32));
    {
        let failures = Rc::clone(&failures);
        engine.once(
            EventKind::LoadFailed,
            EventTarget::Node(placeholder),
            move |_ctx, event| {
                assert!(event.error.is_some());
                failures.set(failures.get() + 1);
            },
        );
    }

    engine.load_hierarchy(placeholder, "hierarchies/not_here.hier.ron");
    engine
        .stage_mut()
        .graph_mut()
        .node_mut(placeholder)
        .unwrap()
        .transform
        .scale = Vec3::new(10.0, 10.0, 10.0);

    settle(&mut engine, 5);

    assert_eq!(failures.get(), 1);

    let node = engine.stage().graph().node(placeholder).unwrap();
    assert!(node.flags.contains(NodeFlags::HIERARCHY_FAILED));
    assert!(!node.flags.contains(NodeFlags::HIERARCHY_READY));
    assert!(node.children().is_empty());

    // The early scale is untouched by the failure
    assert_relative_eq!(node.transform.scale, Vec3::new(10.0, 10.0, 10.0));

    // And the engine keeps ticking
    assert!(engine.is_running());
    let frames = engine.timer().frame_count();
    settle(&mut engine, 2);
    assert_eq!(engine.timer().frame_count(), frames + 2);
}

#[test]
fn test_unparseable_hierarchy_reports_failure() {
    let mut engine = Engine::new(fixture_config()).unwrap();
    let scene = engine.stage_mut().add_scene("main").unwrap();
    let placeholder = engine
        .stage_mut()
        .graph_mut()
        .add_child(scene, Node::group("model"))
        .unwrap();

    engine.load_hierarchy(placeholder, "hierarchies/broken.hier.ron");
    settle(&mut engine, 5);

    let node = engine.stage().graph().node(placeholder).unwrap();
    assert!(node.flags.contains(NodeFlags::HIERARCHY_FAILED));
    assert!(node.children().is_empty());
}

#[test]
fn test_missing_mesh_inside_a_valid_hierarchy() {
    let mut engine = Engine::new(fixture_config()).unwrap();
    let scene = engine.stage_mut().add_scene("main").unwrap();
    let placeholder = engine
        .stage_mut()
        .graph_mut()
        .add_child(scene, Node::group("model"))
        .unwrap();

    engine.load_hierarchy(placeholder, "hierarchies/missing_mesh.hier.ron");
    settle(&mut engine, 5);

    // The hierarchy itself instantiated fine
    let node = engine.stage().graph().node(placeholder).unwrap();
    assert!(node.flags.contains(NodeFlags::HIERARCHY_READY));

    let child = engine.stage().graph().child_at(placeholder, 0).unwrap();
    let mesh_node = engine
        .stage()
        .graph()
        .node(child)
        .unwrap()
        .mesh_node()
        .unwrap()
        .clone();

    // The mesh asset failed, the material loaded
    let mesh = mesh_node.mesh_filter.shared_mesh;
    assert_eq!(engine.assets().mesh_state(mesh), Some(LoadState::Failed));
    assert!(engine.assets().mesh(mesh).is_none());
    assert_eq!(engine.assets().failed_count(), 1);
    assert_eq!(
        engine
            .assets()
            .material_state(mesh_node.mesh_renderer.shared_materials[0]),
        Some(LoadState::Loaded)
    );

    // A late subscriber to the failed asset gets the failure replayed
    let fired = Rc::new(Cell::new(0u32));
    {
        let fired = Rc::clone(&fired);
        engine.once(
            EventKind::LoadFailed,
            EventTarget::Asset(mesh.id()),
            move |_ctx, event| {
                assert!(event.error.is_some());
                fired.set(fired.get() + 1);
            },
        );
    }
    settle(&mut engine, 2);
    assert_eq!(fired.get(), 1);
}

#[test]
fn test_malformed_mesh_marks_the_entry_failed() {
    let mut engine = Engine::new(fixture_config()).unwrap();

    let mesh = engine.assets_mut().request_mesh("meshes/bad_index.obj");

    let failures = Rc::new(Cell::new(0u32));
    {
        let failures = Rc::clone(&failures);
        engine.once(
            EventKind::LoadFailed,
            EventTarget::Asset(mesh.id()),
            move |_ctx, event| {
                assert!(event.error.is_some());
                failures.set(failures.get() + 1);
            },
        );
    }

    settle(&mut engine, 3);

    assert_eq!(failures.get(), 1);
    assert_eq!(engine.assets().mesh_state(mesh), Some(LoadState::Failed));
    assert!(engine.assets().mesh(mesh).is_none());
    assert!(engine.is_running());
}

#[test]
fn test_failed_node_replay_for_late_subscribers() {
    let mut engine = Engine::new(fixture_config()).unwrap();
    let scene = engine.stage_mut().add_scene("main").unwrap();
    let placeholder = engine
        .stage_mut()
        .graph_mut()
        .add_child(scene, Node::group("model"))
        .unwrap();

    engine.load_hierarchy(placeholder, "hierarchies/not_here.hier.ron");
    settle(&mut engine, 3);

    let node = engine.stage().graph().node(placeholder).unwrap();
    assert!(node
        .hierarchy_error()
        .is_some_and(|message| message.contains("hierarchies/not_here.hier.ron")));

    let fired = Rc::new(Cell::new(0u32));
    {
        let fired = Rc::clone(&fired);
        engine.once(
            EventKind::LoadFailed,
            EventTarget::Node(placeholder),
            move |_ctx, event| {
                // The replay carries the original cause, not a placeholder
                let message = event.error.as_deref().unwrap_or_default();
                assert!(message.contains("hierarchies/not_here.hier.ron"));
                fired.set(fired.get() + 1);
            },
        );
    }
    settle(&mut engine, 2);
    assert_eq!(fired.get(), 1);
}
