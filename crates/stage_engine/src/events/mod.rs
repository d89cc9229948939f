//! Load notification events
//!
//! Completion signals for asynchronous loads. Key principles:
//! - Subscriptions are keyed by (event kind, target) so only interested
//!   handlers are notified
//! - Handlers are one-shot: dispatching a key consumes every handler
//!   registered under it
//! - Queued delivery: events are drained in FIFO order by the engine tick,
//!   on the caller's thread

use crate::assets::AssetId;
use crate::engine::EngineContext;
use crate::scene::NodeId;
use std::collections::{HashMap, VecDeque};
use std::path::PathBuf;

/// Event kind identification
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EventKind {
    /// A hierarchy finished loading and its nodes were attached
    HierarchyLoaded,
    /// A mesh asset finished loading
    MeshLoaded,
    /// A material asset finished loading
    MaterialLoaded,
    /// A texture asset finished loading
    TextureLoaded,
    /// A load failed at any stage
    LoadFailed,
}

/// What a load event refers to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EventTarget {
    /// A node in the scene graph (hierarchy loads)
    Node(NodeId),
    /// An asset entry (mesh, material, and texture loads)
    Asset(AssetId),
}

/// A load notification
#[derive(Debug, Clone)]
pub struct LoadEvent {
    /// What happened
    pub kind: EventKind,
    /// What it happened to
    pub target: EventTarget,
    /// The path the load was requested with
    pub path: PathBuf,
    /// Failure message, present only for [`EventKind::LoadFailed`]
    pub error: Option<String>,
}

impl LoadEvent {
    /// Create a completion event
    pub fn completed<P: Into<PathBuf>>(kind: EventKind, target: EventTarget, path: P) -> Self {
        Self {
            kind,
            target,
            path: path.into(),
            error: None,
        }
    }

    /// Create a failure event
    pub fn failed<P: Into<PathBuf>>(target: EventTarget, path: P, message: &str) -> Self {
        Self {
            kind: EventKind::LoadFailed,
            target,
            path: path.into(),
            error: Some(message.to_string()),
        }
    }

    /// The subscription key this event dispatches under
    pub fn key(&self) -> (EventKind, EventTarget) {
        (self.kind, self.target)
    }
}

/// Boxed one-shot event handler
///
/// Handlers receive a mutable engine view so they can inspect the scene
/// graph, mutate assets, and register follow-up subscriptions.
pub type OnceHandler = Box<dyn FnOnce(&mut EngineContext<'_>, &LoadEvent)>;

/// One-shot event bus with registration and queuing
pub struct EventBus {
    queue: VecDeque<LoadEvent>,
    handlers: HashMap<(EventKind, EventTarget), Vec<OnceHandler>>,
    dispatched: u64,
}

impl EventBus {
    /// Create a new empty event bus
    pub fn new() -> Self {
        Self {
            queue: VecDeque::new(),
            handlers: HashMap::new(),
            dispatched: 0,
        }
    }

    /// Register a one-shot handler for the given kind and target
    ///
    /// Multiple handlers may share a key; all of them run (and are consumed)
    /// when a matching event is dispatched.
    pub fn once<F>(&mut self, kind: EventKind, target: EventTarget, handler: F)
    where
        F: FnOnce(&mut EngineContext<'_>, &LoadEvent) + 'static,
    {
        self.once_boxed(kind, target, Box::new(handler));
    }

    /// Register an already boxed one-shot handler
    pub fn once_boxed(&mut self, kind: EventKind, target: EventTarget, handler: OnceHandler) {
        self.handlers
            .entry((kind, target))
            .or_insert_with(Vec::new)
            .push(handler);
    }

    /// Queue an event for delivery on the next pump
    pub fn emit(&mut self, event: LoadEvent) {
        log::trace!("Queued {:?} for {:?}", event.kind, event.target);
        self.queue.push_back(event);
    }

    /// Pop the oldest pending event
    pub(crate) fn pop(&mut self) -> Option<LoadEvent> {
        let event = self.queue.pop_front();
        if event.is_some() {
            self.dispatched += 1;
        }
        event
    }

    /// Remove and return every handler registered under the event's key
    pub(crate) fn take_handlers(&mut self, event: &LoadEvent) -> Vec<OnceHandler> {
        self.handlers.remove(&event.key()).unwrap_or_default()
    }

    /// Number of events waiting for dispatch
    pub fn pending_events(&self) -> usize {
        self.queue.len()
    }

    /// Number of registered handlers across all keys
    pub fn handler_count(&self) -> usize {
        self.handlers.values().map(Vec::len).sum()
    }

    /// Total number of events popped for dispatch so far
    pub fn dispatched_count(&self) -> u64 {
        self.dispatched
    }
}

impl Default for EventBus {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::assets::AssetId;

    fn asset_target() -> EventTarget {
        EventTarget::Asset(AssetId::next())
    }

    #[test]
    fn test_once_registers_under_key() {
        let mut bus = EventBus::new();
        let target = asset_target();

        bus.once(EventKind::MeshLoaded, target, |_ctx, _event| {});
        bus.once(EventKind::MeshLoaded, target, |_ctx, _event| {});
        bus.once(EventKind::MaterialLoaded, target, |_ctx, _event| {});

        assert_eq!(bus.handler_count(), 3);

        let event = LoadEvent::completed(EventKind::MeshLoaded, target, "meshes/box.obj");
        let handlers = bus.take_handlers(&event);
        assert_eq!(handlers.len(), 2);

        // The key is consumed; only the material handler remains
        assert_eq!(bus.handler_count(), 1);
        assert!(bus.take_handlers(&event).is_empty());
    }

    #[test]
    fn test_events_pop_in_fifo_order() {
        let mut bus = EventBus::new();
        let first = asset_target();
        let second = asset_target();

        bus.emit(LoadEvent::completed(EventKind::MeshLoaded, first, "a.obj"));
        bus.emit(LoadEvent::completed(EventKind::MeshLoaded, second, "b.obj"));
        assert_eq!(bus.pending_events(), 2);

        assert_eq!(bus.pop().map(|e| e.target), Some(first));
        assert_eq!(bus.pop().map(|e| e.target), Some(second));
        assert!(bus.pop().is_none());
        assert_eq!(bus.dispatched_count(), 2);
    }

    #[test]
    fn test_failure_events_carry_messages() {
        let target = asset_target();
        let event = LoadEvent::failed(target, "meshes/missing.obj", "asset not found");

        assert_eq!(event.kind, EventKind::LoadFailed);
        assert_eq!(event.error.as_deref(), Some("asset not found"));
        assert_eq!(event.key(), (EventKind::LoadFailed, target));
    }

    #[test]
    fn test_handlers_for_different_targets_are_independent() {
        let mut bus = EventBus::new();
        let first = asset_target();
        let second = asset_target();

        bus.once(EventKind::MaterialLoaded, first, |_ctx, _event| {});
        bus.once(EventKind::MaterialLoaded, second, |_ctx, _event| {});

        let event = LoadEvent::completed(EventKind::MaterialLoaded, first, "m.mat.ron");
        assert_eq!(bus.take_handlers(&event).len(), 1);
        assert_eq!(bus.handler_count(), 1);
    }
}
