//! Event dispatch system
//!
//! Handlers are registered per `(target, event type)` and receive a mutable
//! context alongside the event, so a handler can rewrite the tree that
//! delivered it.

use std::sync::Arc;

use rustc_hash::FxHashMap;
use smallvec::SmallVec;

/// Event type identifier
pub type EventType = u32;

/// Common event types
pub mod event_types {
    use super::EventType;

    pub const POINTER_ENTER: EventType = 4;
    pub const POINTER_LEAVE: EventType = 5;
    /// Primary button pressed and released on the same target
    pub const CLICK: EventType = 8;

    /// Whether events of this type travel from the target up to the root.
    ///
    /// Enter/leave are delivered to the target only.
    pub const fn bubbles(event_type: EventType) -> bool {
        !matches!(event_type, POINTER_ENTER | POINTER_LEAVE)
    }
}

/// A UI event travelling through the tree
#[derive(Clone, Debug)]
pub struct Event {
    pub event_type: EventType,
    /// Node the event was dispatched at
    pub target: u64,
    /// Node whose handlers are currently running
    pub current_target: u64,
    pub timestamp: u64,
    pub propagation_stopped: bool,
}

impl Event {
    /// Create an event aimed at `target`
    pub fn new(event_type: EventType, target: u64) -> Self {
        Self {
            event_type,
            target,
            current_target: target,
            timestamp: 0,
            propagation_stopped: false,
        }
    }

    pub fn bubbles(&self) -> bool {
        event_types::bubbles(self.event_type)
    }

    pub fn stop_propagation(&mut self) {
        self.propagation_stopped = true;
    }
}

/// Event handler function type, generic over the context it mutates
pub type EventHandler<C> = Arc<dyn Fn(&mut C, &mut Event) + Send + Sync>;

/// Stores handlers registered per target and event type
pub struct EventDispatcher<C> {
    handlers: FxHashMap<(u64, EventType), Vec<EventHandler<C>>>,
}

impl<C> EventDispatcher<C> {
    pub fn new() -> Self {
        Self {
            handlers: FxHashMap::default(),
        }
    }

    /// Register an event handler for a target and event type
    pub fn register<F>(&mut self, target: u64, event_type: EventType, handler: F)
    where
        F: Fn(&mut C, &mut Event) + Send + Sync + 'static,
    {
        self.handlers
            .entry((target, event_type))
            .or_default()
            .push(Arc::new(handler));
    }

    /// Snapshot the handlers for a target and event type.
    ///
    /// The snapshot is detached from the dispatcher so handlers can run
    /// while the owning context is mutably borrowed.
    pub fn handlers(&self, target: u64, event_type: EventType) -> SmallVec<[EventHandler<C>; 4]> {
        self.handlers
            .get(&(target, event_type))
            .map(|list| list.iter().cloned().collect())
            .unwrap_or_default()
    }

    /// Drop every handler registered for a target
    pub fn remove_target(&mut self, target: u64) -> usize {
        let before = self.len();
        self.handlers.retain(|(t, _), _| *t != target);
        let removed = before - self.len();
        if removed > 0 {
            tracing::trace!(target_id = target, removed, "dropped event handlers");
        }
        removed
    }

    /// Total number of registered handlers
    pub fn len(&self) -> usize {
        self.handlers.values().map(Vec::len).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.handlers.is_empty()
    }
}

impl<C> Default for EventDispatcher<C> {
    fn default() -> Self {
        Self::new()
    }
}

/// Run a handler snapshot against `ctx`, stopping once propagation is stopped.
///
/// `handlers` is detached from its dispatcher, so a handler may register or
/// drop handlers while it runs.
pub fn deliver<C>(
    handlers: impl IntoIterator<Item = EventHandler<C>>,
    ctx: &mut C,
    event: &mut Event,
) {
    for handler in handlers {
        if event.propagation_stopped {
            break;
        }
        handler(ctx, event);
    }
}
