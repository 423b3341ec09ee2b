//! Event dispatch
//!
//! Interaction events (pointer, focus, keys) and observation signals (resize,
//! asset load) share one event shape so a host can feed both through the same
//! entry point. Interaction is aimed at a content node; observation signals
//! are aimed at the surface that owns a filter. The two never share an id
//! space.

use rustc_hash::FxHashMap;

use crate::id::FilterId;
use crate::layer::UiNode;

/// Event type identifier
pub type EventType = u32;

/// Common event types
pub mod event_types {
    use super::EventType;

    pub const POINTER_DOWN: EventType = 1;
    pub const POINTER_UP: EventType = 2;
    pub const POINTER_MOVE: EventType = 3;
    pub const POINTER_ENTER: EventType = 4;
    pub const POINTER_LEAVE: EventType = 5;
    pub const CLICK: EventType = 6;
    pub const FOCUS: EventType = 10;
    pub const BLUR: EventType = 11;
    pub const KEY_DOWN: EventType = 20;
    pub const KEY_UP: EventType = 21;
    /// Layout reported a new size for the target
    pub const RESIZE: EventType = 40;

    /// An embedded resource (e.g. an SVG filter asset) finished attaching
    pub const ASSET_LOAD: EventType = 90;

    /// Whether the event is user interaction rather than an observation signal
    pub fn is_interaction(event_type: EventType) -> bool {
        matches!(
            event_type,
            POINTER_DOWN
                | POINTER_UP
                | POINTER_MOVE
                | POINTER_ENTER
                | POINTER_LEAVE
                | CLICK
                | FOCUS
                | BLUR
                | KEY_DOWN
                | KEY_UP
        )
    }
}

/// What an event is aimed at
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum EventTarget {
    /// A glass surface, addressed by the filter it owns
    Surface(FilterId),
    /// A caller content node
    Node(UiNode),
}

/// A UI event with associated data
#[derive(Clone, Debug)]
pub struct Event {
    pub event_type: EventType,
    pub target: EventTarget,
    pub data: EventData,
    pub propagation_stopped: bool,
}

/// Event-specific data
#[derive(Clone, Debug)]
pub enum EventData {
    Pointer { x: f32, y: f32, button: u8 },
    Key { code: u32 },
    Resize { width: f32, height: f32 },
    None,
}

impl Event {
    pub fn new(event_type: EventType, target: EventTarget, data: EventData) -> Self {
        Self {
            event_type,
            target,
            data,
            propagation_stopped: false,
        }
    }

    pub fn pointer(event_type: EventType, node: UiNode, x: f32, y: f32) -> Self {
        Self::new(
            event_type,
            EventTarget::Node(node),
            EventData::Pointer { x, y, button: 0 },
        )
    }

    pub fn key(event_type: EventType, node: UiNode, code: u32) -> Self {
        Self::new(event_type, EventTarget::Node(node), EventData::Key { code })
    }

    pub fn resize(surface: FilterId, width: f32, height: f32) -> Self {
        Self::new(
            event_types::RESIZE,
            EventTarget::Surface(surface),
            EventData::Resize { width, height },
        )
    }

    pub fn asset_load(surface: FilterId) -> Self {
        Self::new(
            event_types::ASSET_LOAD,
            EventTarget::Surface(surface),
            EventData::None,
        )
    }

    pub fn stop_propagation(&mut self) {
        self.propagation_stopped = true;
    }
}

/// Event handler function type
pub type EventHandler = Box<dyn Fn(&Event) + Send + Sync>;

/// Dispatches events to registered handlers
pub struct EventDispatcher {
    handlers: FxHashMap<(EventTarget, EventType), Vec<EventHandler>>,
}

impl EventDispatcher {
    pub fn new() -> Self {
        Self {
            handlers: FxHashMap::default(),
        }
    }

    /// Register an event handler for a target and event type
    pub fn register<F>(&mut self, target: EventTarget, event_type: EventType, handler: F)
    where
        F: Fn(&Event) + Send + Sync + 'static,
    {
        self.handlers
            .entry((target, event_type))
            .or_default()
            .push(Box::new(handler));
    }

    /// Dispatch an event to all registered handlers.
    ///
    /// Returns the number of handlers invoked.
    pub fn dispatch(&self, event: &mut Event) -> usize {
        let mut invoked = 0;
        if let Some(handlers) = self.handlers.get(&(event.target, event.event_type)) {
            for handler in handlers {
                if event.propagation_stopped {
                    break;
                }
                handler(event);
                invoked += 1;
            }
        }
        invoked
    }

    /// Drop every handler registered for `target`
    pub fn unregister_target(&mut self, target: EventTarget) {
        self.handlers.retain(|(t, _), _| *t != target);
    }

    /// Number of handlers registered for `target`
    pub fn handler_count(&self, target: EventTarget) -> usize {
        self.handlers
            .iter()
            .filter(|((t, _), _)| *t == target)
            .map(|(_, hs)| hs.len())
            .sum()
    }
}

impl Default for EventDispatcher {
    fn default() -> Self {
        Self::new()
    }
}
