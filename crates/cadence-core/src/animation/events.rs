//! Node lifecycle events.
//!
//! Every node emits four kinds of events as its position moves:
//! - `Delayed`: the node began before its delay elapsed
//! - `BecameActive`: the position crossed the delay threshold
//! - `PositionChanged`: the position moved
//! - `Completed`: the node reached (or was forced to) its end
//!
//! Events reach per-node listeners registered with
//! [`Scheduler::on`](super::scheduler::Scheduler::on) and are recorded in the
//! scheduler's [`EventQueue`] for polling.
//!
//! # Usage
//!
//! ```ignore
//! let fade = scheduler.animate(change, 0.3, None)?;
//! scheduler.on_completed(fade, |event| println!("done, finished = {}", event.finished))?;
//!
//! scheduler.tick(1.0 / 60.0);
//! for event in scheduler.drain_events() {
//!     if event.kind == EventKind::Completed {
//!         println!("{} completed", event.node);
//!     }
//! }
//! ```

use serde::{Deserialize, Serialize};
use std::collections::VecDeque;
use std::fmt;

use super::types::NodeId;

/// Kind of lifecycle event.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EventKind {
    PositionChanged,
    BecameActive,
    Completed,
    Delayed,
}

/// A single emitted event.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct AnimationEvent {
    /// The node that emitted the event.
    pub node: NodeId,
    pub kind: EventKind,
    /// Node position at emission time, delay included.
    pub position: f64,
    /// The node's finish flag. Only meaningful for `Completed`.
    pub finished: bool,
}

pub(crate) type Callback = Box<dyn FnMut(&AnimationEvent)>;

/// A callback registered for one event kind.
pub(crate) struct Listener {
    pub(crate) kind: EventKind,
    pub(crate) callback: Callback,
}

impl fmt::Debug for Listener {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Listener")
            .field("kind", &self.kind)
            .finish_non_exhaustive()
    }
}

/// Invoke every listener registered for `event.kind`, in registration order.
pub(crate) fn dispatch(listeners: &mut [Listener], event: &AnimationEvent) {
    for listener in listeners.iter_mut().filter(|l| l.kind == event.kind) {
        (listener.callback)(event);
    }
}

/// Queue of events collected while the scheduler runs.
#[derive(Debug, Default)]
pub struct EventQueue {
    events: VecDeque<AnimationEvent>,
}

impl EventQueue {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, event: AnimationEvent) {
        self.events.push_back(event);
    }

    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }

    pub fn len(&self) -> usize {
        self.events.len()
    }

    pub fn pop(&mut self) -> Option<AnimationEvent> {
        self.events.pop_front()
    }

    pub fn drain(&mut self) -> impl Iterator<Item = AnimationEvent> + '_ {
        self.events.drain(..)
    }

    pub fn peek(&self) -> Option<&AnimationEvent> {
        self.events.front()
    }

    pub fn clear(&mut self) {
        self.events.clear();
    }

    /// Pending events emitted by one node.
    pub fn events_for_node(&self, node: NodeId) -> Vec<&AnimationEvent> {
        self.events.iter().filter(|e| e.node == node).collect()
    }
}
