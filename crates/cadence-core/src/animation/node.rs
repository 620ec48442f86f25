//! Per-node timing state.
//!
//! A node's position runs from 0 to `delay + duration`. Two thresholds
//! split that range: the delay (start of content) and the end. Crossing
//! them forward is what produces `BecameActive` and `Completed` events.
//!
//! ```text
//! 0 ────── delay ──────────── delay + duration
//!   Delayed   │     Active          │ Completed
//! ```

use super::chain::ChainState;
use super::events::Listener;
use super::group::GroupState;
use super::leaf::LeafAnimation;
use super::types::{NodeId, NodeState};

/// Lifecycle phase. `Delayed` and `Active` are derived from the position.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Phase {
    Pending,
    Started,
    Completed,
}

pub(crate) type Action = Box<dyn FnOnce()>;

pub(crate) enum NodeKind {
    Leaf(LeafAnimation),
    Chain(ChainState),
    Group(GroupState),
    /// Spacer with no content.
    Wait,
    /// Runs once at commit.
    Action(Option<Action>),
}

/// Discriminant of [`NodeKind`], for dispatch without holding a borrow.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum KindTag {
    Leaf,
    Chain,
    Group,
    Wait,
    Action,
}

impl NodeKind {
    pub(crate) fn tag(&self) -> KindTag {
        match self {
            Self::Leaf(_) => KindTag::Leaf,
            Self::Chain(_) => KindTag::Chain,
            Self::Group(_) => KindTag::Group,
            Self::Wait => KindTag::Wait,
            Self::Action(_) => KindTag::Action,
        }
    }
}

impl KindTag {
    pub(crate) fn is_composite(self) -> bool {
        matches!(self, Self::Chain | Self::Group)
    }
}

pub(crate) struct Node {
    pub(crate) kind: NodeKind,
    /// Own duration. Composites derive theirs from their children instead.
    pub(crate) duration: f64,
    pub(crate) delay: f64,
    pub(crate) position: f64,
    pub(crate) speed: f64,
    pub(crate) reversed: bool,
    pub(crate) finished: bool,
    pub(crate) phase: Phase,
    /// Set once the node has reached its delay and started its content.
    pub(crate) committed: bool,
    /// Set once `BecameActive` has been emitted for the node.
    pub(crate) announced: bool,
    pub(crate) manual: bool,
    pub(crate) owner: Option<NodeId>,
    pub(crate) listeners: Vec<Listener>,
}

impl Node {
    pub(crate) fn new(kind: NodeKind, duration: f64) -> Self {
        Self {
            kind,
            duration,
            delay: 0.0,
            position: 0.0,
            speed: 1.0,
            reversed: false,
            finished: false,
            phase: Phase::Pending,
            committed: false,
            announced: false,
            manual: false,
            owner: None,
            listeners: Vec::new(),
        }
    }

    pub(crate) fn tag(&self) -> KindTag {
        self.kind.tag()
    }

    /// Owned children, in declaration order.
    pub(crate) fn children(&self) -> &[NodeId] {
        match &self.kind {
            NodeKind::Chain(chain) => &chain.children,
            NodeKind::Group(group) => &group.children,
            _ => &[],
        }
    }

    pub(crate) fn is_completed(&self) -> bool {
        self.phase == Phase::Completed
    }

    pub(crate) fn state(&self) -> NodeState {
        match self.phase {
            Phase::Pending => NodeState::Pending,
            Phase::Completed => NodeState::Completed,
            Phase::Started if self.position < self.delay => NodeState::Delayed,
            Phase::Started => NodeState::Active,
        }
    }

    /// Content progress in `[0, 1]` for a node of the given duration.
    pub(crate) fn progress(&self, duration: f64, reversed: bool) -> f64 {
        let local = self.position - self.delay;
        let forward = if duration > 0.0 {
            (local / duration).clamp(0.0, 1.0)
        } else if local >= 0.0 {
            1.0
        } else {
            0.0
        };
        if reversed { 1.0 - forward } else { forward }
    }
}

/// Thresholds crossed by one position move.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub(crate) struct Crossings {
    pub(crate) activated: bool,
    pub(crate) ended: bool,
    pub(crate) moved: bool,
}

impl Crossings {
    /// Forward crossings between `old` and `new`. Both may fire on one jump.
    pub(crate) fn between(old: f64, new: f64, delay: f64, end: f64) -> Self {
        Self {
            activated: old <= delay && new > delay,
            ended: old < end && new >= end,
            moved: old != new,
        }
    }
}
