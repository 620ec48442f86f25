//! The scheduler: node arena, root registry and tick loop.
//!
//! Every node lives in the scheduler's arena and is addressed by a
//! [`NodeId`]. Unowned nodes are roots and are ticked once per frame in
//! insertion order. Composites own their children through ids, and a child
//! only moves when its owner drives it.
//!
//! A freshly built node starts by itself on the next tick. Calling `go`,
//! `manual`, `set_position` or composing it into a chain or group before
//! then cancels that.

use std::collections::{HashMap, HashSet};
use std::fmt;

use static_assertions::assert_not_impl_any;
use tracing::{debug, trace, warn};

use super::applier::ApplierRegistry;
use super::clock::{DeferredStarts, FrameClock};
use super::curve::Curve;
use super::events::{dispatch, AnimationEvent, EventKind, EventQueue, Listener};
use super::leaf::{LeafAnimation, PropertyChange};
use super::node::{Crossings, KindTag, Node, NodeKind, Phase};
use super::registry::RootRegistry;
use super::types::{NodeId, NodeState};
use crate::error::{AnimationError, Result};

/// Speeds with a smaller magnitude are treated as 1.
pub const MIN_SPEED: f64 = 0.01;

pub struct Scheduler {
    pub(super) nodes: HashMap<NodeId, Node>,
    roots: RootRegistry,
    deferred: DeferredStarts,
    appliers: ApplierRegistry,
    default_curve: Curve,
    events: EventQueue,
    record_positions: bool,
    next_id: u64,
    time: f64,
    /// Roots completed since the last tick began.
    retired: Vec<NodeId>,
}

assert_not_impl_any!(Scheduler: Send, Sync);

impl fmt::Debug for Scheduler {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Scheduler")
            .field("time", &self.time)
            .field("nodes", &self.nodes.len())
            .field("roots", &self.roots.len())
            .field("deferred", &self.deferred.len())
            .field("appliers", &self.appliers)
            .finish_non_exhaustive()
    }
}

impl Default for Scheduler {
    fn default() -> Self {
        Self::new()
    }
}

impl Scheduler {
    pub fn new() -> Self {
        Self::with_appliers(ApplierRegistry::with_defaults())
    }

    pub fn with_appliers(appliers: ApplierRegistry) -> Self {
        Self {
            nodes: HashMap::new(),
            roots: RootRegistry::default(),
            deferred: DeferredStarts::default(),
            appliers,
            default_curve: Curve::linear(),
            events: EventQueue::new(),
            record_positions: false,
            next_id: 0,
            time: 0.0,
            retired: Vec::new(),
        }
    }

    pub fn appliers_mut(&mut self) -> &mut ApplierRegistry {
        &mut self.appliers
    }

    /// Curve used by `animate` when none is given.
    pub fn set_default_curve(&mut self, curve: Curve) {
        self.default_curve = curve;
    }

    /// Also record `PositionChanged` in the event queue. Off by default;
    /// listeners always receive it.
    pub fn set_record_positions(&mut self, record: bool) {
        self.record_positions = record;
    }

    /// Total scheduler time, in seconds.
    pub fn time(&self) -> f64 {
        self.time
    }

    // ---- construction ----

    /// Animate one property of a target over `duration` seconds.
    pub fn animate(
        &mut self,
        change: PropertyChange,
        duration: f64,
        curve: Option<Curve>,
    ) -> Result<NodeId> {
        let duration = AnimationError::check_timing("duration", duration)?;
        let curve = curve.unwrap_or_else(|| self.default_curve.clone());
        let leaf = LeafAnimation::new(change, curve, &self.appliers)?;
        debug!(key = leaf.key(), applier = leaf.applier_name(), duration, "animate");
        Ok(self.insert(NodeKind::Leaf(leaf), duration))
    }

    /// Like [`animate`](Self::animate), but when no applier can animate the
    /// property, returns an action that sets the final value instead.
    pub fn animate_or_set(
        &mut self,
        change: PropertyChange,
        duration: f64,
        curve: Option<Curve>,
    ) -> Result<NodeId> {
        let animatable = change
            .target
            .try_borrow()
            .is_ok_and(|target| self.appliers.select(&*target, &change.key).is_some());
        if animatable {
            return self.animate(change, duration, curve);
        }
        debug!(key = %change.key, "no applier; setting directly");
        Ok(self.action(move || change.apply_now()))
    }

    /// A node with no content that lasts `duration` seconds.
    pub fn wait(&mut self, duration: f64) -> Result<NodeId> {
        let duration = AnimationError::check_timing("duration", duration)?;
        Ok(self.insert(NodeKind::Wait, duration))
    }

    /// A zero-duration node that runs `f` once when it commits.
    pub fn action<F>(&mut self, f: F) -> NodeId
    where
        F: FnOnce() + 'static,
    {
        self.insert(NodeKind::Action(Some(Box::new(f))), 0.0)
    }

    fn insert(&mut self, kind: NodeKind, duration: f64) -> NodeId {
        self.next_id += 1;
        let id = NodeId(self.next_id);
        self.nodes.insert(id, Node::new(kind, duration));
        self.roots.insert(id);
        self.deferred.schedule(id, self.time);
        id
    }

    /// Insert a composite and take ownership of `children`. Nothing changes
    /// unless every child can be adopted.
    pub(super) fn adopt(&mut self, kind: NodeKind, children: &[NodeId]) -> Result<NodeId> {
        let mut seen = HashSet::with_capacity(children.len());
        for &child in children {
            let node = self.node(child)?;
            if !seen.insert(child) {
                return Err(AnimationError::DuplicateChild(child));
            }
            if node.owner.is_some() {
                return Err(AnimationError::AlreadyOwned(child));
            }
            if node.phase != Phase::Pending {
                return Err(AnimationError::AlreadyStarted(child));
            }
        }

        let id = self.insert(kind, 0.0);
        for &child in children {
            if let Some(node) = self.nodes.get_mut(&child) {
                node.owner = Some(id);
                node.manual = false;
            }
            self.roots.remove(child);
            self.deferred.cancel(child);
        }
        debug!(node = %id, children = children.len(), "adopted");
        Ok(id)
    }

    // ---- configuration ----

    /// Set the delay before the node's content starts.
    pub fn delayed(&mut self, id: NodeId, delay: f64) -> Result<NodeId> {
        let delay = AnimationError::check_timing("delay", delay)?;
        self.node_mut(id)?.delay = delay;
        Ok(id)
    }

    /// Register a listener for one kind of event on `id`.
    pub fn on<F>(&mut self, id: NodeId, kind: EventKind, callback: F) -> Result<NodeId>
    where
        F: FnMut(&AnimationEvent) + 'static,
    {
        self.node_mut(id)?.listeners.push(Listener {
            kind,
            callback: Box::new(callback),
        });
        Ok(id)
    }

    pub fn on_completed<F>(&mut self, id: NodeId, callback: F) -> Result<NodeId>
    where
        F: FnMut(&AnimationEvent) + 'static,
    {
        self.on(id, EventKind::Completed, callback)
    }

    pub fn on_active<F>(&mut self, id: NodeId, callback: F) -> Result<NodeId>
    where
        F: FnMut(&AnimationEvent) + 'static,
    {
        self.on(id, EventKind::BecameActive, callback)
    }

    // ---- control ----

    /// Start the node at normal speed.
    pub fn go(&mut self, id: NodeId) -> Result<NodeId> {
        self.go_with_speed(id, 1.0)
    }

    /// Start the node. A negative speed plays it reversed, flipping it only
    /// if it is not reversed already. An owned node starts its owner instead.
    pub fn go_with_speed(&mut self, id: NodeId, speed: f64) -> Result<NodeId> {
        let node = self.node(id)?;
        let (owner, completed) = (node.owner, node.is_completed());
        let speed = if !speed.is_finite() || speed.abs() < MIN_SPEED {
            1.0
        } else {
            speed
        };
        if let Some(owner) = owner {
            return self.go_with_speed(owner, speed);
        }
        if speed < 0.0 {
            if !self.reversed_in_tree(id) {
                self.reverse(id)?;
            }
            return self.go_with_speed(id, -speed);
        }
        if completed {
            warn!(node = %id, "go on a completed node");
            return Ok(id);
        }

        self.deferred.cancel(id);
        let node = self.node_mut(id)?;
        node.speed = speed;
        node.manual = false;
        debug!(node = %id, speed, "go");
        self.begin(id);
        Ok(id)
    }

    /// Stop ticking the node automatically. Only `set_position` moves it
    /// afterwards, until the next `go`.
    pub fn manual(&mut self, id: NodeId) -> Result<NodeId> {
        if let Some(owner) = self.node(id)?.owner {
            return self.manual(owner);
        }
        self.node_mut(id)?.manual = true;
        self.deferred.cancel(id);
        Ok(id)
    }

    /// Flip the node's direction: content plays from `to` back to `from`,
    /// and chains play their children last to first.
    pub fn reverse(&mut self, id: NodeId) -> Result<NodeId> {
        let node = self.node_mut(id)?;
        if node.owner.is_some() {
            return Err(AnimationError::OwnedNode(id));
        }
        node.reversed = !node.reversed;
        debug!(node = %id, reversed = node.reversed, "reverse");
        Ok(id)
    }

    /// Force the node and its subtree to their end. Has no effect on a node
    /// that has already completed.
    pub fn complete(&mut self, id: NodeId, finished: bool) -> Result<()> {
        self.node(id)?;
        self.complete_node(id, finished);
        Ok(())
    }

    /// Seek the node to `position`, clamped to its end. The node becomes
    /// manual. Crossing the delay or the end emits `BecameActive` or
    /// `Completed`, but the node stays live until completed or started.
    pub fn set_position(&mut self, id: NodeId, position: f64) -> Result<()> {
        let position = AnimationError::check_timing("position", position)?;
        let node = self.node_mut(id)?;
        if node.owner.is_some() {
            return Err(AnimationError::OwnedNode(id));
        }
        if node.is_completed() {
            debug!(node = %id, "seek on a completed node");
            return Ok(());
        }
        node.manual = true;
        self.deferred.cancel(id);
        self.seek(id, position);
        Ok(())
    }

    // ---- queries ----

    pub fn contains(&self, id: NodeId) -> bool {
        self.nodes.contains_key(&id)
    }

    pub fn state(&self, id: NodeId) -> Option<NodeState> {
        self.nodes.get(&id).map(Node::state)
    }

    pub fn position(&self, id: NodeId) -> Option<f64> {
        self.nodes.get(&id).map(|node| node.position)
    }

    /// Content duration, excluding the node's own delay.
    pub fn duration(&self, id: NodeId) -> Option<f64> {
        self.contains(id).then(|| self.duration_of(id))
    }

    pub fn delay(&self, id: NodeId) -> Option<f64> {
        self.nodes.get(&id).map(|node| node.delay)
    }

    /// Playback speed of the root driving this node.
    pub fn speed(&self, id: NodeId) -> Option<f64> {
        self.nodes.get(&self.root_of(id)?).map(|node| node.speed)
    }

    /// Whether the node plays reversed, taking its owners into account.
    pub fn is_reversed(&self, id: NodeId) -> Option<bool> {
        self.contains(id).then(|| self.reversed_in_tree(id))
    }

    pub fn is_finished(&self, id: NodeId) -> Option<bool> {
        self.nodes.get(&id).map(|node| node.finished)
    }

    pub fn is_manual(&self, id: NodeId) -> Option<bool> {
        self.nodes.get(&self.root_of(id)?).map(|node| node.manual)
    }

    pub fn owner(&self, id: NodeId) -> Option<NodeId> {
        self.nodes.get(&id).and_then(|node| node.owner)
    }

    pub fn is_root(&self, id: NodeId) -> bool {
        self.roots.contains(id)
    }

    /// Whether the node will start by itself on the next tick.
    pub fn is_scheduled(&self, id: NodeId) -> bool {
        self.deferred.is_scheduled(id)
    }

    pub fn root_count(&self) -> usize {
        self.roots.len()
    }

    /// Nodes in the arena, retired ones excluded.
    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    /// True while some root would still move on the next tick.
    pub fn is_animating(&self) -> bool {
        if self.roots.is_empty() {
            return false;
        }
        self.roots.snapshot().into_iter().any(|id| {
            self.nodes
                .get(&id)
                .is_some_and(|node| !node.manual && !node.is_completed())
        })
    }

    // ---- events ----

    pub fn drain_events(&mut self) -> Vec<AnimationEvent> {
        self.events.drain().collect()
    }

    pub fn pop_event(&mut self) -> Option<AnimationEvent> {
        self.events.pop()
    }

    pub fn peek_event(&self) -> Option<&AnimationEvent> {
        self.events.peek()
    }

    pub fn pending_event_count(&self) -> usize {
        self.events.len()
    }

    pub fn has_pending_events(&self) -> bool {
        !self.events.is_empty()
    }

    pub fn events_for_node(&self, id: NodeId) -> Vec<&AnimationEvent> {
        self.events.events_for_node(id)
    }

    pub fn clear_events(&mut self) {
        self.events.clear();
    }

    // ---- driving ----

    /// Advance every running root by `dt` seconds scaled by its speed.
    pub fn tick(&mut self, dt: f64) {
        if !dt.is_finite() || dt < 0.0 {
            warn!(dt, "ignoring invalid frame delta");
            return;
        }
        self.retire();
        self.time += dt;

        for id in self.deferred.take_due(self.time) {
            if self.roots.contains(id) {
                if let Err(err) = self.go(id) {
                    warn!(node = %id, %err, "deferred start failed");
                }
            }
        }

        for id in self.roots.snapshot() {
            let Some(node) = self.nodes.get(&id) else {
                continue;
            };
            if node.manual || node.phase != Phase::Started {
                continue;
            }
            let step = dt * node.speed;
            self.advance(id, step);
        }
        self.roots.compact();
    }

    /// Tick until nothing is animating or the clock stops. Returns the
    /// number of frames run.
    pub fn run<C>(&mut self, clock: &mut C) -> u64
    where
        C: FrameClock + ?Sized,
    {
        let mut frames = 0;
        while self.is_animating() {
            let Some(dt) = clock.next_frame() else {
                break;
            };
            self.tick(dt);
            frames += 1;
        }
        debug!(frames, time = self.time, "run finished");
        frames
    }

    /// Drop the subtrees of roots that completed before this tick.
    fn retire(&mut self) {
        for root in std::mem::take(&mut self.retired) {
            let mut stack = vec![root];
            let mut removed = 0;
            while let Some(id) = stack.pop() {
                if let Some(node) = self.nodes.remove(&id) {
                    stack.extend_from_slice(node.children());
                    removed += 1;
                }
            }
            debug!(node = %root, removed, "retired");
        }
    }

    // ---- internals ----

    fn node(&self, id: NodeId) -> Result<&Node> {
        self.nodes.get(&id).ok_or(AnimationError::UnknownNode(id))
    }

    fn node_mut(&mut self, id: NodeId) -> Result<&mut Node> {
        self.nodes.get_mut(&id).ok_or(AnimationError::UnknownNode(id))
    }

    pub(super) fn is_completed(&self, id: NodeId) -> bool {
        self.nodes.get(&id).is_some_and(Node::is_completed)
    }

    fn root_of(&self, id: NodeId) -> Option<NodeId> {
        let mut current = id;
        loop {
            match self.nodes.get(&current)?.owner {
                Some(owner) => current = owner,
                None => return Some(current),
            }
        }
    }

    fn reversed_in_tree(&self, id: NodeId) -> bool {
        let mut reversed = false;
        let mut current = Some(id);
        while let Some(node) = current.and_then(|id| self.nodes.get(&id)) {
            reversed ^= node.reversed;
            current = node.owner;
        }
        reversed
    }

    /// Content duration. Chains sum their children's spans, groups take
    /// the longest.
    pub(super) fn duration_of(&self, id: NodeId) -> f64 {
        let Some(node) = self.nodes.get(&id) else {
            return 0.0;
        };
        match &node.kind {
            NodeKind::Chain(chain) => chain.children.iter().map(|&c| self.span_of(c)).sum(),
            NodeKind::Group(group) => group
                .children
                .iter()
                .map(|&c| self.span_of(c))
                .fold(0.0, f64::max),
            _ => node.duration,
        }
    }

    /// `delay + duration`.
    pub(super) fn span_of(&self, id: NodeId) -> f64 {
        self.nodes.get(&id).map_or(0.0, |node| node.delay) + self.duration_of(id)
    }

    pub(super) fn children_of(&self, id: NodeId) -> Vec<NodeId> {
        self.nodes
            .get(&id)
            .map(|node| node.children().to_vec())
            .unwrap_or_default()
    }

    /// Children in the order they play. Reversed chains play last to first.
    pub(super) fn play_order(&self, id: NodeId) -> Vec<NodeId> {
        let mut children = self.children_of(id);
        let is_chain = self.nodes.get(&id).is_some_and(|n| n.tag() == KindTag::Chain);
        if is_chain && self.reversed_in_tree(id) {
            children.reverse();
        }
        children
    }

    fn emit(&mut self, id: NodeId, kind: EventKind) {
        let Some(node) = self.nodes.get_mut(&id) else {
            return;
        };
        let event = AnimationEvent {
            node: id,
            kind,
            position: node.position,
            finished: node.finished,
        };
        if kind == EventKind::BecameActive {
            node.announced = true;
        }
        dispatch(&mut node.listeners, &event);
        if kind != EventKind::PositionChanged || self.record_positions {
            self.events.push(event);
        }
    }

    /// Move the node's own position without touching its children.
    fn move_to(&mut self, id: NodeId, position: f64, end: f64) -> Crossings {
        let Some(node) = self.nodes.get_mut(&id) else {
            return Crossings::default();
        };
        let crossed = Crossings::between(node.position, position, node.delay, end);
        node.position = position;
        crossed
    }

    /// Write a committed leaf's value for its current position.
    fn present(&self, id: NodeId) {
        let Some(node) = self.nodes.get(&id) else {
            return;
        };
        if let NodeKind::Leaf(leaf) = &node.kind {
            if node.committed {
                leaf.apply(node.progress(node.duration, self.reversed_in_tree(id)));
            }
        }
    }

    pub(super) fn begin(&mut self, id: NodeId) {
        let Some(node) = self.nodes.get_mut(&id) else {
            return;
        };
        let fresh = match node.phase {
            Phase::Completed => return,
            Phase::Pending => {
                node.phase = Phase::Started;
                true
            }
            Phase::Started => false,
        };
        let (position, delay) = (node.position, node.delay);
        debug!(node = %id, position, delay, "begin");
        if position < delay {
            if fresh {
                self.emit(id, EventKind::Delayed);
            }
        } else {
            self.commit(id);
            self.present(id);
        }
    }

    /// Start the node's content. Runs once per node.
    fn commit(&mut self, id: NodeId) {
        let Some(node) = self.nodes.get_mut(&id) else {
            return;
        };
        if node.committed || node.phase != Phase::Started {
            return;
        }
        node.committed = true;
        let tag = node.tag();
        debug!(node = %id, kind = ?tag, "commit");
        match &mut node.kind {
            NodeKind::Leaf(leaf) => leaf.capture_from(),
            NodeKind::Action(action) => {
                if let Some(action) = action.take() {
                    action();
                }
            }
            _ => {}
        }
        match tag {
            KindTag::Chain => self.commit_chain(id),
            KindTag::Group => self.commit_group(id),
            _ => {}
        }
    }

    /// Advance a started node by `dt` and return the time left over past
    /// its end, if it completed.
    pub(super) fn advance(&mut self, id: NodeId, dt: f64) -> f64 {
        let Some(node) = self.nodes.get(&id) else {
            return 0.0;
        };
        if node.phase != Phase::Started {
            return 0.0;
        }
        let (old, delay, tag) = (node.position, node.delay, node.tag());
        let end = delay + self.duration_of(id);
        let target = old + dt;
        let new = target.min(end);
        trace!(node = %id, old, new, "advance");

        let crossed = self.move_to(id, new, end);
        if !tag.is_composite() && new >= delay {
            self.commit(id);
            if new < end {
                self.present(id);
            }
        }
        if crossed.activated {
            self.emit(id, EventKind::BecameActive);
        }
        if crossed.moved {
            self.emit(id, EventKind::PositionChanged);
        }

        // children get the unclamped step so they can always reach their end
        let content_dt = target.max(delay) - old.max(delay);
        match tag {
            KindTag::Chain | KindTag::Group => {
                if target >= delay {
                    self.commit(id);
                }
                if tag == KindTag::Chain {
                    self.advance_chain(id, content_dt);
                } else {
                    self.advance_group(id, content_dt);
                }
            }
            _ if new >= end => self.complete_node(id, true),
            _ => {}
        }

        if self.is_completed(id) {
            (target - end).max(0.0)
        } else {
            0.0
        }
    }

    /// Seek a node and, recursively, its children.
    fn seek(&mut self, id: NodeId, position: f64) {
        let Some(node) = self.nodes.get_mut(&id) else {
            return;
        };
        if node.is_completed() {
            return;
        }
        if node.phase == Phase::Pending {
            node.phase = Phase::Started;
        }
        let (old, delay, tag) = (node.position, node.delay, node.tag());
        let end = self.span_of(id);
        let new = position.clamp(0.0, end);
        if new == old {
            return;
        }
        trace!(node = %id, old, new, "seek");

        let crossed = self.move_to(id, new, end);
        let content = (new - delay).max(0.0);
        match tag {
            KindTag::Chain => {
                let mut offset = 0.0;
                for child in self.play_order(id) {
                    let span = self.span_of(child);
                    self.seek(child, (content - offset).clamp(0.0, span));
                    offset += span;
                }
            }
            KindTag::Group => {
                for child in self.children_of(id) {
                    let span = self.span_of(child);
                    self.seek(child, content.min(span));
                }
            }
            _ => {
                if new >= delay {
                    self.commit(id);
                }
                self.present(id);
            }
        }

        if crossed.activated {
            self.emit(id, EventKind::BecameActive);
        }
        if crossed.ended {
            self.emit(id, EventKind::Completed);
        }
        self.emit(id, EventKind::PositionChanged);
    }

    /// Terminal completion. Idempotent.
    pub(super) fn complete_node(&mut self, id: NodeId, finished: bool) {
        let Some(node) = self.nodes.get_mut(&id) else {
            return;
        };
        if node.is_completed() {
            return;
        }
        node.phase = Phase::Completed;
        node.finished = finished;
        let owner = node.owner;

        for child in self.play_order(id) {
            self.complete_node(child, finished);
        }

        let end = self.span_of(id);
        let reversed = self.reversed_in_tree(id);
        let mut unannounced = false;
        if let Some(node) = self.nodes.get_mut(&id) {
            node.position = end;
            unannounced = node.committed && !node.announced;
            match &mut node.kind {
                NodeKind::Leaf(leaf) => leaf.commit_final(reversed),
                NodeKind::Action(action) => {
                    if let Some(action) = action.take() {
                        action();
                    }
                }
                _ => {}
            }
        }
        self.deferred.cancel(id);
        debug!(node = %id, finished, "completed");
        // content that started exactly at its delay and never moved past it
        if unannounced {
            self.emit(id, EventKind::BecameActive);
        }
        self.emit(id, EventKind::Completed);

        match owner {
            Some(owner) => self.child_completed(owner, id, finished),
            None => {
                self.roots.remove(id);
                self.retired.push(id);
            }
        }
    }

    fn child_completed(&mut self, owner: NodeId, child: NodeId, finished: bool) {
        let Some(node) = self.nodes.get(&owner) else {
            return;
        };
        if node.phase != Phase::Started || !node.committed {
            return;
        }
        match node.tag() {
            KindTag::Chain => self.chain_child_completed(owner, child, finished),
            KindTag::Group => self.group_child_completed(owner, finished),
            _ => {}
        }
    }
}
