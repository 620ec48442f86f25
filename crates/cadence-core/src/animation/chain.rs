//! Sequential composition.
//!
//! A chain plays its children one after another. Each child's delay is
//! relative to its own start, so the chain's duration is the sum of every
//! child's `delay + duration`. Time a child does not use in a tick carries
//! into the next child.

use tracing::debug;

use super::node::NodeKind;
use super::scheduler::Scheduler;
use super::types::NodeId;
use crate::error::Result;

#[derive(Debug)]
pub(crate) struct ChainState {
    pub(crate) children: Vec<NodeId>,
    /// Index into play order of the child currently running.
    cursor: usize,
    all_finished: bool,
}

impl ChainState {
    pub(crate) fn new(children: Vec<NodeId>) -> Self {
        Self {
            children,
            cursor: 0,
            all_finished: true,
        }
    }
}

impl Scheduler {
    /// Compose `children` into a chain that plays them in order.
    ///
    /// The children must be unowned and not yet started. They leave the
    /// root registry and follow the chain from then on.
    pub fn chain(&mut self, children: Vec<NodeId>) -> Result<NodeId> {
        let state = ChainState::new(children.clone());
        self.adopt(NodeKind::Chain(state), &children)
    }

    /// `first`, then `second`.
    pub fn then(&mut self, first: NodeId, second: NodeId) -> Result<NodeId> {
        self.chain(vec![first, second])
    }

    fn chain_state(&mut self, id: NodeId) -> Option<&mut ChainState> {
        match self.nodes.get_mut(&id).map(|node| &mut node.kind) {
            Some(NodeKind::Chain(chain)) => Some(chain),
            _ => None,
        }
    }

    /// The child at the cursor, if the chain is still running.
    fn chain_current(&mut self, id: NodeId) -> Option<NodeId> {
        if self.is_completed(id) {
            return None;
        }
        let cursor = self.chain_state(id)?.cursor;
        self.play_order(id).get(cursor).copied()
    }

    pub(super) fn commit_chain(&mut self, id: NodeId) {
        if let Some(chain) = self.chain_state(id) {
            chain.cursor = 0;
            chain.all_finished = true;
        }
        self.start_next_child(id);
    }

    /// Start the first child at or after the cursor that has not completed.
    /// Completes the chain when none is left.
    fn start_next_child(&mut self, id: NodeId) {
        loop {
            let Some(cursor) = self.chain_state(id).map(|chain| chain.cursor) else {
                return;
            };
            let Some(child) = self.play_order(id).get(cursor).copied() else {
                let finished = self.chain_state(id).is_some_and(|chain| chain.all_finished);
                self.complete_node(id, finished);
                return;
            };

            let Some(node) = self.nodes.get(&child) else {
                self.skip_child(id, true);
                continue;
            };
            if node.is_completed() {
                let finished = node.finished;
                self.skip_child(id, finished);
                continue;
            }

            // seeked to its end while the chain was under manual control
            let at_end = node.position > 0.0 && node.position >= self.span_of(child);
            debug!(chain = %id, child = %child, "next child");
            if at_end {
                self.complete_node(child, true);
            } else {
                self.begin(child);
            }
            return;
        }
    }

    fn skip_child(&mut self, id: NodeId, finished: bool) {
        if let Some(chain) = self.chain_state(id) {
            chain.all_finished &= finished;
            chain.cursor += 1;
        }
    }

    pub(super) fn chain_child_completed(&mut self, id: NodeId, child: NodeId, finished: bool) {
        let current = self.chain_current(id);
        let Some(chain) = self.chain_state(id) else {
            return;
        };
        chain.all_finished &= finished;
        if current == Some(child) {
            chain.cursor += 1;
            self.start_next_child(id);
        }
    }

    /// Drive the running child, carrying leftover time into the next one.
    pub(super) fn advance_chain(&mut self, id: NodeId, dt: f64) {
        let mut remaining = dt;
        while let Some(current) = self.chain_current(id) {
            let leftover = self.advance(current, remaining);
            if self.chain_current(id) == Some(current) {
                break;
            }
            remaining = leftover;
        }
    }
}
