//! Parallel composition.

use tracing::debug;

use super::node::NodeKind;
use super::scheduler::Scheduler;
use super::types::NodeId;
use crate::error::Result;

#[derive(Debug)]
pub(crate) struct GroupState {
    pub(crate) children: Vec<NodeId>,
    /// Children still running.
    remaining: usize,
    all_finished: bool,
}

impl GroupState {
    pub(crate) fn new(children: Vec<NodeId>) -> Self {
        Self {
            children,
            remaining: 0,
            all_finished: true,
        }
    }
}

impl Scheduler {
    /// Compose `children` into a group that starts them together and
    /// completes when the last one does.
    pub fn group(&mut self, children: Vec<NodeId>) -> Result<NodeId> {
        let state = GroupState::new(children.clone());
        self.adopt(NodeKind::Group(state), &children)
    }

    /// `first` and `second`, in parallel.
    pub fn and(&mut self, first: NodeId, second: NodeId) -> Result<NodeId> {
        self.group(vec![first, second])
    }

    fn group_state(&mut self, id: NodeId) -> Option<&mut GroupState> {
        match self.nodes.get_mut(&id).map(|node| &mut node.kind) {
            Some(NodeKind::Group(group)) => Some(group),
            _ => None,
        }
    }

    pub(super) fn commit_group(&mut self, id: NodeId) {
        let children = self.children_of(id);
        let mut remaining = 0;
        let mut all_finished = true;
        let mut pending = Vec::with_capacity(children.len());
        for child in children {
            match self.nodes.get(&child) {
                Some(node) if node.is_completed() => all_finished &= node.finished,
                Some(_) => {
                    remaining += 1;
                    pending.push(child);
                }
                None => {}
            }
        }

        if let Some(group) = self.group_state(id) {
            group.remaining = remaining;
            group.all_finished = all_finished;
        }
        debug!(group = %id, remaining, "starting children");
        if remaining == 0 {
            self.complete_node(id, all_finished);
            return;
        }

        for child in pending {
            if self.is_completed(id) {
                break;
            }
            let at_end = self
                .nodes
                .get(&child)
                .is_some_and(|node| node.position > 0.0 && node.position >= self.span_of(child));
            if at_end {
                self.complete_node(child, true);
            } else {
                self.begin(child);
            }
        }
    }

    pub(super) fn group_child_completed(&mut self, id: NodeId, finished: bool) {
        let Some(group) = self.group_state(id) else {
            return;
        };
        group.all_finished &= finished;
        group.remaining = group.remaining.saturating_sub(1);
        if group.remaining == 0 {
            let all_finished = group.all_finished;
            self.complete_node(id, all_finished);
        }
    }

    pub(super) fn advance_group(&mut self, id: NodeId, dt: f64) {
        for child in self.children_of(id) {
            if self.is_completed(id) {
                break;
            }
            if !self.is_completed(child) {
                self.advance(child, dt);
            }
        }
    }
}
