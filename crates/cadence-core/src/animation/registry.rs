//! Registry of root nodes.
//!
//! Roots are ticked in insertion order. Removal leaves a tombstone so it
//! stays O(1); tombstones are compacted away between ticks.

use std::collections::HashMap;

use super::types::NodeId;

#[derive(Debug, Default)]
pub(crate) struct RootRegistry {
    order: Vec<Option<NodeId>>,
    slots: HashMap<NodeId, usize>,
}

impl RootRegistry {
    pub(crate) fn insert(&mut self, node: NodeId) {
        if self.slots.contains_key(&node) {
            return;
        }
        self.slots.insert(node, self.order.len());
        self.order.push(Some(node));
    }

    pub(crate) fn remove(&mut self, node: NodeId) -> bool {
        match self.slots.remove(&node) {
            Some(slot) => {
                self.order[slot] = None;
                true
            }
            None => false,
        }
    }

    pub(crate) fn contains(&self, node: NodeId) -> bool {
        self.slots.contains_key(&node)
    }

    pub(crate) fn len(&self) -> usize {
        self.slots.len()
    }

    pub(crate) fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }

    /// Live roots in insertion order.
    pub(crate) fn snapshot(&self) -> Vec<NodeId> {
        self.order.iter().flatten().copied().collect()
    }

    /// Drop tombstones once they outnumber live entries.
    pub(crate) fn compact(&mut self) {
        if self.order.len() <= 2 * self.slots.len() + 8 {
            return;
        }
        self.order.retain(Option::is_some);
        for (slot, node) in self.order.iter().enumerate() {
            if let Some(node) = node {
                self.slots.insert(*node, slot);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_insertion_order_survives_removal() {
        let mut roots = RootRegistry::default();
        for n in 1..=4 {
            roots.insert(NodeId(n));
        }
        roots.insert(NodeId(2));
        assert_eq!(roots.len(), 4);

        assert!(roots.remove(NodeId(2)));
        assert!(!roots.remove(NodeId(2)));
        assert!(!roots.contains(NodeId(2)));
        assert_eq!(roots.snapshot(), vec![NodeId(1), NodeId(3), NodeId(4)]);
    }

    #[test]
    fn test_compact_keeps_order_and_slots() {
        let mut roots = RootRegistry::default();
        for n in 0..40 {
            roots.insert(NodeId(n));
        }
        for n in (0..40).filter(|n| n % 4 != 0) {
            roots.remove(NodeId(n));
        }
        roots.compact();
        assert_eq!(roots.order.len(), 10);

        // slots must point at the compacted positions
        assert!(roots.remove(NodeId(8)));
        assert_eq!(roots.snapshot().first(), Some(&NodeId(0)));
        assert_eq!(roots.snapshot().len(), 9);
        assert!(!roots.snapshot().contains(&NodeId(8)));
        assert!(!roots.is_empty());
    }
}
