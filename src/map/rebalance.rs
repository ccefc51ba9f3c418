use std::cmp;

use super::AvlTreeMap;
use crate::node::{Link, NodeId};

/// A rebalancing rotation, named after the direction of the final turn
/// around the unbalanced node.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) enum Rotation {
    Left,
    Right,
    LeftRight,
    RightLeft,
}

impl<K, V> AvlTreeMap<K, V> {
    fn height_of(&self, link: Link) -> isize {
        link.map_or(-1, |id| self.nodes[id].height)
    }

    /// Recomputes the cached height of a node from its children and returns
    /// its balance factor (right height minus left height).
    /// Both children's heights must be current.
    fn refresh(&mut self, id: NodeId) -> isize {
        let node = &self.nodes[id];
        let left_height = self.height_of(node.left);
        let right_height = self.height_of(node.right);
        self.nodes[id].height = cmp::max(left_height, right_height) + 1;
        right_height - left_height
    }

    fn balance(&self, id: NodeId) -> isize {
        let node = &self.nodes[id];
        self.height_of(node.right) - self.height_of(node.left)
    }

    fn rotate_left(&mut self, id: NodeId) {
        if let Some(right) = self.nodes[id].right {
            let right_left = self.nodes[right].left;
            self.nodes[id].right = right_left;
            if let Some(right_left) = right_left {
                self.nodes[right_left].parent = Some(id);
            }

            let parent = self.nodes[id].parent;
            self.nodes[right].parent = parent;
            self.replace_child(parent, id, Some(right));

            self.nodes[right].left = Some(id);
            self.nodes[id].parent = Some(right);

            self.refresh(id);
            self.refresh(right);
        }
    }

    fn rotate_right(&mut self, id: NodeId) {
        if let Some(left) = self.nodes[id].left {
            let left_right = self.nodes[left].right;
            self.nodes[id].left = left_right;
            if let Some(left_right) = left_right {
                self.nodes[left_right].parent = Some(id);
            }

            let parent = self.nodes[id].parent;
            self.nodes[left].parent = parent;
            self.replace_child(parent, id, Some(left));

            self.nodes[left].right = Some(id);
            self.nodes[id].parent = Some(left);

            self.refresh(id);
            self.refresh(left);
        }
    }

    fn rotate_left_right(&mut self, id: NodeId) {
        if let Some(left) = self.nodes[id].left {
            self.rotate_left(left);
        }
        self.rotate_right(id);
    }

    fn rotate_right_left(&mut self, id: NodeId) {
        if let Some(right) = self.nodes[id].right {
            self.rotate_right(right);
        }
        self.rotate_left(id);
    }

    /// Rebalances nodes starting from given position up to the root node.
    pub(super) fn rebalance(&mut self, start_from: Link) {
        let mut current = start_from;
        while let Some(id) = current {
            let parent = self.nodes[id].parent;
            self.rebalance_node(id);
            current = parent;
        }
    }

    /// Rebalances nodes starting from given position up to the root node.
    /// Stops after first rebalance operation.
    /// This is enough to restore balance after a single insert operation.
    pub(super) fn rebalance_once(&mut self, start_from: Link) {
        let mut current = start_from;
        while let Some(id) = current {
            let parent = self.nodes[id].parent;
            if self.rebalance_node(id).is_some() {
                break;
            }
            current = parent;
        }
    }

    /// Adjusts height and restores AVL condition (balance) at given node if necessary.
    /// Initial balance must not exceed +2 or -2, which always holds after a single update.
    /// Returns the rotation applied, if any.
    fn rebalance_node(&mut self, id: NodeId) -> Option<Rotation> {
        let balance = self.refresh(id);
        debug_assert!((-2..=2).contains(&balance));

        let rotation = if balance < -1 {
            // Left heavy, so the left child exists
            let left = self.nodes[id].left?;
            if self.balance(left) > 0 {
                self.rotate_left_right(id);
                Rotation::LeftRight
            } else {
                self.rotate_right(id);
                Rotation::Right
            }
        } else if balance > 1 {
            // Right heavy, so the right child exists
            let right = self.nodes[id].right?;
            if self.balance(right) < 0 {
                self.rotate_right_left(id);
                Rotation::RightLeft
            } else {
                self.rotate_left(id);
                Rotation::Left
            }
        } else {
            return None;
        };

        log::trace!("{rotation:?} rotation at {id:?}");
        #[cfg(test)]
        self.rotation_log.push(rotation);
        Some(rotation)
    }
}
