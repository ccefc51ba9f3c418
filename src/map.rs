//! An ordered map implemented with an AVL tree.

use std::cmp::Ordering;
use std::fmt;

use crate::error::Result;
use crate::node::{Arena, Link, NodeId};

mod iter;
mod rebalance;

pub use iter::{Iter, Order, Traverse};
#[cfg(test)]
pub(crate) use rebalance::Rotation;

/// An ordered map implemented with an AVL tree.
///
/// ```
/// use avl_map::AvlTreeMap;
/// let mut map = AvlTreeMap::new();
/// map.insert(0, "zero").unwrap();
/// map.insert(1, "one").unwrap();
/// map.insert(2, "two").unwrap();
/// assert_eq!(map.get(&1), Some(&"one"));
/// assert!(map.delete(&1));
/// assert!(map.get(&1).is_none());
/// ```
#[derive(Clone)]
pub struct AvlTreeMap<K, V> {
    nodes: Arena<K, V>,
    root: Link,
    num_nodes: usize,
    height: isize,
    #[cfg(test)]
    pub(crate) rotation_log: Vec<Rotation>,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) enum Dir {
    Left,
    Right,
}

/// Outcome of a search descent: the node holding the key, or the slot
/// where it would be attached.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) enum Search {
    Found(NodeId),
    Vacant { parent: Link, dir: Dir },
}

impl<K, V> AvlTreeMap<K, V> {
    /// Creates an empty map.
    /// No memory is allocated until the first item is inserted.
    pub const fn new() -> Self {
        Self {
            nodes: Arena::new(),
            root: None,
            num_nodes: 0,
            height: -1,
            #[cfg(test)]
            rotation_log: Vec::new(),
        }
    }

    /// Creates an empty map with room for `capacity` nodes.
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            nodes: Arena::with_capacity(capacity),
            ..Self::new()
        }
    }

    /// Returns true if the map contains no elements.
    pub fn is_empty(&self) -> bool {
        self.root.is_none()
    }

    /// Returns the number of elements in the map.
    pub fn len(&self) -> usize {
        self.num_nodes
    }

    /// Returns the height of the tree: 0 for a single node, -1 if empty.
    pub fn height(&self) -> isize {
        self.height
    }

    /// Clears the map, deallocating all nodes.
    pub fn clear(&mut self) {
        self.nodes.clear();
        self.root = None;
        self.num_nodes = 0;
        self.height = -1;
    }

    fn update_height(&mut self) {
        self.height = self.root.map_or(-1, |root| self.nodes[root].height);
    }

    // Links `new` into the slot of `parent` that currently holds `old`,
    // or makes it the root.
    fn replace_child(&mut self, parent: Link, old: NodeId, new: Link) {
        match parent {
            None => self.root = new,
            Some(parent) => {
                let parent = &mut self.nodes[parent];
                if parent.left == Some(old) {
                    parent.left = new;
                } else {
                    debug_assert_eq!(parent.right, Some(old));
                    parent.right = new;
                }
            }
        }
    }
}

impl<K: Ord, V> AvlTreeMap<K, V> {
    /// Returns a reference to the value corresponding to the key.
    pub fn get(&self, key: &K) -> Option<&V> {
        match self.find(key) {
            Search::Found(id) => Some(&self.nodes[id].value),
            Search::Vacant { .. } => None,
        }
    }

    /// Returns references to the key-value pair corresponding to the key.
    pub fn get_key_value(&self, key: &K) -> Option<(&K, &V)> {
        match self.find(key) {
            Search::Found(id) => {
                let node = &self.nodes[id];
                Some((&node.key, &node.value))
            }
            Search::Vacant { .. } => None,
        }
    }

    /// Returns a mutable reference to the value corresponding to the key.
    pub fn get_mut(&mut self, key: &K) -> Option<&mut V> {
        match self.find(key) {
            Search::Found(id) => Some(&mut self.nodes[id].value),
            Search::Vacant { .. } => None,
        }
    }

    /// Returns true if the map contains a value for the key.
    pub fn contains_key(&self, key: &K) -> bool {
        matches!(self.find(key), Search::Found(_))
    }

    /// Inserts a key-value pair into the map.
    ///
    /// Returns `Ok(false)` and leaves the map untouched if the key is already
    /// present. The existing value is kept.
    ///
    /// # Errors
    ///
    /// Returns [`Error::AllocationFailure`](crate::Error::AllocationFailure)
    /// if no node could be allocated. The map is unchanged in that case.
    pub fn insert(&mut self, key: K, value: V) -> Result<bool> {
        let (parent, dir) = match self.find(&key) {
            Search::Found(_) => return Ok(false),
            Search::Vacant { parent, dir } => (parent, dir),
        };

        let id = self.nodes.create(parent, key, value).map_err(|err| {
            log::debug!("node allocation failed: {err}");
            err
        })?;
        match (parent, dir) {
            (None, _) => self.root = Some(id),
            (Some(parent), Dir::Left) => self.nodes[parent].left = Some(id),
            (Some(parent), Dir::Right) => self.nodes[parent].right = Some(id),
        }
        self.num_nodes += 1;
        self.rebalance_once(parent);
        self.update_height();
        Ok(true)
    }

    /// Removes a key from the map.
    /// Returns the value at the key if the key was previously in the map.
    pub fn remove(&mut self, key: &K) -> Option<V> {
        let id = match self.find(key) {
            Search::Found(id) => id,
            Search::Vacant { .. } => return None,
        };
        debug_assert!(self.num_nodes >= 1);

        let rebalance_from = self.unlink_node(id);
        let node = self.nodes.destroy(id);
        self.num_nodes -= 1;
        self.rebalance(rebalance_from);
        self.update_height();
        Some(node.value)
    }

    /// Removes a key from the map.
    /// Returns whether the key was previously in the map.
    pub fn delete(&mut self, key: &K) -> bool {
        self.remove(key).is_some()
    }

    /// Panics if any structural invariant of the tree is violated.
    #[cfg(any(test, feature = "consistency_check"))]
    pub fn check_consistency(&self) {
        use std::cmp;

        // Check root link
        if let Some(root) = self.root {
            assert!(self.nodes[root].parent.is_none());
        }

        // Check tree nodes
        let mut num_nodes = 0;
        let mut walk = iter::Walk::new(self.root);
        while let Some((id, order)) = walk.step(&self.nodes) {
            if order != Order::Preorder {
                continue;
            }
            let node = &self.nodes[id];
            let mut left_height = -1;
            let mut right_height = -1;

            // Check link for left child node
            if let Some(left) = node.left {
                assert_eq!(self.nodes[left].parent, Some(id));
                assert!(self.nodes[left].key < node.key);
                left_height = self.nodes[left].height;
            }

            // Check link for right child node
            if let Some(right) = node.right {
                assert_eq!(self.nodes[right].parent, Some(id));
                assert!(self.nodes[right].key > node.key);
                right_height = self.nodes[right].height;
            }

            // Check height
            assert_eq!(node.height, cmp::max(left_height, right_height) + 1);

            // Check AVL condition (nearly balance)
            assert!((right_height - left_height).abs() <= 1);

            num_nodes += 1;
        }

        // Whole-tree BST order
        let mut keys = self.traverse(Order::Inorder);
        if let Some(mut prev) = keys.next() {
            for key in keys {
                assert!(prev < key);
                prev = key;
            }
        }

        // Check number of nodes and tree height
        assert_eq!(num_nodes, self.num_nodes);
        assert_eq!(self.nodes.num_live(), self.num_nodes);
        assert_eq!(
            self.height,
            self.root.map_or(-1, |root| self.nodes[root].height)
        );
    }

    pub(crate) fn find(&self, key: &K) -> Search {
        let mut parent = None;
        let mut dir = Dir::Left;
        let mut current = self.root;
        while let Some(id) = current {
            let node = &self.nodes[id];
            parent = current;
            current = match key.cmp(&node.key) {
                Ordering::Equal => return Search::Found(id),
                Ordering::Less => {
                    dir = Dir::Left;
                    node.left
                }
                Ordering::Greater => {
                    dir = Dir::Right;
                    node.right
                }
            };
        }
        Search::Vacant { parent, dir }
    }

    // Splices node `id` out of the tree. The node stays allocated but is no
    // longer reachable. Returns the lowest node whose subtree shrank.
    fn unlink_node(&mut self, id: NodeId) -> Link {
        let node = &self.nodes[id];
        let (left, right, parent) = (node.left, node.right, node.parent);

        match (left, right) {
            (None, _) => {
                log::trace!("unlink {id:?}: no left child");
                if let Some(right) = right {
                    self.nodes[right].parent = parent;
                }
                self.replace_child(parent, id, right);
                parent
            }
            (Some(left), None) => {
                log::trace!("unlink {id:?}: left child only");
                self.nodes[left].parent = parent;
                self.replace_child(parent, id, Some(left));
                parent
            }
            (Some(left), Some(right)) => {
                // Find largest node in left sub tree
                let mut max_child_parent = id;
                let mut max_child = left;
                while let Some(next) = self.nodes[max_child].right {
                    max_child_parent = max_child;
                    max_child = next;
                }
                log::trace!("unlink {id:?}: replaced by predecessor {max_child:?}");

                let rebalance_from = if max_child_parent == id {
                    // Predecessor is the left child and keeps its own left sub tree
                    max_child
                } else {
                    // Predecessor is stem or leaf, unlink from tree
                    let max_child_left = self.nodes[max_child].left;
                    self.nodes[max_child_parent].right = max_child_left;
                    if let Some(max_child_left) = max_child_left {
                        self.nodes[max_child_left].parent = Some(max_child_parent);
                    }

                    self.nodes[max_child].left = Some(left);
                    self.nodes[left].parent = Some(max_child);
                    max_child_parent
                };

                // Replace node to-unlink by predecessor
                self.nodes[max_child].right = Some(right);
                self.nodes[right].parent = Some(max_child);
                self.nodes[max_child].parent = parent;
                self.replace_child(parent, id, Some(max_child));

                Some(rebalance_from)
            }
        }
    }
}

impl<K, V> Default for AvlTreeMap<K, V> {
    fn default() -> Self {
        Self::new()
    }
}

impl<K: fmt::Debug, V: fmt::Debug> fmt::Debug for AvlTreeMap<K, V> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_map().entries(self.iter()).finish()
    }
}
