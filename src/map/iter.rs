use std::iter::FusedIterator;

use super::AvlTreeMap;
use crate::node::{Arena, Link, NodeId};

/// Depth-first visiting order for [`AvlTreeMap::traverse`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Order {
    Preorder,
    Inorder,
    Postorder,
}

#[allow(clippy::enum_variant_names)]
#[derive(Clone, Copy, Debug)]
enum Direction {
    FromParent,
    FromLeft,
    FromRight,
}

/// Stackless depth-first walk over the parent links.
///
/// Every node is reported three times: once per [`Order`], in the sequence
/// pre, in, post.
#[derive(Clone, Debug)]
pub(super) struct Walk {
    current: Link,
    dir: Direction,
}

impl Walk {
    pub(super) fn new(root: Link) -> Self {
        Self {
            current: root,
            dir: Direction::FromParent,
        }
    }

    pub(super) fn step<K, V>(&mut self, nodes: &Arena<K, V>) -> Option<(NodeId, Order)> {
        let id = self.current?;
        let node = &nodes[id];
        match self.dir {
            Direction::FromParent => {
                match node.left {
                    Some(left) => self.current = Some(left),
                    None => self.dir = Direction::FromLeft,
                }
                Some((id, Order::Preorder))
            }
            Direction::FromLeft => {
                match node.right {
                    Some(right) => {
                        self.current = Some(right);
                        self.dir = Direction::FromParent;
                    }
                    None => self.dir = Direction::FromRight,
                }
                Some((id, Order::Inorder))
            }
            Direction::FromRight => {
                match node.parent {
                    Some(parent) => {
                        self.dir = if nodes[parent].left == Some(id) {
                            Direction::FromLeft
                        } else {
                            Direction::FromRight
                        };
                        self.current = Some(parent);
                    }
                    None => self.current = None,
                }
                Some((id, Order::Postorder))
            }
        }
    }

    fn next_in<K, V>(&mut self, nodes: &Arena<K, V>, order: Order) -> Option<NodeId> {
        loop {
            let (id, visit) = self.step(nodes)?;
            if visit == order {
                return Some(id);
            }
        }
    }
}

/// A lazy iterator over the keys of a map in a given [`Order`].
///
/// This `struct` is created by the [`traverse`] method on [`AvlTreeMap`].
///
/// [`traverse`]: AvlTreeMap::traverse
pub struct Traverse<'a, K, V> {
    nodes: &'a Arena<K, V>,
    walk: Walk,
    order: Order,
    remaining: usize,
}

/// An iterator over the entries of a map, sorted by key.
pub struct Iter<'a, K, V> {
    nodes: &'a Arena<K, V>,
    walk: Walk,
    remaining: usize,
}

impl<K, V> AvlTreeMap<K, V> {
    /// Gets a lazy iterator over the keys of the map in the given order.
    /// Each call starts a fresh walk from the root.
    ///
    /// ```
    /// use avl_map::{AvlTreeMap, Order};
    /// let mut map = AvlTreeMap::new();
    /// for key in [2, 1, 3] {
    ///     map.insert(key, ()).unwrap();
    /// }
    /// assert_eq!(map.traverse(Order::Preorder).collect::<Vec<_>>(), [&2, &1, &3]);
    /// assert_eq!(map.traverse(Order::Postorder).collect::<Vec<_>>(), [&1, &3, &2]);
    /// ```
    pub fn traverse(&self, order: Order) -> Traverse<'_, K, V> {
        Traverse {
            nodes: &self.nodes,
            walk: Walk::new(self.root),
            order,
            remaining: self.num_nodes,
        }
    }

    /// Gets an iterator over the entries of the map, sorted by key.
    pub fn iter(&self) -> Iter<'_, K, V> {
        Iter {
            nodes: &self.nodes,
            walk: Walk::new(self.root),
            remaining: self.num_nodes,
        }
    }
}

impl<'a, K, V> Iterator for Traverse<'a, K, V> {
    type Item = &'a K;

    fn next(&mut self) -> Option<&'a K> {
        let nodes = self.nodes;
        let id = self.walk.next_in(nodes, self.order)?;
        self.remaining -= 1;
        Some(&nodes[id].key)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (self.remaining, Some(self.remaining))
    }
}

impl<K, V> ExactSizeIterator for Traverse<'_, K, V> {}

impl<K, V> FusedIterator for Traverse<'_, K, V> {}

impl<K, V> Clone for Traverse<'_, K, V> {
    fn clone(&self) -> Self {
        Self {
            nodes: self.nodes,
            walk: self.walk.clone(),
            order: self.order,
            remaining: self.remaining,
        }
    }
}

impl<'a, K, V> Iterator for Iter<'a, K, V> {
    type Item = (&'a K, &'a V);

    fn next(&mut self) -> Option<(&'a K, &'a V)> {
        let nodes = self.nodes;
        let id = self.walk.next_in(nodes, Order::Inorder)?;
        self.remaining -= 1;
        let node = &nodes[id];
        Some((&node.key, &node.value))
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (self.remaining, Some(self.remaining))
    }
}

impl<K, V> ExactSizeIterator for Iter<'_, K, V> {}

impl<K, V> FusedIterator for Iter<'_, K, V> {}

impl<K, V> Clone for Iter<'_, K, V> {
    fn clone(&self) -> Self {
        Self {
            nodes: self.nodes,
            walk: self.walk.clone(),
            remaining: self.remaining,
        }
    }
}

impl<'a, K, V> IntoIterator for &'a AvlTreeMap<K, V> {
    type Item = (&'a K, &'a V);
    type IntoIter = Iter<'a, K, V>;

    fn into_iter(self) -> Iter<'a, K, V> {
        self.iter()
    }
}
