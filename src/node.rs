//! Node storage.
//!
//! Nodes live in a slot table and refer to each other by index, so the
//! parent back links never form ownership cycles. Vacant slots are chained
//! into a free list and reused by later insertions.

use std::mem;
use std::ops::{Index, IndexMut};

use crate::error::Result;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub(crate) struct NodeId(usize);

pub(crate) type Link = Option<NodeId>;

#[derive(Clone, Debug)]
pub(crate) struct Node<K, V> {
    pub(crate) key: K,
    pub(crate) value: V,
    pub(crate) left: Link,
    pub(crate) right: Link,
    pub(crate) parent: Link,
    pub(crate) height: isize,
}

#[derive(Clone, Debug)]
enum Slot<K, V> {
    Occupied(Node<K, V>),
    Vacant { next_free: Link },
}

#[derive(Clone, Debug)]
pub(crate) struct Arena<K, V> {
    slots: Vec<Slot<K, V>>,
    free_head: Link,
}

impl<K, V> Arena<K, V> {
    pub(crate) const fn new() -> Self {
        Self {
            slots: Vec::new(),
            free_head: None,
        }
    }

    pub(crate) fn with_capacity(capacity: usize) -> Self {
        Self {
            slots: Vec::with_capacity(capacity),
            free_head: None,
        }
    }

    /// Stores a fresh leaf node (height 0) and returns its id.
    /// Reuses a vacant slot if there is one, otherwise grows the table.
    pub(crate) fn create(&mut self, parent: Link, key: K, value: V) -> Result<NodeId> {
        let id = match self.free_head {
            Some(id) => {
                self.free_head = match self.slots[id.0] {
                    Slot::Vacant { next_free } => next_free,
                    Slot::Occupied(_) => unreachable!("free list points at live node {id:?}"),
                };
                id
            }
            None => {
                self.slots.try_reserve(1)?;
                self.slots.push(Slot::Vacant { next_free: None });
                NodeId(self.slots.len() - 1)
            }
        };
        self.slots[id.0] = Slot::Occupied(Node {
            key,
            value,
            left: None,
            right: None,
            parent,
            height: 0,
        });
        Ok(id)
    }

    /// Releases the slot of an unlinked node and hands the node back.
    pub(crate) fn destroy(&mut self, id: NodeId) -> Node<K, V> {
        let next_free = self.free_head;
        match mem::replace(&mut self.slots[id.0], Slot::Vacant { next_free }) {
            Slot::Occupied(node) => {
                self.free_head = Some(id);
                node
            }
            Slot::Vacant { .. } => unreachable!("node {id:?} destroyed twice"),
        }
    }

    pub(crate) fn clear(&mut self) {
        self.slots.clear();
        self.free_head = None;
    }

    #[cfg(any(test, feature = "consistency_check"))]
    pub(crate) fn num_live(&self) -> usize {
        self.slots
            .iter()
            .filter(|slot| matches!(slot, Slot::Occupied(_)))
            .count()
    }
}

impl<K, V> Index<NodeId> for Arena<K, V> {
    type Output = Node<K, V>;

    fn index(&self, id: NodeId) -> &Node<K, V> {
        match &self.slots[id.0] {
            Slot::Occupied(node) => node,
            Slot::Vacant { .. } => unreachable!("link to vacant node {id:?}"),
        }
    }
}

impl<K, V> IndexMut<NodeId> for Arena<K, V> {
    fn index_mut(&mut self, id: NodeId) -> &mut Node<K, V> {
        match &mut self.slots[id.0] {
            Slot::Occupied(node) => node,
            Slot::Vacant { .. } => unreachable!("link to vacant node {id:?}"),
        }
    }
}
