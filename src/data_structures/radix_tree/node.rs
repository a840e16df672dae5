//! Node implementation for the radix tree.
//!
//! A node owns a compressed label (the bytes of the edge leading into it), its
//! children sorted by the first byte of their labels, and an optional value
//! marking the end of a stored key.

use std::mem;

/// A node in the radix tree.
///
/// Children are kept in a small vector sorted by the first label byte and looked
/// up with binary search, so memory grows with the branching factor rather than
/// with the byte alphabet.
#[derive(Clone)]
pub(crate) struct Node<V> {
    /// Compressed path segment relative to the parent. Empty only at the root.
    pub(crate) label: Vec<u8>,

    /// Child nodes, sorted by `label[0]`, at most one per first byte.
    pub(crate) children: Vec<Node<V>>,

    /// Value stored when a key terminates exactly at this node.
    pub(crate) value: Option<V>,
}

impl<V> Node<V> {
    /// Creates the empty root node.
    pub(crate) fn root() -> Self {
        Self {
            label: Vec::new(),
            children: Vec::new(),
            value: None,
        }
    }

    /// Creates a terminal leaf holding `value`.
    pub(crate) fn leaf(label: &[u8], value: V) -> Self {
        Self {
            label: label.to_vec(),
            children: Vec::new(),
            value: Some(value),
        }
    }

    /// Whether some stored key ends at this node.
    #[inline]
    pub(crate) fn is_terminal(&self) -> bool {
        self.value.is_some()
    }

    #[inline]
    fn first_byte(&self) -> u8 {
        self.label[0]
    }

    /// Binary searches the children for the edge starting with `byte`.
    #[inline]
    pub(crate) fn child_index(&self, byte: u8) -> Result<usize, usize> {
        self.children.binary_search_by_key(&byte, Node::first_byte)
    }

    /// Returns the child whose label starts with `byte`.
    #[inline]
    pub(crate) fn child(&self, byte: u8) -> Option<&Node<V>> {
        self.child_index(byte).ok().map(|i| &self.children[i])
    }

    /// Returns the child whose label starts with `byte`, mutably.
    #[inline]
    pub(crate) fn child_mut(&mut self, byte: u8) -> Option<&mut Node<V>> {
        match self.child_index(byte) {
            Ok(i) => Some(&mut self.children[i]),
            Err(_) => None,
        }
    }

    /// Length of the common prefix between this node's label and `key`.
    #[inline]
    pub(crate) fn common_prefix_len(&self, key: &[u8]) -> usize {
        self.label
            .iter()
            .zip(key)
            .position(|(a, b)| a != b)
            .unwrap_or_else(|| self.label.len().min(key.len()))
    }

    /// Splits the label at `at`, pushing the tail (with the current children and
    /// value) down into a single new child. `at` must be within the label.
    fn split(&mut self, at: usize) {
        debug_assert!(at > 0 && at < self.label.len());
        let tail = Node {
            label: self.label.split_off(at),
            children: mem::take(&mut self.children),
            value: self.value.take(),
        };
        self.label.shrink_to_fit();
        self.children = vec![tail];
    }

    /// Folds the only child into this node: labels are concatenated and the
    /// child's children and value are adopted.
    fn absorb_only_child(&mut self) {
        debug_assert!(self.value.is_none() && self.children.len() == 1);
        if let Some(child) = self.children.pop() {
            self.label.extend_from_slice(&child.label);
            self.children = child.children;
            self.value = child.value;
        }
    }

    /// Inserts `value` under `rest`, the part of the key left after this node's
    /// label. Returns the replaced value and the number of nodes created.
    pub(crate) fn insert(&mut self, rest: &[u8], value: V) -> (Option<V>, usize) {
        let Some(&byte) = rest.first() else {
            return (self.value.replace(value), 0);
        };

        let index = match self.child_index(byte) {
            Ok(index) => index,
            Err(slot) => {
                self.children.insert(slot, Node::leaf(rest, value));
                return (None, 1);
            }
        };

        let child = &mut self.children[index];
        let common = child.common_prefix_len(rest);
        if common == child.label.len() {
            return child.insert(&rest[common..], value);
        }

        // Divergence inside the child's label. Build the new leaf before the
        // split so the tree is only relinked once every node exists.
        if common == rest.len() {
            child.split(common);
            child.value = Some(value);
            (None, 1)
        } else {
            let leaf = Node::leaf(&rest[common..], value);
            child.split(common);
            let slot = match child.child_index(leaf.first_byte()) {
                Ok(slot) | Err(slot) => slot,
            };
            child.children.insert(slot, leaf);
            (None, 2)
        }
    }

    /// Removes the value stored under `rest` (relative to this node's label) and
    /// restores compression on the way back up. Returns the removed value and
    /// the number of nodes released.
    pub(crate) fn remove(&mut self, rest: &[u8]) -> (Option<V>, usize) {
        let Some(&byte) = rest.first() else {
            return (self.value.take(), 0);
        };

        let Ok(index) = self.child_index(byte) else {
            return (None, 0);
        };

        let child = &mut self.children[index];
        if !rest.starts_with(&child.label) {
            return (None, 0);
        }

        let (removed, mut released) = child.remove(&rest[child.label.len()..]);
        if removed.is_some() && !child.is_terminal() {
            match child.children.len() {
                0 => {
                    self.children.remove(index);
                    released += 1;
                }
                1 => {
                    child.absorb_only_child();
                    released += 1;
                }
                _ => {}
            }
        }

        (removed, released)
    }
}
