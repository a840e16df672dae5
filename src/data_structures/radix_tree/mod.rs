//! Radix Tree Implementation
//!
//! A compressed prefix tree over fixed-length byte keys. Chains of single-child
//! nodes are collapsed into one node holding a multi-byte label, so the node
//! count is bounded by the number of branch points rather than by total key
//! length.
//!
//! The key length is part of the type (`RadixTree<V, N>` stores `[u8; N]` keys),
//! so the typed API cannot be called with a key of the wrong length. Callers that
//! only hold a byte slice use the `*_slice` methods, which reject mismatched
//! lengths with [`RadixTreeError::KeyLengthMismatch`].
//!
//! # Example
//!
//! ```
//! use resultset_cache_lib::data_structures::RadixTree;
//!
//! let mut tree = RadixTree::<&str, 2>::new();
//! tree.insert(&[0xAA, 0x01], "a");
//! tree.insert(&[0xAA, 0x02], "b");
//!
//! assert_eq!(tree.find(&[0xAA, 0x01]), Some(&"a"));
//! assert_eq!(tree.find(&[0xAA, 0x03]), None);
//!
//! assert_eq!(tree.remove(&[0xAA, 0x01]), Some("a"));
//! assert_eq!(tree.len(), 1);
//! ```

mod error;
mod iter;
mod node;

use std::fmt;

use serde::Serialize;

use crate::utils::HexKey;

pub use error::{RadixTreeError, RadixTreeResult};
pub use iter::Iter;
use node::Node;

/// Structural statistics gathered by a full traversal.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct TreeStats {
    /// Number of stored keys.
    pub keys: usize,
    /// Number of nodes, root included.
    pub nodes: usize,
    /// Longest root-to-leaf path, in nodes below the root.
    pub max_depth: usize,
    /// Total bytes held in node labels.
    pub label_bytes: usize,
}

/// A compressed prefix tree mapping `[u8; N]` keys to values of type `V`.
///
/// The tree exclusively owns its nodes. Values are handed out by reference and
/// the node structure is never exposed. No operation locks: mutation requires
/// `&mut self`, and callers needing shared access provide their own exclusion.
pub struct RadixTree<V, const N: usize> {
    root: Node<V>,
    len: usize,
    nodes: usize,
}

impl<V, const N: usize> RadixTree<V, N> {
    /// The fixed key length of this tree, in bytes.
    pub const KEY_LEN: usize = N;

    /// Creates an empty tree consisting of a bare root node.
    pub fn new() -> Self {
        Self {
            root: Node::root(),
            len: 0,
            nodes: 1,
        }
    }

    /// Number of keys stored in the tree.
    #[inline]
    pub fn len(&self) -> usize {
        self.len
    }

    /// Whether the tree holds no keys.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Number of nodes currently allocated, root included.
    #[inline]
    pub fn node_count(&self) -> usize {
        self.nodes
    }

    /// Inserts a key-value pair into the tree.
    ///
    /// Existing keys have their value replaced without creating any node.
    ///
    /// # Arguments
    ///
    /// * `key` - The key to insert.
    /// * `value` - The value to associate with the key.
    ///
    /// # Returns
    ///
    /// The previous value if the key was already present.
    pub fn insert(&mut self, key: &[u8; N], value: V) -> Option<V> {
        let (previous, created) = self.root.insert(key, value);
        self.nodes += created;
        if previous.is_none() {
            self.len += 1;
        }
        previous
    }

    /// Inserts a key-value pair only if the key is absent.
    ///
    /// # Returns
    ///
    /// * `Ok(())` - The pair was inserted.
    /// * `Err(value)` - The key already existed; the tree is unchanged and the
    ///   rejected value is handed back.
    pub fn try_insert(&mut self, key: &[u8; N], value: V) -> Result<(), V> {
        if self.contains_key(key) {
            return Err(value);
        }
        self.insert(key, value);
        Ok(())
    }

    /// Looks up the value stored under `key`.
    ///
    /// Returns `None` when the key was never inserted or has been removed,
    /// including when it is only a prefix of other stored paths.
    pub fn find(&self, key: &[u8; N]) -> Option<&V> {
        let mut node = &self.root;
        let mut rest: &[u8] = key;
        while let Some(&byte) = rest.first() {
            node = node.child(byte)?;
            rest = rest.strip_prefix(node.label.as_slice())?;
        }
        node.value.as_ref()
    }

    /// Looks up the value stored under `key` for in-place modification.
    pub fn find_mut(&mut self, key: &[u8; N]) -> Option<&mut V> {
        let mut node = &mut self.root;
        let mut rest: &[u8] = key;
        while let Some(&byte) = rest.first() {
            node = node.child_mut(byte)?;
            rest = rest.strip_prefix(node.label.as_slice())?;
        }
        node.value.as_mut()
    }

    /// Whether `key` is stored in the tree.
    #[inline]
    pub fn contains_key(&self, key: &[u8; N]) -> bool {
        self.find(key).is_some()
    }

    /// Removes `key` from the tree, merging or pruning the nodes left behind.
    ///
    /// Removing an absent key is a no-op.
    ///
    /// # Returns
    ///
    /// The removed value, or `None` if the key was not present.
    pub fn remove(&mut self, key: &[u8; N]) -> Option<V> {
        let (removed, released) = self.root.remove(key);
        if removed.is_some() {
            self.len -= 1;
            self.nodes -= released;
        }
        removed
    }

    /// Drops every node and resets the tree to its empty state.
    pub fn clear(&mut self) {
        *self = Self::new();
    }

    /// Consumes the tree, releasing every node it owns.
    ///
    /// Values are dropped along with their nodes; callers that must keep a value
    /// alive share it (for instance through `Arc`) before inserting.
    pub fn destroy(self) {
        drop(self);
    }

    /// Iterates over all entries in lexicographic key order.
    pub fn iter(&self) -> Iter<'_, V, N> {
        Iter::new(&self.root, self.len)
    }

    /// Inserts under a key given as a slice.
    ///
    /// # Errors
    ///
    /// [`RadixTreeError::KeyLengthMismatch`] if `key.len() != N`.
    pub fn insert_slice(&mut self, key: &[u8], value: V) -> RadixTreeResult<Option<V>> {
        let key = Self::fixed_key(key)?;
        Ok(self.insert(key, value))
    }

    /// Looks up a key given as a slice.
    ///
    /// # Errors
    ///
    /// [`RadixTreeError::KeyLengthMismatch`] if `key.len() != N`.
    pub fn find_slice(&self, key: &[u8]) -> RadixTreeResult<Option<&V>> {
        let key = Self::fixed_key(key)?;
        Ok(self.find(key))
    }

    /// Removes a key given as a slice.
    ///
    /// # Errors
    ///
    /// [`RadixTreeError::KeyLengthMismatch`] if `key.len() != N`.
    pub fn remove_slice(&mut self, key: &[u8]) -> RadixTreeResult<Option<V>> {
        let key = Self::fixed_key(key)?;
        Ok(self.remove(key))
    }

    fn fixed_key(key: &[u8]) -> RadixTreeResult<&[u8; N]> {
        key.try_into()
            .map_err(|_| RadixTreeError::KeyLengthMismatch {
                expected: N,
                actual: key.len(),
            })
    }

    /// Walks the whole tree and gathers structural statistics.
    ///
    /// This is an O(n) operation.
    pub fn stats(&self) -> TreeStats {
        let mut stats = TreeStats::default();
        let mut stack = vec![(&self.root, 0usize)];
        while let Some((node, depth)) = stack.pop() {
            stats.nodes += 1;
            stats.label_bytes += node.label.len();
            stats.max_depth = stats.max_depth.max(depth);
            if node.is_terminal() {
                stats.keys += 1;
            }
            stack.extend(node.children.iter().map(|child| (child, depth + 1)));
        }
        stats
    }

    /// Verifies every structural invariant by a full traversal.
    ///
    /// Checked: the root label is empty, other labels are not; siblings are
    /// strictly sorted by first byte; non-root, non-terminal nodes have at least
    /// two children; terminal nodes sit exactly `N` bytes deep and no path runs
    /// deeper; the cached key and node counters match the structure.
    ///
    /// # Errors
    ///
    /// [`RadixTreeError::InvariantViolation`] describing the first failure.
    pub fn check_invariants(&self) -> RadixTreeResult<()> {
        let violation = |msg: String| Err(RadixTreeError::InvariantViolation(msg));

        if !self.root.label.is_empty() {
            return violation("root label is not empty".to_string());
        }

        let mut keys = 0;
        let mut nodes = 0;
        let mut stack = vec![(&self.root, 0usize, true)];
        while let Some((node, depth, is_root)) = stack.pop() {
            nodes += 1;
            let depth = depth + node.label.len();

            if !is_root && node.label.is_empty() {
                return violation(format!("empty label below the root at depth {depth}"));
            }
            if depth > N {
                return violation(format!("path of {depth} bytes exceeds key length {N}"));
            }
            if node.is_terminal() {
                keys += 1;
                if depth != N {
                    return violation(format!("key of {depth} bytes stored, expected {N}"));
                }
            } else if !is_root && node.children.len() < 2 {
                return violation(format!(
                    "non-terminal node at depth {depth} has {} children",
                    node.children.len()
                ));
            }
            if node
                .children
                .windows(2)
                .any(|pair| pair[0].label.first() >= pair[1].label.first())
            {
                return violation(format!("children at depth {depth} are not strictly sorted"));
            }

            stack.extend(node.children.iter().map(|child| (child, depth, false)));
        }

        if keys != self.len {
            return violation(format!("counted {keys} keys, tracked {}", self.len));
        }
        if nodes != self.nodes {
            return violation(format!("counted {nodes} nodes, tracked {}", self.nodes));
        }
        Ok(())
    }
}

impl<V, const N: usize> Default for RadixTree<V, N> {
    fn default() -> Self {
        Self::new()
    }
}

impl<V: Clone, const N: usize> Clone for RadixTree<V, N> {
    fn clone(&self) -> Self {
        Self {
            root: self.root.clone(),
            len: self.len,
            nodes: self.nodes,
        }
    }
}

impl<'a, V, const N: usize> IntoIterator for &'a RadixTree<V, N> {
    type Item = ([u8; N], &'a V);
    type IntoIter = Iter<'a, V, N>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

impl<V, const N: usize> Extend<([u8; N], V)> for RadixTree<V, N> {
    fn extend<I: IntoIterator<Item = ([u8; N], V)>>(&mut self, iter: I) {
        for (key, value) in iter {
            self.insert(&key, value);
        }
    }
}

impl<V, const N: usize> FromIterator<([u8; N], V)> for RadixTree<V, N> {
    fn from_iter<I: IntoIterator<Item = ([u8; N], V)>>(iter: I) -> Self {
        let mut tree = Self::new();
        tree.extend(iter);
        tree
    }
}

/// Renders the node structure, one node per line, labels in hex.
impl<V: fmt::Debug, const N: usize> fmt::Debug for RadixTree<V, N> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fn render<V: fmt::Debug>(
            f: &mut fmt::Formatter<'_>,
            node: &Node<V>,
            indent: usize,
        ) -> fmt::Result {
            write!(f, "{:indent$}[{}]", "", HexKey(&node.label), indent = indent)?;
            if let Some(value) = &node.value {
                write!(f, " = {value:?}")?;
            }
            writeln!(f)?;
            node.children
                .iter()
                .try_for_each(|child| render(f, child, indent + 2))
        }

        writeln!(
            f,
            "RadixTree<{N}> {{ keys: {}, nodes: {} }}",
            self.len, self.nodes
        )?;
        render(f, &self.root, 0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    type Tree = RadixTree<char, 2>;

    fn scenario() -> Tree {
        let mut tree = Tree::new();
        tree.insert(&[0xAA, 0x01], 'A');
        tree.insert(&[0xAA, 0x02], 'B');
        tree.insert(&[0xAB, 0x00], 'C');
        tree
    }

    #[test]
    fn test_empty_tree() {
        let tree = Tree::new();
        assert!(tree.is_empty());
        assert_eq!(tree.len(), 0);
        assert_eq!(tree.node_count(), 1);
        assert_eq!(tree.find(&[0, 0]), None);
        assert_eq!(tree.iter().count(), 0);
        tree.check_invariants().unwrap();
    }

    #[test]
    fn test_branching_scenario() {
        let tree = scenario();

        assert_eq!(tree.find(&[0xAA, 0x01]), Some(&'A'));
        assert_eq!(tree.find(&[0xAA, 0x02]), Some(&'B'));
        assert_eq!(tree.find(&[0xAB, 0x00]), Some(&'C'));
        assert_eq!(tree.find(&[0xAA, 0x03]), None);
        assert_eq!(tree.find(&[0xAC, 0x00]), None);

        // root -> [aa] -> {[01], [02]}, root -> [ab00]
        assert_eq!(tree.node_count(), 5);
        assert_eq!(tree.root.children.len(), 2);
        assert_eq!(tree.root.children[0].label, vec![0xAA]);
        assert_eq!(tree.root.children[1].label, vec![0xAB, 0x00]);
        tree.check_invariants().unwrap();
    }

    #[test]
    fn test_remove_collapses_branch() {
        let mut tree = scenario();

        assert_eq!(tree.remove(&[0xAA, 0x01]), Some('A'));
        assert_eq!(tree.find(&[0xAA, 0x01]), None);
        assert_eq!(tree.find(&[0xAA, 0x02]), Some(&'B'));
        assert_eq!(tree.find(&[0xAB, 0x00]), Some(&'C'));

        // The [aa] branch point merged with its last child.
        assert_eq!(tree.root.children[0].label, vec![0xAA, 0x02]);
        assert!(tree.root.children[0].children.is_empty());
        assert_eq!(tree.node_count(), 3);
        tree.check_invariants().unwrap();
    }

    #[test]
    fn test_reinsert_replaces_without_growth() {
        let mut tree = scenario();
        let nodes = tree.node_count();

        assert_eq!(tree.insert(&[0xAA, 0x02], 'Z'), Some('B'));
        assert_eq!(tree.find(&[0xAA, 0x02]), Some(&'Z'));
        assert_eq!(tree.node_count(), nodes);
        assert_eq!(tree.len(), 3);
    }

    #[test]
    fn test_try_insert() {
        let mut tree = scenario();
        assert_eq!(tree.try_insert(&[0xAA, 0x01], 'X'), Err('X'));
        assert_eq!(tree.find(&[0xAA, 0x01]), Some(&'A'));
        assert_eq!(tree.try_insert(&[0x00, 0x01], 'X'), Ok(()));
        assert_eq!(tree.find(&[0x00, 0x01]), Some(&'X'));
    }

    #[test]
    fn test_remove_absent_is_noop() {
        let mut tree = scenario();
        let before = tree.stats();

        assert_eq!(tree.remove(&[0xAA, 0x03]), None);
        assert_eq!(tree.remove(&[0xAB, 0x01]), None);
        assert_eq!(tree.remove(&[0x01, 0x01]), None);

        assert_eq!(tree.stats(), before);
        assert_eq!(tree.len(), 3);
        tree.check_invariants().unwrap();
    }

    #[test]
    fn test_remove_all_leaves_bare_root() {
        let mut tree = scenario();
        for key in [[0xAA, 0x01], [0xAB, 0x00], [0xAA, 0x02]] {
            assert!(tree.remove(&key).is_some());
            tree.check_invariants().unwrap();
        }
        assert!(tree.is_empty());
        assert_eq!(tree.node_count(), 1);
        assert!(tree.root.children.is_empty());
    }

    #[test]
    fn test_find_mut() {
        let mut tree = scenario();
        if let Some(value) = tree.find_mut(&[0xAB, 0x00]) {
            *value = 'c';
        }
        assert_eq!(tree.find(&[0xAB, 0x00]), Some(&'c'));
        assert!(tree.find_mut(&[0xAB, 0x01]).is_none());
    }

    #[test]
    fn test_slice_api_rejects_wrong_length() {
        let mut tree = scenario();
        assert_eq!(
            tree.find_slice(&[0xAA]),
            Err(RadixTreeError::KeyLengthMismatch {
                expected: 2,
                actual: 1
            })
        );
        assert!(tree.insert_slice(&[1, 2, 3], 'X').is_err());
        assert!(tree.remove_slice(&[]).is_err());
        assert_eq!(tree.len(), 3);

        assert_eq!(tree.find_slice(&[0xAA, 0x01]), Ok(Some(&'A')));
        assert_eq!(tree.remove_slice(&[0xAA, 0x01]), Ok(Some('A')));
        assert_eq!(tree.insert_slice(&[0xAA, 0x01], 'Y'), Ok(None));
    }

    #[test]
    fn test_iter_is_lexicographic() {
        let tree = scenario();
        let entries: Vec<([u8; 2], char)> = tree.iter().map(|(k, v)| (k, *v)).collect();
        assert_eq!(
            entries,
            vec![
                ([0xAA, 0x01], 'A'),
                ([0xAA, 0x02], 'B'),
                ([0xAB, 0x00], 'C'),
            ]
        );
        assert_eq!(tree.iter().size_hint(), (3, Some(3)));
    }

    #[test]
    fn test_stats() {
        let tree = scenario();
        assert_eq!(
            tree.stats(),
            TreeStats {
                keys: 3,
                nodes: 5,
                max_depth: 2,
                label_bytes: 5,
            }
        );
    }

    #[test]
    fn test_clear() {
        let mut tree = scenario();
        tree.clear();
        assert!(tree.is_empty());
        assert_eq!(tree.node_count(), 1);
        assert_eq!(tree.find(&[0xAA, 0x01]), None);
        tree.insert(&[0xAA, 0x01], 'A');
        assert_eq!(tree.find(&[0xAA, 0x01]), Some(&'A'));
    }

    #[test]
    fn test_zero_length_keys() {
        let mut tree = RadixTree::<u8, 0>::new();
        assert_eq!(tree.insert(&[], 1), None);
        assert_eq!(tree.insert(&[], 2), Some(1));
        assert_eq!(tree.find(&[]), Some(&2));
        assert_eq!(tree.node_count(), 1);
        tree.check_invariants().unwrap();
        assert_eq!(tree.remove(&[]), Some(2));
        assert!(tree.is_empty());
    }

    #[test]
    fn test_collect_and_debug() {
        let tree: Tree = [([0x01, 0x02], 'x'), ([0x01, 0x03], 'y')]
            .into_iter()
            .collect();
        let rendered = format!("{tree:?}");
        assert!(rendered.starts_with("RadixTree<2> { keys: 2, nodes: 4 }"));
        assert!(rendered.contains("  [01]\n"));
        assert!(rendered.contains("    [03] = 'y'"));
    }
}
