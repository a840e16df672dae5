//! Ordered iteration over a radix tree.

use super::node::Node;

/// Iterator over the entries of a [`RadixTree`](super::RadixTree) in
/// lexicographic key order.
///
/// Created by [`RadixTree::iter`](super::RadixTree::iter).
pub struct Iter<'a, V, const N: usize> {
    /// Pending nodes with the key length reached before their label.
    stack: Vec<(&'a Node<V>, usize)>,

    /// Bytes of the path currently being visited.
    key: Vec<u8>,

    remaining: usize,
}

impl<'a, V, const N: usize> Iter<'a, V, N> {
    pub(crate) fn new(root: &'a Node<V>, len: usize) -> Self {
        Self {
            stack: vec![(root, 0)],
            key: Vec::with_capacity(N),
            remaining: len,
        }
    }
}

impl<'a, V, const N: usize> Iterator for Iter<'a, V, N> {
    type Item = ([u8; N], &'a V);

    fn next(&mut self) -> Option<Self::Item> {
        while let Some((node, depth)) = self.stack.pop() {
            self.key.truncate(depth);
            self.key.extend_from_slice(&node.label);

            let depth = self.key.len();
            self.stack
                .extend(node.children.iter().rev().map(|child| (child, depth)));

            if let Some(value) = node.value.as_ref() {
                // Terminal depth always equals N for keys inserted through the tree.
                let Ok(key) = <[u8; N]>::try_from(self.key.as_slice()) else {
                    continue;
                };
                self.remaining = self.remaining.saturating_sub(1);
                return Some((key, value));
            }
        }
        None
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (self.remaining, Some(self.remaining))
    }
}
