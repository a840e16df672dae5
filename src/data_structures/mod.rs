//! Data structures for the result-set cache.
//!
//! This module contains the storage-engine data structures. They are
//! single-threaded: mutation takes `&mut self` and no operation
//! acquires a lock.

pub mod radix_tree;

// Re-export common data structures
pub use radix_tree::{RadixTree, RadixTreeError, RadixTreeResult, TreeStats};
