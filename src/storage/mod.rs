//! Cache storage for result sets.
//!
//! [`CacheStorage`] is a thin lifecycle wrapper around one [`RadixTree`] keyed by
//! fixed-length hash keys. Entries are shared with the caller through `Arc`: the
//! tree holds one reference, so removing an entry or clearing the storage never
//! disposes of an entry the caller still holds.
//!
//! # Example
//!
//! ```
//! use std::sync::Arc;
//! use resultset_cache_lib::storage::{CacheData, CacheEntry, CacheStorage};
//!
//! let mut storage = CacheStorage::new();
//! let entry = Arc::new(CacheData::for_request("MATCH (n) RETURN n", vec![1, 2, 3]));
//!
//! storage.insert(Arc::clone(&entry));
//! let hit = storage.get(entry.hash_key()).expect("cached");
//! assert_eq!(hit.payload(), &vec![1, 2, 3]);
//!
//! storage.remove(&entry);
//! assert!(storage.get(entry.hash_key()).is_none());
//! storage.free();
//! ```

mod entry;

use std::fmt;
use std::sync::Arc;

use parking_lot::Mutex;
use tracing::{debug, trace};

use crate::data_structures::{RadixTree, TreeStats};
use crate::error::CacheResult;
use crate::utils::HexKey;

pub use entry::{hash_key_of, CacheData, CacheEntry, HashKey, HASH_KEY_LENGTH};

/// A storage handle shared between threads behind an external lock.
///
/// The storage itself never locks; this is the exclusion callers opt into when
/// several threads use one instance.
pub type SharedCacheStorage<E> = Arc<Mutex<CacheStorage<E>>>;

/// Keyed storage of cache entries backed by a radix tree.
pub struct CacheStorage<E> {
    tree: RadixTree<Arc<E>, HASH_KEY_LENGTH>,
}

impl<E: CacheEntry> CacheStorage<E> {
    /// Creates an empty storage.
    pub fn new() -> Self {
        Self {
            tree: RadixTree::new(),
        }
    }

    /// Drops every entry reference held by the storage and starts over with a
    /// fresh tree. The handle stays usable.
    pub fn clear(&mut self) {
        let dropped = self.tree.len();
        let previous = std::mem::take(&mut self.tree);
        previous.destroy();
        debug!(entries = dropped, "Cache storage cleared");
    }

    /// Stores `entry` under its hash key, replacing any entry with the same key.
    ///
    /// # Returns
    ///
    /// The replaced entry, if the key was already present.
    pub fn insert(&mut self, entry: Arc<E>) -> Option<Arc<E>> {
        let key = *entry.hash_key();
        let replaced = self.tree.insert(&key, entry);
        trace!(key = %HexKey(&key), replaced = replaced.is_some(), "Cache entry inserted");
        replaced
    }

    /// Unlinks the entry stored under `entry`'s hash key.
    ///
    /// Removing an entry that is not stored (for instance a second time) is a
    /// no-op.
    ///
    /// # Returns
    ///
    /// The storage's reference to the removed entry.
    pub fn remove(&mut self, entry: &E) -> Option<Arc<E>> {
        let key = entry.hash_key();
        let removed = self.tree.remove(key);
        trace!(key = %HexKey(key), removed = removed.is_some(), "Cache entry removed");
        removed
    }

    /// Looks up the entry stored under `hash_key`.
    pub fn get(&self, hash_key: &HashKey) -> Option<&Arc<E>> {
        let found = self.tree.find(hash_key);
        trace!(key = %HexKey(hash_key), hit = found.is_some(), "Cache lookup");
        found
    }

    /// Looks up an entry by a digest held as an unchecked byte slice.
    ///
    /// # Errors
    ///
    /// Fails with a key length mismatch if `hash_key` is not exactly
    /// [`HASH_KEY_LENGTH`] bytes long.
    pub fn get_by_slice(&self, hash_key: &[u8]) -> CacheResult<Option<&Arc<E>>> {
        Ok(self.tree.find_slice(hash_key)?)
    }

    /// Whether an entry is stored under `hash_key`.
    pub fn contains(&self, hash_key: &HashKey) -> bool {
        self.tree.contains_key(hash_key)
    }

    /// Number of stored entries.
    pub fn len(&self) -> usize {
        self.tree.len()
    }

    /// Whether the storage holds no entries.
    pub fn is_empty(&self) -> bool {
        self.tree.is_empty()
    }

    /// Structural statistics of the underlying tree.
    pub fn stats(&self) -> TreeStats {
        self.tree.stats()
    }

    /// Iterates over stored entries in hash key order.
    pub fn iter(&self) -> impl Iterator<Item = (HashKey, &Arc<E>)> + '_ {
        self.tree.iter()
    }

    /// Read access to the underlying tree, for diagnostics.
    pub fn tree(&self) -> &RadixTree<Arc<E>, HASH_KEY_LENGTH> {
        &self.tree
    }

    /// Releases the tree and the storage itself.
    ///
    /// Consumes the handle, so no operation can follow it.
    pub fn free(self) {
        let entries = self.tree.len();
        self.tree.destroy();
        debug!(entries, "Cache storage freed");
    }

    /// Moves the storage behind a lock so it can be shared across threads.
    pub fn into_shared(self) -> SharedCacheStorage<E> {
        Arc::new(Mutex::new(self))
    }
}

impl<E: CacheEntry> Default for CacheStorage<E> {
    fn default() -> Self {
        Self::new()
    }
}

impl<E> fmt::Debug for CacheStorage<E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CacheStorage")
            .field("entries", &self.tree.len())
            .field("nodes", &self.tree.node_count())
            .finish()
    }
}
