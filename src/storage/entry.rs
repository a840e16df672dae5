//! Cache entries and their fixed-length hash keys.

use std::hash::Hasher;

/// Length in bytes of every hash key: a 64-bit digest.
pub const HASH_KEY_LENGTH: usize = 8;

/// Fixed-length digest identifying a cached result set.
pub type HashKey = [u8; HASH_KEY_LENGTH];

/// Computes the hash key of arbitrary request bytes with FNV-1a.
///
/// # Arguments
///
/// * `data` - The bytes to digest, typically a normalized query text.
///
/// # Returns
///
/// The big-endian encoding of the 64-bit digest.
pub fn hash_key_of(data: impl AsRef<[u8]>) -> HashKey {
    let mut hasher = fnv::FnvHasher::default();
    hasher.write(data.as_ref());
    hasher.finish().to_be_bytes()
}

/// An entry that can be stored in a [`CacheStorage`](super::CacheStorage).
///
/// The storage only ever reads the hash key; the rest of the entry is opaque.
pub trait CacheEntry {
    /// The digest under which the entry is stored.
    fn hash_key(&self) -> &HashKey;
}

/// A cached payload together with the hash key it was computed under.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CacheData<T> {
    hash_key: HashKey,
    payload: T,
}

impl<T> CacheData<T> {
    /// Creates an entry from an already computed hash key.
    pub fn new(hash_key: HashKey, payload: T) -> Self {
        Self { hash_key, payload }
    }

    /// Creates an entry from a 64-bit digest, stored big-endian so that key
    /// order matches numeric order.
    pub fn from_digest(digest: u64, payload: T) -> Self {
        Self::new(digest.to_be_bytes(), payload)
    }

    /// Creates an entry keyed by the FNV-1a digest of `request`.
    pub fn for_request(request: impl AsRef<[u8]>, payload: T) -> Self {
        Self::new(hash_key_of(request), payload)
    }

    /// The cached payload.
    pub fn payload(&self) -> &T {
        &self.payload
    }

    /// Consumes the entry, returning the payload.
    pub fn into_payload(self) -> T {
        self.payload
    }
}

impl<T> CacheEntry for CacheData<T> {
    fn hash_key(&self) -> &HashKey {
        &self.hash_key
    }
}
