//! Result-Set Cache Storage Library
//!
//! A keyed storage engine mapping fixed-length hash keys (digests of queries)
//! to cached result sets, backed by a compressed radix tree.
//!
//! # Architecture
//!
//! - [`data_structures::RadixTree`]: the compressed prefix tree over `[u8; N]`
//!   keys, with edge-splitting on insert and node-merging on remove
//! - [`storage::CacheStorage`]: the lifecycle wrapper the cache subsystem talks
//!   to (new, clear, insert, remove, get, free)
//! - [`config`], [`error`], [`workload`]: the ambient layers used by the driver
//!   binary
//!
//! Nothing here locks or blocks. Callers sharing one storage across threads wrap
//! it in [`storage::SharedCacheStorage`].

// Re-export public modules
pub mod config;
pub mod data_structures;
pub mod error;
pub mod storage;
pub mod utils;
pub mod workload;

// Internal modules that are not part of the public API
#[cfg(test)]
pub(crate) mod tests;

/// Version information for the crate.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
