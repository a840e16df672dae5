//! Deterministic synthetic workload.
//!
//! Generates digests the way the surrounding cache would (a 64-bit hash of a
//! request), inserts them into a [`CacheStorage`], removes a configurable share,
//! and optionally verifies every lookup plus the tree invariants.

use std::hash::Hasher;
use std::sync::Arc;
use std::time::{Duration, Instant};

use serde::Serialize;
use tracing::{debug, info};

use crate::config::WorkloadConfig;
use crate::data_structures::TreeStats;
use crate::error::{CacheError, CacheResult};
use crate::storage::{CacheData, CacheEntry, CacheStorage};

/// Outcome of a workload run.
#[derive(Debug, Clone, Serialize)]
pub struct WorkloadReport {
    /// Entries inserted.
    pub inserted: usize,
    /// Inserts that replaced an entry with the same digest.
    pub replaced: usize,
    /// Entries removed.
    pub removed: usize,
    /// Lookups checked during verification.
    pub verified: usize,
    /// Tree shape after the run.
    pub stats: TreeStats,
    /// Wall time spent, verification included.
    #[serde(with = "duration_millis")]
    pub elapsed: Duration,
}

mod duration_millis {
    use serde::Serializer;
    use std::time::Duration;

    pub fn serialize<S: Serializer>(value: &Duration, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_u64(value.as_millis() as u64)
    }
}

/// Digest of the `index`-th synthetic request: FNV-1a over `seed` and `index`.
pub fn digest_for(seed: u64, index: u64) -> u64 {
    let mut hasher = fnv::FnvHasher::default();
    hasher.write_u64(seed);
    hasher.write_u64(index);
    hasher.finish()
}

fn is_removed(config: &WorkloadConfig, index: usize) -> bool {
    config.remove_every > 0 && index % config.remove_every == 0
}

/// Runs the workload described by `config` against `storage`.
///
/// Entry `i` carries payload `i` under digest [`digest_for`]`(seed, i)`.
///
/// # Errors
///
/// With `verify` enabled, fails if a lookup disagrees with what was inserted
/// and removed, or if the tree invariants do not hold.
pub fn run(
    storage: &mut CacheStorage<CacheData<u64>>,
    config: &WorkloadConfig,
) -> CacheResult<WorkloadReport> {
    let started = Instant::now();
    info!(entries = config.entries, seed = config.seed, "Running workload");

    let mut replaced = 0;
    let mut removed = 0;

    for index in 0..config.entries {
        let digest = digest_for(config.seed, index as u64);
        if storage
            .insert(Arc::new(CacheData::from_digest(digest, index as u64)))
            .is_some()
        {
            replaced += 1;
        }
    }
    debug!(inserted = config.entries, replaced, "Insert phase done");

    for index in (0..config.entries).filter(|&i| is_removed(config, i)) {
        let probe = CacheData::from_digest(digest_for(config.seed, index as u64), index as u64);
        if storage.remove(&probe).is_some() {
            removed += 1;
        }
    }
    debug!(removed, "Remove phase done");

    let mut verified = 0;
    if config.verify {
        verified = verify(storage, config)?;
    }

    let report = WorkloadReport {
        inserted: config.entries,
        replaced,
        removed,
        verified,
        stats: storage.stats(),
        elapsed: started.elapsed(),
    };
    info!(
        live = report.stats.keys,
        nodes = report.stats.nodes,
        elapsed_ms = report.elapsed.as_millis() as u64,
        "Workload finished"
    );
    Ok(report)
}

fn verify(storage: &CacheStorage<CacheData<u64>>, config: &WorkloadConfig) -> CacheResult<usize> {
    for index in 0..config.entries {
        let key = digest_for(config.seed, index as u64).to_be_bytes();
        let found = storage.get(&key);
        match (is_removed(config, index), found) {
            (true, Some(_)) => {
                return Err(CacheError::Custom(format!(
                    "entry {index} is still present after removal"
                )))
            }
            (false, None) => {
                return Err(CacheError::Custom(format!("entry {index} is missing")))
            }
            (false, Some(entry)) if entry.hash_key() != &key => {
                return Err(CacheError::Custom(format!(
                    "entry {index} resolved to a different digest"
                )))
            }
            _ => {}
        }
    }
    storage.tree().check_invariants()?;
    Ok(config.entries)
}
