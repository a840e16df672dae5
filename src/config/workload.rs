//! Workload configuration module.
//!
//! Controls the deterministic synthetic workload the driver runs against a
//! cache storage instance.

use super::{ConfigResult, Validate};
use crate::error::config::ConfigError;
use serde::{Deserialize, Serialize};

/// Synthetic workload configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WorkloadConfig {
    /// Number of cache entries to insert
    pub entries: usize,

    /// Seed mixed into every generated digest
    pub seed: u64,

    /// Remove every n-th inserted entry (0 disables removal)
    pub remove_every: usize,

    /// Whether to verify lookups and tree invariants after the run
    pub verify: bool,
}

impl Default for WorkloadConfig {
    fn default() -> Self {
        Self {
            entries: 100_000,
            seed: 0x5eed,
            remove_every: 10,
            verify: true,
        }
    }
}

impl Validate for WorkloadConfig {
    fn validate(&self) -> ConfigResult<()> {
        if self.entries == 0 {
            return Err(ConfigError::ValidationError(
                "entries must be greater than 0".to_string(),
            ));
        }

        if self.remove_every == 1 {
            return Err(ConfigError::ValidationError(
                "remove_every must be 0 (disabled) or greater than 1".to_string(),
            ));
        }

        Ok(())
    }
}
