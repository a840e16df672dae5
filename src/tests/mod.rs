//! Test modules for the result-set cache.
//!
//! This module contains crate-level testing infrastructure:
//! - Tests for configuration loading and validation
//! - Tests for error types and reporting
//! - Property-based tests of the radix tree using proptest
//! - Shared strategies and fixtures

pub mod config_tests;

// Re-export commonly used testing tools to simplify imports in test modules
pub use test_utils::{key_strategy, keys_strategy, operations_strategy, Operation, TestFixture};
