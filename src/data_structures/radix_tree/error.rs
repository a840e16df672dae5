//! Error types for the radix tree.
//!
//! Absence of a key is never an error; these variants only cover caller misuse
//! on the unchecked slice API and structural self-checks.

/// Errors that can occur in radix tree operations.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum RadixTreeError {
    /// A key slice did not have the fixed key length of the tree.
    #[error("Key length mismatch: expected {expected} bytes, got {actual}")]
    KeyLengthMismatch {
        /// The fixed key length of the tree.
        expected: usize,
        /// The length of the rejected key.
        actual: usize,
    },

    /// A full-tree check found a broken structural invariant.
    #[error("Radix tree invariant violated: {0}")]
    InvariantViolation(String),
}

/// Result type for radix tree operations.
pub type RadixTreeResult<T> = Result<T, RadixTreeError>;
