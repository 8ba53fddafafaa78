//! Error type for fallible table construction

use thiserror::Error;

/// Errors reported by `ChainedHashTable` constructors
///
/// Lookups and removals never fail: an absent key is reported as `None`.
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum HashTableError {
    /// A table was requested with no buckets to hash into
    #[error("Invalid capacity: a hash table needs at least one bucket")]
    ZeroCapacity,
}

/// Result type for hash table construction
pub type Result<T> = std::result::Result<T, HashTableError>;
