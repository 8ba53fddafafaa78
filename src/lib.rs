//! # Chained Hash Table
//!
//! A fixed-capacity hash table that resolves collisions by separate chaining.
//!
//! `ChainedHashTable` allocates its bucket array once (50 buckets by default) and
//! never rehashes. Every bucket owns a singly linked chain of entries; inserts
//! append at the tail of the chain, and lookups walk it from the head.
//!
//! Inserting a key that is already present does not replace it: the new entry
//! is appended behind the old one. `find` and `remove` always act on the
//! earliest inserted entry for a key, so duplicates surface one by one.
//!
//! ## Basic Usage
//!
//! ```rust
//! use hashchain::StringHashTable;
//!
//! // Create a table with the default 50 buckets
//! let mut table = StringHashTable::new();
//!
//! // Insert values
//! table.insert("apple".to_string(), "red".to_string());
//! table.insert("banana".to_string(), "yellow".to_string());
//!
//! // Retrieve values
//! assert_eq!(table.find("apple").map(String::as_str), Some("red"));
//!
//! // Inserting again appends a second entry instead of updating
//! table.insert("apple".to_string(), "green".to_string());
//! assert_eq!(table.len(), 3);
//! assert_eq!(table.find("apple").map(String::as_str), Some("red"));
//!
//! // Removing pops the earliest entry and uncovers the next one
//! assert_eq!(table.remove("apple").as_deref(), Some("red"));
//! assert_eq!(table.find("apple").map(String::as_str), Some("green"));
//! assert_eq!(table.remove("cherry"), None);
//! ```
//!
//! ## Choosing Capacity and Hasher
//!
//! ```rust
//! use hashchain::{hashing::Xxh64Builder, ChainedHashTable, HashTableError};
//!
//! let mut table = ChainedHashTable::with_capacity_and_hasher(8, Xxh64Builder::new(0))?;
//! for i in 0..32 {
//!     table.insert(i, i * i);
//! }
//!
//! // The bucket array never grows; chains get longer instead
//! assert_eq!(table.capacity(), 8);
//! assert_eq!(table.load_factor(), 4.0);
//! assert_eq!(table.stats().entries, 32);
//!
//! assert_eq!(
//!     ChainedHashTable::<u32, u32>::with_capacity(0).unwrap_err(),
//!     HashTableError::ZeroCapacity
//! );
//! # Ok::<(), HashTableError>(())
//! ```

/// Owning singly linked chains behind each bucket
mod chain;
/// The hash table itself
mod chained_hash_table;
/// Error type for fallible table construction
mod error;
/// Deterministic string hashers
pub mod hashing;
/// Chain-length statistics
mod stats;
/// Utility functions and traits for the hash table
mod utils;

pub use chained_hash_table::{ChainedHashTable, DEFAULT_CAPACITY, Iter, StringHashTable};
pub use error::{HashTableError, Result};
pub use stats::ChainStats;
pub use utils::HashTableExtensions;
