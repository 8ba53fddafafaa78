//! Deterministic string hashers used to pick a bucket
//!
//! Every hasher here is unseeded (or explicitly seeded), so a key lands in the
//! same bucket on every run.

use std::hash::{BuildHasherDefault, Hasher};

pub use xxhash_rust::xxh64::Xxh64Builder;

/// FNV-1a 64-bit offset basis
const FNV_OFFSET_BASIS: u64 = 14_695_981_039_346_656_037;
/// FNV-1a 64-bit prime
const FNV_PRIME: u64 = 1_099_511_628_211;
/// Initial state of djb2
const DJB2_MAGIC_NUMBER: u64 = 5381;

/// 64-bit FNV-1a, the default hasher of `ChainedHashTable`
#[derive(Debug, Clone, Copy)]
pub struct Fnv1aHasher {
    /// Running hash
    state: u64,
}

impl Default for Fnv1aHasher {
    fn default() -> Self {
        Self { state: FNV_OFFSET_BASIS }
    }
}

impl Hasher for Fnv1aHasher {
    fn write(&mut self, bytes: &[u8]) {
        for byte in bytes {
            self.state ^= u64::from(*byte);
            self.state = self.state.wrapping_mul(FNV_PRIME);
        }
    }

    fn finish(&self) -> u64 {
        self.state
    }
}

/// Bernstein's djb2 (`hash * 33 + byte`)
#[derive(Debug, Clone, Copy)]
pub struct Djb2Hasher {
    /// Running hash
    state: u64,
}

impl Default for Djb2Hasher {
    fn default() -> Self {
        Self { state: DJB2_MAGIC_NUMBER }
    }
}

impl Hasher for Djb2Hasher {
    fn write(&mut self, bytes: &[u8]) {
        for byte in bytes {
            self.state =
                self.state.wrapping_shl(5).wrapping_add(self.state).wrapping_add(u64::from(*byte));
        }
    }

    fn finish(&self) -> u64 {
        self.state
    }
}

/// `BuildHasher` producing `Fnv1aHasher`s
pub type BuildFnv1a = BuildHasherDefault<Fnv1aHasher>;

/// `BuildHasher` producing `Djb2Hasher`s
pub type BuildDjb2 = BuildHasherDefault<Djb2Hasher>;

/// FNV-1a over the raw bytes of `s`
///
/// Note that hashing a `str` through `Hash` also feeds a terminator byte, so
/// this is not the value a table computes for the same key.
#[must_use]
pub fn fnv1a_hash(s: &str) -> u64 {
    let mut hasher = Fnv1aHasher::default();
    hasher.write(s.as_bytes());
    hasher.finish()
}

/// djb2 over the raw bytes of `s`
#[must_use]
pub fn djb2_hash(s: &str) -> u64 {
    let mut hasher = Djb2Hasher::default();
    hasher.write(s.as_bytes());
    hasher.finish()
}

/// xxh64 (seed 0) over the raw bytes of `s`
#[must_use]
pub fn xxh64_hash(s: &str) -> u64 {
    xxhash_rust::xxh64::xxh64(s.as_bytes(), 0)
}

/// Hash a string with the default algorithm (FNV-1a)
///
/// ```rust
/// use hashchain::hashing::{fnv1a_hash, hash_string};
///
/// assert_eq!(hash_string("foobar"), fnv1a_hash("foobar"));
/// assert_eq!(hash_string(""), 0xcbf2_9ce4_8422_2325);
/// ```
#[must_use]
pub fn hash_string(s: &str) -> u64 {
    fnv1a_hash(s)
}
