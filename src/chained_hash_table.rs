use std::{
    borrow::Borrow,
    fmt,
    hash::{BuildHasher, Hash},
    slice,
};

use log::{debug, trace};

use crate::{
    chain::{self, Chain},
    error::{HashTableError, Result},
    hashing::BuildFnv1a,
    stats::ChainStats,
};

/// Number of buckets allocated by `ChainedHashTable::new`
pub const DEFAULT_CAPACITY: usize = 50;

/// The string-to-string table
pub type StringHashTable = ChainedHashTable<String, String>;

/// A fixed-capacity hash table resolving collisions by separate chaining.
///
/// Each bucket holds a singly linked chain of entries. The bucket array is
/// allocated once and never grows, so the load factor is unbounded and chains
/// simply get longer.
///
/// `insert` never checks for an existing key: it always appends a new entry
/// at the tail of the chain. `find` and `remove` act on the earliest inserted
/// entry for a key, so duplicates surface in insertion order.
///
/// Note: This implementation is not thread-safe. Share it behind a lock that
/// guards the whole table.
#[derive(Clone)]
pub struct ChainedHashTable<K, V, S = BuildFnv1a> {
    /// One chain per bucket, the ownership root of every entry
    buckets: Box<[Chain<K, V>]>,
    /// Number of entries reachable from all buckets
    size: usize,
    /// Produces the hasher that maps keys to buckets
    build_hasher: S,
}

impl<K, V, S> fmt::Debug for ChainedHashTable<K, V, S> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ChainedHashTable")
            .field("capacity", &self.buckets.len())
            .field("size", &self.size)
            .finish_non_exhaustive()
    }
}

impl<K, V> Default for ChainedHashTable<K, V>
where
    K: Eq + Hash,
{
    fn default() -> Self {
        Self::new()
    }
}

impl<K, V, S> Extend<(K, V)> for ChainedHashTable<K, V, S>
where
    K: Eq + Hash,
    S: BuildHasher,
{
    fn extend<T: IntoIterator<Item = (K, V)>>(&mut self, iter: T) {
        for (k, v) in iter {
            self.insert(k, v);
        }
    }
}

impl<K, V> FromIterator<(K, V)> for ChainedHashTable<K, V>
where
    K: Eq + Hash,
{
    fn from_iter<T: IntoIterator<Item = (K, V)>>(iter: T) -> Self {
        let mut table = Self::new();
        table.extend(iter);
        table
    }
}

impl<K, V> ChainedHashTable<K, V>
where
    K: Eq + Hash,
{
    /// Creates an empty table with `DEFAULT_CAPACITY` buckets and the FNV-1a hasher
    #[must_use]
    pub fn new() -> Self {
        Self::from_parts(DEFAULT_CAPACITY, BuildFnv1a::default())
    }

    /// Creates an empty table with `capacity` buckets and the FNV-1a hasher
    ///
    /// # Errors
    ///
    /// Returns `HashTableError::ZeroCapacity` if `capacity` is zero.
    pub fn with_capacity(capacity: usize) -> Result<Self> {
        Self::with_capacity_and_hasher(capacity, BuildFnv1a::default())
    }
}

impl<K, V, S> ChainedHashTable<K, V, S>
where
    K: Eq + Hash,
    S: BuildHasher,
{
    /// Creates an empty table with `DEFAULT_CAPACITY` buckets and the given hasher
    #[must_use]
    pub fn with_hasher(build_hasher: S) -> Self {
        Self::from_parts(DEFAULT_CAPACITY, build_hasher)
    }

    /// Creates an empty table with `capacity` buckets and the given hasher
    ///
    /// # Errors
    ///
    /// Returns `HashTableError::ZeroCapacity` if `capacity` is zero.
    pub fn with_capacity_and_hasher(capacity: usize, build_hasher: S) -> Result<Self> {
        if capacity == 0 {
            return Err(HashTableError::ZeroCapacity);
        }
        Ok(Self::from_parts(capacity, build_hasher))
    }

    /// Allocates the bucket array; `capacity` must be non-zero
    fn from_parts(capacity: usize, build_hasher: S) -> Self {
        debug!("Creating chained hash table with {capacity} buckets");
        let buckets = (0..capacity).map(|_| Chain::new()).collect();
        Self { buckets, size: 0, build_hasher }
    }

    /// Maps a key to its bucket, always in `[0, capacity)`
    #[must_use]
    #[allow(clippy::arithmetic_side_effects, clippy::cast_possible_truncation)]
    pub fn bucket_index<Q>(&self, key: &Q) -> usize
    where
        K: Borrow<Q>,
        Q: Hash + ?Sized,
    {
        let hash = self.build_hasher.hash_one(key);
        // The bucket array is never empty and its length fits in `u64`, so the
        // remainder is a valid `usize` index.
        (hash % self.buckets.len() as u64) as usize
    }

    /// Appends a key/value pair to the chain of its bucket.
    ///
    /// Existing entries with the same key are left in place; the new one is
    /// only reachable through `find` once they are removed.
    pub fn insert(&mut self, key: K, value: V) {
        self.size = self.size.saturating_add(1);

        let index = self.bucket_index(&key);
        if let Some(chain) = self.buckets.get_mut(index) {
            trace!("Inserting into bucket {index} (collision: {})", !chain.is_empty());
            chain.push_back(key, value);
        }
    }

    /// Returns the value of the earliest inserted entry for `key`
    pub fn find<Q>(&self, key: &Q) -> Option<&V>
    where
        K: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
    {
        self.chain_for(key)?.find(key)
    }

    /// Returns the values of every entry stored under `key`, earliest first
    pub fn find_all<'a, Q>(&'a self, key: &'a Q) -> impl Iterator<Item = &'a V>
    where
        K: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
    {
        self.chain_for(key).into_iter().flat_map(move |chain| chain.matching(key))
    }

    /// Removes the earliest inserted entry for `key` and returns its value
    pub fn remove<Q>(&mut self, key: &Q) -> Option<V>
    where
        K: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
    {
        let index = self.bucket_index(key);
        let removed = self.buckets.get_mut(index)?.remove_first(key);
        trace!("Removing from bucket {index} (hit: {})", removed.is_some());

        if removed.is_some() {
            self.size = self.size.saturating_sub(1);
        }
        removed
    }

    /// Removes every entry stored under `key`, returning the values earliest first
    pub fn remove_all<Q>(&mut self, key: &Q) -> Vec<V>
    where
        K: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
    {
        let index = self.bucket_index(key);
        let removed =
            self.buckets.get_mut(index).map(|chain| chain.remove_all(key)).unwrap_or_default();
        self.size = self.size.saturating_sub(removed.len());
        removed
    }

    /// The chain of the bucket `key` hashes to
    fn chain_for<Q>(&self, key: &Q) -> Option<&Chain<K, V>>
    where
        K: Borrow<Q>,
        Q: Hash + ?Sized,
    {
        self.buckets.get(self.bucket_index(key))
    }
}

impl<K, V, S> ChainedHashTable<K, V, S> {
    /// Returns the number of entries in the hash table
    #[must_use]
    pub fn len(&self) -> usize {
        self.size
    }

    /// Returns true if the hash table is empty
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.size == 0
    }

    /// Returns the number of buckets, fixed at construction
    #[must_use]
    pub fn capacity(&self) -> usize {
        self.buckets.len()
    }

    /// Returns the current load factor of the hash table
    #[must_use]
    #[allow(clippy::arithmetic_side_effects, clippy::cast_precision_loss)]
    pub fn load_factor(&self) -> f64 {
        self.size as f64 / self.buckets.len() as f64
    }

    /// Length of every chain, indexed by bucket
    #[must_use]
    pub fn chain_lengths(&self) -> Vec<usize> {
        self.buckets.iter().map(Chain::len).collect()
    }

    /// Summarises how entries are spread across the buckets
    #[must_use]
    pub fn stats(&self) -> ChainStats {
        ChainStats::from_chain_lengths(&self.chain_lengths())
    }

    /// Returns a reference to the table's `BuildHasher`
    #[must_use]
    pub fn hasher(&self) -> &S {
        &self.build_hasher
    }

    /// Returns an iterator over the key-value pairs.
    ///
    /// Buckets are visited in index order and each chain head to tail; beyond
    /// that no order is promised.
    #[must_use]
    #[allow(clippy::iter_without_into_iter)]
    pub fn iter(&self) -> Iter<'_, K, V> {
        Iter { buckets: self.buckets.iter(), entries: None }
    }

    /// Removes every entry, keeping the bucket array
    pub fn clear(&mut self) {
        trace!("Clearing {} entries", self.size);
        self.buckets.iter_mut().for_each(Chain::clear);
        self.size = 0;
    }
}

/// Iterator over the key-value pairs of a `ChainedHashTable`
#[derive(Debug)]
pub struct Iter<'a, K, V> {
    /// Buckets not yet visited
    buckets: slice::Iter<'a, Chain<K, V>>,
    /// Position inside the current bucket's chain
    entries: Option<chain::Iter<'a, K, V>>,
}

impl<'a, K, V> Iterator for Iter<'a, K, V> {
    type Item = (&'a K, &'a V);

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            if let Some(item) = self.entries.as_mut().and_then(Iterator::next) {
                return Some(item);
            }
            self.entries = Some(self.buckets.next()?.iter());
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::hashing::{BuildDjb2, Xxh64Builder};

    /// Finds two distinct keys that share a bucket in `table`
    fn colliding_keys<S: BuildHasher>(table: &ChainedHashTable<String, String, S>) -> (String, String) {
        let mut seen = vec![None; table.capacity()];
        for i in 0.. {
            let key = format!("key-{i}");
            let index = table.bucket_index(key.as_str());
            match seen.get_mut(index) {
                Some(Some(first)) => return (std::mem::take(first), key),
                Some(slot) => *slot = Some(key),
                None => unreachable!("bucket index out of range"),
            }
        }
        unreachable!("ran out of keys")
    }

    #[test]
    fn test_new_uses_default_capacity() {
        let table: StringHashTable = ChainedHashTable::new();
        assert_eq!(table.capacity(), DEFAULT_CAPACITY);
        assert_eq!(table.capacity(), 50);
        assert_eq!(table.len(), 0);
        assert!(table.is_empty());
    }

    #[test]
    fn test_insert_and_find() {
        let mut table = ChainedHashTable::new();
        table.insert("key1".to_string(), "one".to_string());
        table.insert("key2".to_string(), "two".to_string());
        table.insert("key3".to_string(), "three".to_string());

        assert_eq!(table.find("key1").map(String::as_str), Some("one"));
        assert_eq!(table.find("key2").map(String::as_str), Some("two"));
        assert_eq!(table.find("key3").map(String::as_str), Some("three"));
        assert_eq!(table.find("key4"), None);
        assert_eq!(table.len(), 3);
    }

    #[test]
    fn test_duplicate_scenario() {
        let mut table: StringHashTable = ChainedHashTable::new();
        table.insert("a".to_string(), "1".to_string());
        table.insert("a".to_string(), "2".to_string());
        assert_eq!(table.len(), 2);

        assert_eq!(table.find("a").map(String::as_str), Some("1"));
        assert_eq!(table.remove("a").as_deref(), Some("1"));
        assert_eq!(table.find("a").map(String::as_str), Some("2"));
        assert_eq!(table.remove("a").as_deref(), Some("2"));
        assert_eq!(table.find("a"), None);
        assert_eq!(table.len(), 0);
    }

    #[test]
    fn test_remove_sole_entry_empties_bucket() {
        let mut table: StringHashTable = ChainedHashTable::new();
        table.insert("x".to_string(), "v".to_string());
        let index = table.bucket_index("x");

        assert_eq!(table.remove("x").as_deref(), Some("v"));
        assert_eq!(table.chain_lengths().get(index), Some(&0));
        assert_eq!(table.find("x"), None);
        assert!(table.is_empty());
    }

    #[test]
    fn test_remove_head_of_colliding_chain() {
        let mut table: StringHashTable = ChainedHashTable::new();
        let (first, second) = colliding_keys(&table);
        table.insert(first.clone(), "head".to_string());
        table.insert(second.clone(), "tail".to_string());
        let index = table.bucket_index(first.as_str());
        assert_eq!(table.chain_lengths().get(index), Some(&2));

        assert_eq!(table.remove(first.as_str()).as_deref(), Some("head"));
        assert_eq!(table.find(first.as_str()), None);
        assert_eq!(table.find(second.as_str()).map(String::as_str), Some("tail"));
        assert_eq!(table.chain_lengths().get(index), Some(&1));
        assert_eq!(table.len(), 1);
    }

    #[test]
    fn test_collisions_are_resolved_by_key() {
        let mut table = ChainedHashTable::with_capacity(1).unwrap();
        for i in 0..20 {
            table.insert(format!("key{i}"), format!("value{i}"));
        }

        assert_eq!(table.chain_lengths(), vec![20]);
        for i in 0..20 {
            assert_eq!(table.find(&format!("key{i}")), Some(&format!("value{i}")));
        }
        assert_eq!(table.remove("key10").as_deref(), Some("value10"));
        assert_eq!(table.find("key10"), None);
        assert_eq!(table.find("key11").map(String::as_str), Some("value11"));
    }

    #[test]
    fn test_remove_duplicate_head_in_single_bucket() {
        let mut table: StringHashTable = ChainedHashTable::with_capacity(1).unwrap();
        for (key, value) in [("a", "1"), ("b", "2"), ("a", "3"), ("c", "4")] {
            table.insert(key.to_string(), value.to_string());
        }

        assert_eq!(table.remove("a").as_deref(), Some("1"));
        let remaining: Vec<(&str, &str)> =
            table.iter().map(|(k, v)| (k.as_str(), v.as_str())).collect();
        assert_eq!(remaining, vec![("b", "2"), ("a", "3"), ("c", "4")]);

        for key in ["b", "a", "c"] {
            assert!(table.remove(key).is_some());
        }
        assert_eq!(table.chain_lengths(), vec![0]);
        assert!(table.is_empty());
    }

    #[test]
    fn test_missing_keys_leave_size_unchanged() {
        let mut table: StringHashTable = ChainedHashTable::new();
        assert_eq!(table.find("missing"), None);
        assert_eq!(table.remove("missing"), None);
        assert_eq!(table.len(), 0);

        table.insert("present".to_string(), "yes".to_string());
        assert_eq!(table.remove("missing"), None);
        assert_eq!(table.len(), 1);
    }

    #[test]
    fn test_zero_capacity_is_rejected() {
        let result: Result<StringHashTable> = ChainedHashTable::with_capacity(0);
        assert_eq!(result.unwrap_err(), HashTableError::ZeroCapacity);

        let result: Result<ChainedHashTable<String, String, BuildDjb2>> =
            ChainedHashTable::with_capacity_and_hasher(0, BuildDjb2::default());
        assert!(result.is_err());
    }

    #[test]
    fn test_find_all_and_remove_all() {
        let mut table: StringHashTable = ChainedHashTable::new();
        table.insert("k".to_string(), "1".to_string());
        table.insert("other".to_string(), "x".to_string());
        table.insert("k".to_string(), "2".to_string());
        table.insert("k".to_string(), "3".to_string());

        assert_eq!(table.find_all("k").collect::<Vec<_>>(), vec!["1", "2", "3"]);
        assert_eq!(table.find_all("nope").count(), 0);

        assert_eq!(table.remove_all("k"), vec!["1", "2", "3"]);
        assert_eq!(table.len(), 1);
        assert_eq!(table.find("k"), None);
        assert!(table.remove_all("k").is_empty());
        assert_eq!(table.len(), 1);
    }

    #[test]
    fn test_custom_hashers() {
        let mut djb2 = ChainedHashTable::with_capacity_and_hasher(7, BuildDjb2::default()).unwrap();
        let mut xxh = ChainedHashTable::with_hasher(Xxh64Builder::new(42));
        for i in 0..100 {
            djb2.insert(i.to_string(), i);
            xxh.insert(i.to_string(), i);
        }
        for i in 0..100 {
            assert_eq!(djb2.find(&i.to_string()), Some(&i));
            assert_eq!(xxh.find(&i.to_string()), Some(&i));
        }
        assert_eq!(djb2.capacity(), 7);
        assert_eq!(xxh.capacity(), DEFAULT_CAPACITY);
    }

    #[test]
    fn test_bucket_index_is_stable_and_in_range() {
        let table: StringHashTable = ChainedHashTable::new();
        let other: StringHashTable = ChainedHashTable::new();
        for i in 0..500 {
            let key = format!("k{i}");
            let index = table.bucket_index(key.as_str());
            assert!(index < table.capacity());
            assert_eq!(index, other.bucket_index(key.as_str()));
        }
    }

    #[test]
    fn test_iter_and_chain_lengths_match_size() {
        let mut table = ChainedHashTable::with_capacity(8).unwrap();
        for i in 0..30 {
            table.insert(format!("k{}", i % 10), i);
        }
        table.remove("k3");
        table.remove("k4");

        assert_eq!(table.len(), 28);
        assert_eq!(table.iter().count(), 28);
        assert_eq!(table.chain_lengths().iter().sum::<usize>(), 28);
        assert_eq!(table.iter().map(|(_, &v)| v).sum::<i32>(), (0..30).sum::<i32>() - 3 - 4);
    }

    #[test]
    fn test_load_factor_and_stats() {
        let mut table = ChainedHashTable::with_capacity(4).unwrap();
        for i in 0..10 {
            table.insert(i, i);
        }
        assert!((table.load_factor() - 2.5).abs() < 1e-9);

        let stats = table.stats();
        assert_eq!(stats.buckets, 4);
        assert_eq!(stats.entries, 10);
        assert!(stats.longest_chain >= 3);
    }

    #[test]
    fn test_clear() {
        let mut table: StringHashTable = ChainedHashTable::new();
        table.insert("key1".to_string(), "1".to_string());
        table.insert("key2".to_string(), "2".to_string());

        table.clear();

        assert!(table.is_empty());
        assert_eq!(table.capacity(), DEFAULT_CAPACITY);
        assert_eq!(table.find("key1"), None);
        assert_eq!(table.iter().count(), 0);
    }

    #[test]
    fn test_clone_is_independent() {
        let mut original: StringHashTable = ChainedHashTable::new();
        original.insert("a".to_string(), "1".to_string());
        let mut copy = original.clone();
        copy.remove("a");
        copy.insert("b".to_string(), "2".to_string());

        assert_eq!(original.find("a").map(String::as_str), Some("1"));
        assert_eq!(original.find("b"), None);
        assert_eq!(copy.find("a"), None);
        assert_eq!(copy.len(), 1);
    }

    #[test]
    fn test_extend_and_from_iter() {
        let mut table: ChainedHashTable<&str, i32> = [("a", 1), ("b", 2)].into_iter().collect();
        table.extend([("c", 3), ("a", 4)]);

        assert_eq!(table.len(), 4);
        assert_eq!(table.find("a"), Some(&1));
        assert_eq!(table.find("c"), Some(&3));
    }

    #[test]
    fn test_debug_shows_shape() {
        let mut table: StringHashTable = ChainedHashTable::new();
        table.insert("a".to_string(), "1".to_string());
        assert_eq!(format!("{table:?}"), "ChainedHashTable { capacity: 50, size: 1, .. }");
    }
}
