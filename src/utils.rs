//! Utility functions and traits for `ChainedHashTable`

use crate::ChainedHashTable;
use std::{
    borrow::Borrow,
    hash::{BuildHasher, Hash},
};

/// Extension trait for table implementations that provides additional utility methods
pub trait HashTableExtensions<K, V> {
    /// Returns the keys of the table as a Vec, one per stored entry
    fn keys(&self) -> Vec<K>;

    /// Returns the values of the table as a Vec
    fn values(&self) -> Vec<V>;

    /// Returns true if the table holds at least one entry for the given key
    fn contains_key<Q>(&self, key: &Q) -> bool
    where
        K: Borrow<Q>,
        Q: Hash + Eq + ?Sized;

    /// Returns how many entries are stored under the given key
    fn count<Q>(&self, key: &Q) -> usize
    where
        K: Borrow<Q>,
        Q: Hash + Eq + ?Sized;
}

impl<K, V, S> HashTableExtensions<K, V> for ChainedHashTable<K, V, S>
where
    K: Eq + Hash + Clone,
    V: Clone,
    S: BuildHasher,
{
    fn keys(&self) -> Vec<K> {
        self.iter().map(|(k, _)| k.clone()).collect()
    }

    fn values(&self) -> Vec<V> {
        self.iter().map(|(_, v)| v.clone()).collect()
    }

    fn contains_key<Q>(&self, key: &Q) -> bool
    where
        K: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
    {
        self.find(key).is_some()
    }

    fn count<Q>(&self, key: &Q) -> usize
    where
        K: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
    {
        self.find_all(key).count()
    }
}
