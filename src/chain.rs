//! Owning singly linked chains behind each bucket

use std::borrow::Borrow;

/// Link to the next entry, owned by whoever holds it (bucket slot or predecessor)
type Link<K, V> = Option<Box<Entry<K, V>>>;

/// A single stored key/value pair plus the link to the next entry in its chain
#[derive(Debug)]
struct Entry<K, V> {
    /// The key the entry was inserted under
    key: K,
    /// The value stored alongside the key
    value: V,
    /// The rest of the chain
    next: Link<K, V>,
}

/// A singly linked list of entries that all hash to the same bucket.
///
/// Entries are kept in insertion order: `push_back` walks to the tail, and
/// every lookup walks from the head, so the earliest inserted duplicate of a
/// key is always the one found and removed first.
#[derive(Debug)]
pub(crate) struct Chain<K, V> {
    /// First entry, `None` when the bucket is empty
    head: Link<K, V>,
    /// Number of entries reachable from `head`
    len: usize,
}

impl<K, V> Default for Chain<K, V> {
    fn default() -> Self {
        Self::new()
    }
}

impl<K, V> Chain<K, V> {
    /// Creates an empty chain
    pub(crate) const fn new() -> Self {
        Self { head: None, len: 0 }
    }

    /// Number of entries in the chain
    pub(crate) const fn len(&self) -> usize {
        self.len
    }

    /// Returns true if the chain holds no entries
    pub(crate) const fn is_empty(&self) -> bool {
        self.head.is_none()
    }

    /// Appends an entry after the current tail
    pub(crate) fn push_back(&mut self, key: K, value: V) {
        let mut cursor = &mut self.head;
        while let Some(entry) = cursor {
            cursor = &mut entry.next;
        }
        *cursor = Some(Box::new(Entry { key, value, next: None }));
        self.len = self.len.saturating_add(1);
    }

    /// Iterates over the entries from head to tail
    pub(crate) fn iter(&self) -> Iter<'_, K, V> {
        Iter { next: self.head.as_deref() }
    }

    /// Drops every entry
    pub(crate) fn clear(&mut self) {
        let mut link = self.head.take();
        while let Some(mut entry) = link {
            link = entry.next.take();
        }
        self.len = 0;
    }
}

impl<K, V> Chain<K, V>
where
    K: Eq,
{
    /// Value of the first entry stored under `key`
    pub(crate) fn find<Q>(&self, key: &Q) -> Option<&V>
    where
        K: Borrow<Q>,
        Q: Eq + ?Sized,
    {
        self.iter().find(|(k, _)| (*k).borrow() == key).map(|(_, v)| v)
    }

    /// Values of every entry stored under `key`, head to tail
    pub(crate) fn matching<'a, Q>(&'a self, key: &'a Q) -> impl Iterator<Item = &'a V>
    where
        K: Borrow<Q>,
        Q: Eq + ?Sized,
    {
        self.iter().filter(move |(k, _)| (*k).borrow() == key).map(|(_, v)| v)
    }

    /// Unlinks the first entry stored under `key` and returns its value
    pub(crate) fn remove_first<Q>(&mut self, key: &Q) -> Option<V>
    where
        K: Borrow<Q>,
        Q: Eq + ?Sized,
    {
        // `cursor` is the link pointing at the node under inspection: the
        // bucket slot itself for the head, the predecessor's `next` otherwise.
        let mut cursor = &mut self.head;
        while cursor.as_ref().is_some_and(|entry| entry.key.borrow() != key) {
            cursor = &mut cursor.as_mut()?.next;
        }

        let removed = cursor.take()?;
        let Entry { value, next, .. } = *removed;
        *cursor = next;
        self.len = self.len.saturating_sub(1);
        Some(value)
    }

    /// Unlinks every entry stored under `key`, returning the values in chain order
    pub(crate) fn remove_all<Q>(&mut self, key: &Q) -> Vec<V>
    where
        K: Borrow<Q>,
        Q: Eq + ?Sized,
    {
        let mut removed = Vec::new();
        let mut cursor = &mut self.head;
        loop {
            let matched = match cursor.as_ref() {
                None => break,
                Some(entry) => entry.key.borrow() == key,
            };

            if matched {
                if let Some(entry) = cursor.take() {
                    let Entry { value, next, .. } = *entry;
                    *cursor = next;
                    removed.push(value);
                }
            } else if let Some(entry) = cursor {
                cursor = &mut entry.next;
            }
        }
        self.len = self.len.saturating_sub(removed.len());
        removed
    }
}

impl<K, V> Clone for Chain<K, V>
where
    K: Clone,
    V: Clone,
{
    fn clone(&self) -> Self {
        let mut chain = Self::new();
        let mut tail = &mut chain.head;
        for (key, value) in self.iter() {
            let entry =
                tail.insert(Box::new(Entry { key: key.clone(), value: value.clone(), next: None }));
            tail = &mut entry.next;
        }
        chain.len = self.len;
        chain
    }
}

// Boxed links would otherwise be dropped recursively, one stack frame per entry.
impl<K, V> Drop for Chain<K, V> {
    fn drop(&mut self) {
        self.clear();
    }
}

/// Iterator over the entries of a chain, head to tail
#[derive(Debug)]
pub(crate) struct Iter<'a, K, V> {
    /// The entry to yield next
    next: Option<&'a Entry<K, V>>,
}

impl<'a, K, V> Iterator for Iter<'a, K, V> {
    type Item = (&'a K, &'a V);

    fn next(&mut self) -> Option<Self::Item> {
        let entry = self.next?;
        self.next = entry.next.as_deref();
        Some((&entry.key, &entry.value))
    }
}
