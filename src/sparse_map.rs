//! SparseMap: a SparseSet of key/value entries projected through the key.

use crate::error::Error;
use crate::project::{Identity, Project};
use crate::sparse_set::SparseSet;
use core::fmt;

#[derive(Clone, Debug)]
pub(crate) struct Entry<K, V> {
    key: K,
    value: V,
}

/// Lifts a key projection to whole entries; the value never takes part.
#[derive(Copy, Clone, Debug, Default)]
pub(crate) struct KeyProject<P>(P);

impl<K, V, P> Project<Entry<K, V>> for KeyProject<P>
where
    P: Project<K>,
{
    #[inline]
    fn project(&self, entry: &Entry<K, V>) -> usize {
        self.0.project(&entry.key)
    }
}

/// Map with O(1) insert, remove and lookup for integer-projectable keys.
///
/// Keys are matched by projection only; two keys with the same projection
/// address the same entry.
#[derive(Clone)]
pub struct SparseMap<K, V, P = Identity> {
    set: SparseSet<Entry<K, V>, KeyProject<P>>,
}

impl<K, V> SparseMap<K, V>
where
    Identity: Project<K>,
{
    pub fn new() -> Self {
        Self::with_projection(Identity)
    }

    pub fn with_capacity(capacity: usize) -> Self {
        Self::with_capacity_and_projection(capacity, Identity)
    }
}

impl<K, V> Default for SparseMap<K, V>
where
    Identity: Project<K>,
{
    fn default() -> Self {
        Self::new()
    }
}

impl<K, V, P> SparseMap<K, V, P>
where
    P: Project<K>,
{
    pub fn with_projection(projection: P) -> Self {
        Self::with_capacity_and_projection(0, projection)
    }

    pub fn with_capacity_and_projection(capacity: usize, projection: P) -> Self {
        Self {
            set: SparseSet::with_capacity_and_projection(capacity, KeyProject(projection)),
        }
    }

    #[inline]
    fn project_key(&self, key: &K) -> usize {
        self.set.projection().0.project(key)
    }

    pub fn len(&self) -> usize {
        self.set.len()
    }
    pub fn is_empty(&self) -> bool {
        self.set.is_empty()
    }
    pub fn capacity(&self) -> usize {
        self.set.capacity()
    }

    /// Insert `key -> value` if the key is absent. An existing value is not
    /// replaced. Returns `true` if the entry was inserted.
    pub fn add(&mut self, key: K, value: V) -> bool {
        self.set.add(Entry { key, value })
    }

    /// Remove the entry for `key`, returning the stored key and value.
    pub fn remove(&mut self, key: &K) -> Option<(K, V)> {
        let v = self.project_key(key);
        self.set
            .remove_projected(v)
            .map(|Entry { key, value }| (key, value))
    }

    /// Dense index of the entry for `key`.
    pub fn search(&self, key: &K) -> Option<usize> {
        self.set.position_of(self.project_key(key))
    }

    pub fn contains_key(&self, key: &K) -> bool {
        self.search(key).is_some()
    }

    pub fn get(&self, key: &K) -> Option<&V> {
        self.get_key_value(key).map(|(_, v)| v)
    }

    pub fn get_mut(&mut self, key: &K) -> Option<&mut V> {
        self.get_key_value_mut(key).map(|(_, v)| v)
    }

    /// The stored key (which may differ from `key` outside its projection)
    /// and its value.
    pub fn get_key_value(&self, key: &K) -> Option<(&K, &V)> {
        let i = self.search(key)?;
        self.set.get(i).map(|e| (&e.key, &e.value))
    }

    pub fn get_key_value_mut(&mut self, key: &K) -> Option<(&K, &mut V)> {
        let i = self.search(key)?;
        self.set
            .dense_mut()
            .get_mut(i)
            .map(|e| (&e.key, &mut e.value))
    }

    /// Like `get`, but a missing key is an error.
    pub fn at(&self, key: &K) -> Result<&V, Error> {
        self.get(key).ok_or(Error::KeyNotFound)
    }

    pub fn at_mut(&mut self, key: &K) -> Result<&mut V, Error> {
        self.get_mut(key).ok_or(Error::KeyNotFound)
    }

    pub fn resize(&mut self, new_capacity: usize) -> Result<(), Error> {
        self.set.resize(new_capacity)
    }

    pub fn clear(&mut self) {
        self.set.clear();
    }

    pub fn iter(&self) -> impl Iterator<Item = (&K, &V)> {
        self.set.iter().map(|e| (&e.key, &e.value))
    }

    /// Keys stay immutable: changing one could change its projection.
    pub fn iter_mut(&mut self) -> impl Iterator<Item = (&K, &mut V)> {
        self.set
            .dense_mut()
            .iter_mut()
            .map(|e| (&e.key, &mut e.value))
    }

    pub fn keys(&self) -> impl Iterator<Item = &K> {
        self.set.iter().map(|e| &e.key)
    }

    pub fn values(&self) -> impl Iterator<Item = &V> {
        self.set.iter().map(|e| &e.value)
    }

    pub fn values_mut(&mut self) -> impl Iterator<Item = &mut V> {
        self.set.dense_mut().iter_mut().map(|e| &mut e.value)
    }
}

impl<K, V, P> Extend<(K, V)> for SparseMap<K, V, P>
where
    P: Project<K>,
{
    fn extend<I: IntoIterator<Item = (K, V)>>(&mut self, iter: I) {
        for (k, v) in iter {
            self.add(k, v);
        }
    }
}

impl<K, V> FromIterator<(K, V)> for SparseMap<K, V>
where
    Identity: Project<K>,
{
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut map = Self::new();
        map.extend(iter);
        map
    }
}

impl<K, V, P> fmt::Debug for SparseMap<K, V, P>
where
    K: fmt::Debug,
    V: fmt::Debug,
    P: Project<K>,
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_map()
            .entries(self.set.as_slice().iter().map(|e| (&e.key, &e.value)))
            .finish()
    }
}
