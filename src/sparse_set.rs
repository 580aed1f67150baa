//! SparseSet: dense/sparse dual-buffer set with swap-remove.
//!
//! Layout
//! - `dense` holds the live elements contiguously; its length is the
//!   logical size `n`. Order is unspecified and changes on removal.
//! - `sparse` maps a projected value `v` to the dense index holding the
//!   element that projects to `v`, or `VACANT`. Its length is the capacity.
//!
//! Invariants
//! - Indexing: for every live `x` at dense index `i`, `sparse[project(x)] == i`.
//! - Staleness: a sparse entry `>= n` is absent, whatever its bit pattern. Removal
//!   and `clear` do not scrub stale entries above `n`.
//! - Lookups also require the dense slot to project back to `v`, so a stale
//!   entry that happens to fall below `n` again is never read as valid.

use crate::error::Error;
use crate::project::{Identity, Project};
use core::fmt;

/// Reserved sparse entry meaning "unused". Always `>= n`.
pub(crate) const VACANT: usize = usize::MAX;

#[derive(Clone)]
pub struct SparseSet<T, P = Identity> {
    projection: P,
    dense: Vec<T>,
    sparse: Vec<usize>,
}

impl<T> SparseSet<T>
where
    Identity: Project<T>,
{
    pub fn new() -> Self {
        Self::with_projection(Identity)
    }

    pub fn with_capacity(capacity: usize) -> Self {
        Self::with_capacity_and_projection(capacity, Identity)
    }
}

impl<T> Default for SparseSet<T>
where
    Identity: Project<T>,
{
    fn default() -> Self {
        Self::new()
    }
}

impl<T, P> SparseSet<T, P>
where
    P: Project<T>,
{
    pub fn with_projection(projection: P) -> Self {
        Self::with_capacity_and_projection(0, projection)
    }

    pub fn with_capacity_and_projection(capacity: usize, projection: P) -> Self {
        Self {
            projection,
            dense: Vec::with_capacity(capacity),
            sparse: vec![VACANT; capacity],
        }
    }

    /// Number of live elements.
    pub fn len(&self) -> usize {
        self.dense.len()
    }
    pub fn is_empty(&self) -> bool {
        self.dense.is_empty()
    }

    /// Size of the sparse buffer: every projection below this value is
    /// representable without growing.
    pub fn capacity(&self) -> usize {
        self.sparse.len()
    }

    pub fn projection(&self) -> &P {
        &self.projection
    }

    /// Dense index of the live element projecting to `v`, if any.
    #[inline]
    pub(crate) fn position_of(&self, v: usize) -> Option<usize> {
        let i = *self.sparse.get(v)?;
        // `VACANT` and stale entries fail either the bound or the back-check.
        let x = self.dense.get(i)?;
        if self.projection.project(x) == v {
            Some(i)
        } else {
            None
        }
    }

    /// Insert `x` unless an element with the same projection is live.
    /// Returns `true` if `x` was inserted.
    pub fn add(&mut self, x: T) -> bool {
        let v = self.projection.project(&x);
        if self.position_of(v).is_some() {
            return false;
        }
        if v >= self.capacity() {
            self.grow_past(v);
        }
        self.sparse[v] = self.dense.len();
        self.dense.push(x);
        true
    }

    /// Grow to the smallest power of two strictly greater than `v`.
    fn grow_past(&mut self, v: usize) {
        let new_capacity = v
            .checked_add(1)
            .and_then(usize::checked_next_power_of_two)
            .expect("projection exceeds the addressable sparse capacity");
        self.sparse.resize(new_capacity, VACANT);
    }

    /// Remove the element sharing `x`'s projection and return it.
    pub fn remove(&mut self, x: &T) -> Option<T> {
        let v = self.projection.project(x);
        self.remove_projected(v)
    }

    /// Swap-and-pop removal of the element projecting to `v`.
    pub(crate) fn remove_projected(&mut self, v: usize) -> Option<T> {
        let i = self.position_of(v)?;
        let last = self.dense.len() - 1;
        // Project the element that will move before touching either buffer;
        // no user code runs once mutation starts.
        let moved = if i == last {
            None
        } else {
            Some(self.projection.project(&self.dense[last]))
        };
        let removed = self.dense.swap_remove(i);
        if let Some(mv) = moved {
            self.sparse[mv] = i;
        }
        self.sparse[v] = VACANT;
        debug_assert!(self.position_of(v).is_none());
        Some(removed)
    }

    /// Dense index of `x`, or `None` if no element with its projection is live.
    pub fn search(&self, x: &T) -> Option<usize> {
        self.position_of(self.projection.project(x))
    }

    pub fn contains(&self, x: &T) -> bool {
        self.search(x).is_some()
    }

    /// Element at a dense index, as returned by `search`.
    pub fn get(&self, index: usize) -> Option<&T> {
        self.dense.get(index)
    }

    /// Resize the sparse buffer to exactly `new_capacity`.
    ///
    /// Growing always succeeds and keeps every element reachable. Shrinking
    /// fails with `Error::WouldTruncate`, leaving the set untouched, if any
    /// live element projects at or above `new_capacity`.
    pub fn resize(&mut self, new_capacity: usize) -> Result<(), Error> {
        if new_capacity < self.capacity() {
            if let Some(projection) = self
                .dense
                .iter()
                .map(|x| self.projection.project(x))
                .find(|&v| v >= new_capacity)
            {
                return Err(Error::WouldTruncate {
                    projection,
                    capacity: new_capacity,
                });
            }
            self.sparse.truncate(new_capacity);
            self.sparse.shrink_to_fit();
            self.dense.shrink_to(new_capacity);
        } else {
            self.sparse.resize(new_capacity, VACANT);
            self.dense
                .reserve(new_capacity.saturating_sub(self.dense.len()));
        }
        Ok(())
    }

    /// Drop every element. Capacity and the sparse buffer are retained.
    pub fn clear(&mut self) {
        self.dense.clear();
    }

    pub fn as_slice(&self) -> &[T] {
        &self.dense
    }

    /// Live elements in dense order. Order is not stable across removals.
    pub fn iter(&self) -> core::slice::Iter<'_, T> {
        self.dense.iter()
    }

    /// Mutable access to the dense buffer for wrappers that keep the
    /// projected part of each element immutable.
    pub(crate) fn dense_mut(&mut self) -> &mut [T] {
        &mut self.dense
    }

    #[cfg(test)]
    pub(crate) fn sparse_raw(&self) -> &[usize] {
        &self.sparse
    }
}

impl<'a, T, P> IntoIterator for &'a SparseSet<T, P>
where
    P: Project<T>,
{
    type Item = &'a T;
    type IntoIter = core::slice::Iter<'a, T>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

impl<T, P> Extend<T> for SparseSet<T, P>
where
    P: Project<T>,
{
    fn extend<I: IntoIterator<Item = T>>(&mut self, iter: I) {
        for x in iter {
            self.add(x);
        }
    }
}

impl<T> FromIterator<T> for SparseSet<T>
where
    Identity: Project<T>,
{
    fn from_iter<I: IntoIterator<Item = T>>(iter: I) -> Self {
        let mut set = Self::new();
        set.extend(iter);
        set
    }
}

impl<T: fmt::Debug, P> fmt::Debug for SparseSet<T, P> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_set().entries(self.dense.iter()).finish()
    }
}
