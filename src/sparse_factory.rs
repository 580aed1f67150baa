//! SparseFactory: generational identifiers backed by a SparseMap.
//!
//! Each identifier slot cycles Free -> Live -> Free(next generation) -> ...
//! for as long as the factory exists. Releasing an id bumps the generation
//! stored on the free list, so the next `create` that recycles the index
//! hands out an id that compares unequal to every earlier one.

use crate::error::Error;
use crate::project::Project;
use crate::sparse_map::SparseMap;
use core::fmt;
use core::ops::{Index, IndexMut};

/// Generational identifier: index in the low 32 bits, generation in the
/// high 32 bits. Equality and hashing cover both.
#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash, Ord, PartialOrd)]
pub struct Id(u64);

impl Id {
    const INDEX_BITS: u32 = 32;

    pub(crate) fn new(index: u32, generation: u32) -> Self {
        Id((u64::from(generation) << Self::INDEX_BITS) | u64::from(index))
    }

    pub fn index(self) -> u32 {
        self.0 as u32
    }

    pub fn generation(self) -> u32 {
        (self.0 >> Self::INDEX_BITS) as u32
    }

    pub fn to_bits(self) -> u64 {
        self.0
    }

    pub fn from_bits(bits: u64) -> Self {
        Id(bits)
    }

    /// Same index, generation advanced by one. Wraps on overflow.
    fn next_generation(self) -> Self {
        Id::new(self.index(), self.generation().wrapping_add(1))
    }
}

impl fmt::Display for Id {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}v{}", self.index(), self.generation())
    }
}

/// Places an `Id` by its index; the generation is checked on lookup.
#[derive(Copy, Clone, Debug, Default)]
pub(crate) struct IdIndex;

impl Project<Id> for IdIndex {
    #[inline]
    fn project(&self, id: &Id) -> usize {
        id.index() as usize
    }
}

/// Issues `Id`s for values and resolves them in O(1). Ids of removed
/// values never resolve again, even after their index is recycled.
#[derive(Clone)]
pub struct SparseFactory<V> {
    next_index: u32,
    free: Vec<Id>,
    live: SparseMap<Id, V, IdIndex>,
}

impl<V> SparseFactory<V> {
    pub fn new() -> Self {
        Self {
            next_index: 0,
            free: Vec::new(),
            live: SparseMap::with_projection(IdIndex),
        }
    }

    /// Presize for `capacity` ids so the first `capacity` creates and
    /// releases do not reallocate.
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            next_index: 0,
            free: Vec::with_capacity(capacity),
            live: SparseMap::with_capacity_and_projection(capacity, IdIndex),
        }
    }

    /// Number of live ids.
    pub fn len(&self) -> usize {
        self.live.len()
    }
    pub fn is_empty(&self) -> bool {
        self.live.is_empty()
    }

    /// Issue an id for a default-constructed value.
    pub fn create(&mut self) -> Id
    where
        V: Default,
    {
        self.insert(V::default())
    }

    /// Issue an id for `value`, recycling the most recently released index
    /// if there is one.
    pub fn insert(&mut self, value: V) -> Id {
        let id = match self.free.pop() {
            Some(id) => id,
            None => self.mint(),
        };
        let inserted = self.live.add(id, value);
        debug_assert!(inserted, "issued index {} was still live", id.index());
        id
    }

    fn mint(&mut self) -> Id {
        let index = self.next_index;
        self.next_index = index
            .checked_add(1)
            .expect("SparseFactory exhausted its u32 index space");
        Id::new(index, 0)
    }

    /// True iff `id`'s index is live under `id`'s generation.
    pub fn exists(&self, id: Id) -> bool {
        self.get(id).is_some()
    }

    pub fn get(&self, id: Id) -> Option<&V> {
        match self.live.get_key_value(&id) {
            Some((stored, value)) if *stored == id => Some(value),
            _ => None,
        }
    }

    pub fn get_mut(&mut self, id: Id) -> Option<&mut V> {
        match self.live.get_key_value_mut(&id) {
            Some((stored, value)) if *stored == id => Some(value),
            _ => None,
        }
    }

    /// Like `get`, but says why the id does not resolve.
    pub fn at(&self, id: Id) -> Result<&V, Error> {
        match self.live.get_key_value(&id) {
            Some((stored, value)) if *stored == id => Ok(value),
            Some((stored, _)) => Err(stale(id, *stored)),
            None => Err(Error::KeyNotFound),
        }
    }

    pub fn at_mut(&mut self, id: Id) -> Result<&mut V, Error> {
        match self.live.get_key_value_mut(&id) {
            Some((stored, value)) if *stored == id => Ok(value),
            Some((stored, _)) => Err(stale(id, *stored)),
            None => Err(Error::KeyNotFound),
        }
    }

    /// Release `id` and return its value. Stale or unknown ids are ignored.
    pub fn remove(&mut self, id: Id) -> Option<V> {
        if !self.exists(id) {
            return None;
        }
        let (stored, value) = self.live.remove(&id)?;
        self.free.push(stored.next_generation());
        Some(value)
    }

    /// Release every live id.
    pub fn clear(&mut self) {
        self.free
            .extend(self.live.keys().map(|id| id.next_generation()));
        self.live.clear();
    }

    /// Live ids and their values, in dense order.
    pub fn iter(&self) -> impl Iterator<Item = (Id, &V)> {
        self.live.iter().map(|(id, v)| (*id, v))
    }

    pub fn iter_mut(&mut self) -> impl Iterator<Item = (Id, &mut V)> {
        self.live.iter_mut().map(|(id, v)| (*id, v))
    }

    pub fn ids(&self) -> impl Iterator<Item = Id> + '_ {
        self.live.keys().copied()
    }
}

fn stale(id: Id, stored: Id) -> Error {
    Error::StaleId {
        index: id.index(),
        generation: id.generation(),
        current: stored.generation(),
    }
}

impl<V> Default for SparseFactory<V> {
    fn default() -> Self {
        Self::new()
    }
}

impl<V> Index<Id> for SparseFactory<V> {
    type Output = V;

    fn index(&self, id: Id) -> &V {
        match self.at(id) {
            Ok(v) => v,
            Err(e) => panic!("invalid id {id}: {e}"),
        }
    }
}

impl<V> IndexMut<Id> for SparseFactory<V> {
    fn index_mut(&mut self, id: Id) -> &mut V {
        match self.at_mut(id) {
            Ok(v) => v,
            Err(e) => panic!("invalid id {id}: {e}"),
        }
    }
}

impl<V: fmt::Debug> fmt::Debug for SparseFactory<V> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_map()
            .entries(self.live.iter().map(|(id, v)| (id.to_string(), v)))
            .finish()
    }
}
