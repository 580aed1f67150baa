//! sparse-slots: cache-friendly containers with O(1) insert, remove and
//! membership for integer-addressable elements, plus a generational id
//! factory built on top.
//!
//! Internal Design:
//!
//! Summary
//! - Goal: dense iteration and constant-time churn for large numbers of
//!   short-lived objects keyed by small integers (ECS-style workloads).
//! - Layers:
//!   - SparseSet<T, P>: dense buffer of live elements plus a sparse buffer
//!     from projected value to dense index; swap-and-pop removal.
//!   - SparseMap<K, V, P>: a SparseSet of (K, V) entries projected through
//!     the key only.
//!   - SparseFactory<V>: issues generational `Id`s backed by a SparseMap
//!     keyed by `Id`, placed by index and checked by generation.
//!
//! Constraints
//! - Single-threaded and synchronous; every operation is a bounded sequence
//!   of buffer reads and writes. Shared access follows the usual `&`/`&mut`
//!   rules; callers wanting cross-thread mutation wrap a container in a lock.
//! - Each container exclusively owns its buffers; `Clone` deep-copies them.
//! - Projections (`Project`) must be injective over the live set. This is
//!   the caller's responsibility and is not validated.
//!
//! Absence and staleness
//! - The sparse buffer stores `usize::MAX` for unused slots and is not
//!   scrubbed on removal or `clear`; an entry counts only if it is below the
//!   live size and the dense slot it names projects back to the probe.
//! - The factory pushes a released id back onto a LIFO free list with its
//!   generation already bumped, so a recycled index never reproduces an id
//!   handed out before.
//!
//! Failure boundaries
//! - Adding a present element and removing an absent one are no-ops
//!   reported via `bool`/`Option`.
//! - `at` on a missing key and shrinking below a live projection return
//!   `Error`.
//! - Allocation failure, projections beyond `usize`, and exhausting the
//!   factory's `u32` index space are fatal.

mod error;
mod project;
pub mod sparse_factory;
pub mod sparse_map;
pub mod sparse_set;
mod sparse_set_proptest;

// Public surface
pub use error::Error;
pub use project::{Identity, Project};
pub use sparse_factory::{Id, SparseFactory};
pub use sparse_map::SparseMap;
pub use sparse_set::SparseSet;
