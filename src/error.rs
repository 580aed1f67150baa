//! Error type shared by the containers.

use thiserror::Error;

/// Recoverable failures reported by the containers.
///
/// Idempotent no-ops (adding a present element, removing an absent one) are
/// not errors and are reported through `bool`/`Option` returns instead.
#[derive(Clone, Debug, Error, Eq, PartialEq)]
pub enum Error {
    /// No live entry is stored under the requested key.
    #[error("key not found")]
    KeyNotFound,

    /// The identifier's index is live, but under a newer generation.
    #[error("stale id: index {index} generation {generation}, live generation is {current}")]
    StaleId {
        index: u32,
        generation: u32,
        current: u32,
    },

    /// Shrinking would make a live element unreachable.
    #[error("cannot shrink to capacity {capacity}: a live element projects to {projection}")]
    WouldTruncate { projection: usize, capacity: usize },
}
