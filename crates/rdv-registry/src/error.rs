//! Error types for name registration.

use rdv_store::StoreError;
use rdv_types::{TypeError, WorkerId, WorkerName};
use thiserror::Error;

/// Errors that abort a registration attempt.
///
/// None of these are retried; each indicates either a misconfigured group or
/// a broken store.
#[derive(Debug, Error)]
pub enum RegistryError {
    /// Two different workers claim the same name.
    #[error("worker name {name} is not unique: workers {existing} and {incoming} share the same name")]
    DuplicateName {
        name: WorkerName,
        existing: WorkerId,
        incoming: WorkerId,
    },

    /// Another worker already holds this worker's id.
    #[error("worker id {id} is not unique: already claimed by worker {existing}")]
    IdAlreadyClaimed { id: WorkerId, existing: WorkerName },

    /// The roster contains an entry that cannot be parsed.
    #[error("malformed roster entry: {entry:?}")]
    MalformedRosterEntry { entry: String },

    /// A worker id could not be read as a base-10 `u32`.
    #[error("invalid worker id: {0:?}")]
    InvalidWorkerId(String),

    /// The caller's id does not fit in the declared world.
    #[error("worker id {self_id} is outside a world of size {world_size}")]
    InvalidWorld { self_id: WorkerId, world_size: u32 },

    /// The coordination store failed.
    #[error("store error: {0}")]
    Store(#[from] StoreError),
}

impl From<TypeError> for RegistryError {
    fn from(err: TypeError) -> Self {
        match err {
            TypeError::DuplicateName {
                name,
                existing,
                incoming,
            } => Self::DuplicateName {
                name,
                existing,
                incoming,
            },
            TypeError::MalformedRosterEntry { entry } => Self::MalformedRosterEntry { entry },
            TypeError::InvalidWorkerId(raw) => Self::InvalidWorkerId(raw),
        }
    }
}

/// Convenience type alias for registry operations.
pub type RegistryResult<T> = std::result::Result<T, RegistryError>;
