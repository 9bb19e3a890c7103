use thiserror::Error;

use crate::worker::{WorkerId, WorkerName};

/// Errors produced by type operations.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum TypeError {
    #[error("worker name {name} is not unique: workers {existing} and {incoming} share the same name")]
    DuplicateName {
        name: WorkerName,
        existing: WorkerId,
        incoming: WorkerId,
    },

    #[error("malformed roster entry: {entry:?}")]
    MalformedRosterEntry { entry: String },

    #[error("invalid worker id: {0:?}")]
    InvalidWorkerId(String),
}
