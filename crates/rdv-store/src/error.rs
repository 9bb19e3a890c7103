/// Errors from coordination store operations.
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    /// A blocking read or wait gave up before its keys appeared.
    #[error("timed out after {waited_ms}ms waiting for keys {keys:?}")]
    Timeout { keys: Vec<String>, waited_ms: u64 },

    /// `add` was applied to a key whose value is not a base-10 integer.
    #[error("value at {key:?} is not an integer")]
    NotAnInteger { key: String },

    /// `add` would overflow the stored integer.
    #[error("integer overflow adding {delta} at {key:?}")]
    Overflow { key: String, delta: i64 },

    /// A lock guarding backend state was poisoned by a panicking thread.
    #[error("store lock poisoned: {0}")]
    LockPoisoned(String),

    /// The backend could not be reached or refused the operation.
    #[error("store backend error: {0}")]
    Backend(String),
}

/// Result alias for store operations.
pub type StoreResult<T> = Result<T, StoreError>;
