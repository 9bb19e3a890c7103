use std::sync::Arc;

use crate::error::StoreResult;

/// Linearizable key-value store used as the only channel between workers.
///
/// All implementations must satisfy these invariants:
/// - A value written by `set`, `compare_set` or `add` is visible to every
///   subsequent operation by any participant.
/// - `get` and `wait` suspend the caller until their keys exist, and then
///   observe a value no older than the write that satisfied them.
/// - `compare_set` and `add` are atomic with respect to every other
///   operation on the same key.
/// - The store never interprets values, except that `add` reads and writes
///   base-10 integer text.
pub trait CoordinationStore: Send + Sync {
    /// Unconditionally overwrite `key`.
    fn set(&self, key: &str, value: &[u8]) -> StoreResult<()>;

    /// Read `key`, blocking until it has been set at least once.
    fn get(&self, key: &str) -> StoreResult<Vec<u8>>;

    /// Atomically replace `key` with `desired` if its current value equals
    /// `expected`. An absent key matches an empty `expected`.
    ///
    /// Returns the value the key holds afterwards. Callers detect a failed
    /// precondition by comparing the result with `desired`.
    fn compare_set(&self, key: &str, expected: &[u8], desired: &[u8]) -> StoreResult<Vec<u8>>;

    /// Atomically add `delta` to the integer at `key` (absent counts as 0)
    /// and return the new value.
    fn add(&self, key: &str, delta: i64) -> StoreResult<i64>;

    /// Return whether every key in `keys` exists. Never blocks.
    fn check(&self, keys: &[&str]) -> StoreResult<bool>;

    /// Block until every key in `keys` exists.
    fn wait(&self, keys: &[&str]) -> StoreResult<()>;
}

impl<S: CoordinationStore + ?Sized> CoordinationStore for Arc<S> {
    fn set(&self, key: &str, value: &[u8]) -> StoreResult<()> {
        (**self).set(key, value)
    }

    fn get(&self, key: &str) -> StoreResult<Vec<u8>> {
        (**self).get(key)
    }

    fn compare_set(&self, key: &str, expected: &[u8], desired: &[u8]) -> StoreResult<Vec<u8>> {
        (**self).compare_set(key, expected, desired)
    }

    fn add(&self, key: &str, delta: i64) -> StoreResult<i64> {
        (**self).add(key, delta)
    }

    fn check(&self, keys: &[&str]) -> StoreResult<bool> {
        (**self).check(keys)
    }

    fn wait(&self, keys: &[&str]) -> StoreResult<()> {
        (**self).wait(keys)
    }
}
