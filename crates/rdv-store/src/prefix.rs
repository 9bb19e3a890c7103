//! Key namespacing over another store.
//!
//! Several independent groups can share one backing store as long as each
//! coordinates under its own prefix. [`PrefixStore`] rewrites every key to
//! `<prefix>/<key>` before delegating, so worker `0`'s name slot in group
//! `rpc` lives at `rpc/0`.

use crate::error::StoreResult;
use crate::traits::CoordinationStore;

/// A [`CoordinationStore`] that namespaces every key under a fixed prefix.
#[derive(Debug, Clone)]
pub struct PrefixStore<S> {
    prefix: String,
    inner: S,
}

impl<S: CoordinationStore> PrefixStore<S> {
    pub fn new(prefix: impl Into<String>, inner: S) -> Self {
        Self {
            prefix: prefix.into(),
            inner,
        }
    }

    pub fn prefix(&self) -> &str {
        &self.prefix
    }

    pub fn inner(&self) -> &S {
        &self.inner
    }

    pub fn into_inner(self) -> S {
        self.inner
    }

    fn key(&self, key: &str) -> String {
        format!("{}/{}", self.prefix, key)
    }

    fn keys(&self, keys: &[&str]) -> Vec<String> {
        keys.iter().map(|k| self.key(k)).collect()
    }
}

impl<S: CoordinationStore> CoordinationStore for PrefixStore<S> {
    fn set(&self, key: &str, value: &[u8]) -> StoreResult<()> {
        self.inner.set(&self.key(key), value)
    }

    fn get(&self, key: &str) -> StoreResult<Vec<u8>> {
        self.inner.get(&self.key(key))
    }

    fn compare_set(&self, key: &str, expected: &[u8], desired: &[u8]) -> StoreResult<Vec<u8>> {
        self.inner.compare_set(&self.key(key), expected, desired)
    }

    fn add(&self, key: &str, delta: i64) -> StoreResult<i64> {
        self.inner.add(&self.key(key), delta)
    }

    fn check(&self, keys: &[&str]) -> StoreResult<bool> {
        let owned = self.keys(keys);
        let refs: Vec<&str> = owned.iter().map(String::as_str).collect();
        self.inner.check(&refs)
    }

    fn wait(&self, keys: &[&str]) -> StoreResult<()> {
        let owned = self.keys(keys);
        let refs: Vec<&str> = owned.iter().map(String::as_str).collect();
        self.inner.wait(&refs)
    }
}
