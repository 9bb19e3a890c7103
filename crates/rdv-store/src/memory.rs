use std::collections::HashMap;
use std::sync::{Condvar, Mutex, MutexGuard};
use std::time::Instant;

use tracing::trace;

use crate::config::StoreConfig;
use crate::error::{StoreError, StoreResult};
use crate::traits::CoordinationStore;

type Entries = HashMap<String, Vec<u8>>;

/// In-memory coordination store.
///
/// Intended for tests and for simulating a worker group inside a single
/// process. Every write notifies a condition variable so that threads
/// blocked in `get` or `wait` re-check their keys. Values are cloned on read.
pub struct InMemoryStore {
    entries: Mutex<Entries>,
    changed: Condvar,
    config: StoreConfig,
}

impl InMemoryStore {
    /// Create a new empty store whose blocking calls never time out.
    pub fn new() -> Self {
        Self::with_config(StoreConfig::default())
    }

    pub fn with_config(config: StoreConfig) -> Self {
        Self {
            entries: Mutex::new(HashMap::new()),
            changed: Condvar::new(),
            config,
        }
    }

    pub fn config(&self) -> &StoreConfig {
        &self.config
    }

    /// Number of keys currently stored.
    pub fn len(&self) -> StoreResult<usize> {
        Ok(self.lock()?.len())
    }

    /// Returns `true` if the store holds no keys.
    pub fn is_empty(&self) -> StoreResult<bool> {
        Ok(self.lock()?.is_empty())
    }

    /// Return a sorted list of all keys in the store.
    pub fn keys(&self) -> StoreResult<Vec<String>> {
        let mut keys: Vec<String> = self.lock()?.keys().cloned().collect();
        keys.sort();
        Ok(keys)
    }

    /// Non-blocking read. Returns `None` if the key was never set.
    pub fn peek(&self, key: &str) -> StoreResult<Option<Vec<u8>>> {
        Ok(self.lock()?.get(key).cloned())
    }

    fn lock(&self) -> StoreResult<MutexGuard<'_, Entries>> {
        self.entries
            .lock()
            .map_err(|e| StoreError::LockPoisoned(e.to_string()))
    }

    fn write_locked(&self, entries: &mut Entries, key: &str, value: Vec<u8>) {
        entries.insert(key.to_string(), value);
        self.changed.notify_all();
    }

    /// Block until every key exists, returning the guard that observed them.
    fn block_until<'a>(&'a self, keys: &[&str]) -> StoreResult<MutexGuard<'a, Entries>> {
        let start = Instant::now();
        let mut entries = self.lock()?;
        loop {
            if keys.iter().all(|k| entries.contains_key(*k)) {
                return Ok(entries);
            }
            trace!(?keys, "blocking on missing keys");
            entries = match self.config.timeout() {
                None => self
                    .changed
                    .wait(entries)
                    .map_err(|e| StoreError::LockPoisoned(e.to_string()))?,
                Some(timeout) => {
                    let elapsed = start.elapsed();
                    if elapsed >= timeout {
                        return Err(StoreError::Timeout {
                            keys: keys.iter().map(|k| k.to_string()).collect(),
                            waited_ms: elapsed.as_millis() as u64,
                        });
                    }
                    self.changed
                        .wait_timeout(entries, timeout - elapsed)
                        .map_err(|e| StoreError::LockPoisoned(e.to_string()))?
                        .0
                }
            };
        }
    }
}

impl Default for InMemoryStore {
    fn default() -> Self {
        Self::new()
    }
}

impl CoordinationStore for InMemoryStore {
    fn set(&self, key: &str, value: &[u8]) -> StoreResult<()> {
        let mut entries = self.lock()?;
        self.write_locked(&mut entries, key, value.to_vec());
        Ok(())
    }

    fn get(&self, key: &str) -> StoreResult<Vec<u8>> {
        let entries = self.block_until(&[key])?;
        Ok(entries.get(key).cloned().unwrap_or_default())
    }

    fn compare_set(&self, key: &str, expected: &[u8], desired: &[u8]) -> StoreResult<Vec<u8>> {
        let mut entries = self.lock()?;
        match entries.get(key) {
            // An absent key only matches an empty expectation; otherwise the
            // caller gets its own expectation back, which differs from
            // `desired` whenever the swap was meaningful.
            None if !expected.is_empty() => Ok(expected.to_vec()),
            Some(current) if current.as_slice() != expected => Ok(current.clone()),
            _ => {
                self.write_locked(&mut entries, key, desired.to_vec());
                Ok(desired.to_vec())
            }
        }
    }

    fn add(&self, key: &str, delta: i64) -> StoreResult<i64> {
        let mut entries = self.lock()?;
        let current = match entries.get(key) {
            None => 0,
            Some(raw) => std::str::from_utf8(raw)
                .ok()
                .and_then(|s| s.parse::<i64>().ok())
                .ok_or_else(|| StoreError::NotAnInteger {
                    key: key.to_string(),
                })?,
        };
        let next = current.checked_add(delta).ok_or_else(|| StoreError::Overflow {
            key: key.to_string(),
            delta,
        })?;
        self.write_locked(&mut entries, key, next.to_string().into_bytes());
        Ok(next)
    }

    fn check(&self, keys: &[&str]) -> StoreResult<bool> {
        let entries = self.lock()?;
        Ok(keys.iter().all(|k| entries.contains_key(*k)))
    }

    fn wait(&self, keys: &[&str]) -> StoreResult<()> {
        self.block_until(keys).map(|_| ())
    }
}

impl std::fmt::Debug for InMemoryStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let count = self.entries.lock().map(|e| e.len()).ok();
        f.debug_struct("InMemoryStore")
            .field("key_count", &count)
            .field("config", &self.config)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;
    use std::thread;
    use std::time::Duration;

    // -----------------------------------------------------------------------
    // set / get
    // -----------------------------------------------------------------------

    #[test]
    fn set_then_get() {
        let store = InMemoryStore::new();
        store.set("k", b"v").unwrap();
        assert_eq!(store.get("k").unwrap(), b"v".to_vec());
    }

    #[test]
    fn set_overwrites() {
        let store = InMemoryStore::new();
        store.set("k", b"one").unwrap();
        store.set("k", b"two").unwrap();
        assert_eq!(store.get("k").unwrap(), b"two".to_vec());
        assert_eq!(store.len().unwrap(), 1);
    }

    #[test]
    fn empty_value_counts_as_present() {
        let store = InMemoryStore::new();
        store.set("ready", b"").unwrap();
        assert!(store.check(&["ready"]).unwrap());
        assert_eq!(store.get("ready").unwrap(), Vec::<u8>::new());
    }

    #[test]
    fn get_blocks_until_set() {
        let store = Arc::new(InMemoryStore::new());
        let reader = {
            let store = Arc::clone(&store);
            thread::spawn(move || store.get("late").unwrap())
        };
        thread::sleep(Duration::from_millis(20));
        store.set("late", b"arrived").unwrap();
        assert_eq!(reader.join().unwrap(), b"arrived".to_vec());
    }

    #[test]
    fn get_times_out_when_configured() {
        let store = InMemoryStore::with_config(StoreConfig::with_timeout(Duration::from_millis(30)));
        let err = store.get("never").unwrap_err();
        match err {
            StoreError::Timeout { keys, waited_ms } => {
                assert_eq!(keys, vec!["never".to_string()]);
                assert!(waited_ms >= 30);
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    // -----------------------------------------------------------------------
    // compare_set
    // -----------------------------------------------------------------------

    #[test]
    fn compare_set_on_absent_key_with_empty_expected_writes() {
        let store = InMemoryStore::new();
        let result = store.compare_set("id", b"", b"alice").unwrap();
        assert_eq!(result, b"alice".to_vec());
        assert_eq!(store.peek("id").unwrap(), Some(b"alice".to_vec()));
    }

    #[test]
    fn compare_set_on_absent_key_with_nonempty_expected_is_noop() {
        let store = InMemoryStore::new();
        let result = store.compare_set("id", b"bob", b"alice").unwrap();
        assert_eq!(result, b"bob".to_vec());
        assert_eq!(store.peek("id").unwrap(), None);
    }

    #[test]
    fn compare_set_mismatch_returns_current() {
        let store = InMemoryStore::new();
        store.set("id", b"bob").unwrap();
        let result = store.compare_set("id", b"", b"alice").unwrap();
        assert_eq!(result, b"bob".to_vec());
        assert_eq!(store.peek("id").unwrap(), Some(b"bob".to_vec()));
    }

    #[test]
    fn compare_set_match_replaces() {
        let store = InMemoryStore::new();
        store.set("id", b"bob").unwrap();
        let result = store.compare_set("id", b"bob", b"alice").unwrap();
        assert_eq!(result, b"alice".to_vec());
    }

    #[test]
    fn compare_set_wakes_waiters() {
        let store = Arc::new(InMemoryStore::new());
        let waiter = {
            let store = Arc::clone(&store);
            thread::spawn(move || store.wait(&["slot"]))
        };
        thread::sleep(Duration::from_millis(20));
        store.compare_set("slot", b"", b"x").unwrap();
        waiter.join().unwrap().unwrap();
    }

    // -----------------------------------------------------------------------
    // add
    // -----------------------------------------------------------------------

    #[test]
    fn add_initializes_to_zero() {
        let store = InMemoryStore::new();
        assert_eq!(store.add("n", 5).unwrap(), 5);
        assert_eq!(store.add("n", -2).unwrap(), 3);
        assert_eq!(store.get("n").unwrap(), b"3".to_vec());
    }

    #[test]
    fn add_on_non_integer_fails() {
        let store = InMemoryStore::new();
        store.set("n", b"abc").unwrap();
        assert!(matches!(
            store.add("n", 1),
            Err(StoreError::NotAnInteger { key }) if key == "n"
        ));
    }

    #[test]
    fn add_overflow_fails() {
        let store = InMemoryStore::new();
        store.add("n", i64::MAX).unwrap();
        assert!(matches!(store.add("n", 1), Err(StoreError::Overflow { .. })));
    }

    #[test]
    fn concurrent_adds_are_atomic() {
        let store = Arc::new(InMemoryStore::new());
        let handles: Vec<_> = (0..8)
            .map(|_| {
                let store = Arc::clone(&store);
                thread::spawn(move || {
                    for _ in 0..100 {
                        store.add("counter", 1).unwrap();
                    }
                })
            })
            .collect();
        for h in handles {
            h.join().unwrap();
        }
        assert_eq!(store.get("counter").unwrap(), b"800".to_vec());
    }

    // -----------------------------------------------------------------------
    // check / wait
    // -----------------------------------------------------------------------

    #[test]
    fn check_requires_all_keys() {
        let store = InMemoryStore::new();
        store.set("a", b"1").unwrap();
        assert!(store.check(&["a"]).unwrap());
        assert!(!store.check(&["a", "b"]).unwrap());
        assert!(store.check(&[]).unwrap());
    }

    #[test]
    fn wait_blocks_until_all_keys_exist() {
        let store = Arc::new(InMemoryStore::new());
        let waiter = {
            let store = Arc::clone(&store);
            thread::spawn(move || store.wait(&["a", "b"]))
        };
        store.set("a", b"").unwrap();
        thread::sleep(Duration::from_millis(20));
        assert!(!waiter.is_finished());
        store.set("b", b"").unwrap();
        waiter.join().unwrap().unwrap();
    }

    #[test]
    fn keys_are_sorted() {
        let store = InMemoryStore::new();
        store.set("b", b"").unwrap();
        store.set("a", b"").unwrap();
        assert_eq!(store.keys().unwrap(), vec!["a".to_string(), "b".to_string()]);
    }
}
