//! Session key derivation.

use std::sync::atomic::{AtomicU64, Ordering};

const PROCESS_COUNT: &str = "PROCESS_COUNT";
const ACTIVE_CALLS: &str = "ACTIVE_CALLS";
const READY: &str = "READY";
const BARRIER_ID: &str = "_ID_";

/// The three store keys owned by one barrier session.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct BarrierKeys {
    pub session: u64,
    /// Incremented once by each arriving worker.
    pub process_count: String,
    /// Accumulates every worker's in-flight call count.
    pub active_calls: String,
    /// Set by the last arrival; everyone blocks on it.
    pub ready: String,
}

impl BarrierKeys {
    pub fn for_session(session: u64) -> Self {
        Self {
            session,
            process_count: format!("{PROCESS_COUNT}{BARRIER_ID}{session}"),
            active_calls: format!("{ACTIVE_CALLS}{BARRIER_ID}{session}"),
            ready: format!("{READY}{BARRIER_ID}{session}"),
        }
    }
}

/// Monotonic session counter owned by one coordinating process.
///
/// Starts at 0 and is incremented before each session, so the first session
/// is 1. Safe to share between threads of the same process.
#[derive(Debug, Default)]
pub struct BarrierCounter {
    last: AtomicU64,
}

impl BarrierCounter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Allocate the next session and derive its keys.
    pub fn next_keys(&self) -> BarrierKeys {
        let session = self.last.fetch_add(1, Ordering::SeqCst) + 1;
        BarrierKeys::for_session(session)
    }

    /// Number of sessions allocated so far.
    pub fn sessions(&self) -> u64 {
        self.last.load(Ordering::SeqCst)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;
    use std::sync::Arc;
    use std::thread;

    #[test]
    fn keys_concatenate_prefix_tag_and_session() {
        let keys = BarrierKeys::for_session(3);
        assert_eq!(keys.process_count, "PROCESS_COUNT_ID_3");
        assert_eq!(keys.active_calls, "ACTIVE_CALLS_ID_3");
        assert_eq!(keys.ready, "READY_ID_3");
    }

    #[test]
    fn first_session_is_one() {
        let counter = BarrierCounter::new();
        assert_eq!(counter.sessions(), 0);
        assert_eq!(counter.next_keys().session, 1);
        assert_eq!(counter.next_keys().session, 2);
        assert_eq!(counter.sessions(), 2);
    }

    #[test]
    fn independent_counters_derive_matching_keys() {
        let a = BarrierCounter::new();
        let b = BarrierCounter::new();
        assert_eq!(a.next_keys(), b.next_keys());
        assert_eq!(a.next_keys(), b.next_keys());
    }

    #[test]
    fn concurrent_allocation_never_repeats() {
        let counter = Arc::new(BarrierCounter::new());
        let handles: Vec<_> = (0..4)
            .map(|_| {
                let counter = Arc::clone(&counter);
                thread::spawn(move || (0..50).map(|_| counter.next_keys().session).collect::<Vec<_>>())
            })
            .collect();

        let mut seen = HashSet::new();
        for h in handles {
            for session in h.join().unwrap() {
                assert!(seen.insert(session), "session {session} allocated twice");
            }
        }
        assert_eq!(seen.len(), 200);
    }
}
