use rdv_store::CoordinationStore;
use tracing::{debug, info};

use crate::error::{BarrierError, BarrierResult};
use crate::keys::{BarrierCounter, BarrierKeys};

/// Reusable group barrier that sums each worker's in-flight call count.
///
/// One instance represents one coordinating process. It owns the session
/// counter, so every process in the group must hold its own instance and
/// call [`sync_call_count`](Self::sync_call_count) the same number of times.
#[derive(Debug, Default)]
pub struct CallCountBarrier {
    counter: BarrierCounter,
}

impl CallCountBarrier {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of sessions this process has entered.
    pub fn sessions(&self) -> u64 {
        self.counter.sessions()
    }

    /// Block until all `world_size` workers have called this for the same
    /// session, then return the sum of their `active_calls`.
    ///
    /// Sessions are never cleaned up; their keys remain in the store.
    pub fn sync_call_count<S>(
        &self,
        store: &S,
        world_size: u32,
        active_calls: i64,
    ) -> BarrierResult<i64>
    where
        S: CoordinationStore + ?Sized,
    {
        if world_size == 0 {
            return Err(BarrierError::InvalidWorldSize(world_size));
        }
        let keys = self.counter.next_keys();
        sync_session(store, &keys, world_size, active_calls)
    }
}

fn sync_session<S>(
    store: &S,
    keys: &BarrierKeys,
    world_size: u32,
    active_calls: i64,
) -> BarrierResult<i64>
where
    S: CoordinationStore + ?Sized,
{
    store.add(&keys.active_calls, active_calls)?;
    let arrived = store.add(&keys.process_count, 1)?;
    debug!(session = keys.session, arrived, world_size, active_calls, "arrived at barrier");

    if arrived == i64::from(world_size) {
        store.set(&keys.ready, b"")?;
        debug!(session = keys.session, "last arrival released barrier");
    }

    store.wait(&[keys.ready.as_str()])?;

    // Re-read: contributions may have landed after our own add returned.
    let raw = store.get(&keys.active_calls)?;
    let total = std::str::from_utf8(&raw)
        .ok()
        .and_then(|s| s.parse::<i64>().ok())
        .ok_or_else(|| BarrierError::ProtocolCorruption {
            key: keys.active_calls.clone(),
            raw: String::from_utf8_lossy(&raw).into_owned(),
        })?;

    info!(session = keys.session, total, "barrier complete");
    Ok(total)
}
