//! Fixed-membership registration.

use rdv_store::CoordinationStore;
use rdv_types::{NameTable, WorkerId, WorkerName};
use tracing::{debug, info};

use crate::error::{RegistryError, RegistryResult};

/// Exchange names with every worker in `[0, world_size)`.
///
/// Publishes `self_name` under this worker's id key, then reads every other
/// worker's key. Each read blocks until that worker has published, so this
/// call returns only once the whole group has arrived (or the store gives
/// up). Every worker that completes gets the same table.
///
/// A name bound to two ids fails the call with
/// [`RegistryError::DuplicateName`], even when neither id is the caller's.
pub fn collect_names<S>(
    store: &S,
    self_id: WorkerId,
    self_name: &WorkerName,
    world_size: u32,
) -> RegistryResult<NameTable>
where
    S: CoordinationStore + ?Sized,
{
    if self_id.get() >= world_size {
        return Err(RegistryError::InvalidWorld {
            self_id,
            world_size,
        });
    }

    store.set(&self_id.key(), self_name.as_bytes())?;
    debug!(id = %self_id, name = %self_name, "published worker name");

    let mut table = NameTable::with_capacity(world_size as usize);
    table.insert(self_name.clone(), self_id)?;

    for peer in (0..world_size).map(WorkerId::new) {
        if peer == self_id {
            continue;
        }
        let name = WorkerName::new(store.get(&peer.key())?);
        debug!(id = %peer, name = %name, "collected peer name");
        table.insert(name, peer)?;
    }

    info!(id = %self_id, world_size, "name collection complete");
    Ok(table)
}
