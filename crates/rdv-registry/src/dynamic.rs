//! Roster-based registration for groups whose size is not known upfront.
//!
//! A worker claims its id key with a compare-and-set, then appends
//! `<name>-<id>` to the roster stored at [`ROSTER_KEY`]. The table it gets
//! back holds itself plus every worker already on the roster.
//!
//! # Ordering requirement
//!
//! Reading the roster, checking it and writing it back are three separate
//! store operations. Two workers running them at the same time can both read
//! the same roster and the second write drops the first worker's entry.
//! Callers must make sure dynamic registrations do not overlap, for example
//! by admitting joiners one at a time behind a barrier.

use rdv_store::CoordinationStore;
use rdv_types::{NameTable, Roster, RosterEntry, WorkerId, WorkerName};
use tracing::{debug, info};

use crate::error::{RegistryError, RegistryResult};

/// Store key holding the roster of every registered worker.
pub const ROSTER_KEY: &str = "AllWorkerInfos";

/// Register this worker and collect every worker registered before it.
///
/// Fails with [`RegistryError::IdAlreadyClaimed`] if another name already
/// holds `self_id`, in which case the roster is not touched. Fails with
/// [`RegistryError::DuplicateName`] if the roster already lists `self_name`
/// under another id.
///
/// Registering again with the same id and name returns the current table
/// without appending a second roster entry.
///
/// See the module docs for the ordering callers must guarantee.
pub fn collect_current_names<S>(
    store: &S,
    self_id: WorkerId,
    self_name: &WorkerName,
) -> RegistryResult<NameTable>
where
    S: CoordinationStore + ?Sized,
{
    let id_key = self_id.key();

    let observed = store.compare_set(&id_key, b"", self_name.as_bytes())?;
    if observed != self_name.as_bytes() {
        return Err(RegistryError::IdAlreadyClaimed {
            id: self_id,
            existing: WorkerName::new(observed),
        });
    }
    // Some backends report a successful swap without persisting `desired` as
    // the canonical value, so write it again.
    store.set(&id_key, self_name.as_bytes())?;
    debug!(id = %self_id, name = %self_name, "claimed worker id");

    let mut table = NameTable::new();
    table.insert(self_name.clone(), self_id)?;

    let self_entry = RosterEntry::new(self_name.clone(), self_id);

    let roster = if store.check(&[ROSTER_KEY])? {
        let mut roster = Roster::parse(&store.get(ROSTER_KEY)?)?;
        let mut already_listed = false;
        for entry in roster.entries() {
            if entry.id == self_id {
                if entry.name != *self_name {
                    return Err(RegistryError::IdAlreadyClaimed {
                        id: self_id,
                        existing: entry.name.clone(),
                    });
                }
                already_listed = true;
            }
            table.insert(entry.name.clone(), entry.id)?;
        }
        if already_listed {
            debug!(id = %self_id, "worker already on roster");
            return Ok(table);
        }
        debug!(registered = roster.len(), "joining existing roster");
        roster.push(self_entry);
        roster
    } else {
        debug!("starting new roster");
        let mut roster = Roster::new();
        roster.push(self_entry);
        roster
    };

    store.set(ROSTER_KEY, &roster.encode())?;

    info!(id = %self_id, known = table.len(), "dynamic registration complete");
    Ok(table)
}
