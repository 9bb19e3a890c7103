//! Store-free name uniqueness checking.
//!
//! Both registration modes build their tables through
//! [`NameTable::insert`], so the rule enforced here is exactly the rule they
//! enforce: a name may map to one id only.

use rdv_types::{NameTable, WorkerId, WorkerName};

use crate::error::RegistryResult;

/// Build a [`NameTable`] from `(name, id)` pairs, failing on the first name
/// that appears under two different ids.
///
/// Repeated identical pairs are accepted. The error names the id seen first
/// as `existing` and the later one as `incoming`.
///
/// # Examples
///
/// ```
/// use rdv_registry::check_unique_names;
/// use rdv_types::{WorkerId, WorkerName};
///
/// let ok = check_unique_names([
///     (WorkerName::from("ps"), WorkerId::new(0)),
///     (WorkerName::from("trainer"), WorkerId::new(1)),
/// ]);
/// assert_eq!(ok.unwrap().len(), 2);
///
/// let clash = check_unique_names([
///     (WorkerName::from("ps"), WorkerId::new(0)),
///     (WorkerName::from("ps"), WorkerId::new(1)),
/// ]);
/// assert!(clash.is_err());
/// ```
pub fn check_unique_names<I>(pairs: I) -> RegistryResult<NameTable>
where
    I: IntoIterator<Item = (WorkerName, WorkerId)>,
{
    let iter = pairs.into_iter();
    let mut table = NameTable::with_capacity(iter.size_hint().0);
    for (name, id) in iter {
        table.insert(name, id)?;
    }
    Ok(table)
}
