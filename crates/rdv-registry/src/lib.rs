//! Worker name rendezvous.
//!
//! Every worker in a group knows its own [`WorkerId`] and [`WorkerName`] but
//! nothing about its peers. Registration publishes the local pair to the
//! shared store and reads back everyone else's, producing a [`NameTable`]
//! that is identical on every worker once all of them have registered.
//!
//! # Modes
//!
//! - [`collect_names`] — fixed membership. The world size is known, every
//!   worker owns the key named after its id, and every worker blocks until
//!   all other keys are published.
//! - [`collect_current_names`] — dynamic membership. No world size; workers
//!   claim their id with a compare-and-set and append themselves to a shared
//!   roster. Returns whoever registered before the caller.
//!
//! # Modules
//!
//! - [`error`] — [`RegistryError`] and its result alias
//! - [`validate`] — store-free uniqueness checking ([`check_unique_names`])
//! - [`fixed`] — fixed-membership registration
//! - [`dynamic`] — roster-based registration
//!
//! [`WorkerId`]: rdv_types::WorkerId
//! [`WorkerName`]: rdv_types::WorkerName
//! [`NameTable`]: rdv_types::NameTable

pub mod dynamic;
pub mod error;
pub mod fixed;
pub mod validate;

pub use dynamic::{collect_current_names, ROSTER_KEY};
pub use error::{RegistryError, RegistryResult};
pub use fixed::collect_names;
pub use validate::check_unique_names;
