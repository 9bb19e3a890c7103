//! Group barrier with call-count aggregation.
//!
//! Each worker calls [`CallCountBarrier::sync_call_count`] at the same
//! logical checkpoint, passing the number of remote calls it still has in
//! flight. The call blocks until every worker in the group has arrived and
//! returns the sum of all contributions. The only medium is the shared
//! coordination store.
//!
//! Every call opens a new session whose three store keys are derived from a
//! per-instance counter (see [`BarrierKeys`]). Workers therefore stay in step
//! only if they call the barrier the same number of times, in the same order.

pub mod barrier;
pub mod error;
pub mod keys;

pub use barrier::CallCountBarrier;
pub use error::{BarrierError, BarrierResult};
pub use keys::{BarrierCounter, BarrierKeys};
