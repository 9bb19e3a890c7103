//! High-level rendezvous agent.
//!
//! An [`Agent`] is one worker's handle on its group: it knows the worker's
//! identity, talks to the shared store under the group's prefix, registers
//! the worker's name and runs call-count barriers. This is the entry point
//! for applications embedding rendezvous.

pub mod agent;
pub mod config;
pub mod error;

pub use agent::Agent;
pub use config::AgentConfig;
pub use error::{AgentError, AgentResult};

// Re-export key types
pub use rdv_store::{CoordinationStore, InMemoryStore, PrefixStore, StoreConfig};
pub use rdv_types::{NameTable, WorkerId, WorkerName};
