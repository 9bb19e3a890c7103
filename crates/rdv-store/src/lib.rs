//! Coordination store capability for worker rendezvous.
//!
//! Workers never talk to each other directly. Everything they share goes
//! through a linearizable key-value store that offers blocking reads and a
//! handful of atomic primitives. This crate defines that capability as the
//! [`CoordinationStore`] trait and ships the backends used in tests and
//! single-process simulations.
//!
//! # Storage Backends
//!
//! - [`InMemoryStore`] -- `HashMap` behind a mutex, with a condition variable
//!   that wakes blocked readers on every write
//! - [`PrefixStore`] -- namespaces every key of an inner store under a prefix
//!
//! # Design Rules
//!
//! 1. Keys are UTF-8 strings; values are opaque bytes.
//! 2. Integers written by [`CoordinationStore::add`] are base-10 text.
//! 3. `get` and `wait` block until their keys exist. Nothing else blocks.
//! 4. Keys are never deleted; a session's keys outlive the session.
//! 5. Store failures are propagated to callers unchanged.

pub mod config;
pub mod error;
pub mod memory;
pub mod prefix;
pub mod traits;

pub use config::StoreConfig;
pub use error::{StoreError, StoreResult};
pub use memory::InMemoryStore;
pub use prefix::PrefixStore;
pub use traits::CoordinationStore;
