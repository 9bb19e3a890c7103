//! Foundation types for worker rendezvous.
//!
//! Workers in a group have no direct channel to one another; they meet
//! through a shared coordination store. This crate holds the values they
//! exchange there. Every other `rdv` crate depends on `rdv-types`.
//!
//! # Key Types
//!
//! - [`WorkerId`] — Externally assigned integer identity, unique in a group
//! - [`WorkerName`] — Opaque, human-chosen name compared byte-for-byte
//! - [`NameTable`] — One worker's local `name → id` view, uniqueness-checked
//! - [`RosterEntry`] / [`Roster`] — Append-only textual record used by
//!   dynamic registration

pub mod error;
pub mod roster;
pub mod table;
pub mod worker;

pub use error::TypeError;
pub use roster::{Roster, RosterEntry, ENTRY_DELIMITER, FIELD_DELIMITER};
pub use table::NameTable;
pub use worker::{WorkerId, WorkerName};
