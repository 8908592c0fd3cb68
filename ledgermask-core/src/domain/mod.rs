//! Core domain entities
//!
//! All record types are defined here. These are pure data structures
//! with no I/O or external dependencies.

mod account;
mod owner;
mod register;
pub mod result;
mod snapshot;

pub use account::{Account, AccountKind};
pub use owner::Owner;
pub use register::RegisterEntry;
pub use snapshot::{RecordCounts, RecordKind, RecordSnapshot};
