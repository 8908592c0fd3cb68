//! Port definitions (hexagonal architecture)
//!
//! Ports define the interfaces for external dependencies. The engine
//! depends only on these traits, not on concrete implementations.

mod event_sink;
mod jitter;
mod record_store;

pub use event_sink::{EventSink, LogEvent, LogLevel, NullSink};
pub use jitter::{JitterSource, MAX_CENT_SHIFT, MAX_DAY_SHIFT};
pub use record_store::{RecordStore, SaveSummary};
