//! Adapter implementations
//!
//! Adapters implement the port traits with concrete technologies:
//! - CSV files for the RecordStore port
//! - Thread-local, seeded and zero generators for JitterSource
//! - An in-memory EventSink
//! - Demo data for trial runs

pub mod csv_store;
pub mod demo;
pub mod jitter;
pub mod memory;
