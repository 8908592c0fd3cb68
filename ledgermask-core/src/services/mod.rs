//! Service layer - business logic orchestration
//!
//! Services coordinate domain logic and port interactions. Each service
//! focuses on a specific use case.

mod demo;
pub mod logging;
pub mod obfuscation;
pub mod persister;
pub mod run;
mod status;

pub use demo::{DemoLayout, DemoService};
pub use logging::{LogEntry, LoggingService};
pub use obfuscation::{ObfuscationOutcome, ObfuscationService, SkipReason, SkippedRecord};
pub use persister::{PersisterConfigService, SwitchOutcome};
pub use run::{verify_counts, RunReport, RunService};
pub use status::{summarize, DateRange, SnapshotSummary, StatusService};
