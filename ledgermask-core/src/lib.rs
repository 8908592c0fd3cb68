//! ledgermask core - masks financial ledger records for non-production use
//!
//! This crate follows a hexagonal layout:
//!
//! - **domain**: Record types (Owner, Account, RegisterEntry, RecordSnapshot)
//! - **ports**: Trait definitions for collaborators (RecordStore, JitterSource, EventSink)
//! - **services**: The obfuscation engine and the run pipeline around it
//! - **adapters**: Concrete implementations (CSV files, random sources, demo data)

pub mod adapters;
pub mod config;
pub mod domain;
mod log_migrations;
pub mod ports;
pub mod services;

use std::path::{Path, PathBuf};
use std::sync::Arc;

use anyhow::Result;

use config::Config;

// Re-export commonly used types at crate root
pub use adapters::jitter::{SeededJitter, ThreadJitter, ZeroJitter};
pub use adapters::memory::MemorySink;
pub use domain::result::Error;
pub use domain::{Account, AccountKind, Owner, RecordCounts, RecordKind, RecordSnapshot, RegisterEntry};
pub use ports::{EventSink, JitterSource, LogEvent, LogLevel, NullSink, RecordStore};
pub use services::{LogEntry, LoggingService, ObfuscationService, RunService};

/// Main context for ledgermask operations
///
/// Holds the run configuration and the persistent event log, scoped to
/// one ledgermask directory. The event log is optional: a directory whose
/// log database cannot be opened still runs, without persistent events.
pub struct LedgerMaskContext {
    pub dir: PathBuf,
    pub config: Config,
    pub logging: Option<Arc<LoggingService>>,
}

impl LedgerMaskContext {
    pub fn new(ledgermask_dir: &Path, app_version: &str) -> Result<Self> {
        let config = Config::load(ledgermask_dir)?;
        let logging = match LoggingService::new(ledgermask_dir, app_version) {
            Ok(service) => Some(Arc::new(service)),
            Err(e) => {
                tracing::warn!(error = %e, "event log unavailable");
                None
            }
        };

        Ok(Self {
            dir: ledgermask_dir.to_path_buf(),
            config,
            logging,
        })
    }

    /// Where events go
    pub fn sink(&self) -> Arc<dyn EventSink> {
        match &self.logging {
            Some(logging) => Arc::clone(logging) as Arc<dyn EventSink>,
            None => Arc::new(NullSink),
        }
    }

    /// Where a run's events go; dry runs stay out of the event log
    pub fn run_sink(&self, dry_run: bool) -> Arc<dyn EventSink> {
        if dry_run {
            Arc::new(MemorySink::new())
        } else {
            self.sink()
        }
    }

    /// Run service for `config`, reporting to the sink for `dry_run`
    pub fn run_service(&self, config: Config, dry_run: bool) -> RunService {
        RunService::new(config, self.run_sink(dry_run))
    }
}
