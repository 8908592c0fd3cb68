//! CLI command implementations

pub mod demo;
pub mod integ;
pub mod logs;
pub mod run;
pub mod status;

use std::path::PathBuf;

use anyhow::{Context, Result};
use ledgermask_core::{LedgerMaskContext, LogEvent, LoggingService};

/// Get the ledgermask directory from environment or default
pub fn get_ledgermask_dir() -> Result<PathBuf> {
    if let Ok(dir) = std::env::var("LEDGERMASK_DIR") {
        return Ok(PathBuf::from(dir));
    }
    dirs::home_dir()
        .map(|home| home.join(".ledgermask"))
        .context("Could not find home directory; set LEDGERMASK_DIR")
}

/// Get the logging service for CLI operations
///
/// Returns None if logging fails to initialize (shouldn't block operations)
pub fn get_logger() -> Option<LoggingService> {
    let dir = get_ledgermask_dir().ok()?;
    std::fs::create_dir_all(&dir).ok()?;
    LoggingService::new(&dir, env!("CARGO_PKG_VERSION")).ok()
}

/// Log an event, ignoring any errors (logging should never break the app)
pub fn log_event(logger: &Option<LoggingService>, event: LogEvent) {
    if let Some(l) = logger {
        let _ = l.log(event);
    }
}

/// Get or create the ledgermask context
pub fn get_context() -> Result<LedgerMaskContext> {
    let dir = get_ledgermask_dir()?;

    std::fs::create_dir_all(&dir)
        .with_context(|| format!("Failed to create ledgermask directory: {:?}", dir))?;

    LedgerMaskContext::new(&dir, env!("CARGO_PKG_VERSION"))
        .context("Failed to initialize ledgermask context")
}
