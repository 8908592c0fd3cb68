//! In-process event sink
//!
//! Keeps events in memory so a caller can inspect what a run reported
//! without a log database (tests, dry runs).

use std::sync::Mutex;

use crate::ports::{EventSink, LogEvent, LogLevel};

#[derive(Debug, Default)]
pub struct MemorySink {
    events: Mutex<Vec<LogEvent>>,
}

impl MemorySink {
    pub fn new() -> Self {
        Self::default()
    }

    /// Copy of every event recorded so far
    pub fn events(&self) -> Vec<LogEvent> {
        self.events.lock().unwrap_or_else(|e| e.into_inner()).clone()
    }

    /// Events at the given level
    pub fn at_level(&self, level: LogLevel) -> Vec<LogEvent> {
        self.events()
            .into_iter()
            .filter(|e| e.level == level)
            .collect()
    }

    pub fn warnings(&self) -> Vec<LogEvent> {
        self.at_level(LogLevel::Warn)
    }

    pub fn errors(&self) -> Vec<LogEvent> {
        self.at_level(LogLevel::Error)
    }

    pub fn len(&self) -> usize {
        self.events.lock().unwrap_or_else(|e| e.into_inner()).len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl EventSink for MemorySink {
    fn record(&self, event: LogEvent) {
        self.events
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .push(event);
    }
}
