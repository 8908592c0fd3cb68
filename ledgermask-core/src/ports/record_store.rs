//! Record store port - snapshot persistence abstraction

use serde::Serialize;

use crate::domain::result::Result;
use crate::domain::RecordSnapshot;

/// What a save wrote
#[derive(Debug, Clone, Default, Serialize)]
pub struct SaveSummary {
    /// Files (or tables) written, in write order
    pub targets: Vec<String>,
    pub owners: usize,
    pub checking: usize,
    pub savings: usize,
    pub register_entries: usize,
    /// Accounts with an unrecognized kind, which have nowhere to go
    pub unwritable: usize,
}

/// Snapshot persistence
///
/// Implementations (adapters) materialize a whole snapshot at once; there
/// is no streaming contract.
pub trait RecordStore: Send + Sync {
    /// Load every owner, account and register entry
    fn load(&self) -> Result<RecordSnapshot>;

    /// Persist the three collections, accounts grouped by kind
    fn save(&self, snapshot: &RecordSnapshot) -> Result<SaveSummary>;
}
