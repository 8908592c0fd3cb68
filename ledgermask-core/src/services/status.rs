//! Status service - record snapshot summaries

use std::sync::Arc;

use rust_decimal::Decimal;
use serde::Serialize;

use crate::domain::result::Result;
use crate::domain::{AccountKind, RecordSnapshot};
use crate::ports::RecordStore;

/// Status service for snapshot summaries
pub struct StatusService {
    store: Arc<dyn RecordStore>,
}

impl StatusService {
    pub fn new(store: Arc<dyn RecordStore>) -> Self {
        Self { store }
    }

    /// Load the store's snapshot and summarize it
    pub fn get_status(&self) -> Result<SnapshotSummary> {
        let snapshot = self.store.load()?;
        Ok(summarize(&snapshot))
    }
}

/// Counts, balances and date range of a snapshot
pub fn summarize(snapshot: &RecordSnapshot) -> SnapshotSummary {
    let mut summary = SnapshotSummary {
        total_owners: snapshot.owners.len(),
        total_accounts: snapshot.accounts.len(),
        total_register_entries: snapshot.register_entries.len(),
        ..SnapshotSummary::default()
    };

    for account in &snapshot.accounts {
        match account.kind {
            AccountKind::Checking { .. } => summary.checking_accounts += 1,
            AccountKind::Savings { .. } => summary.savings_accounts += 1,
            AccountKind::Unrecognized { .. } => summary.unrecognized_accounts += 1,
        }
        summary.total_balance += account.balance;
    }

    let earliest = snapshot.register_entries.iter().map(|e| e.date).min();
    let latest = snapshot.register_entries.iter().map(|e| e.date).max();
    summary.date_range = DateRange {
        earliest: earliest.map(|d| d.to_string()),
        latest: latest.map(|d| d.to_string()),
    };

    summary
}

#[derive(Debug, Clone, Default, Serialize)]
pub struct SnapshotSummary {
    pub total_owners: usize,
    pub total_accounts: usize,
    pub checking_accounts: usize,
    pub savings_accounts: usize,
    pub unrecognized_accounts: usize,
    pub total_balance: Decimal,
    pub total_register_entries: usize,
    pub date_range: DateRange,
}

#[derive(Debug, Clone, Default, Serialize)]
pub struct DateRange {
    pub earliest: Option<String>,
    pub latest: Option<String>,
}
