//! Record snapshot - the unit of input and output for obfuscation

use serde::{Deserialize, Serialize};

use super::{Account, Owner, RegisterEntry};

/// The three record collections at one point in time
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RecordSnapshot {
    pub owners: Vec<Owner>,
    pub accounts: Vec<Account>,
    pub register_entries: Vec<RegisterEntry>,
}

impl RecordSnapshot {
    pub fn new(
        owners: Vec<Owner>,
        accounts: Vec<Account>,
        register_entries: Vec<RegisterEntry>,
    ) -> Self {
        Self {
            owners,
            accounts,
            register_entries,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.owners.is_empty() && self.accounts.is_empty() && self.register_entries.is_empty()
    }

    pub fn counts(&self) -> RecordCounts {
        RecordCounts {
            owners: self.owners.len(),
            accounts: self.accounts.len(),
            register_entries: self.register_entries.len(),
        }
    }
}

/// Collection sizes of a snapshot
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RecordCounts {
    pub owners: usize,
    pub accounts: usize,
    pub register_entries: usize,
}

/// Which collection a record belongs to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RecordKind {
    Owner,
    Account,
    RegisterEntry,
}

impl RecordKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            RecordKind::Owner => "owner",
            RecordKind::Account => "account",
            RecordKind::RegisterEntry => "register_entry",
        }
    }
}

impl std::fmt::Display for RecordKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_snapshot() {
        let snapshot = RecordSnapshot::default();
        assert!(snapshot.is_empty());
        assert_eq!(snapshot.counts(), RecordCounts::default());
    }
}
