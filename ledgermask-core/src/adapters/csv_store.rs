//! CSV record store
//!
//! Persists a snapshot as one delimited text file per record group:
//!
//! ```text
//! <dir>/owners<suffix>.csv
//! <dir>/checking<suffix>.csv
//! <dir>/savings<suffix>.csv
//! <dir>/register<suffix>.csv
//! ```
//!
//! A missing file loads as an empty group. Every group file is written on
//! save, header-only when the group is empty.

use std::fs;
use std::path::{Path, PathBuf};

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};

use crate::config::PersisterProperties;
use crate::domain::result::Result;
use crate::domain::{Account, AccountKind, Owner, RecordSnapshot, RegisterEntry};
use crate::ports::{RecordStore, SaveSummary};

pub const OWNERS_STEM: &str = "owners";
pub const CHECKING_STEM: &str = "checking";
pub const SAVINGS_STEM: &str = "savings";
pub const REGISTER_STEM: &str = "register";

const OWNER_HEADERS: &[&str] = &[
    "name",
    "id",
    "date_of_birth",
    "ssn",
    "address",
    "address2",
    "city",
    "state",
    "zip",
];
const CHECKING_HEADERS: &[&str] = &["name", "id", "balance", "check_count", "owner_id"];
const SAVINGS_HEADERS: &[&str] = &[
    "name",
    "id",
    "balance",
    "withdrawal_count",
    "interest_rate",
    "owner_id",
];
const REGISTER_HEADERS: &[&str] = &["id", "account_id", "entry_name", "amount", "date"];

#[derive(Debug, Serialize, Deserialize)]
struct CheckingRow {
    name: String,
    id: i64,
    #[serde(with = "rust_decimal::serde::str")]
    balance: Decimal,
    check_count: i64,
    owner_id: i64,
}

#[derive(Debug, Serialize, Deserialize)]
struct SavingsRow {
    name: String,
    id: i64,
    #[serde(with = "rust_decimal::serde::str")]
    balance: Decimal,
    withdrawal_count: i64,
    #[serde(with = "rust_decimal::serde::str")]
    interest_rate: Decimal,
    owner_id: i64,
}

#[derive(Debug, Serialize, Deserialize)]
struct RegisterRow {
    id: i64,
    account_id: i64,
    entry_name: String,
    #[serde(with = "rust_decimal::serde::str")]
    amount: Decimal,
    date: NaiveDate,
}

impl From<CheckingRow> for Account {
    fn from(row: CheckingRow) -> Self {
        Account {
            name: row.name,
            id: row.id,
            balance: row.balance,
            owner_id: row.owner_id,
            kind: AccountKind::Checking {
                check_count: row.check_count,
            },
        }
    }
}

impl From<SavingsRow> for Account {
    fn from(row: SavingsRow) -> Self {
        Account {
            name: row.name,
            id: row.id,
            balance: row.balance,
            owner_id: row.owner_id,
            kind: AccountKind::Savings {
                withdrawal_count: row.withdrawal_count,
                interest_rate: row.interest_rate,
            },
        }
    }
}

impl From<RegisterRow> for RegisterEntry {
    fn from(row: RegisterRow) -> Self {
        RegisterEntry::new(row.id, row.account_id, row.entry_name, row.amount, row.date)
    }
}

impl From<&RegisterEntry> for RegisterRow {
    fn from(entry: &RegisterEntry) -> Self {
        RegisterRow {
            id: entry.id,
            account_id: entry.account_id,
            entry_name: entry.entry_name.clone(),
            amount: entry.amount,
            date: entry.date,
        }
    }
}

/// Record store backed by a directory of CSV files
#[derive(Debug, Clone)]
pub struct CsvRecordStore {
    dir: PathBuf,
    suffix: String,
}

impl CsvRecordStore {
    pub fn new(dir: impl Into<PathBuf>, suffix: impl Into<String>) -> Self {
        Self {
            dir: dir.into(),
            suffix: suffix.into(),
        }
    }

    /// Store described by a persister properties file
    pub fn from_properties(props: &PersisterProperties) -> Self {
        Self::new(props.persisted_dir(), props.persisted_suffix())
    }

    /// Same directory, different file suffix
    pub fn with_suffix(&self, suffix: impl Into<String>) -> Self {
        Self::new(self.dir.clone(), suffix)
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    pub fn suffix(&self) -> &str {
        &self.suffix
    }

    /// Path of the file holding one record group
    pub fn file_path(&self, stem: &str) -> PathBuf {
        self.dir.join(format!("{}{}.csv", stem, self.suffix))
    }

    fn read_rows<T: DeserializeOwned>(&self, stem: &str) -> Result<Vec<T>> {
        let path = self.file_path(stem);
        if !path.exists() {
            tracing::debug!(path = %path.display(), "record file absent, loading empty group");
            return Ok(Vec::new());
        }

        let mut reader = csv::Reader::from_path(&path)?;
        let mut rows = Vec::new();
        for row in reader.deserialize() {
            rows.push(row?);
        }
        Ok(rows)
    }

    fn write_rows<T: Serialize>(&self, stem: &str, headers: &[&str], rows: &[T]) -> Result<String> {
        let path = self.file_path(stem);
        let mut writer = csv::WriterBuilder::new()
            .has_headers(false)
            .from_path(&path)?;

        writer.write_record(headers)?;
        for row in rows {
            writer.serialize(row)?;
        }
        writer.flush()?;

        Ok(path.to_string_lossy().into_owned())
    }
}

impl RecordStore for CsvRecordStore {
    fn load(&self) -> Result<RecordSnapshot> {
        let owners: Vec<Owner> = self.read_rows(OWNERS_STEM)?;

        let mut accounts: Vec<Account> = self
            .read_rows::<CheckingRow>(CHECKING_STEM)?
            .into_iter()
            .map(Account::from)
            .collect();
        accounts.extend(
            self.read_rows::<SavingsRow>(SAVINGS_STEM)?
                .into_iter()
                .map(Account::from),
        );

        let register_entries = self
            .read_rows::<RegisterRow>(REGISTER_STEM)?
            .into_iter()
            .map(RegisterEntry::from)
            .collect();

        Ok(RecordSnapshot::new(owners, accounts, register_entries))
    }

    fn save(&self, snapshot: &RecordSnapshot) -> Result<SaveSummary> {
        fs::create_dir_all(&self.dir)?;

        let mut checking = Vec::new();
        let mut savings = Vec::new();
        let mut unwritable = 0;
        for account in &snapshot.accounts {
            match &account.kind {
                AccountKind::Checking { check_count } => checking.push(CheckingRow {
                    name: account.name.clone(),
                    id: account.id,
                    balance: account.balance,
                    check_count: *check_count,
                    owner_id: account.owner_id,
                }),
                AccountKind::Savings {
                    withdrawal_count,
                    interest_rate,
                } => savings.push(SavingsRow {
                    name: account.name.clone(),
                    id: account.id,
                    balance: account.balance,
                    withdrawal_count: *withdrawal_count,
                    interest_rate: *interest_rate,
                    owner_id: account.owner_id,
                }),
                AccountKind::Unrecognized { type_name } => {
                    tracing::warn!(account_type = %type_name, "no record file for account type, not written");
                    unwritable += 1;
                }
            }
        }
        let register: Vec<RegisterRow> = snapshot.register_entries.iter().map(RegisterRow::from).collect();

        let targets = vec![
            self.write_rows(OWNERS_STEM, OWNER_HEADERS, &snapshot.owners)?,
            self.write_rows(SAVINGS_STEM, SAVINGS_HEADERS, &savings)?,
            self.write_rows(CHECKING_STEM, CHECKING_HEADERS, &checking)?,
            self.write_rows(REGISTER_STEM, REGISTER_HEADERS, &register)?,
        ];

        Ok(SaveSummary {
            targets,
            owners: snapshot.owners.len(),
            checking: checking.len(),
            savings: savings.len(),
            register_entries: register.len(),
            unwritable,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    fn sample_snapshot() -> RecordSnapshot {
        let dob = NaiveDate::from_ymd_opt(1975, 3, 9).unwrap();
        let owner = Owner::new("Jane Doe", 1, dob, "123-45-6789", "94107")
            .with_address("1 Main St", "", "Springfield", "IL");
        let accounts = vec![
            Account::checking("Jane Doe", 10, Decimal::new(12050, 2), 1),
            Account::savings("Jane Doe", 11, Decimal::new(90000, 2), 1, Decimal::new(150, 4)),
        ];
        let entries = vec![RegisterEntry::new(
            100,
            10,
            "Groceries",
            Decimal::new(-4321, 2),
            NaiveDate::from_ymd_opt(2024, 2, 29).unwrap(),
        )];
        RecordSnapshot::new(vec![owner], accounts, entries)
    }

    #[test]
    fn test_missing_files_load_empty() {
        let dir = tempdir().unwrap();
        let store = CsvRecordStore::new(dir.path(), "_prod");
        let snapshot = store.load().unwrap();
        assert!(snapshot.is_empty());
    }

    #[test]
    fn test_save_then_load_preserves_records() {
        let dir = tempdir().unwrap();
        let store = CsvRecordStore::new(dir.path(), "");
        let snapshot = sample_snapshot();

        let summary = store.save(&snapshot).unwrap();
        assert_eq!(summary.targets.len(), 4);
        assert_eq!(summary.checking, 1);
        assert_eq!(summary.savings, 1);

        let loaded = store.load().unwrap();
        assert_eq!(loaded, snapshot);
    }

    #[test]
    fn test_empty_groups_write_header_only() {
        let dir = tempdir().unwrap();
        let store = CsvRecordStore::new(dir.path(), "_x");
        store.save(&RecordSnapshot::default()).unwrap();

        let savings = fs::read_to_string(dir.path().join("savings_x.csv")).unwrap();
        assert_eq!(
            savings.trim_end(),
            "name,id,balance,withdrawal_count,interest_rate,owner_id"
        );
    }

    #[test]
    fn test_unrecognized_accounts_are_counted_not_written() {
        let dir = tempdir().unwrap();
        let store = CsvRecordStore::new(dir.path(), "");
        let mut snapshot = sample_snapshot();
        snapshot.accounts.push(Account {
            name: "X".to_string(),
            id: 99,
            balance: Decimal::ZERO,
            owner_id: 1,
            kind: AccountKind::Unrecognized {
                type_name: "BrokerageAccount".to_string(),
            },
        });

        let summary = store.save(&snapshot).unwrap();
        assert_eq!(summary.unwritable, 1);
        assert_eq!(store.load().unwrap().accounts.len(), 2);
    }

    #[test]
    fn test_malformed_row_is_an_error() {
        let dir = tempdir().unwrap();
        fs::write(
            dir.path().join("register.csv"),
            "id,account_id,entry_name,amount,date\nnot-a-number,1,x,1.00,2024-01-01\n",
        )
        .unwrap();
        let store = CsvRecordStore::new(dir.path(), "");
        assert!(store.load().is_err());
    }

    #[test]
    fn test_file_path_uses_suffix() {
        let store = CsvRecordStore::new("/data", "_prod");
        assert_eq!(store.file_path("owners"), PathBuf::from("/data/owners_prod.csv"));
        assert_eq!(
            store.with_suffix("").file_path("register"),
            PathBuf::from("/data/register.csv")
        );
    }
}
