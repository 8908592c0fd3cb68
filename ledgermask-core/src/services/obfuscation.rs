//! Obfuscation service - masks a record snapshot for non-production use
//!
//! Per-field rules:
//!
//! | Record | Field | Rule |
//! |---|---|---|
//! | Owner | name | first character + "." |
//! | Owner | id | `id * 13 mod 1_000_000_007` |
//! | Owner | date_of_birth | shifted by a random number of days in [-365, 365] |
//! | Owner | ssn | `***-**-` + last four characters |
//! | Owner | zip | first three characters + `XX` |
//! | Account | name | first character + "." |
//! | Account | id | `id * 5 mod 1_000_000_007` |
//! | Account | owner_id | `owner_id * 8 mod 1_000_000_007` |
//! | Account | check/withdrawal count | zeroed |
//! | RegisterEntry | id | `id * 21 mod 1_000_000_007` |
//! | RegisterEntry | account_id | `id * 34 mod 1_000_000_007` (from the entry's own id) |
//! | RegisterEntry | amount | cents shifted by a random amount in [-100, 100] |
//! | RegisterEntry | date | shifted by a random number of days in [-365, 365] |
//!
//! Everything else is copied. Owners are never dropped. An account or
//! register entry that cannot be transformed is reported and left out;
//! the rest of the batch carries on.
//!
//! The id multipliers differ between record types, so owner -> account ->
//! entry references do not line up after obfuscation.
//!
//! Scrambled ids are always non-negative: a negative id maps into
//! `[0, 1_000_000_007)` (`-1 * 5` becomes `1_000_000_002`), where a
//! sign-keeping remainder would give `-5`. Jitter ranges include both
//! bounds, so day shifts reach +365 and cent shifts reach +100.

use std::sync::Arc;

use chrono::{Duration, NaiveDate};
use rust_decimal::Decimal;
use serde::Serialize;

use crate::adapters::jitter::ThreadJitter;
use crate::domain::{Account, AccountKind, Owner, RecordKind, RecordSnapshot, RegisterEntry};
use crate::ports::{EventSink, JitterSource, LogEvent, NullSink};

/// Modulus applied to every scrambled id
pub const SCRAMBLE_MODULUS: i64 = 1_000_000_007;

pub const OWNER_ID_MULTIPLIER: i64 = 13;
pub const ACCOUNT_ID_MULTIPLIER: i64 = 5;
pub const ACCOUNT_OWNER_ID_MULTIPLIER: i64 = 8;
pub const ENTRY_ID_MULTIPLIER: i64 = 21;
pub const ENTRY_ACCOUNT_ID_MULTIPLIER: i64 = 34;

const SSN_MASK: &str = "***-**-";
const ZIP_MASK: &str = "XX";

/// `id * multiplier mod SCRAMBLE_MODULUS`, always in `[0, SCRAMBLE_MODULUS)`
///
/// Euclidean remainder, so negative ids do not keep their sign. Not
/// collision-free over large id ranges.
pub fn scramble_id(id: i64, multiplier: i64) -> i64 {
    let product = i128::from(id) * i128::from(multiplier);
    // The remainder is below SCRAMBLE_MODULUS, so it fits in i64
    product.rem_euclid(i128::from(SCRAMBLE_MODULUS)) as i64
}

/// First character followed by a period; `None` for an empty name
pub fn mask_initial(name: &str) -> Option<String> {
    name.chars().next().map(|c| format!("{}.", c))
}

/// Keep the last four characters behind a fixed `***-**-` prefix
pub fn mask_ssn(ssn: &str) -> String {
    let chars: Vec<char> = ssn.chars().collect();
    let start = chars.len().saturating_sub(4);
    let last4: String = chars[start..].iter().collect();
    format!("{}{}", SSN_MASK, last4)
}

/// Keep the first three characters, replace the rest with `XX`
pub fn mask_zip(zip: &str) -> String {
    let prefix: String = zip.chars().take(3).collect();
    format!("{}{}", prefix, ZIP_MASK)
}

/// Shift a date by whole days; `None` outside the representable calendar
pub fn shift_date(date: NaiveDate, days: i64) -> Option<NaiveDate> {
    date.checked_add_signed(Duration::days(days))
}

/// Shift an amount by whole cents and round back to two decimal places
///
/// Rounding is half-up on the cent value. `None` on decimal overflow.
pub fn jitter_amount(amount: Decimal, cents: i64) -> Option<Decimal> {
    let shifted = amount
        .checked_mul(Decimal::ONE_HUNDRED)?
        .checked_add(Decimal::from(cents))?;
    let rounded = shifted.checked_add(Decimal::new(5, 1))?.floor();
    let mut result = rounded.checked_div(Decimal::ONE_HUNDRED)?;
    result.rescale(2);
    Some(result)
}

/// Why a record was left out of the output
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "reason", content = "detail", rename_all = "snake_case")]
pub enum SkipReason {
    /// Account kind the engine has no rule for
    UnrecognizedVariant(String),
    /// The record could not be transformed
    Failed(String),
}

impl std::fmt::Display for SkipReason {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SkipReason::UnrecognizedVariant(name) => write!(f, "unknown account type: {}", name),
            SkipReason::Failed(msg) => f.write_str(msg),
        }
    }
}

/// A record dropped during obfuscation, identified by its original id
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SkippedRecord {
    pub kind: RecordKind,
    pub id: i64,
    #[serde(flatten)]
    pub reason: SkipReason,
}

/// Output of one obfuscation pass
#[derive(Debug, Clone, Default)]
pub struct ObfuscationOutcome {
    pub snapshot: RecordSnapshot,
    pub skipped: Vec<SkippedRecord>,
}

/// The masking engine
///
/// Holds no per-run state: the jitter source and the event sink are the
/// only collaborators, so one service can obfuscate independent snapshots
/// from several threads.
pub struct ObfuscationService {
    jitter: Arc<dyn JitterSource>,
    sink: Arc<dyn EventSink>,
}

impl Default for ObfuscationService {
    fn default() -> Self {
        Self::new(Arc::new(ThreadJitter), Arc::new(NullSink))
    }
}

impl ObfuscationService {
    pub fn new(jitter: Arc<dyn JitterSource>, sink: Arc<dyn EventSink>) -> Self {
        Self { jitter, sink }
    }

    /// Mask every record of a snapshot
    pub fn obfuscate(&self, snapshot: &RecordSnapshot) -> RecordSnapshot {
        self.obfuscate_with_report(snapshot).snapshot
    }

    /// Mask every record and report which ones were dropped
    pub fn obfuscate_with_report(&self, snapshot: &RecordSnapshot) -> ObfuscationOutcome {
        let mut skipped = Vec::new();

        let owners: Vec<Owner> = snapshot
            .owners
            .iter()
            .map(|o| self.obfuscate_owner(o))
            .collect();

        let mut accounts = Vec::with_capacity(snapshot.accounts.len());
        for account in &snapshot.accounts {
            match self.obfuscate_account(account) {
                Ok(masked) => accounts.push(masked),
                Err(reason) => skipped.push(self.report_skip(RecordKind::Account, account.id, reason)),
            }
        }

        let mut register_entries = Vec::with_capacity(snapshot.register_entries.len());
        for entry in &snapshot.register_entries {
            match self.obfuscate_entry(entry) {
                Ok(masked) => register_entries.push(masked),
                Err(reason) => {
                    skipped.push(self.report_skip(RecordKind::RegisterEntry, entry.id, reason))
                }
            }
        }

        tracing::debug!(
            owners = owners.len(),
            accounts = accounts.len(),
            register_entries = register_entries.len(),
            skipped = skipped.len(),
            "obfuscation pass finished"
        );

        ObfuscationOutcome {
            snapshot: RecordSnapshot::new(owners, accounts, register_entries),
            skipped,
        }
    }

    /// Mask one owner; never fails
    pub fn obfuscate_owner(&self, owner: &Owner) -> Owner {
        let date_of_birth = match shift_date(owner.date_of_birth, self.jitter.day_shift()) {
            Some(date) => date,
            None => {
                tracing::warn!(owner_id = owner.id, "date of birth shift out of range, keeping original");
                self.sink.record(
                    LogEvent::warn("owner_dob_unshifted").with_record(RecordKind::Owner.as_str(), owner.id),
                );
                owner.date_of_birth
            }
        };

        Owner {
            name: mask_initial(&owner.name).unwrap_or_else(|| ".".to_string()),
            id: scramble_id(owner.id, OWNER_ID_MULTIPLIER),
            date_of_birth,
            ssn: mask_ssn(&owner.ssn),
            address: owner.address.clone(),
            address2: owner.address2.clone(),
            city: owner.city.clone(),
            state: owner.state.clone(),
            zip: mask_zip(&owner.zip),
        }
    }

    /// Mask one account, keeping its kind
    pub fn obfuscate_account(&self, account: &Account) -> Result<Account, SkipReason> {
        let kind = match &account.kind {
            AccountKind::Checking { .. } => AccountKind::Checking { check_count: 0 },
            AccountKind::Savings { interest_rate, .. } => AccountKind::Savings {
                withdrawal_count: 0,
                interest_rate: *interest_rate,
            },
            AccountKind::Unrecognized { type_name } => {
                return Err(SkipReason::UnrecognizedVariant(type_name.clone()));
            }
        };

        let name = mask_initial(&account.name)
            .ok_or_else(|| SkipReason::Failed("account name is empty".to_string()))?;

        Ok(Account {
            name,
            id: scramble_id(account.id, ACCOUNT_ID_MULTIPLIER),
            balance: account.balance,
            owner_id: scramble_id(account.owner_id, ACCOUNT_OWNER_ID_MULTIPLIER),
            kind,
        })
    }

    /// Mask one register entry
    pub fn obfuscate_entry(&self, entry: &RegisterEntry) -> Result<RegisterEntry, SkipReason> {
        let amount = jitter_amount(entry.amount, self.jitter.cent_shift())
            .ok_or_else(|| SkipReason::Failed(format!("amount {} overflows", entry.amount)))?;
        let date = shift_date(entry.date, self.jitter.day_shift())
            .ok_or_else(|| SkipReason::Failed(format!("date {} cannot be shifted", entry.date)))?;

        Ok(RegisterEntry {
            id: scramble_id(entry.id, ENTRY_ID_MULTIPLIER),
            account_id: scramble_id(entry.id, ENTRY_ACCOUNT_ID_MULTIPLIER),
            entry_name: entry.entry_name.clone(),
            amount,
            date,
        })
    }

    fn report_skip(&self, kind: RecordKind, id: i64, reason: SkipReason) -> SkippedRecord {
        let event = match &reason {
            SkipReason::UnrecognizedVariant(type_name) => {
                tracing::warn!(record = %kind, id, account_type = %type_name, "unknown account type, record dropped");
                LogEvent::warn(format!("{}_dropped", kind)).with_error_details(reason.to_string())
            }
            SkipReason::Failed(msg) => {
                tracing::error!(record = %kind, id, error = %msg, "record could not be obfuscated, skipped");
                LogEvent::new(format!("{}_skipped", kind)).with_error(msg.clone())
            }
        };
        self.sink.record(event.with_record(kind.as_str(), id));

        SkippedRecord { kind, id, reason }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::jitter::{SeededJitter, ZeroJitter};
    use crate::adapters::memory::MemorySink;
    use crate::ports::LogLevel;

    fn zero_service() -> (ObfuscationService, Arc<MemorySink>) {
        let sink = Arc::new(MemorySink::new());
        let service = ObfuscationService::new(Arc::new(ZeroJitter), sink.clone());
        (service, sink)
    }

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    /// Jitter source returning fixed values
    struct FixedJitter {
        days: i64,
        cents: i64,
    }

    impl JitterSource for FixedJitter {
        fn day_shift(&self) -> i64 {
            self.days
        }

        fn cent_shift(&self) -> i64 {
            self.cents
        }
    }

    #[test]
    fn test_scramble_id() {
        assert_eq!(scramble_id(100, OWNER_ID_MULTIPLIER), 1300);
        assert_eq!(scramble_id(0, ENTRY_ID_MULTIPLIER), 0);
        // 1_000_000_007 * 2 wraps to zero
        assert_eq!(scramble_id(SCRAMBLE_MODULUS, 2), 0);
        assert_eq!(scramble_id(i64::MAX, ENTRY_ACCOUNT_ID_MULTIPLIER), {
            let expected = (i128::from(i64::MAX) * 34) % 1_000_000_007;
            expected as i64
        });
        let negative = scramble_id(-1, ACCOUNT_ID_MULTIPLIER);
        assert!((0..SCRAMBLE_MODULUS).contains(&negative));
        assert_eq!(negative, SCRAMBLE_MODULUS - 5);
    }

    #[test]
    fn test_mask_initial() {
        assert_eq!(mask_initial("Jane"), Some("J.".to_string()));
        assert_eq!(mask_initial("Émile"), Some("É.".to_string()));
        assert_eq!(mask_initial(""), None);
    }

    #[test]
    fn test_mask_ssn_and_zip() {
        assert_eq!(mask_ssn("123-45-6789"), "***-**-6789");
        assert_eq!(mask_ssn("12"), "***-**-12");
        assert_eq!(mask_zip("94107"), "941XX");
        assert_eq!(mask_zip("94107-1234"), "941XX");
        assert_eq!(mask_zip("9"), "9XX");
    }

    #[test]
    fn test_shift_date() {
        assert_eq!(shift_date(date(2024, 1, 1), -1), Some(date(2023, 12, 31)));
        assert_eq!(shift_date(date(2024, 2, 28), 365), Some(date(2025, 2, 27)));
        assert_eq!(shift_date(NaiveDate::MAX, 1), None);
    }

    #[test]
    fn test_jitter_amount() {
        assert_eq!(jitter_amount(Decimal::new(1234, 2), 0), Some(Decimal::new(1234, 2)));
        assert_eq!(jitter_amount(Decimal::new(1234, 2), 100), Some(Decimal::new(1334, 2)));
        assert_eq!(jitter_amount(Decimal::new(-50, 2), -100), Some(Decimal::new(-150, 2)));
        // Half a cent rounds up
        assert_eq!(jitter_amount(Decimal::new(10005, 3), 0), Some(Decimal::new(1001, 2)));
        // Result always carries two decimal places
        assert_eq!(jitter_amount(Decimal::from(7), 1).unwrap().scale(), 2);
        assert_eq!(jitter_amount(Decimal::MAX, 0), None);
    }

    #[test]
    fn test_owner_scenario_with_zero_jitter() {
        let (service, sink) = zero_service();
        let owner = Owner::new("Jane Doe", 100, date(1980, 6, 1), "123-45-6789", "94107")
            .with_address("1 Market St", "Suite 2", "San Francisco", "CA");

        let masked = service.obfuscate_owner(&owner);

        assert_eq!(masked.name, "J.");
        assert_eq!(masked.id, 1300);
        assert_eq!(masked.ssn, "***-**-6789");
        assert_eq!(masked.zip, "941XX");
        assert_eq!(masked.date_of_birth, owner.date_of_birth);
        assert_eq!(masked.address, "1 Market St");
        assert_eq!(masked.address2, "Suite 2");
        assert_eq!(masked.city, "San Francisco");
        assert_eq!(masked.state, "CA");
        assert!(sink.is_empty());
    }

    #[test]
    fn test_owner_with_empty_name_is_kept() {
        let (service, _) = zero_service();
        let owner = Owner::new("", 1, date(1990, 1, 1), "000-00-0000", "10001");
        assert_eq!(service.obfuscate_owner(&owner).name, ".");
    }

    #[test]
    fn test_owner_dob_out_of_range_keeps_date_and_warns() {
        let sink = Arc::new(MemorySink::new());
        let service = ObfuscationService::new(Arc::new(FixedJitter { days: 10, cents: 0 }), sink.clone());
        let owner = Owner::new("Max", 5, NaiveDate::MAX, "111-22-3333", "60601");

        let masked = service.obfuscate_owner(&owner);

        assert_eq!(masked.date_of_birth, NaiveDate::MAX);
        assert_eq!(sink.warnings().len(), 1);
        assert_eq!(sink.warnings()[0].event, "owner_dob_unshifted");
    }

    #[test]
    fn test_account_keeps_kind_and_zeroes_counter() {
        let (service, _) = zero_service();
        let checking = Account {
            kind: AccountKind::Checking { check_count: 57 },
            ..Account::checking("Jane Doe", 10, Decimal::new(150000, 2), 100)
        };
        let savings = Account {
            kind: AccountKind::Savings {
                withdrawal_count: 3,
                interest_rate: Decimal::new(425, 4),
            },
            ..Account::checking("Bob", 11, Decimal::new(99, 0), 101)
        };

        let masked_checking = service.obfuscate_account(&checking).unwrap();
        assert_eq!(masked_checking.name, "J.");
        assert_eq!(masked_checking.id, 50);
        assert_eq!(masked_checking.owner_id, 800);
        assert_eq!(masked_checking.balance, checking.balance);
        assert_eq!(masked_checking.kind, AccountKind::Checking { check_count: 0 });

        let masked_savings = service.obfuscate_account(&savings).unwrap();
        assert_eq!(masked_savings.id, 55);
        assert_eq!(masked_savings.owner_id, 808);
        assert_eq!(
            masked_savings.kind,
            AccountKind::Savings {
                withdrawal_count: 0,
                interest_rate: Decimal::new(425, 4),
            }
        );
    }

    #[test]
    fn test_account_with_empty_name_fails() {
        let (service, _) = zero_service();
        let account = Account::checking("", 1, Decimal::ZERO, 1);
        assert!(matches!(
            service.obfuscate_account(&account),
            Err(SkipReason::Failed(_))
        ));
    }

    #[test]
    fn test_entry_account_id_derives_from_entry_id() {
        let (service, _) = zero_service();
        let entry = RegisterEntry::new(3, 999, "Rent", Decimal::new(-120000, 2), date(2024, 5, 1));

        let masked = service.obfuscate_entry(&entry).unwrap();

        assert_eq!(masked.id, 63);
        assert_eq!(masked.account_id, 102);
        assert_eq!(masked.entry_name, "Rent");
        assert_eq!(masked.amount, Decimal::new(-120000, 2));
        assert_eq!(masked.date, entry.date);
    }

    #[test]
    fn test_entry_with_fixed_jitter() {
        let service = ObfuscationService::new(
            Arc::new(FixedJitter { days: -365, cents: 100 }),
            Arc::new(NullSink),
        );
        let entry = RegisterEntry::new(1, 1, "Coffee", Decimal::new(-450, 2), date(2024, 3, 1));

        let masked = service.obfuscate_entry(&entry).unwrap();

        assert_eq!(masked.amount, Decimal::new(-350, 2));
        assert_eq!(masked.date, date(2023, 3, 2));
    }

    #[test]
    fn test_entry_date_out_of_range_fails() {
        let service = ObfuscationService::new(
            Arc::new(FixedJitter { days: 1, cents: 0 }),
            Arc::new(NullSink),
        );
        let entry = RegisterEntry::new(1, 1, "x", Decimal::ONE, NaiveDate::MAX);
        assert!(matches!(service.obfuscate_entry(&entry), Err(SkipReason::Failed(_))));
    }

    #[test]
    fn test_unrecognized_account_dropped_with_warning() {
        let (service, sink) = zero_service();
        let snapshot = RecordSnapshot::new(
            vec![],
            vec![
                Account::checking("Ann", 1, Decimal::ONE, 1),
                Account {
                    name: "Zed".to_string(),
                    id: 2,
                    balance: Decimal::ONE,
                    owner_id: 1,
                    kind: AccountKind::Unrecognized {
                        type_name: "MoneyMarketAccount".to_string(),
                    },
                },
                Account::savings("Bea", 3, Decimal::ONE, 1, Decimal::ZERO),
            ],
            vec![],
        );

        let outcome = service.obfuscate_with_report(&snapshot);

        assert_eq!(outcome.snapshot.accounts.len(), 2);
        assert!(outcome.snapshot.accounts[0].is_checking());
        assert!(outcome.snapshot.accounts[1].is_savings());
        assert_eq!(
            outcome.skipped,
            vec![SkippedRecord {
                kind: RecordKind::Account,
                id: 2,
                reason: SkipReason::UnrecognizedVariant("MoneyMarketAccount".to_string()),
            }]
        );

        let warnings = sink.warnings();
        assert_eq!(warnings.len(), 1);
        assert_eq!(warnings[0].event, "account_dropped");
        assert_eq!(warnings[0].record_id, Some(2));
        assert!(sink.errors().is_empty());
    }

    #[test]
    fn test_failed_record_logged_as_error() {
        let (service, sink) = zero_service();
        let snapshot = RecordSnapshot::new(
            vec![],
            vec![Account::checking("", 7, Decimal::ONE, 1)],
            vec![],
        );

        let outcome = service.obfuscate_with_report(&snapshot);

        assert!(outcome.snapshot.accounts.is_empty());
        let errors = sink.at_level(LogLevel::Error);
        assert_eq!(errors.len(), 1);
        assert_eq!(errors[0].event, "account_skipped");
        assert_eq!(errors[0].error_message.as_deref(), Some("account name is empty"));
    }

    #[test]
    fn test_empty_snapshot() {
        let (service, sink) = zero_service();
        let outcome = service.obfuscate_with_report(&RecordSnapshot::default());
        assert!(outcome.snapshot.is_empty());
        assert!(outcome.skipped.is_empty());
        assert!(sink.is_empty());
    }

    #[test]
    fn test_seeded_runs_match() {
        let dob = date(1970, 1, 1);
        let snapshot = RecordSnapshot::new(
            vec![Owner::new("Ann", 1, dob, "123-45-6789", "02139")],
            vec![],
            vec![RegisterEntry::new(1, 1, "Pay", Decimal::new(100000, 2), dob)],
        );

        let a = ObfuscationService::new(Arc::new(SeededJitter::new(99)), Arc::new(NullSink));
        let b = ObfuscationService::new(Arc::new(SeededJitter::new(99)), Arc::new(NullSink));
        assert_eq!(a.obfuscate(&snapshot), b.obfuscate(&snapshot));
    }

    #[test]
    fn test_input_is_not_modified() {
        let service = ObfuscationService::default();
        let snapshot = RecordSnapshot::new(
            vec![Owner::new("Ann", 1, date(1970, 1, 1), "123-45-6789", "02139")],
            vec![Account::checking("Ann", 1, Decimal::ONE, 1)],
            vec![],
        );
        let before = snapshot.clone();
        let _ = service.obfuscate(&snapshot);
        assert_eq!(snapshot, before);
    }
}
