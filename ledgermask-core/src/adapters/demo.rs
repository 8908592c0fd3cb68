//! Demo data for trying a run without production records
//!
//! Generates a plausible "production" snapshot:
//! - owners with names, birth dates, SSNs and addresses
//! - a checking account per owner, a savings account for every other owner
//! - 90 days of register entries per checking account (payroll, rent,
//!   utilities, groceries) ending at a given date

use chrono::{Datelike, Duration, NaiveDate};
use rust_decimal::Decimal;

use crate::domain::{Account, AccountKind, Owner, RecordSnapshot, RegisterEntry};

const FIRST_NAMES: &[&str] = &[
    "Jane", "Marcus", "Priya", "Tomás", "Olivia", "Kenji", "Amara", "Lukas", "Sofia", "Daniel",
];
const LAST_NAMES: &[&str] = &[
    "Doe", "Bennett", "Raman", "Ortega", "Nguyen", "Sato", "Okafor", "Becker", "Rossi", "Kim",
];
const STREETS: &[&str] = &["Market St", "Oak Ave", "Pine Rd", "Elm St", "Cedar Ln"];
const CITIES: &[(&str, &str, &str)] = &[
    ("San Francisco", "CA", "94107"),
    ("Austin", "TX", "78701"),
    ("Chicago", "IL", "60601"),
    ("Boston", "MA", "02139"),
    ("Seattle", "WA", "98101"),
];

const HISTORY_DAYS: i64 = 90;

/// Generate demo owners
pub fn generate_demo_owners(count: usize) -> Vec<Owner> {
    (0..count)
        .map(|i| {
            let n = i as i64;
            let first = FIRST_NAMES[i % FIRST_NAMES.len()];
            let last = LAST_NAMES[(i / FIRST_NAMES.len() + i) % LAST_NAMES.len()];
            let (city, state, zip) = CITIES[i % CITIES.len()];
            let dob = NaiveDate::from_ymd_opt(1950 + (i % 50) as i32, (i % 12) as u32 + 1, (i % 28) as u32 + 1)
                .unwrap_or(NaiveDate::MIN);
            let ssn = format!(
                "{:03}-{:02}-{:04}",
                100 + (n * 37) % 800,
                10 + (n * 13) % 89,
                1000 + (n * 7919) % 9000
            );
            let address2 = if i % 3 == 0 {
                format!("Apt {}", i + 1)
            } else {
                String::new()
            };

            Owner::new(format!("{} {}", first, last), n + 1, dob, ssn, zip).with_address(
                format!("{} {}", 100 + i * 7, STREETS[i % STREETS.len()]),
                address2,
                city,
                state,
            )
        })
        .collect()
}

/// Generate demo accounts for the given owners
pub fn generate_demo_accounts(owners: &[Owner]) -> Vec<Account> {
    let mut accounts = Vec::new();
    for (i, owner) in owners.iter().enumerate() {
        let n = i as i64;
        accounts.push(Account {
            name: owner.name.clone(),
            id: 1000 + n * 2,
            balance: Decimal::new(150_000 + (n * 48_331) % 900_000, 2),
            owner_id: owner.id,
            kind: AccountKind::Checking {
                check_count: 100 + (n * 17) % 400,
            },
        });

        if i % 2 == 0 {
            accounts.push(Account {
                name: owner.name.clone(),
                id: 1001 + n * 2,
                balance: Decimal::new(500_000 + (n * 129_887) % 5_000_000, 2),
                owner_id: owner.id,
                kind: AccountKind::Savings {
                    withdrawal_count: (n % 6) + 1,
                    interest_rate: Decimal::new(425, 4), // 4.25%
                },
            });
        }
    }
    accounts
}

/// Generate register entries for every checking account, ending at `end`
pub fn generate_demo_register_entries(accounts: &[Account], end: NaiveDate) -> Vec<RegisterEntry> {
    let mut entries = Vec::new();
    let mut next_id = 1i64;
    let mut push = |account_id: i64, name: &str, cents: i64, date: NaiveDate| {
        entries.push(RegisterEntry::new(
            next_id,
            account_id,
            name,
            Decimal::new(cents, 2),
            date,
        ));
        next_id += 1;
    };

    for account in accounts.iter().filter(|a| a.is_checking()) {
        for days_ago in 0..HISTORY_DAYS {
            let date = end - Duration::days(days_ago);
            match date.day() {
                1 | 15 => push(account.id, "ACME CORP PAYROLL", 425_000, date),
                5 => push(account.id, "APARTMENT RENT", -225_000, date),
                10 => push(account.id, "CITY UTILITIES - ELECTRIC", -15_000, date),
                d if d % 4 == 0 => {
                    let cents = -(2_000 + (account.id * 31 + i64::from(d) * 97) % 12_000);
                    push(account.id, "GROCERY MARKET", cents, date)
                }
                _ => {}
            }
        }
    }
    entries
}

/// A complete demo snapshot with `owners` owners
pub fn generate_demo_snapshot(owners: usize, end: NaiveDate) -> RecordSnapshot {
    let owners = generate_demo_owners(owners);
    let accounts = generate_demo_accounts(&owners);
    let register_entries = generate_demo_register_entries(&accounts, end);
    RecordSnapshot::new(owners, accounts, register_entries)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn test_demo_snapshot_shape() {
        let end = NaiveDate::from_ymd_opt(2024, 6, 30).unwrap();
        let snapshot = generate_demo_snapshot(10, end);

        assert_eq!(snapshot.owners.len(), 10);
        assert_eq!(snapshot.accounts.iter().filter(|a| a.is_checking()).count(), 10);
        assert_eq!(snapshot.accounts.iter().filter(|a| a.is_savings()).count(), 5);
        assert!(!snapshot.register_entries.is_empty());
        assert!(snapshot.register_entries.iter().all(|e| e.date <= end));
    }

    #[test]
    fn test_demo_ids_are_unique() {
        let snapshot = generate_demo_snapshot(25, NaiveDate::from_ymd_opt(2024, 1, 31).unwrap());

        let owner_ids: HashSet<i64> = snapshot.owners.iter().map(|o| o.id).collect();
        let account_ids: HashSet<i64> = snapshot.accounts.iter().map(|a| a.id).collect();
        let entry_ids: HashSet<i64> = snapshot.register_entries.iter().map(|e| e.id).collect();

        assert_eq!(owner_ids.len(), snapshot.owners.len());
        assert_eq!(account_ids.len(), snapshot.accounts.len());
        assert_eq!(entry_ids.len(), snapshot.register_entries.len());
    }

    #[test]
    fn test_demo_ssns_have_expected_shape() {
        for owner in generate_demo_owners(30) {
            let parts: Vec<&str> = owner.ssn.split('-').collect();
            assert_eq!(parts.iter().map(|p| p.len()).collect::<Vec<_>>(), vec![3, 2, 4]);
        }
    }
}
