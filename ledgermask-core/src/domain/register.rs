//! Register entry domain model

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// One ledger transaction against an account
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RegisterEntry {
    pub id: i64,
    /// References `Account::id`
    pub account_id: i64,
    /// Free-form memo
    pub entry_name: String,
    pub amount: Decimal,
    pub date: NaiveDate,
}

impl RegisterEntry {
    pub fn new(
        id: i64,
        account_id: i64,
        entry_name: impl Into<String>,
        amount: Decimal,
        date: NaiveDate,
    ) -> Self {
        Self {
            id,
            account_id,
            entry_name: entry_name.into(),
            amount,
            date,
        }
    }
}
