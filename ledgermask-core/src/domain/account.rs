//! Account domain model

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Concrete kind of an account, with the data only that kind carries
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum AccountKind {
    Checking {
        /// Checks written against the account
        check_count: i64,
    },
    Savings {
        /// Withdrawals taken in the current period
        withdrawal_count: i64,
        interest_rate: Decimal,
    },
    /// A record the loader could not classify
    Unrecognized { type_name: String },
}

impl AccountKind {
    pub fn as_str(&self) -> &str {
        match self {
            AccountKind::Checking { .. } => "checking",
            AccountKind::Savings { .. } => "savings",
            AccountKind::Unrecognized { type_name } => type_name,
        }
    }
}

/// A checking or savings account belonging to an owner
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Account {
    /// Owner display name
    pub name: String,
    pub id: i64,
    pub balance: Decimal,
    /// References `Owner::id`
    pub owner_id: i64,
    pub kind: AccountKind,
}

impl Account {
    /// Create a checking account with no checks written
    pub fn checking(name: impl Into<String>, id: i64, balance: Decimal, owner_id: i64) -> Self {
        Self {
            name: name.into(),
            id,
            balance,
            owner_id,
            kind: AccountKind::Checking { check_count: 0 },
        }
    }

    /// Create a savings account with no withdrawals taken
    pub fn savings(
        name: impl Into<String>,
        id: i64,
        balance: Decimal,
        owner_id: i64,
        interest_rate: Decimal,
    ) -> Self {
        Self {
            name: name.into(),
            id,
            balance,
            owner_id,
            kind: AccountKind::Savings {
                withdrawal_count: 0,
                interest_rate,
            },
        }
    }

    pub fn is_checking(&self) -> bool {
        matches!(self.kind, AccountKind::Checking { .. })
    }

    pub fn is_savings(&self) -> bool {
        matches!(self.kind, AccountKind::Savings { .. })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_kind_names() {
        let checking = Account::checking("Jane", 1, Decimal::new(1000, 2), 7);
        let savings = Account::savings("Jane", 2, Decimal::new(500, 2), 7, Decimal::new(25, 3));
        assert_eq!(checking.kind.as_str(), "checking");
        assert_eq!(savings.kind.as_str(), "savings");
        assert!(checking.is_checking());
        assert!(savings.is_savings());

        let other = AccountKind::Unrecognized {
            type_name: "MoneyMarketAccount".to_string(),
        };
        assert_eq!(other.as_str(), "MoneyMarketAccount");
    }

    #[test]
    fn test_kind_serializes_with_tag() {
        let kind = AccountKind::Checking { check_count: 12 };
        let json = serde_json::to_value(&kind).unwrap();
        assert_eq!(json["type"], "checking");
        assert_eq!(json["check_count"], 12);
    }
}
