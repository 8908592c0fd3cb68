//! Owner domain model

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// A person holding one or more accounts
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Owner {
    pub name: String,
    /// Unique within a snapshot
    pub id: i64,
    pub date_of_birth: NaiveDate,
    /// Expected in `###-##-####` shape
    pub ssn: String,
    pub address: String,
    pub address2: String,
    pub city: String,
    pub state: String,
    pub zip: String,
}

impl Owner {
    /// Create an owner with an empty postal address
    pub fn new(
        name: impl Into<String>,
        id: i64,
        date_of_birth: NaiveDate,
        ssn: impl Into<String>,
        zip: impl Into<String>,
    ) -> Self {
        Self {
            name: name.into(),
            id,
            date_of_birth,
            ssn: ssn.into(),
            address: String::new(),
            address2: String::new(),
            city: String::new(),
            state: String::new(),
            zip: zip.into(),
        }
    }

    /// Set the postal address fields
    pub fn with_address(
        mut self,
        address: impl Into<String>,
        address2: impl Into<String>,
        city: impl Into<String>,
        state: impl Into<String>,
    ) -> Self {
        self.address = address.into();
        self.address2 = address2.into();
        self.city = city.into();
        self.state = state.into();
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_owner_builder() {
        let dob = NaiveDate::from_ymd_opt(1980, 5, 17).unwrap();
        let owner = Owner::new("Jane Doe", 100, dob, "123-45-6789", "94107")
            .with_address("1 Market St", "Apt 4", "San Francisco", "CA");

        assert_eq!(owner.id, 100);
        assert_eq!(owner.city, "San Francisco");
        assert_eq!(owner.address2, "Apt 4");
        assert_eq!(owner.zip, "94107");
    }
}
