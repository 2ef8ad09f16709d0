//! Customer domain types.
//!
//! These types represent validated domain objects separate from database
//! row types.

use chrono::{DateTime, Utc};

use farmacia_core::{CustomerId, Email};

/// A registered customer (domain type).
///
/// The password hash never leaves the repository layer.
#[derive(Debug, Clone)]
pub struct Customer {
    /// Unique customer ID.
    pub id: CustomerId,
    /// First name.
    pub first_name: String,
    /// Last name.
    pub last_name: String,
    /// Email address (unique per customer).
    pub email: Email,
    /// Contact phone number.
    pub phone: String,
    /// Delivery address.
    pub address: String,
    /// Whether the email address has been confirmed.
    pub verified: bool,
    /// When the account was created.
    pub created_at: DateTime<Utc>,
}

impl Customer {
    /// Full display name, as shown in the session greeting and profile page.
    #[must_use]
    pub fn display_name(&self) -> String {
        format!("{} {}", self.first_name, self.last_name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_name() {
        let customer = Customer {
            id: CustomerId::new(1),
            first_name: "María".to_string(),
            last_name: "Quispe".to_string(),
            email: Email::parse("maria@example.com").expect("valid email"),
            phone: "999888777".to_string(),
            address: "Av. Los Olivos 123".to_string(),
            verified: false,
            created_at: Utc::now(),
        };
        assert_eq!(customer.display_name(), "María Quispe");
    }
}
