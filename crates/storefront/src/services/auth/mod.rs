//! Authentication service.
//!
//! Registration, login and email confirmation for customer accounts.
//! Passwords are hashed with Argon2id; email ownership is proven by a
//! signed, time-boxed verification token sent to the address on file.

mod error;

pub use error::AuthError;

use argon2::{
    Argon2,
    password_hash::{PasswordHash, PasswordHasher, PasswordVerifier, SaltString, rand_core::OsRng},
};
use sqlx::PgPool;

use farmacia_core::{CustomerId, Email};

use crate::db::RepositoryError;
use crate::db::customers::CustomerRepository;
use crate::models::Customer;
use crate::services::token::{TOKEN_MAX_AGE_SECS, TokenError, TokenSigner};

/// Minimum password length.
const MIN_PASSWORD_LENGTH: usize = 8;

/// New account data, as collected by the registration form.
#[derive(Debug)]
pub struct NewCustomer<'a> {
    pub first_name: &'a str,
    pub last_name: &'a str,
    pub email: &'a str,
    pub password: &'a str,
    pub phone: &'a str,
    pub address: &'a str,
}

/// Authentication service.
pub struct AuthService<'a> {
    customers: CustomerRepository<'a>,
    tokens: &'a TokenSigner,
}

impl<'a> AuthService<'a> {
    /// Create a new authentication service.
    #[must_use]
    pub const fn new(pool: &'a PgPool, tokens: &'a TokenSigner) -> Self {
        Self {
            customers: CustomerRepository::new(pool),
            tokens,
        }
    }

    /// Register a new customer account, unverified.
    ///
    /// The caller is responsible for issuing the verification token and
    /// dispatching the email once the row is committed.
    ///
    /// # Errors
    ///
    /// Returns `AuthError::InvalidEmail` if the email format is invalid.
    /// Returns `AuthError::WeakPassword` if the password is too short.
    /// Returns `AuthError::DuplicateEmail` if the email is already registered.
    pub async fn register(&self, data: NewCustomer<'_>) -> Result<Customer, AuthError> {
        let email = Email::parse(data.email)?;
        validate_password(data.password)?;

        let password_hash = hash_password(data.password)?;

        let customer = self
            .customers
            .create(
                data.first_name,
                data.last_name,
                &email,
                &password_hash,
                data.phone,
                data.address,
            )
            .await
            .map_err(|e| match e {
                RepositoryError::Conflict(_) => AuthError::DuplicateEmail,
                other => AuthError::Repository(other),
            })?;

        Ok(customer)
    }

    /// Log in with email and password.
    ///
    /// # Errors
    ///
    /// Returns `AuthError::InvalidCredentials` if the email is unknown or
    /// the password does not match.
    /// Returns `AuthError::UnverifiedAccount` if the email has not been
    /// confirmed yet.
    pub async fn login(&self, email: &str, password: &str) -> Result<Customer, AuthError> {
        let email = Email::parse(email)?;

        let (customer, password_hash) = self
            .customers
            .get_with_password_hash(&email)
            .await?
            .ok_or(AuthError::InvalidCredentials)?;

        verify_password(password, &password_hash)?;

        if !customer.verified {
            return Err(AuthError::UnverifiedAccount);
        }

        Ok(customer)
    }

    /// Issue a verification token for a freshly registered email.
    #[must_use]
    pub fn issue_verification_token(&self, email: &Email) -> String {
        self.tokens.sign(email)
    }

    /// Confirm an email address from a verification token.
    ///
    /// Confirming an already-verified account is a no-op that still
    /// succeeds.
    ///
    /// # Errors
    ///
    /// Returns `AuthError::TokenExpired` if the token is older than its
    /// validity window, `AuthError::TokenInvalid` if it is malformed,
    /// forged, or names an unknown account.
    pub async fn confirm_email(&self, token: &str) -> Result<Email, AuthError> {
        let email = self
            .tokens
            .verify(token, TOKEN_MAX_AGE_SECS)
            .map_err(|e| match e {
                TokenError::Expired => AuthError::TokenExpired,
                TokenError::Invalid => AuthError::TokenInvalid,
            })?;

        self.customers
            .mark_verified(&email)
            .await
            .map_err(|e| match e {
                // A valid signature over an email with no account means the
                // token does not belong to anything confirmable.
                RepositoryError::NotFound => AuthError::TokenInvalid,
                other => AuthError::Repository(other),
            })?;

        Ok(email)
    }

    /// Get a customer by ID (for the profile page).
    ///
    /// # Errors
    ///
    /// Returns `AuthError::InvalidCredentials` if the session references an
    /// account that no longer exists.
    pub async fn get_customer(&self, id: CustomerId) -> Result<Customer, AuthError> {
        self.customers
            .get_by_id(id)
            .await?
            .ok_or(AuthError::InvalidCredentials)
    }

    /// Update the editable profile fields.
    ///
    /// # Errors
    ///
    /// Returns `AuthError::Repository` if the update fails.
    pub async fn update_profile(
        &self,
        id: CustomerId,
        first_name: &str,
        last_name: &str,
        phone: &str,
        address: &str,
    ) -> Result<(), AuthError> {
        self.customers
            .update_profile(id, first_name, last_name, phone, address)
            .await?;
        Ok(())
    }
}

/// Validate password meets requirements.
fn validate_password(password: &str) -> Result<(), AuthError> {
    if password.len() < MIN_PASSWORD_LENGTH {
        return Err(AuthError::WeakPassword(format!(
            "password must be at least {MIN_PASSWORD_LENGTH} characters"
        )));
    }

    Ok(())
}

/// Hash a password using Argon2id.
fn hash_password(password: &str) -> Result<String, AuthError> {
    let salt = SaltString::generate(&mut OsRng);
    let argon2 = Argon2::default();

    argon2
        .hash_password(password.as_bytes(), &salt)
        .map(|hash| hash.to_string())
        .map_err(|_| AuthError::PasswordHash)
}

/// Verify a password against a hash.
fn verify_password(password: &str, hash: &str) -> Result<(), AuthError> {
    let parsed_hash = PasswordHash::new(hash).map_err(|_| AuthError::InvalidCredentials)?;
    let argon2 = Argon2::default();

    argon2
        .verify_password(password.as_bytes(), &parsed_hash)
        .map_err(|_| AuthError::InvalidCredentials)
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_password_too_short() {
        assert!(matches!(
            validate_password("corta"),
            Err(AuthError::WeakPassword(_))
        ));
    }

    #[test]
    fn test_validate_password_ok() {
        assert!(validate_password("una-clave-larga").is_ok());
    }

    #[test]
    fn test_hash_and_verify_roundtrip() {
        let hash = hash_password("una-clave-larga").unwrap();
        assert!(verify_password("una-clave-larga", &hash).is_ok());
    }

    #[test]
    fn test_verify_rejects_wrong_password() {
        let hash = hash_password("una-clave-larga").unwrap();
        assert!(matches!(
            verify_password("otra-clave", &hash),
            Err(AuthError::InvalidCredentials)
        ));
    }

    #[test]
    fn test_verify_rejects_garbage_hash() {
        assert!(matches!(
            verify_password("una-clave-larga", "not-a-phc-string"),
            Err(AuthError::InvalidCredentials)
        ));
    }

    #[test]
    fn test_hashes_are_salted() {
        let first = hash_password("una-clave-larga").unwrap();
        let second = hash_password("una-clave-larga").unwrap();
        assert_ne!(first, second);
    }
}
