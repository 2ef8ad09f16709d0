//! Customer repository for database operations.
//!
//! Backs registration, login, email confirmation and the profile page.
//! All queries are parameterized; the password hash only ever travels
//! between this module and the auth service.

use chrono::{DateTime, Utc};
use sqlx::{FromRow, PgPool};

use farmacia_core::{CustomerId, Email};

use super::RepositoryError;
use crate::models::Customer;

/// Raw `cliente` row, aliased to English field names in the queries.
#[derive(Debug, FromRow)]
struct CustomerRow {
    id: CustomerId,
    first_name: String,
    last_name: String,
    email: String,
    phone: String,
    address: String,
    verified: bool,
    created_at: DateTime<Utc>,
}

impl CustomerRow {
    /// Validate the stored email and build the domain type.
    fn into_customer(self) -> Result<Customer, RepositoryError> {
        let email = Email::parse(&self.email).map_err(|e| {
            RepositoryError::DataCorruption(format!("invalid email in database: {e}"))
        })?;

        Ok(Customer {
            id: self.id,
            first_name: self.first_name,
            last_name: self.last_name,
            email,
            phone: self.phone,
            address: self.address,
            verified: self.verified,
            created_at: self.created_at,
        })
    }
}

const SELECT_COLUMNS: &str = r"
    id_cliente AS id,
    nombre AS first_name,
    apellido AS last_name,
    correo_electronico AS email,
    telefono AS phone,
    direccion AS address,
    verificado AS verified,
    created_at
";

/// Repository for customer database operations.
pub struct CustomerRepository<'a> {
    pool: &'a PgPool,
}

impl<'a> CustomerRepository<'a> {
    /// Create a new customer repository.
    #[must_use]
    pub const fn new(pool: &'a PgPool) -> Self {
        Self { pool }
    }

    /// Insert a new, unverified customer.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Conflict` if the email already exists.
    /// Returns `RepositoryError::Database` for other database errors.
    pub async fn create(
        &self,
        first_name: &str,
        last_name: &str,
        email: &Email,
        password_hash: &str,
        phone: &str,
        address: &str,
    ) -> Result<Customer, RepositoryError> {
        let sql = format!(
            r"
            INSERT INTO cliente
                (nombre, apellido, correo_electronico, contrasena, telefono, direccion, verificado)
            VALUES ($1, $2, $3, $4, $5, $6, FALSE)
            RETURNING {SELECT_COLUMNS}
            "
        );

        let row = sqlx::query_as::<_, CustomerRow>(&sql)
            .bind(first_name)
            .bind(last_name)
            .bind(email.as_str())
            .bind(password_hash)
            .bind(phone)
            .bind(address)
            .fetch_one(self.pool)
            .await
            .map_err(|e| {
                if let sqlx::Error::Database(ref db_err) = e
                    && db_err.is_unique_violation()
                {
                    return RepositoryError::Conflict("email already exists".to_owned());
                }
                RepositoryError::Database(e)
            })?;

        row.into_customer()
    }

    /// Get a customer by their ID.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    /// Returns `RepositoryError::DataCorruption` if the stored email is invalid.
    pub async fn get_by_id(&self, id: CustomerId) -> Result<Option<Customer>, RepositoryError> {
        let sql = format!("SELECT {SELECT_COLUMNS} FROM cliente WHERE id_cliente = $1");

        let row = sqlx::query_as::<_, CustomerRow>(&sql)
            .bind(id)
            .fetch_optional(self.pool)
            .await?;

        row.map(CustomerRow::into_customer).transpose()
    }

    /// Get a customer and their password hash by email.
    ///
    /// Returns `None` if no customer is registered under this email.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn get_with_password_hash(
        &self,
        email: &Email,
    ) -> Result<Option<(Customer, String)>, RepositoryError> {
        #[derive(FromRow)]
        struct AuthRow {
            #[sqlx(flatten)]
            customer: CustomerRow,
            password_hash: String,
        }

        let sql = format!(
            r"
            SELECT {SELECT_COLUMNS}, contrasena AS password_hash
            FROM cliente
            WHERE correo_electronico = $1
            "
        );

        let row = sqlx::query_as::<_, AuthRow>(&sql)
            .bind(email.as_str())
            .fetch_optional(self.pool)
            .await?;

        match row {
            Some(r) => Ok(Some((r.customer.into_customer()?, r.password_hash))),
            None => Ok(None),
        }
    }

    /// Update the editable profile fields.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::NotFound` if the customer doesn't exist.
    /// Returns `RepositoryError::Database` for other database errors.
    pub async fn update_profile(
        &self,
        id: CustomerId,
        first_name: &str,
        last_name: &str,
        phone: &str,
        address: &str,
    ) -> Result<(), RepositoryError> {
        let result = sqlx::query(
            r"
            UPDATE cliente
            SET nombre = $1, apellido = $2, telefono = $3, direccion = $4
            WHERE id_cliente = $5
            ",
        )
        .bind(first_name)
        .bind(last_name)
        .bind(phone)
        .bind(address)
        .bind(id)
        .execute(self.pool)
        .await?;

        if result.rows_affected() == 0 {
            return Err(RepositoryError::NotFound);
        }

        Ok(())
    }

    /// Mark a customer's email as verified.
    ///
    /// Re-verifying an already-verified account is a no-op that still
    /// succeeds; only an unknown email yields `NotFound`.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::NotFound` if no customer has this email.
    /// Returns `RepositoryError::Database` for other database errors.
    pub async fn mark_verified(&self, email: &Email) -> Result<(), RepositoryError> {
        let result = sqlx::query(
            r"
            UPDATE cliente
            SET verificado = TRUE
            WHERE correo_electronico = $1
            ",
        )
        .bind(email.as_str())
        .execute(self.pool)
        .await?;

        if result.rows_affected() == 0 {
            return Err(RepositoryError::NotFound);
        }

        Ok(())
    }
}
