//! Database operations for the storefront `PostgreSQL` instance.
//!
//! ## Tables
//!
//! - `cliente` - Customer accounts and credentials
//! - `categories` / `subcategorias` - Catalog taxonomy
//! - `product` / `brands` - Catalog items (read-only here)
//! - `banners` - Homepage banner images
//! - `carrito` - Pending cart lines, cleared on checkout
//! - `orders` / `order_item` - Placed orders
//! - `tower_sessions.session` - Server-side session storage
//!
//! # Migrations
//!
//! Migrations live in `crates/storefront/migrations/` and are embedded into
//! the binary; [`run_migrations`] applies them at startup.
//!
//! Queries are runtime-checked (`sqlx::query` / `query_as`) so the crate
//! builds without a live database.

pub mod catalog;
pub mod customers;
pub mod orders;

use std::time::Duration;

use secrecy::ExposeSecret;
use sqlx::PgPool;
use sqlx::postgres::PgPoolOptions;
use thiserror::Error;

/// Errors from the repository layer.
#[derive(Debug, Error)]
pub enum RepositoryError {
    /// Database error from sqlx.
    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),

    /// Data in the database is corrupted or invalid.
    #[error("data corruption: {0}")]
    DataCorruption(String),

    /// Requested entity was not found.
    #[error("not found")]
    NotFound,

    /// Constraint violation (e.g., unique email).
    #[error("constraint violation: {0}")]
    Conflict(String),
}

/// Create a `PostgreSQL` connection pool with sensible defaults.
///
/// # Errors
///
/// Returns `sqlx::Error` if the connection cannot be established.
pub async fn create_pool(database_url: &secrecy::SecretString) -> Result<PgPool, sqlx::Error> {
    PgPoolOptions::new()
        .max_connections(10)
        .min_connections(2)
        .acquire_timeout(Duration::from_secs(10))
        .connect(database_url.expose_secret())
        .await
}

/// Apply embedded migrations.
///
/// # Errors
///
/// Returns `sqlx::migrate::MigrateError` if a migration fails or the
/// migration history diverges from the embedded set.
pub async fn run_migrations(pool: &PgPool) -> Result<(), sqlx::migrate::MigrateError> {
    sqlx::migrate!("./migrations").run(pool).await
}
