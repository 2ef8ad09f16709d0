//! Order placement.
//!
//! Converts a customer's cart rows into an order plus order-line rows and
//! clears the cart, all inside one transaction. The cart rows are locked
//! with `FOR UPDATE` so two checkouts for the same customer serialize: the
//! second transaction blocks, then sees an empty cart.

use sqlx::{FromRow, PgPool};
use thiserror::Error;
use tracing::debug;

use farmacia_core::{CustomerId, OrderId, PricedLine, ProductId, order_total};

use super::RepositoryError;

/// Errors from order placement.
#[derive(Debug, Error)]
pub enum CheckoutError {
    /// The customer has no cart lines; nothing was written.
    #[error("cart is empty")]
    EmptyCart,

    /// Underlying repository failure; the transaction was rolled back.
    #[error(transparent)]
    Repository(#[from] RepositoryError),
}

impl From<sqlx::Error> for CheckoutError {
    fn from(e: sqlx::Error) -> Self {
        Self::Repository(RepositoryError::Database(e))
    }
}

/// A cart line joined with the authoritative unit price, read under lock.
#[derive(Debug, FromRow)]
struct CartLine {
    product_id: ProductId,
    unit_price: rust_decimal::Decimal,
    quantity: i32,
}

/// Repository for placing orders.
pub struct OrderRepository<'a> {
    pool: &'a PgPool,
}

impl<'a> OrderRepository<'a> {
    /// Create a new order repository.
    #[must_use]
    pub const fn new(pool: &'a PgPool) -> Self {
        Self { pool }
    }

    /// Place an order from the customer's current cart.
    ///
    /// In one transaction: read the cart lines joined with current prices
    /// (locking the cart rows), compute the total, insert the order and its
    /// items, and delete the cart. Any failure rolls back every step.
    ///
    /// # Errors
    ///
    /// Returns `CheckoutError::EmptyCart` if the customer has no cart lines.
    /// Returns `CheckoutError::Repository` for database failures.
    pub async fn place_order(
        &self,
        customer_id: CustomerId,
        payment_method: &str,
        notes: &str,
    ) -> Result<OrderId, CheckoutError> {
        let mut tx = self.pool.begin().await?;

        // Lock the customer's cart partition for the duration of the
        // transaction; prices are read inside it, so they cannot go stale
        // between the read and the order insert.
        let lines = sqlx::query_as::<_, CartLine>(
            r"
            SELECT c.id_producto AS product_id,
                   p.mrp AS unit_price,
                   c.cantidad AS quantity
            FROM carrito c
            JOIN product p ON c.id_producto = p.product_id
            WHERE c.id_cliente = $1
            ORDER BY c.id_producto
            FOR UPDATE OF c
            ",
        )
        .bind(customer_id)
        .fetch_all(&mut *tx)
        .await?;

        if lines.is_empty() {
            return Err(CheckoutError::EmptyCart);
        }

        let priced: Vec<PricedLine> = lines
            .iter()
            .map(|l| PricedLine {
                unit_price: l.unit_price,
                quantity: l.quantity,
            })
            .collect();
        let total = order_total(&priced);

        let order_id = sqlx::query_scalar::<_, OrderId>(
            r"
            INSERT INTO orders (client_id, total_amount, payment_method, notes)
            VALUES ($1, $2, $3, $4)
            RETURNING order_id
            ",
        )
        .bind(customer_id)
        .bind(total)
        .bind(payment_method)
        .bind(notes)
        .fetch_one(&mut *tx)
        .await?;

        for line in &lines {
            sqlx::query(
                r"
                INSERT INTO order_item (order_id, product_id, quantity)
                VALUES ($1, $2, $3)
                ",
            )
            .bind(order_id)
            .bind(line.product_id)
            .bind(line.quantity)
            .execute(&mut *tx)
            .await?;
        }

        sqlx::query("DELETE FROM carrito WHERE id_cliente = $1")
            .bind(customer_id)
            .execute(&mut *tx)
            .await?;

        tx.commit().await?;

        debug!(%order_id, %customer_id, %total, lines = lines.len(), "order placed");

        Ok(order_id)
    }
}
