//! Catalog repository: categories, subcategories, products and banners.
//!
//! Everything here is read-only; catalog maintenance happens out of band.

use sqlx::PgPool;

use farmacia_core::{CategoryId, SubcategoryId};

use super::RepositoryError;
use crate::models::{Banner, BannerKind, Category, Product, Subcategory};

/// Columns selected for product listings, joined with the brand name.
const PRODUCT_COLUMNS: &str = r"
    p.product_id AS id,
    p.product_name AS name,
    p.product_image AS image,
    b.brand_name,
    p.rate,
    p.mrp
";

/// Repository for catalog reads.
pub struct CatalogRepository<'a> {
    pool: &'a PgPool,
}

impl<'a> CatalogRepository<'a> {
    /// Create a new catalog repository.
    #[must_use]
    pub const fn new(pool: &'a PgPool) -> Self {
        Self { pool }
    }

    /// List categories visible to shoppers, in id order.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn active_categories(&self) -> Result<Vec<Category>, RepositoryError> {
        let rows = sqlx::query_as::<_, Category>(
            r"
            SELECT id_categoria AS id, nombre AS name
            FROM categories
            WHERE activo = TRUE
            ORDER BY id_categoria
            ",
        )
        .fetch_all(self.pool)
        .await?;

        Ok(rows)
    }

    /// List every category, visible or not (used by the JSON endpoint).
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn all_categories(&self) -> Result<Vec<Category>, RepositoryError> {
        let rows = sqlx::query_as::<_, Category>(
            r"
            SELECT id_categoria AS id, nombre AS name
            FROM categories
            ORDER BY id_categoria
            ",
        )
        .fetch_all(self.pool)
        .await?;

        Ok(rows)
    }

    /// List the subcategories of one category.
    ///
    /// An unknown category id simply yields an empty list.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn subcategories(
        &self,
        category_id: CategoryId,
    ) -> Result<Vec<Subcategory>, RepositoryError> {
        let rows = sqlx::query_as::<_, Subcategory>(
            r"
            SELECT id_subcategoria AS id, nombre AS name
            FROM subcategorias
            WHERE id_categoria = $1
            ORDER BY id_subcategoria
            ",
        )
        .bind(category_id)
        .fetch_all(self.pool)
        .await?;

        Ok(rows)
    }

    /// List active products joined with their brand name.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn active_products(&self) -> Result<Vec<Product>, RepositoryError> {
        let sql = format!(
            r"
            SELECT {PRODUCT_COLUMNS}
            FROM product p
            JOIN brands b ON p.brand_id = b.brand_id
            WHERE p.active = TRUE
            ORDER BY p.product_id
            "
        );

        let rows = sqlx::query_as::<_, Product>(&sql)
            .fetch_all(self.pool)
            .await?;

        Ok(rows)
    }

    /// Fetch a subcategory's name together with its products.
    ///
    /// Returns `None` if the subcategory does not exist (products may still
    /// be an empty list for an existing subcategory).
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if a query fails.
    pub async fn subcategory_products(
        &self,
        subcategory_id: SubcategoryId,
    ) -> Result<Option<(String, Vec<Product>)>, RepositoryError> {
        let name = sqlx::query_scalar::<_, String>(
            r"
            SELECT nombre
            FROM subcategorias
            WHERE id_subcategoria = $1
            ",
        )
        .bind(subcategory_id)
        .fetch_optional(self.pool)
        .await?;

        let Some(name) = name else {
            return Ok(None);
        };

        let sql = format!(
            r"
            SELECT {PRODUCT_COLUMNS}
            FROM product p
            JOIN brands b ON p.brand_id = b.brand_id
            WHERE p.subcategoria_id = $1
            ORDER BY p.product_id
            "
        );

        let products = sqlx::query_as::<_, Product>(&sql)
            .bind(subcategory_id)
            .fetch_all(self.pool)
            .await?;

        Ok(Some((name, products)))
    }

    /// Substring search over product and brand names, case-insensitive.
    ///
    /// Callers short-circuit empty terms before reaching this query.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn search_products(&self, term: &str) -> Result<Vec<Product>, RepositoryError> {
        let pattern = format!("%{term}%");

        let sql = format!(
            r"
            SELECT {PRODUCT_COLUMNS}
            FROM product p
            JOIN brands b ON p.brand_id = b.brand_id
            WHERE p.product_name ILIKE $1
               OR b.brand_name ILIKE $1
            ORDER BY p.product_id
            "
        );

        let rows = sqlx::query_as::<_, Product>(&sql)
            .bind(pattern)
            .fetch_all(self.pool)
            .await?;

        Ok(rows)
    }

    /// List active banners of one kind, in their explicit display order.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn banners(&self, kind: BannerKind) -> Result<Vec<Banner>, RepositoryError> {
        let rows = sqlx::query_as::<_, Banner>(
            r"
            SELECT imagen AS image
            FROM banners
            WHERE activo = TRUE AND tipo = $1
            ORDER BY orden ASC
            ",
        )
        .bind(kind.as_str())
        .fetch_all(self.pool)
        .await?;

        Ok(rows)
    }
}
