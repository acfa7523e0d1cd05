//! Read-only catalog queries for the product manager panels.

use sqlx::PgPool;

use super::RepositoryError;
use crate::models::{OrderSummary, ProductSummary};

/// Upper bound on rows a panel lists.
pub const PANEL_LIMIT: i64 = 50;

/// Repository for product and order summaries.
pub struct CatalogRepository<'a> {
    pool: &'a PgPool,
}

impl<'a> CatalogRepository<'a> {
    /// Create a new catalog repository.
    #[must_use]
    pub const fn new(pool: &'a PgPool) -> Self {
        Self { pool }
    }

    /// Most recently updated products.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn recent_products(&self, limit: i64) -> Result<Vec<ProductSummary>, RepositoryError> {
        let rows = sqlx::query_as(
            r"
            SELECT id, title, price, inventory
            FROM shop.product
            ORDER BY updated_at DESC, id DESC
            LIMIT $1
            ",
        )
        .bind(limit)
        .fetch_all(self.pool)
        .await?;
        Ok(rows)
    }

    /// Most recent orders.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn recent_orders(&self, limit: i64) -> Result<Vec<OrderSummary>, RepositoryError> {
        let rows = sqlx::query_as(
            r#"
            SELECT id, number, customer_name, total, status, created_at
            FROM shop."order"
            ORDER BY created_at DESC, id DESC
            LIMIT $1
            "#,
        )
        .bind(limit)
        .fetch_all(self.pool)
        .await?;
        Ok(rows)
    }
}
