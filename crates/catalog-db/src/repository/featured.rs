//! # Featured Listings
//!
//! A product is featured over a `from`..`to` window. Each product holds at
//! most one window; the `featured_product` row is keyed by the product id.
//!
//! Windows are stored as RFC 3339 text and compared through `julianday()`,
//! so differing fractional-second widths still order correctly.

use catalog_core::Product;
use chrono::{DateTime, Utc};
use tracing::{debug, info};

use super::ProductRepository;
use crate::error::DbResult;

impl ProductRepository {
    /// Features a product between `from` and `to` (inclusive).
    ///
    /// ## Returns
    /// * `Ok(())` - Window recorded
    /// * `Err(DbError::UniqueViolation)` - Product already has a window
    /// * `Err(DbError::ForeignKeyViolation)` - Product doesn't exist
    pub async fn add_product_to_featured(
        &self,
        product_id: i64,
        from: DateTime<Utc>,
        to: DateTime<Utc>,
    ) -> DbResult<()> {
        debug!(product_id, %from, %to, "Adding product to featured list");

        let mut session = self.provider.connect("add_product_to_featured").await?;
        let result = sqlx::query(r#"INSERT INTO featured_product (id, "from", "to") VALUES (?1, ?2, ?3)"#)
            .bind(product_id)
            .bind(from)
            .bind(to)
            .execute(session.conn())
            .await
            .map(|_| ());
        session.finish(result).await?;

        info!(product_id, %from, %to, "Product added to featured list");
        Ok(())
    }

    /// [`add_product_to_featured`](Self::add_product_to_featured) for a loaded product.
    pub async fn feature_product(
        &self,
        product: &Product,
        from: DateTime<Utc>,
        to: DateTime<Utc>,
    ) -> DbResult<()> {
        self.add_product_to_featured(product.id, from, to).await
    }

    /// Removes a product's featured window.
    ///
    /// ## Returns
    /// Rows affected: `1`, or `0` when the product was not featured.
    pub async fn remove_product_from_featured(&self, product_id: i64) -> DbResult<u64> {
        debug!(product_id, "Removing product from featured list");

        let mut session = self.provider.connect("remove_product_from_featured").await?;
        let result = sqlx::query("DELETE FROM featured_product WHERE id = ?1")
            .bind(product_id)
            .execute(session.conn())
            .await
            .map(|done| done.rows_affected());
        let affected = session.finish(result).await?;

        info!(product_id, affected, "Product removed from featured list");
        Ok(affected)
    }

    /// [`remove_product_from_featured`](Self::remove_product_from_featured) for a loaded product.
    pub async fn unfeature_product(&self, product: &Product) -> DbResult<u64> {
        self.remove_product_from_featured(product.id).await
    }

    /// Products whose featured window contains `at`.
    pub async fn find_featured_at(&self, at: DateTime<Utc>) -> DbResult<Vec<Product>> {
        let query = sqlx::query(
            r#"
            SELECT p.*
            FROM products p
            JOIN featured_product f ON f.id = p.id
            WHERE julianday(f."from") <= julianday(?1)
              AND julianday(?1) <= julianday(f."to")
            ORDER BY p.id
            "#,
        )
        .bind(at);
        self.query_products("find_featured_at", query).await
    }
}
