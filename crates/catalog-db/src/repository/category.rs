//! # Category Operations
//!
//! Categories are only created and deleted here; their names are read
//! through the product detail join.

use tracing::{debug, info};

use super::ProductRepository;
use crate::error::DbResult;

impl ProductRepository {
    /// Creates a category.
    ///
    /// ## Returns
    /// The store-assigned category id.
    pub async fn create_category(&self, name: &str, description: &str) -> DbResult<i64> {
        debug!(name, "Creating category");

        let mut session = self.provider.connect("create_category").await?;
        let result = sqlx::query("INSERT INTO product_category (name, description) VALUES (?1, ?2)")
            .bind(name)
            .bind(description)
            .execute(session.conn())
            .await
            .map(|done| done.last_insert_rowid());
        let id = session.finish(result).await?;

        info!(id, name, "Category created");
        Ok(id)
    }

    /// Deletes a category.
    ///
    /// ## Returns
    /// * `Ok(affected)` - `1`, or `0` when no such category exists
    /// * `Err(DbError::ForeignKeyViolation)` - Products still reference it
    pub async fn delete_category(&self, category_id: i64) -> DbResult<u64> {
        debug!(category_id, "Deleting category");

        let mut session = self.provider.connect("delete_category").await?;
        let result = sqlx::query("DELETE FROM product_category WHERE id = ?1")
            .bind(category_id)
            .execute(session.conn())
            .await
            .map(|done| done.rows_affected());
        let affected = session.finish(result).await?;

        info!(category_id, affected, "Category deleted");
        Ok(affected)
    }
}
