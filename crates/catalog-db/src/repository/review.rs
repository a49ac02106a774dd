//! # Review Operations
//!
//! Review inserts and the composite product detail fetch.
//!
//! ## Detail Fetch
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  get_product_details(7)             (one session, two statements)       │
//! │                                                                         │
//! │  1. SELECT p.*, pc.name AS category_name                               │
//! │     FROM products p JOIN product_category pc ON p.category = pc.id     │
//! │     WHERE p.id = 7                                                     │
//! │          │                                                              │
//! │          ├── no row ──► Ok(None)   (reviews are not queried)           │
//! │          ▼                                                              │
//! │  2. SELECT * FROM review WHERE product = 7                             │
//! │          │                                                              │
//! │          ▼                                                              │
//! │  ProductDetail { product, category_name, reviews }                     │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use catalog_core::ProductDetail;
use sqlx::SqliteConnection;
use tracing::{debug, info};

use super::ProductRepository;
use crate::error::DbResult;
use crate::mapper;

async fn fetch_detail(
    conn: &mut SqliteConnection,
    product_id: i64,
) -> Result<Option<ProductDetail>, sqlx::Error> {
    let row = sqlx::query(
        r#"
        SELECT p.*, pc.name AS category_name
        FROM products p
        JOIN product_category pc ON p.category = pc.id
        WHERE p.id = ?1
        "#,
    )
    .bind(product_id)
    .fetch_optional(&mut *conn)
    .await?;

    let Some(row) = row else {
        return Ok(None);
    };
    let detail = mapper::product_detail(&row)?;

    let review_rows = sqlx::query(
        r#"SELECT * FROM review WHERE product = ?1 ORDER BY created_at, "revId""#,
    )
    .bind(product_id)
    .fetch_all(&mut *conn)
    .await?;
    let reviews = review_rows
        .iter()
        .map(mapper::review)
        .collect::<Result<Vec<_>, _>>()?;

    Ok(Some(detail.with_reviews(reviews)))
}

impl ProductRepository {
    /// Inserts a review. Id and timestamp are assigned by the store.
    ///
    /// ## Returns
    /// * `Ok(rev_id)` - The new review's id
    /// * `Err(DbError::ForeignKeyViolation)` - Product doesn't exist
    pub async fn add_review(
        &self,
        product_id: i64,
        star: i32,
        description: &str,
    ) -> DbResult<i64> {
        debug!(product_id, star, "Adding review");

        let mut session = self.provider.connect("add_review").await?;
        let result =
            sqlx::query("INSERT INTO review (product, star, description) VALUES (?1, ?2, ?3)")
                .bind(product_id)
                .bind(star)
                .bind(description)
                .execute(session.conn())
                .await
                .map(|done| done.last_insert_rowid());
        let rev_id = session.finish(result).await?;

        info!(product_id, rev_id, "Review added");
        Ok(rev_id)
    }

    /// Fetches a product with its category name and reviews.
    ///
    /// ## Returns
    /// * `Ok(Some(detail))` - Product and category found; reviews may be empty
    /// * `Ok(None)` - No product with that id, or its category is missing
    pub async fn get_product_details(&self, product_id: i64) -> DbResult<Option<ProductDetail>> {
        let mut session = self.provider.connect("get_product_details").await?;
        let result = fetch_detail(session.conn(), product_id).await;
        let detail = session.finish(result).await?;

        debug!(
            product_id,
            found = detail.is_some(),
            reviews = detail.as_ref().map_or(0, |d| d.reviews.len()),
            "Product details fetched"
        );
        Ok(detail)
    }
}
