//! # Row Mapper
//!
//! Converts SQLite result rows into catalog entities.
//!
//! ## Column Contract
//! ```text
//! products          id, name, description, category, price, stock_quantity,
//!                   weight, image_url, created_at, is_available
//! review            revId, product, star, description, created_at
//! detail join       products columns + category_name
//! ```
//!
//! Mapping failures surface as `sqlx::Error::ColumnNotFound` /
//! `ColumnDecode`, which the session converts to `DbError::Mapping`.

use catalog_core::{Product, ProductDetail, Review};
use sqlx::sqlite::SqliteRow;
use sqlx::Row;

/// Maps a `products` row.
pub fn product(row: &SqliteRow) -> Result<Product, sqlx::Error> {
    Ok(Product {
        id: row.try_get("id")?,
        name: row.try_get("name")?,
        description: row.try_get("description")?,
        category_id: row.try_get("category")?,
        price: row.try_get("price")?,
        stock_quantity: row.try_get("stock_quantity")?,
        weight: row.try_get("weight")?,
        image_url: row.try_get("image_url")?,
        created_at: row.try_get("created_at")?,
        is_available: row.try_get("is_available")?,
    })
}

/// Maps every row with [`product`], keeping order.
pub fn products(rows: &[SqliteRow]) -> Result<Vec<Product>, sqlx::Error> {
    rows.iter().map(product).collect()
}

/// Maps a `review` row.
pub fn review(row: &SqliteRow) -> Result<Review, sqlx::Error> {
    Ok(Review {
        rev_id: row.try_get("revId")?,
        product_id: row.try_get("product")?,
        star: row.try_get("star")?,
        description: row.try_get("description")?,
        created_at: row.try_get("created_at")?,
    })
}

/// Maps a product/category join row. Reviews are attached separately.
pub fn product_detail(row: &SqliteRow) -> Result<ProductDetail, sqlx::Error> {
    let category_name: String = row.try_get("category_name")?;
    Ok(ProductDetail::new(product(row)?, category_name))
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use sqlx::{Connection, SqliteConnection};

    async fn memory() -> SqliteConnection {
        SqliteConnection::connect("sqlite::memory:").await.unwrap()
    }

    #[tokio::test]
    async fn test_maps_product_row() {
        let mut conn = memory().await;
        let row = sqlx::query(
            r#"
            SELECT 7 AS id, 'Widget' AS name, NULL AS description, 2 AS category,
                   20.5 AS price, 10 AS stock_quantity, 0.25 AS weight,
                   'w.png' AS image_url, '2026-01-02T03:04:05.678Z' AS created_at,
                   1 AS is_available
            "#,
        )
        .fetch_one(&mut conn)
        .await
        .unwrap();

        let product = product(&row).unwrap();
        assert_eq!(product.id, 7);
        assert_eq!(product.name, "Widget");
        assert_eq!(product.description, None);
        assert_eq!(product.category_id, 2);
        assert_eq!(product.price, 20.5);
        assert_eq!(product.stock_quantity, 10);
        assert_eq!(product.image_url.as_deref(), Some("w.png"));
        assert_eq!(product.created_at.to_rfc3339(), "2026-01-02T03:04:05.678+00:00");
        assert!(product.is_available);
    }

    #[tokio::test]
    async fn test_missing_column_is_an_error() {
        let mut conn = memory().await;
        let row = sqlx::query("SELECT 1 AS id, 'Widget' AS name")
            .fetch_one(&mut conn)
            .await
            .unwrap();

        let err = product(&row).unwrap_err();
        assert!(matches!(err, sqlx::Error::ColumnNotFound(ref c) if c == "description"));
    }

    #[tokio::test]
    async fn test_maps_review_row() {
        let mut conn = memory().await;
        let row = sqlx::query(
            r#"
            SELECT 3 AS "revId", 7 AS product, 5 AS star, 'Great' AS description,
                   '2026-01-02T03:04:05.000Z' AS created_at
            "#,
        )
        .fetch_one(&mut conn)
        .await
        .unwrap();

        let review = review(&row).unwrap();
        assert_eq!(review.rev_id, 3);
        assert_eq!(review.product_id, 7);
        assert_eq!(review.star, 5);
        assert_eq!(review.description.as_deref(), Some("Great"));
    }
}
