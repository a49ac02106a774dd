//! # Product Operations
//!
//! CRUD, filtered queries and counts over the `products` table.
//!
//! ## Key Operations
//! - Inserts (single and batched in one transaction)
//! - Full-row and stock-only updates
//! - Range, availability, category and name filters
//! - Scalar and grouped counts
//!
//! ## Missing Rows
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────┐
//! │  update / delete / update_stock on an unknown id                    │
//! │                                                                     │
//! │     UPDATE products SET ... WHERE id = 42   → 0 rows affected       │
//! │                                                                     │
//! │  Not an error: the call returns Ok(0) and nothing is inserted.      │
//! │  The row count lets callers tell "changed" from "absent".           │
//! └─────────────────────────────────────────────────────────────────────┘
//! ```

use catalog_core::{CategoryCounts, Product};
use sqlx::query::Query;
use sqlx::sqlite::{Sqlite, SqliteArguments};
use sqlx::{Connection, SqliteConnection};
use tracing::{debug, info};

use super::ProductRepository;
use crate::error::DbResult;
use crate::mapper;

pub(crate) type SqliteQuery<'q> = Query<'q, Sqlite, SqliteArguments<'q>>;

const INSERT_PRODUCT: &str = r#"
    INSERT INTO products (
        name, description, category, price,
        stock_quantity, weight, image_url, is_available
    ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8)
"#;

/// Binds the eight client-controlled columns, in `INSERT_PRODUCT` order.
fn bind_product<'q>(query: SqliteQuery<'q>, product: &'q Product) -> SqliteQuery<'q> {
    query
        .bind(product.name.as_str())
        .bind(product.description.as_deref())
        .bind(product.category_id)
        .bind(product.price)
        .bind(product.stock_quantity)
        .bind(product.weight)
        .bind(product.image_url.as_deref())
        .bind(product.is_available)
}

/// Builds an unanchored `LIKE` pattern that matches `needle` literally.
fn contains_pattern(needle: &str) -> String {
    let mut pattern = String::with_capacity(needle.len() + 2);
    pattern.push('%');
    for c in needle.chars() {
        if matches!(c, '\\' | '%' | '_') {
            pattern.push('\\');
        }
        pattern.push(c);
    }
    pattern.push('%');
    pattern
}

async fn fetch_products(
    conn: &mut SqliteConnection,
    query: SqliteQuery<'_>,
) -> Result<Vec<Product>, sqlx::Error> {
    let rows = query.fetch_all(conn).await?;
    mapper::products(&rows)
}

impl ProductRepository {
    /// Runs a multi-row product query in its own session.
    pub(crate) async fn query_products(
        &self,
        operation: &'static str,
        query: SqliteQuery<'_>,
    ) -> DbResult<Vec<Product>> {
        let mut session = self.provider.connect(operation).await?;
        let result = fetch_products(session.conn(), query).await;
        let products = session.finish(result).await?;

        debug!(operation, count = products.len(), "Query returned products");
        Ok(products)
    }

    // =========================================================================
    // Commands
    // =========================================================================

    /// Inserts a new product.
    ///
    /// `id` and `created_at` on the passed value are ignored; the store
    /// assigns both.
    ///
    /// ## Returns
    /// * `Ok(id)` - The store-assigned id
    /// * `Err(DbError::ForeignKeyViolation)` - Category doesn't exist
    pub async fn save(&self, product: &Product) -> DbResult<i64> {
        debug!(name = %product.name, "Saving product");

        let mut session = self.provider.connect("save").await?;
        let result = bind_product(sqlx::query(INSERT_PRODUCT), product)
            .execute(session.conn())
            .await
            .map(|done| done.last_insert_rowid());
        let id = session.finish(result).await?;

        info!(id, name = %product.name, "Product saved");
        Ok(id)
    }

    /// Inserts every product in one transaction.
    ///
    /// Either all rows are inserted or none are.
    ///
    /// ## Returns
    /// Number of inserted rows.
    pub async fn save_all(&self, products: &[Product]) -> DbResult<u64> {
        if products.is_empty() {
            return Ok(0);
        }

        debug!(count = products.len(), "Saving product batch");

        let mut session = self.provider.connect("save_all").await?;
        let result: Result<u64, sqlx::Error> = async {
            let mut tx = session.conn().begin().await?;
            for product in products {
                bind_product(sqlx::query(INSERT_PRODUCT), product)
                    .execute(&mut *tx)
                    .await?;
            }
            tx.commit().await?;
            Ok(products.len() as u64)
        }
        .await;
        let inserted = session.finish(result).await?;

        info!(count = inserted, "All products saved");
        Ok(inserted)
    }

    /// Overwrites every client-controlled column of the row with `product.id`.
    ///
    /// ## Returns
    /// Rows affected: `1`, or `0` when no such product exists.
    pub async fn update(&self, product: &Product) -> DbResult<u64> {
        debug!(id = product.id, "Updating product");

        let query = sqlx::query(
            r#"
            UPDATE products SET
                name = ?1,
                description = ?2,
                category = ?3,
                price = ?4,
                stock_quantity = ?5,
                weight = ?6,
                image_url = ?7,
                is_available = ?8
            WHERE id = ?9
            "#,
        );

        let mut session = self.provider.connect("update").await?;
        let result = bind_product(query, product)
            .bind(product.id)
            .execute(session.conn())
            .await
            .map(|done| done.rows_affected());
        let affected = session.finish(result).await?;

        info!(id = product.id, affected, "Product updated");
        Ok(affected)
    }

    /// Deletes a product by id. Reviews and featured windows go with it.
    ///
    /// ## Returns
    /// Rows affected: `1`, or `0` when no such product exists.
    pub async fn delete(&self, id: i64) -> DbResult<u64> {
        debug!(id, "Deleting product");

        let mut session = self.provider.connect("delete").await?;
        let result = sqlx::query("DELETE FROM products WHERE id = ?1")
            .bind(id)
            .execute(session.conn())
            .await
            .map(|done| done.rows_affected());
        let affected = session.finish(result).await?;

        info!(id, affected, "Product deleted");
        Ok(affected)
    }

    /// Sets the stock level of one product.
    ///
    /// ## Arguments
    /// * `product_id` - Product ID
    /// * `new_quantity` - Absolute stock level (any sign)
    ///
    /// ## Returns
    /// Rows affected: `1`, or `0` when no such product exists.
    pub async fn update_stock(&self, product_id: i64, new_quantity: i64) -> DbResult<u64> {
        debug!(product_id, new_quantity, "Updating stock");

        let mut session = self.provider.connect("update_stock").await?;
        let result = sqlx::query("UPDATE products SET stock_quantity = ?1 WHERE id = ?2")
            .bind(new_quantity)
            .bind(product_id)
            .execute(session.conn())
            .await
            .map(|done| done.rows_affected());
        let affected = session.finish(result).await?;

        info!(product_id, affected, "Stock quantity updated");
        Ok(affected)
    }

    // =========================================================================
    // Queries
    // =========================================================================

    /// Lists every product, by id.
    pub async fn find_all(&self) -> DbResult<Vec<Product>> {
        self.query_products("find_all", sqlx::query("SELECT * FROM products ORDER BY id"))
            .await
    }

    /// Gets a product by its id.
    ///
    /// ## Returns
    /// * `Ok(Some(Product))` - Product found
    /// * `Ok(None)` - Product not found
    pub async fn find_by_id(&self, id: i64) -> DbResult<Option<Product>> {
        let mut session = self.provider.connect("find_by_id").await?;
        let result = sqlx::query("SELECT * FROM products WHERE id = ?1")
            .bind(id)
            .fetch_optional(session.conn())
            .await
            .and_then(|row| row.as_ref().map(mapper::product).transpose());

        session.finish(result).await
    }

    /// Products in one category.
    pub async fn find_by_category(&self, category_id: i64) -> DbResult<Vec<Product>> {
        let query = sqlx::query("SELECT * FROM products WHERE category = ?1 ORDER BY id")
            .bind(category_id);
        self.query_products("find_by_category", query).await
    }

    /// Products whose availability flag equals `available`.
    pub async fn find_by_availability(&self, available: bool) -> DbResult<Vec<Product>> {
        let query = sqlx::query("SELECT * FROM products WHERE is_available = ?1 ORDER BY id")
            .bind(available);
        self.query_products("find_by_availability", query).await
    }

    /// Products with `min <= price <= max`. Empty when `min > max`.
    pub async fn find_by_price_range(&self, min: f64, max: f64) -> DbResult<Vec<Product>> {
        let query =
            sqlx::query("SELECT * FROM products WHERE price BETWEEN ?1 AND ?2 ORDER BY id")
                .bind(min)
                .bind(max);
        self.query_products("find_by_price_range", query).await
    }

    /// Products with `min <= weight <= max`. Empty when `min > max`.
    pub async fn find_by_weight_range(&self, min: f64, max: f64) -> DbResult<Vec<Product>> {
        let query =
            sqlx::query("SELECT * FROM products WHERE weight BETWEEN ?1 AND ?2 ORDER BY id")
                .bind(min)
                .bind(max);
        self.query_products("find_by_weight_range", query).await
    }

    /// Products whose name contains `fragment` anywhere.
    ///
    /// Uses SQLite's `LIKE`, which ignores ASCII case. Wildcard characters in
    /// `fragment` match themselves.
    pub async fn search_by_name(&self, fragment: &str) -> DbResult<Vec<Product>> {
        debug!(fragment, "Searching products by name");

        let query = sqlx::query(
            r#"SELECT * FROM products WHERE name LIKE ?1 ESCAPE '\' ORDER BY id"#,
        )
        .bind(contains_pattern(fragment));
        self.query_products("search_by_name", query).await
    }

    /// The `limit` most recently created products, newest first.
    pub async fn find_recent(&self, limit: u32) -> DbResult<Vec<Product>> {
        let query = sqlx::query(
            "SELECT * FROM products ORDER BY created_at DESC, id DESC LIMIT ?1",
        )
        .bind(limit);
        self.query_products("find_recent", query).await
    }

    /// Products with `stock_quantity < threshold`.
    pub async fn find_low_stock(&self, threshold: i64) -> DbResult<Vec<Product>> {
        let query =
            sqlx::query("SELECT * FROM products WHERE stock_quantity < ?1 ORDER BY id")
                .bind(threshold);
        self.query_products("find_low_stock", query).await
    }

    /// Counts all products.
    pub async fn count_products(&self) -> DbResult<i64> {
        let mut session = self.provider.connect("count_products").await?;
        let result = sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM products")
            .fetch_one(session.conn())
            .await;

        session.finish(result).await
    }

    /// Product count per category id.
    ///
    /// Categories with no products have no entry.
    pub async fn count_products_by_category(&self) -> DbResult<CategoryCounts> {
        let mut session = self.provider.connect("count_products_by_category").await?;
        let result = sqlx::query_as::<_, (i64, i64)>(
            "SELECT category, COUNT(*) AS count FROM products GROUP BY category",
        )
        .fetch_all(session.conn())
        .await;
        let rows = session.finish(result).await?;

        Ok(rows.into_iter().collect())
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
