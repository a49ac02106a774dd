//! # Schema Bootstrap
//!
//! Creates the catalog tables when they are missing. Used by the seed tool
//! and the test suites; deployed stores are expected to carry the schema
//! already.
//!
//! ## Tables
//! ```text
//! product_category ◄──── products ◄──── review
//!     (id)          category (id)  product
//!                                 ◄──── featured_product
//!                                       id (one window per product)
//! ```
//!
//! Every statement is `IF NOT EXISTS`, so applying the schema twice is a
//! no-op. There is no versioning.

use tracing::info;

use crate::connection::ConnectionProvider;
use crate::error::DbResult;

/// Table and index definitions, in dependency order.
pub const SCHEMA: &[&str] = &[
    r#"
    CREATE TABLE IF NOT EXISTS product_category (
        id          INTEGER PRIMARY KEY AUTOINCREMENT,
        name        TEXT NOT NULL,
        description TEXT
    )
    "#,
    r#"
    CREATE TABLE IF NOT EXISTS products (
        id             INTEGER PRIMARY KEY AUTOINCREMENT,
        name           TEXT NOT NULL,
        description    TEXT,
        category       INTEGER NOT NULL REFERENCES product_category(id),
        price          REAL NOT NULL,
        stock_quantity INTEGER NOT NULL,
        weight         REAL NOT NULL,
        image_url      TEXT,
        created_at     TEXT NOT NULL DEFAULT (strftime('%Y-%m-%dT%H:%M:%fZ', 'now')),
        is_available   BOOLEAN NOT NULL
    )
    "#,
    r#"
    CREATE TABLE IF NOT EXISTS review (
        "revId"     INTEGER PRIMARY KEY AUTOINCREMENT,
        product     INTEGER NOT NULL REFERENCES products(id) ON DELETE CASCADE,
        star        INTEGER NOT NULL,
        description TEXT,
        created_at  TEXT NOT NULL DEFAULT (strftime('%Y-%m-%dT%H:%M:%fZ', 'now'))
    )
    "#,
    r#"
    CREATE TABLE IF NOT EXISTS featured_product (
        id     INTEGER PRIMARY KEY REFERENCES products(id) ON DELETE CASCADE,
        "from" TEXT NOT NULL,
        "to"   TEXT NOT NULL
    )
    "#,
    "CREATE INDEX IF NOT EXISTS idx_products_category ON products(category)",
    "CREATE INDEX IF NOT EXISTS idx_products_created_at ON products(created_at)",
    "CREATE INDEX IF NOT EXISTS idx_review_product ON review(product)",
];

/// Applies [`SCHEMA`] over a single session.
pub async fn ensure_schema(provider: &ConnectionProvider) -> DbResult<()> {
    let mut session = provider.connect("ensure_schema").await?;

    let mut result = Ok(());
    for statement in SCHEMA {
        if let Err(e) = sqlx::query(*statement).execute(session.conn()).await {
            result = Err(e);
            break;
        }
    }

    session.finish(result).await?;
    info!(tables = 4, "Catalog schema ready");
    Ok(())
}

// =============================================================================
// Unit Tests
// =============================================================================
