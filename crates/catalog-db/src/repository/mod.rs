//! # Repository Module
//!
//! The catalog's single data-access component.
//!
//! ## Repository Pattern
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Repository Pattern Explained                         │
//! │                                                                         │
//! │  Caller                                                                │
//! │       │                                                                 │
//! │       │  repo.find_by_price_range(10.0, 20.0)                          │
//! │       ▼                                                                 │
//! │  ProductRepository                                                     │
//! │  ├── product.rs   CRUD, filters, counts                                │
//! │  ├── review.rs    add_review, get_product_details                      │
//! │  ├── featured.rs  featured windows                                     │
//! │  └── category.rs  create / delete category                             │
//! │       │                                                                 │
//! │       │  one Session per call                                          │
//! │       ▼                                                                 │
//! │  SQLite Database                                                       │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Result Policy
//! Every operation returns a [`DbResult`](crate::error::DbResult). Errors are
//! logged once by the session before being returned; callers that prefer an
//! empty default use `.unwrap_or_default()`.

pub mod category;
pub mod featured;
pub mod product;
pub mod review;

use crate::connection::{ConnectionProvider, Credentials, DbConfig};

/// Repository for catalog database operations.
///
/// Stateless apart from the immutable connection parameters; cloning is
/// cheap and clones may be used from any number of tasks at once.
///
/// ## Usage
/// ```rust,ignore
/// let repo = ProductRepository::new("data/catalog.db", "sa", "");
///
/// let id = repo.save(&Product::new("Widget", 1, 20.5)).await?;
/// let widget = repo.find_by_id(id).await?;
/// ```
#[derive(Debug, Clone)]
pub struct ProductRepository {
    provider: ConnectionProvider,
}

impl ProductRepository {
    /// Creates a repository with default connection options.
    ///
    /// `address` gets the `sqlite://` scheme prefixed when it has none.
    pub fn new(
        address: impl AsRef<str>,
        username: impl Into<String>,
        password: impl Into<String>,
    ) -> Self {
        Self::with_config(DbConfig::new(address, Credentials::new(username, password)))
    }

    /// Creates a repository from a full configuration.
    pub fn with_config(config: DbConfig) -> Self {
        ProductRepository {
            provider: ConnectionProvider::new(config),
        }
    }

    /// The connection provider used for each call.
    pub fn provider(&self) -> &ConnectionProvider {
        &self.provider
    }

    /// The normalized connection string.
    pub fn address(&self) -> &str {
        self.provider.config().address()
    }
}
