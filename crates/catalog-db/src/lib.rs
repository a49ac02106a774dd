//! # catalog-db: Database Layer for the Product Catalog
//!
//! This crate provides data access for the product catalog: products,
//! categories, reviews and featured listings. It uses SQLite with sqlx for
//! async operations.
//!
//! ## Architecture Position
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                        Catalog Data Flow                                │
//! │                                                                         │
//! │  Caller (service, CLI, seed tool)                                      │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  ┌─────────────────────────────────────────────────────────────────┐   │
//! │  │                    catalog-db (THIS CRATE)                      │   │
//! │  │                                                                 │   │
//! │  │   ┌───────────────┐    ┌───────────────┐    ┌──────────────┐  │   │
//! │  │   │  Connection   │    │  Repository   │    │    Mapper    │  │   │
//! │  │   │(connection.rs)│    │ (repository/) │    │ (mapper.rs)  │  │   │
//! │  │   │               │    │               │    │              │  │   │
//! │  │   │ DbConfig      │◄───│ ProductRepo   │───►│ row → entity │  │   │
//! │  │   │ Session       │    │               │    │              │  │   │
//! │  │   └───────────────┘    └───────────────┘    └──────────────┘  │   │
//! │  │                                                                 │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! │       │                                                                 │
//! │       ▼  one connection per call                                       │
//! │  ┌─────────────────────────────────────────────────────────────────┐   │
//! │  │                     SQLite Database                             │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Module Organization
//!
//! - [`connection`] - Address normalization, config, per-call sessions
//! - [`schema`] - Idempotent table bootstrap
//! - [`mapper`] - Row to entity conversion
//! - [`error`] - Database error types
//! - [`repository`] - `ProductRepository` operations
//! - [`config`] - JSON configuration store
//!
//! ## Usage
//!
//! ```rust,ignore
//! use catalog_db::{ConfigStore, ConnectionSettings, ProductRepository};
//!
//! let store = ConfigStore::open("config.json")?;
//! let config = ConnectionSettings::load(&store)?.apply_env().into_config();
//! let repo = ProductRepository::with_config(config);
//!
//! let cheap = repo.find_by_price_range(0.0, 10.0).await?;
//! ```

// =============================================================================
// Module Declarations
// =============================================================================

pub mod config;
pub mod connection;
pub mod error;
pub mod mapper;
pub mod repository;
pub mod schema;

// =============================================================================
// Re-exports
// =============================================================================

pub use config::{ConfigError, ConfigStore, ConnectionSettings};
pub use connection::{ConnectionProvider, Credentials, DbConfig, Session};
pub use error::{DbError, DbResult, ErrorKind};
pub use repository::ProductRepository;
pub use schema::ensure_schema;
