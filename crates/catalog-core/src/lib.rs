//! # catalog-core: Domain Types for the Product Catalog
//!
//! This crate holds the entities the data-access layer hands back to its
//! callers. It has zero I/O dependencies.
//!
//! ## Architecture Position
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                        Catalog Architecture                             │
//! │                                                                         │
//! │  ┌─────────────────────────────────────────────────────────────────┐   │
//! │  │               ★ catalog-core (THIS CRATE) ★                     │   │
//! │  │                                                                 │   │
//! │  │   ┌───────────┐  ┌───────────┐  ┌───────────────┐              │   │
//! │  │   │  Product  │  │  Review   │  │ ProductDetail │              │   │
//! │  │   └───────────┘  └───────────┘  └───────────────┘              │   │
//! │  │                                                                 │   │
//! │  │   NO I/O • NO DATABASE • NO NETWORK                            │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! │                                │                                        │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │                    catalog-db (Database Layer)                  │   │
//! │  │        Connection provider, row mapper, ProductRepository       │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Example Usage
//!
//! ```rust
//! use catalog_core::Product;
//!
//! let widget = Product::new("Widget", 1, 20.5)
//!     .stock_quantity(10)
//!     .weight(0.25)
//!     .available(true);
//!
//! assert!(!widget.is_persisted());
//! assert_eq!(widget.stock_quantity, 10);
//! ```

pub mod types;

pub use types::*;
