//! # Domain Types
//!
//! Entities reconstructed by the repository from query results.
//!
//! ## Type Overview
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Domain Types                                    │
//! │                                                                         │
//! │  ┌─────────────────┐   ┌─────────────────┐   ┌─────────────────────┐   │
//! │  │    Product      │   │     Review      │   │   ProductDetail     │   │
//! │  │  ─────────────  │   │  ─────────────  │   │  ─────────────────  │   │
//! │  │  id (store)     │◄──│  product_id     │   │  product            │   │
//! │  │  category_id    │   │  star           │   │  category_name      │   │
//! │  │  price, weight  │   │  description    │   │  reviews: Vec       │   │
//! │  │  stock_quantity │   │  created_at     │   │  (read-only)        │   │
//! │  └─────────────────┘   └─────────────────┘   └─────────────────────┘   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Identity
//! Ids and `created_at` are assigned by the store on insert. A value built
//! in memory with [`Product::new`] carries `id == 0` until it is read back.

use std::collections::HashMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Id carried by a product that has not been persisted yet.
pub const UNSAVED_ID: i64 = 0;

/// Product count per category id, as returned by the grouped count.
///
/// Categories without products have no entry.
pub type CategoryCounts = HashMap<i64, i64>;

// =============================================================================
// Product
// =============================================================================

/// A product in the catalog.
///
/// No validation is applied: price, weight and stock may be zero or negative.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Product {
    /// Store-assigned identifier, immutable once persisted.
    pub id: i64,

    /// Display name.
    pub name: String,

    pub description: Option<String>,

    /// Foreign key into the category table.
    pub category_id: i64,

    pub price: f64,

    pub stock_quantity: i64,

    pub weight: f64,

    pub image_url: Option<String>,

    /// Assigned by the store on insert. The value held by an unsaved
    /// product is never written.
    pub created_at: DateTime<Utc>,

    pub is_available: bool,
}

impl Product {
    /// Creates an unsaved product with the required fields.
    ///
    /// Optional fields start empty, stock and weight start at zero and the
    /// product is available.
    pub fn new(name: impl Into<String>, category_id: i64, price: f64) -> Self {
        Product {
            id: UNSAVED_ID,
            name: name.into(),
            description: None,
            category_id,
            price,
            stock_quantity: 0,
            weight: 0.0,
            image_url: None,
            created_at: Utc::now(),
            is_available: true,
        }
    }

    /// Sets the description.
    pub fn description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    /// Sets the stock quantity.
    pub fn stock_quantity(mut self, quantity: i64) -> Self {
        self.stock_quantity = quantity;
        self
    }

    /// Sets the weight.
    pub fn weight(mut self, weight: f64) -> Self {
        self.weight = weight;
        self
    }

    /// Sets the image URL.
    pub fn image_url(mut self, url: impl Into<String>) -> Self {
        self.image_url = Some(url.into());
        self
    }

    /// Sets availability.
    pub fn available(mut self, available: bool) -> Self {
        self.is_available = available;
        self
    }

    /// Whether this value was read back from the store.
    #[inline]
    pub fn is_persisted(&self) -> bool {
        self.id != UNSAVED_ID
    }

    /// Compares every client-controlled field, ignoring `id` and `created_at`.
    pub fn same_content(&self, other: &Product) -> bool {
        self.name == other.name
            && self.description == other.description
            && self.category_id == other.category_id
            && self.price == other.price
            && self.stock_quantity == other.stock_quantity
            && self.weight == other.weight
            && self.image_url == other.image_url
            && self.is_available == other.is_available
    }
}

// =============================================================================
// Review
// =============================================================================

/// A customer review of a product.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Review {
    /// Store-assigned identifier.
    pub rev_id: i64,

    /// The reviewed product.
    pub product_id: i64,

    /// Rating. The range is not constrained.
    pub star: i32,

    pub description: Option<String>,

    pub created_at: DateTime<Utc>,
}

// =============================================================================
// Product Detail
// =============================================================================

/// A product together with its category name and reviews.
///
/// Only built by the detail fetch; never persisted.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProductDetail {
    pub product: Product,
    pub category_name: String,
    /// Ordered oldest first.
    pub reviews: Vec<Review>,
}

impl ProductDetail {
    /// Creates a detail with no reviews attached.
    pub fn new(product: Product, category_name: impl Into<String>) -> Self {
        ProductDetail {
            product,
            category_name: category_name.into(),
            reviews: Vec::new(),
        }
    }

    /// Attaches the review list, replacing any previous one.
    pub fn with_reviews(mut self, reviews: Vec<Review>) -> Self {
        self.reviews = reviews;
        self
    }

    /// Mean star rating, or `None` without reviews.
    pub fn average_star(&self) -> Option<f64> {
        if self.reviews.is_empty() {
            return None;
        }
        let total: i64 = self.reviews.iter().map(|r| i64::from(r.star)).sum();
        Some(total as f64 / self.reviews.len() as f64)
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
