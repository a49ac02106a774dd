//! # Seed Data Generator
//!
//! Populates a catalog database with sample data for development.
//!
//! ## Usage
//! ```bash
//! # Generate 200 products (default)
//! cargo run -p catalog-db --bin seed
//!
//! # Generate custom amount
//! cargo run -p catalog-db --bin seed -- --count 1000
//!
//! # Specify database path
//! cargo run -p catalog-db --bin seed -- --db ./data/catalog.db
//! ```
//!
//! ## Generated Data
//! - Five fixed categories
//! - N products cycling through each category's names and size variants
//! - One to three reviews on every tenth product
//! - The first five products featured for the next week

use std::env;
use std::time::Instant;

use catalog_core::Product;
use catalog_db::{ensure_schema, Credentials, DbConfig, ProductRepository};
use chrono::{Duration, Utc};
use tracing::info;
use tracing_subscriber::EnvFilter;

/// Categories with their product names.
const CATEGORIES: &[(&str, &str, &[&str])] = &[
    (
        "Tools",
        "Hand and power tools",
        &["Hammer", "Screwdriver", "Wrench", "Pliers", "Tape Measure", "Drill"],
    ),
    (
        "Garden",
        "Outdoor and garden supplies",
        &["Hose", "Rake", "Shovel", "Planter", "Sprinkler", "Pruner"],
    ),
    (
        "Kitchen",
        "Cookware and utensils",
        &["Skillet", "Saucepan", "Whisk", "Ladle", "Cutting Board", "Kettle"],
    ),
    (
        "Office",
        "Desk and stationery",
        &["Stapler", "Notebook", "Desk Lamp", "Pen Set", "Organizer", "Widget"],
    ),
    (
        "Toys",
        "Games and toys",
        &["Puzzle", "Yo-Yo", "Kite", "Building Blocks", "Spinning Top", "Gadget"],
    ),
];

/// Size variants: label, price addon, weight multiplier.
const SIZES: &[(&str, f64, f64)] = &[
    ("Mini", 0.0, 0.5),
    ("Standard", 2.5, 1.0),
    ("Large", 5.0, 1.8),
    ("Pro", 12.0, 2.4),
];

const REVIEW_TEXT: &[&str] = &[
    "Does the job.",
    "Better than expected.",
    "Broke after a week.",
    "Great value for the price.",
    "Would buy again.",
];

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    init_tracing();

    // Parse command line arguments
    let args: Vec<String> = env::args().collect();

    let mut count: usize = 200;
    let mut db_path = String::from("./catalog_dev.db");

    let mut i = 1;
    while i < args.len() {
        match args[i].as_str() {
            "--count" | "-c" => {
                if i + 1 < args.len() {
                    count = args[i + 1].parse().unwrap_or(200);
                    i += 1;
                }
            }
            "--db" | "-d" => {
                if i + 1 < args.len() {
                    db_path = args[i + 1].clone();
                    i += 1;
                }
            }
            "--help" | "-h" => {
                println!("Catalog Seed Data Generator");
                println!();
                println!("Usage: seed [OPTIONS]");
                println!();
                println!("Options:");
                println!("  -c, --count <N>    Number of products to generate (default: 200)");
                println!("  -d, --db <PATH>    Database file path (default: ./catalog_dev.db)");
                println!("  -h, --help         Show this help message");
                return Ok(());
            }
            _ => {}
        }
        i += 1;
    }

    println!("Catalog Seed Data Generator");
    println!("===========================");
    println!("Database: {}", db_path);
    println!("Products: {}", count);
    println!();

    let config = DbConfig::new(&db_path, Credentials::default()).create_if_missing(true);
    let repo = ProductRepository::with_config(config);
    ensure_schema(repo.provider()).await?;
    println!("✓ Schema ready");

    // Check existing products
    let existing = repo.count_products().await?;
    if existing > 0 {
        println!("⚠ Database already has {} products", existing);
        println!("  Skipping seed to avoid duplicates.");
        println!("  Delete the database file to regenerate.");
        return Ok(());
    }

    let start = Instant::now();

    let mut category_ids = Vec::with_capacity(CATEGORIES.len());
    for (name, description, _) in CATEGORIES {
        category_ids.push(repo.create_category(name, description).await?);
    }
    println!("✓ Created {} categories", category_ids.len());

    let products = generate_products(&category_ids, count);
    let inserted = repo.save_all(&products).await?;
    println!("✓ Inserted {} products", inserted);

    let saved = repo.find_all().await?;
    let mut reviews = 0;
    for (idx, product) in saved.iter().enumerate().filter(|(idx, _)| idx % 10 == 0) {
        for n in 0..(1 + idx % 3) {
            let star = (1 + (idx + n) % 5) as i32;
            let text = REVIEW_TEXT[(idx + n) % REVIEW_TEXT.len()];
            repo.add_review(product.id, star, text).await?;
            reviews += 1;
        }
    }
    println!("✓ Added {} reviews", reviews);

    let now = Utc::now();
    for product in saved.iter().take(5) {
        repo.feature_product(product, now, now + Duration::days(7)).await?;
    }

    let elapsed = start.elapsed();
    info!(products = inserted, reviews, elapsed_ms = elapsed.as_millis() as u64, "Seed finished");

    // Summary
    println!();
    println!("Summary");
    println!("  Products:  {}", repo.count_products().await?);
    let mut per_category: Vec<_> = repo.count_products_by_category().await?.into_iter().collect();
    per_category.sort_unstable();
    for (category_id, n) in per_category {
        println!("  Category {}: {} products", category_id, n);
    }
    println!("  Featured now: {}", repo.find_featured_at(Utc::now()).await?.len());
    println!("  Low stock (<5): {}", repo.find_low_stock(5).await?.len());
    println!();
    println!("✓ Seed complete in {:?}", elapsed);

    Ok(())
}

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("info,catalog=debug,sqlx=warn"));

    tracing_subscriber::fmt().with_env_filter(filter).init();
}

/// Builds `count` products, cycling category → name → size.
fn generate_products(category_ids: &[i64], count: usize) -> Vec<Product> {
    let mut products = Vec::with_capacity(count);

    'outer: loop {
        for (category_idx, (_, _, names)) in CATEGORIES.iter().enumerate() {
            for (name_idx, name) in names.iter().enumerate() {
                for (size_idx, size) in SIZES.iter().enumerate() {
                    if products.len() >= count {
                        break 'outer;
                    }
                    let seed = products.len() + category_idx * 100 + name_idx * 10 + size_idx;
                    products.push(generate_product(category_ids[category_idx], name, *size, seed));
                }
            }
        }
    }

    products
}

/// Generates a single product with plausible data.
fn generate_product(category_id: i64, name: &str, size: (&str, f64, f64), seed: usize) -> Product {
    let (size_name, price_addon, weight_factor) = size;

    // Base price: $1.99 - $49.99
    let base_price = 1.99 + ((seed * 17) % 4800) as f64 / 100.0;
    let price = ((base_price + price_addon) * 100.0).round() / 100.0;

    // Base weight: 0.1 - 5.0 kg
    let weight = (0.1 + ((seed * 7) % 49) as f64 / 10.0) * weight_factor;

    let slug = name.to_lowercase().replace(' ', "-");

    Product::new(format!("{} {}", name, size_name), category_id, price)
        .description(format!("{} ({})", name, size_name))
        .stock_quantity((seed % 101) as i64)
        .weight((weight * 100.0).round() / 100.0)
        .image_url(format!("https://img.example.com/{}-{}.png", slug, seed))
        .available(seed % 7 != 0)
}
