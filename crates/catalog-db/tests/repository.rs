//! Integration tests for `ProductRepository` against a file-backed SQLite store.

use catalog_core::Product;
use catalog_db::{
    ensure_schema, Credentials, DbConfig, DbError, ErrorKind, ProductRepository,
};
use chrono::{Duration, Utc};
use tempfile::TempDir;

struct TestDb {
    // Held so the database file outlives the test body.
    _dir: TempDir,
    repo: ProductRepository,
    category_id: i64,
}

async fn setup() -> TestDb {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("catalog.db");
    let config = DbConfig::new(path.to_string_lossy(), Credentials::new("sa", ""))
        .create_if_missing(true);
    let repo = ProductRepository::with_config(config);
    ensure_schema(repo.provider()).await.unwrap();
    let category_id = repo.create_category("Tools", "Hand tools").await.unwrap();

    TestDb {
        _dir: dir,
        repo,
        category_id,
    }
}

fn widget(category_id: i64) -> Product {
    Product::new("Widget", category_id, 20.5)
        .description("A widget")
        .stock_quantity(10)
        .weight(0.25)
        .image_url("https://img.example.com/widget.png")
}

async fn save_all(repo: &ProductRepository, products: &[Product]) -> Vec<i64> {
    let mut ids = Vec::with_capacity(products.len());
    for product in products {
        ids.push(repo.save(product).await.unwrap());
    }
    ids
}

// =============================================================================
// Commands
// =============================================================================

#[tokio::test]
async fn test_save_then_find_by_id_matches_input() {
    let db = setup().await;
    let input = widget(db.category_id);

    let id = db.repo.save(&input).await.unwrap();
    let stored = db.repo.find_by_id(id).await.unwrap().unwrap();

    assert_eq!(stored.id, id);
    assert!(stored.is_persisted());
    assert!(stored.same_content(&input));
}

#[tokio::test]
async fn test_widget_lifecycle() {
    let db = setup().await;
    let before = db.repo.count_products().await.unwrap();

    let id = db.repo.save(&widget(db.category_id)).await.unwrap();

    let all = db.repo.find_all().await.unwrap();
    assert_eq!(all.len(), 1);
    assert_eq!(all[0].name, "Widget");
    assert_eq!(all[0].price, 20.5);
    assert_eq!(all[0].stock_quantity, 10);
    assert_eq!(db.repo.count_products().await.unwrap(), before + 1);

    assert_eq!(db.repo.delete(id).await.unwrap(), 1);
    assert!(db.repo.find_by_id(id).await.unwrap().is_none());
}

#[tokio::test]
async fn test_commands_on_missing_id_are_no_ops() {
    let db = setup().await;

    assert_eq!(db.repo.update_stock(42, 3).await.unwrap(), 0);
    assert_eq!(db.repo.delete(42).await.unwrap(), 0);

    let mut ghost = widget(db.category_id);
    ghost.id = 42;
    assert_eq!(db.repo.update(&ghost).await.unwrap(), 0);

    assert_eq!(db.repo.count_products().await.unwrap(), 0);
    assert!(db.repo.find_by_id(42).await.unwrap().is_none());
}

#[tokio::test]
async fn test_update_overwrites_row() {
    let db = setup().await;
    let id = db.repo.save(&widget(db.category_id)).await.unwrap();

    let mut changed = db.repo.find_by_id(id).await.unwrap().unwrap();
    changed.name = "Widget Mk II".to_string();
    changed.description = None;
    changed.price = -1.0;
    changed.is_available = false;
    assert_eq!(db.repo.update(&changed).await.unwrap(), 1);

    let stored = db.repo.find_by_id(id).await.unwrap().unwrap();
    assert!(stored.same_content(&changed));
    assert_eq!(stored.created_at, changed.created_at);
}

#[tokio::test]
async fn test_update_stock_sets_absolute_quantity() {
    let db = setup().await;
    let id = db.repo.save(&widget(db.category_id)).await.unwrap();

    assert_eq!(db.repo.update_stock(id, -4).await.unwrap(), 1);
    let stored = db.repo.find_by_id(id).await.unwrap().unwrap();
    assert_eq!(stored.stock_quantity, -4);
}

#[tokio::test]
async fn test_save_all_inserts_batch() {
    let db = setup().await;
    let batch: Vec<Product> = (0..5)
        .map(|n| Product::new(format!("Item {n}"), db.category_id, n as f64))
        .collect();

    assert_eq!(db.repo.save_all(&batch).await.unwrap(), 5);
    assert_eq!(db.repo.save_all(&[]).await.unwrap(), 0);
    assert_eq!(db.repo.count_products().await.unwrap(), 5);
}

#[tokio::test]
async fn test_save_all_with_bad_row_inserts_nothing() {
    let db = setup().await;
    let batch = vec![
        Product::new("Good", db.category_id, 1.0),
        Product::new("Orphan", 9999, 1.0),
        Product::new("Also good", db.category_id, 1.0),
    ];

    let err = db.repo.save_all(&batch).await.unwrap_err();
    assert!(matches!(err, DbError::ForeignKeyViolation { .. }));
    assert_eq!(err.kind(), ErrorKind::Query);
    assert_eq!(db.repo.count_products().await.unwrap(), 0);
}

#[tokio::test]
async fn test_save_with_unknown_category_fails() {
    let db = setup().await;
    let err = db
        .repo
        .save(&Product::new("Orphan", 9999, 1.0))
        .await
        .unwrap_err();
    assert!(matches!(err, DbError::ForeignKeyViolation { .. }));
}

// =============================================================================
// Queries
// =============================================================================

#[tokio::test]
async fn test_price_range_is_inclusive() {
    let db = setup().await;
    let c = db.category_id;
    save_all(
        &db.repo,
        &[
            Product::new("Five", c, 5.0),
            Product::new("Ten", c, 10.0),
            Product::new("Fifteen", c, 15.0),
            Product::new("Twenty", c, 20.0),
        ],
    )
    .await;

    let names: Vec<String> = db
        .repo
        .find_by_price_range(10.0, 15.0)
        .await
        .unwrap()
        .into_iter()
        .map(|p| p.name)
        .collect();
    assert_eq!(names, vec!["Ten", "Fifteen"]);

    assert!(db.repo.find_by_price_range(20.0, 10.0).await.unwrap().is_empty());
}

#[tokio::test]
async fn test_weight_range_is_inclusive() {
    let db = setup().await;
    let c = db.category_id;
    save_all(
        &db.repo,
        &[
            Product::new("Light", c, 1.0).weight(0.5),
            Product::new("Medium", c, 1.0).weight(1.0),
            Product::new("Heavy", c, 1.0).weight(2.0),
        ],
    )
    .await;

    let found = db.repo.find_by_weight_range(0.5, 1.0).await.unwrap();
    assert_eq!(found.len(), 2);
    assert!(found.iter().all(|p| (0.5..=1.0).contains(&p.weight)));
}

#[tokio::test]
async fn test_low_stock_is_strict() {
    let db = setup().await;
    let c = db.category_id;
    save_all(
        &db.repo,
        &[
            Product::new("Empty", c, 1.0).stock_quantity(0),
            Product::new("Four", c, 1.0).stock_quantity(4),
            Product::new("Five", c, 1.0).stock_quantity(5),
            Product::new("Six", c, 1.0).stock_quantity(6),
        ],
    )
    .await;

    let low = db.repo.find_low_stock(5).await.unwrap();
    let stocks: Vec<i64> = low.iter().map(|p| p.stock_quantity).collect();
    assert_eq!(stocks, vec![0, 4]);
}

#[tokio::test]
async fn test_find_by_availability() {
    let db = setup().await;
    let c = db.category_id;
    save_all(
        &db.repo,
        &[
            Product::new("On shelf", c, 1.0),
            Product::new("Withdrawn", c, 1.0).available(false),
        ],
    )
    .await;

    let available = db.repo.find_by_availability(true).await.unwrap();
    let withdrawn = db.repo.find_by_availability(false).await.unwrap();
    assert_eq!(available.len(), 1);
    assert_eq!(available[0].name, "On shelf");
    assert_eq!(withdrawn.len(), 1);
    assert_eq!(withdrawn[0].name, "Withdrawn");
}

#[tokio::test]
async fn test_search_by_name_matches_substrings() {
    let db = setup().await;
    let c = db.category_id;
    save_all(
        &db.repo,
        &[
            Product::new("Blue Widget", c, 1.0),
            Product::new("widget pro", c, 1.0),
            Product::new("Gadget", c, 1.0),
            Product::new("100% Cotton", c, 1.0),
            Product::new("snake_case", c, 1.0),
        ],
    )
    .await;

    let widgets = db.repo.search_by_name("Widget").await.unwrap();
    assert_eq!(widgets.len(), 2);
    assert!(widgets.iter().all(|p| p.name.to_lowercase().contains("widget")));

    assert!(db.repo.search_by_name("Sprocket").await.unwrap().is_empty());
    assert_eq!(db.repo.search_by_name("").await.unwrap().len(), 5);
}

#[tokio::test]
async fn test_search_by_name_treats_wildcards_literally() {
    let db = setup().await;
    let c = db.category_id;
    save_all(
        &db.repo,
        &[
            Product::new("100% Cotton", c, 1.0),
            Product::new("snake_case", c, 1.0),
            Product::new("snakeXcase", c, 1.0),
        ],
    )
    .await;

    let percent = db.repo.search_by_name("%").await.unwrap();
    assert_eq!(percent.len(), 1);
    assert_eq!(percent[0].name, "100% Cotton");

    let underscore = db.repo.search_by_name("e_c").await.unwrap();
    assert_eq!(underscore.len(), 1);
    assert_eq!(underscore[0].name, "snake_case");
}

#[tokio::test]
async fn test_find_by_category() {
    let db = setup().await;
    let garden = db.repo.create_category("Garden", "").await.unwrap();
    save_all(
        &db.repo,
        &[
            Product::new("Hammer", db.category_id, 1.0),
            Product::new("Rake", garden, 1.0),
            Product::new("Hose", garden, 1.0),
        ],
    )
    .await;

    let found = db.repo.find_by_category(garden).await.unwrap();
    assert_eq!(found.len(), 2);
    assert!(found.iter().all(|p| p.category_id == garden));
}

#[tokio::test]
async fn test_find_recent_newest_first() {
    let db = setup().await;
    let c = db.category_id;
    let ids = save_all(
        &db.repo,
        &[
            Product::new("First", c, 1.0),
            Product::new("Second", c, 1.0),
            Product::new("Third", c, 1.0),
        ],
    )
    .await;

    let recent = db.repo.find_recent(2).await.unwrap();
    let recent_ids: Vec<i64> = recent.iter().map(|p| p.id).collect();
    assert_eq!(recent_ids, vec![ids[2], ids[1]]);

    assert!(db.repo.find_recent(0).await.unwrap().is_empty());
}

#[tokio::test]
async fn test_count_by_category_omits_empty_categories() {
    let db = setup().await;
    let empty = db.repo.create_category("Empty", "").await.unwrap();
    save_all(
        &db.repo,
        &[
            Product::new("A", db.category_id, 1.0),
            Product::new("B", db.category_id, 1.0),
        ],
    )
    .await;

    let counts = db.repo.count_products_by_category().await.unwrap();
    assert_eq!(counts.get(&db.category_id), Some(&2));
    assert!(!counts.contains_key(&empty));
    assert!(counts.values().all(|&n| n > 0));
}

// =============================================================================
// Reviews and Details
// =============================================================================

#[tokio::test]
async fn test_details_for_missing_product_is_none() {
    let db = setup().await;
    assert!(db.repo.get_product_details(-1).await.unwrap().is_none());
    assert!(db.repo.get_product_details(999).await.unwrap().is_none());
}

#[tokio::test]
async fn test_details_include_category_and_reviews() {
    let db = setup().await;
    let id = db.repo.save(&widget(db.category_id)).await.unwrap();
    let first = db.repo.add_review(id, 5, "Great").await.unwrap();
    let second = db.repo.add_review(id, 2, "Meh").await.unwrap();

    let detail = db.repo.get_product_details(id).await.unwrap().unwrap();
    assert_eq!(detail.product.id, id);
    assert_eq!(detail.category_name, "Tools");

    let rev_ids: Vec<i64> = detail.reviews.iter().map(|r| r.rev_id).collect();
    assert_eq!(rev_ids, vec![first, second]);
    assert!(detail.reviews.iter().all(|r| r.product_id == id));
    assert_eq!(detail.reviews[0].description.as_deref(), Some("Great"));
    assert_eq!(detail.average_star(), Some(3.5));
}

#[tokio::test]
async fn test_details_without_reviews() {
    let db = setup().await;
    let id = db.repo.save(&widget(db.category_id)).await.unwrap();

    let detail = db.repo.get_product_details(id).await.unwrap().unwrap();
    assert!(detail.reviews.is_empty());
    assert_eq!(detail.average_star(), None);
}

#[tokio::test]
async fn test_review_for_missing_product_fails() {
    let db = setup().await;
    let err = db.repo.add_review(42, 4, "Ghost").await.unwrap_err();
    assert!(matches!(err, DbError::ForeignKeyViolation { .. }));
}

#[tokio::test]
async fn test_delete_product_removes_its_reviews() {
    let db = setup().await;
    let id = db.repo.save(&widget(db.category_id)).await.unwrap();
    db.repo.add_review(id, 4, "Fine").await.unwrap();
    db.repo.delete(id).await.unwrap();

    let mut session = db.repo.provider().connect("test").await.unwrap();
    let remaining: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM review WHERE product = ?1")
        .bind(id)
        .fetch_one(session.conn())
        .await
        .unwrap();
    session.close().await;

    assert_eq!(remaining, 0);
}

// =============================================================================
// Featured Listings
// =============================================================================

#[tokio::test]
async fn test_featured_window_lifecycle() {
    let db = setup().await;
    let product = {
        let id = db.repo.save(&widget(db.category_id)).await.unwrap();
        db.repo.find_by_id(id).await.unwrap().unwrap()
    };
    let now = Utc::now();

    db.repo
        .feature_product(&product, now - Duration::hours(1), now + Duration::hours(1))
        .await
        .unwrap();

    let featured = db.repo.find_featured_at(now).await.unwrap();
    assert_eq!(featured.len(), 1);
    assert_eq!(featured[0].id, product.id);
    assert!(db
        .repo
        .find_featured_at(now + Duration::hours(2))
        .await
        .unwrap()
        .is_empty());

    assert_eq!(db.repo.unfeature_product(&product).await.unwrap(), 1);
    assert_eq!(db.repo.remove_product_from_featured(product.id).await.unwrap(), 0);
    assert!(db.repo.find_featured_at(now).await.unwrap().is_empty());
}

#[tokio::test]
async fn test_featured_window_bounds_are_inclusive() {
    let db = setup().await;
    let id = db.repo.save(&widget(db.category_id)).await.unwrap();
    let from = Utc::now();
    let to = from + Duration::days(1);
    db.repo.add_product_to_featured(id, from, to).await.unwrap();

    assert_eq!(db.repo.find_featured_at(from).await.unwrap().len(), 1);
    assert_eq!(db.repo.find_featured_at(to).await.unwrap().len(), 1);
}

#[tokio::test]
async fn test_featured_constraints() {
    let db = setup().await;
    let id = db.repo.save(&widget(db.category_id)).await.unwrap();
    let now = Utc::now();
    let later = now + Duration::days(1);

    db.repo.add_product_to_featured(id, now, later).await.unwrap();
    let duplicate = db
        .repo
        .add_product_to_featured(id, now, later)
        .await
        .unwrap_err();
    assert!(matches!(duplicate, DbError::UniqueViolation { .. }));

    let orphan = db
        .repo
        .add_product_to_featured(9999, now, later)
        .await
        .unwrap_err();
    assert!(matches!(orphan, DbError::ForeignKeyViolation { .. }));

    db.repo.delete(id).await.unwrap();
    assert!(db.repo.find_featured_at(now).await.unwrap().is_empty());
}

// =============================================================================
// Categories
// =============================================================================

#[tokio::test]
async fn test_delete_category_in_use_is_rejected() {
    let db = setup().await;
    let id = db.repo.save(&widget(db.category_id)).await.unwrap();

    let err = db.repo.delete_category(db.category_id).await.unwrap_err();
    assert!(matches!(err, DbError::ForeignKeyViolation { .. }));

    db.repo.delete(id).await.unwrap();
    assert_eq!(db.repo.delete_category(db.category_id).await.unwrap(), 1);
    assert_eq!(db.repo.delete_category(db.category_id).await.unwrap(), 0);
}

// =============================================================================
// Connection Behaviour
// =============================================================================

#[tokio::test]
async fn test_new_normalizes_address() {
    let repo = ProductRepository::new("data/catalog.db", "sa", "");
    assert_eq!(repo.address(), "sqlite://data/catalog.db");

    let repo = ProductRepository::new("sqlite://data/catalog.db", "sa", "");
    assert_eq!(repo.address(), "sqlite://data/catalog.db");
}

#[tokio::test]
async fn test_missing_database_reports_connection_errors() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("absent.db");
    let repo = ProductRepository::new(path.to_string_lossy(), "sa", "");

    let kinds = [
        repo.find_all().await.unwrap_err().kind(),
        repo.find_by_id(1).await.unwrap_err().kind(),
        repo.count_products().await.unwrap_err().kind(),
        repo.save(&Product::new("X", 1, 1.0)).await.unwrap_err().kind(),
        repo.update_stock(42, 3).await.unwrap_err().kind(),
        repo.get_product_details(1).await.unwrap_err().kind(),
        repo.find_featured_at(Utc::now()).await.unwrap_err().kind(),
    ];
    assert!(kinds.iter().all(|&k| k == ErrorKind::Connection));

    // Callers wanting the empty default collapse explicitly.
    assert!(repo.find_all().await.unwrap_or_default().is_empty());
    assert!(!path.exists());
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_concurrent_saves() {
    let db = setup().await;

    let handles: Vec<_> = (0..8)
        .map(|n| {
            let repo = db.repo.clone();
            let category_id = db.category_id;
            tokio::spawn(async move {
                repo.save(&Product::new(format!("Concurrent {n}"), category_id, n as f64))
                    .await
            })
        })
        .collect();

    for handle in handles {
        handle.await.unwrap().unwrap();
    }

    assert_eq!(db.repo.count_products().await.unwrap(), 8);
}
