//! Integration tests for the SQLite order repository.

mod common;

use std::sync::Arc;

use sqlx::SqlitePool;
use uuid::Uuid;

use common::{sample_directories, sample_order, setup_database};
use qualidoc::adapters::cache::ReferenceCache;
use qualidoc::adapters::sqlite::SqliteOrderRepository;
use qualidoc::domain::ports::OrderRepository;
use qualidoc::OrderStatus;

fn repository(pool: &SqlitePool) -> SqliteOrderRepository {
    let (users, customers) = sample_directories();
    SqliteOrderRepository::new(
        pool.clone(),
        users,
        customers,
        Arc::new(ReferenceCache::default()),
    )
}

/// Insert an order row directly, bypassing the repository and its caches.
async fn insert_order_row(
    pool: &SqlitePool,
    id: Uuid,
    order_number: Option<&str>,
    created_by: Uuid,
    created_at: &str,
) {
    sqlx::query(
        "INSERT INTO orders (order_id, order_number, customer_id, product_description, \
         delivery_address, status, created_by, created_at, assigned_to) \
         VALUES (?, ?, 'ACME', 'Hydraulic valve block', '1 Factory Road', 'pending', ?, ?, NULL)",
    )
    .bind(id.to_string())
    .bind(order_number)
    .bind(created_by.to_string())
    .bind(created_at)
    .execute(pool)
    .await
    .expect("Failed to insert order row");
}

#[tokio::test]
async fn save_then_find_round_trips_without_a_store_read() {
    let pool = setup_database().await;
    let repo = repository(&pool);

    let order = sample_order(0);
    let saved = repo.save(order.clone()).await.expect("save");
    assert_eq!(saved, order);

    // Write-through: the aggregate is served straight from the cache.
    let found = repo.find_by_id(order.id).await.expect("order should exist");
    assert_eq!(found, order);
    assert_eq!(repo.metrics().reads(), 0, "no store read expected after save");
    assert_eq!(repo.metrics().writes(), 1);

    pool.close().await;
}

#[tokio::test]
async fn repeated_find_by_id_hits_the_store_once() {
    let pool = setup_database().await;
    let repo = repository(&pool);

    let id = Uuid::new_v4();
    insert_order_row(&pool, id, None, common::sample_creator().id, "2026-08-01T08:00:00+00:00")
        .await;

    let first = repo.find_by_id(id).await.expect("order should exist");
    let reads_after_first = repo.metrics().reads();
    assert!(reads_after_first >= 1);

    let second = repo.find_by_id(id).await.expect("order should exist");
    assert_eq!(first, second);
    assert_eq!(
        repo.metrics().reads(),
        reads_after_first,
        "second lookup must be served from the cache"
    );

    pool.close().await;
}

#[tokio::test]
async fn save_updates_existing_order_in_place() {
    let pool = setup_database().await;
    let repo = repository(&pool);

    let mut order = sample_order(0);
    repo.save(order.clone()).await.expect("insert");

    order.status = OrderStatus::InProgress;
    order.product_description = "Hydraulic valve block, rev B".to_string();
    repo.save(order.clone()).await.expect("update");

    assert_eq!(repo.count().await, 1, "update must not create a second row");

    // Read back through a fresh repository to bypass the warm cache.
    let cold = repository(&pool);
    let reloaded = cold.find_by_id(order.id).await.expect("order should exist");
    assert_eq!(reloaded.status, OrderStatus::InProgress);
    assert_eq!(reloaded.product_description, "Hydraulic valve block, rev B");

    pool.close().await;
}

#[tokio::test]
async fn delete_removes_row_and_evicts_caches() {
    let pool = setup_database().await;
    let repo = repository(&pool);

    let order = sample_order(0);
    repo.save(order.clone()).await.expect("save");
    assert!(repo.find_by_id(order.id).await.is_some());

    assert!(repo.delete_by_id(order.id).await);
    assert!(repo.find_by_id(order.id).await.is_none(), "deleted order must not resurface");
    assert!(!repo.exists_by_id(order.id).await);

    pool.close().await;
}

#[tokio::test]
async fn delete_is_idempotent() {
    let pool = setup_database().await;
    let repo = repository(&pool);

    let order = sample_order(0);
    repo.save(order.clone()).await.expect("save");

    assert!(repo.delete_by_id(order.id).await);
    assert!(!repo.delete_by_id(order.id).await, "second delete reports nothing removed");
    assert!(!repo.delete_by_id(Uuid::new_v4()).await, "unknown id reports nothing removed");

    pool.close().await;
}

#[tokio::test]
async fn pagination_is_deterministic_and_newest_first() {
    let pool = setup_database().await;
    let repo = repository(&pool);

    for minutes in 0..5 {
        repo.save(sample_order(minutes)).await.expect("save");
    }

    let all: Vec<Uuid> = repo
        .find_all_paged(0, 5)
        .await
        .iter()
        .map(|order| order.id)
        .collect();
    assert_eq!(all.len(), 5);

    let mut paged = Vec::new();
    for page in 0..3 {
        paged.extend(repo.find_all_paged(page, 2).await.iter().map(|order| order.id));
    }
    assert_eq!(paged, all, "2+2+1 pages must equal one page of five");

    let orders = repo.find_all_paged(0, 5).await;
    for window in orders.windows(2) {
        assert!(
            window[0].created_at >= window[1].created_at,
            "listing must be newest-created first"
        );
    }

    pool.close().await;
}

#[tokio::test]
async fn negative_page_and_size_are_clamped() {
    let pool = setup_database().await;
    let repo = repository(&pool);

    for minutes in 0..3 {
        repo.save(sample_order(minutes)).await.expect("save");
    }

    let first_page = repo.find_all_paged(0, 50).await;
    assert_eq!(repo.find_all_paged(-7, 50).await, first_page);
    assert_eq!(repo.find_all_paged(0, 0).await.len(), 3);
    assert_eq!(repo.find_all().await.len(), 3);

    pool.close().await;
}

#[tokio::test]
async fn legacy_order_number_is_repaired_on_load() {
    let pool = setup_database().await;
    let repo = repository(&pool);

    let id = Uuid::new_v4();
    insert_order_row(
        &pool,
        id,
        Some("ORD-XX-230501-ABC-0001"),
        common::sample_creator().id,
        "2026-08-01T08:00:00+00:00",
    )
    .await;

    let order = repo.find_by_id(id).await.expect("order should exist");
    let number = order.number.expect("number should survive repair");
    assert_eq!(number.to_string(), "05/23-ABC-0001");

    pool.close().await;
}

#[tokio::test]
async fn garbage_order_number_is_replaced_not_fatal() {
    let pool = setup_database().await;
    let repo = repository(&pool);

    let id = Uuid::new_v4();
    insert_order_row(&pool, id, Some("!!not-a-number!!"), common::sample_creator().id,
        "2026-08-01T08:00:00+00:00")
        .await;

    let order = repo.find_by_id(id).await.expect("order should load despite bad number");
    let number = order.number.expect("a fresh number is generated");
    assert!(number.to_string().contains("-INT-"), "generated numbers use the internal code");

    pool.close().await;
}

#[tokio::test]
async fn find_by_order_number_matches_stored_value() {
    let pool = setup_database().await;
    let repo = repository(&pool);

    let mut order = sample_order(0);
    order.number = Some("05/23-ACME-0042".parse().expect("valid number"));
    repo.save(order.clone()).await.expect("save");

    let number = order.number.clone().expect("number");
    let found = repo.find_by_order_number(&number).await.expect("order should be found");
    assert_eq!(found.id, order.id);

    let missing: qualidoc::OrderNumber = "01/30-NONE-9999".parse().expect("valid number");
    assert!(repo.find_by_order_number(&missing).await.is_none());

    pool.close().await;
}

#[tokio::test]
async fn photo_links_survive_save_and_reload() {
    let pool = setup_database().await;
    let repo = repository(&pool);

    let mut order = sample_order(0);
    let first = Uuid::new_v4();
    let second = Uuid::new_v4();
    order.attach_photo(first);
    order.attach_photo(second);
    repo.save(order.clone()).await.expect("save");

    let cold = repository(&pool);
    let reloaded = cold.find_by_id(order.id).await.expect("order should exist");
    assert_eq!(reloaded.photo_ids.len(), 2);
    assert!(reloaded.photo_ids.contains(&first));
    assert!(reloaded.photo_ids.contains(&second));

    // Re-saving with the same photos must not duplicate link rows.
    repo.save(order.clone()).await.expect("second save");
    let photo_count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM photos WHERE order_id = ?")
        .bind(order.id.to_string())
        .fetch_one(&pool)
        .await
        .expect("count");
    assert_eq!(photo_count, 2);

    pool.close().await;
}

#[tokio::test]
async fn childless_orders_get_a_cached_empty_collection() {
    let pool = setup_database().await;
    let repo = repository(&pool);

    for i in 0..3 {
        let id = Uuid::new_v4();
        insert_order_row(
            &pool,
            id,
            None,
            common::sample_creator().id,
            &format!("2026-08-01T08:0{i}:00+00:00"),
        )
        .await;
    }

    let first = repo.find_all_paged(0, 10).await;
    assert_eq!(first.len(), 3);
    let reads_after_first = repo.metrics().reads();

    let second = repo.find_all_paged(0, 10).await;
    assert_eq!(second.len(), 3);
    // The second listing re-reads the page but must not re-query children:
    // the empty collections were cached the first time.
    assert_eq!(
        repo.metrics().reads(),
        reads_after_first + 1,
        "only the page query may hit the store on a repeat listing"
    );

    pool.close().await;
}

#[tokio::test]
async fn unresolvable_references_degrade_to_placeholders() {
    let pool = setup_database().await;
    let repo = repository(&pool);

    let id = Uuid::new_v4();
    let unknown_creator = Uuid::new_v4();
    insert_order_row(&pool, id, None, unknown_creator, "2026-08-01T08:00:00+00:00").await;

    let order = repo.find_by_id(id).await.expect("order should load");
    assert_eq!(order.created_by.id, unknown_creator);
    assert_eq!(
        order.created_by.display_name,
        unknown_creator.to_string(),
        "placeholder keeps the id visible"
    );

    pool.close().await;
}

#[tokio::test]
async fn reads_degrade_to_empty_when_the_store_is_unreachable() {
    let pool = setup_database().await;
    let repo = repository(&pool);

    let order = sample_order(0);
    repo.save(order.clone()).await.expect("save");
    pool.close().await;

    // The cached aggregate still serves.
    assert!(repo.find_by_id(order.id).await.is_some());

    // Every store-dependent read surfaces the uniform "no data" signal.
    assert!(repo.find_by_id(Uuid::new_v4()).await.is_none());
    assert!(repo.find_all().await.is_empty());
    assert!(!repo.exists_by_id(order.id).await);
    assert_eq!(repo.count().await, 0);
    assert!(!repo.delete_by_id(order.id).await);

    let number: qualidoc::OrderNumber = "05/23-ACME-0042".parse().expect("valid number");
    assert!(repo.find_by_order_number(&number).await.is_none());

    let matches = repo
        .find_by_specification(&qualidoc::domain::specifications::OrderWithStatus(
            OrderStatus::Pending,
        ))
        .await;
    assert!(matches.items.is_empty());
    assert!(!matches.truncated);

    // Writes must never be silently dropped.
    assert!(repo.save(sample_order(1)).await.is_err());
}

#[tokio::test]
async fn count_and_exists_reflect_the_store() {
    let pool = setup_database().await;
    let repo = repository(&pool);

    assert_eq!(repo.count().await, 0);
    let order = sample_order(0);
    assert!(!repo.exists_by_id(order.id).await);

    repo.save(order.clone()).await.expect("save");
    assert_eq!(repo.count().await, 1);
    assert!(repo.exists_by_id(order.id).await);

    pool.close().await;
}
