//! SQLite-backed order repository with instance-owned caches.

use std::sync::Arc;

use async_trait::async_trait;
use chrono::Utc;
use sqlx::sqlite::SqliteRow;
use sqlx::{Row, SqlitePool};
use tracing::{debug, warn};
use uuid::Uuid;

use crate::adapters::cache::{BoundedCache, ReferenceCache};
use crate::domain::errors::{StoreError, StoreResult};
use crate::domain::models::{
    CacheSettings, CustomerRef, Order, OrderNumber, OrderStatus, ScanSettings, UserRef,
};
use crate::domain::ports::{
    CustomerDirectory, OrderRepository, Specification, SpecificationMatches, UserDirectory,
    CLAMPED_PAGE_SIZE,
};

use super::child_loader::{load_photo_ids, load_photo_ids_batch};
use super::metrics::StoreMetrics;
use super::spec_scan::paginated_scan;
use super::{parse_datetime, parse_uuid};

const ORDER_COLUMNS: &str = "order_id, order_number, customer_id, product_description, \
                             delivery_address, status, created_by, created_at, assigned_to";

/// Order repository over SQLite.
///
/// Owns its aggregate and child-collection caches; the reference cache is
/// shared with other repositories through an `Arc`. All caches live and die
/// with the instance.
pub struct SqliteOrderRepository {
    pool: SqlitePool,
    user_directory: Arc<dyn UserDirectory>,
    customer_directory: Arc<dyn CustomerDirectory>,
    aggregates: BoundedCache<Uuid, Order>,
    children: BoundedCache<Uuid, Vec<Uuid>>,
    references: Arc<ReferenceCache>,
    scan: ScanSettings,
    metrics: StoreMetrics,
}

impl SqliteOrderRepository {
    pub fn new(
        pool: SqlitePool,
        user_directory: Arc<dyn UserDirectory>,
        customer_directory: Arc<dyn CustomerDirectory>,
        references: Arc<ReferenceCache>,
    ) -> Self {
        Self::with_settings(
            pool,
            user_directory,
            customer_directory,
            references,
            CacheSettings::default(),
            ScanSettings::default(),
        )
    }

    pub fn with_settings(
        pool: SqlitePool,
        user_directory: Arc<dyn UserDirectory>,
        customer_directory: Arc<dyn CustomerDirectory>,
        references: Arc<ReferenceCache>,
        cache: CacheSettings,
        scan: ScanSettings,
    ) -> Self {
        Self {
            pool,
            user_directory,
            customer_directory,
            aggregates: BoundedCache::new(cache.aggregate_capacity),
            children: BoundedCache::new(cache.children_capacity),
            references,
            scan,
            metrics: StoreMetrics::new(),
        }
    }

    /// Store round-trip counters, exposed for cache-coherence assertions.
    pub fn metrics(&self) -> &StoreMetrics {
        &self.metrics
    }

    async fn resolve_user(&self, id: Uuid) -> UserRef {
        if let Some(user) = self.references.get_user(id) {
            return user;
        }
        match self.user_directory.lookup_user(id).await {
            Some(user) => {
                self.references.put_user(user.clone());
                user
            }
            None => {
                warn!(user_id = %id, "User reference unresolvable, using placeholder");
                UserRef::placeholder(id)
            }
        }
    }

    async fn resolve_customer(&self, code: &str) -> CustomerRef {
        if let Some(customer) = self.references.get_customer(code) {
            return customer;
        }
        match self.customer_directory.lookup_customer(code).await {
            Some(customer) => {
                self.references.put_customer(customer.clone());
                customer
            }
            None => {
                warn!(customer_id = %code, "Customer reference unresolvable, using placeholder");
                CustomerRef::placeholder(code)
            }
        }
    }

    /// Hydrate an order row without its photo collection.
    async fn hydrate(&self, row: &SqliteRow) -> StoreResult<Order> {
        let id = parse_uuid(&row.get::<String, _>("order_id"))?;
        let number = row
            .get::<Option<String>, _>("order_number")
            .map(|raw| OrderNumber::normalize(&raw));

        let status_value: String = row.get("status");
        let status = OrderStatus::from_str(&status_value).ok_or(StoreError::UnknownEnumValue {
            field: "status",
            value: status_value,
        })?;

        let created_by = parse_uuid(&row.get::<String, _>("created_by"))?;
        let assigned_to = match row.get::<Option<String>, _>("assigned_to") {
            Some(raw) => Some(parse_uuid(&raw)?),
            None => None,
        };

        let customer = self.resolve_customer(&row.get::<String, _>("customer_id")).await;
        let created_by = self.resolve_user(created_by).await;
        let assigned_to = match assigned_to {
            Some(user_id) => Some(self.resolve_user(user_id).await),
            None => None,
        };

        Ok(Order {
            id,
            number,
            customer,
            product_description: row.get("product_description"),
            delivery_address: row.get("delivery_address"),
            status,
            created_by,
            created_at: parse_datetime(&row.get::<String, _>("created_at"))?,
            assigned_to,
            photo_ids: Vec::new(),
        })
    }

    /// Fill photo collections for a batch, serving cached collections and
    /// loading the rest in one query. Every loaded collection is cached,
    /// empty ones included.
    async fn attach_children(&self, orders: &mut [Order]) -> StoreResult<()> {
        let mut missing = Vec::new();
        for order in orders.iter_mut() {
            match self.children.get(&order.id) {
                Some(photo_ids) => order.photo_ids = photo_ids,
                None => missing.push(order.id),
            }
        }
        if missing.is_empty() {
            return Ok(());
        }

        let loaded = load_photo_ids_batch(&self.pool, &self.metrics, &missing).await?;
        for order in orders.iter_mut() {
            if let Some(photo_ids) = loaded.get(&order.id) {
                self.children.put(order.id, photo_ids.clone());
                order.photo_ids = photo_ids.clone();
            }
        }
        Ok(())
    }

    async fn try_find_by_id(&self, id: Uuid) -> StoreResult<Option<Order>> {
        self.metrics.record_read();
        let sql = format!("SELECT {ORDER_COLUMNS} FROM orders WHERE order_id = ?");
        let Some(row) = sqlx::query(&sql)
            .bind(id.to_string())
            .fetch_optional(&self.pool)
            .await?
        else {
            return Ok(None);
        };

        let mut order = self.hydrate(&row).await?;
        order.photo_ids = match self.children.get(&order.id) {
            Some(photo_ids) => photo_ids,
            None => {
                let photo_ids = load_photo_ids(&self.pool, &self.metrics, order.id).await?;
                self.children.put(order.id, photo_ids.clone());
                photo_ids
            }
        };

        self.aggregates.put(order.id, order.clone());
        Ok(Some(order))
    }

    async fn try_find_by_order_number(&self, number: &OrderNumber) -> StoreResult<Option<Order>> {
        self.metrics.record_read();
        let sql = format!("SELECT {ORDER_COLUMNS} FROM orders WHERE order_number = ?");
        let Some(row) = sqlx::query(&sql)
            .bind(number.to_string())
            .fetch_optional(&self.pool)
            .await?
        else {
            return Ok(None);
        };

        let mut orders = vec![self.hydrate(&row).await?];
        self.attach_children(&mut orders).await?;
        Ok(orders.pop())
    }

    async fn fetch_page(&self, page: i64, page_size: i64) -> StoreResult<Vec<Order>> {
        self.metrics.record_read();
        let sql = format!(
            "SELECT {ORDER_COLUMNS} FROM orders \
             ORDER BY created_at DESC, order_id DESC LIMIT ? OFFSET ?"
        );
        let rows = sqlx::query(&sql)
            .bind(page_size)
            .bind(page * page_size)
            .fetch_all(&self.pool)
            .await?;

        let mut orders = Vec::with_capacity(rows.len());
        for row in &rows {
            orders.push(self.hydrate(row).await?);
        }
        self.attach_children(&mut orders).await?;
        Ok(orders)
    }

    async fn try_find_native(
        &self,
        where_sql: &str,
        params: &[String],
    ) -> StoreResult<Vec<Order>> {
        self.metrics.record_read();
        let sql = format!(
            "SELECT {ORDER_COLUMNS} FROM orders WHERE {where_sql} \
             ORDER BY created_at DESC, order_id DESC"
        );
        let mut query = sqlx::query(&sql);
        for param in params {
            query = query.bind(param);
        }
        let rows = query.fetch_all(&self.pool).await?;

        let mut orders = Vec::with_capacity(rows.len());
        for row in &rows {
            orders.push(self.hydrate(row).await?);
        }
        self.attach_children(&mut orders).await?;
        Ok(orders)
    }

    async fn try_save(&self, order: &Order) -> StoreResult<()> {
        self.metrics.record_write();
        let mut tx = self.pool.begin().await?;

        let existing: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM orders WHERE order_id = ?")
            .bind(order.id.to_string())
            .fetch_one(&mut *tx)
            .await?;

        let number = order.number.as_ref().map(ToString::to_string);
        let assigned_to = order.assigned_to.as_ref().map(|user| user.id.to_string());

        if existing > 0 {
            sqlx::query(
                "UPDATE orders SET order_number = ?, customer_id = ?, \
                 product_description = ?, delivery_address = ?, status = ?, \
                 created_by = ?, created_at = ?, assigned_to = ? WHERE order_id = ?",
            )
            .bind(&number)
            .bind(&order.customer.id)
            .bind(&order.product_description)
            .bind(&order.delivery_address)
            .bind(order.status.as_str())
            .bind(order.created_by.id.to_string())
            .bind(order.created_at.to_rfc3339())
            .bind(&assigned_to)
            .bind(order.id.to_string())
            .execute(&mut *tx)
            .await?;
        } else {
            sqlx::query(
                "INSERT INTO orders (order_id, order_number, customer_id, \
                 product_description, delivery_address, status, created_by, \
                 created_at, assigned_to) VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?)",
            )
            .bind(order.id.to_string())
            .bind(&number)
            .bind(&order.customer.id)
            .bind(&order.product_description)
            .bind(&order.delivery_address)
            .bind(order.status.as_str())
            .bind(order.created_by.id.to_string())
            .bind(order.created_at.to_rfc3339())
            .bind(&assigned_to)
            .execute(&mut *tx)
            .await?;
        }

        // Non-destructive reconciliation: ensure a photo row exists for every
        // attached id and points at this order. Rows for detached photos are
        // left alone; photo lifecycle is owned elsewhere.
        for photo_id in &order.photo_ids {
            sqlx::query(
                "INSERT INTO photos (photo_id, order_id, uploaded_at) VALUES (?, ?, ?) \
                 ON CONFLICT(photo_id) DO UPDATE SET order_id = excluded.order_id",
            )
            .bind(photo_id.to_string())
            .bind(order.id.to_string())
            .bind(Utc::now().to_rfc3339())
            .execute(&mut *tx)
            .await?;
        }

        tx.commit().await?;
        Ok(())
    }
}

#[async_trait]
impl OrderRepository for SqliteOrderRepository {
    async fn find_by_id(&self, id: Uuid) -> Option<Order> {
        if let Some(order) = self.aggregates.get(&id) {
            debug!(order_id = %id, "Order served from aggregate cache");
            return Some(order);
        }
        match self.try_find_by_id(id).await {
            Ok(found) => found,
            Err(error) => {
                warn!(order_id = %id, error = %error, "Order lookup failed");
                None
            }
        }
    }

    async fn find_by_order_number(&self, number: &OrderNumber) -> Option<Order> {
        match self.try_find_by_order_number(number).await {
            Ok(found) => found,
            Err(error) => {
                warn!(order_number = %number, error = %error, "Order lookup by number failed");
                None
            }
        }
    }

    async fn save(&self, order: Order) -> StoreResult<Order> {
        self.try_save(&order).await?;
        self.aggregates.put(order.id, order.clone());
        self.children.put(order.id, order.photo_ids.clone());
        Ok(order)
    }

    async fn delete_by_id(&self, id: Uuid) -> bool {
        self.metrics.record_write();
        match sqlx::query("DELETE FROM orders WHERE order_id = ?")
            .bind(id.to_string())
            .execute(&self.pool)
            .await
        {
            Ok(result) if result.rows_affected() > 0 => {
                self.aggregates.evict(&id);
                self.children.evict(&id);
                true
            }
            Ok(_) => false,
            Err(error) => {
                warn!(order_id = %id, error = %error, "Order delete failed");
                false
            }
        }
    }

    async fn find_all_paged(&self, page: i64, page_size: i64) -> Vec<Order> {
        let page = page.max(0);
        let page_size = if page_size <= 0 { CLAMPED_PAGE_SIZE } else { page_size };
        match self.fetch_page(page, page_size).await {
            Ok(orders) => orders,
            Err(error) => {
                warn!(page, page_size, error = %error, "Order listing failed");
                Vec::new()
            }
        }
    }

    async fn exists_by_id(&self, id: Uuid) -> bool {
        self.metrics.record_read();
        let result: Result<i64, sqlx::Error> =
            sqlx::query_scalar("SELECT COUNT(*) FROM orders WHERE order_id = ?")
                .bind(id.to_string())
                .fetch_one(&self.pool)
                .await;
        match result {
            Ok(count) => count > 0,
            Err(error) => {
                warn!(order_id = %id, error = %error, "Order existence check failed");
                false
            }
        }
    }

    async fn count(&self) -> i64 {
        self.metrics.record_read();
        match sqlx::query_scalar("SELECT COUNT(*) FROM orders")
            .fetch_one(&self.pool)
            .await
        {
            Ok(count) => count,
            Err(error) => {
                warn!(error = %error, "Order count failed");
                0
            }
        }
    }

    async fn find_by_specification(
        &self,
        spec: &dyn Specification<Order>,
    ) -> SpecificationMatches<Order> {
        let result = match spec.native_clause() {
            Some(clause) => self
                .try_find_native(&clause.where_sql, &clause.params)
                .await
                .map(SpecificationMatches::complete),
            None => {
                paginated_scan(self.scan, "orders", spec, |page| {
                    self.fetch_page(page, self.scan.page_size)
                })
                .await
            }
        };
        match result {
            Ok(matches) => matches,
            Err(error) => {
                warn!(error = %error, "Order specification query failed");
                SpecificationMatches::complete(Vec::new())
            }
        }
    }
}
