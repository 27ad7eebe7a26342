//! Repository port for order persistence.

use crate::domain::errors::StoreResult;
use crate::domain::models::{Order, OrderNumber};
use crate::domain::ports::specification::{Specification, SpecificationMatches};
use async_trait::async_trait;
use uuid::Uuid;

/// Page size used by the unpaged [`OrderRepository::find_all`].
pub const DEFAULT_PAGE_SIZE: i64 = 50;

/// Page size substituted when a caller passes a non-positive one.
pub const CLAMPED_PAGE_SIZE: i64 = 100;

/// Repository contract for the order aggregate.
///
/// Read operations never fail: store errors are logged at the operation
/// boundary and surface as the uniform "no data" signal (`None`, empty list,
/// `false`, `0`). `save` is the exception; silently dropping a write would
/// break the caller's durability expectation, so its errors propagate.
#[async_trait]
pub trait OrderRepository: Send + Sync {
    /// Look up an order by identity, read-through cached.
    async fn find_by_id(&self, id: Uuid) -> Option<Order>;

    /// Natural-key lookup by business number. Not separately cached.
    async fn find_by_order_number(&self, number: &OrderNumber) -> Option<Order>;

    /// Insert or fully replace the order and reconcile its photo links,
    /// then update the caches write-through. Identity is caller-assigned;
    /// the same aggregate is returned on success.
    async fn save(&self, order: Order) -> StoreResult<Order>;

    /// Delete by aggregate; see [`OrderRepository::delete_by_id`].
    async fn delete(&self, order: &Order) -> bool {
        self.delete_by_id(order.id).await
    }

    /// Delete by identity; returns whether a row was actually removed.
    /// Evicts caches only on an actual removal. Idempotent.
    async fn delete_by_id(&self, id: Uuid) -> bool;

    /// First page of orders, newest first.
    async fn find_all(&self) -> Vec<Order> {
        self.find_all_paged(0, DEFAULT_PAGE_SIZE).await
    }

    /// Page of orders, newest first. Negative pages clamp to 0,
    /// non-positive page sizes to [`CLAMPED_PAGE_SIZE`]. Children for the
    /// whole page load through one batched query.
    async fn find_all_paged(&self, page: i64, page_size: i64) -> Vec<Order>;

    /// Direct store existence check, uncached.
    async fn exists_by_id(&self, id: Uuid) -> bool;

    /// Direct store count, uncached.
    async fn count(&self) -> i64;

    /// Execute a specification: native clause when declared, bounded
    /// in-memory scan otherwise.
    async fn find_by_specification(
        &self,
        spec: &dyn Specification<Order>,
    ) -> SpecificationMatches<Order>;
}
