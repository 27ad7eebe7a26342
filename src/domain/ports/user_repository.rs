//! Repository port for user persistence.

use crate::domain::errors::StoreResult;
use crate::domain::models::User;
use crate::domain::ports::order_repository::DEFAULT_PAGE_SIZE;
use crate::domain::ports::specification::{Specification, SpecificationMatches};
use async_trait::async_trait;
use uuid::Uuid;

/// Repository contract for the user aggregate.
///
/// Same failure semantics as [`OrderRepository`](super::OrderRepository):
/// reads degrade to empty results, `save` errors propagate.
#[async_trait]
pub trait UserRepository: Send + Sync {
    /// Look up a user by identity, read-through cached.
    async fn find_by_id(&self, id: Uuid) -> Option<User>;

    /// Natural-key lookup by unique username. Not separately cached.
    async fn find_by_username(&self, username: &str) -> Option<User>;

    /// Insert or fully replace the user and reconcile its role rows, then
    /// update the caches write-through.
    async fn save(&self, user: User) -> StoreResult<User>;

    /// Delete by aggregate; see [`UserRepository::delete_by_id`].
    async fn delete(&self, user: &User) -> bool {
        self.delete_by_id(user.id).await
    }

    /// Delete by identity; returns whether a row was actually removed.
    async fn delete_by_id(&self, id: Uuid) -> bool;

    /// First page of users, ordered by username.
    async fn find_all(&self) -> Vec<User> {
        self.find_all_paged(0, DEFAULT_PAGE_SIZE).await
    }

    /// Page of users ordered by username, with the same clamping rules as
    /// order listing. Roles for the whole page load in one batched query.
    async fn find_all_paged(&self, page: i64, page_size: i64) -> Vec<User>;

    /// Direct store existence check, uncached.
    async fn exists_by_id(&self, id: Uuid) -> bool;

    /// Direct store count, uncached.
    async fn count(&self) -> i64;

    /// Execute a specification: native clause when declared, bounded
    /// in-memory scan otherwise.
    async fn find_by_specification(
        &self,
        spec: &dyn Specification<User>,
    ) -> SpecificationMatches<User>;
}
