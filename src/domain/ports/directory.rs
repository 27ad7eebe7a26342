//! Lookup collaborators for resolving foreign references.
//!
//! Both directories may fail or return "not found"; repositories then
//! degrade to placeholder projections instead of failing the whole read.

use crate::domain::models::{CustomerRef, UserRef};
use async_trait::async_trait;
use uuid::Uuid;

/// Resolves user ids to reference projections ("created by", "assigned to").
#[async_trait]
pub trait UserDirectory: Send + Sync {
    async fn lookup_user(&self, id: Uuid) -> Option<UserRef>;
}

/// Resolves customer codes to reference projections.
#[async_trait]
pub trait CustomerDirectory: Send + Sync {
    async fn lookup_customer(&self, code: &str) -> Option<CustomerRef>;
}
