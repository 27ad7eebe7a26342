//! Reference projections.
//!
//! Minimal immutable stand-ins for an aggregate, used wherever the full
//! aggregate is unnecessary ("created by", "assigned to", the owning
//! customer). They are never persisted on their own; each is derived from
//! the owning aggregate's state at the moment it is resolved.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Lightweight (id, display-name) projection of a user.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct UserRef {
    pub id: Uuid,
    pub display_name: String,
}

impl UserRef {
    pub fn new(id: Uuid, display_name: impl Into<String>) -> Self {
        Self { id, display_name: display_name.into() }
    }

    /// Stand-in for an unresolvable user; keeps the id visible to callers.
    pub fn placeholder(id: Uuid) -> Self {
        Self { id, display_name: id.to_string() }
    }
}

/// Lightweight (code, display-name) projection of a customer.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct CustomerRef {
    pub id: String,
    pub display_name: String,
}

impl CustomerRef {
    pub fn new(id: impl Into<String>, display_name: impl Into<String>) -> Self {
        Self { id: id.into(), display_name: display_name.into() }
    }

    /// Stand-in for an unresolvable customer code.
    pub fn placeholder(id: impl Into<String>) -> Self {
        let id = id.into();
        Self { display_name: id.clone(), id }
    }
}
