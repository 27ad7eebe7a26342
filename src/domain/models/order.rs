//! Order aggregate model.
//!
//! An order is the documentation unit for one manufactured item: what was
//! ordered, by whom, its QA lifecycle status and the photo evidence attached
//! to it. The aggregate identity is caller-assigned and immutable; the
//! business number may be absent until assignment.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::order_number::OrderNumber;
use super::reference::{CustomerRef, UserRef};

/// QA lifecycle status of an order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OrderStatus {
    /// Order captured, documentation not started
    Pending,
    /// Photo evidence is being collected
    InProgress,
    /// All evidence collected, awaiting QA review
    Completed,
    /// QA approved the documentation
    Approved,
    /// QA rejected the documentation
    Rejected,
}

impl Default for OrderStatus {
    fn default() -> Self {
        Self::Pending
    }
}

impl OrderStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::InProgress => "in_progress",
            Self::Completed => "completed",
            Self::Approved => "approved",
            Self::Rejected => "rejected",
        }
    }

    #[allow(clippy::should_implement_trait)]
    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "pending" => Some(Self::Pending),
            "in_progress" | "inprogress" => Some(Self::InProgress),
            "completed" => Some(Self::Completed),
            "approved" => Some(Self::Approved),
            "rejected" => Some(Self::Rejected),
            _ => None,
        }
    }

    /// Check if QA has ruled on this order.
    pub fn is_reviewed(&self) -> bool {
        matches!(self, Self::Approved | Self::Rejected)
    }
}

/// Order aggregate root.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Order {
    /// Opaque identity, assigned by the caller before the first save.
    pub id: Uuid,
    /// Human-meaningful business number; absent until assigned.
    pub number: Option<OrderNumber>,
    /// Customer this order belongs to.
    pub customer: CustomerRef,
    pub product_description: String,
    pub delivery_address: String,
    pub status: OrderStatus,
    pub created_by: UserRef,
    pub created_at: DateTime<Utc>,
    pub assigned_to: Option<UserRef>,
    /// Ordered set of photo identifiers attached to this order.
    pub photo_ids: Vec<Uuid>,
}

impl Order {
    /// Create a new pending order with a fresh identity.
    pub fn new(
        customer: CustomerRef,
        product_description: impl Into<String>,
        delivery_address: impl Into<String>,
        created_by: UserRef,
    ) -> Self {
        Self {
            id: Uuid::new_v4(),
            number: None,
            customer,
            product_description: product_description.into(),
            delivery_address: delivery_address.into(),
            status: OrderStatus::Pending,
            created_by,
            created_at: Utc::now(),
            assigned_to: None,
            photo_ids: Vec::new(),
        }
    }

    /// Attach a photo id, keeping the collection free of duplicates.
    pub fn attach_photo(&mut self, photo_id: Uuid) {
        if !self.photo_ids.contains(&photo_id) {
            self.photo_ids.push(photo_id);
        }
    }
}
