//! SQLite persistence adapters.

pub mod child_loader;
pub mod connection;
pub mod metrics;
pub mod migrations;
pub mod order_repository;
pub mod spec_scan;
pub mod user_repository;

pub use connection::{create_pool, create_test_pool, verify_connection};
pub use metrics::StoreMetrics;
pub use migrations::{all_embedded_migrations, Migrator};
pub use order_repository::SqliteOrderRepository;
pub use user_repository::SqliteUserRepository;

use chrono::{DateTime, Utc};
use uuid::Uuid;

use crate::domain::errors::StoreResult;

/// Parse a TEXT uuid column.
pub(crate) fn parse_uuid(value: &str) -> StoreResult<Uuid> {
    Ok(Uuid::parse_str(value)?)
}

/// Parse an RFC 3339 TEXT timestamp column into UTC.
pub(crate) fn parse_datetime(value: &str) -> StoreResult<DateTime<Utc>> {
    Ok(DateTime::parse_from_rfc3339(value)?.with_timezone(&Utc))
}

/// Build a `?, ?, ...` placeholder list for an `IN` clause.
pub(crate) fn in_placeholders(count: usize) -> String {
    let mut placeholders = String::with_capacity(count.saturating_mul(3));
    for i in 0..count {
        if i > 0 {
            placeholders.push_str(", ");
        }
        placeholders.push('?');
    }
    placeholders
}
