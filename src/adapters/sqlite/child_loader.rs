//! Batched loading of child collections.
//!
//! Listing a page of aggregates must not issue one child query per row.
//! The batch loaders fetch children for a whole page of parent ids in a
//! single `IN (...)` query and return an entry for every requested parent,
//! including the childless ones, so repositories can cache the empty sets
//! too and avoid re-querying them.

use std::collections::HashMap;

use sqlx::{Row, SqlitePool};
use uuid::Uuid;

use crate::domain::errors::StoreResult;
use crate::domain::models::Role;
use tracing::warn;

use super::metrics::StoreMetrics;
use super::{in_placeholders, parse_uuid};

/// Photo ids attached to one order, in upload order.
pub async fn load_photo_ids(
    pool: &SqlitePool,
    metrics: &StoreMetrics,
    order_id: Uuid,
) -> StoreResult<Vec<Uuid>> {
    metrics.record_read();
    let rows = sqlx::query(
        "SELECT photo_id FROM photos WHERE order_id = ? ORDER BY uploaded_at ASC, photo_id ASC",
    )
    .bind(order_id.to_string())
    .fetch_all(pool)
    .await?;

    rows.iter()
        .map(|row| parse_uuid(&row.get::<String, _>("photo_id")))
        .collect()
}

/// Photo ids for a page of orders in one query. Every requested order id is
/// present in the result, childless ones with an empty vector.
pub async fn load_photo_ids_batch(
    pool: &SqlitePool,
    metrics: &StoreMetrics,
    order_ids: &[Uuid],
) -> StoreResult<HashMap<Uuid, Vec<Uuid>>> {
    let mut by_order: HashMap<Uuid, Vec<Uuid>> =
        order_ids.iter().map(|id| (*id, Vec::new())).collect();
    if order_ids.is_empty() {
        return Ok(by_order);
    }

    metrics.record_read();
    let sql = format!(
        "SELECT photo_id, order_id FROM photos WHERE order_id IN ({}) \
         ORDER BY uploaded_at ASC, photo_id ASC",
        in_placeholders(order_ids.len())
    );
    let mut query = sqlx::query(&sql);
    for id in order_ids {
        query = query.bind(id.to_string());
    }
    let rows = query.fetch_all(pool).await?;

    for row in rows {
        let order_id = parse_uuid(&row.get::<String, _>("order_id"))?;
        let photo_id = parse_uuid(&row.get::<String, _>("photo_id"))?;
        if let Some(photos) = by_order.get_mut(&order_id) {
            photos.push(photo_id);
        }
    }
    Ok(by_order)
}

/// Roles granted to one user. Unknown role values in storage are skipped
/// with a warning rather than failing the whole load.
pub async fn load_roles(
    pool: &SqlitePool,
    metrics: &StoreMetrics,
    user_id: Uuid,
) -> StoreResult<Vec<Role>> {
    metrics.record_read();
    let rows = sqlx::query("SELECT role FROM user_roles WHERE user_id = ? ORDER BY role ASC")
        .bind(user_id.to_string())
        .fetch_all(pool)
        .await?;

    let mut roles = Vec::with_capacity(rows.len());
    for row in rows {
        let value: String = row.get("role");
        match Role::from_str(&value) {
            Some(role) => roles.push(role),
            None => warn!(user_id = %user_id, role = %value, "Skipping unknown role value"),
        }
    }
    Ok(roles)
}

/// Roles for a page of users in one query, with empty entries for users
/// carrying no roles.
pub async fn load_roles_batch(
    pool: &SqlitePool,
    metrics: &StoreMetrics,
    user_ids: &[Uuid],
) -> StoreResult<HashMap<Uuid, Vec<Role>>> {
    let mut by_user: HashMap<Uuid, Vec<Role>> =
        user_ids.iter().map(|id| (*id, Vec::new())).collect();
    if user_ids.is_empty() {
        return Ok(by_user);
    }

    metrics.record_read();
    let sql = format!(
        "SELECT user_id, role FROM user_roles WHERE user_id IN ({}) ORDER BY role ASC",
        in_placeholders(user_ids.len())
    );
    let mut query = sqlx::query(&sql);
    for id in user_ids {
        query = query.bind(id.to_string());
    }
    let rows = query.fetch_all(pool).await?;

    for row in rows {
        let user_id = parse_uuid(&row.get::<String, _>("user_id"))?;
        let value: String = row.get("role");
        match Role::from_str(&value) {
            Some(role) => {
                if let Some(roles) = by_user.get_mut(&user_id) {
                    roles.push(role);
                }
            }
            None => warn!(user_id = %user_id, role = %value, "Skipping unknown role value"),
        }
    }
    Ok(by_user)
}
