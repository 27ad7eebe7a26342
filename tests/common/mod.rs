//! Common test utilities for integration tests
//!
//! Provides shared fixtures, stub directories and aggregate builders used
//! across the repository test files.

use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use chrono::{TimeZone, Utc};
use sqlx::SqlitePool;
use uuid::Uuid;

use qualidoc::adapters::sqlite::{all_embedded_migrations, create_test_pool, Migrator};
use qualidoc::domain::models::{CustomerRef, Order, OrderStatus, User, UserRef, UserStatus};
use qualidoc::domain::ports::{CustomerDirectory, UserDirectory};

/// Fresh in-memory database with the full schema applied.
pub async fn setup_database() -> SqlitePool {
    let pool = create_test_pool().await.expect("Failed to create pool");
    Migrator::new(pool.clone())
        .run_embedded_migrations(all_embedded_migrations())
        .await
        .expect("Failed to run migrations");
    pool
}

/// Setup test logging
///
/// Initializes tracing subscriber for test output.
#[allow(dead_code)]
pub fn setup_test_logging() {
    use tracing_subscriber::fmt;

    let _ = fmt()
        .with_test_writer()
        .with_max_level(tracing::Level::DEBUG)
        .try_init();
}

/// In-memory user directory with a fixed set of known users.
#[derive(Default)]
pub struct StubUserDirectory {
    users: HashMap<Uuid, UserRef>,
}

impl StubUserDirectory {
    #[allow(dead_code)]
    pub fn with_users(users: impl IntoIterator<Item = UserRef>) -> Arc<Self> {
        Arc::new(Self {
            users: users.into_iter().map(|u| (u.id, u)).collect(),
        })
    }
}

#[async_trait]
impl UserDirectory for StubUserDirectory {
    async fn lookup_user(&self, id: Uuid) -> Option<UserRef> {
        self.users.get(&id).cloned()
    }
}

/// In-memory customer directory with a fixed set of known customers.
#[derive(Default)]
pub struct StubCustomerDirectory {
    customers: HashMap<String, CustomerRef>,
}

impl StubCustomerDirectory {
    #[allow(dead_code)]
    pub fn with_customers(customers: impl IntoIterator<Item = CustomerRef>) -> Arc<Self> {
        Arc::new(Self {
            customers: customers.into_iter().map(|c| (c.id.clone(), c)).collect(),
        })
    }
}

#[async_trait]
impl CustomerDirectory for StubCustomerDirectory {
    async fn lookup_customer(&self, code: &str) -> Option<CustomerRef> {
        self.customers.get(code).cloned()
    }
}

/// Creator used by [`sample_order`]; registered in the default directories.
#[allow(dead_code)]
pub fn sample_creator() -> UserRef {
    UserRef::new(
        Uuid::parse_str("6f1f8d2a-0b1c-4c6e-9d4e-3a5b7c9d1e2f").expect("valid uuid"),
        "Jane Doe",
    )
}

/// Customer used by [`sample_order`]; registered in the default directories.
#[allow(dead_code)]
pub fn sample_customer() -> CustomerRef {
    CustomerRef::new("ACME", "Acme Corp")
}

/// Directories pre-populated with the sample creator and customer.
#[allow(dead_code)]
pub fn sample_directories() -> (Arc<StubUserDirectory>, Arc<StubCustomerDirectory>) {
    (
        StubUserDirectory::with_users([sample_creator()]),
        StubCustomerDirectory::with_customers([sample_customer()]),
    )
}

/// Pending order with a deterministic creation time offset, so listing
/// order is predictable across tests.
#[allow(dead_code)]
pub fn sample_order(minutes: i64) -> Order {
    Order {
        id: Uuid::new_v4(),
        number: None,
        customer: sample_customer(),
        product_description: "Hydraulic valve block".to_string(),
        delivery_address: "1 Factory Road".to_string(),
        status: OrderStatus::Pending,
        created_by: sample_creator(),
        created_at: Utc
            .with_ymd_and_hms(2026, 8, 1, 8, 0, 0)
            .single()
            .expect("valid timestamp")
            + chrono::Duration::minutes(minutes),
        assigned_to: None,
        photo_ids: Vec::new(),
    }
}

/// Active user with no roles.
#[allow(dead_code)]
pub fn sample_user(username: &str) -> User {
    User {
        id: Uuid::new_v4(),
        username: username.to_string(),
        password_hash: "argon2$stub".to_string(),
        name: None,
        email: format!("{username}@example.com"),
        status: UserStatus::Active,
        roles: Vec::new(),
        nfc_id: None,
    }
}
