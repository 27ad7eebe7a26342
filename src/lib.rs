//! Qualidoc - Quality Documentation Persistence Layer
//!
//! Persistence access layer for a manufacturing quality-documentation system:
//! order and user aggregates over SQLite with repository-owned caching,
//! specification queries and batched child-collection loading.
//!
//! # Architecture
//!
//! This crate follows Hexagonal Architecture principles:
//!
//! - **Domain Layer** (`domain`): Aggregates, value types, repository ports
//!   and stock specifications
//! - **Adapters Layer** (`adapters`): SQLite repositories and in-memory caches
//! - **Infrastructure Layer** (`infrastructure`): Configuration loading and
//!   logging setup
//!
//! # Example
//!
//! ```ignore
//! use std::sync::Arc;
//! use qualidoc::adapters::sqlite::{create_pool, all_embedded_migrations, Migrator};
//! use qualidoc::infrastructure::config::ConfigLoader;
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let config = ConfigLoader::load()?;
//!     let pool = create_pool(&config.database).await?;
//!     Migrator::new(pool.clone())
//!         .run_embedded_migrations(all_embedded_migrations())
//!         .await?;
//!     Ok(())
//! }
//! ```

pub mod adapters;
pub mod domain;
pub mod infrastructure;

// Re-export commonly used types for convenience
pub use adapters::cache::{BoundedCache, ReferenceCache};
pub use adapters::sqlite::{
    create_pool, create_test_pool, SqliteOrderRepository, SqliteUserRepository, StoreMetrics,
};
pub use domain::errors::{StoreError, StoreResult};
pub use domain::models::{
    CacheSettings, Config, CustomerRef, DatabaseConfig, LoggingConfig, Order, OrderNumber,
    OrderStatus, Role, ScanSettings, User, UserRef, UserStatus,
};
pub use domain::ports::{
    CustomerDirectory, NativeClause, OrderRepository, Specification, SpecificationMatches,
    UserDirectory, UserRepository,
};
pub use infrastructure::config::{ConfigError, ConfigLoader};
