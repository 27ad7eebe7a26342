//! Domain models: aggregates, value types and reference projections.

pub mod config;
pub mod order;
pub mod order_number;
pub mod reference;
pub mod user;

pub use config::{CacheSettings, Config, DatabaseConfig, LoggingConfig, ScanSettings};
pub use order::{Order, OrderStatus};
pub use order_number::{OrderNumber, OrderNumberError, FALLBACK_CUSTOMER_CODE};
pub use reference::{CustomerRef, UserRef};
pub use user::{Role, User, UserStatus};
