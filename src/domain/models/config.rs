//! Configuration model for the persistence layer.

use serde::{Deserialize, Serialize};

/// Top-level configuration, loaded by
/// [`ConfigLoader`](crate::infrastructure::config::ConfigLoader).
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub database: DatabaseConfig,
    pub cache: CacheSettings,
    pub scan: ScanSettings,
    pub logging: LoggingConfig,
}

/// SQLite database location and pool sizing.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct DatabaseConfig {
    /// SQLite database path, e.g. `.qualidoc/qualidoc.db`.
    pub path: String,
    pub max_connections: u32,
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            path: ".qualidoc/qualidoc.db".to_string(),
            max_connections: 5,
        }
    }
}

/// Capacities of the repository-owned caches.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
#[serde(default)]
pub struct CacheSettings {
    /// Aggregate cache entries per repository.
    pub aggregate_capacity: usize,
    /// Child-collection cache entries per repository.
    pub children_capacity: usize,
    /// Reference projection cache entries (shared across repositories).
    pub reference_capacity: usize,
}

impl Default for CacheSettings {
    fn default() -> Self {
        Self {
            aggregate_capacity: 100,
            children_capacity: 100,
            reference_capacity: 256,
        }
    }
}

/// Bounds for the in-memory specification fallback scan.
///
/// The page size is deliberately smaller than the default listing page size
/// to bound memory; the page ceiling bounds worst-case latency against
/// pathological specifications. Hitting the ceiling surfaces as a
/// `truncated` flag on the result, not just a log line.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
#[serde(default)]
pub struct ScanSettings {
    pub page_size: i64,
    pub max_pages: u32,
}

impl Default for ScanSettings {
    fn default() -> Self {
        Self { page_size: 25, max_pages: 40 }
    }
}

/// Logging output configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// One of: trace, debug, info, warn, error.
    pub level: String,
    /// One of: json, pretty.
    pub format: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            format: "json".to_string(),
        }
    }
}
