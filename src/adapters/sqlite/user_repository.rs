//! SQLite-backed user repository.
//!
//! Also serves as the [`UserDirectory`] the order repository resolves its
//! "created by" and "assigned to" references through.

use async_trait::async_trait;
use sqlx::sqlite::SqliteRow;
use sqlx::{Row, SqlitePool};
use tracing::{debug, warn};
use uuid::Uuid;

use crate::adapters::cache::BoundedCache;
use crate::domain::errors::{StoreError, StoreResult};
use crate::domain::models::{CacheSettings, Role, ScanSettings, User, UserRef, UserStatus};
use crate::domain::ports::{
    Specification, SpecificationMatches, UserDirectory, UserRepository, CLAMPED_PAGE_SIZE,
};

use super::child_loader::{load_roles, load_roles_batch};
use super::metrics::StoreMetrics;
use super::spec_scan::paginated_scan;
use super::parse_uuid;

const USER_COLUMNS: &str = "user_id, username, password_hash, name, email, status, nfc_id";

pub struct SqliteUserRepository {
    pool: SqlitePool,
    aggregates: BoundedCache<Uuid, User>,
    roles: BoundedCache<Uuid, Vec<Role>>,
    scan: ScanSettings,
    metrics: StoreMetrics,
}

impl SqliteUserRepository {
    pub fn new(pool: SqlitePool) -> Self {
        Self::with_settings(pool, CacheSettings::default(), ScanSettings::default())
    }

    pub fn with_settings(pool: SqlitePool, cache: CacheSettings, scan: ScanSettings) -> Self {
        Self {
            pool,
            aggregates: BoundedCache::new(cache.aggregate_capacity),
            roles: BoundedCache::new(cache.children_capacity),
            scan,
            metrics: StoreMetrics::new(),
        }
    }

    /// Store round-trip counters, exposed for cache-coherence assertions.
    pub fn metrics(&self) -> &StoreMetrics {
        &self.metrics
    }

    fn hydrate(row: &SqliteRow) -> StoreResult<User> {
        let status_value: String = row.get("status");
        let status = UserStatus::from_str(&status_value).ok_or(StoreError::UnknownEnumValue {
            field: "status",
            value: status_value,
        })?;

        Ok(User {
            id: parse_uuid(&row.get::<String, _>("user_id"))?,
            username: row.get("username"),
            password_hash: row.get("password_hash"),
            name: row.get("name"),
            email: row.get("email"),
            status,
            roles: Vec::new(),
            nfc_id: row.get("nfc_id"),
        })
    }

    /// Fill role collections for a batch, serving cached ones and loading
    /// the rest in one query. Empty collections are cached and warn-logged.
    async fn attach_roles(&self, users: &mut [User]) -> StoreResult<()> {
        let mut missing = Vec::new();
        for user in users.iter_mut() {
            match self.roles.get(&user.id) {
                Some(roles) => user.roles = roles,
                None => missing.push(user.id),
            }
        }
        if !missing.is_empty() {
            let loaded = load_roles_batch(&self.pool, &self.metrics, &missing).await?;
            for user in users.iter_mut() {
                if let Some(roles) = loaded.get(&user.id) {
                    self.roles.put(user.id, roles.clone());
                    user.roles = roles.clone();
                }
            }
        }
        for user in users.iter() {
            if user.roles.is_empty() {
                warn!(user_id = %user.id, username = %user.username, "User loaded with no roles");
            }
        }
        Ok(())
    }

    async fn try_find_by_id(&self, id: Uuid) -> StoreResult<Option<User>> {
        self.metrics.record_read();
        let sql = format!("SELECT {USER_COLUMNS} FROM users WHERE user_id = ?");
        let Some(row) = sqlx::query(&sql)
            .bind(id.to_string())
            .fetch_optional(&self.pool)
            .await?
        else {
            return Ok(None);
        };

        let mut user = Self::hydrate(&row)?;
        user.roles = match self.roles.get(&user.id) {
            Some(roles) => roles,
            None => {
                let roles = load_roles(&self.pool, &self.metrics, user.id).await?;
                self.roles.put(user.id, roles.clone());
                roles
            }
        };
        if user.roles.is_empty() {
            warn!(user_id = %user.id, username = %user.username, "User loaded with no roles");
        }

        self.aggregates.put(user.id, user.clone());
        Ok(Some(user))
    }

    async fn try_find_by_username(&self, username: &str) -> StoreResult<Option<User>> {
        self.metrics.record_read();
        let sql = format!("SELECT {USER_COLUMNS} FROM users WHERE username = ?");
        let Some(row) = sqlx::query(&sql)
            .bind(username)
            .fetch_optional(&self.pool)
            .await?
        else {
            return Ok(None);
        };

        let mut users = vec![Self::hydrate(&row)?];
        self.attach_roles(&mut users).await?;
        Ok(users.pop())
    }

    async fn fetch_page(&self, page: i64, page_size: i64) -> StoreResult<Vec<User>> {
        self.metrics.record_read();
        let sql = format!(
            "SELECT {USER_COLUMNS} FROM users ORDER BY username ASC LIMIT ? OFFSET ?"
        );
        let rows = sqlx::query(&sql)
            .bind(page_size)
            .bind(page * page_size)
            .fetch_all(&self.pool)
            .await?;

        let mut users = rows.iter().map(Self::hydrate).collect::<StoreResult<Vec<_>>>()?;
        self.attach_roles(&mut users).await?;
        Ok(users)
    }

    async fn try_find_native(&self, where_sql: &str, params: &[String]) -> StoreResult<Vec<User>> {
        self.metrics.record_read();
        let sql =
            format!("SELECT {USER_COLUMNS} FROM users WHERE {where_sql} ORDER BY username ASC");
        let mut query = sqlx::query(&sql);
        for param in params {
            query = query.bind(param);
        }
        let rows = query.fetch_all(&self.pool).await?;

        let mut users = rows.iter().map(Self::hydrate).collect::<StoreResult<Vec<_>>>()?;
        self.attach_roles(&mut users).await?;
        Ok(users)
    }

    async fn try_save(&self, user: &User) -> StoreResult<()> {
        self.metrics.record_write();
        let mut tx = self.pool.begin().await?;

        let existing: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM users WHERE user_id = ?")
            .bind(user.id.to_string())
            .fetch_one(&mut *tx)
            .await?;

        if existing > 0 {
            sqlx::query(
                "UPDATE users SET username = ?, password_hash = ?, name = ?, email = ?, \
                 status = ?, nfc_id = ? WHERE user_id = ?",
            )
            .bind(&user.username)
            .bind(&user.password_hash)
            .bind(&user.name)
            .bind(&user.email)
            .bind(user.status.as_str())
            .bind(&user.nfc_id)
            .bind(user.id.to_string())
            .execute(&mut *tx)
            .await?;
        } else {
            sqlx::query(
                "INSERT INTO users (user_id, username, password_hash, name, email, status, \
                 nfc_id) VALUES (?, ?, ?, ?, ?, ?, ?)",
            )
            .bind(user.id.to_string())
            .bind(&user.username)
            .bind(&user.password_hash)
            .bind(&user.name)
            .bind(&user.email)
            .bind(user.status.as_str())
            .bind(&user.nfc_id)
            .execute(&mut *tx)
            .await?;
        }

        // Non-destructive reconciliation: grant rows are ensured, never
        // revoked here. Revocation is an explicit administrative operation.
        for role in &user.roles {
            sqlx::query("INSERT OR IGNORE INTO user_roles (user_id, role) VALUES (?, ?)")
                .bind(user.id.to_string())
                .bind(role.as_str())
                .execute(&mut *tx)
                .await?;
        }

        tx.commit().await?;
        Ok(())
    }
}

#[async_trait]
impl UserRepository for SqliteUserRepository {
    async fn find_by_id(&self, id: Uuid) -> Option<User> {
        if let Some(user) = self.aggregates.get(&id) {
            debug!(user_id = %id, "User served from aggregate cache");
            return Some(user);
        }
        match self.try_find_by_id(id).await {
            Ok(found) => found,
            Err(error) => {
                warn!(user_id = %id, error = %error, "User lookup failed");
                None
            }
        }
    }

    async fn find_by_username(&self, username: &str) -> Option<User> {
        match self.try_find_by_username(username).await {
            Ok(found) => found,
            Err(error) => {
                warn!(username = %username, error = %error, "User lookup by username failed");
                None
            }
        }
    }

    async fn save(&self, user: User) -> StoreResult<User> {
        self.try_save(&user).await?;
        self.aggregates.put(user.id, user.clone());
        self.roles.put(user.id, user.roles.clone());
        Ok(user)
    }

    async fn delete_by_id(&self, id: Uuid) -> bool {
        self.metrics.record_write();
        match sqlx::query("DELETE FROM users WHERE user_id = ?")
            .bind(id.to_string())
            .execute(&self.pool)
            .await
        {
            Ok(result) if result.rows_affected() > 0 => {
                self.aggregates.evict(&id);
                self.roles.evict(&id);
                true
            }
            Ok(_) => false,
            Err(error) => {
                warn!(user_id = %id, error = %error, "User delete failed");
                false
            }
        }
    }

    async fn find_all_paged(&self, page: i64, page_size: i64) -> Vec<User> {
        let page = page.max(0);
        let page_size = if page_size <= 0 { CLAMPED_PAGE_SIZE } else { page_size };
        match self.fetch_page(page, page_size).await {
            Ok(users) => users,
            Err(error) => {
                warn!(page, page_size, error = %error, "User listing failed");
                Vec::new()
            }
        }
    }

    async fn exists_by_id(&self, id: Uuid) -> bool {
        self.metrics.record_read();
        let result: Result<i64, sqlx::Error> =
            sqlx::query_scalar("SELECT COUNT(*) FROM users WHERE user_id = ?")
                .bind(id.to_string())
                .fetch_one(&self.pool)
                .await;
        match result {
            Ok(count) => count > 0,
            Err(error) => {
                warn!(user_id = %id, error = %error, "User existence check failed");
                false
            }
        }
    }

    async fn count(&self) -> i64 {
        self.metrics.record_read();
        match sqlx::query_scalar("SELECT COUNT(*) FROM users")
            .fetch_one(&self.pool)
            .await
        {
            Ok(count) => count,
            Err(error) => {
                warn!(error = %error, "User count failed");
                0
            }
        }
    }

    async fn find_by_specification(
        &self,
        spec: &dyn Specification<User>,
    ) -> SpecificationMatches<User> {
        let result = match spec.native_clause() {
            Some(clause) => self
                .try_find_native(&clause.where_sql, &clause.params)
                .await
                .map(SpecificationMatches::complete),
            None => {
                paginated_scan(self.scan, "users", spec, |page| {
                    self.fetch_page(page, self.scan.page_size)
                })
                .await
            }
        };
        match result {
            Ok(matches) => matches,
            Err(error) => {
                warn!(error = %error, "User specification query failed");
                SpecificationMatches::complete(Vec::new())
            }
        }
    }
}

#[async_trait]
impl UserDirectory for SqliteUserRepository {
    /// Resolve a user id to its reference projection through the same cached
    /// read path as [`UserRepository::find_by_id`].
    async fn lookup_user(&self, id: Uuid) -> Option<UserRef> {
        self.find_by_id(id).await.map(|user| user.to_ref())
    }
}
