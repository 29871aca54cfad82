//! # Database Pool Management
//!
//! Connection pool creation and configuration for SQLite, plus the
//! [`Database`] handle that hands out repositories and services.
//!
//! ## Architecture
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                      Database Connection Pool                           │
//! │                                                                         │
//! │  Host startup                                                          │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  DbConfig::from_env() ← KITCHENPOS_DATABASE_PATH, ..._MAX_CONNECTIONS  │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  Database::new(config).await ← Create pool + run migrations            │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  ┌─────────────────────────────────────────┐                           │
//! │  │            SqlitePool                    │                           │
//! │  │  ┌─────┐ ┌─────┐ ┌─────┐ ┌─────┐       │                           │
//! │  │  │Conn1│ │Conn2│ │Conn3│ │Conn4│ ...   │  (max_connections)        │
//! │  │  └─────┘ └─────┘ └─────┘ └─────┘       │                           │
//! │  └─────────────────────────────────────────┘                           │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  db.order_service() / db.table_group_service() / ...                   │
//! │  (each write runs in db.transaction(..), reads use db.session())       │
//! │                                                                         │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## WAL Mode
//! SQLite WAL (Write-Ahead Logging) mode is enabled for:
//! - Better concurrent read performance
//! - Readers don't block writers
//! - Better crash recovery

use sqlx::sqlite::{SqliteConnectOptions, SqliteJournalMode, SqlitePoolOptions, SqliteSynchronous};
use sqlx::SqlitePool;
use std::future::Future;
use std::path::PathBuf;
use std::str::FromStr;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::Mutex;
use tracing::{debug, info, warn};

use crate::error::{DbError, DbResult};
use crate::migrations;
use crate::repository::catalog::{
    SqliteMenuGroupRepository, SqliteMenuProductRepository, SqliteMenuRepository,
    SqliteProductRepository,
};
use crate::repository::order::{SqliteOrderLineItemRepository, SqliteOrderRepository};
use crate::repository::table::{SqliteOrderTableRepository, SqliteTableGroupRepository};
use crate::repository::DbHandle;
use crate::service::{
    DbMenuGroupService, DbMenuService, DbOrderService, DbProductService, DbTableGroupService,
    DbTableService,
};
use crate::session::Session;

/// Environment variable overriding the database file path.
pub const DATABASE_PATH_ENV: &str = "KITCHENPOS_DATABASE_PATH";

/// Environment variable overriding the pool size.
pub const MAX_CONNECTIONS_ENV: &str = "KITCHENPOS_DB_MAX_CONNECTIONS";

/// Database file used when no path is configured.
pub const DEFAULT_DATABASE_PATH: &str = "kitchenpos.db";

// =============================================================================
// Configuration
// =============================================================================

/// Database configuration.
///
/// ## Example
/// ```rust,ignore
/// let config = DbConfig::new("/path/to/kitchenpos.db")
///     .max_connections(5)
///     .min_connections(1);
/// ```
#[derive(Debug, Clone)]
pub struct DbConfig {
    /// Path to the SQLite database file.
    pub database_path: PathBuf,

    /// Maximum number of connections in the pool.
    /// Default: 5
    pub max_connections: u32,

    /// Minimum number of connections to keep alive.
    /// Default: 1
    pub min_connections: u32,

    /// Connection timeout duration.
    /// Default: 30 seconds
    pub connect_timeout: Duration,

    /// Idle timeout before closing a connection.
    /// Default: 10 minutes
    pub idle_timeout: Duration,

    /// Whether to run migrations on connect.
    /// Default: true
    pub run_migrations: bool,
}

impl DbConfig {
    /// Creates a new database configuration with the given path.
    ///
    /// ## Arguments
    /// * `path` - Path to the SQLite database file. Will be created if it doesn't exist.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        DbConfig {
            database_path: path.into(),
            max_connections: 5,
            min_connections: 1,
            connect_timeout: Duration::from_secs(30),
            idle_timeout: Duration::from_secs(600),
            run_migrations: true,
        }
    }

    /// Builds a configuration from the process environment.
    ///
    /// ## Variables
    /// - `KITCHENPOS_DATABASE_PATH` - database file (default `kitchenpos.db`)
    /// - `KITCHENPOS_DB_MAX_CONNECTIONS` - pool size (default 5)
    ///
    /// An unparsable pool size is logged and ignored.
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Same as [`DbConfig::from_env`], reading variables through `lookup`.
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let path = lookup(DATABASE_PATH_ENV).unwrap_or_else(|| DEFAULT_DATABASE_PATH.to_string());
        let mut config = DbConfig::new(path);

        if let Some(raw) = lookup(MAX_CONNECTIONS_ENV) {
            match raw.trim().parse::<u32>() {
                Ok(max) if max > 0 => config.max_connections = max,
                _ => warn!(value = %raw, "Ignoring invalid {}", MAX_CONNECTIONS_ENV),
            }
        }

        config
    }

    /// Sets the maximum number of connections.
    pub fn max_connections(mut self, max: u32) -> Self {
        self.max_connections = max;
        self
    }

    /// Sets the minimum number of connections.
    pub fn min_connections(mut self, min: u32) -> Self {
        self.min_connections = min;
        self
    }

    /// Sets the connection timeout.
    pub fn connect_timeout(mut self, timeout: Duration) -> Self {
        self.connect_timeout = timeout;
        self
    }

    /// Sets the idle timeout.
    pub fn idle_timeout(mut self, timeout: Duration) -> Self {
        self.idle_timeout = timeout;
        self
    }

    /// Sets whether to run migrations on connect.
    pub fn run_migrations(mut self, run: bool) -> Self {
        self.run_migrations = run;
        self
    }

    /// Creates an in-memory database configuration (for testing).
    ///
    /// ## Usage
    /// ```rust,ignore
    /// let db = Database::new(DbConfig::in_memory()).await?;
    /// // Database is isolated, perfect for tests
    /// ```
    pub fn in_memory() -> Self {
        DbConfig {
            database_path: PathBuf::from(":memory:"),
            max_connections: 1, // In-memory requires single connection
            min_connections: 1,
            connect_timeout: Duration::from_secs(5),
            idle_timeout: Duration::from_secs(60),
            run_migrations: true,
        }
    }
}

// =============================================================================
// Database
// =============================================================================

/// Main database handle providing repository and service access.
///
/// ## Usage
/// ```rust,ignore
/// let db = Database::new(DbConfig::from_env()).await?;
///
/// let table = db.table_service().create(request).await?;
/// let group = db.table_group_service().create(group_request).await?;
/// ```
#[derive(Debug, Clone)]
pub struct Database {
    /// The SQLite connection pool.
    pool: SqlitePool,

    /// Held for the lifetime of each transaction. SQLite allows one writer
    /// at a time; queueing writers here makes every transaction see the
    /// commits of the ones before it instead of failing with SQLITE_BUSY.
    write_gate: Arc<Mutex<()>>,
}

impl Database {
    /// Creates a new database connection pool.
    ///
    /// ## What This Does
    /// 1. Creates the database file if it doesn't exist
    /// 2. Configures SQLite:
    ///    - WAL mode for concurrent reads
    ///    - NORMAL synchronous (balance of safety/speed)
    ///    - Foreign keys enabled
    /// 3. Creates the connection pool
    /// 4. Runs migrations (if enabled)
    pub async fn new(config: DbConfig) -> DbResult<Self> {
        info!(
            path = %config.database_path.display(),
            "Initializing database connection"
        );

        // sqlite://path creates file if not exists
        let connect_url = format!("sqlite://{}?mode=rwc", config.database_path.display());

        let connect_options = SqliteConnectOptions::from_str(&connect_url)
            .map_err(|e| DbError::ConnectionFailed(e.to_string()))?
            .journal_mode(SqliteJournalMode::Wal)
            .synchronous(SqliteSynchronous::Normal)
            // SQLite has them disabled by default
            .foreign_keys(true)
            .create_if_missing(true);

        debug!("Connection options configured");

        let pool = SqlitePoolOptions::new()
            .max_connections(config.max_connections)
            .min_connections(config.min_connections)
            .acquire_timeout(config.connect_timeout)
            .idle_timeout(Some(config.idle_timeout))
            .connect_with(connect_options)
            .await
            .map_err(|e| DbError::ConnectionFailed(e.to_string()))?;

        info!(
            max_connections = config.max_connections,
            "Database pool created"
        );

        let db = Database {
            pool,
            write_gate: Arc::new(Mutex::new(())),
        };

        if config.run_migrations {
            db.run_migrations().await?;
        }

        Ok(db)
    }

    /// Runs database migrations.
    ///
    /// Automatically called by `new()` if `run_migrations` is true.
    pub async fn run_migrations(&self) -> DbResult<()> {
        info!("Running database migrations");
        migrations::run_migrations(&self.pool).await?;
        info!("Migrations complete");
        Ok(())
    }

    /// Returns a reference to the connection pool.
    pub fn pool(&self) -> &SqlitePool {
        &self.pool
    }

    /// Autocommit session: every statement runs on its own pooled connection.
    pub fn session(&self) -> Session {
        Session::new(DbHandle::Pool(self.pool.clone()))
    }

    /// Runs `work` as one transaction.
    ///
    /// ## Flow
    /// ```text
    /// wait for write gate → BEGIN → work(session)
    ///     Ok  → COMMIT   → Ok(value)
    ///     Err → ROLLBACK → Err(err)
    /// ```
    ///
    /// Everything obtained from the session passed to `work` shares the
    /// transaction. Repositories or services taken from `self` inside `work`
    /// are not part of it, and calling [`Database::transaction`] again from
    /// inside `work` waits forever on the write gate.
    ///
    /// Dropping the returned future before it completes rolls back.
    pub async fn transaction<T, E, F, Fut>(&self, work: F) -> Result<T, E>
    where
        F: FnOnce(Session) -> Fut,
        Fut: Future<Output = Result<T, E>>,
        E: From<DbError>,
    {
        let _writer = self.write_gate.lock().await;

        let tx = self.pool.begin().await.map_err(DbError::from)?;
        let shared = Arc::new(Mutex::new(tx));
        debug!("Transaction started");

        let result = work(Session::new(DbHandle::Transaction(Arc::clone(&shared)))).await;

        let tx = Arc::try_unwrap(shared)
            .map_err(|_| DbError::Internal("transaction session outlived its work".to_string()))?
            .into_inner();

        match result {
            Ok(value) => {
                tx.commit().await.map_err(DbError::from)?;
                debug!("Transaction committed");
                Ok(value)
            }
            Err(err) => {
                if let Err(rollback) = tx.rollback().await {
                    warn!(error = %rollback, "Transaction rollback failed");
                } else {
                    debug!("Transaction rolled back");
                }
                Err(err)
            }
        }
    }

    // -------------------------------------------------------------------------
    // Repositories (autocommit)
    // -------------------------------------------------------------------------

    pub fn products(&self) -> SqliteProductRepository {
        self.session().products()
    }

    pub fn menu_groups(&self) -> SqliteMenuGroupRepository {
        self.session().menu_groups()
    }

    pub fn menus(&self) -> SqliteMenuRepository {
        self.session().menus()
    }

    pub fn menu_products(&self) -> SqliteMenuProductRepository {
        self.session().menu_products()
    }

    pub fn order_tables(&self) -> SqliteOrderTableRepository {
        self.session().order_tables()
    }

    pub fn table_groups(&self) -> SqliteTableGroupRepository {
        self.session().table_groups()
    }

    pub fn orders(&self) -> SqliteOrderRepository {
        self.session().orders()
    }

    pub fn order_line_items(&self) -> SqliteOrderLineItemRepository {
        self.session().order_line_items()
    }

    // -------------------------------------------------------------------------
    // Services (one transaction per write)
    // -------------------------------------------------------------------------

    pub fn order_service(&self) -> DbOrderService {
        DbOrderService::new(self.clone())
    }

    pub fn table_service(&self) -> DbTableService {
        DbTableService::new(self.clone())
    }

    pub fn table_group_service(&self) -> DbTableGroupService {
        DbTableGroupService::new(self.clone())
    }

    pub fn menu_service(&self) -> DbMenuService {
        DbMenuService::new(self.clone())
    }

    pub fn menu_group_service(&self) -> DbMenuGroupService {
        DbMenuGroupService::new(self.clone())
    }

    pub fn product_service(&self) -> DbProductService {
        DbProductService::new(self.clone())
    }

    /// Closes the database connection pool.
    ///
    /// After calling close, all repository operations will fail.
    pub async fn close(&self) {
        info!("Closing database connection pool");
        self.pool.close().await;
    }

    /// Checks if the database is healthy (can execute queries).
    pub async fn health_check(&self) -> bool {
        sqlx::query("SELECT 1").execute(&self.pool).await.is_ok()
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
