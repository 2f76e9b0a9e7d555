//! # Database Handle
//!
//! Opens the SQLite file, applies the embedded schema and hands out
//! repositories that share one connection pool.
//!
//! ```text
//!   DbConfig::new("./pharmacy.db")          DbConfig::in_memory()
//!          │                                        │
//!          └───────────────┬────────────────────────┘
//!                          ▼
//!                Database::new(config)
//!                 ├── SqliteConnectOptions (WAL, foreign_keys, busy_timeout)
//!                 ├── SqlitePool
//!                 └── migrations::run_migrations
//!                          │
//!     ┌──────────────┬─────┴────────┬───────────────┐
//!     ▼              ▼              ▼               ▼
//! medicines()     sales()      suppliers()      billing()
//! ```
//!
//! Foreign keys must be switched on per connection in SQLite; without them
//! deleting a medicine would leave its sales behind.

use sqlx::sqlite::{SqliteConnectOptions, SqliteJournalMode, SqlitePoolOptions, SqliteSynchronous};
use sqlx::SqlitePool;
use std::path::{Path, PathBuf};
use std::time::Duration;
use tracing::{debug, info};

use crate::error::{DbError, DbResult};
use crate::migrations;
use crate::repository::billing::BillingRepository;
use crate::repository::medicine::MedicineRepository;
use crate::repository::sale::SaleRepository;
use crate::repository::supplier::SupplierRepository;

const MEMORY_PATH: &str = ":memory:";

// =============================================================================
// Configuration
// =============================================================================

/// Where the inventory lives and how many connections may touch it.
///
/// ```rust,ignore
/// let config = DbConfig::new("/var/lib/pharmacy/pharmacy.db").max_connections(8);
/// ```
#[derive(Debug, Clone)]
pub struct DbConfig {
    /// SQLite file, created on first use. `:memory:` for a throwaway database.
    pub path: PathBuf,

    /// Pool size. Default: 5
    pub max_connections: u32,

    /// How long a request may wait for a pooled connection.
    pub acquire_timeout: Duration,

    /// How long SQLite retries a locked database before giving up.
    /// Concurrent invoices queue on the write lock for at most this long.
    pub busy_timeout: Duration,

    /// Apply pending migrations while opening. Default: true
    pub run_migrations: bool,
}

impl DbConfig {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        DbConfig {
            path: path.into(),
            max_connections: 5,
            acquire_timeout: Duration::from_secs(30),
            busy_timeout: Duration::from_secs(5),
            run_migrations: true,
        }
    }

    /// A private database that vanishes with the pool.
    ///
    /// Every SQLite connection to `:memory:` sees its own empty database, so
    /// the pool is pinned to a single connection that is never recycled.
    pub fn in_memory() -> Self {
        DbConfig {
            max_connections: 1,
            acquire_timeout: Duration::from_secs(5),
            ..DbConfig::new(MEMORY_PATH)
        }
    }

    pub fn max_connections(mut self, max: u32) -> Self {
        self.max_connections = max.max(1);
        self
    }

    pub fn busy_timeout(mut self, timeout: Duration) -> Self {
        self.busy_timeout = timeout;
        self
    }

    pub fn run_migrations(mut self, run: bool) -> Self {
        self.run_migrations = run;
        self
    }

    pub fn is_in_memory(&self) -> bool {
        self.path == Path::new(MEMORY_PATH)
    }

    fn connect_options(&self) -> SqliteConnectOptions {
        let options = if self.is_in_memory() {
            SqliteConnectOptions::new().in_memory(true)
        } else {
            SqliteConnectOptions::new()
                .filename(&self.path)
                .create_if_missing(true)
                .journal_mode(SqliteJournalMode::Wal)
        };

        options
            .synchronous(SqliteSynchronous::Normal)
            .foreign_keys(true)
            .busy_timeout(self.busy_timeout)
    }
}

// =============================================================================
// Database
// =============================================================================

/// Shared handle to the inventory database.
///
/// Cheap to clone; the web app keeps one in its state and each handler asks
/// it for the repository it needs:
///
/// ```rust,ignore
/// let medicine = state.db.medicines().get(id).await?;
/// let invoice = state.db.billing().generate_invoice(&cart).await?;
/// ```
#[derive(Debug, Clone)]
pub struct Database {
    pool: SqlitePool,
}

impl Database {
    /// Opens (creating if needed) the database and brings its schema up to date.
    pub async fn new(config: DbConfig) -> DbResult<Self> {
        info!(
            path = %config.path.display(),
            max_connections = config.max_connections,
            "Opening database"
        );

        let mut pool_options = SqlitePoolOptions::new()
            .max_connections(config.max_connections)
            .acquire_timeout(config.acquire_timeout);

        if config.is_in_memory() {
            // Dropping the only connection would drop the data with it
            pool_options = pool_options
                .min_connections(1)
                .idle_timeout(None)
                .max_lifetime(None);
        }

        let pool = pool_options
            .connect_with(config.connect_options())
            .await
            .map_err(|e| DbError::ConnectionFailed(e.to_string()))?;

        debug!("Connection pool ready");

        let db = Database { pool };
        if config.run_migrations {
            db.run_migrations().await?;
        }
        Ok(db)
    }

    /// Applies any embedded migration not yet recorded in `_sqlx_migrations`.
    pub async fn run_migrations(&self) -> DbResult<()> {
        migrations::run_migrations(&self.pool).await
    }

    /// Raw pool access for ad hoc queries (tests, diagnostics).
    pub fn pool(&self) -> &SqlitePool {
        &self.pool
    }

    pub fn medicines(&self) -> MedicineRepository {
        MedicineRepository::new(self.pool.clone())
    }

    pub fn sales(&self) -> SaleRepository {
        SaleRepository::new(self.pool.clone())
    }

    pub fn suppliers(&self) -> SupplierRepository {
        SupplierRepository::new(self.pool.clone())
    }

    /// Invoice generation, one transaction per cart.
    pub fn billing(&self) -> BillingRepository {
        BillingRepository::new(self.pool.clone())
    }

    /// Waits for checked-out connections to return, then closes the pool.
    pub async fn close(&self) {
        info!("Closing database");
        self.pool.close().await;
    }

    /// `true` if a trivial query round-trips.
    pub async fn health_check(&self) -> bool {
        sqlx::query_scalar::<_, i64>("SELECT 1")
            .fetch_one(&self.pool)
            .await
            .is_ok()
    }
}
