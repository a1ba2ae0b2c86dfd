use std::str::FromStr;
use std::time::Duration;

use anyhow::Context as _;
use sqlx::{
    SqlitePool,
    migrate::Migrator,
    sqlite::{SqliteConnectOptions, SqliteJournalMode, SqlitePoolOptions},
};

/// Compile-time discovered SQLx migrations for the `kartoteka-database` crate.
pub static MIGRATOR: Migrator = sqlx::migrate!();

/// Shared database handle passed across crates.
///
/// Opened once at startup and closed explicitly with [`Database::close`].
#[derive(Clone, Debug)]
pub struct Database {
    pool: SqlitePool,
}

impl Database {
    /// Open a pool against `database_url`, creating the file if it is missing.
    ///
    /// `acquire_timeout` bounds both pool checkout and SQLite's busy wait.
    pub async fn connect(
        database_url: &str,
        max_connections: u32,
        acquire_timeout: Duration,
    ) -> anyhow::Result<Self> {
        let options = SqliteConnectOptions::from_str(database_url)
            .with_context(|| format!("invalid sqlite url `{database_url}`"))?
            .create_if_missing(true)
            .journal_mode(SqliteJournalMode::Wal)
            .busy_timeout(acquire_timeout);

        let pool = SqlitePoolOptions::new()
            .max_connections(max_connections.max(1))
            .acquire_timeout(acquire_timeout)
            .connect_with(options)
            .await
            .context("failed to open sqlite pool")?;

        Ok(Self { pool })
    }

    /// Open a private in-memory database with all migrations applied.
    ///
    /// The pool is pinned to a single connection that never expires, otherwise
    /// every new connection would see its own empty database.
    pub async fn connect_in_memory() -> anyhow::Result<Self> {
        let options = SqliteConnectOptions::from_str("sqlite::memory:")?;
        let pool = SqlitePoolOptions::new()
            .max_connections(1)
            .min_connections(1)
            .idle_timeout(None)
            .max_lifetime(None)
            .connect_with(options)
            .await
            .context("failed to open in-memory sqlite pool")?;

        MIGRATOR
            .run(&pool)
            .await
            .context("failed to migrate in-memory database")?;

        Ok(Self { pool })
    }

    /// Expose the underlying pool for query modules.
    pub fn pool(&self) -> &SqlitePool {
        &self.pool
    }

    /// Close every pooled connection. Further queries fail.
    pub async fn close(&self) {
        self.pool.close().await;
    }
}
