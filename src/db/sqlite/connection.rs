//! SQLite database connection and migration management.

use std::path::Path;
use std::str::FromStr;
use std::time::Duration;

use sqlx::SqlitePool;
use sqlx::migrate::Migrator;
use sqlx::sqlite::{SqliteConnectOptions, SqliteJournalMode, SqlitePoolOptions};

use super::helpers::RetryPolicy;
use super::{
    SqliteBlogPostRepository, SqliteImageRepository, SqliteLeadRepository,
    SqliteSchoolRepository, SqliteSessionRepository,
};
use crate::db::{Database, DbError, DbResult};

// Embed migrations from data/sql/sqlite/ at compile time
static MIGRATOR: Migrator = sqlx::migrate!("data/sql/sqlite");

/// SQLite database implementation backed by an sqlx connection pool.
pub struct SqliteDatabase {
    pool: SqlitePool,
    retry: RetryPolicy,
}

impl SqliteDatabase {
    /// Open (or create) a database file at the given path.
    pub async fn open<P: AsRef<Path>>(path: P) -> DbResult<Self> {
        let options = SqliteConnectOptions::new()
            .filename(path.as_ref())
            .create_if_missing(true)
            .journal_mode(SqliteJournalMode::Wal)
            .busy_timeout(Duration::from_secs(5));

        let pool = SqlitePoolOptions::new()
            .max_connections(5)
            .connect_with(options)
            .await
            .map_err(|e| DbError::Connection {
                message: e.to_string(),
            })?;

        Ok(Self {
            pool,
            retry: RetryPolicy::default(),
        })
    }

    /// Create an in-memory database (useful for testing).
    ///
    /// Every SQLite connection gets its own private in-memory database, so
    /// the pool is pinned to exactly one connection that never expires.
    pub async fn in_memory() -> DbResult<Self> {
        let options =
            SqliteConnectOptions::from_str("sqlite::memory:").map_err(|e| DbError::Connection {
                message: e.to_string(),
            })?;

        let pool = SqlitePoolOptions::new()
            .max_connections(1)
            .min_connections(1)
            .idle_timeout(None)
            .max_lifetime(None)
            .connect_with(options)
            .await
            .map_err(|e| DbError::Connection {
                message: e.to_string(),
            })?;

        Ok(Self {
            pool,
            retry: RetryPolicy::default(),
        })
    }

    /// Override the write retry policy.
    pub fn with_retry_policy(mut self, retry: RetryPolicy) -> Self {
        self.retry = retry;
        self
    }

    /// Access the underlying pool (tests and maintenance tasks).
    pub fn pool(&self) -> &SqlitePool {
        &self.pool
    }
}

impl Database for SqliteDatabase {
    type BlogPosts<'a> = SqliteBlogPostRepository<'a>;
    type Leads<'a> = SqliteLeadRepository<'a>;
    type Schools<'a> = SqliteSchoolRepository<'a>;
    type Images<'a> = SqliteImageRepository<'a>;
    type Sessions<'a> = SqliteSessionRepository<'a>;

    async fn migrate(&self) -> DbResult<()> {
        MIGRATOR
            .run(&self.pool)
            .await
            .map_err(|e| DbError::Migration {
                message: e.to_string(),
            })
    }

    fn blog_posts(&self) -> Self::BlogPosts<'_> {
        SqliteBlogPostRepository {
            pool: &self.pool,
            retry: self.retry,
        }
    }

    fn leads(&self) -> Self::Leads<'_> {
        SqliteLeadRepository {
            pool: &self.pool,
            retry: self.retry,
        }
    }

    fn schools(&self) -> Self::Schools<'_> {
        SqliteSchoolRepository {
            pool: &self.pool,
            retry: self.retry,
        }
    }

    fn images(&self) -> Self::Images<'_> {
        SqliteImageRepository {
            pool: &self.pool,
            retry: self.retry,
        }
    }

    fn sessions(&self) -> Self::Sessions<'_> {
        SqliteSessionRepository {
            pool: &self.pool,
            retry: self.retry,
        }
    }
}
