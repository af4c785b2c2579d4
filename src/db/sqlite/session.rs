//! SQLite SessionRepository implementation.

use sqlx::{Row, SqlitePool};

use super::helpers::{RetryPolicy, retry_write};
use crate::db::{AdminSession, DbResult, SessionRepository};

/// SQLx-backed admin session store.
pub struct SqliteSessionRepository<'a> {
    pub(crate) pool: &'a SqlitePool,
    pub(crate) retry: RetryPolicy,
}

impl<'a> SessionRepository for SqliteSessionRepository<'a> {
    async fn create(&self, session: &AdminSession) -> DbResult<()> {
        retry_write(self.retry, || {
            sqlx::query(
                "INSERT INTO admin_session (token_digest, created_at, expires_at) VALUES (?, ?, ?)",
            )
            .bind(&session.token_digest)
            .bind(&session.created_at)
            .bind(&session.expires_at)
            .execute(self.pool)
        })
        .await?;
        Ok(())
    }

    async fn find_valid(&self, token_digest: &str, now: &str) -> DbResult<Option<AdminSession>> {
        let row = sqlx::query(
            "SELECT token_digest, created_at, expires_at FROM admin_session
             WHERE token_digest = ? AND expires_at > ?",
        )
        .bind(token_digest)
        .bind(now)
        .fetch_optional(self.pool)
        .await?;

        row.map(|row| -> DbResult<AdminSession> {
            Ok(AdminSession {
                token_digest: row.try_get("token_digest")?,
                created_at: row.try_get("created_at")?,
                expires_at: row.try_get("expires_at")?,
            })
        })
        .transpose()
    }

    async fn delete(&self, token_digest: &str) -> DbResult<()> {
        retry_write(self.retry, || {
            sqlx::query("DELETE FROM admin_session WHERE token_digest = ?")
                .bind(token_digest)
                .execute(self.pool)
        })
        .await?;
        Ok(())
    }

    async fn purge_expired(&self, now: &str) -> DbResult<u64> {
        let result = retry_write(self.retry, || {
            sqlx::query("DELETE FROM admin_session WHERE expires_at <= ?")
                .bind(now)
                .execute(self.pool)
        })
        .await?;
        Ok(result.rows_affected())
    }
}
