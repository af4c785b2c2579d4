//! Shared helper functions for SQLite repositories.

use std::future::Future;
use std::time::Duration;

use tracing::warn;

use crate::db::{PageSort, SortOrder};

/// Validate a requested sort field against the entity's allowed columns.
/// Returns None for invalid fields (falls back to default).
pub fn validate_sort_field(field: &str, allowed: &[&'static str]) -> Option<&'static str> {
    allowed.iter().copied().find(|&allowed_field| allowed_field == field)
}

/// Build ORDER BY clause from PageSort parameters.
///
/// Timestamps have second resolution, so `rowid` breaks ties in the same
/// direction to keep insertion order stable.
pub fn build_order_clause(
    page: &PageSort,
    allowed_fields: &[&'static str],
    default_field: &'static str,
) -> String {
    let sort_field = page
        .sort_by
        .as_deref()
        .and_then(|f| validate_sort_field(f, allowed_fields))
        .unwrap_or(default_field);

    let order = match page.sort_order.unwrap_or_default() {
        SortOrder::Asc => "ASC",
        SortOrder::Desc => "DESC",
    };

    format!("ORDER BY {sort_field} {order}, rowid {order}")
}

/// Build LIMIT/OFFSET clause from PageSort parameters.
/// Note: SQL requires LIMIT when using OFFSET. If offset is provided without limit,
/// we use LIMIT -1 (SQLite's "no limit" value).
pub fn build_limit_offset_clause(page: &PageSort) -> String {
    let mut clause = String::new();
    let offset = page.offset.filter(|&o| o > 0);

    if let Some(limit) = page.limit {
        clause.push_str(&format!(" LIMIT {}", limit));
    } else if offset.is_some() {
        clause.push_str(" LIMIT -1");
    }

    if let Some(offset) = offset {
        clause.push_str(&format!(" OFFSET {}", offset));
    }

    clause
}

/// A WHERE clause with its positional bind values.
#[derive(Debug, Default)]
pub struct WhereClause {
    conditions: Vec<String>,
    pub bind_values: Vec<String>,
}

impl WhereClause {
    /// Add a condition with no bind values (e.g. `published = 1`).
    pub fn push(&mut self, condition: impl Into<String>) {
        self.conditions.push(condition.into());
    }

    /// Add a `column = ?` condition bound to `value`.
    pub fn push_eq(&mut self, column: &str, value: impl Into<String>) {
        self.conditions.push(format!("{column} = ?"));
        self.bind_values.push(value.into());
    }

    /// Render as ` WHERE a AND b`, or an empty string.
    pub fn sql(&self) -> String {
        if self.conditions.is_empty() {
            String::new()
        } else {
            format!(" WHERE {}", self.conditions.join(" AND "))
        }
    }
}

// =============================================================================
// Write retry
// =============================================================================

/// Bounded linear backoff for writes: attempt `n` waits `base_delay * n`
/// before attempt `n + 1`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    pub attempts: u32,
    pub base_delay: Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            attempts: 3,
            base_delay: Duration::from_millis(100),
        }
    }
}

impl RetryPolicy {
    /// Delay slept after failed attempt number `attempt` (1-based).
    pub fn delay_for(&self, attempt: u32) -> Duration {
        self.base_delay * attempt
    }
}

/// SQLITE_BUSY and SQLITE_LOCKED, including their extended codes.
const SQLITE_BUSY: i32 = 5;
const SQLITE_LOCKED: i32 = 6;

/// Whether a write failure is worth retrying.
///
/// Only lock contention and pool exhaustion qualify. Constraint violations
/// and malformed SQL fail immediately.
pub fn is_transient(err: &sqlx::Error) -> bool {
    match err {
        sqlx::Error::PoolTimedOut => true,
        sqlx::Error::Database(db_err) => {
            let primary = db_err
                .code()
                .and_then(|code| code.parse::<i32>().ok())
                .map(|code| code & 0xff);
            matches!(primary, Some(SQLITE_BUSY) | Some(SQLITE_LOCKED))
                || db_err.message().contains("database is locked")
        }
        _ => false,
    }
}

/// Run a write, retrying transient failures per `policy`.
///
/// This only covers contention on a single statement. Two writers that
/// read-modify-write the same row can still interleave.
pub async fn retry_write<T, F, Fut>(policy: RetryPolicy, mut op: F) -> Result<T, sqlx::Error>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<T, sqlx::Error>>,
{
    let mut attempt = 1;
    loop {
        match op().await {
            Ok(value) => return Ok(value),
            Err(e) if attempt < policy.attempts && is_transient(&e) => {
                let delay = policy.delay_for(attempt);
                warn!(attempt, ?delay, error = %e, "write failed, retrying");
                tokio::time::sleep(delay).await;
                attempt += 1;
            }
            Err(e) => return Err(e),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicU32, Ordering};

    fn fast_policy(attempts: u32) -> RetryPolicy {
        RetryPolicy {
            attempts,
            base_delay: Duration::from_millis(1),
        }
    }

    #[test]
    fn test_validate_sort_field() {
        let allowed = ["title", "created_at"];
        assert_eq!(validate_sort_field("title", &allowed), Some("title"));
        assert_eq!(validate_sort_field("drop table", &allowed), None);
    }

    #[test]
    fn test_build_order_clause_defaults_to_desc() {
        let page = PageSort::default();
        assert_eq!(
            build_order_clause(&page, &["title"], "created_at"),
            "ORDER BY created_at DESC, rowid DESC"
        );
    }

    #[test]
    fn test_build_order_clause_ignores_unknown_fields() {
        let page = PageSort {
            sort_by: Some("password".to_string()),
            sort_order: Some(SortOrder::Asc),
            ..Default::default()
        };
        assert_eq!(
            build_order_clause(&page, &["title"], "created_at"),
            "ORDER BY created_at ASC, rowid ASC"
        );
    }

    #[test]
    fn test_build_limit_offset_clause() {
        let page = PageSort {
            limit: Some(10),
            offset: Some(20),
            ..Default::default()
        };
        assert_eq!(build_limit_offset_clause(&page), " LIMIT 10 OFFSET 20");

        let offset_only = PageSort {
            offset: Some(5),
            ..Default::default()
        };
        assert_eq!(build_limit_offset_clause(&offset_only), " LIMIT -1 OFFSET 5");

        assert_eq!(build_limit_offset_clause(&PageSort::default()), "");
    }

    #[test]
    fn test_where_clause() {
        let mut clause = WhereClause::default();
        assert_eq!(clause.sql(), "");

        clause.push("published = 1");
        clause.push_eq("category", "Career");
        assert_eq!(clause.sql(), " WHERE published = 1 AND category = ?");
        assert_eq!(clause.bind_values, vec!["Career".to_string()]);
    }

    #[test]
    fn test_linear_backoff_delays() {
        let policy = RetryPolicy::default();
        assert_eq!(policy.delay_for(1), Duration::from_millis(100));
        assert_eq!(policy.delay_for(2), Duration::from_millis(200));
    }

    #[tokio::test]
    async fn test_retry_write_recovers_from_transient_failures() {
        let calls = AtomicU32::new(0);
        let result = retry_write(fast_policy(3), || {
            let n = calls.fetch_add(1, Ordering::SeqCst);
            async move {
                if n < 2 {
                    Err(sqlx::Error::PoolTimedOut)
                } else {
                    Ok(n)
                }
            }
        })
        .await;

        assert_eq!(result.unwrap(), 2);
        assert_eq!(calls.load(Ordering::SeqCst), 3);
    }

    #[tokio::test]
    async fn test_retry_write_gives_up_after_attempts() {
        let calls = AtomicU32::new(0);
        let result: Result<(), _> = retry_write(fast_policy(3), || {
            calls.fetch_add(1, Ordering::SeqCst);
            async { Err(sqlx::Error::PoolTimedOut) }
        })
        .await;

        assert!(result.is_err());
        assert_eq!(calls.load(Ordering::SeqCst), 3);
    }

    #[tokio::test]
    async fn test_retry_write_does_not_retry_permanent_errors() {
        let calls = AtomicU32::new(0);
        let result: Result<(), _> = retry_write(fast_policy(5), || {
            calls.fetch_add(1, Ordering::SeqCst);
            async { Err(sqlx::Error::RowNotFound) }
        })
        .await;

        assert!(result.is_err());
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }
}
