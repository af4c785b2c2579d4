//! SQLite LeadRepository implementation.

use sqlx::sqlite::SqliteRow;
use sqlx::{Row, SqlitePool};

use super::helpers::{
    RetryPolicy, WhereClause, build_limit_offset_clause, build_order_clause, retry_write,
};
use crate::db::utils::{current_timestamp, generate_entity_id};
use crate::db::{
    DbError, DbResult, LEAD_STATUS_NEW, Lead, LeadRepository, ListResult, RecordQuery,
};

const COLUMNS: &str = "id, name, email, phone, school_name, message, status, created_at";
const SORTABLE: [&str; 4] = ["name", "email", "status", "created_at"];

/// SQLx-backed lead repository.
pub struct SqliteLeadRepository<'a> {
    pub(crate) pool: &'a SqlitePool,
    pub(crate) retry: RetryPolicy,
}

fn row_to_lead(row: &SqliteRow) -> DbResult<Lead> {
    Ok(Lead {
        id: row.try_get("id")?,
        name: row.try_get("name")?,
        email: row.try_get("email")?,
        phone: row.try_get("phone")?,
        school_name: row.try_get("school_name")?,
        message: row.try_get("message")?,
        status: row.try_get("status")?,
        created_at: row.try_get("created_at")?,
    })
}

impl<'a> LeadRepository for SqliteLeadRepository<'a> {
    async fn create(&self, lead: &Lead) -> DbResult<Lead> {
        let id = if lead.id.is_empty() {
            generate_entity_id()
        } else {
            lead.id.clone()
        };
        let status = if lead.status.is_empty() {
            LEAD_STATUS_NEW.to_string()
        } else {
            lead.status.clone()
        };
        let created_at = current_timestamp();

        retry_write(self.retry, || {
            sqlx::query(
                r#"
                INSERT INTO lead (id, name, email, phone, school_name, message, status, created_at)
                VALUES (?, ?, ?, ?, ?, ?, ?, ?)
                "#,
            )
            .bind(&id)
            .bind(&lead.name)
            .bind(&lead.email)
            .bind(&lead.phone)
            .bind(&lead.school_name)
            .bind(&lead.message)
            .bind(&status)
            .bind(&created_at)
            .execute(self.pool)
        })
        .await?;

        Ok(Lead {
            id,
            status,
            created_at,
            ..lead.clone()
        })
    }

    async fn get(&self, id: &str) -> DbResult<Lead> {
        let row = sqlx::query(&format!("SELECT {COLUMNS} FROM lead WHERE id = ?"))
            .bind(id)
            .fetch_optional(self.pool)
            .await?;

        match row {
            Some(row) => row_to_lead(&row),
            None => Err(DbError::not_found("Lead", id)),
        }
    }

    async fn list(&self, query: Option<&RecordQuery>) -> DbResult<ListResult<Lead>> {
        let default_query = RecordQuery::default();
        let query = query.unwrap_or(&default_query);

        let mut filter = WhereClause::default();
        if let Some(status) = &query.status {
            filter.push_eq("status", status.clone());
        }

        let where_sql = filter.sql();
        let sql = format!(
            "SELECT {COLUMNS} FROM lead{where_sql} {}{}",
            build_order_clause(&query.page, &SORTABLE, "created_at"),
            build_limit_offset_clause(&query.page)
        );

        let mut select = sqlx::query(&sql);
        for value in &filter.bind_values {
            select = select.bind(value);
        }
        let rows = select.fetch_all(self.pool).await?;
        let items = rows.iter().map(row_to_lead).collect::<DbResult<Vec<_>>>()?;

        let count_sql = format!("SELECT COUNT(*) FROM lead{where_sql}");
        let mut count = sqlx::query_scalar::<_, i64>(&count_sql);
        for value in &filter.bind_values {
            count = count.bind(value);
        }
        let total = count.fetch_one(self.pool).await?;

        Ok(ListResult {
            items,
            total: total as usize,
            limit: query.page.limit,
            offset: query.page.offset.unwrap_or(0),
        })
    }

    async fn update(&self, lead: &Lead) -> DbResult<Lead> {
        let result = retry_write(self.retry, || {
            sqlx::query(
                r#"
                UPDATE lead
                SET name = ?, email = ?, phone = ?, school_name = ?, message = ?, status = ?
                WHERE id = ?
                "#,
            )
            .bind(&lead.name)
            .bind(&lead.email)
            .bind(&lead.phone)
            .bind(&lead.school_name)
            .bind(&lead.message)
            .bind(&lead.status)
            .bind(&lead.id)
            .execute(self.pool)
        })
        .await?;

        if result.rows_affected() == 0 {
            return Err(DbError::not_found("Lead", &lead.id));
        }

        self.get(&lead.id).await
    }

    async fn delete(&self, id: &str) -> DbResult<()> {
        let result = retry_write(self.retry, || {
            sqlx::query("DELETE FROM lead WHERE id = ?")
                .bind(id)
                .execute(self.pool)
        })
        .await?;

        if result.rows_affected() == 0 {
            return Err(DbError::not_found("Lead", id));
        }

        Ok(())
    }
}
