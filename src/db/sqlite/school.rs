//! SQLite SchoolRepository implementation.

use sqlx::sqlite::SqliteRow;
use sqlx::{Row, SqlitePool};

use super::helpers::{
    RetryPolicy, WhereClause, build_limit_offset_clause, build_order_clause, retry_write,
};
use crate::db::utils::{current_timestamp, generate_entity_id};
use crate::db::{
    DbError, DbResult, ListResult, RecordQuery, SCHOOL_STATUS_ACTIVE, School, SchoolRepository,
};

const COLUMNS: &str = "id, name, email, phone, address, website, status, created_at";
const SORTABLE: [&str; 4] = ["name", "email", "status", "created_at"];

/// SQLx-backed school repository.
pub struct SqliteSchoolRepository<'a> {
    pub(crate) pool: &'a SqlitePool,
    pub(crate) retry: RetryPolicy,
}

fn row_to_school(row: &SqliteRow) -> DbResult<School> {
    Ok(School {
        id: row.try_get("id")?,
        name: row.try_get("name")?,
        email: row.try_get("email")?,
        phone: row.try_get("phone")?,
        address: row.try_get("address")?,
        website: row.try_get("website")?,
        status: row.try_get("status")?,
        created_at: row.try_get("created_at")?,
    })
}

impl<'a> SchoolRepository for SqliteSchoolRepository<'a> {
    async fn create(&self, school: &School) -> DbResult<School> {
        let id = if school.id.is_empty() {
            generate_entity_id()
        } else {
            school.id.clone()
        };
        let status = if school.status.is_empty() {
            SCHOOL_STATUS_ACTIVE.to_string()
        } else {
            school.status.clone()
        };
        let created_at = current_timestamp();

        retry_write(self.retry, || {
            sqlx::query(
                r#"
                INSERT INTO school (id, name, email, phone, address, website, status, created_at)
                VALUES (?, ?, ?, ?, ?, ?, ?, ?)
                "#,
            )
            .bind(&id)
            .bind(&school.name)
            .bind(&school.email)
            .bind(&school.phone)
            .bind(&school.address)
            .bind(&school.website)
            .bind(&status)
            .bind(&created_at)
            .execute(self.pool)
        })
        .await?;

        Ok(School {
            id,
            status,
            created_at,
            ..school.clone()
        })
    }

    async fn get(&self, id: &str) -> DbResult<School> {
        let row = sqlx::query(&format!("SELECT {COLUMNS} FROM school WHERE id = ?"))
            .bind(id)
            .fetch_optional(self.pool)
            .await?;

        match row {
            Some(row) => row_to_school(&row),
            None => Err(DbError::not_found("School", id)),
        }
    }

    async fn list(&self, query: Option<&RecordQuery>) -> DbResult<ListResult<School>> {
        let default_query = RecordQuery::default();
        let query = query.unwrap_or(&default_query);

        let mut filter = WhereClause::default();
        if let Some(status) = &query.status {
            filter.push_eq("status", status.clone());
        }

        let where_sql = filter.sql();
        let sql = format!(
            "SELECT {COLUMNS} FROM school{where_sql} {}{}",
            build_order_clause(&query.page, &SORTABLE, "created_at"),
            build_limit_offset_clause(&query.page)
        );

        let mut select = sqlx::query(&sql);
        for value in &filter.bind_values {
            select = select.bind(value);
        }
        let rows = select.fetch_all(self.pool).await?;
        let items = rows
            .iter()
            .map(row_to_school)
            .collect::<DbResult<Vec<_>>>()?;

        let count_sql = format!("SELECT COUNT(*) FROM school{where_sql}");
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

    async fn update(&self, school: &School) -> DbResult<School> {
        let result = retry_write(self.retry, || {
            sqlx::query(
                r#"
                UPDATE school
                SET name = ?, email = ?, phone = ?, address = ?, website = ?, status = ?
                WHERE id = ?
                "#,
            )
            .bind(&school.name)
            .bind(&school.email)
            .bind(&school.phone)
            .bind(&school.address)
            .bind(&school.website)
            .bind(&school.status)
            .bind(&school.id)
            .execute(self.pool)
        })
        .await?;

        if result.rows_affected() == 0 {
            return Err(DbError::not_found("School", &school.id));
        }

        self.get(&school.id).await
    }

    async fn delete(&self, id: &str) -> DbResult<()> {
        let result = retry_write(self.retry, || {
            sqlx::query("DELETE FROM school WHERE id = ?")
                .bind(id)
                .execute(self.pool)
        })
        .await?;

        if result.rows_affected() == 0 {
            return Err(DbError::not_found("School", id));
        }

        Ok(())
    }
}
