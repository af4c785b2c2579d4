//! SQLite BlogPostRepository implementation.

use sqlx::sqlite::SqliteRow;
use sqlx::{Row, SqlitePool};

use super::helpers::{
    RetryPolicy, WhereClause, build_limit_offset_clause, build_order_clause, retry_write,
};
use crate::db::utils::{current_timestamp, generate_entity_id};
use crate::db::{BlogPost, BlogPostQuery, BlogPostRepository, DbError, DbResult, ListResult};

const COLUMNS: &str =
    "id, title, excerpt, content, author, category, published, image, created_at, updated_at";
const SORTABLE: [&str; 4] = ["title", "category", "created_at", "updated_at"];

/// SQLx-backed blog post repository.
pub struct SqliteBlogPostRepository<'a> {
    pub(crate) pool: &'a SqlitePool,
    pub(crate) retry: RetryPolicy,
}

fn row_to_post(row: &SqliteRow) -> DbResult<BlogPost> {
    let category: String = row.try_get("category")?;
    let published: i64 = row.try_get("published")?;

    Ok(BlogPost {
        id: row.try_get("id")?,
        title: row.try_get("title")?,
        excerpt: row.try_get("excerpt")?,
        content: row.try_get("content")?,
        author: row.try_get("author")?,
        category: category.parse().unwrap_or_default(),
        published: published != 0,
        image: row.try_get("image")?,
        created_at: row.try_get("created_at")?,
        updated_at: row.try_get("updated_at")?,
    })
}

impl<'a> BlogPostRepository for SqliteBlogPostRepository<'a> {
    async fn create(&self, post: &BlogPost) -> DbResult<BlogPost> {
        // Use provided ID if not empty, otherwise generate one
        let id = if post.id.is_empty() {
            generate_entity_id()
        } else {
            post.id.clone()
        };

        // Always generate current timestamps - never use input timestamps
        let created_at = current_timestamp();
        let category = post.category.to_string();

        retry_write(self.retry, || {
            sqlx::query(
                r#"
                INSERT INTO blog_post
                    (id, title, excerpt, content, author, category, published, image, created_at, updated_at)
                VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?)
                "#,
            )
            .bind(&id)
            .bind(&post.title)
            .bind(&post.excerpt)
            .bind(&post.content)
            .bind(&post.author)
            .bind(&category)
            .bind(post.published)
            .bind(&post.image)
            .bind(&created_at)
            .bind(&created_at)
            .execute(self.pool)
        })
        .await?;

        Ok(BlogPost {
            id,
            updated_at: created_at.clone(),
            created_at,
            ..post.clone()
        })
    }

    async fn get(&self, id: &str) -> DbResult<BlogPost> {
        let row = sqlx::query(&format!("SELECT {COLUMNS} FROM blog_post WHERE id = ?"))
            .bind(id)
            .fetch_optional(self.pool)
            .await?;

        match row {
            Some(row) => row_to_post(&row),
            None => Err(DbError::not_found("BlogPost", id)),
        }
    }

    async fn list(&self, query: Option<&BlogPostQuery>) -> DbResult<ListResult<BlogPost>> {
        let default_query = BlogPostQuery::default();
        let query = query.unwrap_or(&default_query);

        let mut filter = WhereClause::default();
        match query.published {
            Some(true) => filter.push("published = 1"),
            Some(false) => filter.push("published = 0"),
            None => {}
        }
        if let Some(category) = query.category {
            filter.push_eq("category", category.to_string());
        }

        let order_clause = build_order_clause(&query.page, &SORTABLE, "created_at");
        let limit_clause = build_limit_offset_clause(&query.page);
        let where_sql = filter.sql();

        let sql = format!("SELECT {COLUMNS} FROM blog_post{where_sql} {order_clause}{limit_clause}");
        let mut select = sqlx::query(&sql);
        for value in &filter.bind_values {
            select = select.bind(value);
        }
        let rows = select.fetch_all(self.pool).await?;
        let items = rows.iter().map(row_to_post).collect::<DbResult<Vec<_>>>()?;

        let count_sql = format!("SELECT COUNT(*) FROM blog_post{where_sql}");
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

    async fn update(&self, post: &BlogPost) -> DbResult<BlogPost> {
        let updated_at = current_timestamp();
        let category = post.category.to_string();

        let result = retry_write(self.retry, || {
            sqlx::query(
                r#"
                UPDATE blog_post
                SET title = ?, excerpt = ?, content = ?, author = ?, category = ?,
                    published = ?, image = ?, updated_at = ?
                WHERE id = ?
                "#,
            )
            .bind(&post.title)
            .bind(&post.excerpt)
            .bind(&post.content)
            .bind(&post.author)
            .bind(&category)
            .bind(post.published)
            .bind(&post.image)
            .bind(&updated_at)
            .bind(&post.id)
            .execute(self.pool)
        })
        .await?;

        if result.rows_affected() == 0 {
            return Err(DbError::not_found("BlogPost", &post.id));
        }

        self.get(&post.id).await
    }

    async fn delete(&self, id: &str) -> DbResult<()> {
        let result = retry_write(self.retry, || {
            sqlx::query("DELETE FROM blog_post WHERE id = ?")
                .bind(id)
                .execute(self.pool)
        })
        .await?;

        if result.rows_affected() == 0 {
            return Err(DbError::not_found("BlogPost", id));
        }

        Ok(())
    }
}
