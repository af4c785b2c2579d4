//! SQLite ImageRepository implementation.

use sqlx::{Row, SqlitePool};

use super::helpers::{RetryPolicy, retry_write};
use crate::db::utils::current_timestamp;
use crate::db::{DbError, DbResult, Image, ImageRepository};

/// SQLx-backed image blob store.
pub struct SqliteImageRepository<'a> {
    pub(crate) pool: &'a SqlitePool,
    pub(crate) retry: RetryPolicy,
}

impl<'a> ImageRepository for SqliteImageRepository<'a> {
    async fn store(&self, image: &Image) -> DbResult<()> {
        let created_at = if image.created_at.is_empty() {
            current_timestamp()
        } else {
            image.created_at.clone()
        };

        retry_write(self.retry, || {
            sqlx::query(
                "INSERT INTO image (file_name, mime_type, size, data, created_at) VALUES (?, ?, ?, ?, ?)",
            )
            .bind(&image.file_name)
            .bind(&image.mime_type)
            .bind(image.data.len() as i64)
            .bind(&image.data)
            .bind(&created_at)
            .execute(self.pool)
        })
        .await
        .map_err(|e| match e {
            sqlx::Error::Database(ref db_err) if db_err.is_unique_violation() => {
                DbError::AlreadyExists {
                    entity_type: "Image".to_string(),
                    id: image.file_name.clone(),
                }
            }
            other => other.into(),
        })?;

        Ok(())
    }

    async fn get(&self, file_name: &str) -> DbResult<Image> {
        let row = sqlx::query(
            "SELECT file_name, mime_type, size, data, created_at FROM image WHERE file_name = ?",
        )
        .bind(file_name)
        .fetch_optional(self.pool)
        .await?
        .ok_or_else(|| DbError::not_found("Image", file_name))?;

        let size: i64 = row.try_get("size")?;
        Ok(Image {
            file_name: row.try_get("file_name")?,
            mime_type: row.try_get("mime_type")?,
            size: size as usize,
            data: row.try_get("data")?,
            created_at: row.try_get("created_at")?,
        })
    }
}
