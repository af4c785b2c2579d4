//! Tests for SqliteImageRepository.

use crate::db::{Database, DbError, Image, ImageRepository, SqliteDatabase};

async fn setup_db() -> SqliteDatabase {
    let db = SqliteDatabase::in_memory()
        .await
        .expect("Failed to create in-memory database");
    db.migrate().await.expect("Migration should succeed");
    db
}

fn make_image(file_name: &str, data: Vec<u8>) -> Image {
    Image {
        file_name: file_name.to_string(),
        mime_type: "image/png".to_string(),
        size: data.len(),
        data,
        created_at: String::new(),
    }
}

#[tokio::test(flavor = "multi_thread")]
async fn image_store_and_get_is_byte_identical() {
    let db = setup_db().await;
    let bytes: Vec<u8> = (0..=255).collect();

    db.images()
        .store(&make_image("1700000000000-abc123-logo.png", bytes.clone()))
        .await
        .unwrap();

    let image = db
        .images()
        .get("1700000000000-abc123-logo.png")
        .await
        .unwrap();
    assert_eq!(image.data, bytes);
    assert_eq!(image.size, 256);
    assert_eq!(image.mime_type, "image/png");
    assert!(!image.created_at.is_empty());
}

#[tokio::test(flavor = "multi_thread")]
async fn image_duplicate_file_name_is_rejected() {
    let db = setup_db().await;

    db.images()
        .store(&make_image("dup.png", vec![1, 2, 3]))
        .await
        .unwrap();
    let second = db.images().store(&make_image("dup.png", vec![4])).await;

    assert!(matches!(second, Err(DbError::AlreadyExists { .. })));
}

#[tokio::test(flavor = "multi_thread")]
async fn image_get_missing_returns_not_found() {
    let db = setup_db().await;

    assert!(matches!(
        db.images().get("missing.png").await,
        Err(DbError::NotFound { .. })
    ));
}
