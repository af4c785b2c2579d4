//! Tests for SQLite database connection and migrations.

use crate::db::{Database, SqliteDatabase};

#[tokio::test(flavor = "multi_thread")]
async fn migrate_creates_all_tables() {
    let db = SqliteDatabase::in_memory()
        .await
        .expect("Failed to create in-memory database");

    db.migrate().await.expect("Migration should succeed");

    let tables: Vec<String> =
        sqlx::query_scalar("SELECT name FROM sqlite_master WHERE type='table' ORDER BY name")
            .fetch_all(db.pool())
            .await
            .expect("Query should succeed");

    let expected = [
        "_sqlx_migrations",
        "admin_session",
        "blog_post",
        "image",
        "lead",
        "school",
    ];

    for table in &expected {
        assert!(
            tables.iter().any(|t| t == table),
            "Missing table: {}. Found tables: {:?}",
            table,
            tables
        );
    }
}

#[tokio::test(flavor = "multi_thread")]
async fn migrate_is_idempotent() {
    let db = SqliteDatabase::in_memory()
        .await
        .expect("Failed to create in-memory database");

    db.migrate().await.expect("First migration should succeed");
    db.migrate().await.expect("Second migration should succeed");
}

#[tokio::test(flavor = "multi_thread")]
async fn open_creates_database_file() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("site.db");

    let db = SqliteDatabase::open(&path)
        .await
        .expect("Open should create the file");
    db.migrate().await.expect("Migration should succeed");

    assert!(path.exists());
}

#[tokio::test(flavor = "multi_thread")]
async fn file_database_persists_across_reopen() {
    use crate::db::{BlogPostRepository, LeadRepository};
    use crate::db::{Lead, LEAD_STATUS_NEW};

    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("site.db");

    let lead_id = {
        let db = SqliteDatabase::open(&path).await.unwrap();
        db.migrate().await.unwrap();
        let created = db
            .leads()
            .create(&Lead {
                id: String::new(),
                name: "Asha".to_string(),
                email: "asha@example.com".to_string(),
                phone: "98765".to_string(),
                school_name: String::new(),
                message: String::new(),
                status: String::new(),
                created_at: String::new(),
            })
            .await
            .unwrap();
        db.pool().close().await;
        created.id
    };

    let db = SqliteDatabase::open(&path).await.unwrap();
    db.migrate().await.unwrap();
    let lead = db.leads().get(&lead_id).await.unwrap();
    assert_eq!(lead.status, LEAD_STATUS_NEW);
    assert_eq!(db.blog_posts().list(None).await.unwrap().total, 0);
}
