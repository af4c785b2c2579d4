//! Tests for SqliteSessionRepository.

use crate::db::{AdminSession, Database, SessionRepository, SqliteDatabase};

async fn setup_db() -> SqliteDatabase {
    let db = SqliteDatabase::in_memory()
        .await
        .expect("Failed to create in-memory database");
    db.migrate().await.expect("Migration should succeed");
    db
}

fn session(digest: &str, expires_at: &str) -> AdminSession {
    AdminSession {
        token_digest: digest.to_string(),
        created_at: "2026-01-01 00:00:00".to_string(),
        expires_at: expires_at.to_string(),
    }
}

#[tokio::test(flavor = "multi_thread")]
async fn session_is_valid_until_expiry() {
    let db = setup_db().await;
    let sessions = db.sessions();

    sessions
        .create(&session("digest-a", "2026-01-08 00:00:00"))
        .await
        .unwrap();

    let before = sessions
        .find_valid("digest-a", "2026-01-07 23:59:59")
        .await
        .unwrap();
    assert!(before.is_some());

    let after = sessions
        .find_valid("digest-a", "2026-01-08 00:00:00")
        .await
        .unwrap();
    assert!(after.is_none());
}

#[tokio::test(flavor = "multi_thread")]
async fn session_delete_revokes() {
    let db = setup_db().await;
    let sessions = db.sessions();

    sessions
        .create(&session("digest-b", "2099-01-01 00:00:00"))
        .await
        .unwrap();
    sessions.delete("digest-b").await.unwrap();
    // Deleting twice is fine
    sessions.delete("digest-b").await.unwrap();

    let found = sessions
        .find_valid("digest-b", "2026-01-01 00:00:00")
        .await
        .unwrap();
    assert!(found.is_none());
}

#[tokio::test(flavor = "multi_thread")]
async fn session_purge_expired_keeps_live_sessions() {
    let db = setup_db().await;
    let sessions = db.sessions();

    sessions
        .create(&session("old", "2026-01-02 00:00:00"))
        .await
        .unwrap();
    sessions
        .create(&session("live", "2026-02-01 00:00:00"))
        .await
        .unwrap();

    let removed = sessions.purge_expired("2026-01-15 00:00:00").await.unwrap();
    assert_eq!(removed, 1);

    let live = sessions
        .find_valid("live", "2026-01-15 00:00:00")
        .await
        .unwrap();
    assert!(live.is_some());
}
