//! Spawns a real HTTP server for CLI integration tests.

use tokio::net::TcpListener;

use crate::api::v1::test_support::test_settings;
use crate::api::{AppState, routes};
use crate::cli::api_client::ApiClient;
use crate::db::{Database, SqliteDatabase};

pub use crate::api::v1::test_support::TEST_PASSWORD;

pub fn init_crypto() {
    let _ = rustls::crypto::ring::default_provider().install_default();
}

/// Spawn a test HTTP server with an in-memory database
pub async fn spawn_test_server() -> (String, tokio::task::JoinHandle<()>) {
    init_crypto();
    let db = SqliteDatabase::in_memory()
        .await
        .expect("Failed to create test database");
    db.migrate().await.expect("Failed to run migrations");

    let app = routes::create_router(AppState::new(db, test_settings()), false, None);

    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    let url = format!("http://{}", addr);

    let handle = tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });

    (url, handle)
}

/// A client already logged in as admin
pub async fn admin_client(url: &str) -> ApiClient {
    let mut client = ApiClient::new(Some(url.to_string()));
    client.login(TEST_PASSWORD).await.unwrap();
    client
}
