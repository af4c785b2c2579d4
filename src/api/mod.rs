//! HTTP API server for the site.
//!
//! The router is generic over [`Database`] so tests can drive it with an
//! in-memory SQLite pool.

mod middleware;
pub mod routes;
mod state;
pub mod v1;

#[cfg(test)]
mod mod_test;

use std::net::IpAddr;
use std::path::PathBuf;
use std::time::Duration;

use miette::Diagnostic;
use thiserror::Error;
use tower_http::trace::TraceLayer;
use tracing::{info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use crate::auth::DEFAULT_SESSION_TTL;
use crate::db::utils::current_timestamp;
use crate::db::{Database, DbError, SessionRepository};

pub use middleware::{guard_admin_pages, is_admin, require_admin};
pub use state::{AppState, Settings};

/// How often expired admin sessions are swept from storage.
const SESSION_SWEEP_INTERVAL: Duration = Duration::from_secs(60 * 60);

#[derive(Error, Diagnostic, Debug)]
pub enum ApiError {
    #[error("Server I/O error: {0}")]
    #[diagnostic(code(gyanrich::api::io))]
    Io(#[from] std::io::Error),

    #[error("Database error: {0}")]
    #[diagnostic(code(gyanrich::api::database))]
    Database(#[from] DbError),
}

/// API server configuration
#[derive(Debug, Clone)]
pub struct Config {
    /// Host address to bind to
    pub host: IpAddr,
    /// Port to listen on
    pub port: u16,
    /// Log verbosity (0 = info, 1 = debug, 2+ = trace)
    pub verbosity: u8,
    /// Serve the Scalar OpenAPI UI at /docs
    pub enable_docs: bool,
    /// Directory of static site assets served for non-API paths
    pub public_dir: Option<PathBuf>,
    /// Deepgram access token handed to the voice widget
    pub voice_token: Option<String>,
    /// Salted hash of the admin password (see `gyanrich admin hash-password`)
    pub admin_password_hash: Option<String>,
    /// Mark the session cookie `Secure`
    pub cookie_secure: bool,
    /// Lifetime of an admin session
    pub session_ttl: Duration,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            host: IpAddr::from([0, 0, 0, 0]),
            port: 3000,
            verbosity: 0,
            enable_docs: false,
            public_dir: None,
            voice_token: None,
            admin_password_hash: None,
            cookie_secure: false,
            session_ttl: DEFAULT_SESSION_TTL,
        }
    }
}

impl Config {
    /// Defaults overlaid with the `GYANRICH_*` and `DEEPGRAM_ACCESS_TOKEN`
    /// environment variables.
    pub fn new() -> Self {
        let env = |key: &str| std::env::var(key).ok().filter(|v| !v.trim().is_empty());

        Self {
            public_dir: env("GYANRICH_PUBLIC_DIR").map(PathBuf::from),
            voice_token: env("DEEPGRAM_ACCESS_TOKEN"),
            admin_password_hash: env("GYANRICH_ADMIN_PASSWORD_HASH"),
            cookie_secure: env("GYANRICH_COOKIE_SECURE")
                .map(|v| matches!(v.to_ascii_lowercase().as_str(), "1" | "true" | "yes"))
                .unwrap_or(false),
            ..Self::default()
        }
    }

    pub fn with_public_dir(mut self, dir: PathBuf) -> Self {
        self.public_dir = Some(dir);
        self
    }

    pub fn with_voice_token(mut self, token: impl Into<String>) -> Self {
        self.voice_token = Some(token.into());
        self
    }

    pub fn with_admin_password_hash(mut self, hash: impl Into<String>) -> Self {
        self.admin_password_hash = Some(hash.into());
        self
    }

    pub fn with_cookie_secure(mut self, secure: bool) -> Self {
        self.cookie_secure = secure;
        self
    }

    pub fn with_session_ttl(mut self, ttl: Duration) -> Self {
        self.session_ttl = ttl;
        self
    }
}

/// Default log filter for a verbosity level.
fn default_filter(verbosity: u8) -> &'static str {
    match verbosity {
        0 => "gyanrich=info,tower_http=info",
        1 => "gyanrich=debug,tower_http=debug",
        _ => "gyanrich=trace,tower_http=trace,sqlx=debug",
    }
}

/// Initialize tracing subscriber with env filter
fn init_tracing(verbosity: u8) {
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| default_filter(verbosity).into());

    // A subscriber may already be installed (embedding, repeated runs).
    let _ = tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer())
        .try_init();
}

/// Periodically drop expired admin sessions.
fn spawn_session_sweeper<D: Database>(state: AppState<D>) {
    tokio::spawn(async move {
        let mut ticker = tokio::time::interval(SESSION_SWEEP_INTERVAL);
        loop {
            ticker.tick().await;
            match state.db().sessions().purge_expired(&current_timestamp()).await {
                Ok(0) => {}
                Ok(removed) => info!(removed, "purged expired admin sessions"),
                Err(e) => warn!(error = %e, "failed to purge expired sessions"),
            }
        }
    });
}

/// Run the API server with the given configuration
pub async fn run<D: Database>(config: Config, db: D) -> Result<(), ApiError> {
    init_tracing(config.verbosity);

    if config.admin_password_hash.is_none() {
        warn!("GYANRICH_ADMIN_PASSWORD_HASH is not set; admin login is disabled");
    }
    if config.voice_token.is_none() {
        warn!("DEEPGRAM_ACCESS_TOKEN is not set; the voice agent endpoint will fail");
    }

    let state = AppState::new(db, Settings::from(&config));
    spawn_session_sweeper(state.clone());

    if let Some(dir) = &config.public_dir {
        info!("Serving static assets from {}", dir.display());
    }
    let app = routes::create_router(state, config.enable_docs, config.public_dir.as_deref())
        .layer(TraceLayer::new_for_http());

    let addr = format!("{}:{}", config.host, config.port);
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    info!("API server listening on http://{}", addr);

    axum::serve(listener, app).await?;
    Ok(())
}
