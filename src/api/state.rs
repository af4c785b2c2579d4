//! Application state for the API server.

use std::sync::Arc;
use std::time::Duration;

use super::Config;
use crate::db::Database;

/// Runtime settings handlers need, split out of [`Config`].
#[derive(Debug, Clone, Default)]
pub struct Settings {
    pub admin_password_hash: Option<String>,
    pub voice_token: Option<String>,
    pub cookie_secure: bool,
    pub session_ttl: Duration,
}

impl From<&Config> for Settings {
    fn from(config: &Config) -> Self {
        Self {
            admin_password_hash: config.admin_password_hash.clone(),
            voice_token: config.voice_token.clone(),
            cookie_secure: config.cookie_secure,
            session_ttl: config.session_ttl,
        }
    }
}

/// Shared application state.
///
/// Generic over `D: Database` so any storage backend can be injected.
pub struct AppState<D: Database> {
    db: Arc<D>,
    settings: Arc<Settings>,
}

// Manual Clone impl - only the Arcs are cloned, D need not be Clone
impl<D: Database> Clone for AppState<D> {
    fn clone(&self) -> Self {
        Self {
            db: Arc::clone(&self.db),
            settings: Arc::clone(&self.settings),
        }
    }
}

impl<D: Database> AppState<D> {
    pub fn new(db: D, settings: Settings) -> Self {
        Self {
            db: Arc::new(db),
            settings: Arc::new(settings),
        }
    }

    /// Get a reference to the database.
    pub fn db(&self) -> &D {
        &self.db
    }

    pub fn settings(&self) -> &Settings {
        &self.settings
    }
}
