//! Server command: opens the database and runs the HTTP API.

use std::net::IpAddr;
use std::path::PathBuf;

use miette::{IntoDiagnostic, Result};

use crate::api::{self, Config};
use crate::db::Database;
use crate::db::sqlite::SqliteDatabase;
use crate::paths::get_db_path;

#[derive(Debug, Clone)]
pub struct ServeOptions {
    pub host: IpAddr,
    pub port: u16,
    pub db: Option<PathBuf>,
    pub public_dir: Option<PathBuf>,
    pub cookie_secure: bool,
    pub verbosity: u8,
    pub enable_docs: bool,
}

/// Environment configuration overridden by command-line flags.
pub fn build_config(options: &ServeOptions) -> Config {
    let mut config = Config {
        host: options.host,
        port: options.port,
        verbosity: options.verbosity,
        enable_docs: options.enable_docs,
        ..Config::new()
    };
    if let Some(dir) = &options.public_dir {
        config = config.with_public_dir(dir.clone());
    }
    if options.cookie_secure {
        config = config.with_cookie_secure(true);
    }
    config
}

/// Run the API server
pub async fn run(options: ServeOptions) -> Result<()> {
    let config = build_config(&options);
    let db_path = options.db.clone().unwrap_or_else(get_db_path);

    println!("Opening database at {:?}", db_path);

    // Ensure parent directory exists
    if let Some(parent) = db_path.parent()
        && !parent.as_os_str().is_empty()
    {
        std::fs::create_dir_all(parent).into_diagnostic()?;
    }

    let db = SqliteDatabase::open(&db_path).await?;

    // Run migrations before starting the server
    db.migrate().await?;
    println!("Database migrations complete");

    // Print startup banner BEFORE starting server (before logging is initialized)
    println!();
    println!("🚀 gyanrich server starting...");
    println!("   API:      http://{}:{}/api/v1", config.host, config.port);
    if let Some(dir) = &config.public_dir {
        println!("   Site:     http://{}:{}/ ({})", config.host, config.port, dir.display());
    }
    if config.enable_docs {
        println!("   Docs:     http://{}:{}/docs", config.host, config.port);
    }
    println!();
    println!("   Database: {}", db_path.display());
    println!();

    api::run(config, db).await.into_diagnostic()?;

    Ok(())
}
