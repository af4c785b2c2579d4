use super::{Config, default_filter};
use serial_test::serial;
use std::env;
use std::path::PathBuf;
use std::time::Duration;

const VARS: [&str; 4] = [
    "GYANRICH_PUBLIC_DIR",
    "DEEPGRAM_ACCESS_TOKEN",
    "GYANRICH_ADMIN_PASSWORD_HASH",
    "GYANRICH_COOKIE_SECURE",
];

fn clear_env() {
    for var in VARS {
        unsafe {
            env::remove_var(var);
        }
    }
}

#[test]
fn test_config_defaults() {
    let config = Config::default();
    assert_eq!(config.port, 3000);
    assert!(!config.enable_docs);
    assert!(!config.cookie_secure);
    assert!(config.admin_password_hash.is_none());
    assert_eq!(config.session_ttl, Duration::from_secs(7 * 24 * 60 * 60));
}

#[test]
#[serial]
fn test_config_new_reads_env_vars() {
    clear_env();
    unsafe {
        env::set_var("GYANRICH_PUBLIC_DIR", "/srv/gyanrich/public");
        env::set_var("DEEPGRAM_ACCESS_TOKEN", "dg-token");
        env::set_var("GYANRICH_ADMIN_PASSWORD_HASH", "$argon2id$v=19$m=8,t=1,p=1$dGVzdC1zYWx0$ZGlnZXN0ZGlnZXN0ZGlnZXN0");
        env::set_var("GYANRICH_COOKIE_SECURE", "true");
    }

    let config = Config::new();
    assert_eq!(
        config.public_dir,
        Some(PathBuf::from("/srv/gyanrich/public"))
    );
    assert_eq!(config.voice_token.as_deref(), Some("dg-token"));
    assert_eq!(
        config.admin_password_hash.as_deref(),
        Some("$argon2id$v=19$m=8,t=1,p=1$dGVzdC1zYWx0$ZGlnZXN0ZGlnZXN0ZGlnZXN0")
    );
    assert!(config.cookie_secure);

    clear_env();
}

#[test]
#[serial]
fn test_config_ignores_blank_env_vars() {
    clear_env();
    unsafe {
        env::set_var("DEEPGRAM_ACCESS_TOKEN", "  ");
        env::set_var("GYANRICH_COOKIE_SECURE", "no");
    }

    let config = Config::new();
    assert!(config.voice_token.is_none());
    assert!(!config.cookie_secure);

    clear_env();
}

#[test]
#[serial]
fn test_config_builder_overrides_env_var() {
    clear_env();
    unsafe {
        env::set_var("DEEPGRAM_ACCESS_TOKEN", "from-env");
    }

    // Precedence: CLI flag > env var > default
    let config = Config::new()
        .with_voice_token("from-flag")
        .with_public_dir(PathBuf::from("/tmp/site"))
        .with_cookie_secure(true)
        .with_session_ttl(Duration::from_secs(60));

    assert_eq!(config.voice_token.as_deref(), Some("from-flag"));
    assert_eq!(config.public_dir, Some(PathBuf::from("/tmp/site")));
    assert!(config.cookie_secure);
    assert_eq!(config.session_ttl, Duration::from_secs(60));

    clear_env();
}

#[test]
fn test_default_filter_raises_with_verbosity() {
    assert_eq!(default_filter(0), "gyanrich=info,tower_http=info");
    assert!(default_filter(1).contains("gyanrich=debug"));
    assert!(default_filter(3).contains("gyanrich=trace"));
}
