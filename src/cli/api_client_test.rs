use crate::cli::api_client::*;

// Initialize crypto provider once for all tests
fn init_crypto() {
    let _ = rustls::crypto::ring::default_provider().install_default();
}

#[test]
fn test_new_with_explicit_url() {
    init_crypto();
    let client = ApiClient::new(Some("http://custom:8080".to_string()));
    assert_eq!(client.base_url(), "http://custom:8080");
    assert!(!client.is_logged_in());
}

#[test]
fn test_trailing_slash_is_trimmed() {
    init_crypto();
    let client = ApiClient::new(Some("http://custom:8080/".to_string()));
    assert_eq!(client.base_url(), "http://custom:8080");
}

#[test]
fn test_new_with_default() {
    init_crypto();
    let client = ApiClient::new(None);
    // Depends on GYANRICH_API_URL when set
    assert!(!client.base_url().is_empty());
}

#[test]
fn test_session_pair_extracts_cookie() {
    assert_eq!(
        session_pair("admin_session=abc123; Path=/; HttpOnly; SameSite=Lax; Max-Age=604800"),
        Some("admin_session=abc123".to_string())
    );
}

#[test]
fn test_session_pair_ignores_other_and_cleared_cookies() {
    assert_eq!(session_pair("theme=dark; Path=/"), None);
    assert_eq!(session_pair("admin_session=; Path=/; Max-Age=0"), None);
    assert_eq!(session_pair("garbage"), None);
}
