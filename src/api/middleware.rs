//! Admin gate middleware.

use axum::{
    Json,
    extract::{Request, State},
    http::{HeaderMap, StatusCode},
    middleware::Next,
    response::{IntoResponse, Redirect, Response},
};
use tracing::{debug, error};

use super::AppState;
use super::v1::ErrorResponse;
use crate::auth::{digest_token, token_from_headers};
use crate::db::utils::current_timestamp;
use crate::db::{Database, SessionRepository};

const ADMIN_PAGES: &str = "/admin";
const ADMIN_LOGIN_PAGE: &str = "/admin/login";

/// Whether the request carries a valid, unexpired admin session cookie.
///
/// Storage failures count as unauthenticated.
pub async fn is_admin<D: Database>(state: &AppState<D>, headers: &HeaderMap) -> bool {
    let Some(token) = token_from_headers(headers) else {
        return false;
    };

    match state
        .db()
        .sessions()
        .find_valid(&digest_token(&token), &current_timestamp())
        .await
    {
        Ok(session) => session.is_some(),
        Err(e) => {
            error!(error = %e, "session lookup failed");
            false
        }
    }
}

/// Reject API requests without an admin session (401 JSON).
pub async fn require_admin<D: Database>(
    State(state): State<AppState<D>>,
    request: Request,
    next: Next,
) -> Response {
    if is_admin(&state, request.headers()).await {
        return next.run(request).await;
    }

    debug!(path = %request.uri().path(), "rejected unauthenticated admin request");
    (
        StatusCode::UNAUTHORIZED,
        Json(ErrorResponse {
            error: "Unauthorized".to_string(),
        }),
    )
        .into_response()
}

fn is_gated_page(path: &str) -> bool {
    let under_admin = path == ADMIN_PAGES
        || path
            .strip_prefix(ADMIN_PAGES)
            .is_some_and(|rest| rest.starts_with('/'));
    let is_login = path == ADMIN_LOGIN_PAGE || path.starts_with("/admin/login/");
    under_admin && !is_login
}

/// Redirect unauthenticated visitors of admin pages to the login page.
pub async fn guard_admin_pages<D: Database>(
    State(state): State<AppState<D>>,
    request: Request,
    next: Next,
) -> Response {
    if is_gated_page(request.uri().path()) && !is_admin(&state, request.headers()).await {
        return Redirect::temporary(ADMIN_LOGIN_PAGE).into_response();
    }
    next.run(request).await
}

#[cfg(test)]
mod tests {
    use super::is_gated_page;

    #[test]
    fn test_admin_pages_are_gated() {
        assert!(is_gated_page("/admin"));
        assert!(is_gated_page("/admin/"));
        assert!(is_gated_page("/admin/blog/new"));
        assert!(is_gated_page("/admin/leads"));
    }

    #[test]
    fn test_login_and_public_pages_are_not_gated() {
        assert!(!is_gated_page("/admin/login"));
        assert!(!is_gated_page("/"));
        assert!(!is_gated_page("/blog"));
        assert!(!is_gated_page("/administrators"));
        assert!(!is_gated_page("/api/v1/blog"));
    }
}
