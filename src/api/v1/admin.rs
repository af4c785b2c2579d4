//! Admin login, logout and session status.

use axum::{
    Json,
    extract::State,
    http::{HeaderMap, StatusCode, header},
    response::{AppendHeaders, IntoResponse},
};
use serde::{Deserialize, Serialize};
use tracing::{error, info, instrument, warn};
use utoipa::ToSchema;

use super::{ApiErrorResponse, error_response};
use crate::api::{AppState, is_admin};
use crate::auth::{
    clear_session_cookie, digest_token, mint_token, session_cookie, token_from_headers,
    verify_password,
};
use crate::db::utils::{current_timestamp, timestamp_after};
use crate::db::{AdminSession, Database, SessionRepository};

#[derive(Debug, Deserialize, ToSchema)]
pub struct LoginRequest {
    pub password: String,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct SessionResponse {
    pub authenticated: bool,
}

fn internal(message: &str) -> ApiErrorResponse {
    error_response(StatusCode::INTERNAL_SERVER_ERROR, message)
}

#[utoipa::path(
    post,
    path = "/api/v1/admin/login",
    tag = "admin",
    request_body = LoginRequest,
    responses(
        (status = 200, description = "Logged in; session cookie set", body = SessionResponse),
        (status = 401, description = "Invalid password", body = super::ErrorResponse),
        (status = 503, description = "Admin login not configured", body = super::ErrorResponse),
        (status = 500, description = "Internal server error", body = super::ErrorResponse)
    )
)]
#[instrument(skip(state, req))]
pub async fn login<D: Database>(
    State(state): State<AppState<D>>,
    Json(req): Json<LoginRequest>,
) -> Result<impl IntoResponse, ApiErrorResponse> {
    let Some(encoded) = state.settings().admin_password_hash.clone() else {
        return Err(error_response(
            StatusCode::SERVICE_UNAVAILABLE,
            "Admin login is not configured",
        ));
    };

    // Hash verification is deliberately slow; keep it off the async workers.
    let verified = tokio::task::spawn_blocking(move || verify_password(&req.password, &encoded))
        .await
        .map_err(|e| {
            error!(error = %e, "password verification task failed");
            internal("An error occurred")
        })?
        .map_err(|e| {
            error!(error = %e, "configured admin password hash is unusable");
            internal("An error occurred")
        })?;

    if !verified {
        warn!("rejected admin login");
        return Err(error_response(StatusCode::UNAUTHORIZED, "Invalid password"));
    }

    let ttl = state.settings().session_ttl;
    let offset = chrono::Duration::from_std(ttl).map_err(|e| {
        error!(error = %e, "session lifetime out of range");
        internal("An error occurred")
    })?;
    let token = mint_token().map_err(|e| {
        error!(error = %e, "failed to mint session token");
        internal("An error occurred")
    })?;

    let session = AdminSession {
        token_digest: digest_token(&token),
        created_at: current_timestamp(),
        expires_at: timestamp_after(offset),
    };
    state.db().sessions().create(&session).await.map_err(|e| {
        error!(error = %e, "failed to store admin session");
        internal("An error occurred")
    })?;

    info!(expires_at = %session.expires_at, "admin logged in");
    let cookie = session_cookie(&token, ttl, state.settings().cookie_secure);
    Ok((
        AppendHeaders([(header::SET_COOKIE, cookie)]),
        Json(SessionResponse {
            authenticated: true,
        }),
    ))
}

#[utoipa::path(
    post,
    path = "/api/v1/admin/logout",
    tag = "admin",
    responses(
        (status = 200, description = "Session revoked; cookie cleared", body = SessionResponse)
    )
)]
#[instrument(skip(state, headers))]
pub async fn logout<D: Database>(
    State(state): State<AppState<D>>,
    headers: HeaderMap,
) -> impl IntoResponse {
    if let Some(token) = token_from_headers(&headers)
        && let Err(e) = state.db().sessions().delete(&digest_token(&token)).await
    {
        error!(error = %e, "failed to revoke admin session");
    }

    (
        AppendHeaders([(
            header::SET_COOKIE,
            clear_session_cookie(state.settings().cookie_secure),
        )]),
        Json(SessionResponse {
            authenticated: false,
        }),
    )
}

#[utoipa::path(
    get,
    path = "/api/v1/admin/session",
    tag = "admin",
    responses(
        (status = 200, description = "Whether the caller holds a valid admin session", body = SessionResponse)
    )
)]
#[instrument(skip(state, headers))]
pub async fn session_status<D: Database>(
    State(state): State<AppState<D>>,
    headers: HeaderMap,
) -> Json<SessionResponse> {
    Json(SessionResponse {
        authenticated: is_admin(&state, &headers).await,
    })
}
