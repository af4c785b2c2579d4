use std::io::BufRead;

use serde::Deserialize;

use crate::auth;
use crate::cli::api_client::ApiClient;
use crate::cli::error::{CliError, CliResult};

#[derive(Debug, Deserialize)]
struct SessionStatus {
    authenticated: bool,
}

/// Hash a password for `GYANRICH_ADMIN_PASSWORD_HASH`.
///
/// Reads the first line of `input` when no password is given, so the
/// password can be piped in instead of landing in shell history.
pub fn hash_password(password: Option<String>, input: impl BufRead) -> CliResult<String> {
    let password = match password {
        Some(p) => p,
        None => input.lines().next().transpose()?.unwrap_or_default(),
    };

    if password.trim().is_empty() {
        return Err(CliError::InvalidArgument {
            message: "password must not be empty".to_string(),
        });
    }

    Ok(auth::hash_password(&password)?)
}

/// Report whether the client's session is accepted by the server
pub async fn session_status(api_client: &ApiClient) -> CliResult<String> {
    let response = api_client.get("/api/v1/admin/session").send().await?;
    let status: SessionStatus = ApiClient::handle_response(response).await?;

    if status.authenticated {
        Ok(format!("✓ Logged in to {}", api_client.base_url()))
    } else {
        Ok(format!("Not logged in to {}", api_client.base_url()))
    }
}

/// End the client's session on the server
pub async fn logout(api_client: &ApiClient) -> CliResult<String> {
    let response = api_client.post("/api/v1/admin/logout").send().await?;
    ApiClient::expect_success(response).await?;
    Ok("✓ Logged out".to_string())
}
