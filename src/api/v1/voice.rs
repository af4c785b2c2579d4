//! Voice agent configuration handler.

use axum::{Json, extract::State, http::StatusCode};
use serde::{Deserialize, Serialize};
use tracing::{error, instrument};
use utoipa::ToSchema;

use super::{ApiErrorResponse, error_response};
use crate::api::AppState;
use crate::db::Database;

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct VoiceAgentResponse {
    /// Deepgram access token used by the voice widget
    pub api_key: String,
}

#[utoipa::path(
    get,
    path = "/api/v1/voice-agent",
    tag = "voice",
    responses(
        (status = 200, description = "Voice agent configuration", body = VoiceAgentResponse),
        (status = 500, description = "Token not configured", body = super::ErrorResponse)
    )
)]
#[instrument(skip(state))]
pub async fn voice_agent_config<D: Database>(
    State(state): State<AppState<D>>,
) -> Result<Json<VoiceAgentResponse>, ApiErrorResponse> {
    match &state.settings().voice_token {
        Some(token) => Ok(Json(VoiceAgentResponse {
            api_key: token.clone(),
        })),
        None => {
            error!("voice agent requested but DEEPGRAM_ACCESS_TOKEN is not set");
            Err(error_response(
                StatusCode::INTERNAL_SERVER_ERROR,
                "DEEPGRAM_ACCESS_TOKEN not configured",
            ))
        }
    }
}
