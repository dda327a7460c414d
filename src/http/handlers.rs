use super::state::AppState;
use crate::live::Voice;
use crate::profile::ProfileUpdate;
use axum::{
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Json},
};
use serde::{Deserialize, Serialize};
use serde_json::json;
use tracing::{error, info};

// ============================================================================
// Request/Response Types
// ============================================================================

#[derive(Debug, Deserialize)]
pub struct StartCallRequest {
    /// Access key for the live service; held only in the session's memory
    pub api_key: String,

    /// Optional voice override (one of the prebuilt voice names)
    pub voice: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct StartCallResponse {
    pub call_id: String,
    pub status: String,
}

#[derive(Debug, Serialize)]
pub struct StopCallResponse {
    pub status: String,
}

#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error: String,
}

// ============================================================================
// Handlers
// ============================================================================

/// POST /call/start
/// Start a live call; rejected while one is active
pub async fn start_call(
    State(state): State<AppState>,
    Json(req): Json<StartCallRequest>,
) -> impl IntoResponse {
    if state.controller.is_active().await {
        return (
            StatusCode::CONFLICT,
            Json(ErrorResponse {
                error: "A call is already active".to_string(),
            }),
        )
            .into_response();
    }

    let voice = match req.voice.as_deref() {
        Some(name) => match Voice::parse(name) {
            Some(voice) => Some(voice),
            None => {
                return (
                    StatusCode::BAD_REQUEST,
                    Json(ErrorResponse {
                        error: format!("Unknown voice '{}'", name),
                    }),
                )
                    .into_response();
            }
        },
        None => None,
    };

    match state.controller.start_call(&req.api_key, voice).await {
        Ok(call_id) => {
            info!("Call {} started via API", call_id);
            (
                StatusCode::OK,
                Json(StartCallResponse {
                    call_id,
                    status: "connected".to_string(),
                }),
            )
                .into_response()
        }
        Err(e) => {
            // Acquisition failures surface here so the UI can alert the user.
            error!("Failed to start call: {:#}", e);
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(ErrorResponse {
                    error: format!("Failed to start call: {:#}", e),
                }),
            )
                .into_response()
        }
    }
}

/// POST /call/stop
/// Stop the active call; a no-op when idle
pub async fn stop_call(State(state): State<AppState>) -> impl IntoResponse {
    match state.controller.stop_call().await {
        Ok(()) => (
            StatusCode::OK,
            Json(StopCallResponse {
                status: "stopped".to_string(),
            }),
        )
            .into_response(),
        Err(e) => {
            error!("Failed to stop call: {:#}", e);
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(ErrorResponse {
                    error: format!("Failed to stop call: {:#}", e),
                }),
            )
                .into_response()
        }
    }
}

/// GET /call/status
/// Stats for the active call, or a disconnected placeholder when idle
pub async fn call_status(State(state): State<AppState>) -> impl IntoResponse {
    match state.controller.stats().await {
        Some(stats) => (StatusCode::OK, Json(stats)).into_response(),
        None => (StatusCode::OK, Json(json!({ "state": "disconnected" }))).into_response(),
    }
}

/// GET /profile
pub async fn get_profile(State(state): State<AppState>) -> impl IntoResponse {
    match state.controller.profile_store().load() {
        Ok(profile) => (StatusCode::OK, Json(profile)).into_response(),
        Err(e) => {
            error!("Failed to load profile: {:#}", e);
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(ErrorResponse {
                    error: format!("Failed to load profile: {:#}", e),
                }),
            )
                .into_response()
        }
    }
}

/// PUT /profile
/// Field-wise patch; absent fields are left unchanged
pub async fn update_profile(
    State(state): State<AppState>,
    Json(update): Json<ProfileUpdate>,
) -> impl IntoResponse {
    match state.controller.profile_store().update(update) {
        Ok(profile) => (StatusCode::OK, Json(profile)).into_response(),
        Err(e) => {
            error!("Failed to update profile: {:#}", e);
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(ErrorResponse {
                    error: format!("Failed to update profile: {:#}", e),
                }),
            )
                .into_response()
        }
    }
}

/// POST /profile/reset
/// Restore the default profile record
pub async fn reset_profile(State(state): State<AppState>) -> impl IntoResponse {
    match state.controller.profile_store().reset() {
        Ok(profile) => (StatusCode::OK, Json(profile)).into_response(),
        Err(e) => {
            error!("Failed to reset profile: {:#}", e);
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(ErrorResponse {
                    error: format!("Failed to reset profile: {:#}", e),
                }),
            )
                .into_response()
        }
    }
}

/// GET /health
/// Health check endpoint
pub async fn health_check() -> impl IntoResponse {
    (StatusCode::OK, "OK")
}
